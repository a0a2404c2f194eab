//! Command-line parsing and execution.

use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use tracing::warn;

use sajuai_core::models::{
    BirthData, CalendarConversionRequest, ChineseZodiac, CompatibilityRequest,
    DreamInterpretationRequest, Gender, LuckyDayRequest, NameAnalysisRequest, OAuthProvider,
    PersonBirth, TarotReadingRequest, TojeongRequest, UserProfile, ZodiacFortuneRequest,
};

use crate::app::App;

pub const USAGE: &str = "\
Usage: sajuai <command> [args]

Account:
  login <google|kakao> <code>       Complete an OAuth sign-in
  logout                            Sign out and forget the session
  whoami                            Show the signed-in user
  disconnect <google|kakao>         Unlink an OAuth provider
  profile                           Show the saved birth profile
  profile set <date> <time> <gender> [--lunar]

Saju:
  analyze <date> <time> <gender> [--lunar]
  history                           Past analyses
  show <id>                         One stored analysis
  pdf <id> <file>                   Download an analysis as PDF
  last                              Last analysis (offline)
  recent                            Recent analyses (offline)
  clear-cache                       Forget cached analyses

Fortune:
  daily <date> <time> <gender> [--lunar]
  lucky <date> <time> <gender> [--lunar]
  zodiac <animal> [date]
  message | gacha | hourly
  tojeong <year> <birth-date> [gender]

Other readings:
  calendar <date> [--lunar] [--leap]
  compat <date> <time> <gender> <date> <time> <gender>
  tarot <question> [category]
  dream <description> [mood]
  luckyday <purpose> <start-date> <end-date>
  name <name> [CURRENT|NEW]

  config                            Show the effective configuration

Dates are YYYY-MM-DD, times HH:MM, gender male|female.";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Help,
    Config,
    Login { provider: OAuthProvider, code: String },
    Logout,
    WhoAmI,
    Disconnect(OAuthProvider),
    Profile,
    SaveProfile(BirthData),
    Analyze(BirthData),
    History,
    Show(i64),
    Pdf { id: i64, output: PathBuf },
    Last,
    Recent,
    ClearCache,
    Daily(BirthData),
    Lucky(BirthData),
    Zodiac(ZodiacFortuneRequest),
    Message,
    Gacha,
    Hourly,
    Tojeong(TojeongRequest),
    Calendar(CalendarConversionRequest),
    Compat(CompatibilityRequest),
    Tarot(TarotReadingRequest),
    Dream(DreamInterpretationRequest),
    LuckyDay(LuckyDayRequest),
    Name(NameAnalysisRequest),
}

/// Positional arguments with `--flags` split out
struct Args<'a> {
    positional: Vec<&'a str>,
    flags: Vec<&'a str>,
}

impl<'a> Args<'a> {
    fn new(args: &'a [String]) -> Self {
        let (flags, positional) = args
            .iter()
            .map(String::as_str)
            .partition(|a| a.starts_with("--"));
        Self { positional, flags }
    }

    fn has(&self, flag: &str) -> bool {
        self.flags.iter().any(|f| *f == flag)
    }

    fn get(&self, index: usize, what: &str) -> Result<&'a str> {
        self.positional
            .get(index)
            .copied()
            .ok_or_else(|| anyhow!("Missing {}", what))
    }

    fn opt(&self, index: usize) -> Option<String> {
        self.positional.get(index).map(|s| s.to_string())
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", raw))
}

fn parse_time(raw: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(raw, "%H:%M")
        .with_context(|| format!("Invalid time '{}', expected HH:MM", raw))
}

fn parse_gender(raw: &str) -> Result<Gender> {
    raw.parse().map_err(|e: String| anyhow!(e))
}

fn parse_id(raw: &str) -> Result<i64> {
    raw.parse::<i64>()
        .with_context(|| format!("Invalid id '{}'", raw))
}

/// `<date> <time> <gender>` starting at `start`
fn parse_birth(args: &Args, start: usize, is_lunar: bool) -> Result<BirthData> {
    let date = parse_date(args.get(start, "birth date")?)?;
    let time = parse_time(args.get(start + 1, "birth time")?)?;
    let gender = parse_gender(args.get(start + 2, "gender")?)?;
    Ok(BirthData::from_datetime(
        NaiveDateTime::new(date, time),
        gender,
        is_lunar,
    ))
}

fn person(birth: BirthData) -> PersonBirth {
    PersonBirth {
        name: None,
        year: birth.year,
        month: birth.month,
        day: birth.day,
        hour: birth.hour,
        minute: birth.minute,
        gender: birth.gender,
        is_lunar: birth.is_lunar,
    }
}

impl Command {
    /// Parse the arguments after the program name
    pub fn parse(raw: &[String]) -> Result<Self> {
        let Some((name, rest)) = raw.split_first() else {
            return Ok(Command::Help);
        };
        let args = Args::new(rest);
        let lunar = args.has("--lunar");

        let command = match name.as_str() {
            "help" | "--help" | "-h" => Command::Help,
            "config" => Command::Config,
            "login" => Command::Login {
                provider: args
                    .get(0, "provider")?
                    .parse::<OAuthProvider>()
                    .map_err(|e: String| anyhow!(e))?,
                code: args.get(1, "authorization code")?.to_string(),
            },
            "logout" => Command::Logout,
            "whoami" => Command::WhoAmI,
            "disconnect" => Command::Disconnect(
                args.get(0, "provider")?
                    .parse::<OAuthProvider>()
                    .map_err(|e: String| anyhow!(e))?,
            ),
            "profile" => match args.positional.first() {
                None => Command::Profile,
                Some(&"set") => Command::SaveProfile(parse_birth(&args, 1, lunar)?),
                Some(other) => bail!("Unknown profile action '{}'", other),
            },
            "analyze" => Command::Analyze(parse_birth(&args, 0, lunar)?),
            "history" => Command::History,
            "show" => Command::Show(parse_id(args.get(0, "result id")?)?),
            "pdf" => Command::Pdf {
                id: parse_id(args.get(0, "result id")?)?,
                output: PathBuf::from(args.get(1, "output file")?),
            },
            "last" => Command::Last,
            "recent" => Command::Recent,
            "clear-cache" => Command::ClearCache,
            "daily" => Command::Daily(parse_birth(&args, 0, lunar)?),
            "lucky" => Command::Lucky(parse_birth(&args, 0, lunar)?),
            "zodiac" => Command::Zodiac(ZodiacFortuneRequest {
                zodiac: args
                    .get(0, "zodiac animal")?
                    .parse::<ChineseZodiac>()
                    .map_err(|e| anyhow!(e))?,
                target_date: args.opt(1).as_deref().map(parse_date).transpose()?,
            }),
            "message" => Command::Message,
            "gacha" => Command::Gacha,
            "hourly" => Command::Hourly,
            "tojeong" => {
                let year = args
                    .get(0, "year")?
                    .parse::<i32>()
                    .context("Invalid year")?;
                let birth = parse_date(args.get(1, "birth date")?)?;
                Command::Tojeong(TojeongRequest {
                    year,
                    birth_year: birth.year(),
                    birth_month: birth.month(),
                    birth_day: birth.day(),
                    gender: args.opt(2).as_deref().map(parse_gender).transpose()?,
                })
            }
            "calendar" => {
                let date = parse_date(args.get(0, "date")?)?;
                Command::Calendar(CalendarConversionRequest {
                    year: date.year(),
                    month: date.month(),
                    day: date.day(),
                    is_lunar: lunar,
                    is_leap_month: args.has("--leap"),
                })
            }
            "compat" => Command::Compat(CompatibilityRequest {
                person1: person(parse_birth(&args, 0, lunar)?),
                person2: person(parse_birth(&args, 3, lunar)?),
            }),
            "tarot" => Command::Tarot(TarotReadingRequest {
                question: args.get(0, "question")?.to_string(),
                category: args.opt(1).map(|c| c.to_ascii_uppercase()),
                name: None,
            }),
            "dream" => Command::Dream(DreamInterpretationRequest {
                dream_content: args.get(0, "dream description")?.to_string(),
                category: None,
                name: None,
                mood: args.opt(1),
            }),
            "luckyday" => Command::LuckyDay(LuckyDayRequest {
                purpose: args.get(0, "purpose")?.to_ascii_uppercase(),
                start_date: parse_date(args.get(1, "start date")?)?,
                end_date: parse_date(args.get(2, "end date")?)?,
                birth_year: None,
                birth_month: None,
                birth_day: None,
                gender: None,
            }),
            "name" => Command::Name(NameAnalysisRequest {
                name: args.get(0, "name")?.to_string(),
                purpose: args.opt(1).map(|p| p.to_ascii_uppercase()),
                birth_year: None,
                birth_month: None,
                birth_day: None,
                gender: None,
            }),
            other => bail!("Unknown command '{}'. Run 'sajuai help' for usage.", other),
        };
        Ok(command)
    }
}

fn print_json(value: &impl serde::Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Run `command` against the backend and print the result
pub async fn run(app: &App, command: Command) -> Result<()> {
    let client = &app.client;

    match command {
        Command::Help => println!("{}", USAGE),
        Command::Config => print_json(&app.config)?,
        Command::Login { provider, code } => {
            let user = client.login_with_oauth(provider, &code).await?;
            println!("Signed in as {}", user.display_name());
            if user.has_profile == Some(false) {
                println!("No birth profile yet. Save one with 'sajuai profile set'.");
            }
        }
        Command::Logout => {
            client.logout().await?;
            println!("Signed out");
        }
        Command::WhoAmI => match client.check_auth().await {
            Some(user) => print_json(&user)?,
            None => println!("Not signed in"),
        },
        Command::Disconnect(provider) => print_json(&client.disconnect_provider(provider).await?)?,
        Command::Profile => match client.get_profile().await? {
            Some(profile) => print_json(&profile)?,
            None => println!("No saved profile"),
        },
        Command::SaveProfile(birth) => {
            let profile = UserProfile {
                id: None,
                user_id: None,
                name: None,
                year: birth.year,
                month: birth.month,
                day: birth.day,
                hour: birth.hour,
                minute: birth.minute,
                gender: birth.gender,
                is_lunar: birth.is_lunar,
                birth_data_id: None,
            };
            print_json(&client.save_profile(&profile).await?)?;
        }
        Command::Analyze(birth) => {
            let result = client.analyze_saju(&birth).await?;
            if let Err(e) = app.cache.record(&result) {
                warn!(error = %e, "Failed to cache analysis result");
            }
            print_json(&result)?;
        }
        Command::History => print_json(&client.saju_history().await?)?,
        Command::Show(id) => print_json(&client.saju_result(id).await?)?,
        Command::Pdf { id, output } => {
            let pdf = client.download_saju_pdf(id).await?;
            std::fs::write(&output, &pdf)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            println!("Saved {} bytes to {}", pdf.len(), output.display());
        }
        Command::Last => match app.cache.last()? {
            Some(cached) => {
                eprintln!("Cached {}", cached.age_display());
                print_json(&cached.data)?;
            }
            None => println!("No cached analysis"),
        },
        Command::Recent => {
            let recent = app.cache.recent()?;
            if recent.is_empty() {
                println!("No cached analyses");
            }
            for cached in recent {
                let id = cached
                    .data
                    .id
                    .map(|id| id.to_string())
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "{:>6}  {:<24}  {}",
                    id,
                    cached.data.pillars().join(" "),
                    cached.age_display()
                );
            }
        }
        Command::ClearCache => {
            app.cache.clear()?;
            println!("Cache cleared");
        }
        Command::Daily(birth) => print_json(&client.daily_fortune(&birth).await?)?,
        Command::Lucky(birth) => print_json(&client.lucky_items(&birth).await?)?,
        Command::Zodiac(request) => print_json(&client.zodiac_fortune(&request).await?)?,
        Command::Message => print_json(&client.daily_message().await?)?,
        Command::Gacha => print_json(&client.fortune_gacha().await?)?,
        Command::Hourly => print_json(&client.hourly_fortune().await?)?,
        Command::Tojeong(request) => print_json(&client.tojeong_fortune(&request).await?)?,
        Command::Calendar(request) => print_json(&client.convert_calendar(&request).await?)?,
        Command::Compat(request) => print_json(&client.analyze_compatibility(&request).await?)?,
        Command::Tarot(request) => print_json(&client.tarot_reading(&request).await?)?,
        Command::Dream(request) => print_json(&client.interpret_dream(&request).await?)?,
        Command::LuckyDay(request) => print_json(&client.find_lucky_days(&request).await?)?,
        Command::Name(request) => print_json(&client.analyze_name(&request).await?)?,
    }
    Ok(())
}
