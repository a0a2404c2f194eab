use std::str::FromStr;

use chrono::NaiveDate;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use super::birth::Gender;

/// The twelve earthly-branch animals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChineseZodiac {
    Rat,
    Ox,
    Tiger,
    Rabbit,
    Dragon,
    Snake,
    Horse,
    Goat,
    Monkey,
    Rooster,
    Dog,
    Pig,
}

impl ChineseZodiac {
    pub const ALL: [ChineseZodiac; 12] = [
        ChineseZodiac::Rat,
        ChineseZodiac::Ox,
        ChineseZodiac::Tiger,
        ChineseZodiac::Rabbit,
        ChineseZodiac::Dragon,
        ChineseZodiac::Snake,
        ChineseZodiac::Horse,
        ChineseZodiac::Goat,
        ChineseZodiac::Monkey,
        ChineseZodiac::Rooster,
        ChineseZodiac::Dog,
        ChineseZodiac::Pig,
    ];

    /// Zodiac animal for a solar year (1900 is a Rat year)
    pub fn from_year(year: i32) -> Self {
        Self::ALL[(year - 4).rem_euclid(12) as usize]
    }

    pub fn wire_name(&self) -> &'static str {
        match self {
            ChineseZodiac::Rat => "RAT",
            ChineseZodiac::Ox => "OX",
            ChineseZodiac::Tiger => "TIGER",
            ChineseZodiac::Rabbit => "RABBIT",
            ChineseZodiac::Dragon => "DRAGON",
            ChineseZodiac::Snake => "SNAKE",
            ChineseZodiac::Horse => "HORSE",
            ChineseZodiac::Goat => "GOAT",
            ChineseZodiac::Monkey => "MONKEY",
            ChineseZodiac::Rooster => "ROOSTER",
            ChineseZodiac::Dog => "DOG",
            ChineseZodiac::Pig => "PIG",
        }
    }

    pub fn korean_name(&self) -> &'static str {
        match self {
            ChineseZodiac::Rat => "쥐",
            ChineseZodiac::Ox => "소",
            ChineseZodiac::Tiger => "호랑이",
            ChineseZodiac::Rabbit => "토끼",
            ChineseZodiac::Dragon => "용",
            ChineseZodiac::Snake => "뱀",
            ChineseZodiac::Horse => "말",
            ChineseZodiac::Goat => "양",
            ChineseZodiac::Monkey => "원숭이",
            ChineseZodiac::Rooster => "닭",
            ChineseZodiac::Dog => "개",
            ChineseZodiac::Pig => "돼지",
        }
    }

    pub fn branch(&self) -> &'static str {
        match self {
            ChineseZodiac::Rat => "子",
            ChineseZodiac::Ox => "丑",
            ChineseZodiac::Tiger => "寅",
            ChineseZodiac::Rabbit => "卯",
            ChineseZodiac::Dragon => "辰",
            ChineseZodiac::Snake => "巳",
            ChineseZodiac::Horse => "午",
            ChineseZodiac::Goat => "未",
            ChineseZodiac::Monkey => "申",
            ChineseZodiac::Rooster => "酉",
            ChineseZodiac::Dog => "戌",
            ChineseZodiac::Pig => "亥",
        }
    }
}

impl FromStr for ChineseZodiac {
    type Err = String;

    /// Accepts the English wire name (any case) or the Korean name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|z| z.wire_name().eq_ignore_ascii_case(trimmed) || z.korean_name() == trimmed)
            .ok_or_else(|| format!("unknown zodiac: {}", s))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ZodiacFortuneRequest {
    pub zodiac: ChineseZodiac,
    /// Defaults to today on the server when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarConversionRequest {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub is_lunar: bool,
    pub is_leap_month: bool,
}

/// One side of a compatibility reading
#[derive(Debug, Clone, PartialEq)]
pub struct PersonBirth {
    pub name: Option<String>,
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub gender: Gender,
    pub is_lunar: bool,
}

/// Serialized flat as `person1Year`, `person2Gender`, ...
#[derive(Debug, Clone, PartialEq)]
pub struct CompatibilityRequest {
    pub person1: PersonBirth,
    pub person2: PersonBirth,
}

impl CompatibilityRequest {
    fn serialize_person<M: SerializeMap>(
        map: &mut M,
        prefix: &str,
        person: &PersonBirth,
    ) -> Result<(), M::Error> {
        map.serialize_entry(&format!("{}Year", prefix), &person.year)?;
        map.serialize_entry(&format!("{}Month", prefix), &person.month)?;
        map.serialize_entry(&format!("{}Day", prefix), &person.day)?;
        map.serialize_entry(&format!("{}Hour", prefix), &person.hour)?;
        map.serialize_entry(&format!("{}Minute", prefix), &person.minute)?;
        map.serialize_entry(&format!("{}Gender", prefix), &person.gender)?;
        map.serialize_entry(&format!("{}IsLunar", prefix), &person.is_lunar)?;
        if let Some(ref name) = person.name {
            map.serialize_entry(&format!("{}Name", prefix), name)?;
        }
        Ok(())
    }
}

impl Serialize for CompatibilityRequest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        Self::serialize_person(&mut map, "person1", &self.person1)?;
        Self::serialize_person(&mut map, "person2", &self.person2)?;
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TarotReadingRequest {
    pub question: String,
    /// LOVE, CAREER, MONEY, HEALTH or GENERAL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DreamInterpretationRequest {
    pub dream_content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mood: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LuckyDayRequest {
    /// MARRIAGE, MOVING, BUSINESS_START, CONTRACT, TRAVEL, IMPORTANT_MEETING or OTHER
    pub purpose: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_month: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_day: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NameAnalysisRequest {
    pub name: String,
    /// CURRENT to analyse an existing name, NEW for naming suggestions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_month: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_day: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TojeongRequest {
    /// Year the reading is for
    pub year: i32,
    pub birth_year: i32,
    pub birth_month: u32,
    pub birth_day: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
}
