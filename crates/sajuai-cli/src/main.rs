//! SajuAI CLI - a command-line client for the SajuAI fortune service.
//!
//! Signs in through OAuth, keeps the session between runs, and prints
//! Saju analyses and fortune readings as JSON.

mod app;
mod commands;

use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use sajuai_core::{ApiError, ErrorKind};

use app::App;
use commands::Command;

/// Initialize the tracing subscriber for logging.
///
/// `RUST_LOG` controls the level (default `warn`). When `SAJUAI_LOG_FILE`
/// is set, events are also written to that file; the returned guard must be
/// held until exit so buffered lines are flushed.
fn init_tracing() -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let (file_layer, guard) = match std::env::var_os("SAJUAI_LOG_FILE").map(PathBuf::from) {
        Some(path) => match path.file_name() {
            Some(file_name) => {
                let dir = path
                    .parent()
                    .filter(|p| !p.as_os_str().is_empty())
                    .unwrap_or_else(|| Path::new("."));
                let appender = tracing_appender::rolling::never(dir, file_name);
                let (writer, guard) = tracing_appender::non_blocking(appender);
                (
                    Some(fmt::layer().with_writer(writer).with_ansi(false)),
                    Some(guard),
                )
            }
            None => (None, None),
        },
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(file_layer)
        .with(filter)
        .init();

    guard
}

/// Message for the user, chosen by failure class
fn describe_error(err: &anyhow::Error) -> String {
    let Some(api_err) = err.downcast_ref::<ApiError>() else {
        return format!("Error: {:#}", err);
    };
    match api_err.kind() {
        ErrorKind::Authorization => {
            "Your session has ended. Please sign in again with 'sajuai login <provider> <code>'."
                .to_string()
        }
        ErrorKind::Transport => format!("{}. Check your connection and try again.", api_err),
        ErrorKind::Domain => match api_err.payload().and_then(|p| p.message.as_deref()) {
            Some(message) => message.to_string(),
            None => api_err.to_string(),
        },
        ErrorKind::Client => format!("Error: {}", api_err),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let _log_guard = init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = match Command::parse(&args) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("{}\n\n{}", e, commands::USAGE);
            return ExitCode::from(2);
        }
    };
    let result = match App::new() {
        Ok(app) => commands::run(&app, command).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            info!(error = %e, "Command failed");
            eprintln!("{}", describe_error(&e));
            ExitCode::FAILURE
        }
    }
}
