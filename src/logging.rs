// src/logging.rs

//! Logging for `kitchenbot`: a `tracing-subscriber` fmt layer on stderr,
//! filtered through an [`EnvFilter`].
//!
//! The filter comes from, in order:
//! 1. `--log-level`, applied to this crate only (everything else stays at
//!    `warn`);
//! 2. `KITCHENBOT_LOG`, any `EnvFilter` directive string, e.g. `debug` or
//!    `kitchenbot::exec=debug,kitchenbot::device=trace`;
//! 3. `info` for this crate.
//!
//! stdout carries the progress display, so nothing is logged there.

use anyhow::{Context, Result, anyhow};
use tracing_subscriber::{EnvFilter, fmt};

use crate::cli::LogLevel;

pub const LOG_ENV: &str = "KITCHENBOT_LOG";

/// Install the global subscriber. Fails if one is already installed or the
/// filter does not parse.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let env = std::env::var(LOG_ENV).ok();
    let filter = build_filter(cli_level, env.as_deref())?;

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("failed to install log subscriber: {e}"))
}

fn build_filter(cli_level: Option<LogLevel>, env: Option<&str>) -> Result<EnvFilter> {
    let directives = match (cli_level, env.map(str::trim)) {
        (Some(level), _) => crate_directive(level),
        (None, Some(env)) if !env.is_empty() => env.to_string(),
        _ => crate_directive(LogLevel::Info),
    };
    EnvFilter::try_new(&directives)
        .with_context(|| format!("invalid log filter {directives:?} (see --log-level / {LOG_ENV})"))
}

fn crate_directive(level: LogLevel) -> String {
    let level = match level {
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    };
    format!("warn,{}={level}", env!("CARGO_CRATE_NAME"))
}
