use std::{env, fs::OpenOptions, sync::Mutex};

use anyhow::{Context, Result, anyhow};
use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// Send logs to the configured file; the terminal belongs to the UI.
///
/// `RUST_LOG` wins over the configured level when set.
pub(crate) fn init(config: &Config) -> Result<()> {
    let env_filter = build_filter(env::var(EnvFilter::DEFAULT_ENV), &config.log_level)?;

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)
        .with_context(|| format!("cannot open log file {}", config.log_file.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(Mutex::new(log_file))
        .with_target(false)
        .with_ansi(false)
        .compact()
        .try_init()
        .map_err(|err| anyhow!("cannot install log subscriber: {err}"))
}

/// Only an unset `RUST_LOG` falls back to the configured level; a bad one is an error.
fn build_filter(rust_log: Result<String, env::VarError>, fallback: &str) -> Result<EnvFilter> {
    match rust_log {
        Ok(directives) => EnvFilter::try_new(&directives)
            .with_context(|| format!("invalid {} filter '{directives}'", EnvFilter::DEFAULT_ENV)),
        Err(env::VarError::NotPresent) => EnvFilter::try_new(fallback)
            .with_context(|| format!("invalid log level/filter '{fallback}'")),
        Err(err) => Err(err).with_context(|| format!("cannot read {}", EnvFilter::DEFAULT_ENV)),
    }
}
