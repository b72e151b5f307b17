use std::{env, path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use dotenvy::dotenv;
use kindly_core::CategoryId;

const DEFAULT_API_URL: &str = "http://localhost:8080";
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_LOG_FILE: &str = "kindly.log";
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Parser, Debug)]
#[command(
    name = "kindly",
    about = "Browse Kindly care providers from the terminal",
    version
)]
pub(crate) struct Cli {
    /// Backend root URL (overrides `KINDLY_API_URL`)
    #[arg(long)]
    pub api_url: Option<String>,
    /// Path to open on start, e.g. /services
    #[arg(long, default_value = "/")]
    pub start: String,
    /// Category to load when the services view opens (child-care, elder-care, pet-care, all)
    #[arg(long)]
    pub category: Option<CategoryId>,
    /// Log file (overrides `KINDLY_LOG_FILE`)
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

/// Runtime settings from the environment, then the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Config {
    pub api_url: String,
    pub http_timeout: Duration,
    pub log_file: PathBuf,
    pub log_level: String,
    pub start_path: String,
    pub initial_category: Option<CategoryId>,
}

impl Config {
    /// Load settings from the process environment, reading `.env` first if present.
    pub(crate) fn from_env() -> Result<Self> {
        // Missing .env is fine outside development.
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let timeout_secs = match lookup("KINDLY_HTTP_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .context("KINDLY_HTTP_TIMEOUT_SECS must be a whole number of seconds")?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            api_url: lookup("KINDLY_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_owned()),
            http_timeout: Duration::from_secs(timeout_secs),
            log_file: lookup("KINDLY_LOG_FILE")
                .map_or_else(|| PathBuf::from(DEFAULT_LOG_FILE), PathBuf::from),
            log_level: lookup("KINDLY_LOG_LEVEL").unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_owned()),
            start_path: String::from("/"),
            initial_category: None,
        })
    }

    /// Let command-line flags win over the environment.
    pub(crate) fn with_cli(mut self, cli: Cli) -> Self {
        if let Some(api_url) = cli.api_url {
            self.api_url = api_url;
        }
        if let Some(log_file) = cli.log_file {
            self.log_file = log_file;
        }
        self.start_path = cli.start;
        self.initial_category = cli.category;
        self
    }
}
