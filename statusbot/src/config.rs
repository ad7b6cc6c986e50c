use anyhow::{bail, Context, Result};
use std::env;
use std::time::Duration;
use tracing::{debug, error};

pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 600;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Clone)]
pub struct Config {
    pub practicum_token: String,
    pub telegram_token: String,
    pub telegram_chat_id: String,
    /// Delay between polling cycles.
    pub poll_interval: Duration,
    /// Timeout applied to every outbound HTTP request.
    pub request_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Each missing required secret gets its own log line before the
    /// whole load fails, so an operator sees every problem at once
    /// rather than one per restart.
    pub fn from_env() -> Result<Self> {
        debug!("Checking required environment variables");

        let mut missing = Vec::new();
        let practicum_token = require_var("PRACTICUM_TOKEN", &mut missing);
        let telegram_token = require_var("TELEGRAM_TOKEN", &mut missing);
        let telegram_chat_id = require_var("TELEGRAM_CHAT_ID", &mut missing);

        if !missing.is_empty() {
            bail!("missing required environment variables: {}", missing.join(", "));
        }

        let poll_interval_secs = parse_secs(
            "POLL_INTERVAL_SECS",
            env::var("POLL_INTERVAL_SECS").ok(),
            DEFAULT_POLL_INTERVAL_SECS,
        )?;

        let request_timeout_secs = parse_secs(
            "REQUEST_TIMEOUT_SECS",
            env::var("REQUEST_TIMEOUT_SECS").ok(),
            DEFAULT_REQUEST_TIMEOUT_SECS,
        )?;

        debug!("All required tokens are present");

        Ok(Config {
            practicum_token,
            telegram_token,
            telegram_chat_id,
            poll_interval: Duration::from_secs(poll_interval_secs),
            request_timeout: Duration::from_secs(request_timeout_secs),
        })
    }
}

fn require_var(name: &'static str, missing: &mut Vec<&'static str>) -> String {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => value,
        _ => {
            error!("Required environment variable {} is not set", name);
            missing.push(name);
            String::new()
        }
    }
}

/// Parse an optional duration knob, falling back to its default.
fn parse_secs(name: &str, value: Option<String>, default: u64) -> Result<u64> {
    match value {
        Some(raw) => raw
            .parse::<u64>()
            .with_context(|| format!("{} must be a whole number of seconds", name)),
        None => Ok(default),
    }
}
