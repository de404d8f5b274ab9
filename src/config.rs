use std::{env, time::Duration};

use chrono_tz::Tz;
use thiserror::Error;

pub const DEFAULT_ARRIVALS_URL: &str = "https://developer.trimet.org/ws/v2/arrivals";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{name} must be a whole number of seconds, got {value:?}")]
    Seconds { name: &'static str, value: String },
    #[error("{name} must be greater than zero")]
    Zero { name: &'static str },
    #[error("unknown time zone {0:?}")]
    TimeZone(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub arrivals_url: String,
    /// Upper bound on a single upstream request.
    pub timeout: Duration,
    /// Delay between a delivered result and the next refresh.
    pub refresh_interval: Duration,
    /// Zone TriMet timestamps are displayed in.
    pub timezone: Tz,
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            arrivals_url: DEFAULT_ARRIVALS_URL.into(),
            timeout: DEFAULT_TIMEOUT,
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            timezone: chrono_tz::America::Los_Angeles,
            debug: false,
        }
    }
}

impl Config {
    /// Reads `MYSTOPS_*` variables, falling back to the defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Ok(value) = env::var("MYSTOPS_TRIMET_API_KEY") {
            config.api_key = value;
        }
        if let Ok(value) = env::var("MYSTOPS_TRIMET_URL") {
            config.arrivals_url = value;
        }
        if let Some(timeout) = seconds_from_env("MYSTOPS_TIMEOUT_SECS")? {
            config.timeout = timeout;
        }
        if let Some(interval) = seconds_from_env("MYSTOPS_REFRESH_SECS")? {
            config.refresh_interval = interval;
        }
        if let Ok(value) = env::var("MYSTOPS_TIMEZONE") {
            config.timezone = value
                .parse()
                .map_err(|_| ConfigError::TimeZone(value.clone()))?;
        }
        if let Ok(value) = env::var("MYSTOPS_DEBUG") {
            config.debug = matches!(value.trim(), "1" | "true" | "yes" | "on");
        }
        Ok(config)
    }
}

fn seconds_from_env(name: &'static str) -> Result<Option<Duration>, ConfigError> {
    let Ok(value) = env::var(name) else {
        return Ok(None);
    };
    let seconds: u64 = value.trim().parse().map_err(|_| ConfigError::Seconds {
        name,
        value: value.clone(),
    })?;
    if seconds == 0 {
        return Err(ConfigError::Zero { name });
    }
    Ok(Some(Duration::from_secs(seconds)))
}

#[test]
fn default_refreshes_every_thirty_seconds() {
    let config = Config::default();
    assert_eq!(config.refresh_interval, Duration::from_secs(30));
    assert_eq!(config.timezone, chrono_tz::America::Los_Angeles);
}
