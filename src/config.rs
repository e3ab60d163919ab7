use std::time::Duration;

use crate::error::ConfigError;
use crate::services::locale::Locale;

pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:7860";
pub const DEFAULT_SAMPLE_DELAY: Duration = Duration::from_millis(2000);

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub backend_url: String,
    pub locale: Locale,
    /// Delay before the one-time sample-queries hint.
    pub sample_delay: Duration,
    /// `None` leaves the transport default in place.
    pub request_timeout: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            locale: Locale::default(),
            sample_delay: DEFAULT_SAMPLE_DELAY,
            request_timeout: None,
        }
    }
}

impl Config {
    /// Reads `.env` (if any) and then the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(url) = lookup("AIR_QUALITY_BACKEND_URL").filter(|s| !s.trim().is_empty()) {
            config.backend_url = url.trim().to_string();
        }
        if let Some(locale) = lookup("AIR_QUALITY_LOCALE") {
            config.locale = locale.parse()?;
        }
        if let Some(ms) = lookup("AIR_QUALITY_SAMPLE_DELAY_MS") {
            config.sample_delay = Duration::from_millis(parse_u64("AIR_QUALITY_SAMPLE_DELAY_MS", &ms)?);
        }
        if let Some(secs) = lookup("AIR_QUALITY_REQUEST_TIMEOUT_SECS") {
            let secs = parse_u64("AIR_QUALITY_REQUEST_TIMEOUT_SECS", &secs)?;
            config.request_timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }

        Ok(config)
    }
}

fn parse_u64(key: &'static str, value: &str) -> Result<u64, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidNumber {
        key,
        value: value.to_string(),
    })
}
