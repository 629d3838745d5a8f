//! Application configuration, loaded from the environment.

use radar_core::FilterThresholds;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Missing {0} in environment")]
    Missing(&'static str),
    #[error("Invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Application configuration.
#[derive(Clone)]
pub struct RadarConfig {
    /// Telegram bot token
    pub bot_token: String,
    /// Default destination, used when no override file is present
    pub default_chat_id: Option<String>,
    /// Screening thresholds
    pub thresholds: FilterThresholds,
}

impl std::fmt::Debug for RadarConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RadarConfig")
            .field("bot_token", &"<redacted>")
            .field("default_chat_id", &self.default_chat_id)
            .field("thresholds", &self.thresholds)
            .finish()
    }
}

impl RadarConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create config from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let bot_token = get("TELEGRAM_BOT_TOKEN").ok_or(ConfigError::Missing("TELEGRAM_BOT_TOKEN"))?;
        let default_chat_id = get("TELEGRAM_CHAT_ID");

        let defaults = FilterThresholds::default();
        let thresholds = FilterThresholds {
            poll_interval_minutes: parse_poll_interval(&get, defaults.poll_interval_minutes)?,
            max_alerts_per_cycle: parse_or(&get, "MAX_ALERTS_PER_CYCLE", defaults.max_alerts_per_cycle)?,
            mcap_min: parse_or(&get, "MCAP_MIN", defaults.mcap_min)?,
            mcap_max: parse_or(&get, "MCAP_MAX", defaults.mcap_max)?,
            min_vol_24h: parse_or(&get, "MIN_VOL_24H", defaults.min_vol_24h)?,
            min_change_7d: parse_or(&get, "MIN_CHANGE_7D", defaults.min_change_7d)?,
            min_change_24h: parse_or(&get, "MIN_CHANGE_24H", defaults.min_change_24h)?,
        };

        Ok(Self {
            bot_token,
            default_chat_id,
            thresholds,
        })
    }
}

/// Poll interval in minutes; must be non-zero and representable in seconds.
fn parse_poll_interval(get: &impl Fn(&str) -> Option<String>, default: u64) -> Result<u64, ConfigError> {
    const KEY: &str = "POLL_INTERVAL_MINUTES";
    let minutes = parse_or(get, KEY, default)?;
    if minutes == 0 || minutes.checked_mul(60).is_none() {
        return Err(ConfigError::Invalid {
            key: KEY,
            value: minutes.to_string(),
        });
    }
    Ok(minutes)
}

fn parse_or<T: FromStr>(
    get: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match get(key) {
        Some(value) => value
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}
