//! Runtime configuration from environment variables.
//!
//! HOST (default 0.0.0.0), PORT (8080), MATCH_DURATION_SECS (600), DRAW_SPACING_MINUTES (20),
//! AUTO_FINISH_GRACE_MS (1500). Unset or unparsable values fall back to the default.

use crate::logic::DEFAULT_SPACING_MINUTES;
use crate::models::{AUTO_FINISH_GRACE, DEFAULT_DURATION_SECONDS};
use std::str::FromStr;
use std::time::Duration;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Clock length given to newly drawn matches.
    pub match_duration_seconds: u32,
    /// Minutes between kick-offs when a draw has a start time.
    pub draw_spacing_minutes: u32,
    pub auto_finish_grace: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            match_duration_seconds: DEFAULT_DURATION_SECONDS,
            draw_spacing_minutes: DEFAULT_SPACING_MINUTES,
            auto_finish_grace: AUTO_FINISH_GRACE,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup (environment, tests).
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parse_or(&lookup, "PORT", defaults.port),
            match_duration_seconds: parse_or(
                &lookup,
                "MATCH_DURATION_SECS",
                defaults.match_duration_seconds,
            ),
            draw_spacing_minutes: parse_or(
                &lookup,
                "DRAW_SPACING_MINUTES",
                defaults.draw_spacing_minutes,
            ),
            auto_finish_grace: lookup("AUTO_FINISH_GRACE_MS")
                .and_then(|v| v.trim().parse::<u64>().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.auto_finish_grace),
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            log::warn!("Ignoring invalid {}={:?}", key, raw);
            default
        }),
        None => default,
    }
}
