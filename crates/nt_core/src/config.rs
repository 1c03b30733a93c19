use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::{Error, Result};

pub const GNEWS_API_KEY: &str = "GNEWS_API_KEY";
pub const FACTCHECK_API_KEY: &str = "GOOGLE_FACTCHECK_API_KEY";

/// A duration written the way people type it: `5s`, `15m`, `1h30m`, `2d`. A bare number is seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HumanDuration(pub Duration);

fn unit_seconds(unit: char) -> Option<u64> {
    match unit {
        's' => Some(1),
        'm' => Some(60),
        'h' => Some(3_600),
        'd' => Some(86_400),
        _ => None,
    }
}

fn too_long(s: &str) -> String {
    format!("Duration out of range: {}", s)
}

impl FromStr for HumanDuration {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut total: u64 = 0;
        let mut pending: Option<u64> = None;
        let mut parts = 0;

        for c in s.chars().filter(|c| !c.is_whitespace()) {
            if let Some(digit) = c.to_digit(10) {
                let value = pending
                    .unwrap_or(0)
                    .checked_mul(10)
                    .and_then(|v| v.checked_add(u64::from(digit)))
                    .ok_or_else(|| too_long(s))?;
                pending = Some(value);
                continue;
            }

            let value = pending
                .take()
                .ok_or_else(|| format!("Invalid character in duration: {}", c))?;
            let factor = unit_seconds(c).ok_or_else(|| format!("Invalid duration unit: {}", c))?;
            total = value
                .checked_mul(factor)
                .and_then(|v| total.checked_add(v))
                .ok_or_else(|| too_long(s))?;
            parts += 1;
        }

        // trailing number without unit is seconds
        if let Some(value) = pending {
            total = total.checked_add(value).ok_or_else(|| too_long(s))?;
            parts += 1;
        }

        if parts == 0 {
            return Err("Duration must include a number".to_string());
        }
        Ok(HumanDuration(Duration::from_secs(total)))
    }
}

/// Service configuration. Credentials are optional: a missing key disables only the provider
/// that needs it.
#[derive(Debug, Clone)]
pub struct Config {
    pub gnews_api_key: Option<String>,
    pub factcheck_api_key: Option<String>,
    pub provider_timeout: Duration,
    pub headlines_ttl: Duration,
    pub model_dir: PathBuf,
    pub host: String,
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gnews_api_key: None,
            factcheck_api_key: None,
            provider_timeout: Duration::from_secs(5),
            headlines_ttl: Duration::from_secs(15 * 60),
            model_dir: PathBuf::from("models"),
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            gnews_api_key: optional_env(GNEWS_API_KEY),
            factcheck_api_key: optional_env(FACTCHECK_API_KEY),
            provider_timeout: duration_env("NT_PROVIDER_TIMEOUT")?.unwrap_or(defaults.provider_timeout),
            headlines_ttl: duration_env("NT_HEADLINES_TTL")?.unwrap_or(defaults.headlines_ttl),
            model_dir: optional_env("NT_MODEL_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.model_dir),
            host: optional_env("NT_HOST").unwrap_or(defaults.host),
            port: match optional_env("NT_PORT") {
                Some(port) => port
                    .parse()
                    .map_err(|_| Error::Config(format!("NT_PORT must be a port number, got {:?}", port)))?,
                None => defaults.port,
            },
        })
    }
}

/// Reads a variable, treating unset and blank the same way.
pub fn optional_env(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn duration_env(key: &str) -> Result<Option<Duration>> {
    optional_env(key)
        .map(|raw| {
            raw.parse::<HumanDuration>()
                .map(|d| d.0)
                .map_err(|e| Error::Config(format!("{}: {}", key, e)))
        })
        .transpose()
}
