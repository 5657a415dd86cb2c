use std::{env, fmt::Display, path::PathBuf, str::FromStr};

use anyhow::{anyhow, Result};
use tracing::{info, warn};

/// Runtime settings, read from the environment
#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: PathBuf,
    pub port: u16,
    /// Public origin used when building confirmation links
    pub base_url: String,
}

impl Config {
    pub fn load() -> Result<Self> {
        let port: u16 = try_load("RSVP_PORT", "3000")?;
        let db_path: PathBuf = try_load("RSVP_DB_PATH", "guests.db")?;
        let base_url = try_load("RSVP_BASE_URL", &format!("http://localhost:{}", port))?;

        Ok(Self {
            db_path,
            port,
            base_url,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }

    /// Log file used while the terminal page owns the screen.
    /// Read before the subscriber exists, so nothing is logged here.
    pub fn log_path() -> PathBuf {
        env::var("RSVP_LOG_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("rsvp.log"))
    }
}

fn try_load<T: FromStr>(key: &str, default: &str) -> Result<T>
where
    T::Err: Display,
{
    let raw = env::var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    raw.parse().map_err(|e| {
        warn!("Invalid {key} value: {e}");
        anyhow!("invalid {key} value {raw:?}: {e}")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_apply_when_unset() {
        let port: u16 = try_load("RSVP_TEST_UNSET_PORT", "3000").unwrap();
        assert_eq!(port, 3000);
    }

    #[test]
    fn test_invalid_value_is_an_error() {
        let result: Result<u16> = try_load("RSVP_TEST_UNSET_PORT_BAD", "not-a-port");
        assert!(result.is_err());
    }

    #[test]
    fn test_log_path_default() {
        if env::var("RSVP_LOG_PATH").is_err() {
            assert_eq!(Config::log_path(), PathBuf::from("rsvp.log"));
        }
    }

    #[test]
    fn test_bind_address() {
        let config = Config {
            db_path: PathBuf::from("guests.db"),
            port: 8080,
            base_url: "http://localhost:8080".into(),
        };
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
    }
}
