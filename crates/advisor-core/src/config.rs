//! Configuration management for the DeFi advisor system.

use crate::{Error, Result};
use serde::Deserialize;
use std::env;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    pub calibration: CalibrationSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// Environment-level calibration defaults consumed by the maintenance binary.
#[derive(Debug, Clone, Deserialize)]
pub struct CalibrationSettings {
    /// Default lookback window in days when none is given on the command line.
    pub default_window_days: i64,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").map_err(|_| Error::Config {
                    message: "DATABASE_URL environment variable not set".to_string(),
                })?,
                max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(5),
            },
            calibration: CalibrationSettings {
                default_window_days: env::var("CALIBRATION_WINDOW_DAYS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30),
            },
        })
    }

    /// Load configuration for testing (with defaults).
    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            database: DatabaseConfig {
                url: "postgres://localhost/advisor_test".to_string(),
                max_connections: 2,
            },
            calibration: CalibrationSettings {
                default_window_days: 30,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = Config::test_config();
        assert_eq!(config.database.max_connections, 2);
        assert_eq!(config.calibration.default_window_days, 30);
    }
}
