// crates/server/src/config.rs
//! Server configuration from environment variables.
//!
//! | Variable                  | Default                 |
//! |---------------------------|-------------------------|
//! | `HOST`                    | `127.0.0.1`             |
//! | `PORT`                    | `3001`                  |
//! | `JOB_TIMEOUT_MS`          | `120000`                |
//! | `JOB_RETENTION_MS`        | `300000`                |
//! | `MAX_N_VALUE`             | `15`                    |
//! | `RATE_LIMIT_WINDOW_MS`    | `60000`                 |
//! | `RATE_LIMIT_MAX_REQUESTS` | `10`                    |
//! | `CORS_ORIGIN`             | `http://localhost:5173` |

use std::net::IpAddr;
use std::str::FromStr;
use std::time::Duration;

use nqueens_core::{DEFAULT_MAX_N, MAX_SUPPORTED_N};
use thiserror::Error;

pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_JOB_TIMEOUT: Duration = Duration::from_secs(120);
pub const DEFAULT_JOB_RETENTION: Duration = Duration::from_secs(5 * 60);
pub const DEFAULT_RATE_LIMIT_WINDOW: Duration = Duration::from_secs(60);
pub const DEFAULT_RATE_LIMIT_MAX_REQUESTS: u32 = 10;
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:5173";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },

    #[error("{var} must be greater than zero")]
    Zero { var: &'static str },
}

/// Settings for the job manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobSettings {
    /// How long a job may stay `processing` before it is failed.
    pub timeout: Duration,
    /// How long a finished job stays retrievable.
    pub retention: Duration,
}

impl Default for JobSettings {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_JOB_TIMEOUT,
            retention: DEFAULT_JOB_RETENTION,
        }
    }
}

/// Fixed-window style request budget per client IP.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitSettings {
    pub window: Duration,
    pub max_requests: u32,
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            window: DEFAULT_RATE_LIMIT_WINDOW,
            max_requests: DEFAULT_RATE_LIMIT_MAX_REQUESTS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    /// Largest board accepted by the solve endpoint.
    pub max_n: usize,
    pub jobs: JobSettings,
    pub rate_limit: RateLimitSettings,
    /// Allowed CORS origin, or `*` for any.
    pub cors_origin: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: DEFAULT_PORT,
            max_n: DEFAULT_MAX_N,
            jobs: JobSettings::default(),
            rate_limit: RateLimitSettings::default(),
            cors_origin: DEFAULT_CORS_ORIGIN.to_string(),
        }
    }
}

impl ServerConfig {
    /// Read from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read using an arbitrary lookup, so tests don't need to touch the
    /// process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let max_n: usize = parse_or(&lookup, "MAX_N_VALUE", defaults.max_n)?;
        if max_n == 0 {
            return Err(ConfigError::Zero { var: "MAX_N_VALUE" });
        }
        if max_n > MAX_SUPPORTED_N {
            tracing::warn!(max_n, supported = MAX_SUPPORTED_N, "MAX_N_VALUE clamped");
        }

        let max_requests: u32 = parse_or(
            &lookup,
            "RATE_LIMIT_MAX_REQUESTS",
            defaults.rate_limit.max_requests,
        )?;
        if max_requests == 0 {
            return Err(ConfigError::Zero {
                var: "RATE_LIMIT_MAX_REQUESTS",
            });
        }

        let window = millis_or(&lookup, "RATE_LIMIT_WINDOW_MS", defaults.rate_limit.window)?;
        if window.is_zero() {
            return Err(ConfigError::Zero {
                var: "RATE_LIMIT_WINDOW_MS",
            });
        }

        Ok(Self {
            host: parse_or(&lookup, "HOST", defaults.host)?,
            port: parse_or(&lookup, "PORT", defaults.port)?,
            max_n: max_n.min(MAX_SUPPORTED_N),
            jobs: JobSettings {
                timeout: millis_or(&lookup, "JOB_TIMEOUT_MS", defaults.jobs.timeout)?,
                retention: millis_or(&lookup, "JOB_RETENTION_MS", defaults.jobs.retention)?,
            },
            rate_limit: RateLimitSettings {
                window,
                max_requests,
            },
            cors_origin: lookup("CORS_ORIGIN")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.cors_origin),
        })
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(var) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { var, value: raw }),
    }
}

fn millis_or(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: Duration,
) -> Result<Duration, ConfigError> {
    let ms: u64 = parse_or(lookup, var, default.as_millis() as u64)?;
    Ok(Duration::from_millis(ms))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|var| map.get(var).cloned())
    }

    #[test]
    fn test_defaults_when_unset() {
        assert_eq!(config(&[]).unwrap(), ServerConfig::default());
        let defaults = ServerConfig::default();
        assert_eq!(defaults.port, 3001);
        assert_eq!(defaults.max_n, 15);
        assert_eq!(defaults.jobs.timeout, Duration::from_secs(120));
        assert_eq!(defaults.jobs.retention, Duration::from_secs(300));
        assert_eq!(defaults.rate_limit.max_requests, 10);
    }

    #[test]
    fn test_overrides() {
        let cfg = config(&[
            ("PORT", "8080"),
            ("JOB_TIMEOUT_MS", "500"),
            ("MAX_N_VALUE", "12"),
            ("RATE_LIMIT_MAX_REQUESTS", "100"),
            ("CORS_ORIGIN", "*"),
        ])
        .unwrap();
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.jobs.timeout, Duration::from_millis(500));
        assert_eq!(cfg.max_n, 12);
        assert_eq!(cfg.rate_limit.max_requests, 100);
        assert_eq!(cfg.cors_origin, "*");
    }

    #[test]
    fn test_max_n_clamped_to_engine_limit() {
        let cfg = config(&[("MAX_N_VALUE", "40")]).unwrap();
        assert_eq!(cfg.max_n, MAX_SUPPORTED_N);
    }

    #[test]
    fn test_invalid_values() {
        assert_eq!(
            config(&[("PORT", "eighty")]),
            Err(ConfigError::Invalid {
                var: "PORT",
                value: "eighty".to_string()
            })
        );
        assert_eq!(
            config(&[("MAX_N_VALUE", "0")]),
            Err(ConfigError::Zero { var: "MAX_N_VALUE" })
        );
        assert!(config(&[("RATE_LIMIT_WINDOW_MS", "0")]).is_err());
    }
}
