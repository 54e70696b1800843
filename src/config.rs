//! Runtime configuration: server bind address, log level, default scoring.
//!
//! Values come from the environment with fallbacks, so the binary runs with no setup:
//! `HOST` (default `0.0.0.0`), `PORT` (default `8080`), `LOG_LEVEL` (default `info`),
//! `POINTS_WIN` / `POINTS_DRAW` / `POINTS_LOSS` (default 3 / 1 / 0).

use serde::{Deserialize, Serialize};
use std::env;

/// Points awarded per group fixture outcome.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ScoringRules {
    pub win: i32,
    pub draw: i32,
    pub loss: i32,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            win: 3,
            draw: 1,
            loss: 0,
        }
    }
}

impl ScoringRules {
    /// Defaults overridden by `POINTS_WIN`, `POINTS_DRAW`, `POINTS_LOSS` where set and numeric.
    pub fn from_env() -> Self {
        let d = Self::default();
        Self {
            win: env_or("POINTS_WIN", d.win),
            draw: env_or("POINTS_DRAW", d.draw),
            loss: env_or("POINTS_LOSS", d.loss),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Default env_logger filter when `RUST_LOG` is unset.
    pub log_level: String,
    /// Scoring used for tournaments created without explicit point values.
    pub scoring: ScoringRules,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            log_level: "info".to_string(),
            scoring: ScoringRules::default(),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let d = Self::default();
        Self {
            host: env::var("HOST").unwrap_or(d.host),
            port: env_or("PORT", d.port),
            log_level: env::var("LOG_LEVEL").unwrap_or(d.log_level),
            scoring: ScoringRules::from_env(),
        }
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
