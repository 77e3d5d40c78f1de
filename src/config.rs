//! # Server Configuration
//!
//! Settings for the HTTP host, read from an optional YAML file and then
//! overridden by environment variables.
//!
//! ```yaml
//! bind: 0.0.0.0:8080
//! workers: 8
//! fallback_status: 404
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Field |
//! |---|---|
//! | `SEGR_BIND` | `bind` |
//! | `SEGR_WORKERS` | `workers` |
//! | `SEGR_FALLBACK_STATUS` | `fallback_status` |
//!
//! Missing keys take their defaults; unknown keys are rejected.

use anyhow::{bail, Context, Result};
use http::StatusCode;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

pub const ENV_BIND: &str = "SEGR_BIND";
pub const ENV_WORKERS: &str = "SEGR_WORKERS";
pub const ENV_FALLBACK_STATUS: &str = "SEGR_FALLBACK_STATUS";

/// HTTP host configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Socket address to listen on
    pub bind: String,
    /// Worker threads pulling requests
    pub workers: usize,
    /// Status returned when no handler writes a response
    pub fallback_status: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8080".to_string(),
            workers: 4,
            fallback_status: 404,
        }
    }
}

impl ServerConfig {
    /// Read a YAML config file. Does not apply environment overrides.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or is not a valid config document.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_yaml(&text).with_context(|| format!("invalid config file {}", path.display()))
    }

    /// Parse a YAML document. An empty document yields the defaults.
    ///
    /// # Errors
    ///
    /// Fails on malformed YAML, wrong value types or unknown keys.
    pub fn from_yaml(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text).context("failed to parse YAML config")
    }

    /// Apply `SEGR_*` overrides from the process environment.
    ///
    /// # Errors
    ///
    /// Fails if a numeric variable does not parse.
    pub fn apply_env(self) -> Result<Self> {
        self.apply_overrides(|key| env::var(key).ok())
    }

    /// Apply overrides from an arbitrary lookup (the environment in
    /// production, a map in tests).
    ///
    /// # Errors
    ///
    /// Fails if a numeric value does not parse.
    pub fn apply_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(bind) = lookup(ENV_BIND) {
            self.bind = bind;
        }
        if let Some(workers) = lookup(ENV_WORKERS) {
            self.workers = workers
                .trim()
                .parse()
                .with_context(|| format!("{ENV_WORKERS}={workers:?} is not a number"))?;
        }
        if let Some(status) = lookup(ENV_FALLBACK_STATUS) {
            self.fallback_status = status
                .trim()
                .parse()
                .with_context(|| format!("{ENV_FALLBACK_STATUS}={status:?} is not a number"))?;
        }
        Ok(self)
    }

    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// Fails when `workers` is zero, `bind` is empty or the fallback status is
    /// not a valid HTTP status code.
    pub fn validate(&self) -> Result<()> {
        if self.bind.trim().is_empty() {
            bail!("bind address must not be empty");
        }
        if self.workers == 0 {
            bail!("workers must be at least 1");
        }
        self.fallback()?;
        Ok(())
    }

    /// The fallback status as a typed status code.
    ///
    /// # Errors
    ///
    /// Fails when the value is outside 100..=599.
    pub fn fallback(&self) -> Result<StatusCode> {
        if !(100..=599).contains(&self.fallback_status) {
            bail!("invalid fallback_status {}", self.fallback_status);
        }
        StatusCode::from_u16(self.fallback_status)
            .with_context(|| format!("invalid fallback_status {}", self.fallback_status))
    }
}
