// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Simulator configuration.
//!
//! Loaded from a TOML file; every key is optional:
//!
//! ```toml
//! max_payload_bytes = 158
//! interval_ms = 30000
//! cycles = 0
//! queue_depth = 8
//! pool_size = 10000
//! log_level = "info"
//! output = "payloads.hex"
//!
//! [defaults]
//! cell_location = "999-01-1-31D41"
//! # hdop = 99.0  (override without a GNSS fix)
//! ```

use crate::runner::RunnerConfig;
use crate::source::SensorDefaults;
use boxtel::{CompressConfig, DEFAULT_MAX_PAYLOAD};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Simulator configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Uplink payload ceiling (bytes).
    #[serde(default = "default_max_payload")]
    pub max_payload_bytes: usize,

    /// Time between records (milliseconds).
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    /// Records to produce (0 = until stopped).
    #[serde(default)]
    pub cycles: u64,

    /// Records buffered between producer and encoder.
    #[serde(default = "default_queue_depth")]
    pub queue_depth: usize,

    /// Payloads pre-generated by `pool`.
    #[serde(default = "default_pool_size")]
    pub pool_size: usize,

    /// Log level.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Sensor defaults for simulated records.
    #[serde(default)]
    pub defaults: SensorDefaults,

    /// Hex payload output file (None = discard).
    #[serde(default)]
    pub output: Option<PathBuf>,
}

fn default_max_payload() -> usize {
    DEFAULT_MAX_PAYLOAD
}

fn default_interval_ms() -> u64 {
    30_000
}

fn default_queue_depth() -> usize {
    8
}

fn default_pool_size() -> usize {
    10_000
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            max_payload_bytes: default_max_payload(),
            interval_ms: default_interval_ms(),
            cycles: 0,
            queue_depth: default_queue_depth(),
            pool_size: default_pool_size(),
            log_level: default_log_level(),
            defaults: SensorDefaults::default(),
            output: None,
        }
    }
}

impl SimConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_payload_bytes == 0 {
            return Err(ConfigError::Invalid(
                "max_payload_bytes must be greater than zero".into(),
            ));
        }
        if self.queue_depth == 0 {
            return Err(ConfigError::Invalid(
                "queue_depth must be greater than zero".into(),
            ));
        }
        if self.log_level.parse::<tracing::Level>().is_err() {
            return Err(ConfigError::Invalid(format!(
                "Unknown log level '{}'",
                self.log_level
            )));
        }
        if self.defaults.cell_location.len() > usize::from(u16::MAX) {
            return Err(ConfigError::Invalid(
                "defaults.cell_location does not fit a length prefix".into(),
            ));
        }
        if let Some(id) = &self.defaults.device_id {
            if id.len() > usize::from(u16::MAX) {
                return Err(ConfigError::Invalid(
                    "defaults.device_id does not fit a length prefix".into(),
                ));
            }
        }
        Ok(())
    }

    /// Compressor settings.
    pub fn compress_config(&self) -> CompressConfig {
        CompressConfig::new(self.max_payload_bytes)
    }

    /// Runner settings.
    pub fn runner_config(&self) -> RunnerConfig {
        RunnerConfig::new(self.compress_config())
            .interval(Duration::from_millis(self.interval_ms))
            .cycles(self.cycles)
            .queue_depth(self.queue_depth)
    }
}
