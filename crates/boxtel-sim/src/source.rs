// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Record sources.
//!
//! A source hands out one [`TelemetryRecord`] per cycle. Two are provided:
//!
//! - [`SimulatedSource`] - counter-driven readings with the same variation
//!   pattern as the tracker firmware, timestamped by an injected [`Clock`].
//! - [`JsonFileSource`] - replays a JSON array of records, wrapping around.

use boxtel::{DoorState, TelemetryRecord};
use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Source errors.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No records in {0}")]
    Empty(PathBuf),
}

/// Produces one record per cycle.
pub trait RecordSource {
    fn next_record(&mut self) -> TelemetryRecord;
}

impl<S: RecordSource + ?Sized> RecordSource for Box<S> {
    fn next_record(&mut self) -> TelemetryRecord {
        (**self).next_record()
    }
}

/// Wall-clock provider.
pub trait Clock: Send {
    fn now(&self) -> NaiveDateTime;
}

/// Local time of the host.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        chrono::Local::now().naive_local()
    }
}

/// Clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// Format `at` as `DDMMYY HHMMSS.d` (tenths of a second).
pub fn format_timestamp(at: &NaiveDateTime) -> String {
    // chrono reports leap seconds as nanos >= 1e9
    let tenths = (at.nanosecond() % 1_000_000_000) / 100_000_000;
    format!("{}.{}", at.format("%d%m%y %H%M%S"), tenths)
}

/// Values used where the device has no sensor of its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorDefaults {
    /// Fixed device id. `None` derives one from the cycle counter.
    #[serde(default)]
    pub device_id: Option<String>,

    /// Cell location reported without a modem fix.
    #[serde(default = "default_cell_location")]
    pub cell_location: String,

    /// HDOP override for records without a GNSS fix. `None` keeps the
    /// counter-derived value.
    #[serde(default)]
    pub hdop: Option<f32>,
}

fn default_cell_location() -> String {
    "999-01-1-31D41".to_string()
}

impl Default for SensorDefaults {
    fn default() -> Self {
        Self {
            device_id: None,
            cell_location: default_cell_location(),
            hdop: None,
        }
    }
}

/// Deterministic simulated tracker.
///
/// The counter is bumped before each record, so the first record uses
/// counter 1.
pub struct SimulatedSource {
    counter: u32,
    clock: Box<dyn Clock>,
    defaults: SensorDefaults,
}

impl SimulatedSource {
    /// Create a source starting at counter 0.
    pub fn new(clock: impl Clock + 'static, defaults: SensorDefaults) -> Self {
        Self {
            counter: 0,
            clock: Box::new(clock),
            defaults,
        }
    }

    /// Start from a given counter value.
    pub fn with_counter(mut self, counter: u32) -> Self {
        self.counter = counter;
        self
    }

    /// Counter of the last record produced.
    pub fn counter(&self) -> u32 {
        self.counter
    }

    fn reading(&self, c: u32) -> TelemetryRecord {
        let device_id = match &self.defaults.device_id {
            Some(id) => id.clone(),
            None => format!("39360050{:04}", 4800 + c % 200),
        };
        let door = DoorState::ALL[(c % 4) as usize];
        let gnss_fix = (c % 2) as u8;
        let hdop = match self.defaults.hdop {
            Some(hdop) if gnss_fix == 0 => hdop,
            _ => 0.5 + (c % 50) as f32 * 0.1,
        };

        TelemetryRecord {
            device_id,
            asset_id: format!("LMCU{:07}", c),
            timestamp: format_timestamp(&self.clock.now()),
            signal_strength: (15 + c % 21) as u8,
            cell_location: self.defaults.cell_location.clone(),
            ble_marker: (c % 2) as u8,
            battery_pct: (10 + c % 87) as u8,
            accel_x: -993.9 + (c % 20) as f32 * 0.5,
            accel_y: -27.1 + (c % 10) as f32 * 0.3,
            accel_z: -52.0 + (c % 10) as f32 * 0.4,
            temperature: 17.0 + (c % 10) as f32 * 0.5,
            humidity: 71.0 + (c % 20) as f32 - 10.0,
            pressure: 1012.4 + (c % 20) as f32 - 10.0,
            door_state: door.code().to_string(),
            gnss_fix,
            latitude: 31.86 + (c % 50) as f32 * 0.01 - 0.25,
            longitude: 28.74 + (c % 50) as f32 * 0.01 - 0.25,
            altitude: 49.5 + (c % 20) as f32 - 10.0,
            speed: (c % 40) as f32 * 0.5,
            heading: (c % 360) as f32,
            satellite_count: (4 + c % 9) as u8,
            hdop,
        }
    }
}

impl RecordSource for SimulatedSource {
    fn next_record(&mut self) -> TelemetryRecord {
        self.counter = self.counter.wrapping_add(1);
        self.reading(self.counter)
    }
}

/// Replays records from a JSON array file.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    records: Vec<TelemetryRecord>,
    next: usize,
}

impl JsonFileSource {
    /// Load every record from `path`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SourceError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let records: Vec<TelemetryRecord> = serde_json::from_str(&content)?;
        if records.is_empty() {
            return Err(SourceError::Empty(path.to_path_buf()));
        }
        tracing::debug!("Loaded {} records from {}", records.len(), path.display());
        Ok(Self { records, next: 0 })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl RecordSource for JsonFileSource {
    fn next_record(&mut self) -> TelemetryRecord {
        let record = self.records[self.next].clone();
        self.next = (self.next + 1) % self.records.len();
        record
    }
}
