// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Container telemetry record.
//!
//! One fully-populated snapshot of a tracked container: identifiers, cell
//! and BLE context, battery, accelerometer, environment, door and GNSS fix.
//! Field declaration order is the wire order (see [`crate::schema::SCHEMA`]).

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Length of a `DDMMYY HHMMSS.d` timestamp.
pub const TIMESTAMP_FORMAT_LEN: usize = 15;

/// Telemetry snapshot for one container.
///
/// Every field is required. Sources substitute their own defaults for
/// sensors that are not fitted (e.g. a sentinel `hdop`).
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TelemetryRecord {
    /// SIM identifier (MSISDN).
    pub device_id: String,
    /// Container identifier (ISO 6346).
    pub asset_id: String,
    /// UTC time, `DDMMYY HHMMSS.d`.
    pub timestamp: String,
    /// Cellular signal strength (RSSI).
    pub signal_strength: u8,
    /// Cell global identity.
    pub cell_location: String,
    /// BLE source node marker.
    pub ble_marker: u8,
    /// Battery state of charge, percent.
    pub battery_pct: u8,
    pub accel_x: f32,
    pub accel_y: f32,
    pub accel_z: f32,
    /// Degrees Celsius.
    pub temperature: f32,
    /// Relative humidity, percent.
    pub humidity: f32,
    /// hPa.
    pub pressure: f32,
    /// Door code, see [`DoorState`].
    pub door_state: String,
    /// 1 when the GNSS receiver has a fix.
    pub gnss_fix: u8,
    /// Decimal degrees.
    pub latitude: f32,
    /// Decimal degrees.
    pub longitude: f32,
    /// Meters.
    pub altitude: f32,
    /// m/s.
    pub speed: f32,
    /// Degrees.
    pub heading: f32,
    pub satellite_count: u8,
    pub hdop: f32,
}

/// Door status codes carried in [`TelemetryRecord::door_state`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DoorState {
    /// Door sensor detached.
    Detached,
    Open,
    Closed,
    Tampered,
}

impl DoorState {
    /// All codes, in the order sources cycle through them.
    pub const ALL: [DoorState; 4] = [
        DoorState::Detached,
        DoorState::Open,
        DoorState::Closed,
        DoorState::Tampered,
    ];

    /// Wire code.
    pub const fn code(self) -> &'static str {
        match self {
            Self::Detached => "D",
            Self::Open => "O",
            Self::Closed => "C",
            Self::Tampered => "T",
        }
    }

    /// Parse a wire code.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "D" => Some(Self::Detached),
            "O" => Some(Self::Open),
            "C" => Some(Self::Closed),
            "T" => Some(Self::Tampered),
            _ => None,
        }
    }
}

impl std::fmt::Display for DoorState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Parked tracker reading shared by the unit tests (packs to 116 bytes).
#[cfg(test)]
pub(crate) fn test_record() -> TelemetryRecord {
    TelemetryRecord {
        device_id: "393600504920".into(),
        asset_id: "LMCU0000001".into(),
        timestamp: "181026 143005.2".into(),
        signal_strength: 16,
        cell_location: "999-01-1-31D41".into(),
        ble_marker: 1,
        battery_pct: 11,
        accel_x: -993.4,
        accel_y: -26.8,
        accel_z: -51.6,
        temperature: 18.32,
        humidity: 62.0,
        pressure: 1012.4,
        door_state: "D".into(),
        gnss_fix: 1,
        latitude: 31.62,
        longitude: 28.5,
        altitude: 40.5,
        speed: 0.5,
        heading: 1.0,
        satellite_count: 5,
        hdop: 0.6,
    }
}
