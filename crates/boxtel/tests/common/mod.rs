// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Shared fixtures for boxtel integration tests.

#![allow(dead_code)]

use boxtel::TelemetryRecord;
use flate2::read::ZlibDecoder;
use std::io::Read;

/// Parked container with no GNSS fix.
///
/// Packs to 116 bytes (63 fixed + 53 string bytes).
pub fn parked_record() -> TelemetryRecord {
    TelemetryRecord {
        device_id: "393600504920".into(),
        asset_id: "LMCU0000001".into(),
        timestamp: "181026 143000.0".into(),
        signal_strength: 20,
        cell_location: "999-01-1-31D41".into(),
        ble_marker: 0,
        battery_pct: 80,
        accel_x: 0.0,
        accel_y: 0.0,
        accel_z: -1000.0,
        temperature: 18.32,
        humidity: 60.0,
        pressure: 1012.0,
        door_state: "D".into(),
        gnss_fix: 0,
        latitude: 0.0,
        longitude: 0.0,
        altitude: 0.0,
        speed: 0.0,
        heading: 0.0,
        satellite_count: 0,
        hdop: 99.0,
    }
}

fn random_string(rng: &mut fastrand::Rng, max_len: usize) -> String {
    let len = rng.usize(0..=max_len);
    (0..len).map(|_| rng.alphanumeric()).collect()
}

/// Record with random content and short strings.
pub fn random_record(rng: &mut fastrand::Rng) -> TelemetryRecord {
    TelemetryRecord {
        device_id: random_string(rng, 15),
        asset_id: random_string(rng, 11),
        timestamp: random_string(rng, 15),
        signal_strength: rng.u8(..),
        cell_location: random_string(rng, 16),
        ble_marker: rng.u8(0..=1),
        battery_pct: rng.u8(0..=100),
        accel_x: rng.f32() * 2000.0 - 1000.0,
        accel_y: rng.f32() * 2000.0 - 1000.0,
        accel_z: rng.f32() * 2000.0 - 1000.0,
        temperature: rng.f32() * 80.0 - 20.0,
        humidity: rng.f32() * 100.0,
        pressure: 950.0 + rng.f32() * 100.0,
        door_state: random_string(rng, 2),
        gnss_fix: rng.u8(0..=1),
        latitude: rng.f32() * 180.0 - 90.0,
        longitude: rng.f32() * 360.0 - 180.0,
        altitude: rng.f32() * 500.0,
        speed: rng.f32() * 40.0,
        heading: rng.f32() * 360.0,
        satellite_count: rng.u8(..),
        hdop: rng.f32() * 50.0,
    }
}

/// Inflate a zlib payload.
pub fn inflate(bytes: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    ZlibDecoder::new(bytes)
        .read_to_end(&mut out)
        .expect("payload must inflate");
    out
}
