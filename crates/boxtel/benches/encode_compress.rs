// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Encode + Compress Benchmark
//!
//! Measures the cost of one telemetry cycle:
//! - Packing alone, by string payload size
//! - zlib compression of a packed record at the uplink ceiling
//! - Full encode + compress cycle

#![allow(clippy::uninlined_format_args)]

use boxtel::{encode, BoundedCompressor, Cycle, TelemetryRecord};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box as bb;

fn record(cell_len: usize) -> TelemetryRecord {
    TelemetryRecord {
        device_id: "393600504920".into(),
        asset_id: "LMCU0000001".into(),
        timestamp: "181026 143000.0".into(),
        signal_strength: 20,
        cell_location: "9".repeat(cell_len),
        ble_marker: 0,
        battery_pct: 80,
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

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_by_cell_len");

    for cell_len in [0, 14, 64, 1024] {
        let rec = record(cell_len);
        let packed_len = encode(&rec).expect("encode").len();
        group.throughput(Throughput::Bytes(packed_len as u64));
        group.bench_with_input(BenchmarkId::from_parameter(cell_len), &rec, |b, rec| {
            b.iter(|| encode(bb(rec)).expect("encode"));
        });
    }

    group.finish();
}

fn bench_compress(c: &mut Criterion) {
    let compressor = BoundedCompressor::with_defaults();
    let packed = encode(&record(14)).expect("encode");

    c.bench_function("compress_uplink_record", |b| {
        b.iter(|| compressor.compress(bb(&packed)).expect("compress"));
    });
}

fn bench_cycle(c: &mut Criterion) {
    let compressor = BoundedCompressor::with_defaults();
    let rec = record(14);

    c.bench_function("cycle_encode_compress", |b| {
        b.iter(|| Cycle::new(&compressor).run(bb(&rec)));
    });
}

criterion_group!(benches, bench_encode, bench_compress, bench_cycle);
criterion_main!(benches);
