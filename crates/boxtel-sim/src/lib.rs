// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! boxtel Simulator
//!
//! Drives the boxtel codec the way a deployed tracker would, and measures
//! it the way the uplink load tests do:
//! - `run` - periodic records, encoded and compressed, handed to a sink
//! - `pool` - pre-generate payloads below the ceiling for load tests
//! - `report` - one record's JSON, packed and compressed sizes
//!
//! # Quick Start
//!
//! ```bash
//! # Ten records, one per second, written as hex lines
//! boxtel-sim run --cycles 10 --interval-ms 1000 --output payloads.hex
//!
//! # Replay recorded readings
//! boxtel-sim run --input readings.json --cycles 100 --interval-ms 0
//!
//! # Size report for the first simulated record
//! boxtel-sim report --counter 1
//! ```

pub mod config;
pub mod pool;
pub mod report;
pub mod runner;
pub mod sink;
pub mod source;

pub use config::{ConfigError, SimConfig};
pub use pool::{PayloadPool, PoolError, PoolSummary};
pub use report::{CompressionReport, ReportError};
pub use runner::{RunStats, Runner, RunnerConfig, RunnerError};
pub use sink::{HexFileSink, MemorySink, NullSink, PayloadSink, SinkError};
pub use source::{
    format_timestamp, Clock, FixedClock, JsonFileSource, RecordSource, SensorDefaults,
    SimulatedSource, SourceError, SystemClock,
};
