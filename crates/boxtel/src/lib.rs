// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! boxtel - container telemetry codec.
//!
//! Packs a fixed-schema [`TelemetryRecord`] into a deterministic big-endian
//! layout, then zlib-compresses it under a hard payload ceiling sized for a
//! single low-bandwidth radio/satellite message.
//!
//! # Quick Start
//!
//! ```ignore
//! use boxtel::{encode, BoundedCompressor, CompressConfig};
//!
//! let compressor = BoundedCompressor::new(CompressConfig::new(158))?;
//! let packed = encode(&record)?;
//! let payload = compressor.compress(&packed)?;
//! transport.send(payload.into_inner());
//! ```
//!
//! # Wire Contract
//!
//! | Kind | Packed form |
//! |------|-------------|
//! | string | u16 BE length, raw bytes, no terminator |
//! | u8 | 1 byte |
//! | f32 | IEEE-754 single, BE |
//!
//! Fields are concatenated in [`schema::SCHEMA`] order with no padding.
//! The payload is one zlib stream over the whole packed record.
//!
//! # Modules
//!
//! - `record` - the record and door codes
//! - `schema` - ordered field descriptors and layout
//! - `encoder` - exact-size packing
//! - `compress` - bounded zlib compression
//! - `cycle` - per-record state machine and pipeline

pub mod compress;
pub mod cycle;
pub mod encoder;
pub mod error;
pub mod record;
pub mod schema;

pub use compress::{
    compress, compress_bound, BoundedCompressor, CompressConfig, CompressStats,
    CompressedPayload, PayloadCompressor, DEFAULT_MAX_PAYLOAD,
};
pub use cycle::{Cycle, CycleOutcome, CycleState, Pipeline};
pub use encoder::{encode, packed_len, PackedBuffer};
pub use error::{CodecError, Result, SizeStage};
pub use record::{DoorState, TelemetryRecord, TIMESTAMP_FORMAT_LEN};
pub use schema::{layout, FieldDescriptor, FieldKind, FieldSpan, FieldValue, SCHEMA};
