// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Single-record compression report.
//!
//! Compares the record's JSON size, its packed size and its compressed
//! size, and checks the result against the uplink ceiling. The payload is
//! measured even when it would not fit, so an oversized record still gets
//! a FAIL line instead of an error.
//!
//! The JSON size is that of the typed record (numbers as JSON numbers),
//! compact. A gateway that forwards every value as a JSON string produces
//! a larger document, so "ratio vs JSON" here is a lower bound for that
//! format.

use boxtel::{compress, compress_bound, encode, layout, CodecError, FieldSpan, TelemetryRecord};
use std::fmt;
use thiserror::Error;

/// Report errors.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Sizes of one record through each stage.
#[derive(Debug, Clone)]
pub struct CompressionReport {
    /// Asset the record belongs to.
    pub asset_id: String,

    /// Compact JSON encoding of the typed record (bytes).
    pub json_len: usize,

    /// Packed record (bytes).
    pub packed_len: usize,

    /// zlib payload (bytes).
    pub compressed_len: usize,

    /// Uplink ceiling (bytes).
    pub max: usize,

    /// Field offsets within the packed record.
    pub fields: Vec<FieldSpan>,
}

impl CompressionReport {
    /// Measure `record` against a `max`-byte ceiling.
    pub fn measure(record: &TelemetryRecord, max: usize) -> Result<Self, ReportError> {
        let json_len = serde_json::to_vec(record)?.len();
        let packed = encode(record)?;
        let payload = compress(&packed, compress_bound(packed.len()))?;

        Ok(Self {
            asset_id: record.asset_id.clone(),
            json_len,
            packed_len: packed.len(),
            compressed_len: payload.len(),
            max,
            fields: layout(record)?,
        })
    }

    /// JSON size over compressed size.
    pub fn ratio_vs_json(&self) -> f64 {
        ratio(self.json_len, self.compressed_len)
    }

    /// Packed size over compressed size.
    pub fn ratio_vs_packed(&self) -> f64 {
        ratio(self.packed_len, self.compressed_len)
    }

    /// Bytes left under the ceiling (negative when over).
    pub fn space_remaining(&self) -> i64 {
        self.max as i64 - self.compressed_len as i64
    }

    /// Whether the payload is strictly below the ceiling.
    pub fn passes(&self) -> bool {
        self.compressed_len < self.max
    }
}

fn ratio(from: usize, to: usize) -> f64 {
    if to == 0 {
        0.0
    } else {
        from as f64 / to as f64
    }
}

impl fmt::Display for CompressionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Compression report for {}", self.asset_id)?;
        writeln!(f, "  JSON size:        {} bytes", self.json_len)?;
        writeln!(f, "  Packed size:      {} bytes", self.packed_len)?;
        writeln!(f, "  Compressed size:  {} bytes", self.compressed_len)?;
        writeln!(f, "  Ratio vs JSON:    {:.2}x", self.ratio_vs_json())?;
        writeln!(f, "  Ratio vs packed:  {:.2}x", self.ratio_vs_packed())?;
        writeln!(
            f,
            "  Size check:       {} (<{} bytes)",
            if self.passes() { "PASS" } else { "FAIL" },
            self.max
        )?;
        writeln!(f, "  Space remaining:  {} bytes", self.space_remaining())?;
        writeln!(f, "  Layout:")?;
        for span in &self.fields {
            writeln!(
                f,
                "    {:>3} +{:<3} {:?} {}",
                span.offset, span.len, span.kind, span.name
            )?;
        }
        Ok(())
    }
}
