// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Size-bounded compression for a single transport payload.
//!
//! The whole packed record is compressed as one zlib stream (RFC 1950:
//! 2-byte header, deflate body, Adler-32 trailer) at maximum effort.
//!
//! # Ceiling enforcement
//!
//! - **Bound check**: the worst-case zlib size of the input
//!   ([`compress_bound`]) is compared to the ceiling first. If it does not
//!   fit, the engine is never run.
//! - **Output check**: the actual output is compared again before it is
//!   returned.
//!
//! A failed call returns no bytes at all.

use crate::encoder::PackedBuffer;
use crate::error::{CodecError, Result, SizeStage};
use flate2::write::ZlibEncoder;
use flate2::Compression;
use std::io::Write;

/// Payload ceiling of the satellite uplink the layout was sized for.
pub const DEFAULT_MAX_PAYLOAD: usize = 158;

/// Worst-case zlib output size for `len` input bytes.
///
/// Same formula as zlib's `compressBound()`.
pub const fn compress_bound(len: usize) -> usize {
    len + (len >> 12) + (len >> 14) + (len >> 25) + 13
}

/// Compressor configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressConfig {
    /// Hard payload ceiling of the transport, in bytes.
    pub max_output_bytes: usize,
}

impl Default for CompressConfig {
    fn default() -> Self {
        Self {
            max_output_bytes: DEFAULT_MAX_PAYLOAD,
        }
    }
}

impl CompressConfig {
    /// Create a config for the given ceiling.
    pub fn new(max_output_bytes: usize) -> Self {
        Self { max_output_bytes }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.max_output_bytes == 0 {
            return Err(CodecError::InvalidConfig(
                "max_output_bytes must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    /// Largest packed input whose bound still fits the ceiling.
    pub fn max_packed_len(&self) -> usize {
        let mut len = self.max_output_bytes.saturating_sub(13);
        while len > 0 && compress_bound(len) > self.max_output_bytes {
            len -= 1;
        }
        len
    }
}

/// Final payload handed to the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressedPayload {
    bytes: Vec<u8>,
    input_len: usize,
}

impl CompressedPayload {
    /// Payload bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Size of the packed buffer this payload was produced from.
    pub fn input_len(&self) -> usize {
        self.input_len
    }

    /// Achieved ratio, `input_len / output_len`. Informational only.
    pub fn ratio(&self) -> f64 {
        if self.bytes.is_empty() {
            return 0.0;
        }
        self.input_len as f64 / self.bytes.len() as f64
    }

    /// Bytes left under `max`.
    pub fn space_remaining(&self, max: usize) -> usize {
        max.saturating_sub(self.bytes.len())
    }

    /// Hand the bytes over to the transport.
    pub fn into_inner(self) -> Vec<u8> {
        self.bytes
    }
}

impl AsRef<[u8]> for CompressedPayload {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

/// Compression statistics, kept by whoever owns the cycle loop.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompressStats {
    /// Payloads produced.
    pub compressed_count: u64,
    /// Records rejected for size (field or payload).
    pub too_large_count: u64,
    /// Engine failures.
    pub engine_errors: u64,
    /// Packed bytes of produced payloads.
    pub bytes_in: u64,
    /// Compressed bytes of produced payloads.
    pub bytes_out: u64,
}

impl CompressStats {
    /// Record a produced payload.
    pub fn record(&mut self, payload: &CompressedPayload) {
        self.compressed_count += 1;
        self.bytes_in += payload.input_len() as u64;
        self.bytes_out += payload.len() as u64;
    }

    /// Overall ratio, `bytes_in / bytes_out` (0.0 before any payload).
    pub fn ratio(&self) -> f64 {
        if self.bytes_out == 0 {
            0.0
        } else {
            self.bytes_in as f64 / self.bytes_out as f64
        }
    }

    /// Bytes saved by compression.
    pub fn bytes_saved(&self) -> u64 {
        self.bytes_in.saturating_sub(self.bytes_out)
    }
}

/// Compressor enforcing a payload ceiling.
///
/// Holds only its configuration, so one instance can be shared across
/// threads.
#[derive(Debug, Clone)]
pub struct BoundedCompressor {
    config: CompressConfig,
}

impl BoundedCompressor {
    /// Create a compressor, validating the configuration.
    pub fn new(config: CompressConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Create a compressor with the default 158-byte ceiling.
    pub fn with_defaults() -> Self {
        Self {
            config: CompressConfig::default(),
        }
    }

    /// Compress `packed`, failing if the result cannot fit the ceiling.
    pub fn compress(&self, packed: &PackedBuffer) -> Result<CompressedPayload> {
        compress_bytes(packed.as_bytes(), self.config.max_output_bytes)
    }

    /// Get the configuration.
    pub fn config(&self) -> &CompressConfig {
        &self.config
    }

    /// Payload ceiling in bytes.
    pub fn max_output_bytes(&self) -> usize {
        self.config.max_output_bytes
    }
}

/// Turns a packed record into an uplink payload.
pub trait PayloadCompressor {
    fn compress(&self, packed: &PackedBuffer) -> Result<CompressedPayload>;
}

impl PayloadCompressor for BoundedCompressor {
    fn compress(&self, packed: &PackedBuffer) -> Result<CompressedPayload> {
        BoundedCompressor::compress(self, packed)
    }
}

/// Compress `packed` against an explicit ceiling.
pub fn compress(packed: &PackedBuffer, max_output_bytes: usize) -> Result<CompressedPayload> {
    compress_bytes(packed.as_bytes(), max_output_bytes)
}

fn compress_bytes(input: &[u8], max: usize) -> Result<CompressedPayload> {
    let bound = compress_bound(input.len());
    if bound > max {
        return Err(CodecError::PayloadTooLarge {
            size: bound,
            max,
            stage: SizeStage::Bound,
        });
    }

    let mut encoder = ZlibEncoder::new(Vec::with_capacity(bound), Compression::best());
    encoder.write_all(input)?;
    let bytes = encoder.finish()?;

    if bytes.len() > max {
        return Err(CodecError::PayloadTooLarge {
            size: bytes.len(),
            max,
            stage: SizeStage::Compressed,
        });
    }

    let payload = CompressedPayload {
        bytes,
        input_len: input.len(),
    };
    log::debug!(
        "compression: {} -> {} bytes ({:.1}x)",
        payload.input_len,
        payload.len(),
        payload.ratio()
    );
    Ok(payload)
}
