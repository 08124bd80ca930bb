// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error types for the boxtel codec.

use std::fmt;
use std::io;
use thiserror::Error;

/// Result type for codec operations.
pub type Result<T> = std::result::Result<T, CodecError>;

/// Which size check tripped the payload ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeStage {
    /// The worst-case compressed size of the input exceeds the ceiling.
    /// The compression engine was not run.
    Bound,
    /// The actual compressed output exceeds the ceiling.
    Compressed,
}

impl fmt::Display for SizeStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bound => write!(f, "compression bound"),
            Self::Compressed => write!(f, "compressed output"),
        }
    }
}

/// Codec errors.
#[derive(Debug, Error)]
pub enum CodecError {
    /// A string field does not fit its 16-bit length prefix.
    #[error("field `{field}` is {len} bytes, limit is {max}")]
    FieldTooLarge {
        field: &'static str,
        len: usize,
        max: usize,
    },

    /// The payload cannot fit the transport ceiling.
    #[error("payload too large: {stage} is {size} bytes, ceiling is {max}")]
    PayloadTooLarge {
        size: usize,
        max: usize,
        stage: SizeStage,
    },

    /// The compression engine failed unexpectedly.
    #[error("compression engine error: {0}")]
    CompressionEngine(#[from] io::Error),

    /// Invalid codec configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl CodecError {
    /// Whether re-running the same record could succeed.
    ///
    /// Always false: size failures are properties of the record and the
    /// ceiling, and engine failures abandon the cycle. Callers move on to
    /// the next record instead.
    pub fn is_retryable(&self) -> bool {
        false
    }

    /// Whether the error is an unexpected internal failure rather than a
    /// size rejection.
    pub fn is_fatal_for_cycle(&self) -> bool {
        matches!(self, Self::CompressionEngine(_))
    }

    /// Whether the record was rejected for size (field or payload).
    pub fn is_size_rejection(&self) -> bool {
        matches!(
            self,
            Self::FieldTooLarge { .. } | Self::PayloadTooLarge { .. }
        )
    }
}
