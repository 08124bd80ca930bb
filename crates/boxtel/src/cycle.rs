// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Encode-compress cycle.
//!
//! One cycle takes one record from `Idle` to a terminal state:
//!
//! ```text
//! Idle -> Encoding -> Encoded -> Compressing -> Done
//!            |                        |-------> TooLarge
//!            |                        '-------> EngineError
//!            '--> TooLarge (field does not fit its prefix)
//! ```
//!
//! A cycle is consumed by [`Cycle::run`]; the next record always starts a
//! fresh cycle.

use crate::compress::{
    BoundedCompressor, CompressConfig, CompressStats, CompressedPayload, PayloadCompressor,
};
use crate::encoder::encode;
use crate::error::{CodecError, Result};
use crate::record::TelemetryRecord;

/// Cycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleState {
    Idle,
    Encoding,
    Encoded,
    Compressing,
    /// Payload produced.
    Done,
    /// Record does not fit the wire (field or payload ceiling).
    TooLarge,
    /// Compression engine failed.
    EngineError,
}

impl CycleState {
    /// Whether the cycle has ended.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::TooLarge | Self::EngineError)
    }

    fn for_error(err: &CodecError) -> Self {
        if err.is_fatal_for_cycle() {
            Self::EngineError
        } else {
            Self::TooLarge
        }
    }
}

/// Result of one cycle.
#[derive(Debug)]
pub struct CycleOutcome {
    /// Terminal state reached.
    pub state: CycleState,
    /// Packed size, if encoding succeeded.
    pub packed_len: Option<usize>,
    /// Payload or the error that ended the cycle.
    pub result: Result<CompressedPayload>,
}

impl CycleOutcome {
    /// Take the payload, or the error that ended the cycle.
    pub fn into_payload(self) -> Result<CompressedPayload> {
        self.result
    }

    pub fn is_done(&self) -> bool {
        self.state == CycleState::Done
    }
}

/// One-shot encode-compress state machine.
#[derive(Debug)]
pub struct Cycle<'c, C = BoundedCompressor> {
    compressor: &'c C,
    state: CycleState,
}

impl<'c, C: PayloadCompressor> Cycle<'c, C> {
    /// Start a cycle in `Idle`.
    pub fn new(compressor: &'c C) -> Self {
        Self {
            compressor,
            state: CycleState::Idle,
        }
    }

    /// Current state.
    pub fn state(&self) -> CycleState {
        self.state
    }

    /// Run the cycle to a terminal state.
    pub fn run(mut self, record: &TelemetryRecord) -> CycleOutcome {
        self.transition(CycleState::Encoding);
        let packed = match encode(record) {
            Ok(packed) => packed,
            Err(err) => return self.finish(None, Err(err)),
        };
        self.transition(CycleState::Encoded);

        let packed_len = packed.len();
        self.transition(CycleState::Compressing);
        let result = self.compressor.compress(&packed);
        // The packed buffer ends here, whatever the outcome.
        drop(packed);
        self.finish(Some(packed_len), result)
    }

    fn transition(&mut self, next: CycleState) {
        log::trace!("cycle {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    fn finish(
        mut self,
        packed_len: Option<usize>,
        result: Result<CompressedPayload>,
    ) -> CycleOutcome {
        let terminal = match &result {
            Ok(_) => CycleState::Done,
            Err(err) => CycleState::for_error(err),
        };
        self.transition(terminal);
        CycleOutcome {
            state: terminal,
            packed_len,
            result,
        }
    }
}

/// Cycle driver that keeps running totals.
///
/// Owned by the calling loop; the compressor itself stays stateless.
#[derive(Debug)]
pub struct Pipeline<C = BoundedCompressor> {
    compressor: C,
    stats: CompressStats,
}

impl Pipeline<BoundedCompressor> {
    /// Create a pipeline for the given ceiling.
    pub fn new(config: CompressConfig) -> Result<Self> {
        Ok(Self {
            compressor: BoundedCompressor::new(config)?,
            stats: CompressStats::default(),
        })
    }

    /// Create a pipeline with the default ceiling.
    pub fn with_defaults() -> Self {
        Self {
            compressor: BoundedCompressor::with_defaults(),
            stats: CompressStats::default(),
        }
    }
}

impl<C: PayloadCompressor> Pipeline<C> {
    /// Create a pipeline around any compressor.
    pub fn with_compressor(compressor: C) -> Self {
        Self {
            compressor,
            stats: CompressStats::default(),
        }
    }

    /// Run one cycle for `record`.
    pub fn process(&mut self, record: &TelemetryRecord) -> Result<CompressedPayload> {
        let outcome = Cycle::new(&self.compressor).run(record);
        match &outcome.result {
            Ok(payload) => self.stats.record(payload),
            Err(err) if err.is_fatal_for_cycle() => {
                self.stats.engine_errors += 1;
                log::error!("cycle abandoned for {}: {}", record.asset_id, err);
            }
            Err(err) => {
                self.stats.too_large_count += 1;
                log::warn!("record {} rejected: {}", record.asset_id, err);
            }
        }
        outcome.into_payload()
    }

    /// Get current statistics.
    pub fn stats(&self) -> &CompressStats {
        &self.stats
    }

    /// Reset statistics.
    pub fn reset_stats(&mut self) {
        self.stats = CompressStats::default();
    }

    /// Get the compressor.
    pub fn compressor(&self) -> &C {
        &self.compressor
    }
}
