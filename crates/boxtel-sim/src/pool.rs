// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Pre-generated payload pool for uplink load tests.
//!
//! Payloads are produced up front so a load run measures the transport,
//! not the codec. A payload is admitted only if it is strictly below the
//! ceiling, leaving at least one byte of margin.

use crate::source::RecordSource;
use boxtel::{encode, BoundedCompressor, CodecError, CompressedPayload};
use std::time::{Duration, Instant};
use thiserror::Error;

/// Attempts allowed per requested payload before giving up.
const ATTEMPTS_PER_PAYLOAD: usize = 10;

/// Pool errors.
#[derive(Debug, Error)]
pub enum PoolError {
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    #[error("Source exhausted: {generated} payloads after {attempts} attempts")]
    Exhausted { generated: usize, attempts: usize },
}

/// Generation summary.
#[derive(Debug, Clone, Default)]
pub struct PoolSummary {
    /// Payloads admitted.
    pub generated: usize,

    /// Records rejected for size.
    pub rejected: usize,

    /// Mean payload size (bytes).
    pub avg_size: f64,

    /// Smallest payload (bytes).
    pub min_size: usize,

    /// Largest payload (bytes).
    pub max_size: usize,

    /// Generation time.
    pub elapsed: Duration,
}

impl PoolSummary {
    /// Payloads generated per second.
    pub fn rate(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.generated as f64 / secs
        } else {
            0.0
        }
    }

    /// Approximate payload memory held by the pool.
    pub fn memory_bytes(&self) -> f64 {
        self.generated as f64 * self.avg_size
    }
}

/// Pool of ready-to-send payloads.
#[derive(Debug, Clone)]
pub struct PayloadPool {
    payloads: Vec<CompressedPayload>,
    summary: PoolSummary,
}

impl PayloadPool {
    /// Generate `size` payloads from `source`.
    pub fn generate<S: RecordSource + ?Sized>(
        source: &mut S,
        compressor: &BoundedCompressor,
        size: usize,
    ) -> Result<Self, PoolError> {
        let max_attempts = size.saturating_mul(ATTEMPTS_PER_PAYLOAD).max(1);
        Self::generate_with_limit(source, compressor, size, max_attempts)
    }

    /// Generate `size` payloads, pulling at most `max_attempts` records.
    pub fn generate_with_limit<S: RecordSource + ?Sized>(
        source: &mut S,
        compressor: &BoundedCompressor,
        size: usize,
        max_attempts: usize,
    ) -> Result<Self, PoolError> {
        let start = Instant::now();
        let max = compressor.max_output_bytes();
        let mut payloads = Vec::with_capacity(size);
        let mut rejected = 0usize;
        let mut attempts = 0usize;

        tracing::info!("Generating {} payloads (ceiling {} bytes)", size, max);

        while payloads.len() < size {
            if attempts >= max_attempts {
                return Err(PoolError::Exhausted {
                    generated: payloads.len(),
                    attempts,
                });
            }
            attempts += 1;

            let record = source.next_record();
            let outcome = encode(&record).and_then(|packed| compressor.compress(&packed));
            let payload = match outcome {
                Ok(payload) if payload.len() < max => payload,
                Ok(payload) => {
                    reject(&mut rejected, max);
                    tracing::debug!("Payload for {} is {} bytes", record.asset_id, payload.len());
                    continue;
                }
                Err(err) if err.is_size_rejection() => {
                    reject(&mut rejected, max);
                    tracing::debug!("Record {} rejected: {}", record.asset_id, err);
                    continue;
                }
                Err(err) => return Err(err.into()),
            };
            payloads.push(payload);

            if payloads.len() % 1000 == 0 {
                tracing::debug!("Generated {}/{} payloads", payloads.len(), size);
            }
        }

        let summary = summarize(&payloads, rejected, start.elapsed());
        tracing::info!(
            "Generated {} payloads in {:.1}s ({:.0}/s), {} rejected, avg {:.1} bytes",
            summary.generated,
            summary.elapsed.as_secs_f64(),
            summary.rate(),
            summary.rejected,
            summary.avg_size
        );
        Ok(Self { payloads, summary })
    }

    /// Generation summary.
    pub fn summary(&self) -> &PoolSummary {
        &self.summary
    }

    pub fn payloads(&self) -> &[CompressedPayload] {
        &self.payloads
    }

    pub fn len(&self) -> usize {
        self.payloads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payloads.is_empty()
    }

    /// Round-robin over the pool, forever. Empty for an empty pool.
    pub fn cycle(&self) -> impl Iterator<Item = &CompressedPayload> + '_ {
        self.payloads.iter().cycle()
    }
}

fn reject(rejected: &mut usize, max: usize) {
    *rejected += 1;
    if *rejected % 100 == 0 {
        tracing::warn!("Rejected {} records so far (ceiling {} bytes)", rejected, max);
    }
}

fn summarize(payloads: &[CompressedPayload], rejected: usize, elapsed: Duration) -> PoolSummary {
    let total: usize = payloads.iter().map(CompressedPayload::len).sum();
    let avg_size = if payloads.is_empty() {
        0.0
    } else {
        total as f64 / payloads.len() as f64
    };
    PoolSummary {
        generated: payloads.len(),
        rejected,
        avg_size,
        min_size: payloads.iter().map(CompressedPayload::len).min().unwrap_or(0),
        max_size: payloads.iter().map(CompressedPayload::len).max().unwrap_or(0),
        elapsed,
    }
}
