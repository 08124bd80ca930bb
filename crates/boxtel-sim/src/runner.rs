// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Periodic telemetry loop.
//!
//! ```text
//! [producer thread]                      [calling thread]
//! source.next_record() --bounded queue--> Pipeline::process --> sink.send
//!   every `interval`                       (encode + compress)
//! ```
//!
//! The producer stops after `cycles` records or when the running flag is
//! cleared. The consumer drains whatever is queued, then returns totals.

use crate::sink::{PayloadSink, SinkError};
use crate::source::RecordSource;
use boxtel::{CodecError, CompressConfig, Pipeline, TelemetryRecord};
use crossbeam::channel::{self, Receiver, SendTimeoutError, Sender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use thiserror::Error;

/// How often a blocked producer re-checks the running flag.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Runner errors.
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Sink error: {0}")]
    Sink(#[from] SinkError),

    #[error("Producer thread panicked")]
    ProducerPanicked,
}

/// Runner configuration.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Compressor settings.
    pub compress: CompressConfig,

    /// Time between records.
    pub interval: Duration,

    /// Records to produce (0 = until stopped).
    pub cycles: u64,

    /// Queue capacity between producer and consumer.
    pub queue_depth: usize,
}

impl RunnerConfig {
    /// Create a runner config with defaults.
    pub fn new(compress: CompressConfig) -> Self {
        Self {
            compress,
            interval: Duration::from_secs(30),
            cycles: 0,
            queue_depth: 8,
        }
    }

    /// Set record interval.
    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Set number of records.
    pub fn cycles(mut self, cycles: u64) -> Self {
        self.cycles = cycles;
        self
    }

    /// Set queue depth.
    pub fn queue_depth(mut self, depth: usize) -> Self {
        self.queue_depth = depth.max(1);
        self
    }
}

/// Run statistics.
#[derive(Debug, Clone, Default)]
pub struct RunStats {
    /// Records pulled from the source.
    pub produced: u64,

    /// Payloads accepted by the sink.
    pub sent: u64,

    /// Records rejected for size.
    pub too_large: u64,

    /// Compression engine failures.
    pub engine_errors: u64,

    /// Payloads refused by the sink.
    pub sink_errors: u64,

    /// Packed bytes of compressed records.
    pub bytes_in: u64,

    /// Compressed bytes.
    pub bytes_out: u64,

    /// Wall time of the run in seconds.
    pub duration_secs: f64,
}

impl RunStats {
    /// Overall compression ratio.
    pub fn ratio(&self) -> f64 {
        if self.bytes_out == 0 {
            0.0
        } else {
            self.bytes_in as f64 / self.bytes_out as f64
        }
    }
}

/// Drives a source through the pipeline into a sink.
pub struct Runner {
    config: RunnerConfig,
    running: Arc<AtomicBool>,
}

impl Runner {
    /// Create a new runner.
    pub fn new(config: RunnerConfig) -> Self {
        Self {
            config,
            running: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Flag that keeps the producer going; store `false` to stop.
    pub fn running_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.running)
    }

    /// Get the configuration.
    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Run until `cycles` records are done or the running flag clears.
    pub fn run<S, K>(&self, source: S, sink: &mut K) -> Result<RunStats, RunnerError>
    where
        S: RecordSource + Send + 'static,
        K: PayloadSink + ?Sized,
    {
        let mut pipeline = Pipeline::new(self.config.compress.clone())?;
        let (sender, receiver) = channel::bounded(self.config.queue_depth);

        let running = Arc::clone(&self.running);
        let interval = self.config.interval;
        let cycles = self.config.cycles;
        let producer = thread::Builder::new()
            .name("boxtel-producer".to_string())
            .spawn(move || produce(source, &sender, &running, interval, cycles))?;

        let start = Instant::now();
        let mut stats = consume(&receiver, &mut pipeline, sink);
        sink.flush()?;

        stats.produced = producer.join().map_err(|_| RunnerError::ProducerPanicked)?;
        let codec = pipeline.stats();
        stats.too_large = codec.too_large_count;
        stats.engine_errors = codec.engine_errors;
        stats.bytes_in = codec.bytes_in;
        stats.bytes_out = codec.bytes_out;
        stats.duration_secs = start.elapsed().as_secs_f64();

        tracing::info!(
            "Run finished: {} produced, {} sent, {} too large, {} engine errors, {} sink errors ({:.2}x)",
            stats.produced,
            stats.sent,
            stats.too_large,
            stats.engine_errors,
            stats.sink_errors,
            stats.ratio()
        );
        Ok(stats)
    }
}

fn produce<S: RecordSource>(
    mut source: S,
    sender: &Sender<TelemetryRecord>,
    running: &AtomicBool,
    interval: Duration,
    cycles: u64,
) -> u64 {
    let mut produced = 0u64;
    while running.load(Ordering::SeqCst) && (cycles == 0 || produced < cycles) {
        if produced > 0 && !sleep_while_running(interval, running) {
            break;
        }

        let mut record = source.next_record();
        loop {
            match sender.send_timeout(record, POLL_INTERVAL) {
                Ok(()) => break,
                Err(SendTimeoutError::Timeout(r)) => {
                    if !running.load(Ordering::SeqCst) {
                        return produced;
                    }
                    record = r;
                }
                Err(SendTimeoutError::Disconnected(_)) => return produced,
            }
        }
        produced += 1;
    }
    produced
}

/// Sleep for `total`, returning early (false) if the flag clears.
fn sleep_while_running(total: Duration, running: &AtomicBool) -> bool {
    let deadline = Instant::now() + total;
    loop {
        if !running.load(Ordering::SeqCst) {
            return false;
        }
        let now = Instant::now();
        if now >= deadline {
            return true;
        }
        thread::sleep((deadline - now).min(POLL_INTERVAL));
    }
}

fn consume<K: PayloadSink + ?Sized>(
    receiver: &Receiver<TelemetryRecord>,
    pipeline: &mut Pipeline,
    sink: &mut K,
) -> RunStats {
    let mut stats = RunStats::default();
    for record in receiver.iter() {
        let Ok(payload) = pipeline.process(&record) else {
            // counted and logged by the pipeline
            continue;
        };
        let size = payload.len();
        match sink.send(payload) {
            Ok(()) => {
                stats.sent += 1;
                tracing::debug!("Payload for {} sent ({} bytes)", record.asset_id, size);
            }
            Err(err) => {
                stats.sink_errors += 1;
                tracing::warn!("Sink refused payload for {}: {}", record.asset_id, err);
            }
        }
    }
    stats
}
