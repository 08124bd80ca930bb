// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! boxtel-sim - Simulate a container tracker uplink.
//!
//! Usage:
//!   boxtel-sim run --cycles 10 --interval-ms 1000 --output payloads.hex
//!   boxtel-sim --config sim.toml run
//!   boxtel-sim pool --size 10000
//!   boxtel-sim report --counter 42

use anyhow::Context;
use boxtel::BoundedCompressor;
use boxtel_sim::{
    CompressionReport, HexFileSink, JsonFileSource, NullSink, PayloadPool, PayloadSink,
    RecordSource, Runner, SimConfig, SimulatedSource, SystemClock,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::atomic::Ordering;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "boxtel-sim")]
#[command(about = "Simulate a container tracker uplink")]
#[command(version)]
struct Args {
    /// Configuration file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Uplink payload ceiling in bytes
    #[arg(long, global = true)]
    max_payload: Option<usize>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Produce records periodically and send the payloads
    Run {
        /// Number of records (0 = until Ctrl+C)
        #[arg(long)]
        cycles: Option<u64>,

        /// Milliseconds between records
        #[arg(long)]
        interval_ms: Option<u64>,

        /// Append payloads as hex lines to this file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Replay records from a JSON array file
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Pre-generate payloads below the ceiling
    Pool {
        /// Number of payloads
        #[arg(long)]
        size: Option<usize>,
    },

    /// Print a compression report for one record
    Report {
        /// Simulated counter value of the record
        #[arg(long, default_value = "1")]
        counter: u32,

        /// Use the first record of a JSON array file instead
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => SimConfig::from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => SimConfig::default(),
    };
    if let Some(level) = &args.log_level {
        config.log_level = level.clone();
    }
    if let Some(max) = args.max_payload {
        config.max_payload_bytes = max;
    }
    config.validate()?;

    // Setup logging
    let filter = config.log_level.parse().unwrap_or(tracing::Level::INFO);
    tracing_subscriber::fmt()
        .with_max_level(filter)
        .with_target(false)
        .init();

    match args.command {
        Command::Run {
            cycles,
            interval_ms,
            output,
            input,
        } => {
            if let Some(cycles) = cycles {
                config.cycles = cycles;
            }
            if let Some(interval_ms) = interval_ms {
                config.interval_ms = interval_ms;
            }
            if output.is_some() {
                config.output = output;
            }
            run(&config, input)
        }
        Command::Pool { size } => {
            if let Some(size) = size {
                config.pool_size = size;
            }
            pool(&config)
        }
        Command::Report { counter, input } => report(&config, counter, input),
    }
}

fn run(config: &SimConfig, input: Option<PathBuf>) -> anyhow::Result<()> {
    let source: Box<dyn RecordSource + Send> = match &input {
        Some(path) => Box::new(JsonFileSource::load(path)?),
        None => Box::new(SimulatedSource::new(SystemClock, config.defaults.clone())),
    };

    let max = config.max_payload_bytes;
    let mut sink: Box<dyn PayloadSink> = match &config.output {
        Some(path) => Box::new(HexFileSink::create(path, max)?),
        None => Box::new(NullSink::new(max)),
    };

    let runner = Runner::new(config.runner_config());
    let running = runner.running_flag();
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })?;

    info!("boxtel-sim v{}", env!("CARGO_PKG_VERSION"));
    info!("Ceiling: {} bytes", max);
    info!("Interval: {} ms", config.interval_ms);
    if let Some(path) = &input {
        info!("Input: {}", path.display());
    }
    if let Some(path) = &config.output {
        info!("Output: {}", path.display());
    }
    info!("Running. Press Ctrl+C to stop.");

    let stats = runner.run(source, sink.as_mut())?;

    info!("Stopped");
    info!("  Records:     {}", stats.produced);
    info!("  Sent:        {}", stats.sent);
    info!("  Too large:   {}", stats.too_large);
    info!("  Sink errors: {}", stats.sink_errors);
    info!("  Ratio:       {:.2}x", stats.ratio());
    info!("  Duration:    {:.1}s", stats.duration_secs);
    Ok(())
}

fn pool(config: &SimConfig) -> anyhow::Result<()> {
    let compressor = BoundedCompressor::new(config.compress_config())?;
    let mut source = SimulatedSource::new(SystemClock, config.defaults.clone());
    let pool = PayloadPool::generate(&mut source, &compressor, config.pool_size)?;

    let summary = pool.summary();
    info!("Pool ready");
    info!("  Generated: {}", summary.generated);
    info!("  Rejected:  {}", summary.rejected);
    info!(
        "  Size:      avg {:.1}, min {}, max {} bytes",
        summary.avg_size, summary.min_size, summary.max_size
    );
    info!("  Rate:      {:.0} payloads/s", summary.rate());
    info!(
        "  Memory:    ~{:.1} KB",
        summary.memory_bytes() / 1024.0
    );
    Ok(())
}

fn report(config: &SimConfig, counter: u32, input: Option<PathBuf>) -> anyhow::Result<()> {
    let record = match &input {
        Some(path) => JsonFileSource::load(path)?.next_record(),
        None => SimulatedSource::new(SystemClock, config.defaults.clone())
            .with_counter(counter.wrapping_sub(1))
            .next_record(),
    };

    let report = CompressionReport::measure(&record, config.max_payload_bytes)?;
    print!("{}", report);
    Ok(())
}
