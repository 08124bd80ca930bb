// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Payload sinks.
//!
//! A sink stands in for the uplink transport. Like the modem driver, every
//! sink refuses a payload larger than its ceiling before taking it.

use boxtel::CompressedPayload;
use std::fmt::Write as _;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Sink errors.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid payload size: {size} bytes (max {max})")]
    InvalidSize { size: usize, max: usize },
}

/// Destination for compressed payloads.
pub trait PayloadSink {
    /// Take ownership of one payload.
    fn send(&mut self, payload: CompressedPayload) -> Result<(), SinkError>;

    /// Flush buffered output.
    fn flush(&mut self) -> Result<(), SinkError> {
        Ok(())
    }
}

fn check_size(payload: &CompressedPayload, max: usize) -> Result<(), SinkError> {
    if payload.is_empty() || payload.len() > max {
        return Err(SinkError::InvalidSize {
            size: payload.len(),
            max,
        });
    }
    Ok(())
}

/// Keeps every payload in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    max: usize,
    payloads: Vec<Vec<u8>>,
}

impl MemorySink {
    pub fn new(max: usize) -> Self {
        Self {
            max,
            payloads: Vec::new(),
        }
    }

    /// Payloads received so far, oldest first.
    pub fn payloads(&self) -> &[Vec<u8>] {
        &self.payloads
    }

    pub fn len(&self) -> usize {
        self.payloads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payloads.is_empty()
    }

    /// Total bytes received.
    pub fn total_bytes(&self) -> usize {
        self.payloads.iter().map(Vec::len).sum()
    }
}

impl PayloadSink for MemorySink {
    fn send(&mut self, payload: CompressedPayload) -> Result<(), SinkError> {
        check_size(&payload, self.max)?;
        self.payloads.push(payload.into_inner());
        Ok(())
    }
}

/// Appends one lowercase hex line per payload to a file.
pub struct HexFileSink {
    path: PathBuf,
    writer: BufWriter<File>,
    max: usize,
    count: u64,
    line: String,
}

impl HexFileSink {
    /// Open `path` for appending, creating it if needed.
    pub fn create<P: AsRef<Path>>(path: P, max: usize) -> Result<Self, SinkError> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        tracing::debug!("Writing payloads to {}", path.display());
        Ok(Self {
            path,
            writer: BufWriter::new(file),
            max,
            count: 0,
            line: String::new(),
        })
    }

    /// Output path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Payloads written.
    pub fn count(&self) -> u64 {
        self.count
    }
}

impl PayloadSink for HexFileSink {
    fn send(&mut self, payload: CompressedPayload) -> Result<(), SinkError> {
        check_size(&payload, self.max)?;
        self.line.clear();
        for byte in payload.as_bytes() {
            let _ = write!(self.line, "{:02x}", byte);
        }
        self.line.push('\n');
        self.writer.write_all(self.line.as_bytes())?;
        self.count += 1;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), SinkError> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Counts and drops payloads.
#[derive(Debug, Default)]
pub struct NullSink {
    max: usize,
    count: u64,
    bytes: u64,
}

impl NullSink {
    pub fn new(max: usize) -> Self {
        Self {
            max,
            count: 0,
            bytes: 0,
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn bytes(&self) -> u64 {
        self.bytes
    }
}

impl PayloadSink for NullSink {
    fn send(&mut self, payload: CompressedPayload) -> Result<(), SinkError> {
        check_size(&payload, self.max)?;
        self.count += 1;
        self.bytes += payload.len() as u64;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use boxtel::{compress, encode, TelemetryRecord};

    fn payload() -> CompressedPayload {
        let record = TelemetryRecord {
            device_id: "393600504801".into(),
            asset_id: "LMCU0000001".into(),
            timestamp: "261018 143005.2".into(),
            cell_location: "999-01-1-31D41".into(),
            door_state: "O".into(),
            ..Default::default()
        };
        compress(&encode(&record).expect("encode"), 158).expect("compress")
    }

    #[test]
    fn test_memory_sink_collects() {
        let mut sink = MemorySink::new(158);
        sink.send(payload()).expect("send");
        sink.send(payload()).expect("send");
        assert_eq!(sink.len(), 2);
        assert_eq!(sink.payloads()[0], sink.payloads()[1]);
        assert_eq!(sink.total_bytes(), 2 * sink.payloads()[0].len());
    }

    #[test]
    fn test_sink_rejects_oversized_payload() {
        let p = payload();
        let size = p.len();
        let mut sink = MemorySink::new(size - 1);
        match sink.send(p) {
            Err(SinkError::InvalidSize { size: s, max }) => {
                assert_eq!(s, size);
                assert_eq!(max, size - 1);
            }
            other => panic!("expected InvalidSize, got {:?}", other),
        }
        assert!(sink.is_empty());
    }

    #[test]
    fn test_null_sink_counts() {
        let mut sink = NullSink::new(158);
        let p = payload();
        let len = p.len() as u64;
        sink.send(p).expect("send");
        assert_eq!(sink.count(), 1);
        assert_eq!(sink.bytes(), len);
    }

    #[test]
    fn test_hex_file_sink_writes_lines() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("payloads.hex");
        let p = payload();
        let expected: String = p.as_bytes().iter().map(|b| format!("{:02x}", b)).collect();

        let mut sink = HexFileSink::create(&path, 158).expect("create");
        sink.send(p.clone()).expect("send");
        sink.send(p).expect("send");
        sink.flush().expect("flush");
        assert_eq!(sink.count(), 2);

        let content = std::fs::read_to_string(&path).expect("read");
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines, vec![expected.as_str(), expected.as_str()]);
        assert!(lines[0].starts_with("78da"));
    }
}
