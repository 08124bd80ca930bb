// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Record packing.
//!
//! Walks [`SCHEMA`] once to size the output, allocates exactly that many
//! bytes, then walks it again to write. No growth, no copy passes.

use crate::error::Result;
use crate::record::TelemetryRecord;
use crate::schema::{FieldValue, LEN_PREFIX_SIZE, SCHEMA};
use byteorder::{BigEndian, ByteOrder};

/// Packed form of one record.
///
/// Owned and read-only: produced by [`encode`], consumed by the compressor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedBuffer {
    bytes: Box<[u8]>,
}

impl PackedBuffer {
    /// Packed bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Take ownership of the bytes.
    pub fn into_inner(self) -> Box<[u8]> {
        self.bytes
    }
}

impl AsRef<[u8]> for PackedBuffer {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

/// Exact packed size of `record`.
///
/// Fails with `FieldTooLarge` if a string does not fit its length prefix.
pub fn packed_len(record: &TelemetryRecord) -> Result<usize> {
    SCHEMA
        .iter()
        .try_fold(0usize, |acc, desc| Ok(acc + desc.read(record)?.packed_len()))
}

/// Pack `record` into its wire layout.
pub fn encode(record: &TelemetryRecord) -> Result<PackedBuffer> {
    let len = packed_len(record)?;
    let mut bytes = vec![0u8; len].into_boxed_slice();

    let mut writer = SliceWriter::new(&mut bytes);
    for desc in &SCHEMA {
        // Lengths were validated by packed_len().
        writer.put((desc.get)(record));
    }
    debug_assert_eq!(writer.position(), len);

    log::trace!("packed record {} into {} bytes", record.asset_id, len);

    Ok(PackedBuffer { bytes })
}

/// Cursor over a buffer sized by [`packed_len`].
struct SliceWriter<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> SliceWriter<'a> {
    fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn position(&self) -> usize {
        self.pos
    }

    fn put(&mut self, value: FieldValue<'_>) {
        match value {
            FieldValue::Str(s) => {
                let bytes = s.as_bytes();
                BigEndian::write_u16(self.take(LEN_PREFIX_SIZE), bytes.len() as u16);
                self.take(bytes.len()).copy_from_slice(bytes);
            }
            FieldValue::U8(v) => self.take(1)[0] = v,
            FieldValue::F32(v) => BigEndian::write_f32(self.take(4), v),
        }
    }

    fn take(&mut self, n: usize) -> &mut [u8] {
        let start = self.pos;
        self.pos += n;
        &mut self.buf[start..self.pos]
    }
}
