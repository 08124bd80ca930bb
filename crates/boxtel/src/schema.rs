// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Ordered wire schema for [`TelemetryRecord`].
//!
//! The packed layout is the concatenation of every entry of [`SCHEMA`], in
//! order, with no padding and no header:
//!
//! ```text
//! +------------------+------------------+------------------+-----------+
//! | device_id (str)  | asset_id (str)   | timestamp (str)  | rssi (u8) |
//! +------------------+------------------+------------------+-----------+
//! | cell_location    | ble (u8) | bat (u8) | accel x/y/z (3 x f32)     |
//! +------------------+------------------+------------------+-----------+
//! | temperature | humidity | pressure (f32) | door_state (str) | gnss  |
//! +------------------+------------------+------------------+-----------+
//! | lat | lon | alt | speed | heading (f32) | nsat (u8) | hdop (f32)   |
//! +------------------+------------------+------------------+-----------+
//!
//! str = len (u16 BE) | bytes      u8 = 1 byte      f32 = IEEE-754 BE
//! ```

use crate::error::{CodecError, Result};
use crate::record::TelemetryRecord;

/// Largest string a 16-bit length prefix can describe.
pub const MAX_STRING_LEN: usize = u16::MAX as usize;

/// Size of a string length prefix.
pub const LEN_PREFIX_SIZE: usize = 2;

/// Packed representation of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum FieldKind {
    /// u16 big-endian length followed by raw bytes.
    Str,
    /// One byte.
    U8,
    /// IEEE-754 single precision, big-endian.
    F32,
}

impl FieldKind {
    /// Packed width for fixed-size kinds, `None` for strings.
    pub const fn fixed_width(self) -> Option<usize> {
        match self {
            Self::Str => None,
            Self::U8 => Some(1),
            Self::F32 => Some(4),
        }
    }
}

/// A borrowed field value, as read from a record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Str(&'a str),
    U8(u8),
    F32(f32),
}

impl FieldValue<'_> {
    /// Packed size of this value (string prefix included).
    pub fn packed_len(&self) -> usize {
        match self {
            Self::Str(s) => LEN_PREFIX_SIZE + s.len(),
            Self::U8(_) => 1,
            Self::F32(_) => 4,
        }
    }
}

/// One entry of the wire schema.
#[derive(Clone, Copy)]
pub struct FieldDescriptor {
    /// Field name, as declared on [`TelemetryRecord`].
    pub name: &'static str,
    /// Packed representation.
    pub kind: FieldKind,
    /// Reads the field from a record.
    pub get: fn(&TelemetryRecord) -> FieldValue<'_>,
}

impl FieldDescriptor {
    /// Read this field from `record` and check it fits its packed form.
    pub fn read<'r>(&self, record: &'r TelemetryRecord) -> Result<FieldValue<'r>> {
        let value = (self.get)(record);
        if let FieldValue::Str(s) = value {
            if s.len() > MAX_STRING_LEN {
                return Err(CodecError::FieldTooLarge {
                    field: self.name,
                    len: s.len(),
                    max: MAX_STRING_LEN,
                });
            }
        }
        Ok(value)
    }
}

impl std::fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish()
    }
}

macro_rules! field {
    ($name:ident: str) => {
        FieldDescriptor {
            name: stringify!($name),
            kind: FieldKind::Str,
            get: {
                fn get(r: &TelemetryRecord) -> FieldValue<'_> {
                    FieldValue::Str(&r.$name)
                }
                get
            },
        }
    };
    ($name:ident: u8) => {
        FieldDescriptor {
            name: stringify!($name),
            kind: FieldKind::U8,
            get: {
                fn get(r: &TelemetryRecord) -> FieldValue<'_> {
                    FieldValue::U8(r.$name)
                }
                get
            },
        }
    };
    ($name:ident: f32) => {
        FieldDescriptor {
            name: stringify!($name),
            kind: FieldKind::F32,
            get: {
                fn get(r: &TelemetryRecord) -> FieldValue<'_> {
                    FieldValue::F32(r.$name)
                }
                get
            },
        }
    };
}

/// Number of entries in [`SCHEMA`].
pub const FIELD_COUNT: usize = 22;

/// The wire schema. Order is part of the wire contract.
pub const SCHEMA: [FieldDescriptor; FIELD_COUNT] = [
    field!(device_id: str),
    field!(asset_id: str),
    field!(timestamp: str),
    field!(signal_strength: u8),
    field!(cell_location: str),
    field!(ble_marker: u8),
    field!(battery_pct: u8),
    field!(accel_x: f32),
    field!(accel_y: f32),
    field!(accel_z: f32),
    field!(temperature: f32),
    field!(humidity: f32),
    field!(pressure: f32),
    field!(door_state: str),
    field!(gnss_fix: u8),
    field!(latitude: f32),
    field!(longitude: f32),
    field!(altitude: f32),
    field!(speed: f32),
    field!(heading: f32),
    field!(satellite_count: u8),
    field!(hdop: f32),
];

pub const STRING_FIELD_COUNT: usize = 5;
pub const U8_FIELD_COUNT: usize = 5;
pub const F32_FIELD_COUNT: usize = 12;

/// Packed bytes that do not depend on string contents.
pub const FIXED_PACKED_LEN: usize =
    STRING_FIELD_COUNT * LEN_PREFIX_SIZE + U8_FIELD_COUNT + F32_FIELD_COUNT * 4;

const fn count_kind(kind: FieldKind) -> usize {
    let mut n = 0;
    let mut i = 0;
    while i < SCHEMA.len() {
        if SCHEMA[i].kind as u8 == kind as u8 {
            n += 1;
        }
        i += 1;
    }
    n
}

const _: () = assert!(count_kind(FieldKind::Str) == STRING_FIELD_COUNT);
const _: () = assert!(count_kind(FieldKind::U8) == U8_FIELD_COUNT);
const _: () = assert!(count_kind(FieldKind::F32) == F32_FIELD_COUNT);

/// Location of one field inside a packed buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpan {
    pub name: &'static str,
    pub kind: FieldKind,
    /// Byte offset of the field (of its length prefix, for strings).
    pub offset: usize,
    /// Packed length, prefix included.
    pub len: usize,
}

/// Compute where every field of `record` lands in its packed form.
pub fn layout(record: &TelemetryRecord) -> Result<Vec<FieldSpan>> {
    let mut spans = Vec::with_capacity(FIELD_COUNT);
    let mut offset = 0;
    for desc in &SCHEMA {
        let len = desc.read(record)?.packed_len();
        spans.push(FieldSpan {
            name: desc.name,
            kind: desc.kind,
            offset,
            len,
        });
        offset += len;
    }
    Ok(spans)
}

/// Look up a descriptor by field name.
pub fn descriptor(name: &str) -> Option<&'static FieldDescriptor> {
    let table: &'static [FieldDescriptor; FIELD_COUNT] = &SCHEMA;
    table.iter().find(|d| d.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::test_record as record;

    #[test]
    fn test_schema_order_matches_record() {
        let names: Vec<_> = SCHEMA.iter().map(|d| d.name).collect();
        assert_eq!(names.first(), Some(&"device_id"));
        assert_eq!(names.last(), Some(&"hdop"));
        assert_eq!(names[3], "signal_strength");
        assert_eq!(names[13], "door_state");
    }

    #[test]
    fn test_fixed_packed_len() {
        assert_eq!(FIXED_PACKED_LEN, 63);
        assert_eq!(FieldKind::Str.fixed_width(), None);
        assert_eq!(FieldKind::U8.fixed_width(), Some(1));
        assert_eq!(FieldKind::F32.fixed_width(), Some(4));
    }

    #[test]
    fn test_descriptor_reads_field() {
        let rec = record();
        let desc = descriptor("temperature").expect("temperature");
        assert_eq!(desc.kind, FieldKind::F32);
        assert_eq!((desc.get)(&rec), FieldValue::F32(18.32));

        let desc = descriptor("door_state").expect("door_state");
        assert_eq!((desc.get)(&rec), FieldValue::Str("D"));

        assert!(descriptor("nope").is_none());
    }

    #[test]
    fn test_layout_is_contiguous() {
        let spans = layout(&record()).expect("layout");
        assert_eq!(spans.len(), FIELD_COUNT);
        assert_eq!(spans[0].offset, 0);
        for pair in spans.windows(2) {
            assert_eq!(pair[0].offset + pair[0].len, pair[1].offset);
        }
    }

    #[test]
    fn test_read_rejects_oversized_string() {
        let mut rec = record();
        rec.cell_location = "x".repeat(MAX_STRING_LEN + 1);
        let err = descriptor("cell_location")
            .expect("cell_location")
            .read(&rec)
            .unwrap_err();
        assert!(matches!(
            err,
            CodecError::FieldTooLarge {
                field: "cell_location",
                len: 65_536,
                ..
            }
        ));
    }

    #[test]
    fn test_string_at_limit_is_accepted() {
        let mut rec = record();
        rec.asset_id = "x".repeat(MAX_STRING_LEN);
        let value = descriptor("asset_id")
            .expect("asset_id")
            .read(&rec)
            .expect("read");
        assert_eq!(value.packed_len(), MAX_STRING_LEN + 2);
    }
}
