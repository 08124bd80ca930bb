// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com
//
// Wire layout golden checks: byte-exact packed output for a known record,
// fixed field offsets, and layout stability under random field values.

#![allow(clippy::float_cmp)]
#![allow(clippy::unreadable_literal)]

mod common;

use boxtel::schema::{FIELD_COUNT, FIXED_PACKED_LEN};
use boxtel::{encode, layout, packed_len, CodecError, FieldKind, SCHEMA};
use common::{parked_record, random_record};

#[rustfmt::skip]
const PARKED_GOLDEN: [u8; 116] = [
    0x00, 0x0C, 0x33, 0x39, 0x33, 0x36, 0x30, 0x30, 0x35, 0x30, 0x34, 0x39, 0x32, 0x30, 0x00, 0x0B,
    0x4C, 0x4D, 0x43, 0x55, 0x30, 0x30, 0x30, 0x30, 0x30, 0x30, 0x31, 0x00, 0x0F, 0x31, 0x38, 0x31,
    0x30, 0x32, 0x36, 0x20, 0x31, 0x34, 0x33, 0x30, 0x30, 0x30, 0x2E, 0x30, 0x14, 0x00, 0x0E, 0x39,
    0x39, 0x39, 0x2D, 0x30, 0x31, 0x2D, 0x31, 0x2D, 0x33, 0x31, 0x44, 0x34, 0x31, 0x00, 0x50, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xC4, 0x7A, 0x00, 0x00, 0x41, 0x92, 0x8F, 0x5C, 0x42,
    0x70, 0x00, 0x00, 0x44, 0x7D, 0x00, 0x00, 0x00, 0x01, 0x44, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x42, 0xC6, 0x00, 0x00,
];

/// (field, offset, packed length) for the parked fixture.
const PARKED_OFFSETS: [(&str, usize, usize); FIELD_COUNT] = [
    ("device_id", 0, 14),
    ("asset_id", 14, 13),
    ("timestamp", 27, 17),
    ("signal_strength", 44, 1),
    ("cell_location", 45, 16),
    ("ble_marker", 61, 1),
    ("battery_pct", 62, 1),
    ("accel_x", 63, 4),
    ("accel_y", 67, 4),
    ("accel_z", 71, 4),
    ("temperature", 75, 4),
    ("humidity", 79, 4),
    ("pressure", 83, 4),
    ("door_state", 87, 3),
    ("gnss_fix", 90, 1),
    ("latitude", 91, 4),
    ("longitude", 95, 4),
    ("altitude", 99, 4),
    ("speed", 103, 4),
    ("heading", 107, 4),
    ("satellite_count", 111, 1),
    ("hdop", 112, 4),
];

#[test]
fn golden_parked_record() {
    let packed = encode(&parked_record()).expect("encode");
    assert_eq!(packed.as_bytes(), &PARKED_GOLDEN[..]);
}

#[test]
fn fixed_offsets_for_fixture() {
    let spans = layout(&parked_record()).expect("layout");
    for (span, (name, offset, len)) in spans.iter().zip(PARKED_OFFSETS) {
        assert_eq!(span.name, name);
        assert_eq!(span.offset, offset, "{name}: offset");
        assert_eq!(span.len, len, "{name}: len");
    }
    let last = spans.last().expect("spans");
    assert_eq!(last.offset + last.len, 116);
}

#[test]
fn packed_len_is_fixed_plus_strings() {
    let record = parked_record();
    let strings = [
        &record.device_id,
        &record.asset_id,
        &record.timestamp,
        &record.cell_location,
        &record.door_state,
    ];
    let expected: usize = strings.iter().map(|s| 2 + s.len()).sum::<usize>() + 5 + 4 * 12;
    assert_eq!(expected, 116);
    assert_eq!(packed_len(&record).expect("len"), expected);
    assert_eq!(encode(&record).expect("encode").len(), expected);
}

#[test]
fn pressure_packs_as_big_endian_ieee754() {
    let mut record = parked_record();
    record.pressure = 1012.4;
    let packed = encode(&record).expect("encode");
    assert_eq!(&packed.as_bytes()[83..87], &[0x44, 0x7D, 0x19, 0x9A]);
    assert_eq!(&packed.as_bytes()[83..87], &1012.4f32.to_bits().to_be_bytes());
}

/// Reads every field back at the offset `layout` reports and compares it
/// to the source record.
fn check_fields_at_layout(record: &boxtel::TelemetryRecord, bytes: &[u8]) {
    let spans = layout(record).expect("layout");
    for (desc, span) in SCHEMA.iter().zip(&spans) {
        let raw = &bytes[span.offset..span.offset + span.len];
        match ((desc.get)(record), span.kind) {
            (boxtel::FieldValue::Str(s), FieldKind::Str) => {
                let len = u16::from_be_bytes([raw[0], raw[1]]) as usize;
                assert_eq!(len, s.len(), "{}", span.name);
                assert_eq!(&raw[2..], s.as_bytes(), "{}", span.name);
            }
            (boxtel::FieldValue::U8(v), FieldKind::U8) => {
                assert_eq!(raw, &[v], "{}", span.name);
            }
            (boxtel::FieldValue::F32(v), FieldKind::F32) => {
                let bits = u32::from_be_bytes([raw[0], raw[1], raw[2], raw[3]]);
                assert_eq!(bits, v.to_bits(), "{}", span.name);
            }
            (value, kind) => panic!("{}: {value:?} does not match {kind:?}", span.name),
        }
    }
}

#[test]
fn layout_holds_for_random_records() {
    let mut rng = fastrand::Rng::with_seed(0x6F78_7465);
    for _ in 0..500 {
        let record = random_record(&mut rng);
        let packed = encode(&record).expect("encode");

        let strings = record.device_id.len()
            + record.asset_id.len()
            + record.timestamp.len()
            + record.cell_location.len()
            + record.door_state.len();
        assert_eq!(packed.len(), FIXED_PACKED_LEN + strings);

        check_fields_at_layout(&record, packed.as_bytes());
    }
}

#[test]
fn encode_is_deterministic_for_random_records() {
    let mut rng = fastrand::Rng::with_seed(7);
    for _ in 0..200 {
        let record = random_record(&mut rng);
        let first = encode(&record).expect("encode");
        let second = encode(&record).expect("encode");
        assert_eq!(first, second);
    }
}

#[test]
fn oversized_device_id_is_rejected() {
    let mut record = parked_record();
    record.device_id = "3".repeat(70_000);
    let err = encode(&record).unwrap_err();
    assert!(matches!(
        err,
        CodecError::FieldTooLarge {
            field: "device_id",
            len: 70_000,
            max: 65_535
        }
    ));
    assert!(packed_len(&record).is_err());
    assert!(layout(&record).is_err());
}

#[test]
fn max_length_string_is_encodable() {
    let mut record = parked_record();
    record.timestamp = "0".repeat(65_535);
    let packed = encode(&record).expect("encode");
    assert_eq!(&packed.as_bytes()[27..29], &[0xFF, 0xFF]);
    assert_eq!(packed.len(), 116 - 15 + 65_535);
}
