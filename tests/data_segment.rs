//! Simple data segments.

use cip_epath::{ErrorKind, SimpleDataSegment};

#[test]
fn test_decode_three_words() {
    let bytes = [0x80, 0x03, 0x01, 0x00, 0x02, 0x00, 0x03, 0x00, 0x91];
    let (seg, consumed) = SimpleDataSegment::decode(&bytes).expect("decode");
    assert_eq!(consumed, 8);
    assert!(seg.is_defined());
    assert_eq!(seg.words(), &[1, 2, 3]);
}

#[test]
fn test_decode_zero_words_is_defined() {
    let (seg, consumed) = SimpleDataSegment::decode(&[0x80, 0x00]).expect("decode");
    assert_eq!(consumed, 2);
    assert!(seg.is_defined());
    assert!(seg.words().is_empty());
}

#[test]
fn test_other_type_byte_is_undefined_and_counts_one_byte() {
    let (seg, consumed) = SimpleDataSegment::decode(&[0x20, 0x04]).expect("decode");
    assert_eq!(consumed, 1);
    assert!(!seg.is_defined());

    let (seg, consumed) = SimpleDataSegment::decode(&[]).expect("decode");
    assert_eq!(consumed, 0);
    assert!(!seg.is_defined());
}

#[test]
fn test_truncated_words_fail() {
    let err = SimpleDataSegment::decode(&[0x80, 0x02, 0x01, 0x00, 0x02]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Truncated);
    assert_eq!(err.offset(), Some(4));
}

#[test]
fn test_encode_words() {
    let seg = SimpleDataSegment::new(vec![0x1234, 0xFFFF]);
    assert_eq!(
        seg.to_bytes().expect("encode"),
        vec![0x80, 0x02, 0x34, 0x12, 0xFF, 0xFF]
    );
    assert!(SimpleDataSegment::default().to_bytes().expect("encode").is_empty());

    let err = SimpleDataSegment::new(vec![0u16; 256]).to_bytes().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Capacity);
}

#[test]
fn test_encode_into_short_buffer() {
    let seg = SimpleDataSegment::new(vec![1, 2]);
    let mut out = [0u8; 5];
    let err = seg.encode(&mut out).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BufferFull);
    assert_eq!(out, [0u8; 5]);
}

#[test]
fn test_display() {
    assert_eq!(SimpleDataSegment::new(vec![1, 0xABCD]).to_string(), "Data:[0x0001, 0xabcd]");
    assert_eq!(SimpleDataSegment::default().to_string(), "Data:none");
}
