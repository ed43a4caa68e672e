//! Segment classification and the variable-width logical value codec.
//!
//! Every segment starts with a type byte. The top three bits select the segment
//! family; for logical segments the next three bits select the addressed field and
//! the low two bits select the width of the value that follows.

use crate::buf::{ByteReader, ByteWriter};
use crate::error::{Result, SegmentError};

pub const SEGMENT_FAMILY_MASK: u8 = 0xE0;

pub const SEGMENT_TYPE_PORT: u8 = 0x00;
pub const SEGMENT_TYPE_LOGICAL: u8 = 0x20;
pub const SEGMENT_TYPE_NETWORK: u8 = 0x40;
pub const SEGMENT_TYPE_SYMBOLIC: u8 = 0x60;
pub const SEGMENT_TYPE_DATA: u8 = 0x80;

pub const DATA_SEGMENT_SIMPLE: u8 = SEGMENT_TYPE_DATA;
pub const DATA_SEGMENT_ANSI_EXTENDED_SYMBOL: u8 = SEGMENT_TYPE_DATA + 0x11;

/// Electronic key: logical segment, special type, key format byte follows.
pub const ELECTRONIC_KEY_SEGMENT: u8 = 0x34;
pub const NETWORK_SEGMENT_PIT_MSECS: u8 = SEGMENT_TYPE_NETWORK + 0x03;
pub const NETWORK_SEGMENT_PIT_USECS: u8 = SEGMENT_TYPE_NETWORK + 0x11;

/// Class id of the assembly object.
pub const ASSEMBLY_CLASS_ID: u32 = 4;

/// Field addressed by a logical segment (bits 4..2 of the type byte).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalType {
    ClassId,
    InstanceId,
    MemberId,
    ConnectionPoint,
    AttributeId,
    Special,
    Service,
    Extended,
}

impl LogicalType {
    /// Type byte with a zero format selector.
    pub fn segment_type(self) -> u8 {
        let sub = match self {
            LogicalType::ClassId => 0x00,
            LogicalType::InstanceId => 0x04,
            LogicalType::MemberId => 0x08,
            LogicalType::ConnectionPoint => 0x0C,
            LogicalType::AttributeId => 0x10,
            LogicalType::Special => 0x14,
            LogicalType::Service => 0x18,
            LogicalType::Extended => 0x1C,
        };
        SEGMENT_TYPE_LOGICAL | sub
    }

    fn from_bits(bits: u8) -> Self {
        match bits & 0x1C {
            0x00 => LogicalType::ClassId,
            0x04 => LogicalType::InstanceId,
            0x08 => LogicalType::MemberId,
            0x0C => LogicalType::ConnectionPoint,
            0x10 => LogicalType::AttributeId,
            0x14 => LogicalType::Special,
            0x18 => LogicalType::Service,
            _ => LogicalType::Extended,
        }
    }
}

/// Width selector in the low two bits of a logical type byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalFormat {
    U8,
    U16,
    U32,
    Reserved,
}

impl LogicalFormat {
    pub fn from_selector(bits: u8) -> Self {
        match bits & 0x03 {
            0 => LogicalFormat::U8,
            1 => LogicalFormat::U16,
            2 => LogicalFormat::U32,
            _ => LogicalFormat::Reserved,
        }
    }

    /// Narrowest format holding `value`.
    pub fn for_value(value: u32) -> Self {
        if value < 0x100 {
            LogicalFormat::U8
        } else if value < 0x1_0000 {
            LogicalFormat::U16
        } else {
            LogicalFormat::U32
        }
    }

    pub fn selector(self) -> u8 {
        match self {
            LogicalFormat::U8 => 0,
            LogicalFormat::U16 => 1,
            LogicalFormat::U32 => 2,
            LogicalFormat::Reserved => 3,
        }
    }

    /// Number of value bytes, `None` for the reserved selector.
    pub fn width(self) -> Option<usize> {
        match self {
            LogicalFormat::U8 => Some(1),
            LogicalFormat::U16 => Some(2),
            LogicalFormat::U32 => Some(4),
            LogicalFormat::Reserved => None,
        }
    }
}

/// Whether 16- and 32-bit logical values are preceded by a pad byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EpathFormat {
    #[default]
    Packed,
    Padded,
}

/// Family of the segment starting with a given type byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentClass {
    Logical {
        kind: LogicalType,
        format: LogicalFormat,
    },
    /// ANSI extended symbol: length byte and tag follow.
    ExtendedSymbol,
    /// Inline-length symbolic segment; `len == 0` is the unsupported extended form.
    Symbolic { len: u8 },
    Port,
    Network(u8),
    SimpleData,
    /// Not a segment this codec knows at any position: the end of the chain.
    Unrecognized,
}

impl SegmentClass {
    pub fn classify(byte: u8) -> Self {
        if byte == DATA_SEGMENT_ANSI_EXTENDED_SYMBOL {
            return SegmentClass::ExtendedSymbol;
        }
        if byte == DATA_SEGMENT_SIMPLE {
            return SegmentClass::SimpleData;
        }
        match byte & SEGMENT_FAMILY_MASK {
            SEGMENT_TYPE_LOGICAL => SegmentClass::Logical {
                kind: LogicalType::from_bits(byte),
                format: LogicalFormat::from_selector(byte),
            },
            SEGMENT_TYPE_SYMBOLIC => SegmentClass::Symbolic { len: byte & 0x1F },
            SEGMENT_TYPE_PORT => SegmentClass::Port,
            SEGMENT_TYPE_NETWORK => SegmentClass::Network(byte),
            _ => SegmentClass::Unrecognized,
        }
    }

    /// Logical sub-type if this is a logical segment.
    pub fn logical(self) -> Option<(LogicalType, LogicalFormat)> {
        match self {
            SegmentClass::Logical { kind, format } => Some((kind, format)),
            _ => None,
        }
    }
}

/// Write one logical segment using the narrowest width for `value`.
/// Returns the number of bytes written.
pub fn encode_logical(w: &mut ByteWriter, kind: LogicalType, value: u32, epath: EpathFormat) -> usize {
    let start = w.len();
    let format = LogicalFormat::for_value(value);
    w.put8(kind.segment_type() | format.selector());
    if epath == EpathFormat::Padded && format != LogicalFormat::U8 {
        w.put8(0);
    }
    match format {
        LogicalFormat::U8 => w.put8(value as u8),
        LogicalFormat::U16 => w.put16(value as u16),
        _ => w.put32(value),
    }
    w.len() - start
}

/// Read the value of a logical segment whose type byte the caller already consumed.
/// `type_offset` is the position of that type byte, used for error reporting.
pub fn decode_logical(
    r: &mut ByteReader<'_>,
    format: LogicalFormat,
    type_offset: usize,
    epath: EpathFormat,
) -> Result<u32> {
    if epath == EpathFormat::Padded && matches!(format, LogicalFormat::U16 | LogicalFormat::U32) {
        r.skip(1)?;
    }
    match format {
        LogicalFormat::U8 => Ok(u32::from(r.get8()?)),
        LogicalFormat::U16 => Ok(u32::from(r.get16()?)),
        LogicalFormat::U32 => r.get32(),
        LogicalFormat::Reserved => Err(SegmentError::UnsupportedEncoding {
            offset: type_offset,
            what: "logical segment format",
            value: format.selector(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_logical_types_and_formats() {
        assert_eq!(
            SegmentClass::classify(0x20),
            SegmentClass::Logical {
                kind: LogicalType::ClassId,
                format: LogicalFormat::U8
            }
        );
        assert_eq!(
            SegmentClass::classify(0x25),
            SegmentClass::Logical {
                kind: LogicalType::InstanceId,
                format: LogicalFormat::U16
            }
        );
        assert_eq!(
            SegmentClass::classify(0x2E),
            SegmentClass::Logical {
                kind: LogicalType::ConnectionPoint,
                format: LogicalFormat::U32
            }
        );
        assert_eq!(
            SegmentClass::classify(0x33),
            SegmentClass::Logical {
                kind: LogicalType::AttributeId,
                format: LogicalFormat::Reserved
            }
        );
        assert_eq!(
            SegmentClass::classify(ELECTRONIC_KEY_SEGMENT).logical(),
            Some((LogicalType::Special, LogicalFormat::U8))
        );
    }

    #[test]
    fn classify_other_families() {
        assert_eq!(SegmentClass::classify(0x91), SegmentClass::ExtendedSymbol);
        assert_eq!(SegmentClass::classify(0x80), SegmentClass::SimpleData);
        assert_eq!(SegmentClass::classify(0x65), SegmentClass::Symbolic { len: 5 });
        assert_eq!(SegmentClass::classify(0x60), SegmentClass::Symbolic { len: 0 });
        assert_eq!(SegmentClass::classify(0x01), SegmentClass::Port);
        assert_eq!(SegmentClass::classify(0x1F), SegmentClass::Port);
        assert_eq!(SegmentClass::classify(0x43), SegmentClass::Network(0x43));
        assert_eq!(SegmentClass::classify(0x81), SegmentClass::Unrecognized);
        assert_eq!(SegmentClass::classify(0xC3), SegmentClass::Unrecognized);
    }

    #[test]
    fn width_selection_boundaries() {
        let cases = [(255u32, 2usize, 0x24u8), (256, 3, 0x25), (65535, 3, 0x25), (65536, 5, 0x26)];
        for (value, len, type_byte) in cases {
            let mut w = ByteWriter::new();
            let n = encode_logical(&mut w, LogicalType::InstanceId, value, EpathFormat::Packed);
            assert_eq!(n, len, "value {}", value);
            assert_eq!(w.as_bytes()[0], type_byte, "value {}", value);
        }
    }

    #[test]
    fn padded_format_inserts_pad_after_type_byte() {
        let mut w = ByteWriter::new();
        encode_logical(&mut w, LogicalType::ClassId, 0x1234, EpathFormat::Padded);
        assert_eq!(w.as_bytes(), &[0x21, 0x00, 0x34, 0x12]);

        let mut r = ByteReader::new(&w.as_bytes()[1..]);
        let v = decode_logical(&mut r, LogicalFormat::U16, 0, EpathFormat::Padded).expect("decode");
        assert_eq!(v, 0x1234);
        assert!(r.is_empty());
    }

    #[test]
    fn decode_truncated_value_fails() {
        let data = [0x34];
        let mut r = ByteReader::new(&data);
        let err = decode_logical(&mut r, LogicalFormat::U32, 0, EpathFormat::Packed).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Truncated);
    }
}
