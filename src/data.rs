//! Simple data segment: `0x80 count:u8` followed by `count` little-endian words.

use crate::buf::{ByteReader, ByteWriter};
use crate::error::{Result, SegmentError};
use crate::segment::DATA_SEGMENT_SIMPLE;
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct SimpleDataSegment {
    words: Option<Vec<u16>>,
}

impl SimpleDataSegment {
    pub fn new(words: impl Into<Vec<u16>>) -> Self {
        SimpleDataSegment {
            words: Some(words.into()),
        }
    }

    /// True if a simple data segment was decoded or constructed.
    pub fn is_defined(&self) -> bool {
        self.words.is_some()
    }

    /// Words in wire order; empty when undefined.
    pub fn words(&self) -> &[u16] {
        self.words.as_deref().unwrap_or(&[])
    }

    /// Decode a simple data segment from the start of `input`.
    ///
    /// A different leading byte yields an undefined segment with that one byte
    /// counted as consumed; callers check [`is_defined`](Self::is_defined).
    pub fn decode(input: &[u8]) -> Result<(SimpleDataSegment, usize)> {
        let mut r = ByteReader::new(input);
        if r.is_empty() {
            return Ok((SimpleDataSegment::default(), 0));
        }
        if r.get8()? != DATA_SEGMENT_SIMPLE {
            return Ok((SimpleDataSegment::default(), r.position()));
        }
        let count = usize::from(r.get8()?);
        let mut words = Vec::with_capacity(count);
        for _ in 0..count {
            words.push(r.get16()?);
        }
        Ok((SimpleDataSegment::new(words), r.position()))
    }

    pub fn encode(&self, out: &mut [u8]) -> Result<usize> {
        self.writer()?.copy_to(out)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(self.writer()?.into_inner())
    }

    fn writer(&self) -> Result<ByteWriter> {
        let mut w = ByteWriter::new();
        let Some(words) = &self.words else {
            return Ok(w);
        };
        if words.len() > usize::from(u8::MAX) {
            return Err(SegmentError::Capacity {
                what: "simple data segment",
                len: words.len(),
                capacity: usize::from(u8::MAX),
            });
        }
        w.put8(DATA_SEGMENT_SIMPLE);
        w.put8(words.len() as u8);
        for &word in words {
            w.put16(word);
        }
        Ok(w)
    }
}

impl fmt::Display for SimpleDataSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.words {
            None => f.write_str("Data:none"),
            Some(words) => {
                f.write_str("Data:[")?;
                for (i, w) in words.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{:#06x}", w)?;
                }
                f.write_str("]")
            }
        }
    }
}
