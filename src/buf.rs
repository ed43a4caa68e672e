//! Bounds-checked byte cursor for segment decoding and an append-only writer for encoding.
//!
//! The reader never moves backwards and never reads past the end of its slice: every
//! accessor either returns the requested bytes or a [`SegmentError::Truncated`] naming
//! the position where the read was attempted. Multi-byte values are little endian.

use crate::error::{Result, SegmentError};
use byteorder::{ByteOrder, LittleEndian};

/// Read cursor over a borrowed input slice.
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        ByteReader { data, pos: 0 }
    }

    /// Bytes consumed since the reader was created.
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Unconsumed tail of the input.
    pub fn rest(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }

    /// Next byte without consuming it.
    pub fn peek(&self) -> Option<u8> {
        self.data.get(self.pos).copied()
    }

    fn need(&self, n: usize) -> Result<()> {
        if self.remaining() < n {
            return Err(SegmentError::Truncated {
                offset: self.pos,
                needed: n,
                available: self.remaining(),
            });
        }
        Ok(())
    }

    pub fn get8(&mut self) -> Result<u8> {
        self.need(1)?;
        let v = self.data[self.pos];
        self.pos += 1;
        Ok(v)
    }

    pub fn get16(&mut self) -> Result<u16> {
        self.need(2)?;
        let v = LittleEndian::read_u16(&self.data[self.pos..]);
        self.pos += 2;
        Ok(v)
    }

    pub fn get32(&mut self) -> Result<u32> {
        self.need(4)?;
        let v = LittleEndian::read_u32(&self.data[self.pos..]);
        self.pos += 4;
        Ok(v)
    }

    /// Consume `n` bytes and return them as a slice of the input.
    pub fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        self.need(n)?;
        let out = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.need(n)?;
        self.pos += n;
        Ok(())
    }

    /// Consume one pad byte if an odd number of bytes were consumed since `start`.
    pub fn align_from(&mut self, start: usize) -> Result<()> {
        if (self.pos - start) & 1 != 0 {
            self.skip(1)?;
        }
        Ok(())
    }
}

/// Append-only output buffer.
#[derive(Debug, Default, Clone)]
pub struct ByteWriter {
    buf: Vec<u8>,
}

impl ByteWriter {
    pub fn new() -> Self {
        ByteWriter::default()
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn put8(&mut self, v: u8) {
        self.buf.push(v);
    }

    pub fn put16(&mut self, v: u16) {
        let at = self.buf.len();
        self.buf.resize(at + 2, 0);
        LittleEndian::write_u16(&mut self.buf[at..], v);
    }

    pub fn put32(&mut self, v: u32) {
        let at = self.buf.len();
        self.buf.resize(at + 4, 0);
        LittleEndian::write_u32(&mut self.buf[at..], v);
    }

    pub fn append(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Emit a zero pad byte if an odd number of bytes were written since `start`.
    pub fn align_from(&mut self, start: usize) {
        if (self.buf.len() - start) & 1 != 0 {
            self.put8(0);
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.buf
    }

    /// Copy the encoding into `out`, or leave `out` untouched if it does not fit.
    pub fn copy_to(&self, out: &mut [u8]) -> Result<usize> {
        let n = self.buf.len();
        if out.len() < n {
            return Err(SegmentError::BufferFull {
                needed: n,
                available: out.len(),
            });
        }
        out[..n].copy_from_slice(&self.buf);
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reader_reads_little_endian_and_tracks_position() {
        let data = [0x01, 0x34, 0x12, 0x78, 0x56, 0x34, 0x12];
        let mut r = ByteReader::new(&data);
        assert_eq!(r.get8().expect("u8"), 1);
        assert_eq!(r.get16().expect("u16"), 0x1234);
        assert_eq!(r.get32().expect("u32"), 0x1234_5678);
        assert_eq!(r.position(), 7);
        assert!(r.is_empty());
        assert_eq!(r.peek(), None);
    }

    #[test]
    fn reader_reports_truncation_at_read_position() {
        let data = [0xAA, 0xBB];
        let mut r = ByteReader::new(&data);
        r.get8().expect("u8");
        let err = r.get16().unwrap_err();
        assert_eq!(
            err,
            SegmentError::Truncated {
                offset: 1,
                needed: 2,
                available: 1
            }
        );
        // failed reads do not advance
        assert_eq!(r.position(), 1);
    }

    #[test]
    fn reader_align_consumes_pad_only_when_odd() {
        let data = [1, 2, 3, 4];
        let mut r = ByteReader::new(&data);
        r.skip(2).expect("skip");
        r.align_from(0).expect("align");
        assert_eq!(r.position(), 2);
        r.skip(1).expect("skip");
        r.align_from(0).expect("align");
        assert_eq!(r.position(), 4);
    }

    #[test]
    fn writer_copy_to_rejects_short_destination_without_writing() {
        let mut w = ByteWriter::new();
        w.put16(0xBEEF);
        w.put32(1);
        let mut small = [0xFFu8; 4];
        let err = w.copy_to(&mut small).unwrap_err();
        assert_eq!(err, SegmentError::BufferFull { needed: 6, available: 4 });
        assert_eq!(small, [0xFF; 4]);

        let mut big = [0u8; 8];
        assert_eq!(w.copy_to(&mut big).expect("fits"), 6);
        assert_eq!(&big[..6], &[0xEF, 0xBE, 1, 0, 0, 0]);
    }
}
