//! Error taxonomy shared by every segment codec.
//!
//! Decode errors carry the byte offset of the offending byte, relative to the start
//! of the slice passed to the decode entry point. A byte that simply does not match
//! the grammar at its position is never an error: decoders stop there and report
//! how much they consumed.

/// Broad category of a [`SegmentError`], for callers that branch on the failure kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A declared length exceeds what the destination can hold.
    MalformedLength,
    /// A known segment uses an encoding variant this codec does not accept.
    UnsupportedEncoding,
    /// Fewer bytes remain than the declared field width requires.
    Truncated,
    /// A value built through the API exceeds a fixed bound.
    Capacity,
    /// The encode destination is too small.
    BufferFull,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SegmentError {
    #[error("{what} length {len} at offset {offset} exceeds capacity {capacity}")]
    MalformedLength {
        offset: usize,
        what: &'static str,
        len: usize,
        capacity: usize,
    },
    #[error("unsupported {what} {value:#04x} at offset {offset}")]
    UnsupportedEncoding {
        offset: usize,
        what: &'static str,
        value: u8,
    },
    #[error("truncated at offset {offset}: need {needed} bytes, {available} remain")]
    Truncated {
        offset: usize,
        needed: usize,
        available: usize,
    },
    #[error("{what} length {len} exceeds capacity {capacity}")]
    Capacity {
        what: &'static str,
        len: usize,
        capacity: usize,
    },
    #[error("output buffer too small: need {needed} bytes, have {available}")]
    BufferFull { needed: usize, available: usize },
}

impl SegmentError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SegmentError::MalformedLength { .. } => ErrorKind::MalformedLength,
            SegmentError::UnsupportedEncoding { .. } => ErrorKind::UnsupportedEncoding,
            SegmentError::Truncated { .. } => ErrorKind::Truncated,
            SegmentError::Capacity { .. } => ErrorKind::Capacity,
            SegmentError::BufferFull { .. } => ErrorKind::BufferFull,
        }
    }

    /// Offset of the offending input byte; `None` for errors not tied to input.
    pub fn offset(&self) -> Option<usize> {
        match self {
            SegmentError::MalformedLength { offset, .. }
            | SegmentError::UnsupportedEncoding { offset, .. }
            | SegmentError::Truncated { offset, .. } => Some(*offset),
            SegmentError::Capacity { .. } | SegmentError::BufferFull { .. } => None,
        }
    }

    /// Shift the offset of a decode error, used when a sub-decoder ran on a suffix
    /// of the caller's input.
    pub(crate) fn shifted(self, by: usize) -> Self {
        match self {
            SegmentError::MalformedLength {
                offset,
                what,
                len,
                capacity,
            } => SegmentError::MalformedLength {
                offset: offset + by,
                what,
                len,
                capacity,
            },
            SegmentError::UnsupportedEncoding { offset, what, value } => {
                SegmentError::UnsupportedEncoding {
                    offset: offset + by,
                    what,
                    value,
                }
            }
            SegmentError::Truncated {
                offset,
                needed,
                available,
            } => SegmentError::Truncated {
                offset: offset + by,
                needed,
                available,
            },
            other => other,
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SegmentError>;
