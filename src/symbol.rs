//! Bounded tag name used by symbolic application paths.

use crate::error::{Result, SegmentError};
use std::fmt;
use std::hash::{Hash, Hasher};

const SYMBOL_MAX_LEN: usize = 41;

/// Owned tag name of at most [`Symbol::MAX_LEN`] bytes.
///
/// Tag bytes are kept as received: peers send ANSI text that is not required to be
/// valid UTF-8. [`Symbol::to_string_lossy`] and `Display` render it for humans.
#[derive(Clone, Copy)]
pub struct Symbol {
    bytes: [u8; SYMBOL_MAX_LEN],
    len: u8,
}

impl Symbol {
    /// Longest accepted tag; peers store tags in a 42-byte NUL-terminated buffer.
    pub const MAX_LEN: usize = SYMBOL_MAX_LEN;

    pub fn new(name: &str) -> Result<Self> {
        Symbol::from_bytes(name.as_bytes())
    }

    pub fn from_bytes(name: &[u8]) -> Result<Self> {
        if name.len() > Symbol::MAX_LEN {
            return Err(SegmentError::Capacity {
                what: "symbol",
                len: name.len(),
                capacity: Symbol::MAX_LEN,
            });
        }
        let mut bytes = [0u8; SYMBOL_MAX_LEN];
        bytes[..name.len()].copy_from_slice(name);
        Ok(Symbol {
            bytes,
            len: name.len() as u8,
        })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len as usize]
    }

    /// Tag as text, if it is valid UTF-8.
    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(self.as_bytes()).ok()
    }

    pub fn to_string_lossy(&self) -> String {
        String::from_utf8_lossy(self.as_bytes()).into_owned()
    }

    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl Eq for Symbol {}

impl Hash for Symbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_bytes().hash(state);
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({:?})", self.to_string_lossy())
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_lossy())
    }
}

impl TryFrom<&str> for Symbol {
    type Error = SegmentError;

    fn try_from(name: &str) -> Result<Self> {
        Symbol::new(name)
    }
}
