//! Application paths: the symbolic or logical address of a CIP object.
//!
//! ## Grammar
//!
//! An application path is either
//!
//! - **symbolic**: one symbol segment (`0x91 len tag [pad]` or `0x6n tag [pad]`),
//!   optionally one connection point segment, then up to three member segments; or
//! - **logical**: class, instance, attribute and connection point segments, each
//!   optional, in that order.
//!
//! The two shapes are separate variants of [`AppPath`], so a path can never carry both
//! a tag and a class.
//!
//! ## Termination
//!
//! Decoding stops, without error, at the first byte that cannot continue the path:
//! an unknown segment, a logical field that does not come after the previous one, or
//! a connection point directly after an instance of the assembly class (class 4).
//! Assembly paths carry an instance *or* a connection point, so that sequence is two
//! paths back to back.
//!
//! ## Inheritance
//!
//! In a multi-service request a later path may omit leading fields. When a previous
//! path is supplied, fields above the deepest one decoded (class above instance above
//! attribute above connection point) that the new path lacks are copied from it. For
//! an assembly previous path, a new path ending in a connection point does not inherit
//! the instance: the connection point takes its place.

use crate::buf::{ByteReader, ByteWriter};
use crate::error::{Result, SegmentError};
use crate::segment::{
    decode_logical, encode_logical, EpathFormat, LogicalFormat, LogicalType, SegmentClass,
    ASSEMBLY_CLASS_ID, DATA_SEGMENT_ANSI_EXTENDED_SYMBOL,
};
use crate::symbol::Symbol;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Range;
use tracing::{trace, warn};

/// Every numeric field an application path can carry, in wire order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PathField {
    Class,
    Instance,
    Attribute,
    ConnPt,
    Member1,
    Member2,
    Member3,
}

impl PathField {
    pub const ALL: [PathField; 7] = [
        PathField::Class,
        PathField::Instance,
        PathField::Attribute,
        PathField::ConnPt,
        PathField::Member1,
        PathField::Member2,
        PathField::Member3,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            PathField::Class => "Class",
            PathField::Instance => "Instance",
            PathField::Attribute => "Attribute",
            PathField::ConnPt => "ConnPt",
            PathField::Member1 => "Member1",
            PathField::Member2 => "Member2",
            PathField::Member3 => "Member3",
        }
    }

    pub fn flag(self) -> FieldSet {
        FieldSet::from_bits_retain(1 << self.index())
    }

    /// Field of the `index`th member subscript (0-based).
    pub fn member_at(index: usize) -> Option<PathField> {
        match index {
            0 => Some(PathField::Member1),
            1 => Some(PathField::Member2),
            2 => Some(PathField::Member3),
            _ => None,
        }
    }
}

bitflags::bitflags! {
    /// Fields defined in a path, plus whether it carries a tag.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FieldSet: u8 {
        const CLASS = 1 << 0;
        const INSTANCE = 1 << 1;
        const ATTRIBUTE = 1 << 2;
        const CONN_PT = 1 << 3;
        const MEMBER1 = 1 << 4;
        const MEMBER2 = 1 << 5;
        const MEMBER3 = 1 << 6;
        const TAG = 1 << 7;
    }
}

/// Fields of a logical path, in wire order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogicalField {
    Class,
    Instance,
    Attribute,
    ConnPt,
}

impl LogicalField {
    pub const ALL: [LogicalField; 4] = [
        LogicalField::Class,
        LogicalField::Instance,
        LogicalField::Attribute,
        LogicalField::ConnPt,
    ];

    pub fn logical_type(self) -> LogicalType {
        match self {
            LogicalField::Class => LogicalType::ClassId,
            LogicalField::Instance => LogicalType::InstanceId,
            LogicalField::Attribute => LogicalType::AttributeId,
            LogicalField::ConnPt => LogicalType::ConnectionPoint,
        }
    }

    /// Field addressed by a logical segment type, if a logical path accepts it.
    pub fn from_logical_type(kind: LogicalType) -> Option<Self> {
        match kind {
            LogicalType::ClassId => Some(LogicalField::Class),
            LogicalType::InstanceId => Some(LogicalField::Instance),
            LogicalType::AttributeId => Some(LogicalField::Attribute),
            LogicalType::ConnectionPoint => Some(LogicalField::ConnPt),
            _ => None,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl From<LogicalField> for PathField {
    fn from(f: LogicalField) -> Self {
        match f {
            LogicalField::Class => PathField::Class,
            LogicalField::Instance => PathField::Instance,
            LogicalField::Attribute => PathField::Attribute,
            LogicalField::ConnPt => PathField::ConnPt,
        }
    }
}

/// Numeric class / instance / attribute / connection point address.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct LogicalPath {
    values: [Option<u32>; 4],
}

impl LogicalPath {
    pub fn new() -> Self {
        LogicalPath::default()
    }

    pub fn get(&self, field: LogicalField) -> Option<u32> {
        self.values[field.index()]
    }

    pub fn set(&mut self, field: LogicalField, value: u32) {
        self.values[field.index()] = Some(value);
    }

    pub fn remove(&mut self, field: LogicalField) -> Option<u32> {
        self.values[field.index()].take()
    }

    pub fn with(mut self, field: LogicalField, value: u32) -> Self {
        self.set(field, value);
        self
    }

    pub fn class(&self) -> Option<u32> {
        self.get(LogicalField::Class)
    }

    pub fn instance(&self) -> Option<u32> {
        self.get(LogicalField::Instance)
    }

    pub fn attribute(&self) -> Option<u32> {
        self.get(LogicalField::Attribute)
    }

    pub fn conn_pt(&self) -> Option<u32> {
        self.get(LogicalField::ConnPt)
    }

    pub fn is_empty(&self) -> bool {
        self.values.iter().all(Option::is_none)
    }

    /// Defined fields with their values, in wire order.
    pub fn iter(&self) -> impl Iterator<Item = (LogicalField, u32)> + '_ {
        LogicalField::ALL
            .into_iter()
            .filter_map(move |f| self.get(f).map(|v| (f, v)))
    }

    /// Copy undefined fields above `last` from `previous`.
    fn inherit(&mut self, last: LogicalField, previous: &AppPath) {
        let assembly = previous.class() == Some(ASSEMBLY_CLASS_ID);
        for field in LogicalField::ALL.into_iter().filter(|f| *f < last) {
            if assembly && last == LogicalField::ConnPt && field == LogicalField::Instance {
                continue;
            }
            if self.get(field).is_some() {
                continue;
            }
            if let Some(value) = previous.get(field.into()) {
                trace!(field = PathField::from(field).name(), value, "inherited path field");
                self.set(field, value);
            }
        }
    }
}

/// Maximum number of member subscripts after a tag.
pub const MAX_MEMBERS: usize = 3;

/// Contiguous member subscripts (MEMBER1, MEMBER2, MEMBER3).
#[derive(Clone, Copy, Default)]
pub struct Members {
    values: [u32; MAX_MEMBERS],
    len: u8,
}

impl Members {
    pub fn as_slice(&self) -> &[u32] {
        &self.values[..self.len as usize]
    }

    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn push(&mut self, value: u32) -> Result<()> {
        if self.len() == MAX_MEMBERS {
            return Err(SegmentError::Capacity {
                what: "member list",
                len: MAX_MEMBERS + 1,
                capacity: MAX_MEMBERS,
            });
        }
        self.values[self.len()] = value;
        self.len += 1;
        Ok(())
    }
}

impl PartialEq for Members {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl Eq for Members {}

impl Hash for Members {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state);
    }
}

impl fmt::Debug for Members {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

/// Tag name with an optional connection point and member subscripts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SymbolicPath {
    tag: Symbol,
    conn_pt: Option<u32>,
    members: Members,
}

impl SymbolicPath {
    pub fn new(tag: Symbol) -> Self {
        SymbolicPath {
            tag,
            conn_pt: None,
            members: Members::default(),
        }
    }

    pub fn tag(&self) -> &Symbol {
        &self.tag
    }

    pub fn conn_pt(&self) -> Option<u32> {
        self.conn_pt
    }

    pub fn set_conn_pt(&mut self, value: Option<u32>) {
        self.conn_pt = value;
    }

    pub fn with_conn_pt(mut self, value: u32) -> Self {
        self.conn_pt = Some(value);
        self
    }

    pub fn members(&self) -> &[u32] {
        self.members.as_slice()
    }

    /// Append the next member subscript; fails once three are present.
    pub fn push_member(&mut self, value: u32) -> Result<()> {
        self.members.push(value)
    }

    pub fn with_member(mut self, value: u32) -> Result<Self> {
        self.push_member(value)?;
        Ok(self)
    }
}

/// Decoded application path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AppPath {
    Logical(LogicalPath),
    Symbolic(SymbolicPath),
}

impl Default for AppPath {
    fn default() -> Self {
        AppPath::Logical(LogicalPath::new())
    }
}

impl From<LogicalPath> for AppPath {
    fn from(p: LogicalPath) -> Self {
        AppPath::Logical(p)
    }
}

impl From<SymbolicPath> for AppPath {
    fn from(p: SymbolicPath) -> Self {
        AppPath::Symbolic(p)
    }
}

impl AppPath {
    /// Decode with the default (packed) codec. See [`PathCodec::decode_app_path`].
    pub fn decode(input: &[u8], previous: Option<&AppPath>) -> Result<(AppPath, usize)> {
        PathCodec::default().decode_app_path(input, previous)
    }

    /// Encode with the default (packed) codec into `out`; returns bytes written.
    pub fn encode(&self, out: &mut [u8]) -> Result<usize> {
        PathCodec::default().encode_app_path(self, out)
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        PathCodec::default().app_path_to_bytes(self)
    }

    pub fn get(&self, field: PathField) -> Option<u32> {
        match self {
            AppPath::Logical(l) => match field {
                PathField::Class => l.class(),
                PathField::Instance => l.instance(),
                PathField::Attribute => l.attribute(),
                PathField::ConnPt => l.conn_pt(),
                _ => None,
            },
            AppPath::Symbolic(s) => match field {
                PathField::ConnPt => s.conn_pt,
                PathField::Member1 => s.members().first().copied(),
                PathField::Member2 => s.members().get(1).copied(),
                PathField::Member3 => s.members().get(2).copied(),
                _ => None,
            },
        }
    }

    pub fn has(&self, field: PathField) -> bool {
        self.get(field).is_some()
    }

    pub fn class(&self) -> Option<u32> {
        self.get(PathField::Class)
    }

    pub fn instance(&self) -> Option<u32> {
        self.get(PathField::Instance)
    }

    pub fn attribute(&self) -> Option<u32> {
        self.get(PathField::Attribute)
    }

    pub fn conn_pt(&self) -> Option<u32> {
        self.get(PathField::ConnPt)
    }

    pub fn members(&self) -> &[u32] {
        match self {
            AppPath::Logical(_) => &[],
            AppPath::Symbolic(s) => s.members(),
        }
    }

    pub fn symbol(&self) -> Option<&Symbol> {
        match self {
            AppPath::Logical(_) => None,
            AppPath::Symbolic(s) => Some(&s.tag),
        }
    }

    /// Instance id, or the connection point for paths that address an assembly
    /// instance through it.
    pub fn instance_or_conn_pt(&self) -> Option<u32> {
        self.instance().or_else(|| self.conn_pt())
    }

    pub fn is_symbolic(&self) -> bool {
        matches!(self, AppPath::Symbolic(_))
    }

    /// True for a logical path with no fields: what decoding zero bytes yields.
    pub fn is_empty(&self) -> bool {
        matches!(self, AppPath::Logical(l) if l.is_empty())
    }

    pub fn defined(&self) -> FieldSet {
        let mut set = PathField::ALL
            .into_iter()
            .filter(|f| self.has(*f))
            .fold(FieldSet::empty(), |acc, f| acc | f.flag());
        if self.is_symbolic() {
            set |= FieldSet::TAG;
        }
        set
    }
}

impl fmt::Display for AppPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppPath::Logical(l) => {
                for (i, (field, value)) in l.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{}:{}", PathField::from(field).name(), value)?;
                }
                Ok(())
            }
            AppPath::Symbolic(s) => {
                write!(f, "Tag:{}", s.tag)?;
                for m in s.members() {
                    write!(f, "[{}]", m)?;
                }
                if let Some(cp) = s.conn_pt {
                    write!(f, " ConnPt:{}", cp)?;
                }
                Ok(())
            }
        }
    }
}

/// One path of a chained decode and the input bytes it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainedPath {
    pub path: AppPath,
    pub range: Range<usize>,
}

/// Application path encoder/decoder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PathCodec {
    pub format: EpathFormat,
}

impl PathCodec {
    pub fn new(format: EpathFormat) -> Self {
        PathCodec { format }
    }

    /// Decode one application path from the start of `input`.
    ///
    /// Returns the path and the number of bytes consumed. Zero bytes is a valid,
    /// empty path. `previous` is the path decoded before this one in the same
    /// message; see the module docs for what is inherited from it.
    pub fn decode_app_path(
        &self,
        input: &[u8],
        previous: Option<&AppPath>,
    ) -> Result<(AppPath, usize)> {
        let mut r = ByteReader::new(input);
        let path = match self.read_symbol(&mut r)? {
            Some(tag) => AppPath::Symbolic(self.read_symbolic_tail(&mut r, tag)?),
            None => {
                let (mut logical, last) = self.read_logical(&mut r)?;
                if let (Some(last), Some(previous)) = (last, previous) {
                    logical.inherit(last, previous);
                }
                AppPath::Logical(logical)
            }
        };
        Ok((path, r.position()))
    }

    /// Decode consecutive application paths, each inheriting from the one before,
    /// until the input ends or a path consumes nothing.
    pub fn decode_chain(&self, input: &[u8]) -> Result<Vec<ChainedPath>> {
        let mut out: Vec<ChainedPath> = Vec::new();
        let mut pos = 0;
        while pos < input.len() {
            let previous = out.last().map(|c| &c.path);
            let (path, consumed) = self
                .decode_app_path(&input[pos..], previous)
                .map_err(|e| e.shifted(pos))?;
            if consumed == 0 {
                break;
            }
            out.push(ChainedPath {
                path,
                range: pos..pos + consumed,
            });
            pos += consumed;
        }
        Ok(out)
    }

    /// Encode `path` into `out`. Fails without writing if `out` is too small.
    pub fn encode_app_path(&self, path: &AppPath, out: &mut [u8]) -> Result<usize> {
        let mut w = ByteWriter::new();
        self.write_app_path(path, &mut w);
        w.copy_to(out)
    }

    pub fn app_path_to_bytes(&self, path: &AppPath) -> Vec<u8> {
        let mut w = ByteWriter::new();
        self.write_app_path(path, &mut w);
        w.into_inner()
    }

    fn write_app_path(&self, path: &AppPath, w: &mut ByteWriter) {
        match path {
            AppPath::Symbolic(s) => {
                let start = w.len();
                w.put8(DATA_SEGMENT_ANSI_EXTENDED_SYMBOL);
                w.put8(s.tag.len() as u8);
                w.append(s.tag.as_bytes());
                w.align_from(start);
                if let Some(cp) = s.conn_pt {
                    encode_logical(w, LogicalType::ConnectionPoint, cp, self.format);
                }
                for &m in s.members() {
                    encode_logical(w, LogicalType::MemberId, m, self.format);
                }
            }
            AppPath::Logical(l) => {
                for (field, value) in l.iter() {
                    encode_logical(w, field.logical_type(), value, self.format);
                }
            }
        }
    }

    fn read_value(&self, r: &mut ByteReader<'_>, format: LogicalFormat) -> Result<u32> {
        let type_offset = r.position();
        r.skip(1)?;
        decode_logical(r, format, type_offset, self.format)
    }

    fn peek_logical(r: &ByteReader<'_>) -> Option<(LogicalType, LogicalFormat)> {
        r.peek().and_then(|b| SegmentClass::classify(b).logical())
    }

    fn read_symbol(&self, r: &mut ByteReader<'_>) -> Result<Option<Symbol>> {
        let start = r.position();
        let Some(first) = r.peek() else {
            return Ok(None);
        };
        let name = match SegmentClass::classify(first) {
            SegmentClass::ExtendedSymbol => {
                r.skip(1)?;
                let len_offset = r.position();
                let len = usize::from(r.get8()?);
                if len > Symbol::MAX_LEN {
                    warn!(offset = len_offset, len, "symbol length exceeds tag capacity");
                    return Err(SegmentError::MalformedLength {
                        offset: len_offset,
                        what: "symbol",
                        len,
                        capacity: Symbol::MAX_LEN,
                    });
                }
                r.take(len)?
            }
            SegmentClass::Symbolic { len: 0 } => {
                warn!(offset = start, "unsupported extended symbolic segment");
                return Err(SegmentError::UnsupportedEncoding {
                    offset: start,
                    what: "extended symbolic segment",
                    value: first,
                });
            }
            SegmentClass::Symbolic { len } => {
                r.skip(1)?;
                r.take(usize::from(len))?
            }
            _ => return Ok(None),
        };
        let tag = Symbol::from_bytes(name)?;
        r.align_from(start)?;
        Ok(Some(tag))
    }

    fn read_symbolic_tail(&self, r: &mut ByteReader<'_>, tag: Symbol) -> Result<SymbolicPath> {
        let mut path = SymbolicPath::new(tag);
        if let Some((LogicalType::ConnectionPoint, format)) = Self::peek_logical(r) {
            path.conn_pt = Some(self.read_value(r, format)?);
        }
        while path.members.len() < MAX_MEMBERS {
            match Self::peek_logical(r) {
                Some((LogicalType::MemberId, format)) => {
                    let value = self.read_value(r, format)?;
                    path.members.push(value)?;
                }
                _ => break,
            }
        }
        Ok(path)
    }

    /// Returns the path and the last field consumed, if any.
    fn read_logical(&self, r: &mut ByteReader<'_>) -> Result<(LogicalPath, Option<LogicalField>)> {
        let mut path = LogicalPath::new();
        let mut last: Option<LogicalField> = None;
        while let Some((kind, format)) = Self::peek_logical(r) {
            let Some(next) = LogicalField::from_logical_type(kind) else {
                break;
            };
            if path.class() == Some(ASSEMBLY_CLASS_ID)
                && last == Some(LogicalField::Instance)
                && next == LogicalField::ConnPt
            {
                trace!(offset = r.position(), "assembly path ends before connection point");
                break;
            }
            if last.is_some_and(|l| next <= l) {
                break;
            }
            let value = self.read_value(r, format)?;
            path.set(next, value);
            last = Some(next);
        }
        Ok((path, last))
    }
}
