//! # cip-epath: CIP path segment codec
//!
//! Encode and decode the segment grammar CIP uses to address objects and route
//! connections:
//!
//! - **Application paths** ([`AppPath`]): a symbolic tag with optional connection point
//!   and member subscripts, or a logical class / instance / attribute / connection
//!   point address. Decoding supports path inheritance across the services of one
//!   multi-service request, including the assembly-object boundary rule.
//! - **Port segment groups** ([`PortSegmentGroup`]): routing port + link address,
//!   electronic key, production inhibit time.
//! - **Simple data segments** ([`SimpleDataSegment`]).
//!
//! ## Decoding
//!
//! Every decoder takes a byte slice and returns the decoded value with the number of
//! bytes consumed. A byte that does not belong to the grammar at its position ends the
//! decode normally; malformed input fails with a [`SegmentError`] that names the
//! offending byte offset.
//!
//! ```
//! use cip_epath::AppPath;
//!
//! // Class 4, Instance 0x64, then a segment that is not part of a logical path.
//! let bytes = [0x20, 0x04, 0x24, 0x64, 0x80];
//! let (path, consumed) = AppPath::decode(&bytes, None).unwrap();
//! assert_eq!(consumed, 4);
//! assert_eq!(path.to_string(), "Class:4 Instance:100");
//! ```
//!
//! ## Encoding
//!
//! Values pick the narrowest 8/16/32-bit logical form. [`PathCodec`] selects packed
//! (default) or padded EPATH layout. Encoding into a slice that is too small fails
//! with [`SegmentError::BufferFull`] and writes nothing.
//!
//! ## Text form
//!
//! `Display` renders paths as `Class:4 Instance:1` or `Tag:Motor[2] ConnPt:1`, and
//! `AppPath: FromStr` parses that form back (see [`text`]).

pub mod buf;
pub mod data;
pub mod error;
pub mod path;
pub mod port;
pub mod segment;
pub mod symbol;
pub mod text;

pub use buf::{ByteReader, ByteWriter};
pub use data::SimpleDataSegment;
pub use error::{ErrorKind, SegmentError};
pub use path::{
    AppPath, ChainedPath, FieldSet, LogicalField, LogicalPath, PathCodec, PathField, SymbolicPath,
    MAX_MEMBERS,
};
pub use port::{ElectronicKey, PortGroupFields, PortSegment, PortSegmentGroup};
pub use segment::{EpathFormat, LogicalFormat, LogicalType, SegmentClass, ASSEMBLY_CLASS_ID};
pub use symbol::Symbol;
pub use text::{parse_app_path, PathSyntaxError};
