//! Port segment groups: routing port, electronic key and production inhibit time.
//!
//! These appear in connection paths and unconnected-send routes ahead of the
//! application path. A group is a run of the following segments in any order; the
//! first byte that is none of them ends the group.
//!
//! | Segment | Wire form |
//! |---------|-----------|
//! | Port | `000e pppp [size] [port:u16] link... [pad]` (`e` = extended link address, `pppp == 15` = 16-bit port) |
//! | Electronic key | `0x34 0x04 vendor:u16 device_type:u16 product_code:u16 major:u8 minor:u8` |
//! | PIT (ms) | `0x43 ms:u8` |
//! | PIT (us) | `0x51 words:u8 us:u16\|u32` |

use crate::buf::{ByteReader, ByteWriter};
use crate::error::{Result, SegmentError};
use crate::segment::{
    SegmentClass, ELECTRONIC_KEY_SEGMENT, NETWORK_SEGMENT_PIT_MSECS, NETWORK_SEGMENT_PIT_USECS,
};
use std::fmt;
use tracing::warn;

const PORT_EXTENDED_LINK_ADDRESS: u8 = 0x10;
const PORT_NUMBER_MASK: u8 = 0x0F;
const PORT_NUMBER_EXTENDED: u8 = 0x0F;

/// The only electronic key format this codec understands.
pub const ELECTRONIC_KEY_FORMAT: u8 = 4;

/// Routing port and the link address on that port.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct PortSegment {
    pub port: u16,
    pub link_address: Vec<u8>,
}

impl PortSegment {
    pub fn new(port: u16, link_address: impl Into<Vec<u8>>) -> Self {
        PortSegment {
            port,
            link_address: link_address.into(),
        }
    }

    /// Decode one port segment from the start of `input`.
    pub fn decode(input: &[u8]) -> Result<(PortSegment, usize)> {
        let mut r = ByteReader::new(input);
        let seg = PortSegment::read(&mut r)?;
        Ok((seg, r.position()))
    }

    fn read(r: &mut ByteReader<'_>) -> Result<PortSegment> {
        let start = r.position();
        let first = r.get8()?;
        let link_len = if first & PORT_EXTENDED_LINK_ADDRESS != 0 {
            usize::from(r.get8()?)
        } else {
            1
        };
        let port = if first & PORT_NUMBER_MASK == PORT_NUMBER_EXTENDED {
            r.get16()?
        } else {
            u16::from(first & PORT_NUMBER_MASK)
        };
        let link_address = r.take(link_len)?.to_vec();
        r.align_from(start)?;
        Ok(PortSegment { port, link_address })
    }

    pub fn encode(&self, out: &mut [u8]) -> Result<usize> {
        let mut w = ByteWriter::new();
        self.write(&mut w)?;
        w.copy_to(out)
    }

    fn write(&self, w: &mut ByteWriter) -> Result<()> {
        let start = w.len();
        let extended_link = self.link_address.len() != 1;
        if self.link_address.len() > usize::from(u8::MAX) {
            return Err(SegmentError::Capacity {
                what: "link address",
                len: self.link_address.len(),
                capacity: usize::from(u8::MAX),
            });
        }
        let mut first = if self.port < u16::from(PORT_NUMBER_EXTENDED) {
            self.port as u8
        } else {
            PORT_NUMBER_EXTENDED
        };
        if extended_link {
            first |= PORT_EXTENDED_LINK_ADDRESS;
        }
        w.put8(first);
        if extended_link {
            w.put8(self.link_address.len() as u8);
        }
        if first & PORT_NUMBER_MASK == PORT_NUMBER_EXTENDED {
            w.put16(self.port);
        }
        w.append(&self.link_address);
        w.align_from(start);
        Ok(())
    }
}

/// Device identity a connection originator expects of the target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ElectronicKey {
    pub vendor_id: u16,
    pub device_type: u16,
    pub product_code: u16,
    pub major_revision: u8,
    pub minor_revision: u8,
}

impl ElectronicKey {
    fn read(r: &mut ByteReader<'_>) -> Result<ElectronicKey> {
        r.skip(1)?;
        let format_offset = r.position();
        let format = r.get8()?;
        if format != ELECTRONIC_KEY_FORMAT {
            warn!(offset = format_offset, format, "unknown electronic key format");
            return Err(SegmentError::UnsupportedEncoding {
                offset: format_offset,
                what: "electronic key format",
                value: format,
            });
        }
        Ok(ElectronicKey {
            vendor_id: r.get16()?,
            device_type: r.get16()?,
            product_code: r.get16()?,
            major_revision: r.get8()?,
            minor_revision: r.get8()?,
        })
    }

    fn write(&self, w: &mut ByteWriter) {
        w.put8(ELECTRONIC_KEY_SEGMENT);
        w.put8(ELECTRONIC_KEY_FORMAT);
        w.put16(self.vendor_id);
        w.put16(self.device_type);
        w.put16(self.product_code);
        w.put8(self.major_revision);
        w.put8(self.minor_revision);
    }
}

bitflags::bitflags! {
    /// Members present in a [`PortSegmentGroup`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PortGroupFields: u8 {
        const PORT = 1 << 0;
        const KEY = 1 << 1;
        const PIT = 1 << 2;
    }
}

/// Port, electronic key and production inhibit time decoded from one segment run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct PortSegmentGroup {
    pub port: Option<PortSegment>,
    pub key: Option<ElectronicKey>,
    pit_usecs: Option<u32>,
}

impl PortSegmentGroup {
    pub fn new() -> Self {
        PortSegmentGroup::default()
    }

    /// Production inhibit time in microseconds.
    pub fn pit_usecs(&self) -> Option<u32> {
        self.pit_usecs
    }

    /// Production inhibit time in whole milliseconds.
    pub fn pit_msecs(&self) -> Option<u32> {
        self.pit_usecs.map(|us| us / 1000)
    }

    pub fn set_pit_usecs(&mut self, usecs: u32) {
        self.pit_usecs = Some(usecs);
    }

    pub fn set_pit_msecs(&mut self, msecs: u32) {
        self.pit_usecs = Some(msecs.saturating_mul(1000));
    }

    pub fn clear_pit(&mut self) {
        self.pit_usecs = None;
    }

    pub fn defined(&self) -> PortGroupFields {
        let mut set = PortGroupFields::empty();
        set.set(PortGroupFields::PORT, self.port.is_some());
        set.set(PortGroupFields::KEY, self.key.is_some());
        set.set(PortGroupFields::PIT, self.pit_usecs.is_some());
        set
    }

    pub fn is_empty(&self) -> bool {
        self.defined().is_empty()
    }

    /// Decode the run of group segments at the start of `input`.
    ///
    /// Stops at the first byte that is not a port, electronic key or PIT segment and
    /// returns the bytes consumed up to it. A segment repeated within the run
    /// overwrites the earlier one.
    pub fn decode(input: &[u8]) -> Result<(PortSegmentGroup, usize)> {
        let mut r = ByteReader::new(input);
        let mut group = PortSegmentGroup::new();
        while let Some(first) = r.peek() {
            match first {
                ELECTRONIC_KEY_SEGMENT => group.key = Some(ElectronicKey::read(&mut r)?),
                NETWORK_SEGMENT_PIT_MSECS => {
                    r.skip(1)?;
                    let msecs = r.get8()?;
                    group.set_pit_msecs(u32::from(msecs));
                }
                NETWORK_SEGMENT_PIT_USECS => {
                    r.skip(1)?;
                    let words_offset = r.position();
                    let usecs = match r.get8()? {
                        1 => u32::from(r.get16()?),
                        2 => r.get32()?,
                        words => {
                            warn!(offset = words_offset, words, "unknown PIT microseconds format");
                            return Err(SegmentError::UnsupportedEncoding {
                                offset: words_offset,
                                what: "production inhibit time word count",
                                value: words,
                            });
                        }
                    };
                    group.set_pit_usecs(usecs);
                }
                _ if SegmentClass::classify(first) == SegmentClass::Port => {
                    group.port = Some(PortSegment::read(&mut r)?);
                }
                _ => break,
            }
        }
        Ok((group, r.position()))
    }

    /// Encode port, key and PIT, in that order, into `out`.
    pub fn encode(&self, out: &mut [u8]) -> Result<usize> {
        let w = self.writer()?;
        w.copy_to(out)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(self.writer()?.into_inner())
    }

    fn writer(&self) -> Result<ByteWriter> {
        let mut w = ByteWriter::new();
        if let Some(port) = &self.port {
            port.write(&mut w)?;
        }
        if let Some(key) = &self.key {
            key.write(&mut w);
        }
        if let Some(usecs) = self.pit_usecs {
            if usecs % 1000 == 0 && usecs / 1000 <= u32::from(u8::MAX) {
                w.put8(NETWORK_SEGMENT_PIT_MSECS);
                w.put8((usecs / 1000) as u8);
            } else if let Ok(short) = u16::try_from(usecs) {
                w.put8(NETWORK_SEGMENT_PIT_USECS);
                w.put8(1);
                w.put16(short);
            } else {
                w.put8(NETWORK_SEGMENT_PIT_USECS);
                w.put8(2);
                w.put32(usecs);
            }
        }
        Ok(w)
    }
}

impl fmt::Display for PortSegmentGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut sep = "";
        if let Some(port) = &self.port {
            write!(f, "Port:{} Link:{}", port.port, hex::encode(&port.link_address))?;
            sep = " ";
        }
        if let Some(key) = &self.key {
            write!(
                f,
                "{}Key:{}/{}/{} Rev:{}.{}",
                sep,
                key.vendor_id,
                key.device_type,
                key.product_code,
                key.major_revision,
                key.minor_revision
            )?;
            sep = " ";
        }
        if let Some(usecs) = self.pit_usecs {
            write!(f, "{}PIT:{}us", sep, usecs)?;
        }
        Ok(())
    }
}
