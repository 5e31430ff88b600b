use crate::encoding::{
    primitives::{decode_unsigned, encode_unsigned},
    reader::Reader,
    writer::Writer,
};
use crate::types::ObjectId;
use crate::{DecodeError, EncodeError};

/// An application-tagged value, as carried in present-value reads and
/// writes.
///
/// The codec speaks exactly the tag octets fielded controllers emit for
/// present values, dispatching on the literal first byte
/// (`0x00`, `0x21`..`0x24`, `0x44`, `0x65`, `0x75`, `0x91`, `0xC4`).
/// Octet and character strings always use the one-octet extended length
/// form, so payloads are limited to what a single length octet can
/// describe. Binary present values travel as `Enumerated` 0/1, not as the
/// BACnet boolean tag; [`TagValue::from_bool`] captures that convention.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TagValue<'a> {
    Null,
    Unsigned(u32),
    Real(f32),
    OctetString(&'a [u8]),
    CharacterString(&'a str),
    /// Single-octet enumerated; values above 255 do not encode.
    Enumerated(u32),
    ObjectId(ObjectId),
}

/// Longest octet-string payload one length octet can carry (254 and 255
/// introduce wider length fields this codec does not speak).
const MAX_OCTET_PAYLOAD: usize = 253;
/// Character strings additionally spend one octet on the charset marker.
const MAX_CHAR_PAYLOAD: usize = MAX_OCTET_PAYLOAD - 1;
/// Charset octet for ANSI X3.4 / UTF-8 text.
const CHARSET_ANSI: u8 = 0;

impl<'a> TagValue<'a> {
    /// The enumerated 0/1 encoding used for binary present values.
    pub const fn from_bool(value: bool) -> Self {
        Self::Enumerated(value as u32)
    }

    pub const fn as_f32(&self) -> Option<f32> {
        match self {
            Self::Real(v) => Some(*v),
            _ => None,
        }
    }

    /// Reads an enumerated as a binary state. Only the exact value 1 is
    /// active, mirroring how binary present values are interpreted.
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Enumerated(v) => Some(*v == 1),
            _ => None,
        }
    }

    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        match self {
            Self::Null => w.write_u8(0x00),
            Self::Unsigned(v) => {
                let mut scratch = [0u8; 4];
                let mut sw = Writer::new(&mut scratch);
                let len = encode_unsigned(&mut sw, *v)?;
                w.write_u8(0x20 | len as u8)?;
                w.write_all(&scratch[..len])
            }
            Self::Real(v) => {
                w.write_u8(0x44)?;
                w.write_be_f32(*v)
            }
            Self::OctetString(v) => {
                if v.len() > MAX_OCTET_PAYLOAD {
                    return Err(EncodeError::ValueOutOfRange);
                }
                w.write_u8(0x65)?;
                w.write_u8(v.len() as u8)?;
                w.write_all(v)
            }
            Self::CharacterString(v) => {
                let bytes = v.as_bytes();
                if bytes.len() > MAX_CHAR_PAYLOAD {
                    return Err(EncodeError::ValueOutOfRange);
                }
                w.write_u8(0x75)?;
                w.write_u8(bytes.len() as u8 + 1)?;
                w.write_u8(CHARSET_ANSI)?;
                w.write_all(bytes)
            }
            Self::Enumerated(v) => {
                if *v > 0xFF {
                    return Err(EncodeError::ValueOutOfRange);
                }
                w.write_u8(0x91)?;
                w.write_u8(*v as u8)
            }
            Self::ObjectId(id) => {
                w.write_u8(0xC4)?;
                w.write_be_u32(id.raw())
            }
        }
    }

    pub fn decode(r: &mut Reader<'a>) -> Result<Self, DecodeError> {
        let first = r.read_u8()?;
        match first {
            0x00 => Ok(Self::Null),
            0x21..=0x24 => {
                let len = (first & 0x07) as usize;
                Ok(Self::Unsigned(decode_unsigned(r, len)?))
            }
            0x44 => Ok(Self::Real(r.read_be_f32()?)),
            0x65 => {
                let len = r.read_u8()? as usize;
                if len > MAX_OCTET_PAYLOAD {
                    return Err(DecodeError::Unsupported);
                }
                Ok(Self::OctetString(r.read_exact(len)?))
            }
            0x75 => {
                let len = r.read_u8()? as usize;
                if len == 0 {
                    return Err(DecodeError::InvalidLength);
                }
                if len > MAX_OCTET_PAYLOAD {
                    return Err(DecodeError::Unsupported);
                }
                let raw = r.read_exact(len)?;
                if raw[0] != CHARSET_ANSI {
                    return Err(DecodeError::Unsupported);
                }
                let text = core::str::from_utf8(&raw[1..]).map_err(|_| DecodeError::InvalidValue)?;
                Ok(Self::CharacterString(text))
            }
            0x91 => Ok(Self::Enumerated(r.read_u8()? as u32)),
            0xC4 => Ok(Self::ObjectId(ObjectId::from_raw(r.read_be_u32()?))),
            _ => Err(DecodeError::Unsupported),
        }
    }
}
