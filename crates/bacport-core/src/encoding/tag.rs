use crate::encoding::{reader::Reader, writer::Writer};
use crate::{DecodeError, EncodeError};

/// Application tag numbers this engine speaks.
///
/// This is a deliberately narrow subset of the BACnet application tags:
/// exactly the kinds a present-value client exchanges. Frames using other
/// tag numbers decode to [`DecodeError::InvalidTag`] and are treated as
/// noise by the layers above.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AppTag {
    Null = 0,
    UnsignedInt = 2,
    Real = 4,
    OctetString = 6,
    CharacterString = 7,
    Enumerated = 9,
    ObjectId = 12,
}

impl AppTag {
    pub fn from_u8(value: u8) -> Result<Self, DecodeError> {
        match value {
            0 => Ok(Self::Null),
            2 => Ok(Self::UnsignedInt),
            4 => Ok(Self::Real),
            6 => Ok(Self::OctetString),
            7 => Ok(Self::CharacterString),
            9 => Ok(Self::Enumerated),
            12 => Ok(Self::ObjectId),
            _ => Err(DecodeError::InvalidTag),
        }
    }
}

/// A parsed BACnet tag octet (plus its length extension, when present).
///
/// Payload bytes are not consumed here; callers read `len` bytes after a
/// `Application`/`Context` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Application { tag: AppTag, len: u32 },
    Context { tag_num: u8, len: u32 },
    Opening { tag_num: u8 },
    Closing { tag_num: u8 },
}

impl Tag {
    pub fn encode(self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        match self {
            Tag::Application { tag, len } => encode_tag_octet(w, tag as u8, false, len),
            Tag::Context { tag_num, len } => encode_tag_octet(w, tag_num, true, len),
            Tag::Opening { tag_num } => encode_delimiter(w, tag_num, 6),
            Tag::Closing { tag_num } => encode_delimiter(w, tag_num, 7),
        }
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let octet = r.read_u8()?;
        let tag_num = octet >> 4;
        if tag_num == 0x0F {
            // Extended tag numbers never occur in the frames this engine
            // exchanges.
            return Err(DecodeError::Unsupported);
        }
        let is_context = (octet & 0x08) != 0;
        let len_code = octet & 0x07;

        if is_context {
            match len_code {
                6 => return Ok(Tag::Opening { tag_num }),
                7 => return Ok(Tag::Closing { tag_num }),
                _ => {}
            }
        }

        let len = decode_len(r, len_code)?;
        if is_context {
            Ok(Tag::Context { tag_num, len })
        } else {
            Ok(Tag::Application {
                tag: AppTag::from_u8(tag_num)?,
                len,
            })
        }
    }
}

fn encode_tag_octet(
    w: &mut Writer<'_>,
    tag_num: u8,
    is_context: bool,
    len: u32,
) -> Result<(), EncodeError> {
    if tag_num > 14 {
        return Err(EncodeError::ValueOutOfRange);
    }
    let mut octet = tag_num << 4;
    if is_context {
        octet |= 0x08;
    }
    if len <= 4 {
        w.write_u8(octet | len as u8)
    } else if len <= 253 {
        // One extension octet carries the length. 254/255 introduce wider
        // length fields that nothing in this engine produces.
        w.write_u8(octet | 0x05)?;
        w.write_u8(len as u8)
    } else {
        Err(EncodeError::Unsupported)
    }
}

fn encode_delimiter(w: &mut Writer<'_>, tag_num: u8, code: u8) -> Result<(), EncodeError> {
    if tag_num > 14 {
        return Err(EncodeError::ValueOutOfRange);
    }
    w.write_u8((tag_num << 4) | 0x08 | code)
}

fn decode_len(r: &mut Reader<'_>, len_code: u8) -> Result<u32, DecodeError> {
    match len_code {
        0..=4 => Ok(len_code as u32),
        5 => {
            let v = r.read_u8()?;
            if v >= 254 {
                // Two- and four-octet length extensions are outside this
                // engine's frame set.
                return Err(DecodeError::Unsupported);
            }
            Ok(v as u32)
        }
        _ => Err(DecodeError::InvalidLength),
    }
}
