use crate::apdu::UnconfirmedRequestHeader;
use crate::encoding::{
    primitives::{decode_unsigned, encode_ctx_unsigned_fixed},
    reader::Reader,
    tag::Tag,
    writer::Writer,
};
use crate::types::ObjectId;
use crate::{DecodeError, EncodeError};

pub const SERVICE_WHO_IS: u8 = 0x08;

/// Who-Is, optionally bounded to a device instance range.
///
/// Range limits always encode as fixed three-octet context values. Three
/// octets cover the whole instance space, so a targeted frame has one
/// shape no matter which instance is queried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WhoIsRequest {
    /// Inclusive (low, high) instance bounds; `None` asks every device.
    pub range: Option<(u32, u32)>,
}

impl WhoIsRequest {
    pub const fn global() -> Self {
        Self { range: None }
    }

    /// Asks exactly one device instance to identify itself.
    pub const fn for_instance(instance: u32) -> Self {
        Self {
            range: Some((instance, instance)),
        }
    }

    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        UnconfirmedRequestHeader::new(SERVICE_WHO_IS).encode(w)?;
        if let Some((low, high)) = self.range {
            if low > high || high > ObjectId::MAX_INSTANCE {
                return Err(EncodeError::ValueOutOfRange);
            }
            encode_ctx_unsigned_fixed(w, 0, low, 3)?;
            encode_ctx_unsigned_fixed(w, 1, high, 3)?;
        }
        Ok(())
    }

    /// Decodes the body after the unconfirmed header. Peers that encode
    /// minimal-width limits are accepted alongside the fixed form.
    pub fn decode_after_header(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        if r.is_empty() {
            return Ok(Self::global());
        }
        let low = match Tag::decode(r)? {
            Tag::Context { tag_num: 0, len } => decode_unsigned(r, len as usize)?,
            _ => return Err(DecodeError::InvalidTag),
        };
        let high = match Tag::decode(r)? {
            Tag::Context { tag_num: 1, len } => decode_unsigned(r, len as usize)?,
            _ => return Err(DecodeError::InvalidTag),
        };
        Ok(Self {
            range: Some((low, high)),
        })
    }
}
