use crate::apdu::ConfirmedRequestHeader;
use crate::encoding::{
    primitives::{
        encode_closing_tag, encode_ctx_object_id, encode_ctx_unsigned, encode_opening_tag,
    },
    writer::Writer,
};
use crate::types::{ObjectId, PropertyId, TagValue};
use crate::EncodeError;

pub const SERVICE_WRITE_PROPERTY: u8 = 0x0F;

/// WriteProperty confirmed request.
///
/// The priority, when present, must sit in the BACnet command-priority
/// range 1..=16 and lands as the final context tag 4 of the request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WritePropertyRequest<'a> {
    pub object_id: ObjectId,
    pub property_id: PropertyId,
    pub value: TagValue<'a>,
    pub array_index: Option<u32>,
    pub priority: Option<u8>,
    pub invoke_id: u8,
}

impl<'a> WritePropertyRequest<'a> {
    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        if let Some(priority) = self.priority {
            if !(1..=16).contains(&priority) {
                return Err(EncodeError::ValueOutOfRange);
            }
        }

        ConfirmedRequestHeader::new(self.invoke_id, SERVICE_WRITE_PROPERTY).encode(w)?;
        encode_ctx_object_id(w, 0, self.object_id.raw())?;
        encode_ctx_unsigned(w, 1, self.property_id.to_u32())?;
        if let Some(idx) = self.array_index {
            encode_ctx_unsigned(w, 2, idx)?;
        }

        encode_opening_tag(w, 3)?;
        self.value.encode(w)?;
        encode_closing_tag(w, 3)?;

        if let Some(priority) = self.priority {
            encode_ctx_unsigned(w, 4, priority as u32)?;
        }
        Ok(())
    }
}
