use crate::apdu::ConfirmedRequestHeader;
use crate::encoding::{
    primitives::{
        decode_unsigned, encode_closing_tag, encode_ctx_object_id, encode_ctx_unsigned,
        encode_opening_tag,
    },
    reader::Reader,
    tag::Tag,
    writer::Writer,
};
use crate::types::{ObjectId, PropertyId, TagValue};
use crate::{DecodeError, EncodeError};

pub const SERVICE_READ_PROPERTY: u8 = 0x0C;

/// ReadProperty confirmed request. Requests only encode; a client never
/// parses one off the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReadPropertyRequest {
    pub object_id: ObjectId,
    pub property_id: PropertyId,
    pub array_index: Option<u32>,
    pub invoke_id: u8,
}

impl ReadPropertyRequest {
    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        ConfirmedRequestHeader::new(self.invoke_id, SERVICE_READ_PROPERTY).encode(w)?;
        encode_ctx_object_id(w, 0, self.object_id.raw())?;
        encode_ctx_unsigned(w, 1, self.property_id.to_u32())?;
        if let Some(idx) = self.array_index {
            encode_ctx_unsigned(w, 2, idx)?;
        }
        Ok(())
    }
}

/// Body of a ReadProperty Complex-ACK: the echoed request fields and the
/// property value between opening and closing tag 3.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReadPropertyAck<'a> {
    pub object_id: ObjectId,
    pub property_id: PropertyId,
    pub array_index: Option<u32>,
    pub value: TagValue<'a>,
}

impl<'a> ReadPropertyAck<'a> {
    pub fn decode_after_header(r: &mut Reader<'a>) -> Result<Self, DecodeError> {
        let object_id = match Tag::decode(r)? {
            Tag::Context { tag_num: 0, len } => {
                ObjectId::from_raw(decode_unsigned(r, len as usize)?)
            }
            _ => return Err(DecodeError::InvalidTag),
        };

        let property_id = match Tag::decode(r)? {
            Tag::Context { tag_num: 1, len } => {
                PropertyId::from_u32(decode_unsigned(r, len as usize)?)
            }
            _ => return Err(DecodeError::InvalidTag),
        };

        let next = Tag::decode(r)?;
        let (array_index, value_open) = match next {
            Tag::Context { tag_num: 2, len } => {
                let idx = decode_unsigned(r, len as usize)?;
                (Some(idx), Tag::decode(r)?)
            }
            other => (None, other),
        };
        if value_open != (Tag::Opening { tag_num: 3 }) {
            return Err(DecodeError::InvalidTag);
        }
        let value = TagValue::decode(r)?;
        match Tag::decode(r)? {
            Tag::Closing { tag_num: 3 } => {}
            _ => return Err(DecodeError::InvalidTag),
        }

        Ok(Self {
            object_id,
            property_id,
            array_index,
            value,
        })
    }

    pub fn encode_after_header(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        encode_ctx_object_id(w, 0, self.object_id.raw())?;
        encode_ctx_unsigned(w, 1, self.property_id.to_u32())?;
        if let Some(idx) = self.array_index {
            encode_ctx_unsigned(w, 2, idx)?;
        }
        encode_opening_tag(w, 3)?;
        self.value.encode(w)?;
        encode_closing_tag(w, 3)
    }
}

#[cfg(test)]
mod tests {
    use super::{ReadPropertyAck, ReadPropertyRequest};
    use crate::encoding::{reader::Reader, writer::Writer};
    use crate::types::{ObjectId, ObjectType, PropertyId, TagValue};
    use crate::DecodeError;

    #[test]
    fn present_value_request_bytes() {
        let req = ReadPropertyRequest {
            object_id: ObjectId::new(ObjectType::AnalogValue, 2),
            property_id: PropertyId::PresentValue,
            array_index: None,
            invoke_id: 0x11,
        };
        let mut buf = [0u8; 32];
        let mut w = Writer::new(&mut buf);
        req.encode(&mut w).unwrap();
        assert_eq!(
            w.as_written(),
            &[0x00, 0x05, 0x11, 0x0C, 0x0C, 0x00, 0x80, 0x00, 0x02, 0x19, 0x55]
        );
    }

    #[test]
    fn analog_ack_decodes_real_ten() {
        // AnalogValue 2, present-value, real 10.0 wrapped in tag 3.
        let body = [
            0x0C, 0x00, 0x80, 0x00, 0x02, 0x19, 0x55, 0x3E, 0x44, 0x41, 0x20, 0x00, 0x00, 0x3F,
        ];
        let mut r = Reader::new(&body);
        let ack = ReadPropertyAck::decode_after_header(&mut r).unwrap();
        assert_eq!(ack.object_id.instance(), 2);
        assert_eq!(ack.property_id, PropertyId::PresentValue);
        assert_eq!(ack.value.as_f32(), Some(10.0));
        assert!(r.is_empty());
    }

    #[test]
    fn ack_roundtrips_with_array_index() {
        let ack = ReadPropertyAck {
            object_id: ObjectId::new(ObjectType::BinaryValue, 7),
            property_id: PropertyId::PresentValue,
            array_index: Some(1),
            value: TagValue::Enumerated(1),
        };
        let mut buf = [0u8; 32];
        let mut w = Writer::new(&mut buf);
        ack.encode_after_header(&mut w).unwrap();

        let mut r = Reader::new(w.as_written());
        assert_eq!(ReadPropertyAck::decode_after_header(&mut r).unwrap(), ack);
    }

    #[test]
    fn ack_without_value_delimiters_is_rejected() {
        // Value follows the property id with no opening tag 3.
        let body = [0x0C, 0x00, 0x80, 0x00, 0x02, 0x19, 0x55, 0x44, 0x41, 0x20, 0x00, 0x00];
        let mut r = Reader::new(&body);
        assert_eq!(
            ReadPropertyAck::decode_after_header(&mut r).unwrap_err(),
            DecodeError::InvalidTag
        );
    }
}
