use crate::apdu::UnconfirmedRequestHeader;
use crate::encoding::{reader::Reader, writer::Writer};
use crate::types::{ObjectId, TagValue};
use crate::{DecodeError, EncodeError};

pub const SERVICE_I_AM: u8 = 0x00;

/// I-Am, the unsolicited answer to a Who-Is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IAmRequest {
    pub device_id: ObjectId,
    pub max_apdu: u32,
    /// Segmentation-supported enumeration (3 = no segmentation).
    pub segmentation: u32,
    pub vendor_id: u32,
}

impl IAmRequest {
    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        UnconfirmedRequestHeader::new(SERVICE_I_AM).encode(w)?;
        TagValue::ObjectId(self.device_id).encode(w)?;
        TagValue::Unsigned(self.max_apdu).encode(w)?;
        TagValue::Enumerated(self.segmentation).encode(w)?;
        TagValue::Unsigned(self.vendor_id).encode(w)
    }

    pub fn decode_after_header(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let device_id = Self::decode_device_id(r)?;
        let max_apdu = match TagValue::decode(r)? {
            TagValue::Unsigned(v) => v,
            _ => return Err(DecodeError::InvalidTag),
        };
        let segmentation = match TagValue::decode(r)? {
            TagValue::Enumerated(v) => v,
            _ => return Err(DecodeError::InvalidTag),
        };
        let vendor_id = match TagValue::decode(r)? {
            TagValue::Unsigned(v) => v,
            _ => return Err(DecodeError::InvalidTag),
        };
        Ok(Self {
            device_id,
            max_apdu,
            segmentation,
            vendor_id,
        })
    }

    /// Pulls just the leading device identifier and leaves the rest of
    /// the body unread. Discovery keys devices on this field alone, so a
    /// peer with an odd tail still gets registered.
    pub fn decode_device_id(r: &mut Reader<'_>) -> Result<ObjectId, DecodeError> {
        match TagValue::decode(r)? {
            TagValue::ObjectId(id) => Ok(id),
            _ => Err(DecodeError::InvalidTag),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::IAmRequest;
    use crate::apdu::UnconfirmedRequestHeader;
    use crate::encoding::{reader::Reader, writer::Writer};
    use crate::types::{ObjectId, ObjectType};

    fn sample() -> IAmRequest {
        IAmRequest {
            device_id: ObjectId::new(ObjectType::Device, 1234),
            max_apdu: 1476,
            segmentation: 3,
            vendor_id: 260,
        }
    }

    #[test]
    fn i_am_body_bytes() {
        let mut buf = [0u8; 32];
        let mut w = Writer::new(&mut buf);
        sample().encode(&mut w).unwrap();
        assert_eq!(
            w.as_written(),
            &[
                0x10, 0x00, // unconfirmed I-Am
                0xC4, 0x02, 0x00, 0x04, 0xD2, // device,1234
                0x22, 0x05, 0xC4, // max-APDU 1476
                0x91, 0x03, // no segmentation
                0x22, 0x01, 0x04, // vendor 260
            ]
        );
    }

    #[test]
    fn body_roundtrips() {
        let mut buf = [0u8; 32];
        let mut w = Writer::new(&mut buf);
        sample().encode(&mut w).unwrap();

        let mut r = Reader::new(w.as_written());
        UnconfirmedRequestHeader::decode(&mut r).unwrap();
        assert_eq!(IAmRequest::decode_after_header(&mut r).unwrap(), sample());
    }

    #[test]
    fn device_id_reads_without_the_tail() {
        // Device identifier followed by a truncated max-APDU field.
        let mut r = Reader::new(&[0xC4, 0x02, 0x00, 0x04, 0xD2, 0x22]);
        let id = IAmRequest::decode_device_id(&mut r).unwrap();
        assert_eq!(id.instance(), 1234);
        assert_eq!(id.object_type(), ObjectType::Device);
    }
}
