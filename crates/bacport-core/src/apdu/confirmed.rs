use crate::apdu::ApduType;
use crate::encoding::{reader::Reader, writer::Writer};
use crate::{DecodeError, EncodeError};

/// Max-APDU code for 1476-octet APDUs, the size every request advertises.
pub const MAX_APDU_1476: u8 = 0x05;

const SEGMENTED_BIT: u8 = 0b0000_1000;

/// Header of a Confirmed-Request APDU.
///
/// Requests are always sent unsegmented, so the header is the fixed
/// four-octet form: type octet, max-segments/max-APDU octet (the segments
/// nibble stays zero), invoke ID, service choice. Segmented peers are out
/// of scope and their PDUs decode as [`DecodeError::Unsupported`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConfirmedRequestHeader {
    /// Max-APDU code in the low nibble of the second octet.
    pub max_apdu: u8,
    pub invoke_id: u8,
    pub service_choice: u8,
}

impl ConfirmedRequestHeader {
    pub const fn new(invoke_id: u8, service_choice: u8) -> Self {
        Self {
            max_apdu: MAX_APDU_1476,
            invoke_id,
            service_choice,
        }
    }

    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        if self.max_apdu > 0x0F {
            return Err(EncodeError::ValueOutOfRange);
        }
        w.write_u8((ApduType::ConfirmedRequest as u8) << 4)?;
        w.write_u8(self.max_apdu)?;
        w.write_u8(self.invoke_id)?;
        w.write_u8(self.service_choice)
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let b0 = r.read_u8()?;
        if (b0 >> 4) != ApduType::ConfirmedRequest as u8 {
            return Err(DecodeError::InvalidValue);
        }
        if (b0 & SEGMENTED_BIT) != 0 {
            return Err(DecodeError::Unsupported);
        }
        let max_apdu = r.read_u8()? & 0x0F;
        Ok(Self {
            max_apdu,
            invoke_id: r.read_u8()?,
            service_choice: r.read_u8()?,
        })
    }
}

/// A Simple-ACK APDU, the entire success reply to a WriteProperty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SimpleAck {
    pub invoke_id: u8,
    pub service_choice: u8,
}

impl SimpleAck {
    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        w.write_u8((ApduType::SimpleAck as u8) << 4)?;
        w.write_u8(self.invoke_id)?;
        w.write_u8(self.service_choice)
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let b0 = r.read_u8()?;
        if (b0 >> 4) != ApduType::SimpleAck as u8 {
            return Err(DecodeError::InvalidValue);
        }
        Ok(Self {
            invoke_id: r.read_u8()?,
            service_choice: r.read_u8()?,
        })
    }
}

/// Header of a Complex-ACK APDU, followed by the service ack body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ComplexAckHeader {
    pub invoke_id: u8,
    pub service_choice: u8,
}

impl ComplexAckHeader {
    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        w.write_u8((ApduType::ComplexAck as u8) << 4)?;
        w.write_u8(self.invoke_id)?;
        w.write_u8(self.service_choice)
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let b0 = r.read_u8()?;
        if (b0 >> 4) != ApduType::ComplexAck as u8 {
            return Err(DecodeError::InvalidValue);
        }
        if (b0 & SEGMENTED_BIT) != 0 {
            return Err(DecodeError::Unsupported);
        }
        Ok(Self {
            invoke_id: r.read_u8()?,
            service_choice: r.read_u8()?,
        })
    }
}
