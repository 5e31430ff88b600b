use bacport_core::encoding::{reader::Reader, writer::Writer};
use bacport_core::{DecodeError, EncodeError};

pub const BVLC_TYPE_BIP: u8 = 0x81;

/// The two BVLC functions a non-foreign client sends and accepts.
///
/// Everything else (forwarded NPDUs, BBMD table management, foreign
/// device registration) belongs to BBMD deployments and decodes as
/// [`DecodeError::Unsupported`] so the transport can report the frame
/// instead of misreading it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BvlcFunction {
    OriginalUnicastNpdu,
    OriginalBroadcastNpdu,
}

impl BvlcFunction {
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0x0A => Some(Self::OriginalUnicastNpdu),
            0x0B => Some(Self::OriginalBroadcastNpdu),
            _ => None,
        }
    }

    pub const fn to_u8(self) -> u8 {
        match self {
            Self::OriginalUnicastNpdu => 0x0A,
            Self::OriginalBroadcastNpdu => 0x0B,
        }
    }
}

/// BVLC header: type octet, function octet, and the total frame length
/// including these four octets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BvlcHeader {
    pub function: BvlcFunction,
    pub length: u16,
}

impl BvlcHeader {
    /// Header for a frame carrying `payload_len` octets after it.
    pub fn for_payload(function: BvlcFunction, payload_len: usize) -> Result<Self, EncodeError> {
        let total = payload_len
            .checked_add(4)
            .filter(|len| *len <= usize::from(u16::MAX))
            .ok_or(EncodeError::InvalidLength)?;
        Ok(Self {
            function,
            length: total as u16,
        })
    }

    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        w.write_u8(BVLC_TYPE_BIP)?;
        w.write_u8(self.function.to_u8())?;
        w.write_be_u16(self.length)
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        if r.read_u8()? != BVLC_TYPE_BIP {
            return Err(DecodeError::InvalidValue);
        }
        let function = BvlcFunction::from_u8(r.read_u8()?).ok_or(DecodeError::Unsupported)?;
        let length = r.read_be_u16()?;
        if length < 4 {
            return Err(DecodeError::InvalidLength);
        }
        Ok(Self { function, length })
    }
}
