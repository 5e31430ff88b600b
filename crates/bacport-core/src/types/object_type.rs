/// The BACnet object types this client engine addresses.
///
/// Four point kinds carry readable/writable present values; `Device` shows
/// up in I-Am object identifiers. Everything else decodes as
/// [`Other`](Self::Other) so a received identifier always has a
/// representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ObjectType {
    AnalogInput,
    AnalogValue,
    BinaryInput,
    BinaryValue,
    Device,
    Other(u16),
}

impl ObjectType {
    /// Numeric identifier used in packed object ids (10 bits).
    pub const fn to_u16(self) -> u16 {
        match self {
            Self::AnalogInput => 0,
            Self::AnalogValue => 2,
            Self::BinaryInput => 3,
            Self::BinaryValue => 5,
            Self::Device => 8,
            Self::Other(v) => v,
        }
    }

    pub const fn from_u16(value: u16) -> Self {
        match value {
            0 => Self::AnalogInput,
            2 => Self::AnalogValue,
            3 => Self::BinaryInput,
            5 => Self::BinaryValue,
            8 => Self::Device,
            v => Self::Other(v),
        }
    }

    /// Whether present-value for this object kind is a real (as opposed to
    /// the enumerated 0/1 of binary objects).
    pub const fn is_analog(self) -> bool {
        matches!(self, Self::AnalogInput | Self::AnalogValue)
    }

    pub const fn is_binary(self) -> bool {
        matches!(self, Self::BinaryInput | Self::BinaryValue)
    }
}
