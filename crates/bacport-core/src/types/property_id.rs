/// BACnet property identifiers the engine reads and writes.
///
/// `PresentValue` is the working property of every point; `OutOfService`
/// backs the write fallback. Identifiers outside the pair survive decoding
/// as [`Other`](Self::Other).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PropertyId {
    PresentValue,
    OutOfService,
    Other(u32),
}

impl PropertyId {
    pub const fn to_u32(self) -> u32 {
        match self {
            Self::PresentValue => 85,
            Self::OutOfService => 81,
            Self::Other(v) => v,
        }
    }

    pub const fn from_u32(value: u32) -> Self {
        match value {
            85 => Self::PresentValue,
            81 => Self::OutOfService,
            v => Self::Other(v),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::PropertyId;

    #[test]
    fn standard_numbers() {
        assert_eq!(PropertyId::PresentValue.to_u32(), 85);
        assert_eq!(PropertyId::OutOfService.to_u32(), 81);
        assert_eq!(PropertyId::from_u32(85), PropertyId::PresentValue);
    }

    #[test]
    fn wide_identifiers_roundtrip() {
        let p = PropertyId::from_u32(3000);
        assert_eq!(p, PropertyId::Other(3000));
        assert_eq!(PropertyId::from_u32(p.to_u32()), p);
    }
}
