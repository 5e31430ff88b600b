use crate::types::ObjectType;

/// A packed BACnet object identifier: 10 bits of object type over a 22-bit
/// instance number, as carried on the wire in one big-endian `u32`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ObjectId(u32);

impl ObjectId {
    /// Largest encodable instance number (22 bits).
    pub const MAX_INSTANCE: u32 = 0x3F_FFFF;

    /// Packs a type and instance. Instance bits above 22 are masked off,
    /// matching the wire field; callers that must reject wide instances
    /// validate against [`MAX_INSTANCE`](Self::MAX_INSTANCE) first.
    pub const fn new(object_type: ObjectType, instance: u32) -> Self {
        Self((((object_type.to_u16() as u32) & 0x03FF) << 22) | (instance & Self::MAX_INSTANCE))
    }

    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }

    pub const fn object_type(self) -> ObjectType {
        ObjectType::from_u16((self.0 >> 22) as u16)
    }

    pub const fn instance(self) -> u32 {
        self.0 & Self::MAX_INSTANCE
    }
}
