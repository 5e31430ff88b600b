use bacport_core::types::{ObjectType, TagValue};

/// A present value, typed by the kind of point it belongs to.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PresentValue {
    Analog(f32),
    Binary(bool),
}

impl PresentValue {
    /// The wire form of this value: a real for analog points, enumerated
    /// 0/1 for binary ones.
    pub const fn to_tag_value(self) -> TagValue<'static> {
        match self {
            Self::Analog(v) => TagValue::Real(v),
            Self::Binary(v) => TagValue::from_bool(v),
        }
    }

    /// Interprets a decoded wire value against the object kind it was read
    /// from. `None` when the tag does not fit the kind, such as an
    /// enumerated answer to an analog read.
    pub fn decode_for(object_type: ObjectType, value: TagValue<'_>) -> Option<Self> {
        if object_type.is_analog() {
            value.as_f32().map(Self::Analog)
        } else if object_type.is_binary() {
            value.as_bool().map(Self::Binary)
        } else {
            None
        }
    }
}

/// Outcome of a present-value read.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PropertyValue {
    pub object_type: ObjectType,
    pub instance: u32,
    /// `None` when every attempt timed out or the reply carried no usable
    /// payload.
    pub value: Option<PresentValue>,
}

impl PropertyValue {
    pub const fn unread(object_type: ObjectType, instance: u32) -> Self {
        Self {
            object_type,
            instance,
            value: None,
        }
    }
}
