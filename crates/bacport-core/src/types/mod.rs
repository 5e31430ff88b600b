//! Core BACnet data types shared by the service and network layers.

pub mod object_id;
pub mod object_type;
pub mod property_id;
pub mod tag_value;

pub use object_id::ObjectId;
pub use object_type::ObjectType;
pub use property_id::PropertyId;
pub use tag_value::TagValue;
