pub mod client;
pub mod device;
pub mod error;
pub mod value;

pub use client::{BacnetClient, ClientConfig, DEFAULT_WRITE_PRIORITY};
pub use device::{Device, DeviceProtocol};
pub use error::ClientError;
pub use value::{PresentValue, PropertyValue};
