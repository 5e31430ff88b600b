use bacport_core::EncodeError;
use bacport_datalink::DataLinkError;

/// Faults that abort a client call outright.
///
/// A device that stays silent or answers with something unusable is not an
/// error here: those outcomes surface as `false` booleans or `None` values,
/// so callers can tell a dead point from a broken network.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("transport error: {0}")]
    Transport(#[from] DataLinkError),

    #[error("encode error: {0}")]
    Encode(#[from] EncodeError),

    /// The [`Device`](crate::Device) record carries no IP endpoint to send to.
    #[error("device has no IP endpoint")]
    DeviceUnreachable,

    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
}
