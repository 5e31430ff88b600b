/// Confirmed-request header and the acks that answer it.
pub mod confirmed;
/// APDU type discriminant.
pub mod pdu;
/// Unconfirmed-request header.
pub mod unconfirmed;

pub use confirmed::{ComplexAckHeader, ConfirmedRequestHeader, SimpleAck, MAX_APDU_1476};
pub use pdu::ApduType;
pub use unconfirmed::UnconfirmedRequestHeader;
