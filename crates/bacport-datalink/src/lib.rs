//! BACnet/IP data link: BVLC framing over UDP.
//!
//! A client needs two sockets. Confirmed requests leave from an
//! ephemeral-port socket and their acks come back to that same port;
//! broadcast traffic (Who-Is out, I-Am in) moves through a second socket
//! bound to the BACnet/IP port. [`BacnetIpTransport`] owns both and the
//! subnet broadcast address picked from the host interfaces, and the
//! [`DataLink`] trait abstracts the pair so an engine can run against a
//! scripted transport in tests.

#![allow(async_fn_in_trait)]

pub mod broadcast;
pub mod bvlc;
pub mod traits;
pub mod transport;

pub use bvlc::{BvlcFunction, BvlcHeader, BVLC_TYPE_BIP};
pub use traits::{DataLink, DataLinkError};
pub use transport::{BacnetIpTransport, BACNET_IP_PORT, MAX_BIP_FRAME_LEN};
