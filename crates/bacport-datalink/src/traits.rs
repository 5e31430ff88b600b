use std::net::SocketAddr;
use thiserror::Error;

/// Errors that can occur at the data-link layer.
#[derive(Debug, Error)]
pub enum DataLinkError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("frame too large")]
    FrameTooLarge,
    #[error("invalid frame")]
    InvalidFrame,
    #[error("unsupported BVLC function 0x{0:02x}")]
    UnsupportedBvlcFunction(u8),
}

/// Async trait over the socket pair a BACnet/IP client runs on.
///
/// `send_unicast`/`recv_unicast` carry confirmed transactions: a request
/// leaves for a specific peer and the matching ack arrives back on the
/// same socket. `send_broadcast`/`recv_broadcast` carry discovery.
/// Payloads are NPDU onward; implementations own the BVLC framing.
///
/// [`BacnetIpTransport`](crate::BacnetIpTransport) is the UDP
/// implementation; engine tests substitute scripted ones.
pub trait DataLink: Send + Sync {
    /// Sends `payload` to `to`, wrapped as an original-unicast NPDU.
    async fn send_unicast(&self, to: SocketAddr, payload: &[u8]) -> Result<(), DataLinkError>;

    /// Sends `payload` to the configured broadcast address, wrapped as an
    /// original-broadcast NPDU.
    async fn send_broadcast(&self, payload: &[u8]) -> Result<(), DataLinkError>;

    /// Receives one frame on the unicast socket, returning
    /// `(payload_len, source)` with the BVLC header stripped.
    async fn recv_unicast(&self, buf: &mut [u8]) -> Result<(usize, SocketAddr), DataLinkError>;

    /// Receives one frame on the broadcast socket, returning
    /// `(payload_len, source)` with the BVLC header stripped.
    async fn recv_broadcast(&self, buf: &mut [u8]) -> Result<(usize, SocketAddr), DataLinkError>;
}
