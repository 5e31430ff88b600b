use crate::bvlc::{BvlcFunction, BvlcHeader};
use crate::{DataLink, DataLinkError};
use bacport_core::encoding::{reader::Reader, writer::Writer};
use bacport_core::DecodeError;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use tokio::net::UdpSocket;

/// Registered UDP port for BACnet/IP.
pub const BACNET_IP_PORT: u16 = 47808;

/// Largest BVLC frame the transport will build or accept.
pub const MAX_BIP_FRAME_LEN: usize = 1600;

/// BACnet/IP transport over a pair of UDP sockets.
///
/// Requests and their acks ride the `unicast` socket, which binds an
/// ephemeral port so each client instance gets its own reply path.
/// Broadcast traffic rides `broadcast_rx`, bound to the BACnet/IP port
/// where peers address their I-Ams. Both directions of BVLC framing
/// happen here; callers deal in NPDU-onward payloads.
#[derive(Debug, Clone)]
pub struct BacnetIpTransport {
    unicast: Arc<UdpSocket>,
    broadcast_rx: Arc<UdpSocket>,
    broadcast_target: SocketAddr,
}

impl BacnetIpTransport {
    /// Binds the request socket to an ephemeral port and the broadcast
    /// listener to the standard BACnet/IP port, targeting the subnet
    /// broadcast address of the host.
    pub async fn bind() -> Result<Self, DataLinkError> {
        let target = SocketAddr::new(
            IpAddr::V4(crate::broadcast::subnet_broadcast()),
            BACNET_IP_PORT,
        );
        Self::bind_to(
            SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 0),
            SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), BACNET_IP_PORT),
            target,
        )
        .await
    }

    /// Binds to explicit addresses. The broadcast listener and target
    /// normally share the BACnet/IP port; tests point all three at
    /// loopback.
    pub async fn bind_to(
        unicast_bind: SocketAddr,
        broadcast_bind: SocketAddr,
        broadcast_target: SocketAddr,
    ) -> Result<Self, DataLinkError> {
        let unicast = UdpSocket::bind(unicast_bind).await?;
        unicast.set_broadcast(true)?;
        let broadcast_rx = UdpSocket::bind(broadcast_bind).await?;
        broadcast_rx.set_broadcast(true)?;
        log::debug!(
            "bound unicast {} and broadcast listener {}, broadcasting to {}",
            unicast.local_addr()?,
            broadcast_rx.local_addr()?,
            broadcast_target
        );
        Ok(Self {
            unicast: Arc::new(unicast),
            broadcast_rx: Arc::new(broadcast_rx),
            broadcast_target,
        })
    }

    /// Local address of the unicast socket, the port acks come back to.
    pub fn local_addr(&self) -> Result<SocketAddr, DataLinkError> {
        self.unicast.local_addr().map_err(DataLinkError::Io)
    }

    pub fn broadcast_target(&self) -> SocketAddr {
        self.broadcast_target
    }

    async fn send_framed(
        &self,
        function: BvlcFunction,
        to: SocketAddr,
        payload: &[u8],
    ) -> Result<(), DataLinkError> {
        let header = BvlcHeader::for_payload(function, payload.len())
            .map_err(|_| DataLinkError::FrameTooLarge)?;
        let mut frame = [0u8; MAX_BIP_FRAME_LEN];
        if header.length as usize > frame.len() {
            return Err(DataLinkError::FrameTooLarge);
        }

        let mut w = Writer::new(&mut frame);
        header
            .encode(&mut w)
            .map_err(|_| DataLinkError::InvalidFrame)?;
        w.write_all(payload)
            .map_err(|_| DataLinkError::FrameTooLarge)?;

        self.unicast.send_to(w.as_written(), to).await?;
        log::trace!(
            "sent {function:?} frame of {} octets to {to}",
            header.length
        );
        Ok(())
    }

    async fn recv_framed(
        socket: &UdpSocket,
        buf: &mut [u8],
    ) -> Result<(usize, SocketAddr), DataLinkError> {
        let mut frame = [0u8; MAX_BIP_FRAME_LEN];
        let (n, src) = socket.recv_from(&mut frame).await?;

        let mut r = Reader::new(&frame[..n]);
        let header = match BvlcHeader::decode(&mut r) {
            Ok(header) => header,
            // The function octet was read, so it is present in the frame.
            Err(DecodeError::Unsupported) => {
                return Err(DataLinkError::UnsupportedBvlcFunction(frame[1]));
            }
            Err(_) => return Err(DataLinkError::InvalidFrame),
        };
        let payload = r
            .read_exact(header.length as usize - 4)
            .map_err(|_| DataLinkError::InvalidFrame)?;
        if payload.len() > buf.len() {
            return Err(DataLinkError::FrameTooLarge);
        }
        buf[..payload.len()].copy_from_slice(payload);
        log::trace!(
            "received {:?} frame of {} octets from {src}",
            header.function,
            header.length
        );
        Ok((payload.len(), src))
    }
}

impl DataLink for BacnetIpTransport {
    async fn send_unicast(&self, to: SocketAddr, payload: &[u8]) -> Result<(), DataLinkError> {
        self.send_framed(BvlcFunction::OriginalUnicastNpdu, to, payload)
            .await
    }

    async fn send_broadcast(&self, payload: &[u8]) -> Result<(), DataLinkError> {
        self.send_framed(
            BvlcFunction::OriginalBroadcastNpdu,
            self.broadcast_target,
            payload,
        )
        .await
    }

    async fn recv_unicast(&self, buf: &mut [u8]) -> Result<(usize, SocketAddr), DataLinkError> {
        Self::recv_framed(&self.unicast, buf).await
    }

    async fn recv_broadcast(&self, buf: &mut [u8]) -> Result<(usize, SocketAddr), DataLinkError> {
        Self::recv_framed(&self.broadcast_rx, buf).await
    }
}

#[cfg(test)]
mod tests {
    use super::BacnetIpTransport;
    use crate::{DataLink, DataLinkError, BVLC_TYPE_BIP};
    use std::net::{IpAddr, Ipv4Addr, SocketAddr};
    use tokio::net::UdpSocket;

    fn loopback() -> SocketAddr {
        SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 0)
    }

    async fn transport_with_peer() -> (BacnetIpTransport, UdpSocket) {
        let peer = UdpSocket::bind(loopback()).await.unwrap();
        let peer_addr = peer.local_addr().unwrap();
        let transport = BacnetIpTransport::bind_to(loopback(), loopback(), peer_addr)
            .await
            .unwrap();
        (transport, peer)
    }

    #[tokio::test]
    async fn unicast_sends_wrap_the_payload_in_bvlc() {
        let (transport, peer) = transport_with_peer().await;
        let peer_addr = peer.local_addr().unwrap();

        transport
            .send_unicast(peer_addr, &[0x01, 0x04, 0x00, 0x05, 0x01, 0x0C])
            .await
            .unwrap();

        let mut rx = [0u8; 64];
        let (n, _) = peer.recv_from(&mut rx).await.unwrap();
        assert_eq!(
            &rx[..n],
            &[0x81, 0x0A, 0x00, 0x0A, 0x01, 0x04, 0x00, 0x05, 0x01, 0x0C]
        );
    }

    #[tokio::test]
    async fn broadcast_sends_use_the_configured_target() {
        let (transport, peer) = transport_with_peer().await;

        transport.send_broadcast(&[0x01, 0x00, 0x10, 0x08]).await.unwrap();

        let mut rx = [0u8; 64];
        let (n, src) = peer.recv_from(&mut rx).await.unwrap();
        assert_eq!(src, transport.local_addr().unwrap());
        assert_eq!(&rx[..4], &[0x81, 0x0B, 0x00, 0x08]);
        assert_eq!(n, 8);
    }

    #[tokio::test]
    async fn recv_unicast_strips_the_header() {
        let (transport, peer) = transport_with_peer().await;
        let reply_to = transport.local_addr().unwrap();

        let frame = [0x81, 0x0A, 0x00, 0x09, 0x01, 0x00, 0x20, 0x2A, 0x0F];
        peer.send_to(&frame, reply_to).await.unwrap();

        let mut payload = [0u8; 64];
        let (n, src) = transport.recv_unicast(&mut payload).await.unwrap();
        assert_eq!(&payload[..n], &[0x01, 0x00, 0x20, 0x2A, 0x0F]);
        assert_eq!(src, peer.local_addr().unwrap());
    }

    #[tokio::test]
    async fn recv_broadcast_sees_frames_on_the_listener_port() {
        let peer = UdpSocket::bind(loopback()).await.unwrap();
        let transport = BacnetIpTransport::bind_to(loopback(), loopback(), loopback())
            .await
            .unwrap();
        // The broadcast listener is the second socket, not local_addr().
        let listener = transport.broadcast_rx.local_addr().unwrap();

        let frame = [0x81, 0x0B, 0x00, 0x06, 0x01, 0x00];
        peer.send_to(&frame, listener).await.unwrap();

        let mut payload = [0u8; 64];
        let (n, _) = transport.recv_broadcast(&mut payload).await.unwrap();
        assert_eq!(&payload[..n], &[0x01, 0x00]);
    }

    #[tokio::test]
    async fn bbmd_frames_surface_their_function_code() {
        let (transport, peer) = transport_with_peer().await;
        let reply_to = transport.local_addr().unwrap();

        // Forwarded-NPDU, a BBMD-only function.
        let frame = [0x81, 0x04, 0x00, 0x0A, 10, 1, 2, 3, 0xBA, 0xC0];
        peer.send_to(&frame, reply_to).await.unwrap();

        let mut payload = [0u8; 64];
        let err = transport.recv_unicast(&mut payload).await.unwrap_err();
        assert!(matches!(err, DataLinkError::UnsupportedBvlcFunction(0x04)));
    }

    #[tokio::test]
    async fn lying_length_field_is_invalid() {
        let (transport, peer) = transport_with_peer().await;
        let reply_to = transport.local_addr().unwrap();

        // Header claims 32 octets, datagram carries 6.
        let frame = [BVLC_TYPE_BIP, 0x0A, 0x00, 0x20, 0x01, 0x00];
        peer.send_to(&frame, reply_to).await.unwrap();

        let mut payload = [0u8; 64];
        let err = transport.recv_unicast(&mut payload).await.unwrap_err();
        assert!(matches!(err, DataLinkError::InvalidFrame));
    }

    #[tokio::test]
    async fn oversized_payloads_refuse_to_send() {
        let (transport, peer) = transport_with_peer().await;
        let peer_addr = peer.local_addr().unwrap();

        let payload = [0u8; super::MAX_BIP_FRAME_LEN];
        let err = transport.send_unicast(peer_addr, &payload).await.unwrap_err();
        assert!(matches!(err, DataLinkError::FrameTooLarge));
    }
}
