use core::fmt;
use std::net::SocketAddr;

use bacport_core::npdu::NpduAddress;
use bacport_core::types::ObjectId;

use crate::error::ClientError;

/// Placeholder until a name is read from the device object.
const UNKNOWN_NAME: &str = "Unknown";

/// Datalink family a device is reached through.
///
/// The client only ever talks UDP; routed families describe what sits on
/// the far side of the router and decide the NPDU destination shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DeviceProtocol {
    /// Plain BACnet/IP on the local subnet, no routing.
    Ip,
    /// MS/TP field bus behind a router, one-octet station MAC.
    Mstp,
    /// Virtual network or Ethernet behind a router, six-octet MAC.
    VirtualNetworkOrEthernet,
    /// Routed device whose MAC width matches no family this client names.
    Unknown,
}

/// Addressing record for one remote BACnet device.
///
/// Holds everything needed to reach the device again: the IP endpoint
/// frames are sent to (the router's, for routed devices), the destination
/// network number and datalink MAC for the NPDU, and the device-object
/// instance. `mac` stores the MAC as the big-endian value of its `mac_len`
/// wire octets, the same convention as [`NpduAddress`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Device {
    pub protocol: DeviceProtocol,
    pub endpoint: Option<SocketAddr>,
    /// Destination network number; 0 for devices on the local subnet.
    pub network: u16,
    pub mac: u64,
    pub mac_len: u8,
    /// Device-object instance, at most [`ObjectId::MAX_INSTANCE`].
    pub instance: u32,
    pub vendor_id: u32,
    pub name: String,
}

impl Device {
    /// A device spoken to directly over BACnet/IP.
    pub fn ip(endpoint: SocketAddr, instance: u32) -> Self {
        Self {
            protocol: DeviceProtocol::Ip,
            endpoint: Some(endpoint),
            network: 0,
            mac: 0,
            mac_len: 0,
            instance,
            vendor_id: 0,
            name: UNKNOWN_NAME.into(),
        }
    }

    /// A device on a routed virtual network (or Ethernet segment) behind
    /// the router at `endpoint`. The six-octet MAC carries the object
    /// instance in its low four octets, a common router convention.
    pub fn virtual_network(endpoint: SocketAddr, network: u16, instance: u32) -> Self {
        Self {
            protocol: DeviceProtocol::VirtualNetworkOrEthernet,
            endpoint: Some(endpoint),
            network,
            mac: u64::from(instance),
            mac_len: 6,
            instance,
            vendor_id: 0,
            name: UNKNOWN_NAME.into(),
        }
    }

    /// An MS/TP device behind the router at `endpoint`, addressed by its
    /// one-octet station number on the field bus.
    pub fn mstp(endpoint: SocketAddr, network: u16, station: u16) -> Result<Self, ClientError> {
        if station > u16::from(u8::MAX) {
            return Err(ClientError::InvalidArgument(
                "MS/TP station address exceeds one octet",
            ));
        }
        Ok(Self {
            protocol: DeviceProtocol::Mstp,
            endpoint: Some(endpoint),
            network,
            mac: u64::from(station),
            mac_len: 1,
            instance: 0,
            vendor_id: 0,
            name: UNKNOWN_NAME.into(),
        })
    }

    /// Builds a record from a received I-Am: the datagram's source
    /// endpoint plus the routed source section of its NPDU, when present.
    pub fn discovered(
        endpoint: SocketAddr,
        device_id: ObjectId,
        vendor_id: u32,
        source: Option<NpduAddress>,
    ) -> Self {
        let (protocol, network, mac, mac_len) = match source {
            None => (DeviceProtocol::Ip, 0, 0, 0),
            Some(addr) => {
                let protocol = match addr.mac_len {
                    1 => DeviceProtocol::Mstp,
                    6 => DeviceProtocol::VirtualNetworkOrEthernet,
                    _ => DeviceProtocol::Unknown,
                };
                (protocol, addr.network, addr.mac, addr.mac_len)
            }
        };
        Self {
            protocol,
            endpoint: Some(endpoint),
            network,
            mac,
            mac_len,
            instance: device_id.instance(),
            vendor_id,
            name: UNKNOWN_NAME.into(),
        }
    }

    /// Whether requests to this device need an NPDU destination section,
    /// so a router on the local subnet can forward them.
    pub const fn requires_routing(&self) -> bool {
        self.network != 0 && self.mac_len > 0
    }

    /// The NPDU destination for a routed request.
    pub const fn npdu_destination(&self) -> NpduAddress {
        NpduAddress {
            network: self.network,
            mac: self.mac,
            mac_len: self.mac_len,
        }
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.protocol {
            DeviceProtocol::Ip => {
                write!(f, "device {} \"{}\"", self.instance, self.name)?;
            }
            DeviceProtocol::Mstp => {
                write!(
                    f,
                    "device {} \"{}\" on network {} station {}",
                    self.instance, self.name, self.network, self.mac
                )?;
            }
            DeviceProtocol::VirtualNetworkOrEthernet => {
                write!(
                    f,
                    "device {} \"{}\" on network {} mac {:012X}",
                    self.instance, self.name, self.network, self.mac
                )?;
            }
            DeviceProtocol::Unknown => {
                write!(
                    f,
                    "device {} \"{}\" on network {} mac {:X} ({} octets)",
                    self.instance, self.name, self.network, self.mac, self.mac_len
                )?;
            }
        }
        if let Some(endpoint) = self.endpoint {
            write!(f, " via {endpoint}")?;
        }
        Ok(())
    }
}
