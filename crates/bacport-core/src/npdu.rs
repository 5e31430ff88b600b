use crate::encoding::{
    primitives::{decode_be_uint, encode_be_uint},
    reader::Reader,
    writer::Writer,
};
use crate::{DecodeError, EncodeError};

/// BACnet network layer protocol version (always `0x01`).
pub const NPDU_VERSION: u8 = 0x01;

/// Control bit: this is a network-layer message, not an APDU.
pub const CTRL_NETWORK_MESSAGE: u8 = 0x80;
/// Control bit: a destination section (DNET/DLEN/DADR) follows.
pub const CTRL_DEST_PRESENT: u8 = 0x20;
/// Control bit: a source section (SNET/SLEN/SADR) follows.
pub const CTRL_SRC_PRESENT: u8 = 0x08;
/// Control bit: the sender expects a reply to this PDU.
pub const CTRL_EXPECTING_REPLY: u8 = 0x04;

/// A network-layer address: a network number plus a MAC of one of the
/// datalink widths.
///
/// The MAC is held as the big-endian value of its wire bytes, so a
/// BACnet/IP address `192.168.1.2:47808` with `mac_len` 6 is
/// `0xC0A8_0102_BAC0`. Width zero is the wildcard used by the global
/// broadcast destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NpduAddress {
    /// The DNET/SNET network number.
    pub network: u16,
    /// MAC value, big-endian over `mac_len` wire bytes.
    pub mac: u64,
    /// Wire width of the MAC. Must be one of 0, 1, 2, 4, 6, 8.
    pub mac_len: u8,
}

impl NpduAddress {
    /// DNET 0xFFFF with a zero-length MAC, the global broadcast target.
    pub const GLOBAL_BROADCAST: Self = Self {
        network: 0xFFFF,
        mac: 0,
        mac_len: 0,
    };
}

const fn valid_mac_len(len: u8) -> bool {
    matches!(len, 0 | 1 | 2 | 4 | 6 | 8)
}

/// BACnet Network Protocol Data Unit (NPDU) header.
///
/// Covers the APDU-carrying shapes a client emits and receives: optional
/// destination and source sections and the hop count that accompanies a
/// destination. Network-layer messages (control bit `0x80`) are not
/// modelled; both directions refuse them so router chatter never gets
/// mistaken for an application PDU.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Npdu {
    pub control: u8,
    pub destination: Option<NpduAddress>,
    pub source: Option<NpduAddress>,
    pub hop_count: Option<u8>,
}

impl Npdu {
    pub const fn new(control: u8) -> Self {
        Self {
            control,
            destination: None,
            source: None,
            hop_count: None,
        }
    }

    /// Header for a confirmed request to a device on the local network.
    pub const fn local_expecting_reply() -> Self {
        Self::new(CTRL_EXPECTING_REPLY)
    }

    /// Header for a confirmed request routed to a device behind `dest`.
    pub const fn routed_expecting_reply(dest: NpduAddress) -> Self {
        let mut npdu = Self::new(CTRL_DEST_PRESENT | CTRL_EXPECTING_REPLY);
        npdu.destination = Some(dest);
        npdu.hop_count = Some(255);
        npdu
    }

    /// Header for a globally broadcast unconfirmed request such as Who-Is.
    pub const fn global_broadcast() -> Self {
        let mut npdu = Self::new(CTRL_DEST_PRESENT);
        npdu.destination = Some(NpduAddress::GLOBAL_BROADCAST);
        npdu.hop_count = Some(255);
        npdu
    }

    pub fn encode(&self, w: &mut Writer<'_>) -> Result<(), EncodeError> {
        if (self.control & CTRL_NETWORK_MESSAGE) != 0 {
            return Err(EncodeError::Unsupported);
        }

        // Presence bits always reflect the sections actually written.
        let mut control = self.control;
        if self.destination.is_some() {
            control |= CTRL_DEST_PRESENT;
        }
        if self.source.is_some() {
            control |= CTRL_SRC_PRESENT;
        }

        w.write_u8(NPDU_VERSION)?;
        w.write_u8(control)?;

        if let Some(dest) = self.destination {
            encode_addr(w, dest)?;
        }
        if let Some(src) = self.source {
            encode_addr(w, src)?;
        }
        if self.destination.is_some() {
            w.write_u8(self.hop_count.unwrap_or(255))?;
        }
        Ok(())
    }

    pub fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let version = r.read_u8()?;
        if version != NPDU_VERSION {
            return Err(DecodeError::InvalidValue);
        }

        let control = r.read_u8()?;
        if (control & CTRL_NETWORK_MESSAGE) != 0 {
            return Err(DecodeError::Unsupported);
        }
        let has_dest = (control & CTRL_DEST_PRESENT) != 0;
        let has_src = (control & CTRL_SRC_PRESENT) != 0;

        let destination = if has_dest {
            Some(decode_addr(r)?)
        } else {
            None
        };
        let source = if has_src { Some(decode_addr(r)?) } else { None };
        let hop_count = if has_dest { Some(r.read_u8()?) } else { None };

        Ok(Self {
            control,
            destination,
            source,
            hop_count,
        })
    }
}

fn encode_addr(w: &mut Writer<'_>, addr: NpduAddress) -> Result<(), EncodeError> {
    if !valid_mac_len(addr.mac_len) {
        return Err(EncodeError::InvalidLength);
    }
    w.write_be_u16(addr.network)?;
    w.write_u8(addr.mac_len)?;
    if addr.mac_len == 0 {
        if addr.mac != 0 {
            return Err(EncodeError::ValueOutOfRange);
        }
        return Ok(());
    }
    encode_be_uint(w, addr.mac, addr.mac_len as usize)
}

fn decode_addr(r: &mut Reader<'_>) -> Result<NpduAddress, DecodeError> {
    let network = r.read_be_u16()?;
    let mac_len = r.read_u8()?;
    if !valid_mac_len(mac_len) {
        return Err(DecodeError::InvalidLength);
    }
    let mac = if mac_len == 0 {
        0
    } else {
        decode_be_uint(r, mac_len as usize)?
    };
    Ok(NpduAddress {
        network,
        mac,
        mac_len,
    })
}
