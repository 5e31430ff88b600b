//! Subnet broadcast address selection.
//!
//! Discovery sweeps want the directed broadcast of the LAN the host
//! actually sits on; the limited broadcast address is only a fallback
//! because many routers refuse to forward it.

use std::net::Ipv4Addr;

use if_addrs::IfAddr;

/// Picks the IPv4 subnet broadcast address of the first usable host
/// interface. Falls back to the limited broadcast address when no
/// interface qualifies or enumeration fails; enumeration problems are
/// logged and never surfaced.
pub fn subnet_broadcast() -> Ipv4Addr {
    let interfaces = match if_addrs::get_if_addrs() {
        Ok(interfaces) => interfaces,
        Err(e) => {
            log::warn!("interface enumeration failed, using limited broadcast: {e}");
            return Ipv4Addr::BROADCAST;
        }
    };

    for interface in interfaces {
        if interface.is_loopback() {
            continue;
        }
        if let IfAddr::V4(v4) = interface.addr {
            let chosen = v4
                .broadcast
                .unwrap_or_else(|| derived_broadcast(v4.ip, v4.netmask));
            log::debug!("using broadcast {chosen} from interface {}", interface.name);
            return chosen;
        }
    }

    log::warn!("no usable IPv4 interface, using limited broadcast");
    Ipv4Addr::BROADCAST
}

/// Directed broadcast of the subnet `ip`/`netmask`.
fn derived_broadcast(ip: Ipv4Addr, netmask: Ipv4Addr) -> Ipv4Addr {
    Ipv4Addr::from(u32::from(ip) | !u32::from(netmask))
}

#[cfg(test)]
mod tests {
    use super::{derived_broadcast, subnet_broadcast};
    use std::net::Ipv4Addr;

    #[test]
    fn directed_broadcast_math() {
        assert_eq!(
            derived_broadcast(
                Ipv4Addr::new(192, 168, 1, 2),
                Ipv4Addr::new(255, 255, 255, 0)
            ),
            Ipv4Addr::new(192, 168, 1, 255)
        );
        assert_eq!(
            derived_broadcast(Ipv4Addr::new(10, 4, 17, 9), Ipv4Addr::new(255, 240, 0, 0)),
            Ipv4Addr::new(10, 15, 255, 255)
        );
    }

    #[test]
    fn selection_always_yields_an_address() {
        // Whatever the host looks like, discovery gets a target.
        let addr = subnet_broadcast();
        assert!(!addr.is_unspecified());
    }
}
