use std::collections::BTreeSet;
use std::net::IpAddr;

use tracing::{debug, warn};

/// Addresses of the local network interfaces, as strings, for use as default hosts.
///
/// Interfaces that are not operationally up are skipped, and link-local
/// addresses are dropped since they are useless in a certificate. The result is
/// de-duplicated and sorted. Enumeration failure yields an empty list.
pub fn list_local_identities() -> Vec<String> {
    let interfaces = match if_addrs::get_if_addrs() {
        Ok(interfaces) => interfaces,
        Err(e) => {
            warn!(error = %e, "could not enumerate network interfaces");
            return Vec::new();
        }
    };

    usable_addresses(
        interfaces
            .iter()
            .map(|iface| (iface.name.as_str(), iface.is_oper_up(), iface.ip())),
    )
}

/// Filters `(interface, is_up, address)` triples down to certificate-worthy addresses.
fn usable_addresses<'a>(candidates: impl IntoIterator<Item = (&'a str, bool, IpAddr)>) -> Vec<String> {
    let addresses: BTreeSet<IpAddr> = candidates
        .into_iter()
        .filter(|(name, up, ip)| {
            if !up {
                debug!(interface = name, %ip, "skipping address on down interface");
                return false;
            }
            if is_link_local(ip) {
                debug!(interface = name, %ip, "skipping link-local address");
                return false;
            }
            true
        })
        .map(|(_, _, ip)| ip)
        .collect();

    addresses.iter().map(IpAddr::to_string).collect()
}

fn is_link_local(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => v4.is_link_local(),
        // fe80::/10
        IpAddr::V6(v6) => (v6.segments()[0] & 0xffc0) == 0xfe80,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_local_detection() {
        assert!(is_link_local(&"169.254.10.1".parse().unwrap()));
        assert!(is_link_local(&"fe80::1c2a:3bff:fe4d:5e6f".parse().unwrap()));
        assert!(!is_link_local(&"127.0.0.1".parse().unwrap()));
        assert!(!is_link_local(&"::1".parse().unwrap()));
        assert!(!is_link_local(&"fd00::1".parse().unwrap()));
    }

    #[test]
    fn test_down_interfaces_and_link_local_are_skipped() {
        let addresses = usable_addresses([
            ("eth0", true, "192.168.1.20".parse().unwrap()),
            ("eth0", true, "fe80::1".parse().unwrap()),
            ("wlan0", false, "10.1.2.3".parse().unwrap()),
            ("lo", true, "127.0.0.1".parse().unwrap()),
            ("eth1", true, "192.168.1.20".parse().unwrap()),
            ("eth1", true, "fd00::5".parse().unwrap()),
        ]);
        assert_eq!(addresses, vec!["127.0.0.1", "192.168.1.20", "fd00::5"]);
    }

    #[test]
    fn test_local_identities_are_unique_and_not_link_local() {
        let identities = list_local_identities();
        let unique: BTreeSet<_> = identities.iter().collect();
        assert_eq!(unique.len(), identities.len());
        for identity in &identities {
            let ip: IpAddr = identity.parse().unwrap();
            assert!(!is_link_local(&ip));
        }
    }
}
