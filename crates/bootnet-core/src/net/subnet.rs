// ── CIDR subnets ──

use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

use ipnetwork::IpNetwork;
use serde::{Serialize, Serializer};

use super::{AddressError, AddressFamily, AddressRange, addr_bits, bits_to_addr, host_mask};

/// A CIDR block anchored at a specific address.
///
/// For an uplink gateway such as `10.234.0.1/16` the anchor is the gateway
/// address itself and the prefix defines the subnet it routes for. All
/// containment and overlap checks use the masked network, never the anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subnet(IpNetwork);

impl Subnet {
    pub fn new(addr: IpAddr, prefix: u8) -> Result<Self, AddressError> {
        IpNetwork::new(addr, prefix)
            .map(Self)
            .map_err(|e| AddressError::MalformedSubnet {
                value: format!("{addr}/{prefix}"),
                reason: e.to_string(),
            })
    }

    /// The address the CIDR was written with (e.g. the gateway address).
    pub fn address(&self) -> IpAddr {
        self.0.ip()
    }

    /// The masked base address of the subnet.
    pub fn network(&self) -> IpAddr {
        let family = self.family();
        bits_to_addr(
            family,
            addr_bits(self.0.ip()) & !host_mask(family, self.prefix()),
        )
    }

    /// The highest address in the subnet.
    pub fn last(&self) -> IpAddr {
        let family = self.family();
        bits_to_addr(
            family,
            addr_bits(self.0.ip()) | host_mask(family, self.prefix()),
        )
    }

    pub fn prefix(&self) -> u8 {
        self.0.prefix()
    }

    pub fn family(&self) -> AddressFamily {
        AddressFamily::of(self.0.ip())
    }

    /// Whether `addr` masks to this subnet's network. Cross-family is false.
    pub fn contains(&self, addr: IpAddr) -> bool {
        let family = self.family();
        if AddressFamily::of(addr) != family {
            return false;
        }
        let mask = !host_mask(family, self.prefix());
        addr_bits(addr) & mask == addr_bits(self.0.ip()) & mask
    }

    /// The whole subnet as an inclusive address range.
    pub fn as_range(&self) -> AddressRange {
        // network <= last always holds for a single family, so this never
        // takes the fallback branch.
        AddressRange::new(self.network(), self.last())
            .unwrap_or_else(|_| AddressRange::single(self.network()))
    }
}

impl fmt::Display for Subnet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.0.ip(), self.0.prefix())
    }
}

impl FromStr for Subnet {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_subnet(s)
    }
}

impl Serialize for Subnet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ── Parsing ─────────────────────────────────────────────────────────

/// Parse `<address>/<prefix-length>`. The prefix length is mandatory.
pub fn parse_subnet(cidr: &str) -> Result<Subnet, AddressError> {
    let trimmed = cidr.trim();
    let malformed = |reason: String| AddressError::MalformedSubnet {
        value: cidr.into(),
        reason,
    };

    let Some((addr, prefix)) = trimmed.split_once('/') else {
        return Err(malformed("missing prefix length".into()));
    };

    // Parse the address with std so abbreviated forms like `10.1/16` are
    // rejected rather than expanded.
    let addr = addr
        .parse::<IpAddr>()
        .map_err(|_| malformed(format!("invalid address '{addr}'")))?;
    // `u8::from_str` would accept a leading `+`.
    let prefix = Some(prefix)
        .filter(|p| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|p| p.parse::<u8>().ok())
        .ok_or_else(|| malformed(format!("invalid prefix length '{prefix}'")))?;

    IpNetwork::new(addr, prefix)
        .map(Subnet)
        .map_err(|e| malformed(e.to_string()))
}

/// Parse a CIDR that must belong to `family`, as read from an `ipv4.*` or
/// `ipv6.*` config key.
pub fn parse_subnet_in(cidr: &str, family: AddressFamily) -> Result<Subnet, AddressError> {
    let subnet = parse_subnet(cidr)?;
    if subnet.family() != family {
        return Err(AddressError::MalformedSubnet {
            value: cidr.into(),
            reason: format!("expected an {family} CIDR, got {}", subnet.family()),
        });
    }
    Ok(subnet)
}

// ── Containment / overlap ───────────────────────────────────────────

/// Whether both endpoints of `range` mask to `subnet`'s network.
///
/// A family mismatch is a plain `false`.
pub fn subnet_contains_range(subnet: &Subnet, range: &AddressRange) -> bool {
    subnet.family() == range.family() && subnet.contains(range.start()) && subnet.contains(range.end())
}

/// Standard CIDR overlap: either network's base lies inside the other.
///
/// Subnets of different families never overlap.
pub fn subnets_overlap(a: &Subnet, b: &Subnet) -> bool {
    a.family() == b.family() && (a.contains(b.network()) || b.contains(a.network()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::net::parse_range;

    fn subnet(s: &str) -> Subnet {
        parse_subnet(s).unwrap()
    }

    fn range(s: &str) -> AddressRange {
        parse_range(s).unwrap()
    }

    #[test]
    fn keeps_anchor_and_masks_network() {
        let gw = subnet("10.234.0.1/16");
        assert_eq!(gw.address().to_string(), "10.234.0.1");
        assert_eq!(gw.network().to_string(), "10.234.0.0");
        assert_eq!(gw.last().to_string(), "10.234.255.255");
        assert_eq!(gw.prefix(), 16);
        assert_eq!(gw.to_string(), "10.234.0.1/16");
    }

    #[test]
    fn ipv6_network_and_last() {
        let gw = subnet("fd42:1:2::1/64");
        assert_eq!(gw.network().to_string(), "fd42:1:2::");
        assert_eq!(gw.last().to_string(), "fd42:1:2:0:ffff:ffff:ffff:ffff");
        assert_eq!(gw.family(), AddressFamily::Ipv6);
    }

    #[test]
    fn rejects_malformed_cidrs() {
        for bad in ["10.0.0.1", "10.0.0.1/33", "10.0.0/24", "fd42::1/129", "gateway", ""] {
            assert!(
                matches!(parse_subnet(bad), Err(AddressError::MalformedSubnet { .. })),
                "expected '{bad}' to be rejected"
            );
        }
    }

    #[test]
    fn prefix_length_is_digits_only() {
        for bad in ["10.0.0.1/+24", "10.0.0.1/ 24", "10.0.0.1/24 /", "10.0.0.1/", "fd42::1/+64", "10.0.0.1/-0"] {
            assert!(parse_subnet(bad).is_err(), "expected '{bad}' to be rejected");
        }
        assert_eq!(
            parse_subnet("10.0.0.1/+24").unwrap_err(),
            AddressError::MalformedSubnet {
                value: "10.0.0.1/+24".into(),
                reason: "invalid prefix length '+24'".into(),
            }
        );
        assert_eq!(subnet("10.0.0.1/024").prefix(), 24);
    }

    #[test]
    fn enforces_family_at_call_site() {
        assert!(parse_subnet_in("10.0.0.1/24", AddressFamily::Ipv4).is_ok());
        let err = parse_subnet_in("fd42::1/64", AddressFamily::Ipv4).unwrap_err();
        assert_eq!(
            err,
            AddressError::MalformedSubnet {
                value: "fd42::1/64".into(),
                reason: "expected an IPv4 CIDR, got IPv6".into(),
            }
        );
    }

    #[test]
    fn contains_ranges_inside_subnet() {
        let cases = [
            ("10.214.0.0/16", "10.214.0.55-10.214.0.255"),
            ("192.168.2.0/23", "192.168.2.20-192.168.3.127"),
            ("10.1.1.1/24", "10.1.1.0-10.1.1.255"),
            ("fd42::1/64", "fd42::100-fd42::ffff"),
        ];
        for (cidr, rng) in cases {
            assert!(
                subnet_contains_range(&subnet(cidr), &range(rng)),
                "range {rng} fell outside prefix {cidr}"
            );
        }
    }

    #[test]
    fn rejects_ranges_leaving_subnet() {
        let cases = [
            ("10.214.0.0/16", "10.214.0.2-10.215.0.255"),
            ("192.168.2.0/23", "192.168.2.49-192.168.4.130"),
            ("10.1.1.0/24", "10.2.2.50-10.2.2.100"),
            ("10.1.1.0/24", "10.1.0.250-10.1.1.10"),
        ];
        for (cidr, rng) in cases {
            assert!(
                !subnet_contains_range(&subnet(cidr), &range(rng)),
                "range {rng} fell inside prefix {cidr}"
            );
        }
    }

    #[test]
    fn containment_is_family_strict() {
        let v4 = subnet("0.0.0.0/0");
        assert!(!subnet_contains_range(&v4, &range("::1-::ff")));
        let v6 = subnet("::/0");
        assert!(!subnet_contains_range(&v6, &range("10.0.0.1-10.0.0.2")));
    }

    #[test]
    fn overlap_covers_nesting_and_equality() {
        let a = subnet("192.168.1.1/24");
        assert!(subnets_overlap(&a, &subnet("192.168.1.1/24")));
        assert!(subnets_overlap(&a, &subnet("192.168.1.200/24")));
        assert!(subnets_overlap(&a, &subnet("192.168.0.0/16")));
        assert!(subnets_overlap(&subnet("192.168.0.0/16"), &a));
        assert!(subnets_overlap(&a, &subnet("192.168.1.128/25")));
        assert!(!subnets_overlap(&a, &subnet("192.168.2.1/24")));
        assert!(!subnets_overlap(&a, &subnet("10.234.0.1/16")));
    }

    #[test]
    fn overlap_is_family_strict() {
        assert!(!subnets_overlap(&subnet("0.0.0.0/0"), &subnet("::/0")));
    }

    #[test]
    fn as_range_spans_whole_subnet() {
        let r = subnet("10.28.15.1/24").as_range();
        assert_eq!(r.to_string(), "10.28.15.0-10.28.15.255");
        let host = subnet("10.0.0.7/32").as_range();
        assert_eq!(host, AddressRange::single("10.0.0.7".parse().unwrap()));
    }
}
