// ── Range / subnet arithmetic ──
//
// Pure functions over CIDR blocks and inclusive address ranges. Every
// comparison is done on masked integer values, never on strings, and a
// family mismatch is always "no match" rather than an error.

pub mod range;
pub mod subnet;

use std::fmt;
use std::net::IpAddr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use range::{AddressRange, parse_range, parse_ranges, ranges_overlap};
pub use subnet::{Subnet, parse_subnet, parse_subnet_in, subnet_contains_range, subnets_overlap};

// ── Address family ──────────────────────────────────────────────────

/// IP address family. IPv4 and IPv6 are validated independently.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum AddressFamily {
    Ipv4,
    Ipv6,
}

impl AddressFamily {
    /// Both families, in validation order.
    pub const ALL: [Self; 2] = [Self::Ipv4, Self::Ipv6];

    pub fn of(addr: IpAddr) -> Self {
        match addr {
            IpAddr::V4(_) => Self::Ipv4,
            IpAddr::V6(_) => Self::Ipv6,
        }
    }

    /// Address width in bits.
    pub fn bits(self) -> u8 {
        match self {
            Self::Ipv4 => 32,
            Self::Ipv6 => 128,
        }
    }

    /// Config key holding the uplink gateway CIDR (`ipv4.gateway`).
    pub fn gateway_key(self) -> &'static str {
        match self {
            Self::Ipv4 => "ipv4.gateway",
            Self::Ipv6 => "ipv6.gateway",
        }
    }

    /// Config key holding the uplink's OVN dynamic ranges (`ipv4.ovn.ranges`).
    pub fn ranges_key(self) -> &'static str {
        match self {
            Self::Ipv4 => "ipv4.ovn.ranges",
            Self::Ipv6 => "ipv6.ovn.ranges",
        }
    }

    /// Config key holding a logical network's static address (`ipv4.address`).
    pub fn address_key(self) -> &'static str {
        match self {
            Self::Ipv4 => "ipv4.address",
            Self::Ipv6 => "ipv6.address",
        }
    }
}

impl fmt::Display for AddressFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ipv4 => f.write_str("IPv4"),
            Self::Ipv6 => f.write_str("IPv6"),
        }
    }
}

// ── Parse errors ────────────────────────────────────────────────────

/// Syntax or ordering failure in a single address, CIDR, or range string.
///
/// These carry no candidate context; the extractor attributes them to a
/// system and config key before they reach the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    #[error("invalid CIDR '{value}': {reason}")]
    MalformedSubnet { value: String, reason: String },

    #[error("invalid address range '{value}': {reason}")]
    MalformedRange { value: String, reason: String },

    #[error("invalid IP address '{value}'")]
    MalformedAddress { value: String },
}

impl AddressError {
    /// The offending input string.
    pub fn value(&self) -> &str {
        match self {
            Self::MalformedSubnet { value, .. }
            | Self::MalformedRange { value, .. }
            | Self::MalformedAddress { value } => value,
        }
    }
}

/// Parse a bare IP address (no prefix length).
pub fn parse_address(s: &str) -> Result<IpAddr, AddressError> {
    s.trim()
        .parse::<IpAddr>()
        .map_err(|_| AddressError::MalformedAddress { value: s.into() })
}

// ── Masking helpers ─────────────────────────────────────────────────

/// Address as an unsigned integer, widened to 128 bits.
pub(crate) fn addr_bits(addr: IpAddr) -> u128 {
    match addr {
        IpAddr::V4(v4) => u128::from(u32::from(v4)),
        IpAddr::V6(v6) => u128::from(v6),
    }
}

/// Mask selecting the host part of an address of `family` under `prefix`.
pub(crate) fn host_mask(family: AddressFamily, prefix: u8) -> u128 {
    let host_bits = u32::from(family.bits().saturating_sub(prefix));
    if host_bits >= 128 {
        u128::MAX
    } else {
        (1u128 << host_bits) - 1
    }
}

/// Rebuild an address of `family` from its integer value.
pub(crate) fn bits_to_addr(family: AddressFamily, bits: u128) -> IpAddr {
    match family {
        AddressFamily::Ipv4 => {
            let v4 = u32::try_from(bits & u128::from(u32::MAX)).unwrap_or(u32::MAX);
            IpAddr::from(std::net::Ipv4Addr::from(v4))
        }
        AddressFamily::Ipv6 => IpAddr::from(std::net::Ipv6Addr::from(bits)),
    }
}
