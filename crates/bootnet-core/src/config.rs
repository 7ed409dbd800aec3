// ── Runtime validator settings ──
//
// Cluster-wide parameters the validator needs but cannot derive from the
// round itself. The config crate builds these from disk/env; core never
// reads files.

use serde::{Deserialize, Serialize};

use crate::model::UPLINK_NETWORK;
use crate::net::AddressFamily;

pub const DEFAULT_MANAGEMENT_PREFIX_V4: u8 = 24;
pub const DEFAULT_MANAGEMENT_PREFIX_V6: u8 = 64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorSettings {
    /// Reserved name of the uplink physical network.
    pub uplink_name: String,
    /// Prefix length of the IPv4 management network.
    pub management_prefix_v4: u8,
    /// Prefix length of the IPv6 management network.
    pub management_prefix_v6: u8,
}

impl Default for ValidatorSettings {
    fn default() -> Self {
        Self {
            uplink_name: UPLINK_NETWORK.into(),
            management_prefix_v4: DEFAULT_MANAGEMENT_PREFIX_V4,
            management_prefix_v6: DEFAULT_MANAGEMENT_PREFIX_V6,
        }
    }
}

impl ValidatorSettings {
    pub fn management_prefix(&self, family: AddressFamily) -> u8 {
        match family {
            AddressFamily::Ipv4 => self.management_prefix_v4,
            AddressFamily::Ipv6 => self.management_prefix_v6,
        }
    }
}
