// ── Network proposal extraction ──
//
// Turns one candidate's raw string-keyed proposals into typed facts. This
// is the only place config keys are read and parsed; the validator works
// purely on the output.

use std::net::IpAddr;

use serde::Serialize;
use tracing::trace;

use crate::error::ValidationError;
use crate::model::{CandidateSystem, NetworkProposal};
use crate::net::{
    AddressError, AddressFamily, AddressRange, Subnet, parse_address, parse_ranges, parse_subnet_in,
};

/// Values meaning "let the system pick" for a logical network address.
const UNSET_ADDRESS_VALUES: [&str; 2] = ["auto", "none"];

/// A logical network pinned to a static address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StaticAddress {
    pub network: String,
    pub subnet: Subnet,
}

/// Everything one candidate proposes for one address family.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FamilyFacts {
    /// Uplink gateway, anchoring the uplink subnet.
    pub gateway: Option<Subnet>,
    /// OVN dynamic ranges on the uplink.
    pub ranges: Vec<AddressRange>,
    /// Explicitly set logical network addresses.
    pub static_addresses: Vec<StaticAddress>,
}

impl FamilyFacts {
    pub fn is_empty(&self) -> bool {
        self.gateway.is_none() && self.ranges.is_empty() && self.static_addresses.is_empty()
    }
}

/// Typed network facts for one candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetworkFacts {
    pub system: String,
    pub management: IpAddr,
    pub has_uplink: bool,
    pub ipv4: FamilyFacts,
    pub ipv6: FamilyFacts,
}

impl NetworkFacts {
    pub fn family(&self, family: AddressFamily) -> &FamilyFacts {
        match family {
            AddressFamily::Ipv4 => &self.ipv4,
            AddressFamily::Ipv6 => &self.ipv6,
        }
    }

    fn family_mut(&mut self, family: AddressFamily) -> &mut FamilyFacts {
        match family {
            AddressFamily::Ipv4 => &mut self.ipv4,
            AddressFamily::Ipv6 => &mut self.ipv6,
        }
    }
}

/// Extract typed facts from a candidate's proposals.
///
/// A key that is present but does not parse fails the candidate; absent
/// keys are simply left unset.
pub fn extract(candidate: &CandidateSystem, uplink_name: &str) -> Result<NetworkFacts, ValidationError> {
    let system = candidate.name.as_str();

    let management = parse_address(&candidate.address)
        .map_err(|e| ValidationError::from_address(system, "address", e))?;

    let uplink = candidate.uplink(uplink_name);
    let mut facts = NetworkFacts {
        system: system.into(),
        management,
        has_uplink: uplink.is_some(),
        ipv4: FamilyFacts::default(),
        ipv6: FamilyFacts::default(),
    };

    for family in AddressFamily::ALL {
        let slot = facts.family_mut(family);

        if let Some(uplink) = uplink {
            let key = family.gateway_key();
            if let Some(value) = set_value(uplink, key) {
                let gateway = parse_subnet_in(value, family)
                    .map_err(|e| ValidationError::from_address(system, key, e))?;
                slot.gateway = Some(gateway);
            }

            let key = family.ranges_key();
            if let Some(value) = set_value(uplink, key) {
                slot.ranges = parse_ranges_in(value, family)
                    .map_err(|e| ValidationError::from_address(system, key, e))?;
            }
        }

        for overlay in candidate.overlays() {
            let address = static_address(overlay, family)
                .map_err(|e| ValidationError::from_address(system, family.address_key(), e))?;
            slot.static_addresses.extend(address);
        }
    }

    trace!(system, uplink = facts.has_uplink, "extracted network facts");
    Ok(facts)
}

/// A config value, unless it is missing or blank.
fn set_value<'a>(proposal: &'a NetworkProposal, key: &str) -> Option<&'a str> {
    proposal.get(key).map(str::trim).filter(|v| !v.is_empty())
}

fn static_address(
    overlay: &NetworkProposal,
    family: AddressFamily,
) -> Result<Option<StaticAddress>, AddressError> {
    let Some(value) = overlay.get(family.address_key()) else {
        return Ok(None);
    };
    let trimmed = value.trim();
    if trimmed.is_empty() || UNSET_ADDRESS_VALUES.contains(&trimmed) {
        return Ok(None);
    }
    Ok(Some(StaticAddress {
        network: overlay.name.clone(),
        subnet: parse_subnet_in(trimmed, family)?,
    }))
}

fn parse_ranges_in(value: &str, family: AddressFamily) -> Result<Vec<AddressRange>, AddressError> {
    let ranges = parse_ranges(value)?;
    if let Some(stray) = ranges.iter().find(|r| r.family() != family) {
        return Err(AddressError::MalformedRange {
            value: value.into(),
            reason: format!("expected an {family} range, got {stray}"),
        });
    }
    Ok(ranges)
}
