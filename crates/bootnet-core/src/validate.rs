// ── Topology validation ──
//
// Single pass over an immutable round snapshot. Malformed input surfaces
// first (extraction runs for every candidate before any check), then each
// address family is checked per candidate and across candidates. The first
// violation found is returned.

use tracing::{debug, trace, warn};

use crate::config::ValidatorSettings;
use crate::error::ValidationError;
use crate::extract::{NetworkFacts, extract};
use crate::model::{BootstrapContext, BootstrapMode, BootstrapRound};
use crate::net::{
    AddressFamily, Subnet, parse_address, ranges_overlap, subnet_contains_range, subnets_overlap,
};

/// Validate the proposed network topology of every candidate in `round`.
///
/// Only a fresh bootstrap is validated; when joining an existing cluster
/// its network is assumed consistent and this returns `Ok(())` at once.
pub fn validate_systems(
    context: &BootstrapContext,
    round: &BootstrapRound,
    settings: &ValidatorSettings,
) -> Result<(), ValidationError> {
    if context.mode == BootstrapMode::JoinExisting {
        warn!(
            local = %context.name,
            candidates = round.len(),
            "joining an existing cluster, skipping network validation"
        );
        return Ok(());
    }

    let management = parse_address(&context.address)
        .map_err(|e| ValidationError::from_address(&context.name, "address", e))?;

    if round.is_empty() {
        debug!(local = %context.name, "no candidates to validate");
        return Ok(());
    }

    let facts = round
        .iter()
        .map(|candidate| extract(candidate, &settings.uplink_name))
        .collect::<Result<Vec<_>, _>>()?;

    debug!(
        local = %context.name,
        candidates = facts.len(),
        "validating bootstrap network topology"
    );

    for family in AddressFamily::ALL {
        let management_subnet = if AddressFamily::of(management) == family {
            let prefix = settings.management_prefix(family);
            Some(
                Subnet::new(management, prefix)
                    .map_err(|e| ValidationError::from_address(&context.name, "management prefix", e))?,
            )
        } else {
            None
        };

        debug!(%family, management = ?management_subnet, "checking address family");

        for candidate in &facts {
            check_candidate(candidate, family, management_subnet.as_ref())?;
        }
        check_cross_candidate(&facts, family)?;
    }

    debug!(local = %context.name, "bootstrap network topology is valid");
    Ok(())
}

/// Checks confined to a single candidate's own proposals.
fn check_candidate(
    candidate: &NetworkFacts,
    family: AddressFamily,
    management: Option<&Subnet>,
) -> Result<(), ValidationError> {
    let facts = candidate.family(family);
    let system = candidate.system.as_str();

    if let Some(gateway) = &facts.gateway {
        if let Some(management) = management {
            trace!(system, %gateway, %management, "management overlap");
            if subnets_overlap(gateway, management) {
                debug!(system, %gateway, %management, "uplink gateway aliases management network");
                return Err(ValidationError::ManagementConflict {
                    system: system.to_owned(),
                    family,
                    gateway: *gateway,
                    management: *management,
                });
            }
        }

        for range in &facts.ranges {
            trace!(system, %gateway, %range, "range containment");
            if !subnet_contains_range(gateway, range) {
                debug!(system, %gateway, %range, "OVN range leaves gateway subnet");
                return Err(ValidationError::RangeOutOfSubnet {
                    system: system.to_owned(),
                    family,
                    range: *range,
                    gateway: *gateway,
                });
            }
        }
    }

    for pinned in &facts.static_addresses {
        let span = pinned.subnet.as_range();
        for range in &facts.ranges {
            trace!(system, network = %pinned.network, address = %pinned.subnet, %range, "static/dynamic overlap");
            if ranges_overlap(&span, range) {
                debug!(system, network = %pinned.network, "static address collides with OVN range");
                return Err(ValidationError::StaticDynamicConflict {
                    system: system.to_owned(),
                    family,
                    network: pinned.network.clone(),
                    address: pinned.subnet,
                    range: *range,
                });
            }
        }
    }

    Ok(())
}

/// Two candidates in one round must never propose colliding address pools.
fn check_cross_candidate(all: &[NetworkFacts], family: AddressFamily) -> Result<(), ValidationError> {
    for (i, first) in all.iter().enumerate() {
        for second in all.iter().skip(i + 1) {
            let a = first.family(family);
            let b = second.family(family);

            for ra in &a.ranges {
                if let Some(rb) = b.ranges.iter().find(|rb| ranges_overlap(ra, rb)) {
                    debug!(first = %first.system, second = %second.system, "OVN ranges overlap");
                    return Err(ValidationError::CrossCandidateOverlap {
                        family,
                        key: family.ranges_key().into(),
                        first: first.system.clone(),
                        first_value: ra.to_string(),
                        second: second.system.clone(),
                        second_value: rb.to_string(),
                    });
                }
            }

            if let (Some(ga), Some(gb)) = (&a.gateway, &b.gateway) {
                if subnets_overlap(ga, gb) {
                    debug!(first = %first.system, second = %second.system, "gateway subnets overlap");
                    return Err(ValidationError::CrossCandidateOverlap {
                        family,
                        key: family.gateway_key().into(),
                        first: first.system.clone(),
                        first_value: ga.to_string(),
                        second: second.system.clone(),
                        second_value: gb.to_string(),
                    });
                }
            }
        }
    }

    Ok(())
}
