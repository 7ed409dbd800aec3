// ── Validation errors ──
//
// Every variant names the candidate system it is attributable to, plus
// the address family, config key, and conflicting values, so an operator
// can correct the input without re-running with extra logging.

use serde::Serialize;
use strum::{AsRefStr, Display};
use thiserror::Error;

use crate::net::{AddressError, AddressFamily, AddressRange, Subnet};

/// First violation found in a bootstrap round.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    // ── Malformed input ──────────────────────────────────────────────
    #[error("System '{system}' has an invalid {key} value '{value}': {reason}")]
    MalformedSubnet {
        system: String,
        key: String,
        value: String,
        reason: String,
    },

    #[error("System '{system}' has an invalid {key} value '{value}': {reason}")]
    MalformedRange {
        system: String,
        key: String,
        value: String,
        reason: String,
    },

    #[error("System '{system}' has an invalid management address '{value}'")]
    MalformedAddress { system: String, value: String },

    // ── Conflicts on one candidate ───────────────────────────────────
    #[error(
        "{family} uplink network {key} {gateway} on system '{system}' overlaps the management network {management}",
        key = .family.gateway_key()
    )]
    ManagementConflict {
        system: String,
        family: AddressFamily,
        gateway: Subnet,
        management: Subnet,
    },

    #[error(
        "{family} uplink network {key} {range} on system '{system}' is not contained in gateway subnet {gateway}",
        key = .family.ranges_key()
    )]
    RangeOutOfSubnet {
        system: String,
        family: AddressFamily,
        range: AddressRange,
        gateway: Subnet,
    },

    #[error(
        "Network '{network}' on system '{system}' has static {key} {address} overlapping the uplink {family} OVN range {range}",
        key = .family.address_key()
    )]
    StaticDynamicConflict {
        system: String,
        family: AddressFamily,
        network: String,
        address: Subnet,
        range: AddressRange,
    },

    // ── Conflicts between candidates ─────────────────────────────────
    #[error(
        "{family} uplink network {key} of system '{first}' ({first_value}) overlaps system '{second}' ({second_value})"
    )]
    CrossCandidateOverlap {
        family: AddressFamily,
        key: String,
        first: String,
        first_value: String,
        second: String,
        second_value: String,
    },
}

/// Machine-readable classification of a [`ValidationError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr, Serialize)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum ViolationKind {
    MalformedSubnet,
    MalformedRange,
    MalformedAddress,
    ManagementConflict,
    RangeOutOfSubnet,
    StaticDynamicConflict,
    CrossCandidateOverlap,
}

impl ValidationError {
    /// Attribute a bare parse failure to a system and config key.
    pub fn from_address(system: &str, key: &str, err: AddressError) -> Self {
        match err {
            AddressError::MalformedSubnet { value, reason } => Self::MalformedSubnet {
                system: system.into(),
                key: key.into(),
                value,
                reason,
            },
            AddressError::MalformedRange { value, reason } => Self::MalformedRange {
                system: system.into(),
                key: key.into(),
                value,
                reason,
            },
            AddressError::MalformedAddress { value } => Self::MalformedAddress {
                system: system.into(),
                value,
            },
        }
    }

    pub fn kind(&self) -> ViolationKind {
        match self {
            Self::MalformedSubnet { .. } => ViolationKind::MalformedSubnet,
            Self::MalformedRange { .. } => ViolationKind::MalformedRange,
            Self::MalformedAddress { .. } => ViolationKind::MalformedAddress,
            Self::ManagementConflict { .. } => ViolationKind::ManagementConflict,
            Self::RangeOutOfSubnet { .. } => ViolationKind::RangeOutOfSubnet,
            Self::StaticDynamicConflict { .. } => ViolationKind::StaticDynamicConflict,
            Self::CrossCandidateOverlap { .. } => ViolationKind::CrossCandidateOverlap,
        }
    }

    /// The candidate the violation is attributed to (the first one, for
    /// cross-candidate overlaps).
    pub fn system(&self) -> &str {
        match self {
            Self::MalformedSubnet { system, .. }
            | Self::MalformedRange { system, .. }
            | Self::MalformedAddress { system, .. }
            | Self::ManagementConflict { system, .. }
            | Self::RangeOutOfSubnet { system, .. }
            | Self::StaticDynamicConflict { system, .. } => system,
            Self::CrossCandidateOverlap { first, .. } => first,
        }
    }

    /// The address family the violation was found in, if it is family-specific.
    pub fn family(&self) -> Option<AddressFamily> {
        match self {
            Self::ManagementConflict { family, .. }
            | Self::RangeOutOfSubnet { family, .. }
            | Self::StaticDynamicConflict { family, .. }
            | Self::CrossCandidateOverlap { family, .. } => Some(*family),
            Self::MalformedSubnet { .. }
            | Self::MalformedRange { .. }
            | Self::MalformedAddress { .. } => None,
        }
    }

    /// The config key at fault.
    pub fn key(&self) -> &str {
        match self {
            Self::MalformedSubnet { key, .. }
            | Self::MalformedRange { key, .. }
            | Self::CrossCandidateOverlap { key, .. } => key,
            Self::MalformedAddress { .. } => "address",
            Self::ManagementConflict { family, .. } => family.gateway_key(),
            Self::RangeOutOfSubnet { family, .. } => family.ranges_key(),
            Self::StaticDynamicConflict { family, .. } => family.address_key(),
        }
    }

    /// Syntax errors in a single value, as opposed to topology conflicts.
    pub fn is_malformed_input(&self) -> bool {
        matches!(
            self,
            Self::MalformedSubnet { .. } | Self::MalformedRange { .. } | Self::MalformedAddress { .. }
        )
    }
}
