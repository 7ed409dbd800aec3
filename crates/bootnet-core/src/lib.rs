//! Network-topology validation for cluster bootstrap rounds.
//!
//! Before a set of candidate machines is merged into a new cluster, every
//! candidate's proposed uplink and logical networks must agree with each
//! other and with the management network the bootstrapping node already
//! uses. This crate is that gate:
//!
//! - **[`net`]**: range/subnet arithmetic over masked integers. Parses
//!   CIDRs and inclusive `<start>-<end>` ranges; answers containment and
//!   overlap, always family-strict.
//!
//! - **[`model`]**: the raw round as the negotiation layer hands it over:
//!   [`CandidateSystem`]s with string-keyed [`NetworkProposal`]s, plus the
//!   [`BootstrapContext`] of the validating node.
//!
//! - **[`extract`]**: turns one candidate's proposals into typed
//!   [`NetworkFacts`] (gateway, OVN ranges, static overlay addresses per
//!   family). Present-but-invalid keys fail here.
//!
//! - **[`validate_systems`]**: runs the per-candidate and cross-candidate
//!   checks and returns the first [`ValidationError`].
//!
//! Validation is synchronous and side-effect free: it reads an immutable
//! snapshot and returns a verdict. Nothing here performs I/O.

pub mod config;
pub mod error;
pub mod extract;
pub mod model;
pub mod net;
pub mod validate;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::ValidatorSettings;
pub use error::{ValidationError, ViolationKind};
pub use extract::{FamilyFacts, NetworkFacts, StaticAddress, extract};
pub use model::{
    BootstrapContext, BootstrapMode, BootstrapRound, CandidateSystem, NetworkKind,
    NetworkProposal, UPLINK_NETWORK,
};
pub use net::{AddressError, AddressFamily, AddressRange, Subnet};
pub use validate::validate_systems;
