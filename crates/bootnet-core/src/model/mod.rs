// ── Bootstrap domain model ──
//
// Raw, string-keyed proposals exactly as the negotiation layer hands them
// over. Typed facts are produced from these by `crate::extract`.

pub mod candidate;
pub mod round;

pub use candidate::{CandidateSystem, NetworkKind, NetworkProposal, UPLINK_NETWORK};
pub use round::{BootstrapContext, BootstrapMode, BootstrapRound};
