// ── Bootstrap round and context ──

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::candidate::CandidateSystem;

/// Whether this validation pass is forming a new cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BootstrapMode {
    /// A new cluster is being formed from the round; validate everything.
    FreshBootstrap,
    /// Candidates are joining an established cluster whose network is
    /// already in use; nothing is re-validated.
    JoinExisting,
}

impl BootstrapMode {
    /// Infer the mode the way the discovery layer signals it: the local node
    /// only appears among the candidates when it is bootstrapping itself.
    pub fn detect(local_name: &str, round: &BootstrapRound) -> Self {
        if round.contains(local_name) {
            Self::FreshBootstrap
        } else {
            Self::JoinExisting
        }
    }
}

/// The node performing validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BootstrapContext {
    pub name: String,
    /// Management address of the local node, without prefix length.
    pub address: String,
    pub mode: BootstrapMode,
}

impl BootstrapContext {
    pub fn new(name: impl Into<String>, address: impl Into<String>, mode: BootstrapMode) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            mode,
        }
    }

    /// Build a context whose mode is inferred from round membership.
    pub fn detect(name: impl Into<String>, address: impl Into<String>, round: &BootstrapRound) -> Self {
        let name = name.into();
        let mode = BootstrapMode::detect(&name, round);
        Self::new(name, address, mode)
    }
}

/// Snapshot of every candidate in one bootstrap attempt, keyed by name.
///
/// Iteration is in name order so the first reported violation does not
/// depend on discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<String, CandidateSystem>",
    into = "BTreeMap<String, CandidateSystem>"
)]
pub struct BootstrapRound {
    systems: BTreeMap<String, CandidateSystem>,
}

impl BootstrapRound {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a candidate, returning any previous candidate with the same name.
    pub fn insert(&mut self, system: CandidateSystem) -> Option<CandidateSystem> {
        self.systems.insert(system.name.clone(), system)
    }

    pub fn with(mut self, system: CandidateSystem) -> Self {
        self.insert(system);
        self
    }

    pub fn get(&self, name: &str) -> Option<&CandidateSystem> {
        self.systems.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.systems.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CandidateSystem> {
        self.systems.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.systems.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.systems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }
}

impl From<BTreeMap<String, CandidateSystem>> for BootstrapRound {
    fn from(mut systems: BTreeMap<String, CandidateSystem>) -> Self {
        // The map key is authoritative for the candidate's name.
        for (name, system) in &mut systems {
            system.name.clone_from(name);
        }
        Self { systems }
    }
}

impl From<BootstrapRound> for BTreeMap<String, CandidateSystem> {
    fn from(round: BootstrapRound) -> Self {
        round.systems
    }
}

impl FromIterator<CandidateSystem> for BootstrapRound {
    fn from_iter<I: IntoIterator<Item = CandidateSystem>>(iter: I) -> Self {
        let mut round = Self::new();
        for system in iter {
            round.insert(system);
        }
        round
    }
}
