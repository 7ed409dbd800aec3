// ── Candidate system and network proposal types ──

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Reserved name of the uplink physical network.
pub const UPLINK_NETWORK: &str = "UPLINK";

/// Network type, as named by the network-creation layer.
///
/// Only `physical` (uplink) and `ovn` (logical overlay) networks take part
/// in validation; anything else is carried through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NetworkKind {
    Physical,
    Ovn,
    Other(String),
}

impl NetworkKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Physical => "physical",
            Self::Ovn => "ovn",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for NetworkKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "physical" => Self::Physical,
            "ovn" => Self::Ovn,
            _ => Self::Other(s),
        }
    }
}

impl From<&str> for NetworkKind {
    fn from(s: &str) -> Self {
        Self::from(s.to_owned())
    }
}

impl From<NetworkKind> for String {
    fn from(kind: NetworkKind) -> Self {
        match kind {
            NetworkKind::Other(s) => s,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for NetworkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One proposed network definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkProposal {
    pub name: String,
    #[serde(rename = "type", alias = "kind")]
    pub kind: NetworkKind,
    /// Raw string-keyed configuration. Unrecognized keys are ignored.
    #[serde(default)]
    pub config: BTreeMap<String, String>,
}

impl NetworkProposal {
    pub fn new(name: impl Into<String>, kind: impl Into<NetworkKind>) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            config: BTreeMap::new(),
        }
    }

    /// Uplink proposal with the reserved name.
    pub fn uplink() -> Self {
        Self::new(UPLINK_NETWORK, NetworkKind::Physical)
    }

    /// Logical overlay network.
    pub fn overlay(name: impl Into<String>) -> Self {
        Self::new(name, NetworkKind::Ovn)
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.insert(key.into(), value.into());
        self
    }

    /// A config value, if present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.config.get(key).map(String::as_str)
    }

    pub fn is_uplink(&self, uplink_name: &str) -> bool {
        self.kind == NetworkKind::Physical && self.name == uplink_name
    }

    pub fn is_overlay(&self) -> bool {
        self.kind == NetworkKind::Ovn
    }
}

/// One machine proposed to join the cluster.
///
/// Storage fields sent by the negotiation layer are accepted and dropped
/// during deserialization; they play no part in network validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateSystem {
    /// Unique within a round. When loaded from a round file this is filled
    /// from the map key.
    #[serde(default)]
    pub name: String,
    /// Management-network address, without a prefix length.
    pub address: String,
    #[serde(default)]
    pub networks: Vec<NetworkProposal>,
}

impl CandidateSystem {
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            networks: Vec::new(),
        }
    }

    pub fn with_network(mut self, network: NetworkProposal) -> Self {
        self.networks.push(network);
        self
    }

    /// The first uplink proposal named `uplink_name`, if any.
    pub fn uplink(&self, uplink_name: &str) -> Option<&NetworkProposal> {
        self.networks.iter().find(|n| n.is_uplink(uplink_name))
    }

    pub fn overlays(&self) -> impl Iterator<Item = &NetworkProposal> {
        self.networks.iter().filter(|n| n.is_overlay())
    }
}
