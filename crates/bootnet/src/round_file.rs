//! Round description files: the candidate set handed to `validate` and
//! `inspect`, in TOML, JSON or YAML chosen by extension.

use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use bootnet_core::BootstrapRound;

use crate::error::CliError;

/// Optional identity of the validating node, overridable by flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LocalNode {
    pub name: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RoundFile {
    #[serde(default)]
    pub local: LocalNode,
    #[serde(default)]
    pub systems: BootstrapRound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Toml,
    Json,
    Yaml,
}

impl Format {
    fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }
}

/// Read and parse a round description file.
pub fn load(path: &Path) -> Result<RoundFile, CliError> {
    let shown = path.display().to_string();
    let format = Format::from_path(path).ok_or_else(|| CliError::UnsupportedFormat {
        path: shown.clone(),
    })?;

    let contents = std::fs::read_to_string(path).map_err(|source| CliError::RoundFile {
        path: shown.clone(),
        source,
    })?;

    let round = parse(&contents, format).map_err(|reason| CliError::RoundParse {
        path: shown.clone(),
        reason,
    })?;

    debug!(path = %shown, candidates = round.systems.len(), "loaded round file");
    Ok(round)
}

fn parse(contents: &str, format: Format) -> Result<RoundFile, String> {
    match format {
        Format::Toml => toml::from_str(contents).map_err(|e| e.message().to_owned()),
        Format::Json => serde_json::from_str(contents).map_err(|e| e.to_string()),
        Format::Yaml => serde_yaml::from_str(contents).map_err(|e| e.to_string()),
    }
}

impl RoundFile {
    /// Local node name: flag, then `[local].name`.
    pub fn local_name(&self, flag: Option<&str>) -> Result<String, CliError> {
        flag.map(str::to_owned)
            .or_else(|| self.local.name.clone())
            .ok_or_else(|| CliError::MissingLocal {
                what: "name".into(),
                flag: "--local".into(),
            })
    }

    /// Local management address: flag, then `[local].address`, then the
    /// address the local node reports as a candidate.
    pub fn local_address(&self, name: &str, flag: Option<&str>) -> Result<String, CliError> {
        flag.map(str::to_owned)
            .or_else(|| self.local.address.clone())
            .or_else(|| self.systems.get(name).map(|s| s.address.clone()))
            .ok_or_else(|| CliError::MissingLocal {
                what: "address".into(),
                flag: "--local-address".into(),
            })
    }
}
