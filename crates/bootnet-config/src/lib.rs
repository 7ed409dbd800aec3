//! Shared configuration for bootnet.
//!
//! TOML file + environment layering, resolved into
//! `bootnet_core::ValidatorSettings`. The binary adds flag-aware overrides
//! on top.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use bootnet_core::config::{DEFAULT_MANAGEMENT_PREFIX_V4, DEFAULT_MANAGEMENT_PREFIX_V6};
use bootnet_core::{AddressFamily, UPLINK_NETWORK, ValidatorSettings};

/// Prefix for environment overrides, e.g. `BOOTNET_MANAGEMENT__IPV4_PREFIX=16`.
pub const ENV_PREFIX: &str = "BOOTNET_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Output defaults for the CLI.
    #[serde(default)]
    pub defaults: Defaults,

    /// Cluster-wide management network parameters.
    #[serde(default)]
    pub management: Management,

    /// Uplink network naming.
    #[serde(default)]
    pub uplink: Uplink,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}

/// The management network's prefix is fixed cluster-wide; candidates only
/// report bare addresses.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Management {
    #[serde(default = "default_ipv4_prefix")]
    pub ipv4_prefix: u8,

    #[serde(default = "default_ipv6_prefix")]
    pub ipv6_prefix: u8,
}

impl Default for Management {
    fn default() -> Self {
        Self {
            ipv4_prefix: default_ipv4_prefix(),
            ipv6_prefix: default_ipv6_prefix(),
        }
    }
}

fn default_ipv4_prefix() -> u8 {
    DEFAULT_MANAGEMENT_PREFIX_V4
}
fn default_ipv6_prefix() -> u8 {
    DEFAULT_MANAGEMENT_PREFIX_V6
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Uplink {
    /// Reserved name of the uplink physical network.
    #[serde(default = "default_uplink_name")]
    pub name: String,
}

impl Default for Uplink {
    fn default() -> Self {
        Self {
            name: default_uplink_name(),
        }
    }
}

fn default_uplink_name() -> String {
    UPLINK_NETWORK.into()
}

impl Config {
    /// Translate into the core validator's settings, checking bounds.
    pub fn validator_settings(&self) -> Result<ValidatorSettings, ConfigError> {
        check_prefix(
            "management.ipv4_prefix",
            self.management.ipv4_prefix,
            AddressFamily::Ipv4,
        )?;
        check_prefix(
            "management.ipv6_prefix",
            self.management.ipv6_prefix,
            AddressFamily::Ipv6,
        )?;
        if self.uplink.name.trim().is_empty() {
            return Err(ConfigError::Validation {
                field: "uplink.name".into(),
                reason: "must not be empty".into(),
            });
        }

        Ok(ValidatorSettings {
            uplink_name: self.uplink.name.clone(),
            management_prefix_v4: self.management.ipv4_prefix,
            management_prefix_v6: self.management.ipv6_prefix,
        })
    }
}

fn check_prefix(field: &str, prefix: u8, family: AddressFamily) -> Result<(), ConfigError> {
    if prefix > family.bits() {
        return Err(ConfigError::Validation {
            field: field.into(),
            reason: format!(
                "{family} prefix length must be <= {}, got {prefix}",
                family.bits()
            ),
        });
    }
    Ok(())
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("dev", "bootnet", "bootnet").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("bootnet");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load from an explicit file + environment. A missing file is not an
/// error; defaults fill the gaps.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    debug!(path = %path.display(), "loading configuration");

    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write it to `path`, creating parents.
pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.validator_settings().unwrap(), ValidatorSettings::default());
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[management]\nipv4_prefix = 16\n\n[uplink]\nname = \"ext0\"\n",
        )
        .unwrap();

        let cfg = load_config_from(&path).unwrap();
        assert_eq!(cfg.management.ipv4_prefix, 16);
        assert_eq!(cfg.management.ipv6_prefix, 64);
        assert_eq!(cfg.defaults.output, "table");

        let settings = cfg.validator_settings().unwrap();
        assert_eq!(settings.uplink_name, "ext0");
        assert_eq!(settings.management_prefix_v4, 16);
    }

    #[test]
    fn out_of_range_prefix_is_rejected() {
        let cfg = Config {
            management: Management {
                ipv4_prefix: 33,
                ..Management::default()
            },
            ..Config::default()
        };
        let err = cfg.validator_settings().unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "management.ipv4_prefix"));
    }

    #[test]
    fn empty_uplink_name_is_rejected() {
        let cfg = Config {
            uplink: Uplink { name: "  ".into() },
            ..Config::default()
        };
        assert!(cfg.validator_settings().is_err());
    }

    #[test]
    fn save_then_load_preserves_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let cfg = Config {
            management: Management {
                ipv4_prefix: 20,
                ipv6_prefix: 56,
            },
            ..Config::default()
        };
        save_config_to(&cfg, &path).unwrap();
        assert_eq!(load_config_from(&path).unwrap(), cfg);
    }

    #[test]
    fn invalid_toml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[management]\nipv4_prefix = \"wide\"\n").unwrap();
        assert!(matches!(load_config_from(&path), Err(ConfigError::Figment(_))));
    }
}
