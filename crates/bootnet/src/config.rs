//! CLI configuration: a thin wrapper around `bootnet_config` shared types.
//!
//! Re-exports the shared types and adds resolution that respects
//! `GlobalOpts` (`--config`) and per-command flag overrides.

use std::path::PathBuf;

use bootnet_core::ValidatorSettings;

use crate::cli::{GlobalOpts, ValidateArgs};
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use bootnet_config::{Config, config_path, load_config_from, save_config_to};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Config file in effect: `--config` / `BOOTNET_CONFIG`, else the platform path.
pub fn active_path(global: &GlobalOpts) -> PathBuf {
    global.config.clone().unwrap_or_else(config_path)
}

/// Load the config in effect for this invocation.
pub fn load(global: &GlobalOpts) -> Result<Config, CliError> {
    Ok(load_config_from(&active_path(global))?)
}

/// Merge `validate` flag overrides into the config and resolve validator
/// settings. Flags go through the same bounds checks as file values.
pub fn resolve_validator_settings(
    cfg: &Config,
    args: &ValidateArgs,
) -> Result<ValidatorSettings, CliError> {
    let mut cfg = cfg.clone();
    if let Some(prefix) = args.mgmt_prefix4 {
        cfg.management.ipv4_prefix = prefix;
    }
    if let Some(prefix) = args.mgmt_prefix6 {
        cfg.management.ipv6_prefix = prefix;
    }
    apply_uplink_override(&mut cfg, args.uplink.as_deref());
    Ok(cfg.validator_settings()?)
}

/// Validator settings with only the uplink name overridden.
pub fn resolve_uplink_settings(
    cfg: &Config,
    uplink: Option<&str>,
) -> Result<ValidatorSettings, CliError> {
    let mut cfg = cfg.clone();
    apply_uplink_override(&mut cfg, uplink);
    Ok(cfg.validator_settings()?)
}

fn apply_uplink_override(cfg: &mut Config, uplink: Option<&str>) {
    if let Some(name) = uplink {
        name.clone_into(&mut cfg.uplink.name);
    }
}
