//! Clap derive structures for the `bootnet` CLI.
//!
//! Defines the command tree, global flags, and shared value enums. This file
//! is also compiled by `build.rs` for man page generation, so it must only
//! depend on clap and clap_complete.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// bootnet -- pre-flight network checks for cluster bootstrap
#[derive(Debug, Parser)]
#[command(
    name = "bootnet",
    version,
    about = "Validate cluster bootstrap network proposals",
    long_about = "Checks the uplink and overlay networks proposed by every candidate in a\n\
        bootstrap round against each other and against the management network,\n\
        before any node is committed to the new cluster.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Output format [default: from config, else table]
    #[arg(long, short = 'o', env = "BOOTNET_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output [default: from config, else auto]
    #[arg(long, global = true)]
    pub color: Option<ColorMode>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Path to an alternate config file
    #[arg(long, env = "BOOTNET_CONFIG", global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

/// How the validating node relates to the round.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Fresh bootstrap if the local node is one of the candidates, else join
    #[default]
    Auto,
    /// Forming a new cluster: run every check
    Fresh,
    /// Joining an existing cluster: skip topology checks
    Join,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Validate a bootstrap round's network proposals
    #[command(alias = "check")]
    Validate(ValidateArgs),

    /// Show the typed network facts extracted from each candidate
    Inspect(InspectArgs),

    /// Manage CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  VALIDATE
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Round description file (.toml, .json, .yaml)
    pub file: PathBuf,

    /// Name of the validating node (overrides [local] in the round file)
    #[arg(long, value_name = "NAME")]
    pub local: Option<String>,

    /// Management address of the validating node
    #[arg(long, value_name = "ADDR")]
    pub local_address: Option<String>,

    /// Bootstrap mode
    #[arg(long, value_enum, default_value_t = ModeArg::Auto)]
    pub mode: ModeArg,

    /// IPv4 management prefix length (overrides config)
    #[arg(long = "mgmt-prefix4", value_name = "N")]
    pub mgmt_prefix4: Option<u8>,

    /// IPv6 management prefix length (overrides config)
    #[arg(long = "mgmt-prefix6", value_name = "N")]
    pub mgmt_prefix6: Option<u8>,

    /// Name of the uplink network (overrides config)
    #[arg(long, value_name = "NAME")]
    pub uplink: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  INSPECT
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct InspectArgs {
    /// Round description file (.toml, .json, .yaml)
    pub file: PathBuf,

    /// Name of the uplink network (overrides config)
    #[arg(long, value_name = "NAME")]
    pub uplink: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Write a config file with default values
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Display current resolved configuration
    Show,

    /// Print the config file location
    Path,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
