//! CLI error types with miette diagnostics.
//!
//! Maps `ValidationError` and `ConfigError` into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use bootnet_config::ConfigError;
use bootnet_core::ValidationError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const CONFLICT: i32 = 6;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Validation verdicts ──────────────────────────────────────────

    #[error(transparent)]
    #[diagnostic(
        code(bootnet::topology_conflict),
        help(
            "The proposed networks cannot be combined into one cluster.\n\
             Adjust the conflicting values and run the bootstrap round again.\n\
             Try: bootnet inspect <FILE> to review what each system proposes"
        )
    )]
    TopologyConflict(ValidationError),

    #[error(transparent)]
    #[diagnostic(
        code(bootnet::malformed_input),
        help("CIDRs use <address>/<prefix>; ranges use <start>-<end>, comma-separated.")
    )]
    MalformedInput(ValidationError),

    // ── Round file ───────────────────────────────────────────────────

    #[error("Could not read round file {path}")]
    #[diagnostic(code(bootnet::round_file))]
    RoundFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid round file {path}: {reason}")]
    #[diagnostic(
        code(bootnet::round_parse),
        help("Expected a [systems.<name>] table per candidate, each with an address and networks.")
    )]
    RoundParse { path: String, reason: String },

    #[error("Unsupported round file format for {path}")]
    #[diagnostic(
        code(bootnet::round_format),
        help("Use a .toml, .json, .yaml or .yml extension.")
    )]
    UnsupportedFormat { path: String },

    #[error("No local node {what} given")]
    #[diagnostic(
        code(bootnet::missing_local),
        help("Pass {flag} or add it to the [local] section of the round file.")
    )]
    MissingLocal { what: String, flag: String },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(bootnet::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error(transparent)]
    #[diagnostic(
        code(bootnet::config),
        help("Check the config file (bootnet config path) and BOOTNET_* environment variables.")
    )]
    Config(ConfigError),

    #[error("Config file already exists at {path}")]
    #[diagnostic(
        code(bootnet::config_exists),
        help("Use --force to overwrite it, or edit the file directly.")
    )]
    ConfigExists { path: String },

    // ── IO / Serialization ────────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render {format} output: {reason}")]
    #[diagnostic(code(bootnet::render))]
    Render { format: String, reason: String },
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::TopologyConflict(_) | Self::ConfigExists { .. } => exit_code::CONFLICT,
            Self::MalformedInput(_)
            | Self::RoundParse { .. }
            | Self::UnsupportedFormat { .. }
            | Self::MissingLocal { .. }
            | Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── Library error → CliError mapping ─────────────────────────────────

impl From<ValidationError> for CliError {
    fn from(err: ValidationError) -> Self {
        if err.is_malformed_input() {
            Self::MalformedInput(err)
        } else {
            Self::TopologyConflict(err)
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            ConfigError::Io(e) => Self::Io(e),
            other => Self::Config(other),
        }
    }
}
