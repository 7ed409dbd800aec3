//! `bootnet validate`: run the topology validator over a round file.

use std::fmt::Write as _;

use serde::Serialize;
use tracing::info;

use bootnet_core::{
    AddressFamily, BootstrapContext, BootstrapMode, BootstrapRound, ValidationError,
    ValidatorSettings, ViolationKind, validate_systems,
};

use crate::cli::{ModeArg, ValidateArgs};
use crate::config::{self, Config};
use crate::error::CliError;
use crate::output::{self, Rendering};
use crate::round_file;

// ── Report ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
enum Verdict {
    Accepted,
    Rejected,
}

impl Verdict {
    fn as_str(self) -> &'static str {
        match self {
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }
}

#[derive(Debug, Serialize)]
struct Violation {
    kind: ViolationKind,
    system: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    family: Option<AddressFamily>,
    key: String,
    message: String,
}

impl From<&ValidationError> for Violation {
    fn from(err: &ValidationError) -> Self {
        Self {
            kind: err.kind(),
            system: err.system().to_owned(),
            family: err.family(),
            key: err.key().to_owned(),
            message: err.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ValidationReport {
    status: Verdict,
    mode: BootstrapMode,
    local: String,
    local_address: String,
    candidates: Vec<String>,
    uplink: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    violation: Option<Violation>,
}

impl ValidationReport {
    fn new(
        context: &BootstrapContext,
        round: &BootstrapRound,
        settings: &ValidatorSettings,
        error: Option<&ValidationError>,
    ) -> Self {
        Self {
            status: if error.is_some() {
                Verdict::Rejected
            } else {
                Verdict::Accepted
            },
            mode: context.mode,
            local: context.name.clone(),
            local_address: context.address.clone(),
            candidates: round.names().map(str::to_owned).collect(),
            uplink: settings.uplink_name.clone(),
            violation: error.map(Violation::from),
        }
    }
}

fn mode_label(mode: BootstrapMode) -> &'static str {
    match mode {
        BootstrapMode::FreshBootstrap => "fresh bootstrap",
        BootstrapMode::JoinExisting => "join existing (checks skipped)",
    }
}

fn detail(report: &ValidationReport, color: bool) -> String {
    let mut out = String::new();
    let verdict = match report.status {
        Verdict::Accepted => output::accepted("Network topology accepted", color),
        Verdict::Rejected => output::rejected("Network topology rejected", color),
    };
    let _ = writeln!(out, "{verdict}");

    let row = |out: &mut String, name: &str, value: &str| {
        let _ = writeln!(out, "  {:<12} {value}", output::label(name, color));
    };
    row(&mut out, "Mode", mode_label(report.mode));
    row(
        &mut out,
        "Local",
        &format!("{} ({})", report.local, report.local_address),
    );
    row(&mut out, "Candidates", &report.candidates.join(", "));
    row(&mut out, "Uplink", &report.uplink);
    if let Some(ref violation) = report.violation {
        row(&mut out, "Violation", violation.kind.as_ref());
    }

    out.trim_end().to_owned()
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: &ValidateArgs, cfg: &Config, render: Rendering) -> Result<(), CliError> {
    let settings = config::resolve_validator_settings(cfg, args)?;
    let file = round_file::load(&args.file)?;

    let name = file.local_name(args.local.as_deref())?;
    let address = file.local_address(&name, args.local_address.as_deref())?;
    let mode = match args.mode {
        ModeArg::Auto => BootstrapMode::detect(&name, &file.systems),
        ModeArg::Fresh => BootstrapMode::FreshBootstrap,
        ModeArg::Join => BootstrapMode::JoinExisting,
    };
    let context = BootstrapContext::new(name, address, mode);
    info!(
        local = %context.name,
        mode = mode_label(mode),
        candidates = file.systems.len(),
        "validating bootstrap round"
    );

    let outcome = validate_systems(&context, &file.systems, &settings);
    let report = ValidationReport::new(&context, &file.systems, &settings, outcome.as_ref().err());

    let out = output::render_single(
        render.format,
        &report,
        |r| detail(r, render.color),
        |r| r.status.as_str().to_owned(),
    )?;
    output::print_output(&out, render.quiet);

    outcome.map_err(CliError::from)
}
