//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders data in the format selected by `--output` (or the config
//! default). Table uses `tabled`, structured formats use serde, plain emits
//! one identifier per line.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use crate::cli::{ColorMode, GlobalOpts, OutputFormat};
use crate::config::Config;
use crate::error::CliError;

// ── Resolved output settings ─────────────────────────────────────────

/// Output settings after merging flags with config defaults.
#[derive(Debug, Clone, Copy)]
pub struct Rendering {
    pub format: OutputFormat,
    pub color: bool,
    pub quiet: bool,
}

impl Rendering {
    /// Flags win over `[defaults]`; unknown config values fall back to
    /// table / auto.
    pub fn resolve(global: &GlobalOpts, cfg: &Config) -> Self {
        let format = global
            .output
            .or_else(|| parse_value(&cfg.defaults.output, "defaults.output"))
            .unwrap_or(OutputFormat::Table);
        let color = global
            .color
            .or_else(|| parse_value(&cfg.defaults.color, "defaults.color"))
            .unwrap_or(ColorMode::Auto);

        Self {
            format,
            color: should_color(color),
            quiet: global.quiet,
        }
    }
}

fn parse_value<T: clap::ValueEnum>(value: &str, field: &str) -> Option<T> {
    let parsed = T::from_str(value, true).ok();
    if parsed.is_none() {
        tracing::warn!(field, value, "ignoring unrecognized config value");
    }
    parsed
}

// ── Color helpers ────────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

/// Green verdict text, or plain when color is off.
pub fn accepted(text: &str, color: bool) -> String {
    if color {
        text.green().bold().to_string()
    } else {
        text.to_owned()
    }
}

/// Red verdict text, or plain when color is off.
pub fn rejected(text: &str, color: bool) -> String {
    if color {
        text.red().bold().to_string()
    } else {
        text.to_owned()
    }
}

/// Dimmed label text, or plain when color is off.
pub fn label(text: &str, color: bool) -> String {
    if color {
        text.dimmed().to_string()
    } else {
        text.to_owned()
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a list of serde-serializable items in the chosen format.
///
/// - `table`: `to_row` builds one `Tabled` row per item
/// - `json` / `json-compact` / `yaml`: serializes the original data
/// - `plain`: calls `id_fn` on each item to emit one identifier per line
pub fn render_list<T, R>(
    format: OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            Ok(render_table(&rows))
        }
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => Ok(data.iter().map(&id_fn).collect::<Vec<_>>().join("\n")),
    }
}

/// Render a single serde-serializable item in the chosen format.
///
/// Table rendering uses `detail_fn`, which returns a pre-formatted string.
pub fn render_single<T>(
    format: OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize,
{
    match format {
        OutputFormat::Table => Ok(detail_fn(data)),
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => Ok(id_fn(data)),
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Format-specific renderers ────────────────────────────────────────

fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

fn render_json<T: serde::Serialize + ?Sized>(data: &T, compact: bool) -> Result<String, CliError> {
    let rendered = if compact {
        serde_json::to_string(data)
    } else {
        serde_json::to_string_pretty(data)
    };
    rendered.map_err(|e| CliError::Render {
        format: "JSON".into(),
        reason: e.to_string(),
    })
}

fn render_yaml<T: serde::Serialize + ?Sized>(data: &T) -> Result<String, CliError> {
    serde_yaml::to_string(data).map_err(|e| CliError::Render {
        format: "YAML".into(),
        reason: e.to_string(),
    })
}
