//! `bootnet inspect`: show the typed facts extracted from each candidate.

use tabled::Tabled;
use tracing::debug;

use bootnet_core::{FamilyFacts, NetworkFacts, extract};

use crate::cli::InspectArgs;
use crate::config::{self, Config};
use crate::error::CliError;
use crate::output::{self, Rendering};
use crate::round_file;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct FactsRow {
    #[tabled(rename = "System")]
    system: String,
    #[tabled(rename = "Management")]
    management: String,
    #[tabled(rename = "IPv4 Gateway")]
    ipv4_gateway: String,
    #[tabled(rename = "IPv4 OVN Ranges")]
    ipv4_ranges: String,
    #[tabled(rename = "IPv6 Gateway")]
    ipv6_gateway: String,
    #[tabled(rename = "IPv6 OVN Ranges")]
    ipv6_ranges: String,
    #[tabled(rename = "Static")]
    static_addresses: String,
}

fn gateway(facts: &FamilyFacts) -> String {
    facts.gateway.map(|g| g.to_string()).unwrap_or_default()
}

fn ranges(facts: &FamilyFacts) -> String {
    facts
        .ranges
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl From<&NetworkFacts> for FactsRow {
    fn from(f: &NetworkFacts) -> Self {
        let static_addresses = f
            .ipv4
            .static_addresses
            .iter()
            .chain(&f.ipv6.static_addresses)
            .map(|s| format!("{}={}", s.network, s.subnet))
            .collect::<Vec<_>>()
            .join(", ");

        let uplink_placeholder = if f.has_uplink { "" } else { "-" };
        let or_placeholder = |value: String| {
            if value.is_empty() {
                uplink_placeholder.to_owned()
            } else {
                value
            }
        };

        Self {
            system: f.system.clone(),
            management: f.management.to_string(),
            ipv4_gateway: or_placeholder(gateway(&f.ipv4)),
            ipv4_ranges: or_placeholder(ranges(&f.ipv4)),
            ipv6_gateway: or_placeholder(gateway(&f.ipv6)),
            ipv6_ranges: or_placeholder(ranges(&f.ipv6)),
            static_addresses,
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: &InspectArgs, cfg: &Config, render: Rendering) -> Result<(), CliError> {
    let settings = config::resolve_uplink_settings(cfg, args.uplink.as_deref())?;
    let file = round_file::load(&args.file)?;

    let facts = file
        .systems
        .iter()
        .map(|candidate| extract(candidate, &settings.uplink_name))
        .collect::<Result<Vec<_>, _>>()?;
    debug!(candidates = facts.len(), "extracted round facts");

    let out = output::render_list(
        render.format,
        &facts,
        |f| FactsRow::from(f),
        |f| f.system.clone(),
    )?;
    output::print_output(&out, render.quiet);
    Ok(())
}
