//! # List Subcommand
//!
//! Prints manifest routes as an aligned table or as JSON. Filters combine:
//! `--zone admin --nav` lists the navigable admin routes.

use anyhow::{Context, Result};
use clap::Args;

use sitegraph_core::{ComponentRecord, SitegraphConfig};
use sitegraph_manifest::ManifestSnapshot;

/// Arguments for `sitegraph list`.
#[derive(Args, Debug, Default)]
pub struct ListArgs {
    /// Only routes in this zone.
    #[arg(long)]
    pub zone: Option<String>,

    /// Only public routes.
    #[arg(long)]
    pub public: bool,

    /// Only routes shown in navigation.
    #[arg(long)]
    pub nav: bool,

    /// Print full records as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Execute the list subcommand.
pub fn run_list(args: &ListArgs, config: &SitegraphConfig) -> Result<u8> {
    let repository = crate::open_repository(config)?;
    let snapshot = repository.snapshot();
    let records = select(&snapshot, args);

    if args.json {
        let json =
            serde_json::to_string_pretty(&records).context("failed to serialize records")?;
        println!("{json}");
    } else if records.is_empty() {
        println!("No routes found.");
    } else {
        print!("{}", render_table(&records));
    }
    Ok(0)
}

fn select<'a>(snapshot: &'a ManifestSnapshot, args: &'a ListArgs) -> Vec<&'a ComponentRecord> {
    let base: Vec<&ComponentRecord> = match (args.nav, args.zone.as_deref()) {
        (true, Some(zone)) => snapshot.navigation_for_zone(zone).collect(),
        (true, None) => snapshot.navigation_items().collect(),
        (false, Some(zone)) => snapshot.by_zone(zone).collect(),
        (false, None) => snapshot.all().collect(),
    };
    base.into_iter()
        .filter(|r| !args.public || r.is_public())
        .collect()
}

const HEADERS: [&str; 5] = ["NAME", "METHODS", "URI", "ZONE", "ACCESS"];

fn access_summary(record: &ComponentRecord) -> String {
    let access = &record.access;
    if access.is_public() {
        return "public".to_string();
    }
    let mut parts: Vec<String> = Vec::new();
    parts.extend(access.permissions.iter().cloned());
    parts.extend(access.roles.iter().map(|r| format!("role:{r}")));
    if parts.is_empty() {
        "auth".to_string()
    } else {
        parts.join(",")
    }
}

fn render_table(records: &[&ComponentRecord]) -> String {
    let rows: Vec<[String; 5]> = records
        .iter()
        .map(|r| {
            [
                r.name().to_string(),
                r.route.methods.join("|"),
                r.route.full_uri.clone(),
                r.route.zone.clone(),
                access_summary(r),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }

    let mut out = String::new();
    let mut line = |cells: [&str; 5]| {
        let formatted: Vec<String> = cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect();
        out.push_str(formatted.join("  ").trim_end());
        out.push('\n');
    };
    line(HEADERS);
    for row in &rows {
        line([
            row[0].as_str(),
            row[1].as_str(),
            row[2].as_str(),
            row[3].as_str(),
            row[4].as_str(),
        ]);
    }
    out.push_str(&format!("{} routes\n", rows.len()));
    out
}
