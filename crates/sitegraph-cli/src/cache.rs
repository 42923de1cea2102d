//! # Cache Subcommands
//!
//! `rebuild` runs discovery and persists the manifest; `clear` removes the
//! cache artifact.
//!
//! `rebuild` without `--force` keeps an existing artifact so repeated
//! deploy hooks stay cheap. A rebuilt manifest that violates its invariants
//! exits with `1`.

use anyhow::{Context, Result};
use clap::Args;

use sitegraph_core::{Manifest, ManifestDigest, SitegraphConfig};
use sitegraph_manifest::{CacheStore, RebuildOutcome};
use sitegraph_pipeline::DiscoveryReport;

/// Arguments for `sitegraph rebuild`.
#[derive(Args, Debug)]
pub struct RebuildArgs {
    /// Recompute even when a cache artifact already exists.
    #[arg(long)]
    pub force: bool,
}

/// Execute the rebuild subcommand.
pub fn run_rebuild(args: &RebuildArgs, config: &SitegraphConfig) -> Result<u8> {
    let repository = crate::open_repository(config)?;
    if repository.cache().is_none() {
        tracing::warn!("manifest cache is disabled or has no path; nothing will be persisted");
    }

    let outcome = repository
        .rebuild(args.force)
        .context("failed to rebuild manifest")?;

    match outcome {
        RebuildOutcome::CacheKept { records } => {
            println!("OK: kept existing cache ({records} records); pass --force to rebuild");
            Ok(0)
        }
        RebuildOutcome::Rebuilt(report) => {
            print_report(&report);
            let digest =
                ManifestDigest::of(&report.manifest).context("failed to digest manifest")?;
            println!("  Digest: {digest}");
            let code = check_manifest(&report.manifest);
            if code == 0 {
                match repository.cache() {
                    Some(cache) => {
                        println!("OK: wrote manifest cache to {}", cache.path().display())
                    }
                    None => println!("OK: manifest rebuilt"),
                }
            }
            Ok(code)
        }
    }
}

fn print_report(report: &DiscoveryReport) {
    println!(
        "Scanned {} entities: {} records, {} without routes",
        report.scanned,
        report.manifest.len(),
        report.excluded
    );
    if !report.collisions.is_empty() {
        println!("Route collisions ({}):", report.collisions.len());
        for c in &report.collisions {
            println!(
                "  {}: {} replaced by {}",
                c.route_name, c.replaced_entity, c.winner_entity
            );
        }
    }
    if !report.skipped.is_empty() {
        println!("Skipped entities ({}):", report.skipped.len());
        for s in &report.skipped {
            println!("  {}: {}", s.entity_id, s.reason);
        }
    }
}

/// Print invariant violations; returns the exit code.
fn check_manifest(manifest: &Manifest) -> u8 {
    let violations = manifest.validate();
    if violations.is_empty() {
        return 0;
    }
    println!("FAIL: manifest has {} invariant violations", violations.len());
    for v in &violations {
        println!("  {v}");
    }
    1
}

// ---------------------------------------------------------------------------
// clear
// ---------------------------------------------------------------------------

/// Arguments for `sitegraph clear`.
#[derive(Args, Debug)]
pub struct ClearArgs {}

/// Execute the clear subcommand. Requires `cache.path`.
pub fn run_clear(_args: &ClearArgs, config: &SitegraphConfig) -> Result<u8> {
    let path = config.cache_path()?;
    let store = CacheStore::new(path);
    if store.clear().context("failed to clear manifest cache")? {
        println!("OK: removed {}", path.display());
    } else {
        println!("OK: no cache at {}", path.display());
    }
    Ok(0)
}
