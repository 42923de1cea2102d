//! # Sitemap Subcommand
//!
//! Renders the XML sitemap for `sitemap.base_url`. Writes to `--output` when
//! given, prints to stdout otherwise.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use sitegraph_core::SitegraphConfig;
use sitegraph_manifest::{build_entries, render_xml};

/// Arguments for `sitegraph sitemap`.
#[derive(Args, Debug, Default)]
pub struct SitemapArgs {
    /// Write the sitemap to this file.
    #[arg(long, short, conflicts_with = "show")]
    pub output: Option<PathBuf>,

    /// Print the sitemap to stdout.
    #[arg(long)]
    pub show: bool,
}

/// Execute the sitemap subcommand.
pub fn run_sitemap(args: &SitemapArgs, config: &SitegraphConfig) -> Result<u8> {
    let base_url = config.sitemap.base_url.as_str();
    if base_url.is_empty() {
        tracing::warn!("sitemap.base_url is empty; locations will be relative");
    }

    let repository = crate::open_repository(config)?;
    let snapshot = repository.snapshot();
    let entries = build_entries(&snapshot, base_url);
    let xml = render_xml(&entries).context("failed to render sitemap")?;

    match &args.output {
        Some(path) if !args.show => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
            std::fs::write(path, &xml)
                .with_context(|| format!("failed to write sitemap: {}", path.display()))?;
            println!(
                "OK: wrote {} sitemap entries to {}",
                entries.len(),
                path.display()
            );
        }
        _ => print!("{xml}"),
    }
    Ok(0)
}
