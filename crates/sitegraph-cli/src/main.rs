//! # sitegraph CLI entry point
//!
//! Parses command-line arguments, loads the configuration, and dispatches
//! to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use sitegraph_cli::cache::{run_clear, run_rebuild, ClearArgs, RebuildArgs};
use sitegraph_cli::list::{run_list, ListArgs};
use sitegraph_cli::sitemap::{run_sitemap, SitemapArgs};

/// Exit code for configuration and I/O failures.
const EXIT_OPERATIONAL_ERROR: u8 = 2;

/// Route manifest tooling.
///
/// Discovers routable components, caches the resulting manifest, and derives
/// route listings and sitemaps from it.
#[derive(Parser, Debug)]
#[command(name = "sitegraph", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to the configuration file [default: sitegraph.yaml if present].
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run discovery and persist the manifest cache.
    Rebuild(RebuildArgs),

    /// Remove the manifest cache artifact.
    Clear(ClearArgs),

    /// List routes in the manifest.
    List(ListArgs),

    /// Render the XML sitemap.
    Sitemap(SitemapArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = sitegraph_cli::load_config(cli.config.as_deref()).and_then(|config| {
        match &cli.command {
            Commands::Rebuild(args) => run_rebuild(args, &config),
            Commands::Clear(args) => run_clear(args, &config),
            Commands::List(args) => run_list(args, &config),
            Commands::Sitemap(args) => run_sitemap(args, &config),
        }
    });

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(EXIT_OPERATIONAL_ERROR)
        }
    }
}
