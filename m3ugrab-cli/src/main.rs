mod cli;
mod lineup;
mod playlist;

use crate::cli::Args;
use crate::lineup::parse_lineup;
use anyhow::Context;
use clap::Parser;
use epg_gen::GuideBuilder;
use std::fs;
use std::path::Path;
use std::process;
use std::time::Duration;
use stream_resolvers::{
    ChannelRegistry, FALLBACK_URL, Resolution, ResolverError, ResolverFactory, default_client,
};
use tracing::{Level, debug, error, info, warn};
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

const TEMP_MARKER: &str = "temp.txt";
const TEMP_PREFIX: &str = "watch";

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_logging(args.verbose, args.quiet);

    if let Err(e) = run(args).await {
        error!("Application error: {e:#}");
        process::exit(1);
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let content = fs::read_to_string(&args.input)
        .with_context(|| format!("Failed to read lineup file {}", args.input.display()))?;
    let blocks = parse_lineup(&content).context("Malformed lineup file")?;

    let client = default_client(Duration::from_secs(args.timeout));
    let factory = ResolverFactory::new(client);
    let mut registry = ChannelRegistry::new();

    println!("{}", playlist::header_line());

    for block in &blocks {
        println!();
        println!("{}", playlist::extinf_line(&block.meta));

        for url in &block.urls {
            let resolver = match factory.create_resolver(url) {
                Ok(resolver) => resolver,
                Err(ResolverError::UnsupportedPlatform(host)) => {
                    warn!(%host, %url, "skipping unsupported platform");
                    continue;
                }
                Err(e) => {
                    return Err(e).with_context(|| format!("Cannot dispatch {url}"));
                }
            };

            debug!(platform = resolver.platform_name(), %url, "resolving stream");
            let resolution = resolver
                .resolve(&block.meta.identity, &mut registry)
                .await
                .with_context(|| format!("Failed to resolve {url}"))?;

            match resolution {
                Resolution::Live(stream_url) => println!("{stream_url}"),
                Resolution::Offline => println!("{FALLBACK_URL}"),
            }
        }
    }

    let guide = GuideBuilder::new()
        .build(registry.records())
        .context("Failed to build the guide document")?;
    fs::write(&args.epg_output, &guide)
        .with_context(|| format!("Failed to write {}", args.epg_output.display()))?;
    info!(
        channels = registry.len(),
        guide = %args.epg_output.display(),
        "guide document written"
    );

    cleanup_workdir().context("Failed to clean up temp files")?;

    Ok(())
}

/// Leftovers from interrupted runs: a `temp.txt` marker plus `watch*` scratch
/// files in the working directory.
fn cleanup_workdir() -> std::io::Result<()> {
    if !Path::new(TEMP_MARKER).exists() {
        return Ok(());
    }
    fs::remove_file(TEMP_MARKER)?;

    for entry in fs::read_dir(".")? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        if entry.file_name().to_string_lossy().starts_with(TEMP_PREFIX) {
            debug!(file = %entry.path().display(), "removing scratch file");
            fs::remove_file(entry.path())?;
        }
    }
    Ok(())
}

fn init_logging(verbose: bool, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env().add_directive(Level::INFO.into())
    };

    // Logs go to stderr; stdout is the playlist.
    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}
