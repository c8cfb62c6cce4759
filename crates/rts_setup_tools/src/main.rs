//! Post-Scarcity RTS - Match Setup Tool

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use rts_setup::prelude::*;
use rts_setup_tools::resolve::{resolve_session, ResolveRequest};
use rts_setup_tools::validate::{load_payload, round_trip};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "rts-setup")]
#[command(about = "Headless match setup for Post-Scarcity RTS")]
struct Cli {
    /// Settings catalog to use instead of the builtin one
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a setup session and print the launch payload
    Resolve {
        /// Directory holding random/, scenarios/ and skirmishes/ map headers
        #[arg(long)]
        maps: PathBuf,
        /// Map type: random, scenario or skirmish
        #[arg(long = "type", default_value = "random")]
        kind: MapType,
        /// Map name, or "random" to pick a random map
        #[arg(long)]
        map: String,
        /// Seed for random choices
        #[arg(long)]
        seed: Option<u64>,
        /// Number of players (random maps only)
        #[arg(long)]
        players: Option<usize>,
    },
    /// Check that a payload survives a round trip through the engine
    Validate {
        /// Payload JSON file
        payload: PathBuf,
        /// Directory holding random/, scenarios/ and skirmishes/ map headers
        #[arg(long)]
        maps: PathBuf,
    },
}

fn load_catalog(path: Option<&Path>) -> rts_setup::error::Result<SettingsCatalog> {
    match path {
        Some(path) => SettingsCatalog::load(path),
        None => SettingsCatalog::builtin(),
    }
}

fn run(cli: Cli) -> rts_setup_tools::Result<bool> {
    let catalog = load_catalog(cli.catalog.as_deref())?;

    match cli.command {
        Commands::Resolve {
            maps,
            kind,
            map,
            seed,
            players,
        } => {
            let cache = InMemoryMapCache::load_from_directory(&maps)?;
            tracing::info!(maps = cache.len(), "Loaded map headers from {}", maps.display());
            let request = ResolveRequest {
                kind,
                map,
                seed,
                players,
            };
            let payload = resolve_session(cache, catalog, &request)?;
            println!("{}", payload.to_json_pretty()?);
            Ok(true)
        }
        Commands::Validate { payload, maps } => {
            let cache = InMemoryMapCache::load_from_directory(&maps)?;
            let original = load_payload(&payload)?;
            let report = round_trip(&original, cache, catalog)?;
            if report.is_lossless() {
                tracing::info!("Round trip is lossless");
            } else {
                tracing::warn!("Round trip changed {} key(s)", report.changed_keys.len());
                for key in &report.changed_keys {
                    println!("changed: {key}");
                }
            }
            Ok(report.is_lossless())
        }
    }
}

fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    match run(Cli::parse()) {
        Ok(true) => {}
        Ok(false) => std::process::exit(2),
        Err(e) => {
            tracing::error!("{e}");
            std::process::exit(1);
        }
    }
}
