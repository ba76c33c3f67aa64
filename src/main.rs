//! Playlist Forge - match a local music folder to catalog tracks and
//! publish them as a Spotify playlist.
//!
//! Tags are read first; untagged files fall back to "Artist - Title" file
//! names. Each file is searched in tiers (artist and title, primary artist
//! only, title only) and the first hit is kept.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod enrichment;
pub mod error;
pub mod metadata;
pub mod model;
pub mod pipeline;
pub mod publisher;
pub mod scanner;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> anyhow::Result<()> {
    // A .env file in the working directory can supply SPOTIPY_* values
    dotenvy::dotenv().ok();
    let args = cli::Cli::parse();

    // Initialize logging
    let level = if args.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("playlist_forge={}", level)));
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(filter)
        .init();

    cli::run_command(&args)
}
