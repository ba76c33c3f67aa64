//! Command-line interface for playlist-forge.
//!
//! Subcommands for syncing a folder to a playlist, previewing metadata
//! offline, signing in, and managing the config file. Running without a
//! subcommand asks for the folder and playlist interactively.

mod commands;

pub use commands::{Cli, Commands, run_command};
