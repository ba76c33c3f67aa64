//! CLI command definitions and dispatch.
//!
//! Each subcommand is implemented in its own submodule:
//! - `sync`: Match a folder and publish the playlist
//! - `resolve`: Offline metadata preview
//! - `login`: Authorize and cache a token
//! - `config`: Config file path and defaults
//! - `interactive`: Prompts used when no subcommand is given

mod config;
mod interactive;
mod login;
mod resolve;
mod sync;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tokio::runtime::{Builder, Runtime};

pub use config::{cmd_config_init, cmd_config_path};
pub use interactive::prompt_sync_request;
pub use login::cmd_login;
pub use resolve::cmd_resolve;
pub use sync::{SyncRequest, cmd_sync};

/// Playlist Forge CLI
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Show per-tier search detail
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub credentials: CredentialArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Catalog application credentials (override config.toml)
#[derive(Args, Clone, Debug, Default)]
pub struct CredentialArgs {
    /// Client ID (or set SPOTIPY_CLIENT_ID env var)
    #[arg(long, env = "SPOTIPY_CLIENT_ID", global = true)]
    pub client_id: Option<String>,
    /// Client secret (or set SPOTIPY_CLIENT_SECRET env var)
    #[arg(long, env = "SPOTIPY_CLIENT_SECRET", hide_env_values = true, global = true)]
    pub client_secret: Option<String>,
    /// Redirect URI registered for the app (or set SPOTIPY_REDIRECT_URI env var)
    #[arg(long, env = "SPOTIPY_REDIRECT_URI", global = true)]
    pub redirect_uri: Option<String>,
}

impl CredentialArgs {
    fn to_credentials(&self) -> crate::config::Credentials {
        crate::config::Credentials {
            client_id: self.client_id.clone(),
            client_secret: self.client_secret.clone(),
            redirect_uri: self.redirect_uri.clone(),
        }
    }
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Match a folder of audio files and add them to a playlist
    Sync {
        /// Folder containing audio files
        path: PathBuf,
        /// Playlist name (found case-insensitively, created if missing)
        #[arg(short, long)]
        playlist: String,
        /// Include subfolders
        #[arg(short, long)]
        recursive: bool,
        /// Match only - don't create or modify the playlist
        #[arg(long)]
        dry_run: bool,
        /// Write matched track details to this JSON file
        #[arg(long)]
        enrich: Option<PathBuf>,
    },
    /// Show the metadata and searches each file would produce (offline)
    Resolve {
        /// Folder containing audio files
        path: PathBuf,
        /// Include subfolders
        #[arg(short, long)]
        recursive: bool,
    },
    /// Authorize access and cache the token
    Login,
    /// Manage the config file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the config file location
    Path,
    /// Write a config file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Run the specified CLI command, or the interactive prompts when none is given.
pub fn run_command(cli: &Cli) -> anyhow::Result<()> {
    let config = crate::config::load();
    let credentials = cli.credentials.to_credentials();

    match &cli.command {
        Some(Commands::Sync {
            path,
            playlist,
            recursive,
            dry_run,
            enrich,
        }) => {
            let request = SyncRequest {
                path: path.clone(),
                playlist: playlist.clone(),
                recursive: *recursive || config.matching.recursive,
                dry_run: *dry_run,
                enrich: enrich.clone(),
                credentials,
            };
            cmd_sync(&runtime()?, &config, &request)
        }
        Some(Commands::Resolve { path, recursive }) => {
            cmd_resolve(&config, path, *recursive || config.matching.recursive)
        }
        Some(Commands::Login) => cmd_login(&runtime()?, &config, &credentials),
        Some(Commands::Config { action }) => match action {
            ConfigAction::Path => cmd_config_path(),
            ConfigAction::Init { force } => cmd_config_init(*force),
        },
        None => {
            let request = prompt_sync_request(&config, credentials)?;
            cmd_sync(&runtime()?, &config, &request)
        }
    }
}

/// Single-threaded runtime: every remote call is awaited in turn.
fn runtime() -> anyhow::Result<Runtime> {
    Ok(Builder::new_current_thread().enable_all().build()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_sync() {
        let cli = Cli::try_parse_from([
            "playlist-forge",
            "sync",
            "/music",
            "--playlist",
            "Road Trip",
            "--recursive",
            "--dry-run",
            "--client-id",
            "abc",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::Sync {
                path,
                playlist,
                recursive,
                dry_run,
                enrich,
            }) => {
                assert_eq!(path, PathBuf::from("/music"));
                assert_eq!(playlist, "Road Trip");
                assert!(recursive);
                assert!(dry_run);
                assert!(enrich.is_none());
            }
            _ => panic!("expected sync"),
        }
        assert_eq!(cli.credentials.client_id.as_deref(), Some("abc"));
    }

    #[test]
    fn test_credential_flags_accepted_before_subcommand() {
        let cli = Cli::try_parse_from([
            "playlist-forge",
            "--client-secret",
            "s3cret",
            "login",
        ])
        .unwrap();
        assert!(matches!(cli.command, Some(Commands::Login)));
        assert_eq!(cli.credentials.client_secret.as_deref(), Some("s3cret"));
    }

    #[test]
    fn test_credential_flags_reach_interactive_mode() {
        let cli = Cli::try_parse_from(["playlist-forge", "--client-id", "abc"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.credentials.to_credentials().client_id.as_deref(), Some("abc"));
    }

    #[test]
    fn test_dotenv_file_supplies_credentials() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(&path, "SPOTIPY_REDIRECT_URI=http://127.0.0.1:9090/callback\n").unwrap();
        dotenvy::from_path_override(&path).unwrap();

        let cli = Cli::try_parse_from(["playlist-forge", "login"]).unwrap();
        assert_eq!(
            cli.credentials.redirect_uri.as_deref(),
            Some("http://127.0.0.1:9090/callback")
        );

        // Flags still win over the file
        let cli = Cli::try_parse_from([
            "playlist-forge",
            "login",
            "--redirect-uri",
            "http://localhost/cb",
        ])
        .unwrap();
        assert_eq!(cli.credentials.redirect_uri.as_deref(), Some("http://localhost/cb"));
    }

    #[test]
    fn test_sync_requires_playlist() {
        assert!(Cli::try_parse_from(["playlist-forge", "sync", "/music"]).is_err());
    }

    #[test]
    fn test_no_subcommand_is_interactive() {
        let cli = Cli::try_parse_from(["playlist-forge", "--verbose"]).unwrap();
        assert!(cli.verbose);
        assert!(cli.command.is_none());
    }
}
