//! Folder-to-playlist sync command.

use anyhow::Context;
use std::path::PathBuf;
use tokio::runtime::Runtime;

use super::login::establish_session;
use crate::config::{Config, Credentials};
use crate::enrichment;
use crate::metadata::{LoftyTagReader, MetadataResolver};
use crate::pipeline::CollectionWalker;
use crate::publisher::{PlaylistPublisher, Published};
use crate::scanner;

/// Everything one sync run needs
#[derive(Debug, Clone)]
pub struct SyncRequest {
    pub path: PathBuf,
    pub playlist: String,
    pub recursive: bool,
    pub dry_run: bool,
    pub enrich: Option<PathBuf>,
    /// Values from flags and environment; config.toml fills the gaps
    pub credentials: Credentials,
}

/// Match a folder against the catalog and add the hits to a playlist
pub fn cmd_sync(rt: &Runtime, config: &Config, request: &SyncRequest) -> anyhow::Result<()> {
    let playlist = request.playlist.trim();
    anyhow::ensure!(!playlist.is_empty(), "Playlist name must not be empty");

    // Startup failures stop the run before any file is touched
    let oauth = request
        .credentials
        .clone()
        .or(&config.credentials)
        .validate()?;

    let files = scanner::discover(&request.path, request.recursive, &config.matching.extensions)
        .with_context(|| format!("Cannot read folder {}", request.path.display()))?;

    println!(
        "Found {} candidate files in {}",
        files.len(),
        request.path.display()
    );

    rt.block_on(async {
        let session = establish_session(&oauth).await?;

        let resolver = MetadataResolver::new(LoftyTagReader);
        let walker = CollectionWalker::new(&resolver, session.client());
        let report = walker.walk(&files).await;
        let track_ids = report.track_ids();

        println!();
        println!("{}", report);

        if request.dry_run {
            println!(
                "[DRY RUN] Would add {} tracks to '{}'",
                track_ids.len(),
                playlist
            );
        } else {
            let mut publisher = PlaylistPublisher::new(
                session.client(),
                session.user_id(),
                config.publish.options(),
            );
            let published = publisher
                .publish(playlist, &track_ids)
                .await
                .with_context(|| format!("Could not find or create playlist '{}'", playlist))?;

            match published {
                None => println!("No valid songs found to add."),
                Some(Published { target, report: append }) => {
                    println!(
                        "Added {} tracks to '{}' in {} batches",
                        append.tracks_added, target.name, append.batches_sent
                    );
                    if !append.is_complete() {
                        eprintln!(
                            "{} tracks in {} failed batches were not added",
                            append.tracks_failed(),
                            append.failures.len()
                        );
                    }
                }
            }
        }

        if let Some(path) = &request.enrich {
            let records = enrichment::build_records(session.client(), report.matched()).await;
            enrichment::write_records(path, &records)?;
            println!("Wrote {} records to {}", records.len(), path.display());
        }

        Ok(())
    })
}
