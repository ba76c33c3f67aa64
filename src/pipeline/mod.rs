//! Collection walk: resolve and match each discovered file in turn.
//!
//! Files are processed strictly one after another. Nothing that goes
//! wrong with a single file stops the walk; it just lands in the report.

use std::fmt;

use tracing::{info, warn};

use crate::catalog::{CatalogApi, CatalogMatcher};
use crate::metadata::{MetadataResolver, Resolution, TagReader};
use crate::model::{AudioFile, FileOutcome, MatchResult};

/// Drives resolver and matcher over a list of files.
pub struct CollectionWalker<'a, R: TagReader, C: CatalogApi> {
    resolver: &'a MetadataResolver<R>,
    matcher: CatalogMatcher<'a, C>,
}

impl<'a, R: TagReader, C: CatalogApi> CollectionWalker<'a, R, C> {
    pub fn new(resolver: &'a MetadataResolver<R>, catalog: &'a C) -> Self {
        Self {
            resolver,
            matcher: CatalogMatcher::new(catalog),
        }
    }

    /// Process files in discovery order.
    pub async fn walk(&self, files: &[AudioFile]) -> WalkReport {
        let mut report = WalkReport::default();
        for file in files {
            report.results.push(self.process(file).await);
        }
        info!("{}", report);
        report
    }

    /// Resolve and match a single file.
    pub async fn process(&self, file: &AudioFile) -> MatchResult {
        let (metadata, source) = match self.resolver.resolve(file) {
            Resolution::Identified { metadata, source } => (metadata, source),
            Resolution::NoTitle => {
                warn!("Skipped {}: no usable title", file.file_name);
                return MatchResult {
                    file: file.clone(),
                    outcome: FileOutcome::NoTitle,
                };
            }
        };

        let outcome = self.matcher.find_match(&metadata).await;
        let outcome = match outcome.matched() {
            Some((tier, track)) => {
                info!(
                    "Found: {} - {} -> {} by {} ({})",
                    metadata.artist_or_unknown(),
                    metadata.title.as_deref().unwrap_or_default(),
                    track.name,
                    track.artist_names(),
                    tier
                );
                FileOutcome::Matched {
                    track: track.clone(),
                    tier,
                    source,
                }
            }
            None => {
                let errors: Vec<_> = outcome
                    .errors()
                    .map(|(tier, e)| (tier, e.clone()))
                    .collect();
                if !errors.is_empty() && errors.len() == outcome.attempts.len() {
                    warn!(
                        "Search failed: {} - {} ({} tiers errored)",
                        metadata.artist_or_unknown(),
                        metadata.title.as_deref().unwrap_or_default(),
                        errors.len()
                    );
                    FileOutcome::SearchFailed {
                        metadata,
                        source,
                        errors,
                    }
                } else {
                    info!(
                        "Not found: {} - {}",
                        metadata.artist_or_unknown(),
                        metadata.title.as_deref().unwrap_or_default()
                    );
                    FileOutcome::NotFound { metadata, source }
                }
            }
        };

        MatchResult {
            file: file.clone(),
            outcome,
        }
    }
}

/// Everything the walk produced, in discovery order.
#[derive(Debug, Clone, Default)]
pub struct WalkReport {
    pub results: Vec<MatchResult>,
}

impl WalkReport {
    /// Matched track identifiers in discovery order (duplicates kept).
    pub fn track_ids(&self) -> Vec<String> {
        self.results
            .iter()
            .filter_map(|r| r.track_id().map(String::from))
            .collect()
    }

    pub fn matched(&self) -> impl Iterator<Item = &MatchResult> {
        self.results.iter().filter(|r| r.track().is_some())
    }

    pub fn total(&self) -> usize {
        self.results.len()
    }

    pub fn matched_count(&self) -> usize {
        self.matched().count()
    }

    pub fn not_found_count(&self) -> usize {
        self.results
            .iter()
            .filter(|r| matches!(r.outcome, FileOutcome::NotFound { .. }))
            .count()
    }

    /// Files whose searches all errored, so they were never really looked up
    pub fn failed_count(&self) -> usize {
        self.results
            .iter()
            .filter(|r| matches!(r.outcome, FileOutcome::SearchFailed { .. }))
            .count()
    }

    pub fn no_title_count(&self) -> usize {
        self.results
            .iter()
            .filter(|r| matches!(r.outcome, FileOutcome::NoTitle))
            .count()
    }
}

impl fmt::Display for WalkReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Matched {} of {} files ({} not found, {} without a title",
            self.matched_count(),
            self.total(),
            self.not_found_count(),
            self.no_title_count()
        )?;
        match self.failed_count() {
            0 => write!(f, ")"),
            n => write!(f, ", {} search failures)", n),
        }
    }
}
