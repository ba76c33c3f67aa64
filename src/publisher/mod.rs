//! Playlist publishing: find-or-create by name, then append in batches.

use std::collections::HashMap;
use std::time::Duration;

use tracing::{debug, error, info};

use crate::catalog::{CatalogError, PlaylistApi};
use crate::metadata::fold_key;
use crate::model::PlaylistTarget;

/// Playlists requested per listing page
pub const PAGE_SIZE: u32 = 50;

/// Most tracks the API accepts in one append call
pub const MAX_BATCH_SIZE: usize = 100;

/// Publishing knobs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishOptions {
    /// Tracks per append call, clamped to `1..=MAX_BATCH_SIZE`
    pub batch_size: usize,
    /// Pause between consecutive batches
    pub batch_delay: Duration,
    /// Visibility of newly created playlists
    pub public: bool,
}

impl Default for PublishOptions {
    fn default() -> Self {
        Self {
            batch_size: MAX_BATCH_SIZE,
            batch_delay: Duration::from_millis(500),
            public: true,
        }
    }
}

/// A batch the API refused
#[derive(Debug, Clone)]
pub struct BatchFailure {
    /// Zero-based batch index
    pub index: usize,
    pub track_ids: Vec<String>,
    pub error: CatalogError,
}

/// Result of appending tracks to a playlist
#[derive(Debug, Clone, Default)]
pub struct AppendReport {
    pub batches_sent: usize,
    pub tracks_added: usize,
    pub failures: Vec<BatchFailure>,
}

impl AppendReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn tracks_failed(&self) -> usize {
        self.failures.iter().map(|f| f.track_ids.len()).sum()
    }
}

/// Where tracks went and how the append went
#[derive(Debug, Clone)]
pub struct Published {
    pub target: PlaylistTarget,
    pub report: AppendReport,
}

/// Publishes matched tracks for one user.
pub struct PlaylistPublisher<'a, P: PlaylistApi> {
    api: &'a P,
    user_id: String,
    options: PublishOptions,
    resolved: HashMap<String, PlaylistTarget>,
}

impl<'a, P: PlaylistApi> PlaylistPublisher<'a, P> {
    pub fn new(api: &'a P, user_id: impl Into<String>, options: PublishOptions) -> Self {
        let batch_size = options.batch_size.clamp(1, MAX_BATCH_SIZE);
        Self {
            api,
            user_id: user_id.into(),
            options: PublishOptions {
                batch_size,
                ..options
            },
            resolved: HashMap::new(),
        }
    }

    /// Add `track_ids` to the playlist named `name`.
    ///
    /// Nothing is resolved or created when there is nothing to add, so a
    /// run without matches never leaves an empty playlist behind.
    pub async fn publish(
        &mut self,
        name: &str,
        track_ids: &[String],
    ) -> Result<Option<Published>, CatalogError> {
        if track_ids.is_empty() {
            info!("No valid songs found to add to '{}'", name);
            return Ok(None);
        }

        let target = self.resolve_or_create(name).await?;
        let report = self.append(&target.id, track_ids).await;
        Ok(Some(Published { target, report }))
    }

    /// Find the user's playlist named `name` (case-insensitive, ASCII-folded)
    /// or create it. Repeat calls for the same name reuse the first answer.
    pub async fn resolve_or_create(&mut self, name: &str) -> Result<PlaylistTarget, CatalogError> {
        let key = fold_key(name);
        if let Some(target) = self.resolved.get(&key) {
            return Ok(target.clone());
        }

        let target = match self.find_existing(&key).await? {
            Some(id) => {
                info!("Using existing playlist '{}'", name);
                PlaylistTarget {
                    name: name.to_string(),
                    id,
                    created: false,
                }
            }
            None => {
                let summary = self
                    .api
                    .create_playlist(&self.user_id, name, self.options.public)
                    .await?;
                info!("Created playlist '{}'", summary.name);
                PlaylistTarget {
                    name: summary.name,
                    id: summary.id,
                    created: true,
                }
            }
        };

        self.resolved.insert(key, target.clone());
        Ok(target)
    }

    async fn find_existing(&self, key: &str) -> Result<Option<String>, CatalogError> {
        let mut offset = 0;
        loop {
            let page = self.api.list_playlists(offset, PAGE_SIZE).await?;
            debug!(
                "Scanned playlists {}..{} of {}",
                offset,
                offset as usize + page.items.len(),
                page.total
            );

            // Followed playlists owned by others can't be modified
            let found = page.items.iter().find(|p| {
                p.owner_id.as_deref() == Some(self.user_id.as_str()) && fold_key(&p.name) == key
            });
            if let Some(found) = found {
                return Ok(Some(found.id.clone()));
            }
            if !page.has_next || page.items.is_empty() {
                return Ok(None);
            }
            offset += page.items.len() as u32;
        }
    }

    /// Append tracks in order, in batches, pausing between batches.
    ///
    /// A failed batch is logged and recorded; later batches still go out.
    pub async fn append(&self, playlist_id: &str, track_ids: &[String]) -> AppendReport {
        let mut report = AppendReport::default();

        for (index, batch) in track_ids.chunks(self.options.batch_size).enumerate() {
            if index > 0 && !self.options.batch_delay.is_zero() {
                tokio::time::sleep(self.options.batch_delay).await;
            }

            report.batches_sent += 1;
            match self.api.add_tracks(playlist_id, batch).await {
                Ok(()) => {
                    report.tracks_added += batch.len();
                    debug!("Added batch {} ({} tracks)", index + 1, batch.len());
                }
                Err(e) => {
                    error!("Batch {} ({} tracks) failed: {}", index + 1, batch.len(), e);
                    report.failures.push(BatchFailure {
                        index,
                        track_ids: batch.to_vec(),
                        error: e,
                    });
                }
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::traits::mocks::MockPlaylists;

    fn options() -> PublishOptions {
        PublishOptions {
            batch_delay: Duration::ZERO,
            ..Default::default()
        }
    }

    fn ids(count: usize) -> Vec<String> {
        (0..count).map(|i| format!("track-{}", i)).collect()
    }

    #[tokio::test]
    async fn test_resolve_or_create_creates_once() {
        let api = MockPlaylists::new("user");
        let mut publisher = PlaylistPublisher::new(&api, "user", options());

        let first = publisher.resolve_or_create("Road Trip").await.unwrap();
        let second = publisher.resolve_or_create("road trip").await.unwrap();

        assert!(first.created);
        assert_eq!(first.id, second.id);
        assert_eq!(*api.created.lock().unwrap(), vec!["Road Trip".to_string()]);
    }

    #[tokio::test]
    async fn test_existing_playlist_found_on_later_page() {
        let api = MockPlaylists::new("user").with_playlists(120, &["Café Sessions"]);
        let mut publisher = PlaylistPublisher::new(&api, "user", options());

        let target = publisher.resolve_or_create("cafe sessions").await.unwrap();

        assert_eq!(target.id, "existing-0");
        assert!(!target.created);
        assert!(api.created.lock().unwrap().is_empty());
        assert_eq!(*api.list_calls.lock().unwrap(), 3);
    }

    #[tokio::test]
    async fn test_playlist_owned_by_someone_else_not_reused() {
        let api = MockPlaylists::new("user").with_foreign("theirs", "Mix", "someone-else");
        let mut publisher = PlaylistPublisher::new(&api, "user", options());

        let target = publisher.resolve_or_create("Mix").await.unwrap();

        assert_eq!(target.id, "created-0");
        assert!(target.created);
        assert_eq!(*api.created.lock().unwrap(), vec!["Mix".to_string()]);
    }

    #[tokio::test]
    async fn test_own_playlist_preferred_over_followed_one() {
        let api = MockPlaylists::new("user")
            .with_foreign("theirs", "Mix", "someone-else")
            .with_playlists(0, &["mix"]);
        let mut publisher = PlaylistPublisher::new(&api, "user", options());

        let target = publisher.resolve_or_create("Mix").await.unwrap();

        assert_eq!(target.id, "existing-0");
        assert!(!target.created);
    }

    #[tokio::test]
    async fn test_publish_nothing_creates_no_playlist() {
        let api = MockPlaylists::new("user");
        let mut publisher = PlaylistPublisher::new(&api, "user", options());

        let published = publisher.publish("Road Trip", &[]).await.unwrap();

        assert!(published.is_none());
        assert!(api.created.lock().unwrap().is_empty());
        assert_eq!(*api.list_calls.lock().unwrap(), 0);
        assert!(api.batch_sizes().is_empty());
    }

    #[tokio::test]
    async fn test_publish_creates_and_appends() {
        let api = MockPlaylists::new("user");
        let mut publisher = PlaylistPublisher::new(&api, "user", options());

        let published = publisher
            .publish("Road Trip", &ids(3))
            .await
            .unwrap()
            .unwrap();

        assert!(published.target.created);
        assert_eq!(published.report.tracks_added, 3);
        assert_eq!(api.batch_sizes(), vec![3]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_delay_only_between_batches() {
        let api = MockPlaylists::new("user");
        let publisher = PlaylistPublisher::new(
            &api,
            "user",
            PublishOptions {
                batch_delay: Duration::from_millis(500),
                ..Default::default()
            },
        );

        let start = tokio::time::Instant::now();
        publisher.append("p1", &ids(250)).await;
        let elapsed = start.elapsed();

        // Two pauses for three batches, none after the last
        assert_eq!(api.batch_sizes(), vec![100, 100, 50]);
        assert!(elapsed >= Duration::from_millis(1000), "{:?}", elapsed);
        assert!(elapsed < Duration::from_millis(1500), "{:?}", elapsed);
    }

    #[tokio::test]
    async fn test_repeat_resolution_skips_listing() {
        let api = MockPlaylists::new("user").with_playlists(0, &["Mix"]);
        let mut publisher = PlaylistPublisher::new(&api, "user", options());

        publisher.resolve_or_create("Mix").await.unwrap();
        publisher.resolve_or_create("Mix").await.unwrap();

        assert_eq!(*api.list_calls.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_append_batches_of_100() {
        let api = MockPlaylists::new("user");
        let publisher = PlaylistPublisher::new(&api, "user", options());

        let report = publisher.append("p1", &ids(250)).await;

        assert_eq!(api.batch_sizes(), vec![100, 100, 50]);
        assert_eq!(report.batches_sent, 3);
        assert_eq!(report.tracks_added, 250);
        assert!(report.is_complete());
        // Order preserved across batches
        let batches = api.batches.lock().unwrap();
        assert_eq!(batches[1][0], "track-100");
        assert_eq!(batches[2][49], "track-249");
    }

    #[tokio::test]
    async fn test_failed_batch_does_not_stop_the_rest() {
        let api = MockPlaylists::new("user").failing(1);
        let publisher = PlaylistPublisher::new(&api, "user", options());

        let report = publisher.append("p1", &ids(250)).await;

        assert_eq!(report.batches_sent, 3);
        assert_eq!(report.tracks_added, 150);
        assert_eq!(report.tracks_failed(), 100);
        assert_eq!(report.failures[0].index, 1);
    }

    #[tokio::test]
    async fn test_batch_size_clamped() {
        let api = MockPlaylists::new("user");
        let publisher = PlaylistPublisher::new(
            &api,
            "user",
            PublishOptions {
                batch_size: 500,
                ..options()
            },
        );
        publisher.append("p1", &ids(150)).await;
        assert_eq!(api.batch_sizes(), vec![100, 50]);

        let api = MockPlaylists::new("user");
        let publisher = PlaylistPublisher::new(
            &api,
            "user",
            PublishOptions {
                batch_size: 0,
                ..options()
            },
        );
        publisher.append("p1", &ids(2)).await;
        assert_eq!(api.batch_sizes(), vec![1, 1]);
    }

    #[tokio::test]
    async fn test_append_nothing_sends_nothing() {
        let api = MockPlaylists::new("user");
        let publisher = PlaylistPublisher::new(&api, "user", options());

        let report = publisher.append("p1", &[]).await;

        assert_eq!(report.batches_sent, 0);
        assert!(api.batch_sizes().is_empty());
    }
}
