// src/services/sync_service.rs
// DOCUMENTATION: Venue synchronization service
// PURPOSE: Fetch, merge liked flags, persist, and own the current venue list

use crate::db::VenueStore;
use crate::errors::VenueError;
use crate::models::Venue;
use crate::services::VenueSource;
use chrono::Utc;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;

/// Where the current venue list came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncSource {
    Remote,
    Cache,
}

/// Synchronization statistics
/// DOCUMENTATION: Tracks results of a sync operation
#[derive(Debug, Clone, Serialize)]
pub struct SyncStats {
    pub source: SyncSource,
    /// Venues decoded from the feed
    pub venues_retrieved: u32,
    /// Venues written to the local cache
    pub venues_stored: u32,
    /// Venues that failed to persist
    pub venues_failed: u32,
    /// Fetched venues that picked up a stored liked flag
    pub liked_restored: u32,
    /// Error messages encountered
    pub errors: Vec<String>,
    pub duration_ms: u64,
    pub started_at: String,
    pub completed_at: Option<String>,
}

impl SyncStats {
    pub fn new() -> Self {
        Self {
            source: SyncSource::Remote,
            venues_retrieved: 0,
            venues_stored: 0,
            venues_failed: 0,
            liked_restored: 0,
            errors: Vec::new(),
            duration_ms: 0,
            started_at: Utc::now().to_rfc3339(),
            completed_at: None,
        }
    }

    /// Mark sync as completed
    pub fn complete(&mut self, duration_ms: u64) {
        self.duration_ms = duration_ms;
        self.completed_at = Some(Utc::now().to_rfc3339());
    }
}

impl Default for SyncStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of one sync cycle
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub stats: SyncStats,
    /// Why the remote path was abandoned, if it was
    pub fallback: Option<VenueError>,
    /// The venue list now in effect
    pub venues: Vec<Venue>,
}

/// Clears the in-flight flag when a sync finishes or its future is dropped
struct SyncGuard<'a>(&'a AtomicBool);

impl Drop for SyncGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Owns the current venue list and keeps the local cache in step with the feed
/// DOCUMENTATION: At most one sync runs at a time. The merge/persist step and
/// liked toggles both hold the list's write lock, so they never interleave.
pub struct VenueSynchronizer {
    source: Arc<dyn VenueSource>,
    store: Arc<dyn VenueStore>,
    venues: RwLock<Vec<Venue>>,
    in_flight: AtomicBool,
}

impl VenueSynchronizer {
    pub fn new(source: Arc<dyn VenueSource>, store: Arc<dyn VenueStore>) -> Self {
        Self {
            source,
            store,
            venues: RwLock::new(Vec::new()),
            in_flight: AtomicBool::new(false),
        }
    }

    /// Snapshot of the current venue list
    pub async fn venues(&self) -> Vec<Venue> {
        self.venues.read().await.clone()
    }

    /// Current state of a single venue
    pub async fn venue(&self, name: &str) -> Option<Venue> {
        self.venues
            .read()
            .await
            .iter()
            .find(|v| v.name == name)
            .cloned()
    }

    pub fn is_syncing(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Seed the list from the local cache without touching the network
    ///
    /// # Returns
    /// Number of cached venues loaded
    pub async fn load_cached(&self) -> Result<usize, VenueError> {
        let cached = self.store.get_all().await?;
        let count = cached.len();

        *self.venues.write().await = cached;

        log::info!("Loaded {} venues from local cache", count);
        Ok(count)
    }

    /// Refresh the venue list
    /// DOCUMENTATION: Main sync method
    ///
    /// Process:
    /// 1. Fetch the feed
    /// 2. On success, copy stored liked flags onto fetched venues by name,
    ///    upsert all of them, and make them the current list
    /// 3. On a network or decode failure, make the cached venues the current
    ///    list and leave the cache untouched
    ///
    /// Any other source error is returned as-is and the current list is kept.
    ///
    /// # Returns
    /// SyncReport, or SyncInProgress if another sync is running
    pub async fn sync(&self) -> Result<SyncReport, VenueError> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            log::warn!("Sync requested while another sync is running");
            return Err(VenueError::SyncInProgress);
        }
        let _guard = SyncGuard(&self.in_flight);

        let start_time = Instant::now();
        let mut stats = SyncStats::new();

        log::info!("Starting venue sync");

        let fallback = match self.source.fetch().await {
            Ok(fetched) => {
                stats.venues_retrieved = fetched.len() as u32;
                self.merge_and_persist(fetched, &mut stats).await;
                None
            }
            Err(e) if !e.is_recoverable() => {
                log::error!("Venue source failed: {}", e);
                return Err(e);
            }
            Err(e) => {
                log::warn!("Venue fetch failed, using local cache: {}", e);
                stats.source = SyncSource::Cache;
                stats.errors.push(e.to_string());
                self.restore_from_cache(&mut stats).await;
                Some(e)
            }
        };

        stats.complete(start_time.elapsed().as_millis() as u64);
        let venues = self.venues().await;

        log::info!(
            "Venue sync completed from {:?}: {} venues, {} stored, {} failed in {}ms",
            stats.source,
            venues.len(),
            stats.venues_stored,
            stats.venues_failed,
            stats.duration_ms
        );

        Ok(SyncReport {
            stats,
            fallback,
            venues,
        })
    }

    /// Flip a venue's liked flag and persist that one record
    /// Every in-memory copy sharing the name is flipped, since the store
    /// holds a single record per name
    ///
    /// # Returns
    /// The updated venue list
    pub async fn toggle_liked(&self, name: &str) -> Result<Vec<Venue>, VenueError> {
        let mut state = self.venues.write().await;

        let mut copies: Vec<&mut Venue> = state.iter_mut().filter(|v| v.name == name).collect();
        let liked = match copies.first() {
            Some(venue) => !venue.is_liked,
            None => return Err(VenueError::NotFound(name.to_string())),
        };

        for venue in copies.iter_mut() {
            venue.is_liked = liked;
        }

        // The last copy matches the record the sync batch left in the store
        let persisted = match copies.last() {
            Some(venue) => self.store.upsert(&**venue).await,
            None => Ok(()),
        };

        if let Err(e) = persisted {
            for venue in copies.iter_mut() {
                venue.is_liked = !liked;
            }
            log::error!("Failed to persist liked flag for {}: {}", name, e);
            return Err(e);
        }

        drop(copies);

        log::info!("Venue {} liked = {}", name, liked);
        Ok(state.to_vec())
    }

    async fn merge_and_persist(&self, mut fetched: Vec<Venue>, stats: &mut SyncStats) {
        let mut state = self.venues.write().await;

        // Built once per cycle from the stored records. If they cannot be
        // read, the flags already in memory stand in and nothing is written.
        let (liked_by_name, persist): (HashMap<String, bool>, bool) =
            match self.store.get_all().await {
                Ok(cached) => (
                    cached.into_iter().map(|v| (v.name, v.is_liked)).collect(),
                    true,
                ),
                Err(e) => {
                    log::error!("Cannot read liked flags, cache will not be written: {}", e);
                    stats.errors.push(e.to_string());
                    (
                        state.iter().map(|v| (v.name.clone(), v.is_liked)).collect(),
                        false,
                    )
                }
            };

        for venue in fetched.iter_mut() {
            venue.is_liked = liked_by_name.get(&venue.name).copied().unwrap_or(false);
            if venue.is_liked {
                stats.liked_restored += 1;
            }
        }

        if !persist {
            *state = fetched;
            return;
        }

        match self.store.upsert_all(&fetched).await {
            Ok(summary) => {
                stats.venues_stored = summary.stored;
                stats.venues_failed = summary.failed;
                stats.errors.extend(summary.errors);
            }
            Err(e) => {
                log::error!("Failed to persist synced venues: {}", e);
                stats.venues_failed = fetched.len() as u32;
                stats.errors.push(e.to_string());
            }
        }

        *state = fetched;
    }

    async fn restore_from_cache(&self, stats: &mut SyncStats) {
        let mut state = self.venues.write().await;

        match self.store.get_all().await {
            Ok(cached) => *state = cached,
            Err(e) => {
                // Keep whatever list is already in memory
                log::error!("Local cache unreadable: {}", e);
                stats.errors.push(e.to_string());
            }
        }
    }
}
