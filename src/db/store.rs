// src/db/store.rs
// DOCUMENTATION: Local venue store interface
// PURPOSE: Key-value view of the venue cache, keyed by venue name

use crate::errors::VenueError;
use crate::models::{Venue, VenueRecord};
use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::RwLock;

/// Outcome of a batch upsert
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UpsertSummary {
    /// Records written (inserted or overwritten)
    pub stored: u32,
    /// Records that failed and were skipped
    pub failed: u32,
    /// One message per failed record
    pub errors: Vec<String>,
}

impl UpsertSummary {
    pub(crate) fn record_failure(&mut self, name: &str, error: &VenueError) {
        let msg = format!("Failed to store {}: {}", name, error);
        log::warn!("{}", msg);
        self.failed += 1;
        self.errors.push(msg);
    }
}

/// Persisted venue cache
/// DOCUMENTATION: Records are keyed by exact venue name and are never pruned
#[async_trait]
pub trait VenueStore: Send + Sync {
    /// Every persisted venue, in insertion order
    async fn get_all(&self) -> Result<Vec<Venue>, VenueError>;

    /// Single venue by name
    async fn get(&self, name: &str) -> Result<Option<Venue>, VenueError>;

    /// Stored liked flag, false when the name is unknown
    async fn find_liked(&self, name: &str) -> Result<bool, VenueError> {
        Ok(self.get(name).await?.map(|v| v.is_liked).unwrap_or(false))
    }

    /// Insert, or overwrite every field of the record with the same name
    async fn upsert(&self, venue: &Venue) -> Result<(), VenueError>;

    /// Upsert a whole sync cycle and commit once
    /// A failing record is logged and skipped; the rest are still written
    async fn upsert_all(&self, venues: &[Venue]) -> Result<UpsertSummary, VenueError>;
}

/// In-process venue store
/// DOCUMENTATION: Holds the same encoded records as the SQLite table
pub struct MemoryVenueStore {
    records: RwLock<Vec<VenueRecord>>,
}

impl MemoryVenueStore {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }

    /// Number of stored records
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    fn put(records: &mut Vec<VenueRecord>, venue: &Venue) {
        let record = VenueRecord::from_venue(venue);
        match records.iter_mut().find(|r| r.name == venue.name) {
            Some(existing) => *existing = record,
            None => records.push(record),
        }
    }
}

impl Default for MemoryVenueStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VenueStore for MemoryVenueStore {
    async fn get_all(&self) -> Result<Vec<Venue>, VenueError> {
        let records = self.records.read().await;
        Ok(records.iter().cloned().map(VenueRecord::into_venue).collect())
    }

    async fn get(&self, name: &str) -> Result<Option<Venue>, VenueError> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .find(|r| r.name == name)
            .cloned()
            .map(VenueRecord::into_venue))
    }

    async fn upsert(&self, venue: &Venue) -> Result<(), VenueError> {
        let mut records = self.records.write().await;
        Self::put(&mut records, venue);
        Ok(())
    }

    async fn upsert_all(&self, venues: &[Venue]) -> Result<UpsertSummary, VenueError> {
        let mut records = self.records.write().await;
        let mut summary = UpsertSummary::default();

        for venue in venues {
            Self::put(&mut records, venue);
            summary.stored += 1;
        }

        Ok(summary)
    }
}
