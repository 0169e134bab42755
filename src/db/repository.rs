// src/db/repository.rs
// DOCUMENTATION: Database access layer - all SQL queries
// PURPOSE: SQLite-backed venue cache

use crate::db::{UpsertSummary, VenueStore};
use crate::errors::VenueError;
use crate::models::{Venue, VenueRecord};
use async_trait::async_trait;
use sqlx::{Executor, Sqlite, SqlitePool};

const CREATE_TABLE_SQL: &str = r#"
    CREATE TABLE IF NOT EXISTS venues (
        name TEXT PRIMARY KEY NOT NULL,
        building TEXT NOT NULL DEFAULT '',
        lat TEXT NOT NULL DEFAULT '',
        lon TEXT NOT NULL DEFAULT '',
        description TEXT NOT NULL DEFAULT '',
        opening_times TEXT NOT NULL DEFAULT '[]',
        amenities TEXT NOT NULL DEFAULT '[]',
        photos TEXT NOT NULL DEFAULT '[]',
        url TEXT NOT NULL DEFAULT '',
        last_modified TEXT NOT NULL DEFAULT '',
        is_liked BOOLEAN NOT NULL DEFAULT 0
    )
"#;

const UPSERT_SQL: &str = r#"
    INSERT INTO venues (
        name, building, lat, lon, description,
        opening_times, amenities, photos,
        url, last_modified, is_liked
    )
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
    ON CONFLICT (name) DO UPDATE
    SET building = excluded.building,
        lat = excluded.lat,
        lon = excluded.lon,
        description = excluded.description,
        opening_times = excluded.opening_times,
        amenities = excluded.amenities,
        photos = excluded.photos,
        url = excluded.url,
        last_modified = excluded.last_modified,
        is_liked = excluded.is_liked
"#;

const SELECT_SQL: &str = r#"
    SELECT name, building, lat, lon, description,
           opening_times, amenities, photos,
           url, last_modified, is_liked
    FROM venues
"#;

/// SqliteVenueStore: venue cache in a single SQLite table
/// DOCUMENTATION: Rows are keyed by name; list fields hold JSON text
pub struct SqliteVenueStore {
    pool: SqlitePool,
}

impl SqliteVenueStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open the store, creating the venues table if it is missing
    pub async fn open(pool: SqlitePool) -> Result<Self, VenueError> {
        let store = Self::new(pool);
        store.create_schema().await?;
        Ok(store)
    }

    /// Create the venues table
    /// DOCUMENTATION: No migrations; an existing table is used as-is
    pub async fn create_schema(&self) -> Result<(), VenueError> {
        sqlx::query(CREATE_TABLE_SQL)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                log::error!("Failed to create venues table: {}", e);
                VenueError::Persistence(e.to_string())
            })?;

        log::debug!("Venue cache schema ready");
        Ok(())
    }

    /// Write one record through any executor (pool or open transaction)
    async fn write<'e, E>(executor: E, venue: &Venue) -> Result<(), VenueError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let record = VenueRecord::from_venue(venue);

        sqlx::query(UPSERT_SQL)
            .bind(&record.name) // ?1
            .bind(&record.building) // ?2
            .bind(&record.lat) // ?3
            .bind(&record.lon) // ?4
            .bind(&record.description) // ?5
            .bind(&record.opening_times) // ?6
            .bind(&record.amenities) // ?7
            .bind(&record.photos) // ?8
            .bind(&record.url) // ?9
            .bind(&record.last_modified) // ?10
            .bind(record.is_liked) // ?11
            .execute(executor)
            .await
            .map_err(|e| VenueError::Persistence(e.to_string()))?;

        Ok(())
    }
}

#[async_trait]
impl VenueStore for SqliteVenueStore {
    async fn get_all(&self) -> Result<Vec<Venue>, VenueError> {
        let sql = format!("{} ORDER BY rowid", SELECT_SQL);

        let rows = sqlx::query_as::<_, VenueRecord>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                log::error!("Failed to read venue cache: {}", e);
                VenueError::Persistence(e.to_string())
            })?;

        log::debug!("Read {} venues from cache", rows.len());
        Ok(rows.into_iter().map(VenueRecord::into_venue).collect())
    }

    async fn get(&self, name: &str) -> Result<Option<Venue>, VenueError> {
        let sql = format!("{} WHERE name = ?1", SELECT_SQL);

        let row = sqlx::query_as::<_, VenueRecord>(&sql)
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                log::error!("Failed to read venue {}: {}", name, e);
                VenueError::Persistence(e.to_string())
            })?;

        Ok(row.map(VenueRecord::into_venue))
    }

    async fn find_liked(&self, name: &str) -> Result<bool, VenueError> {
        let liked: Option<(bool,)> = sqlx::query_as("SELECT is_liked FROM venues WHERE name = ?1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                log::error!("Failed to read liked flag for {}: {}", name, e);
                VenueError::Persistence(e.to_string())
            })?;

        Ok(liked.map(|(l,)| l).unwrap_or(false))
    }

    async fn upsert(&self, venue: &Venue) -> Result<(), VenueError> {
        Self::write(&self.pool, venue).await.map_err(|e| {
            log::error!("Failed to upsert venue {}: {}", venue.name, e);
            e
        })?;

        log::debug!("Upserted venue: {}", venue.name);
        Ok(())
    }

    async fn upsert_all(&self, venues: &[Venue]) -> Result<UpsertSummary, VenueError> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            log::error!("Failed to open venue transaction: {}", e);
            VenueError::Persistence(e.to_string())
        })?;

        let mut summary = UpsertSummary::default();

        for venue in venues {
            match Self::write(&mut *tx, venue).await {
                Ok(()) => summary.stored += 1,
                Err(e) => summary.record_failure(&venue.name, &e),
            }
        }

        tx.commit().await.map_err(|e| {
            log::error!("Failed to commit venue batch: {}", e);
            VenueError::Persistence(e.to_string())
        })?;

        log::info!(
            "Committed venue batch: {} stored, {} failed",
            summary.stored,
            summary.failed
        );

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::venue;
    use sqlx::sqlite::SqlitePoolOptions;
    use std::time::Duration;

    async fn memory_store() -> SqliteVenueStore {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
            .connect("sqlite::memory:")
            .await
            .unwrap();

        SqliteVenueStore::open(pool).await.unwrap()
    }

    #[tokio::test]
    async fn test_insert_then_read_back() {
        let store = memory_store().await;

        let mut cafe = venue("Cafe", "53.4066", "-2.9667");
        cafe.opening_times = vec!["Mon 9-5".into(), "Tue 9-5".into()];
        cafe.photos = vec!["https://example.org/cafe.jpg".into()];
        store.upsert(&cafe).await.unwrap();

        let all = store.get_all().await.unwrap();
        assert_eq!(all, vec![cafe]);
    }

    #[tokio::test]
    async fn test_upsert_overwrites_existing_row() {
        let store = memory_store().await;

        let mut cafe = venue("Cafe", "53.4066", "-2.9667");
        store.upsert(&cafe).await.unwrap();

        cafe.description = "Now serving breakfast".into();
        cafe.is_liked = true;
        store.upsert(&cafe).await.unwrap();

        let all = store.get_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].description, "Now serving breakfast");
        assert!(store.find_liked("Cafe").await.unwrap());
    }

    #[tokio::test]
    async fn test_find_liked_unknown_name() {
        let store = memory_store().await;
        assert!(!store.find_liked("Nowhere").await.unwrap());
        assert!(store.get("Nowhere").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_batch_preserves_insertion_order() {
        let store = memory_store().await;

        let summary = store
            .upsert_all(&[
                venue("Deli", "0", "0"),
                venue("Cafe", "0", "0"),
                venue("Bar", "0", "0"),
            ])
            .await
            .unwrap();
        assert_eq!(summary.stored, 3);

        // Re-upserting keeps the original row position
        store.upsert(&venue("Deli", "1", "1")).await.unwrap();

        let names: Vec<String> = store
            .get_all()
            .await
            .unwrap()
            .into_iter()
            .map(|v| v.name)
            .collect();
        assert_eq!(names, vec!["Deli", "Cafe", "Bar"]);
    }

    #[tokio::test]
    async fn test_malformed_list_column_reads_as_empty() {
        let store = memory_store().await;
        store.upsert(&venue("Cafe", "0", "0")).await.unwrap();

        sqlx::query("UPDATE venues SET amenities = 'Wifi; Parking' WHERE name = 'Cafe'")
            .execute(&store.pool)
            .await
            .unwrap();

        let cafe = store.get("Cafe").await.unwrap().unwrap();
        assert!(cafe.amenities.is_empty());
    }

    #[tokio::test]
    async fn test_batch_continues_past_failed_record() {
        let store = memory_store().await;

        // Reject one specific name at the database level
        sqlx::query(
            "CREATE TRIGGER reject_broken BEFORE INSERT ON venues \
             WHEN NEW.name = 'Broken' BEGIN SELECT RAISE(ABORT, 'rejected'); END",
        )
        .execute(&store.pool)
        .await
        .unwrap();

        let summary = store
            .upsert_all(&[
                venue("Cafe", "0", "0"),
                venue("Broken", "0", "0"),
                venue("Deli", "0", "0"),
            ])
            .await
            .unwrap();

        assert_eq!(summary.stored, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.errors.len(), 1);

        let names: Vec<String> = store
            .get_all()
            .await
            .unwrap()
            .into_iter()
            .map(|v| v.name)
            .collect();
        assert_eq!(names, vec!["Cafe", "Deli"]);
    }
}
