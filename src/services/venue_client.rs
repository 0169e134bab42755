// src/services/venue_client.rs
// DOCUMENTATION: Remote venue feed client
// PURPOSE: Fetch and decode the published food_venues document

use crate::errors::VenueError;
use crate::models::{Venue, VenueFeed};
use async_trait::async_trait;
use reqwest::Client;

/// Anything that can produce a fresh venue list
#[async_trait]
pub trait VenueSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<Venue>, VenueError>;
}

/// HTTP client for the venue feed
/// DOCUMENTATION: One GET per fetch, no retries, client-default timeouts
pub struct RemoteVenueSource {
    /// HTTP client for making requests
    client: Client,
    /// Feed URL
    url: String,
}

impl RemoteVenueSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
        }
    }

    /// Fetch and decode the feed at `url`
    ///
    /// # Returns
    /// Venues in feed order, all with `is_liked = false`
    pub async fn fetch_from(&self, url: &str) -> Result<Vec<Venue>, VenueError> {
        log::debug!("Fetching venue feed: {}", url);

        let response = self.client.get(url).send().await.map_err(|e| {
            log::error!("Venue feed request failed: {}", e);
            VenueError::Network(format!("Request failed: {}", e))
        })?;

        if !response.status().is_success() {
            let status = response.status();
            log::error!("Venue feed returned {}", status);
            return Err(VenueError::Network(format!("HTTP status {}", status)));
        }

        let body = response.bytes().await.map_err(|e| {
            log::error!("Failed to read venue feed body: {}", e);
            VenueError::Network(format!("Body read failed: {}", e))
        })?;

        let venues = decode_feed(&body)?;
        log::info!("Venue feed returned {} venues", venues.len());
        Ok(venues)
    }
}

#[async_trait]
impl VenueSource for RemoteVenueSource {
    async fn fetch(&self) -> Result<Vec<Venue>, VenueError> {
        self.fetch_from(&self.url).await
    }
}

/// Decode a feed document into venues
pub fn decode_feed(body: &[u8]) -> Result<Vec<Venue>, VenueError> {
    let feed: VenueFeed = serde_json::from_slice(body).map_err(|e| {
        log::error!("Failed to parse venue feed: {}", e);
        VenueError::Decode(e.to_string())
    })?;

    Ok(feed.food_venues.into_iter().map(Venue::from).collect())
}
