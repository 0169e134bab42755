// src/models/record.rs
// DOCUMENTATION: Persisted form of a venue
// PURPOSE: Row mapping for the local cache, with list fields stored as JSON text

use sqlx::FromRow;

use super::Venue;

/// One row of the `venues` table
/// DOCUMENTATION: Same fields as Venue; opening_times, amenities and photos
/// hold a JSON-encoded string array
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct VenueRecord {
    pub name: String,
    pub building: String,
    pub lat: String,
    pub lon: String,
    pub description: String,
    pub opening_times: String,
    pub amenities: String,
    pub photos: String,
    pub url: String,
    pub last_modified: String,
    pub is_liked: bool,
}

impl VenueRecord {
    /// Encode a venue for storage
    pub fn from_venue(venue: &Venue) -> Self {
        VenueRecord {
            name: venue.name.clone(),
            building: venue.building.clone(),
            lat: venue.lat.clone(),
            lon: venue.lon.clone(),
            description: venue.description.clone(),
            opening_times: encode_string_list(&venue.opening_times),
            amenities: encode_string_list(&venue.amenities),
            photos: encode_string_list(&venue.photos),
            url: venue.url.clone(),
            last_modified: venue.last_modified.clone(),
            is_liked: venue.is_liked,
        }
    }

    /// Decode a stored row; malformed list fields become empty
    pub fn into_venue(self) -> Venue {
        let opening_times = decode_string_list(&self.name, "opening_times", &self.opening_times);
        let amenities = decode_string_list(&self.name, "amenities", &self.amenities);
        let photos = decode_string_list(&self.name, "photos", &self.photos);

        Venue {
            name: self.name,
            building: self.building,
            lat: self.lat,
            lon: self.lon,
            description: self.description,
            opening_times,
            amenities,
            photos,
            url: self.url,
            last_modified: self.last_modified,
            is_liked: self.is_liked,
        }
    }
}

/// Serialize a string list to its stored JSON text
pub fn encode_string_list(values: &[String]) -> String {
    serde_json::to_string(values).unwrap_or_else(|e| {
        log::warn!("Failed to encode string list: {}", e);
        "[]".to_string()
    })
}

/// Parse stored JSON text back into a string list
/// Anything that is not a JSON array of strings yields an empty list
pub fn decode_string_list(venue: &str, field: &str, raw: &str) -> Vec<String> {
    if raw.trim().is_empty() {
        return Vec::new();
    }

    serde_json::from_str(raw).unwrap_or_else(|e| {
        log::warn!("Discarding malformed {} for {}: {}", field, venue, e);
        Vec::new()
    })
}
