// src/models/venue.rs
// DOCUMENTATION: Core data structures for campus venues
// PURPOSE: In-memory venue, remote wire format, and API response models

use geo_types::Point;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A campus eating venue
/// DOCUMENTATION: The authoritative in-memory form, owned by the synchronizer
/// `name` is the natural key used for merging and persistence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Venue {
    /// Venue name - natural key
    pub name: String,

    /// Building the venue is in
    pub building: String,

    /// Latitude as published (decimal string, may be malformed)
    pub lat: String,

    /// Longitude as published (decimal string, may be malformed)
    pub lon: String,

    pub description: String,

    /// Opening times, one line per entry
    pub opening_times: Vec<String>,

    pub amenities: Vec<String>,

    /// Photo URLs
    pub photos: Vec<String>,

    /// Venue web page
    pub url: String,

    /// Opaque revision marker from the feed
    pub last_modified: String,

    /// User preference, only ever set locally
    #[serde(default)]
    pub is_liked: bool,
}

impl Venue {
    /// Parse the published coordinate strings
    /// Returns None if either part is not a finite number
    pub fn coordinate(&self) -> Option<Point<f64>> {
        let lat: f64 = self.lat.trim().parse().ok()?;
        let lon: f64 = self.lon.trim().parse().ok()?;

        if !lat.is_finite() || !lon.is_finite() {
            return None;
        }

        Some(Point::new(lon, lat))
    }

    /// Opening times rendered one per line
    pub fn opening_times_text(&self) -> String {
        self.opening_times.join("\n")
    }

    /// Amenities rendered one per line
    pub fn amenities_text(&self) -> String {
        self.amenities.join("\n")
    }
}

/// Top-level document served by the venue feed
#[derive(Debug, Deserialize)]
pub struct VenueFeed {
    pub food_venues: Vec<RemoteVenue>,
}

/// A venue as it appears on the wire
/// DOCUMENTATION: Field names follow the feed, not the in-memory model
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteVenue {
    pub name: String,
    pub building: String,
    pub lat: String,
    pub lon: String,
    pub description: String,
    pub opening_times: Vec<String>,
    pub amenities: Vec<String>,
    pub photos: Vec<String>,
    #[serde(rename = "URL")]
    pub url: String,
    pub last_modified: String,
}

impl From<RemoteVenue> for Venue {
    fn from(remote: RemoteVenue) -> Self {
        Venue {
            name: remote.name,
            building: remote.building,
            lat: remote.lat,
            lon: remote.lon,
            description: remote.description,
            opening_times: remote.opening_times,
            amenities: remote.amenities,
            photos: remote.photos,
            url: remote.url,
            last_modified: remote.last_modified,
            is_liked: false,
        }
    }
}

/// Query parameters for GET /venues
/// DOCUMENTATION: lat/lon give the user's location; both or neither
#[derive(Debug, Default, Deserialize, Validate)]
pub struct VenueListQuery {
    #[validate(range(min = -90.0, max = 90.0))]
    pub lat: Option<f64>,

    #[validate(range(min = -180.0, max = 180.0))]
    pub lon: Option<f64>,

    /// Only return liked venues
    pub liked: Option<bool>,
}

/// Query parameters for GET /venues/{name}
/// DOCUMENTATION: Same location rules as the list; no filters
#[derive(Debug, Default, Deserialize, Validate)]
pub struct VenueDetailQuery {
    #[validate(range(min = -90.0, max = 90.0))]
    pub lat: Option<f64>,

    #[validate(range(min = -180.0, max = 180.0))]
    pub lon: Option<f64>,
}

/// One row of the venue list
#[derive(Debug, Clone, Serialize)]
pub struct VenueListItem {
    #[serde(flatten)]
    pub venue: Venue,

    /// Great-circle distance from the reference point, if the venue has a coordinate
    pub distance_m: Option<f64>,
}

/// Response for GET /venues
#[derive(Debug, Serialize)]
pub struct VenueListResponse {
    /// Reference point as [latitude, longitude]
    pub reference: [f64; 2],
    pub total: usize,
    pub venues: Vec<VenueListItem>,
}

/// Response for GET /venues/{name}
/// DOCUMENTATION: Detail view payload, with list fields pre-joined for display
#[derive(Debug, Serialize)]
pub struct VenueDetailResponse {
    #[serde(flatten)]
    pub venue: Venue,
    pub distance_m: Option<f64>,
    pub opening_times_text: String,
    pub amenities_text: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::venue;

    #[test]
    fn test_coordinate_parsing() {
        let point = venue("Cafe", "53.4066", " -2.9667 ").coordinate().unwrap();
        assert_eq!(point.y(), 53.4066);
        assert_eq!(point.x(), -2.9667);
    }

    #[test]
    fn test_invalid_coordinates_are_none() {
        assert!(venue("Cafe", "", "-2.9").coordinate().is_none());
        assert!(venue("Cafe", "north", "-2.9").coordinate().is_none());
        assert!(venue("Cafe", "NaN", "-2.9").coordinate().is_none());
        assert!(venue("Cafe", "53.4", "inf").coordinate().is_none());
    }

    #[test]
    fn test_remote_wire_names() {
        let json = r#"{
            "name": "Sydney Jones Cafe",
            "building": "Sydney Jones Library",
            "lat": "53.4035",
            "lon": "-2.9644",
            "description": "Coffee and snacks",
            "opening_times": ["Mon-Fri 08:30-17:00"],
            "amenities": ["Wifi", "Vegan options"],
            "photos": ["https://example.org/sj.jpg"],
            "URL": "https://example.org/sj",
            "last_modified": "2023-11-01 09:00:00"
        }"#;

        let remote: RemoteVenue = serde_json::from_str(json).unwrap();
        let venue = Venue::from(remote);

        assert_eq!(venue.url, "https://example.org/sj");
        assert_eq!(venue.last_modified, "2023-11-01 09:00:00");
        assert_eq!(venue.opening_times, vec!["Mon-Fri 08:30-17:00"]);
        assert!(!venue.is_liked);
    }

    #[test]
    fn test_multiline_text() {
        let mut v = venue("Cafe", "0", "0");
        v.opening_times = vec!["Mon 9-5".into(), "Tue 9-5".into()];
        assert_eq!(v.opening_times_text(), "Mon 9-5\nTue 9-5");
        assert_eq!(v.amenities_text(), "");
    }

    #[test]
    fn test_list_query_validation() {
        let ok = VenueListQuery {
            lat: Some(53.4),
            lon: Some(-2.9),
            liked: None,
        };
        assert!(ok.validate().is_ok());

        let bad = VenueListQuery {
            lat: Some(91.0),
            lon: Some(-2.9),
            liked: None,
        };
        assert!(bad.validate().is_err());
    }
}
