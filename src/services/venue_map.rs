// src/services/venue_map.rs
// DOCUMENTATION: Map placement for venues
// PURPOSE: Project venues with usable coordinates into GeoJSON

use crate::models::Venue;
use geojson::{feature::Id, Feature, FeatureCollection, Geometry, JsonObject, Value};
use serde_json::json;

/// One Point feature per venue with a parsable coordinate
/// Venues whose coordinates do not parse are left off the map
pub fn to_feature_collection(venues: &[Venue]) -> FeatureCollection {
    let features: Vec<Feature> = venues.iter().filter_map(to_feature).collect();

    let skipped = venues.len() - features.len();
    if skipped > 0 {
        log::debug!("{} venues have no usable coordinate and were not placed", skipped);
    }

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

fn to_feature(venue: &Venue) -> Option<Feature> {
    let point = venue.coordinate()?;

    let mut properties = JsonObject::new();
    properties.insert("name".to_string(), json!(venue.name));
    properties.insert("building".to_string(), json!(venue.building));
    properties.insert("is_liked".to_string(), json!(venue.is_liked));

    Some(Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::Point(vec![point.x(), point.y()]))),
        id: Some(Id::String(venue.name.clone())),
        properties: Some(properties),
        foreign_members: None,
    })
}
