// src/services/ordering.rs
// DOCUMENTATION: Distance ordering for venue lists
// PURPOSE: Nearest-first ordering from the user's location

use crate::models::Venue;
use geo_types::Point;

const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle distance in metres
/// Uses Haversine formula; points are (lon, lat)
pub fn haversine_distance(a: Point<f64>, b: Point<f64>) -> f64 {
    let (lat1, lat2) = (a.y().to_radians(), b.y().to_radians());
    let d_lat = (b.y() - a.y()).to_radians();
    let d_lon = (b.x() - a.x()).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_M * h.min(1.0).sqrt().asin()
}

/// Distance from `reference` to the venue, None if its coordinate does not parse
pub fn distance_to(venue: &Venue, reference: Point<f64>) -> Option<f64> {
    venue
        .coordinate()
        .map(|point| haversine_distance(reference, point))
}

/// Order venues nearest-first
///
/// Stable: equal distances keep their input order. Venues without a usable
/// coordinate are incomparable and stay at their input positions; the
/// remaining slots are filled nearest-first.
pub fn sort_by_distance(venues: &[Venue], reference: Point<f64>) -> Vec<Venue> {
    let mut ranked: Vec<(usize, f64)> = venues
        .iter()
        .enumerate()
        .filter_map(|(idx, venue)| distance_to(venue, reference).map(|d| (idx, d)))
        .collect();

    let slots: Vec<usize> = ranked.iter().map(|(idx, _)| *idx).collect();
    ranked.sort_by(|a, b| a.1.total_cmp(&b.1));

    let mut ordered = venues.to_vec();
    for (slot, (source, _)) in slots.into_iter().zip(ranked) {
        ordered[slot] = venues[source].clone();
    }

    ordered
}
