// src/handlers/venues.rs
// DOCUMENTATION: HTTP handlers for venue operations
// PURPOSE: Parse requests, call the synchronizer, return responses

use crate::config::Config;
use crate::errors::VenueError;
use crate::models::{
    VenueDetailQuery, VenueDetailResponse, VenueListItem, VenueListQuery, VenueListResponse,
};
use crate::services::{distance_to, sort_by_distance, to_feature_collection, VenueSynchronizer};
use actix_web::{web, HttpResponse, Responder};
use geo_types::Point;
use validator::Validate;

/// Reference point from the query, or the configured default
fn reference_point(
    query: &impl Validate,
    lat: Option<f64>,
    lon: Option<f64>,
    config: &Config,
) -> Result<Point<f64>, VenueError> {
    if let Err(e) = query.validate() {
        return Err(VenueError::InvalidInput(e.to_string()));
    }

    match (lat, lon) {
        // NaN slips through the range check
        (Some(lat), Some(lon)) if !lat.is_finite() || !lon.is_finite() => Err(
            VenueError::InvalidInput("lat and lon must be finite numbers".to_string()),
        ),
        (Some(lat), Some(lon)) => Ok(Point::new(lon, lat)),
        (None, None) => Ok(config.default_location()),
        _ => Err(VenueError::InvalidInput(
            "lat and lon must be given together".to_string(),
        )),
    }
}

/// GET /venues
/// Current venues, nearest first
pub async fn list_venues(
    sync: web::Data<VenueSynchronizer>,
    config: web::Data<Config>,
    query: web::Query<VenueListQuery>,
) -> Result<impl Responder, VenueError> {
    let reference = reference_point(&*query, query.lat, query.lon, &config)?;

    let mut venues = sync.venues().await;
    if let Some(liked) = query.liked {
        venues.retain(|v| v.is_liked == liked);
    }

    let items: Vec<VenueListItem> = sort_by_distance(&venues, reference)
        .into_iter()
        .map(|venue| VenueListItem {
            distance_m: distance_to(&venue, reference),
            venue,
        })
        .collect();

    Ok(HttpResponse::Ok().json(VenueListResponse {
        reference: [reference.y(), reference.x()],
        total: items.len(),
        venues: items,
    }))
}

/// GET /venues/map
/// GeoJSON for map placement
pub async fn venue_map(sync: web::Data<VenueSynchronizer>) -> impl Responder {
    let venues = sync.venues().await;
    HttpResponse::Ok().json(to_feature_collection(&venues))
}

/// GET /venues/{name}
/// Venue detail
pub async fn get_venue(
    sync: web::Data<VenueSynchronizer>,
    config: web::Data<Config>,
    path: web::Path<String>,
    query: web::Query<VenueDetailQuery>,
) -> Result<impl Responder, VenueError> {
    let name = path.into_inner();
    let reference = reference_point(&*query, query.lat, query.lon, &config)?;

    let venue = sync.venue(&name).await.ok_or_else(|| {
        log::debug!("Venue not found: {}", name);
        VenueError::NotFound(name.clone())
    })?;

    Ok(HttpResponse::Ok().json(VenueDetailResponse {
        distance_m: distance_to(&venue, reference),
        opening_times_text: venue.opening_times_text(),
        amenities_text: venue.amenities_text(),
        venue,
    }))
}

/// POST /venues/{name}/like
/// Toggle the liked flag
pub async fn toggle_like(
    sync: web::Data<VenueSynchronizer>,
    path: web::Path<String>,
) -> Result<impl Responder, VenueError> {
    let venues = sync.toggle_liked(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(venues))
}

/// POST /venues/sync
/// Refresh from the feed, falling back to the cache
pub async fn trigger_sync(sync: web::Data<VenueSynchronizer>) -> Result<impl Responder, VenueError> {
    let report = sync.sync().await?;
    Ok(HttpResponse::Ok().json(report))
}

/// Configuration for venue routes
/// "/map" and "/sync" are matched before "/{name}", so a venue with one of
/// those names is only reachable through the list
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/venues")
            .route("", web::get().to(list_venues))
            .route("/map", web::get().to(venue_map))
            .route("/sync", web::post().to(trigger_sync))
            .route("/{name}", web::get().to(get_venue))
            .route("/{name}/like", web::post().to(toggle_like)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{MemoryVenueStore, VenueStore};
    use crate::models::fixtures::venue;
    use crate::models::Venue;
    use crate::services::VenueSource;
    use actix_web::{http::StatusCode, test, App};
    use async_trait::async_trait;
    use serde_json::Value;
    use std::sync::Arc;

    struct FixedSource(Option<Vec<Venue>>);

    #[async_trait]
    impl VenueSource for FixedSource {
        async fn fetch(&self) -> Result<Vec<Venue>, VenueError> {
            self.0
                .clone()
                .ok_or_else(|| VenueError::Network("offline".into()))
        }
    }

    fn campus() -> Vec<Venue> {
        let mut far = venue("Far Cafe", "0", "5");
        far.opening_times = vec!["Mon 9-5".into(), "Tue 9-5".into()];
        vec![far, venue("Kiosk", "?", "?"), venue("Near Deli", "0", "1")]
    }

    async fn synced(source: FixedSource, store: Arc<MemoryVenueStore>) -> web::Data<VenueSynchronizer> {
        let sync = VenueSynchronizer::new(Arc::new(source), store);
        sync.sync().await.unwrap();
        web::Data::new(sync)
    }

    macro_rules! app {
        ($sync:expr) => {
            test::init_service(
                App::new()
                    .app_data($sync.clone())
                    .app_data(web::Data::new(Config::sample()))
                    .configure(crate::handlers::health_config)
                    .configure(config),
            )
            .await
        };
    }

    fn names(body: &Value) -> Vec<String> {
        body["venues"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v["name"].as_str().unwrap().to_string())
            .collect()
    }

    #[actix_web::test]
    async fn test_list_is_sorted_from_query_location() {
        let sync = synced(FixedSource(Some(campus())), Arc::new(MemoryVenueStore::new())).await;
        let app = app!(sync);

        let req = test::TestRequest::get().uri("/venues?lat=0&lon=0").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["total"], 3);
        assert_eq!(names(&body), vec!["Near Deli", "Kiosk", "Far Cafe"]);
        assert!(body["venues"][1]["distance_m"].is_null());
    }

    #[actix_web::test]
    async fn test_list_rejects_half_a_location() {
        let sync = synced(FixedSource(Some(campus())), Arc::new(MemoryVenueStore::new())).await;
        let app = app!(sync);

        let req = test::TestRequest::get().uri("/venues?lat=0").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::get().uri("/venues?lat=95&lon=0").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::get().uri("/venues?lat=NaN&lon=0").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::get().uri("/venues/Far%20Cafe?lat=0&lon=inf").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_like_then_filter() {
        let store = Arc::new(MemoryVenueStore::new());
        let sync = synced(FixedSource(Some(campus())), store.clone()).await;
        let app = app!(sync);

        let req = test::TestRequest::post().uri("/venues/Near%20Deli/like").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(store.find_liked("Near Deli").await.unwrap());

        let req = test::TestRequest::get().uri("/venues?liked=true").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(names(&body), vec!["Near Deli"]);
    }

    #[actix_web::test]
    async fn test_like_unknown_venue_is_404() {
        let sync = synced(FixedSource(Some(campus())), Arc::new(MemoryVenueStore::new())).await;
        let app = app!(sync);

        let req = test::TestRequest::post().uri("/venues/Nowhere/like").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_detail_joins_opening_times() {
        let sync = synced(FixedSource(Some(campus())), Arc::new(MemoryVenueStore::new())).await;
        let app = app!(sync);

        let req = test::TestRequest::get().uri("/venues/Far%20Cafe").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["name"], "Far Cafe");
        assert_eq!(body["opening_times_text"], "Mon 9-5\nTue 9-5");
        assert_eq!(body["is_liked"], false);
    }

    #[actix_web::test]
    async fn test_detail_distance_from_query_location() {
        let sync = synced(FixedSource(Some(campus())), Arc::new(MemoryVenueStore::new())).await;
        let app = app!(sync);

        let req = test::TestRequest::get().uri("/venues/Near%20Deli?lat=0&lon=1").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["distance_m"], 0.0);

        let req = test::TestRequest::get().uri("/venues/Kiosk").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert!(body["distance_m"].is_null());
    }

    #[actix_web::test]
    async fn test_map_skips_unplaceable_venues() {
        let sync = synced(FixedSource(Some(campus())), Arc::new(MemoryVenueStore::new())).await;
        let app = app!(sync);

        let req = test::TestRequest::get().uri("/venues/map").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["type"], "FeatureCollection");
        assert_eq!(body["features"].as_array().unwrap().len(), 2);
    }

    #[actix_web::test]
    async fn test_offline_sync_reports_fallback() {
        let store = Arc::new(MemoryVenueStore::new());
        store.upsert(&venue("Cached Cafe", "0", "0")).await.unwrap();
        let sync = web::Data::new(VenueSynchronizer::new(
            Arc::new(FixedSource(None)),
            store,
        ));
        let app = app!(sync);

        let req = test::TestRequest::post().uri("/venues/sync").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["stats"]["source"], "cache");
        assert_eq!(body["fallback"]["kind"], "network");
        assert_eq!(body["venues"][0]["name"], "Cached Cafe");
    }

    #[actix_web::test]
    async fn test_health_reports_venue_count() {
        let sync = synced(FixedSource(Some(campus())), Arc::new(MemoryVenueStore::new())).await;
        let app = app!(sync);

        let req = test::TestRequest::get().uri("/health").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["status"], "ok");
        assert_eq!(body["venues"], 3);
    }
}
