// src/handlers/health.rs
// DOCUMENTATION: Health check handler
// PURPOSE: Report service status and venue cache state

use crate::services::VenueSynchronizer;
use actix_web::{web, HttpResponse, Responder};
use serde_json::json;

pub async fn health_check(sync: web::Data<VenueSynchronizer>) -> impl Responder {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "service": "campus-venues",
        "version": env!("CARGO_PKG_VERSION"),
        "venues": sync.venues().await.len(),
        "syncing": sync.is_syncing()
    }))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check));
}
