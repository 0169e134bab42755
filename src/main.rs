// src/main.rs
// DOCUMENTATION: Application entry point
// PURPOSE: Initialize config, venue cache, and start HTTP server

use actix_web::{middleware::Logger, web, App, HttpServer};
use anyhow::Context;
use campus_venues::config::{self, Config};
use campus_venues::handlers;
use campus_venues::{RemoteVenueSource, SqliteVenueStore, VenueSynchronizer};
use dotenv::dotenv;
use std::sync::Arc;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // 1. Load environment variables
    dotenv().ok();

    // 2. Load configuration
    let config = Config::from_env();

    // 3. Initialize logging
    if std::env::var("RUST_LOG").is_err() {
        let log_level = if !config.log_level.is_empty() {
            &config.log_level
        } else {
            "info,actix_web=info,sqlx=warn"
        };
        std::env::set_var("RUST_LOG", log_level);
    }
    env_logger::init();

    if let Err(e) = config.validate() {
        anyhow::bail!("Configuration error: {}", e);
    }

    log::info!("Starting campus-venues service...");
    log::info!("Environment: {}", config.environment);
    log::info!("Venue feed: {}", config.venues_url);

    // 4. Open the local venue cache
    let pool = config::init_db_pool(&config)
        .await
        .with_context(|| format!("Failed to open venue cache at {}", config.database_url))?;
    let store = SqliteVenueStore::open(pool)
        .await
        .context("Failed to prepare venue cache")?;

    // 5. Build the synchronizer and seed it from the cache
    let sync = VenueSynchronizer::new(
        Arc::new(RemoteVenueSource::new(config.venues_url.clone())),
        Arc::new(store),
    );

    if let Err(e) = sync.load_cached().await {
        log::warn!("Starting with an empty venue list: {}", e);
    }

    if config.sync_on_startup {
        match sync.sync().await {
            Ok(report) => log::info!(
                "Startup sync: {} venues from {:?}",
                report.venues.len(),
                report.stats.source
            ),
            Err(e) => log::warn!("Startup sync skipped: {}", e),
        }
    }

    // 6. Start HTTP server
    let server_addr = format!("{}:{}", config.server_address, config.server_port);
    log::info!("Server Address: {}", server_addr);

    let sync = web::Data::new(sync);
    let config_data = web::Data::new(config);

    HttpServer::new(move || {
        App::new()
            .app_data(sync.clone())
            .app_data(config_data.clone())
            .wrap(Logger::default())
            .wrap(actix_web::middleware::Compress::default())
            .configure(handlers::health_config)
            .configure(handlers::venues_config)
    })
    .bind(&server_addr)
    .with_context(|| format!("Failed to bind {}", server_addr))?
    .run()
    .await?;

    Ok(())
}
