// src/config/env.rs
// DOCUMENTATION: Environment variable management
// PURPOSE: Load and validate configuration from .env files

use dotenv::dotenv;
use geo_types::Point;
use std::env;
use std::str::FromStr;

/// Venue feed published by the university
pub const DEFAULT_VENUES_URL: &str =
    "https://cgi.csc.liv.ac.uk/~phil/Teaching/COMP228/eating_venues/data.json";

/// Ashton Building, used as the reference point until a user location is known
pub const DEFAULT_LATITUDE: f64 = 53.4066;
pub const DEFAULT_LONGITUDE: f64 = -2.9667;

/// Application configuration loaded from environment variables
/// DOCUMENTATION: Centralizes all configuration in one struct
/// Load with Config::from_env() at application startup
#[derive(Debug, Clone)]
pub struct Config {
    /// Remote JSON document holding the `food_venues` array
    pub venues_url: String,

    /// SQLite connection string for the local venue cache
    /// Format: sqlite://path/to/file.db or sqlite::memory:
    pub database_url: String,

    /// Server bind address (e.g., "127.0.0.1")
    pub server_address: String,

    /// Server listen port (default 8003)
    pub server_port: u16,

    /// Environment: development, staging, production
    pub environment: String,

    /// Log level: debug, info, warn, error
    pub log_level: String,

    /// Maximum connections in database pool
    pub db_max_connections: u32,

    /// Connection timeout in seconds
    pub db_connection_timeout: u64,

    /// Reference latitude when a request carries no location
    pub default_latitude: f64,

    /// Reference longitude when a request carries no location
    pub default_longitude: f64,

    /// Run one sync before the server starts accepting requests
    pub sync_on_startup: bool,
}

impl Config {
    /// Load configuration from environment variables
    /// DOCUMENTATION: Reads from .env or process environment
    /// Called once at application startup
    pub fn from_env() -> Self {
        dotenv().ok();

        Config {
            venues_url: env::var("VENUES_URL").unwrap_or_else(|_| DEFAULT_VENUES_URL.to_string()),

            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://venues.db".to_string()),

            server_address: env::var("SERVER_ADDRESS").unwrap_or_else(|_| "127.0.0.1".to_string()),

            server_port: parse_var("SERVER_PORT", 8003),

            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),

            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),

            db_max_connections: parse_var("DB_MAX_CONNECTIONS", 5),

            db_connection_timeout: parse_var("DB_CONNECTION_TIMEOUT", 30),

            default_latitude: parse_var("DEFAULT_LATITUDE", DEFAULT_LATITUDE),

            default_longitude: parse_var("DEFAULT_LONGITUDE", DEFAULT_LONGITUDE),

            sync_on_startup: parse_var("SYNC_ON_STARTUP", true),
        }
    }

    /// Validate critical configuration
    /// DOCUMENTATION: Ensures application can start safely
    pub fn validate(&self) -> Result<(), String> {
        if self.venues_url.is_empty() {
            return Err("VENUES_URL must not be empty".to_string());
        }

        if self.database_url.is_empty() {
            return Err("DATABASE_URL is required".to_string());
        }

        if !(-90.0..=90.0).contains(&self.default_latitude)
            || !(-180.0..=180.0).contains(&self.default_longitude)
        {
            return Err(format!(
                "Default location out of range: {}, {}",
                self.default_latitude, self.default_longitude
            ));
        }

        if !self.venues_url.starts_with("https://") {
            log::warn!("VENUES_URL is not served over https: {}", self.venues_url);
        }

        Ok(())
    }

    /// Reference point used for ordering when no user location is supplied
    pub fn default_location(&self) -> Point<f64> {
        Point::new(self.default_longitude, self.default_latitude)
    }
}

#[cfg(test)]
impl Config {
    /// In-memory configuration for tests
    pub(crate) fn sample() -> Self {
        Config {
            venues_url: DEFAULT_VENUES_URL.to_string(),
            database_url: "sqlite::memory:".to_string(),
            server_address: "127.0.0.1".to_string(),
            server_port: 8003,
            environment: "test".to_string(),
            log_level: "debug".to_string(),
            db_max_connections: 1,
            db_connection_timeout: 5,
            default_latitude: DEFAULT_LATITUDE,
            default_longitude: DEFAULT_LONGITUDE,
            sync_on_startup: false,
        }
    }
}

fn parse_var<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
