// src/config/mod.rs
// DOCUMENTATION: Configuration module organization
// PURPOSE: Re-export configuration and cache pool setup

pub mod db;
pub mod env;

pub use db::init_db_pool;
pub use env::{Config, DEFAULT_LATITUDE, DEFAULT_LONGITUDE, DEFAULT_VENUES_URL};
