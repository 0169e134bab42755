// src/lib.rs
// DOCUMENTATION: Library root
// PURPOSE: Venue synchronization core, reusable by the server and by GUI frontends

pub mod config;
pub mod db;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod services;

pub use db::{MemoryVenueStore, SqliteVenueStore, VenueStore};
pub use errors::VenueError;
pub use models::Venue;
pub use services::{sort_by_distance, RemoteVenueSource, SyncReport, VenueSource, VenueSynchronizer};
