// src/services/mod.rs
// DOCUMENTATION: Services module organization
// PURPOSE: Re-export feed client, synchronizer, ordering and map components

pub mod ordering;
pub mod sync_service;
pub mod venue_client;
pub mod venue_map;

pub use ordering::*;
pub use sync_service::*;
pub use venue_client::*;
pub use venue_map::*;
