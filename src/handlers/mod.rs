// src/handlers/mod.rs
// DOCUMENTATION: Handlers module organization
// PURPOSE: Re-export route configuration for the venue service

pub mod health;
pub mod venues;

pub use health::config as health_config;
pub use venues::config as venues_config;
