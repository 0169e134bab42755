// src/db/mod.rs
// DOCUMENTATION: Database module organization
// PURPOSE: Re-export the venue store interface and its implementations

pub mod repository;
pub mod store;

pub use repository::*;
pub use store::*;
