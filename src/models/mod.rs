// src/models/mod.rs
// DOCUMENTATION: Models module organization
// PURPOSE: Re-export venue and persisted-record models

pub mod record;
pub mod venue;

pub use record::*;
pub use venue::*;
