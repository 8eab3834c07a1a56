//! Shared types and models for the Tripcast weather service
//!
//! This crate contains the normalized weather record and the request/response
//! shapes exchanged between the backend and the trip-planning front end.

pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
