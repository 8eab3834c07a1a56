//! HTTP handlers

pub mod health;
pub mod weather;

pub use health::health_check;
pub use weather::{lookup_weather, method_not_allowed};
