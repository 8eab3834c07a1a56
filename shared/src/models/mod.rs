//! Domain models for the Tripcast weather service

mod request;
mod weather;

pub use request::*;
pub use weather::*;
