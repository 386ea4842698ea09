//! # Cattery Shared
//!
//! Configuration, telemetry, pagination types and helpers shared by every
//! Cattery crate.

pub mod constants;
pub mod types;
pub mod utils;
pub mod telemetry;
pub mod config;
pub mod error;

pub use types::*;
pub use error::AppError;
