//! # Cattery Core
//!
//! Domain entities, statistics, services, and repository traits for the
//! cat adoption shelter.

pub mod domain;
pub mod services;
pub mod repositories;
pub mod error;

// Re-export domain entities
pub use domain::*;
pub use error::{DomainError, FieldErrors};
