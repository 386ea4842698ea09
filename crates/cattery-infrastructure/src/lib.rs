//! # Cattery Infrastructure
//!
//! Store implementations (adapters) of the cat repository port.

pub mod database;
pub mod error;

pub use database::{connect, create_pool, run_migrations, MemoryCatRepository, PgCatRepository};
pub use error::InfrastructureError;
