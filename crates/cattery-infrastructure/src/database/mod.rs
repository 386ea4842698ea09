//! Database module (store adapters)

pub mod connection;
pub mod memory;
pub mod postgres;

pub use connection::{connect, create_pool, run_migrations};
pub use memory::MemoryCatRepository;
pub use postgres::PgCatRepository;
