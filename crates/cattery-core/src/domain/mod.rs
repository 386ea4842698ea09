//! # Cattery Core - Domain Module
//!
//! The `Cat` entity plus the filter and statistics value types built on it.

pub mod cat;
pub mod filter;
pub mod statistics;

pub use cat::{Adoption, AdoptionStatus, Cat, NewCat};
pub use filter::{CatFilter, CatOrdering, CatQuery, OrderField};
pub use statistics::{BreedSnapshot, BreedStatistics, CatStatistics, StatisticsSnapshot};
