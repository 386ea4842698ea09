//! Repository traits (ports)

pub mod cat_repository;

pub use cat_repository::{CatRepository, Transition};
#[cfg(test)]
pub use cat_repository::MockCatRepository;
