//! Cat repository trait (port)

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::{BreedSnapshot, Cat, CatFilter, CatOrdering, NewCat, StatisticsSnapshot};
use crate::error::DomainError;

/// Result of a conditional single-row update.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// The row matched the guard and was updated.
    Applied(Cat),
    /// The row exists but its current state rejected the update.
    Rejected(Cat),
    NotFound,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> Result<Option<Cat>, DomainError>;

    /// Case-insensitive name lookup.
    async fn exists_by_name(&self, name: &str) -> Result<bool, DomainError>;

    /// Total matching rows plus the requested window of them.
    async fn list(
        &self,
        filter: &CatFilter,
        ordering: CatOrdering,
        limit: u32,
        offset: u64,
    ) -> Result<(u64, Vec<Cat>), DomainError>;

    async fn create(&self, cat: &NewCat) -> Result<Cat, DomainError>;

    /// Set owner and date only if the cat is currently available.
    async fn adopt(
        &self,
        id: i32,
        owner_name: &str,
        adoption_date: NaiveDate,
    ) -> Result<Transition, DomainError>;

    /// Clear owner and date only if the cat is currently adopted.
    async fn return_to_shelter(&self, id: i32) -> Result<Transition, DomainError>;

    /// Whole-table aggregates as of `today`.
    async fn statistics(&self, today: NaiveDate) -> Result<StatisticsSnapshot, DomainError>;

    async fn breed_statistics(&self) -> Result<Vec<BreedSnapshot>, DomainError>;

    /// Cheap round trip used by readiness checks.
    async fn ping(&self) -> Result<(), DomainError>;
}
