// ============================================================================
// Cattery Core - Cat Service
// File: crates/cattery-core/src/services/cat_service.rs
// ============================================================================
//! Listing, statistics and adoption flows over a [`CatRepository`].

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, info, warn};
use validator::Validate;

use cattery_shared::config::PaginationSettings;
use cattery_shared::{Page, PageRequest};

use crate::domain::{Adoption, BreedStatistics, Cat, CatQuery, CatStatistics, NewCat};
use crate::error::{DomainError, FieldErrors};
use crate::repositories::{CatRepository, Transition};

/// Cat service for handling shelter listings and adoption flows
pub struct CatService<R: CatRepository + ?Sized> {
    cat_repo: Arc<R>,
    pagination: PaginationSettings,
}

impl<R: CatRepository + ?Sized> CatService<R> {
    pub fn new(cat_repo: Arc<R>, pagination: PaginationSettings) -> Self {
        Self { cat_repo, pagination }
    }

    /// One page of cats matching every filter in `query`.
    ///
    /// Page numbers outside the result range, including 0, yield the real
    /// `count` with no results.
    pub async fn list(&self, query: CatQuery) -> Result<Page<Cat>, DomainError> {
        let request = self.page_request(&query)?;

        if query.page == 0 {
            let (count, _) = self.cat_repo.list(&query.filter, query.ordering, 0, 0).await?;
            debug!("Page 0 requested; {} cats match", count);
            return Ok(Page::before_first(count));
        }

        let (count, cats) = self
            .cat_repo
            .list(&query.filter, query.ordering, request.limit(), request.offset())
            .await?;

        debug!(
            "Listed {} of {} cats (page {}, size {})",
            cats.len(),
            count,
            request.page,
            request.page_size
        );
        Ok(Page::new(count, request, cats))
    }

    fn page_request(&self, query: &CatQuery) -> Result<PageRequest, DomainError> {
        let mut errors = FieldErrors::new();
        if query.page_size == Some(0) {
            errors.add("page_size", "Page size must be 1 or greater");
        }
        errors.into_result()?;

        let page_size = query
            .page_size
            .unwrap_or(self.pagination.page_size)
            .min(self.pagination.max_page_size);
        Ok(PageRequest::new(query.page, page_size))
    }

    pub async fn get(&self, id: i32) -> Result<Cat, DomainError> {
        self.cat_repo
            .find_by_id(id)
            .await?
            .ok_or(DomainError::CatNotFound(id))
    }

    /// Register a new cat
    pub async fn create(&self, new_cat: NewCat) -> Result<Cat, DomainError> {
        let new_cat = new_cat.normalized();
        new_cat.validate()?;

        // 1. Names are unique regardless of case
        if self.cat_repo.exists_by_name(&new_cat.name).await? {
            warn!("Registration rejected: duplicate cat name: {}", new_cat.name);
            return Err(DomainError::duplicate_name(&new_cat.name));
        }

        // 2. Save to database
        let cat = self.cat_repo.create(&new_cat).await?;

        info!("Cat registered: {} ({}) id={}", cat.name, cat.breed_label(), cat.id);
        Ok(cat)
    }

    /// Adopt an available cat. The date defaults to `today`.
    ///
    /// An already adopted cat is rejected rather than re-assigned.
    pub async fn adopt(
        &self,
        id: i32,
        adoption: Adoption,
        today: NaiveDate,
    ) -> Result<Cat, DomainError> {
        let adoption = adoption.normalized();
        adoption.validate()?;
        let adoption_date = adoption.adoption_date.unwrap_or(today);

        match self.cat_repo.adopt(id, &adoption.owner_name, adoption_date).await? {
            Transition::Applied(cat) => {
                info!("{} (id={}) adopted by {}", cat.name, cat.id, adoption.owner_name);
                Ok(cat)
            }
            Transition::Rejected(cat) => {
                warn!("Adoption rejected: cat {} is already adopted", cat.id);
                Err(DomainError::AlreadyAdopted {
                    owner_name: cat.owner_name.unwrap_or_default(),
                    name: cat.name,
                })
            }
            Transition::NotFound => Err(DomainError::CatNotFound(id)),
        }
    }

    /// Return an adopted cat to the shelter. Yields the cat and its former owner.
    pub async fn return_to_shelter(&self, id: i32) -> Result<(Cat, String), DomainError> {
        let current = self.get(id).await?;
        let former_owner = match current.owner_name.clone() {
            Some(owner) if current.is_adopted() => owner,
            _ => return Err(DomainError::NotAdopted { name: current.name }),
        };

        match self.cat_repo.return_to_shelter(id).await? {
            Transition::Applied(cat) => {
                info!("{} (id={}) returned to the shelter by {}", cat.name, cat.id, former_owner);
                Ok((cat, former_owner))
            }
            Transition::Rejected(cat) => Err(DomainError::NotAdopted { name: cat.name }),
            Transition::NotFound => Err(DomainError::CatNotFound(id)),
        }
    }

    /// Statistics over the whole table, not a filtered subset.
    pub async fn statistics(&self, today: NaiveDate) -> Result<CatStatistics, DomainError> {
        let snapshot = self.cat_repo.statistics(today).await?;
        Ok(CatStatistics::from(snapshot))
    }

    pub async fn breed_statistics(&self) -> Result<Vec<BreedStatistics>, DomainError> {
        let snapshots = self.cat_repo.breed_statistics().await?;
        Ok(snapshots.into_iter().map(BreedStatistics::from).collect())
    }

    pub async fn ping(&self) -> Result<(), DomainError> {
        self.cat_repo.ping().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CatFilter, CatOrdering, StatisticsSnapshot};
    use crate::repositories::MockCatRepository;
    use chrono::Utc;
    use mockall::predicate::eq;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 11, 3).unwrap()
    }

    fn cat(id: i32, owner: Option<&str>) -> Cat {
        Cat {
            id,
            name: "Whiskers".to_string(),
            breed: Some("Persian".to_string()),
            age: Some(3),
            color: None,
            weight: None,
            is_neutered: false,
            owner_name: owner.map(str::to_string),
            adoption_date: owner.map(|_| today()),
            description: None,
            created_at: Utc::now(),
        }
    }

    fn service(repo: MockCatRepository) -> CatService<MockCatRepository> {
        CatService::new(Arc::new(repo), PaginationSettings::default())
    }

    #[tokio::test]
    async fn test_adopt_unknown_cat_is_not_found() {
        let mut repo = MockCatRepository::new();
        repo.expect_adopt()
            .returning(|_, _, _| Ok(Transition::NotFound));

        let err = service(repo)
            .adopt(9999, Adoption::new("John Doe"), today())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::CatNotFound(9999)));
    }

    #[tokio::test]
    async fn test_adopt_defaults_date_and_title_cases_owner() {
        let mut repo = MockCatRepository::new();
        repo.expect_adopt()
            .withf(|id, owner, date| *id == 1 && owner == "John Doe" && *date == today())
            .times(1)
            .returning(|_, _, _| Ok(Transition::Applied(cat(1, Some("John Doe")))));

        let adopted = service(repo)
            .adopt(1, Adoption::new("  john doe "), today())
            .await
            .unwrap();
        assert!(adopted.is_adopted());
    }

    #[tokio::test]
    async fn test_adopt_already_adopted_is_rejected() {
        let mut repo = MockCatRepository::new();
        repo.expect_adopt()
            .returning(|_, _, _| Ok(Transition::Rejected(cat(1, Some("Alice")))));

        let err = service(repo)
            .adopt(1, Adoption::new("Bob"), today())
            .await
            .unwrap_err();
        match err {
            DomainError::AlreadyAdopted { owner_name, .. } => assert_eq!(owner_name, "Alice"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_adopt_with_blank_owner_never_reaches_store() {
        let mut repo = MockCatRepository::new();
        repo.expect_adopt().never();

        let err = service(repo)
            .adopt(1, Adoption::new("   "), today())
            .await
            .unwrap_err();
        match err {
            DomainError::Validation(fields) => assert!(fields.contains("owner_name")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_name() {
        let mut repo = MockCatRepository::new();
        repo.expect_exists_by_name()
            .withf(|name| name == "Whiskers")
            .returning(|_| Ok(true));
        repo.expect_create().never();

        let err = service(repo).create(NewCat::new("whiskers")).await.unwrap_err();
        match err {
            DomainError::Validation(fields) => assert!(fields.contains("name")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_list_page_zero_is_empty_but_counted() {
        let mut repo = MockCatRepository::new();
        repo.expect_list()
            .withf(|_: &CatFilter, _: &CatOrdering, limit: &u32, offset: &u64| {
                *limit == 0 && *offset == 0
            })
            .times(1)
            .returning(|_, _, _, _| Ok((3, vec![])));

        let query = CatQuery { page: 0, ..CatQuery::default() };
        let page = service(repo).list(query).await.unwrap();
        assert_eq!(page.count, 3);
        assert!(page.results.is_empty());
        assert_eq!(page.next, Some(1));
        assert_eq!(page.previous, None);
    }

    #[tokio::test]
    async fn test_list_rejects_page_size_zero() {
        let mut repo = MockCatRepository::new();
        repo.expect_list().never();

        let query = CatQuery { page_size: Some(0), ..CatQuery::default() };
        assert!(matches!(
            service(repo).list(query).await,
            Err(DomainError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_list_caps_page_size_and_computes_offset() {
        let mut repo = MockCatRepository::new();
        repo.expect_list()
            .withf(|filter: &CatFilter, ordering: &CatOrdering, limit: &u32, offset: &u64| {
                *filter == CatFilter::default()
                    && *ordering == CatOrdering::default()
                    && *limit == 100
                    && *offset == 200
            })
            .returning(|_, _, _, _| Ok((250, vec![])));

        let query = CatQuery { page: 3, page_size: Some(500), ..CatQuery::default() };
        let page = service(repo).list(query).await.unwrap();
        assert_eq!(page.count, 250);
        assert_eq!(page.next, None);
        assert_eq!(page.previous, Some(2));
    }

    #[tokio::test]
    async fn test_return_to_shelter_requires_adopted_cat() {
        let mut repo = MockCatRepository::new();
        repo.expect_find_by_id()
            .with(eq(1))
            .returning(|_| Ok(Some(cat(1, None))));
        repo.expect_return_to_shelter().never();

        let err = service(repo).return_to_shelter(1).await.unwrap_err();
        assert!(matches!(err, DomainError::NotAdopted { .. }));
    }

    #[tokio::test]
    async fn test_return_to_shelter_reports_former_owner() {
        let mut repo = MockCatRepository::new();
        repo.expect_find_by_id()
            .returning(|_| Ok(Some(cat(1, Some("Alice")))));
        repo.expect_return_to_shelter()
            .returning(|_| Ok(Transition::Applied(cat(1, None))));

        let (cat, former_owner) = service(repo).return_to_shelter(1).await.unwrap();
        assert!(!cat.is_adopted());
        assert_eq!(former_owner, "Alice");
    }

    #[tokio::test]
    async fn test_statistics_are_derived_from_snapshot() {
        let mut repo = MockCatRepository::new();
        repo.expect_statistics()
            .with(eq(today()))
            .returning(|_| {
                Ok(StatisticsSnapshot {
                    total_cats: 3,
                    adopted_cats: 1,
                    ..StatisticsSnapshot::default()
                })
            });

        let stats = service(repo).statistics(today()).await.unwrap();
        assert_eq!(stats.available_cats, 2);
        assert_eq!(stats.adoption_rate, 33.3);
    }
}
