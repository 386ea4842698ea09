// ============================================================================
// Cattery Infrastructure - In-Memory Cat Repository
// File: crates/cattery-infrastructure/src/database/memory/cat_repo_impl.rs
// ============================================================================

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use parking_lot::RwLock;

use cattery_core::domain::{
    BreedSnapshot, Cat, CatFilter, CatOrdering, NewCat, StatisticsSnapshot,
};
use cattery_core::error::DomainError;
use cattery_core::repositories::{CatRepository, Transition};

/// Cat table held in process.
///
/// Every operation takes the table lock once, so each read or conditional
/// update is atomic in the same way a single SQL statement is.
pub struct MemoryCatRepository {
    table: RwLock<Table>,
}

struct Table {
    next_id: i32,
    rows: BTreeMap<i32, Cat>,
}

impl Default for MemoryCatRepository {
    fn default() -> Self {
        Self {
            table: RwLock::new(Table {
                next_id: 1,
                rows: BTreeMap::new(),
            }),
        }
    }
}

impl MemoryCatRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a fully formed record, keeping its id. Used to seed fixtures
    /// with owners and adoption dates that `create` does not accept.
    pub fn insert(&self, cat: Cat) -> Cat {
        let mut table = self.table.write();
        table.next_id = table.next_id.max(cat.id + 1);
        table.rows.insert(cat.id, cat.clone());
        cat
    }

    pub fn len(&self) -> usize {
        self.table.read().rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn transition<G, F>(&self, id: i32, guard: G, apply: F) -> Transition
    where
        G: Fn(&Cat) -> bool,
        F: FnOnce(&mut Cat),
    {
        let mut table = self.table.write();
        match table.rows.get_mut(&id) {
            None => Transition::NotFound,
            Some(cat) if !guard(cat) => Transition::Rejected(cat.clone()),
            Some(cat) => {
                apply(cat);
                Transition::Applied(cat.clone())
            }
        }
    }
}

#[async_trait]
impl CatRepository for MemoryCatRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<Cat>, DomainError> {
        Ok(self.table.read().rows.get(&id).cloned())
    }

    async fn exists_by_name(&self, name: &str) -> Result<bool, DomainError> {
        let name = name.to_lowercase();
        Ok(self
            .table
            .read()
            .rows
            .values()
            .any(|cat| cat.name.to_lowercase() == name))
    }

    async fn list(
        &self,
        filter: &CatFilter,
        ordering: CatOrdering,
        limit: u32,
        offset: u64,
    ) -> Result<(u64, Vec<Cat>), DomainError> {
        let table = self.table.read();
        let mut matching: Vec<&Cat> = table.rows.values().filter(|cat| filter.matches(cat)).collect();
        matching.sort_by(|a, b| ordering.compare(a, b));

        let count = matching.len() as u64;
        let skip = usize::try_from(offset).unwrap_or(usize::MAX);
        let page = matching
            .into_iter()
            .skip(skip)
            .take(limit as usize)
            .cloned()
            .collect();
        Ok((count, page))
    }

    async fn create(&self, new_cat: &NewCat) -> Result<Cat, DomainError> {
        let mut table = self.table.write();

        // mirrors the unique index on LOWER(name)
        let lowered = new_cat.name.to_lowercase();
        if table.rows.values().any(|cat| cat.name.to_lowercase() == lowered) {
            return Err(DomainError::duplicate_name(&new_cat.name));
        }

        let id = table.next_id;
        table.next_id += 1;
        let cat = Cat {
            id,
            name: new_cat.name.clone(),
            breed: new_cat.breed.clone(),
            age: new_cat.age,
            color: new_cat.color.clone(),
            weight: new_cat.weight,
            is_neutered: new_cat.is_neutered,
            owner_name: None,
            adoption_date: None,
            description: new_cat.description.clone(),
            created_at: Utc::now(),
        };
        table.rows.insert(id, cat.clone());
        Ok(cat)
    }

    async fn adopt(
        &self,
        id: i32,
        owner_name: &str,
        adoption_date: NaiveDate,
    ) -> Result<Transition, DomainError> {
        Ok(self.transition(
            id,
            |cat| !cat.is_adopted(),
            |cat| {
                cat.owner_name = Some(owner_name.to_string());
                cat.adoption_date = Some(adoption_date);
            },
        ))
    }

    async fn return_to_shelter(&self, id: i32) -> Result<Transition, DomainError> {
        Ok(self.transition(id, Cat::is_adopted, |cat| {
            cat.owner_name = None;
            cat.adoption_date = None;
        }))
    }

    async fn statistics(&self, today: NaiveDate) -> Result<StatisticsSnapshot, DomainError> {
        let table = self.table.read();
        Ok(StatisticsSnapshot::from_cats(table.rows.values(), today))
    }

    async fn breed_statistics(&self) -> Result<Vec<BreedSnapshot>, DomainError> {
        let table = self.table.read();
        Ok(BreedSnapshot::from_cats(table.rows.values()))
    }

    async fn ping(&self) -> Result<(), DomainError> {
        Ok(())
    }
}
