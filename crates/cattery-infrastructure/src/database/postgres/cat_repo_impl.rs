// ============================================================================
// Cattery Infrastructure - PostgreSQL Cat Repository
// File: crates/cattery-infrastructure/src/database/postgres/cat_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use tracing::{error, info};

use cattery_core::domain::statistics::recent_window_start;
use cattery_core::domain::{
    AdoptionStatus, BreedSnapshot, Cat, CatFilter, CatOrdering, NewCat, OrderField,
    StatisticsSnapshot,
};
use cattery_core::error::DomainError;
use cattery_core::repositories::{CatRepository, Transition};
use cattery_shared::utils::non_blank;

const CAT_COLUMNS: &str = "id, name, breed, age, color, weight, is_neutered, \
     owner_name, adoption_date, description, created_at";

const IS_ADOPTED: &str = "COALESCE(TRIM(owner_name), '') <> ''";
const IS_AVAILABLE: &str = "COALESCE(TRIM(owner_name), '') = ''";

pub struct PgCatRepository {
    pool: PgPool,
}

impl PgCatRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_by_id(&self, id: i32) -> Result<Option<Cat>, DomainError> {
        let row: Option<CatRow> = sqlx::query_as(&format!(
            "SELECT {} FROM cats WHERE id = $1",
            CAT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| database_error("finding cat by id", e))?;

        Ok(row.map(Cat::from))
    }

    /// Resolve a guarded update that matched no row.
    async fn rejected_or_missing(&self, id: i32) -> Result<Transition, DomainError> {
        Ok(match self.fetch_by_id(id).await? {
            Some(cat) => Transition::Rejected(cat),
            None => Transition::NotFound,
        })
    }
}

#[async_trait]
impl CatRepository for PgCatRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<Cat>, DomainError> {
        self.fetch_by_id(id).await
    }

    async fn exists_by_name(&self, name: &str) -> Result<bool, DomainError> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM cats WHERE LOWER(name) = LOWER($1))")
            .bind(name)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| database_error("checking cat name", e))
    }

    async fn list(
        &self,
        filter: &CatFilter,
        ordering: CatOrdering,
        limit: u32,
        offset: u64,
    ) -> Result<(u64, Vec<Cat>), DomainError> {
        let mut count_query = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM cats");
        push_filter(&mut count_query, filter);
        let count: i64 = count_query
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| database_error("counting cats", e))?;

        let mut select = QueryBuilder::<Postgres>::new("SELECT ");
        select.push(CAT_COLUMNS).push(" FROM cats");
        push_filter(&mut select, filter);
        push_ordering(&mut select, ordering);
        select
            .push(" LIMIT ")
            .push_bind(i64::from(limit))
            .push(" OFFSET ")
            .push_bind(i64::try_from(offset).unwrap_or(i64::MAX));

        let rows: Vec<CatRow> = select
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| database_error("listing cats", e))?;

        Ok((to_count(count), rows.into_iter().map(Cat::from).collect()))
    }

    async fn create(&self, cat: &NewCat) -> Result<Cat, DomainError> {
        info!("Creating cat: {}", cat.name);

        let row: CatRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO cats (name, breed, age, color, weight, is_neutered, description)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            CAT_COLUMNS
        ))
        .bind(&cat.name)
        .bind(&cat.breed)
        .bind(cat.age)
        .bind(&cat.color)
        .bind(cat.weight)
        .bind(cat.is_neutered)
        .bind(&cat.description)
        .fetch_one(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            let unique = e
                .as_database_error()
                .is_some_and(|db| db.is_unique_violation());
            if unique {
                DomainError::duplicate_name(&cat.name)
            } else {
                database_error("creating cat", e)
            }
        })?;

        info!("Cat created successfully: {}", row.id);
        Ok(row.into())
    }

    async fn adopt(
        &self,
        id: i32,
        owner_name: &str,
        adoption_date: NaiveDate,
    ) -> Result<Transition, DomainError> {
        // The availability guard lives in the UPDATE so concurrent adoptions
        // of one cat serialise on the row and only one of them matches.
        let row: Option<CatRow> = sqlx::query_as(&format!(
            r#"
            UPDATE cats
            SET owner_name = $2, adoption_date = $3
            WHERE id = $1 AND {}
            RETURNING {}
            "#,
            IS_AVAILABLE, CAT_COLUMNS
        ))
        .bind(id)
        .bind(owner_name)
        .bind(adoption_date)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| database_error("adopting cat", e))?;

        match row {
            Some(row) => Ok(Transition::Applied(row.into())),
            None => self.rejected_or_missing(id).await,
        }
    }

    async fn return_to_shelter(&self, id: i32) -> Result<Transition, DomainError> {
        let row: Option<CatRow> = sqlx::query_as(&format!(
            r#"
            UPDATE cats
            SET owner_name = NULL, adoption_date = NULL
            WHERE id = $1 AND {}
            RETURNING {}
            "#,
            IS_ADOPTED, CAT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| database_error("returning cat to shelter", e))?;

        match row {
            Some(row) => Ok(Transition::Applied(row.into())),
            None => self.rejected_or_missing(id).await,
        }
    }

    async fn statistics(&self, today: NaiveDate) -> Result<StatisticsSnapshot, DomainError> {
        let row: StatisticsRow = sqlx::query_as(&format!(
            r#"
            SELECT
                COUNT(*) AS total_cats,
                COUNT(*) FILTER (WHERE {}) AS adopted_cats,
                COUNT(*) FILTER (WHERE is_neutered) AS neutered_cats,
                AVG(age)::FLOAT8 AS average_age,
                MIN(age) AS youngest_age,
                MAX(age) AS oldest_age,
                COUNT(DISTINCT NULLIF(TRIM(breed), '')) AS breeds_count,
                COUNT(*) FILTER (WHERE adoption_date BETWEEN $1 AND $2) AS recent_adoptions
            FROM cats
            "#,
            IS_ADOPTED
        ))
        .bind(recent_window_start(today))
        .bind(today)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| database_error("aggregating cat statistics", e))?;

        Ok(row.into())
    }

    async fn breed_statistics(&self) -> Result<Vec<BreedSnapshot>, DomainError> {
        let rows: Vec<BreedRow> = sqlx::query_as(&format!(
            r#"
            SELECT
                TRIM(breed) AS breed,
                COUNT(*) AS count,
                COUNT(*) FILTER (WHERE {}) AS adopted_count,
                AVG(age)::FLOAT8 AS average_age,
                AVG(weight)::FLOAT8 AS average_weight
            FROM cats
            WHERE NULLIF(TRIM(breed), '') IS NOT NULL
            GROUP BY TRIM(breed)
            ORDER BY count DESC, breed ASC
            "#,
            IS_ADOPTED
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| database_error("aggregating breed statistics", e))?;

        Ok(rows.into_iter().map(BreedSnapshot::from).collect())
    }

    async fn ping(&self) -> Result<(), DomainError> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| ())
            .map_err(|e| database_error("pinging database", e))
    }
}

fn database_error(action: &str, e: sqlx::Error) -> DomainError {
    error!("Database error {}: {}", action, e);
    DomainError::DatabaseError(e.to_string())
}

fn to_count(value: i64) -> u64 {
    u64::try_from(value).unwrap_or_default()
}

/// `ILIKE` pattern matching `term` anywhere, with wildcards in `term` escaped.
fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &CatFilter) {
    builder.push(" WHERE TRUE");

    if let Some(search) = &filter.search {
        let pattern = contains_pattern(search);
        builder
            .push(" AND (name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR breed ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR description ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
    match filter.status {
        Some(AdoptionStatus::Adopted) => {
            builder.push(" AND ").push(IS_ADOPTED);
        }
        Some(AdoptionStatus::Available) => {
            builder.push(" AND ").push(IS_AVAILABLE);
        }
        None => {}
    }
    if let Some(name) = &filter.name {
        builder.push(" AND name ILIKE ").push_bind(contains_pattern(name));
    }
    if let Some(breed) = &filter.breed {
        builder.push(" AND breed ILIKE ").push_bind(contains_pattern(breed));
    }
    if let Some(color) = &filter.color {
        builder.push(" AND color ILIKE ").push_bind(contains_pattern(color));
    }
    if let Some(neutered) = filter.neutered {
        builder.push(" AND is_neutered = ").push_bind(neutered);
    }
    if let Some(min_age) = filter.min_age {
        builder.push(" AND age >= ").push_bind(min_age);
    }
    if let Some(max_age) = filter.max_age {
        builder.push(" AND age <= ").push_bind(max_age);
    }
}

fn push_ordering(builder: &mut QueryBuilder<'_, Postgres>, ordering: CatOrdering) {
    builder
        .push(" ORDER BY ")
        .push(ordering.field.as_str())
        .push(if ordering.descending { " DESC" } else { " ASC" })
        .push(" NULLS LAST");
    if ordering.field != OrderField::Id {
        builder.push(", id ASC");
    }
}

// Internal row types for SQLx mapping
#[derive(Debug, FromRow)]
struct CatRow {
    pub id: i32,
    pub name: String,
    pub breed: Option<String>,
    pub age: Option<i32>,
    pub color: Option<String>,
    pub weight: Option<Decimal>,
    pub is_neutered: bool,
    pub owner_name: Option<String>,
    pub adoption_date: Option<NaiveDate>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<CatRow> for Cat {
    fn from(row: CatRow) -> Self {
        // Legacy rows may hold '' instead of NULL
        Cat {
            id: row.id,
            name: row.name,
            breed: non_blank(row.breed),
            age: row.age,
            color: non_blank(row.color),
            weight: row.weight,
            is_neutered: row.is_neutered,
            owner_name: non_blank(row.owner_name),
            adoption_date: row.adoption_date,
            description: non_blank(row.description),
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct StatisticsRow {
    pub total_cats: i64,
    pub adopted_cats: i64,
    pub neutered_cats: i64,
    pub average_age: Option<f64>,
    pub youngest_age: Option<i32>,
    pub oldest_age: Option<i32>,
    pub breeds_count: i64,
    pub recent_adoptions: i64,
}

impl From<StatisticsRow> for StatisticsSnapshot {
    fn from(row: StatisticsRow) -> Self {
        StatisticsSnapshot {
            total_cats: to_count(row.total_cats),
            adopted_cats: to_count(row.adopted_cats),
            neutered_cats: to_count(row.neutered_cats),
            average_age: row.average_age,
            youngest_age: row.youngest_age,
            oldest_age: row.oldest_age,
            breeds_count: to_count(row.breeds_count),
            recent_adoptions: to_count(row.recent_adoptions),
        }
    }
}

#[derive(Debug, FromRow)]
struct BreedRow {
    pub breed: String,
    pub count: i64,
    pub adopted_count: i64,
    pub average_age: Option<f64>,
    pub average_weight: Option<f64>,
}

impl From<BreedRow> for BreedSnapshot {
    fn from(row: BreedRow) -> Self {
        BreedSnapshot {
            breed: row.breed,
            count: to_count(row.count),
            adopted_count: to_count(row.adopted_count),
            average_age: row.average_age,
            average_weight: row.average_weight,
        }
    }
}
