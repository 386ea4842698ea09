// ============================================================================
// Cattery API - DTOs
// File: crates/cattery-api/src/dto.rs
// ============================================================================
//! Query strings in, cat views out.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use cattery_core::domain::{AdoptionStatus, Cat, CatFilter, CatOrdering, CatQuery};
use cattery_core::{DomainError, FieldErrors};
use cattery_shared::utils::non_blank;

/// Raw listing parameters. Everything arrives as text so a bad value becomes
/// a field error instead of an opaque extractor rejection.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub page: Option<String>,
    pub page_size: Option<String>,
    pub search: Option<String>,
    pub status: Option<String>,
    pub name: Option<String>,
    pub breed: Option<String>,
    pub color: Option<String>,
    /// `true|1|yes` for available cats, anything else for adopted ones.
    /// Takes precedence over `status`.
    pub available: Option<String>,
    pub neutered: Option<String>,
    pub min_age: Option<String>,
    pub max_age: Option<String>,
    pub ordering: Option<String>,
}

impl ListParams {
    /// Parse into a listing query. Blank parameters count as absent.
    pub fn into_query(self) -> Result<CatQuery, DomainError> {
        let mut errors = FieldErrors::new();
        let mut query = CatQuery::default();

        if let Some(page) = parse_number::<i64>(&mut errors, "page", self.page) {
            // pages before the first one are out of range, not malformed
            query.page = u32::try_from(page.max(0)).unwrap_or(u32::MAX);
        }
        query.page_size = parse_number(&mut errors, "page_size", self.page_size);

        let requested_status = match non_blank(self.status) {
            None => None,
            Some(raw) => match AdoptionStatus::from_str(&raw) {
                Some(status) => Some(status),
                None => {
                    errors.add(
                        "status",
                        format!("Select a valid choice. {} is not one of the available choices.", raw),
                    );
                    None
                }
            },
        };

        if let Some(raw) = non_blank(self.ordering) {
            match CatOrdering::parse(&raw) {
                Some(ordering) => query.ordering = ordering,
                None => errors.add("ordering", format!("Unknown ordering field: {}", raw)),
            }
        }

        let status = match non_blank(self.available) {
            Some(raw) if parse_flag(&raw) => Some(AdoptionStatus::Available),
            Some(_) => Some(AdoptionStatus::Adopted),
            None => requested_status,
        };

        query.filter = CatFilter {
            search: non_blank(self.search),
            status,
            name: non_blank(self.name),
            breed: non_blank(self.breed),
            color: non_blank(self.color),
            neutered: non_blank(self.neutered).map(|raw| parse_flag(&raw)),
            min_age: parse_number(&mut errors, "min_age", self.min_age),
            max_age: parse_number(&mut errors, "max_age", self.max_age),
        };

        errors.into_result()?;
        Ok(query)
    }

    /// Parse with the status pinned, ignoring `status` and `available`.
    pub fn into_query_with_status(mut self, status: AdoptionStatus) -> Result<CatQuery, DomainError> {
        self.status = None;
        self.available = None;
        let mut query = self.into_query()?;
        query.filter.status = Some(status);
        Ok(query)
    }
}

fn parse_number<T: FromStr>(errors: &mut FieldErrors, field: &str, raw: Option<String>) -> Option<T> {
    let raw = non_blank(raw)?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            errors.add(field, "A valid integer is required.");
            None
        }
    }
}

/// `true`, `1` and `yes`, in any case. Anything else reads as false.
fn parse_flag(raw: &str) -> bool {
    matches!(raw.to_lowercase().as_str(), "true" | "1" | "yes")
}

/// A cat as rendered to clients: every stored field plus display helpers.
#[derive(Debug, Clone, Serialize)]
pub struct CatView {
    #[serde(flatten)]
    pub cat: Cat,
    pub is_adopted: bool,
    pub age_display: String,
    pub weight_display: String,
    pub status_display: &'static str,
}

impl From<Cat> for CatView {
    fn from(cat: Cat) -> Self {
        Self {
            is_adopted: cat.is_adopted(),
            age_display: cat.age_display(),
            weight_display: cat.weight_display(),
            status_display: cat.status_display(),
            cat,
        }
    }
}
