//! Listing filters and ordering

use std::cmp::Ordering;

use crate::domain::cat::{AdoptionStatus, Cat};

/// Conjunctive listing predicates. `None` means "do not filter on this".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatFilter {
    /// Case-insensitive substring of name, breed or description.
    pub search: Option<String>,
    pub status: Option<AdoptionStatus>,
    /// Case-insensitive substring of name.
    pub name: Option<String>,
    /// Case-insensitive substring of breed.
    pub breed: Option<String>,
    /// Case-insensitive substring of color.
    pub color: Option<String>,
    pub neutered: Option<bool>,
    pub min_age: Option<i32>,
    pub max_age: Option<i32>,
}

impl CatFilter {
    pub fn with_status(status: AdoptionStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// Whether `cat` satisfies every predicate at once.
    pub fn matches(&self, cat: &Cat) -> bool {
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            let hit = contains_ci(Some(&cat.name), &needle)
                || contains_ci(cat.breed.as_ref(), &needle)
                || contains_ci(cat.description.as_ref(), &needle);
            if !hit {
                return false;
            }
        }
        if let Some(status) = self.status {
            if cat.status() != status {
                return false;
            }
        }
        if let Some(name) = &self.name {
            if !contains_ci(Some(&cat.name), &name.to_lowercase()) {
                return false;
            }
        }
        if let Some(breed) = &self.breed {
            if !contains_ci(cat.breed.as_ref(), &breed.to_lowercase()) {
                return false;
            }
        }
        if let Some(color) = &self.color {
            if !contains_ci(cat.color.as_ref(), &color.to_lowercase()) {
                return false;
            }
        }
        if let Some(neutered) = self.neutered {
            if cat.is_neutered != neutered {
                return false;
            }
        }
        if let Some(min_age) = self.min_age {
            if !cat.age.is_some_and(|age| age >= min_age) {
                return false;
            }
        }
        if let Some(max_age) = self.max_age {
            if !cat.age.is_some_and(|age| age <= max_age) {
                return false;
            }
        }
        true
    }
}

fn contains_ci(haystack: Option<&String>, needle_lower: &str) -> bool {
    haystack.is_some_and(|h| h.to_lowercase().contains(needle_lower))
}

/// Columns a listing may be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderField {
    #[default]
    Id,
    Name,
    Age,
    Weight,
    CreatedAt,
}

impl OrderField {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderField::Id => "id",
            OrderField::Name => "name",
            OrderField::Age => "age",
            OrderField::Weight => "weight",
            OrderField::CreatedAt => "created_at",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "id" => Some(OrderField::Id),
            "name" => Some(OrderField::Name),
            "age" => Some(OrderField::Age),
            "weight" => Some(OrderField::Weight),
            "created_at" => Some(OrderField::CreatedAt),
            _ => None,
        }
    }
}

/// Sort order for listings. Nulls always sort last and ties fall back to
/// ascending `id`, so every ordering is total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CatOrdering {
    pub field: OrderField,
    pub descending: bool,
}

impl CatOrdering {
    /// Parse `name` / `-name` style ordering parameters.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        let (descending, field) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };
        OrderField::from_str(field).map(|field| Self { field, descending })
    }

    pub fn compare(&self, a: &Cat, b: &Cat) -> Ordering {
        let primary = match self.field {
            OrderField::Id => self.directed(a.id.cmp(&b.id)),
            OrderField::Name => self.directed(a.name.cmp(&b.name)),
            OrderField::CreatedAt => self.directed(a.created_at.cmp(&b.created_at)),
            OrderField::Age => self.nulls_last(a.age, b.age),
            OrderField::Weight => self.nulls_last(a.weight, b.weight),
        };
        primary.then_with(|| a.id.cmp(&b.id))
    }

    fn directed(&self, ordering: Ordering) -> Ordering {
        if self.descending {
            ordering.reverse()
        } else {
            ordering
        }
    }

    fn nulls_last<T: Ord>(&self, a: Option<T>, b: Option<T>) -> Ordering {
        match (a, b) {
            (Some(a), Some(b)) => self.directed(a.cmp(&b)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}

/// A validated listing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatQuery {
    pub filter: CatFilter,
    pub ordering: CatOrdering,
    pub page: u32,
    /// Falls back to the configured page size.
    pub page_size: Option<u32>,
}

impl Default for CatQuery {
    fn default() -> Self {
        Self {
            filter: CatFilter::default(),
            ordering: CatOrdering::default(),
            page: 1,
            page_size: None,
        }
    }
}

impl CatQuery {
    pub fn with_filter(filter: CatFilter) -> Self {
        Self {
            filter,
            ..Self::default()
        }
    }
}
