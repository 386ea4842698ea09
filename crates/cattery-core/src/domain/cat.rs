// ============================================================================
// Cattery Core - Cat Entity
// File: crates/cattery-core/src/domain/cat.rs
// Description: The shelter's only entity and its write-side inputs
// ============================================================================

use std::borrow::Cow;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use cattery_shared::constants::{
    MAX_CAT_WEIGHT_KG, MAX_NAME_LENGTH, MAX_WEIGHT_DECIMAL_PLACES, MIN_TEXT_LENGTH,
};
use cattery_shared::utils::{non_blank, title_case};

/// Adoption status, derived from `owner_name`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdoptionStatus {
    Available,
    Adopted,
}

impl AdoptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdoptionStatus::Available => "available",
            AdoptionStatus::Adopted => "adopted",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "available" => Some(AdoptionStatus::Available),
            "adopted" => Some(AdoptionStatus::Adopted),
            _ => None,
        }
    }
}

/// A cat record as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cat {
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

impl Cat {
    /// A cat is adopted exactly when it has an owner.
    pub fn is_adopted(&self) -> bool {
        self.owner_name.as_deref().is_some_and(|o| !o.trim().is_empty())
    }

    pub fn status(&self) -> AdoptionStatus {
        if self.is_adopted() {
            AdoptionStatus::Adopted
        } else {
            AdoptionStatus::Available
        }
    }

    pub fn age_display(&self) -> String {
        match self.age {
            None => "Unknown".to_string(),
            Some(1) => "1 year".to_string(),
            Some(age) => format!("{} years", age),
        }
    }

    pub fn weight_display(&self) -> String {
        match self.weight {
            None => "Not specified".to_string(),
            Some(weight) => format!("{} kg", weight.normalize()),
        }
    }

    pub fn status_display(&self) -> &'static str {
        match self.status() {
            AdoptionStatus::Adopted => "Adopted",
            AdoptionStatus::Available => "Available",
        }
    }

    pub fn breed_label(&self) -> &str {
        self.breed.as_deref().unwrap_or("Mixed breed")
    }
}

/// Input for registering a cat. Owner and adoption date are not accepted here;
/// adoption goes through [`Adoption`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct NewCat {
    #[validate(custom(function = "validate_name"))]
    #[serde(default)]
    pub name: String,

    #[validate(length(
        min = 2,
        max = 100,
        message = "Breed name must be between 2 and 100 characters long"
    ))]
    #[serde(default)]
    pub breed: Option<String>,

    #[validate(range(min = 0, max = 30, message = "Age must be between 0 and 30 years"))]
    #[serde(default)]
    pub age: Option<i32>,

    #[validate(length(
        min = 2,
        max = 50,
        message = "Color description must be between 2 and 50 characters long"
    ))]
    #[serde(default)]
    pub color: Option<String>,

    #[validate(custom(function = "validate_weight"))]
    #[serde(default)]
    pub weight: Option<Decimal>,

    #[serde(default)]
    pub is_neutered: bool,

    #[validate(length(
        min = 10,
        message = "Description must be at least 10 characters long"
    ))]
    #[serde(default)]
    pub description: Option<String>,
}

impl NewCat {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Trim every text field, drop blank optionals, title-case names.
    pub fn normalized(self) -> Self {
        Self {
            name: title_case(self.name.trim()),
            breed: non_blank(self.breed).map(|b| title_case(&b)),
            color: non_blank(self.color).map(|c| title_case(&c)),
            description: non_blank(self.description),
            ..self
        }
    }
}

/// Input for adopting a cat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Adoption {
    /// A missing key reads as blank so it reports as a field error.
    #[validate(custom(function = "validate_owner_name"))]
    #[serde(default)]
    pub owner_name: String,

    /// Defaults to the day of the request.
    #[serde(default)]
    pub adoption_date: Option<NaiveDate>,
}

impl Adoption {
    pub fn new(owner_name: impl Into<String>) -> Self {
        Self {
            owner_name: owner_name.into(),
            adoption_date: None,
        }
    }

    pub fn normalized(self) -> Self {
        Self {
            owner_name: title_case(self.owner_name.trim()),
            ..self
        }
    }
}

fn field_error(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

fn validate_name(name: &str) -> Result<(), ValidationError> {
    let len = name.trim().chars().count() as u64;
    if len == 0 {
        return Err(field_error("blank", "Cat name cannot be empty"));
    }
    if len < MIN_TEXT_LENGTH {
        return Err(field_error("length", "Cat name must be at least 2 characters long"));
    }
    if len > MAX_NAME_LENGTH {
        return Err(field_error("length", "Cat name must be at most 100 characters long"));
    }
    Ok(())
}

fn validate_owner_name(owner_name: &str) -> Result<(), ValidationError> {
    let len = owner_name.trim().chars().count() as u64;
    if len == 0 {
        return Err(field_error("blank", "Owner name cannot be empty"));
    }
    if len < MIN_TEXT_LENGTH {
        return Err(field_error("length", "Owner name must be at least 2 characters long"));
    }
    if len > MAX_NAME_LENGTH {
        return Err(field_error("length", "Owner name must be at most 100 characters long"));
    }
    Ok(())
}

fn validate_weight(weight: &Decimal) -> Result<(), ValidationError> {
    if *weight <= Decimal::ZERO {
        return Err(field_error("range", "Weight must be positive"));
    }
    if *weight > Decimal::from(MAX_CAT_WEIGHT_KG) {
        return Err(field_error("range", "Weight seems unrealistic for a cat"));
    }
    // the column is NUMERIC(4,2); trailing zeros do not count
    if weight.normalize().scale() > MAX_WEIGHT_DECIMAL_PLACES {
        return Err(field_error(
            "decimal_places",
            "Ensure that there are no more than 2 decimal places.",
        ));
    }
    Ok(())
}
