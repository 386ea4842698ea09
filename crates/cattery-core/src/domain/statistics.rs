// ============================================================================
// Cattery Core - Statistics
// File: crates/cattery-core/src/domain/statistics.rs
// Description: Whole-table adoption statistics and per-breed breakdowns
// ============================================================================

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Duration, NaiveDate};
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use cattery_shared::constants::RECENT_ADOPTION_WINDOW_DAYS;
use cattery_shared::utils::{percentage, round_to};

use crate::domain::cat::Cat;

/// First day that still counts as a recent adoption when queried on `today`.
pub fn recent_window_start(today: NaiveDate) -> NaiveDate {
    today - Duration::days(RECENT_ADOPTION_WINDOW_DAYS)
}

/// Raw aggregates as a store computes them, before rounding.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatisticsSnapshot {
    pub total_cats: u64,
    pub adopted_cats: u64,
    pub neutered_cats: u64,
    pub average_age: Option<f64>,
    pub youngest_age: Option<i32>,
    pub oldest_age: Option<i32>,
    pub breeds_count: u64,
    pub recent_adoptions: u64,
}

impl StatisticsSnapshot {
    /// Aggregate in process. Stores without SQL aggregates use this, and it is
    /// the reference the SQL aggregation has to agree with.
    pub fn from_cats<'a, I>(cats: I, today: NaiveDate) -> Self
    where
        I: IntoIterator<Item = &'a Cat>,
    {
        let since = recent_window_start(today);
        let mut snapshot = Self::default();
        let mut age_sum: i64 = 0;
        let mut age_count: u64 = 0;
        let mut breeds = BTreeSet::new();

        for cat in cats {
            snapshot.total_cats += 1;
            if cat.is_adopted() {
                snapshot.adopted_cats += 1;
            }
            if cat.is_neutered {
                snapshot.neutered_cats += 1;
            }
            if let Some(age) = cat.age {
                age_sum += i64::from(age);
                age_count += 1;
                snapshot.youngest_age = Some(snapshot.youngest_age.map_or(age, |y| y.min(age)));
                snapshot.oldest_age = Some(snapshot.oldest_age.map_or(age, |o| o.max(age)));
            }
            if let Some(breed) = cat.breed.as_deref().map(str::trim).filter(|b| !b.is_empty()) {
                breeds.insert(breed);
            }
            if cat.adoption_date.is_some_and(|d| d >= since && d <= today) {
                snapshot.recent_adoptions += 1;
            }
        }

        snapshot.average_age = (age_count > 0).then(|| age_sum as f64 / age_count as f64);
        snapshot.breeds_count = breeds.len() as u64;
        snapshot
    }
}

/// Summary metrics over every cat in the shelter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatStatistics {
    pub total_cats: u64,
    pub adopted_cats: u64,
    pub available_cats: u64,
    /// Percent, one decimal place. `0.0` for an empty shelter.
    pub adoption_rate: f64,
    pub average_age: Option<f64>,
    pub youngest_age: Option<i32>,
    pub oldest_age: Option<i32>,
    pub neutered_cats: u64,
    pub breeds_count: u64,
    pub recent_adoptions: u64,
}

impl From<StatisticsSnapshot> for CatStatistics {
    fn from(s: StatisticsSnapshot) -> Self {
        // available is derived so the partition always sums to the total
        let adopted_cats = s.adopted_cats.min(s.total_cats);
        Self {
            total_cats: s.total_cats,
            adopted_cats,
            available_cats: s.total_cats - adopted_cats,
            adoption_rate: round_to(percentage(adopted_cats, s.total_cats), 1),
            average_age: s.average_age.map(|a| round_to(a, 1)),
            youngest_age: s.youngest_age,
            oldest_age: s.oldest_age,
            neutered_cats: s.neutered_cats,
            breeds_count: s.breeds_count,
            recent_adoptions: s.recent_adoptions,
        }
    }
}

/// Raw per-breed aggregates.
#[derive(Debug, Clone, PartialEq)]
pub struct BreedSnapshot {
    pub breed: String,
    pub count: u64,
    pub adopted_count: u64,
    pub average_age: Option<f64>,
    pub average_weight: Option<f64>,
}

impl BreedSnapshot {
    /// Group by trimmed breed, skipping cats without one. Ordered by count
    /// descending, then breed name.
    pub fn from_cats<'a, I>(cats: I) -> Vec<Self>
    where
        I: IntoIterator<Item = &'a Cat>,
    {
        #[derive(Default)]
        struct Acc {
            count: u64,
            adopted: u64,
            age_sum: f64,
            age_count: u64,
            weight_sum: f64,
            weight_count: u64,
        }

        let mut groups: BTreeMap<&str, Acc> = BTreeMap::new();
        for cat in cats {
            let Some(breed) = cat.breed.as_deref().map(str::trim).filter(|b| !b.is_empty()) else {
                continue;
            };
            let acc = groups.entry(breed).or_default();
            acc.count += 1;
            if cat.is_adopted() {
                acc.adopted += 1;
            }
            if let Some(age) = cat.age {
                acc.age_sum += f64::from(age);
                acc.age_count += 1;
            }
            if let Some(weight) = cat.weight.and_then(|w| w.to_f64()) {
                acc.weight_sum += weight;
                acc.weight_count += 1;
            }
        }

        let mut snapshots: Vec<Self> = groups
            .into_iter()
            .map(|(breed, acc)| Self {
                breed: breed.to_string(),
                count: acc.count,
                adopted_count: acc.adopted,
                average_age: (acc.age_count > 0).then(|| acc.age_sum / acc.age_count as f64),
                average_weight: (acc.weight_count > 0)
                    .then(|| acc.weight_sum / acc.weight_count as f64),
            })
            .collect();
        // stable sort keeps the BTreeMap's breed order among equal counts
        snapshots.sort_by(|a, b| b.count.cmp(&a.count));
        snapshots
    }
}

/// Adoption figures for one breed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreedStatistics {
    pub breed: String,
    pub count: u64,
    /// Percent, two decimal places.
    pub adoption_rate: f64,
    pub average_age: Option<f64>,
    pub average_weight: Option<f64>,
}

impl From<BreedSnapshot> for BreedStatistics {
    fn from(s: BreedSnapshot) -> Self {
        Self {
            adoption_rate: round_to(percentage(s.adopted_count, s.count), 2),
            average_age: s.average_age.map(|a| round_to(a, 1)),
            average_weight: s.average_weight.map(|w| round_to(w, 2)),
            breed: s.breed,
            count: s.count,
        }
    }
}
