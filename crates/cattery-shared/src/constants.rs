//! Application-wide constants

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Adoptions on or after `today - RECENT_ADOPTION_WINDOW_DAYS` count as recent.
pub const RECENT_ADOPTION_WINDOW_DAYS: i64 = 30;

pub const MAX_NAME_LENGTH: u64 = 100;
pub const MIN_TEXT_LENGTH: u64 = 2;
pub const MAX_CAT_WEIGHT_KG: i64 = 20;

/// Scale of the `weight` column.
pub const MAX_WEIGHT_DECIMAL_PLACES: u32 = 2;
