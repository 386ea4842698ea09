pub mod cats;
pub mod health;
pub mod root;

use crate::error::ApiError;

/// Fallback for unknown routes.
pub async fn not_found() -> ApiError {
    ApiError::NotFound("No such endpoint".to_string())
}
