// ============================================================================
// Cattery API - Cat Handlers
// File: crates/cattery-api/src/handlers/cats.rs
// ============================================================================
//! Listing, retrieval, registration and adoption endpoints

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use chrono::{NaiveDate, Utc};

use cattery_core::domain::{Adoption, AdoptionStatus, BreedStatistics, CatStatistics, NewCat};
use cattery_shared::Page;

use crate::dto::{CatView, ListParams};
use crate::error::ApiResult;
use crate::response::ApiResponse;
use crate::state::AppState;

/// Date of the request in UTC. Adoption defaults and the recent-adoption
/// window are both relative to it.
fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// GET /api/cats/
pub async fn list_cats(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> ApiResult<Json<Page<CatView>>> {
    let Query(params) = params?;
    let page = state.cats.list(params.into_query()?).await?;
    Ok(Json(page.map(CatView::from)))
}

/// GET /api/cats/search/
///
/// The listing filters plus `name`, `color` and `available`.
pub async fn search_cats(
    state: State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> ApiResult<Json<Page<CatView>>> {
    list_cats(state, params).await
}

/// GET /api/cats/available/
pub async fn available_cats(
    state: State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> ApiResult<Json<Page<CatView>>> {
    list_with_status(state, params, AdoptionStatus::Available).await
}

/// GET /api/cats/adopted/
pub async fn adopted_cats(
    state: State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> ApiResult<Json<Page<CatView>>> {
    list_with_status(state, params, AdoptionStatus::Adopted).await
}

async fn list_with_status(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
    status: AdoptionStatus,
) -> ApiResult<Json<Page<CatView>>> {
    let Query(params) = params?;
    let query = params.into_query_with_status(status)?;
    let page = state.cats.list(query).await?;
    Ok(Json(page.map(CatView::from)))
}

/// GET /api/cats/{id}/
pub async fn get_cat(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> ApiResult<Json<CatView>> {
    let Path(id) = id?;
    let cat = state.cats.get(id).await?;
    Ok(Json(cat.into()))
}

/// POST /api/cats/
pub async fn create_cat(
    State(state): State<AppState>,
    payload: Result<Json<NewCat>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<ApiResponse>)> {
    let Json(new_cat) = payload?;
    let cat = state.cats.create(new_cat).await?;
    let message = format!("Cat \"{}\" has been successfully added to the database", cat.name);
    Ok((StatusCode::CREATED, Json(ApiResponse::new(message, cat.into()))))
}

/// POST /api/cats/{id}/adopt/
pub async fn adopt_cat(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<Adoption>, JsonRejection>,
) -> ApiResult<Json<ApiResponse>> {
    let Path(id) = id?;
    let Json(adoption) = payload?;
    let cat = state.cats.adopt(id, adoption, today()).await?;
    let message = format!(
        "{} has been successfully adopted by {}!",
        cat.name,
        cat.owner_name.as_deref().unwrap_or_default()
    );
    Ok(Json(ApiResponse::new(message, cat.into())))
}

/// POST /api/cats/{id}/return_to_shelter/
pub async fn return_to_shelter(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> ApiResult<Json<ApiResponse>> {
    let Path(id) = id?;
    let (cat, former_owner) = state.cats.return_to_shelter(id).await?;
    let message = format!("{} has been returned to the shelter", cat.name);
    Ok(Json(ApiResponse::new(message, cat.into()).with_former_owner(former_owner)))
}

/// GET /api/cats/statistics/
pub async fn statistics(State(state): State<AppState>) -> ApiResult<Json<CatStatistics>> {
    Ok(Json(state.cats.statistics(today()).await?))
}

/// GET /api/cats/breeds/
pub async fn breeds(State(state): State<AppState>) -> ApiResult<Json<Vec<BreedStatistics>>> {
    Ok(Json(state.cats.breed_statistics().await?))
}
