//! API root document

use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /api/
pub async fn api_root(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "message": "Welcome to the Cats API!",
        "name": state.config.app.name,
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "cats": "/api/cats/",
            "cats_available": "/api/cats/available/",
            "cats_adopted": "/api/cats/adopted/",
            "cats_statistics": "/api/cats/statistics/",
            "cats_breeds": "/api/cats/breeds/",
            "cats_search": "/api/cats/search/",
            "health": "/health",
            "ready": "/health/ready",
        },
        "documentation": {
            "endpoints_help": {
                "GET /api/cats/": "List all cats with pagination and filtering",
                "GET /api/cats/{id}/": "Get details of a specific cat",
                "POST /api/cats/": "Create a new cat record",
                "POST /api/cats/{id}/adopt/": "Adopt a cat",
                "POST /api/cats/{id}/return_to_shelter/": "Return cat to shelter",
                "GET /api/cats/available/": "List available cats for adoption",
                "GET /api/cats/adopted/": "List adopted cats",
                "GET /api/cats/statistics/": "Get comprehensive statistics",
                "GET /api/cats/breeds/": "Get breed statistics",
                "GET /api/cats/search/": "Advanced search with multiple criteria",
            },
            "query_parameters": {
                "search": "Search in name, breed and description",
                "status": "Filter by adoption status (available/adopted)",
                "name": "Filter by name (partial match)",
                "breed": "Filter by breed name (partial match)",
                "color": "Filter by color (partial match)",
                "available": "Filter by availability (true/false)",
                "neutered": "Filter by neutered status (true/false)",
                "min_age": "Filter by minimum age",
                "max_age": "Filter by maximum age",
                "ordering": "Order by id, name, age, weight or created_at; prefix with - for descending",
                "page": "Page number, starting at 1",
                "page_size": "Results per page",
            },
        },
    }))
}
