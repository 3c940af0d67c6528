use crate::error::HealthResponse;
use crate::routes;
use crate::state::AppState;
use axum::{extract::State, Json};

/// GET /health handler - Health check endpoint
///
/// Reports the number of products currently in the catalog.
#[utoipa::path(
    get,
    path = routes::HEALTH,
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let products = state.store.health_check();
    tracing::debug!("Health check passed with {} products", products);

    Json(HealthResponse {
        status: "healthy".to_string(),
        products,
    })
}
