use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::routes::RouteError;
use crate::store::StoreError;

/// Error response type
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Response type for health check endpoint
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub products: usize,
}

/// Custom error type for API endpoints
///
/// This error type provides consistent error handling across all endpoints,
/// mapping each failure to an HTTP status code and a JSON body of the form
/// `{"error": "..."}`.
#[derive(Debug)]
pub enum ApiError {
    /// No route, or no record behind an opaque path parameter
    NotFound(String),
    /// Malformed or semantically invalid request
    BadRequest(String),
    /// Form payload failed field validation
    Validation(validator::ValidationErrors),
    /// Invalid query parameter
    InvalidQueryParam(String),
    /// Missing, unknown or rejected credentials
    Unauthorized(String),
    /// Authenticated but not allowed
    Forbidden(String),
    /// Request collides with existing state (duplicate account, stock)
    Conflict(String),
    /// Unexpected failure
    Internal(anyhow::Error),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_)
            | ApiError::Validation(_)
            | ApiError::InvalidQueryParam(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_message = match self {
            ApiError::NotFound(msg) => msg,
            ApiError::BadRequest(msg) => msg,
            ApiError::Validation(errors) => format!("Validation failed: {}", errors),
            ApiError::InvalidQueryParam(msg) => format!("Invalid query parameter: {}", msg),
            ApiError::Unauthorized(msg) => msg,
            ApiError::Forbidden(msg) => msg,
            ApiError::Conflict(msg) => msg,
            ApiError::Internal(err) => {
                tracing::error!("Internal error: {:#}", err);
                "Internal server error".to_string()
            }
        };

        let body = Json(ErrorResponse {
            error: error_message,
        });

        (status, body).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        let message = err.to_string();
        match err {
            StoreError::NotFound { .. } => ApiError::NotFound(message),
            StoreError::Conflict(_) | StoreError::OutOfStock { .. } => ApiError::Conflict(message),
            StoreError::Forbidden(_) => ApiError::Forbidden(message),
            StoreError::Invalid(_) => ApiError::BadRequest(message),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ApiError::Validation(errors)
    }
}

impl From<RouteError> for ApiError {
    fn from(err: RouteError) -> Self {
        ApiError::Internal(err.into())
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Internal(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_of(err: ApiError) -> (StatusCode, ErrorResponse) {
        let response = err.into_response();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_store_errors_map_to_statuses() {
        let (status, body) = body_of(
            StoreError::NotFound {
                entity: "Product",
                id: "42".to_string(),
            }
            .into(),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.error, "Product not found: 42");

        let (status, _) = body_of(
            StoreError::OutOfStock {
                product_id: "1".to_string(),
                available: 0,
            }
            .into(),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, _) = body_of(StoreError::Forbidden("no".to_string()).into()).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = body_of(StoreError::Invalid("bad".to_string()).into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_internal_error_hides_details() {
        let (status, body) = body_of(anyhow::anyhow!("lock poisoned at 0xdead").into()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error, "Internal server error");
    }

    #[tokio::test]
    async fn test_invalid_query_param_message() {
        let (status, body) = body_of(ApiError::InvalidQueryParam("sort".to_string())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.error.starts_with("Invalid query parameter"));
    }
}
