//! Application builder.
//!
//! Assembles every named route, the health check, Swagger UI and the
//! append-slash fallback into one Axum router.

use crate::api_doc::ApiDoc;
use crate::error::ApiError;
use crate::handlers;
use crate::routes::{self, ROUTES};
use crate::state::AppState;
use axum::{
    http::{header, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Create the main application router
pub fn router(state: AppState) -> Router {
    let app = ROUTES.iter().fold(Router::new(), |app, route| {
        app.route(route.pattern, handlers::method_router(route.name))
    });

    app.route(routes::HEALTH, get(handlers::health_handler))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .fallback(fallback_handler)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Unmatched requests
///
/// A GET or HEAD for a path missing only its trailing slash is permanently
/// redirected to the slash-terminated path, query string included. Anything
/// else is a JSON 404.
async fn fallback_handler(method: Method, uri: Uri) -> Response {
    let path = uri.path();

    if (method == Method::GET || method == Method::HEAD) && !path.ends_with('/') {
        let with_slash = format!("{}/", path);
        if routes::resolve(&with_slash).is_some() {
            let target = match uri.query() {
                Some(query) => format!("{}?{}", with_slash, query),
                None => with_slash,
            };
            tracing::debug!("Redirecting {} to {}", path, target);
            return (StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, target)]).into_response();
        }
    }

    tracing::debug!("No route for {} {}", method, path);
    ApiError::NotFound(format!("No route matches path '{}'", path)).into_response()
}
