use crate::auth::CurrentUser;
use crate::error::{ApiError, ErrorResponse};
use crate::extract::ValidatedJson;
use crate::handlers::see_other;
use crate::models::{ToggleWishlistForm, ToggleWishlistResponse, WishlistResponse};
use crate::routes::{self, RouteName};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::Redirect,
    Json,
};

/// POST /add-to-wishlist/{product_id}/ handler
#[utoipa::path(
    post,
    path = routes::ADD_TO_WISHLIST,
    params(
        ("product_id" = String, Path, description = "Product id")
    ),
    responses(
        (status = 303, description = "Added (or already present); redirects to the wishlist"),
        (status = 401, description = "Not signed in", body = ErrorResponse),
        (status = 404, description = "Product not found", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "wishlist"
)]
pub async fn add_to_wishlist(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(product_id): Path<String>,
) -> Result<Redirect, ApiError> {
    if state.store.add_to_wishlist(&current.user.id, &product_id)? {
        tracing::info!("Added {} to wishlist of {}", product_id, current.user.username);
    }
    see_other(RouteName::WishlistPage, &[])
}

/// POST /remove-from-wishlist/{product_id}/ handler
#[utoipa::path(
    post,
    path = routes::REMOVE_FROM_WISHLIST,
    params(
        ("product_id" = String, Path, description = "Product id")
    ),
    responses(
        (status = 303, description = "Removed (or absent); redirects to the wishlist"),
        (status = 401, description = "Not signed in", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "wishlist"
)]
pub async fn remove_from_wishlist(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(product_id): Path<String>,
) -> Result<Redirect, ApiError> {
    if state.store.remove_from_wishlist(&current.user.id, &product_id) {
        tracing::info!("Removed {} from wishlist of {}", product_id, current.user.username);
    }
    see_other(RouteName::WishlistPage, &[])
}

/// GET /wishlist-page/ handler
#[utoipa::path(
    get,
    path = routes::WISHLIST_PAGE,
    responses(
        (status = 200, description = "Wishlist products in the order they were added", body = WishlistResponse),
        (status = 401, description = "Not signed in", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "wishlist"
)]
pub async fn wishlist_page(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Json<WishlistResponse> {
    let products = state.store.wishlist(&current.user.id);
    Json(WishlistResponse {
        total_count: products.len(),
        products,
    })
}

/// POST /wishlist-toggle/ handler - Flip membership and report the result
#[utoipa::path(
    post,
    path = routes::TOGGLE_WISHLIST,
    request_body = ToggleWishlistForm,
    responses(
        (status = 200, description = "New membership", body = ToggleWishlistResponse),
        (status = 401, description = "Not signed in", body = ErrorResponse),
        (status = 404, description = "Product not found", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "wishlist"
)]
pub async fn toggle_wishlist(
    State(state): State<AppState>,
    current: CurrentUser,
    ValidatedJson(form): ValidatedJson<ToggleWishlistForm>,
) -> Result<Json<ToggleWishlistResponse>, ApiError> {
    let in_wishlist = state
        .store
        .toggle_wishlist(&current.user.id, &form.product_id)?;

    tracing::info!(
        "Toggled {} for {}: in wishlist = {}",
        form.product_id,
        current.user.username,
        in_wishlist
    );
    Ok(Json(ToggleWishlistResponse {
        product_id: form.product_id,
        in_wishlist,
    }))
}
