use crate::auth::CurrentUser;
use crate::error::{ApiError, ErrorResponse};
use crate::extract::{ApiQuery, ValidatedJson};
use crate::handlers::see_other;
use crate::models::{AddToCartQuery, PromoForm, UpdateCartForm};
use crate::routes::{self, RouteName};
use crate::state::AppState;
use crate::store::CartSummary;
use axum::{
    extract::{Path, State},
    response::Redirect,
    Json,
};

/// GET /cart-view/ handler
#[utoipa::path(
    get,
    path = routes::CART_VIEW,
    responses(
        (status = 200, description = "Cart with totals", body = CartSummary),
        (status = 401, description = "Not signed in", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "cart"
)]
pub async fn cart_view(State(state): State<AppState>, current: CurrentUser) -> Json<CartSummary> {
    Json(state.store.cart_summary(&current.user.id))
}

/// POST /add-to-cart/{product_id}/ handler
#[utoipa::path(
    post,
    path = routes::ADD_TO_CART,
    params(
        ("product_id" = String, Path, description = "Product id"),
        ("quantity" = Option<u32>, Query, description = "Units to add (default 1)")
    ),
    responses(
        (status = 303, description = "Added; redirects to the cart"),
        (status = 400, description = "Quantity is zero", body = ErrorResponse),
        (status = 401, description = "Not signed in", body = ErrorResponse),
        (status = 404, description = "Product not found", body = ErrorResponse),
        (status = 409, description = "Not enough stock", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "cart"
)]
pub async fn add_to_cart(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(product_id): Path<String>,
    ApiQuery(query): ApiQuery<AddToCartQuery>,
) -> Result<Redirect, ApiError> {
    let quantity = query.quantity.unwrap_or(1);
    let summary = state
        .store
        .add_to_cart(&current.user.id, &product_id, quantity)?;

    tracing::info!(
        "Added {} x {} to cart of {} ({} items)",
        quantity,
        product_id,
        current.user.username,
        summary.item_count
    );
    see_other(RouteName::CartView, &[])
}

/// POST /update-cart/{product_id}/ handler - Set a line's quantity; 0 removes it
#[utoipa::path(
    post,
    path = routes::UPDATE_CART,
    params(
        ("product_id" = String, Path, description = "Product id")
    ),
    request_body = UpdateCartForm,
    responses(
        (status = 303, description = "Updated; redirects to the cart"),
        (status = 401, description = "Not signed in", body = ErrorResponse),
        (status = 404, description = "Product not in cart", body = ErrorResponse),
        (status = 409, description = "Not enough stock", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "cart"
)]
pub async fn update_cart(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(product_id): Path<String>,
    ValidatedJson(form): ValidatedJson<UpdateCartForm>,
) -> Result<Redirect, ApiError> {
    state
        .store
        .set_cart_quantity(&current.user.id, &product_id, form.quantity)?;

    tracing::info!(
        "Set {} to quantity {} in cart of {}",
        product_id,
        form.quantity,
        current.user.username
    );
    see_other(RouteName::CartView, &[])
}

/// POST /remove-from-cart/{product_id}/ handler
#[utoipa::path(
    post,
    path = routes::REMOVE_FROM_CART,
    params(
        ("product_id" = String, Path, description = "Product id")
    ),
    responses(
        (status = 303, description = "Removed; redirects to the cart"),
        (status = 401, description = "Not signed in", body = ErrorResponse),
        (status = 404, description = "Product not in cart", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "cart"
)]
pub async fn remove_from_cart(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(product_id): Path<String>,
) -> Result<Redirect, ApiError> {
    state.store.remove_from_cart(&current.user.id, &product_id)?;

    tracing::info!("Removed {} from cart of {}", product_id, current.user.username);
    see_other(RouteName::CartView, &[])
}

/// POST /apply-promo/ handler
#[utoipa::path(
    post,
    path = routes::APPLY_PROMO,
    request_body = PromoForm,
    responses(
        (status = 303, description = "Applied; redirects to the cart"),
        (status = 400, description = "Unknown code or empty cart", body = ErrorResponse),
        (status = 401, description = "Not signed in", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "cart"
)]
pub async fn apply_promo(
    State(state): State<AppState>,
    current: CurrentUser,
    ValidatedJson(form): ValidatedJson<PromoForm>,
) -> Result<Redirect, ApiError> {
    let Some(promo) = state.config.promo_code(&form.code) else {
        tracing::warn!("Unknown promo code submitted: {}", form.code);
        return Err(ApiError::BadRequest(format!(
            "Unknown promo code: {}",
            form.code.trim()
        )));
    };

    let summary = state.store.apply_promo(&current.user.id, promo.clone())?;

    tracing::info!(
        "Applied promo {} for {} (discount {} cents)",
        promo.code,
        current.user.username,
        summary.discount_cents
    );
    see_other(RouteName::CartView, &[])
}

#[cfg(test)]
mod tests {
    use crate::test_support::{get, post, register, setup_test_app};
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_cart_requires_session() {
        let (app, _) = setup_test_app();

        assert_eq!(get(&app, "/cart-view/", None).await.status, StatusCode::UNAUTHORIZED);
        assert_eq!(
            post(&app, "/add-to-cart/1001/", None, None).await.status,
            StatusCode::UNAUTHORIZED
        );
    }

    #[tokio::test]
    async fn test_add_to_cart_with_non_numeric_quantity() {
        let (app, _) = setup_test_app();
        let token = register(&app, "shopper").await;

        let response = post(&app, "/add-to-cart/1001/?quantity=abc", Some(&token), None).await;

        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert!(response.error().starts_with("Invalid query parameter:"));
    }

    #[tokio::test]
    async fn test_update_cart_without_quantity() {
        let (app, _) = setup_test_app();
        let token = register(&app, "shopper").await;
        post(&app, "/add-to-cart/1001/", Some(&token), None).await;

        let response = post(&app, "/update-cart/1001/", Some(&token), Some(json!({}))).await;

        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert!(response.error().contains("quantity"));
    }

    #[tokio::test]
    async fn test_add_to_cart_redirects_to_cart_view() {
        let (app, _) = setup_test_app();
        let token = register(&app, "shopper").await;

        let response = post(&app, "/add-to-cart/1001/?quantity=2", Some(&token), None).await;
        assert_eq!(response.status, StatusCode::SEE_OTHER);
        assert_eq!(response.location(), Some("/cart-view/"));

        post(&app, "/add-to-cart/1001/", Some(&token), None).await;

        let cart = get(&app, "/cart-view/", Some(&token)).await;
        assert_eq!(cart.status, StatusCode::OK);
        assert_eq!(cart.body["lines"][0]["product_id"], "1001");
        assert_eq!(cart.body["lines"][0]["quantity"], 3);
        assert_eq!(cart.body["subtotal_cents"], 3 * 8999);
        assert_eq!(cart.body["total_cents"], 3 * 8999);
    }

    #[tokio::test]
    async fn test_add_to_cart_errors() {
        let (app, _) = setup_test_app();
        let token = register(&app, "shopper").await;

        let missing = post(&app, "/add-to-cart/9999/", Some(&token), None).await;
        assert_eq!(missing.status, StatusCode::NOT_FOUND);

        let sold_out = post(&app, "/add-to-cart/1008/", Some(&token), None).await;
        assert_eq!(sold_out.status, StatusCode::CONFLICT);

        let zero = post(&app, "/add-to-cart/1001/?quantity=0", Some(&token), None).await;
        assert_eq!(zero.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_update_and_remove() {
        let (app, _) = setup_test_app();
        let token = register(&app, "shopper").await;
        post(&app, "/add-to-cart/1002/", Some(&token), None).await;
        post(&app, "/add-to-cart/1004/", Some(&token), None).await;

        let updated = post(
            &app,
            "/update-cart/1002/",
            Some(&token),
            Some(json!({ "quantity": 5 })),
        )
        .await;
        assert_eq!(updated.status, StatusCode::SEE_OTHER);

        let too_many = post(
            &app,
            "/update-cart/1002/",
            Some(&token),
            Some(json!({ "quantity": 500 })),
        )
        .await;
        assert_eq!(too_many.status, StatusCode::CONFLICT);

        let removed = post(&app, "/remove-from-cart/1004/", Some(&token), None).await;
        assert_eq!(removed.status, StatusCode::SEE_OTHER);

        let again = post(&app, "/remove-from-cart/1004/", Some(&token), None).await;
        assert_eq!(again.status, StatusCode::NOT_FOUND);

        let cart = get(&app, "/cart-view/", Some(&token)).await;
        assert_eq!(cart.body["item_count"], 5);
        assert_eq!(cart.body["lines"].as_array().unwrap().len(), 1);

        let zeroed = post(
            &app,
            "/update-cart/1002/",
            Some(&token),
            Some(json!({ "quantity": 0 })),
        )
        .await;
        assert_eq!(zeroed.status, StatusCode::SEE_OTHER);
        let cart = get(&app, "/cart-view/", Some(&token)).await;
        assert_eq!(cart.body["item_count"], 0);
    }

    #[tokio::test]
    async fn test_apply_promo() {
        let (app, _) = setup_test_app();
        let token = register(&app, "shopper").await;

        let empty = post(
            &app,
            "/apply-promo/",
            Some(&token),
            Some(json!({ "code": "WELCOME10" })),
        )
        .await;
        assert_eq!(empty.status, StatusCode::BAD_REQUEST);

        post(&app, "/add-to-cart/1003/", Some(&token), None).await;

        let unknown = post(
            &app,
            "/apply-promo/",
            Some(&token),
            Some(json!({ "code": "FREESTUFF" })),
        )
        .await;
        assert_eq!(unknown.status, StatusCode::BAD_REQUEST);
        assert_eq!(unknown.error(), "Unknown promo code: FREESTUFF");

        let applied = post(
            &app,
            "/apply-promo/",
            Some(&token),
            Some(json!({ "code": " welcome10 " })),
        )
        .await;
        assert_eq!(applied.status, StatusCode::SEE_OTHER);

        let cart = get(&app, "/cart-view/", Some(&token)).await;
        assert_eq!(cart.body["promo_code"], "WELCOME10");
        assert_eq!(cart.body["discount_cents"], 1290);
        assert_eq!(cart.body["total_cents"], 11610);
    }
}
