use crate::auth::CurrentUser;
use crate::error::{ApiError, ErrorResponse};
use crate::extract::ValidatedJson;
use crate::handlers::see_other;
use crate::models::{CheckoutForm, CheckoutPage, OrderListResponse};
use crate::routes::{self, RouteName};
use crate::state::AppState;
use crate::store::Order;
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
    Json,
};

/// GET /checkout-view/ handler - Order summary before placing it
///
/// An empty cart sends the customer back to the cart page.
#[utoipa::path(
    get,
    path = routes::CHECKOUT_VIEW,
    responses(
        (status = 200, description = "Checkout summary", body = CheckoutPage),
        (status = 303, description = "Cart is empty; redirects to the cart"),
        (status = 401, description = "Not signed in", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "orders"
)]
pub async fn checkout_view(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Response, ApiError> {
    let cart = state.store.cart_summary(&current.user.id);
    if cart.lines.is_empty() {
        return Ok(see_other(RouteName::CartView, &[])?.into_response());
    }

    Ok(Json(CheckoutPage {
        cart,
        shipping_address: current.user.address,
    })
    .into_response())
}

/// POST /checkout-view/ handler - Place the order
///
/// Without a `shipping_address` in the body the profile address is used.
#[utoipa::path(
    post,
    path = routes::CHECKOUT_VIEW,
    request_body = CheckoutForm,
    responses(
        (status = 303, description = "Order placed; redirects to the success page"),
        (status = 400, description = "Empty cart or missing shipping address", body = ErrorResponse),
        (status = 401, description = "Not signed in", body = ErrorResponse),
        (status = 409, description = "Not enough stock", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "orders"
)]
pub async fn place_order(
    State(state): State<AppState>,
    current: CurrentUser,
    ValidatedJson(form): ValidatedJson<CheckoutForm>,
) -> Result<Redirect, ApiError> {
    let shipping_address = form
        .shipping_address
        .map(|address| address.trim().to_string())
        .filter(|address| !address.is_empty())
        .unwrap_or_else(|| current.user.address.trim().to_string());
    if shipping_address.is_empty() {
        return Err(ApiError::BadRequest("A shipping address is required".to_string()));
    }

    let order = state.store.place_order(&current.user.id, &shipping_address)?;

    tracing::info!(
        "Placed order {} for {} ({} cents)",
        order.id,
        current.user.username,
        order.total_cents
    );
    see_other(RouteName::OrderSuccessPage, &[])
}

/// GET /order-success-page/ handler - The customer's most recent order
#[utoipa::path(
    get,
    path = routes::ORDER_SUCCESS_PAGE,
    responses(
        (status = 200, description = "Most recent order", body = Order),
        (status = 401, description = "Not signed in", body = ErrorResponse),
        (status = 404, description = "No orders yet", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "orders"
)]
pub async fn order_success_page(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<Order>, ApiError> {
    state
        .store
        .latest_order(&current.user.id)
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("No orders yet".to_string()))
}

/// GET /orders-page/ handler
#[utoipa::path(
    get,
    path = routes::ORDERS_PAGE,
    responses(
        (status = 200, description = "Orders, newest first", body = OrderListResponse),
        (status = 401, description = "Not signed in", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "orders"
)]
pub async fn orders_page(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Json<OrderListResponse> {
    let orders = state.store.orders_for(&current.user.id);
    Json(OrderListResponse {
        total_count: orders.len(),
        orders,
    })
}

/// GET /order-details-view/{order_id}/ handler
#[utoipa::path(
    get,
    path = routes::ORDER_DETAILS_VIEW,
    params(
        ("order_id" = String, Path, description = "Order id")
    ),
    responses(
        (status = 200, description = "Order", body = Order),
        (status = 401, description = "Not signed in", body = ErrorResponse),
        (status = 404, description = "Order not found", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "orders"
)]
pub async fn order_details_view(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(order_id): Path<String>,
) -> Result<Json<Order>, ApiError> {
    let order = state.store.order(&current.user.id, &order_id)?;
    tracing::debug!("Retrieved order with id: {}", order_id);
    Ok(Json(order))
}

#[cfg(test)]
mod tests {
    use crate::test_support::{customer_with_order, get, post, register, setup_test_app};
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_checkout_view_with_empty_cart_redirects() {
        let (app, _) = setup_test_app();
        let token = register(&app, "buyer").await;

        let response = get(&app, "/checkout-view/", Some(&token)).await;

        assert_eq!(response.status, StatusCode::SEE_OTHER);
        assert_eq!(response.location(), Some("/cart-view/"));
    }

    #[tokio::test]
    async fn test_checkout_view_summarizes_cart() {
        let (app, _) = setup_test_app();
        let token = register(&app, "buyer").await;
        post(&app, "/add-to-cart/1006/?quantity=2", Some(&token), None).await;

        let response = get(&app, "/checkout-view/", Some(&token)).await;

        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body["cart"]["total_cents"], 5000);
        assert_eq!(response.body["shipping_address"], "");
    }

    #[tokio::test]
    async fn test_place_order_requires_address() {
        let (app, _) = setup_test_app();
        let token = register(&app, "buyer").await;
        post(&app, "/add-to-cart/1006/", Some(&token), None).await;

        let response = post(&app, "/checkout-view/", Some(&token), Some(json!({}))).await;

        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.error(), "A shipping address is required");
    }

    #[tokio::test]
    async fn test_place_order_uses_profile_address() {
        let (app, state) = setup_test_app();
        let token = register(&app, "buyer").await;
        post(
            &app,
            "/edit-profile-page/",
            Some(&token),
            Some(json!({ "address": "4 Oak Ave" })),
        )
        .await;
        post(&app, "/add-to-cart/1006/?quantity=3", Some(&token), None).await;

        let response = post(&app, "/checkout-view/", Some(&token), Some(json!({}))).await;
        assert_eq!(response.status, StatusCode::SEE_OTHER);
        assert_eq!(response.location(), Some("/order-success-page/"));

        let success = get(&app, "/order-success-page/", Some(&token)).await;
        assert_eq!(success.status, StatusCode::OK);
        assert_eq!(success.body["shipping_address"], "4 Oak Ave");
        assert_eq!(success.body["status"], "placed");
        assert_eq!(state.store.product("1006").unwrap().stock, 97);
    }

    #[tokio::test]
    async fn test_place_order_with_empty_cart() {
        let (app, _) = setup_test_app();
        let token = register(&app, "buyer").await;

        let response = post(
            &app,
            "/checkout-view/",
            Some(&token),
            Some(json!({ "shipping_address": "1 Main St" })),
        )
        .await;

        assert_eq!(response.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_order_success_without_orders() {
        let (app, _) = setup_test_app();
        let token = register(&app, "buyer").await;

        let response = get(&app, "/order-success-page/", Some(&token)).await;

        assert_eq!(response.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_orders_page_and_details() {
        let (app, _) = setup_test_app();
        let (token, order_id) = customer_with_order(&app, "buyer", "1007").await;

        let orders = get(&app, "/orders-page/", Some(&token)).await;
        assert_eq!(orders.status, StatusCode::OK);
        assert_eq!(orders.body["total_count"], 1);
        assert_eq!(orders.body["orders"][0]["id"], order_id.as_str());

        let details = get(&app, &format!("/order-details-view/{}/", order_id), Some(&token)).await;
        assert_eq!(details.status, StatusCode::OK);
        assert_eq!(details.body["lines"][0]["product_id"], "1007");
        assert!(details.body.get("user_id").is_none());
    }

    #[tokio::test]
    async fn test_order_details_of_someone_else() {
        let (app, _) = setup_test_app();
        let (_, order_id) = customer_with_order(&app, "buyer", "1007").await;
        let other = register(&app, "snoop").await;

        let response = get(&app, &format!("/order-details-view/{}/", order_id), Some(&other)).await;

        assert_eq!(response.status, StatusCode::NOT_FOUND);
    }
}
