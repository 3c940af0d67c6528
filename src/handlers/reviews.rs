use crate::auth::CurrentUser;
use crate::error::{ApiError, ErrorResponse};
use crate::extract::ValidatedJson;
use crate::handlers::see_other;
use crate::models::{ProductReviewPage, ReviewForm, ReviewableLine};
use crate::routes::{self, RouteName};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::Redirect,
    Json,
};

/// GET /product-review-view/{order_id}/ handler - Products of an order, marked
/// with whether the customer has reviewed them
#[utoipa::path(
    get,
    path = routes::PRODUCT_REVIEW_VIEW,
    params(
        ("order_id" = String, Path, description = "Order id")
    ),
    responses(
        (status = 200, description = "Reviewable products", body = ProductReviewPage),
        (status = 401, description = "Not signed in", body = ErrorResponse),
        (status = 404, description = "Order not found", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "reviews"
)]
pub async fn product_review_view(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(order_id): Path<String>,
) -> Result<Json<ProductReviewPage>, ApiError> {
    let order = state.store.order(&current.user.id, &order_id)?;
    let reviewed = state.store.reviewed_products(&current.user.id);

    let lines = order
        .lines
        .into_iter()
        .map(|line| ReviewableLine {
            reviewed: reviewed.contains(&line.product_id),
            line,
        })
        .collect();

    Ok(Json(ProductReviewPage {
        order_id: order.id,
        lines,
    }))
}

/// POST /add-review/{product_id}/ handler
///
/// Only customers with an order containing the product may review it. A
/// second submission replaces the first.
#[utoipa::path(
    post,
    path = routes::ADD_REVIEW,
    params(
        ("product_id" = String, Path, description = "Product id")
    ),
    request_body = ReviewForm,
    responses(
        (status = 303, description = "Saved; redirects to the product page"),
        (status = 400, description = "Rating out of range", body = ErrorResponse),
        (status = 401, description = "Not signed in", body = ErrorResponse),
        (status = 403, description = "Product was never ordered", body = ErrorResponse),
        (status = 404, description = "Product not found", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "reviews"
)]
pub async fn add_review(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(product_id): Path<String>,
    ValidatedJson(form): ValidatedJson<ReviewForm>,
) -> Result<Redirect, ApiError> {
    let review = state.store.upsert_review(
        &current.user,
        &product_id,
        form.rating,
        form.comment.trim().to_string(),
    )?;

    tracing::info!(
        "Saved {}-star review {} of {} by {}",
        review.rating,
        review.id,
        product_id,
        current.user.username
    );
    see_other(RouteName::ProductDetails, &[("product_id", &product_id)])
}
