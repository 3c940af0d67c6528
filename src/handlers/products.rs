use crate::auth::MaybeUser;
use crate::error::{ApiError, ErrorResponse};
use crate::extract::ApiQuery;
use crate::models::{
    ProductDetailsResponse, ProductListQuery, ProductListResponse, SearchQuery, SearchResponse,
};
use crate::routes;
use crate::state::AppState;
use crate::store::ProductSort;
use axum::{extract::Path, extract::State, Json};

fn parse_sort(sort: Option<&str>) -> Result<ProductSort, ApiError> {
    match sort {
        None => Ok(ProductSort::default()),
        Some(raw) => ProductSort::parse(raw).ok_or_else(|| {
            ApiError::InvalidQueryParam(format!(
                "sort must be one of: {}, got '{}'",
                ProductSort::VALUES,
                raw
            ))
        }),
    }
}

fn listing(
    state: &AppState,
    category: Option<String>,
    query: &ProductListQuery,
) -> Result<ProductListResponse, ApiError> {
    let sort = parse_sort(query.sort.as_deref())?;
    let products = state.store.list_products(category.as_deref(), sort);

    tracing::debug!(
        "Listed {} products (category: {:?}, sort: {:?})",
        products.len(),
        category,
        sort
    );

    Ok(ProductListResponse {
        category,
        total_count: products.len(),
        products,
    })
}

/// GET /products/ handler - Full catalog
///
/// Query parameters:
/// - sort: one of newest, price_asc, price_desc, name (optional, default: newest)
#[utoipa::path(
    get,
    path = routes::PRODUCTS,
    params(
        ("sort" = Option<String>, Query, description = "Sort order: newest, price_asc, price_desc, name")
    ),
    responses(
        (status = 200, description = "Product listing", body = ProductListResponse),
        (status = 400, description = "Invalid query parameter", body = ErrorResponse)
    ),
    tag = "products"
)]
pub async fn products(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ProductListQuery>,
) -> Result<Json<ProductListResponse>, ApiError> {
    Ok(Json(listing(&state, None, &query)?))
}

/// GET /products/{category}/ handler - Catalog filtered by category
#[utoipa::path(
    get,
    path = routes::PRODUCTS_BY_CATEGORY,
    params(
        ("category" = String, Path, description = "Category name, matched case-insensitively"),
        ("sort" = Option<String>, Query, description = "Sort order: newest, price_asc, price_desc, name")
    ),
    responses(
        (status = 200, description = "Products in the category", body = ProductListResponse),
        (status = 400, description = "Invalid query parameter", body = ErrorResponse)
    ),
    tag = "products"
)]
pub async fn products_by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
    ApiQuery(query): ApiQuery<ProductListQuery>,
) -> Result<Json<ProductListResponse>, ApiError> {
    Ok(Json(listing(&state, Some(category), &query)?))
}

/// GET /product-details/{product_id}/ handler
#[utoipa::path(
    get,
    path = routes::PRODUCT_DETAILS,
    params(
        ("product_id" = String, Path, description = "Product id")
    ),
    responses(
        (status = 200, description = "Product with reviews", body = ProductDetailsResponse),
        (status = 404, description = "Product not found", body = ErrorResponse)
    ),
    tag = "products"
)]
pub async fn product_details(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
    MaybeUser(viewer): MaybeUser,
) -> Result<Json<ProductDetailsResponse>, ApiError> {
    let product = state.store.product(&product_id)?;
    let reviews = state.store.reviews_for(&product_id);

    let average_rating = if reviews.is_empty() {
        None
    } else {
        let total: u32 = reviews.iter().map(|review| u32::from(review.rating)).sum();
        Some(f64::from(total) / reviews.len() as f64)
    };

    let in_wishlist = viewer
        .map(|current| state.store.in_wishlist(&current.user.id, &product_id))
        .unwrap_or(false);

    tracing::debug!("Retrieved product with id: {}", product_id);
    Ok(Json(ProductDetailsResponse {
        product,
        reviews,
        average_rating,
        in_wishlist,
    }))
}

/// GET /search-product/ handler
///
/// A blank or missing `q` yields an empty result rather than the full catalog.
#[utoipa::path(
    get,
    path = routes::SEARCH_PRODUCT,
    params(
        ("q" = Option<String>, Query, description = "Text matched against name, description and category")
    ),
    responses(
        (status = 200, description = "Matching products", body = SearchResponse)
    ),
    tag = "products"
)]
pub async fn search_product(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<SearchQuery>,
) -> Json<SearchResponse> {
    let query = query.q.unwrap_or_default().trim().to_string();
    let products = state.store.search_products(&query);

    tracing::debug!("Search for {:?} matched {} products", query, products.len());
    Json(SearchResponse {
        query,
        total_count: products.len(),
        products,
    })
}
