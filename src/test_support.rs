//! Helpers shared by handler tests: a seeded app, request builders and a
//! signed-in customer.

use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use serde_json::Value as JsonValue;
use tower::ServiceExt;

use crate::app;
use crate::config::Config;
use crate::state::AppState;

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: JsonValue,
}

impl TestResponse {
    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok())
    }

    pub fn error(&self) -> &str {
        self.body["error"].as_str().unwrap_or_default()
    }
}

pub fn setup_test_app() -> (Router, AppState) {
    let state = AppState::new(Config::default());
    (app::router(state.clone()), state)
}

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<JsonValue>,
) -> TestResponse {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_string(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        JsonValue::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(JsonValue::Null)
    };

    TestResponse {
        status,
        headers,
        body,
    }
}

pub async fn get(app: &Router, uri: &str, token: Option<&str>) -> TestResponse {
    send(app, Method::GET, uri, token, None).await
}

pub async fn post(
    app: &Router,
    uri: &str,
    token: Option<&str>,
    body: Option<JsonValue>,
) -> TestResponse {
    send(app, Method::POST, uri, token, body).await
}

/// Register a customer and return their session token.
pub async fn register(app: &Router, username: &str) -> String {
    let response = post(
        app,
        "/register/",
        None,
        Some(serde_json::json!({
            "username": username,
            "email": format!("{}@example.com", username),
            "password": "password123",
            "confirm_password": "password123",
        })),
    )
    .await;
    assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
    response.body["token"].as_str().unwrap().to_string()
}

/// Register a customer and complete one order for `product_id`.
pub async fn customer_with_order(
    app: &Router,
    username: &str,
    product_id: &str,
) -> (String, String) {
    let token = register(app, username).await;
    let added = post(app, &format!("/add-to-cart/{}/", product_id), Some(&token), None).await;
    assert_eq!(added.status, StatusCode::SEE_OTHER);
    let placed = post(
        app,
        "/checkout-view/",
        Some(&token),
        Some(serde_json::json!({ "shipping_address": "1 Main St" })),
    )
    .await;
    assert_eq!(placed.status, StatusCode::SEE_OTHER, "{}", placed.body);

    let success = get(app, "/order-success-page/", Some(&token)).await;
    let order_id = success.body["id"].as_str().unwrap().to_string();
    (token, order_id)
}
