use crate::auth::{self, MaybeUser};
use crate::error::{ApiError, ErrorResponse};
use crate::extract::ValidatedJson;
use crate::handlers::see_other;
use crate::models::{LoginForm, RegisterForm, SessionResponse};
use crate::routes::{self, RouteName};
use crate::state::AppState;
use crate::store::NewUser;
use axum::{extract::State, http::StatusCode, response::Redirect, Json};

fn start_session(state: &AppState, user_id: &str, username: String) -> SessionResponse {
    let token = auth::new_session_token();
    state.store.create_session(user_id, token.clone());
    SessionResponse { token, username }
}

/// POST /login/ handler
#[utoipa::path(
    post,
    path = routes::LOGIN_PAGE,
    request_body = LoginForm,
    responses(
        (status = 200, description = "Signed in", body = SessionResponse),
        (status = 401, description = "Invalid username or password", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(form): ValidatedJson<LoginForm>,
) -> Result<Json<SessionResponse>, ApiError> {
    let invalid = || ApiError::Unauthorized("Invalid username or password".to_string());

    let user = state
        .store
        .user_by_username(form.username.trim())
        .ok_or_else(invalid)?;
    if !auth::verify_password(&user.password_hash, &form.password)? {
        tracing::warn!("Failed login for user: {}", user.username);
        return Err(invalid());
    }

    tracing::info!("User signed in: {}", user.username);
    Ok(Json(start_session(&state, &user.id, user.username)))
}

/// POST /register/ handler - Create an account and sign it in
#[utoipa::path(
    post,
    path = routes::REGISTER_PAGE,
    request_body = RegisterForm,
    responses(
        (status = 201, description = "Account created", body = SessionResponse),
        (status = 400, description = "Invalid form", body = ErrorResponse),
        (status = 409, description = "Username or email already taken", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(form): ValidatedJson<RegisterForm>,
) -> Result<(StatusCode, Json<SessionResponse>), ApiError> {
    auth::check_new_password(&form.password, &form.confirm_password)?;

    let user = state.store.create_user(NewUser {
        username: form.username.trim().to_string(),
        email: form.email.trim().to_string(),
        password_hash: auth::hash_password(&form.password)?,
    })?;

    tracing::info!("Registered user: {}", user.username);
    Ok((
        StatusCode::CREATED,
        Json(start_session(&state, &user.id, user.username)),
    ))
}

/// GET|POST /logout/ handler - End the current session, if any
#[utoipa::path(
    post,
    path = routes::LOGOUT,
    responses(
        (status = 303, description = "Signed out; redirects to the home page")
    ),
    tag = "auth"
)]
pub async fn logout(
    State(state): State<AppState>,
    MaybeUser(current): MaybeUser,
) -> Result<Redirect, ApiError> {
    if let Some(current) = current {
        state.store.end_session(&current.token);
        tracing::info!("User signed out: {}", current.user.username);
    }
    see_other(RouteName::StoreHome, &[])
}

#[cfg(test)]
mod tests {
    use crate::test_support::{get, post, register, setup_test_app};
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_register_then_login() {
        let (app, _) = setup_test_app();
        register(&app, "jordan").await;

        let response = post(
            &app,
            "/login/",
            None,
            Some(json!({ "username": "Jordan", "password": "password123" })),
        )
        .await;

        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body["username"], "jordan");
        let token = response.body["token"].as_str().unwrap();
        assert_eq!(get(&app, "/profile-page/", Some(token)).await.status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_login_failures_look_alike() {
        let (app, _) = setup_test_app();
        register(&app, "jordan").await;

        let wrong_password = post(
            &app,
            "/login/",
            None,
            Some(json!({ "username": "jordan", "password": "nope" })),
        )
        .await;
        let unknown_user = post(
            &app,
            "/login/",
            None,
            Some(json!({ "username": "ghost", "password": "nope" })),
        )
        .await;

        assert_eq!(wrong_password.status, StatusCode::UNAUTHORIZED);
        assert_eq!(unknown_user.status, StatusCode::UNAUTHORIZED);
        assert_eq!(wrong_password.error(), unknown_user.error());
    }

    #[tokio::test]
    async fn test_login_with_missing_field() {
        let (app, _) = setup_test_app();

        let response = post(&app, "/login/", None, Some(json!({}))).await;

        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert!(response.error().starts_with("Invalid request body:"));
        assert!(response.error().contains("username"));
    }

    #[tokio::test]
    async fn test_login_without_body() {
        let (app, _) = setup_test_app();

        let response = post(&app, "/login/", None, None).await;

        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert!(response.body["error"].is_string());
    }

    #[tokio::test]
    async fn test_register_validation() {
        let (app, _) = setup_test_app();

        let bad_email = post(
            &app,
            "/register/",
            None,
            Some(json!({
                "username": "jordan",
                "email": "jordan",
                "password": "password123",
                "confirm_password": "password123"
            })),
        )
        .await;
        assert_eq!(bad_email.status, StatusCode::BAD_REQUEST);

        let mismatch = post(
            &app,
            "/register/",
            None,
            Some(json!({
                "username": "jordan",
                "email": "jordan@example.com",
                "password": "password123",
                "confirm_password": "password321"
            })),
        )
        .await;
        assert_eq!(mismatch.status, StatusCode::BAD_REQUEST);
        assert_eq!(mismatch.error(), "Passwords do not match");
    }

    #[tokio::test]
    async fn test_register_duplicate() {
        let (app, _) = setup_test_app();
        register(&app, "jordan").await;

        let response = post(
            &app,
            "/register/",
            None,
            Some(json!({
                "username": "JORDAN",
                "email": "new@example.com",
                "password": "password123",
                "confirm_password": "password123"
            })),
        )
        .await;

        assert_eq!(response.status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_logout_ends_session() {
        let (app, _) = setup_test_app();
        let token = register(&app, "jordan").await;

        let response = post(&app, "/logout/", Some(&token), None).await;
        assert_eq!(response.status, StatusCode::SEE_OTHER);
        assert_eq!(response.location(), Some("/"));

        let profile = get(&app, "/profile-page/", Some(&token)).await;
        assert_eq!(profile.status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_anonymous_logout_via_get() {
        let (app, _) = setup_test_app();

        let response = get(&app, "/logout/", None).await;

        assert_eq!(response.status, StatusCode::SEE_OTHER);
        assert_eq!(response.location(), Some("/"));
    }
}
