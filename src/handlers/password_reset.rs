use crate::auth;
use crate::error::{ApiError, ErrorResponse};
use crate::extract::ValidatedJson;
use crate::handlers::see_other;
use crate::models::{
    ForgotPasswordForm, ResetCodeForm, ResetPasswordForm, ResetSentPage, ResetStatusPage,
};
use crate::routes::{self, RouteName};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::Redirect,
    Json,
};
use chrono::{Duration, Utc};

/// `jane@example.com` -> `j***@example.com`
fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => {
            let first: String = local.chars().take(1).collect();
            format!("{}***@{}", first, domain)
        }
        None => "***".to_string(),
    }
}

/// POST /forgot-password/ handler - Start a reset and mail the code
#[utoipa::path(
    post,
    path = routes::FORGOT_PASSWORD,
    request_body = ForgotPasswordForm,
    responses(
        (status = 303, description = "Code sent; redirects to the confirmation page"),
        (status = 400, description = "Invalid email", body = ErrorResponse),
        (status = 404, description = "No account with that email", body = ErrorResponse)
    ),
    tag = "password-reset"
)]
pub async fn forgot_password(
    State(state): State<AppState>,
    ValidatedJson(form): ValidatedJson<ForgotPasswordForm>,
) -> Result<Redirect, ApiError> {
    let email = form.email.trim();
    let user = state
        .store
        .user_by_email(email)
        .ok_or_else(|| ApiError::NotFound(format!("No account found for {}", email)))?;

    let ttl = Duration::minutes(state.config.password_reset_ttl_minutes);
    let reset = state
        .store
        .create_password_reset(&user.id, auth::new_reset_code(), ttl);

    let reset_link = routes::reverse(RouteName::ResetPassword, &[("reset_id", &reset.id)])?;
    let sent = state.mailer.send(
        &user.email,
        &format!("{} password reset", state.config.store_name),
        format!(
            "Your reset code is {}. Enter it at {} or visit {} before {}.",
            reset.code,
            routes::ENTER_RESET_CODE,
            reset_link,
            reset.expires_at.to_rfc3339()
        ),
    );

    tracing::info!(
        "Started password reset {} for {} (message {})",
        reset.id,
        user.username,
        sent.message_id
    );
    see_other(RouteName::PasswordResetSent, &[("reset_id", &reset.id)])
}

/// GET /password-reset-sent/{reset_id}/ handler
#[utoipa::path(
    get,
    path = routes::PASSWORD_RESET_SENT,
    params(
        ("reset_id" = String, Path, description = "Password reset request id")
    ),
    responses(
        (status = 200, description = "Where the code was sent", body = ResetSentPage),
        (status = 404, description = "Unknown reset request", body = ErrorResponse)
    ),
    tag = "password-reset"
)]
pub async fn password_reset_sent(
    State(state): State<AppState>,
    Path(reset_id): Path<String>,
) -> Result<Json<ResetSentPage>, ApiError> {
    let reset = state.store.password_reset(&reset_id)?;
    let user = state.store.user(&reset.user_id)?;

    Ok(Json(ResetSentPage {
        reset_id: reset.id,
        email: mask_email(&user.email),
        expires_at: reset.expires_at.to_rfc3339(),
    }))
}

/// POST /enter-reset-code/ handler - Verify the mailed code
#[utoipa::path(
    post,
    path = routes::ENTER_RESET_CODE,
    request_body = ResetCodeForm,
    responses(
        (status = 303, description = "Code accepted; redirects to the reset page"),
        (status = 400, description = "Wrong, used or expired code", body = ErrorResponse),
        (status = 404, description = "Unknown reset request", body = ErrorResponse)
    ),
    tag = "password-reset"
)]
pub async fn enter_reset_code(
    State(state): State<AppState>,
    ValidatedJson(form): ValidatedJson<ResetCodeForm>,
) -> Result<Redirect, ApiError> {
    let reset = state
        .store
        .verify_reset_code(&form.reset_id, &form.code, Utc::now())
        .inspect_err(|err| tracing::warn!("Reset code rejected for {}: {}", form.reset_id, err))?;

    tracing::info!("Verified password reset {}", reset.id);
    see_other(RouteName::ResetPassword, &[("reset_id", &reset.id)])
}

/// GET /reset-password/{reset_id}/ handler - Status of a reset request
#[utoipa::path(
    get,
    path = routes::RESET_PASSWORD,
    params(
        ("reset_id" = String, Path, description = "Password reset request id")
    ),
    responses(
        (status = 200, description = "Reset request status", body = ResetStatusPage),
        (status = 404, description = "Unknown reset request", body = ErrorResponse)
    ),
    tag = "password-reset"
)]
pub async fn reset_password_page(
    State(state): State<AppState>,
    Path(reset_id): Path<String>,
) -> Result<Json<ResetStatusPage>, ApiError> {
    let reset = state.store.password_reset(&reset_id)?;

    Ok(Json(ResetStatusPage {
        expired: reset.is_expired(Utc::now()),
        reset_id: reset.id,
        verified: reset.verified,
        used: reset.used,
    }))
}

/// POST /reset-password/{reset_id}/ handler - Set the new password
///
/// Signs the user out everywhere.
#[utoipa::path(
    post,
    path = routes::RESET_PASSWORD,
    params(
        ("reset_id" = String, Path, description = "Password reset request id")
    ),
    request_body = ResetPasswordForm,
    responses(
        (status = 303, description = "Password set; redirects to the login page"),
        (status = 400, description = "Request not verified, used or expired, or password rejected", body = ErrorResponse),
        (status = 404, description = "Unknown reset request", body = ErrorResponse)
    ),
    tag = "password-reset"
)]
pub async fn reset_password_submit(
    State(state): State<AppState>,
    Path(reset_id): Path<String>,
    ValidatedJson(form): ValidatedJson<ResetPasswordForm>,
) -> Result<Redirect, ApiError> {
    auth::check_new_password(&form.new_password, &form.confirm_password)?;

    let password_hash = auth::hash_password(&form.new_password)?;
    let user_id = state
        .store
        .complete_password_reset(&reset_id, password_hash, Utc::now())?;

    tracing::info!("Completed password reset {} for user id {}", reset_id, user_id);
    see_other(RouteName::LoginPage, &[])
}
