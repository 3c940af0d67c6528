use crate::auth::{self, CurrentUser};
use crate::error::{ApiError, ErrorResponse};
use crate::extract::ValidatedJson;
use crate::handlers::see_other;
use crate::models::{ChangePasswordForm, EditProfileForm, ProfileResponse};
use crate::routes::{self, RouteName};
use crate::state::AppState;
use crate::store::ProfileUpdate;
use axum::{extract::State, response::Redirect, Json};

/// GET /profile-page/ handler
#[utoipa::path(
    get,
    path = routes::PROFILE_PAGE,
    responses(
        (status = 200, description = "Signed-in user's profile", body = ProfileResponse),
        (status = 401, description = "Not signed in", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "account"
)]
pub async fn profile_page(current: CurrentUser) -> Json<ProfileResponse> {
    Json(current.user.into())
}

/// GET /edit-profile-page/ handler - Current values for the edit form
#[utoipa::path(
    get,
    path = routes::EDIT_PROFILE_PAGE,
    responses(
        (status = 200, description = "Editable profile fields", body = ProfileResponse),
        (status = 401, description = "Not signed in", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "account"
)]
pub async fn edit_profile_page(current: CurrentUser) -> Json<ProfileResponse> {
    Json(current.user.into())
}

/// POST /edit-profile-page/ handler - Save profile changes
#[utoipa::path(
    post,
    path = routes::EDIT_PROFILE_PAGE,
    request_body = EditProfileForm,
    responses(
        (status = 303, description = "Saved; redirects to the profile page"),
        (status = 400, description = "Invalid form", body = ErrorResponse),
        (status = 401, description = "Not signed in", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "account"
)]
pub async fn edit_profile_submit(
    State(state): State<AppState>,
    current: CurrentUser,
    ValidatedJson(form): ValidatedJson<EditProfileForm>,
) -> Result<Redirect, ApiError> {
    let update = ProfileUpdate {
        email: form.email.map(|email| email.trim().to_string()),
        first_name: form.first_name,
        last_name: form.last_name,
        phone: form.phone,
        address: form.address,
    };
    state.store.update_profile(&current.user.id, update)?;

    tracing::info!("Updated profile for user: {}", current.user.username);
    see_other(RouteName::ProfilePage, &[])
}

/// POST /change-password/ handler
#[utoipa::path(
    post,
    path = routes::CHANGE_PASSWORD,
    request_body = ChangePasswordForm,
    responses(
        (status = 303, description = "Password changed; redirects to the profile page"),
        (status = 400, description = "New password rejected", body = ErrorResponse),
        (status = 401, description = "Not signed in or wrong current password", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "account"
)]
pub async fn change_password(
    State(state): State<AppState>,
    current: CurrentUser,
    ValidatedJson(form): ValidatedJson<ChangePasswordForm>,
) -> Result<Redirect, ApiError> {
    if !auth::verify_password(&current.user.password_hash, &form.current_password)? {
        tracing::warn!("Wrong current password for user: {}", current.user.username);
        return Err(ApiError::Unauthorized("Current password is incorrect".to_string()));
    }
    auth::check_new_password(&form.new_password, &form.confirm_password)?;

    let password_hash = auth::hash_password(&form.new_password)?;
    state.store.set_password_hash(&current.user.id, password_hash)?;

    tracing::info!("Changed password for user: {}", current.user.username);
    see_other(RouteName::ProfilePage, &[])
}
