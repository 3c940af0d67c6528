//! Password hashing, session tokens and the request extractors that turn a
//! bearer token into a signed-in user.

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use rand_core::{OsRng, RngCore};

use crate::error::ApiError;
use crate::state::AppState;
use crate::store::User;

pub const MIN_PASSWORD_LEN: usize = 8;

#[cfg(not(test))]
fn hasher() -> Argon2<'static> {
    Argon2::default()
}

// Minimum cost parameters keep the test suite fast; hashes still verify with
// whatever parameters are embedded in the PHC string.
#[cfg(test)]
fn hasher() -> Argon2<'static> {
    let params = argon2::Params::new(8, 1, 1, None).expect("valid argon2 test params");
    Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params)
}

/// Hash a plain-text password with Argon2 and a random salt.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
    if password.is_empty() {
        return Err(ApiError::BadRequest("Password cannot be empty".to_string()));
    }

    let salt = SaltString::generate(&mut OsRng);
    hasher()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| ApiError::Internal(anyhow::anyhow!("password hashing failed: {}", err)))
}

/// Check a plain-text password against a stored PHC hash string.
pub fn verify_password(stored_hash: &str, password: &str) -> Result<bool, ApiError> {
    let parsed = PasswordHash::new(stored_hash).map_err(|err| {
        ApiError::Internal(anyhow::anyhow!("invalid stored password hash: {}", err))
    })?;

    match hasher().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(err) => Err(ApiError::Internal(anyhow::anyhow!(
            "password verification failed: {}",
            err
        ))),
    }
}

pub fn new_session_token() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Six decimal digits drawn from the OS RNG.
pub fn new_reset_code() -> String {
    format!("{:06}", OsRng.next_u32() % 1_000_000)
}

/// Shared rule for new passwords: minimum length and matching confirmation.
pub fn check_new_password(password: &str, confirmation: &str) -> Result<(), ApiError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ApiError::BadRequest(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    if password != confirmation {
        return Err(ApiError::BadRequest("Passwords do not match".to_string()));
    }
    Ok(())
}

pub fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// The signed-in user behind the request's bearer token.
///
/// Rejects with 401 when the header is missing or the session is unknown.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: User,
    pub token: String,
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)
            .ok_or_else(|| ApiError::Unauthorized("Authentication required".to_string()))?;

        match state.store.session_user(token) {
            Some(user) => Ok(CurrentUser {
                user,
                token: token.to_string(),
            }),
            None => {
                tracing::warn!("Rejected request with unknown session token");
                Err(ApiError::Unauthorized("Session expired or invalid".to_string()))
            }
        }
    }
}

/// Like [`CurrentUser`], but anonymous requests pass through as `None`.
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<CurrentUser>);

impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(MaybeUser(
            CurrentUser::from_request_parts(parts, state).await.ok(),
        ))
    }
}
