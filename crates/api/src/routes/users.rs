//! User API handlers.
//!
//! User paths accept either the surrogate UUID or the identity provider's
//! user id; [`UserIdentifier::parse`] classifies the path segment once and
//! the repository dispatches on the result.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};

use rare_thread_core::{Email, UserIdentifier};

use crate::db::UserRepository;
use crate::error::{AppError, Result};
use crate::models::{Address, NewAddress, NewUser, User, UserPatch};
use crate::state::AppState;

/// Build the users router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/users", post(create_user))
        .route("/api/users/by-email/{email}", get(get_user_by_email))
        .route("/api/users/{identifier}", get(get_user).put(update_user))
        .route("/api/users/{identifier}/addresses", post(add_address))
}

/// Get a user (with addresses) by surrogate id or external identity id.
///
/// # Errors
///
/// Returns 404 if neither lookup matches.
async fn get_user(
    State(state): State<AppState>,
    Path(identifier): Path<String>,
) -> Result<Json<User>> {
    let identifier = UserIdentifier::parse(&identifier);
    let repo = UserRepository::new(state.pool());
    repo.get(&identifier)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("user {identifier}")))
}

/// Get a user by email address.
///
/// # Errors
///
/// Returns 400 for a malformed email, 404 if no user matches.
async fn get_user_by_email(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<User>> {
    let email = Email::parse(&email).map_err(|e| AppError::BadRequest(e.to_string()))?;
    let repo = UserRepository::new(state.pool());
    repo.get_by_email(&email)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("user {email}")))
}

/// Create a user.
///
/// # Errors
///
/// Returns 409 if the email is already taken.
async fn create_user(
    State(state): State<AppState>,
    Json(new_user): Json<NewUser>,
) -> Result<(StatusCode, Json<User>)> {
    let repo = UserRepository::new(state.pool());
    let user = repo.create(&new_user).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Apply a partial update to a user.
///
/// An `addresses` key in the body is dropped; an update that carries no
/// updatable field is reported as 404.
///
/// # Errors
///
/// Returns 404 if the user does not exist.
async fn update_user(
    State(state): State<AppState>,
    Path(identifier): Path<String>,
    Json(patch): Json<UserPatch>,
) -> Result<Json<User>> {
    let identifier = UserIdentifier::parse(&identifier);
    let repo = UserRepository::new(state.pool());
    let updated = repo.update(&identifier, &patch).await?;
    if !updated {
        return Err(AppError::NotFound(format!("user {identifier}")));
    }

    // Re-read so the response carries the address list
    repo.get(&identifier)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("user {identifier}")))
}

/// Add a shipping address to a user.
///
/// A default address clears the default flag on the user's other addresses
/// in the same transaction.
///
/// # Errors
///
/// Returns 404 if the identifier resolves to no user.
async fn add_address(
    State(state): State<AppState>,
    Path(identifier): Path<String>,
    Json(address): Json<NewAddress>,
) -> Result<(StatusCode, Json<Address>)> {
    let identifier = UserIdentifier::parse(&identifier);
    let repo = UserRepository::new(state.pool());
    let created = repo.add_address(&identifier, &address).await?;
    Ok((StatusCode::CREATED, Json(created)))
}
