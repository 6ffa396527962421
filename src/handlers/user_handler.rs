//! User handlers.
//!
//! Each handler runs exactly one persistence call and maps its outcome to an
//! HTTP response. The 400/404/500 split is deliberately uneven: 404 is
//! reserved for the read path, a missing target on the write path is reported
//! as invalid data, and delete reports every failure as a server error.
//! Clients depend on this mapping; do not "correct" it to uniform 404s
//! without a contract change.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};

use crate::domain::{User, UserInput};
use crate::errors::{AppError, AppResult, MessageBody, MSG_INVALID_DATA};
use crate::extractors::ValidatedJson;
use crate::repository::RepoError;
use crate::state::AppState;

const MSG_USER_DELETED: &str = "User deleted successfully";

/// Create user routes.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/:id", get(get_user).put(update_user).delete(delete_user))
}

/// GET /users - full collection in the store's natural order.
pub async fn list_users(State(state): State<AppState>) -> AppResult<Json<Vec<User>>> {
    let users = state.users.find_all().await?;
    Ok(Json(users))
}

/// GET /users/:id - 404 when the identifier names no user.
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<User>> {
    let user = state
        .users
        .find_by_id(&id)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(user))
}

/// POST /users - validated payload, 201 with the assigned id on success.
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<UserInput>,
) -> AppResult<(StatusCode, Json<User>)> {
    let user = state.users.create(payload.into_record()).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// PUT /users/:id - full-record replace of the three mutable fields.
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UserInput>,
) -> AppResult<Json<User>> {
    let user = state
        .users
        .update(&id, payload.into_record())
        .await
        .map_err(|err| match err {
            // A missing update target is folded into 400, not 404.
            RepoError::NotFound => AppError::bad_request(MSG_INVALID_DATA),
            RepoError::Conflict(_) | RepoError::Database(_) => {
                AppError::bad_request(MSG_INVALID_DATA)
            }
        })?;

    Ok(Json(user))
}

/// DELETE /users/:id - 200 with a confirmation message.
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<MessageBody>> {
    // Delete does not distinguish a missing user from a backend failure.
    state
        .users
        .delete(&id)
        .await
        .map_err(|err| AppError::internal(err.to_string()))?;

    Ok(Json(MessageBody::new(MSG_USER_DELETED)))
}
