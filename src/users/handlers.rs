use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use tracing::{error, info, instrument, warn};

use super::{
    dto::{RegisterRequest, UserResponse},
    repo_types::NewUser,
};
use crate::{
    auth::{
        extractors::AuthUser,
        password::{hash_password_async, validate_password},
    },
    error::{ApiError, StoreError},
    extract::{JsonBody, Path},
    state::AppState,
    validation::required,
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", post(register))
        .route("/users/:user_id", get(get_user))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let full_name = required("full_name", payload.full_name)?;
    let user_name = required("user_name", payload.user_name)?;
    let password = required("password", payload.password)?;

    if let Some(msg) = validate_password(&password) {
        warn!(%user_name, "password rejected");
        return Err(ApiError::Validation(msg.into()));
    }

    if state.users.find_by_user_name(&user_name).await?.is_some() {
        warn!(%user_name, "user_name already registered");
        return Err(ApiError::DuplicateUsername);
    }

    let password_hash = hash_password_async(password).await?;

    // The lookup above is advisory; the unique index decides concurrent registrations.
    let user = match state
        .users
        .insert(NewUser {
            full_name,
            user_name,
            password_hash,
        })
        .await
    {
        Ok(u) => u,
        Err(StoreError::Conflict(constraint)) => {
            warn!(%constraint, "user_name taken during insert");
            return Err(ApiError::DuplicateUsername);
        }
        Err(e) => {
            error!(error = %e, "create user failed");
            return Err(e.into());
        }
    };

    info!(user_id = user.id, "user registered");
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/api/users/{}", user.id))],
        Json(UserResponse::from(user)),
    ))
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    _caller: AuthUser,
    Path(user_id): Path<i32>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state
        .users
        .get_by_id(user_id)
        .await?
        .ok_or(ApiError::NotFound("User doesn't exist"))?;
    Ok(Json(user.into()))
}
