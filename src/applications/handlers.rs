use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use tracing::{debug, info, instrument, warn};

use super::{
    dto::{ApplicationResponse, CreateApplicationRequest},
    repo_types::{Application, ApplicationChanges, NewApplication},
};
use crate::{
    auth::extractors::AuthUser,
    error::ApiError,
    extract::{JsonBody, Path},
    state::AppState,
    validation::required,
};

const NOT_FOUND: &str = "Application doesn't exist";

pub fn application_routes() -> Router<AppState> {
    Router::new()
        .route("/applications", post(create_application))
        .route(
            "/applications/:application_id",
            get(get_application)
                .patch(update_application)
                .delete(delete_application),
        )
        .route("/applications/user/:user_id", get(list_user_applications))
}

fn location(id: i32) -> [(header::HeaderName, String); 1] {
    [(header::LOCATION, format!("/api/applications/{id}"))]
}

async fn load(state: &AppState, id: i32) -> Result<Application, ApiError> {
    state
        .applications
        .get_by_id(id)
        .await?
        .ok_or(ApiError::NotFound(NOT_FOUND))
}

#[instrument(skip(state, caller, payload), fields(caller = caller.id, user_name = %caller.user_name))]
pub async fn create_application(
    State(state): State<AppState>,
    caller: AuthUser,
    JsonBody(payload): JsonBody<CreateApplicationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let new = NewApplication {
        job_name: required("job_name", payload.job_name)?,
        company_name: required("company_name", payload.company_name)?,
        status: required("status", payload.status)?,
        user_id: required("user_id", payload.user_id)?,
        website_url: payload.website_url,
        date_applied: payload.date_applied,
        contact_name: payload.contact_name,
        contact_phone: payload.contact_phone,
        contact_email: payload.contact_email,
        interview_date: payload.interview_date,
        notes: payload.notes,
    };

    let app = state.applications.insert(new).await?;
    info!(application_id = app.id, user_id = app.user_id, "application created");
    Ok((
        StatusCode::CREATED,
        location(app.id),
        Json(ApplicationResponse::from(app)),
    ))
}

#[instrument(skip(state, _caller))]
pub async fn get_application(
    State(state): State<AppState>,
    _caller: AuthUser,
    Path(application_id): Path<i32>,
) -> Result<Json<ApplicationResponse>, ApiError> {
    let app = load(&state, application_id).await?;
    Ok(Json(app.into()))
}

#[instrument(skip(state, caller, changes), fields(caller = caller.id))]
pub async fn update_application(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(application_id): Path<i32>,
    JsonBody(changes): JsonBody<ApplicationChanges>,
) -> Result<impl IntoResponse, ApiError> {
    load(&state, application_id).await?;

    if !changes.has_any() {
        warn!(application_id, "update without updatable fields");
        return Err(ApiError::NoUpdatableFields);
    }

    // Deleted between the lookup and the write.
    let updated = state
        .applications
        .update(application_id, changes)
        .await?
        .ok_or(ApiError::NotFound(NOT_FOUND))?;
    info!(application_id, "application updated");
    Ok((
        StatusCode::OK,
        location(updated.id),
        Json(ApplicationResponse::from(updated)),
    ))
}

#[instrument(skip(state, caller), fields(caller = caller.id))]
pub async fn delete_application(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(application_id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    load(&state, application_id).await?;
    let removed = state.applications.delete(application_id).await?;
    info!(application_id, removed, "application deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Lists the caller's applications. The owner comes from the token, not the path.
#[instrument(skip(state, caller), fields(caller = caller.id))]
pub async fn list_user_applications(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(user_id): Path<i32>,
) -> Result<Json<Vec<ApplicationResponse>>, ApiError> {
    if user_id != caller.id {
        debug!(user_id, "path user_id differs from token identity");
    }
    let apps = state.applications.get_by_owner(caller.id).await?;
    Ok(Json(apps.into_iter().map(ApplicationResponse::from).collect()))
}
