use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use tracing::{debug, info, instrument};

use super::{
    dto::{CreateResourceRequest, ResourceResponse},
    repo_types::{NewResource, Resource},
};
use crate::{
    auth::extractors::AuthUser,
    error::ApiError,
    extract::{JsonBody, Path},
    state::AppState,
    validation::required,
};

pub fn resource_routes() -> Router<AppState> {
    Router::new()
        .route("/resources", post(create_resource))
        .route(
            "/resources/:resource_id",
            get(get_resource).delete(delete_resource),
        )
        .route("/resources/user/:user_id", get(list_user_resources))
}

async fn load(state: &AppState, id: i32) -> Result<Resource, ApiError> {
    state
        .resources
        .get_by_id(id)
        .await?
        .ok_or(ApiError::NotFound("Resource doesn't exist"))
}

#[instrument(skip(state, caller, payload), fields(caller = caller.id, user_name = %caller.user_name))]
pub async fn create_resource(
    State(state): State<AppState>,
    caller: AuthUser,
    JsonBody(payload): JsonBody<CreateResourceRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let new = NewResource {
        resource_name: required("resource_name", payload.resource_name)?,
        resource_url: required("resource_url", payload.resource_url)?,
        kind: required("type", payload.kind)?,
        user_id: required("user_id", payload.user_id)?,
        notes: payload.notes,
    };

    let resource = state.resources.insert(new).await?;
    info!(resource_id = resource.id, user_id = resource.user_id, "resource created");
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/api/resources/{}", resource.id))],
        Json(ResourceResponse::from(resource)),
    ))
}

#[instrument(skip(state, _caller))]
pub async fn get_resource(
    State(state): State<AppState>,
    _caller: AuthUser,
    Path(resource_id): Path<i32>,
) -> Result<Json<ResourceResponse>, ApiError> {
    Ok(Json(load(&state, resource_id).await?.into()))
}

#[instrument(skip(state, caller), fields(caller = caller.id))]
pub async fn delete_resource(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(resource_id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    load(&state, resource_id).await?;
    let removed = state.resources.delete(resource_id).await?;
    info!(resource_id, removed, "resource deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state, caller), fields(caller = caller.id))]
pub async fn list_user_resources(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(user_id): Path<i32>,
) -> Result<Json<Vec<ResourceResponse>>, ApiError> {
    if user_id != caller.id {
        debug!(user_id, "path user_id differs from token identity");
    }
    let rows = state.resources.get_by_owner(caller.id).await?;
    Ok(Json(rows.into_iter().map(ResourceResponse::from).collect()))
}
