use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::state::AppState;

/// Fields a PATCH on an application may touch, in the order they are reported.
pub const UPDATABLE_APPLICATION_FIELDS: &[&str] = &[
    "job_name",
    "company_name",
    "website_url",
    "date_applied",
    "contact_name",
    "contact_phone",
    "contact_email",
    "interview_date",
    "status",
    "notes",
];

/// Failures coming out of a repository.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unique constraint violated: {0}")]
    Conflict(String),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    /// Translates unique violations into `Conflict`; everything else stays opaque.
    pub fn from_sqlx(e: sqlx::Error) -> Self {
        if let Some(db) = e.as_database_error() {
            if db.is_unique_violation() {
                return StoreError::Conflict(db.constraint().unwrap_or("unknown").to_string());
            }
        }
        StoreError::Database(e)
    }
}

/// Rejections raised by the auth gate and the login route. These use the flat
/// `{"error": "..."}` envelope.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing bearer token")]
    MissingBearerToken,
    #[error("Unauthorized request")]
    UnauthorizedRequest,
    #[error("Missing '{0}' in request body")]
    MissingCredential(&'static str),
    #[error("Incorrect username or password")]
    IncorrectCredentials,
}

impl AuthError {
    fn status(&self) -> StatusCode {
        match self {
            AuthError::MissingBearerToken | AuthError::UnauthorizedRequest => {
                StatusCode::UNAUTHORIZED
            }
            AuthError::MissingCredential(_) | AuthError::IncorrectCredentials => {
                StatusCode::BAD_REQUEST
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Missing '{0}' in request body")]
    MissingField(&'static str),
    #[error("{0}")]
    Validation(String),
    #[error("Request must contain either {}", either_list(UPDATABLE_APPLICATION_FIELDS))]
    NoUpdatableFields,
    #[error("Username already exists")]
    DuplicateUsername,
    #[error("{0}")]
    NotFound(&'static str),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// `'a', 'b', or 'c'`
fn either_list(fields: &[&str]) -> String {
    let quoted: Vec<String> = fields.iter().map(|f| format!("'{f}'")).collect();
    match quoted.split_last() {
        Some((last, rest)) if !rest.is_empty() => format!("{}, or {}", rest.join(", "), last),
        Some((last, _)) => last.clone(),
        None => String::new(),
    }
}

/// Carries the real cause of a 500 to [`expose_error_detail`].
#[derive(Debug, Clone)]
pub struct ErrorDetail(pub String);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::MissingField(_)
            | ApiError::Validation(_)
            | ApiError::NoUpdatableFields
            | ApiError::DuplicateUsername => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Auth(_) => StatusCode::UNAUTHORIZED,
            ApiError::Store(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        match self {
            ApiError::Auth(e) => e.into_response(),
            ApiError::Store(_) | ApiError::Internal(_) => {
                let detail = format!("{self:#}");
                error!(error = %detail, "request failed");
                let mut res = (
                    status,
                    Json(json!({ "error": { "message": "server error" } })),
                )
                    .into_response();
                res.extensions_mut().insert(ErrorDetail(detail));
                res
            }
            other => (
                status,
                Json(json!({ "error": { "message": other.to_string() } })),
            )
                .into_response(),
        }
    }
}

/// Outside production, swaps the generic 500 body for the underlying cause.
pub async fn expose_error_detail(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    let mut res = next.run(req).await;
    if !state.config.environment.is_development() {
        res.extensions_mut().remove::<ErrorDetail>();
        return res;
    }
    match res.extensions_mut().remove::<ErrorDetail>() {
        Some(ErrorDetail(detail)) => (
            res.status(),
            Json(json!({ "message": detail, "error": { "message": detail } })),
        )
            .into_response(),
        None => res,
    }
}
