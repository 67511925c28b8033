use axum::{extract::State, routing::post, Json, Router};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{LoginRequest, LoginResponse},
        password::verify_password_async,
    },
    error::{ApiError, AuthError},
    extract::JsonBody,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new().route("/auth/login", post(login))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let user_name = payload
        .user_name
        .ok_or(AuthError::MissingCredential("user_name"))?;
    let password = payload
        .password
        .ok_or(AuthError::MissingCredential("password"))?;

    let Some(user) = state.users.find_by_user_name(&user_name).await? else {
        warn!(%user_name, "login unknown user_name");
        return Err(AuthError::IncorrectCredentials.into());
    };

    if !verify_password_async(password, user.password.clone()).await? {
        warn!(user_id = user.id, "login invalid password");
        return Err(AuthError::IncorrectCredentials.into());
    }

    let auth_token = state.jwt.issue(&user.user_name, user.id)?;
    info!(user_id = user.id, "user logged in");
    Ok(Json(LoginResponse { auth_token }))
}

#[cfg(test)]
mod tests {
    use crate::state::AppState;
    use crate::testing::{post_json, seed_user, test_app};
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn missing_fields_use_flat_envelope() {
        let state = AppState::fake();
        let app = test_app(&state);
        for (field, body) in [
            ("user_name", json!({ "password": "Password1!" })),
            ("password", json!({ "user_name": "test-user-1" })),
        ] {
            let (status, body) = post_json(&app, "/api/auth/login", None, body).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(
                body,
                json!({ "error": format!("Missing '{field}' in request body") })
            );
        }
    }

    #[tokio::test]
    async fn bad_user_name_or_password_is_rejected() {
        let state = AppState::fake();
        seed_user(&state, "test-user-1", "Password1!").await;
        let app = test_app(&state);

        for body in [
            json!({ "user_name": "user-not", "password": "Password1!" }),
            json!({ "user_name": "test-user-1", "password": "wrong" }),
        ] {
            let (status, body) = post_json(&app, "/api/auth/login", None, body).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body, json!({ "error": "Incorrect username or password" }));
        }
    }

    #[tokio::test]
    async fn valid_credentials_return_token_for_user() {
        let state = AppState::fake();
        let user = seed_user(&state, "test-user-1", "Password1!").await;
        let app = test_app(&state);

        let (status, body) = post_json(
            &app,
            "/api/auth/login",
            None,
            json!({ "user_name": "test-user-1", "password": "Password1!" }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let token = body["authToken"].as_str().expect("authToken");
        let claims = state.jwt.verify(token).unwrap();
        assert_eq!(claims.sub, "test-user-1");
        assert_eq!(claims.user_id, user.id);
    }
}
