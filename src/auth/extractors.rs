use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use tracing::{error, warn};

use crate::{
    error::{ApiError, AuthError},
    state::AppState,
};

/// Caller identity resolved from a verified bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub id: i32,
    pub user_name: String,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::MissingBearerToken)?;

        let claims = state.jwt.verify(token).map_err(|e| {
            warn!(error = %e, "rejecting bearer token");
            AuthError::UnauthorizedRequest
        })?;

        // Signature failures and unknown subjects answer identically.
        let user = match state.users.find_by_user_name(&claims.sub).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                warn!("token subject has no matching user");
                return Err(AuthError::UnauthorizedRequest.into());
            }
            Err(e) => {
                error!(error = %e, "auth gate user lookup failed");
                return Err(e.into());
            }
        };

        Ok(AuthUser {
            id: user.id,
            user_name: user.user_name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::JwtKeys;
    use crate::config::JwtConfig;
    use crate::testing::{seed_user, TEST_SECRET};
    use axum::http::Request;

    async fn run(state: &AppState, header: Option<&str>) -> Result<AuthUser, ApiError> {
        let mut builder = Request::builder().uri("/api/applications/1");
        if let Some(h) = header {
            builder = builder.header(AUTHORIZATION, h);
        }
        let (mut parts, _) = builder.body(()).unwrap().into_parts();
        AuthUser::from_request_parts(&mut parts, state).await
    }

    fn unauthorized(result: Result<AuthUser, ApiError>) -> bool {
        matches!(result, Err(ApiError::Auth(AuthError::UnauthorizedRequest)))
    }

    #[tokio::test]
    async fn admits_valid_token_and_resolves_user() {
        let state = AppState::fake();
        let user = seed_user(&state, "test-user-1", "Password1!").await;
        let token = state.jwt.issue(&user.user_name, user.id).unwrap();

        let admitted = run(&state, Some(&format!("Bearer {token}"))).await.unwrap();
        assert_eq!(
            admitted,
            AuthUser {
                id: user.id,
                user_name: "test-user-1".into()
            }
        );
    }

    #[tokio::test]
    async fn missing_or_non_bearer_header() {
        let state = AppState::fake();
        for header in [None, Some("Basic dXNlcjpwYXNz"), Some("Bearer "), Some("bearer x")] {
            let result = run(&state, header).await;
            assert!(
                matches!(result, Err(ApiError::Auth(AuthError::MissingBearerToken))),
                "header: {header:?}"
            );
        }
    }

    #[tokio::test]
    async fn wrong_secret_and_unknown_subject_look_the_same() {
        let state = AppState::fake();
        let user = seed_user(&state, "test-user-1", "Password1!").await;

        let forged = JwtKeys::new(&JwtConfig {
            secret: "wrong-secret".into(),
        })
        .issue(&user.user_name, user.id)
        .unwrap();
        assert!(unauthorized(run(&state, Some(&format!("Bearer {forged}"))).await));

        let ghost = state.jwt.issue("not-a-user", 999).unwrap();
        assert!(unauthorized(run(&state, Some(&format!("Bearer {ghost}"))).await));

        assert!(unauthorized(run(&state, Some("Bearer not.a.jwt")).await));
        assert_ne!(TEST_SECRET, "wrong-secret");
    }

    #[tokio::test]
    async fn expired_token_is_unauthorized() {
        use jsonwebtoken::{encode, EncodingKey, Header};

        let state = AppState::fake();
        let user = seed_user(&state, "u1", "Password1!").await;
        let expired = encode(
            &Header::default(),
            &serde_json::json!({ "sub": user.user_name, "user_id": user.id, "iat": 0, "exp": 1 }),
            &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
        )
        .unwrap();
        assert!(unauthorized(run(&state, Some(&format!("Bearer {expired}"))).await));
    }
}
