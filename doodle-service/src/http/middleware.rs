use std::sync::Arc;

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use shared::{ServiceError, User};

use crate::http::error::ApiError;
use crate::state::AppState;

/// Extractor that resolves a `Bearer` token to a live, non-denylisted user.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user: User,
    pub token: String,
}

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                ServiceError::Unauthorized("Missing authorization header".to_string())
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            ServiceError::Unauthorized("Invalid authorization header format".to_string())
        })?;

        let user = state.auth.current_user(token).await?;

        Ok(AuthUser {
            user,
            token: token.to_string(),
        })
    }
}
