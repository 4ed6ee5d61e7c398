use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use shared::User;

use crate::http::error::ApiResult;
use crate::http::middleware::AuthUser;
use crate::service::AuthToken;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub password: String,
    pub email: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

/// POST /api/auth/signup
#[tracing::instrument(skip(state, req), fields(username = %req.username))]
pub async fn signup(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SignupRequest>,
) -> ApiResult<Json<AuthToken>> {
    let token = state
        .auth
        .signup(&req.username, &req.password, &req.email, &req.name)
        .await?;
    Ok(Json(token))
}

/// POST /api/auth/login
#[tracing::instrument(skip(state, req), fields(username = %req.username))]
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<AuthToken>> {
    let token = state.auth.login(&req.username, &req.password).await?;
    Ok(Json(token))
}

/// GET /api/auth/verify
pub async fn verify(auth: AuthUser) -> Json<User> {
    Json(auth.user)
}

/// POST /api/auth/logout
pub async fn logout(State(state): State<Arc<AppState>>, auth: AuthUser) -> ApiResult<Json<Value>> {
    state.auth.logout(&auth.token).await?;
    Ok(Json(json!({ "message": "Successfully logged out" })))
}

/// POST /api/auth/forgot-password
pub async fn forgot_password(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ForgotPasswordRequest>,
) -> ApiResult<Json<Value>> {
    state.auth.forgot_password(&req.email).await?;
    Ok(Json(json!({ "message": "Password reset instructions sent to email" })))
}
