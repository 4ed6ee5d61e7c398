use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use shared::ProfileData;

use crate::http::error::ApiResult;
use crate::http::middleware::AuthUser;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// GET /api/profile/me
pub async fn me(State(state): State<Arc<AppState>>, auth: AuthUser) -> ApiResult<Json<ProfileData>> {
    Ok(Json(state.profile.get_profile(&auth.user.id).await?))
}

/// POST /api/profile/change-password
pub async fn change_password(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(req): Json<ChangePasswordRequest>,
) -> ApiResult<Json<Value>> {
    state
        .auth
        .change_password(&auth.user.id, &req.current_password, &req.new_password)
        .await?;
    Ok(Json(json!({ "message": "Password updated successfully" })))
}
