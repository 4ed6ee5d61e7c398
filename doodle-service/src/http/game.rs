use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use shared::{Difficulty, SessionId, SessionTotals};

use crate::http::error::ApiResult;
use crate::http::middleware::AuthUser;
use crate::service::Recognition;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RecognizeRequest {
    pub image: String,
}

#[derive(Debug, Deserialize)]
pub struct AttemptRequest {
    pub session_id: SessionId,
    pub word_prompt: String,
    pub difficulty: Difficulty,
    pub is_correct: bool,
    pub drawing_time_ms: i32,
    pub recognition_accuracy: f64,
}

#[derive(Debug, Deserialize)]
pub struct LeaderboardQuery {
    pub limit: Option<i64>,
}

/// POST /api/game/recognize
pub async fn recognize(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    Json(req): Json<RecognizeRequest>,
) -> ApiResult<Json<Recognition>> {
    Ok(Json(state.recognition.recognize(&req.image).await?))
}

/// POST /api/game/session
pub async fn start_session(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> ApiResult<Json<Value>> {
    let session = state.sessions.start_session(&auth.user.id).await?;
    Ok(Json(json!({
        "session_id": session.id,
        "start_time": session.start_time,
    })))
}

/// POST /api/game/attempt
pub async fn record_attempt(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(req): Json<AttemptRequest>,
) -> ApiResult<Json<Value>> {
    let attempt_id = state
        .sessions
        .record_attempt(
            &req.session_id,
            &auth.user.id,
            &req.word_prompt,
            req.difficulty,
            req.is_correct,
            req.drawing_time_ms,
            req.recognition_accuracy,
        )
        .await?;

    Ok(Json(json!({
        "message": "Attempt recorded successfully",
        "attempt_id": attempt_id,
    })))
}

/// POST /api/game/session/{id}/complete
pub async fn complete_session(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(session_id): Path<SessionId>,
    Json(totals): Json<SessionTotals>,
) -> ApiResult<Json<Value>> {
    let completed = state
        .sessions
        .complete_session(&session_id, Some(&auth.user.id), &totals)
        .await?;

    Ok(Json(json!({
        "message": "Session completed successfully",
        "session_id": session_id,
        "session": completed.session,
    })))
}

/// GET /api/game/leaderboard
pub async fn leaderboard(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LeaderboardQuery>,
) -> ApiResult<Json<Value>> {
    let entries = state.leaderboard.top(query.limit).await?;
    Ok(Json(json!({ "leaderboard": entries })))
}

/// GET /api/game/leaderboard/me
pub async fn my_rank(State(state): State<Arc<AppState>>, auth: AuthUser) -> ApiResult<Json<Value>> {
    let entry = state.leaderboard.user_rank(&auth.user.id).await?;
    Ok(Json(json!({ "entry": entry })))
}
