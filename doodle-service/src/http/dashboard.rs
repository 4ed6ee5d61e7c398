use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use shared::{
    DifficultyStats, GameSession, OverallStats, PerformanceMetrics, RecentActivity,
    SessionDetail, SessionId, WeeklyProgress,
};

use crate::http::error::ApiResult;
use crate::http::middleware::AuthUser;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

pub async fn overall(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> ApiResult<Json<OverallStats>> {
    Ok(Json(state.dashboard.overall_stats(&auth.user.id).await?))
}

pub async fn weekly(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<WeeklyProgress>>> {
    Ok(Json(state.dashboard.weekly_progress(&auth.user.id).await?))
}

pub async fn difficulty(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<DifficultyStats>>> {
    Ok(Json(state.dashboard.difficulty_stats(&auth.user.id).await?))
}

pub async fn performance(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> ApiResult<Json<PerformanceMetrics>> {
    Ok(Json(state.dashboard.performance_metrics(&auth.user.id).await?))
}

pub async fn recent_activities(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Query(page): Query<PageQuery>,
) -> ApiResult<Json<Vec<RecentActivity>>> {
    Ok(Json(
        state
            .dashboard
            .recent_activities(&auth.user.id, page.limit)
            .await?,
    ))
}

pub async fn sessions(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Query(page): Query<PageQuery>,
) -> ApiResult<Json<Vec<GameSession>>> {
    Ok(Json(
        state
            .dashboard
            .list_sessions(&auth.user.id, page.limit, page.offset)
            .await?,
    ))
}

pub async fn session_detail(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(session_id): Path<SessionId>,
) -> ApiResult<Json<SessionDetail>> {
    Ok(Json(
        state
            .dashboard
            .session_detail(&auth.user.id, &session_id)
            .await?,
    ))
}
