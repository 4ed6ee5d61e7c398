use shared::{
    DifficultyStats, GameSession, OverallStats, PerformanceMetrics, RecentActivity, Result,
    ServiceError, SessionDetail, SessionId, UserId, WeeklyProgress,
};

use crate::repository::{AttemptRepository, DashboardRepository, SessionRepository};

pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 100;

/// Clamp a requested page size into `1..=MAX_PAGE_SIZE`.
pub fn clamp_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
}

pub struct DashboardService {
    dashboard_repo: DashboardRepository,
    session_repo: SessionRepository,
    attempt_repo: AttemptRepository,
}

impl DashboardService {
    pub fn new(
        dashboard_repo: DashboardRepository,
        session_repo: SessionRepository,
        attempt_repo: AttemptRepository,
    ) -> Self {
        Self {
            dashboard_repo,
            session_repo,
            attempt_repo,
        }
    }

    pub async fn overall_stats(&self, user_id: &UserId) -> Result<OverallStats> {
        self.dashboard_repo.overall_stats(user_id).await
    }

    pub async fn weekly_progress(&self, user_id: &UserId) -> Result<Vec<WeeklyProgress>> {
        self.dashboard_repo.weekly_progress(user_id).await
    }

    pub async fn difficulty_stats(&self, user_id: &UserId) -> Result<Vec<DifficultyStats>> {
        self.dashboard_repo.difficulty_stats(user_id).await
    }

    pub async fn recent_activities(
        &self,
        user_id: &UserId,
        limit: Option<i64>,
    ) -> Result<Vec<RecentActivity>> {
        self.dashboard_repo
            .recent_activities(user_id, clamp_limit(limit))
            .await
    }

    pub async fn performance_metrics(&self, user_id: &UserId) -> Result<PerformanceMetrics> {
        self.dashboard_repo.performance_metrics(user_id).await
    }

    pub async fn list_sessions(
        &self,
        user_id: &UserId,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<GameSession>> {
        let offset = offset.unwrap_or(0);
        if offset < 0 {
            return Err(ServiceError::Validation(
                "Offset must not be negative".to_string(),
            ));
        }

        self.session_repo
            .list_completed_for_user(user_id, clamp_limit(limit), offset)
            .await
    }

    pub async fn session_detail(
        &self,
        user_id: &UserId,
        session_id: &SessionId,
    ) -> Result<SessionDetail> {
        let session = self.session_repo.get_for_user(user_id, session_id).await?;
        let attempts = self.attempt_repo.list_for_session(session_id).await?;

        Ok(SessionDetail { session, attempts })
    }
}
