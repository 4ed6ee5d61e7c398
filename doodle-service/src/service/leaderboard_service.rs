use shared::{LeaderboardEntry, Result, UserId};

use crate::repository::LeaderboardRepository;
use crate::service::dashboard_service::MAX_PAGE_SIZE;

pub struct LeaderboardService {
    leaderboard_repo: LeaderboardRepository,
    default_size: i64,
}

impl LeaderboardService {
    pub fn new(leaderboard_repo: LeaderboardRepository, default_size: i64) -> Self {
        Self {
            leaderboard_repo,
            default_size,
        }
    }

    pub async fn top(&self, limit: Option<i64>) -> Result<Vec<LeaderboardEntry>> {
        let limit = limit.unwrap_or(self.default_size).clamp(1, MAX_PAGE_SIZE);
        let entries = self.leaderboard_repo.get_leaderboard(limit, 0).await?;

        tracing::debug!(count = entries.len(), "Leaderboard served");

        Ok(entries)
    }

    pub async fn user_rank(&self, user_id: &UserId) -> Result<Option<LeaderboardEntry>> {
        self.leaderboard_repo.get_user_rank(user_id).await
    }
}
