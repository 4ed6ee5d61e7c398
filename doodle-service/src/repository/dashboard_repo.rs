use shared::{
    AttemptId, DifficultyStats, OverallStats, PerformanceMetrics, RecentActivity, Result,
    ServiceError, SessionId, UserId, WeeklyProgress,
};
use sqlx::{PgPool, Row};

use crate::repository::attempt_repo::difficulty_from_row;

/// Weeks shown on the progress chart.
const WEEKLY_PROGRESS_WEEKS: i64 = 8;

/// Read-only aggregate queries behind the player dashboard.
#[derive(Clone)]
pub struct DashboardRepository {
    pool: PgPool,
}

impl DashboardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn overall_stats(&self, user_id: &UserId) -> Result<OverallStats> {
        let row = sqlx::query(
            r#"
            SELECT
                total_games_played,
                total_attempts,
                successful_attempts,
                COALESCE(successful_attempts::FLOAT8 * 100 / NULLIF(total_attempts, 0), 0)
                    AS overall_accuracy,
                avg_drawing_time_ms,
                current_level,
                experience_points,
                best_score,
                highest_streak,
                easy_accuracy,
                medium_accuracy,
                hard_accuracy,
                total_time_spent_seconds
            FROM user_metrics
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.0)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(OverallStats {
                current_level: 1,
                ..OverallStats::default()
            });
        };

        Ok(OverallStats {
            total_games_played: row.get("total_games_played"),
            total_attempts: row.get("total_attempts"),
            successful_attempts: row.get("successful_attempts"),
            overall_accuracy: row.get("overall_accuracy"),
            avg_drawing_time_ms: row.get("avg_drawing_time_ms"),
            current_level: row.get("current_level"),
            experience_points: row.get("experience_points"),
            best_score: row.get("best_score"),
            highest_streak: row.get("highest_streak"),
            easy_accuracy: row.get("easy_accuracy"),
            medium_accuracy: row.get("medium_accuracy"),
            hard_accuracy: row.get("hard_accuracy"),
            total_time_spent_seconds: row.get("total_time_spent_seconds"),
        })
    }

    /// Most recent calendar weeks with at least one attempt, newest first.
    pub async fn weekly_progress(&self, user_id: &UserId) -> Result<Vec<WeeklyProgress>> {
        let rows = sqlx::query(
            r#"
            SELECT
                date_trunc('week', created_at) AS week_start,
                COUNT(*) AS total_attempts,
                COUNT(*) FILTER (WHERE is_correct) AS successful_attempts,
                AVG(drawing_time_ms)::FLOAT8 AS avg_drawing_time,
                (COUNT(*) FILTER (WHERE is_correct))::FLOAT8 / COUNT(*) AS accuracy
            FROM drawing_attempts
            WHERE user_id = $1
            GROUP BY week_start
            ORDER BY week_start DESC
            LIMIT $2
            "#,
        )
        .bind(user_id.0)
        .bind(WEEKLY_PROGRESS_WEEKS)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|row| WeeklyProgress {
                week_start: row.get("week_start"),
                total_attempts: row.get("total_attempts"),
                successful_attempts: row.get("successful_attempts"),
                avg_drawing_time: row.get("avg_drawing_time"),
                accuracy: row.get("accuracy"),
            })
            .collect())
    }

    /// One row per difficulty the user has attempted, EASY to HARD.
    pub async fn difficulty_stats(&self, user_id: &UserId) -> Result<Vec<DifficultyStats>> {
        let rows = sqlx::query(
            r#"
            SELECT
                difficulty,
                COUNT(*) AS total_attempts,
                COUNT(*) FILTER (WHERE is_correct) AS successful_attempts,
                AVG(drawing_time_ms)::FLOAT8 AS avg_time,
                AVG(recognition_accuracy)::FLOAT8 AS avg_accuracy
            FROM drawing_attempts
            WHERE user_id = $1
            GROUP BY difficulty
            ORDER BY CASE difficulty WHEN 'EASY' THEN 1 WHEN 'MEDIUM' THEN 2 ELSE 3 END
            "#,
        )
        .bind(user_id.0)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                Ok(DifficultyStats {
                    difficulty: difficulty_from_row(row)?,
                    total_attempts: row.get("total_attempts"),
                    successful_attempts: row.get("successful_attempts"),
                    avg_time: row.get("avg_time"),
                    avg_accuracy: row.get("avg_accuracy"),
                })
            })
            .collect()
    }

    pub async fn recent_activities(
        &self,
        user_id: &UserId,
        limit: i64,
    ) -> Result<Vec<RecentActivity>> {
        let rows = sqlx::query(
            r#"
            SELECT
                da.id,
                da.session_id,
                da.word_prompt,
                da.difficulty,
                da.is_correct,
                da.drawing_time_ms,
                da.recognition_accuracy,
                da.created_at,
                gs.total_score AS session_score
            FROM drawing_attempts da
            JOIN game_sessions gs ON gs.id = da.session_id
            WHERE da.user_id = $1
            ORDER BY da.created_at DESC, da.seq DESC
            LIMIT $2
            "#,
        )
        .bind(user_id.0)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                Ok(RecentActivity {
                    id: AttemptId(row.get("id")),
                    session_id: SessionId(row.get("session_id")),
                    word_prompt: row.get("word_prompt"),
                    difficulty: difficulty_from_row(row)?,
                    is_correct: row.get("is_correct"),
                    drawing_time_ms: row.get("drawing_time_ms"),
                    recognition_accuracy: row.get("recognition_accuracy"),
                    created_at: row.get("created_at"),
                    session_score: row.get("session_score"),
                })
            })
            .collect()
    }

    /// Lifetime records. Dates fall back to the last metrics update when a record
    /// has never been raised.
    pub async fn performance_metrics(&self, user_id: &UserId) -> Result<PerformanceMetrics> {
        let row = sqlx::query(
            r#"
            SELECT
                total_games_played,
                total_attempts,
                successful_attempts,
                total_time_spent_seconds,
                current_level,
                experience_points,
                best_score,
                fastest_correct_ms,
                highest_streak,
                easy_accuracy,
                medium_accuracy,
                hard_accuracy,
                avg_drawing_time_ms,
                COALESCE(best_score_at, last_updated) AS best_score_date,
                COALESCE(fastest_correct_at, last_updated) AS fastest_correct_date,
                COALESCE(highest_streak_at, last_updated) AS highest_streak_date
            FROM user_metrics
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.0)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| ServiceError::UserNotFound(user_id.to_string()))?;

        Ok(PerformanceMetrics {
            total_games_played: row.get("total_games_played"),
            total_attempts: row.get("total_attempts"),
            successful_attempts: row.get("successful_attempts"),
            total_time_spent_seconds: row.get("total_time_spent_seconds"),
            current_level: row.get("current_level"),
            experience_points: row.get("experience_points"),
            best_score: row.get("best_score"),
            fastest_correct_ms: row.get("fastest_correct_ms"),
            highest_streak: row.get("highest_streak"),
            easy_accuracy: row.get("easy_accuracy"),
            medium_accuracy: row.get("medium_accuracy"),
            hard_accuracy: row.get("hard_accuracy"),
            avg_drawing_time_ms: row.get("avg_drawing_time_ms"),
            best_score_date: row.get("best_score_date"),
            fastest_correct_date: row.get("fastest_correct_date"),
            highest_streak_date: row.get("highest_streak_date"),
        })
    }
}
