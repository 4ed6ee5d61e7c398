use shared::{Result, SessionTotals, UserId, UserMetrics};
use sqlx::postgres::PgRow;
use sqlx::{PgConnection, PgPool, Row};

use crate::domain::{level_for_experience, DifficultyTally, SessionSummary, XP_PER_LEVEL};

#[derive(Clone)]
pub struct MetricsRepository {
    pool: PgPool,
}

impl MetricsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get(&self, user_id: &UserId) -> Result<Option<UserMetrics>> {
        let row = sqlx::query(
            r#"
            SELECT
                user_id, total_games_played, total_attempts, successful_attempts,
                total_time_spent_seconds, current_level, experience_points,
                best_score, fastest_correct_ms, highest_streak,
                easy_accuracy, medium_accuracy, hard_accuracy, avg_drawing_time_ms,
                best_score_at, fastest_correct_at, highest_streak_at, last_updated
            FROM user_metrics
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.0)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(metrics_from_row))
    }
}

/// Zeroed metrics row for a freshly created user. No-op when the row exists.
pub(crate) async fn init_metrics(conn: &mut PgConnection, user_id: &UserId) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO user_metrics (user_id)
        VALUES ($1)
        ON CONFLICT (user_id) DO NOTHING
        "#,
    )
    .bind(user_id.0)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// Fold one completed session into the user's lifetime metrics.
///
/// Runs on the caller's connection so it commits or rolls back together with the
/// session update. The upsert takes the `user_metrics` row lock, which serializes
/// concurrent completions for the same user.
pub(crate) async fn merge_completed_session(
    conn: &mut PgConnection,
    user_id: &UserId,
    totals: &SessionTotals,
    summary: &SessionSummary,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO user_metrics (
            user_id, total_games_played, total_attempts, successful_attempts,
            total_time_spent_seconds, current_level, experience_points,
            best_score, fastest_correct_ms, highest_streak,
            easy_attempts, easy_successes, medium_attempts, medium_successes,
            hard_attempts, hard_successes,
            easy_accuracy, medium_accuracy, hard_accuracy, avg_drawing_time_ms,
            best_score_at, fastest_correct_at, highest_streak_at, last_updated
        )
        VALUES (
            $1, 1, $2, $3,
            $4, $5, $6,
            $7, $8, $9,
            $10, $11, $12, $13,
            $14, $15,
            $16, $17, $18, $19,
            CASE WHEN $7 > 0 THEN NOW() END,
            CASE WHEN $8::INTEGER IS NULL THEN NULL ELSE NOW() END,
            CASE WHEN $9 > 0 THEN NOW() END,
            NOW()
        )
        ON CONFLICT (user_id) DO UPDATE SET
            total_games_played = user_metrics.total_games_played + 1,
            total_attempts = user_metrics.total_attempts + EXCLUDED.total_attempts,
            successful_attempts = user_metrics.successful_attempts + EXCLUDED.successful_attempts,
            total_time_spent_seconds =
                user_metrics.total_time_spent_seconds + EXCLUDED.total_time_spent_seconds,
            experience_points = user_metrics.experience_points + EXCLUDED.experience_points,
            current_level =
                (1 + (user_metrics.experience_points + EXCLUDED.experience_points) / $20)::INTEGER,
            best_score = GREATEST(user_metrics.best_score, EXCLUDED.best_score),
            best_score_at = CASE
                WHEN EXCLUDED.best_score > user_metrics.best_score THEN NOW()
                ELSE user_metrics.best_score_at
            END,
            fastest_correct_ms = LEAST(user_metrics.fastest_correct_ms, EXCLUDED.fastest_correct_ms),
            fastest_correct_at = CASE
                WHEN EXCLUDED.fastest_correct_ms IS NOT NULL
                    AND (user_metrics.fastest_correct_ms IS NULL
                         OR EXCLUDED.fastest_correct_ms < user_metrics.fastest_correct_ms)
                THEN NOW()
                ELSE user_metrics.fastest_correct_at
            END,
            highest_streak = GREATEST(user_metrics.highest_streak, EXCLUDED.highest_streak),
            highest_streak_at = CASE
                WHEN EXCLUDED.highest_streak > user_metrics.highest_streak THEN NOW()
                ELSE user_metrics.highest_streak_at
            END,
            easy_attempts = user_metrics.easy_attempts + EXCLUDED.easy_attempts,
            easy_successes = user_metrics.easy_successes + EXCLUDED.easy_successes,
            medium_attempts = user_metrics.medium_attempts + EXCLUDED.medium_attempts,
            medium_successes = user_metrics.medium_successes + EXCLUDED.medium_successes,
            hard_attempts = user_metrics.hard_attempts + EXCLUDED.hard_attempts,
            hard_successes = user_metrics.hard_successes + EXCLUDED.hard_successes,
            easy_accuracy = COALESCE(
                (user_metrics.easy_successes + EXCLUDED.easy_successes)::FLOAT8
                    / NULLIF(user_metrics.easy_attempts + EXCLUDED.easy_attempts, 0),
                0
            ),
            medium_accuracy = COALESCE(
                (user_metrics.medium_successes + EXCLUDED.medium_successes)::FLOAT8
                    / NULLIF(user_metrics.medium_attempts + EXCLUDED.medium_attempts, 0),
                0
            ),
            hard_accuracy = COALESCE(
                (user_metrics.hard_successes + EXCLUDED.hard_successes)::FLOAT8
                    / NULLIF(user_metrics.hard_attempts + EXCLUDED.hard_attempts, 0),
                0
            ),
            avg_drawing_time_ms = COALESCE(
                (user_metrics.avg_drawing_time_ms * user_metrics.total_attempts
                    + EXCLUDED.avg_drawing_time_ms * EXCLUDED.total_attempts)
                    / NULLIF(user_metrics.total_attempts + EXCLUDED.total_attempts, 0),
                user_metrics.avg_drawing_time_ms
            ),
            last_updated = NOW()
        "#,
    )
    .bind(user_id.0)
    .bind(i64::from(summary.total_attempts))
    .bind(i64::from(summary.successful_attempts))
    .bind(i64::from(totals.total_time_seconds))
    .bind(level_for_experience(summary.experience))
    .bind(summary.experience)
    .bind(summary.successful_attempts)
    .bind(summary.fastest_correct_ms)
    .bind(summary.streak)
    .bind(summary.easy.attempts)
    .bind(summary.easy.successes)
    .bind(summary.medium.attempts)
    .bind(summary.medium.successes)
    .bind(summary.hard.attempts)
    .bind(summary.hard.successes)
    .bind(accuracy(summary.easy))
    .bind(accuracy(summary.medium))
    .bind(accuracy(summary.hard))
    .bind(summary.exact_mean_drawing_time_ms())
    .bind(XP_PER_LEVEL)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

fn accuracy(tally: DifficultyTally) -> f64 {
    if tally.attempts == 0 {
        0.0
    } else {
        tally.successes as f64 / tally.attempts as f64
    }
}

fn metrics_from_row(row: &PgRow) -> UserMetrics {
    UserMetrics {
        user_id: UserId(row.get("user_id")),
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
        best_score_at: row.get("best_score_at"),
        fastest_correct_at: row.get("fastest_correct_at"),
        highest_streak_at: row.get("highest_streak_at"),
        last_updated: row.get("last_updated"),
    }
}
