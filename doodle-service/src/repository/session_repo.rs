use shared::{GameSession, Result, ServiceError, SessionId, SessionTotals, UserId};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::domain::{summarize, SessionSummary};
use crate::repository::{attempt_repo, metrics_repo};

const SESSION_COLUMNS: &str = "id, user_id, start_time, end_time, total_score, total_attempts, \
     successful_attempts, avg_drawing_time_ms, streak_count, total_time_seconds";

/// Result of a committed session completion.
#[derive(Debug, Clone)]
pub struct CompletedSession {
    pub user_id: UserId,
    pub session: GameSession,
    pub summary: SessionSummary,
}

#[derive(Clone)]
pub struct SessionRepository {
    pool: PgPool,
}

impl SessionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create_session(&self, user_id: &UserId) -> Result<GameSession> {
        let row = sqlx::query(&format!(
            "INSERT INTO game_sessions (user_id) VALUES ($1) RETURNING {}",
            SESSION_COLUMNS
        ))
        .bind(user_id.0)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_foreign_key_violation() {
                    return ServiceError::UserNotFound(user_id.to_string());
                }
            }
            ServiceError::from(e)
        })?;

        Ok(session_from_row(&row))
    }

    pub async fn get_by_id(&self, session_id: &SessionId) -> Result<GameSession> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM game_sessions WHERE id = $1",
            SESSION_COLUMNS
        ))
        .bind(session_id.0)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| ServiceError::SessionNotFound(session_id.to_string()))?;

        Ok(session_from_row(&row))
    }

    /// Fetch a session only if `user_id` owns it.
    pub async fn get_for_user(
        &self,
        user_id: &UserId,
        session_id: &SessionId,
    ) -> Result<GameSession> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM game_sessions WHERE id = $1 AND user_id = $2",
            SESSION_COLUMNS
        ))
        .bind(session_id.0)
        .bind(user_id.0)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| ServiceError::SessionNotFound(session_id.to_string()))?;

        Ok(session_from_row(&row))
    }

    /// Completed sessions, newest first.
    pub async fn list_completed_for_user(
        &self,
        user_id: &UserId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<GameSession>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {}
            FROM game_sessions
            WHERE user_id = $1 AND end_time IS NOT NULL
            ORDER BY start_time DESC
            LIMIT $2 OFFSET $3
            "#,
            SESSION_COLUMNS
        ))
        .bind(user_id.0)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(session_from_row).collect())
    }

    /// Finalize a session and fold it into the owner's metrics atomically.
    ///
    /// The session row is locked first, so two completions of the same session
    /// serialize and the second one sees `end_time` already set. When `caller` is
    /// given, a session owned by someone else is reported as not found.
    pub async fn complete_session(
        &self,
        session_id: &SessionId,
        caller: Option<&UserId>,
        totals: &SessionTotals,
    ) -> Result<CompletedSession> {
        let mut tx = self.pool.begin().await?;

        let locked = sqlx::query(
            r#"
            SELECT user_id, end_time IS NOT NULL AS completed
            FROM game_sessions
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(session_id.0)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| ServiceError::SessionNotFound(session_id.to_string()))?;

        let user_id = UserId(locked.get("user_id"));
        if caller.is_some_and(|caller| *caller != user_id) {
            return Err(ServiceError::SessionNotFound(session_id.to_string()));
        }
        if locked.get::<bool, _>("completed") {
            return Err(ServiceError::SessionAlreadyCompleted(session_id.to_string()));
        }

        let outcomes = attempt_repo::load_outcomes(&mut *tx, session_id).await?;
        let summary = summarize(&outcomes);

        let row = sqlx::query(&format!(
            r#"
            UPDATE game_sessions
            SET end_time = NOW(),
                total_score = $2,
                total_attempts = $3,
                total_time_seconds = $4,
                successful_attempts = $5,
                streak_count = $6,
                avg_drawing_time_ms = $7
            WHERE id = $1
            RETURNING {}
            "#,
            SESSION_COLUMNS
        ))
        .bind(session_id.0)
        .bind(totals.total_score)
        .bind(totals.total_attempts)
        .bind(totals.total_time_seconds)
        .bind(summary.successful_attempts)
        .bind(summary.streak)
        .bind(summary.avg_drawing_time_ms)
        .fetch_one(&mut *tx)
        .await?;

        metrics_repo::merge_completed_session(&mut *tx, &user_id, totals, &summary).await?;

        tx.commit().await?;

        Ok(CompletedSession {
            user_id,
            session: session_from_row(&row),
            summary,
        })
    }
}

fn session_from_row(row: &PgRow) -> GameSession {
    GameSession {
        id: SessionId(row.get("id")),
        user_id: UserId(row.get("user_id")),
        start_time: row.get("start_time"),
        end_time: row.get("end_time"),
        total_score: row.get("total_score"),
        total_attempts: row.get("total_attempts"),
        successful_attempts: row.get("successful_attempts"),
        avg_drawing_time_ms: row.get("avg_drawing_time_ms"),
        streak_count: row.get("streak_count"),
        total_time_seconds: row.get("total_time_seconds"),
    }
}
