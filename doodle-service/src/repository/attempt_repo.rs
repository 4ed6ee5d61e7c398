use shared::{
    AttemptId, AttemptSummary, Difficulty, NewAttempt, Result, ServiceError, SessionId,
};
use sqlx::postgres::PgRow;
use sqlx::{PgConnection, PgPool, Row};

use crate::domain::AttemptOutcome;

#[derive(Clone)]
pub struct AttemptRepository {
    pool: PgPool,
}

impl AttemptRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Append an attempt to an in-progress session owned by the attempt's user.
    ///
    /// The insert selects from the session row under `FOR SHARE`, so it waits for a
    /// concurrent completion and then sees the session as finished.
    pub async fn record_attempt(&self, attempt: &NewAttempt) -> Result<AttemptId> {
        let row = sqlx::query(
            r#"
            INSERT INTO drawing_attempts (
                session_id, user_id, word_prompt, difficulty,
                is_correct, drawing_time_ms, recognition_accuracy
            )
            SELECT gs.id, gs.user_id, $3, $4, $5, $6, $7
            FROM game_sessions gs
            WHERE gs.id = $1 AND gs.user_id = $2 AND gs.end_time IS NULL
            FOR SHARE
            RETURNING id
            "#,
        )
        .bind(attempt.session_id.0)
        .bind(attempt.user_id.0)
        .bind(attempt.word_prompt.trim())
        .bind(attempt.difficulty.as_str())
        .bind(attempt.is_correct)
        .bind(attempt.drawing_time_ms)
        .bind(attempt.recognition_accuracy)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(AttemptId(row.get("id"))),
            None => Err(self.rejection_reason(attempt).await?),
        }
    }

    /// Explain why the guarded insert matched no session row.
    async fn rejection_reason(&self, attempt: &NewAttempt) -> Result<ServiceError> {
        let row = sqlx::query(
            r#"
            SELECT user_id, end_time IS NOT NULL AS completed
            FROM game_sessions
            WHERE id = $1
            "#,
        )
        .bind(attempt.session_id.0)
        .fetch_optional(&self.pool)
        .await?;

        let not_found = || ServiceError::SessionNotFound(attempt.session_id.to_string());

        Ok(match row {
            Some(row) if row.get::<uuid::Uuid, _>("user_id") != attempt.user_id.0 => not_found(),
            Some(row) if row.get::<bool, _>("completed") => {
                ServiceError::SessionAlreadyCompleted(attempt.session_id.to_string())
            }
            _ => not_found(),
        })
    }

    /// Attempts of a session in the order they were recorded.
    pub async fn list_for_session(&self, session_id: &SessionId) -> Result<Vec<AttemptSummary>> {
        let rows = sqlx::query(
            r#"
            SELECT id, word_prompt, difficulty, is_correct,
                   drawing_time_ms, recognition_accuracy, created_at
            FROM drawing_attempts
            WHERE session_id = $1
            ORDER BY created_at ASC, seq ASC
            "#,
        )
        .bind(session_id.0)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                Ok(AttemptSummary {
                    id: AttemptId(row.get("id")),
                    word_prompt: row.get("word_prompt"),
                    difficulty: difficulty_from_row(row)?,
                    is_correct: row.get("is_correct"),
                    drawing_time_ms: row.get("drawing_time_ms"),
                    recognition_accuracy: row.get("recognition_accuracy"),
                    created_at: row.get("created_at"),
                })
            })
            .collect()
    }
}

/// The ordered outcome log the aggregator folds over.
pub(crate) async fn load_outcomes(
    conn: &mut PgConnection,
    session_id: &SessionId,
) -> Result<Vec<AttemptOutcome>> {
    let rows = sqlx::query(
        r#"
        SELECT difficulty, is_correct, drawing_time_ms
        FROM drawing_attempts
        WHERE session_id = $1
        ORDER BY created_at ASC, seq ASC
        "#,
    )
    .bind(session_id.0)
    .fetch_all(&mut *conn)
    .await?;

    rows.iter()
        .map(|row| {
            Ok(AttemptOutcome {
                difficulty: difficulty_from_row(row)?,
                is_correct: row.get("is_correct"),
                drawing_time_ms: row.get("drawing_time_ms"),
            })
        })
        .collect()
}

pub(crate) fn difficulty_from_row(row: &PgRow) -> Result<Difficulty> {
    row.get::<String, _>("difficulty")
        .parse()
        .map_err(|e: ServiceError| ServiceError::Database(e.to_string()))
}
