use std::time::Instant;

use shared::{
    AttemptId, Difficulty, GameSession, NewAttempt, Result, SessionId, SessionTotals, UserId,
};

use crate::repository::{AttemptRepository, CompletedSession, SessionRepository};

/// Game flow: start a session, append attempts, complete it once.
pub struct SessionService {
    session_repo: SessionRepository,
    attempt_repo: AttemptRepository,
}

impl SessionService {
    pub fn new(session_repo: SessionRepository, attempt_repo: AttemptRepository) -> Self {
        Self {
            session_repo,
            attempt_repo,
        }
    }

    pub async fn start_session(&self, user_id: &UserId) -> Result<GameSession> {
        let session = self.session_repo.create_session(user_id).await?;

        tracing::info!(
            user_id = %user_id,
            session_id = %session.id,
            "Game session started"
        );
        shared::record_counter("doodle_sessions_started_total", 1);

        Ok(session)
    }

    #[allow(clippy::too_many_arguments)]
    #[tracing::instrument(skip_all, fields(session_id = %session_id, user_id = %user_id))]
    pub async fn record_attempt(
        &self,
        session_id: &SessionId,
        user_id: &UserId,
        word_prompt: &str,
        difficulty: Difficulty,
        is_correct: bool,
        drawing_time_ms: i32,
        recognition_accuracy: f64,
    ) -> Result<AttemptId> {
        let attempt = NewAttempt {
            session_id: *session_id,
            user_id: *user_id,
            word_prompt: word_prompt.to_string(),
            difficulty,
            is_correct,
            drawing_time_ms,
            recognition_accuracy,
        };
        attempt.validate()?;

        let attempt_id = self.attempt_repo.record_attempt(&attempt).await?;

        tracing::debug!(attempt_id = %attempt_id, is_correct, "Drawing attempt recorded");
        shared::record_counter("doodle_attempts_recorded_total", 1);

        Ok(attempt_id)
    }

    /// Finalize the session and merge it into the owner's lifetime metrics.
    ///
    /// `caller` restricts completion to the session owner; `None` skips the check.
    #[tracing::instrument(skip_all, fields(session_id = %session_id))]
    pub async fn complete_session(
        &self,
        session_id: &SessionId,
        caller: Option<&UserId>,
        totals: &SessionTotals,
    ) -> Result<CompletedSession> {
        totals.validate()?;

        let start = Instant::now();
        let completed = self
            .session_repo
            .complete_session(session_id, caller, totals)
            .await?;
        shared::record_timing(
            "doodle_session_completion_seconds",
            start.elapsed().as_secs_f64(),
        );

        tracing::info!(
            user_id = %completed.user_id,
            session_id = %session_id,
            correct = completed.summary.successful_attempts,
            attempts = completed.summary.total_attempts,
            streak = completed.summary.streak,
            "Game session completed"
        );
        shared::record_counter("doodle_sessions_completed_total", 1);

        Ok(completed)
    }
}
