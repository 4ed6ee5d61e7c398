#![allow(dead_code)]

use doodle_service::repository::{AttemptRepository, SessionRepository, UserRepository};
use shared::{
    Difficulty, Email, GameSession, NewAttempt, SessionId, SessionTotals, User, UserId, Username,
};
use sqlx::PgPool;

pub async fn create_test_user(pool: &PgPool, suffix: &str) -> anyhow::Result<User> {
    let repo = UserRepository::new(pool.clone());
    let username = Username::new(format!("kid_{}", suffix))?;
    let email = Email::new(format!("{}@doodle.test", suffix))?;

    Ok(repo
        .create_user(&username, &email, "Test Kid", "$argon2id$not-a-real-hash")
        .await?)
}

pub fn attempt(
    session_id: &SessionId,
    user_id: &UserId,
    difficulty: Difficulty,
    is_correct: bool,
    drawing_time_ms: i32,
) -> NewAttempt {
    NewAttempt {
        session_id: *session_id,
        user_id: *user_id,
        word_prompt: "cat".to_string(),
        difficulty,
        is_correct,
        drawing_time_ms,
        recognition_accuracy: if is_correct { 0.9 } else { 0.2 },
    }
}

/// Start a session and record EASY attempts from `(is_correct, drawing_time_ms)` pairs.
pub async fn play_session(
    pool: &PgPool,
    user: &User,
    outcomes: &[(bool, i32)],
) -> anyhow::Result<GameSession> {
    let session_repo = SessionRepository::new(pool.clone());
    let attempt_repo = AttemptRepository::new(pool.clone());

    let session = session_repo.create_session(&user.id).await?;
    for &(is_correct, ms) in outcomes {
        attempt_repo
            .record_attempt(&attempt(&session.id, &user.id, Difficulty::Easy, is_correct, ms))
            .await?;
    }

    Ok(session)
}

pub fn totals(total_score: i32, total_attempts: i32, total_time_seconds: i32) -> SessionTotals {
    SessionTotals {
        total_score,
        total_attempts,
        total_time_seconds,
    }
}

pub async fn count_attempts(pool: &PgPool) -> anyhow::Result<i64> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM drawing_attempts")
        .fetch_one(pool)
        .await?;
    Ok(count)
}
