mod common;

use anyhow::Result;
use common::{attempt, count_attempts, create_test_user, play_session, totals};
use doodle_service::repository::{AttemptRepository, SessionRepository};
use shared::{Difficulty, ServiceError, SessionId};
use sqlx::PgPool;

#[sqlx::test(migrations = "../migrations")]
async fn test_record_attempt_for_missing_session(pool: PgPool) -> Result<()> {
    let user = create_test_user(&pool, "orphan").await?;
    let repo = AttemptRepository::new(pool.clone());

    let result = repo
        .record_attempt(&attempt(&SessionId::new(), &user.id, Difficulty::Easy, true, 900))
        .await;

    assert!(matches!(result, Err(ServiceError::SessionNotFound(_))));
    assert_eq!(count_attempts(&pool).await?, 0);

    Ok(())
}

#[sqlx::test(migrations = "../migrations")]
async fn test_record_attempt_for_completed_session(pool: PgPool) -> Result<()> {
    let user = create_test_user(&pool, "late").await?;
    let session = play_session(&pool, &user, &[(true, 1000)]).await?;
    SessionRepository::new(pool.clone())
        .complete_session(&session.id, None, &totals(1, 1, 2))
        .await?;

    let result = AttemptRepository::new(pool.clone())
        .record_attempt(&attempt(&session.id, &user.id, Difficulty::Easy, true, 900))
        .await;

    assert!(matches!(result, Err(ServiceError::SessionAlreadyCompleted(_))));
    assert_eq!(count_attempts(&pool).await?, 1);

    Ok(())
}

#[sqlx::test(migrations = "../migrations")]
async fn test_record_attempt_into_foreign_session(pool: PgPool) -> Result<()> {
    let owner = create_test_user(&pool, "mine").await?;
    let other = create_test_user(&pool, "theirs").await?;
    let session = play_session(&pool, &owner, &[]).await?;

    let result = AttemptRepository::new(pool.clone())
        .record_attempt(&attempt(&session.id, &other.id, Difficulty::Hard, true, 900))
        .await;

    assert!(matches!(result, Err(ServiceError::SessionNotFound(_))));
    assert_eq!(count_attempts(&pool).await?, 0);

    Ok(())
}

#[sqlx::test(migrations = "../migrations")]
async fn test_list_for_session_keeps_recording_order(pool: PgPool) -> Result<()> {
    let user = create_test_user(&pool, "order").await?;
    let session = play_session(&pool, &user, &[(true, 300), (false, 200), (true, 100)]).await?;

    let attempts = AttemptRepository::new(pool)
        .list_for_session(&session.id)
        .await?;

    let times: Vec<i32> = attempts.iter().map(|a| a.drawing_time_ms).collect();
    assert_eq!(times, vec![300, 200, 100]);
    assert_eq!(attempts[0].difficulty, Difficulty::Easy);
    assert!(attempts[0].is_correct);
    assert!(!attempts[1].is_correct);

    Ok(())
}
