mod common;

use anyhow::Result;
use common::{create_test_user, play_session, totals};
use doodle_service::repository::{MetricsRepository, SessionRepository, UserRepository};
use shared::{Email, ServiceError, UserId, Username};
use sqlx::PgPool;

#[sqlx::test(migrations = "../migrations")]
async fn test_create_user_initializes_metrics(pool: PgPool) -> Result<()> {
    let user = create_test_user(&pool, "create").await?;

    assert_eq!(user.username.as_str(), "kid_create");
    assert_eq!(user.email.as_str(), "create@doodle.test");

    let metrics = MetricsRepository::new(pool)
        .get(&user.id)
        .await?
        .expect("metrics row created at signup");
    assert_eq!(metrics.total_games_played, 0);
    assert_eq!(metrics.current_level, 1);
    assert_eq!(metrics.fastest_correct_ms, None);

    Ok(())
}

#[sqlx::test(migrations = "../migrations")]
async fn test_duplicate_username_is_conflict(pool: PgPool) -> Result<()> {
    let repo = UserRepository::new(pool.clone());
    create_test_user(&pool, "dup").await?;

    let result = repo
        .create_user(
            &Username::new("kid_dup")?,
            &Email::new("other@doodle.test")?,
            "Other",
            "hash",
        )
        .await;

    assert!(matches!(result, Err(ServiceError::UserAlreadyExists(_))));

    Ok(())
}

#[sqlx::test(migrations = "../migrations")]
async fn test_duplicate_email_is_conflict(pool: PgPool) -> Result<()> {
    let repo = UserRepository::new(pool.clone());
    create_test_user(&pool, "mail").await?;

    let result = repo
        .create_user(
            &Username::new("someone_else")?,
            &Email::new("MAIL@doodle.test")?,
            "Other",
            "hash",
        )
        .await;

    match result {
        Err(ServiceError::UserAlreadyExists(msg)) => assert!(msg.contains("Email")),
        other => panic!("expected UserAlreadyExists, got {:?}", other),
    }

    // No half-created user left behind.
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM user_metrics")
        .fetch_one(&pool)
        .await?;
    assert_eq!(count, 1);

    Ok(())
}

#[sqlx::test(migrations = "../migrations")]
async fn test_lookups(pool: PgPool) -> Result<()> {
    let repo = UserRepository::new(pool.clone());
    let user = create_test_user(&pool, "lookup").await?;

    let by_email = repo.get_by_email(&Email::new(" Lookup@Doodle.test ")?).await?;
    assert_eq!(by_email.id, user.id);

    let credentials = repo.get_credentials_by_username("kid_lookup").await?;
    assert_eq!(credentials.user.id, user.id);
    assert!(credentials.password_hash.starts_with("$argon2id$"));

    let missing = repo.get_credentials_by_username("nobody").await;
    assert!(matches!(missing, Err(ServiceError::UserNotFound(_))));

    let missing = repo.get_by_id(&UserId::new()).await;
    assert!(matches!(missing, Err(ServiceError::UserNotFound(_))));

    Ok(())
}

#[sqlx::test(migrations = "../migrations")]
async fn test_update_password(pool: PgPool) -> Result<()> {
    let repo = UserRepository::new(pool.clone());
    let user = create_test_user(&pool, "pw").await?;

    repo.update_password(&user.id, "new-hash").await?;
    let credentials = repo.get_credentials_by_id(&user.id).await?;
    assert_eq!(credentials.password_hash, "new-hash");

    let result = repo.update_password(&UserId::new(), "x").await;
    assert!(matches!(result, Err(ServiceError::UserNotFound(_))));

    Ok(())
}

#[sqlx::test(migrations = "../migrations")]
async fn test_profile_reports_accuracy_percentage(pool: PgPool) -> Result<()> {
    let repo = UserRepository::new(pool.clone());
    let user = create_test_user(&pool, "profile").await?;

    let profile = repo.get_profile(&user.id).await?;
    assert_eq!(profile.average_accuracy, 0.0);
    assert_eq!(profile.current_level, 1);

    let session = play_session(&pool, &user, &[(true, 1000), (false, 1000), (false, 1000)]).await?;
    SessionRepository::new(pool.clone())
        .complete_session(&session.id, None, &totals(1, 3, 30))
        .await?;

    let profile = repo.get_profile(&user.id).await?;
    assert_eq!(profile.total_games_played, 1);
    assert_eq!(profile.total_attempts, 3);
    assert_eq!(profile.successful_attempts, 1);
    assert_eq!(profile.average_accuracy, 33.33);
    assert_eq!(profile.highest_score, 1);
    assert_eq!(profile.total_time_spent_seconds, 30);

    Ok(())
}
