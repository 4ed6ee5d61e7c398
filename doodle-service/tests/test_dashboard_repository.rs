mod common;

use anyhow::Result;
use common::{attempt, create_test_user, play_session, totals};
use doodle_service::repository::{
    AttemptRepository, DashboardRepository, LeaderboardRepository, SessionRepository,
};
use shared::{Difficulty, ServiceError};
use sqlx::PgPool;

#[sqlx::test(migrations = "../migrations")]
async fn test_overall_stats_for_new_user(pool: PgPool) -> Result<()> {
    let user = create_test_user(&pool, "fresh").await?;
    let repo = DashboardRepository::new(pool.clone());

    let stats = repo.overall_stats(&user.id).await?;
    assert_eq!(stats.total_games_played, 0);
    assert_eq!(stats.overall_accuracy, 0.0);
    assert_eq!(stats.current_level, 1);

    sqlx::query("DELETE FROM user_metrics WHERE user_id = $1")
        .bind(user.id.0)
        .execute(&pool)
        .await?;

    let stats = repo.overall_stats(&user.id).await?;
    assert_eq!(stats.current_level, 1);
    assert_eq!(stats.total_attempts, 0);

    let performance = repo.performance_metrics(&user.id).await;
    assert!(matches!(performance, Err(ServiceError::UserNotFound(_))));

    Ok(())
}

#[sqlx::test(migrations = "../migrations")]
async fn test_stats_after_a_session(pool: PgPool) -> Result<()> {
    let user = create_test_user(&pool, "stats").await?;
    let session_repo = SessionRepository::new(pool.clone());
    let attempt_repo = AttemptRepository::new(pool.clone());
    let repo = DashboardRepository::new(pool.clone());

    let session = session_repo.create_session(&user.id).await?;
    for (difficulty, is_correct, ms) in [
        (Difficulty::Hard, false, 4000),
        (Difficulty::Easy, true, 1000),
        (Difficulty::Easy, true, 2000),
        (Difficulty::Hard, true, 3000),
    ] {
        attempt_repo
            .record_attempt(&attempt(&session.id, &user.id, difficulty, is_correct, ms))
            .await?;
    }
    session_repo
        .complete_session(&session.id, None, &totals(3, 4, 40))
        .await?;

    let overall = repo.overall_stats(&user.id).await?;
    assert_eq!(overall.total_games_played, 1);
    assert!((overall.overall_accuracy - 75.0).abs() < 1e-9);
    assert_eq!(overall.best_score, 3);
    assert_eq!(overall.highest_streak, 3);

    let by_difficulty = repo.difficulty_stats(&user.id).await?;
    let order: Vec<Difficulty> = by_difficulty.iter().map(|d| d.difficulty).collect();
    assert_eq!(order, vec![Difficulty::Easy, Difficulty::Hard]);
    assert_eq!(by_difficulty[0].successful_attempts, 2);
    assert!((by_difficulty[0].avg_time - 1500.0).abs() < 1e-9);
    assert_eq!(by_difficulty[1].total_attempts, 2);

    let weekly = repo.weekly_progress(&user.id).await?;
    assert_eq!(weekly.len(), 1);
    assert_eq!(weekly[0].total_attempts, 4);
    assert!((weekly[0].accuracy - 0.75).abs() < 1e-9);

    let recent = repo.recent_activities(&user.id, 2).await?;
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].drawing_time_ms, 3000);
    assert_eq!(recent[0].session_score, 3);
    assert_eq!(recent[0].session_id, session.id);

    let performance = repo.performance_metrics(&user.id).await?;
    assert_eq!(performance.fastest_correct_ms, Some(1000));
    assert!(performance.best_score_date <= chrono::Utc::now());

    Ok(())
}

#[sqlx::test(migrations = "../migrations")]
async fn test_leaderboard_ranks_by_total_score(pool: PgPool) -> Result<()> {
    let ada = create_test_user(&pool, "ada").await?;
    let bob = create_test_user(&pool, "bob").await?;
    let cy = create_test_user(&pool, "cy").await?;
    let idle = create_test_user(&pool, "idle").await?;
    let sessions = SessionRepository::new(pool.clone());

    for (user, score) in [(&ada, 5), (&ada, 4), (&bob, 9), (&cy, 3)] {
        let session = play_session(&pool, user, &[(true, 1000)]).await?;
        sessions
            .complete_session(&session.id, None, &totals(score, 1, 10))
            .await?;
    }
    // In-progress sessions never count.
    play_session(&pool, &idle, &[(true, 1000)]).await?;

    let repo = LeaderboardRepository::new(pool);
    let board = repo.get_leaderboard(10, 0).await?;

    let ranking: Vec<(&str, i64, i64)> = board
        .iter()
        .map(|e| (e.username.as_str(), e.rank, e.total_score))
        .collect();
    assert_eq!(
        ranking,
        vec![("kid_ada", 1, 9), ("kid_bob", 1, 9), ("kid_cy", 2, 3)]
    );
    assert_eq!(board[0].games_played, 2);
    assert_eq!(board[0].best_streak, 1);

    let top = repo.get_leaderboard(1, 0).await?;
    assert_eq!(top.len(), 1);

    let mine = repo.get_user_rank(&cy.id).await?.expect("ranked");
    assert_eq!(mine.rank, 2);
    assert!(repo.get_user_rank(&idle.id).await?.is_none());

    Ok(())
}
