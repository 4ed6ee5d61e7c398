use shared::{LeaderboardEntry, Result, UserId};
use sqlx::PgPool;
use tracing::debug;

#[derive(Debug, Clone, sqlx::FromRow)]
struct LeaderboardRow {
    rank: i64,
    user_id: uuid::Uuid,
    username: String,
    games_played: i64,
    total_score: i64,
    total_attempts: i64,
    avg_time: f64,
    best_streak: i32,
}

impl From<LeaderboardRow> for LeaderboardEntry {
    fn from(row: LeaderboardRow) -> Self {
        Self {
            rank: row.rank,
            user_id: UserId(row.user_id),
            username: row.username,
            games_played: row.games_played,
            total_score: row.total_score,
            total_attempts: row.total_attempts,
            avg_time: row.avg_time,
            best_streak: row.best_streak,
        }
    }
}

/// Completed sessions summed per player, densely ranked by total score.
const RANKED_PLAYERS: &str = r#"
    SELECT
        DENSE_RANK() OVER (ORDER BY SUM(gs.total_score) DESC) AS rank,
        u.id AS user_id,
        u.username,
        COUNT(gs.id) AS games_played,
        SUM(gs.total_score)::BIGINT AS total_score,
        SUM(gs.total_attempts)::BIGINT AS total_attempts,
        AVG(gs.avg_drawing_time_ms)::FLOAT8 AS avg_time,
        MAX(gs.streak_count) AS best_streak
    FROM users u
    JOIN game_sessions gs ON gs.user_id = u.id
    WHERE gs.end_time IS NOT NULL
    GROUP BY u.id, u.username
"#;

#[derive(Clone)]
pub struct LeaderboardRepository {
    pool: PgPool,
}

impl LeaderboardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get_leaderboard(&self, limit: i64, offset: i64) -> Result<Vec<LeaderboardEntry>> {
        let rows = sqlx::query_as::<_, LeaderboardRow>(&format!(
            r#"
            SELECT * FROM ({}) ranked
            ORDER BY rank, username
            LIMIT $1 OFFSET $2
            "#,
            RANKED_PLAYERS
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        debug!("Fetched {} leaderboard entries", rows.len());
        Ok(rows.into_iter().map(LeaderboardEntry::from).collect())
    }

    /// The player's own entry, `None` until they complete a session.
    pub async fn get_user_rank(&self, user_id: &UserId) -> Result<Option<LeaderboardEntry>> {
        let row = sqlx::query_as::<_, LeaderboardRow>(&format!(
            "SELECT * FROM ({}) ranked WHERE user_id = $1",
            RANKED_PLAYERS
        ))
        .bind(user_id.0)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(LeaderboardEntry::from))
    }
}
