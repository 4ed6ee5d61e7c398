use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{AttemptId, Difficulty, Email, GameSession, SessionId, UserId, Username};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OverallStats {
    pub total_games_played: i64,
    pub total_attempts: i64,
    pub successful_attempts: i64,
    /// Percentage in `0..=100`.
    pub overall_accuracy: f64,
    pub avg_drawing_time_ms: f64,
    pub current_level: i32,
    pub experience_points: i64,
    pub best_score: i32,
    pub highest_streak: i32,
    pub easy_accuracy: f64,
    pub medium_accuracy: f64,
    pub hard_accuracy: f64,
    pub total_time_spent_seconds: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyProgress {
    pub week_start: DateTime<Utc>,
    pub total_attempts: i64,
    pub successful_attempts: i64,
    pub avg_drawing_time: f64,
    pub accuracy: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DifficultyStats {
    pub difficulty: Difficulty,
    pub total_attempts: i64,
    pub successful_attempts: i64,
    pub avg_time: f64,
    pub avg_accuracy: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecentActivity {
    pub id: AttemptId,
    pub session_id: SessionId,
    pub word_prompt: String,
    pub difficulty: Difficulty,
    pub is_correct: bool,
    pub drawing_time_ms: i32,
    pub recognition_accuracy: f64,
    pub created_at: DateTime<Utc>,
    pub session_score: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    pub total_games_played: i64,
    pub total_attempts: i64,
    pub successful_attempts: i64,
    pub total_time_spent_seconds: i64,
    pub current_level: i32,
    pub experience_points: i64,
    pub best_score: i32,
    pub fastest_correct_ms: Option<i32>,
    pub highest_streak: i32,
    pub easy_accuracy: f64,
    pub medium_accuracy: f64,
    pub hard_accuracy: f64,
    pub avg_drawing_time_ms: f64,
    pub best_score_date: DateTime<Utc>,
    pub fastest_correct_date: DateTime<Utc>,
    pub highest_streak_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttemptSummary {
    pub id: AttemptId,
    pub word_prompt: String,
    pub difficulty: Difficulty,
    pub is_correct: bool,
    pub drawing_time_ms: i32,
    pub recognition_accuracy: f64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionDetail {
    #[serde(flatten)]
    pub session: GameSession,
    pub attempts: Vec<AttemptSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub rank: i64,
    pub user_id: UserId,
    pub username: String,
    pub games_played: i64,
    pub total_score: i64,
    pub total_attempts: i64,
    pub avg_time: f64,
    pub best_streak: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileData {
    pub username: Username,
    pub email: Email,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub total_games_played: i64,
    pub total_attempts: i64,
    pub successful_attempts: i64,
    /// Percentage in `0..=100`, rounded to two decimals.
    pub average_accuracy: f64,
    pub highest_score: i32,
    pub current_level: i32,
    pub experience_points: i64,
    pub total_time_spent_seconds: i64,
}
