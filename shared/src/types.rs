use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{Result, ServiceError};

macro_rules! uuid_id {
    ($name:ident, $label:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn from_string(s: &str) -> Result<Self> {
                Uuid::parse_str(s)
                    .map($name)
                    .map_err(|e| ServiceError::Validation(format!(concat!("Invalid ", $label, ": {}"), e)))
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

uuid_id!(UserId, "user ID");
uuid_id!(SessionId, "session ID");
uuid_id!(AttemptId, "attempt ID");

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Username(String);

impl Username {
    const MIN_LENGTH: usize = 3;
    const MAX_LENGTH: usize = 20;

    pub fn new(username: impl Into<String>) -> Result<Self> {
        let username = username.into();
        Self::validate(&username)?;
        Ok(Self(username))
    }

    fn validate(username: &str) -> Result<()> {
        let length = username.chars().count();
        if length < Self::MIN_LENGTH {
            return Err(ServiceError::InvalidUsername(format!(
                "Username must be at least {} characters",
                Self::MIN_LENGTH
            )));
        }

        if length > Self::MAX_LENGTH {
            return Err(ServiceError::InvalidUsername(format!(
                "Username must be at most {} characters",
                Self::MAX_LENGTH
            )));
        }

        if !username
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '-')
        {
            return Err(ServiceError::InvalidUsername(
                "Username can only contain letters, numbers, underscores, and hyphens".to_string(),
            ));
        }

        Ok(())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Username {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    pub fn new(email: impl Into<String>) -> Result<Self> {
        let email = email.into().trim().to_lowercase();
        match email.split_once('@') {
            Some((local, domain))
                if !local.is_empty() && !domain.is_empty() && !domain.contains('@') =>
            {
                Ok(Self(email))
            }
            _ => Err(ServiceError::Validation(format!("Invalid email address: {}", email))),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Email {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "EASY",
            Difficulty::Medium => "MEDIUM",
            Difficulty::Hard => "HARD",
        }
    }

    /// Experience granted for one correct drawing at this difficulty.
    pub fn experience(&self) -> i64 {
        match self {
            Difficulty::Easy => 10,
            Difficulty::Medium => 20,
            Difficulty::Hard => 30,
        }
    }
}

impl std::str::FromStr for Difficulty {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "EASY" => Ok(Difficulty::Easy),
            "MEDIUM" => Ok(Difficulty::Medium),
            "HARD" => Ok(Difficulty::Hard),
            other => Err(ServiceError::Validation(format!("Unknown difficulty: {}", other))),
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: Username,
    pub email: Email,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSession {
    pub id: SessionId,
    pub user_id: UserId,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub total_score: i32,
    pub total_attempts: i32,
    pub successful_attempts: i32,
    pub avg_drawing_time_ms: i32,
    pub streak_count: i32,
    pub total_time_seconds: i32,
}

impl GameSession {
    pub fn is_in_progress(&self) -> bool {
        self.end_time.is_none()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAttempt {
    pub session_id: SessionId,
    pub user_id: UserId,
    pub word_prompt: String,
    pub difficulty: Difficulty,
    pub is_correct: bool,
    pub drawing_time_ms: i32,
    pub recognition_accuracy: f64,
}

impl NewAttempt {
    pub fn validate(&self) -> Result<()> {
        if self.word_prompt.trim().is_empty() {
            return Err(ServiceError::Validation("Word prompt must not be empty".to_string()));
        }
        if self.drawing_time_ms < 0 {
            return Err(ServiceError::Validation(
                "Drawing time must not be negative".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.recognition_accuracy) {
            return Err(ServiceError::Validation(
                "Recognition accuracy must be between 0 and 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Totals declared by the client when it finishes a game.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SessionTotals {
    pub total_score: i32,
    pub total_attempts: i32,
    pub total_time_seconds: i32,
}

impl SessionTotals {
    pub fn validate(&self) -> Result<()> {
        if self.total_score < 0 || self.total_attempts < 0 || self.total_time_seconds < 0 {
            return Err(ServiceError::Validation(
                "Session totals must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserMetrics {
    pub user_id: UserId,
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
    pub best_score_at: Option<DateTime<Utc>>,
    pub fastest_correct_at: Option<DateTime<Utc>>,
    pub highest_streak_at: Option<DateTime<Utc>>,
    pub last_updated: DateTime<Utc>,
}
