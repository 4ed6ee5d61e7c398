pub mod config;
pub mod errors;
pub mod stats;
pub mod telemetry;
pub mod types;

pub use config::{AuthConfig, DatabaseConfig, RecognitionConfig, ServiceConfig};
pub use errors::{ErrorKind, Result, ServiceError};
pub use stats::{
    AttemptSummary, DifficultyStats, LeaderboardEntry, OverallStats, PerformanceMetrics,
    ProfileData, RecentActivity, SessionDetail, WeeklyProgress,
};
pub use telemetry::{init_metrics, init_tracing, record_counter, record_timing};
pub use types::{
    AttemptId, Difficulty, Email, GameSession, NewAttempt, SessionId,
    SessionTotals, User, UserId, UserMetrics, Username,
};
