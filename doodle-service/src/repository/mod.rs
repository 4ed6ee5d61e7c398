pub mod attempt_repo;
pub mod dashboard_repo;
pub mod leaderboard_repo;
pub mod metrics_repo;
pub mod session_repo;
pub mod token_repo;
pub mod user_repo;

pub use attempt_repo::AttemptRepository;
pub use dashboard_repo::DashboardRepository;
pub use leaderboard_repo::LeaderboardRepository;
pub use metrics_repo::MetricsRepository;
pub use session_repo::{CompletedSession, SessionRepository};
pub use token_repo::TokenRepository;
pub use user_repo::{UserCredentials, UserRepository};
