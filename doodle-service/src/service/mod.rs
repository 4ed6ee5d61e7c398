pub mod auth;
pub mod auth_service;
pub mod dashboard_service;
pub mod leaderboard_service;
pub mod profile_service;
pub mod recognition;
pub mod session_service;

pub use auth_service::{AuthService, AuthToken};
pub use dashboard_service::DashboardService;
pub use leaderboard_service::LeaderboardService;
pub use profile_service::ProfileService;
pub use recognition::{DoodleRecognizer, GeminiRecognizer, Recognition, RecognitionService};
pub use session_service::SessionService;
