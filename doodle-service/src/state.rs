use std::sync::Arc;

use shared::AuthConfig;
use sqlx::PgPool;

use crate::repository::{
    AttemptRepository, DashboardRepository, LeaderboardRepository, SessionRepository,
    TokenRepository, UserRepository,
};
use crate::service::{
    AuthService, DashboardService, DoodleRecognizer, LeaderboardService, ProfileService,
    RecognitionService, SessionService,
};

/// Services shared by every request handler.
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub sessions: Arc<SessionService>,
    pub dashboard: Arc<DashboardService>,
    pub leaderboard: Arc<LeaderboardService>,
    pub profile: Arc<ProfileService>,
    pub recognition: Arc<RecognitionService>,
}

impl AppState {
    pub fn new(
        pool: PgPool,
        auth_config: AuthConfig,
        leaderboard_size: i64,
        recognizer: Arc<dyn DoodleRecognizer>,
    ) -> Self {
        let user_repo = UserRepository::new(pool.clone());
        let session_repo = SessionRepository::new(pool.clone());
        let attempt_repo = AttemptRepository::new(pool.clone());

        Self {
            auth: Arc::new(AuthService::new(
                user_repo.clone(),
                TokenRepository::new(pool.clone()),
                auth_config,
            )),
            sessions: Arc::new(SessionService::new(
                session_repo.clone(),
                attempt_repo.clone(),
            )),
            dashboard: Arc::new(DashboardService::new(
                DashboardRepository::new(pool.clone()),
                session_repo,
                attempt_repo,
            )),
            leaderboard: Arc::new(LeaderboardService::new(
                LeaderboardRepository::new(pool),
                leaderboard_size,
            )),
            profile: Arc::new(ProfileService::new(user_repo)),
            recognition: Arc::new(RecognitionService::new(recognizer)),
        }
    }
}
