pub mod auth;
pub mod dashboard;
pub mod error;
pub mod game;
pub mod middleware;
pub mod profile;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub use error::{ApiError, ApiResult};
pub use middleware::AuthUser;

async fn health_check() -> &'static str {
    "OK"
}

fn api_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/auth/signup", post(auth::signup))
        .route("/auth/login", post(auth::login))
        .route("/auth/verify", get(auth::verify))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/forgot-password", post(auth::forgot_password))
        .route("/profile/me", get(profile::me))
        .route("/profile/change-password", post(profile::change_password))
        .route("/game/recognize", post(game::recognize))
        .route("/game/session", post(game::start_session))
        .route("/game/attempt", post(game::record_attempt))
        .route("/game/session/{id}/complete", post(game::complete_session))
        .route("/game/leaderboard", get(game::leaderboard))
        .route("/game/leaderboard/me", get(game::my_rank))
        .route("/dashboard/stats/overall", get(dashboard::overall))
        .route("/dashboard/stats/weekly", get(dashboard::weekly))
        .route("/dashboard/stats/difficulty", get(dashboard::difficulty))
        .route("/dashboard/stats/performance", get(dashboard::performance))
        .route("/dashboard/activities/recent", get(dashboard::recent_activities))
        .route("/dashboard/sessions", get(dashboard::sessions))
        .route("/dashboard/sessions/{id}", get(dashboard::session_detail))
        .with_state(state)
}

pub fn build_router(state: AppState) -> Router {
    let state = Arc::new(state);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_routes(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
