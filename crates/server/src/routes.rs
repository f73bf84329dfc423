use axum::{
    routing::{get, post},
    Json, Router,
};

use common::{types::Health, utils::http::with_tracing};

pub mod ads;
pub mod auth;

pub async fn health() -> Json<Health> {
    Json(Health::ok())
}

/// Router of the ads service.
pub fn build_ads_router(state: ads::AdsState) -> Router {
    let router = Router::new()
        .route("/ads/health", get(health))
        .route("/ads", get(ads::list_public))
        .route("/ads/mine", get(ads::list_mine))
        .route("/ads/create", post(ads::create))
        .route("/ads/:id/delete", post(ads::delete))
        .route("/ads/:id/toggle_hide", post(ads::toggle_hide))
        .with_state(state);
    with_tracing(router)
}

/// Router of the auth service.
pub fn build_auth_router(state: auth::AuthState) -> Router {
    let router = Router::new()
        .route("/auth/health", get(health))
        .route("/login", post(auth::login))
        .with_state(state);
    with_tracing(router)
}
