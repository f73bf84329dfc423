//! HTML surface of the gateway.
//!
//! Identity is the `student_id` carried in query strings and form fields; the
//! gateway keeps no session. Mutations answer with a 302 back to a list page.

use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use common::types::{Ad, CreateAdForm, Health, StudentForm};
use common::utils::http::with_tracing;
use reqwest::Url;
use tracing::{info, warn};

use crate::observability::{self, ADS_CREATED_TOTAL, LOGINS_REJECTED_TOTAL};
use crate::upstream::{AdsClient, AuthClient, UpstreamError};
use crate::views::{
    render, AdsTemplate, CreateAdTemplate, LoginTemplate, MyAdsTemplate, CREATE_ERROR, LIST_ERROR, LOGIN_ERROR,
};

#[derive(Clone)]
pub struct GatewayState {
    pub auth: AuthClient,
    pub ads: AdsClient,
}

pub fn build_router(state: GatewayState) -> Router {
    let router = Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .route("/login", get(login_page).post(login_submit))
        .route("/ads", get(ads_page))
        .route("/ads/create", get(create_page).post(create_submit))
        .route("/ads/mine", get(my_ads_page))
        .route("/ads/:id/delete", post(delete_submit))
        .route("/ads/:id/toggle_hide", post(toggle_hide_submit))
        .with_state(state);
    with_tracing(router)
}

async fn health() -> Json<Health> {
    Json(Health::ok())
}

async fn metrics() -> impl IntoResponse {
    observability::encode_metrics()
}

async fn login_page() -> Response {
    render(&LoginTemplate { error: None })
}

async fn login_submit(State(state): State<GatewayState>, Form(form): Form<StudentForm>) -> Response {
    match state.auth.login(&form.student_id).await {
        Ok(()) => redirect("/ads", &form.student_id),
        Err(e) => {
            LOGINS_REJECTED_TOTAL.inc();
            if e.status() != Some(StatusCode::UNAUTHORIZED) {
                upstream_failed("auth", &e);
            }
            info!(student_id = %form.student_id, "login_rejected");
            render(&LoginTemplate { error: Some(LOGIN_ERROR) })
        }
    }
}

async fn ads_page(State(state): State<GatewayState>, Query(q): Query<StudentForm>) -> Response {
    let (ads, error) = fetch_public(&state.ads).await;
    render(&AdsTemplate { ads: &ads, student_id: &q.student_id, error })
}

async fn create_page(Query(q): Query<StudentForm>) -> Response {
    render(&CreateAdTemplate { student_id: &q.student_id, error: None })
}

async fn create_submit(State(state): State<GatewayState>, Form(form): Form<CreateAdForm>) -> Response {
    let student_id = form.student_id.clone().unwrap_or_default();
    match state.ads.create(&form).await {
        Ok(id) => {
            ADS_CREATED_TOTAL.inc();
            info!(ad_id = %id, %student_id, "ad_created");
            redirect("/ads", &student_id)
        }
        Err(e) => {
            upstream_failed("ads", &e);
            render(&CreateAdTemplate { student_id: &student_id, error: Some(CREATE_ERROR) })
        }
    }
}

/// Ads shown here are the public list narrowed to the caller, so hidden ads
/// do not appear.
async fn my_ads_page(State(state): State<GatewayState>, Query(q): Query<StudentForm>) -> Response {
    let (mut ads, error) = fetch_public(&state.ads).await;
    ads.retain(|ad| ad.student_id == q.student_id);
    render(&MyAdsTemplate { ads: &ads, student_id: &q.student_id, error })
}

async fn delete_submit(
    State(state): State<GatewayState>,
    Path(ad_id): Path<String>,
    Form(form): Form<StudentForm>,
) -> Response {
    if let Err(e) = state.ads.delete(&ad_id, &form.student_id).await {
        mutation_failed(&ad_id, &e);
    }
    redirect("/ads/mine", &form.student_id)
}

async fn toggle_hide_submit(
    State(state): State<GatewayState>,
    Path(ad_id): Path<String>,
    Form(form): Form<StudentForm>,
) -> Response {
    if let Err(e) = state.ads.toggle_hide(&ad_id, &form.student_id).await {
        mutation_failed(&ad_id, &e);
    }
    redirect("/ads/mine", &form.student_id)
}

async fn fetch_public(ads: &AdsClient) -> (Vec<Ad>, Option<&'static str>) {
    match ads.list_public().await {
        Ok(list) => (list, None),
        Err(e) => {
            upstream_failed("ads", &e);
            (Vec::new(), Some(LIST_ERROR))
        }
    }
}

fn upstream_failed(upstream: &str, e: &UpstreamError) {
    observability::upstream_error(upstream);
    warn!(upstream, error = %e, "upstream_error");
}

// missing and foreign ads both come back as 404
fn mutation_failed(ad_id: &str, e: &UpstreamError) {
    if e.status() == Some(StatusCode::NOT_FOUND) {
        info!(%ad_id, "ad not found for caller");
    } else {
        upstream_failed("ads", e);
    }
}

/// `path?student_id=...` with the id form-encoded.
pub fn location(path: &str, student_id: &str) -> String {
    match Url::parse_with_params(&format!("http://gateway{path}"), [("student_id", student_id)]) {
        Ok(url) => format!("{}?{}", url.path(), url.query().unwrap_or_default()),
        Err(_) => path.to_string(),
    }
}

fn redirect(path: &str, student_id: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location(path, student_id))]).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_encodes_student_id() {
        assert_eq!(location("/ads", "1001"), "/ads?student_id=1001");
        assert_eq!(location("/ads/mine", "a b&c=d"), "/ads/mine?student_id=a+b%26c%3Dd");
    }

    #[test]
    fn redirect_is_found_with_location() {
        let resp = redirect("/ads", "S1");
        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(resp.headers()[header::LOCATION], "/ads?student_id=S1");
    }
}
