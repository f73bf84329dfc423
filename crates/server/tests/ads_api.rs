use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use server::routes::{self, ads::AdsState};
use service::ads::{repository::mock::MockAdRepository, AdService};

fn build_app() -> (Router, Arc<MockAdRepository>) {
    let repo = Arc::new(MockAdRepository::default());
    let ads = AdService::new(repo.clone());
    (routes::build_ads_router(AdsState { ads }), repo)
}

async fn send(app: &Router, req: Request<Body>) -> anyhow::Result<(StatusCode, Value)> {
    let resp = app.clone().oneshot(req).await?;
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await?;
    let body = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes)? };
    Ok((status, body))
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().method("GET").uri(uri).body(Body::empty()).unwrap()
}

fn post_form(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn create(app: &Router, body: &str) -> anyhow::Result<String> {
    let (status, json) = send(app, post_form("/ads/create", body)).await?;
    assert_eq!(status, StatusCode::OK, "{json}");
    Ok(json["id"].as_str().unwrap().to_string())
}

#[tokio::test]
async fn health_reports_ok() -> anyhow::Result<()> {
    let (app, _) = build_app();
    let (status, body) = send(&app, get("/ads/health")).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn create_then_list_public_and_mine() -> anyhow::Result<()> {
    let (app, _) = build_app();
    create(&app, "apartment=7&title=Old&content=x&student_id=S2").await?;
    let id = create(&app, "apartment=101&author=Ann&title=Room&content=desc&student_id=S1").await?;
    assert_eq!(id.len(), 24);

    let (status, list) = send(&app, get("/ads")).await?;
    assert_eq!(status, StatusCode::OK);
    let list = list.as_array().unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0]["id"], id.as_str());
    assert_eq!(list[0]["apartment"], 101);
    assert_eq!(list[0]["author"], "Ann");
    assert_eq!(list[0]["hidden"], false);
    assert!(list[0]["created_at"].is_string());

    let (_, mine) = send(&app, get("/ads/mine?student_id=S1")).await?;
    assert_eq!(mine.as_array().unwrap().len(), 1);
    let (_, other) = send(&app, get("/ads/mine?student_id=S3")).await?;
    assert!(other.as_array().unwrap().is_empty());
    Ok(())
}

#[tokio::test]
async fn create_with_bad_input_is_client_error() -> anyhow::Result<()> {
    let (app, repo) = build_app();
    let (status, body) = send(&app, post_form("/ads/create", "apartment=ten&title=T&content=C&student_id=S1")).await?;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("apartment"));

    let (status, _) = send(&app, post_form("/ads/create", "apartment=1&content=C&student_id=S1")).await?;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(repo.snapshot().await.is_empty());
    Ok(())
}

#[tokio::test]
async fn toggle_hide_and_delete_respect_ownership() -> anyhow::Result<()> {
    let (app, _) = build_app();
    let id = create(&app, "apartment=101&title=Room&content=desc&student_id=S1").await?;

    let (status, body) = send(&app, post_form(&format!("/ads/{id}/toggle_hide"), "student_id=S2")).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "ad not found");

    let (status, body) = send(&app, post_form(&format!("/ads/{id}/toggle_hide"), "student_id=S1")).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!({"message": "updated", "hidden": true}));

    let (_, public) = send(&app, get("/ads")).await?;
    assert!(public.as_array().unwrap().is_empty());
    let (_, mine) = send(&app, get("/ads/mine?student_id=S1")).await?;
    assert_eq!(mine[0]["hidden"], true);

    let (status, _) = send(&app, post_form(&format!("/ads/{id}/delete"), "student_id=S2")).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, body) = send(&app, post_form(&format!("/ads/{id}/delete"), "student_id=S1")).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "deleted");
    let (_, mine) = send(&app, get("/ads/mine?student_id=S1")).await?;
    assert!(mine.as_array().unwrap().is_empty());
    Ok(())
}

#[tokio::test]
async fn unknown_and_malformed_ids_are_not_found() -> anyhow::Result<()> {
    let (app, _) = build_app();
    let (status, _) = send(&app, post_form("/ads/65f0a1b2c3d4e5f601234567/delete", "student_id=S1")).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, post_form("/ads/garbage/toggle_hide", "student_id=S1")).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}
