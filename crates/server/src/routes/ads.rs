use axum::{
    extract::{Path, Query, State},
    Form, Json,
};

use common::types::{Ad, AdCreated, AdDeleted, CreateAdForm, StudentForm, VisibilityToggled};
use service::ads::AdService;

use crate::errors::ApiError;

#[derive(Clone)]
pub struct AdsState {
    pub ads: AdService,
}

pub async fn list_public(State(state): State<AdsState>) -> Result<Json<Vec<Ad>>, ApiError> {
    Ok(Json(state.ads.list_public().await?))
}

pub async fn list_mine(
    State(state): State<AdsState>,
    Query(q): Query<StudentForm>,
) -> Result<Json<Vec<Ad>>, ApiError> {
    Ok(Json(state.ads.list_by_owner(&q.student_id).await?))
}

pub async fn create(
    State(state): State<AdsState>,
    Form(form): Form<CreateAdForm>,
) -> Result<Json<AdCreated>, ApiError> {
    let id = state.ads.create(form).await?;
    Ok(Json(AdCreated { id }))
}

pub async fn delete(
    State(state): State<AdsState>,
    Path(id): Path<String>,
    Form(form): Form<StudentForm>,
) -> Result<Json<AdDeleted>, ApiError> {
    state.ads.delete(&id, &form.student_id).await?;
    Ok(Json(AdDeleted { message: "deleted".into() }))
}

pub async fn toggle_hide(
    State(state): State<AdsState>,
    Path(id): Path<String>,
    Form(form): Form<StudentForm>,
) -> Result<Json<VisibilityToggled>, ApiError> {
    let hidden = state.ads.toggle_hide(&id, &form.student_id).await?;
    Ok(Json(VisibilityToggled { message: "updated".into(), hidden }))
}
