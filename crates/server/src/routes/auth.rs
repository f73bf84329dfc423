use axum::{extract::State, Form, Json};

use common::types::{LoginAccepted, StudentForm};
use service::auth::AuthService;

use crate::errors::ApiError;

#[derive(Clone)]
pub struct AuthState {
    pub auth: AuthService,
}

pub async fn login(
    State(state): State<AuthState>,
    Form(form): Form<StudentForm>,
) -> Result<Json<LoginAccepted>, ApiError> {
    let student_id = state.auth.login(&form.student_id)?;
    Ok(Json(LoginAccepted { student_id }))
}
