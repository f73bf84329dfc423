use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use service::auth::errors::AuthError;
use service::errors::ServiceError;
use tracing::error;

/// Handler error mapped onto a status code and `{"error": msg}` body.
///
/// Not-found and unauthorized carry fixed messages: a caller cannot tell a
/// missing ad from someone else's ad.
#[derive(Debug)]
pub enum ApiError {
    Service(ServiceError),
    Auth(AuthError),
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self { ApiError::Service(e) }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self { ApiError::Auth(e) }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, msg) = match self {
            ApiError::Service(e) if e.is_validation() => (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()),
            ApiError::Service(ServiceError::NotFound(_)) => (StatusCode::NOT_FOUND, "ad not found".to_string()),
            ApiError::Auth(AuthError::Unauthorized) => (StatusCode::UNAUTHORIZED, "unknown student".to_string()),
            ApiError::Service(e) => {
                error!(error = %e, "service error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal error".to_string())
            }
            ApiError::Auth(e) => {
                error!(error = %e, code = e.code(), "auth error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal error".to_string())
            }
        };
        (status, Json(serde_json::json!({"error": msg}))).into_response()
    }
}
