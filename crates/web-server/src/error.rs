use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use core_types::{ErrorClass, NewsError};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    News(#[from] NewsError),
    /// The request could not be parsed into the shape a handler expects.
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Route not found")]
    RouteNotFound,
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::News(err) => match err.class() {
                ErrorClass::BadRequest => StatusCode::BAD_REQUEST,
                ErrorClass::NotFound => StatusCode::NOT_FOUND,
                ErrorClass::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            },
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::RouteNotFound => StatusCode::NOT_FOUND,
        }
    }
}

/// Converts our custom `AppError` into an HTTP response.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            AppError::News(NewsError::InternalError(detail)) => {
                tracing::error!(error = %detail, "Internal error while serving request.");
                "Server error".to_string()
            }
            other => other.to_string(),
        };

        let body = Json(json!({ "msg": message }));
        (status, body).into_response()
    }
}
