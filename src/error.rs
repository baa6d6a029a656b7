use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Failed to load artifacts: {0}")]
    ArtifactLoad(String),

    #[error("Movie not found: {0}")]
    MovieNotFound(String),

    #[error("Not enough movies in the catalog: {requested} needed, {available} available")]
    InsufficientData { requested: usize, available: usize },

    #[error("Metadata fetch failed: {0}")]
    MetadataFetch(String),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::MovieNotFound(_) => StatusCode::NOT_FOUND,
            AppError::InsufficientData { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::MetadataFetch(_) | AppError::HttpClient(_) => StatusCode::BAD_GATEWAY,
            AppError::ArtifactLoad(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
