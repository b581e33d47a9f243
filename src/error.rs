use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Failures reported by a search collaborator
#[derive(thiserror::Error, Debug)]
pub enum SearchError {
    /// Provider cannot be used at all (e.g. credentials absent)
    #[error("Search provider not configured: {0}")]
    Configuration(String),

    /// Network or protocol failure while talking to the provider
    #[error("Search transport error: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for SearchError {
    fn from(err: reqwest::Error) -> Self {
        SearchError::Transport(err.to_string())
    }
}

/// Failures reported by the generation collaborator
#[derive(thiserror::Error, Debug)]
pub enum GenerationError {
    #[error("Generation model not configured")]
    NotConfigured,

    #[error("Generation request failed: {0}")]
    Request(String),

    #[error("Generation model returned no text")]
    EmptyResponse,
}

impl From<reqwest::Error> for GenerationError {
    fn from(err: reqwest::Error) -> Self {
        GenerationError::Request(err.to_string())
    }
}

/// Failures that halt the recommendation pipeline
///
/// The `Display` text is what callers see in `PipelineState::error`.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    #[error("입력값 오류: {0}")]
    InvalidInput(String),

    #[error("검색에 필요한 입력값 누락: {0}")]
    MissingInput(String),

    #[error("맛집 검색 중 오류가 발생했습니다: {0}")]
    SearchTransport(String),

    #[error("검색 결과가 없습니다")]
    NoResults,
}

/// Failures reported by the persistence collaborator
#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Service unavailable: {0}")]
    Unavailable(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            AppError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
