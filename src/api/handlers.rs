use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    db::{SessionDetail, Statistics},
    error::{AppError, AppResult, PipelineError},
    middleware::RequestId,
    models::{DerivedProfile, PipelineState, SearchResult, Terminal, UserInput},
};

use super::AppState;

const PERSISTENCE_DISABLED: &str = "persistence is not configured";

// Request/Response types

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
    pub version: &'static str,
}

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    /// Stored session id; `None` when persistence is off or failed
    pub session_id: Option<i64>,
    pub status: Terminal,
    pub recommendations: Vec<String>,
    pub search_results: Vec<SearchResult>,
    pub search_source: Option<String>,
    pub profile: Option<DerivedProfile>,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl RecommendationResponse {
    fn from_state(state: PipelineState, session_id: Option<i64>) -> Self {
        Self {
            session_id,
            status: state.terminal.unwrap_or(Terminal::Failed),
            recommendations: state.recommendations,
            search_results: state.search_results,
            search_source: state.search_source,
            profile: state.profile,
            error: state.error,
            created_at: Utc::now(),
        }
    }
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Runs the recommendation pipeline for one request
///
/// Responds 200 when the pipeline recommended, 422 when it halted on an
/// input or search error, and 400 when the body does not decode into
/// `UserInput` (a non-numeric or negative age, for instance). Persistence
/// problems are logged and never change the computed result.
pub async fn recommend(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    payload: Result<Json<UserInput>, JsonRejection>,
) -> AppResult<(StatusCode, Json<RecommendationResponse>)> {
    let Json(input) = payload.map_err(|rejection| {
        let err = PipelineError::InvalidInput(rejection.body_text());
        tracing::warn!(request_id = %request_id, error = %err, "Rejected request body");
        AppError::InvalidInput(err.to_string())
    })?;

    tracing::info!(
        request_id = %request_id,
        location = %input.location,
        cuisine = %input.cuisine_preference,
        "Processing recommendation request"
    );

    let result = state.pipeline.run_input(input).await;
    let recommended = result.terminal == Some(Terminal::Recommended);

    let mut session_id = None;
    if let (true, Some(storage)) = (recommended, &state.storage) {
        match storage.save_complete(&result).await {
            Ok(saved) => session_id = Some(saved.session_id),
            Err(e) => {
                tracing::error!(request_id = %request_id, error = %e, "Failed to persist session")
            }
        }
    }

    tracing::info!(
        request_id = %request_id,
        recommended,
        recommendations = result.recommendations.len(),
        "Recommendation request completed"
    );

    let status = if recommended {
        StatusCode::OK
    } else {
        StatusCode::UNPROCESSABLE_ENTITY
    };

    Ok((
        status,
        Json(RecommendationResponse::from_state(result, session_id)),
    ))
}

/// Fetches a stored session with its listings and recommendations
pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<i64>,
) -> AppResult<Json<SessionDetail>> {
    let storage = state
        .storage
        .as_ref()
        .ok_or_else(|| AppError::Unavailable(PERSISTENCE_DISABLED.to_string()))?;

    storage
        .find_session(session_id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("session {}", session_id)))
}

/// Aggregate usage statistics
pub async fn statistics(State(state): State<AppState>) -> AppResult<Json<Statistics>> {
    let storage = state
        .storage
        .as_ref()
        .ok_or_else(|| AppError::Unavailable(PERSISTENCE_DISABLED.to_string()))?;

    Ok(Json(storage.statistics().await?))
}
