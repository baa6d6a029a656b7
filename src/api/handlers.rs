use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    middleware::{RequestId, SessionId},
    models::{MetadataRecord, MovieRecord, NavigationState, RecommendationSet},
};

use super::AppState;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Deserialize)]
pub struct RecommendationQuery {
    pub movie: String,
}

/// A selected movie name, sent either as a scalar or wrapped in a list
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Selection {
    One(String),
    Many(Vec<String>),
}

impl Selection {
    /// The effective name: the scalar, or the first list element
    ///
    /// Returned verbatim; blank names count as missing.
    pub fn first(&self) -> Option<&str> {
        let name = match self {
            Selection::One(name) => Some(name.as_str()),
            Selection::Many(names) => names.first().map(String::as_str),
        };
        name.filter(|name| !name.trim().is_empty())
    }
}

#[derive(Debug, Deserialize)]
pub struct SelectRequest {
    pub name: Selection,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub movies: usize,
    pub cached_metadata: usize,
    pub loaded_at: chrono::DateTime<chrono::Utc>,
}

// Handlers

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy",
            movies: state.catalog.len(),
            cached_metadata: state.metadata.cached_len(),
            loaded_at: state.loaded_at,
        }),
    )
}

/// Catalog, filtered by an optional case-insensitive substring
pub async fn list_movies(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> Json<Vec<MovieRecord>> {
    let movies = state.catalog.search(&params.q).into_iter().cloned().collect();
    Json(movies)
}

/// Nine most similar movies for a catalog name
pub async fn get_recommendations(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Query(params): Query<RecommendationQuery>,
) -> AppResult<Json<RecommendationSet>> {
    if params.movie.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "movie parameter cannot be empty".to_string(),
        ));
    }

    tracing::info!(
        request_id = %request_id,
        movie = %params.movie,
        "Processing recommendation request"
    );

    let set = state.recommender.recommend(&params.movie)?;
    Ok(Json(set))
}

/// Metadata for one movie; degraded, never an error
pub async fn get_metadata(
    State(state): State<AppState>,
    Path(movie_id): Path<String>,
) -> Json<MetadataRecord> {
    Json(state.metadata.fetch(&movie_id).await)
}

/// Current navigation state of the caller's session
pub async fn get_session(
    State(state): State<AppState>,
    Extension(session_id): Extension<SessionId>,
) -> Json<NavigationState> {
    Json(state.sessions.get(session_id).await.navigation)
}

/// Select a movie: Browse -> Recommend
///
/// Names missing from the catalog are rejected without touching the session.
pub async fn select_movie(
    State(state): State<AppState>,
    Extension(session_id): Extension<SessionId>,
    Json(request): Json<SelectRequest>,
) -> AppResult<Json<NavigationState>> {
    let name = request
        .name
        .first()
        .ok_or_else(|| AppError::InvalidInput("name cannot be empty".to_string()))?;

    if state.catalog.find_by_name(name).is_none() {
        return Err(AppError::MovieNotFound(name.to_string()));
    }

    let navigation = state
        .sessions
        .update(session_id, |ctx| {
            ctx.navigation.select(name);
            ctx.navigation.clone()
        })
        .await;

    tracing::info!(session_id = %session_id, movie = %name, "Movie selected");

    Ok(Json(navigation))
}

/// Back: Recommend -> Browse
pub async fn go_back(
    State(state): State<AppState>,
    Extension(session_id): Extension<SessionId>,
) -> Json<NavigationState> {
    let navigation = state
        .sessions
        .update(session_id, |ctx| {
            ctx.navigation.back();
            ctx.navigation.clone()
        })
        .await;

    tracing::info!(session_id = %session_id, "Back to browse");

    Json(navigation)
}

/// Fallback for unknown API paths
pub async fn not_found() -> (StatusCode, Json<Value>) {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" })))
}
