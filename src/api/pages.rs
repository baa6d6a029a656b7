use axum::{
    extract::{Query, State},
    response::{Html, Redirect},
    Extension,
};

use crate::{
    error::AppError,
    middleware::SessionId,
    models::{MetadataRecord, MovieRecord, Page, RecommendationSet, Theme},
};

use super::{
    views::{self, Notice, PosterCard},
    AppState, SessionContext,
};

/// Query parameters understood by the index page
///
/// Parsed from raw pairs so a repeated `selected` key resolves to its first value.
#[derive(Debug, Default, PartialEq)]
pub struct PageParams {
    pub selected: Option<String>,
    pub search: String,
    pub theme: Option<Theme>,
}

impl PageParams {
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut params = PageParams::default();
        let mut seen_selected = false;

        for (key, value) in pairs {
            match key.as_str() {
                "selected" if !seen_selected => {
                    seen_selected = true;
                    if !value.trim().is_empty() {
                        params.selected = Some(value);
                    }
                }
                "q" => params.search = value.trim().to_string(),
                "theme" => params.theme = Theme::parse(&value).or(params.theme),
                _ => {}
            }
        }

        params
    }
}

/// Main page: browse or recommend, depending on the session
pub async fn index(
    State(state): State<AppState>,
    Extension(session_id): Extension<SessionId>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Html<String> {
    let params = PageParams::from_pairs(pairs);
    let mut notice = None;

    if let Some(theme) = params.theme {
        state
            .sessions
            .update(session_id, |ctx| ctx.theme = theme)
            .await;
    }

    if let Some(name) = params.selected.as_deref() {
        if state.catalog.find_by_name(name).is_some() {
            state
                .sessions
                .update(session_id, |ctx| ctx.navigation.select(name))
                .await;
            tracing::info!(session_id = %session_id, movie = %name, "Movie selected");
        } else {
            tracing::info!(session_id = %session_id, movie = %name, "Selection not in catalog");
            let error = AppError::MovieNotFound(name.to_string());
            notice = Some(Notice::Error(error.to_string()));
        }
    }

    let context = state.sessions.get(session_id).await;

    let html = match context.navigation.page() {
        Page::Browse => render_browse(&state, &context, &params.search, notice.as_ref()).await,
        Page::Recommend => render_recommend(&state, &context, notice).await,
    };

    Html(html)
}

/// Back button: Recommend -> Browse
pub async fn back(
    State(state): State<AppState>,
    Extension(session_id): Extension<SessionId>,
) -> Redirect {
    state
        .sessions
        .update(session_id, |ctx| ctx.navigation.back())
        .await;

    tracing::info!(session_id = %session_id, "Back to browse");

    Redirect::to("/")
}

fn cards<'a>(
    movies: &[&'a MovieRecord],
    metadata: &'a [MetadataRecord],
) -> Vec<PosterCard<'a>> {
    movies
        .iter()
        .copied()
        .zip(metadata)
        .map(|(movie, metadata)| PosterCard { movie, metadata })
        .collect()
}

async fn render_browse(
    state: &AppState,
    context: &SessionContext,
    search: &str,
    notice: Option<&Notice>,
) -> String {
    let movies = state.catalog.search(search);
    let ids = movies.iter().map(|m| m.movie_id.clone()).collect();
    let metadata = state.metadata.fetch_many(ids).await;

    views::browse_page(context.theme, search, &cards(&movies, &metadata), notice)
}

async fn render_recommend(
    state: &AppState,
    context: &SessionContext,
    notice: Option<Notice>,
) -> String {
    let mut notices: Vec<Notice> = notice.into_iter().collect();

    let Some(selected) = context.navigation.selected_movie() else {
        notices.push(Notice::Warning(
            "No movie selected. Please choose a movie first.".to_string(),
        ));
        return views::recommend_notice_page(context.theme, &notices);
    };

    match state.recommender.recommend(selected) {
        Ok(set) => render_recommendations(state, context.theme, &set, notices.first()).await,
        Err(e) => {
            notices.push(match e {
                AppError::InsufficientData { .. } => Notice::Warning(e.to_string()),
                _ => Notice::Error(e.to_string()),
            });
            tracing::warn!(movie = %selected, error = %e, "Recommendation failed");
            views::recommend_notice_page(context.theme, &notices)
        }
    }
}

async fn render_recommendations(
    state: &AppState,
    theme: Theme,
    set: &RecommendationSet,
    notice: Option<&Notice>,
) -> String {
    let movies: Vec<&MovieRecord> = std::iter::once(&set.query)
        .chain(set.items.iter().map(|r| &r.movie))
        .collect();
    let ids = movies.iter().map(|m| m.movie_id.clone()).collect();
    let metadata = state.metadata.fetch_many(ids).await;

    let all = cards(&movies, &metadata);
    match all.split_first() {
        Some((selected, recommendations)) => {
            views::recommend_page(theme, selected, recommendations, notice)
        }
        None => views::recommend_notice_page(
            theme,
            &[Notice::Error(format!("Movie not found: {}", set.query.name))],
        ),
    }
}
