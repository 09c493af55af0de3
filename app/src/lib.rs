use axum::{
    extract::{Path, Query, State},
    response::Html,
    routing::get,
    Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::{services::ServeDir, trace::TraceLayer};

pub mod api;
pub mod config;
pub mod credits;
pub mod error;
pub mod format;
pub mod models;
pub mod pages;
pub mod query;
pub mod templates;
pub mod tmdb;

use crate::error::AppError;
use crate::pages::SearchKind;
use crate::query::MediaKind;
use crate::tmdb::MovieApi;

#[derive(Clone)]
pub struct AppState {
    pub tmdb: Arc<dyn MovieApi>,
}

pub fn build_router(state: AppState, static_dir: &str) -> Router {
    Router::new()
        .route("/", get(home_page))
        .route("/discover", get(discover_page))
        .route("/search", get(search_page))
        .route("/movie/:id", get(movie_page))
        .route("/tv/:id", get(tv_page))
        .route("/person/:id", get(person_page))
        .route("/company/:id", get(company_page))
        .route("/network/:id", get(network_page))
        .nest("/api", api::routes(state.clone()))
        .nest_service("/static", ServeDir::new(static_dir))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn not_found() -> AppError {
    AppError::NotFound
}

#[derive(Deserialize)]
struct HomeQuery {
    window: Option<String>,
}

async fn home_page(
    State(state): State<AppState>,
    Query(params): Query<HomeQuery>,
) -> Result<Html<String>, AppError> {
    let page = pages::load_home(state.tmdb.as_ref(), params.window.as_deref()).await?;
    Ok(Html(templates::render_home(&page)))
}

async fn discover_page(
    State(state): State<AppState>,
    Query(raw): Query<Vec<(String, String)>>,
) -> Result<Html<String>, AppError> {
    let kind = raw
        .iter()
        .find(|(k, _)| k == "media")
        .and_then(|(_, v)| MediaKind::parse(v))
        .unwrap_or(MediaKind::Movie);

    let page = pages::load_discover(state.tmdb.as_ref(), kind, raw).await?;
    Ok(Html(templates::render_discover(&page)))
}

#[derive(Deserialize)]
struct SearchQuery {
    q: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    page: Option<u32>,
}

async fn search_page(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> Result<Html<String>, AppError> {
    let query = params.q.unwrap_or_default();
    let kind = params
        .kind
        .as_deref()
        .and_then(SearchKind::parse)
        .unwrap_or_default();
    let page =
        pages::load_search(state.tmdb.as_ref(), &query, kind, params.page.unwrap_or(1)).await?;
    Ok(Html(templates::render_search(&page)))
}

async fn movie_page(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Html<String>, AppError> {
    let page = pages::load_movie(state.tmdb.as_ref(), id).await?;
    Ok(Html(templates::render_movie(&page)))
}

async fn tv_page(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Html<String>, AppError> {
    let page = pages::load_tv(state.tmdb.as_ref(), id).await?;
    Ok(Html(templates::render_tv(&page)))
}

async fn person_page(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Html<String>, AppError> {
    let page = pages::load_person(state.tmdb.as_ref(), id).await?;
    Ok(Html(templates::render_person(&page)))
}

async fn company_page(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Html<String>, AppError> {
    let page = pages::load_company(state.tmdb.as_ref(), id).await?;
    Ok(Html(templates::render_company(&page)))
}

async fn network_page(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Html<String>, AppError> {
    let page = pages::load_network(state.tmdb.as_ref(), id).await?;
    Ok(Html(templates::render_network(&page)))
}
