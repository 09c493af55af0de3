use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;

use crate::{
    error::AppError,
    models::{GenreList, MovieDetails, MultiResult, Paginated, PersonDetails, TvDetails},
    pages::{self, discover_params, SearchKind},
    query::MediaKind,
    AppState,
};

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/trending/:media_type/:time_window", get(get_trending))
        .route("/search", get(search))
        .route("/search/:kind", get(search_kind))
        .route("/discover/:media_type", get(discover))
        .route("/genres/:media_type", get(get_genres))
        .route("/movie/:id", get(get_movie_detail))
        .route("/tv/:id", get(get_tv_detail))
        .route("/person/:id", get(get_person_detail))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[derive(Deserialize)]
struct SearchQuery {
    q: Option<String>,
    #[serde(default = "default_page")]
    page: u32,
}

fn default_page() -> u32 {
    1
}

fn media_kind(raw: &str) -> Result<MediaKind, AppError> {
    MediaKind::parse(raw)
        .ok_or_else(|| AppError::BadRequest(format!("Unknown media type: {}", raw)))
}

impl SearchQuery {
    fn query(&self) -> Result<&str, AppError> {
        self.q
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .ok_or_else(|| AppError::BadRequest("Query required".to_string()))
    }
}

async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<Paginated<MultiResult>>, AppError> {
    let results = state.tmdb.search_multi(params.query()?, params.page).await?;
    Ok(Json(results))
}

async fn search_kind(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<Paginated<MultiResult>>, AppError> {
    let kind = SearchKind::parse(&kind)
        .ok_or_else(|| AppError::BadRequest(format!("Unknown search type: {}", kind)))?;
    let results = pages::search(state.tmdb.as_ref(), kind, params.query()?, params.page).await?;
    Ok(Json(results))
}

async fn get_trending(
    State(state): State<AppState>,
    Path((media_type, time_window)): Path<(String, String)>,
) -> Result<Json<Value>, AppError> {
    if time_window != "day" && time_window != "week" {
        return Err(AppError::BadRequest("Time window must be day or week".to_string()));
    }
    let body = match media_kind(&media_type)? {
        MediaKind::Movie => json!(state.tmdb.trending_movies(&time_window).await?),
        MediaKind::Tv => json!(state.tmdb.trending_tv(&time_window).await?),
    };
    Ok(Json(body))
}

async fn discover(
    State(state): State<AppState>,
    Path(media_type): Path<String>,
    Query(raw): Query<Vec<(String, String)>>,
) -> Result<Json<Value>, AppError> {
    let kind = media_kind(&media_type)?;
    let params = discover_params(kind, raw);
    let body = match kind {
        MediaKind::Movie => json!(state.tmdb.discover_movies(&params).await?),
        MediaKind::Tv => json!(state.tmdb.discover_tv(&params).await?),
    };
    Ok(Json(body))
}

async fn get_genres(
    State(state): State<AppState>,
    Path(media_type): Path<String>,
) -> Result<Json<GenreList>, AppError> {
    let genres = match media_kind(&media_type)? {
        MediaKind::Movie => state.tmdb.movie_genres().await?,
        MediaKind::Tv => state.tmdb.tv_genres().await?,
    };
    Ok(Json(genres))
}

async fn get_movie_detail(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MovieDetails>, AppError> {
    let movie = state.tmdb.movie_details(id).await?;
    Ok(Json(movie))
}

async fn get_tv_detail(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<TvDetails>, AppError> {
    let show = state.tmdb.tv_details(id).await?;
    Ok(Json(show))
}

async fn get_person_detail(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<PersonDetails>, AppError> {
    let person = state.tmdb.person_details(id).await?;
    Ok(Json(person))
}
