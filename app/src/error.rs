use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::templates;

#[derive(Error, Debug)]
pub enum AppError {
    /// A page's fetch batch failed; rendered as the page's generic message.
    #[error("Failed to fetch {what}")]
    Fetch { what: &'static str },

    #[error("TMDB API error: {0}")]
    Tmdb(String),

    #[error("Not found")]
    NotFound,

    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    pub fn fetch(what: &'static str) -> Self {
        AppError::Fetch { what }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Tmdb(format!("{:#}", err))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Fetch { .. } => {
                let html = templates::render_error(&self.to_string());
                (StatusCode::BAD_GATEWAY, Html(html)).into_response()
            }
            AppError::NotFound => {
                let html = templates::render_error("Page not found");
                (StatusCode::NOT_FOUND, Html(html)).into_response()
            }
            AppError::Tmdb(msg) => json_error(StatusCode::BAD_GATEWAY, msg.clone()),
            AppError::BadRequest(msg) => json_error(StatusCode::BAD_REQUEST, msg.clone()),
        }
    }
}

fn json_error(status: StatusCode, message: String) -> Response {
    let body = Json(json!({
        "error": message,
    }));
    (status, body).into_response()
}
