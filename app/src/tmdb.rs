use anyhow::{anyhow, Context};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, error};

use crate::models::{
    Collection, CombinedCredits, Credits, ExternalIds, GenreList, MovieDetails, MovieSummary,
    MultiResult, Network, Paginated, PersonDetails, PersonSummary, ProductionCompany,
    TmdbErrorBody, TvDetails, TvSummary, VideoList, WatchProviders,
};
use crate::query::{build_query_string, DiscoverParams};

pub const TMDB_BASE_URL: &str = "https://api.themoviedb.org/3";
pub const TMDB_IMAGE_BASE: &str = "https://image.tmdb.org/t/p";
pub const PLACEHOLDER_IMAGE: &str = "/static/placeholder.svg";
pub const DEFAULT_LANGUAGE: &str = "en-US";

/// Every TMDB operation the pages and the JSON API consume.
#[async_trait]
pub trait MovieApi: Send + Sync {
    async fn trending_movies(&self, window: &str) -> anyhow::Result<Paginated<MovieSummary>>;
    async fn trending_tv(&self, window: &str) -> anyhow::Result<Paginated<TvSummary>>;
    async fn popular_movies(&self, page: u32) -> anyhow::Result<Paginated<MovieSummary>>;
    async fn top_rated_movies(&self, page: u32) -> anyhow::Result<Paginated<MovieSummary>>;
    async fn now_playing_movies(&self, page: u32) -> anyhow::Result<Paginated<MovieSummary>>;
    async fn upcoming_movies(&self, page: u32) -> anyhow::Result<Paginated<MovieSummary>>;
    async fn popular_tv(&self, page: u32) -> anyhow::Result<Paginated<TvSummary>>;
    async fn top_rated_tv(&self, page: u32) -> anyhow::Result<Paginated<TvSummary>>;
    async fn on_the_air_tv(&self, page: u32) -> anyhow::Result<Paginated<TvSummary>>;
    async fn airing_today_tv(&self, page: u32) -> anyhow::Result<Paginated<TvSummary>>;

    async fn search_multi(&self, query: &str, page: u32) -> anyhow::Result<Paginated<MultiResult>>;
    async fn search_movies(&self, query: &str, page: u32)
        -> anyhow::Result<Paginated<MovieSummary>>;
    async fn search_tv(&self, query: &str, page: u32) -> anyhow::Result<Paginated<TvSummary>>;
    async fn search_people(&self, query: &str, page: u32)
        -> anyhow::Result<Paginated<PersonSummary>>;

    async fn movie_details(&self, id: i64) -> anyhow::Result<MovieDetails>;
    async fn movie_credits(&self, id: i64) -> anyhow::Result<Credits>;
    async fn movie_videos(&self, id: i64) -> anyhow::Result<VideoList>;
    async fn movie_recommendations(&self, id: i64) -> anyhow::Result<Paginated<MovieSummary>>;
    async fn movie_similar(&self, id: i64) -> anyhow::Result<Paginated<MovieSummary>>;
    async fn movie_watch_providers(&self, id: i64) -> anyhow::Result<WatchProviders>;

    async fn tv_details(&self, id: i64) -> anyhow::Result<TvDetails>;
    async fn tv_credits(&self, id: i64) -> anyhow::Result<Credits>;
    async fn tv_videos(&self, id: i64) -> anyhow::Result<VideoList>;
    async fn tv_recommendations(&self, id: i64) -> anyhow::Result<Paginated<TvSummary>>;
    async fn tv_similar(&self, id: i64) -> anyhow::Result<Paginated<TvSummary>>;
    async fn tv_watch_providers(&self, id: i64) -> anyhow::Result<WatchProviders>;

    async fn person_details(&self, id: i64) -> anyhow::Result<PersonDetails>;
    async fn person_combined_credits(&self, id: i64) -> anyhow::Result<CombinedCredits>;
    async fn person_external_ids(&self, id: i64) -> anyhow::Result<ExternalIds>;

    async fn company_details(&self, id: i64) -> anyhow::Result<ProductionCompany>;
    async fn network_details(&self, id: i64) -> anyhow::Result<Network>;
    async fn collection_details(&self, id: i64) -> anyhow::Result<Collection>;

    async fn movie_genres(&self) -> anyhow::Result<GenreList>;
    async fn tv_genres(&self) -> anyhow::Result<GenreList>;

    async fn discover_movies(
        &self,
        params: &DiscoverParams,
    ) -> anyhow::Result<Paginated<MovieSummary>>;
    async fn discover_tv(&self, params: &DiscoverParams) -> anyhow::Result<Paginated<TvSummary>>;
}

/// How the configured key is presented to TMDB.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credential {
    /// v4 read access token, sent as `Authorization: Bearer`.
    Bearer(String),
    /// v3 key, sent as the `api_key` query parameter.
    ApiKey(String),
}

impl Credential {
    pub fn from_key(raw: &str) -> Self {
        let key = raw.trim();
        if let Some(token) = key.strip_prefix("Bearer ") {
            return Credential::Bearer(token.trim().to_string());
        }
        if key.len() == 32 && key.chars().all(|c| c.is_ascii_hexdigit()) {
            Credential::ApiKey(key.to_string())
        } else {
            Credential::Bearer(key.to_string())
        }
    }
}

#[derive(Debug, Clone)]
pub struct TmdbClient {
    client: Client,
    base_url: String,
    credential: Credential,
    language: String,
}

impl TmdbClient {
    pub fn new(api_key: &str, language: &str) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            base_url: TMDB_BASE_URL.to_string(),
            credential: Credential::from_key(api_key),
            language: language.to_string(),
        })
    }

    /// Points the client at another API root (wiremock in tests).
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    /// Full request URL: caller params first, then `api_key` (v3 only) and `language`.
    pub fn url_for(&self, path: &str, params: &DiscoverParams) -> String {
        let mut fixed: Vec<(&str, &str)> = Vec::with_capacity(2);
        if let Credential::ApiKey(key) = &self.credential {
            fixed.push(("api_key", key.as_str()));
        }
        fixed.push(("language", self.language.as_str()));

        let query = build_query_string(params, &fixed);
        format!("{}{}?{}", self.base_url, path, query)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &DiscoverParams,
    ) -> anyhow::Result<T> {
        let url = self.url_for(path, params);
        debug!("TMDB request: {}", redact(&url));

        let mut request = self.client.get(&url);
        if let Credential::Bearer(token) = &self.credential {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("request to {path} failed"))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("TMDB error on {}: HTTP {} {}", path, status, body);
            if let Ok(tmdb_error) = serde_json::from_str::<TmdbErrorBody>(&body) {
                return Err(anyhow!(
                    "TMDB API error (HTTP {}): {} (code {})",
                    status,
                    tmdb_error.status_message,
                    tmdb_error.status_code
                ));
            }
            return Err(anyhow!("TMDB API error (HTTP {}): {}", status, body));
        }

        response
            .json::<T>()
            .await
            .with_context(|| format!("failed to decode response from {path}"))
    }

    async fn get_page<T: DeserializeOwned>(
        &self,
        path: &str,
        page: u32,
    ) -> anyhow::Result<Paginated<T>> {
        self.get_json(path, &DiscoverParams::new().page(page.max(1)))
            .await
    }

    async fn search<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &str,
        page: u32,
    ) -> anyhow::Result<Paginated<T>> {
        debug!("Searching TMDB {} for: {}", path, query);
        let params = DiscoverParams::new()
            .set("query", query)
            .page(page.max(1))
            .set("include_adult", "false");
        self.get_json(path, &params).await
    }

    async fn get_plain<T: DeserializeOwned>(&self, path: &str) -> anyhow::Result<T> {
        self.get_json(path, &DiscoverParams::new()).await
    }
}

#[async_trait]
impl MovieApi for TmdbClient {
    async fn trending_movies(&self, window: &str) -> anyhow::Result<Paginated<MovieSummary>> {
        self.get_plain(&format!("/trending/movie/{}", time_window(window)))
            .await
    }

    async fn trending_tv(&self, window: &str) -> anyhow::Result<Paginated<TvSummary>> {
        self.get_plain(&format!("/trending/tv/{}", time_window(window)))
            .await
    }

    async fn popular_movies(&self, page: u32) -> anyhow::Result<Paginated<MovieSummary>> {
        self.get_page("/movie/popular", page).await
    }

    async fn top_rated_movies(&self, page: u32) -> anyhow::Result<Paginated<MovieSummary>> {
        self.get_page("/movie/top_rated", page).await
    }

    async fn now_playing_movies(&self, page: u32) -> anyhow::Result<Paginated<MovieSummary>> {
        self.get_page("/movie/now_playing", page).await
    }

    async fn upcoming_movies(&self, page: u32) -> anyhow::Result<Paginated<MovieSummary>> {
        self.get_page("/movie/upcoming", page).await
    }

    async fn popular_tv(&self, page: u32) -> anyhow::Result<Paginated<TvSummary>> {
        self.get_page("/tv/popular", page).await
    }

    async fn top_rated_tv(&self, page: u32) -> anyhow::Result<Paginated<TvSummary>> {
        self.get_page("/tv/top_rated", page).await
    }

    async fn on_the_air_tv(&self, page: u32) -> anyhow::Result<Paginated<TvSummary>> {
        self.get_page("/tv/on_the_air", page).await
    }

    async fn airing_today_tv(&self, page: u32) -> anyhow::Result<Paginated<TvSummary>> {
        self.get_page("/tv/airing_today", page).await
    }

    async fn search_multi(&self, query: &str, page: u32) -> anyhow::Result<Paginated<MultiResult>> {
        self.search("/search/multi", query, page).await
    }

    async fn search_movies(
        &self,
        query: &str,
        page: u32,
    ) -> anyhow::Result<Paginated<MovieSummary>> {
        self.search("/search/movie", query, page).await
    }

    async fn search_tv(&self, query: &str, page: u32) -> anyhow::Result<Paginated<TvSummary>> {
        self.search("/search/tv", query, page).await
    }

    async fn search_people(
        &self,
        query: &str,
        page: u32,
    ) -> anyhow::Result<Paginated<PersonSummary>> {
        self.search("/search/person", query, page).await
    }

    async fn movie_details(&self, id: i64) -> anyhow::Result<MovieDetails> {
        self.get_plain(&format!("/movie/{id}")).await
    }

    async fn movie_credits(&self, id: i64) -> anyhow::Result<Credits> {
        self.get_plain(&format!("/movie/{id}/credits")).await
    }

    async fn movie_videos(&self, id: i64) -> anyhow::Result<VideoList> {
        self.get_plain(&format!("/movie/{id}/videos")).await
    }

    async fn movie_recommendations(&self, id: i64) -> anyhow::Result<Paginated<MovieSummary>> {
        self.get_page(&format!("/movie/{id}/recommendations"), 1)
            .await
    }

    async fn movie_similar(&self, id: i64) -> anyhow::Result<Paginated<MovieSummary>> {
        self.get_page(&format!("/movie/{id}/similar"), 1).await
    }

    async fn movie_watch_providers(&self, id: i64) -> anyhow::Result<WatchProviders> {
        self.get_plain(&format!("/movie/{id}/watch/providers"))
            .await
    }

    async fn tv_details(&self, id: i64) -> anyhow::Result<TvDetails> {
        self.get_plain(&format!("/tv/{id}")).await
    }

    async fn tv_credits(&self, id: i64) -> anyhow::Result<Credits> {
        self.get_plain(&format!("/tv/{id}/credits")).await
    }

    async fn tv_videos(&self, id: i64) -> anyhow::Result<VideoList> {
        self.get_plain(&format!("/tv/{id}/videos")).await
    }

    async fn tv_recommendations(&self, id: i64) -> anyhow::Result<Paginated<TvSummary>> {
        self.get_page(&format!("/tv/{id}/recommendations"), 1).await
    }

    async fn tv_similar(&self, id: i64) -> anyhow::Result<Paginated<TvSummary>> {
        self.get_page(&format!("/tv/{id}/similar"), 1).await
    }

    async fn tv_watch_providers(&self, id: i64) -> anyhow::Result<WatchProviders> {
        self.get_plain(&format!("/tv/{id}/watch/providers")).await
    }

    async fn person_details(&self, id: i64) -> anyhow::Result<PersonDetails> {
        self.get_plain(&format!("/person/{id}")).await
    }

    async fn person_combined_credits(&self, id: i64) -> anyhow::Result<CombinedCredits> {
        self.get_plain(&format!("/person/{id}/combined_credits"))
            .await
    }

    async fn person_external_ids(&self, id: i64) -> anyhow::Result<ExternalIds> {
        self.get_plain(&format!("/person/{id}/external_ids")).await
    }

    async fn company_details(&self, id: i64) -> anyhow::Result<ProductionCompany> {
        self.get_plain(&format!("/company/{id}")).await
    }

    async fn network_details(&self, id: i64) -> anyhow::Result<Network> {
        self.get_plain(&format!("/network/{id}")).await
    }

    async fn collection_details(&self, id: i64) -> anyhow::Result<Collection> {
        self.get_plain(&format!("/collection/{id}")).await
    }

    async fn movie_genres(&self) -> anyhow::Result<GenreList> {
        self.get_plain("/genre/movie/list").await
    }

    async fn tv_genres(&self) -> anyhow::Result<GenreList> {
        self.get_plain("/genre/tv/list").await
    }

    async fn discover_movies(
        &self,
        params: &DiscoverParams,
    ) -> anyhow::Result<Paginated<MovieSummary>> {
        debug!("Discover movies: {:?}", params);
        let params = params.clone().set("include_adult", "false");
        self.get_json("/discover/movie", &params).await
    }

    async fn discover_tv(&self, params: &DiscoverParams) -> anyhow::Result<Paginated<TvSummary>> {
        debug!("Discover TV: {:?}", params);
        let params = params.clone().set("include_adult", "false");
        self.get_json("/discover/tv", &params).await
    }
}

fn time_window(window: &str) -> &'static str {
    if window == "week" {
        "week"
    } else {
        "day"
    }
}

fn redact(url: &str) -> String {
    match url.find("api_key=") {
        Some(start) => {
            let value_start = start + "api_key=".len();
            let value_end = url[value_start..]
                .find('&')
                .map(|i| value_start + i)
                .unwrap_or(url.len());
            format!("{}***{}", &url[..value_start], &url[value_end..])
        }
        None => url.to_string(),
    }
}

/// `https://image.tmdb.org/t/p/{size}{path}`, or the placeholder when TMDB has no image.
pub fn image_url(path: Option<&str>, size: &str) -> String {
    match path.filter(|p| !p.is_empty()) {
        Some(p) => format!("{}/{}{}", TMDB_IMAGE_BASE, size, p),
        None => PLACEHOLDER_IMAGE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_key_of_32_chars_is_a_v3_key() {
        assert_eq!(
            Credential::from_key("0123456789abcdef0123456789ABCDEF"),
            Credential::ApiKey("0123456789abcdef0123456789ABCDEF".to_string())
        );
        assert_eq!(
            Credential::from_key("eyJhbGciOiJIUzI1NiJ9.payload.sig"),
            Credential::Bearer("eyJhbGciOiJIUzI1NiJ9.payload.sig".to_string())
        );
        assert_eq!(
            Credential::from_key("Bearer token-value"),
            Credential::Bearer("token-value".to_string())
        );
    }

    #[test]
    fn url_appends_language_and_key_after_caller_params() {
        let client = TmdbClient::new("0123456789abcdef0123456789abcdef", "fr-FR")
            .unwrap()
            .with_base_url("http://localhost:9000/3/");
        let params = DiscoverParams::new().set("with_genres", "18").set("sort_by", "");

        assert_eq!(
            client.url_for("/discover/movie", &params),
            "http://localhost:9000/3/discover/movie?with_genres=18&api_key=0123456789abcdef0123456789abcdef&language=fr-FR"
        );
    }

    #[test]
    fn bearer_urls_carry_only_language() {
        let client = TmdbClient::new("some.jwt.token", DEFAULT_LANGUAGE).unwrap();
        assert_eq!(
            client.url_for("/genre/movie/list", &DiscoverParams::new()),
            "https://api.themoviedb.org/3/genre/movie/list?language=en-US"
        );
    }

    #[test]
    fn redact_hides_api_key_value() {
        assert_eq!(
            redact("http://x/movie/1?api_key=secret&language=en-US"),
            "http://x/movie/1?api_key=***&language=en-US"
        );
        assert_eq!(redact("http://x/movie/1?language=en-US"), "http://x/movie/1?language=en-US");
    }

    #[test]
    fn image_url_falls_back_to_placeholder() {
        assert_eq!(
            image_url(Some("/abc.jpg"), "w342"),
            "https://image.tmdb.org/t/p/w342/abc.jpg"
        );
        assert_eq!(image_url(None, "w342"), PLACEHOLDER_IMAGE);
        assert_eq!(image_url(Some(""), "w500"), PLACEHOLDER_IMAGE);
    }
}
