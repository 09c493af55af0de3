use std::collections::HashMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Paginated<T> {
    #[serde(default)]
    pub page: i32,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
    #[serde(default)]
    pub total_pages: i32,
    #[serde(default)]
    pub total_results: i32,
}

impl<T> Paginated<T> {
    pub fn empty() -> Self {
        Self {
            page: 1,
            results: Vec::new(),
            total_pages: 0,
            total_results: 0,
        }
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            page: self.page,
            results: self.results.into_iter().map(f).collect(),
            total_pages: self.total_pages,
            total_results: self.total_results,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MovieSummary {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub original_title: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: i64,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub genre_ids: Vec<i64>,
    #[serde(default)]
    pub original_language: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TvSummary {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub original_name: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: i64,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub genre_ids: Vec<i64>,
    #[serde(default)]
    pub origin_country: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PersonSummary {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub profile_path: Option<String>,
    #[serde(default)]
    pub known_for_department: Option<String>,
    #[serde(default)]
    pub popularity: f64,
}

/// One row of `/search/multi` or `/trending/all`, tagged by TMDB's `media_type`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "media_type", rename_all = "lowercase")]
pub enum MultiResult {
    Movie(MovieSummary),
    Tv(TvSummary),
    Person(PersonSummary),
}

impl MultiResult {
    pub fn id(&self) -> i64 {
        match self {
            MultiResult::Movie(m) => m.id,
            MultiResult::Tv(t) => t.id,
            MultiResult::Person(p) => p.id,
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            MultiResult::Movie(m) => &m.title,
            MultiResult::Tv(t) => &t.name,
            MultiResult::Person(p) => &p.name,
        }
    }

    pub fn image_path(&self) -> Option<&str> {
        match self {
            MultiResult::Movie(m) => m.poster_path.as_deref(),
            MultiResult::Tv(t) => t.poster_path.as_deref(),
            MultiResult::Person(p) => p.profile_path.as_deref(),
        }
    }

    pub fn link(&self) -> String {
        match self {
            MultiResult::Movie(m) => format!("/movie/{}", m.id),
            MultiResult::Tv(t) => format!("/tv/{}", t.id),
            MultiResult::Person(p) => format!("/person/{}", p.id),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MultiResult::Movie(_) => "Movie",
            MultiResult::Tv(_) => "TV Show",
            MultiResult::Person(_) => "Person",
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Genre {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GenreList {
    #[serde(default)]
    pub genres: Vec<Genre>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProductionCompany {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub headquarters: Option<String>,
    #[serde(default)]
    pub homepage: Option<String>,
    #[serde(default)]
    pub logo_path: Option<String>,
    #[serde(default)]
    pub origin_country: Option<String>,
    #[serde(default)]
    pub parent_company: Option<Box<ProductionCompany>>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Network {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub headquarters: Option<String>,
    #[serde(default)]
    pub homepage: Option<String>,
    #[serde(default)]
    pub logo_path: Option<String>,
    #[serde(default)]
    pub origin_country: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProductionCountry {
    #[serde(default)]
    pub iso_3166_1: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SpokenLanguage {
    #[serde(default)]
    pub iso_639_1: String,
    #[serde(default)]
    pub english_name: Option<String>,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CollectionRef {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Collection {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub parts: Vec<MovieSummary>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MovieDetails {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub original_title: Option<String>,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub budget: i64,
    #[serde(default)]
    pub revenue: i64,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub homepage: Option<String>,
    #[serde(default)]
    pub imdb_id: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: i64,
    #[serde(default)]
    pub original_language: Option<String>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub production_companies: Vec<ProductionCompany>,
    #[serde(default)]
    pub production_countries: Vec<ProductionCountry>,
    #[serde(default)]
    pub spoken_languages: Vec<SpokenLanguage>,
    #[serde(default)]
    pub belongs_to_collection: Option<CollectionRef>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Creator {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub profile_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Season {
    pub id: i64,
    #[serde(default)]
    pub season_number: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub air_date: Option<String>,
    #[serde(default)]
    pub episode_count: i64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TvDetails {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub original_name: Option<String>,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub last_air_date: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, rename = "type")]
    pub show_type: Option<String>,
    #[serde(default)]
    pub number_of_seasons: Option<i64>,
    #[serde(default)]
    pub number_of_episodes: Option<i64>,
    #[serde(default)]
    pub episode_run_time: Vec<u32>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: i64,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub networks: Vec<Network>,
    #[serde(default)]
    pub production_companies: Vec<ProductionCompany>,
    #[serde(default)]
    pub created_by: Vec<Creator>,
    #[serde(default)]
    pub seasons: Vec<Season>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PersonDetails {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub biography: Option<String>,
    #[serde(default)]
    pub birthday: Option<String>,
    #[serde(default)]
    pub deathday: Option<String>,
    #[serde(default)]
    pub place_of_birth: Option<String>,
    #[serde(default)]
    pub profile_path: Option<String>,
    #[serde(default)]
    pub known_for_department: Option<String>,
    #[serde(default)]
    pub gender: i64,
    #[serde(default)]
    pub also_known_as: Vec<String>,
    #[serde(default)]
    pub homepage: Option<String>,
    #[serde(default)]
    pub imdb_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ExternalIds {
    #[serde(default)]
    pub imdb_id: Option<String>,
    #[serde(default)]
    pub facebook_id: Option<String>,
    #[serde(default)]
    pub instagram_id: Option<String>,
    #[serde(default)]
    pub twitter_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CastMember {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub character: Option<String>,
    #[serde(default)]
    pub profile_path: Option<String>,
    #[serde(default)]
    pub order: i64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CrewMember {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub job: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub profile_path: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Credits {
    #[serde(default)]
    pub cast: Vec<CastMember>,
    #[serde(default)]
    pub crew: Vec<CrewMember>,
}

/// A movie or TV credit from `/person/{id}/combined_credits`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CombinedCredit {
    pub id: i64,
    #[serde(default)]
    pub media_type: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub character: Option<String>,
    #[serde(default)]
    pub job: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: i64,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub episode_count: Option<i64>,
}

impl CombinedCredit {
    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or("Untitled")
    }

    /// Release date for movies, first air date for TV; empty strings count as missing.
    pub fn date(&self) -> Option<&str> {
        let raw = if self.media_type == "tv" {
            self.first_air_date.as_deref()
        } else {
            self.release_date.as_deref()
        };
        raw.filter(|d| !d.is_empty())
    }

    pub fn link(&self) -> String {
        if self.media_type == "tv" {
            format!("/tv/{}", self.id)
        } else {
            format!("/movie/{}", self.id)
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CombinedCredits {
    #[serde(default)]
    pub cast: Vec<CombinedCredit>,
    #[serde(default)]
    pub crew: Vec<CombinedCredit>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Video {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub site: String,
    #[serde(default, rename = "type")]
    pub video_type: String,
    #[serde(default)]
    pub official: bool,
}

impl Video {
    pub fn youtube_url(&self) -> Option<String> {
        (self.site == "YouTube").then(|| format!("https://www.youtube.com/watch?v={}", self.key))
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct VideoList {
    #[serde(default)]
    pub results: Vec<Video>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WatchProvider {
    pub provider_id: i64,
    #[serde(default)]
    pub provider_name: String,
    #[serde(default)]
    pub logo_path: Option<String>,
    #[serde(default)]
    pub display_priority: i64,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RegionProviders {
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub flatrate: Vec<WatchProvider>,
    #[serde(default)]
    pub rent: Vec<WatchProvider>,
    #[serde(default)]
    pub buy: Vec<WatchProvider>,
}

impl RegionProviders {
    pub fn is_empty(&self) -> bool {
        self.flatrate.is_empty() && self.rent.is_empty() && self.buy.is_empty()
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct WatchProviders {
    #[serde(default)]
    pub results: HashMap<String, RegionProviders>,
}

#[derive(Debug, Deserialize)]
pub struct TmdbErrorBody {
    #[serde(default)]
    pub status_code: i64,
    #[serde(default)]
    pub status_message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multi_results_dispatch_on_media_type() {
        let body = r#"{
            "page": 1,
            "results": [
                {"media_type": "movie", "id": 603, "title": "The Matrix", "vote_average": 8.2},
                {"media_type": "tv", "id": 1396, "name": "Breaking Bad", "first_air_date": "2008-01-20"},
                {"media_type": "person", "id": 6384, "name": "Keanu Reeves", "profile_path": "/k.jpg"}
            ],
            "total_pages": 1,
            "total_results": 3
        }"#;

        let page: Paginated<MultiResult> = serde_json::from_str(body).unwrap();
        assert_eq!(page.results.len(), 3);
        assert!(matches!(page.results[0], MultiResult::Movie(ref m) if m.title == "The Matrix"));
        assert_eq!(page.results[1].link(), "/tv/1396");
        assert_eq!(page.results[2].label(), "Person");
        assert_eq!(page.results[2].image_path(), Some("/k.jpg"));
        assert!(!page.has_next());
    }

    #[test]
    fn movie_details_tolerates_nulls_and_missing_fields() {
        let body = r#"{
            "id": 550,
            "title": "Fight Club",
            "runtime": null,
            "belongs_to_collection": null,
            "genres": [{"id": 18, "name": "Drama"}]
        }"#;

        let movie: MovieDetails = serde_json::from_str(body).unwrap();
        assert_eq!(movie.runtime, None);
        assert_eq!(movie.budget, 0);
        assert!(movie.belongs_to_collection.is_none());
        assert_eq!(movie.genres[0].name, "Drama");
    }

    #[test]
    fn combined_credit_date_uses_media_specific_field() {
        let tv: CombinedCredit = serde_json::from_str(
            r#"{"id": 1, "media_type": "tv", "name": "Show", "first_air_date": "2010-04-01"}"#,
        )
        .unwrap();
        let movie: CombinedCredit = serde_json::from_str(
            r#"{"id": 2, "media_type": "movie", "title": "Film", "release_date": ""}"#,
        )
        .unwrap();

        assert_eq!(tv.date(), Some("2010-04-01"));
        assert_eq!(tv.display_title(), "Show");
        assert_eq!(movie.date(), None);
        assert_eq!(movie.link(), "/movie/2");
    }
}
