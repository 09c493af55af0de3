//! Per-page loaders: each fires its requests as one parallel batch and shapes the
//! results for rendering. The first failure aborts the batch and becomes the page's
//! generic fetch error.

use chrono::Utc;
use tracing::error;

use crate::credits::{
    crew_with_jobs, known_for, merge_roles, sort_by_date_desc, top_cast, CREDITS_LIMIT, KNOWN_FOR_LIMIT,
    TOP_CAST_LIMIT,
};
use crate::error::AppError;
use crate::format::{age_on, parse_date, year_of};
use crate::models::{
    CastMember, Collection, CombinedCredit, CrewMember, ExternalIds, Genre, MovieDetails,
    MovieSummary, MultiResult, Network, Paginated, PersonDetails, ProductionCompany,
    RegionProviders, Season, TvDetails, TvSummary, Video, WatchProviders,
};
use crate::query::{DiscoverParams, MediaKind};
use crate::tmdb::MovieApi;

pub const WATCH_REGION: &str = "US";
pub const MAX_PAGE: u32 = 500;
const MIN_SEARCH_LEN: usize = 2;
const RATED_SORT_MIN_VOTES: u32 = 200;

/// A poster card as the grids render it.
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub link: String,
    pub title: String,
    pub image_path: Option<String>,
    pub year: Option<String>,
    pub rating: f64,
}

impl From<&MovieSummary> for Card {
    fn from(m: &MovieSummary) -> Self {
        Card {
            link: format!("/movie/{}", m.id),
            title: m.title.clone(),
            image_path: m.poster_path.clone(),
            year: year_of(m.release_date.as_deref()).map(String::from),
            rating: m.vote_average,
        }
    }
}

impl From<&TvSummary> for Card {
    fn from(t: &TvSummary) -> Self {
        Card {
            link: format!("/tv/{}", t.id),
            title: t.name.clone(),
            image_path: t.poster_path.clone(),
            year: year_of(t.first_air_date.as_deref()).map(String::from),
            rating: t.vote_average,
        }
    }
}

fn cards<'a, T: 'a>(items: impl IntoIterator<Item = &'a T>) -> Vec<Card>
where
    Card: From<&'a T>,
{
    items.into_iter().map(Card::from).collect()
}

fn fetch_failed(what: &'static str, err: anyhow::Error) -> AppError {
    error!("Failed to fetch {}: {:#}", what, err);
    AppError::fetch(what)
}

#[derive(Debug)]
pub struct HomePage {
    pub window: &'static str,
    pub trending_movies: Vec<Card>,
    pub trending_tv: Vec<Card>,
    pub popular_movies: Vec<Card>,
    pub popular_tv: Vec<Card>,
    pub now_playing: Vec<Card>,
    pub upcoming: Vec<Card>,
    pub on_the_air: Vec<Card>,
    pub airing_today: Vec<Card>,
    pub top_rated_movies: Vec<Card>,
    pub top_rated_tv: Vec<Card>,
}

pub async fn load_home(api: &dyn MovieApi, window: Option<&str>) -> Result<HomePage, AppError> {
    let window = if window == Some("week") { "week" } else { "day" };

    let (
        trending_movies,
        trending_tv,
        popular_movies,
        popular_tv,
        now_playing,
        upcoming,
        on_the_air,
        airing_today,
        top_movies,
        top_tv,
    ) = tokio::try_join!(
        api.trending_movies(window),
        api.trending_tv(window),
        api.popular_movies(1),
        api.popular_tv(1),
        api.now_playing_movies(1),
        api.upcoming_movies(1),
        api.on_the_air_tv(1),
        api.airing_today_tv(1),
        api.top_rated_movies(1),
        api.top_rated_tv(1),
    )
    .map_err(|e| fetch_failed("trending content", e))?;

    Ok(HomePage {
        window,
        trending_movies: cards(&trending_movies.results),
        trending_tv: cards(&trending_tv.results),
        popular_movies: cards(&popular_movies.results),
        popular_tv: cards(&popular_tv.results),
        now_playing: cards(&now_playing.results),
        upcoming: cards(&upcoming.results),
        on_the_air: cards(&on_the_air.results),
        airing_today: cards(&airing_today.results),
        top_rated_movies: cards(&top_movies.results),
        top_rated_tv: cards(&top_tv.results),
    })
}

#[derive(Debug)]
pub struct DiscoverPage {
    pub kind: MediaKind,
    pub genres: Vec<Genre>,
    pub params: DiscoverParams,
    pub results: Vec<Card>,
    pub page: u32,
    pub total_pages: u32,
    pub total_results: i32,
}

/// Turns raw form pairs into the params sent to TMDB: default sort, media-specific
/// sort names, clamped page and a vote floor for rating sorts.
pub fn discover_params<I, K, V>(kind: MediaKind, raw: I) -> DiscoverParams
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<String>,
{
    let mut params = DiscoverParams::from_pairs(raw);

    let sort = params.get("sort_by").unwrap_or("popularity.desc").to_string();
    let sort = kind.normalize_sort(&sort);
    if sort.starts_with("vote_average") && params.get("vote_count.gte").is_none() {
        params = params.min_votes(Some(RATED_SORT_MIN_VOTES));
    }

    // TMDB only matches lowercase ISO 639-1 codes.
    let language = params
        .get("with_original_language")
        .map(|l| l.trim().to_ascii_lowercase());
    params = params.with_original_language(language.as_deref());

    let page = params
        .get("page")
        .and_then(|p| p.parse::<u32>().ok())
        .unwrap_or(1)
        .clamp(1, MAX_PAGE);

    params.sort_by(&sort).page(page)
}

pub async fn load_discover<I, K, V>(
    api: &dyn MovieApi,
    kind: MediaKind,
    raw: I,
) -> Result<DiscoverPage, AppError>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<String>,
{
    let params = discover_params(kind, raw);

    let (genres, page, total_pages, total_results, results) = match kind {
        MediaKind::Movie => {
            let (genres, found) = tokio::try_join!(api.movie_genres(), api.discover_movies(&params))
                .map_err(|e| fetch_failed("discover results", e))?;
            (genres, found.page, found.total_pages, found.total_results, cards(&found.results))
        }
        MediaKind::Tv => {
            let (genres, found) = tokio::try_join!(api.tv_genres(), api.discover_tv(&params))
                .map_err(|e| fetch_failed("discover results", e))?;
            (genres, found.page, found.total_pages, found.total_results, cards(&found.results))
        }
    };

    Ok(DiscoverPage {
        kind,
        genres: genres.genres,
        params,
        results,
        page: u32::try_from(page).unwrap_or(1).max(1),
        total_pages: u32::try_from(total_pages).unwrap_or(0).min(MAX_PAGE),
        total_results,
    })
}

/// Which TMDB search endpoint a query goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchKind {
    #[default]
    All,
    Movie,
    Tv,
    Person,
}

impl SearchKind {
    pub const ALL: [SearchKind; 4] = [
        SearchKind::All,
        SearchKind::Movie,
        SearchKind::Tv,
        SearchKind::Person,
    ];

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "all" | "multi" => Some(SearchKind::All),
            "movie" => Some(SearchKind::Movie),
            "tv" => Some(SearchKind::Tv),
            "person" => Some(SearchKind::Person),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SearchKind::All => "all",
            SearchKind::Movie => "movie",
            SearchKind::Tv => "tv",
            SearchKind::Person => "person",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SearchKind::All => "All",
            SearchKind::Movie => "Movies",
            SearchKind::Tv => "TV Shows",
            SearchKind::Person => "People",
        }
    }
}

/// Runs `query` against the endpoint for `kind`. Typed results are wrapped as
/// `MultiResult` so every kind renders the same way.
pub async fn search(
    api: &dyn MovieApi,
    kind: SearchKind,
    query: &str,
    page: u32,
) -> anyhow::Result<Paginated<MultiResult>> {
    Ok(match kind {
        SearchKind::All => api.search_multi(query, page).await?,
        SearchKind::Movie => api.search_movies(query, page).await?.map(MultiResult::Movie),
        SearchKind::Tv => api.search_tv(query, page).await?.map(MultiResult::Tv),
        SearchKind::Person => api.search_people(query, page).await?.map(MultiResult::Person),
    })
}

#[derive(Debug)]
pub struct SearchPage {
    pub query: String,
    pub kind: SearchKind,
    pub results: Paginated<MultiResult>,
}

pub async fn load_search(
    api: &dyn MovieApi,
    query: &str,
    kind: SearchKind,
    page: u32,
) -> Result<SearchPage, AppError> {
    let query = query.trim();
    if query.chars().count() < MIN_SEARCH_LEN {
        return Ok(SearchPage {
            query: query.to_string(),
            kind,
            results: Paginated::empty(),
        });
    }

    let results = search(api, kind, query, page.clamp(1, MAX_PAGE))
        .await
        .map_err(|e| fetch_failed("search results", e))?;

    Ok(SearchPage {
        query: query.to_string(),
        kind,
        results,
    })
}

/// First YouTube trailer, official ones preferred, falling back to a teaser.
pub fn pick_trailer(videos: &[Video]) -> Option<Video> {
    let youtube: Vec<&Video> = videos.iter().filter(|v| v.site == "YouTube").collect();
    youtube
        .iter()
        .find(|v| v.video_type == "Trailer" && v.official)
        .or_else(|| youtube.iter().find(|v| v.video_type == "Trailer"))
        .or_else(|| youtube.iter().find(|v| v.video_type == "Teaser"))
        .map(|v| (*v).clone())
}

/// Providers for `region`, each group ordered by TMDB's display priority.
pub fn providers_for(providers: WatchProviders, region: &str) -> Option<RegionProviders> {
    let mut found = providers.results.get(region).cloned()?;
    for group in [&mut found.flatrate, &mut found.rent, &mut found.buy] {
        group.sort_by_key(|p| p.display_priority);
    }
    (!found.is_empty()).then_some(found)
}

/// The "more like this" row: TMDB recommendations, or similar titles when a title
/// has no recommendations yet.
#[derive(Debug)]
pub struct Related {
    pub heading: &'static str,
    pub cards: Vec<Card>,
}

impl Related {
    fn recommended(cards: Vec<Card>) -> Self {
        Related {
            heading: "Recommendations",
            cards,
        }
    }

    fn similar(cards: Vec<Card>) -> Self {
        Related {
            heading: "Similar",
            cards,
        }
    }
}

#[derive(Debug)]
pub struct MoviePage {
    pub movie: MovieDetails,
    pub cast: Vec<CastMember>,
    pub directors: Vec<CrewMember>,
    pub writers: Vec<CrewMember>,
    pub trailer: Option<Video>,
    pub related: Related,
    pub providers: Option<RegionProviders>,
    pub collection: Option<Collection>,
}

pub async fn load_movie(api: &dyn MovieApi, id: i64) -> Result<MoviePage, AppError> {
    const WHAT: &str = "movie details";

    let (movie, credits, videos, recommendations, providers) = tokio::try_join!(
        api.movie_details(id),
        api.movie_credits(id),
        api.movie_videos(id),
        api.movie_recommendations(id),
        api.movie_watch_providers(id),
    )
    .map_err(|e| fetch_failed(WHAT, e))?;

    let collection = match &movie.belongs_to_collection {
        Some(part_of) => Some(
            api.collection_details(part_of.id)
                .await
                .map_err(|e| fetch_failed(WHAT, e))?,
        ),
        None => None,
    };

    let related = if recommendations.results.is_empty() {
        let similar = api
            .movie_similar(id)
            .await
            .map_err(|e| fetch_failed(WHAT, e))?;
        Related::similar(cards(&similar.results))
    } else {
        Related::recommended(cards(&recommendations.results))
    };

    let directors = crew_with_jobs(&credits.crew, &["Director"])
        .into_iter()
        .cloned()
        .collect();
    let writers = crew_with_jobs(&credits.crew, &["Screenplay", "Writer", "Story"])
        .into_iter()
        .cloned()
        .collect();

    Ok(MoviePage {
        cast: top_cast(&credits.cast, TOP_CAST_LIMIT),
        directors,
        writers,
        trailer: pick_trailer(&videos.results),
        related,
        providers: providers_for(providers, WATCH_REGION),
        collection,
        movie,
    })
}

#[derive(Debug)]
pub struct TvPage {
    pub show: TvDetails,
    pub seasons: Vec<Season>,
    pub cast: Vec<CastMember>,
    pub trailer: Option<Video>,
    pub related: Related,
    pub providers: Option<RegionProviders>,
}

pub async fn load_tv(api: &dyn MovieApi, id: i64) -> Result<TvPage, AppError> {
    const WHAT: &str = "TV show details";

    let (show, credits, videos, recommendations, providers) = tokio::try_join!(
        api.tv_details(id),
        api.tv_credits(id),
        api.tv_videos(id),
        api.tv_recommendations(id),
        api.tv_watch_providers(id),
    )
    .map_err(|e| fetch_failed(WHAT, e))?;

    let related = if recommendations.results.is_empty() {
        let similar = api.tv_similar(id).await.map_err(|e| fetch_failed(WHAT, e))?;
        Related::similar(cards(&similar.results))
    } else {
        Related::recommended(cards(&recommendations.results))
    };

    // Season 0 holds specials.
    let seasons = show
        .seasons
        .iter()
        .filter(|s| s.season_number > 0)
        .cloned()
        .collect();

    Ok(TvPage {
        seasons,
        cast: top_cast(&credits.cast, TOP_CAST_LIMIT),
        trailer: pick_trailer(&videos.results),
        related,
        providers: providers_for(providers, WATCH_REGION),
        show,
    })
}

#[derive(Debug)]
pub struct PersonPage {
    pub person: PersonDetails,
    pub age: Option<i32>,
    pub known_for: Vec<CombinedCredit>,
    pub timeline: Vec<CombinedCredit>,
    pub external_ids: ExternalIds,
}

pub async fn load_person(api: &dyn MovieApi, id: i64) -> Result<PersonPage, AppError> {
    let (person, combined, external_ids) = tokio::try_join!(
        api.person_details(id),
        api.person_combined_credits(id),
        api.person_external_ids(id),
    )
    .map_err(|e| fetch_failed("person details", e))?;

    // Directors and writers are better described by their crew credits.
    let acting = person.known_for_department.as_deref().unwrap_or("Acting") == "Acting";
    let credits = merge_roles(if acting || combined.crew.is_empty() {
        combined.cast
    } else {
        combined.crew
    });

    let until = person
        .deathday
        .as_deref()
        .and_then(parse_date)
        .unwrap_or_else(|| Utc::now().date_naive());
    let age = person.birthday.as_deref().and_then(|b| age_on(b, until));

    Ok(PersonPage {
        age,
        known_for: known_for(&credits, KNOWN_FOR_LIMIT),
        timeline: sort_by_date_desc(credits, CREDITS_LIMIT),
        external_ids,
        person,
    })
}

#[derive(Debug)]
pub struct CompanyPage {
    pub company: ProductionCompany,
    pub movies: Vec<Card>,
    pub total_results: i32,
}

pub async fn load_company(api: &dyn MovieApi, id: i64) -> Result<CompanyPage, AppError> {
    let params = DiscoverParams::new()
        .with_companies(id)
        .sort_by("popularity.desc")
        .page(1);

    let (company, movies) = tokio::try_join!(api.company_details(id), api.discover_movies(&params))
        .map_err(|e| fetch_failed("company details", e))?;

    Ok(CompanyPage {
        company,
        movies: cards(&movies.results),
        total_results: movies.total_results,
    })
}

#[derive(Debug)]
pub struct NetworkPage {
    pub network: Network,
    pub shows: Vec<Card>,
    pub total_results: i32,
}

pub async fn load_network(api: &dyn MovieApi, id: i64) -> Result<NetworkPage, AppError> {
    let params = DiscoverParams::new()
        .with_networks(id)
        .sort_by("popularity.desc")
        .page(1);

    let (network, shows) = tokio::try_join!(api.network_details(id), api.discover_tv(&params))
        .map_err(|e| fetch_failed("network details", e))?;

    Ok(NetworkPage {
        network,
        shows: cards(&shows.results),
        total_results: shows.total_results,
    })
}
