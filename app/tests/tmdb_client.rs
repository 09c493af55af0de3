use marquee::query::DiscoverParams;
use marquee::tmdb::{MovieApi, TmdbClient};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const V3_KEY: &str = "0123456789abcdef0123456789abcdef";
const V4_TOKEN: &str = "eyJhbGciOiJIUzI1NiJ9.read-token.signature";

fn client(server: &MockServer, key: &str) -> TmdbClient {
    TmdbClient::new(key, "en-US")
        .expect("client builds")
        .with_base_url(&server.uri())
}

#[tokio::test]
async fn bearer_token_is_sent_as_header_with_language() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/genre/movie/list"))
        .and(header("authorization", format!("Bearer {V4_TOKEN}").as_str()))
        .and(query_param("language", "en-US"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "genres": [{"id": 28, "name": "Action"}, {"id": 18, "name": "Drama"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let genres = client(&server, V4_TOKEN).movie_genres().await.unwrap();
    assert_eq!(genres.genres.len(), 2);
    assert_eq!(genres.genres[1].name, "Drama");
}

#[tokio::test]
async fn v3_key_is_sent_as_query_parameter_without_auth_header() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/movie/550"))
        .and(query_param("api_key", V3_KEY))
        .and(query_param("language", "en-US"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 550,
            "title": "Fight Club",
            "runtime": 139,
            "budget": 63000000
        })))
        .mount(&server)
        .await;

    let movie = client(&server, V3_KEY).movie_details(550).await.unwrap();
    assert_eq!(movie.title, "Fight Club");
    assert_eq!(movie.runtime, Some(139));

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn discover_query_omits_blank_params_and_appends_fixed_ones() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/discover/movie"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "page": 1,
            "results": [{"id": 27205, "title": "Inception", "release_date": "2010-07-15"}],
            "total_pages": 1,
            "total_results": 1
        })))
        .mount(&server)
        .await;

    let params = DiscoverParams::new()
        .with_genres(&[28, 878])
        .set("with_cast", "")
        .set_opt::<i32>("primary_release_year", None)
        .sort_by("popularity.desc")
        .page(1);

    let found = client(&server, V4_TOKEN)
        .discover_movies(&params)
        .await
        .unwrap();
    assert_eq!(found.results[0].title, "Inception");

    let requests = server.received_requests().await.unwrap();
    assert_eq!(
        requests[0].url.query(),
        Some("include_adult=false&page=1&sort_by=popularity.desc&with_genres=28%2C878&language=en-US")
    );
}

#[tokio::test]
async fn search_encodes_the_query() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/multi"))
        .and(query_param("query", "amélie & co"))
        .and(query_param("include_adult", "false"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "page": 2,
            "results": [
                {"media_type": "movie", "id": 194, "title": "Amélie"},
                {"media_type": "person", "id": 1, "name": "Somebody"}
            ],
            "total_pages": 3,
            "total_results": 42
        })))
        .expect(1)
        .mount(&server)
        .await;

    let results = client(&server, V4_TOKEN)
        .search_multi("amélie & co", 2)
        .await
        .unwrap();
    assert_eq!(results.results.len(), 2);
    assert_eq!(results.results[0].display_name(), "Amélie");
    assert!(results.has_next());
}

#[tokio::test]
async fn error_status_surfaces_tmdb_message() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/tv/999999"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "success": false,
            "status_code": 34,
            "status_message": "The resource you requested could not be found."
        })))
        .mount(&server)
        .await;

    let err = client(&server, V4_TOKEN)
        .tv_details(999_999)
        .await
        .unwrap_err();
    let message = format!("{err:#}");
    assert!(message.contains("404"), "{message}");
    assert!(message.contains("could not be found"), "{message}");
}

#[tokio::test]
async fn malformed_body_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/person/1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = client(&server, V4_TOKEN).person_details(1).await.unwrap_err();
    assert!(format!("{err:#}").contains("failed to decode"));
}

#[tokio::test]
async fn trending_window_defaults_to_day() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/trending/tv/day"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "page": 1,
            "results": [{"id": 1396, "name": "Breaking Bad"}],
            "total_pages": 1,
            "total_results": 1
        })))
        .expect(1)
        .mount(&server)
        .await;

    let trending = client(&server, V4_TOKEN)
        .trending_tv("fortnight")
        .await
        .unwrap();
    assert_eq!(trending.results[0].name, "Breaking Bad");
}

fn movie_list(title: &str) -> serde_json::Value {
    json!({
        "page": 1,
        "results": [{"id": 1, "title": title}],
        "total_pages": 1,
        "total_results": 1
    })
}

fn tv_list(name: &str) -> serde_json::Value {
    json!({
        "page": 1,
        "results": [{"id": 1, "name": name}],
        "total_pages": 1,
        "total_results": 1
    })
}

#[tokio::test]
async fn list_endpoints_hit_their_paths_with_page() {
    let server = MockServer::start().await;

    for (list_path, body) in [
        ("/movie/now_playing", movie_list("Now")),
        ("/movie/upcoming", movie_list("Soon")),
        ("/tv/popular", tv_list("Popular")),
        ("/tv/on_the_air", tv_list("On Air")),
        ("/tv/airing_today", tv_list("Today")),
    ] {
        Mock::given(method("GET"))
            .and(path(list_path))
            .and(query_param("page", "3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .expect(1)
            .mount(&server)
            .await;
    }

    let tmdb = client(&server, V4_TOKEN);
    assert_eq!(tmdb.now_playing_movies(3).await.unwrap().results[0].title, "Now");
    assert_eq!(tmdb.upcoming_movies(3).await.unwrap().results[0].title, "Soon");
    assert_eq!(tmdb.popular_tv(3).await.unwrap().results[0].name, "Popular");
    assert_eq!(tmdb.on_the_air_tv(3).await.unwrap().results[0].name, "On Air");
    assert_eq!(tmdb.airing_today_tv(3).await.unwrap().results[0].name, "Today");
}

#[tokio::test]
async fn typed_searches_use_their_own_endpoints() {
    let server = MockServer::start().await;

    for (search_path, body) in [
        ("/search/movie", movie_list("Heat")),
        ("/search/tv", tv_list("Dark")),
        (
            "/search/person",
            json!({"page": 1, "results": [{"id": 525, "name": "Christopher Nolan"}], "total_pages": 1, "total_results": 1}),
        ),
    ] {
        Mock::given(method("GET"))
            .and(path(search_path))
            .and(query_param("query", "dark heat"))
            .and(query_param("include_adult", "false"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .expect(1)
            .mount(&server)
            .await;
    }

    let tmdb = client(&server, V4_TOKEN);
    assert_eq!(tmdb.search_movies("dark heat", 1).await.unwrap().results[0].title, "Heat");
    assert_eq!(tmdb.search_tv("dark heat", 1).await.unwrap().results[0].name, "Dark");
    assert_eq!(
        tmdb.search_people("dark heat", 1).await.unwrap().results[0].name,
        "Christopher Nolan"
    );
}

#[tokio::test]
async fn similar_titles_are_fetched_per_id() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/movie/27205/similar"))
        .respond_with(ResponseTemplate::new(200).set_body_json(movie_list("Interstellar")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/tv/1396/similar"))
        .respond_with(ResponseTemplate::new(200).set_body_json(tv_list("Ozark")))
        .expect(1)
        .mount(&server)
        .await;

    let tmdb = client(&server, V4_TOKEN);
    assert_eq!(tmdb.movie_similar(27205).await.unwrap().results[0].title, "Interstellar");
    assert_eq!(tmdb.tv_similar(1396).await.unwrap().results[0].name, "Ozark");
}
