use crate::format::{
    format_currency, format_date, format_rating, format_runtime, truncate_words, year_of,
};
use crate::models::{CastMember, CombinedCredit, MultiResult, Paginated, RegionProviders, Video};
use crate::pages::{
    Card, CompanyPage, DiscoverPage, HomePage, MoviePage, NetworkPage, PersonPage, SearchKind,
    SearchPage, TvPage,
};
use crate::query::{build_query_string, DiscoverParams, MediaKind, SORT_OPTIONS};
use crate::tmdb::{image_url, PLACEHOLDER_IMAGE};

const APP_NAME: &str = "Marquee";
const BIO_PREVIEW_CHARS: usize = 600;

pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

pub fn render_home(page: &HomePage) -> String {
    let mut html = String::new();
    html.push_str(&base_start(APP_NAME, ""));

    let (day_class, week_class) = if page.window == "week" {
        ("tab", "tab active")
    } else {
        ("tab active", "tab")
    };

    html.push_str(&format!(
        r#"
    <div class="home-page">
        <section class="hero">
            <h1>Discover your next favorite</h1>
            <p>Millions of movies, TV shows and people to explore.</p>
        </section>
        <div class="tabs"><a class="{}" href="/?window=day">Today</a><a class="{}" href="/?window=week">This Week</a></div>
"#,
        day_class, week_class
    ));

    for (heading, row) in [
        ("Trending Movies", &page.trending_movies),
        ("Trending TV Shows", &page.trending_tv),
        ("Popular Movies", &page.popular_movies),
        ("Popular TV Shows", &page.popular_tv),
        ("Now Playing in Theaters", &page.now_playing),
        ("Coming Soon", &page.upcoming),
        ("On The Air", &page.on_the_air),
        ("Airing Today", &page.airing_today),
        ("Top Rated Movies", &page.top_rated_movies),
        ("Top Rated TV Shows", &page.top_rated_tv),
    ] {
        html.push_str(&card_row(heading, row));
    }

    html.push_str("</div>");
    html.push_str(&base_end());
    html
}

pub fn render_discover(page: &DiscoverPage) -> String {
    let mut html = String::new();
    html.push_str(&base_start(&format!("Discover - {}", APP_NAME), ""));

    let kind = page.kind.as_str();
    let year_key = match page.kind {
        MediaKind::Movie => "primary_release_year",
        MediaKind::Tv => "first_air_date_year",
    };
    let selected_genre = page.params.get("with_genres").unwrap_or("");
    let selected_sort = page.params.get("sort_by").unwrap_or("popularity.desc");

    html.push_str(&format!(
        r#"
    <div class="discover-page">
        <h1>Discover</h1>
        <div class="tabs"><a class="{}" href="/discover?media=movie">Movies</a><a class="{}" href="/discover?media=tv">TV Shows</a></div>
        <form class="filters" action="/discover" method="get">
            <input type="hidden" name="media" value="{}">
            <div class="filter-group">
                <label for="with_genres">Genre</label>
                <select id="with_genres" name="with_genres">
                    <option value="">All Genres</option>
"#,
        if page.kind == MediaKind::Movie { "tab active" } else { "tab" },
        if page.kind == MediaKind::Tv { "tab active" } else { "tab" },
        kind
    ));

    for genre in &page.genres {
        let id = genre.id.to_string();
        html.push_str(&format!(
            r#"<option value="{}"{}>{}</option>"#,
            id,
            selected(id == selected_genre),
            escape(&genre.name)
        ));
    }

    html.push_str(
        r#"
                </select>
            </div>
            <div class="filter-group">
                <label for="sort_by">Sort By</label>
                <select id="sort_by" name="sort_by">
"#,
    );

    for (value, label) in SORT_OPTIONS {
        let value = page.kind.normalize_sort(value);
        html.push_str(&format!(
            r#"<option value="{}"{}>{}</option>"#,
            value,
            selected(value == selected_sort),
            label
        ));
    }

    html.push_str(&format!(
        r#"
                </select>
            </div>
            <div class="filter-group">
                <label for="year">Year</label>
                <input type="number" id="year" name="{}" placeholder="e.g. 2023" min="1900" max="2099" value="{}">
            </div>
            <div class="filter-group">
                <label for="min_rating">Min Rating</label>
                <select id="min_rating" name="vote_average.gte">
                    <option value="">Any</option>
"#,
        year_key,
        escape(page.params.get(year_key).unwrap_or(""))
    ));

    let selected_rating = page.params.get("vote_average.gte").unwrap_or("");
    for rating in ["9", "8", "7", "6", "5"] {
        html.push_str(&format!(
            r#"<option value="{}"{}>{}+</option>"#,
            rating,
            selected(rating == selected_rating),
            rating
        ));
    }

    html.push_str(&format!(
        r#"
                </select>
            </div>
            <button type="submit">Apply</button>
        </form>
        <p class="result-count">{} results</p>
"#,
        page.total_results
    ));

    if page.results.is_empty() {
        html.push_str(r#"<div class="no-results">No results found</div>"#);
    } else {
        html.push_str(&card_grid(&page.results));
    }

    html.push_str(&pagination(page));
    html.push_str("</div>");
    html.push_str(&base_end());
    html
}

fn pagination(page: &DiscoverPage) -> String {
    let link = |target: u32| {
        let params = page.params.clone().page(target);
        let query = build_query_string(&params, &[("media", page.kind.as_str())]);
        format!("/discover?{}", escape(&query))
    };

    let mut html = String::from(r#"<nav class="pagination">"#);
    if page.page > 1 {
        html.push_str(&format!(r#"<a href="{}">← Previous</a>"#, link(page.page - 1)));
    }
    html.push_str(&format!(
        r#"<span>Page {} of {}</span>"#,
        page.page,
        page.total_pages.max(1)
    ));
    if page.page < page.total_pages {
        html.push_str(&format!(r#"<a href="{}">Next →</a>"#, link(page.page + 1)));
    }
    html.push_str("</nav>");
    html
}

pub fn render_search(page: &SearchPage) -> String {
    let mut html = String::new();
    html.push_str(&base_start(&format!("Search - {}", APP_NAME), &page.query));

    html.push_str(&format!(
        r#"
    <div class="search-page">
        <h1>Search Movies, TV Shows & People</h1>
        <form class="search-box" action="/search" method="get">
            <input type="text" name="q" placeholder="Search for movies, TV shows, people..." value="{}" autofocus>
            <input type="hidden" name="type" value="{}">
            <button type="submit">Search</button>
        </form>
"#,
        escape(&page.query),
        page.kind.as_str()
    ));

    html.push_str(r#"<div class="tabs">"#);
    for kind in SearchKind::ALL {
        let params = DiscoverParams::new()
            .set("q", &page.query)
            .set("type", kind.as_str());
        html.push_str(&format!(
            r#"<a class="{}" href="/search?{}">{}</a>"#,
            if kind == page.kind { "tab active" } else { "tab" },
            escape(&build_query_string(&params, &[])),
            kind.label()
        ));
    }
    html.push_str("</div>");

    if !page.query.is_empty() {
        if page.results.results.is_empty() {
            html.push_str(r#"<div class="no-results">No results found</div>"#);
        } else {
            html.push_str(r#"<div class="content-grid">"#);
            for item in &page.results.results {
                html.push_str(&search_card(item));
            }
            html.push_str("</div>");
            html.push_str(&search_pagination(&page.query, page.kind, &page.results));
        }
    }

    html.push_str("</div>");
    html.push_str(&base_end());
    html
}

fn search_card(item: &MultiResult) -> String {
    let subtitle = match item {
        MultiResult::Movie(m) => year_of(m.release_date.as_deref()).unwrap_or("").to_string(),
        MultiResult::Tv(t) => year_of(t.first_air_date.as_deref()).unwrap_or("").to_string(),
        MultiResult::Person(p) => p.known_for_department.clone().unwrap_or_default(),
    };
    format!(
        r#"<div class="content-card"><a href="{}"><img src="{}" alt="{}" loading="lazy" onerror="this.src='{}'"><div class="card-info"><h3>{}</h3><p>{}</p><span class="media-type">{}</span></div></a></div>"#,
        item.link(),
        escape(&image_url(item.image_path(), "w342")),
        escape(item.display_name()),
        PLACEHOLDER_IMAGE,
        escape(item.display_name()),
        escape(&subtitle),
        item.label()
    )
}

fn search_pagination(query: &str, kind: SearchKind, results: &Paginated<MultiResult>) -> String {
    let link = |target: i32| {
        let params = DiscoverParams::new()
            .set("q", query)
            .set("type", kind.as_str())
            .set("page", target);
        format!("/search?{}", escape(&build_query_string(&params, &[])))
    };
    let mut html = String::from(r#"<nav class="pagination">"#);
    if results.page > 1 {
        html.push_str(&format!(r#"<a href="{}">← Previous</a>"#, link(results.page - 1)));
    }
    html.push_str(&format!(
        r#"<span>Page {} of {}</span>"#,
        results.page,
        results.total_pages.max(1)
    ));
    if results.has_next() {
        html.push_str(&format!(r#"<a href="{}">Next →</a>"#, link(results.page + 1)));
    }
    html.push_str("</nav>");
    html
}

pub fn render_movie(page: &MoviePage) -> String {
    let movie = &page.movie;
    let mut html = String::new();
    html.push_str(&base_start(&format!("{} - {}", movie.title, APP_NAME), ""));

    let year = year_of(movie.release_date.as_deref())
        .map(|y| format!("({})", y))
        .unwrap_or_default();
    let runtime = movie.runtime.map(format_runtime).unwrap_or_default();
    let genres = movie
        .genres
        .iter()
        .map(|g| escape(&g.name))
        .collect::<Vec<_>>()
        .join(", ");

    html.push_str(&hero(
        movie.backdrop_path.as_deref(),
        movie.poster_path.as_deref(),
        &movie.title,
        &year,
        movie.tagline.as_deref(),
        &[
            format!("⭐ {} ({} votes)", format_rating(movie.vote_average), movie.vote_count),
            format_date(movie.release_date.as_deref()),
            runtime,
            genres,
        ],
        movie.overview.as_deref(),
        page.trailer.as_ref(),
    ));

    html.push_str(r#"<section class="facts"><dl>"#);
    if !page.directors.is_empty() {
        let names: Vec<_> = page
            .directors
            .iter()
            .map(|d| format!(r#"<a href="/person/{}">{}</a>"#, d.id, escape(&d.name)))
            .collect();
        html.push_str(&fact("Director", &names.join(", ")));
    }
    if !page.writers.is_empty() {
        let names: Vec<_> = page
            .writers
            .iter()
            .map(|w| format!(r#"<a href="/person/{}">{}</a>"#, w.id, escape(&w.name)))
            .collect();
        html.push_str(&fact("Writers", &names.join(", ")));
    }
    if let Some(status) = &movie.status {
        html.push_str(&fact("Status", &escape(status)));
    }
    if let Some(language) = movie.spoken_languages.first() {
        let name = language.english_name.as_deref().unwrap_or(&language.name);
        html.push_str(&fact("Language", &escape(name)));
    }
    if movie.budget > 0 {
        html.push_str(&fact("Budget", &format_currency(movie.budget)));
    }
    if movie.revenue > 0 {
        html.push_str(&fact("Revenue", &format_currency(movie.revenue)));
    }
    if !movie.production_companies.is_empty() {
        let names: Vec<_> = movie
            .production_companies
            .iter()
            .map(|c| format!(r#"<a href="/company/{}">{}</a>"#, c.id, escape(&c.name)))
            .collect();
        html.push_str(&fact("Studios", &names.join(", ")));
    }
    html.push_str("</dl></section>");

    html.push_str(&providers_section(page.providers.as_ref()));
    html.push_str(&cast_section(&page.cast));

    if let Some(collection) = &page.collection {
        html.push_str(&format!(
            r#"<section class="collection"><h2>Part of the {}</h2>"#,
            escape(&collection.name)
        ));
        let mut parts = collection.parts.clone();
        parts.sort_by(|a, b| a.release_date.cmp(&b.release_date));
        let cards: Vec<Card> = parts.iter().map(Card::from).collect();
        html.push_str(&card_grid(&cards));
        html.push_str("</section>");
    }

    html.push_str(&card_row(page.related.heading, &page.related.cards));
    html.push_str("</div>");
    html.push_str(&base_end());
    html
}

pub fn render_tv(page: &TvPage) -> String {
    let show = &page.show;
    let mut html = String::new();
    html.push_str(&base_start(&format!("{} - {}", show.name, APP_NAME), ""));

    let year = year_of(show.first_air_date.as_deref())
        .map(|y| format!("({})", y))
        .unwrap_or_default();
    let seasons = show
        .number_of_seasons
        .map(|s| format!("{} season{}", s, if s == 1 { "" } else { "s" }))
        .unwrap_or_default();
    let runtime = show
        .episode_run_time
        .first()
        .map(|m| format_runtime(*m))
        .unwrap_or_default();
    let genres = show
        .genres
        .iter()
        .map(|g| escape(&g.name))
        .collect::<Vec<_>>()
        .join(", ");

    html.push_str(&hero(
        show.backdrop_path.as_deref(),
        show.poster_path.as_deref(),
        &show.name,
        &year,
        show.tagline.as_deref(),
        &[
            format!("⭐ {} ({} votes)", format_rating(show.vote_average), show.vote_count),
            seasons,
            runtime,
            genres,
        ],
        show.overview.as_deref(),
        page.trailer.as_ref(),
    ));

    html.push_str(r#"<section class="facts"><dl>"#);
    if !show.created_by.is_empty() {
        let names: Vec<_> = show
            .created_by
            .iter()
            .map(|c| format!(r#"<a href="/person/{}">{}</a>"#, c.id, escape(&c.name)))
            .collect();
        html.push_str(&fact("Created by", &names.join(", ")));
    }
    if !show.networks.is_empty() {
        let names: Vec<_> = show
            .networks
            .iter()
            .map(|n| format!(r#"<a href="/network/{}">{}</a>"#, n.id, escape(&n.name)))
            .collect();
        html.push_str(&fact("Networks", &names.join(", ")));
    }
    if let Some(status) = &show.status {
        html.push_str(&fact("Status", &escape(status)));
    }
    if let Some(kind) = &show.show_type {
        html.push_str(&fact("Type", &escape(kind)));
    }
    html.push_str(&fact("First aired", &format_date(show.first_air_date.as_deref())));
    html.push_str(&fact("Last aired", &format_date(show.last_air_date.as_deref())));
    if let Some(episodes) = show.number_of_episodes {
        html.push_str(&fact("Episodes", &episodes.to_string()));
    }
    html.push_str("</dl></section>");

    html.push_str(&providers_section(page.providers.as_ref()));

    if !page.seasons.is_empty() {
        html.push_str(r#"<section class="seasons-section"><h2>Seasons</h2><div class="season-list">"#);
        for season in &page.seasons {
            let aired = year_of(season.air_date.as_deref()).unwrap_or("TBA");
            html.push_str(&format!(
                r#"<div class="season-item"><img src="{}" alt="{}" loading="lazy" onerror="this.src='{}'"><div><h3>{}</h3><p>{} | {} episodes</p></div></div>"#,
                escape(&image_url(season.poster_path.as_deref(), "w154")),
                escape(&season.name),
                PLACEHOLDER_IMAGE,
                escape(&season.name),
                aired,
                season.episode_count
            ));
        }
        html.push_str("</div></section>");
    }

    html.push_str(&cast_section(&page.cast));
    html.push_str(&card_row(page.related.heading, &page.related.cards));
    html.push_str("</div>");
    html.push_str(&base_end());
    html
}

pub fn render_person(page: &PersonPage) -> String {
    let person = &page.person;
    let mut html = String::new();
    html.push_str(&base_start(&format!("{} - {}", person.name, APP_NAME), ""));

    html.push_str(&format!(
        r#"<div class="detail-page person-page"><div class="detail-content"><img class="detail-poster" src="{}" alt="{}" onerror="this.src='{}'"><div class="detail-info"><h1>{}</h1>"#,
        escape(&image_url(person.profile_path.as_deref(), "h632")),
        escape(&person.name),
        PLACEHOLDER_IMAGE,
        escape(&person.name)
    ));

    html.push_str("<dl>");
    if let Some(department) = &person.known_for_department {
        html.push_str(&fact("Known for", &escape(department)));
    }
    let born = match (person.birthday.as_deref(), page.age, person.deathday.is_some()) {
        (Some(b), Some(age), false) => format!("{} ({} years old)", format_date(Some(b)), age),
        (b, _, _) => format_date(b),
    };
    html.push_str(&fact("Born", &born));
    if let Some(death) = person.deathday.as_deref() {
        let died = match page.age {
            Some(age) => format!("{} ({} years old)", format_date(Some(death)), age),
            None => format_date(Some(death)),
        };
        html.push_str(&fact("Died", &died));
    }
    if let Some(place) = &person.place_of_birth {
        html.push_str(&fact("Place of birth", &escape(place)));
    }
    html.push_str("</dl>");

    let mut links = Vec::new();
    if let Some(imdb) = page.external_ids.imdb_id.as_deref().or(person.imdb_id.as_deref()) {
        links.push(format!(
            r#"<a href="https://www.imdb.com/name/{}" rel="noopener">IMDb</a>"#,
            escape(imdb)
        ));
    }
    if let Some(instagram) = &page.external_ids.instagram_id {
        links.push(format!(
            r#"<a href="https://www.instagram.com/{}" rel="noopener">Instagram</a>"#,
            escape(instagram)
        ));
    }
    if let Some(twitter) = &page.external_ids.twitter_id {
        links.push(format!(
            r#"<a href="https://x.com/{}" rel="noopener">X</a>"#,
            escape(twitter)
        ));
    }
    if !links.is_empty() {
        html.push_str(&format!(r#"<p class="links">{}</p>"#, links.join(" · ")));
    }

    let biography = person
        .biography
        .as_deref()
        .filter(|b| !b.trim().is_empty())
        .unwrap_or("No biography available.");
    html.push_str(&format!(
        r#"<h2>Biography</h2><p class="overview">{}</p></div></div>"#,
        escape(&truncate_words(biography, BIO_PREVIEW_CHARS))
    ));

    if !page.known_for.is_empty() {
        html.push_str(r#"<section class="content-section"><h2>Known For</h2><div class="content-row">"#);
        for credit in &page.known_for {
            html.push_str(&credit_card(credit));
        }
        html.push_str("</div></section>");
    }

    if !page.timeline.is_empty() {
        html.push_str(r#"<section class="credits-section"><h2>Credits</h2><table class="credits">"#);
        for credit in &page.timeline {
            let role = credit
                .character
                .as_deref()
                .or(credit.job.as_deref())
                .filter(|r| !r.is_empty())
                .map(|r| format!(" as {}", escape(r)))
                .unwrap_or_default();
            html.push_str(&format!(
                r#"<tr><td class="year">{}</td><td><a href="{}">{}</a>{}</td></tr>"#,
                year_of(credit.date()).unwrap_or("—"),
                credit.link(),
                escape(credit.display_title()),
                role
            ));
        }
        html.push_str("</table></section>");
    }

    html.push_str("</div>");
    html.push_str(&base_end());
    html
}

pub fn render_company(page: &CompanyPage) -> String {
    let company = &page.company;
    let mut html = String::new();
    html.push_str(&base_start(&format!("{} - {}", company.name, APP_NAME), ""));

    html.push_str(&studio_header(
        &company.name,
        company.logo_path.as_deref(),
        company.headquarters.as_deref(),
        company.origin_country.as_deref(),
        company.homepage.as_deref(),
    ));
    if let Some(description) = company.description.as_deref().filter(|d| !d.is_empty()) {
        html.push_str(&format!(r#"<p class="overview">{}</p>"#, escape(description)));
    }
    if let Some(parent) = &company.parent_company {
        html.push_str(&format!(
            r#"<p>Parent company: <a href="/company/{}">{}</a></p>"#,
            parent.id,
            escape(&parent.name)
        ));
    }

    html.push_str(&format!(
        r#"<section class="content-section"><h2>Movies ({})</h2>"#,
        page.total_results
    ));
    html.push_str(&card_grid(&page.movies));
    html.push_str("</section></div>");
    html.push_str(&base_end());
    html
}

pub fn render_network(page: &NetworkPage) -> String {
    let network = &page.network;
    let mut html = String::new();
    html.push_str(&base_start(&format!("{} - {}", network.name, APP_NAME), ""));

    html.push_str(&studio_header(
        &network.name,
        network.logo_path.as_deref(),
        network.headquarters.as_deref(),
        network.origin_country.as_deref(),
        network.homepage.as_deref(),
    ));

    html.push_str(&format!(
        r#"<section class="content-section"><h2>TV Shows ({})</h2>"#,
        page.total_results
    ));
    html.push_str(&card_grid(&page.shows));
    html.push_str("</section></div>");
    html.push_str(&base_end());
    html
}

/// Generic failure page with a way back.
pub fn render_error(message: &str) -> String {
    let mut html = String::new();
    html.push_str(&base_start(&format!("Error - {}", APP_NAME), ""));
    html.push_str(&format!(
        r#"<div class="error-page"><h1>Something went wrong</h1><p class="error-message">{}</p><div class="actions"><a href="javascript:history.back()" class="back-button">← Back</a><a href="/" class="back-button">Home</a></div></div>"#,
        escape(message)
    ));
    html.push_str(&base_end());
    html
}

fn studio_header(
    name: &str,
    logo: Option<&str>,
    headquarters: Option<&str>,
    country: Option<&str>,
    homepage: Option<&str>,
) -> String {
    let mut html = String::from(r#"<div class="studio-page"><header class="studio-header">"#);
    if let Some(logo) = logo.filter(|l| !l.is_empty()) {
        html.push_str(&format!(
            r#"<img class="studio-logo" src="{}" alt="{}">"#,
            escape(&image_url(Some(logo), "w300")),
            escape(name)
        ));
    }
    html.push_str(&format!("<h1>{}</h1><dl>", escape(name)));
    if let Some(hq) = headquarters.filter(|h| !h.is_empty()) {
        html.push_str(&fact("Headquarters", &escape(hq)));
    }
    if let Some(country) = country.filter(|c| !c.is_empty()) {
        html.push_str(&fact("Country", &escape(country)));
    }
    if let Some(url) = homepage.and_then(web_url) {
        html.push_str(&fact(
            "Homepage",
            &format!(r#"<a href="{}" rel="noopener">{}</a>"#, escape(url), escape(url)),
        ));
    }
    html.push_str("</dl></header>");
    html
}

#[allow(clippy::too_many_arguments)]
fn hero(
    backdrop: Option<&str>,
    poster: Option<&str>,
    title: &str,
    year: &str,
    tagline: Option<&str>,
    meta: &[String],
    overview: Option<&str>,
    trailer: Option<&Video>,
) -> String {
    let backdrop = backdrop
        .filter(|b| !b.is_empty())
        .map(|b| image_url(Some(b), "original"))
        .unwrap_or_default();
    let meta = meta
        .iter()
        .filter(|m| !m.is_empty())
        .map(|m| format!("<span>{}</span>", m))
        .collect::<Vec<_>>()
        .join("");
    let tagline = tagline
        .filter(|t| !t.is_empty())
        .map(|t| format!(r#"<p class="tagline">{}</p>"#, escape(t)))
        .unwrap_or_default();
    let trailer = trailer
        .and_then(|v| v.youtube_url())
        .map(|url| format!(r#"<div class="actions"><a href="{}" class="play-button" rel="noopener">▶ Play Trailer</a></div>"#, escape(&url)))
        .unwrap_or_default();

    format!(
        r#"<div class="detail-page"><div class="detail-hero" style="background-image: linear-gradient(rgba(0,0,0,0.7), rgba(0,0,0,0.9)), url('{}');"><div class="detail-content"><img class="detail-poster" src="{}" alt="{}" onerror="this.src='{}'"><div class="detail-info"><h1>{} <span class="year">{}</span></h1>{}<div class="meta">{}</div><h2>Overview</h2><p class="overview">{}</p>{}</div></div></div>"#,
        escape(&backdrop),
        escape(&image_url(poster, "w500")),
        escape(title),
        PLACEHOLDER_IMAGE,
        escape(title),
        year,
        tagline,
        meta,
        escape(overview.filter(|o| !o.is_empty()).unwrap_or("No overview available.")),
        trailer
    )
}

/// Only absolute http(s) links from TMDB are rendered as hrefs.
fn web_url(url: &str) -> Option<&str> {
    let url = url.trim();
    let lower = url.to_ascii_lowercase();
    (lower.starts_with("https://") || lower.starts_with("http://")).then_some(url)
}

fn fact(label: &str, value_html: &str) -> String {
    format!("<dt>{}</dt><dd>{}</dd>", label, value_html)
}

fn selected(is_selected: bool) -> &'static str {
    if is_selected {
        " selected"
    } else {
        ""
    }
}

fn providers_section(providers: Option<&RegionProviders>) -> String {
    let Some(providers) = providers else {
        return String::new();
    };
    let mut html = String::from(r#"<section class="providers"><h2>Where to Watch</h2>"#);
    for (label, group) in [
        ("Stream", &providers.flatrate),
        ("Rent", &providers.rent),
        ("Buy", &providers.buy),
    ] {
        if group.is_empty() {
            continue;
        }
        html.push_str(&format!(r#"<div class="provider-group"><h3>{}</h3>"#, label));
        for provider in group {
            html.push_str(&format!(
                r#"<img class="provider-logo" src="{}" alt="{}" title="{}">"#,
                escape(&image_url(provider.logo_path.as_deref(), "w92")),
                escape(&provider.provider_name),
                escape(&provider.provider_name)
            ));
        }
        html.push_str("</div>");
    }
    if let Some(link) = providers.link.as_deref().and_then(web_url) {
        html.push_str(&format!(
            r#"<p class="attribution"><a href="{}" rel="noopener">Availability data from JustWatch</a></p>"#,
            escape(link)
        ));
    }
    html.push_str("</section>");
    html
}

fn cast_section(cast: &[CastMember]) -> String {
    if cast.is_empty() {
        return String::new();
    }
    let mut html = String::from(r#"<section class="cast-section"><h2>Top Cast</h2><div class="cast-grid">"#);
    for member in cast {
        html.push_str(&format!(
            r#"<div class="cast-member"><a href="/person/{}"><img src="{}" alt="{}" loading="lazy" onerror="this.src='{}'"><h4>{}</h4><p>{}</p></a></div>"#,
            member.id,
            escape(&image_url(member.profile_path.as_deref(), "w185")),
            escape(&member.name),
            PLACEHOLDER_IMAGE,
            escape(&member.name),
            escape(member.character.as_deref().unwrap_or(""))
        ));
    }
    html.push_str("</div></section>");
    html
}

fn credit_card(credit: &CombinedCredit) -> String {
    format!(
        r#"<div class="content-card"><a href="{}"><img src="{}" alt="{}" loading="lazy" onerror="this.src='{}'"><div class="card-info"><h3>{}</h3></div></a></div>"#,
        credit.link(),
        escape(&image_url(credit.poster_path.as_deref(), "w342")),
        escape(credit.display_title()),
        PLACEHOLDER_IMAGE,
        escape(credit.display_title())
    )
}

fn card_html(card: &Card) -> String {
    format!(
        r#"<div class="content-card"><a href="{}"><img src="{}" alt="{}" loading="lazy" onerror="this.src='{}'"><div class="card-info"><h3>{}</h3><p class="rating">⭐ {}</p><p class="year">{}</p></div></a></div>"#,
        card.link,
        escape(&image_url(card.image_path.as_deref(), "w342")),
        escape(&card.title),
        PLACEHOLDER_IMAGE,
        escape(&card.title),
        format_rating(card.rating),
        card.year.as_deref().unwrap_or("")
    )
}

fn card_row(heading: &str, cards: &[Card]) -> String {
    if cards.is_empty() {
        return String::new();
    }
    let mut html = format!(
        r#"<section class="content-section"><h2>{}</h2><div class="content-row">"#,
        heading
    );
    for card in cards {
        html.push_str(&card_html(card));
    }
    html.push_str("</div></section>");
    html
}

fn card_grid(cards: &[Card]) -> String {
    let mut html = String::from(r#"<div class="content-grid">"#);
    for card in cards {
        html.push_str(&card_html(card));
    }
    html.push_str("</div>");
    html
}

fn base_start(title: &str, search_value: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{}</title>
    <link rel="stylesheet" href="/static/style.css">
</head>
<body>
    <nav class="navbar">
        <div class="nav-brand">
            <a href="/">{}</a>
        </div>
        <div class="nav-links">
            <a href="/">Home</a>
            <a href="/discover">Discover</a>
            <form class="nav-search" action="/search" method="get">
                <input type="search" name="q" placeholder="Search..." value="{}">
            </form>
        </div>
    </nav>
    <main>"#,
        escape(title),
        APP_NAME,
        escape(search_value)
    )
}

fn base_end() -> String {
    String::from(
        r#"</main><footer class="footer"><p>This product uses the TMDB API but is not endorsed or certified by TMDB.</p></footer></body></html>"#,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_neutralizes_markup() {
        assert_eq!(
            escape(r#"<script>alert("x") & 'y'</script>"#),
            "&lt;script&gt;alert(&quot;x&quot;) &amp; &#39;y&#39;&lt;/script&gt;"
        );
    }

    #[test]
    fn error_page_offers_a_way_back() {
        let html = render_error("Failed to fetch movie details");
        assert!(html.contains("Failed to fetch movie details"));
        assert!(html.contains("history.back()"));
        assert!(html.contains(r#"href="/""#));
    }

    #[test]
    fn empty_card_rows_render_nothing() {
        assert_eq!(card_row("Anything", &[]), "");
    }

    #[test]
    fn cards_escape_titles_and_format_rating() {
        let card = Card {
            link: "/movie/1".to_string(),
            title: "Tom & Jerry".to_string(),
            image_path: None,
            year: Some("2021".to_string()),
            rating: 6.04,
        };
        let html = card_html(&card);
        assert!(html.contains("Tom &amp; Jerry"));
        assert!(html.contains("⭐ 6.0"));
        assert!(html.contains(PLACEHOLDER_IMAGE));
    }

    #[test]
    fn studio_homepage_only_links_http_urls() {
        let html = studio_header("Evil Co", None, None, None, Some("javascript:alert(1)"));
        assert!(!html.contains("javascript:"));
        assert!(!html.contains("Homepage"));

        let html = studio_header("Pixar", None, None, None, Some("https://www.pixar.com"));
        assert!(html.contains(r#"<a href="https://www.pixar.com" rel="noopener">"#));
    }

    #[test]
    fn image_sources_are_escaped() {
        let card = Card {
            link: "/movie/1".to_string(),
            title: "Quote".to_string(),
            image_path: Some(r#"/a"onerror="x.jpg"#.to_string()),
            year: None,
            rating: 0.0,
        };
        let html = card_html(&card);
        assert!(html.contains("/a&quot;onerror=&quot;x.jpg"));
        assert!(!html.contains(r#"/a"onerror"#));
    }
}
