use std::collections::BTreeMap;

/// Keys a discover form may send through to TMDB. Anything else is dropped.
pub const DISCOVER_KEYS: &[&str] = &[
    "sort_by",
    "page",
    "with_genres",
    "without_genres",
    "primary_release_year",
    "first_air_date_year",
    "primary_release_date.gte",
    "primary_release_date.lte",
    "first_air_date.gte",
    "first_air_date.lte",
    "vote_average.gte",
    "vote_average.lte",
    "vote_count.gte",
    "with_runtime.gte",
    "with_runtime.lte",
    "with_original_language",
    "with_companies",
    "with_networks",
    "with_cast",
    "with_crew",
    "with_keywords",
    "with_watch_providers",
    "watch_region",
];

pub const SORT_OPTIONS: &[(&str, &str)] = &[
    ("popularity.desc", "Most popular"),
    ("popularity.asc", "Least popular"),
    ("vote_average.desc", "Highest rated"),
    ("vote_average.asc", "Lowest rated"),
    ("primary_release_date.desc", "Newest"),
    ("primary_release_date.asc", "Oldest"),
    ("title.asc", "Title (A-Z)"),
    ("title.desc", "Title (Z-A)"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Movie,
    Tv,
}

impl MediaKind {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "movie" | "movies" => Some(MediaKind::Movie),
            "tv" | "shows" => Some(MediaKind::Tv),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Movie => "movie",
            MediaKind::Tv => "tv",
        }
    }

    fn year_key(&self) -> &'static str {
        match self {
            MediaKind::Movie => "primary_release_year",
            MediaKind::Tv => "first_air_date_year",
        }
    }

    /// TMDB names the date sort differently per media type.
    pub fn normalize_sort(&self, sort_by: &str) -> String {
        match self {
            MediaKind::Movie => sort_by.replace("first_air_date", "primary_release_date"),
            MediaKind::Tv => sort_by
                .replace("primary_release_date", "first_air_date")
                .replace("title.", "name."),
        }
    }
}

/// Loosely typed parameter bag for the discover endpoints.
///
/// Values are kept as optional strings; absent and empty values are dropped
/// when the query string is built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiscoverParams {
    values: BTreeMap<String, Option<String>>,
}

impl DiscoverParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a bag from raw form pairs, keeping only recognised discover keys.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut params = Self::new();
        for (key, value) in pairs {
            let key = key.as_ref();
            if DISCOVER_KEYS.contains(&key) {
                params.values.insert(key.to_string(), Some(value.into()));
            }
        }
        params
    }

    pub fn set(mut self, key: &str, value: impl ToString) -> Self {
        self.values.insert(key.to_string(), Some(value.to_string()));
        self
    }

    pub fn set_opt<V: ToString>(mut self, key: &str, value: Option<V>) -> Self {
        self.values
            .insert(key.to_string(), value.map(|v| v.to_string()));
        self
    }

    pub fn insert(&mut self, key: &str, value: Option<String>) {
        self.values.insert(key.to_string(), value);
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .and_then(|v| v.as_deref())
            .filter(|v| !v.is_empty())
    }

    pub fn sort_by(self, sort_by: &str) -> Self {
        self.set("sort_by", sort_by)
    }

    pub fn page(self, page: u32) -> Self {
        self.set("page", page)
    }

    /// Genre ids joined with commas, which TMDB treats as AND.
    pub fn with_genres(self, ids: &[i64]) -> Self {
        let joined = ids
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(",");
        self.set("with_genres", joined)
    }

    pub fn year(self, kind: MediaKind, year: Option<i32>) -> Self {
        self.set_opt(kind.year_key(), year)
    }

    pub fn min_rating(self, rating: Option<f64>) -> Self {
        self.set_opt("vote_average.gte", rating)
    }

    pub fn min_votes(self, votes: Option<u32>) -> Self {
        self.set_opt("vote_count.gte", votes)
    }

    pub fn with_original_language(self, language: Option<&str>) -> Self {
        self.set_opt("with_original_language", language)
    }

    pub fn with_companies(self, company_id: i64) -> Self {
        self.set("with_companies", company_id)
    }

    pub fn with_networks(self, network_id: i64) -> Self {
        self.set("with_networks", network_id)
    }

    /// Pairs that survive filtering, in key order.
    pub fn present(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().filter_map(|(k, v)| match v.as_deref() {
            Some(value) if !value.is_empty() => Some((k.as_str(), value)),
            _ => None,
        })
    }
}

/// Encodes `params` followed by the `fixed` pairs into a query string without a leading `?`.
///
/// Absent or empty values are skipped for caller params. Keys and values are percent-encoded.
pub fn build_query_string(params: &DiscoverParams, fixed: &[(&str, &str)]) -> String {
    params
        .present()
        .chain(fixed.iter().copied())
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn omits_absent_and_empty_values() {
        let params = DiscoverParams::new()
            .set("sort_by", "popularity.desc")
            .set("with_genres", "")
            .set_opt::<i32>("primary_release_year", None)
            .set("page", 2);

        let qs = build_query_string(&params, &[]);
        assert_eq!(qs, "page=2&sort_by=popularity.desc");
    }

    #[test]
    fn encodes_keys_and_values() {
        let params = DiscoverParams::new()
            .with_genres(&[28, 12])
            .set("with_keywords", "space & time")
            .min_rating(Some(7.5));

        let qs = build_query_string(&params, &[]);
        assert_eq!(
            qs,
            "vote_average.gte=7.5&with_genres=28%2C12&with_keywords=space%20%26%20time"
        );
    }

    #[test]
    fn appends_fixed_params_last_even_when_caller_params_are_empty() {
        let fixed = [("api_key", "abc123"), ("language", "en-US")];
        assert_eq!(
            build_query_string(&DiscoverParams::new(), &fixed),
            "api_key=abc123&language=en-US"
        );

        let params = DiscoverParams::new().page(1);
        assert_eq!(
            build_query_string(&params, &fixed),
            "page=1&api_key=abc123&language=en-US"
        );
    }

    #[test]
    fn empty_bag_builds_empty_string() {
        assert_eq!(build_query_string(&DiscoverParams::new(), &[]), "");
    }

    #[test]
    fn from_pairs_keeps_only_discover_keys() {
        let params = DiscoverParams::from_pairs(vec![
            ("with_genres", "18"),
            ("media", "movie"),
            ("api_key", "stolen"),
            ("vote_average.gte", ""),
        ]);

        assert_eq!(params.get("with_genres"), Some("18"));
        assert_eq!(params.get("api_key"), None);
        assert_eq!(params.get("vote_average.gte"), None);
        assert_eq!(build_query_string(&params, &[]), "with_genres=18");
    }

    #[test]
    fn year_key_follows_media_kind() {
        let movie = DiscoverParams::new().year(MediaKind::Movie, Some(1999));
        let tv = DiscoverParams::new().year(MediaKind::Tv, Some(2008));

        assert_eq!(movie.get("primary_release_year"), Some("1999"));
        assert_eq!(tv.get("first_air_date_year"), Some("2008"));
    }

    #[test]
    fn sort_names_are_normalized_per_media_kind() {
        assert_eq!(
            MediaKind::Tv.normalize_sort("primary_release_date.desc"),
            "first_air_date.desc"
        );
        assert_eq!(MediaKind::Tv.normalize_sort("title.asc"), "name.asc");
        assert_eq!(
            MediaKind::Movie.normalize_sort("first_air_date.asc"),
            "primary_release_date.asc"
        );
    }
}
