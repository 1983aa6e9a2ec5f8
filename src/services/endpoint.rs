/// Allowlisted catalog endpoints and safe URL construction
///
/// Only the four logical endpoints the client needs can ever be turned into a
/// request URL. Query values go through `url`'s serializer, so user text such
/// as `batman&api_key=x` stays a single encoded value.
use std::{collections::BTreeMap, fmt::Display, str::FromStr};

use url::Url;

use crate::error::{AppError, AppResult};

/// Logical catalog endpoints the client may call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    SearchMovie,
    DiscoverMovie,
    GenreList,
    TrendingWeekly,
}

impl Endpoint {
    pub const ALL: [Endpoint; 4] = [
        Endpoint::SearchMovie,
        Endpoint::DiscoverMovie,
        Endpoint::GenreList,
        Endpoint::TrendingWeekly,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::SearchMovie => "/search/movie",
            Endpoint::DiscoverMovie => "/discover/movie",
            Endpoint::GenreList => "/genre/movie/list",
            Endpoint::TrendingWeekly => "/trending/movie/week",
        }
    }
}

impl Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path())
    }
}

impl FromStr for Endpoint {
    type Err = AppError;

    /// Accepts either the logical name (`search-movie`) or the path
    /// (`/search/movie`). Anything else is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "search-movie" | "/search/movie" => Ok(Endpoint::SearchMovie),
            "discover-movie" | "/discover/movie" => Ok(Endpoint::DiscoverMovie),
            "genre-list" | "/genre/movie/list" => Ok(Endpoint::GenreList),
            "trending-weekly" | "/trending/movie/week" => Ok(Endpoint::TrendingWeekly),
            other => Err(AppError::UnauthorizedEndpoint(other.to_string())),
        }
    }
}

/// Query parameters; `None` values are dropped when the URL is built
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(BTreeMap<String, Option<String>>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: &str, value: impl ToString) -> &mut Self {
        self.0.insert(key.to_string(), Some(value.to_string()));
        self
    }

    pub fn set_opt(&mut self, key: &str, value: Option<impl ToString>) -> &mut Self {
        self.0.insert(key.to_string(), value.map(|v| v.to_string()));
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|v| v.as_deref())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Present (non-`None`) entries in key order
    pub fn present(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .filter_map(|(k, v)| v.as_deref().map(|v| (k.as_str(), v)))
    }
}

/// Builds absolute request URLs against a fixed base
#[derive(Debug, Clone)]
pub struct EndpointBuilder {
    base_url: String,
}

impl EndpointBuilder {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Validates `name` against the allowlist and builds its URL
    pub fn build_named(&self, name: &str, params: &QueryParams) -> AppResult<Url> {
        let endpoint = name.parse::<Endpoint>().map_err(|e| {
            tracing::error!(endpoint = %name, "Refusing to build non-allowlisted endpoint");
            e
        })?;
        self.build(endpoint, params)
    }

    pub fn build(&self, endpoint: Endpoint, params: &QueryParams) -> AppResult<Url> {
        let raw = format!("{}{}", self.base_url, endpoint.path());
        let mut url = Url::parse(&raw).map_err(|e| AppError::UrlConstruction(e.to_string()))?;

        if url.cannot_be_a_base() {
            return Err(AppError::UrlConstruction(format!(
                "Base URL is not hierarchical: {}",
                self.base_url
            )));
        }

        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in params.present() {
                pairs.append_pair(key, value);
            }
        }

        // An empty `?` would otherwise be left behind when nothing was appended
        if url.query() == Some("") {
            url.set_query(None);
        }

        Ok(url)
    }
}
