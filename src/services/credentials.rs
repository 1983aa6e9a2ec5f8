use crate::services::endpoint::{Endpoint, QueryParams};

/// How requests authenticate against the catalog.
///
/// Resolved once from [`crate::config::Config::auth_mode`] and never
/// re-evaluated per request.
#[derive(Clone, PartialEq, Eq)]
pub enum AuthMode {
    BearerHeader(String),
    QueryKey(String),
    None,
}

impl std::fmt::Debug for AuthMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print secrets
        match self {
            AuthMode::BearerHeader(_) => write!(f, "BearerHeader(***)"),
            AuthMode::QueryKey(_) => write!(f, "QueryKey(***)"),
            AuthMode::None => write!(f, "None"),
        }
    }
}

impl AuthMode {
    /// Headers every request carries
    pub fn headers(&self) -> Vec<(&'static str, String)> {
        let mut headers = vec![("accept", "application/json".to_string())];
        if let AuthMode::BearerHeader(token) = self {
            headers.push(("authorization", format!("Bearer {}", token)));
        }
        headers
    }

    /// Adds `api_key` for query-key auth. Only search and discover carry it.
    pub fn apply_query_key(&self, endpoint: Endpoint, params: &mut QueryParams) {
        if let AuthMode::QueryKey(key) = self {
            if matches!(endpoint, Endpoint::SearchMovie | Endpoint::DiscoverMovie) {
                params.set("api_key", key);
            }
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            AuthMode::BearerHeader(_) => "bearer",
            AuthMode::QueryKey(_) => "query_key",
            AuthMode::None => "none",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_adds_header_not_param() {
        let auth = AuthMode::BearerHeader("tok".to_string());
        let headers = auth.headers();
        assert!(headers.contains(&("authorization", "Bearer tok".to_string())));
        assert!(headers.contains(&("accept", "application/json".to_string())));

        let mut params = QueryParams::new();
        auth.apply_query_key(Endpoint::DiscoverMovie, &mut params);
        assert!(!params.contains("api_key"));
    }

    #[test]
    fn test_query_key_only_on_search_and_discover() {
        let auth = AuthMode::QueryKey("k3".to_string());
        assert_eq!(auth.headers().len(), 1);

        let mut params = QueryParams::new();
        auth.apply_query_key(Endpoint::SearchMovie, &mut params);
        assert_eq!(params.get("api_key"), Some("k3"));

        let mut params = QueryParams::new();
        auth.apply_query_key(Endpoint::GenreList, &mut params);
        assert!(!params.contains("api_key"));
    }

    #[test]
    fn test_debug_hides_secret() {
        let auth = AuthMode::BearerHeader("super-secret".to_string());
        assert!(!format!("{:?}", auth).contains("super-secret"));
    }
}
