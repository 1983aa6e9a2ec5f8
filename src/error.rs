/// Fallback shown when the upstream rejects a request without a readable message
pub const GENERIC_FETCH_ERROR: &str = "Error fetching movies";

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Unauthorized API endpoint: {0}")]
    UnauthorizedEndpoint(String),

    #[error("Invalid URL construction: {0}")]
    UrlConstruction(String),

    #[error("{0}")]
    Upstream(String),

    #[error("{}", GENERIC_FETCH_ERROR)]
    UpstreamGeneric,

    #[error("Malformed catalog response: {0}")]
    MalformedBody(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl AppError {
    /// Text stored in a `Failed` outcome for this error
    pub fn user_message(&self) -> String {
        match self {
            AppError::Upstream(msg) => msg.clone(),
            AppError::UpstreamGeneric => GENERIC_FETCH_ERROR.to_string(),
            AppError::Network(msg) if msg.trim().is_empty() => GENERIC_FETCH_ERROR.to_string(),
            _ => self.to_string(),
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_message_is_verbatim() {
        let err = AppError::Upstream("Invalid API key".to_string());
        assert_eq!(err.user_message(), "Invalid API key");
    }

    #[test]
    fn test_generic_upstream_message() {
        assert_eq!(AppError::UpstreamGeneric.user_message(), "Error fetching movies");
    }

    #[test]
    fn test_malformed_body_message() {
        let err = AppError::MalformedBody("expected value at line 1 column 1".to_string());
        assert_eq!(
            err.user_message(),
            "Malformed catalog response: expected value at line 1 column 1"
        );
    }

    #[test]
    fn test_network_message_keeps_cause() {
        let err = AppError::Network("connection refused".to_string());
        assert_eq!(err.user_message(), "Network error: connection refused");
        assert_eq!(
            AppError::Network(String::new()).user_message(),
            "Error fetching movies"
        );
    }
}
