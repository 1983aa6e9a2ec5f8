use super::Movie;

/// Last successfully fetched page of results
#[derive(Debug, Clone, PartialEq)]
pub struct ResultPage {
    pub page: u32,
    pub movies: Vec<Movie>,
    /// Already clamped to `[1, MAX_PAGES]`
    pub total_pages: u32,
}

/// Why a successful response had nothing to show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyReason {
    NoSearchMatches,
    NothingToDiscover,
}

impl EmptyReason {
    pub fn message(&self) -> &'static str {
        match self {
            EmptyReason::NoSearchMatches => "No movies found for your search.",
            EmptyReason::NothingToDiscover => "No movies to display.",
        }
    }
}

/// State of the most recently issued movie fetch
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RequestOutcome {
    /// Nothing requested yet
    #[default]
    Idle,
    Loading,
    Success(ResultPage),
    Empty(EmptyReason),
    Failed(String),
}

impl RequestOutcome {
    pub fn is_loading(&self) -> bool {
        matches!(self, RequestOutcome::Loading)
    }

    /// Message the front end shows instead of the result list, if any
    pub fn notice(&self) -> Option<&str> {
        match self {
            RequestOutcome::Empty(reason) => Some(reason.message()),
            RequestOutcome::Failed(message) => Some(message),
            _ => None,
        }
    }
}
