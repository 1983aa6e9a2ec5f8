use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::error::{AppError, AppResult};

pub mod outcome;
pub mod sort;

pub use outcome::{EmptyReason, RequestOutcome, ResultPage};
pub use sort::{SortDirection, SortField, SortSpec};

/// Upper bound on pages the client will ever request, regardless of what
/// the catalog reports.
pub const MAX_PAGES: u32 = 100;

pub type GenreId = u32;

/// Movie summary as returned by the catalog.
///
/// Entries are kept exactly as the catalog sent them; accessors read the
/// fields the front end shows and return `None` when a field is missing,
/// null or of an unexpected type.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Movie(Value);

impl Movie {
    pub fn new(raw: Value) -> Self {
        Self(raw)
    }

    /// Raw upstream entry
    pub fn raw(&self) -> &Value {
        &self.0
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field).filter(|v| !v.is_null())
    }

    /// Numeric id; numeric strings are accepted too
    pub fn id(&self) -> Option<u64> {
        match self.get("id")? {
            Value::String(s) => s.trim().parse().ok(),
            v => v.as_u64(),
        }
    }

    pub fn title(&self) -> Option<&str> {
        self.str_field("title")
    }

    pub fn poster_path(&self) -> Option<&str> {
        self.str_field("poster_path")
    }

    pub fn vote_average(&self) -> Option<f64> {
        match self.get("vote_average")? {
            Value::String(s) => s.trim().parse().ok(),
            v => v.as_f64(),
        }
    }

    pub fn release_date(&self) -> Option<&str> {
        self.str_field("release_date")
    }

    pub fn original_language(&self) -> Option<&str> {
        self.str_field("original_language")
    }

    /// Release year, when the date is present and well formed
    pub fn release_year(&self) -> Option<i32> {
        let date = self.release_date()?;
        chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .ok()
            .map(|d| chrono::Datelike::year(&d))
    }

    fn str_field(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(Value::as_str)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Genre {
    pub id: GenreId,
    pub name: String,
}

/// Genre id → display name, fetched once at startup
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenreCatalog {
    genres: BTreeMap<GenreId, String>,
}

impl GenreCatalog {
    pub fn new(genres: Vec<Genre>) -> Self {
        Self {
            genres: genres.into_iter().map(|g| (g.id, g.name)).collect(),
        }
    }

    pub fn name(&self, id: GenreId) -> Option<&str> {
        self.genres.get(&id).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (GenreId, &str)> {
        self.genres.iter().map(|(id, name)| (*id, name.as_str()))
    }

    pub fn len(&self) -> usize {
        self.genres.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genres.is_empty()
    }
}

/// Clamps an upstream `total_pages` into `[1, MAX_PAGES]`.
///
/// Missing, null, or non-numeric values count as a single page.
pub fn clamp_total_pages(raw: Option<&Value>) -> u32 {
    let reported = raw
        .and_then(|v| v.as_i64().or_else(|| v.as_f64().map(|f| f as i64)))
        .unwrap_or(1);
    reported.clamp(1, i64::from(MAX_PAGES)) as u32
}

// ============================================================================
// TMDB API Types
// ============================================================================

/// Paged listing body shared by search, discover and trending.
///
/// The body must be JSON. Beyond that it is read leniently: a missing or
/// non-array `results` becomes an empty list and every entry is kept as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct MovieListing {
    pub results: Vec<Movie>,
    pub total_pages: u32,
}

impl MovieListing {
    pub fn from_body(body: &str) -> AppResult<Self> {
        let value: Value = serde_json::from_str(body)
            .map_err(|e| AppError::MalformedBody(e.to_string()))?;

        let results = match value.get("results") {
            Some(Value::Array(items)) => items.iter().cloned().map(Movie::new).collect(),
            _ => Vec::new(),
        };

        Ok(Self {
            results,
            total_pages: clamp_total_pages(value.get("total_pages")),
        })
    }
}

/// Response from GET /genre/movie/list
#[derive(Debug, Clone, Deserialize)]
pub struct GenreListResponse {
    #[serde(default)]
    pub genres: Vec<Genre>,
}

/// Error body returned with non-2xx statuses
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub status_message: Option<String>,
}

impl ApiErrorBody {
    /// Extracts a non-empty `status_message`, if the body carries one
    pub fn message_from(body: &str) -> Option<String> {
        serde_json::from_str::<ApiErrorBody>(body)
            .ok()
            .and_then(|b| b.status_message)
            .filter(|m| !m.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_clamp_total_pages() {
        assert_eq!(clamp_total_pages(Some(&json!(500))), 100);
        assert_eq!(clamp_total_pages(Some(&json!(100))), 100);
        assert_eq!(clamp_total_pages(Some(&json!(37))), 37);
        assert_eq!(clamp_total_pages(Some(&json!(0))), 1);
        assert_eq!(clamp_total_pages(Some(&json!(-4))), 1);
        assert_eq!(clamp_total_pages(Some(&json!(null))), 1);
        assert_eq!(clamp_total_pages(Some(&json!("many"))), 1);
        assert_eq!(clamp_total_pages(None), 1);
    }

    #[test]
    fn test_listing_keeps_unknown_fields() {
        let body = r#"{
            "page": 1,
            "results": [{
                "id": 27205,
                "title": "Inception",
                "poster_path": "/inception.jpg",
                "vote_average": 8.4,
                "release_date": "2010-07-15",
                "original_language": "en",
                "genre_ids": [28, 878]
            }],
            "total_pages": 3
        }"#;

        let listing = MovieListing::from_body(body).unwrap();
        assert_eq!(listing.total_pages, 3);
        assert_eq!(listing.results.len(), 1);

        let movie = &listing.results[0];
        assert_eq!(movie.id(), Some(27205));
        assert_eq!(movie.title(), Some("Inception"));
        assert_eq!(movie.poster_path(), Some("/inception.jpg"));
        assert_eq!(movie.original_language(), Some("en"));
        assert_eq!(movie.release_year(), Some(2010));
        assert_eq!(movie.get("genre_ids"), Some(&json!([28, 878])));
    }

    #[test]
    fn test_listing_tolerates_malformed_results() {
        let listing = MovieListing::from_body(r#"{"results": "nope", "total_pages": 2}"#).unwrap();
        assert!(listing.results.is_empty());
        assert_eq!(listing.total_pages, 2);

        let listing = MovieListing::from_body(r#"{"total_pages": 9000}"#).unwrap();
        assert!(listing.results.is_empty());
        assert_eq!(listing.total_pages, 100);
    }

    #[test]
    fn test_listing_rejects_non_json_body() {
        let result = MovieListing::from_body("<html>maintenance</html>");
        assert!(matches!(result, Err(AppError::MalformedBody(_))));
        tokio_test::assert_err!(MovieListing::from_body(r#"{"results": [{"id": 1"#));
    }

    #[test]
    fn test_listing_keeps_entries_with_odd_fields() {
        let body = r#"{"results": [
            {"id": 1, "title": null, "poster_path": null},
            {"id": 2, "title": "B", "vote_average": "7.1"},
            {"id": "3", "title": "C"},
            {"title": "no id"}
        ], "total_pages": 1}"#;

        let listing = MovieListing::from_body(body).unwrap();
        assert_eq!(listing.results.len(), 4);

        let ids: Vec<Option<u64>> = listing.results.iter().map(Movie::id).collect();
        assert_eq!(ids, vec![Some(1), Some(2), Some(3), None]);
        assert_eq!(listing.results[0].title(), None);
        assert_eq!(listing.results[0].poster_path(), None);
        assert_eq!(listing.results[1].vote_average(), Some(7.1));
        assert_eq!(listing.results[2].title(), Some("C"));
        assert_eq!(listing.results[0].raw()["title"], Value::Null);
    }

    #[test]
    fn test_error_body_message() {
        assert_eq!(
            ApiErrorBody::message_from(r#"{"status_code":7,"status_message":"Invalid API key"}"#),
            Some("Invalid API key".to_string())
        );
        assert_eq!(ApiErrorBody::message_from(r#"{"status_message":""}"#), None);
        assert_eq!(ApiErrorBody::message_from("not json"), None);
    }

    #[test]
    fn test_genre_catalog_lookup() {
        let catalog = GenreCatalog::new(vec![
            Genre {
                id: 28,
                name: "Action".to_string(),
            },
            Genre {
                id: 12,
                name: "Adventure".to_string(),
            },
        ]);

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.name(28), Some("Action"));
        assert_eq!(catalog.name(99), None);
        let ids: Vec<GenreId> = catalog.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![12, 28]);
    }
}
