use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

use crate::error::AppError;

/// Field the discover listing can be ordered by
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    Popularity,
    VoteAverage,
    VoteCount,
    PrimaryReleaseDate,
    Revenue,
    OriginalTitle,
}

impl SortField {
    fn as_str(&self) -> &'static str {
        match self {
            SortField::Popularity => "popularity",
            SortField::VoteAverage => "vote_average",
            SortField::VoteCount => "vote_count",
            SortField::PrimaryReleaseDate => "primary_release_date",
            SortField::Revenue => "revenue",
            SortField::OriginalTitle => "original_title",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

/// `<field>.<direction>` sort order sent as `sort_by`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }
}

impl Default for SortSpec {
    fn default() -> Self {
        Self::new(SortField::Popularity, SortDirection::Desc)
    }
}

impl Display for SortSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let direction = match self.direction {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        };
        write!(f, "{}.{}", self.field.as_str(), direction)
    }
}

impl FromStr for SortSpec {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (field, direction) = s.trim().rsplit_once('.').ok_or_else(|| {
            AppError::InvalidInput(format!("Sort order must be field.direction: {}", s))
        })?;

        let field = match field {
            "popularity" => SortField::Popularity,
            "vote_average" => SortField::VoteAverage,
            "vote_count" => SortField::VoteCount,
            "primary_release_date" | "release_date" => SortField::PrimaryReleaseDate,
            "revenue" => SortField::Revenue,
            "original_title" => SortField::OriginalTitle,
            other => {
                return Err(AppError::InvalidInput(format!("Unknown sort field: {}", other)));
            }
        };

        let direction = match direction {
            "asc" => SortDirection::Asc,
            "desc" => SortDirection::Desc,
            other => {
                return Err(AppError::InvalidInput(format!(
                    "Unknown sort direction: {}",
                    other
                )));
            }
        };

        Ok(Self { field, direction })
    }
}
