//! Course catalog model: completion tags, sort order, and the catalog row.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::errors::AppError;

/// Completion attributes a course can carry, used as catalog filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CourseTag {
    Certificate,
    Grade,
    ProgressCompletion,
    PathwayCompletion,
    CollegeCredit,
}

impl CourseTag {
    pub const ALL: [CourseTag; 5] = [
        CourseTag::Certificate,
        CourseTag::Grade,
        CourseTag::ProgressCompletion,
        CourseTag::PathwayCompletion,
        CourseTag::CollegeCredit,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CourseTag::Certificate => "certificate",
            CourseTag::Grade => "grade",
            CourseTag::ProgressCompletion => "progress_completion",
            CourseTag::PathwayCompletion => "pathway_completion",
            CourseTag::CollegeCredit => "college_credit",
        }
    }

    /// Boolean column on `courses` backing this tag.
    pub fn column(self) -> &'static str {
        match self {
            CourseTag::Certificate => "has_certificate",
            CourseTag::Grade => "has_grades",
            CourseTag::ProgressCompletion => "progress_completion",
            CourseTag::PathwayCompletion => "pathway_completion",
            CourseTag::CollegeCredit => "college_credit",
        }
    }

    /// Whether a catalog row carries this tag.
    pub fn is_set_on(self, entry: &CatalogEntry) -> bool {
        match self {
            CourseTag::Certificate => entry.has_certificate,
            CourseTag::Grade => entry.has_grades,
            CourseTag::ProgressCompletion => entry.progress_completion,
            CourseTag::PathwayCompletion => entry.pathway_completion,
            CourseTag::CollegeCredit => entry.college_credit,
        }
    }
}

impl fmt::Display for CourseTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CourseTag {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CourseTag::ALL
            .into_iter()
            .find(|tag| tag.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| AppError::InvalidArgument(format!("unknown tag: {s}")))
    }
}

/// Sort direction for the catalog. Ascending by name unless asked otherwise.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogOrder {
    #[default]
    Asc,
    Desc,
}

impl CatalogOrder {
    pub fn sql_keyword(self) -> &'static str {
        match self {
            CatalogOrder::Asc => "ASC",
            CatalogOrder::Desc => "DESC",
        }
    }
}

impl FromStr for CatalogOrder {
    type Err = AppError;

    /// Accepts `asc`, `desc` (any case) or an empty value.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            Ok(CatalogOrder::default())
        } else if trimmed.eq_ignore_ascii_case("asc") {
            Ok(CatalogOrder::Asc)
        } else if trimmed.eq_ignore_ascii_case("desc") {
            Ok(CatalogOrder::Desc)
        } else {
            Err(AppError::InvalidArgument(format!(
                "order must be 'asc' or 'desc', got '{trimmed}'"
            )))
        }
    }
}

/// One course visible to a user, with everything the catalog filters and sorts on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct CatalogEntry {
    pub course_id: Uuid,
    pub course_name: String,
    pub description: String,
    pub provider_platform_id: Uuid,
    pub provider_platform_name: String,
    pub has_certificate: bool,
    pub has_grades: bool,
    pub progress_completion: bool,
    pub pathway_completion: bool,
    pub college_credit: bool,
    pub is_enrolled: bool,
}
