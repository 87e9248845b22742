//! Dashboard read model shared by the student and admin views.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::activity::{DailyActivity, RecentCourse};
use crate::models::enrollment::CurrentEnrollment;
use crate::models::limit::Limit;

/// The slice of data an aggregation runs over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum MetricScope {
    /// A single user's own rows.
    User(Uuid),
    /// Every row belonging to one provider platform.
    ProviderPlatform(Uuid),
    /// Platform-wide.
    All,
}

/// Scopes the admin dashboard may aggregate over. Never a single user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AdminScope {
    #[default]
    All,
    ProviderPlatform(Uuid),
}

impl From<Option<Uuid>> for AdminScope {
    fn from(provider_platform_id: Option<Uuid>) -> Self {
        provider_platform_id.map_or(AdminScope::All, AdminScope::ProviderPlatform)
    }
}

impl From<AdminScope> for MetricScope {
    fn from(scope: AdminScope) -> Self {
        match scope {
            AdminScope::All => MetricScope::All,
            AdminScope::ProviderPlatform(id) => MetricScope::ProviderPlatform(id),
        }
    }
}

/// Headline counts for a scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct DashboardTotals {
    pub courses_offered: i64,
    pub students_enrolled: i64,
    pub active_enrollments: i64,
    pub total_activity_secs: i64,
}

/// Point-in-time composite of the learning metrics for a scope.
///
/// Student and admin dashboards use this same shape so they can be compared
/// field by field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dashboard {
    pub scope: MetricScope,
    /// Last day of `week_activity`.
    pub as_of: NaiveDate,
    pub totals: DashboardTotals,
    pub enrollments: Vec<CurrentEnrollment>,
    pub recent_courses: Vec<RecentCourse>,
    pub top_courses: Vec<String>,
    pub week_activity: Vec<DailyActivity>,
}

/// How many rows the ranked dashboard lists carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardLimits {
    pub recent: Limit,
    pub top: Limit,
}
