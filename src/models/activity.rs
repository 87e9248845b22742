//! Read models derived from the activity log.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Total engagement seconds recorded on one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct DailyActivity {
    pub date: NaiveDate,
    pub total_time: i64,
}

/// A course ranked by how recently it saw activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct RecentCourse {
    pub course_id: Uuid,
    pub course_name: String,
    pub provider_platform_name: String,
    pub total_time: i64,
    pub last_activity_at: DateTime<Utc>,
}
