//! External content providers that courses belong to.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "provider_platform_state", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ProviderPlatformState {
    Enabled,
    Disabled,
    /// Archived platforms drop out of every user's catalog.
    Archived,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ProviderPlatform {
    pub id: Uuid,
    pub name: String,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub platform_type: String,
    pub state: ProviderPlatformState,
    pub base_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
