//! Lookups of the entities a read model is scoped to.

use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::dashboard::MetricScope;
use crate::models::provider_platform::ProviderPlatform;
use crate::models::user::User;

/// Find a user by ID.
pub async fn find_user(pool: &PgPool, id: Uuid) -> Result<User, AppError> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, name_first, name_last, email, password_hash, role,
               created_at, updated_at
        FROM users
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}

/// Find a provider platform by ID.
pub async fn find_provider_platform(
    pool: &PgPool,
    id: Uuid,
) -> Result<ProviderPlatform, AppError> {
    sqlx::query_as::<_, ProviderPlatform>(
        r#"
        SELECT id, name, type, state, base_url, created_at, updated_at
        FROM provider_platforms
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Provider platform not found".to_string()))
}

/// Fail with `NotFound` unless the entity a scope names exists.
pub async fn ensure_scope_exists(pool: &PgPool, scope: &MetricScope) -> Result<(), AppError> {
    match scope {
        MetricScope::User(id) => find_user(pool, *id).await.map(|_| ()),
        MetricScope::ProviderPlatform(id) => find_provider_platform(pool, *id).await.map(|_| ()),
        MetricScope::All => Ok(()),
    }
}
