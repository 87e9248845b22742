//! Catalog route: the courses a user can see, filtered, searched, and sorted.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::errors::{ApiResponse, AppError};
use crate::middleware::auth::CurrentUser;
use crate::models::course::CatalogEntry;
use crate::models::dashboard::MetricScope;
use crate::services::authorization::authorize;
use crate::services::catalog::{self as catalog_service, CatalogParams};
use crate::AppState;

/// GET /api/users/{id}/catalog?tags=&search=&order=
pub async fn list(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
    Query(params): Query<CatalogParams>,
) -> Result<Json<ApiResponse<Vec<CatalogEntry>>>, AppError> {
    authorize(&current_user.requestor(), &MetricScope::User(id)).into_result()?;
    let query = params.into_query()?;

    let ctx = state.query_context();
    let entries = catalog_service::catalog(&state.db, &ctx, id, &query).await?;
    Ok(ApiResponse::success(entries))
}
