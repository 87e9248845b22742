//! Per-user metric routes backing the individual dashboard widgets.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::errors::{ApiResponse, AppError};
use crate::middleware::auth::CurrentUser;
use crate::models::activity::{DailyActivity, RecentCourse};
use crate::models::dashboard::MetricScope;
use crate::models::enrollment::CurrentEnrollment;
use crate::models::limit::LimitQuery;
use crate::services::authorization::authorize;
use crate::services::metrics as metrics_service;
use crate::AppState;

fn authorize_user(current_user: &CurrentUser, id: Uuid) -> Result<(), AppError> {
    authorize(&current_user.requestor(), &MetricScope::User(id)).into_result()
}

/// GET /api/users/{id}/current-enrollments
pub async fn current_enrollments(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<CurrentEnrollment>>>, AppError> {
    authorize_user(&current_user, id)?;
    let ctx = state.query_context();
    let rows = metrics_service::current_enrollments(&state.db, &ctx, id).await?;
    Ok(ApiResponse::success(rows))
}

/// GET /api/users/{id}/recent-courses?limit=
pub async fn recent_courses(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
    Query(params): Query<LimitQuery>,
) -> Result<Json<ApiResponse<Vec<RecentCourse>>>, AppError> {
    authorize_user(&current_user, id)?;
    let limit = params.resolve(state.limits.recent)?;
    let ctx = state.query_context();
    let rows = metrics_service::recent_courses(&state.db, &ctx, id, limit).await?;
    Ok(ApiResponse::success(rows))
}

/// GET /api/users/{id}/top-courses?limit=
pub async fn top_courses(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
    Query(params): Query<LimitQuery>,
) -> Result<Json<ApiResponse<Vec<String>>>, AppError> {
    authorize_user(&current_user, id)?;
    let limit = params.resolve(state.limits.top)?;
    let ctx = state.query_context();
    let names = metrics_service::top_courses(&state.db, &ctx, id, limit).await?;
    Ok(ApiResponse::success(names))
}

/// GET /api/users/{id}/week-activity
pub async fn week_activity(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<DailyActivity>>>, AppError> {
    authorize_user(&current_user, id)?;
    let ctx = state.query_context();
    let week =
        metrics_service::week_activity(&state.db, &ctx, state.clock.as_ref(), id).await?;
    Ok(ApiResponse::success(week))
}
