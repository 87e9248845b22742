//! Dashboard routes: per-student and platform-wide learning metrics.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::{ApiResponse, AppError};
use crate::middleware::auth::CurrentUser;
use crate::middleware::rbac::RequireAdmin;
use crate::models::dashboard::{AdminScope, Dashboard};
use crate::services::dashboard as dashboard_service;
use crate::AppState;

/// Optional narrowing of the admin dashboard to one provider platform.
#[derive(Debug, Deserialize)]
pub struct AdminDashboardParams {
    pub provider_platform_id: Option<Uuid>,
}

/// GET /api/users/{id}/student-dashboard: the user's own dashboard (or any, for admins).
pub async fn student(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Dashboard>>, AppError> {
    let ctx = state.query_context();
    let dashboard = dashboard_service::student_dashboard(
        &state.db,
        &ctx,
        state.clock.as_ref(),
        &current_user.requestor(),
        id,
        state.limits,
    )
    .await?;
    Ok(ApiResponse::success(dashboard))
}

/// GET /api/admin/dashboard: platform-wide dashboard (admin only).
pub async fn admin(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Query(params): Query<AdminDashboardParams>,
) -> Result<Json<ApiResponse<Dashboard>>, AppError> {
    let scope = AdminScope::from(params.provider_platform_id);
    let ctx = state.query_context();
    let dashboard = dashboard_service::admin_dashboard(
        &state.db,
        &ctx,
        state.clock.as_ref(),
        &admin.requestor(),
        scope,
        state.limits,
    )
    .await?;
    Ok(ApiResponse::success(dashboard))
}
