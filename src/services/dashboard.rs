//! Student and admin dashboard composition.

use sqlx::PgPool;
use uuid::Uuid;

use crate::clock::Clock;
use crate::context::QueryContext;
use crate::errors::AppError;
use crate::models::dashboard::{AdminScope, Dashboard, DashboardLimits, MetricScope};
use crate::services::authorization::{authorize, Requestor};
use crate::services::{directory, metrics};

/// Dashboard for one user. Students may only request their own.
pub async fn student_dashboard(
    pool: &PgPool,
    ctx: &QueryContext,
    clock: &dyn Clock,
    requestor: &Requestor,
    user_id: Uuid,
    limits: DashboardLimits,
) -> Result<Dashboard, AppError> {
    let scope = MetricScope::User(user_id);
    authorize(requestor, &scope).into_result()?;
    compose(pool, ctx, clock, scope, limits).await
}

/// Platform-wide (or platform-narrowed) dashboard. Admins only.
pub async fn admin_dashboard(
    pool: &PgPool,
    ctx: &QueryContext,
    clock: &dyn Clock,
    requestor: &Requestor,
    scope: AdminScope,
    limits: DashboardLimits,
) -> Result<Dashboard, AppError> {
    let scope = MetricScope::from(scope);
    if !requestor.role.is_elevated() {
        return Err(AppError::Forbidden("Admin access required".to_string()));
    }
    authorize(requestor, &scope).into_result()?;
    compose(pool, ctx, clock, scope, limits).await
}

/// Run every aggregate for `scope` concurrently against a single `as_of` date.
async fn compose(
    pool: &PgPool,
    ctx: &QueryContext,
    clock: &dyn Clock,
    scope: MetricScope,
    limits: DashboardLimits,
) -> Result<Dashboard, AppError> {
    let as_of = clock.today();

    ctx.run(async {
        directory::ensure_scope_exists(pool, &scope).await?;

        let (totals, enrollments, recent_courses, top_courses, week_activity) = tokio::try_join!(
            metrics::fetch_totals(pool, &scope),
            metrics::fetch_current_enrollments(pool, &scope),
            metrics::fetch_recent_courses(pool, &scope, limits.recent),
            metrics::fetch_top_courses(pool, &scope, limits.top),
            metrics::fetch_week_activity(pool, &scope, as_of),
        )?;

        tracing::debug!(
            scope = ?scope,
            %as_of,
            enrollments = enrollments.len(),
            recent_courses = recent_courses.len(),
            top_courses = top_courses.len(),
            "Dashboard composed"
        );

        Ok(Dashboard {
            scope,
            as_of,
            totals,
            enrollments,
            recent_courses,
            top_courses,
            week_activity,
        })
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::SystemClock;
    use crate::models::limit::Limit;
    use crate::models::user::UserRole;
    use std::time::Duration;

    fn limits() -> DashboardLimits {
        DashboardLimits {
            recent: Limit::new(5).unwrap(),
            top: Limit::new(5).unwrap(),
        }
    }

    // A lazy pool never connects until a query runs, so these tests prove the
    // authorization check fires before any database work.
    fn unreachable_pool() -> PgPool {
        sqlx::postgres::PgPoolOptions::new()
            .acquire_timeout(Duration::from_millis(50))
            .connect_lazy("postgres://nobody@127.0.0.1:1/none")
            .unwrap()
    }

    #[tokio::test]
    async fn student_cannot_view_another_students_dashboard() {
        let pool = unreachable_pool();
        let ctx = QueryContext::with_timeout(Duration::from_secs(1));
        let requestor = Requestor {
            user_id: Uuid::from_u128(4),
            role: UserRole::Student,
        };
        let err = student_dashboard(
            &pool,
            &ctx,
            &SystemClock,
            &requestor,
            Uuid::from_u128(5),
            limits(),
        )
        .await
        .unwrap_err();
        assert!(err.is_forbidden());
    }

    #[tokio::test]
    async fn student_cannot_open_admin_dashboard_for_any_scope() {
        let pool = unreachable_pool();
        let ctx = QueryContext::with_timeout(Duration::from_secs(1));
        let requestor = Requestor {
            user_id: Uuid::from_u128(4),
            role: UserRole::Student,
        };
        for scope in [AdminScope::All, AdminScope::ProviderPlatform(Uuid::from_u128(100))] {
            let err = admin_dashboard(&pool, &ctx, &SystemClock, &requestor, scope, limits())
                .await
                .unwrap_err();
            assert!(err.is_forbidden());
        }
    }
}
