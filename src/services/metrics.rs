//! Metric aggregation queries over enrollments and the activity log.
//!
//! Every aggregate is one statement whose only scope-dependent part is the
//! predicate contributed by [`MetricScope`].

use chrono::{Duration, NaiveDate, NaiveTime};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::clock::Clock;
use crate::context::QueryContext;
use crate::errors::AppError;
use crate::models::activity::{DailyActivity, RecentCourse};
use crate::models::dashboard::{DashboardTotals, MetricScope};
use crate::models::enrollment::CurrentEnrollment;
use crate::models::limit::Limit;
use crate::services::catalog::push_visible_to;
use crate::services::directory;

/// Length of the trailing activity window, in days, including today.
pub const WEEK_DAYS: usize = 7;

/// Active enrollments for a user, most recently enrolled first.
pub async fn current_enrollments(
    pool: &PgPool,
    ctx: &QueryContext,
    user_id: Uuid,
) -> Result<Vec<CurrentEnrollment>, AppError> {
    ctx.run(async {
        directory::find_user(pool, user_id).await?;
        fetch_current_enrollments(pool, &MetricScope::User(user_id)).await
    })
    .await
}

/// The `limit` courses a user touched most recently.
pub async fn recent_courses(
    pool: &PgPool,
    ctx: &QueryContext,
    user_id: Uuid,
    limit: Limit,
) -> Result<Vec<RecentCourse>, AppError> {
    ctx.run(async {
        directory::find_user(pool, user_id).await?;
        fetch_recent_courses(pool, &MetricScope::User(user_id), limit).await
    })
    .await
}

/// Names of the `limit` courses a user spent the most time in.
pub async fn top_courses(
    pool: &PgPool,
    ctx: &QueryContext,
    user_id: Uuid,
    limit: Limit,
) -> Result<Vec<String>, AppError> {
    ctx.run(async {
        directory::find_user(pool, user_id).await?;
        fetch_top_courses(pool, &MetricScope::User(user_id), limit).await
    })
    .await
}

/// Seven daily totals ending on the clock's current date.
pub async fn week_activity(
    pool: &PgPool,
    ctx: &QueryContext,
    clock: &dyn Clock,
    user_id: Uuid,
) -> Result<Vec<DailyActivity>, AppError> {
    let today = clock.today();
    ctx.run(async {
        directory::find_user(pool, user_id).await?;
        fetch_week_activity(pool, &MetricScope::User(user_id), today).await
    })
    .await
}

pub(crate) async fn fetch_current_enrollments(
    pool: &PgPool,
    scope: &MetricScope,
) -> Result<Vec<CurrentEnrollment>, AppError> {
    let mut qb = current_enrollments_query(scope);
    let rows = qb
        .build_query_as::<CurrentEnrollment>()
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub(crate) async fn fetch_recent_courses(
    pool: &PgPool,
    scope: &MetricScope,
    limit: Limit,
) -> Result<Vec<RecentCourse>, AppError> {
    let mut qb = recent_courses_query(scope, limit);
    let rows = qb.build_query_as::<RecentCourse>().fetch_all(pool).await?;
    Ok(rows)
}

pub(crate) async fn fetch_top_courses(
    pool: &PgPool,
    scope: &MetricScope,
    limit: Limit,
) -> Result<Vec<String>, AppError> {
    let mut qb = top_courses_query(scope, limit);
    let names = qb.build_query_scalar::<String>().fetch_all(pool).await?;
    Ok(names)
}

pub(crate) async fn fetch_week_activity(
    pool: &PgPool,
    scope: &MetricScope,
    today: NaiveDate,
) -> Result<Vec<DailyActivity>, AppError> {
    let mut qb = week_activity_query(scope, today);
    let rows = qb.build_query_as::<DailyActivity>().fetch_all(pool).await?;
    Ok(fill_week(today, &rows))
}

pub(crate) async fn fetch_totals(
    pool: &PgPool,
    scope: &MetricScope,
) -> Result<DashboardTotals, AppError> {
    let mut qb = totals_query(scope);
    let totals = qb.build_query_as::<DashboardTotals>().fetch_one(pool).await?;
    Ok(totals)
}

/// Dense series for `today - 6 ..= today`, ascending, zero on idle days.
pub fn fill_week(today: NaiveDate, rows: &[DailyActivity]) -> Vec<DailyActivity> {
    week_start(today)
        .iter_days()
        .take(WEEK_DAYS)
        .map(|date| DailyActivity {
            date,
            total_time: rows
                .iter()
                .filter(|row| row.date == date)
                .map(|row| row.total_time)
                .sum(),
        })
        .collect()
}

fn week_start(today: NaiveDate) -> NaiveDate {
    today - Duration::days(WEEK_DAYS as i64 - 1)
}

/// Restrict enrollment rows (`enrollments e JOIN courses c`) to `scope`.
fn push_enrollment_scope(qb: &mut QueryBuilder<'_, Postgres>, scope: &MetricScope, prefix: &str) {
    match scope {
        MetricScope::User(id) => {
            qb.push(prefix).push("e.user_id = ").push_bind(*id);
        }
        MetricScope::ProviderPlatform(id) => {
            qb.push(prefix)
                .push("c.provider_platform_id = ")
                .push_bind(*id);
        }
        MetricScope::All => {}
    }
}

/// Restrict activity rows (`user_activities a`) to `scope`.
fn push_activity_scope(qb: &mut QueryBuilder<'_, Postgres>, scope: &MetricScope, prefix: &str) {
    match scope {
        MetricScope::User(id) => {
            qb.push(prefix).push("a.user_id = ").push_bind(*id);
        }
        MetricScope::ProviderPlatform(id) => {
            qb.push(prefix)
                .push("a.provider_platform_id = ")
                .push_bind(*id);
        }
        MetricScope::All => {}
    }
}

/// Restrict courses (`courses c JOIN provider_platforms p`) to those offered in `scope`.
fn push_course_scope(qb: &mut QueryBuilder<'_, Postgres>, scope: &MetricScope, prefix: &str) {
    match scope {
        MetricScope::User(id) => {
            qb.push(prefix);
            push_visible_to(qb, *id);
        }
        MetricScope::ProviderPlatform(id) => {
            qb.push(prefix)
                .push("c.provider_platform_id = ")
                .push_bind(*id);
        }
        MetricScope::All => {}
    }
}

fn current_enrollments_query(scope: &MetricScope) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(
        r#"
        SELECT
            e.id AS enrollment_id,
            e.user_id,
            e.course_id,
            c.name AS course_name,
            p.name AS provider_platform_name,
            e.status,
            e.enrolled_at
        FROM enrollments e
        JOIN courses c ON c.id = e.course_id
        JOIN provider_platforms p ON p.id = c.provider_platform_id
        WHERE e.status = 'active'"#,
    );
    push_enrollment_scope(&mut qb, scope, " AND ");
    qb.push(" ORDER BY e.enrolled_at DESC, e.id ASC");
    qb
}

fn recent_courses_query(scope: &MetricScope, limit: Limit) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(
        r#"
        SELECT
            c.id AS course_id,
            c.name AS course_name,
            p.name AS provider_platform_name,
            COALESCE(SUM(a.time_delta), 0)::BIGINT AS total_time,
            MAX(a.created_at) AS last_activity_at
        FROM user_activities a
        JOIN courses c ON c.id = a.course_id
        JOIN provider_platforms p ON p.id = c.provider_platform_id
        WHERE a.course_id IS NOT NULL"#,
    );
    push_activity_scope(&mut qb, scope, " AND ");
    qb.push(
        " GROUP BY c.id, c.name, p.name \
         ORDER BY last_activity_at DESC, c.id ASC \
         LIMIT ",
    )
    .push_bind(limit.get());
    qb
}

fn top_courses_query(scope: &MetricScope, limit: Limit) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(
        r#"
        SELECT c.name
        FROM user_activities a
        JOIN courses c ON c.id = a.course_id
        WHERE a.course_id IS NOT NULL"#,
    );
    push_activity_scope(&mut qb, scope, " AND ");
    qb.push(
        " GROUP BY c.id, c.name \
         ORDER BY SUM(a.time_delta) DESC, c.id ASC \
         LIMIT ",
    )
    .push_bind(limit.get());
    qb
}

fn week_activity_query(scope: &MetricScope, today: NaiveDate) -> QueryBuilder<'static, Postgres> {
    let from = week_start(today).and_time(NaiveTime::MIN).and_utc();
    let until = (today + Duration::days(1)).and_time(NaiveTime::MIN).and_utc();

    let mut qb = QueryBuilder::new(
        r#"
        SELECT
            (a.created_at AT TIME ZONE 'UTC')::date AS date,
            COALESCE(SUM(a.time_delta), 0)::BIGINT AS total_time
        FROM user_activities a
        WHERE a.created_at >= "#,
    );
    qb.push_bind(from).push(" AND a.created_at < ").push_bind(until);
    push_activity_scope(&mut qb, scope, " AND ");
    qb.push(" GROUP BY 1 ORDER BY 1");
    qb
}

fn totals_query(scope: &MetricScope) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(
        r#"
        SELECT
            offered.courses_offered,
            enrolled.students_enrolled,
            enrolled.active_enrollments,
            activity.total_activity_secs
        FROM (
            SELECT COUNT(*) AS courses_offered
            FROM courses c
            JOIN provider_platforms p ON p.id = c.provider_platform_id"#,
    );
    push_course_scope(&mut qb, scope, " WHERE ");
    qb.push(
        r#"
        ) offered
        CROSS JOIN (
            SELECT
                COUNT(DISTINCT e.user_id) AS students_enrolled,
                COUNT(*) AS active_enrollments
            FROM enrollments e
            JOIN courses c ON c.id = e.course_id
            WHERE e.status = 'active'"#,
    );
    push_enrollment_scope(&mut qb, scope, " AND ");
    qb.push(
        r#"
        ) enrolled
        CROSS JOIN (
            SELECT COALESCE(SUM(a.time_delta), 0)::BIGINT AS total_activity_secs
            FROM user_activities a"#,
    );
    push_activity_scope(&mut qb, scope, " WHERE ");
    qb.push(") activity");
    qb
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn fill_week_without_rows_is_seven_zero_days() {
        let week = fill_week(day(2024, 3, 10), &[]);
        assert_eq!(week.len(), WEEK_DAYS);
        assert_eq!(week.first().unwrap().date, day(2024, 3, 4));
        assert_eq!(week.last().unwrap().date, day(2024, 3, 10));
        assert!(week.iter().all(|d| d.total_time == 0));
    }

    #[test]
    fn fill_week_places_totals_and_stays_ascending() {
        let rows = [
            DailyActivity { date: day(2024, 3, 9), total_time: 600 },
            DailyActivity { date: day(2024, 3, 5), total_time: 120 },
        ];
        let week = fill_week(day(2024, 3, 10), &rows);
        assert!(week.windows(2).all(|w| w[0].date < w[1].date));
        let totals: Vec<i64> = week.iter().map(|d| d.total_time).collect();
        assert_eq!(totals, vec![0, 120, 0, 0, 0, 600, 0]);
    }

    #[test]
    fn fill_week_ignores_rows_outside_window() {
        let rows = [
            DailyActivity { date: day(2024, 3, 3), total_time: 999 },
            DailyActivity { date: day(2024, 3, 11), total_time: 999 },
        ];
        let week = fill_week(day(2024, 3, 10), &rows);
        assert!(week.iter().all(|d| d.total_time == 0));
    }

    #[test]
    fn fill_week_crosses_month_boundary() {
        let week = fill_week(day(2024, 3, 2), &[]);
        assert_eq!(week[0].date, day(2024, 2, 25));
        assert_eq!(week[4].date, day(2024, 2, 29));
    }

    #[test]
    fn enrollment_query_scopes() {
        let user = current_enrollments_query(&MetricScope::User(Uuid::nil()));
        assert!(user.sql().contains("WHERE e.status = 'active' AND e.user_id = $1"));
        assert!(user.sql().ends_with("ORDER BY e.enrolled_at DESC, e.id ASC"));

        let platform = current_enrollments_query(&MetricScope::ProviderPlatform(Uuid::nil()));
        assert!(platform.sql().contains("AND c.provider_platform_id = $1"));

        let all = current_enrollments_query(&MetricScope::All);
        assert!(!all.sql().contains("$1"));
    }

    #[test]
    fn ranked_queries_break_ties_by_course_id() {
        let limit = Limit::new(3).unwrap();
        let recent = recent_courses_query(&MetricScope::User(Uuid::nil()), limit);
        assert!(recent
            .sql()
            .contains("ORDER BY last_activity_at DESC, c.id ASC LIMIT $2"));

        let top = top_courses_query(&MetricScope::All, limit);
        assert!(top
            .sql()
            .contains("ORDER BY SUM(a.time_delta) DESC, c.id ASC LIMIT $1"));
    }

    #[test]
    fn week_query_binds_window_before_scope() {
        let qb = week_activity_query(&MetricScope::User(Uuid::nil()), day(2024, 3, 10));
        let sql = qb.sql();
        assert!(sql.contains("a.created_at >= $1 AND a.created_at < $2 AND a.user_id = $3"));
        assert!(sql.ends_with("GROUP BY 1 ORDER BY 1"));
    }

    #[test]
    fn totals_query_uses_where_for_first_predicate() {
        let platform = totals_query(&MetricScope::ProviderPlatform(Uuid::nil()));
        let sql = platform.sql();
        assert!(sql.contains("JOIN provider_platforms p ON p.id = c.provider_platform_id WHERE c.provider_platform_id = $1"));
        assert!(sql.contains("WHERE e.status = 'active' AND c.provider_platform_id = $2"));
        assert!(sql.contains("FROM user_activities a WHERE a.provider_platform_id = $3"));

        let all = totals_query(&MetricScope::All);
        assert!(!all.sql().contains("$1"));
        assert!(all.sql().contains("FROM user_activities a) activity"));

        let user = totals_query(&MetricScope::User(Uuid::nil()));
        assert!(user.sql().contains("WHERE p.state <> 'archived'"));
    }
}
