//! Course catalog: visibility, tag filters, name search, and ordering.
//!
//! A [`CatalogQuery`] narrows one base query step by step. Every user value is
//! bound as a parameter; only fixed column names and keywords are written into
//! the SQL text.

use std::collections::BTreeSet;

use serde::Deserialize;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::context::QueryContext;
use crate::errors::AppError;
use crate::models::course::{CatalogEntry, CatalogOrder, CourseTag};
use crate::services::directory;

const CATALOG_SELECT: &str = r#"
        SELECT
            c.id AS course_id,
            c.name AS course_name,
            c.description,
            c.provider_platform_id,
            p.name AS provider_platform_name,
            c.has_certificate,
            c.has_grades,
            c.progress_completion,
            c.pathway_completion,
            c.college_credit,
            EXISTS (
                SELECT 1 FROM enrollments en
                WHERE en.course_id = c.id AND en.user_id = "#;

/// Raw `?tags=&search=&order=` parameters as the handler receives them.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogParams {
    pub tags: Option<String>,
    pub search: Option<String>,
    pub order: Option<String>,
}

impl CatalogParams {
    pub fn into_query(self) -> Result<CatalogQuery, AppError> {
        CatalogQuery::parse(
            self.tags.as_deref().unwrap_or_default(),
            self.search.as_deref().unwrap_or_default(),
            self.order.as_deref().unwrap_or_default(),
        )
    }
}

/// Validated catalog criteria.
///
/// Tags combine with AND: a course must carry every requested tag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogQuery {
    tags: BTreeSet<CourseTag>,
    search: String,
    order: CatalogOrder,
}

impl CatalogQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a comma-separated tag list, search text and order value.
    ///
    /// Tag names are trimmed. Search text is matched exactly as given.
    pub fn parse(tags: &str, search: &str, order: &str) -> Result<Self, AppError> {
        let tags = tags
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::parse::<CourseTag>)
            .collect::<Result<BTreeSet<_>, _>>()?;

        Ok(Self {
            tags,
            search: search.to_string(),
            order: order.parse()?,
        })
    }

    pub fn with_tag(mut self, tag: CourseTag) -> Self {
        self.tags.insert(tag);
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_order(mut self, order: CatalogOrder) -> Self {
        self.order = order;
        self
    }

    pub fn tags(&self) -> &BTreeSet<CourseTag> {
        &self.tags
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn order(&self) -> CatalogOrder {
        self.order
    }

    /// Compose the catalog statement for `user_id`.
    pub fn build(&self, user_id: Uuid) -> QueryBuilder<'static, Postgres> {
        let mut qb = QueryBuilder::new(CATALOG_SELECT);
        qb.push_bind(user_id);
        qb.push(
            r#"
            ) AS is_enrolled
        FROM courses c
        JOIN provider_platforms p ON p.id = c.provider_platform_id
        WHERE "#,
        );
        push_visible_to(&mut qb, user_id);

        for tag in &self.tags {
            qb.push(" AND c.").push(tag.column()).push(" = TRUE");
        }

        if !self.search.is_empty() {
            qb.push(" AND c.name ILIKE ")
                .push_bind(like_pattern(&self.search))
                .push(" ESCAPE '\\'");
        }

        let direction = self.order.sql_keyword();
        qb.push(" ORDER BY c.name ")
            .push(direction)
            .push(", c.id ")
            .push(direction);
        qb
    }
}

/// Predicate for courses `user_id` can see. Expects `courses c` joined with
/// `provider_platforms p`.
///
/// A course is visible when the user has an account on its platform or is
/// enrolled in it, and the platform is not archived.
pub(crate) fn push_visible_to(qb: &mut QueryBuilder<'_, Postgres>, user_id: Uuid) {
    qb.push(
        "p.state <> 'archived' AND (c.provider_platform_id IN \
         (SELECT m.provider_platform_id FROM provider_user_mappings m WHERE m.user_id = ",
    )
    .push_bind(user_id)
    .push(") OR EXISTS (SELECT 1 FROM enrollments ve WHERE ve.course_id = c.id AND ve.user_id = ")
    .push_bind(user_id)
    .push("))");
}

/// Substring `ILIKE` pattern with wildcard characters in `search` escaped.
fn like_pattern(search: &str) -> String {
    let mut pattern = String::with_capacity(search.len() + 2);
    pattern.push('%');
    for ch in search.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

/// List the courses visible to `user_id` that match `query`.
pub async fn catalog(
    pool: &PgPool,
    ctx: &QueryContext,
    user_id: Uuid,
    query: &CatalogQuery,
) -> Result<Vec<CatalogEntry>, AppError> {
    ctx.run(async {
        directory::find_user(pool, user_id).await?;

        let mut qb = query.build(user_id);
        let entries = qb
            .build_query_as::<CatalogEntry>()
            .fetch_all(pool)
            .await?;

        tracing::debug!(
            user_id = %user_id,
            tags = query.tags.len(),
            order = query.order.sql_keyword(),
            results = entries.len(),
            "Catalog query completed"
        );
        Ok(entries)
    })
    .await
}
