//! Route definitions for the read-model API.

pub mod catalog;
pub mod dashboard;
pub mod health;
pub mod metrics;

use axum::http::{header, HeaderValue, Method};
use axum::routing::get;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::AppState;

/// Build the application router with tracing and CORS layers.
pub fn router(state: AppState) -> Router {
    let cors = match state.config.frontend_url.parse::<HeaderValue>() {
        Ok(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([Method::GET])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]),
        Err(e) => {
            tracing::warn!(error = %e, url = %state.config.frontend_url, "Invalid FRONTEND_URL, CORS disabled");
            CorsLayer::new()
        }
    };

    let user_routes: Router<AppState> = Router::new()
        .route("/users/{id}/student-dashboard", get(dashboard::student))
        .route("/users/{id}/catalog", get(catalog::list))
        .route(
            "/users/{id}/current-enrollments",
            get(metrics::current_enrollments),
        )
        .route("/users/{id}/recent-courses", get(metrics::recent_courses))
        .route("/users/{id}/top-courses", get(metrics::top_courses))
        .route("/users/{id}/week-activity", get(metrics::week_activity));

    let admin_routes: Router<AppState> = Router::new().route("/admin/dashboard", get(dashboard::admin));

    Router::new()
        .route("/health/live", get(health::live))
        .route("/health/ready", get(health::ready))
        .nest("/api", user_routes.merge(admin_routes))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
