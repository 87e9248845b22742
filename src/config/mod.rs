use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Configuration could not be loaded from the environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value {value:?} for {name}")]
    Invalid { name: &'static str, value: String },
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub database_max_connections: u32,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub frontend_url: String,
    pub query_timeout_ms: u64,
    pub dashboard_recent_limit: i64,
    pub dashboard_top_limit: i64,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            database_url: required("DATABASE_URL")?,
            database_max_connections: parse_or(
                "DATABASE_MAX_CONNECTIONS",
                env::var("DATABASE_MAX_CONNECTIONS").ok(),
                10,
            )?,
            host: env::var("BACKEND_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parse_or("BACKEND_PORT", env::var("BACKEND_PORT").ok(), 3000)?,
            jwt_secret: required("JWT_SECRET")?,
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "https://localhost:5173".to_string()),
            query_timeout_ms: parse_or(
                "QUERY_TIMEOUT_MS",
                env::var("QUERY_TIMEOUT_MS").ok(),
                5000,
            )?,
            dashboard_recent_limit: parse_or(
                "DASHBOARD_RECENT_LIMIT",
                env::var("DASHBOARD_RECENT_LIMIT").ok(),
                5,
            )?,
            dashboard_top_limit: parse_or(
                "DASHBOARD_TOP_LIMIT",
                env::var("DASHBOARD_TOP_LIMIT").ok(),
                5,
            )?,
        })
    }

    /// Deadline applied to every read-model call made on behalf of a request.
    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.query_timeout_ms)
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name).map_err(|_| ConfigError::Missing(name))
}

/// `default` when the variable is unset; an error when it is set but unparseable.
fn parse_or<T: FromStr>(
    name: &'static str,
    raw: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
    }
}
