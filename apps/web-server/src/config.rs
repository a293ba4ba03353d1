//! Application configuration loaded from environment variables.

use std::env;
use std::time::Duration;

use yatube_core::pagination::DEFAULT_PAGE_SIZE;
use yatube_infra::database::DatabaseConfig;

pub const DEFAULT_LOGIN_URL: &str = "/auth/login/";
const DEFAULT_INDEX_CACHE_TTL_SECS: u64 = 20;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: Option<DatabaseConfig>,
    /// Page size for every paginated listing.
    pub paginate_by: u64,
    /// How long a rendered home page is served from cache.
    pub index_cache_ttl: Duration,
    /// Where unauthenticated callers are sent, with `?next=<path>` appended.
    pub login_url: String,
    pub redis_url: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            database: None,
            paginate_by: DEFAULT_PAGE_SIZE,
            index_cache_ttl: Duration::from_secs(DEFAULT_INDEX_CACHE_TTL_SECS),
            login_url: DEFAULT_LOGIN_URL.to_string(),
            redis_url: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let database = env::var("DATABASE_URL").ok().map(|url| DatabaseConfig {
            url,
            max_connections: parse_var("DB_MAX_CONNECTIONS").unwrap_or(100),
            min_connections: parse_var("DB_MIN_CONNECTIONS").unwrap_or(10),
        });

        Self {
            host: env::var("HOST").unwrap_or(defaults.host),
            port: parse_var("PORT").unwrap_or(defaults.port),
            database,
            paginate_by: parse_var("PAGINATE_BY").unwrap_or(defaults.paginate_by),
            index_cache_ttl: parse_var("INDEX_CACHE_TTL_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.index_cache_ttl),
            login_url: env::var("LOGIN_URL").unwrap_or(defaults.login_url),
            redis_url: env::var("REDIS_URL").ok(),
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|s| s.parse().ok())
}
