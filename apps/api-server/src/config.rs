//! Application configuration loaded from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use folio_core::AllowList;
use folio_infra::UploadThingConfig;
use folio_infra::database::DatabaseConfig;

#[cfg(feature = "rate-limit")]
use folio_infra::RateLimitConfig;

/// Operator identity settings.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// `ALLOWED_GITHUB_EMAILS` × `ALLOWED_GITHUB_IDS`.
    pub allow_list: AllowList,
    /// Base URL of the auth service. Without it nobody can sign in.
    pub base_url: Option<String>,
    pub session_cache_ttl: Duration,
    pub request_timeout: Duration,
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: Option<DatabaseConfig>,
    pub auth: AuthConfig,
    pub uploadthing: Option<UploadThingConfig>,
    /// Lifetime of cached public listings.
    pub view_cache_ttl: Duration,
    #[cfg(feature = "rate-limit")]
    pub rate_limit: RateLimitConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let database = var("DATABASE_URL").map(|url| DatabaseConfig {
            max_connections: parse_or(var("DB_MAX_CONNECTIONS"), "DB_MAX_CONNECTIONS", 10),
            min_connections: parse_or(var("DB_MIN_CONNECTIONS"), "DB_MIN_CONNECTIONS", 1),
            sql_logging: var("DB_SQL_LOGGING").is_some_and(|v| v == "true" || v == "1"),
            ..DatabaseConfig::new(url)
        });

        let auth = AuthConfig {
            allow_list: AllowList::from_csv(
                &var("ALLOWED_GITHUB_EMAILS").unwrap_or_default(),
                &var("ALLOWED_GITHUB_IDS").unwrap_or_default(),
            ),
            base_url: var("AUTH_BASE_URL"),
            session_cache_ttl: Duration::from_secs(parse_or(
                var("SESSION_CACHE_TTL_SECS"),
                "SESSION_CACHE_TTL_SECS",
                600,
            )),
            request_timeout: Duration::from_secs(parse_or(
                var("AUTH_TIMEOUT_SECS"),
                "AUTH_TIMEOUT_SECS",
                5,
            )),
        };

        let uploadthing = var("UPLOADTHING_TOKEN").map(|token| {
            let mut config = UploadThingConfig::new(token);
            if let Some(api_url) = var("UPLOADTHING_API_URL") {
                config.api_url = api_url;
            }
            config
        });

        Self {
            host: var("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: parse_or(var("PORT"), "PORT", 8080),
            database,
            auth,
            uploadthing,
            view_cache_ttl: Duration::from_secs(parse_or(
                var("VIEW_CACHE_TTL_SECS"),
                "VIEW_CACHE_TTL_SECS",
                300,
            )),
            #[cfg(feature = "rate-limit")]
            rate_limit: RateLimitConfig {
                max_requests: parse_or(
                    var("RATE_LIMIT_MAX_REQUESTS"),
                    "RATE_LIMIT_MAX_REQUESTS",
                    5,
                ),
                window: Duration::from_secs(parse_or(
                    var("RATE_LIMIT_WINDOW_SECS"),
                    "RATE_LIMIT_WINDOW_SECS",
                    60,
                )),
            },
        }
    }
}

/// Parse `value`, falling back to `default` (with a warning) when it is malformed.
fn parse_or<T>(value: Option<String>, key: &str, default: T) -> T
where
    T: FromStr + Copy + std::fmt::Display,
{
    match value {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key = %key, value = %raw, default = %default, "Ignoring malformed setting");
            default
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert!(config.database.is_none());
        assert!(config.uploadthing.is_none());
        assert!(config.auth.base_url.is_none());
        assert!(config.auth.allow_list.is_empty());
        assert_eq!(config.auth.session_cache_ttl, Duration::from_secs(600));
        assert_eq!(config.view_cache_ttl, Duration::from_secs(300));
    }

    #[test]
    fn test_full_configuration() {
        let config = load(&[
            ("PORT", "3001"),
            ("DATABASE_URL", "postgres://localhost/folio"),
            ("DB_MAX_CONNECTIONS", "4"),
            ("ALLOWED_GITHUB_EMAILS", "owner@example.com"),
            ("ALLOWED_GITHUB_IDS", "owner-gh"),
            ("AUTH_BASE_URL", "http://localhost:3000"),
            ("UPLOADTHING_TOKEN", "sk_live_abc"),
            ("UPLOADTHING_API_URL", "http://localhost:9999"),
        ]);

        assert_eq!(config.port, 3001);
        let database = config.database.unwrap();
        assert_eq!(database.url, "postgres://localhost/folio");
        assert_eq!(database.max_connections, 4);
        assert!(config.auth.allow_list.permits("owner@example.com", "owner-gh"));
        assert_eq!(config.auth.base_url.as_deref(), Some("http://localhost:3000"));
        let uploadthing = config.uploadthing.unwrap();
        assert_eq!(uploadthing.api_key, "sk_live_abc");
        assert_eq!(uploadthing.api_url, "http://localhost:9999");
    }

    #[test]
    fn test_malformed_numbers_fall_back() {
        let config = load(&[("PORT", "eighty"), ("VIEW_CACHE_TTL_SECS", "-1")]);
        assert_eq!(config.port, 8080);
        assert_eq!(config.view_cache_ttl, Duration::from_secs(300));
    }

    #[test]
    fn test_blank_values_count_as_unset() {
        let config = load(&[("DATABASE_URL", "  "), ("UPLOADTHING_TOKEN", "")]);
        assert!(config.database.is_none());
        assert!(config.uploadthing.is_none());
    }
}
