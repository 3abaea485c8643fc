use std::net::IpAddr;
use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;
use axum::http::HeaderValue;

/// Server configuration loaded from environment variables.
///
/// All fields except the database URL have defaults suitable for local
/// development. Invalid values are rejected at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: IpAddr,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<HeaderValue>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Deadline for each individual store operation in milliseconds (default: `5000`).
    pub store_timeout_ms: u64,
    /// PostgreSQL connection string (required).
    pub database_url: String,
    /// Maximum pooled database connections (default: `20`).
    pub database_max_connections: u32,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                    | Default                 |
    /// |----------------------------|-------------------------|
    /// | `HOST`                     | `0.0.0.0`               |
    /// | `PORT`                     | `3000`                  |
    /// | `CORS_ORIGINS`             | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`     | `30`                    |
    /// | `STORE_TIMEOUT_MS`         | `5000`                  |
    /// | `DATABASE_URL`             | (required)              |
    /// | `DATABASE_MAX_CONNECTIONS` | `20`                    |
    pub fn from_env() -> anyhow::Result<Self> {
        let cors_origins = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|o| {
                HeaderValue::from_str(o).with_context(|| format!("Invalid CORS origin '{o}'"))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        Ok(Self {
            host: parse_var("HOST", "0.0.0.0")?,
            port: parse_var("PORT", "3000")?,
            cors_origins,
            request_timeout_secs: parse_var("REQUEST_TIMEOUT_SECS", "30")?,
            store_timeout_ms: parse_var("STORE_TIMEOUT_MS", "5000")?,
            database_url: std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            database_max_connections: parse_var("DATABASE_MAX_CONNECTIONS", "20")?,
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }
}

/// Read `name` from the environment (or `default`) and parse it.
fn parse_var<T>(name: &str, default: &str) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw = std::env::var(name).unwrap_or_else(|_| default.to_string());
    raw.parse()
        .with_context(|| format!("{name} has an invalid value '{raw}'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_var_falls_back_to_default() {
        let port: u16 = parse_var("STREAMCODE_TEST_UNSET_PORT", "3000").unwrap();
        assert_eq!(port, 3000);
    }

    #[test]
    fn parse_var_reports_the_variable() {
        let err = parse_var::<u16>("STREAMCODE_TEST_UNSET_PORT", "not-a-port").unwrap_err();
        assert!(err.to_string().contains("STREAMCODE_TEST_UNSET_PORT"));
    }

    #[test]
    fn timeouts_convert_units() {
        let config = ServerConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 0,
            cors_origins: vec![],
            request_timeout_secs: 30,
            store_timeout_ms: 250,
            database_url: String::new(),
            database_max_connections: 1,
        };
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.store_timeout(), Duration::from_millis(250));
    }
}
