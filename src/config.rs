use std::net::SocketAddr;

use axum::http::HeaderValue;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";
const DEFAULT_API_PREFIX: &str = "/api/subscriptions";
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Runtime settings, read from the environment (and `.env` via dotenvy).
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Without a database url the service keeps its data in memory.
    pub database_url: Option<String>,
    pub bind_addr: SocketAddr,
    /// The single origin allowed to call the API from a browser.
    pub cors_origin: HeaderValue,
    pub api_prefix: String,
    pub db_max_connections: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            cors_origin: HeaderValue::from_static(DEFAULT_CORS_ORIGIN),
            api_prefix: DEFAULT_API_PREFIX.to_string(),
            db_max_connections: DEFAULT_DB_MAX_CONNECTIONS,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());

        let bind_addr = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr: SocketAddr = bind_addr.parse().map_err(|_| ConfigError::Invalid {
            name: "BIND_ADDR",
            value: bind_addr.clone(),
        })?;

        let cors_origin = lookup("CORS_ORIGIN").unwrap_or_else(|| DEFAULT_CORS_ORIGIN.to_string());
        let cors_origin = HeaderValue::from_str(&cors_origin).map_err(|_| ConfigError::Invalid {
            name: "CORS_ORIGIN",
            value: cors_origin.clone(),
        })?;

        let api_prefix = lookup("API_PREFIX").unwrap_or_else(|| DEFAULT_API_PREFIX.to_string());
        // axum cannot nest at the root or under a trailing slash
        if !api_prefix.starts_with('/') || api_prefix.len() < 2 || api_prefix.ends_with('/') {
            return Err(ConfigError::Invalid {
                name: "API_PREFIX",
                value: api_prefix,
            });
        }

        let db_max_connections = match lookup("DB_MAX_CONNECTIONS") {
            Some(raw) => match raw.parse::<u32>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ConfigError::Invalid {
                        name: "DB_MAX_CONNECTIONS",
                        value: raw,
                    });
                }
            },
            None => DEFAULT_DB_MAX_CONNECTIONS,
        };

        Ok(Self {
            database_url,
            bind_addr,
            cors_origin,
            api_prefix,
            db_max_connections,
        })
    }
}
