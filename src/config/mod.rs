use anyhow::Context;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub admin: AdminConfig,
    pub tracking: TrackingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub backend: DatabaseBackend,
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseBackend {
    Sqlite,
    Postgres,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Operator access gate. The secret is supplied via environment so it can be
/// rotated without a rebuild.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackingConfig {
    /// Upper bound on a single event-store write during ingestion.
    /// A write that exceeds it is dropped, not retried.
    #[serde(default = "TrackingConfig::default_write_timeout_ms")]
    pub write_timeout_ms: u64,

    /// Upper bound on the event-store reads backing one analytics query.
    #[serde(default = "TrackingConfig::default_query_timeout_ms")]
    pub query_timeout_ms: u64,
}

impl TrackingConfig {
    const fn default_write_timeout_ms() -> u64 {
        2000
    }

    const fn default_query_timeout_ms() -> u64 {
        5000
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let backend_str =
            std::env::var("DATABASE_BACKEND").unwrap_or_else(|_| "sqlite".to_string());

        let backend = match backend_str.to_lowercase().as_str() {
            "postgres" | "postgresql" => DatabaseBackend::Postgres,
            _ => DatabaseBackend::Sqlite,
        };

        let database_url =
            std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://./linkpulse.db".to_string());

        let max_connections = std::env::var("DATABASE_MAX_CONNECTIONS")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(5);

        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()?;

        let admin_password =
            std::env::var("ADMIN_PASSWORD").context("ADMIN_PASSWORD must be set")?;

        let write_timeout_ms = std::env::var("TRACK_WRITE_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or_else(TrackingConfig::default_write_timeout_ms);

        let query_timeout_ms = std::env::var("ANALYTICS_QUERY_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or_else(TrackingConfig::default_query_timeout_ms);

        Ok(Config {
            database: DatabaseConfig {
                backend,
                url: database_url,
                max_connections,
            },
            server: ServerConfig { host, port },
            admin: AdminConfig {
                password: admin_password,
            },
            tracking: TrackingConfig {
                write_timeout_ms,
                query_timeout_ms,
            },
        })
    }
}
