//! Server configuration from the environment.

use std::path::PathBuf;

/// Runtime configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind host. `MEMENTO_HOST`, default `0.0.0.0`.
    pub host: String,
    /// Bind port. `MEMENTO_PORT`, default `8080`.
    pub port: u16,
    /// SQLite database path. `MEMENTO_DB`, default `memento.db`.
    pub database_path: PathBuf,
    /// Web client origin for CORS with credentials.
    /// `MEMENTO_WEB_ORIGIN`; when unset, CORS is permissive.
    pub web_origin: Option<String>,
    /// Session lifetime in seconds. `MEMENTO_SESSION_TTL_SECS`,
    /// default 7 days.
    pub session_ttl_secs: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, String> {
        let host = std::env::var("MEMENTO_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = std::env::var("MEMENTO_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()
            .map_err(|_| "MEMENTO_PORT must be a valid port number".to_string())?;
        let database_path = std::env::var("MEMENTO_DB")
            .unwrap_or_else(|_| "memento.db".to_string())
            .into();
        let web_origin = std::env::var("MEMENTO_WEB_ORIGIN").ok();
        let session_ttl_secs = std::env::var("MEMENTO_SESSION_TTL_SECS")
            .unwrap_or_else(|_| (7 * 24 * 3600).to_string())
            .parse::<u64>()
            .map_err(|_| "MEMENTO_SESSION_TTL_SECS must be a number of seconds".to_string())?;

        Ok(Self {
            host,
            port,
            database_path,
            web_origin,
            session_ttl_secs,
        })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            database_path: "memento.db".into(),
            web_origin: None,
            session_ttl_secs: 7 * 24 * 3600,
        }
    }
}
