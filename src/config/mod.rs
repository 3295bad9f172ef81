//! Server configuration for checkpoint-server
//!
//! Loads and parses the checkpoint-server.toml configuration file with
//! HTTP listener and database settings.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    ParseError(toml::de::Error),
    #[error("Configuration file not found. Set CONFIG_PATH or place checkpoint-server.toml in config/")]
    NotFound,
}

/// HTTP listener configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Bind address
    pub host: String,
    /// Bind port
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
        }
    }
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: "checkpoints.db".to_string(),
        }
    }
}

/// Top-level server configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
}

impl ServerConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, ServerConfigError> {
        let content =
            std::fs::read_to_string(path.as_ref()).map_err(ServerConfigError::ReadError)?;
        Self::from_toml(&content)
    }

    /// Load configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self, ServerConfigError> {
        toml::from_str(content).map_err(ServerConfigError::ParseError)
    }

    /// Load configuration from the default locations or environment
    ///
    /// Searches for config in:
    /// 1. CONFIG_PATH environment variable
    /// 2. ./config/checkpoint-server.toml
    /// 3. ./checkpoint-server.toml
    pub fn load() -> Result<Self, ServerConfigError> {
        if let Ok(config_path) = std::env::var("CONFIG_PATH") {
            return Self::from_file(config_path);
        }

        let paths = [
            PathBuf::from("config/checkpoint-server.toml"),
            PathBuf::from("checkpoint-server.toml"),
        ];

        for path in &paths {
            if path.exists() {
                return Self::from_file(path);
            }
        }

        Err(ServerConfigError::NotFound)
    }

    /// SQLite connection string for the configured database path
    ///
    /// `mode=rwc` so the database file is created on first run.
    pub fn database_url(&self) -> String {
        format!("sqlite:{}?mode=rwc", self.database.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.http.host, "127.0.0.1");
        assert_eq!(config.http.port, 8000);
        assert_eq!(config.database.path, "checkpoints.db");
    }

    #[test]
    fn test_from_toml() {
        let config = ServerConfig::from_toml(
            r#"
            [http]
            host = "0.0.0.0"
            port = 9000

            [database]
            path = "/var/lib/checkpoints.db"
            "#,
        )
        .unwrap();

        assert_eq!(config.http.host, "0.0.0.0");
        assert_eq!(config.http.port, 9000);
        assert_eq!(config.database.path, "/var/lib/checkpoints.db");
    }

    #[test]
    fn test_from_toml_partial_sections() {
        let config = ServerConfig::from_toml(
            r#"
            [database]
            path = "study.db"
            "#,
        )
        .unwrap();

        assert_eq!(config.http.port, 8000);
        assert_eq!(config.database.path, "study.db");
    }

    #[test]
    fn test_from_toml_invalid() {
        assert!(ServerConfig::from_toml("[http\nhost = ").is_err());
    }

    #[test]
    fn test_database_url() {
        let config = ServerConfig::default();
        assert_eq!(config.database_url(), "sqlite:checkpoints.db?mode=rwc");
    }
}
