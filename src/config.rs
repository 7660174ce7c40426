//! Project configuration.
//!
//! The configuration file describes the services of the development stack.
//! It is loaded once at startup with the `config` crate and passed
//! explicitly to [`Registry::from_config`](crate::registry::Registry::from_config);
//! a change requires a restart.
//!
//! ```yaml
//! engine:
//!   name: Docker Desktop
//!   command: docker
//! database:
//!   type: MongoDB
//!   dev_port: 27018
//!   prod_port: 27019
//! production:
//!   server: prod.example.com
//! services:
//!   - name: news-api
//!     port: 8084
//!     type: api
//!     health_path: /health
//!   - name: Angular
//!     port: 3000
//!     type: frontend
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

/// Default local port of the development database.
pub const DEFAULT_DB_DEV_PORT: u16 = 27018;

/// Default local port the production SSH tunnel forwards to.
pub const DEFAULT_DB_PROD_PORT: u16 = 27019;

/// Prefix for environment variable overrides (e.g. `STACKWATCH__DATABASE__DEV_PORT`).
pub const ENV_PREFIX: &str = "STACKWATCH";

/// Top-level project configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Container engine whose presence is checked.
    #[serde(default)]
    pub engine: EngineConfig,
    /// Development database and the port of its production tunnel.
    #[serde(default)]
    pub database: Option<DatabaseConfig>,
    /// Production host reached through the SSH tunnel.
    #[serde(default)]
    pub production: Option<ProductionConfig>,
    /// Application services, in display order.
    #[serde(default)]
    pub services: Vec<ServiceConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "default_engine_name")]
    pub name: String,
    /// Executable invoked as `<command> info`.
    #[serde(default = "default_engine_command")]
    pub command: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            name: default_engine_name(),
            command: default_engine_command(),
        }
    }
}

fn default_engine_name() -> String {
    "Docker Desktop".to_string()
}

fn default_engine_command() -> String {
    "docker".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Display name of the database (e.g. "MongoDB").
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default = "default_dev_port")]
    pub dev_port: u16,
    #[serde(default = "default_prod_port")]
    pub prod_port: u16,
}

fn default_dev_port() -> u16 {
    DEFAULT_DB_DEV_PORT
}

fn default_prod_port() -> u16 {
    DEFAULT_DB_PROD_PORT
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductionConfig {
    #[serde(default)]
    pub server: Option<String>,
}

/// One configured service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub port: u16,
    #[serde(rename = "type", default)]
    pub kind: ServiceKind,
    /// When set, the service is checked with an HTTP GET on this path
    /// instead of a bare TCP connect.
    #[serde(default)]
    pub health_path: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceKind {
    #[default]
    Api,
    Frontend,
    Database,
}

impl ProjectConfig {
    /// Load a configuration file, layering `STACKWATCH__*` environment overrides on top.
    ///
    /// The format is inferred from the file extension (YAML, TOML or JSON).
    pub fn load(path: &Path) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from(path))
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()
            .with_context(|| format!("failed to read config {}", path.display()))?;

        config
            .try_deserialize()
            .with_context(|| format!("invalid config {}", path.display()))
    }

    /// Port the production tunnel listens on locally.
    pub fn tunnel_port(&self) -> u16 {
        self.database.as_ref().map_or(DEFAULT_DB_PROD_PORT, |db| db.prod_port)
    }

    /// Display name of the production tunnel.
    pub fn tunnel_name(&self) -> String {
        self.production
            .as_ref()
            .and_then(|p| p.server.as_deref())
            .filter(|s| !s.is_empty())
            .unwrap_or("Production")
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    fn write_config(ext: &str, content: &str) -> tempfile::NamedTempFile {
        let mut file = Builder::new().suffix(ext).tempfile().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_load_yaml() {
        let file = write_config(
            ".yaml",
            r#"
database:
  type: MongoDB
  dev_port: 27018
  prod_port: 27020
production:
  server: prod.example.com
services:
  - name: news-api
    port: 8084
    type: api
    health_path: /health
  - name: Angular
    port: 3000
    type: frontend
"#,
        );

        let config = ProjectConfig::load(file.path()).unwrap();
        assert_eq!(config.engine.name, "Docker Desktop");
        assert_eq!(config.engine.command, "docker");
        assert_eq!(config.database.as_ref().unwrap().kind, "MongoDB");
        assert_eq!(config.tunnel_port(), 27020);
        assert_eq!(config.tunnel_name(), "prod.example.com");
        assert_eq!(config.services.len(), 2);
        assert_eq!(config.services[0].health_path.as_deref(), Some("/health"));
        assert_eq!(config.services[1].kind, ServiceKind::Frontend);
    }

    #[test]
    fn test_load_toml_defaults() {
        let file = write_config(
            ".toml",
            r#"
[[services]]
name = "svc1"
port = 8081
"#,
        );

        let config = ProjectConfig::load(file.path()).unwrap();
        assert!(config.database.is_none());
        assert_eq!(config.tunnel_port(), DEFAULT_DB_PROD_PORT);
        assert_eq!(config.tunnel_name(), "Production");
        assert_eq!(config.services[0].kind, ServiceKind::Api);
        assert!(config.services[0].health_path.is_none());
    }

    #[test]
    fn test_load_rejects_bad_port() {
        let file = write_config(
            ".yaml",
            r#"
services:
  - name: svc1
    port: 70000
"#,
        );

        assert!(ProjectConfig::load(file.path()).is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let err = ProjectConfig::load(Path::new("/nonexistent/stackwatch.yaml")).unwrap_err();
        assert!(err.to_string().contains("failed to read config"));
    }
}
