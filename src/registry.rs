//! The list of endpoints the dashboard checks.
//!
//! A [`Registry`] is built once at startup, either from the built-in table
//! or from a [`ProjectConfig`], and never re-read afterwards. Every target
//! carries an explicit [`Category`] so sectioning never has to guess from
//! names or ports.

use std::sync::Arc;

use serde::Serialize;

use crate::config::{ProjectConfig, ServiceKind, DEFAULT_DB_DEV_PORT, DEFAULT_DB_PROD_PORT};

/// Display category of a probe target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Infra,
    Database,
    Api,
    Frontend,
    Tunnel,
}

/// How a target is checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase", tag = "kind")]
pub enum CheckKind {
    /// Ask the container engine CLI whether the daemon responds.
    Engine { command: String },
    /// TCP connect to `localhost:<port>`.
    Tcp,
    /// HTTP GET on `http://localhost:<port><path>`, 2xx is reachable.
    Http { path: String },
}

/// Something to check. Port 0 means presence-only (no port shown).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeTarget {
    pub name: String,
    pub port: u16,
    pub category: Category,
    pub check: CheckKind,
}

impl ProbeTarget {
    /// A TCP port target.
    pub fn tcp(name: impl Into<String>, port: u16, category: Category) -> Self {
        Self {
            name: name.into(),
            port,
            category,
            check: CheckKind::Tcp,
        }
    }

    /// A container-engine presence target (no port).
    pub fn engine(name: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            port: 0,
            category: Category::Infra,
            check: CheckKind::Engine {
                command: command.into(),
            },
        }
    }

    /// An HTTP health endpoint target.
    pub fn http(
        name: impl Into<String>,
        port: u16,
        path: impl Into<String>,
        category: Category,
    ) -> Self {
        Self {
            name: name.into(),
            port,
            category,
            check: CheckKind::Http { path: path.into() },
        }
    }

    /// Whether this target has a port to display.
    pub fn has_port(&self) -> bool {
        self.port != 0
    }
}

/// Application services of the built-in table, in display order.
const BUILTIN_SERVICES: &[(&str, u16)] = &[
    ("networks-api", 8085),
    ("random-facts-api", 8082),
    ("alcohol-free-api", 8081),
    ("random-quotes-api", 8083),
    ("news-api", 8084),
    ("about-me-api", 8086),
    ("featured-item-api", 8087),
    ("bitcoin-price-api", 8088),
];

const BUILTIN_FRONTEND_PORT: u16 = 3000;

/// Ordered, immutable list of probe targets.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    targets: Vec<Arc<ProbeTarget>>,
}

impl Registry {
    pub fn new(targets: Vec<ProbeTarget>) -> Self {
        Self {
            targets: targets.into_iter().map(Arc::new).collect(),
        }
    }

    /// The hardcoded stack used when no project configuration is present.
    pub fn builtin() -> Self {
        let mut targets = vec![
            ProbeTarget::engine("Docker Desktop", "docker"),
            ProbeTarget::tcp("MongoDB", DEFAULT_DB_DEV_PORT, Category::Database),
            ProbeTarget::tcp("Production", DEFAULT_DB_PROD_PORT, Category::Tunnel),
        ];
        targets.extend(
            BUILTIN_SERVICES
                .iter()
                .map(|(name, port)| ProbeTarget::tcp(*name, *port, Category::Api)),
        );
        targets.push(ProbeTarget::tcp(
            "Angular",
            BUILTIN_FRONTEND_PORT,
            Category::Frontend,
        ));
        Self::new(targets)
    }

    /// Derive the registry from a loaded project configuration.
    ///
    /// Order: engine, development database, production tunnel, then the
    /// configured services in file order.
    pub fn from_config(config: &ProjectConfig) -> Self {
        let mut targets = vec![ProbeTarget::engine(
            config.engine.name.clone(),
            config.engine.command.clone(),
        )];

        if let Some(db) = &config.database {
            targets.push(ProbeTarget::tcp(db.kind.clone(), db.dev_port, Category::Database));
        }

        targets.push(ProbeTarget::tcp(
            config.tunnel_name(),
            config.tunnel_port(),
            Category::Tunnel,
        ));

        for svc in &config.services {
            let category = match svc.kind {
                ServiceKind::Api => Category::Api,
                ServiceKind::Frontend => Category::Frontend,
                ServiceKind::Database => Category::Database,
            };
            let target = match &svc.health_path {
                Some(path) => ProbeTarget::http(svc.name.clone(), svc.port, path.clone(), category),
                None => ProbeTarget::tcp(svc.name.clone(), svc.port, category),
            };
            targets.push(target);
        }

        Self::new(targets)
    }

    pub fn targets(&self) -> &[Arc<ProbeTarget>] {
        &self.targets
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// The first container-engine target, if any.
    pub fn engine_target(&self) -> Option<&Arc<ProbeTarget>> {
        self.targets
            .iter()
            .find(|t| matches!(t.check, CheckKind::Engine { .. }))
    }
}
