//! Single-attempt liveness checks.
//!
//! Every check is bounded by a fixed timeout and never retries. Failures
//! are ordinary results (`open == false`), never errors.
//!
//! - [`check_port`]: TCP connect to `localhost:<port>`
//! - [`check_http`]: HTTP GET, available only on 2xx
//! - [`engine`]: container engine presence via its CLI
//!
//! The [`Prober`] trait is the seam the snapshot builder probes through;
//! [`LiveProber`] is the real implementation.

pub mod engine;

use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::Serialize;
use tokio::net::TcpStream;
use tracing::trace;

use crate::registry::{CheckKind, ProbeTarget};

/// Connect timeout for TCP port checks.
pub const PORT_TIMEOUT: Duration = Duration::from_secs(2);

/// Request timeout for HTTP checks.
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(3);

/// Result of a TCP port check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PortStatus {
    pub port: u16,
    pub open: bool,
    /// Time to establish the connection. Zero when closed.
    pub latency: Duration,
}

/// Result of an HTTP check.
#[derive(Debug, Clone, Serialize)]
pub struct HttpStatus {
    pub url: String,
    pub available: bool,
    pub latency: Duration,
    /// Transport error, if the request never produced a response.
    pub error: Option<String>,
}

/// Check whether `localhost:<port>` accepts TCP connections.
pub async fn check_port(port: u16) -> PortStatus {
    check_port_with("localhost", port, PORT_TIMEOUT).await
}

/// Check a TCP port on an arbitrary host with an explicit timeout.
///
/// The connection is dropped as soon as it is established.
pub async fn check_port_with(host: &str, port: u16, timeout: Duration) -> PortStatus {
    let start = Instant::now();
    match tokio::time::timeout(timeout, TcpStream::connect((host, port))).await {
        Ok(Ok(stream)) => {
            let latency = start.elapsed();
            drop(stream);
            PortStatus {
                port,
                open: true,
                latency,
            }
        }
        Ok(Err(e)) => {
            trace!(port, error = %e, "port closed");
            PortStatus {
                port,
                open: false,
                latency: Duration::ZERO,
            }
        }
        Err(_) => {
            trace!(port, "port check timed out");
            PortStatus {
                port,
                open: false,
                latency: Duration::ZERO,
            }
        }
    }
}

/// Build the HTTP client used for health checks.
pub fn http_client() -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder().timeout(HTTP_TIMEOUT).build()
}

/// Perform a single GET against `url`, bounded by [`HTTP_TIMEOUT`].
///
/// Latency covers the request up to the full response body.
pub async fn check_http(client: &reqwest::Client, url: &str) -> HttpStatus {
    check_http_with(client, url, HTTP_TIMEOUT).await
}

/// Like [`check_http`] with an explicit bound, applied regardless of the
/// client's own timeout.
pub async fn check_http_with(
    client: &reqwest::Client,
    url: &str,
    timeout: Duration,
) -> HttpStatus {
    let start = Instant::now();

    let request = async {
        let response = client.get(url).send().await?;
        let status = response.status();
        response.bytes().await?;
        Ok::<_, reqwest::Error>(status)
    };

    let result = match tokio::time::timeout(timeout, request).await {
        Ok(Ok(status)) => Ok(status),
        Ok(Err(e)) => Err(e.to_string()),
        Err(_) => Err(format!("request timed out after {}ms", timeout.as_millis())),
    };

    match result {
        Ok(status) => HttpStatus {
            url: url.to_string(),
            available: status.is_success(),
            latency: start.elapsed(),
            error: None,
        },
        Err(e) => HttpStatus {
            url: url.to_string(),
            available: false,
            latency: Duration::ZERO,
            error: Some(e),
        },
    }
}

/// Format a latency for display in milliseconds with one decimal.
///
/// A zero duration means the check never succeeded and renders as `"timeout"`.
pub fn format_latency(d: Duration) -> String {
    if d.is_zero() {
        return "timeout".to_string();
    }
    let ms = d.as_micros() as f64 / 1000.0;
    format!("{:.1}ms", ms)
}

/// Outcome of probing one target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    pub reachable: bool,
    /// Meaningful only when reachable.
    pub latency: Duration,
}

impl Outcome {
    pub fn up(latency: Duration) -> Self {
        Self {
            reachable: true,
            latency,
        }
    }

    pub fn down() -> Self {
        Self {
            reachable: false,
            latency: Duration::ZERO,
        }
    }
}

/// Checks one target. Implementations must not share mutable state
/// between calls; the snapshot builder calls them concurrently.
#[async_trait]
pub trait Prober: Send + Sync {
    async fn probe(&self, target: &ProbeTarget) -> Outcome;
}

/// Probes real endpoints on the local machine.
#[derive(Debug, Clone)]
pub struct LiveProber {
    client: reqwest::Client,
}

impl LiveProber {
    /// Fails only if the HTTP client cannot be built (e.g. no TLS backend).
    pub fn new() -> reqwest::Result<Self> {
        Ok(Self {
            client: http_client()?,
        })
    }
}

#[async_trait]
impl Prober for LiveProber {
    async fn probe(&self, target: &ProbeTarget) -> Outcome {
        match &target.check {
            CheckKind::Engine { command } => {
                let status = engine::check_engine(command).await;
                if status.running {
                    Outcome::up(status.latency)
                } else {
                    Outcome::down()
                }
            }
            CheckKind::Tcp => {
                let status = check_port(target.port).await;
                if status.open {
                    Outcome::up(status.latency)
                } else {
                    Outcome::down()
                }
            }
            CheckKind::Http { path } => {
                let url = format!("http://localhost:{}{}", target.port, path);
                let status = check_http(&self.client, &url).await;
                if status.available {
                    Outcome::up(status.latency)
                } else {
                    Outcome::down()
                }
            }
        }
    }
}
