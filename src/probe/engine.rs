//! Container engine presence check.
//!
//! The engine has no port to connect to; it is considered running when
//! `<command> info` exits successfully within [`ENGINE_TIMEOUT`].

use std::process::Stdio;
use std::time::{Duration, Instant};

use tokio::process::Command;
use tracing::debug;

/// Upper bound for the engine CLI to answer.
pub const ENGINE_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineStatus {
    pub running: bool,
    pub latency: Duration,
}

/// Ask the engine CLI whether the daemon is responding.
pub async fn check_engine(command: &str) -> EngineStatus {
    check_engine_with(command, &["info"], ENGINE_TIMEOUT).await
}

/// Run `command args...` and report success within `timeout`.
///
/// Output is discarded. The child is killed if the timeout fires.
pub async fn check_engine_with(command: &str, args: &[&str], timeout: Duration) -> EngineStatus {
    let start = Instant::now();

    let child = Command::new(command)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .spawn();

    let mut child = match child {
        Ok(child) => child,
        Err(e) => {
            debug!(command, error = %e, "engine command could not be started");
            return EngineStatus {
                running: false,
                latency: Duration::ZERO,
            };
        }
    };

    match tokio::time::timeout(timeout, child.wait()).await {
        Ok(Ok(status)) if status.success() => EngineStatus {
            running: true,
            latency: start.elapsed(),
        },
        Ok(Ok(status)) => {
            debug!(command, ?status, "engine not responding");
            EngineStatus {
                running: false,
                latency: Duration::ZERO,
            }
        }
        Ok(Err(e)) => {
            debug!(command, error = %e, "engine command failed");
            EngineStatus {
                running: false,
                latency: Duration::ZERO,
            }
        }
        Err(_) => {
            debug!(command, "engine check timed out");
            EngineStatus {
                running: false,
                latency: Duration::ZERO,
            }
        }
    }
}
