//! Fatal dashboard conditions.
//!
//! Probe failures are never errors; they are rendered as "down". Only the
//! conditions below stop the dashboard.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DashboardError {
    /// Stdout is not attached to an interactive terminal.
    #[error("no interactive terminal available")]
    NoTerminal,

    /// The container engine did not respond before the dashboard started.
    #[error("{0} is not running")]
    EngineUnavailable(String),

    /// The terminal driver failed (raw mode, alternate screen, drawing).
    #[error("terminal error: {0}")]
    Terminal(#[from] std::io::Error),
}
