//! # stackwatch
//!
//! A live terminal dashboard for a local multi-service development stack.
//!
//! Every few seconds the dashboard probes a registry of targets (the
//! container engine, a database, an SSH tunnel, API services and a
//! frontend) and redraws a sectioned status view in the alternate screen.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                          runner                              │
//! │  events ──▶ app (state machine) ──▶ ui ──▶ Terminal          │
//! │    ▲               │                                         │
//! │    │         StartRefresh                                    │
//! │    │               ▼                                         │
//! │    └── SnapshotReady ◀── data::build_snapshot ◀── registry   │
//! │                                  │                           │
//! │                                probe (TCP, HTTP, engine)     │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`registry`]**: the ordered list of probe targets, built in or from config
//! - **[`probe`]**: reachability checks behind the [`Prober`] trait
//! - **[`data`]**: concurrent snapshot builds and section partitioning
//! - **[`app`]**: dashboard state and the event-to-command state machine
//! - **[`events`]**: input thread, refresh ticker and interrupt listener
//! - **[`ui`]**: ratatui rendering plus a plain-text renderer
//! - **[`runner`]**: terminal ownership and the event loop
//!
//! ## Usage
//!
//! ```bash
//! # Live dashboard with the built-in registry
//! stackwatch
//!
//! # One-shot status from a project file, as JSON
//! stackwatch --config stackwatch.yaml status --json
//! ```
//!
//! ### Building a snapshot as a library
//!
//! ```no_run
//! use std::sync::Arc;
//! use stackwatch::{build_snapshot, LiveProber, Registry};
//!
//! # tokio_test::block_on(async {
//! let registry = Registry::builtin();
//! let prober = Arc::new(LiveProber::new().unwrap());
//! let snapshot = build_snapshot(&registry, prober).await;
//! println!("{}", stackwatch::ui::plain::render(&snapshot, false));
//! # });
//! ```

pub mod app;
pub mod config;
pub mod data;
pub mod error;
pub mod events;
pub mod probe;
pub mod registry;
pub mod runner;
pub mod ui;

pub use app::App;
pub use config::ProjectConfig;
pub use data::{build_snapshot, HealthSnapshot, ProbeResult, Status};
pub use error::DashboardError;
pub use probe::{LiveProber, Outcome, Prober};
pub use registry::{Category, ProbeTarget, Registry};
pub use runner::run_dashboard;
