//! Health data produced by refresh cycles.
//!
//! ## Submodules
//!
//! - [`snapshot`]: [`HealthSnapshot`] and the concurrent [`build_snapshot`] run
//! - [`section`]: partitioning of a snapshot into display sections
//!
//! ## Data Flow
//!
//! ```text
//! Registry (targets)
//!        │
//!        ▼
//! build_snapshot()  ── one task per target ──▶ Prober::probe()
//!        │
//!        ▼
//! HealthSnapshot (registry order)
//!        │
//!        └──▶ partition() ──▶ Vec<Section> (for rendering)
//! ```

pub mod section;
pub mod snapshot;

pub use section::{partition, Section, SectionKind};
pub use snapshot::{build_snapshot, HealthSnapshot, ProbeResult, Status};
