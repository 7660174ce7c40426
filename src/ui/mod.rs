//! Terminal UI rendering using ratatui.
//!
//! ## Submodules
//!
//! - [`dashboard`]: section list with status glyphs, ports and latency
//! - [`common`]: header bar, status bar and the minimum-size guard
//! - [`plain`]: the same sections as text, for the one-shot status command
//! - [`theme`]: light/dark theme support with terminal auto-detection
//!
//! ## Layout
//!
//! ```text
//! ┌──────────────────────────────────────┐
//! │ Header (common::render_header)       │
//! ├──────────────────────────────────────┤
//! │                                      │
//! │ Sections (dashboard::render)         │
//! │                                      │
//! ├──────────────────────────────────────┤
//! │ Status Bar (common::render_status)   │
//! └──────────────────────────────────────┘
//! ```

pub mod common;
pub mod dashboard;
pub mod plain;
pub mod theme;

pub use theme::Theme;

use ratatui::{
    layout::{Constraint, Layout},
    Frame,
};

use crate::app::App;

/// Minimum terminal size for a usable display.
pub const MIN_WIDTH: u16 = 40;
pub const MIN_HEIGHT: u16 = 10;

/// Header and status bar rows around the section list.
const CHROME_ROWS: u16 = 2;

/// Height needed to show every entry of the current snapshot.
pub fn min_height(app: &App) -> u16 {
    MIN_HEIGHT.max(dashboard::required_rows(app).saturating_add(CHROME_ROWS))
}

/// Draw one full frame.
///
/// Below the minimum size a resize hint replaces the dashboard, so entries
/// are never silently clipped.
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let needed = min_height(app);

    if area.width < MIN_WIDTH || area.height < needed {
        common::render_too_small(frame, app, area, (MIN_WIDTH, needed));
        return;
    }

    let chunks = Layout::vertical([
        Constraint::Length(1), // Header bar
        Constraint::Min(6),    // Sections
        Constraint::Length(1), // Status bar
    ])
    .split(area);

    common::render_header(frame, app, chunks[0]);
    dashboard::render(frame, app, chunks[1]);
    common::render_status_bar(frame, app, chunks[2]);
}
