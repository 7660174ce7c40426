//! Theme configuration for the TUI.
//!
//! Supports light and dark themes with automatic terminal detection.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::block::BorderType;

use crate::data::Status;

/// Color and style theme for the TUI.
///
/// Use [`Theme::auto_detect()`] for automatic theme selection based on
/// terminal background, or [`Theme::dark()`]/[`Theme::light()`] explicitly.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Accent color for the title and section headers.
    pub accent: Color,
    /// Glyph color for running targets.
    pub running: Color,
    /// Glyph color for targets that are down.
    pub down: Color,
    /// Color for borders and separators.
    pub border: Color,
    /// Style for the title bar.
    pub title: Style,
    /// Style for section headers.
    pub section: Style,
    /// Style for secondary text (latency, footer).
    pub muted: Style,
    /// Border style (rounded, plain, etc.).
    pub border_type: BorderType,
}

impl Theme {
    /// Create a dark theme suitable for dark terminal backgrounds.
    pub fn dark() -> Self {
        Self {
            accent: Color::Magenta,
            running: Color::Green,
            down: Color::Red,
            border: Color::Magenta,
            title: Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
            section: Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
            muted: Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC),
            border_type: BorderType::Rounded,
        }
    }

    /// Create a light theme suitable for light terminal backgrounds.
    pub fn light() -> Self {
        Self {
            accent: Color::Blue,
            running: Color::Green,
            down: Color::Red,
            border: Color::Blue,
            title: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            section: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            muted: Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
            border_type: BorderType::Rounded,
        }
    }

    /// Auto-detect based on terminal background
    pub fn auto_detect() -> Self {
        match terminal_light::luma() {
            Ok(luma) if luma > 0.5 => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Glyph style for a status
    pub fn status_style(&self, status: Status) -> Style {
        match status {
            Status::Running => Style::default().fg(self.running).add_modifier(Modifier::BOLD),
            Status::Down => Style::default().fg(self.down).add_modifier(Modifier::BOLD),
        }
    }
}
