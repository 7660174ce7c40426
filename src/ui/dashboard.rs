//! Section list rendering.
//!
//! Each non-empty section is a header followed by one line per entry:
//!
//! ```text
//! ━━━ Database ━━━
//!   ● MongoDB                   :27018   [1.2ms]
//! ```

use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::data::{partition, HealthSnapshot, ProbeResult};
use crate::probe::format_latency;
use crate::registry::ProbeTarget;
use crate::ui::Theme;

/// Status glyph, colored by status.
pub const STATUS_GLYPH: &str = "●";

/// Width the service name is padded to.
pub const NAME_WIDTH: usize = 25;

/// `:port`, or `None` for presence-only targets.
pub fn port_label(target: &ProbeTarget) -> Option<String> {
    target.has_port().then(|| format!(":{}", target.port))
}

/// `[latency]` for reachable results only.
pub fn latency_label(result: &ProbeResult) -> Option<String> {
    result
        .reachable
        .then(|| format!("[{}]", format_latency(result.latency)))
}

pub fn section_title(header: &str) -> String {
    format!("━━━ {} ━━━", header)
}

/// One entry line: glyph, padded name, port, latency.
pub fn entry_line(result: &ProbeResult, theme: &Theme) -> Line<'static> {
    let mut spans = vec![
        Span::raw("  "),
        Span::styled(STATUS_GLYPH, theme.status_style(result.status())),
        Span::raw(" "),
        Span::raw(format!("{:<width$}", result.target.name, width = NAME_WIDTH)),
    ];

    if let Some(port) = port_label(&result.target) {
        spans.push(Span::raw(format!(" {:<7}", port)));
    }

    if let Some(latency) = latency_label(result) {
        spans.push(Span::raw(" "));
        spans.push(Span::styled(latency, theme.muted));
    }

    Line::from(spans)
}

/// Rows taken by the block borders around the section list.
pub const BORDER_ROWS: u16 = 2;

/// All section lines for a snapshot. Empty sections produce nothing.
///
/// With `spaced` a blank line separates consecutive sections.
pub fn section_lines(
    snapshot: &HealthSnapshot,
    theme: &Theme,
    spaced: bool,
) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    for (i, section) in partition(snapshot).iter().enumerate() {
        if spaced && i > 0 {
            lines.push(Line::from(""));
        }
        lines.push(Line::from(Span::styled(
            section_title(&section.header()),
            theme.section,
        )));
        lines.extend(section.entries.iter().map(|r| entry_line(r, theme)));
    }

    lines
}

/// Rows the section list needs at minimum, borders included.
///
/// Counts the compact layout: every header and entry, no blank separators.
pub fn required_rows(app: &App) -> u16 {
    let body = match app.snapshot {
        Some(ref snapshot) if !snapshot.is_empty() => {
            let sections = partition(snapshot).len();
            sections + snapshot.len()
        }
        _ => 1,
    };
    u16::try_from(body).unwrap_or(u16::MAX).saturating_add(BORDER_ROWS)
}

/// Body lines for the available height. Section separators are dropped
/// when the spaced layout would not fit.
fn body_lines(app: &App, rows: u16) -> Vec<Line<'static>> {
    match app.snapshot {
        Some(ref snapshot) if !snapshot.is_empty() => {
            let spaced = section_lines(snapshot, &app.theme, true);
            if spaced.len() <= usize::from(rows) {
                spaced
            } else {
                section_lines(snapshot, &app.theme, false)
            }
        }
        Some(_) => vec![Line::from(Span::styled(
            "  No services configured",
            app.theme.muted,
        ))],
        None => vec![Line::from(Span::styled(
            "  Checking services...",
            app.theme.muted,
        ))],
    }
}

/// Render the section list for the current snapshot.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" Development Stack - Live Monitor ")
        .title_style(app.theme.title)
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    let lines = body_lines(app, area.height.saturating_sub(BORDER_ROWS));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::Outcome;
    use crate::registry::Category;
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    fn result(target: ProbeTarget, outcome: Outcome) -> ProbeResult {
        ProbeResult::new(Arc::new(target), outcome)
    }

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_port_suffix_only_for_ported_targets() {
        let theme = Theme::dark();
        let engine = result(ProbeTarget::engine("Docker Desktop", "docker"), Outcome::down());
        let svc = result(ProbeTarget::tcp("svc1", 8081, Category::Api), Outcome::down());

        assert!(!text(&entry_line(&engine, &theme)).contains(':'));
        assert!(text(&entry_line(&svc, &theme)).contains(":8081"));
    }

    #[test]
    fn test_latency_only_when_reachable() {
        let theme = Theme::dark();
        let up = result(
            ProbeTarget::tcp("DB", 27018, Category::Database),
            Outcome::up(Duration::from_micros(1200)),
        );
        let down = result(ProbeTarget::tcp("svc1", 8081, Category::Api), Outcome::down());

        assert!(text(&entry_line(&up, &theme)).ends_with("[1.2ms]"));
        assert!(!text(&entry_line(&down, &theme)).contains('['));
    }

    #[test]
    fn test_glyph_colors() {
        let theme = Theme::dark();
        let up = result(
            ProbeTarget::tcp("a", 1, Category::Api),
            Outcome::up(Duration::from_millis(1)),
        );
        let down = result(ProbeTarget::tcp("b", 2, Category::Api), Outcome::down());

        assert_eq!(entry_line(&up, &theme).spans[1].style.fg, Some(theme.running));
        assert_eq!(entry_line(&down, &theme).spans[1].style.fg, Some(theme.down));
    }

    #[test]
    fn test_section_lines_headers_and_spacing() {
        let theme = Theme::dark();
        let snapshot = HealthSnapshot::new(
            vec![
                result(ProbeTarget::tcp("DB", 27018, Category::Database), Outcome::down()),
                result(ProbeTarget::tcp("svc1", 8081, Category::Api), Outcome::down()),
            ],
            Instant::now(),
            0,
        );

        let lines: Vec<String> = section_lines(&snapshot, &theme, true)
            .iter()
            .map(text)
            .collect();
        assert_eq!(lines[0], "━━━ Database ━━━");
        assert!(lines[1].contains("DB"));
        assert_eq!(lines[2], "");
        assert_eq!(lines[3], "━━━ Application Services (1) ━━━");
        assert!(lines[4].contains("svc1"));
        assert_eq!(lines.len(), 5);
        assert!(!lines.iter().any(|l| l.contains("Frontend") || l.contains("Tunnel")));

        let compact: Vec<String> = section_lines(&snapshot, &theme, false)
            .iter()
            .map(text)
            .collect();
        assert_eq!(compact.len(), 4);
        assert!(!compact.iter().any(|l| l.is_empty()));
    }

    #[test]
    fn test_required_rows_counts_headers_and_entries() {
        let mut app = App::new(Theme::dark());
        assert_eq!(required_rows(&app), 1 + BORDER_ROWS);

        app.snapshot = Some(HealthSnapshot::new(
            vec![
                result(ProbeTarget::tcp("DB", 27018, Category::Database), Outcome::down()),
                result(ProbeTarget::tcp("svc1", 8081, Category::Api), Outcome::down()),
                result(ProbeTarget::tcp("svc2", 8082, Category::Api), Outcome::down()),
            ],
            Instant::now(),
            0,
        ));
        // Two headers plus three entries.
        assert_eq!(required_rows(&app), 5 + BORDER_ROWS);
    }
}
