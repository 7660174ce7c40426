//! Common UI components: header bar, status bar and the size guard.

use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::App;
use crate::data::Status;
use crate::events::REFRESH_INTERVAL;

const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Current spinner frame for a phase counter.
pub fn spinner_frame(phase: usize) -> &'static str {
    SPINNER_FRAMES[phase % SPINNER_FRAMES.len()]
}

/// Render the header bar with the overall stack status.
///
/// Displays: status indicator, running/down counts, total targets.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let Some(ref snapshot) = app.snapshot else {
        let line = Line::from(vec![
            Span::styled(" STACKWATCH ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("| Loading..."),
        ]);
        frame.render_widget(Paragraph::new(line), area);
        return;
    };

    let (running, down) = snapshot.counts();
    let overall = if down > 0 { Status::Down } else { Status::Running };

    let line = Line::from(vec![
        Span::styled(" ● ", app.theme.status_style(overall)),
        Span::styled("STACKWATCH ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("│ "),
        Span::styled(format!("{}", running), Style::default().fg(app.theme.running)),
        Span::raw(" running "),
        if down > 0 {
            Span::styled(
                format!("{}", down),
                Style::default().fg(app.theme.down).add_modifier(Modifier::BOLD),
            )
        } else {
            Span::styled("0", Style::default().add_modifier(Modifier::DIM))
        },
        Span::raw(" down │ "),
        Span::styled(
            format!("{}", snapshot.len()),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(" targets"),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

/// Render the status bar at the bottom.
///
/// Shows: time since the last snapshot, refresh spinner, controls.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let updated = match app.snapshot {
        Some(ref snapshot) => format!(
            "Updated {:.1}s ago",
            snapshot.started_at.elapsed().as_secs_f64()
        ),
        None => "Waiting for first check".to_string(),
    };

    let activity = if app.refreshing {
        format!(" {} checking", spinner_frame(app.spinner_phase))
    } else {
        String::new()
    };

    let status = format!(
        " {}{} | Press q, Esc or Ctrl+C to exit • Updates every {} seconds",
        updated,
        activity,
        REFRESH_INTERVAL.as_secs(),
    );

    frame.render_widget(Paragraph::new(status).style(app.theme.muted), area);
}

/// Shown instead of the dashboard when the terminal is below the minimum size.
pub fn render_too_small(frame: &mut Frame, app: &App, area: Rect, min: (u16, u16)) {
    let msg = format!(
        "Terminal too small: {}x{}\nMinimum: {}x{}\n\nResize to continue",
        area.width, area.height, min.0, min.1
    );
    let paragraph = Paragraph::new(msg)
        .alignment(Alignment::Center)
        .style(Style::default().fg(app.theme.accent));
    let height = 5u16.min(area.height);
    let centered = Rect::new(
        area.x,
        area.y + area.height.saturating_sub(height) / 2,
        area.width,
        height,
    );
    frame.render_widget(paragraph, centered);
}
