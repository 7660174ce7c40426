//! Plain-text rendering for the one-shot `status` command.

use std::fmt::Write;

use crossterm::style::Stylize;

use crate::data::{partition, HealthSnapshot, Status};
use crate::ui::dashboard::{latency_label, port_label, section_title, NAME_WIDTH, STATUS_GLYPH};

/// Render a snapshot as sectioned text, optionally with ANSI colors.
pub fn render(snapshot: &HealthSnapshot, color: bool) -> String {
    let mut out = String::new();

    for (i, section) in partition(snapshot).iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let title = section_title(&section.header());
        if color {
            let _ = writeln!(out, "{}", title.as_str().magenta().bold());
        } else {
            let _ = writeln!(out, "{}", title);
        }

        for result in &section.entries {
            let glyph = match (color, result.status()) {
                (false, _) => STATUS_GLYPH.to_string(),
                (true, Status::Running) => STATUS_GLYPH.green().bold().to_string(),
                (true, Status::Down) => STATUS_GLYPH.red().bold().to_string(),
            };

            let mut line = format!(
                "  {} {:<width$}",
                glyph,
                result.target.name,
                width = NAME_WIDTH
            );
            if let Some(port) = port_label(&result.target) {
                let _ = write!(line, " {:<7}", port);
            }
            if let Some(latency) = latency_label(result) {
                let _ = write!(line, " {}", latency);
            }
            let _ = writeln!(out, "{}", line.trim_end());
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::ProbeResult;
    use crate::probe::Outcome;
    use crate::registry::{Category, ProbeTarget};
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    fn normalize(line: &str) -> String {
        line.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn test_render_plain_sections() {
        let snapshot = HealthSnapshot::new(
            vec![
                ProbeResult::new(
                    Arc::new(ProbeTarget::engine("Docker Desktop", "docker")),
                    Outcome::down(),
                ),
                ProbeResult::new(
                    Arc::new(ProbeTarget::tcp("DB", 27018, Category::Database)),
                    Outcome::up(Duration::from_micros(1200)),
                ),
            ],
            Instant::now(),
            0,
        );

        let text = render(&snapshot, false);
        let lines: Vec<String> = text.lines().map(normalize).collect();
        assert_eq!(
            lines,
            vec![
                "━━━ Infrastructure ━━━",
                "● Docker Desktop",
                "",
                "━━━ Database ━━━",
                "● DB :27018 [1.2ms]",
            ]
        );
    }

    #[test]
    fn test_render_plain_empty() {
        assert!(render(&HealthSnapshot::empty(), false).is_empty());
    }

    #[test]
    fn test_render_colored_contains_ansi() {
        let snapshot = HealthSnapshot::new(
            vec![ProbeResult::new(
                Arc::new(ProbeTarget::tcp("svc1", 8081, Category::Api)),
                Outcome::down(),
            )],
            Instant::now(),
            0,
        );
        assert!(render(&snapshot, true).contains("\u{1b}["));
    }
}
