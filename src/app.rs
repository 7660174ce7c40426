//! Dashboard state and the event dispatcher.
//!
//! [`App`] is owned by the event loop and only ever mutated through
//! [`App::start`] and [`App::handle`]. Probe results reach it exclusively
//! as finished [`HealthSnapshot`] values carried by
//! [`AppEvent::SnapshotReady`].

use std::time::Instant;

use crate::data::HealthSnapshot;
use crate::events::{is_quit_key, AppEvent};
use crate::ui::Theme;

/// Lifecycle of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Initializing,
    Running,
    Exiting,
}

/// What the event loop must do after an event was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Nothing changed on screen.
    None,
    Redraw,
    /// Spawn a snapshot build, then redraw.
    StartRefresh,
    Exit,
}

/// Main application state.
pub struct App {
    pub phase: Phase,
    /// Latest completed snapshot; `None` until the first cycle finishes.
    pub snapshot: Option<HealthSnapshot>,
    /// Set while a snapshot build is in flight.
    pub refreshing: bool,
    pub width: u16,
    pub height: u16,
    /// Spinner animation frame.
    pub spinner_phase: usize,
    /// Ticks that arrived while a refresh was still running.
    pub skipped_ticks: u64,
    pub last_refresh_started: Option<Instant>,
    pub theme: Theme,
}

impl App {
    pub fn new(theme: Theme) -> Self {
        Self {
            phase: Phase::Initializing,
            snapshot: None,
            refreshing: false,
            width: 0,
            height: 0,
            spinner_phase: 0,
            skipped_ticks: 0,
            last_refresh_started: None,
            theme,
        }
    }

    /// Enter `Running` and request the first snapshot without waiting for a tick.
    pub fn start(&mut self) -> Command {
        if self.phase != Phase::Initializing {
            return Command::None;
        }
        self.phase = Phase::Running;
        self.begin_refresh()
    }

    /// Single dispatcher for every event the loop receives.
    pub fn handle(&mut self, event: AppEvent) -> Command {
        if self.phase == Phase::Exiting {
            return Command::Exit;
        }

        match event {
            AppEvent::Tick => {
                if self.refreshing {
                    self.skipped_ticks += 1;
                    Command::None
                } else {
                    self.begin_refresh()
                }
            }
            AppEvent::Animate => {
                if self.refreshing {
                    self.spinner_phase = self.spinner_phase.wrapping_add(1);
                    Command::Redraw
                } else {
                    Command::None
                }
            }
            AppEvent::SnapshotReady(snapshot) => {
                self.snapshot = Some(snapshot);
                self.refreshing = false;
                Command::Redraw
            }
            AppEvent::Key(key) => {
                if is_quit_key(&key) {
                    self.quit()
                } else {
                    Command::None
                }
            }
            AppEvent::Resize(width, height) => {
                self.resize(width, height);
                Command::Redraw
            }
            AppEvent::Interrupt => self.quit(),
        }
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
    }

    pub fn is_exiting(&self) -> bool {
        self.phase == Phase::Exiting
    }

    fn begin_refresh(&mut self) -> Command {
        self.refreshing = true;
        self.last_refresh_started = Some(Instant::now());
        Command::StartRefresh
    }

    fn quit(&mut self) -> Command {
        self.phase = Phase::Exiting;
        Command::Exit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn app() -> App {
        App::new(Theme::dark())
    }

    fn key(code: KeyCode) -> AppEvent {
        AppEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn test_start_requests_immediate_refresh() {
        let mut app = app();
        assert_eq!(app.phase, Phase::Initializing);

        assert_eq!(app.start(), Command::StartRefresh);
        assert_eq!(app.phase, Phase::Running);
        assert!(app.refreshing);
        assert!(app.snapshot.is_none());

        // Starting twice does not launch a second sweep.
        assert_eq!(app.start(), Command::None);
    }

    #[test]
    fn test_tick_while_refreshing_does_not_start_second_sweep() {
        let mut app = app();
        app.start();

        assert_eq!(app.handle(AppEvent::Tick), Command::None);
        assert_eq!(app.handle(AppEvent::Tick), Command::None);
        assert_eq!(app.skipped_ticks, 2);
        assert!(app.refreshing);

        assert_eq!(
            app.handle(AppEvent::SnapshotReady(HealthSnapshot::empty())),
            Command::Redraw
        );
        assert!(!app.refreshing);

        // The next tick after completion starts a new sweep.
        assert_eq!(app.handle(AppEvent::Tick), Command::StartRefresh);
    }

    #[test]
    fn test_snapshot_replaces_previous() {
        use crate::data::ProbeResult;
        use crate::probe::Outcome;
        use crate::registry::{Category, ProbeTarget};
        use std::sync::Arc;

        let mut app = app();
        app.start();

        let first = HealthSnapshot::new(
            vec![ProbeResult::new(
                Arc::new(ProbeTarget::tcp("old", 1, Category::Api)),
                Outcome::down(),
            )],
            Instant::now(),
            1,
        );
        app.handle(AppEvent::SnapshotReady(first));
        app.handle(AppEvent::SnapshotReady(HealthSnapshot::empty()));

        assert!(app.snapshot.as_ref().unwrap().is_empty());
    }

    #[test]
    fn test_quit_keys() {
        for event in [
            key(KeyCode::Char('q')),
            key(KeyCode::Esc),
            AppEvent::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            AppEvent::Interrupt,
        ] {
            let mut app = app();
            app.start();
            assert_eq!(app.handle(event), Command::Exit);
            assert!(app.is_exiting());
        }
    }

    #[test]
    fn test_other_keys_ignored() {
        let mut app = app();
        app.start();
        assert_eq!(app.handle(key(KeyCode::Char('r'))), Command::None);
        assert_eq!(app.handle(key(KeyCode::Char('c'))), Command::None);
        assert_eq!(app.phase, Phase::Running);
    }

    #[test]
    fn test_quit_before_first_snapshot() {
        let mut app = app();
        app.start();

        assert_eq!(app.handle(key(KeyCode::Char('q'))), Command::Exit);

        // A late snapshot and further ticks change nothing.
        assert_eq!(
            app.handle(AppEvent::SnapshotReady(HealthSnapshot::empty())),
            Command::Exit
        );
        assert_eq!(app.handle(AppEvent::Tick), Command::Exit);
        assert!(app.snapshot.is_none());
    }

    #[test]
    fn test_resize_keeps_snapshot() {
        let mut app = app();
        app.start();
        app.handle(AppEvent::SnapshotReady(HealthSnapshot::empty()));

        assert_eq!(app.handle(AppEvent::Resize(120, 40)), Command::Redraw);
        assert_eq!((app.width, app.height), (120, 40));
        assert!(app.snapshot.is_some());
        assert!(!app.refreshing);
    }

    #[test]
    fn test_animate_only_while_refreshing() {
        let mut app = app();
        app.start();

        assert_eq!(app.handle(AppEvent::Animate), Command::Redraw);
        assert_eq!(app.spinner_phase, 1);

        app.handle(AppEvent::SnapshotReady(HealthSnapshot::empty()));
        assert_eq!(app.handle(AppEvent::Animate), Command::None);
        assert_eq!(app.spinner_phase, 1);
    }
}
