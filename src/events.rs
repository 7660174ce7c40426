//! Event sources feeding the dashboard loop.
//!
//! Everything the dashboard reacts to arrives as an [`AppEvent`] on one
//! unbounded channel, so the loop processes a single serialized queue:
//!
//! - terminal input, read on a dedicated thread ([`spawn_input_thread`])
//! - the refresh clock and spinner frames ([`spawn_ticker`])
//! - Ctrl+C delivered as a signal ([`spawn_interrupt_listener`])
//! - finished snapshots, sent by refresh tasks

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use crate::data::HealthSnapshot;

/// Interval between refresh ticks. Not configurable.
pub const REFRESH_INTERVAL: Duration = Duration::from_secs(3);

/// Spinner frame interval while a refresh is in flight.
pub const ANIMATE_INTERVAL: Duration = Duration::from_millis(120);

/// How long the input thread blocks before re-checking its stop flag.
const INPUT_POLL: Duration = Duration::from_millis(100);

/// Everything the dashboard loop reacts to.
#[derive(Debug)]
pub enum AppEvent {
    Tick,
    Animate,
    SnapshotReady(HealthSnapshot),
    Key(KeyEvent),
    Resize(u16, u16),
    /// Interrupt signal received outside raw-mode key handling.
    Interrupt,
}

/// Poll for events with a timeout
pub fn poll_event(timeout: Duration) -> Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Map a terminal event to a dashboard event. Mouse, focus and paste
/// events are not used by this view.
pub fn translate(event: Event) -> Option<AppEvent> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => Some(AppEvent::Key(key)),
        Event::Resize(width, height) => Some(AppEvent::Resize(width, height)),
        _ => None,
    }
}

/// `q`, `Esc` and `Ctrl+C` all quit.
pub fn is_quit_key(key: &KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

/// Stops the input thread when dropped or when [`InputThread::stop`] is called.
pub struct InputThread {
    stop: Arc<AtomicBool>,
    handle: Option<thread::JoinHandle<()>>,
}

impl InputThread {
    /// Signal the thread and wait for it to leave its poll loop.
    pub fn stop(mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for InputThread {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
    }
}

/// Read terminal input on a blocking thread and forward it to the loop.
pub fn spawn_input_thread(tx: UnboundedSender<AppEvent>) -> InputThread {
    let stop = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&stop);

    let handle = thread::spawn(move || {
        while !flag.load(Ordering::Relaxed) {
            match poll_event(INPUT_POLL) {
                Ok(Some(event)) => {
                    if let Some(event) = translate(event) {
                        if tx.send(event).is_err() {
                            break;
                        }
                    }
                }
                Ok(None) => {}
                Err(e) => {
                    warn!(error = %e, "terminal input failed");
                    break;
                }
            }
        }
        debug!("input thread stopped");
    });

    InputThread {
        stop,
        handle: Some(handle),
    }
}

/// Emit [`AppEvent::Tick`] every [`REFRESH_INTERVAL`] and
/// [`AppEvent::Animate`] every [`ANIMATE_INTERVAL`].
///
/// The clock runs independently of refresh completion. The first tick is
/// one full interval after start; the initial refresh is requested by the
/// app itself.
pub fn spawn_ticker(tx: UnboundedSender<AppEvent>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let start = tokio::time::Instant::now();
        let mut refresh = tokio::time::interval_at(start + REFRESH_INTERVAL, REFRESH_INTERVAL);
        refresh.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut animate = tokio::time::interval(ANIMATE_INTERVAL);
        animate.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            let event = tokio::select! {
                _ = refresh.tick() => AppEvent::Tick,
                _ = animate.tick() => AppEvent::Animate,
            };
            if tx.send(event).is_err() {
                break;
            }
        }
    })
}

/// Forward process-level Ctrl+C (e.g. when not in raw mode) to the loop.
pub fn spawn_interrupt_listener(tx: UnboundedSender<AppEvent>) -> JoinHandle<()> {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = tx.send(AppEvent::Interrupt);
        }
    })
}
