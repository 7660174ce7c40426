//! The dashboard event loop and terminal ownership.
//!
//! [`run_dashboard`] checks the launch preconditions, takes over the
//! terminal, wires up the event sources and hands control to [`run_loop`].
//! The terminal is restored on every exit path.

use std::io::{self, IsTerminal, Stdout};
use std::panic::{self, PanicHookInfo};
use std::sync::Arc;
use std::thread;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::app::{App, Command};
use crate::data::build_snapshot;
use crate::error::DashboardError;
use crate::events::{self, AppEvent};
use crate::probe::Prober;
use crate::registry::Registry;
use crate::ui::{self, Theme};

/// Starts background snapshot builds that report back through the event channel.
#[derive(Clone)]
pub struct Refresher {
    registry: Arc<Registry>,
    prober: Arc<dyn Prober>,
}

impl Refresher {
    pub fn new(registry: Arc<Registry>, prober: Arc<dyn Prober>) -> Self {
        Self { registry, prober }
    }

    /// Spawn one snapshot build. The task is never cancelled; if the loop
    /// has already exited the result is simply dropped.
    pub fn spawn(&self, tx: UnboundedSender<AppEvent>) -> JoinHandle<()> {
        let registry = Arc::clone(&self.registry);
        let prober = Arc::clone(&self.prober);
        tokio::spawn(async move {
            let snapshot = build_snapshot(&registry, prober).await;
            let _ = tx.send(AppEvent::SnapshotReady(snapshot));
        })
    }
}

/// Process the event queue until the app exits or every sender is gone.
pub async fn run_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    events: &mut UnboundedReceiver<AppEvent>,
    tx: UnboundedSender<AppEvent>,
    refresher: &Refresher,
) -> Result<(), DashboardError> {
    let size = terminal.size()?;
    app.resize(size.width, size.height);

    let mut command = app.start();

    loop {
        match command {
            Command::StartRefresh => {
                debug!("refresh started");
                refresher.spawn(tx.clone());
                terminal.draw(|frame| ui::draw(frame, app))?;
            }
            Command::Redraw => {
                terminal.draw(|frame| ui::draw(frame, app))?;
            }
            Command::Exit => break,
            Command::None => {}
        }

        let Some(event) = events.recv().await else {
            break;
        };
        command = app.handle(event);
    }

    Ok(())
}

/// Fail fast when the container engine is down before the dashboard starts.
pub async fn preflight(registry: &Registry, prober: &dyn Prober) -> Result<(), DashboardError> {
    if let Some(engine) = registry.engine_target() {
        let outcome = prober.probe(engine).await;
        if !outcome.reachable {
            return Err(DashboardError::EngineUnavailable(engine.name.clone()));
        }
    }
    Ok(())
}

type PanicHook = Box<dyn Fn(&PanicHookInfo<'_>) + Sync + Send + 'static>;

/// Chain a panic hook that runs `restore` for panics on the calling thread.
///
/// Panics on other threads (probe tasks on runtime workers) are caught as
/// join errors and must leave the screen alone. Returns the previous hook
/// for [`restore_panic_hook`].
fn install_panic_hook<F>(restore: F) -> Arc<PanicHook>
where
    F: Fn() + Send + Sync + 'static,
{
    let ui_thread = thread::current().id();
    let previous: Arc<PanicHook> = Arc::new(panic::take_hook());
    let chained = Arc::clone(&previous);

    panic::set_hook(Box::new(move |info| {
        if thread::current().id() == ui_thread {
            restore();
        }
        chained(info);
    }));

    previous
}

/// Put back the hook that was active before [`install_panic_hook`].
fn restore_panic_hook(previous: Arc<PanicHook>) {
    drop(panic::take_hook());
    panic::set_hook(Box::new(move |info| previous(info)));
}

/// Run the live dashboard until the user quits.
pub async fn run_dashboard(
    registry: Registry,
    prober: Arc<dyn Prober>,
) -> Result<(), DashboardError> {
    if !io::stdout().is_terminal() {
        return Err(DashboardError::NoTerminal);
    }

    preflight(&registry, prober.as_ref()).await?;

    let theme = Theme::auto_detect();
    let mut terminal = setup_terminal()?;

    // Restore the terminal if the loop panics while the screen is taken over.
    let previous_hook = install_panic_hook(|| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    });

    info!(targets = registry.len(), "dashboard started");

    let (tx, mut rx) = mpsc::unbounded_channel();
    let input = events::spawn_input_thread(tx.clone());
    let ticker = events::spawn_ticker(tx.clone());
    let interrupt = events::spawn_interrupt_listener(tx.clone());

    let refresher = Refresher::new(Arc::new(registry), prober);
    let mut app = App::new(theme);
    let result = run_loop(&mut terminal, &mut app, &mut rx, tx, &refresher).await;

    ticker.abort();
    interrupt.abort();
    input.stop();

    let restored = restore_terminal(&mut terminal);
    restore_panic_hook(previous_hook);
    info!("dashboard stopped");

    result.and(restored)
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>, DashboardError> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    if let Err(e) = execute!(stdout, EnterAlternateScreen) {
        let _ = disable_raw_mode();
        return Err(e.into());
    }
    let backend = CrosstermBackend::new(stdout);
    Ok(Terminal::new(backend)?)
}

fn restore_terminal(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
) -> Result<(), DashboardError> {
    let raw = disable_raw_mode();
    let screen = execute!(terminal.backend_mut(), LeaveAlternateScreen);
    let cursor = terminal.show_cursor();
    raw?;
    screen?;
    cursor?;
    Ok(())
}
