//! Terminal dashboard for exploring agent traces, span graphs, and
//! analytics served by a remote trace store.

mod app;
mod command;
mod filter;
mod graph;
mod orchestrator;
mod poll;
mod runner;
mod ui;
mod waterfall;

use std::{io, time::Duration};

use api::ApiClient;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::{
    sync::{mpsc, watch},
    task,
};
use tokio_util::sync::CancellationToken;

use crate::{orchestrator::Orchestrator, poll::Poller, runner::Runner};

/// Minimum time between redraws when nothing new arrives, so we are not
/// repainting faster than the eye can register.
const REFRESH_INTERVAL: Duration = Duration::from_millis(250);

/// Polling cadence for keyboard and mouse events. Short enough to feel
/// responsive, long enough to avoid busy waiting.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Launch the dashboard and coordinate shutdown with the async runtime.
///
/// The orchestrator polls the trace store on `poll_interval`. When the
/// user quits from inside the UI the shared `shutdown` token is cancelled
/// so the caller can tear the rest of the process down.
pub async fn spawn(client: ApiClient, poll_interval: Duration, shutdown: CancellationToken, version: String) {
    let shutdown_for_ui = shutdown.clone();

    let handle = task::spawn(async move { run_dashboard(client, poll_interval, shutdown_for_ui, version).await });

    match handle.await {
        Ok(Ok(true)) => {
            shutdown.cancel();
        }
        Ok(Ok(false)) => {}
        Ok(Err(err)) => {
            eprintln!("Dashboard encountered an error: {err}");
        }
        Err(err) => {
            eprintln!("Dashboard task failed to join: {err}");
        }
    }
}

/// Set up the terminal backend, wire the orchestrator to the render loop,
/// and restore the original terminal state on exit.
async fn run_dashboard(
    client: ApiClient,
    poll_interval: Duration,
    shutdown: CancellationToken,
    version: String,
) -> anyhow::Result<bool> {
    // Raw mode gives us direct access to keystrokes and mouse events
    // without line buffering or echo from the terminal driver.
    enable_raw_mode()?;

    let mut stdout = io::stdout();

    // The alternate screen leaves the original terminal content untouched
    // for clean restoration afterwards.
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.hide_cursor()?;

    let (status_tx, status_rx) = watch::channel(ui::UiStatus::default());
    let (traces_tx, traces_rx) = watch::channel(ui::TracesSnapshot::default());
    let (detail_tx, detail_rx) = watch::channel(ui::DetailSnapshot::default());
    let (analytics_tx, analytics_rx) = watch::channel(ui::AnalyticsViewSnapshot::default());
    let (activity_tx, activity_rx) = watch::channel(ui::ActivitySnapshot::default());
    let (command_tx, command_rx) = mpsc::unbounded_channel();

    let orchestrator = Orchestrator {
        client,
        poll_interval,
        commands: command_rx,
        status_tx,
        traces_tx,
        detail_tx,
        analytics_tx,
        activity_tx,
        shutdown: shutdown.clone(),
    };

    let orchestrator = tokio::spawn(orchestrator.run());

    let poller = Poller {
        status_rx,
        traces_rx,
        detail_rx,
        analytics_rx,
        activity_rx,
    };

    let runner = Runner {
        version,
        poller,
        commands: command_tx,
        shutdown: shutdown.clone(),
    };

    let result = runner.run(&mut terminal);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    // The runner cancels the token on exit; make sure of it even on error
    // paths so the orchestrator task cannot outlive the UI.
    shutdown.cancel();
    let _ = orchestrator.await;

    result
}
