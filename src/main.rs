//! A horizontally scrolling demo deck for the terminal.
//!
//! Each workflow is a row of full-width sections; the title morphs between
//! sections as the deck scrolls, and some sections host interactive panels.

mod app;
mod config;
mod core;
mod ui;

use std::fs::File;
use std::io::{self, stderr};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, ValueEnum};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use tokio::time::MissedTickBehavior;
use tracing_subscriber::EnvFilter;

use crate::app::{
    event::{spawn_event_reader, AppEvent},
    feed_runtime::{spawn_replay, FeedSource, FeedUpdate, REPLAY_PACE},
    handler,
    state::AppState,
};
use crate::core::content::WorkflowId;

// ───────────────────────────────────────── CLI ───────────────

#[derive(Parser, Debug)]
#[command(name = env!("CARGO_PKG_NAME"), about = "Horizontally scrolling demo deck")]
struct Cli {
    /// Open a workflow directly instead of the home screen.
    #[arg(long, value_enum)]
    workflow: Option<WorkflowArg>,

    /// Replay a recorded training session (JSON lines) instead of the demo feed.
    #[arg(long = "training-log")]
    training_log: Option<PathBuf>,

    /// Animation frame interval in milliseconds.
    #[arg(long = "frame-ms", default_value_t = 16)]
    frame_ms: u64,

    /// Keep Left/Right inside a focused panel instead of switching sections.
    #[arg(long = "scoped-keys")]
    scoped_keys: bool,

    /// Write logs to this file rather than stderr.
    #[arg(long = "log-file")]
    log_file: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum WorkflowArg {
    Materials,
    DigitalTwin,
    Spectra,
}

impl From<WorkflowArg> for WorkflowId {
    fn from(arg: WorkflowArg) -> Self {
        match arg {
            WorkflowArg::Materials => WorkflowId::Materials,
            WorkflowArg::DigitalTwin => WorkflowId::DigitalTwin,
            WorkflowArg::Spectra => WorkflowId::Spectra,
        }
    }
}

fn init_tracing(log_file: Option<&PathBuf>) -> Result<()> {
    let builder = tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env());
    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("cannot open log file {}", path.display()))?;
            builder.with_writer(Mutex::new(file)).with_ansi(false).init();
        }
        None => builder.with_writer(io::stderr).init(), // never pollute stdout
    }
    Ok(())
}

fn apply_feed(state: &mut AppState, update: FeedUpdate) {
    let Some(lab) = state.deck.panels.twin_mut() else {
        return; // workflow changed; the session is gone
    };
    if !lab.board_mut().apply_for(update.session, update.message, Local::now()) {
        tracing::debug!("dropped feed message for stale session {}", update.session);
    }
}

// ───────────────────────────────────────── main ─────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_file.as_ref())?;

    let mut user_config = config::AppConfig::load();
    if cli.scoped_keys {
        user_config.capture_keys_globally = false;
    }
    let feed_source = match cli.training_log {
        Some(path) => FeedSource::File(path),
        None => FeedSource::Demo,
    };

    // ── terminal setup ────────────────────────────────────────
    enable_raw_mode()?;
    let mut stderr_handle = stderr();
    execute!(stderr_handle, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stderr());
    let mut terminal = Terminal::new(backend)?;

    let mut state = AppState::new(user_config);
    let size = terminal.size()?;
    state.set_terminal_area(Rect::new(0, 0, size.width, size.height));
    if let Some(workflow) = cli.workflow {
        state.open_workflow(workflow.into());
    }

    // ── async channels ────────────────────────────────────────
    let mut events = spawn_event_reader(Duration::from_millis(50));
    let (feed_tx, mut feed_rx) = tokio::sync::mpsc::unbounded_channel::<FeedUpdate>();
    let mut frames = tokio::time::interval(Duration::from_millis(cli.frame_ms.max(1)));
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

    // ── event loop ────────────────────────────────────────────
    loop {
        terminal.draw(|frame| ui::draw(frame, &state, Instant::now()))?;

        if let Some((session, request)) = state.pending_training.take() {
            tracing::debug!("starting training session {session}");
            let task = spawn_replay(
                feed_tx.clone(),
                session,
                request,
                feed_source.clone(),
                REPLAY_PACE,
            );
            state.attach_feed(task);
        }

        tokio::select! {
            biased;

            Some(event) = events.recv() => {
                match event {
                    AppEvent::Key(k) => handler::handle_key(&mut state, k, Instant::now()),
                    AppEvent::Mouse(m) => handler::handle_mouse(&mut state, m, Instant::now()),
                    AppEvent::Resize(w, h) => state.set_terminal_area(Rect::new(0, 0, w, h)),
                }
            }

            Some(update) = feed_rx.recv() => {
                apply_feed(&mut state, update);
                // Drain whatever else arrived before redrawing.
                while let Ok(update) = feed_rx.try_recv() {
                    apply_feed(&mut state, update);
                }
            }

            _ = frames.tick() => {
                state.deck.on_frame(Instant::now());
            }
        }

        if state.should_quit {
            break;
        }
    }

    // ── teardown ──────────────────────────────────────────────
    state.stop_feed();
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    Ok(())
}
