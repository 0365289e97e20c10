//! Terminal User Interface for spanview
//!
//! Hosts a tree-grid in the terminal.
//! Features:
//! - Vim-style row navigation with horizontal column scrolling
//! - Tag / keyword / error highlighter with match navigation
//! - Sticky columns pinned while scrolling
//! - Auto-reload when the input file changes

pub mod app;
pub mod msg; // TEA message types (what happened)
pub mod state; // Pure state transformations (functional core)
pub mod ui;
pub mod update; // TEA update function (state transitions)
pub mod views;
pub mod widgets;

use std::io;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::{
    event::{
        poll, read, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use notify::{Config, RecommendedWatcher, RecursiveMode, Watcher};
use ratatui::prelude::*;

use crate::error::Result;
use crate::grid::GridOptions;
use app::{App, Mode};
use msg::{key_to_msg, Msg};
use update::{update, Cmd};
use views::GridView;

/// Run the TUI application
pub fn run<V: GridView>(view: V, options: GridOptions, watch: bool) -> Result<()> {
    // Load before touching the terminal so errors print normally
    let app = App::new(view, options)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app, ensuring cleanup happens even on error
    let result = run_app_inner(&mut terminal, app, watch);

    // Restore terminal - this MUST run even if app fails
    let _ = disable_raw_mode();
    let _ = execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    );
    let _ = terminal.show_cursor();

    result
}

fn run_app_inner<B: Backend, V: GridView>(
    terminal: &mut Terminal<B>,
    mut app: App<V>,
    watch: bool,
) -> Result<()> {
    let size = terminal.size()?;
    app.resize(size.width, size.height);

    // Setup file watcher for auto-reload
    let (tx, rx) = mpsc::channel();
    let mut watcher = RecommendedWatcher::new(
        move |res: std::result::Result<notify::Event, notify::Error>| {
            if let Ok(event) = res {
                if event.kind.is_modify() || event.kind.is_create() {
                    let _ = tx.send(());
                }
            }
        },
        Config::default(),
    )?;

    match app.view().source() {
        Some(path) if watch => {
            watcher.watch(path, RecursiveMode::NonRecursive)?;
            tracing::info!(path = %path.display(), "watching for changes");
        }
        _ => {}
    }

    run_event_loop(terminal, &mut app, rx)
}

fn run_event_loop<B: Backend, V: GridView>(
    terminal: &mut Terminal<B>,
    app: &mut App<V>,
    file_change_rx: mpsc::Receiver<()>,
) -> Result<()> {
    let tick_rate = Duration::from_millis(100);
    let mut last_tick = Instant::now();

    loop {
        // Deferred grid work runs once per frame, right before drawing
        app.apply_frame();
        terminal.draw(|f| ui::draw(f, app))?;

        // Handle input with timeout
        let timeout = tick_rate.saturating_sub(last_tick.elapsed());
        if poll(timeout)? {
            let msg = match read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => key_to_msg(
                    key.code,
                    key.modifiers,
                    app.show_help,
                    app.mode == Mode::Search,
                ),
                Event::Mouse(mouse) => Msg::Mouse(mouse),
                Event::Resize(width, height) => Msg::Resize(width, height),
                _ => Msg::Noop,
            };
            let cmd = update(app, msg);
            if execute_cmd(app, cmd) {
                return Ok(()); // Quit signal
            }
        }

        // Check for file changes (non-blocking), coalescing bursts
        if file_change_rx.try_recv().is_ok() {
            while file_change_rx.try_recv().is_ok() {}
            execute_cmd(app, Cmd::Reload);
        }

        // Tick for status expiry
        if last_tick.elapsed() >= tick_rate {
            update(app, Msg::Tick);
            last_tick = Instant::now();
        }
    }
}

/// Run a command's side effects; returns true when the app should quit
fn execute_cmd<V: GridView>(app: &mut App<V>, cmd: Cmd) -> bool {
    match cmd {
        Cmd::None => false,
        Cmd::Quit => true,
        Cmd::Batch(cmds) => cmds
            .into_iter()
            .fold(false, |quit, cmd| execute_cmd(app, cmd) || quit),
        Cmd::Reload => {
            match app.reload() {
                Ok(()) => app.show_refresh_indicator(),
                Err(e) => {
                    tracing::warn!(error = %e, "reload failed");
                    app.set_status(format!("{}: {}", app.locale().labels().reload_failed, e));
                }
            }
            false
        }
        Cmd::SetStatus(message) => {
            app.set_status(message);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use app::sample_app;

    #[test]
    fn test_execute_quit_in_batch() {
        let mut app = sample_app();
        assert!(!execute_cmd(&mut app, Cmd::None));
        assert!(execute_cmd(
            &mut app,
            Cmd::Batch(vec![Cmd::SetStatus("bye".to_string()), Cmd::Quit])
        ));
        assert_eq!(app.status_message.as_ref().map(|(m, _)| m.as_str()), Some("bye"));
    }

    #[test]
    fn test_reload_shows_indicator() {
        let mut app = sample_app();
        assert!(!execute_cmd(&mut app, Cmd::Reload));
        assert!(app.refresh_shown_at.is_some());
    }

    #[test]
    fn test_reload_failure_sets_status() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trace.json");
        std::fs::write(&path, "[]").unwrap();
        let view = views::TimelineView::new(Some(path.clone()), Default::default());
        let mut app = App::new(view, GridOptions::default()).unwrap();
        std::fs::write(&path, "{ broken").unwrap();
        execute_cmd(&mut app, Cmd::Reload);
        let status = app.status_message.as_ref().map(|(m, _)| m.clone()).unwrap();
        assert!(status.starts_with("Reload failed"), "got: {}", status);
    }
}
