//! TEA Update Function
//!
//! ```text
//! update : Msg -> Model -> (Model, Cmd)
//! ```
//!
//! Every message goes through [`update`], which changes the app state and
//! returns the side effects (quit, reload, status) as a [`Cmd`] for the
//! runtime to execute. The grid model lives inside the app and is not
//! cloneable, so the model is updated in place.

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};

use super::app::{App, Mode};
use super::msg::{is_navigation, Msg};
use super::state;
use super::views::GridView;

/// Commands that need to be executed by the runtime (imperative shell)
#[derive(Debug, Clone, PartialEq)]
pub enum Cmd {
    /// No command
    None,
    /// Multiple commands to execute
    Batch(Vec<Cmd>),
    /// Quit the application
    Quit,
    /// Reload the data source
    Reload,
    /// Set status message
    SetStatus(String),
}

impl Cmd {
    /// Create a batch of commands
    pub fn batch(cmds: Vec<Cmd>) -> Cmd {
        // Filter out None commands
        let mut cmds: Vec<Cmd> = cmds
            .into_iter()
            .filter(|c| !matches!(c, Cmd::None))
            .collect();
        match cmds.len() {
            0 => Cmd::None,
            1 => cmds.pop().unwrap_or(Cmd::None),
            _ => Cmd::Batch(cmds),
        }
    }

    /// Check if this is a quit command
    pub fn is_quit(&self) -> bool {
        match self {
            Cmd::Quit => true,
            Cmd::Batch(cmds) => cmds.iter().any(Cmd::is_quit),
            _ => false,
        }
    }
}

/// Process a message: update the app, return the commands to run
pub fn update<V: GridView>(app: &mut App<V>, msg: Msg) -> Cmd {
    let navigation = is_navigation(&msg);
    let cmd = apply(app, msg);
    if navigation {
        app.ensure_visible();
    }
    cmd
}

fn apply<V: GridView>(app: &mut App<V>, msg: Msg) -> Cmd {
    match msg {
        // === Lifecycle ===
        Msg::Quit => Cmd::Quit,
        Msg::Tick => {
            app.tick();
            Cmd::None
        }
        Msg::Resize(width, height) => {
            app.resize(width, height);
            Cmd::None
        }
        Msg::Reload => Cmd::Reload,
        Msg::Noop => Cmd::None,

        // === Navigation ===
        Msg::MoveUp => {
            app.cursor = state::move_selection_up(app.cursor);
            Cmd::None
        }
        Msg::MoveDown => {
            app.cursor = state::move_selection_down(app.cursor, app.row_count());
            Cmd::None
        }
        Msg::PageUp => {
            app.cursor = state::page_up(app.cursor, app.body_height());
            Cmd::None
        }
        Msg::PageDown => {
            app.cursor = state::page_down(app.cursor, app.body_height(), app.row_count());
            Cmd::None
        }
        Msg::JumpToTop => {
            app.cursor = 0;
            Cmd::None
        }
        Msg::JumpToBottom => {
            app.cursor = app.row_count().saturating_sub(1);
            Cmd::None
        }
        Msg::ScrollLeft => {
            app.scroll_left();
            Cmd::None
        }
        Msg::ScrollRight => {
            app.scroll_right();
            Cmd::None
        }

        // === Rows ===
        Msg::ActivateRow => {
            if let Some(id) = app.cursor_row_id() {
                app.grid.click_row(&id);
            }
            Cmd::None
        }
        Msg::ClickRow(index) => {
            if let Some(id) = app.grid.row_ids().into_iter().nth(index) {
                app.cursor = index;
                app.grid.click_row(&id);
            }
            Cmd::None
        }
        Msg::ToggleOpen => {
            if let Some(id) = app.cursor_row_id() {
                app.grid.toggle_open(&id);
                app.clamp_cursor();
            }
            Cmd::None
        }

        // === Highlighter ===
        msg @ (Msg::ToggleTag(_)
        | Msg::ToggleErrorOnly
        | Msg::ClearFilters
        | Msg::NextMatch
        | Msg::PrevMatch
        | Msg::StartSearch)
            if !app.grid.options().show_highlighter =>
        {
            tracing::trace!(?msg, "highlighter hidden, ignoring");
            Cmd::None
        }
        Msg::ToggleTag(index) => match app.grid.tag_stats().get(index).map(|s| s.tag.clone()) {
            Some(tag) => {
                app.grid.toggle_tag(&tag);
                Cmd::None
            }
            None => Cmd::SetStatus(format!(
                "{} #{}",
                app.locale().labels().no_tag,
                index + 1
            )),
        },
        Msg::ToggleErrorOnly => {
            let error_only = !app.grid.filter().error_only;
            app.grid.set_error_only(error_only);
            Cmd::None
        }
        Msg::ClearFilters => {
            app.grid.clear_filters();
            Cmd::SetStatus(app.locale().labels().filters_cleared.to_string())
        }
        Msg::NextMatch => {
            app.grid.next_match();
            Cmd::None
        }
        Msg::PrevMatch => {
            app.grid.prev_match();
            Cmd::None
        }

        // === Keyword Input ===
        Msg::StartSearch => {
            app.search_backup = app.grid.filter().keyword.clone();
            app.mode = Mode::Search;
            Cmd::None
        }
        Msg::SearchInput(c) => {
            let mut keyword = app.grid.filter().keyword.clone();
            keyword.push(c);
            app.grid.set_keyword(keyword);
            Cmd::None
        }
        Msg::SearchBackspace => {
            let mut keyword = app.grid.filter().keyword.clone();
            if keyword.pop().is_some() {
                app.grid.set_keyword(keyword);
            }
            Cmd::None
        }
        Msg::SearchConfirm => {
            app.mode = Mode::Normal;
            Cmd::None
        }
        Msg::SearchCancel => {
            let backup = std::mem::take(&mut app.search_backup);
            if app.grid.filter().keyword != backup {
                app.grid.set_keyword(backup);
            }
            app.mode = Mode::Normal;
            Cmd::None
        }

        // === Display ===
        Msg::ToggleLocale => {
            let locale = app.locale().toggle();
            app.set_locale(locale);
            Cmd::SetStatus(format!("{}: {}", locale.labels().language, locale.as_str()))
        }
        Msg::ToggleToolbar => {
            let show = !app.grid.options().show_highlighter;
            app.grid.set_show_highlighter(show);
            app.ensure_visible();
            Cmd::None
        }
        Msg::ToggleHelp => {
            app.show_help = !app.show_help;
            Cmd::None
        }
        Msg::CloseModal => {
            app.show_help = false;
            Cmd::None
        }

        Msg::Mouse(event) => handle_mouse(app, event),
    }
}

fn handle_mouse<V: GridView>(app: &mut App<V>, event: MouseEvent) -> Cmd {
    match event.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            let body = app.layout().body;
            let inside = event.row >= body.y
                && event.row < body.y + body.height
                && event.column >= body.x
                && event.column < body.x + body.width;
            if inside {
                let index = app.scroll_y + usize::from(event.row - body.y);
                return update(app, Msg::ClickRow(index));
            }
            Cmd::None
        }
        MouseEventKind::ScrollDown => update(app, Msg::MoveDown),
        MouseEventKind::ScrollUp => update(app, Msg::MoveUp),
        MouseEventKind::ScrollRight => update(app, Msg::ScrollRight),
        MouseEventKind::ScrollLeft => update(app, Msg::ScrollLeft),
        _ => Cmd::None,
    }
}
