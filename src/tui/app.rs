//! Application state for the TUI

use std::time::Instant;

use ratatui::layout::Rect;

use super::state;
use super::ui::{self, AppLayout};
use super::views::GridView;
use crate::error::Result;
use crate::grid::{FrameEffect, GridOptions, TreeGrid};
use crate::locale::Locale;

/// Cells moved per horizontal scroll step
pub const SCROLL_X_STEP: u16 = 4;

/// Input mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Normal,
    /// Editing the keyword
    Search,
}

/// Main application state
pub struct App<V: GridView> {
    view: V,
    pub grid: TreeGrid<V::Node>,

    // Viewport over the grid
    pub cursor: usize,
    pub scroll_y: usize,
    pub scroll_x: u16,
    pub viewport_width: u16,
    pub viewport_height: u16,

    // UI state
    pub mode: Mode,
    pub show_help: bool,
    /// Keyword before the current edit, restored on cancel
    pub search_backup: String,

    // Refresh indicator
    pub refresh_shown_at: Option<Instant>,

    // Status message
    pub status_message: Option<(String, Instant)>,
}

impl<V: GridView> App<V> {
    pub fn new(view: V, options: GridOptions) -> Result<Self> {
        let nodes = view.load()?;
        let columns = view.columns(&nodes, options.locale);
        let options = GridOptions {
            scroll_to_origin_on_mount: view.scroll_to_origin(),
            ..options
        };
        let grid = TreeGrid::mount(nodes, columns, options);

        Ok(Self {
            view,
            grid,
            cursor: 0,
            scroll_y: 0,
            scroll_x: 0,
            viewport_width: 80,
            viewport_height: 24,
            mode: Mode::Normal,
            show_help: false,
            search_backup: String::new(),
            refresh_shown_at: None,
            status_message: None,
        })
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn locale(&self) -> Locale {
        self.grid.options().locale
    }

    /// Reload nodes from the view's source, keeping filters and disclosure
    pub fn reload(&mut self) -> Result<()> {
        let nodes = self.view.load()?;
        let columns = self.view.columns(&nodes, self.locale());
        tracing::info!(source = %self.view.title(self.locale()), "reloaded");
        self.grid.set_nodes(nodes);
        self.grid.set_columns(columns);
        self.clamp_cursor();
        Ok(())
    }

    /// Switch locale; column titles are rebuilt for it
    pub fn set_locale(&mut self, locale: Locale) {
        self.grid.set_locale(locale);
        let columns = self.view.columns(self.grid.nodes(), locale);
        self.grid.set_columns(columns);
    }

    pub fn layout(&self) -> AppLayout {
        ui::layout(
            Rect::new(0, 0, self.viewport_width, self.viewport_height),
            self.grid.options().show_highlighter,
            self.grid.options().max_height,
        )
    }

    /// Rows that fit in the grid body
    pub fn body_height(&self) -> usize {
        usize::from(self.layout().body.height)
    }

    pub fn row_count(&self) -> usize {
        self.grid.row_ids().len()
    }

    pub fn cursor_row_id(&self) -> Option<String> {
        self.grid.row_ids().into_iter().nth(self.cursor)
    }

    /// Full scrollable width of the grid at the current viewport
    pub fn content_width(&self) -> u16 {
        let header = self.grid.header();
        state::column_widths(&header, self.grid.inner_width(), self.viewport_width)
            .into_iter()
            .fold(0, u16::saturating_add)
    }

    pub fn scroll_left(&mut self) {
        self.scroll_x = self.scroll_x.saturating_sub(SCROLL_X_STEP);
    }

    pub fn scroll_right(&mut self) {
        let max = state::max_scroll_x(self.content_width(), self.viewport_width);
        self.scroll_x = self.scroll_x.saturating_add(SCROLL_X_STEP).min(max);
    }

    /// Keep the cursor on a row and on screen
    pub fn ensure_visible(&mut self) {
        self.scroll_y =
            state::calculate_scroll_offset(self.cursor, self.scroll_y, self.body_height());
    }

    pub fn clamp_cursor(&mut self) {
        self.cursor = state::clamp_index(self.cursor, self.row_count());
        self.ensure_visible();
    }

    /// Run the grid's deferred work and apply the scrolls it asks for.
    /// Called once per drawn frame.
    pub fn apply_frame(&mut self) {
        for effect in self.grid.on_frame() {
            match effect {
                FrameEffect::ScrollToOrigin => {
                    self.scroll_x = 0;
                    self.scroll_y = 0;
                }
                FrameEffect::ScrollIntoView(id) => {
                    let ids = self.grid.row_ids();
                    if let Some(index) = ids.iter().position(|row| *row == id) {
                        self.cursor = index;
                        self.scroll_y =
                            state::centered_scroll_offset(index, self.body_height(), ids.len());
                    }
                }
            }
        }
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.viewport_width = width;
        self.viewport_height = height;
        self.scroll_x = self
            .scroll_x
            .min(state::max_scroll_x(self.content_width(), width));
        self.ensure_visible();
    }

    /// Show the refresh indicator
    pub fn show_refresh_indicator(&mut self) {
        self.refresh_shown_at = Some(Instant::now());
    }

    pub fn set_status(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    /// Periodic tick
    pub fn tick(&mut self) {
        // Clear refresh indicator after 2 seconds
        if let Some(shown_at) = self.refresh_shown_at {
            if shown_at.elapsed().as_secs() >= 2 {
                self.refresh_shown_at = None;
            }
        }

        // Clear status message after 3 seconds
        if let Some((_, shown_at)) = &self.status_message {
            if shown_at.elapsed().as_secs() >= 3 {
                self.status_message = None;
            }
        }
    }
}

/// App over the embedded sample trace, 120x12, first frame applied
#[cfg(test)]
pub(crate) fn sample_app() -> App<super::views::TimelineView> {
    let mut app = App::new(
        super::views::TimelineView::new(None, crate::config::TimelineConfig::default()),
        GridOptions::default(),
    )
    .unwrap();
    app.resize(120, 12);
    app.apply_frame();
    app
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_app_counts_rows() {
        let app = sample_app();
        assert_eq!(app.row_count(), 17);
        assert_eq!(app.cursor_row_id().as_deref(), Some(app.grid.row_ids()[0].as_str()));
    }

    #[test]
    fn test_scroll_into_view_moves_cursor() {
        let mut app = sample_app();
        app.grid.set_error_only(true);
        app.apply_frame();
        app.grid.prev_match();
        app.apply_frame();
        let active = app.grid.active_match_id().to_string();
        assert_eq!(app.cursor_row_id(), Some(active));
        assert!(app.cursor >= app.scroll_y && app.cursor < app.scroll_y + app.body_height());
    }

    #[test]
    fn test_horizontal_scroll_is_bounded() {
        let mut app = sample_app();
        app.resize(60, 12);
        for _ in 0..100 {
            app.scroll_right();
        }
        assert_eq!(app.scroll_x, app.content_width() - 60);
        for _ in 0..100 {
            app.scroll_left();
        }
        assert_eq!(app.scroll_x, 0);
    }

    #[test]
    fn test_only_timeline_scrolls_to_origin_on_mount() {
        let timeline = App::new(
            super::super::views::TimelineView::new(None, Default::default()),
            GridOptions::default(),
        )
        .unwrap();
        assert!(timeline.grid.options().scroll_to_origin_on_mount);

        let mut chain =
            App::new(super::super::views::ChainView::new(None), GridOptions::default()).unwrap();
        assert!(!chain.grid.options().scroll_to_origin_on_mount);
        chain.resize(40, 12);
        chain.scroll_x = 8;
        chain.apply_frame();
        assert_eq!(chain.scroll_x, 8);
    }

    #[test]
    fn test_locale_switch_rebuilds_titles() {
        let mut app = sample_app();
        app.set_locale(Locale::Zh);
        assert_eq!(app.locale(), Locale::Zh);
        let header = app.grid.header();
        assert_eq!(header[2].title, crate::grid::Title::Plain("服务名".to_string()));
    }
}
