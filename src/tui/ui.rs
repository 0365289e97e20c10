//! UI rendering for the TUI

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use super::app::{App, Mode};
use super::state;
use super::views::GridView;
use super::widgets::grid::{tag_color, GridWidget};
use crate::grid::Toolbar;
use crate::locale::Labels;

/// Screen regions of the viewer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppLayout {
    pub title: Rect,
    /// Two lines: tag chips, then keyword / error toggle / navigation
    pub toolbar: Option<Rect>,
    /// Grid header line plus body
    pub grid: Rect,
    /// Grid rows only
    pub body: Rect,
    pub footer: Rect,
}

/// Split the screen; the grid body never exceeds `max_height` rows
pub fn layout(area: Rect, show_toolbar: bool, max_height: u16) -> AppLayout {
    let toolbar_height = if show_toolbar { 2 } else { 0 };
    let main_layout = Layout::vertical([
        Constraint::Length(1),              // Title
        Constraint::Length(toolbar_height), // Toolbar
        Constraint::Min(2),                 // Grid
        Constraint::Length(1),              // Footer/status
    ])
    .split(area);

    let available = main_layout[2];
    let body_height = state::body_height(available.height.saturating_sub(1), max_height);
    let grid = Rect {
        height: (body_height + 1).min(available.height),
        ..available
    };
    let body = Rect {
        y: grid.y + 1,
        height: grid.height.saturating_sub(1),
        ..grid
    };

    AppLayout {
        title: main_layout[0],
        toolbar: show_toolbar.then_some(main_layout[1]),
        grid,
        body,
        footer: main_layout[3],
    }
}

/// Main draw function - orchestrates all rendering
pub fn draw<V: GridView>(frame: &mut Frame, app: &App<V>) {
    let area = frame.area();
    let areas = layout(area, app.grid.options().show_highlighter, app.grid.options().max_height);

    draw_title(frame, app, areas.title);

    if let (Some(toolbar_area), Some(toolbar)) = (areas.toolbar, app.grid.toolbar()) {
        draw_toolbar(frame, &toolbar, app.mode == Mode::Search, toolbar_area);
    }

    let header = app.grid.header();
    let rows = app.grid.rows();
    let widget = GridWidget::new(&header, &rows, app.grid.inner_width())
        .scroll(app.scroll_x, app.scroll_y)
        .cursor(Some(app.cursor))
        .empty_text(app.locale().labels().empty);
    frame.render_widget(widget, areas.grid);

    draw_footer(frame, app, areas.footer);

    if app.show_help {
        draw_help_overlay(frame, app.locale().labels(), area);
    }
}

fn draw_title<V: GridView>(frame: &mut Frame, app: &App<V>, area: Rect) {
    let view = app.view();
    let refresh_indicator = if app.refresh_shown_at.is_some() {
        format!(" [{}]", app.locale().labels().updated)
    } else {
        String::new()
    };

    let title_text = format!(
        " spanview │ {} │ {}{}",
        view.title(app.locale()),
        view.summary(app.grid.nodes(), app.locale()),
        refresh_indicator
    );

    let title = Paragraph::new(title_text).style(
        Style::default()
            .bg(Color::Blue)
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    );

    frame.render_widget(title, area);
}

/// Toolbar lines for a toolbar model
pub fn toolbar_lines(toolbar: &Toolbar, editing: bool) -> [Line<'static>; 2] {
    let labels = toolbar.labels;

    // Tag chips, numbered for the 1-9 keys
    let mut chips = vec![Span::raw(format!(" {}: ", labels.components))];
    for (index, chip) in toolbar.tags.iter().enumerate() {
        let text = if index < 9 {
            format!("[{} {} {}]", index + 1, chip.tag, chip.count)
        } else {
            format!("[{} {}]", chip.tag, chip.count)
        };
        let style = if chip.selected {
            Style::default().fg(Color::Black).bg(tag_color(&chip.tag))
        } else {
            Style::default().fg(tag_color(&chip.tag))
        };
        chips.push(Span::styled(text, style));
        chips.push(Span::raw(" "));
    }

    // Keyword, error toggle, match navigation
    let mut controls = vec![Span::raw(" / ")];
    if toolbar.keyword.is_empty() && !editing {
        controls.push(Span::styled(
            labels.search_placeholder,
            Style::default().fg(Color::DarkGray),
        ));
    } else {
        controls.push(Span::styled(
            toolbar.keyword.clone(),
            Style::default().fg(Color::Cyan),
        ));
    }
    if editing {
        controls.push(Span::styled(
            "_",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::RAPID_BLINK),
        ));
    }

    let check = if toolbar.error_only { "[x]" } else { "[ ]" };
    controls.push(Span::raw(" │ "));
    controls.push(Span::styled(
        format!("{} {} ({})", check, labels.error_spans, toolbar.error_count),
        if toolbar.error_only {
            Style::default().fg(Color::Red)
        } else {
            Style::default()
        },
    ));

    let nav_style = if toolbar.can_navigate {
        Style::default().fg(Color::White)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    controls.push(Span::raw(" │ "));
    controls.push(Span::raw(format!(
        "{} {} ",
        labels.matched_spans, toolbar.match_text
    )));
    controls.push(Span::styled(format!("◀ {}", labels.previous), nav_style));
    controls.push(Span::raw("  "));
    controls.push(Span::styled(format!("{} ▶", labels.next), nav_style));

    [Line::from(chips), Line::from(controls)]
}

fn draw_toolbar(frame: &mut Frame, toolbar: &Toolbar, editing: bool, area: Rect) {
    let lines = toolbar_lines(toolbar, editing);
    let bar = Paragraph::new(Vec::from(lines)).style(Style::default().bg(Color::Black));
    frame.render_widget(bar, area);
}

fn draw_footer<V: GridView>(frame: &mut Frame, app: &App<V>, area: Rect) {
    let labels = app.locale().labels();
    let keybinds = match app.mode {
        Mode::Search => labels.keys_search,
        Mode::Normal if app.grid.options().show_highlighter => labels.keys_normal,
        Mode::Normal => labels.keys_no_toolbar,
    };

    // Show status message if present, otherwise show keybinds
    let footer_text = if let Some((ref msg, _)) = app.status_message {
        msg.clone()
    } else {
        keybinds.to_string()
    };

    let footer = Paragraph::new(format!(" {}", footer_text))
        .style(Style::default().bg(Color::DarkGray).fg(Color::White));

    frame.render_widget(footer, area);
}

fn draw_help_overlay(frame: &mut Frame, labels: &Labels, area: Rect) {
    // Center the help popup
    let popup_width = 56.min(area.width.saturating_sub(4));
    let popup_height = 30.min(area.height.saturating_sub(4));

    let popup_area = Rect {
        x: (area.width - popup_width) / 2,
        y: (area.height - popup_height) / 2,
        width: popup_width,
        height: popup_height,
    };

    // Clear the background
    frame.render_widget(Clear, popup_area);

    let help = Paragraph::new(labels.help_text)
        .block(
            Block::default()
                .title(format!(" {} ", labels.help))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .wrap(Wrap { trim: false })
        .style(Style::default().fg(Color::White).bg(Color::Black));

    frame.render_widget(help, popup_area);
}
