//! Tree-grid widget
//!
//! Draws a header line and the laid-out rows of a [`TreeGrid`] model with
//! horizontal scrolling. Sticky columns are drawn last so they cover the
//! columns scrolling underneath them.
//!
//! [`TreeGrid`]: crate::grid::TreeGrid

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::Widget;

use crate::grid::{Cell, DurationBar, GridRow, HeaderCell, Title};
use crate::tui::state::{column_widths, place_columns, Placement};

const TAG_PALETTE: [Color; 6] = [
    Color::Cyan,
    Color::Magenta,
    Color::Green,
    Color::Yellow,
    Color::Blue,
    Color::LightRed,
];

/// Stable color for a component tag
pub fn tag_color(tag: &str) -> Color {
    let sum = tag.bytes().fold(0usize, |acc, b| acc.wrapping_add(b as usize));
    TAG_PALETTE[sum % TAG_PALETTE.len()]
}

/// Row highlight, strongest first: active match, cursor, last clicked, match
pub fn row_style(row: &GridRow, is_cursor: bool) -> Style {
    if row.is_active_match {
        Style::default().bg(Color::Yellow).fg(Color::Black)
    } else if is_cursor {
        Style::default().bg(Color::DarkGray)
    } else if row.is_last_clicked {
        Style::default().bg(Color::Indexed(236))
    } else if row.is_match {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    }
}

pub struct GridWidget<'a> {
    header: &'a [HeaderCell],
    rows: &'a [GridRow],
    inner_width: u16,
    scroll_x: u16,
    scroll_y: usize,
    cursor: Option<usize>,
    empty_text: &'a str,
}

impl<'a> GridWidget<'a> {
    pub fn new(header: &'a [HeaderCell], rows: &'a [GridRow], inner_width: u16) -> Self {
        Self {
            header,
            rows,
            inner_width,
            scroll_x: 0,
            scroll_y: 0,
            cursor: None,
            empty_text: "",
        }
    }

    pub fn scroll(mut self, x: u16, y: usize) -> Self {
        self.scroll_x = x;
        self.scroll_y = y;
        self
    }

    pub fn cursor(mut self, cursor: Option<usize>) -> Self {
        self.cursor = cursor;
        self
    }

    pub fn empty_text(mut self, text: &'a str) -> Self {
        self.empty_text = text;
        self
    }

    /// Columns in drawing order: scrolling ones first, sticky ones on top
    fn draw_order(&self, placements: &[Option<Placement>]) -> Vec<(usize, Placement)> {
        let mut order: Vec<(usize, Placement)> = placements
            .iter()
            .enumerate()
            .filter_map(|(i, p)| p.map(|p| (i, p)))
            .collect();
        order.sort_by_key(|(i, _)| self.header[*i].sticky.is_some());
        order
    }
}

impl Widget for GridWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        let widths = column_widths(self.header, self.inner_width, area.width);
        let columns: Vec<(u16, Option<_>)> = self
            .header
            .iter()
            .zip(&widths)
            .map(|(h, w)| (*w, h.sticky))
            .collect();
        let placements = place_columns(&columns, self.scroll_x, area.width);
        let order = self.draw_order(&placements);

        let header_style = Style::default()
            .bg(Color::DarkGray)
            .fg(Color::White)
            .add_modifier(Modifier::BOLD);
        buf.set_style(Rect { height: 1, ..area }, header_style);
        for &(i, placement) in &order {
            let mut scratch = Buffer::empty(Rect::new(0, 0, widths[i], 1));
            scratch.set_style(scratch.area, header_style);
            draw_title(&mut scratch, &self.header[i].title);
            blit(&scratch, buf, area.x + placement.x, area.y, placement);
        }

        let body_height = usize::from(area.height - 1);
        if self.rows.is_empty() {
            if body_height > 0 {
                let text_width = self.empty_text.chars().count() as u16;
                let x = area.x + area.width.saturating_sub(text_width) / 2;
                buf.set_stringn(
                    x,
                    area.y + 1,
                    self.empty_text,
                    usize::from(area.width),
                    Style::default().fg(Color::DarkGray),
                );
            }
            return;
        }

        for (line, (index, row)) in self
            .rows
            .iter()
            .enumerate()
            .skip(self.scroll_y)
            .take(body_height)
            .enumerate()
        {
            let y = area.y + 1 + line as u16;
            let style = row_style(row, self.cursor == Some(index));
            buf.set_style(Rect::new(area.x, y, area.width, 1), style);
            for &(i, placement) in &order {
                let mut scratch = Buffer::empty(Rect::new(0, 0, widths[i], 1));
                scratch.set_style(scratch.area, style);
                match row.cells.get(i) {
                    Some(cell) if self.header[i].is_tree => draw_tree_cell(&mut scratch, row, cell),
                    Some(cell) => draw_cell(&mut scratch, cell),
                    None => {}
                }
                blit(&scratch, buf, area.x + placement.x, y, placement);
            }
        }
    }
}

/// Copy the visible slice of a one-line scratch buffer
fn blit(scratch: &Buffer, buf: &mut Buffer, x: u16, y: u16, placement: Placement) {
    for dx in 0..placement.width {
        if let Some(src) = scratch.cell((placement.skip + dx, 0)) {
            if let Some(dst) = buf.cell_mut((x + dx, y)) {
                *dst = src.clone();
            }
        }
    }
}

fn draw_title(scratch: &mut Buffer, title: &Title) {
    let width = scratch.area.width;
    match title {
        Title::Plain(text) => {
            scratch.set_stringn(0, 0, text, usize::from(width), Style::default());
        }
        Title::Scale { start, end } => {
            scratch.set_stringn(0, 0, start, usize::from(width), Style::default());
            let end_width = end.chars().count() as u16;
            let x = width.saturating_sub(end_width);
            scratch.set_stringn(x, 0, end, usize::from(width - x), Style::default());
        }
        Title::WithHint(text) => {
            let (x, _) = scratch.set_stringn(0, 0, text, usize::from(width), Style::default());
            if x + 2 <= width {
                scratch.set_stringn(x + 1, 0, "?", 1, Style::default().fg(Color::Gray));
            }
        }
    }
}

fn draw_tree_cell(scratch: &mut Buffer, row: &GridRow, cell: &Cell) {
    let width = usize::from(scratch.area.width);
    let marker = match (row.has_children, row.open) {
        (true, true) => "▾ ",
        (true, false) => "▸ ",
        (false, _) => "  ",
    };
    let prefix = format!("{}{}", "  ".repeat(row.depth), marker);
    let (x, _) = scratch.set_stringn(0, 0, &prefix, width, Style::default());
    let (x, _) = scratch.set_stringn(
        x,
        0,
        "● ",
        width.saturating_sub(usize::from(x)),
        Style::default().fg(tag_color(&row.component_tag)),
    );
    let name = match cell {
        Cell::Text(text) | Cell::Action(text) => text.as_str(),
        Cell::Bar(bar) => bar.label.as_str(),
        Cell::Empty => "",
    };
    let name_style = if row.error {
        Style::default().fg(Color::Red)
    } else {
        Style::default()
    };
    scratch.set_stringn(x, 0, name, width.saturating_sub(usize::from(x)), name_style);
}

fn draw_cell(scratch: &mut Buffer, cell: &Cell) {
    let width = usize::from(scratch.area.width);
    match cell {
        Cell::Text(text) => {
            scratch.set_stringn(0, 0, text, width, Style::default());
        }
        Cell::Action(text) => {
            let style = Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::UNDERLINED);
            scratch.set_stringn(0, 0, text, width, style);
        }
        Cell::Bar(bar) => draw_bar(scratch, bar),
        Cell::Empty => {}
    }
}

fn draw_bar(scratch: &mut Buffer, bar: &DurationBar) {
    let width = scratch.area.width;
    let (offset, len) = bar.geometry(width);
    if len == 0 {
        return;
    }
    let color = if bar.error { Color::Red } else { Color::Cyan };
    scratch.set_style(Rect::new(offset, 0, len, 1), Style::default().bg(color));

    let label_width = bar.label.chars().count() as u16;
    let label_style = Style::default().fg(Color::Gray);
    let x = if bar.from_right() {
        // Label ends just before the bar
        offset.checked_sub(label_width + 1)
    } else {
        let after = offset + len + 1;
        (after + label_width <= width).then_some(after)
    };
    match x {
        Some(x) => {
            scratch.set_stringn(x, 0, &bar.label, usize::from(label_width), label_style);
        }
        // No room beside the bar: draw over it
        None => {
            let x = width.saturating_sub(label_width).min(offset);
            scratch.set_stringn(x, 0, &bar.label, usize::from(width - x), Style::default().fg(Color::Black));
        }
    }
}
