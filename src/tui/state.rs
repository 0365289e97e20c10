//! Pure state transformations for the TUI (Functional Core)
//!
//! This module contains ONLY pure functions with no I/O: cursor movement,
//! vertical scroll clamping and the horizontal placement of sticky columns.
//! The imperative shell (app.rs, mod.rs) calls these.

use crate::grid::{HeaderCell, Sticky};

/// Narrowest the tree column gets, whatever the viewport
pub const MIN_TREE_WIDTH: u16 = 24;

// =============================================================================
// Navigation - Pure index calculations
// =============================================================================

/// Calculate new selected index after moving up
pub fn move_selection_up(current: usize) -> usize {
    current.saturating_sub(1)
}

/// Calculate new selected index after moving down
pub fn move_selection_down(current: usize, max: usize) -> usize {
    if max == 0 {
        0
    } else {
        (current + 1).min(max - 1)
    }
}

/// Calculate new selected index after page down
pub fn page_down(current: usize, page_size: usize, max: usize) -> usize {
    if max == 0 {
        0
    } else {
        (current + page_size).min(max - 1)
    }
}

/// Calculate new selected index after page up
pub fn page_up(current: usize, page_size: usize) -> usize {
    current.saturating_sub(page_size)
}

/// Keep an index inside a list that may have shrunk
pub fn clamp_index(current: usize, len: usize) -> usize {
    if len == 0 {
        0
    } else {
        current.min(len - 1)
    }
}

// =============================================================================
// Scrolling
// =============================================================================

/// Smallest scroll change that keeps `selected` on screen
pub fn calculate_scroll_offset(selected: usize, current_offset: usize, visible: usize) -> usize {
    if visible == 0 {
        return 0;
    }
    if selected < current_offset {
        selected
    } else if selected >= current_offset + visible {
        selected + 1 - visible
    } else {
        current_offset
    }
}

/// Offset that puts `index` in the middle of the viewport
pub fn centered_scroll_offset(index: usize, visible: usize, len: usize) -> usize {
    let max_offset = len.saturating_sub(visible);
    index.saturating_sub(visible / 2).min(max_offset)
}

/// Body height: what the terminal leaves, capped by the grid's max height
pub fn body_height(available: u16, max_height: u16) -> u16 {
    available.min(max_height)
}

/// Horizontal scroll limit for content `content_width` wide
pub fn max_scroll_x(content_width: u16, viewport: u16) -> u16 {
    content_width.saturating_sub(viewport)
}

// =============================================================================
// Horizontal layout
// =============================================================================

/// Width of every column; the tree column takes what is left of the
/// scrollable width after the fixed columns
pub fn column_widths(header: &[HeaderCell], inner_width: u16, viewport: u16) -> Vec<u16> {
    let fixed: u16 = header
        .iter()
        .filter_map(|h| h.width)
        .fold(0, u16::saturating_add);
    let content = inner_width.max(viewport);
    let tree = content.saturating_sub(fixed).max(MIN_TREE_WIDTH);
    header
        .iter()
        .map(|h| h.width.unwrap_or(if h.is_tree { tree } else { 0 }))
        .collect()
}

/// Where a column lands on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    /// Screen column of the first visible cell
    pub x: u16,
    /// Leading cells of the column hidden past the left edge
    pub skip: u16,
    /// Visible cells
    pub width: u16,
}

/// Place columns for a horizontal scroll position.
///
/// Ordinary columns move with the scroll. A left-sticky column never goes
/// further left than its offset; a right-sticky column never goes further
/// right than `viewport - offset`. Columns entirely off screen are `None`.
pub fn place_columns(
    columns: &[(u16, Option<(Sticky, u16)>)],
    scroll_x: u16,
    viewport: u16,
) -> Vec<Option<Placement>> {
    let viewport = i32::from(viewport);
    let mut natural = 0i32;
    columns
        .iter()
        .map(|&(width, sticky)| {
            let width_i = i32::from(width);
            let mut start = natural - i32::from(scroll_x);
            natural += width_i;
            match sticky {
                Some((Sticky::Left, offset)) => start = start.max(i32::from(offset)),
                Some((Sticky::Right, offset)) => {
                    start = start.min(viewport - i32::from(offset) - width_i)
                }
                None => {}
            }

            let visible_start = start.max(0);
            let visible_end = (start + width_i).min(viewport);
            if visible_end <= visible_start {
                return None;
            }
            Some(Placement {
                x: visible_start as u16,
                skip: (visible_start - start) as u16,
                width: (visible_end - visible_start) as u16,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Title;

    fn header(key: &str, width: Option<u16>) -> HeaderCell {
        HeaderCell {
            key: key.to_string(),
            title: Title::Plain(key.to_string()),
            width,
            is_tree: width.is_none(),
            sticky: None,
        }
    }

    #[test]
    fn test_move_selection() {
        assert_eq!(move_selection_up(0), 0);
        assert_eq!(move_selection_up(5), 4);
        assert_eq!(move_selection_down(4, 5), 4);
        assert_eq!(move_selection_down(0, 0), 0);
        assert_eq!(page_down(2, 10, 5), 4);
        assert_eq!(page_up(3, 10), 0);
        assert_eq!(clamp_index(9, 3), 2);
        assert_eq!(clamp_index(9, 0), 0);
    }

    #[test]
    fn test_scroll_offset() {
        assert_eq!(calculate_scroll_offset(0, 5, 10), 0);
        assert_eq!(calculate_scroll_offset(12, 0, 10), 3);
        assert_eq!(calculate_scroll_offset(5, 2, 10), 2);
        assert_eq!(calculate_scroll_offset(5, 2, 0), 0);
    }

    #[test]
    fn test_centered_scroll() {
        assert_eq!(centered_scroll_offset(50, 10, 100), 45);
        assert_eq!(centered_scroll_offset(2, 10, 100), 0);
        assert_eq!(centered_scroll_offset(99, 10, 100), 90);
        assert_eq!(centered_scroll_offset(3, 10, 5), 0);
    }

    #[test]
    fn test_column_widths_tree_fills_viewport() {
        let cols = [header("span", None), header("a", Some(10)), header("b", Some(20))];
        assert_eq!(column_widths(&cols, 31, 100), [70, 10, 20]);
        // Narrow viewport: the tree column keeps its minimum and content scrolls
        assert_eq!(column_widths(&cols, 31, 40), [MIN_TREE_WIDTH, 10, 20]);
        // Explicit inner width wider than the viewport
        assert_eq!(column_widths(&cols, 200, 100), [170, 10, 20]);
    }

    #[test]
    fn test_place_columns_without_scroll() {
        let cols = [(10, None), (5, None), (20, None)];
        let placed = place_columns(&cols, 0, 20);
        assert_eq!(placed[0], Some(Placement { x: 0, skip: 0, width: 10 }));
        assert_eq!(placed[1], Some(Placement { x: 10, skip: 0, width: 5 }));
        assert_eq!(placed[2], Some(Placement { x: 15, skip: 0, width: 5 }));
    }

    #[test]
    fn test_place_columns_scrolled() {
        let cols = [(10, None), (5, None), (20, None)];
        let placed = place_columns(&cols, 12, 20);
        assert_eq!(placed[0], None);
        assert_eq!(placed[1], Some(Placement { x: 0, skip: 2, width: 3 }));
        assert_eq!(placed[2], Some(Placement { x: 3, skip: 0, width: 17 }));
    }

    #[test]
    fn test_sticky_left_stays_pinned() {
        let cols = [(10, Some((Sticky::Left, 0))), (5, Some((Sticky::Left, 10))), (40, None)];
        let placed = place_columns(&cols, 30, 30);
        assert_eq!(placed[0], Some(Placement { x: 0, skip: 0, width: 10 }));
        assert_eq!(placed[1], Some(Placement { x: 10, skip: 0, width: 5 }));
        assert_eq!(placed[2], Some(Placement { x: 0, skip: 15, width: 25 }));
    }

    #[test]
    fn test_sticky_right_stays_pinned() {
        let cols = [(40, None), (8, Some((Sticky::Right, 0)))];
        let placed = place_columns(&cols, 0, 30);
        assert_eq!(placed[1], Some(Placement { x: 22, skip: 0, width: 8 }));
        // Scrolled to the end, the column is at its natural place anyway
        let placed = place_columns(&cols, 18, 30);
        assert_eq!(placed[1], Some(Placement { x: 22, skip: 0, width: 8 }));
    }
}
