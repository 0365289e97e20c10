//! Column configuration and the sticky column layout calculator

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::cell::Cell;
use super::tree::TreeGridNode;
use crate::locale::Locale;

/// Edge a sticky column is pinned to during horizontal scroll
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sticky {
    Left,
    Right,
}

/// Header content of a column
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Title {
    Plain(String),
    /// A scale: `start` at the left edge, `end` at the right edge
    Scale { start: String, end: String },
    /// Label followed by a hint marker
    WithHint(String),
}

impl From<&str> for Title {
    fn from(text: &str) -> Self {
        Title::Plain(text.to_string())
    }
}

impl From<String> for Title {
    fn from(text: String) -> Self {
        Title::Plain(text)
    }
}

/// Everything a column renderer may look at for one row
#[derive(Debug)]
pub struct CellContext<'a, T> {
    pub node: &'a T,
    pub depth: usize,
    pub locale: Locale,
    pub is_match: bool,
    pub is_active_match: bool,
    pub is_last_clicked: bool,
}

pub type CellRenderer<T> = Box<dyn Fn(&CellContext<'_, T>) -> Cell>;

/// One grid column; `key` must be unique within a column list
pub struct Column<T> {
    pub key: String,
    pub title: Title,
    pub width: Option<u16>,
    pub is_tree: Option<bool>,
    pub sticky: Option<Sticky>,
    pub render: Option<CellRenderer<T>>,
}

impl<T> fmt::Debug for Column<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("key", &self.key)
            .field("title", &self.title)
            .field("width", &self.width)
            .field("is_tree", &self.is_tree)
            .field("sticky", &self.sticky)
            .field("render", &self.render.is_some())
            .finish()
    }
}

impl<T: TreeGridNode> Column<T> {
    pub fn new(key: impl Into<String>, title: impl Into<Title>) -> Self {
        Self {
            key: key.into(),
            title: title.into(),
            width: None,
            is_tree: None,
            sticky: None,
            render: None,
        }
    }

    pub fn width(mut self, width: u16) -> Self {
        self.width = Some(width);
        self
    }

    pub fn tree(mut self) -> Self {
        self.is_tree = Some(true);
        self
    }

    pub fn sticky(mut self, sticky: Sticky) -> Self {
        self.sticky = Some(sticky);
        self
    }

    pub fn render<F>(mut self, render: F) -> Self
    where
        F: Fn(&CellContext<'_, T>) -> Cell + 'static,
    {
        self.render = Some(Box::new(render));
        self
    }

    /// Cell for one row; without a renderer the node name is shown
    pub fn cell(&self, ctx: &CellContext<'_, T>) -> Cell {
        match &self.render {
            Some(render) => render(ctx),
            None => Cell::Text(ctx.node.name().to_string()),
        }
    }

    pub fn is_tree(&self) -> bool {
        self.is_tree.unwrap_or(false)
    }
}

/// Promote columns to sticky by key, then settle the tree column.
///
/// A listed column without its own marker becomes `Left` when it is the
/// first declared column and `Right` otherwise. Exactly one column ends up
/// as the tree column: the first one marked, else the first column.
pub fn resolve_columns<T: TreeGridNode>(
    mut columns: Vec<Column<T>>,
    sticky_keys: &[String],
) -> Vec<Column<T>> {
    for (index, column) in columns.iter_mut().enumerate() {
        if column.sticky.is_none() && sticky_keys.iter().any(|k| *k == column.key) {
            column.sticky = Some(if index == 0 { Sticky::Left } else { Sticky::Right });
        }
    }

    let tree_index = columns
        .iter()
        .position(|c| c.is_tree == Some(true))
        .unwrap_or(0);
    for (index, column) in columns.iter_mut().enumerate() {
        column.is_tree = Some(index == tree_index);
    }

    columns
}

/// Cumulative pin offsets per sticky column key
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StickyOffsets {
    pub left: HashMap<String, u16>,
    pub right: HashMap<String, u16>,
}

impl StickyOffsets {
    /// Edge and offset for a column, `None` when it is not sticky
    pub fn get(&self, key: &str) -> Option<(Sticky, u16)> {
        if let Some(offset) = self.left.get(key) {
            return Some((Sticky::Left, *offset));
        }
        self.right.get(key).map(|offset| (Sticky::Right, *offset))
    }
}

/// Left offsets accumulate in declared order, right offsets in reverse order.
/// Columns without a width contribute 0.
pub fn compute_offsets<T>(columns: &[Column<T>]) -> StickyOffsets {
    let mut offsets = StickyOffsets::default();

    let mut left = 0u16;
    for column in columns.iter().filter(|c| c.sticky == Some(Sticky::Left)) {
        offsets.left.insert(column.key.clone(), left);
        left = left.saturating_add(column.width.unwrap_or(0));
    }

    let mut right = 0u16;
    for column in columns.iter().rev().filter(|c| c.sticky == Some(Sticky::Right)) {
        offsets.right.insert(column.key.clone(), right);
        right = right.saturating_add(column.width.unwrap_or(0));
    }

    offsets
}

/// Sum of configured widths of every non-tree column
pub fn fixed_width_total<T>(columns: &[Column<T>]) -> u16 {
    columns
        .iter()
        .filter(|c| c.is_tree != Some(true))
        .fold(0u16, |total, c| total.saturating_add(c.width.unwrap_or(0)))
}

/// Explicit inner width, else fixed widths plus one
pub fn resolved_inner_width<T>(columns: &[Column<T>], explicit: Option<u16>) -> u16 {
    explicit.unwrap_or_else(|| fixed_width_total(columns).saturating_add(1).max(1))
}
