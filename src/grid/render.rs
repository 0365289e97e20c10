//! Tree-grid renderer
//!
//! [`TreeGrid`] composes the flattener, the filter engine, the navigator and
//! the sticky layout into what a host draws: a toolbar model, header cells and
//! the laid-out rows with their per-row state. It owns all filter and match
//! state of one mounted grid; dropping it is unmounting.

use std::collections::{HashMap, HashSet};

use super::cell::Cell;
use super::columns::{
    compute_offsets, resolve_columns, resolved_inner_width, CellContext, Column, Sticky,
    StickyOffsets, Title,
};
use super::filter::{error_count, tag_stats, FilterState, TagStat};
use super::navigator::MatchNavigator;
use super::tree::{flatten, laid_out, tag_of, TreeGridNode};
use crate::locale::{Labels, Locale};

/// Display parameters of one grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridOptions {
    pub locale: Locale,
    /// Viewport max height, in the host's units
    pub max_height: u16,
    /// Explicit inner width; default is the fixed column widths plus one
    pub inner_width: Option<u16>,
    /// Column keys to pin (first declared column left, the rest right)
    pub sticky_cols: Vec<String>,
    pub show_highlighter: bool,
    /// Scroll the outer viewport to the origin once after mounting
    pub scroll_to_origin_on_mount: bool,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            locale: Locale::En,
            max_height: 620,
            inner_width: None,
            sticky_cols: Vec::new(),
            show_highlighter: true,
            scroll_to_origin_on_mount: false,
        }
    }
}

/// Side effects the host performs at a rendering opportunity
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameEffect {
    ScrollToOrigin,
    ScrollIntoView(String),
}

/// A tag chip in the toolbar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagChip {
    pub tag: String,
    pub count: usize,
    pub selected: bool,
}

/// Everything the toolbar shows
#[derive(Debug, Clone)]
pub struct Toolbar {
    pub labels: &'static Labels,
    pub tags: Vec<TagChip>,
    pub keyword: String,
    pub error_only: bool,
    pub error_count: usize,
    pub match_text: String,
    /// Prev/next buttons are enabled
    pub can_navigate: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderCell {
    pub key: String,
    pub title: Title,
    /// `None` for the tree column, whose width is implicit
    pub width: Option<u16>,
    pub is_tree: bool,
    pub sticky: Option<(Sticky, u16)>,
}

/// One laid-out row and the attributes exposed for styling and testing
#[derive(Debug, Clone, PartialEq)]
pub struct GridRow {
    pub id: String,
    pub depth: usize,
    pub component_tag: String,
    pub error: bool,
    pub has_children: bool,
    pub open: bool,
    pub is_match: bool,
    pub is_active_match: bool,
    pub is_last_clicked: bool,
    pub cells: Vec<Cell>,
}

pub struct TreeGrid<T> {
    nodes: Vec<T>,
    columns: Vec<Column<T>>,
    offsets: StickyOffsets,
    options: GridOptions,

    filter: FilterState,
    navigator: MatchNavigator,
    open_overrides: HashMap<String, bool>,
    last_clicked_row_id: String,
    origin_scroll_pending: bool,

    // Derived from nodes/filter, rebuilt when those change
    tag_stats: Vec<TagStat>,
    error_count: usize,
    matched: HashSet<String>,
}

impl<T: TreeGridNode> TreeGrid<T> {
    /// Mount a grid: state starts empty and an initial visibility
    /// recomputation is scheduled.
    pub fn mount(nodes: Vec<T>, columns: Vec<Column<T>>, options: GridOptions) -> Self {
        let columns = resolve_columns(columns, &options.sticky_cols);
        let offsets = compute_offsets(&columns);
        let mut navigator = MatchNavigator::new();
        navigator.schedule_recompute();

        let mut grid = Self {
            nodes,
            columns,
            offsets,
            origin_scroll_pending: options.scroll_to_origin_on_mount,
            options,
            filter: FilterState::new(),
            navigator,
            open_overrides: HashMap::new(),
            last_clicked_row_id: String::new(),
            tag_stats: Vec::new(),
            error_count: 0,
            matched: HashSet::new(),
        };
        grid.rebuild_stats();
        grid.rebuild_matches();
        grid
    }

    // --- Inputs ---

    /// Replace the forest, keeping filters, disclosure overrides and the
    /// last clicked row (all keyed by id).
    pub fn set_nodes(&mut self, nodes: Vec<T>) {
        self.nodes = nodes;
        self.rebuild_stats();
        self.rebuild_matches();
        self.navigator.schedule_recompute();
    }

    pub fn set_columns(&mut self, columns: Vec<Column<T>>) {
        self.columns = resolve_columns(columns, &self.options.sticky_cols);
        self.offsets = compute_offsets(&self.columns);
    }

    pub fn set_sticky_cols(&mut self, sticky_cols: Vec<String>) {
        self.options.sticky_cols = sticky_cols;
        let columns = std::mem::take(&mut self.columns);
        self.set_columns(columns);
    }

    pub fn set_locale(&mut self, locale: Locale) {
        self.options.locale = locale;
    }

    pub fn set_show_highlighter(&mut self, show: bool) {
        self.options.show_highlighter = show;
    }

    // --- Filters ---

    pub fn toggle_tag(&mut self, tag: &str) {
        self.filter.toggle_tag(tag);
        self.on_filter_changed();
    }

    pub fn set_keyword(&mut self, keyword: impl Into<String>) {
        self.filter.keyword = keyword.into();
        self.on_filter_changed();
    }

    pub fn set_error_only(&mut self, error_only: bool) {
        self.filter.error_only = error_only;
        self.on_filter_changed();
    }

    pub fn clear_filters(&mut self) {
        self.filter.clear();
        self.on_filter_changed();
    }

    fn on_filter_changed(&mut self) {
        self.rebuild_matches();
        self.navigator.reset_active();
        self.navigator.schedule_recompute();
    }

    // --- Rows ---

    pub fn is_open(&self, node: &T) -> bool {
        self.open_overrides
            .get(node.id())
            .copied()
            .unwrap_or_else(|| node.open().unwrap_or(true))
    }

    /// Direct user toggle of a node's disclosure
    pub fn toggle_open(&mut self, id: &str) {
        let current = flatten(&self.nodes)
            .into_iter()
            .find(|f| f.node.id() == id)
            .map(|f| self.is_open(f.node));
        if let Some(open) = current {
            self.open_overrides.insert(id.to_string(), !open);
            self.navigator.schedule_recompute();
        }
    }

    pub fn click_row(&mut self, id: &str) {
        self.last_clicked_row_id = id.to_string();
    }

    // --- Navigation ---

    pub fn scroll_to_match(&mut self, index: isize) {
        self.navigator.scroll_to_match(index);
    }

    pub fn next_match(&mut self) {
        self.navigator.next_match();
    }

    pub fn prev_match(&mut self) {
        self.navigator.prev_match();
    }

    /// Ids of the matching rows that are laid out, in document order
    pub fn recompute_visible(&mut self) {
        let ids: Vec<String> = laid_out(&self.nodes, |n| self.is_open(n))
            .into_iter()
            .filter(|f| self.matched.contains(f.node.id()))
            .map(|f| f.node.id().to_string())
            .collect();
        tracing::debug!(visible = ids.len(), matched = self.matched.len(), "recomputed visible matches");
        self.navigator.set_visible(ids);
    }

    /// Run deferred work at a rendering opportunity.
    ///
    /// Performs at most one visibility recomputation no matter how many were
    /// scheduled, then hands back the scrolls the host must apply.
    pub fn on_frame(&mut self) -> Vec<FrameEffect> {
        let mut effects = Vec::new();
        if std::mem::take(&mut self.origin_scroll_pending) {
            effects.push(FrameEffect::ScrollToOrigin);
        }
        if self.navigator.take_recompute() {
            self.recompute_visible();
        }
        if let Some(id) = self.navigator.take_pending_scroll() {
            effects.push(FrameEffect::ScrollIntoView(id));
        }
        effects
    }

    // --- Queries ---

    pub fn nodes(&self) -> &[T] {
        &self.nodes
    }

    pub fn columns(&self) -> &[Column<T>] {
        &self.columns
    }

    pub fn options(&self) -> &GridOptions {
        &self.options
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn navigator(&self) -> &MatchNavigator {
        &self.navigator
    }

    pub fn tag_stats(&self) -> &[TagStat] {
        &self.tag_stats
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    pub fn has_any_filter(&self) -> bool {
        self.filter.has_any_filter()
    }

    pub fn is_match(&self, id: &str) -> bool {
        self.has_any_filter() && self.matched.contains(id)
    }

    pub fn active_match_id(&self) -> &str {
        self.navigator.active_match_id()
    }

    pub fn last_clicked_row_id(&self) -> &str {
        &self.last_clicked_row_id
    }

    pub fn inner_width(&self) -> u16 {
        resolved_inner_width(&self.columns, self.options.inner_width)
    }

    pub fn offsets(&self) -> &StickyOffsets {
        &self.offsets
    }

    // --- Render model ---

    /// Toolbar model, `None` when the highlighter is hidden
    pub fn toolbar(&self) -> Option<Toolbar> {
        if !self.options.show_highlighter {
            return None;
        }
        Some(Toolbar {
            labels: self.options.locale.labels(),
            tags: self
                .tag_stats
                .iter()
                .map(|s| TagChip {
                    tag: s.tag.clone(),
                    count: s.count,
                    selected: self.filter.selected_tags.contains(&s.tag),
                })
                .collect(),
            keyword: self.filter.keyword.clone(),
            error_only: self.filter.error_only,
            error_count: self.error_count,
            match_text: self.navigator.match_text(),
            can_navigate: self.navigator.has_visible_matches(),
        })
    }

    pub fn header(&self) -> Vec<HeaderCell> {
        self.columns
            .iter()
            .map(|c| HeaderCell {
                key: c.key.clone(),
                title: c.title.clone(),
                width: if c.is_tree() { None } else { Some(c.width.unwrap_or(0)) },
                is_tree: c.is_tree(),
                sticky: self.offsets.get(&c.key),
            })
            .collect()
    }

    /// Ids of the laid-out rows, without building any cells
    pub fn row_ids(&self) -> Vec<String> {
        laid_out(&self.nodes, |n| self.is_open(n))
            .into_iter()
            .map(|f| f.node.id().to_string())
            .collect()
    }

    /// Laid-out rows in document order; descendants of collapsed nodes are
    /// not produced at all.
    pub fn rows(&self) -> Vec<GridRow> {
        let active = self.active_match_id();
        laid_out(&self.nodes, |n| self.is_open(n))
            .into_iter()
            .map(|f| {
                let node = f.node;
                let is_match = self.is_match(node.id());
                let ctx = CellContext {
                    node,
                    depth: f.depth,
                    locale: self.options.locale,
                    is_match,
                    is_active_match: is_match && active == node.id(),
                    is_last_clicked: self.last_clicked_row_id == node.id(),
                };
                GridRow {
                    id: node.id().to_string(),
                    depth: f.depth,
                    component_tag: tag_of(node).to_string(),
                    error: node.error(),
                    has_children: !node.children().is_empty(),
                    open: self.is_open(node),
                    is_match,
                    is_active_match: ctx.is_active_match,
                    is_last_clicked: ctx.is_last_clicked,
                    cells: self.columns.iter().map(|c| c.cell(&ctx)).collect(),
                }
            })
            .collect()
    }

    fn rebuild_stats(&mut self) {
        let flat = flatten(&self.nodes);
        self.tag_stats = tag_stats(&flat);
        self.error_count = error_count(&flat);
    }

    fn rebuild_matches(&mut self) {
        let flat = flatten(&self.nodes);
        self.matched = self.filter.matched_ids(&flat);
    }
}
