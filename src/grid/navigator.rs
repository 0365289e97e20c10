//! Match navigator
//!
//! A node can match yet sit inside a collapsed ancestor. The navigator only
//! cycles through matches that are currently laid out, and keeps a cyclic
//! "active match" cursor over them.
//!
//! Visibility recomputation and scrolling are deferred: callers schedule them
//! and the host runs them at its next rendering opportunity. Several schedules
//! before that opportunity collapse into one recomputation.

/// Wrap any integer index into `[0, len)`, forward and backward.
///
/// `len` must be non-zero.
pub fn wrap_index(index: isize, len: usize) -> usize {
    index.rem_euclid(len as isize) as usize
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchNavigator {
    active_index: usize,
    visible_ids: Vec<String>,
    recompute_pending: bool,
    pending_scroll: Option<String>,
}

impl MatchNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_index(&self) -> usize {
        self.active_index
    }

    pub fn visible_ids(&self) -> &[String] {
        &self.visible_ids
    }

    pub fn has_visible_matches(&self) -> bool {
        !self.visible_ids.is_empty()
    }

    /// Request a visibility recomputation at the next rendering opportunity
    pub fn schedule_recompute(&mut self) {
        self.recompute_pending = true;
    }

    pub fn is_recompute_pending(&self) -> bool {
        self.recompute_pending
    }

    /// Consume the pending recompute request, if any
    pub fn take_recompute(&mut self) -> bool {
        std::mem::take(&mut self.recompute_pending)
    }

    pub fn reset_active(&mut self) {
        self.active_index = 0;
    }

    /// Install a freshly computed list of laid-out matches (document order).
    ///
    /// An index past the end wraps to the first match, never clamps to last.
    pub fn set_visible(&mut self, ids: Vec<String>) {
        self.visible_ids = ids;
        if self.visible_ids.is_empty() || self.active_index >= self.visible_ids.len() {
            self.active_index = 0;
        }
    }

    /// Make match `index` (wrapped) active and queue a scroll to its row.
    ///
    /// Returns the id that will be scrolled to, or `None` when there are no
    /// visible matches.
    pub fn scroll_to_match(&mut self, index: isize) -> Option<&str> {
        if self.visible_ids.is_empty() {
            return None;
        }
        let safe_index = wrap_index(index, self.visible_ids.len());
        self.active_index = safe_index;
        let id = self.visible_ids[safe_index].clone();
        self.pending_scroll = Some(id);
        self.pending_scroll.as_deref()
    }

    pub fn next_match(&mut self) -> Option<&str> {
        self.scroll_to_match(self.active_index as isize + 1)
    }

    pub fn prev_match(&mut self) -> Option<&str> {
        self.scroll_to_match(self.active_index as isize - 1)
    }

    pub fn take_pending_scroll(&mut self) -> Option<String> {
        self.pending_scroll.take()
    }

    /// Identifier of the active match, or `""` with no visible matches
    pub fn active_match_id(&self) -> &str {
        match self.visible_ids.len() {
            0 => "",
            len => &self.visible_ids[self.active_index.min(len - 1)],
        }
    }

    /// `"X/Y"` counter text, `"0/0"` when empty
    pub fn match_text(&self) -> String {
        match self.visible_ids.len() {
            0 => "0/0".to_string(),
            total => format!("{}/{}", self.active_index + 1, total),
        }
    }
}
