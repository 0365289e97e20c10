//! Datasets the viewer can show
//!
//! A view knows how to load its forest and which columns describe it; the
//! rest of the TUI works on any [`GridView`].

pub mod chain;
pub mod timeline;

use std::path::Path;

use crate::error::Result;
use crate::grid::{Column, TreeGridNode};
use crate::locale::Locale;

pub use chain::ChainView;
pub use timeline::TimelineView;

pub trait GridView {
    type Node: TreeGridNode + 'static;

    /// Shown in the title bar
    fn title(&self, locale: Locale) -> String;

    /// File to watch for changes, `None` for embedded data
    fn source(&self) -> Option<&Path>;

    fn load(&self) -> Result<Vec<Self::Node>>;

    /// Columns for a freshly loaded forest
    fn columns(&self, nodes: &[Self::Node], locale: Locale) -> Vec<Column<Self::Node>>;

    /// Columns pinned when the config lists none
    fn default_sticky(&self) -> &'static [&'static str] {
        &[]
    }

    /// Scroll the grid back to its origin once, right after mounting
    fn scroll_to_origin(&self) -> bool {
        false
    }

    /// One-line summary for the title bar
    fn summary(&self, nodes: &[Self::Node], locale: Locale) -> String;
}
