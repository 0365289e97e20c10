//! Hierarchical tree-grid engine
//!
//! Renderer-agnostic core of the viewer:
//! - `tree`: the node shape every grid consumes, plus pre-order flattening
//! - `filter`: tag / keyword / error-only matching and tag statistics
//! - `navigator`: the cyclic cursor over matches that are laid out
//! - `columns`: column config and sticky offsets
//! - `render`: [`TreeGrid`], which composes all of the above

pub mod cell;
pub mod columns;
pub mod filter;
pub mod navigator;
pub mod render;
pub mod tree;

pub use cell::{Cell, DurationBar};
pub use columns::{compute_offsets, resolve_columns, CellContext, Column, Sticky, StickyOffsets, Title};
pub use filter::{FilterState, TagStat};
pub use navigator::{wrap_index, MatchNavigator};
pub use render::{FrameEffect, GridOptions, GridRow, HeaderCell, TagChip, Toolbar, TreeGrid};
pub use tree::{flatten, laid_out, FlatNode, TreeGridNode};
