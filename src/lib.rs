//! spanview - Tree-grid exploration of distributed-tracing spans
//!
//! Normalize nested span records, flatten them into a tree-grid, highlight
//! spans by component tag, keyword or error status, and step through the
//! matches that are currently laid out.
//!
//! # Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`trace`] | Raw span parsing and normalization into [`TimelineNode`] trees |
//! | [`grid`] | Renderer-agnostic tree-grid: flattening, filters, match navigation, sticky columns |
//! | [`chain`] | Aggregated call-chain metrics as a second kind of grid node |
//! | [`format`] | Duration, percentage and timestamp formatting |
//! | [`tui`] | Terminal viewer built on ratatui |
//!
//! # Quick Start
//!
//! ```no_run
//! use spanview::grid::{Column, GridOptions, TreeGrid};
//! use spanview::trace::{normalize, sample_trace};
//!
//! let trace = normalize(&sample_trace().unwrap());
//! let columns = vec![Column::new("span", "Span")];
//! let mut grid = TreeGrid::mount(trace.nodes, columns, GridOptions::default());
//!
//! grid.set_error_only(true);
//! grid.on_frame();
//! println!("{} error spans laid out", grid.navigator().visible_ids().len());
//! ```

pub mod chain;
pub mod config;
pub mod error;
pub mod format;
pub mod grid;
pub mod locale;
pub mod trace;
pub mod tui;

pub use config::Config;
pub use error::{Error, Result};
pub use grid::{Column, GridOptions, TreeGrid, TreeGridNode};
pub use locale::Locale;
pub use trace::{normalize, NormalizedTrace, RawSpan, TimelineNode};
