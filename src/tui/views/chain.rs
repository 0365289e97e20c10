//! Chain metric view - aggregated call chains with ratios and costs

use std::path::{Path, PathBuf};

use super::GridView;
use crate::chain::{load_chain, max_cost, sample_chain, to_chain_forest, ChainNode};
use crate::error::Result;
use crate::format::{format_duration_us, format_percent};
use crate::grid::{flatten, Cell, Column, DurationBar, Title};
use crate::locale::Locale;

pub struct ChainView {
    source: Option<PathBuf>,
}

impl ChainView {
    pub fn new(source: Option<PathBuf>) -> Self {
        Self { source }
    }
}

impl GridView for ChainView {
    type Node = ChainNode;

    fn title(&self, locale: Locale) -> String {
        match &self.source {
            Some(path) => path.display().to_string(),
            None => locale.labels().sample_chain.to_string(),
        }
    }

    fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    fn load(&self) -> Result<Vec<ChainNode>> {
        let raw = match &self.source {
            Some(path) => load_chain(path)?,
            None => sample_chain()?,
        };
        Ok(to_chain_forest(&raw))
    }

    fn columns(&self, nodes: &[ChainNode], locale: Locale) -> Vec<Column<ChainNode>> {
        chain_columns(nodes, locale)
    }

    fn default_sticky(&self) -> &'static [&'static str] {
        &["action"]
    }

    fn summary(&self, nodes: &[ChainNode], locale: Locale) -> String {
        let labels = locale.labels();
        format!(
            "{} {} │ {} {}",
            flatten(nodes).len(),
            labels.nodes,
            labels.max,
            format_duration_us(max_cost(nodes))
        )
    }
}

fn hint(label: &str) -> Title {
    Title::WithHint(label.to_string())
}

type ChainColumn = Column<ChainNode>;

pub fn chain_columns(nodes: &[ChainNode], locale: Locale) -> Vec<ChainColumn> {
    let labels = locale.labels();
    let max_cost_us = max_cost(nodes).round() as i64;

    vec![
        ChainColumn::new("chain", labels.chain).tree(),
        ChainColumn::new("span-per-request", hint(labels.span_per_request))
            .width(22)
            .render(|ctx| {
                let n = ctx.node;
                Cell::Text(format!("{} / {}", n.span_count, format_percent(n.span_count_percentage)))
            }),
        ChainColumn::new("request-ratio", hint(labels.request_ratio))
            .width(24)
            .render(|ctx| {
                let n = ctx.node;
                Cell::Text(format!("{} / {}", n.trace_count, format_percent(n.trace_count_percentage)))
            }),
        ChainColumn::new("error-ratio", hint(labels.error_ratio))
            .width(28)
            .render(|ctx| {
                let n = ctx.node;
                Cell::Text(format!(
                    "{} / {}",
                    n.error_trace_count,
                    format_percent(n.error_trace_count_percentage)
                ))
            }),
        ChainColumn::new("cost", hint(labels.cost))
            .width(34)
            .render(move |ctx| {
                let n = ctx.node;
                Cell::Bar(
                    DurationBar::new(0, n.cost_us.round() as i64, max_cost_us, format_duration_us(n.cost_us))
                        .with_error(n.error),
                )
            }),
        ChainColumn::new("max-children", hint(labels.max_subtree_nodes))
            .width(20)
            .render(|ctx| Cell::Text(ctx.node.max_children_count.to_string())),
        ChainColumn::new("avg-network", hint(labels.avg_network_cost))
            .width(19)
            .render(|ctx| Cell::Text(format_duration_us(ctx.node.network_cost_us))),
        ChainColumn::new("avg-local-pure", hint(labels.avg_local_pure_cost))
            .width(22)
            .render(|ctx| Cell::Text(format_duration_us(ctx.node.local_pure_cost_us))),
        ChainColumn::new("mark", labels.mark).width(8).render(|_| Cell::Empty),
        ChainColumn::new("action", labels.action)
            .width(12)
            .render(|ctx| Cell::Action(ctx.locale.labels().view_span.to_string())),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{GridOptions, Sticky, TreeGrid};

    fn mounted() -> TreeGrid<ChainNode> {
        let view = ChainView::new(None);
        let nodes = view.load().unwrap();
        let columns = view.columns(&nodes, Locale::En);
        let options = GridOptions {
            sticky_cols: view.default_sticky().iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        };
        TreeGrid::mount(nodes, columns, options)
    }

    #[test]
    fn test_action_column_pinned_right() {
        let grid = mounted();
        let header = grid.header();
        let action = header.iter().find(|h| h.key == "action").unwrap();
        assert_eq!(action.sticky, Some((Sticky::Right, 0)));
        assert!(header[0].is_tree);
        assert_eq!(header.len(), 10);
    }

    #[test]
    fn test_root_cells() {
        let grid = mounted();
        let root = &grid.rows()[0];
        assert_eq!(root.cells[2], Cell::Text("1280 / 100.00%".to_string()));
        assert_eq!(root.cells[3], Cell::Text("32 / 2.50%".to_string()));
        assert_eq!(root.cells[5], Cell::Text("14".to_string()));
        assert_eq!(root.cells[6], Cell::Text("0us".to_string()));
        assert_eq!(root.cells[8], Cell::Empty);
        assert_eq!(root.cells[9], Cell::Action("View Span".to_string()));
        match &root.cells[4] {
            Cell::Bar(bar) => {
                assert_eq!(bar.duration_us, bar.total_us);
                assert_eq!(bar.label, "2.83s");
                assert!(bar.error);
            }
            other => panic!("expected a bar, got {:?}", other),
        }
    }

    #[test]
    fn test_action_label_follows_locale() {
        let mut grid = mounted();
        grid.set_locale(Locale::Zh);
        assert_eq!(grid.rows()[0].cells[9], Cell::Action("查看Span".to_string()));
    }
}
