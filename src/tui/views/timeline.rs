//! Span timeline view - one row per span with a duration bar

use std::path::{Path, PathBuf};

use chrono::Local;

use super::GridView;
use crate::config::TimelineConfig;
use crate::error::Result;
use crate::format::{format_duration, format_start_time};
use crate::grid::{flatten, Cell, Column, DurationBar, Title};
use crate::locale::Locale;
use crate::trace::{load_trace, normalize, sample_trace, time_window, TimelineNode};

pub struct TimelineView {
    source: Option<PathBuf>,
    config: TimelineConfig,
}

impl TimelineView {
    /// `None` shows the embedded sample trace
    pub fn new(source: Option<PathBuf>, config: TimelineConfig) -> Self {
        Self { source, config }
    }
}

impl GridView for TimelineView {
    type Node = TimelineNode;

    fn title(&self, locale: Locale) -> String {
        match &self.source {
            Some(path) => path.display().to_string(),
            None => locale.labels().sample_trace.to_string(),
        }
    }

    fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    fn load(&self) -> Result<Vec<TimelineNode>> {
        let raw = match &self.source {
            Some(path) => load_trace(path)?,
            None => sample_trace()?,
        };
        Ok(normalize(&raw).nodes)
    }

    fn columns(&self, nodes: &[TimelineNode], locale: Locale) -> Vec<Column<TimelineNode>> {
        timeline_columns(nodes, locale, &self.config)
    }

    fn scroll_to_origin(&self) -> bool {
        true
    }

    fn summary(&self, nodes: &[TimelineNode], locale: Locale) -> String {
        let (_, total_us) = time_window(nodes);
        format!(
            "{} {} │ {}",
            flatten(nodes).len(),
            locale.labels().spans,
            format_duration(total_us)
        )
    }
}

type TimelineColumn = Column<TimelineNode>;

/// Span (tree), timeline bar, service, host and start time
pub fn timeline_columns(
    nodes: &[TimelineNode],
    locale: Locale,
    config: &TimelineConfig,
) -> Vec<TimelineColumn> {
    let labels = locale.labels();
    let (start_us, total_us) = time_window(nodes);

    let span_title = config.span_title.as_deref().unwrap_or(labels.span);
    let start_title = config.start_title.as_deref().unwrap_or(labels.start_time);

    vec![
        TimelineColumn::new("span", span_title).tree(),
        TimelineColumn::new(
            "bar",
            Title::Scale {
                start: "0".to_string(),
                end: format_duration(total_us),
            },
        )
        .width(config.bar_width)
        .render(move |ctx| {
            let node = ctx.node;
            Cell::Bar(
                DurationBar::new(
                    node.start.saturating_sub(start_us),
                    node.duration,
                    total_us,
                    format_duration(node.duration),
                )
                .with_error(node.error),
            )
        }),
        TimelineColumn::new("service", labels.service)
            .width(config.service_width)
            .render(|ctx| Cell::Text(ctx.node.service_name.clone())),
        TimelineColumn::new("host", labels.host)
            .width(config.host_width)
            .render(|ctx| Cell::Text(ctx.node.hostname.clone())),
        TimelineColumn::new("start", start_title)
            .width(config.start_width)
            .render(|ctx| Cell::Text(format_start_time(ctx.node.start, &Local))),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{GridOptions, TreeGrid};

    #[test]
    fn test_sample_view_loads() {
        let view = TimelineView::new(None, TimelineConfig::default());
        let nodes = view.load().unwrap();
        assert_eq!(flatten(&nodes).len(), 17);
        assert_eq!(view.summary(&nodes, Locale::En), "17 spans │ 2.83s");
        assert_eq!(view.summary(&nodes, Locale::Zh), "17 个Span │ 2.83s");
        assert_eq!(view.title(Locale::En), "sample trace");
        assert_eq!(view.title(Locale::Zh), "示例调用链");
        assert!(view.source().is_none());
    }

    #[test]
    fn test_columns_and_bar_cells() {
        let view = TimelineView::new(None, TimelineConfig::default());
        let nodes = view.load().unwrap();
        let columns = view.columns(&nodes, Locale::En);
        let grid = TreeGrid::mount(nodes, columns, GridOptions::default());

        let header = grid.header();
        let keys: Vec<&str> = header.iter().map(|h| h.key.as_str()).collect();
        assert_eq!(keys, ["span", "bar", "service", "host", "start"]);
        assert!(header[0].is_tree);
        assert_eq!(
            header[1].title,
            Title::Scale {
                start: "0".to_string(),
                end: "2.83s".to_string()
            }
        );

        let rows = grid.rows();
        match &rows[0].cells[1] {
            Cell::Bar(bar) => {
                assert_eq!(bar.start_us, 0);
                assert_eq!(bar.total_us, 2_834_889);
                assert_eq!(bar.label, format_duration(bar.duration_us));
            }
            other => panic!("expected a bar, got {:?}", other),
        }
        assert_eq!(rows[0].cells[0], Cell::Text("/resource_aa request".to_string()));
        assert_eq!(rows[0].cells[2], Cell::Text("server_a".to_string()));
    }

    #[test]
    fn test_title_overrides_and_locale() {
        let config = TimelineConfig {
            span_title: Some("Call".to_string()),
            ..Default::default()
        };
        let columns = timeline_columns(&[], Locale::Zh, &config);
        assert_eq!(columns[0].title, Title::Plain("Call".to_string()));
        assert_eq!(columns[4].title, Title::Plain("起始时间".to_string()));
    }
}
