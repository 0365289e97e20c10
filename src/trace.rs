//! Trace normalization
//!
//! Converts raw nested span records (service call trees with timestamps,
//! durations and status codes) into [`TimelineNode`] trees plus the time
//! window they cover.
//!
//! Parsing is tolerant: this feeds a best-effort visualization, so malformed
//! numbers become `0` and missing optional fields fall back to heuristics.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{read_file, Result};
use crate::grid::{flatten, TreeGridNode};

/// Placeholder address for spans that carry no hostname
pub const DEFAULT_HOSTNAME: &str = "10.88.127.255";

const SAMPLE_TRACE: &str = include_str!("../assets/sample-trace.json");

/// One span as supplied by the trace source
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawSpan {
    #[serde(default, alias = "apiName", deserialize_with = "lenient_string")]
    pub api_name: String,
    #[serde(default, alias = "callServiceType", deserialize_with = "lenient_string")]
    pub call_service_type: String,
    #[serde(default, alias = "operationName", deserialize_with = "lenient_string")]
    pub operation_name: String,
    #[serde(default, alias = "startTimeMicros", deserialize_with = "lenient_i64")]
    pub start_time_microsecond: i64,
    #[serde(default, alias = "durationMicros", deserialize_with = "lenient_i64")]
    pub duration_microseconds: i64,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub status: i64,
    #[serde(default, alias = "serviceName", skip_serializing_if = "Option::is_none")]
    pub service_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    #[serde(default, alias = "spanId", skip_serializing_if = "Option::is_none")]
    pub span_id: Option<String>,
    #[serde(default)]
    pub children: Vec<RawSpan>,
}

/// Normalized span, ready for the tree-grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineNode {
    pub id: String,
    pub name: String,
    /// Start, microseconds since the epoch
    pub start: i64,
    /// Duration in microseconds, never negative
    pub duration: i64,
    pub error: bool,
    pub component_tag: String,
    pub service_name: String,
    pub hostname: String,
    pub open: bool,
    pub children: Vec<TimelineNode>,
}

impl TreeGridNode for TimelineNode {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn error(&self) -> bool {
        self.error
    }

    fn component_tag(&self) -> &str {
        &self.component_tag
    }

    fn open(&self) -> Option<bool> {
        Some(self.open)
    }

    fn children(&self) -> &[Self] {
        &self.children
    }
}

/// Normalized forest and its time window
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedTrace {
    pub nodes: Vec<TimelineNode>,
    /// Earliest start over every node
    pub start_us: i64,
    /// Latest end minus earliest start, at least 1
    pub total_us: i64,
}

/// Normalize a raw forest.
///
/// Pure: ids come from `span_id` or from the node's position in the tree
/// (`node-0-2-1`), never from a counter, so the same input always yields
/// the same output.
pub fn normalize(forest: &[RawSpan]) -> NormalizedTrace {
    let mut seen = HashSet::new();
    let nodes: Vec<TimelineNode> = forest
        .iter()
        .enumerate()
        .map(|(index, span)| to_node(span, &mut vec![index], &mut seen))
        .collect();

    let (start_us, total_us) = time_window(&nodes);
    NormalizedTrace {
        nodes,
        start_us,
        total_us,
    }
}

/// `(min start, max(1, max end - min start))`; an empty forest is `(0, 1)`
pub fn time_window(nodes: &[TimelineNode]) -> (i64, i64) {
    let flat = flatten(nodes);
    let min = flat.iter().map(|f| f.node.start).min();
    let max = flat
        .iter()
        .map(|f| f.node.start.saturating_add(f.node.duration))
        .max();
    match (min, max) {
        (Some(min), Some(max)) => (min, max.saturating_sub(min).max(1)),
        _ => (0, 1),
    }
}

fn to_node(span: &RawSpan, path: &mut Vec<usize>, seen: &mut HashSet<String>) -> TimelineNode {
    let synthetic = || {
        let parts: Vec<String> = path.iter().map(|i| i.to_string()).collect();
        format!("node-{}", parts.join("-"))
    };
    let id = unique_id(non_empty(span.span_id.as_deref()), &synthetic(), seen);

    let mut children = Vec::with_capacity(span.children.len());
    for (index, child) in span.children.iter().enumerate() {
        path.push(index);
        children.push(to_node(child, path, seen));
        path.pop();
    }

    TimelineNode {
        id,
        name: span_name(span),
        start: span.start_time_microsecond,
        duration: span.duration_microseconds.max(0),
        error: span.status != 0,
        component_tag: component_tag(span),
        service_name: non_empty(span.service_name.as_deref())
            .map(str::to_string)
            .unwrap_or_else(|| guess_service_name(&span.api_name).to_string()),
        hostname: non_empty(span.hostname.as_deref())
            .unwrap_or(DEFAULT_HOSTNAME)
            .to_string(),
        open: true,
        children,
    }
}

/// First unused id among `span_id`, `span_id#<synthetic>`, then numbered
/// suffixes. Every candidate, synthetic ones included, is checked against
/// the ids already handed out in this forest.
fn unique_id(span_id: Option<&str>, synthetic: &str, seen: &mut HashSet<String>) -> String {
    let base = span_id.unwrap_or(synthetic);
    let id = if !seen.contains(base) {
        base.to_string()
    } else {
        let root = match span_id {
            Some(span_id) => format!("{}#{}", span_id, synthetic),
            None => synthetic.to_string(),
        };
        let mut candidate = root.clone();
        let mut n = 2;
        while seen.contains(&candidate) {
            candidate = format!("{}#{}", root, n);
            n += 1;
        }
        candidate
    };
    seen.insert(id.clone());
    id
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Display name: `"<api> request"` for request spans, else the operation,
/// else the api name
pub fn span_name(span: &RawSpan) -> String {
    if span.operation_name == "request" && !span.api_name.is_empty() {
        format!("{} {}", span.api_name, span.operation_name)
    } else if !span.operation_name.is_empty() {
        span.operation_name.clone()
    } else if !span.api_name.is_empty() {
        span.api_name.clone()
    } else {
        "unknown".to_string()
    }
}

/// Coarse category: the service-call type, else the operation prefix
pub fn component_tag(span: &RawSpan) -> String {
    let service_type = span.call_service_type.trim().to_lowercase();
    if !service_type.is_empty() {
        return service_type;
    }

    let op = span.operation_name.trim().to_lowercase();
    if op.is_empty() {
        return "unknown".to_string();
    }
    let prefix = if op.contains('.') {
        op.split('.').next()
    } else if op.contains('_') {
        op.split('_').next()
    } else {
        Some(op.as_str())
    };
    match prefix {
        Some(p) if !p.is_empty() => p.to_string(),
        _ => "unknown".to_string(),
    }
}

pub fn guess_service_name(api_name: &str) -> &'static str {
    if api_name.contains("_bb") {
        "server_b"
    } else if api_name.contains("_cc") {
        "server_c"
    } else {
        "server_a"
    }
}

/// Integer microseconds from a decimal string; anything unparsable is 0
pub fn parse_micros(text: &str) -> i64 {
    let text = text.trim();
    text.parse::<i64>()
        .ok()
        .or_else(|| {
            text.parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .map(|f| f as i64)
        })
        .unwrap_or(0)
}

fn lenient_i64<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<i64, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f as i64))
            .unwrap_or(0),
        Value::String(s) => parse_micros(&s),
        Value::Bool(b) => i64::from(b),
        _ => 0,
    })
}

fn lenient_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

/// Trace files hold either a forest or a single root span
#[derive(Deserialize)]
#[serde(untagged)]
enum TraceFile {
    Forest(Vec<RawSpan>),
    Single(Box<RawSpan>),
}

pub fn parse_trace(json: &str) -> Result<Vec<RawSpan>> {
    Ok(match serde_json::from_str::<TraceFile>(json)? {
        TraceFile::Forest(forest) => forest,
        TraceFile::Single(root) => vec![*root],
    })
}

pub fn load_trace(path: &Path) -> Result<Vec<RawSpan>> {
    let forest = parse_trace(&read_file(path)?)?;
    tracing::info!(path = %path.display(), roots = forest.len(), "loaded trace");
    Ok(forest)
}

/// The embedded sample trace
pub fn sample_trace() -> Result<Vec<RawSpan>> {
    parse_trace(SAMPLE_TRACE)
}
