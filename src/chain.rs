//! Chained-metric trees
//!
//! Aggregated call chains (span counts, request ratios, error ratios and
//! costs per chain node) adapted into the tree-grid node shape.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{read_file, Result};
use crate::grid::{flatten, TreeGridNode};

const SAMPLE_CHAIN: &str = include_str!("../assets/sample-chain.json");

/// One aggregated chain node as exported by the metrics backend
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainRawNode {
    pub node_id: String,
    pub display_name: String,
    pub api_name: String,
    pub span_count: u64,
    pub span_count_percentage: f64,
    pub trace_count: u64,
    pub trace_count_percentage: f64,
    pub error_trace_count: u64,
    pub error_trace_count_percentage: f64,
    pub cost_in_us: f64,
    /// Exported as a number or a numeric string
    pub max_children_count: serde_json::Value,
    pub network_cost_in_us: f64,
    pub local_pure_cost_in_us: f64,
    pub children: Vec<ChainRawNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainNode {
    pub id: String,
    pub name: String,
    pub error: bool,
    pub component_tag: String,
    pub span_count: u64,
    pub span_count_percentage: f64,
    pub trace_count: u64,
    pub trace_count_percentage: f64,
    pub error_trace_count: u64,
    pub error_trace_count_percentage: f64,
    pub cost_us: f64,
    pub max_children_count: u64,
    pub network_cost_us: f64,
    pub local_pure_cost_us: f64,
    pub children: Vec<ChainNode>,
}

impl TreeGridNode for ChainNode {
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
        Some(true)
    }

    fn children(&self) -> &[Self] {
        &self.children
    }
}

/// Tag from the api name prefix before the first `.` (else `_`)
pub fn api_tag(api_name: &str) -> String {
    let prefix = if api_name.contains('.') {
        api_name.split('.').next()
    } else if api_name.contains('_') {
        api_name.split('_').next()
    } else {
        Some(api_name)
    };
    match prefix {
        Some(p) if !p.is_empty() => p.to_string(),
        _ => "unknown".to_string(),
    }
}

fn children_count(value: &serde_json::Value) -> u64 {
    match value {
        serde_json::Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite() && *f > 0.0).map(|f| f as u64))
            .unwrap_or(0),
        serde_json::Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

/// Adapt one raw chain tree; `path` is the root's position in its forest.
/// Node ids are `<node_id>#<path>` since one node id can repeat along a chain.
pub fn to_chain_node(raw: &ChainRawNode, path: &mut Vec<usize>) -> ChainNode {
    let parts: Vec<String> = path.iter().map(|i| i.to_string()).collect();
    let mut children = Vec::with_capacity(raw.children.len());
    for (index, child) in raw.children.iter().enumerate() {
        path.push(index);
        children.push(to_chain_node(child, path));
        path.pop();
    }

    ChainNode {
        id: format!("{}#{}", raw.node_id, parts.join("-")),
        name: raw.display_name.clone(),
        error: raw.error_trace_count > 0,
        component_tag: api_tag(&raw.api_name),
        span_count: raw.span_count,
        span_count_percentage: raw.span_count_percentage,
        trace_count: raw.trace_count,
        trace_count_percentage: raw.trace_count_percentage,
        error_trace_count: raw.error_trace_count,
        error_trace_count_percentage: raw.error_trace_count_percentage,
        cost_us: raw.cost_in_us,
        max_children_count: children_count(&raw.max_children_count),
        network_cost_us: raw.network_cost_in_us,
        local_pure_cost_us: raw.local_pure_cost_in_us,
        children,
    }
}

pub fn to_chain_forest(raw: &[ChainRawNode]) -> Vec<ChainNode> {
    raw.iter()
        .enumerate()
        .map(|(index, node)| to_chain_node(node, &mut vec![index]))
        .collect()
}

/// Largest cost in the forest, the scale of every cost bar
pub fn max_cost(nodes: &[ChainNode]) -> f64 {
    flatten(nodes)
        .iter()
        .map(|f| f.node.cost_us)
        .fold(0.0, f64::max)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ChainFile {
    Forest(Vec<ChainRawNode>),
    Single(Box<ChainRawNode>),
}

pub fn parse_chain(json: &str) -> Result<Vec<ChainRawNode>> {
    Ok(match serde_json::from_str::<ChainFile>(json)? {
        ChainFile::Forest(forest) => forest,
        ChainFile::Single(root) => vec![*root],
    })
}

pub fn load_chain(path: &Path) -> Result<Vec<ChainRawNode>> {
    let forest = parse_chain(&read_file(path)?)?;
    tracing::info!(path = %path.display(), roots = forest.len(), "loaded chain metrics");
    Ok(forest)
}

pub fn sample_chain() -> Result<Vec<ChainRawNode>> {
    parse_chain(SAMPLE_CHAIN)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(node_id: &str, api: &str, errors: u64, cost: f64, children: Vec<ChainRawNode>) -> ChainRawNode {
        ChainRawNode {
            node_id: node_id.to_string(),
            display_name: format!("{} call", api),
            api_name: api.to_string(),
            error_trace_count: errors,
            cost_in_us: cost,
            children,
            ..Default::default()
        }
    }

    #[test]
    fn test_api_tag() {
        assert_eq!(api_tag("redis.get"), "redis");
        assert_eq!(api_tag("mysql_query"), "mysql");
        assert_eq!(api_tag("grpc"), "grpc");
        assert_eq!(api_tag(".x"), "unknown");
        assert_eq!(api_tag(""), "unknown");
    }

    #[test]
    fn test_ids_error_and_tags() {
        let forest = vec![raw(
            "n1",
            "http.get",
            0,
            10.0,
            vec![raw("n1", "redis.get", 3, 40.0, vec![]), raw("n2", "mysql_q", 0, 5.0, vec![])],
        )];
        let nodes = to_chain_forest(&forest);
        assert_eq!(nodes[0].id, "n1#0");
        assert_eq!(nodes[0].children[0].id, "n1#0-0");
        assert_eq!(nodes[0].children[1].id, "n2#0-1");
        assert!(!nodes[0].error);
        assert!(nodes[0].children[0].error);
        assert_eq!(nodes[0].children[1].component_tag, "mysql");
        assert_eq!(max_cost(&nodes), 40.0);
    }

    #[test]
    fn test_max_children_count_lenient() {
        let json = r#"[{"node_id":"a","max_children_count":"7","children":[
            {"node_id":"b","max_children_count":3},{"node_id":"c","max_children_count":"x"}]}]"#;
        let nodes = to_chain_forest(&parse_chain(json).unwrap());
        assert_eq!(nodes[0].max_children_count, 7);
        assert_eq!(nodes[0].children[0].max_children_count, 3);
        assert_eq!(nodes[0].children[1].max_children_count, 0);
    }

    #[test]
    fn test_empty_forest_cost() {
        assert_eq!(max_cost(&[]), 0.0);
    }

    #[test]
    fn test_sample_chain_parses() {
        let nodes = to_chain_forest(&sample_chain().unwrap());
        assert_eq!(nodes.len(), 1);
        assert!(flatten(&nodes).len() > 1);
        assert!(max_cost(&nodes) > 0.0);
    }
}
