//! Filter & match engine
//!
//! Three independently toggleable criteria (tag selection, keyword, error-only)
//! combined as a union: a node matches when ANY enabled criterion matches.
//! With no criterion enabled nothing matches at all.

use std::collections::{BTreeSet, HashMap, HashSet};

use serde::Serialize;

use super::tree::{tag_of, FlatNode, TreeGridNode};

/// Interactive filter criteria of one grid
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub selected_tags: BTreeSet<String>,
    pub keyword: String,
    pub error_only: bool,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keyword as compared: trimmed and lower-cased
    pub fn normalized_keyword(&self) -> String {
        self.keyword.trim().to_lowercase()
    }

    pub fn has_any_filter(&self) -> bool {
        !self.selected_tags.is_empty() || !self.normalized_keyword().is_empty() || self.error_only
    }

    /// Click-to-add, click-again-to-remove
    pub fn toggle_tag(&mut self, tag: &str) {
        if !self.selected_tags.remove(tag) {
            self.selected_tags.insert(tag.to_string());
        }
    }

    pub fn clear(&mut self) {
        self.selected_tags.clear();
        self.keyword.clear();
        self.error_only = false;
    }

    /// Ids of every node in `flat` matching at least one enabled criterion
    pub fn matched_ids<T: TreeGridNode>(&self, flat: &[FlatNode<'_, T>]) -> HashSet<String> {
        let mut set = HashSet::new();
        if !self.has_any_filter() {
            return set;
        }

        let keyword = self.normalized_keyword();
        let enable_tag = !self.selected_tags.is_empty();
        let enable_keyword = !keyword.is_empty();

        for FlatNode { node, .. } in flat {
            let tag_match = enable_tag && self.selected_tags.contains(tag_of(*node));
            let keyword_match = enable_keyword && node.name().to_lowercase().contains(&keyword);
            let error_match = self.error_only && node.error();

            if tag_match || keyword_match || error_match {
                set.insert(node.id().to_string());
            }
        }

        set
    }
}

/// Count of nodes carrying one component tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagStat {
    pub tag: String,
    pub count: usize,
}

/// Tag counts, most frequent first, ties by ascending tag name.
///
/// This order is the toolbar chip order, so it must stay stable for the
/// same data.
pub fn tag_stats<T: TreeGridNode>(flat: &[FlatNode<'_, T>]) -> Vec<TagStat> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for FlatNode { node, .. } in flat {
        *counts.entry(tag_of(*node)).or_insert(0) += 1;
    }

    let mut stats: Vec<TagStat> = counts
        .into_iter()
        .map(|(tag, count)| TagStat {
            tag: tag.to_string(),
            count,
        })
        .collect();
    stats.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.tag.cmp(&b.tag)));
    stats
}

pub fn error_count<T: TreeGridNode>(flat: &[FlatNode<'_, T>]) -> usize {
    flat.iter().filter(|f| f.node.error()).count()
}

#[cfg(test)]
mod tests {
    use super::super::tree::testing::*;
    use super::super::tree::flatten;
    use super::*;
    use proptest::prelude::*;

    fn forest() -> Vec<TestNode> {
        vec![node(
            "root",
            "http",
            vec![
                named(leaf("sleep", "sleep"), "Sleep"),
                failing(named(leaf("call", "http"), "http_call")),
                node(
                    "inner",
                    "redis",
                    vec![failing(named(leaf("cmd", "redis"), "redis.command"))],
                ),
            ],
        )]
    }

    fn sorted(set: HashSet<String>) -> Vec<String> {
        let mut v: Vec<String> = set.into_iter().collect();
        v.sort();
        v
    }

    #[test]
    fn test_no_filter_matches_nothing() {
        let forest = forest();
        let flat = flatten(&forest);
        let filter = FilterState::new();
        assert!(!filter.has_any_filter());
        assert!(filter.matched_ids(&flat).is_empty());
    }

    #[test]
    fn test_whitespace_keyword_is_not_a_filter() {
        let filter = FilterState {
            keyword: "   ".to_string(),
            ..Default::default()
        };
        assert!(!filter.has_any_filter());
    }

    #[test]
    fn test_tag_filter() {
        let forest = forest();
        let flat = flatten(&forest);
        let mut filter = FilterState::new();
        filter.toggle_tag("redis");
        assert_eq!(sorted(filter.matched_ids(&flat)), ["cmd", "inner"]);
    }

    #[test]
    fn test_toggle_tag_twice_removes() {
        let mut filter = FilterState::new();
        filter.toggle_tag("redis");
        filter.toggle_tag("http");
        filter.toggle_tag("redis");
        assert_eq!(filter.selected_tags.len(), 1);
        assert!(filter.selected_tags.contains("http"));
    }

    #[test]
    fn test_keyword_is_trimmed_and_case_insensitive() {
        let forest = forest();
        let flat = flatten(&forest);
        let filter = FilterState {
            keyword: "  SLEEP ".to_string(),
            ..Default::default()
        };
        assert_eq!(sorted(filter.matched_ids(&flat)), ["sleep"]);
    }

    #[test]
    fn test_error_only() {
        let forest = forest();
        let flat = flatten(&forest);
        let filter = FilterState {
            error_only: true,
            ..Default::default()
        };
        assert_eq!(sorted(filter.matched_ids(&flat)), ["call", "cmd"]);
    }

    #[test]
    fn test_criteria_are_a_union() {
        let forest = forest();
        let flat = flatten(&forest);
        let mut filter = FilterState {
            keyword: "sleep".to_string(),
            error_only: true,
            ..Default::default()
        };
        filter.toggle_tag("redis");
        assert_eq!(sorted(filter.matched_ids(&flat)), ["call", "cmd", "inner", "sleep"]);
    }

    #[test]
    fn test_empty_tag_matches_unknown_chip() {
        let forest = vec![leaf("x", ""), leaf("y", "http")];
        let flat = flatten(&forest);
        let mut filter = FilterState::new();
        filter.toggle_tag("unknown");
        assert_eq!(sorted(filter.matched_ids(&flat)), ["x"]);
    }

    #[test]
    fn test_tag_stats_ranking() {
        let forest = vec![leaf("1", "a"), leaf("2", "a"), leaf("3", "b")];
        let flat = flatten(&forest);
        assert_eq!(
            tag_stats(&flat),
            vec![
                TagStat { tag: "a".to_string(), count: 2 },
                TagStat { tag: "b".to_string(), count: 1 },
            ]
        );
    }

    #[test]
    fn test_tag_stats_ties_are_lexicographic() {
        let forest = vec![leaf("1", "zeta"), leaf("2", "alpha"), leaf("3", "mid"), leaf("4", "")];
        let flat = flatten(&forest);
        let tags: Vec<String> = tag_stats(&flat).into_iter().map(|s| s.tag).collect();
        assert_eq!(tags, ["alpha", "mid", "unknown", "zeta"]);
    }

    #[test]
    fn test_error_count() {
        let forest = forest();
        assert_eq!(error_count(&flatten(&forest)), 2);
    }

    fn arb_forest() -> impl Strategy<Value = Vec<TestNode>> {
        let leaf_strategy = (0u32..1000, prop::sample::select(vec!["a", "b", "c", ""]), any::<bool>())
            .prop_map(|(n, tag, err)| TestNode {
                id: format!("leaf-{}", n),
                name: format!("op {} {}", tag, n),
                error: err,
                tag: tag.to_string(),
                open: None,
                children: Vec::new(),
            });
        let tree = leaf_strategy.prop_recursive(4, 32, 4, |inner| {
            (prop::collection::vec(inner, 0..4), prop::sample::select(vec!["a", "b", "c"]), any::<bool>())
                .prop_map(|(children, tag, err)| TestNode {
                    id: String::new(),
                    name: format!("parent {}", tag),
                    error: err,
                    tag: tag.to_string(),
                    open: None,
                    children,
                })
        });
        prop::collection::vec(tree, 0..4).prop_map(|mut forest| {
            // Assign unique ids in pre-order
            let mut next = 0usize;
            let mut stack: Vec<&mut TestNode> = forest.iter_mut().collect();
            while let Some(n) = stack.pop() {
                n.id = format!("n{}", next);
                next += 1;
                stack.extend(n.children.iter_mut());
            }
            forest
        })
    }

    proptest! {
        #[test]
        fn prop_enabling_a_criterion_only_grows_matches(
            forest in arb_forest(),
            tag in prop::sample::select(vec!["a", "b", "c", "unknown"]),
            keyword in prop::sample::select(vec!["", "op", "parent", "b 1", "zzz"]),
            error_only in any::<bool>(),
        ) {
            let flat = flatten(&forest);
            let base = FilterState { keyword: keyword.to_string(), error_only, ..Default::default() };
            let base_ids = base.matched_ids(&flat);

            let mut with_tag = base.clone();
            with_tag.toggle_tag(tag);
            prop_assert!(base_ids.is_subset(&with_tag.matched_ids(&flat)));

            let with_error = FilterState { error_only: true, ..base.clone() };
            prop_assert!(base_ids.is_subset(&with_error.matched_ids(&flat)));

            let mut with_keyword = base.clone();
            with_keyword.keyword = "op".to_string();
            if base.normalized_keyword().is_empty() {
                prop_assert!(base_ids.is_subset(&with_keyword.matched_ids(&flat)));
            }
        }

        #[test]
        fn prop_empty_filter_matches_nothing(forest in arb_forest()) {
            let flat = flatten(&forest);
            prop_assert!(FilterState::new().matched_ids(&flat).is_empty());
        }

        #[test]
        fn prop_tag_stats_sum_to_node_count(forest in arb_forest()) {
            let flat = flatten(&forest);
            let total: usize = tag_stats(&flat).iter().map(|s| s.count).sum();
            prop_assert_eq!(total, flat.len());
        }
    }
}
