//! Generic tree node shape and pre-order traversals
//!
//! Any domain entity (a trace span, a chained-metric node, ...) enters the
//! grid through [`TreeGridNode`]. Adapting into this shape is owned by the
//! call site; the grid never inspects anything else.

/// Shape every tree-grid node must provide
pub trait TreeGridNode: Sized {
    /// Identifier, unique within one forest
    fn id(&self) -> &str;
    fn name(&self) -> &str;
    fn error(&self) -> bool;
    fn component_tag(&self) -> &str;
    /// Initial disclosure state; `None` means expanded
    fn open(&self) -> Option<bool> {
        None
    }
    fn children(&self) -> &[Self];
}

/// Component tag with the empty tag reported as `unknown`
pub fn tag_of<T: TreeGridNode>(node: &T) -> &str {
    let tag = node.component_tag();
    if tag.is_empty() {
        "unknown"
    } else {
        tag
    }
}

/// One entry of a flattened forest
#[derive(Debug)]
pub struct FlatNode<'a, T> {
    pub node: &'a T,
    pub depth: usize,
}

// Manual impls: derive would require `T: Clone`/`T: Copy`.
impl<T> Clone for FlatNode<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for FlatNode<'_, T> {}

/// Depth-annotated pre-order list of the whole forest (roots at depth 0)
pub fn flatten<T: TreeGridNode>(nodes: &[T]) -> Vec<FlatNode<'_, T>> {
    walk(nodes, |_| true)
}

/// Pre-order list of the rows that are laid out: a node's children are
/// visited only while `is_open(node)` holds.
pub fn laid_out<'a, T, F>(nodes: &'a [T], is_open: F) -> Vec<FlatNode<'a, T>>
where
    T: TreeGridNode,
    F: Fn(&T) -> bool,
{
    walk(nodes, is_open)
}

fn walk<'a, T, F>(nodes: &'a [T], descend: F) -> Vec<FlatNode<'a, T>>
where
    T: TreeGridNode,
    F: Fn(&T) -> bool,
{
    let mut list = Vec::new();
    // Explicit stack, children pushed in reverse to keep natural order
    let mut stack: Vec<FlatNode<'a, T>> = nodes
        .iter()
        .rev()
        .map(|node| FlatNode { node, depth: 0 })
        .collect();

    while let Some(entry) = stack.pop() {
        list.push(entry);
        if !entry.node.children().is_empty() && descend(entry.node) {
            stack.extend(entry.node.children().iter().rev().map(|child| FlatNode {
                node: child,
                depth: entry.depth + 1,
            }));
        }
    }

    list
}
