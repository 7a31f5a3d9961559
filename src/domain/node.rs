//! Organization chart nodes and forest traversal

use std::fmt;

use serde::{Deserialize, Serialize};
use termtree::Tree;

use crate::domain::entities::StaffRecord;

/// Ordered sequence of independent trees.
pub type Forest = Vec<OrganizationNode>;

/// A node in the organization chart.
///
/// Every node owns its record and its children by value. Subtrees that
/// appear under several parents are deep copies, so reordering one copy
/// never touches another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationNode {
    /// Same as `staff.id`
    pub id: String,
    pub staff: StaffRecord,
    /// Order is significant: it is the rendered and persisted order
    #[serde(default)]
    pub children: Vec<OrganizationNode>,
}

impl OrganizationNode {
    pub fn new(staff: StaffRecord) -> Self {
        Self {
            id: staff.id.clone(),
            staff,
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<OrganizationNode>) -> Self {
        self.children = children;
        self
    }

    /// Number of nodes in this subtree, including self.
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(OrganizationNode::size).sum::<usize>()
    }

    pub fn depth(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(OrganizationNode::depth)
            .max()
            .unwrap_or(0)
    }

    /// True if `id` is this node or one of its descendants.
    pub fn contains(&self, id: &str) -> bool {
        self.id == id || self.children.iter().any(|c| c.contains(id))
    }

    pub fn to_tree_string(&self) -> Tree<String> {
        let leaves: Vec<_> = self.children.iter().map(|c| c.to_tree_string()).collect();
        Tree::new(self.staff.to_string()).with_leaves(leaves)
    }
}

impl fmt::Display for OrganizationNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_tree_string())
    }
}

/// Read-only queries over a forest.
pub trait ForestExt {
    /// Pre-order, left-to-right traversal yielding `(depth, node)`.
    fn iter_nodes(&self) -> ForestIter<'_>;

    /// Total number of reachable nodes.
    fn node_count(&self) -> usize;

    /// Ids of all reachable nodes in pre-order (duplicates kept).
    fn node_ids(&self) -> Vec<String>;

    /// Depth of the deepest tree; 0 for an empty forest.
    fn depth(&self) -> usize;

    /// Every node carrying `id`, in pre-order.
    fn find_all(&self, id: &str) -> Vec<&OrganizationNode>;
}

impl ForestExt for [OrganizationNode] {
    fn iter_nodes(&self) -> ForestIter<'_> {
        ForestIter::new(self)
    }

    fn node_count(&self) -> usize {
        self.iter().map(OrganizationNode::size).sum()
    }

    fn node_ids(&self) -> Vec<String> {
        self.iter_nodes().map(|(_, n)| n.id.clone()).collect()
    }

    fn depth(&self) -> usize {
        self.iter().map(OrganizationNode::depth).max().unwrap_or(0)
    }

    fn find_all(&self, id: &str) -> Vec<&OrganizationNode> {
        self.iter_nodes()
            .filter(|(_, n)| n.id == id)
            .map(|(_, n)| n)
            .collect()
    }
}

/// Render a forest as one text tree per root.
pub fn render_forest(forest: &[OrganizationNode], title: &str) -> Tree<String> {
    let leaves: Vec<_> = forest.iter().map(|n| n.to_tree_string()).collect();
    Tree::new(title.to_string()).with_leaves(leaves)
}

pub struct ForestIter<'a> {
    stack: Vec<(usize, &'a OrganizationNode)>,
}

impl<'a> ForestIter<'a> {
    fn new(forest: &'a [OrganizationNode]) -> Self {
        // Push roots in reverse order for left-to-right traversal
        let stack = forest.iter().rev().map(|n| (0, n)).collect();
        Self { stack }
    }
}

impl<'a> Iterator for ForestIter<'a> {
    type Item = (usize, &'a OrganizationNode);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, node) = self.stack.pop()?;
        for child in node.children.iter().rev() {
            self.stack.push((depth + 1, child));
        }
        Some((depth, node))
    }
}
