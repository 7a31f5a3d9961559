//! Manual reordering of an organization forest.

use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::node::{Forest, OrganizationNode};

/// Sentinel used on the wire for the forest root list.
pub const ROOT: &str = "root";

/// Container a node is moved out of or into.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParentRef {
    /// The forest's root list
    Root,
    /// The children of the node with this id
    Node(String),
}

impl ParentRef {
    pub fn node(id: impl Into<String>) -> Self {
        ParentRef::Node(id.into())
    }
}

impl fmt::Display for ParentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParentRef::Root => f.write_str(ROOT),
            ParentRef::Node(id) => f.write_str(id),
        }
    }
}

impl FromStr for ParentRef {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(if s == ROOT {
            ParentRef::Root
        } else {
            ParentRef::Node(s.to_string())
        })
    }
}

/// A single drag-and-drop step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Move {
    pub node_id: String,
    pub from: ParentRef,
    pub from_index: usize,
    pub to: ParentRef,
    pub to_index: usize,
}

/// Index path from the root list down to a node: `[root_idx, child_idx, ...]`.
type NodePath = Vec<usize>;

/// Pre-order paths of every node with the given id.
fn paths_of(forest: &[OrganizationNode], id: &str) -> Vec<NodePath> {
    fn walk(nodes: &[OrganizationNode], id: &str, prefix: &mut NodePath, out: &mut Vec<NodePath>) {
        for (i, node) in nodes.iter().enumerate() {
            prefix.push(i);
            if node.id == id {
                out.push(prefix.clone());
            }
            walk(&node.children, id, prefix, out);
            prefix.pop();
        }
    }
    let mut out = Vec::new();
    walk(forest, id, &mut Vec::new(), &mut out);
    out
}

fn node_at<'a>(forest: &'a [OrganizationNode], path: &[usize]) -> Option<&'a OrganizationNode> {
    let (first, rest) = path.split_first()?;
    let mut node = forest.get(*first)?;
    for &i in rest {
        node = node.children.get(i)?;
    }
    Some(node)
}

fn children_at<'a>(forest: &'a mut Forest, path: &[usize]) -> Option<&'a mut Vec<OrganizationNode>> {
    let mut list = forest;
    for &i in path {
        list = &mut list.get_mut(i)?.children;
    }
    Some(list)
}

/// Path of the container (empty for the root list) holding `node_id` at `index`.
///
/// When an id occurs several times (replicated department subtrees), the
/// first occurrence in pre-order whose child at `index` matches wins.
fn locate_source(forest: &[OrganizationNode], mv: &Move) -> DomainResult<NodePath> {
    let matches_child = |list: &[OrganizationNode]| {
        list.get(mv.from_index)
            .map(|n| n.id == mv.node_id)
            .unwrap_or(false)
    };

    match &mv.from {
        ParentRef::Root => {
            if matches_child(forest) {
                Ok(Vec::new())
            } else {
                Err(DomainError::NotFound {
                    what: "node",
                    id: format!("{} at {}[{}]", mv.node_id, ROOT, mv.from_index),
                })
            }
        }
        ParentRef::Node(parent_id) => {
            let candidates = paths_of(forest, parent_id);
            if candidates.is_empty() {
                return Err(DomainError::NotFound {
                    what: "parent",
                    id: parent_id.clone(),
                });
            }
            candidates
                .into_iter()
                .find(|p| node_at(forest, p).map(|n| matches_child(&n.children)).unwrap_or(false))
                .ok_or_else(|| DomainError::NotFound {
                    what: "node",
                    id: format!("{} at {}[{}]", mv.node_id, parent_id, mv.from_index),
                })
        }
    }
}

/// Move a node between (or within) child lists.
///
/// The node at `from_index` under `from` must carry `node_id`. After it is
/// removed, it is inserted at `to_index` under `to`. The input forest is not
/// touched; on error nothing changes.
///
/// A move is rejected when `to` is the moved node or any id inside its
/// subtree, whichever copy of that id would be picked. If `to` names the
/// same container as `from` the source instance is used, otherwise the first
/// occurrence of `to` in pre-order.
pub fn move_node(forest: &[OrganizationNode], mv: &Move) -> DomainResult<Forest> {
    let source = locate_source(forest, mv)?;
    let mut moved_path = source.clone();
    moved_path.push(mv.from_index);

    // Copies of the moved subtree exist elsewhere when heads are replicated,
    // so the check is by id, not by path
    if let ParentRef::Node(id) = &mv.to {
        let moved = node_at(forest, &moved_path).ok_or_else(|| DomainError::NotFound {
            what: "node",
            id: mv.node_id.clone(),
        })?;
        if moved.contains(id) {
            return Err(DomainError::InvalidMove {
                node_id: mv.node_id.clone(),
                target: id.clone(),
            });
        }
    }

    let target: NodePath = match &mv.to {
        ParentRef::Root => Vec::new(),
        ParentRef::Node(id) if mv.from == mv.to => {
            debug!(parent = %id, "move within same parent");
            source.clone()
        }
        ParentRef::Node(id) => paths_of(forest, id)
            .into_iter()
            .next()
            .ok_or_else(|| DomainError::NotFound {
                what: "parent",
                id: id.clone(),
            })?,
    };

    let mut next: Forest = forest.to_vec();
    let removed = children_at(&mut next, &source)
        .map(|list| list.remove(mv.from_index))
        .ok_or_else(|| DomainError::NotFound {
            what: "parent",
            id: mv.from.to_string(),
        })?;

    // Removing a preceding sibling shifts the target path one step left
    let mut target = target;
    if source.len() < target.len()
        && target[..source.len()] == source[..]
        && target[source.len()] > mv.from_index
    {
        target[source.len()] -= 1;
    }

    let list = children_at(&mut next, &target).ok_or_else(|| DomainError::NotFound {
        what: "parent",
        id: mv.to.to_string(),
    })?;
    if mv.to_index > list.len() {
        return Err(DomainError::IndexOutOfRange {
            parent: mv.to.to_string(),
            index: mv.to_index,
            len: list.len(),
        });
    }
    list.insert(mv.to_index, removed);

    debug!(
        node = %mv.node_id,
        from = %mv.from,
        from_index = mv.from_index,
        to = %mv.to,
        to_index = mv.to_index,
        "moved node"
    );
    Ok(next)
}
