//! Aligning a saved layout with the current roster.
//!
//! A layout is a snapshot; the roster keeps changing after it was saved.
//! Reconciliation keeps the hand-made arrangement for every member that is
//! still on the roster and:
//!
//! - drops nodes whose id left the roster, lifting their children into the
//!   dropped node's slot,
//! - refreshes name, department and contact of the remaining nodes,
//! - appends new members under every parent the tier rules would give them,
//!   or at the roots when none of those parents is part of the layout.

use std::collections::{HashMap, HashSet};

use itertools::Itertools;
use tracing::debug;

use crate::domain::builder::OrgTreeBuilder;
use crate::domain::entities::StaffRecord;
use crate::domain::node::{Forest, ForestExt, OrganizationNode};

/// What reconciliation changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Ids removed because they left the roster
    pub removed: Vec<String>,
    /// Ids appended because they joined the roster
    pub added: Vec<String>,
    /// Ids whose record payload changed
    pub updated: Vec<String>,
}

impl ReconcileReport {
    pub fn is_unchanged(&self) -> bool {
        self.removed.is_empty() && self.added.is_empty() && self.updated.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciled {
    pub forest: Forest,
    pub report: ReconcileReport,
}

pub fn reconcile(layout: &[OrganizationNode], records: &[StaffRecord]) -> Reconciled {
    let roster: HashMap<&str, &StaffRecord> =
        records.iter().map(|r| (r.id.as_str(), r)).collect();
    let mut report = ReconcileReport::default();

    let mut forest = prune(layout.to_vec(), &roster, &mut report);
    report.removed = report.removed.into_iter().unique().collect();
    report.updated = report.updated.into_iter().unique().collect();

    let mut present: HashSet<String> = forest.node_ids().into_iter().collect();
    let builder = OrgTreeBuilder::new();

    let newcomers = records
        .iter()
        .filter(|r| !present.contains(&r.id))
        .sorted_by_key(|r| r.position)
        .collect::<Vec<_>>();

    for record in newcomers {
        // Orphans stay out of the chart just like in a fresh build
        let Some(parents) = builder.canonical_parents(records, &record.id) else {
            continue;
        };
        let parents: Vec<String> = parents
            .into_iter()
            .filter(|p| present.contains(p))
            .collect();

        let node = OrganizationNode::new(record.clone());
        if parents.is_empty() {
            forest.push(node);
        } else {
            for parent in &parents {
                append_under(&mut forest, parent, &node);
            }
        }
        present.insert(record.id.clone());
        report.added.push(record.id.clone());
    }

    debug!(
        removed = report.removed.len(),
        added = report.added.len(),
        updated = report.updated.len(),
        "reconciled layout"
    );
    Reconciled { forest, report }
}

fn prune(
    nodes: Vec<OrganizationNode>,
    roster: &HashMap<&str, &StaffRecord>,
    report: &mut ReconcileReport,
) -> Vec<OrganizationNode> {
    let mut kept = Vec::with_capacity(nodes.len());
    for mut node in nodes {
        let children = prune(std::mem::take(&mut node.children), roster, report);
        match roster.get(node.id.as_str()) {
            Some(&current) => {
                if node.staff != *current {
                    node.staff = current.clone();
                    report.updated.push(node.id.clone());
                }
                node.children = children;
                kept.push(node);
            }
            None => {
                report.removed.push(node.id);
                kept.extend(children);
            }
        }
    }
    kept
}

/// Append a copy of `node` to every node carrying `parent_id`.
fn append_under(nodes: &mut [OrganizationNode], parent_id: &str, node: &OrganizationNode) {
    for candidate in nodes.iter_mut() {
        append_under(&mut candidate.children, parent_id, node);
        if candidate.id == parent_id {
            candidate.children.push(node.clone());
        }
    }
}
