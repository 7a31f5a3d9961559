//! Tier-based organization tree construction.
//!
//! Parent/child edges are not stored anywhere; they are derived from each
//! record's position tier and department:
//!
//! - department heads get the staff of their own department,
//! - every vice-principal gets a copy of every department head,
//! - every principal gets the vice-principals, or the department heads
//!   when there is no vice-principal.
//!
//! The forest is rooted at the highest non-empty tier among principal,
//! vice-principal and department head. Staff whose department has no head
//! are dropped; see [`orphans`].

use std::collections::HashSet;

use tracing::{debug, instrument};

use crate::domain::entities::{Position, StaffRecord};
use crate::domain::node::{Forest, OrganizationNode};

/// Records split by tier, input order preserved within each tier.
#[derive(Debug, Default)]
struct Tiers<'a> {
    principals: Vec<&'a StaffRecord>,
    vice_principals: Vec<&'a StaffRecord>,
    department_heads: Vec<&'a StaffRecord>,
    staff: Vec<&'a StaffRecord>,
}

impl<'a> Tiers<'a> {
    fn partition(records: &'a [StaffRecord]) -> Self {
        let mut tiers = Tiers::default();
        for record in records {
            match record.position {
                Position::Principal => tiers.principals.push(record),
                Position::VicePrincipal => tiers.vice_principals.push(record),
                Position::DepartmentHead => tiers.department_heads.push(record),
                Position::Staff => tiers.staff.push(record),
            }
        }
        tiers
    }
}

/// Builds the canonical organization forest from a flat roster.
#[derive(Debug, Default, Clone, Copy)]
pub struct OrgTreeBuilder;

impl OrgTreeBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Build the forest. Never fails: missing tiers shift the roots down,
    /// unmatched staff are left out.
    #[instrument(level = "debug", skip_all, fields(records = records.len()))]
    pub fn build(&self, records: &[StaffRecord]) -> Forest {
        let tiers = Tiers::partition(records);

        let head_nodes: Vec<OrganizationNode> = tiers
            .department_heads
            .iter()
            .map(|head| {
                let members = tiers
                    .staff
                    .iter()
                    .filter(|s| s.department == head.department)
                    .map(|s| OrganizationNode::new((*s).clone()))
                    .collect();
                OrganizationNode::new((*head).clone()).with_children(members)
            })
            .collect();

        // Each vice-principal owns its own copy of the department subtrees
        let vice_nodes: Vec<OrganizationNode> = tiers
            .vice_principals
            .iter()
            .map(|vp| OrganizationNode::new((*vp).clone()).with_children(head_nodes.clone()))
            .collect();

        let forest = if !tiers.principals.is_empty() {
            let below = if vice_nodes.is_empty() {
                head_nodes
            } else {
                vice_nodes
            };
            tiers
                .principals
                .iter()
                .map(|p| OrganizationNode::new((*p).clone()).with_children(below.clone()))
                .collect()
        } else if !vice_nodes.is_empty() {
            vice_nodes
        } else {
            head_nodes
        };

        let dropped = orphans(records).len();
        debug!(roots = forest.len(), dropped, "built organization forest");
        forest
    }

    /// Ids of every node a record is attached to in the canonical forest.
    ///
    /// Returns `Some(vec![])` for a canonical root, `None` for an orphan or
    /// an unknown id. Replicated tiers yield one id per parent copy.
    pub fn canonical_parents(&self, records: &[StaffRecord], id: &str) -> Option<Vec<String>> {
        fn ids(tier: &[&StaffRecord]) -> Vec<String> {
            tier.iter().map(|r| r.id.clone()).collect()
        }

        let record = records.iter().find(|r| r.id == id)?;
        let tiers = Tiers::partition(records);

        match record.position {
            Position::Principal => Some(Vec::new()),
            Position::VicePrincipal => Some(ids(&tiers.principals)),
            Position::DepartmentHead => {
                if !tiers.vice_principals.is_empty() {
                    Some(ids(&tiers.vice_principals))
                } else {
                    Some(ids(&tiers.principals))
                }
            }
            Position::Staff => {
                let heads: Vec<String> = tiers
                    .department_heads
                    .iter()
                    .filter(|h| h.department == record.department)
                    .map(|h| h.id.clone())
                    .collect();
                (!heads.is_empty()).then_some(heads)
            }
        }
    }
}

/// Convenience wrapper for [`OrgTreeBuilder::build`].
pub fn build(records: &[StaffRecord]) -> Forest {
    OrgTreeBuilder::new().build(records)
}

/// Records that [`build`] leaves out of the forest, in input order.
///
/// Only staff can be dropped: a staff member is an orphan when no
/// department head shares their department. Department heads always
/// appear, with an empty child list if their department has no staff.
pub fn orphans(records: &[StaffRecord]) -> Vec<&StaffRecord> {
    let head_departments: HashSet<&str> = records
        .iter()
        .filter(|r| r.position == Position::DepartmentHead)
        .map(|r| r.department.as_str())
        .collect();

    records
        .iter()
        .filter(|r| r.position == Position::Staff)
        .filter(|r| !head_departments.contains(r.department.as_str()))
        .collect()
}
