//! Tests for OrgTreeBuilder: tier grouping, root fallback and drop rules

use std::collections::{HashMap, HashSet};

use rstest::rstest;

use schoolnet::domain::{build, orphans, Forest, ForestExt, OrganizationNode, Position, StaffRecord};
use schoolnet::util::testing::{init_test_setup, staff};

fn child_ids(node: &OrganizationNode) -> Vec<&str> {
    node.children.iter().map(|n| n.id.as_str()).collect()
}

fn sample_roster() -> Vec<StaffRecord> {
    vec![
        staff("s1", Position::Staff, "Math"),
        staff("v1", Position::VicePrincipal, "Office"),
        staff("h1", Position::DepartmentHead, "Math"),
        staff("p", Position::Principal, "Office"),
        staff("s2", Position::Staff, "Science"),
        staff("h2", Position::DepartmentHead, "Science"),
        staff("s3", Position::Staff, "Math"),
        staff("s4", Position::Staff, "Art"),
    ]
}

// ============================================================
// Scenarios
// ============================================================

#[test]
fn given_full_tiers_with_unmatched_staff_when_building_then_unmatched_dropped() {
    init_test_setup();
    // Arrange
    let records = vec![
        staff("p", Position::Principal, ""),
        staff("v", Position::VicePrincipal, ""),
        staff("h", Position::DepartmentHead, "Math"),
        staff("s1", Position::Staff, "Math"),
        staff("s2", Position::Staff, "Science"),
    ];

    // Act
    let forest = build(&records);

    // Assert: P -> V -> H -> S1
    assert_eq!(forest.len(), 1);
    let p = &forest[0];
    assert_eq!(p.id, "p");
    assert_eq!(child_ids(p), vec!["v"]);
    assert_eq!(child_ids(&p.children[0]), vec!["h"]);
    assert_eq!(child_ids(&p.children[0].children[0]), vec!["s1"]);
    assert!(forest.find_all("s2").is_empty());
}

#[test]
fn given_only_head_and_staff_when_building_then_head_is_root() {
    let records = vec![
        staff("h1", Position::DepartmentHead, "A"),
        staff("s1", Position::Staff, "A"),
    ];

    let forest = build(&records);

    assert_eq!(forest.len(), 1);
    assert_eq!(forest[0].id, "h1");
    assert_eq!(child_ids(&forest[0]), vec!["s1"]);
}

#[test]
fn given_empty_roster_when_building_then_empty_forest() {
    assert!(build(&[]).is_empty());
    assert!(orphans(&[]).is_empty());
}

#[test]
fn given_two_principals_when_building_then_independent_copies() {
    // Arrange
    let records = vec![
        staff("p1", Position::Principal, ""),
        staff("p2", Position::Principal, ""),
        staff("h", Position::DepartmentHead, "X"),
        staff("s", Position::Staff, "X"),
    ];

    // Act
    let mut forest = build(&records);

    // Assert: structurally identical subtrees under both roots
    assert_eq!(forest.len(), 2);
    assert_eq!(forest[0].children, forest[1].children);
    assert_eq!(child_ids(&forest[1].children[0]), vec!["s"]);

    // Mutating one copy leaves the other alone
    forest[0].children[0].children.clear();
    assert_eq!(child_ids(&forest[1].children[0]), vec!["s"]);
}

#[test]
fn given_vice_principals_without_principal_when_building_then_each_is_root_with_all_heads() {
    let records = vec![
        staff("v1", Position::VicePrincipal, ""),
        staff("h1", Position::DepartmentHead, "A"),
        staff("v2", Position::VicePrincipal, ""),
        staff("h2", Position::DepartmentHead, "B"),
    ];

    let mut forest = build(&records);

    let roots: Vec<_> = forest.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(roots, vec!["v1", "v2"]);
    assert_eq!(child_ids(&forest[0]), vec!["h1", "h2"]);
    assert_eq!(child_ids(&forest[1]), vec!["h1", "h2"]);

    forest[1].children.swap(0, 1);
    assert_eq!(child_ids(&forest[0]), vec!["h1", "h2"]);
}

// ============================================================
// Properties
// ============================================================

#[test]
fn given_same_input_when_building_twice_then_same_forest() {
    let records = sample_roster();
    assert_eq!(build(&records), build(&records));
}

#[test]
fn given_input_order_when_building_then_order_preserved_per_level() {
    let forest = build(&sample_roster());

    let heads = &forest[0].children[0].children;
    let ids: Vec<_> = heads.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["h1", "h2"]);
    assert_eq!(child_ids(&heads[0]), vec!["s1", "s3"]);
}

#[test]
fn given_single_replication_parent_when_building_then_non_orphans_reachable_once() {
    // Arrange: one principal, one vice principal, so no subtree is replicated
    let records = sample_roster();

    // Act
    let forest = build(&records);
    let dropped = orphans(&records);

    // Assert
    assert_eq!(forest.node_count(), records.len() - dropped.len());
    let ids = forest.node_ids();
    let unique: HashSet<_> = ids.iter().collect();
    assert_eq!(unique.len(), ids.len(), "ids must be unique");
    let dropped_ids: Vec<_> = dropped.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(dropped_ids, vec!["s4"]);
}

#[rstest]
#[case::full(sample_roster())]
#[case::no_principal(sample_roster().into_iter().filter(|r| r.position != Position::Principal).collect())]
#[case::heads_and_staff(sample_roster().into_iter().filter(|r| r.position >= Position::DepartmentHead).collect())]
#[case::many_principals(vec![
    staff("p1", Position::Principal, ""),
    staff("p2", Position::Principal, ""),
    staff("v", Position::VicePrincipal, ""),
    staff("h", Position::DepartmentHead, "A"),
    staff("s", Position::Staff, "A"),
])]
fn given_roster_when_building_then_no_node_descends_from_lower_tier(#[case] records: Vec<StaffRecord>) {
    fn check(node: &OrganizationNode) {
        for child in &node.children {
            assert!(
                node.staff.position < child.staff.position,
                "{} ({}) must not be below {} ({})",
                child.id,
                child.staff.position,
                node.id,
                node.staff.position
            );
            check(child);
        }
    }

    let forest: Forest = build(&records);
    forest.iter().for_each(check);
}

#[test]
fn given_dropped_staff_when_listing_orphans_then_matches_missing_records() {
    let records = sample_roster();
    let forest = build(&records);
    let reachable: HashSet<String> = forest.node_ids().into_iter().collect();

    let missing: Vec<_> = records
        .iter()
        .filter(|r| !reachable.contains(&r.id))
        .map(|r| r.id.as_str())
        .collect();
    let orphan_ids: Vec<_> = orphans(&records).iter().map(|r| r.id.as_str()).collect();

    assert_eq!(missing, orphan_ids);
}

#[test]
fn given_replicated_heads_when_counting_then_each_copy_counted() {
    let records = vec![
        staff("p", Position::Principal, ""),
        staff("v1", Position::VicePrincipal, ""),
        staff("v2", Position::VicePrincipal, ""),
        staff("h", Position::DepartmentHead, "A"),
        staff("s", Position::Staff, "A"),
    ];

    let forest = build(&records);

    let mut counts: HashMap<String, usize> = HashMap::new();
    for id in forest.node_ids() {
        *counts.entry(id).or_default() += 1;
    }
    assert_eq!(counts["p"], 1);
    assert_eq!(counts["h"], 2);
    assert_eq!(counts["s"], 2);
}
