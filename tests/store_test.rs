//! Tests for the JSON file store

use std::fs;
use std::sync::Arc;

use tempfile::TempDir;

use schoolnet::domain::{build, Position};
use schoolnet::infrastructure::traits::{LayoutStore, RealFileSystem, RecordStore};
use schoolnet::infrastructure::JsonFileStore;
use schoolnet::util::testing::{init_test_setup, staff};

fn open(dir: &TempDir) -> JsonFileStore {
    JsonFileStore::new(Arc::new(RealFileSystem), dir.path())
}

#[test]
fn given_no_files_when_reading_then_empty_roster_and_no_layout() {
    init_test_setup();
    let temp = TempDir::new().unwrap();
    let store = open(&temp);

    assert!(store.list_staff("north").unwrap().is_empty());
    assert!(store.get_layout("north").unwrap().is_none());
    assert!(!store.delete_layout("north").unwrap());
}

#[test]
fn given_saved_roster_when_reopening_store_then_same_records_in_order() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let records = vec![
        staff("s1", Position::Staff, "Math"),
        staff("p", Position::Principal, "Office"),
        staff("h", Position::DepartmentHead, "Math"),
    ];
    open(&temp).replace_staff("north", &records).unwrap();

    // Act
    let loaded = open(&temp).list_staff("north").unwrap();

    // Assert
    assert_eq!(loaded, records);
    assert!(temp
        .path()
        .join("schools")
        .join("north")
        .join("staff.json")
        .exists());
}

#[test]
fn given_saved_layout_when_reopening_store_then_nested_forest_restored() {
    let temp = TempDir::new().unwrap();
    let forest = build(&[
        staff("p", Position::Principal, ""),
        staff("h", Position::DepartmentHead, "Math"),
        staff("s", Position::Staff, "Math"),
    ]);
    open(&temp).put_layout("north", &forest, "abcd1234").unwrap();

    let layout = open(&temp).get_layout("north").unwrap().unwrap();

    assert_eq!(layout.nodes, forest);
    assert_eq!(layout.roster_fingerprint, "abcd1234");
}

#[test]
fn given_layout_file_when_inspected_then_children_are_nested() {
    let temp = TempDir::new().unwrap();
    let forest = build(&[
        staff("h", Position::DepartmentHead, "Math"),
        staff("s", Position::Staff, "Math"),
    ]);
    open(&temp).put_layout("north", &forest, "x").unwrap();

    let path = temp.path().join("schools/north/layout.json");
    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();

    assert_eq!(json["nodes"][0]["id"], "h");
    assert_eq!(json["nodes"][0]["children"][0]["id"], "s");
    assert_eq!(json["nodes"][0]["children"][0]["staff"]["position"], "staff");
}

#[test]
fn given_two_schools_when_writing_then_isolated() {
    let temp = TempDir::new().unwrap();
    let store = open(&temp);
    store
        .replace_staff("north", &[staff("a", Position::Staff, "X")])
        .unwrap();
    store
        .replace_staff("south", &[staff("b", Position::Staff, "Y")])
        .unwrap();

    assert_eq!(store.list_staff("north").unwrap()[0].id, "a");
    assert_eq!(store.list_staff("south").unwrap()[0].id, "b");
}

#[test]
fn given_existing_layout_when_deleting_then_file_removed() {
    let temp = TempDir::new().unwrap();
    let store = open(&temp);
    store.put_layout("north", &Vec::new(), "x").unwrap();

    assert!(store.delete_layout("north").unwrap());
    assert!(store.get_layout("north").unwrap().is_none());
    assert!(!store.delete_layout("north").unwrap());
}

#[test]
fn given_corrupt_roster_file_when_reading_then_invalid_data_error() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("schools/north");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("staff.json"), "{ not json").unwrap();

    let err = open(&temp).list_staff("north").unwrap_err();

    assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
}

#[test]
fn given_path_like_school_id_when_writing_then_rejected_and_nothing_written() {
    let temp = TempDir::new().unwrap();
    let store = open(&temp);

    let err = store
        .replace_staff("../escape", &[staff("a", Position::Staff, "X")])
        .unwrap_err();

    assert_eq!(err.kind(), std::io::ErrorKind::InvalidInput);
    assert!(!temp.path().join("schools").exists());
}
