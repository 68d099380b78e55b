//! ReferenceTable Tests
//!
//! Tests verify:
//! - Basic put/get/remove semantics and hit/miss results
//! - Key-ordered iteration
//! - Fingerprint maintenance
//! - Clear

use tablestore::table::Fingerprint;
use tablestore::{ColumnType, ReferenceTable, Row, Schema, Table, Value};

// =============================================================================
// Helper Functions
// =============================================================================

fn people() -> ReferenceTable {
    let schema = Schema::new(
        "people",
        vec!["name", "age", "active"],
        vec![ColumnType::String, ColumnType::Integer, ColumnType::Boolean],
        0,
    )
    .unwrap();
    ReferenceTable::new(schema)
}

fn person(name: &str, age: i32, active: bool) -> Row {
    vec![Value::from(name), Value::from(age), Value::from(active)]
}

// =============================================================================
// Basic Operations Tests
// =============================================================================

#[test]
fn test_new_table_is_empty() {
    let table = people();
    assert_eq!(table.size(), 0);
    assert_eq!(table.capacity(), 0);
    assert!(table.is_empty());
    assert_eq!(table.fingerprint(), Fingerprint::ZERO);
    assert_eq!(table.name(), "people");
}

#[test]
fn test_put_get_overwrite_remove() {
    let mut table = people();

    assert!(!table.put(person("alice", 30, true)).unwrap());
    assert!(table.put(person("alice", 31, false)).unwrap());
    assert_eq!(
        table.get(&Value::from("alice")).unwrap(),
        Some(person("alice", 31, false))
    );
    assert_eq!(table.size(), 1);

    assert!(table.remove(&Value::from("alice")).unwrap());
    assert_eq!(table.get(&Value::from("alice")).unwrap(), None);
    assert_eq!(table.size(), 0);
}

#[test]
fn test_remove_missing_key() {
    let mut table = people();
    table.put(person("alice", 30, true)).unwrap();

    assert!(!table.remove(&Value::from("bob")).unwrap());
    assert_eq!(table.size(), 1);
}

#[test]
fn test_capacity_tracks_size() {
    let mut table = people();
    table.put(person("a", 1, true)).unwrap();
    table.put(person("b", 2, true)).unwrap();
    assert_eq!(table.capacity(), 2);
    assert_eq!(table.load_factor(), 1.0);
}

#[test]
fn test_contains_key() {
    let mut table = people();
    table.put(person("alice", 30, true)).unwrap();

    assert!(table.contains_key(&Value::from("alice")).unwrap());
    assert!(!table.contains_key(&Value::from("bob")).unwrap());
}

// =============================================================================
// Iteration Tests
// =============================================================================

#[test]
fn test_rows_in_key_order() {
    let mut table = people();
    for name in ["mallory", "alice", "trent", "bob"] {
        table.put(person(name, 1, true)).unwrap();
    }

    let names: Vec<String> = table
        .rows()
        .map(|row| row.unwrap()[0].to_string())
        .collect();
    assert_eq!(names, vec!["alice", "bob", "mallory", "trent"]);

    let borrowed: Vec<&str> = table.iter().filter_map(|row| row[0].as_str()).collect();
    assert_eq!(borrowed, vec!["alice", "bob", "mallory", "trent"]);
}

#[test]
fn test_integer_keys_order_numerically() {
    let schema = Schema::new(
        "nums",
        vec!["n"],
        vec![ColumnType::Integer],
        0,
    )
    .unwrap();
    let mut table = ReferenceTable::new(schema);
    for n in [10, -3, 2, 100] {
        table.put(vec![Value::from(n)]).unwrap();
    }

    let keys: Vec<i32> = table.iter().filter_map(|row| row[0].as_i32()).collect();
    assert_eq!(keys, vec![-3, 2, 10, 100]);
}

// =============================================================================
// Fingerprint Tests
// =============================================================================

#[test]
fn test_fingerprint_tracks_mutations() {
    let mut table = people();
    table.put(person("alice", 30, true)).unwrap();
    table.put(person("bob", 40, false)).unwrap();
    table.put(person("alice", 31, true)).unwrap();
    table.remove(&Value::from("bob")).unwrap();

    let expected = Fingerprint::of_rows([person("alice", 31, true).as_slice()]);
    assert_eq!(table.fingerprint(), expected);
    assert!(table.verify_fingerprint().unwrap());
}

#[test]
fn test_rejected_put_changes_nothing() {
    let mut table = people();
    table.put(person("alice", 30, true)).unwrap();
    let before = table.fingerprint();

    let result = table.put(vec![Value::from("alice"), Value::from("x"), Value::Null]);
    assert!(result.is_err());
    assert_eq!(table.fingerprint(), before);
    assert_eq!(table.get(&Value::from("alice")).unwrap(), Some(person("alice", 30, true)));
}

// =============================================================================
// Clear Tests
// =============================================================================

#[test]
fn test_clear() {
    let mut table = people();
    table.put(person("alice", 30, true)).unwrap();
    table.put(person("bob", 40, false)).unwrap();

    table.clear().unwrap();

    assert_eq!(table.size(), 0);
    assert_eq!(table.fingerprint(), Fingerprint::ZERO);
    assert_eq!(table.rows().count(), 0);

    // Clearing an empty table is a no-op
    table.clear().unwrap();
    assert!(table.is_empty());
}
