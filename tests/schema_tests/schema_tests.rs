//! Schema Tests
//!
//! Tests verify:
//! - Schema construction and accessors
//! - Name, column count and primary index validation
//! - Row sanitation across types and bounds
//! - Value conversions

use tablestore::schema::{sanitize_row, MAX_COLUMN_COUNT, MAX_STRING_LENGTH};
use tablestore::{ColumnType, ContractViolation, ErrorKind, Schema, StoreError, Value};

// =============================================================================
// Helper Functions
// =============================================================================

fn people() -> Schema {
    Schema::new(
        "people",
        vec!["name", "age", "active"],
        vec![ColumnType::String, ColumnType::Integer, ColumnType::Boolean],
        0,
    )
    .unwrap()
}

fn violation<T: std::fmt::Debug>(result: tablestore::Result<T>) -> ContractViolation {
    match result {
        Err(StoreError::Contract(v)) => v,
        other => panic!("expected contract violation, got {:?}", other),
    }
}

// =============================================================================
// Construction Tests
// =============================================================================

#[test]
fn test_schema_accessors() {
    let schema = people();

    assert_eq!(schema.name(), "people");
    assert_eq!(schema.column_count(), 3);
    assert_eq!(
        schema.column_names().collect::<Vec<_>>(),
        vec!["name", "age", "active"]
    );
    assert_eq!(
        schema.column_types().collect::<Vec<_>>(),
        vec![ColumnType::String, ColumnType::Integer, ColumnType::Boolean]
    );
    assert_eq!(schema.primary_index(), 0);
    assert_eq!(schema.primary_column().name, "name");
    assert_eq!(schema.column_index("age"), Some(1));
    assert_eq!(schema.column_index("missing"), None);
}

#[test]
fn test_record_width_sums_worst_cases() {
    assert_eq!(people().record_width(), 128 + 5 + 1);
}

#[test]
fn test_non_first_primary_index() {
    let schema = Schema::new(
        "scores",
        vec!["player", "id"],
        vec![ColumnType::String, ColumnType::Integer],
        1,
    )
    .unwrap();

    let row = vec![Value::from("ann"), Value::from(7)];
    assert_eq!(schema.key_of(&row), &Value::from(7));
}

#[test]
fn test_rejects_mismatched_name_and_type_counts() {
    let result = Schema::new("t", vec!["a", "b"], vec![ColumnType::String], 0);
    assert_eq!(
        violation(result),
        ContractViolation::ColumnCountMismatch { names: 2, types: 1 }
    );
}

#[test]
fn test_rejects_no_columns() {
    let result = Schema::new("t", Vec::<String>::new(), vec![], 0);
    assert_eq!(violation(result), ContractViolation::NoColumns);
}

#[test]
fn test_rejects_too_many_columns() {
    let names: Vec<String> = (0..=MAX_COLUMN_COUNT).map(|i| format!("c{}", i)).collect();
    let types = vec![ColumnType::Integer; names.len()];

    let result = Schema::new("wide", names, types, 0);
    assert!(matches!(
        violation(result),
        ContractViolation::TooManyColumns { count: 16, max: 15 }
    ));
}

#[test]
fn test_accepts_max_columns() {
    let names: Vec<String> = (0..MAX_COLUMN_COUNT).map(|i| format!("c{}", i)).collect();
    let types = vec![ColumnType::Boolean; names.len()];

    assert!(Schema::new("wide", names, types, 14).is_ok());
}

#[test]
fn test_rejects_duplicate_columns() {
    let result = Schema::new(
        "t",
        vec!["a", "a"],
        vec![ColumnType::String, ColumnType::String],
        0,
    );
    assert_eq!(
        violation(result),
        ContractViolation::DuplicateColumn("a".to_string())
    );
}

#[test]
fn test_rejects_long_names() {
    let long = "abcdefghijklmnop"; // 16 bytes
    let table = Schema::new(long, vec!["a"], vec![ColumnType::String], 0);
    assert!(matches!(
        violation(table),
        ContractViolation::NameTooLong { .. }
    ));

    let column = Schema::new("t", vec![long], vec![ColumnType::String], 0);
    assert!(matches!(
        violation(column),
        ContractViolation::NameTooLong { .. }
    ));
}

#[test]
fn test_rejects_path_like_names() {
    for name in ["", ".", "..", "a/b", "a\\b"] {
        let result = Schema::new(name, vec!["a"], vec![ColumnType::String], 0);
        assert_eq!(
            violation(result),
            ContractViolation::InvalidName(name.to_string()),
            "name {:?}",
            name
        );
    }
}

#[test]
fn test_rejects_primary_index_out_of_range() {
    let result = Schema::new("t", vec!["a"], vec![ColumnType::String], 1);
    assert_eq!(
        violation(result),
        ContractViolation::PrimaryIndexOutOfRange { index: 1, columns: 1 }
    );
}

// =============================================================================
// Sanitation Tests
// =============================================================================

#[test]
fn test_sanitize_accepts_conforming_row() {
    let row = vec![Value::from("alice"), Value::from(30), Value::from(true)];
    assert_eq!(sanitize_row(&people(), row.clone()).unwrap(), row);
}

#[test]
fn test_sanitize_rejects_short_and_long_rows() {
    let short = vec![Value::from("alice")];
    assert_eq!(
        violation(sanitize_row(&people(), short)),
        ContractViolation::RowLength { expected: 3, actual: 1 }
    );

    let long = vec![
        Value::from("alice"),
        Value::from(30),
        Value::from(true),
        Value::Null,
    ];
    assert_eq!(
        violation(sanitize_row(&people(), long)),
        ContractViolation::RowLength { expected: 3, actual: 4 }
    );
}

#[test]
fn test_sanitize_rejects_wrong_type() {
    let row = vec![Value::from("alice"), Value::from(30), Value::from(1)];
    assert!(matches!(
        violation(sanitize_row(&people(), row)),
        ContractViolation::TypeMismatch { expected: ColumnType::Boolean, found: ColumnType::Integer, .. }
    ));
}

#[test]
fn test_sanitize_rejects_oversized_string() {
    let row = vec![
        Value::from("x".repeat(MAX_STRING_LENGTH + 1)),
        Value::from(30),
        Value::from(true),
    ];
    assert!(matches!(
        violation(sanitize_row(&people(), row)),
        ContractViolation::StringTooLong { len: 128, max: 127, .. }
    ));
}

#[test]
fn test_sanitize_rejects_null_primary_key() {
    let row = vec![Value::Null, Value::from(30), Value::from(true)];
    let err = sanitize_row(&people(), row).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Contract);
    assert!(matches!(
        err,
        StoreError::Contract(ContractViolation::NullPrimaryKey { .. })
    ));
}

// =============================================================================
// Value Tests
// =============================================================================

#[test]
fn test_value_conversions() {
    assert_eq!(Value::from("a"), Value::String("a".to_string()));
    assert_eq!(Value::from(5), Value::Integer(5));
    assert_eq!(Value::from(false), Value::Boolean(false));
    assert_eq!(Value::from(None::<i32>), Value::Null);
    assert_eq!(Value::from(Some("b")), Value::from("b"));
}

#[test]
fn test_value_from_wide_integer() {
    assert_eq!(Value::try_from(i64::from(i32::MAX)).unwrap(), Value::from(i32::MAX));
    assert_eq!(
        Value::try_from(i64::from(i32::MAX) + 1).unwrap_err(),
        ContractViolation::IntegerOutOfRange(2_147_483_648)
    );
    assert!(Value::try_from(i64::from(i32::MIN) - 1).is_err());
}

#[test]
fn test_value_string_form() {
    assert_eq!(Value::from("alice").to_string(), "alice");
    assert_eq!(Value::from(-12).to_string(), "-12");
    assert_eq!(Value::from(true).to_string(), "true");
    assert_eq!(Value::Null.to_string(), "null");
}

#[test]
fn test_value_accessors() {
    assert_eq!(Value::from("a").as_str(), Some("a"));
    assert_eq!(Value::from(3).as_i32(), Some(3));
    assert_eq!(Value::from(true).as_bool(), Some(true));
    assert_eq!(Value::from(3).as_str(), None);
    assert!(Value::Null.is_null());
    assert_eq!(Value::Null.column_type(), None);
}

#[test]
fn test_column_type_tags_round_trip() {
    for ty in [ColumnType::String, ColumnType::Integer, ColumnType::Boolean] {
        assert_eq!(ColumnType::from_tag(ty.tag()), Some(ty));
    }
    assert_eq!(ColumnType::from_tag(0), None);
}

#[test]
fn test_schema_serializes_to_json() {
    let json = serde_json::to_value(people()).unwrap();
    assert_eq!(json["name"], "people");
    assert_eq!(json["columns"][1]["name"], "age");
    assert_eq!(json["columns"][1]["type"], "INTEGER");
    assert_eq!(json["primary_index"], 0);
}
