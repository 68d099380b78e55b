//! TableView Rendering Tests
//!
//! Tests verify:
//! - Header box with the table name and primary-key marker
//! - Rows sorted by primary key regardless of engine order
//! - Cell formatting (quoted strings, truncation, blank nulls, alignment)

use tablestore::table::TableView;
use tablestore::{ColumnType, OpenAddressingTable, Row, Schema, Table, Value};

// =============================================================================
// Helper Functions
// =============================================================================

fn schema() -> Schema {
    Schema::new(
        "people",
        vec!["name", "age"],
        vec![ColumnType::String, ColumnType::Integer],
        0,
    )
    .unwrap()
}

fn person(name: &str, age: Option<i32>) -> Row {
    vec![Value::from(name), Value::from(age)]
}

fn render(rows: Vec<Row>) -> String {
    let mut table = OpenAddressingTable::new(schema());
    for row in rows {
        table.put(row).unwrap();
    }
    TableView::of(&table).unwrap().to_string()
}

// =============================================================================
// Rendering Tests
// =============================================================================

#[test]
fn test_single_row_layout() {
    let rendered = render(vec![person("alice", Some(30))]);

    let expected = [
        "  --------------------",
        " / people             \\",
        "+----------------------+----------------------+",
        "| name*                |                  age |",
        "+======================+======================+",
        "| \"alice\"              |                   30 |",
        "+----------------------+----------------------+",
    ]
    .join("\n")
        + "\n";

    assert_eq!(rendered, expected);
}

#[test]
fn test_empty_table_renders_header_only() {
    let rendered = render(vec![]);
    assert_eq!(rendered.lines().count(), 5);
    assert!(rendered.contains("name*"));
}

#[test]
fn test_rows_sorted_by_primary_key() {
    let rows: Vec<_> = ["trent", "alice", "mallory", "bob"]
        .iter()
        .map(|name| person(name, Some(1)))
        .collect();

    let view_rows: Vec<String> = {
        let mut table = OpenAddressingTable::new(schema());
        for row in rows {
            table.put(row).unwrap();
        }
        TableView::of(&table)
            .unwrap()
            .rows()
            .iter()
            .map(|row| row[0].to_string())
            .collect()
    };

    assert_eq!(view_rows, vec!["alice", "bob", "mallory", "trent"]);
}

#[test]
fn test_long_strings_are_truncated() {
    let rendered = render(vec![person("abcdefghijklmnopqrstuvwxyz", Some(1))]);
    assert!(rendered.contains("| \"abcdefghijklmno... "));
    assert!(!rendered.contains("pqrstu"));
}

#[test]
fn test_short_strings_are_not_truncated() {
    // 18 characters fit quoted in a 20 character cell
    let rendered = render(vec![person("abcdefghijklmnopqr", Some(1))]);
    assert!(rendered.contains("| \"abcdefghijklmnopqr\" |"));
}

#[test]
fn test_nulls_render_blank() {
    let rendered = render(vec![person("ghost", None)]);
    let row_line = rendered
        .lines()
        .find(|line| line.contains("ghost"))
        .unwrap();

    assert_eq!(row_line, format!("| {:<20} | {:20} |", "\"ghost\"", ""));
}

#[test]
fn test_negative_integers_right_aligned() {
    let rendered = render(vec![person("a", Some(-42))]);
    assert!(rendered.contains(&format!("| {:>20} |", "-42")));
}
