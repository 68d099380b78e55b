//! Tabular rendering
//!
//! ```text
//!   --------------------
//!  / people             \
//! +----------------------+----------------------+
//! | name*                |                  age |
//! +======================+======================+
//! | "alice"              |                   30 |
//! +----------------------+----------------------+
//! ```

use std::fmt;

use crate::error::Result;
use crate::schema::{ColumnType, Row, Schema, Value};

use super::Table;

/// Inner width of every cell
const CELL_WIDTH: usize = 20;

/// Characters of a long string kept before the ellipsis
const TRUNCATED_LEN: usize = 15;

/// Snapshot of a table's rows, sorted by primary key, ready to display
#[derive(Debug, Clone)]
pub struct TableView {
    schema: Schema,
    rows: Vec<Row>,
}

impl TableView {
    /// Collect and sort every live row of `table`
    pub fn of<T: Table + ?Sized>(table: &T) -> Result<Self> {
        let schema = table.schema().clone();
        let mut rows = table.rows().collect::<Result<Vec<_>>>()?;
        let primary = schema.primary_index();
        rows.sort_by(|a, b| a[primary].cmp(&b[primary]));
        Ok(Self { schema, rows })
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    fn write_rule(&self, f: &mut fmt::Formatter<'_>, fill: char) -> fmt::Result {
        f.write_str("+")?;
        let segment: String = std::iter::repeat(fill).take(CELL_WIDTH + 2).collect();
        for _ in self.schema.columns() {
            write!(f, "{}+", segment)?;
        }
        writeln!(f)
    }
}

fn write_cell(f: &mut fmt::Formatter<'_>, text: &str, right_align: bool) -> fmt::Result {
    if right_align {
        write!(f, "| {:>width$} ", text, width = CELL_WIDTH)
    } else {
        write!(f, "| {:<width$} ", text, width = CELL_WIDTH)
    }
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) if s.chars().count() > CELL_WIDTH - 2 => {
            let head: String = s.chars().take(TRUNCATED_LEN).collect();
            format!("\"{}...", head)
        }
        Value::String(s) => format!("\"{}\"", s),
        other => other.to_string(),
    }
}

impl fmt::Display for TableView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  {}", "-".repeat(CELL_WIDTH))?;
        writeln!(f, " / {:<width$} \\", self.schema.name(), width = CELL_WIDTH - 2)?;

        self.write_rule(f, '-')?;
        for (index, column) in self.schema.columns().iter().enumerate() {
            let mut header = column.name.clone();
            if index == self.schema.primary_index() {
                header.push('*');
            }
            write_cell(f, &header, column.ty == ColumnType::Integer)?;
        }
        writeln!(f, "|")?;
        self.write_rule(f, '=')?;

        for row in &self.rows {
            for value in row {
                write_cell(f, &cell_text(value), matches!(value, Value::Integer(_)))?;
            }
            writeln!(f, "|")?;
            self.write_rule(f, '-')?;
        }

        Ok(())
    }
}
