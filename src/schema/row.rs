//! Row sanitation
//!
//! Every engine runs incoming rows through [`sanitize_row`] before touching
//! its storage, so a rejected row is never partially applied.

use crate::error::{ContractViolation, Result};

use super::value::MAX_STRING_LENGTH;
use super::{Row, Schema, Value};

/// Check a row against a schema and hand it back if it conforms.
///
/// The row must have one value per column, each value must be null or of
/// its column's declared type, strings must fit in [`MAX_STRING_LENGTH`]
/// bytes and the primary key must not be null.
pub fn sanitize_row(schema: &Schema, row: Row) -> Result<Row> {
    let columns = schema.columns();
    if row.len() != columns.len() {
        return Err(ContractViolation::RowLength {
            expected: columns.len(),
            actual: row.len(),
        }
        .into());
    }

    for (column, value) in columns.iter().zip(&row) {
        let Some(found) = value.column_type() else {
            continue;
        };
        if found != column.ty {
            return Err(ContractViolation::TypeMismatch {
                column: column.name.clone(),
                expected: column.ty,
                found,
            }
            .into());
        }
        if let Value::String(s) = value {
            if s.len() > MAX_STRING_LENGTH {
                return Err(ContractViolation::StringTooLong {
                    column: column.name.clone(),
                    len: s.len(),
                    max: MAX_STRING_LENGTH,
                }
                .into());
            }
        }
    }

    if row[schema.primary_index()].is_null() {
        return Err(ContractViolation::NullPrimaryKey {
            column: schema.primary_column().name.clone(),
        }
        .into());
    }

    Ok(row)
}
