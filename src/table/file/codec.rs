//! Binary encodings for the schema blob, the metadata blob and row records
//!
//! All multi-byte integers are little-endian.

use bytes::{Buf, BufMut, BytesMut};

use crate::error::{Result, StoreError};
use crate::schema::{
    Column, ColumnType, Row, Schema, Value, MAX_COLUMN_COUNT, MAX_NAME_LENGTH,
};
use crate::table::Fingerprint;

/// Marker byte for a null field, whatever the column type
const NULL_MARKER: i8 = -1;

/// Per column: name length (1) + name bytes (15) + type tag (1)
const COLUMN_SLOT_SIZE: usize = 1 + MAX_NAME_LENGTH + 1;

/// Column count (4) + primary index (4) + one slot per possible column
pub(crate) const SCHEMA_BLOB_SIZE: usize = 8 + MAX_COLUMN_COUNT * COLUMN_SLOT_SIZE;

/// Size (4) + fingerprint (4) + record width (4)
pub(crate) const METADATA_BLOB_SIZE: usize = 12;

/// Table-level counters persisted next to the schema
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Metadata {
    pub size: usize,
    pub fingerprint: Fingerprint,
    pub record_width: usize,
}

fn corrupt(message: impl Into<String>) -> StoreError {
    StoreError::Corrupt(message.into())
}

// =============================================================================
// Schema
// =============================================================================

pub(crate) fn encode_schema(schema: &Schema) -> Vec<u8> {
    let mut buf = BytesMut::with_capacity(SCHEMA_BLOB_SIZE);
    buf.put_u32_le(schema.column_count() as u32);
    buf.put_u32_le(schema.primary_index() as u32);

    for column in schema.columns() {
        let name = column.name.as_bytes();
        buf.put_u8(name.len() as u8);
        buf.put_slice(name);
        buf.put_bytes(0, MAX_NAME_LENGTH - name.len());
        buf.put_u8(column.ty.tag());
    }

    buf.put_bytes(0, SCHEMA_BLOB_SIZE - buf.len());
    buf.to_vec()
}

/// Rebuild a schema; any malformed byte is reported as corruption
pub(crate) fn decode_schema(table_name: &str, bytes: &[u8]) -> Result<Schema> {
    if bytes.len() != SCHEMA_BLOB_SIZE {
        return Err(corrupt(format!(
            "schema is {} bytes, expected {}",
            bytes.len(),
            SCHEMA_BLOB_SIZE
        )));
    }

    let mut buf = bytes;
    let column_count = buf.get_u32_le() as usize;
    let primary_index = buf.get_u32_le() as usize;

    if column_count > MAX_COLUMN_COUNT {
        return Err(corrupt(format!("schema declares {} columns", column_count)));
    }

    let mut columns = Vec::with_capacity(column_count);
    for position in 0..column_count {
        let name_len = buf.get_u8() as usize;
        if name_len > MAX_NAME_LENGTH {
            return Err(corrupt(format!(
                "column {} name length {} exceeds {}",
                position, name_len, MAX_NAME_LENGTH
            )));
        }
        let name = std::str::from_utf8(&buf[..name_len])
            .map_err(|e| corrupt(format!("column {} name is not UTF-8: {}", position, e)))?
            .to_string();
        buf.advance(MAX_NAME_LENGTH);

        let tag = buf.get_u8();
        let ty = ColumnType::from_tag(tag)
            .ok_or_else(|| corrupt(format!("column {} has unknown type tag {}", position, tag)))?;

        columns.push(Column { name, ty });
    }

    Schema::from_columns(table_name, columns, primary_index)
        .map_err(|e| corrupt(format!("stored schema is invalid: {}", e)))
}

// =============================================================================
// Metadata
// =============================================================================

pub(crate) fn encode_metadata(metadata: &Metadata) -> Vec<u8> {
    let mut buf = BytesMut::with_capacity(METADATA_BLOB_SIZE);
    buf.put_u32_le(metadata.size as u32);
    buf.put_u32_le(metadata.fingerprint.raw());
    buf.put_u32_le(metadata.record_width as u32);
    buf.to_vec()
}

pub(crate) fn decode_metadata(bytes: &[u8]) -> Result<Metadata> {
    if bytes.len() != METADATA_BLOB_SIZE {
        return Err(corrupt(format!(
            "metadata is {} bytes, expected {}",
            bytes.len(),
            METADATA_BLOB_SIZE
        )));
    }

    let mut buf = bytes;
    Ok(Metadata {
        size: buf.get_u32_le() as usize,
        fingerprint: Fingerprint::from_raw(buf.get_u32_le()),
        record_width: buf.get_u32_le() as usize,
    })
}

// =============================================================================
// Records
// =============================================================================

/// Encode a sanitized row into a fixed-width record.
///
/// Each column owns a slot of its type's maximum width; unused bytes in a
/// slot are zero.
pub(crate) fn encode_record(schema: &Schema, row: &[Value]) -> Vec<u8> {
    let mut buf = BytesMut::with_capacity(schema.record_width());

    for (column, value) in schema.columns().iter().zip(row) {
        let start = buf.len();
        match value {
            Value::Null => buf.put_i8(NULL_MARKER),
            Value::String(s) => {
                buf.put_u8(s.len() as u8);
                buf.put_slice(s.as_bytes());
            }
            Value::Integer(i) => encode_integer(&mut buf, *i),
            Value::Boolean(b) => buf.put_u8(u8::from(*b)),
        }
        let used = buf.len() - start;
        buf.put_bytes(0, column.ty.max_width() - used);
    }

    buf.to_vec()
}

/// Smallest of i8/i16/i32 that holds the value, behind a width tag
fn encode_integer(buf: &mut BytesMut, value: i32) {
    if let Ok(byte) = i8::try_from(value) {
        buf.put_i8(1);
        buf.put_i8(byte);
    } else if let Ok(short) = i16::try_from(value) {
        buf.put_i8(2);
        buf.put_i16_le(short);
    } else {
        buf.put_i8(4);
        buf.put_i32_le(value);
    }
}

/// Decode a record of exactly `record_width` bytes
pub(crate) fn decode_record(schema: &Schema, record_width: usize, bytes: &[u8]) -> Result<Row> {
    if bytes.len() != record_width {
        return Err(corrupt(format!(
            "record is {} bytes, expected {}",
            bytes.len(),
            record_width
        )));
    }
    if record_width != schema.record_width() {
        return Err(corrupt(format!(
            "record width {} does not match the schema's {}",
            record_width,
            schema.record_width()
        )));
    }

    let mut row = Vec::with_capacity(schema.column_count());
    let mut rest = bytes;

    for column in schema.columns() {
        let (mut field, tail) = rest.split_at(column.ty.max_width());
        rest = tail;

        let value = match column.ty {
            ColumnType::String => match field.get_i8() {
                NULL_MARKER => Value::Null,
                len if len >= 0 => {
                    let s = std::str::from_utf8(&field[..len as usize]).map_err(|e| {
                        corrupt(format!("column `{}` is not UTF-8: {}", column.name, e))
                    })?;
                    Value::String(s.to_string())
                }
                len => {
                    return Err(corrupt(format!(
                        "column `{}` has string length {}",
                        column.name, len
                    )))
                }
            },
            ColumnType::Integer => match field.get_i8() {
                NULL_MARKER => Value::Null,
                1 => Value::Integer(i32::from(field.get_i8())),
                2 => Value::Integer(i32::from(field.get_i16_le())),
                4 => Value::Integer(field.get_i32_le()),
                tag => {
                    return Err(corrupt(format!(
                        "column `{}` has integer width tag {}",
                        column.name, tag
                    )))
                }
            },
            ColumnType::Boolean => match field.get_i8() {
                NULL_MARKER => Value::Null,
                0 => Value::Boolean(false),
                1 => Value::Boolean(true),
                byte => {
                    return Err(corrupt(format!(
                        "column `{}` has boolean byte {}",
                        column.name, byte
                    )))
                }
            },
        };
        row.push(value);
    }

    Ok(row)
}
