//! Row normalization: engine rows to plain JSON mappings.
//!
//! Callers of the store never see `SqliteRow`; every multi-column result is
//! flattened here, whatever shape the individual columns take.

use serde_json::{Map, Value};
use sqlx::sqlite::SqliteRow;
use sqlx::{Column, Row, TypeInfo, ValueRef};

use super::error::StoreResult;

/// Flatten one row into a column-name → JSON value mapping.
pub fn row_to_map(row: &SqliteRow) -> StoreResult<Map<String, Value>> {
    let mut out = Map::new();
    for (index, column) in row.columns().iter().enumerate() {
        let raw = row.try_get_raw(index)?;
        let value = if raw.is_null() {
            Value::Null
        } else {
            match raw.type_info().name() {
                "INTEGER" => Value::from(row.try_get::<i64, _>(index)?),
                "BOOLEAN" => Value::from(row.try_get::<bool, _>(index)?),
                "REAL" => Value::from(row.try_get::<f64, _>(index)?),
                "BLOB" => Value::from(hex::encode(row.try_get::<Vec<u8>, _>(index)?)),
                // TEXT, DATETIME, and anything else stored textually.
                _ => Value::from(row.try_get::<String, _>(index)?),
            }
        };
        out.insert(column.name().to_string(), value);
    }
    Ok(out)
}

/// Flatten a result set into a sequence of mappings.
pub fn rows_to_maps(rows: &[SqliteRow]) -> StoreResult<Vec<Map<String, Value>>> {
    rows.iter().map(row_to_map).collect()
}
