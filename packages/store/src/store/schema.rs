//! Static record-type descriptors.
//!
//! Each persisted entity declares a `TableSchema` once at startup: the table
//! name plus its domain columns. The audit columns are shared by every
//! record type. Incoming parameter mappings are filtered against the
//! descriptor, so unknown keys are dropped before any SQL is generated.

use serde_json::{Map, Value};

use super::error::{StoreError, StoreResult};

/// Columns present on every record type.
pub const AUDIT_COLUMNS: &[&str] = &[
    "id",
    "creation_date",
    "created_by",
    "updation_date",
    "updated_by",
    "enabled_flag",
    "trace_id",
];

/// Storage-clock expression used for `updation_date` refreshes.
/// Millisecond precision, matching the column defaults in the migrations.
pub(crate) const NOW_EXPR: &str = "strftime('%Y-%m-%dT%H:%M:%f', 'now')";

/// Read-only descriptor of one record type, established once at startup.
#[derive(Debug)]
pub struct TableSchema {
    pub table: &'static str,
    /// Domain columns only; audit columns are implied.
    pub columns: &'static [&'static str],
}

impl TableSchema {
    /// Whether `name` is a declared column (domain or audit).
    pub fn has_column(&self, name: &str) -> bool {
        AUDIT_COLUMNS.iter().any(|c| *c == name) || self.columns.iter().any(|c| *c == name)
    }

    /// Comma-separated projection of all declared columns.
    pub fn select_list(&self) -> String {
        AUDIT_COLUMNS
            .iter()
            .chain(self.columns.iter())
            .copied()
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Filter a parameter mapping down to declared columns.
    ///
    /// Unknown keys are silently dropped. Anything that is not a JSON object
    /// is rejected before any statement is issued.
    pub fn filter_params(&self, params: &Value) -> StoreResult<Map<String, Value>> {
        let obj = params
            .as_object()
            .ok_or_else(|| StoreError::Validation("parameters must be a mapping".into()))?;
        Ok(obj
            .iter()
            .filter(|(key, _)| self.has_column(key))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect())
    }
}

/// A persisted entity backed by the generic record store.
pub trait Record {
    fn schema() -> &'static TableSchema;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    static SCHEMA: TableSchema = TableSchema {
        table: "widget",
        columns: &["name", "size"],
    };

    #[test]
    fn test_filter_drops_unknown_keys() {
        let params = json!({"name": "a", "bogus": 1, "size": 3});
        let filtered = SCHEMA.filter_params(&params).unwrap();
        assert_eq!(filtered.len(), 2);
        assert!(!filtered.contains_key("bogus"));
    }

    #[test]
    fn test_filter_keeps_audit_columns() {
        let params = json!({"id": 7, "trace_id": "t", "enabled_flag": false});
        let filtered = SCHEMA.filter_params(&params).unwrap();
        assert_eq!(filtered.len(), 3);
    }

    #[test]
    fn test_filter_rejects_non_mapping() {
        let err = SCHEMA.filter_params(&json!("nope")).unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
    }

    #[test]
    fn test_select_list_includes_audit_and_domain() {
        let list = SCHEMA.select_list();
        assert!(list.starts_with("id, creation_date"));
        assert!(list.ends_with("name, size"));
    }
}
