// Generic record-access layer: one store implementation parameterized over a
// record-type descriptor, composed into each concrete entity.

pub mod error;
pub mod pagination;
pub mod record_store;
pub mod rows;
pub mod schema;
pub mod statement;

pub use error::{StoreError, StoreResult};
pub use pagination::{Page, PageArgs, ValidatedPageArgs};
pub use record_store::RecordStore;
pub use rows::{row_to_map, rows_to_maps};
pub use schema::{Record, TableSchema, AUDIT_COLUMNS};
pub use statement::Statement;
