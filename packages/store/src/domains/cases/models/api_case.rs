use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use sqlx::SqlitePool;

use crate::common::RequestContext;
use crate::store::{Page, PageArgs, Record, RecordStore, Statement, StoreResult, TableSchema};

/// Case is runnable.
pub const CASE_STATUS_ACTIVE: i64 = 10;
/// Case is kept but excluded from runs.
pub const CASE_STATUS_DISABLED: i64 = 20;

static SCHEMA: TableSchema = TableSchema {
    table: "api_case",
    columns: &[
        "name",
        "project_id",
        "module_id",
        "method",
        "url",
        "headers",
        "body",
        "priority",
        "case_status",
        "remarks",
    ],
};

/// An HTTP test case. `headers` and `body` are JSON text.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ApiCase {
    pub id: i64,
    pub name: String,
    pub project_id: Option<i64>,
    pub module_id: Option<i64>,
    pub method: String,
    pub url: String,
    pub headers: Option<String>,
    pub body: Option<String>,
    pub priority: Option<i64>,
    pub case_status: i64,
    pub remarks: Option<String>,
    pub creation_date: NaiveDateTime,
    pub created_by: Option<i64>,
    pub updation_date: NaiveDateTime,
    pub updated_by: Option<i64>,
    pub enabled_flag: bool,
    pub trace_id: String,
}

impl Record for ApiCase {
    fn schema() -> &'static TableSchema {
        &SCHEMA
    }
}

impl ApiCase {
    pub fn store(pool: &SqlitePool) -> RecordStore<ApiCase> {
        RecordStore::new(pool.clone())
    }

    /// Paginated case list for one project, newest first.
    pub async fn list_by_project(
        project_id: i64,
        args: PageArgs,
        store: &RecordStore<ApiCase>,
    ) -> StoreResult<Page> {
        let stmt = Statement::new(format!(
            "SELECT {} FROM api_case WHERE enabled_flag = 1 AND project_id = ? ORDER BY id DESC",
            SCHEMA.select_list()
        ))
        .bind(project_id);
        store.paginate(stmt, args).await
    }

    /// Enable or disable a case without deleting it.
    pub async fn set_status(
        id: i64,
        case_status: i64,
        ctx: &RequestContext,
        store: &RecordStore<ApiCase>,
    ) -> StoreResult<Map<String, Value>> {
        store
            .create_or_update(json!({ "id": id, "case_status": case_status }), ctx)
            .await
    }
}
