use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use sqlx::SqlitePool;

use crate::common::RequestContext;
use crate::store::{
    Page, PageArgs, Record, RecordStore, Statement, StoreError, StoreResult, TableSchema,
};

pub const TASK_ON: i64 = 1;
pub const TASK_OFF: i64 = 0;

static SCHEMA: TableSchema = TableSchema {
    table: "timed_task",
    columns: &[
        "name",
        "task_type",
        "cron",
        "case_ids",
        "status",
        "project_id",
        "remarks",
    ],
};

/// A scheduled test run. `case_ids` is JSON text listing the cases the
/// scheduler executes on each trigger.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TimedTask {
    pub id: i64,
    pub name: String,
    pub task_type: Option<String>,
    pub cron: String,
    pub case_ids: Option<String>,
    pub status: i64,
    pub project_id: Option<i64>,
    pub remarks: Option<String>,
    pub creation_date: NaiveDateTime,
    pub created_by: Option<i64>,
    pub updation_date: NaiveDateTime,
    pub updated_by: Option<i64>,
    pub enabled_flag: bool,
    pub trace_id: String,
}

impl Record for TimedTask {
    fn schema() -> &'static TableSchema {
        &SCHEMA
    }
}

impl TimedTask {
    pub fn store(pool: &SqlitePool) -> RecordStore<TimedTask> {
        RecordStore::new(pool.clone())
    }

    /// Paginated task list, optionally filtered by name substring.
    pub async fn list(
        name: Option<&str>,
        args: PageArgs,
        store: &RecordStore<TimedTask>,
    ) -> StoreResult<Page> {
        let stmt = match name {
            Some(name) => Statement::new(format!(
                "SELECT {} FROM timed_task WHERE enabled_flag = 1 AND name LIKE ? ORDER BY id DESC",
                SCHEMA.select_list()
            ))
            .bind(format!("%{name}%")),
            None => Statement::new(format!(
                "SELECT {} FROM timed_task WHERE enabled_flag = 1 ORDER BY id DESC",
                SCHEMA.select_list()
            )),
        };
        store.paginate(stmt, args).await
    }

    /// Create or update a task. New tasks must carry a cron expression.
    pub async fn save_or_update(
        params: Value,
        ctx: &RequestContext,
        store: &RecordStore<TimedTask>,
    ) -> StoreResult<Map<String, Value>> {
        let obj = params
            .as_object()
            .ok_or_else(|| StoreError::Validation("parameters must be a mapping".into()))?;
        let has_id = obj.get("id").and_then(Value::as_i64).unwrap_or(0) != 0;
        if !has_id {
            let cron_ok = obj
                .get("cron")
                .and_then(Value::as_str)
                .is_some_and(|cron| !cron.trim().is_empty());
            if !cron_ok {
                return Err(StoreError::Validation(
                    "a cron expression is required".into(),
                ));
            }
        }
        store.create_or_update(params, ctx).await
    }

    /// Toggle a task on or off; returns the new status, or `None` when the
    /// task does not exist.
    pub async fn task_switch(
        id: i64,
        ctx: &RequestContext,
        store: &RecordStore<TimedTask>,
    ) -> StoreResult<Option<i64>> {
        let Some(task) = store.get(id).await? else {
            return Ok(None);
        };
        let next = if task.status == TASK_ON {
            TASK_OFF
        } else {
            TASK_ON
        };
        store
            .create_or_update(json!({ "id": id, "status": next }), ctx)
            .await?;
        Ok(Some(next))
    }
}
