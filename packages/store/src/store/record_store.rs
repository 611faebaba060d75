//! Generic record store.
//!
//! One store instance per record type, composed from a connection pool, an
//! optional actor resolver, and the type's static `TableSchema`. Every
//! public operation acquires one pooled connection for its full duration and
//! releases it on all exit paths; multi-statement operations (insert plus
//! primary-key read-back) run on that single connection. There is no
//! cross-call transaction spanning.

use std::marker::PhantomData;
use std::sync::Arc;

use serde_json::{Map, Value};
use sqlx::sqlite::{SqlitePool, SqliteQueryResult, SqliteRow};
use sqlx::{FromRow, Row};

use crate::common::{ActorResolver, RequestContext};

use super::error::{StoreError, StoreResult};
use super::pagination::{Page, PageArgs};
use super::rows::{row_to_map, rows_to_maps};
use super::schema::{Record, TableSchema, NOW_EXPR};
use super::statement::Statement;

/// Data access for one record type `T`.
pub struct RecordStore<T: Record> {
    pool: SqlitePool,
    resolver: Option<Arc<dyn ActorResolver>>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Record> Clone for RecordStore<T> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            resolver: self.resolver.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T: Record> RecordStore<T> {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            resolver: None,
            _marker: PhantomData,
        }
    }

    /// Attach the actor-resolution collaborator used for audit stamping.
    pub fn with_resolver(pool: SqlitePool, resolver: Arc<dyn ActorResolver>) -> Self {
        Self {
            pool,
            resolver: Some(resolver),
            _marker: PhantomData,
        }
    }

    /// Fetch one enabled row by id as a typed record.
    pub async fn get(&self, id: i64) -> StoreResult<Option<T>>
    where
        T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
    {
        let sql = format!(
            "SELECT * FROM {} WHERE id = ? AND enabled_flag = 1",
            T::schema().table
        );
        let mut conn = self.pool.acquire().await?;
        let row = sqlx::query_as::<_, T>(&sql)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;
        Ok(row)
    }

    /// Fetch one enabled row by id as a flattened mapping.
    pub async fn get_map(&self, id: i64) -> StoreResult<Option<Map<String, Value>>> {
        let schema = T::schema();
        let stmt = Statement::new(format!(
            "SELECT {} FROM {} WHERE id = ? AND enabled_flag = 1",
            schema.select_list(),
            schema.table
        ))
        .bind(id);
        self.query_first(stmt).await
    }

    /// All enabled rows, projected to declared columns. Unpaginated; callers
    /// are responsible for bounding use to small tables.
    pub async fn get_all(&self) -> StoreResult<Vec<Map<String, Value>>> {
        let schema = T::schema();
        let stmt = Statement::new(format!(
            "SELECT {} FROM {} WHERE enabled_flag = 1",
            schema.select_list(),
            schema.table
        ));
        let mut conn = self.pool.acquire().await?;
        let rows = stmt.query().fetch_all(&mut *conn).await?;
        rows_to_maps(&rows)
    }

    /// Insert or update one row, dispatching on a truthy `id` in `params`.
    ///
    /// Parameters are filtered to declared columns; `trace_id` is stamped
    /// from the context when present; the resolved actor stamps `updated_by`
    /// (and `created_by` on insert). On insert, the generated id is written
    /// back into the returned mapping.
    pub async fn create_or_update(
        &self,
        params: Value,
        ctx: &RequestContext,
    ) -> StoreResult<Map<String, Value>> {
        let schema = T::schema();
        let mut params = schema.filter_params(&params)?;
        let id = params.get("id").and_then(truthy_id);
        if let Some(trace_id) = &ctx.trace_id {
            params.insert("trace_id".to_string(), Value::from(trace_id.clone()));
        }
        if let Some(actor_id) = self.resolve_actor(ctx).await {
            params.insert("updated_by".to_string(), Value::from(actor_id));
            if id.is_none() {
                params.insert("created_by".to_string(), Value::from(actor_id));
            }
        }

        let mut conn = self.pool.acquire().await?;
        match id {
            Some(id) => {
                update_statement(schema, &params, id)
                    .query()
                    .execute(&mut *conn)
                    .await?;
            }
            None => {
                let result = insert_statement(schema, &params)
                    .query()
                    .execute(&mut *conn)
                    .await?;
                params.insert("id".to_string(), Value::from(result.last_insert_rowid()));
            }
        }
        Ok(params)
    }

    /// Insert one row; returns the filtered mapping with the generated id.
    pub async fn create(
        &self,
        params: Value,
        ctx: &RequestContext,
    ) -> StoreResult<Map<String, Value>> {
        let schema = T::schema();
        let mut params = schema.filter_params(&params)?;
        if let Some(trace_id) = &ctx.trace_id {
            params.insert("trace_id".to_string(), Value::from(trace_id.clone()));
        }
        let mut conn = self.pool.acquire().await?;
        let result = insert_statement(schema, &params)
            .query()
            .execute(&mut *conn)
            .await?;
        params.insert("id".to_string(), Value::from(result.last_insert_rowid()));
        Ok(params)
    }

    /// Insert one row and read it back, defaults included, on the same
    /// connection.
    pub async fn create_returning(&self, params: Value, ctx: &RequestContext) -> StoreResult<T>
    where
        T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
    {
        let schema = T::schema();
        let mut params = schema.filter_params(&params)?;
        if let Some(trace_id) = &ctx.trace_id {
            params.insert("trace_id".to_string(), Value::from(trace_id.clone()));
        }
        let mut conn = self.pool.acquire().await?;
        let result = insert_statement(schema, &params)
            .query()
            .execute(&mut *conn)
            .await?;
        let sql = format!("SELECT * FROM {} WHERE id = ?", schema.table);
        let record = sqlx::query_as::<_, T>(&sql)
            .bind(result.last_insert_rowid())
            .fetch_one(&mut *conn)
            .await?;
        Ok(record)
    }

    /// Bulk insert. `params` must be a JSON array of mappings; each element
    /// is filtered and stamped independently. One multi-row INSERT, so the
    /// engine's statement atomicity applies. Returns rows inserted.
    pub async fn batch_create(&self, params: Value, ctx: &RequestContext) -> StoreResult<u64> {
        let schema = T::schema();
        let items = params.as_array().ok_or_else(|| {
            StoreError::Validation("parameters must be a sequence of mappings".into())
        })?;
        let actor_id = self.resolve_actor(ctx).await;
        let mut rows = Vec::with_capacity(items.len());
        for item in items {
            let mut row = schema.filter_params(item)?;
            if let Some(trace_id) = &ctx.trace_id {
                row.insert("trace_id".to_string(), Value::from(trace_id.clone()));
            }
            if let Some(actor_id) = actor_id {
                row.insert("updated_by".to_string(), Value::from(actor_id));
                row.insert("created_by".to_string(), Value::from(actor_id));
            }
            rows.push(row);
        }
        if rows.is_empty() {
            return Ok(0);
        }
        // A batch where nothing survives filtering has no columns to insert.
        if rows.iter().all(|row| row.is_empty()) {
            return Err(StoreError::Validation(
                "no recognized attributes in batch".into(),
            ));
        }
        let mut conn = self.pool.acquire().await?;
        let result = batch_insert_statement(schema, &rows)
            .query()
            .execute(&mut *conn)
            .await?;
        Ok(result.rows_affected())
    }

    /// Soft delete by default (flips `enabled_flag`, idempotent); hard
    /// delete removes the row regardless of its flag. Returns rows affected.
    pub async fn delete(&self, id: i64, hard: bool) -> StoreResult<u64> {
        let schema = T::schema();
        let stmt = if hard {
            Statement::new(format!("DELETE FROM {} WHERE id = ?", schema.table)).bind(id)
        } else {
            Statement::new(format!(
                "UPDATE {} SET enabled_flag = 0, updation_date = {} WHERE id = ? AND enabled_flag = 1",
                schema.table, NOW_EXPR
            ))
            .bind(id)
        };
        let mut conn = self.pool.acquire().await?;
        let result = stmt.query().execute(&mut *conn).await?;
        tracing::debug!(
            table = schema.table,
            id,
            hard,
            rows = result.rows_affected(),
            "delete"
        );
        Ok(result.rows_affected())
    }

    /// Escape hatch: run an arbitrary statement within a scoped connection
    /// and return the engine-native result.
    pub async fn execute(&self, stmt: Statement) -> StoreResult<SqliteQueryResult> {
        let mut conn = self.pool.acquire().await?;
        Ok(stmt.query().execute(&mut *conn).await?)
    }

    /// Run a query statement and return one page of normalized rows plus
    /// the total count, both computed on the same connection.
    pub async fn paginate(&self, stmt: Statement, args: PageArgs) -> StoreResult<Page> {
        let args = args.validate();
        let mut conn = self.pool.acquire().await?;
        let total_row = stmt.counted().query().fetch_one(&mut *conn).await?;
        let total: i64 = total_row.try_get(0)?;
        let rows = stmt
            .paged(args.limit(), args.offset())
            .query()
            .fetch_all(&mut *conn)
            .await?;
        let items = rows_to_maps(&rows)?;
        Ok(Page::build(items, total, args))
    }

    /// Run a query statement and return the first row as a mapping, or
    /// `None` when nothing matches.
    pub async fn query_first(&self, stmt: Statement) -> StoreResult<Option<Map<String, Value>>> {
        let mut conn = self.pool.acquire().await?;
        let row = stmt.query().fetch_optional(&mut *conn).await?;
        row.as_ref().map(row_to_map).transpose()
    }

    /// Run a query statement and return all rows as mappings, or `None`
    /// when the result set is empty.
    pub async fn query_all(&self, stmt: Statement) -> StoreResult<Option<Vec<Map<String, Value>>>> {
        let mut conn = self.pool.acquire().await?;
        let rows = stmt.query().fetch_all(&mut *conn).await?;
        if rows.is_empty() {
            return Ok(None);
        }
        Ok(Some(rows_to_maps(&rows)?))
    }

    /// Resolve the acting user from the context token.
    ///
    /// A resolution failure means "no actor": the write proceeds without
    /// audit stamping instead of failing.
    async fn resolve_actor(&self, ctx: &RequestContext) -> Option<i64> {
        let token = ctx.token.as_deref()?;
        let resolver = self.resolver.as_ref()?;
        match resolver.resolve(token).await {
            Ok(actor) => Some(actor.id),
            Err(err) => {
                tracing::debug!(error = %err, "actor resolution failed, proceeding without actor");
                None
            }
        }
    }
}

/// A truthy identifier: a non-zero integer, or its string representation.
fn truthy_id(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().filter(|id| *id != 0),
        Value::String(s) => s.parse::<i64>().ok().filter(|id| *id != 0),
        _ => None,
    }
}

fn insert_statement(schema: &TableSchema, params: &Map<String, Value>) -> Statement {
    if params.is_empty() {
        return Statement::new(format!("INSERT INTO {} DEFAULT VALUES", schema.table));
    }
    let columns: Vec<&str> = params.keys().map(String::as_str).collect();
    let placeholders = vec!["?"; columns.len()].join(", ");
    let mut stmt = Statement::new(format!(
        "INSERT INTO {} ({}) VALUES ({})",
        schema.table,
        columns.join(", "),
        placeholders
    ));
    for value in params.values() {
        stmt = stmt.bind(value.clone());
    }
    stmt
}

/// UPDATE never touches `id` or `creation_date`; `updation_date` is always
/// refreshed from the storage clock.
fn update_statement(schema: &TableSchema, params: &Map<String, Value>, id: i64) -> Statement {
    let mut sets = Vec::new();
    let mut values = Vec::new();
    for (key, value) in params {
        if key == "id" || key == "creation_date" {
            continue;
        }
        sets.push(format!("{key} = ?"));
        values.push(value.clone());
    }
    sets.push(format!("updation_date = {NOW_EXPR}"));
    let mut stmt = Statement::new(format!(
        "UPDATE {} SET {} WHERE id = ?",
        schema.table,
        sets.join(", ")
    ));
    for value in values {
        stmt = stmt.bind(value);
    }
    stmt.bind(id)
}

/// Multi-row INSERT over the union of per-row keys; rows missing a key bind
/// NULL for that column.
fn batch_insert_statement(schema: &TableSchema, rows: &[Map<String, Value>]) -> Statement {
    let mut columns: Vec<&str> = Vec::new();
    for row in rows {
        for key in row.keys() {
            if !columns.contains(&key.as_str()) {
                columns.push(key.as_str());
            }
        }
    }
    let group = format!("({})", vec!["?"; columns.len()].join(", "));
    let groups = vec![group; rows.len()].join(", ");
    let mut stmt = Statement::new(format!(
        "INSERT INTO {} ({}) VALUES {}",
        schema.table,
        columns.join(", "),
        groups
    ));
    for row in rows {
        for column in &columns {
            stmt = stmt.bind(row.get(*column).cloned().unwrap_or(Value::Null));
        }
    }
    stmt
}
