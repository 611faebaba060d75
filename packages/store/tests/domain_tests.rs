//! Domain-model behavior layered on the generic store: case status flips,
//! task switching, and filtered task lists.

mod common;

use serde_json::{json, Value};

use common::test_pool;
use store_core::common::RequestContext;
use store_core::domains::cases::models::{ApiCase, CASE_STATUS_ACTIVE, CASE_STATUS_DISABLED};
use store_core::domains::schedules::models::{TimedTask, TASK_OFF, TASK_ON};
use store_core::store::{PageArgs, StoreError};

#[tokio::test]
async fn test_set_case_status() {
    let pool = test_pool().await;
    let store = ApiCase::store(&pool);
    let ctx = RequestContext::for_request();

    let created = store
        .create(
            json!({"name": "status", "method": "GET", "url": "/", "case_status": CASE_STATUS_ACTIVE}),
            &ctx,
        )
        .await
        .unwrap();
    let id = created.get("id").and_then(Value::as_i64).unwrap();

    ApiCase::set_status(id, CASE_STATUS_DISABLED, &ctx, &store)
        .await
        .unwrap();

    let row = store.get(id).await.unwrap().unwrap();
    assert_eq!(row.case_status, CASE_STATUS_DISABLED);
}

#[tokio::test]
async fn test_task_switch_toggles_status() {
    let pool = test_pool().await;
    let store = TimedTask::store(&pool);
    let ctx = RequestContext::for_request();

    let created = TimedTask::save_or_update(
        json!({"name": "nightly", "cron": "0 2 * * *", "status": TASK_OFF}),
        &ctx,
        &store,
    )
    .await
    .unwrap();
    let id = created.get("id").and_then(Value::as_i64).unwrap();

    assert_eq!(
        TimedTask::task_switch(id, &ctx, &store).await.unwrap(),
        Some(TASK_ON)
    );
    assert_eq!(
        TimedTask::task_switch(id, &ctx, &store).await.unwrap(),
        Some(TASK_OFF)
    );
    assert_eq!(
        TimedTask::task_switch(999_999, &ctx, &store).await.unwrap(),
        None
    );
}

#[tokio::test]
async fn test_new_tasks_require_cron() {
    let pool = test_pool().await;
    let store = TimedTask::store(&pool);
    let ctx = RequestContext::for_request();

    let err = TimedTask::save_or_update(json!({"name": "no-cron"}), &ctx, &store)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));

    // Updates of existing tasks may omit the cron expression.
    let created = TimedTask::save_or_update(
        json!({"name": "hourly", "cron": "0 * * * *"}),
        &ctx,
        &store,
    )
    .await
    .unwrap();
    let id = created.get("id").and_then(Value::as_i64).unwrap();
    TimedTask::save_or_update(json!({"id": id, "name": "renamed"}), &ctx, &store)
        .await
        .unwrap();
    assert_eq!(store.get(id).await.unwrap().unwrap().name, "renamed");
}

#[tokio::test]
async fn test_task_list_filters_by_name() {
    let pool = test_pool().await;
    let store = TimedTask::store(&pool);
    let ctx = RequestContext::for_request();

    for name in ["smoke-morning", "smoke-evening", "regression"] {
        TimedTask::save_or_update(
            json!({"name": name, "cron": "0 0 * * *"}),
            &ctx,
            &store,
        )
        .await
        .unwrap();
    }

    let page = TimedTask::list(Some("smoke"), PageArgs::default(), &store)
        .await
        .unwrap();
    assert_eq!(page.total, 2);

    let page = TimedTask::list(None, PageArgs::default(), &store)
        .await
        .unwrap();
    assert_eq!(page.total, 3);
}
