// API Test Platform - Persistence Core
//
// This crate provides the generic record-access layer shared by every
// persisted entity of the platform: soft deletion, audit stamping,
// insert-vs-update dispatch, parameter filtering against a static schema,
// pagination, and uniform row normalization.
//
// HTTP handlers, the scheduler, and the test-run queue live elsewhere and
// consume this layer through the `RecordStore` API.

pub mod common;
pub mod config;
pub mod domains;
pub mod store;

pub use config::*;
