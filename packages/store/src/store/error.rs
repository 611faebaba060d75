use thiserror::Error;

/// Errors surfaced by the record store.
///
/// `Validation` is raised before any statement is issued; `Storage` wraps
/// whatever the engine reports and is propagated unchanged, no retries.
/// Not-found is `Ok(None)`, never an error.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Invalid parameters: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;
