//! Test harness: in-memory SQLite with migrations applied, plus actor
//! resolver doubles for audit-stamping tests.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

use store_core::common::{Actor, ActorResolutionError, ActorResolver};

/// Fresh in-memory database per test.
///
/// A single pooled connection is pinned for the whole test; separate
/// connections to `:memory:` would each see their own database.
pub async fn test_pool() -> SqlitePool {
    // Run tests with: RUST_LOG=debug cargo test -- --nocapture
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();

    let pool = SqlitePoolOptions::new()
        .min_connections(1)
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("connect to in-memory sqlite");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("run migrations");

    pool
}

/// Resolver backed by a fixed token table.
pub struct TokenTableResolver {
    tokens: HashMap<String, i64>,
}

impl TokenTableResolver {
    pub fn with_token(token: &str, actor_id: i64) -> Self {
        let mut tokens = HashMap::new();
        tokens.insert(token.to_string(), actor_id);
        Self { tokens }
    }
}

#[async_trait]
impl ActorResolver for TokenTableResolver {
    async fn resolve(&self, token: &str) -> Result<Actor, ActorResolutionError> {
        match self.tokens.get(token) {
            Some(id) => Ok(Actor {
                id: *id,
                name: None,
            }),
            None => Err(ActorResolutionError::InvalidToken),
        }
    }
}

/// Resolver whose backend is always down.
pub struct FailingResolver;

#[async_trait]
impl ActorResolver for FailingResolver {
    async fn resolve(&self, _token: &str) -> Result<Actor, ActorResolutionError> {
        Err(ActorResolutionError::Unavailable(
            "auth service offline".into(),
        ))
    }
}
