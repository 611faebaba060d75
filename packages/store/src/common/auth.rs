//! Current-actor resolution seam.
//!
//! The store never authenticates anything itself: it hands the ambient token
//! to an `ActorResolver` and treats a resolution failure as "no actor", so
//! audit stamping degrades gracefully in system and background contexts.

use async_trait::async_trait;
use thiserror::Error;

/// The authenticated principal attributed to a create/update operation.
#[derive(Debug, Clone)]
pub struct Actor {
    pub id: i64,
    pub name: Option<String>,
}

/// Errors from the actor-resolution collaborator.
#[derive(Error, Debug)]
pub enum ActorResolutionError {
    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Auth backend unavailable: {0}")]
    Unavailable(String),
}

/// Resolves an ambient auth token to an actor.
#[async_trait]
pub trait ActorResolver: Send + Sync {
    async fn resolve(&self, token: &str) -> Result<Actor, ActorResolutionError>;
}
