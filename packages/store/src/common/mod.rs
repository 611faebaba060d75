// Common types shared across the application

pub mod auth;
pub mod context;

pub use auth::{Actor, ActorResolutionError, ActorResolver};
pub use context::RequestContext;
