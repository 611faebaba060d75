//! Per-call request context.
//!
//! Trace and auth data are threaded through every store operation as an
//! explicit parameter instead of living in process-wide globals, so
//! concurrent requests stay isolated.

use uuid::Uuid;

/// Request-scoped context carried into every store operation.
///
/// `trace_id` is persisted with each written row for cross-request
/// correlation. `token` is handed to the `ActorResolver` for audit stamping;
/// when it is absent the operation proceeds without an actor.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub trace_id: Option<String>,
    pub token: Option<String>,
}

impl RequestContext {
    /// Context for an inbound request; mints a fresh trace id.
    pub fn for_request() -> Self {
        Self {
            trace_id: Some(Uuid::new_v4().to_string()),
            token: None,
        }
    }

    /// Context for background and system work: no trace, no actor.
    pub fn background() -> Self {
        Self::default()
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.trace_id = Some(trace_id.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_request_mints_trace_id() {
        let ctx = RequestContext::for_request();
        assert!(ctx.trace_id.is_some());
        assert!(ctx.token.is_none());
    }

    #[test]
    fn test_background_carries_nothing() {
        let ctx = RequestContext::background();
        assert!(ctx.trace_id.is_none());
        assert!(ctx.token.is_none());
    }
}
