//! Request-scoped context.

use tracing::Span;
use uuid::Uuid;

/// Request-scoped data passed to store reads and used to tag log output.
///
/// The context does not carry cancellation; it only identifies the request
/// a store read or log line belongs to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestContext {
    request_id: String,
}

impl RequestContext {
    /// Creates a context with a freshly generated request id.
    pub fn new() -> Self {
        Self {
            request_id: Uuid::new_v4().to_string(),
        }
    }

    /// Creates a context for an existing request id.
    ///
    /// Blank ids are replaced with a generated one.
    pub fn with_request_id(request_id: impl Into<String>) -> Self {
        let request_id = request_id.into();
        if request_id.trim().is_empty() {
            return Self::new();
        }
        Self { request_id }
    }

    /// Returns the request id.
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// Returns a span tagged with this request's id.
    pub fn span(&self) -> Span {
        tracing::info_span!("request", request_id = %self.request_id)
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}
