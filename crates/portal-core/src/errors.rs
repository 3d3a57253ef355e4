use portal_core_types::{RequestContext, RequestId, TraceId};

/// Result type alias used across the query path
pub type Result<T> = std::result::Result<T, ExError>;

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that callers and the transport
/// boundary can match on without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Caller input
    InvalidInput,
    InvalidExpression,
    NotFound,

    // Store-reported
    /// The store rejected the request shape (unknown index, zero limit, ...)
    Validation,
    /// The store asked us to slow down; surfaced unmodified, never retried here
    Throttled,
    Persistence,

    // Encoding
    Serialization,

    Io,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::InvalidExpression => "ERR_INVALID_EXPRESSION",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::Validation => "ERR_VALIDATION",
            ExErrorKind::Throttled => "ERR_THROTTLED",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Io => "ERR_IO",
        }
    }
}

/// Canonical structured error type
///
/// Carries a classification (`kind`) for programmatic handling plus optional
/// context for debugging. Store, expression and validation failures all end
/// up here before they cross the transport boundary.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity_id: Option<String>,
    request_id: Option<RequestId>,
    trace_id: Option<TraceId>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_id: None,
            request_id: None,
            trace_id: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add entity ID context (work id, index name, ...)
    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    pub fn with_trace_id(mut self, trace_id: TraceId) -> Self {
        self.trace_id = Some(trace_id);
        self
    }

    /// Attach the request and trace ids of `ctx`
    pub fn with_context(self, ctx: &RequestContext) -> Self {
        let err = self.with_request_id(ctx.request_id.clone());
        match &ctx.trace_id {
            Some(trace_id) => err.with_trace_id(trace_id.clone()),
            None => err,
        }
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    pub fn trace_id(&self) -> Option<&TraceId> {
        self.trace_id.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(entity_id) = &self.entity_id {
            write!(f, " (entity_id: {})", entity_id)?;
        }
        if let Some(request_id) = &self.request_id {
            write!(f, " (request_id: {})", request_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

impl From<serde_json::Error> for ExError {
    fn from(err: serde_json::Error) -> Self {
        ExError::new(ExErrorKind::Serialization).with_message(err.to_string())
    }
}

/// Shorthand for a rejected caller argument
pub fn invalid_input(op: &str, message: impl Into<String>) -> ExError {
    ExError::new(ExErrorKind::InvalidInput)
        .with_op(op)
        .with_message(message)
}

/// Shorthand for a request shape the store refuses to execute
pub fn store_validation(op: &str, message: impl Into<String>) -> ExError {
    ExError::new(ExErrorKind::Validation)
        .with_op(op)
        .with_message(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_unique() {
        let kinds = [
            ExErrorKind::InvalidInput,
            ExErrorKind::InvalidExpression,
            ExErrorKind::NotFound,
            ExErrorKind::Validation,
            ExErrorKind::Throttled,
            ExErrorKind::Persistence,
            ExErrorKind::Serialization,
            ExErrorKind::Io,
        ];
        let mut codes: Vec<_> = kinds.iter().map(|k| k.code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), kinds.len());
    }

    #[test]
    fn test_display_includes_context() {
        let err = ExError::new(ExErrorKind::Validation)
            .with_op("index_query")
            .with_entity_id("missing-index")
            .with_message("index not found");

        let text = err.to_string();
        assert!(text.starts_with("[ERR_VALIDATION]"));
        assert!(text.contains("index_query"));
        assert!(text.contains("missing-index"));
    }

    #[test]
    fn test_source_chain() {
        let inner = ExError::new(ExErrorKind::Throttled).with_message("slow down");
        let outer = ExError::new(ExErrorKind::Persistence).with_source(inner);

        assert_eq!(
            outer.source_error().map(|e| e.kind()),
            Some(ExErrorKind::Throttled)
        );
        assert!(std::error::Error::source(&outer).is_some());
    }

    #[test]
    fn test_with_context_copies_correlation_ids() {
        let ctx = RequestContext::with_request_id(RequestId::from_string("req-1".to_string()))
            .with_trace_id(TraceId::from_string("trace-1".to_string()));
        let err = ExError::new(ExErrorKind::Throttled).with_context(&ctx);
        assert_eq!(err.request_id().map(|r| r.as_str()), Some("req-1"));
        assert_eq!(err.trace_id().map(|t| t.as_str()), Some("trace-1"));

        let bare = ExError::new(ExErrorKind::Throttled).with_context(&RequestContext::new());
        assert!(bare.trace_id().is_none());
    }

    #[test]
    fn test_from_serde_json() {
        let err: ExError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert_eq!(err.kind(), ExErrorKind::Serialization);
    }
}
