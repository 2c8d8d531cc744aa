//! Request correlation across the classifier → resolution → policy →
//! dispatch pipeline.

use tracing::Span;
use tracing::span::EnteredSpan;
use uuid::Uuid;

/// Identifies one tool invocation as it flows through the pipeline, so
/// trace output from every stage can be correlated.
#[derive(Debug, Clone)]
pub struct RequestContext {
    component: String,
    operation: Option<String>,
    request_id: Uuid,
}

impl RequestContext {
    /// Start a new context for `component` (e.g. `"classifier"`,
    /// `"policy_pipeline"`).
    pub fn new(component: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            operation: None,
            request_id: Uuid::new_v4(),
        }
    }

    /// Attach an operation name, e.g. `"evaluate"` or `"dispatch"`.
    #[must_use]
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.operation = Some(operation.into());
        self
    }

    /// The correlation id for this request.
    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    /// Build the `tracing::Span` for this context.
    pub fn span(&self) -> Span {
        tracing::info_span!(
            "gating_request",
            component = %self.component,
            operation = self.operation.as_deref().unwrap_or("unspecified"),
            request_id = %self.request_id,
        )
    }

    /// Enter the span for the lifetime of the returned guard.
    pub fn enter(&self) -> RequestGuard {
        RequestGuard(self.span().entered())
    }
}

/// Owned span guard returned by [`RequestContext::enter`]. The span is
/// exited when this value is dropped.
pub struct RequestGuard(EnteredSpan);
