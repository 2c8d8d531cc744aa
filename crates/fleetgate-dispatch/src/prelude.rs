//! Convenience re-exports for callers wiring up dispatch.

pub use crate::dispatcher::Dispatcher;
pub use crate::error::{DispatchError, DispatchResult};
pub use crate::retry::{is_transient_message, retry, RetryConfig};
pub use crate::routing::{no_agent_message, select_executor, select_executor_with_cascade};
pub use crate::verify::{verify_post_state, VERIFY_ATTEMPTS, VERIFY_SETTLE_WINDOW};
