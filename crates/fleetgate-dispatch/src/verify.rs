//! Post-state verification loop.
//!
//! After a mutating command (start/stop/restart) completes, the
//! dispatcher issues a verification follow-up — e.g. `docker inspect`
//! checking `.State.Running` — up to [`VERIFY_ATTEMPTS`] times with a
//! [`VERIFY_SETTLE_WINDOW`] pause between attempts, to confirm the
//! expected post-state actually took effect.

use std::time::Duration;

use crate::error::{DispatchError, DispatchResult};

/// Maximum verification attempts.
pub const VERIFY_ATTEMPTS: u32 = 3;

/// Pause between verification attempts.
pub const VERIFY_SETTLE_WINDOW: Duration = Duration::from_millis(500);

/// Poll `check` up to [`VERIFY_ATTEMPTS`] times, pausing
/// [`VERIFY_SETTLE_WINDOW`] between attempts, until it reports the
/// expected state.
pub async fn verify_post_state<F, Fut>(operation_name: &str, mut check: F) -> DispatchResult<()>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = DispatchResult<bool>>,
{
    for attempt in 0..VERIFY_ATTEMPTS {
        if attempt > 0 {
            tokio::time::sleep(VERIFY_SETTLE_WINDOW).await;
        }
        if check().await? {
            return Ok(());
        }
    }
    Err(DispatchError::VerificationFailed {
        operation: operation_name.to_string(),
        attempts: VERIFY_ATTEMPTS,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn succeeds_on_first_check() {
        let result = verify_post_state("start", || async { Ok(true) }).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn succeeds_after_settling() {
        let calls = AtomicU32::new(0);
        let result = verify_post_state("start", || async {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            Ok(n >= 2)
        })
        .await;
        assert!(result.is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn fails_after_exhausting_attempts() {
        let result = verify_post_state("stop", || async { Ok(false) }).await;
        match result {
            Err(DispatchError::VerificationFailed { attempts, .. }) => assert_eq!(attempts, VERIFY_ATTEMPTS),
            other => panic!("expected VerificationFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn propagates_check_errors() {
        let result = verify_post_state("start", || async {
            Err(DispatchError::NoAgent("unreachable".to_string()))
        })
        .await;
        assert!(matches!(result, Err(DispatchError::NoAgent(_))));
    }
}
