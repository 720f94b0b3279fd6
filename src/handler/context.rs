//! Cancellation context threaded through method invocations.
//!
//! The dispatch entry point takes one ambient [`Context`] per request
//! and forwards it verbatim to handlers registered with a leading
//! context parameter. The dispatcher never enforces deadlines or
//! cancels an in-flight call; observing cancellation is entirely the
//! handler's responsibility.
//!
//! # Example
//!
//! ```
//! use jsonwire::Context;
//!
//! let (ctx, handle) = Context::cancellable();
//! assert!(!ctx.is_cancelled());
//! handle.cancel();
//! assert!(ctx.is_cancelled());
//! ```

use tokio::sync::watch;

/// Ambient cancellation value for one dispatch.
///
/// Cheaply cloneable; clones share the same cancellation state.
///
/// `Context` intentionally does not implement `Deserialize` — that is
/// what lets handler registration tell a leading context argument apart
/// from a positional wire parameter.
#[derive(Debug, Clone)]
pub struct Context {
    cancelled: watch::Receiver<bool>,
}

impl Context {
    /// Create a context that can never be cancelled.
    pub fn new() -> Self {
        let (_tx, rx) = watch::channel(false);
        Self { cancelled: rx }
    }

    /// Create a context together with its cancellation handle.
    pub fn cancellable() -> (Self, CancelHandle) {
        let (tx, rx) = watch::channel(false);
        (Self { cancelled: rx }, CancelHandle { tx })
    }

    /// Check whether cancellation has been signalled.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        *self.cancelled.borrow()
    }

    /// Wait until cancellation is signalled.
    ///
    /// If the [`CancelHandle`] was dropped without cancelling, this
    /// future never completes.
    pub async fn cancelled(&self) {
        let mut rx = self.cancelled.clone();
        loop {
            if *rx.borrow() {
                return;
            }
            if rx.changed().await.is_err() {
                // Handle dropped; cancellation can no longer happen.
                std::future::pending::<()>().await;
            }
        }
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle that signals cancellation to every clone of its [`Context`].
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    /// Signal cancellation. Idempotent.
    pub fn cancel(&self) {
        let _ = self.tx.send(true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_new_context_not_cancelled() {
        let ctx = Context::new();
        assert!(!ctx.is_cancelled());
    }

    #[test]
    fn test_cancel_is_visible() {
        let (ctx, handle) = Context::cancellable();
        assert!(!ctx.is_cancelled());

        handle.cancel();
        assert!(ctx.is_cancelled());

        // Idempotent
        handle.cancel();
        assert!(ctx.is_cancelled());
    }

    #[test]
    fn test_clones_share_state() {
        let (ctx, handle) = Context::cancellable();
        let ctx2 = ctx.clone();

        handle.cancel();
        assert!(ctx.is_cancelled());
        assert!(ctx2.is_cancelled());
    }

    #[tokio::test]
    async fn test_cancelled_wakes_waiter() {
        let (ctx, handle) = Context::cancellable();

        let waiter = tokio::spawn(async move { ctx.cancelled().await });
        tokio::time::sleep(Duration::from_millis(5)).await;
        handle.cancel();

        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("waiter should complete after cancel")
            .unwrap();
    }

    #[tokio::test]
    async fn test_cancelled_completes_immediately_if_already_cancelled() {
        let (ctx, handle) = Context::cancellable();
        handle.cancel();

        tokio::time::timeout(Duration::from_millis(100), ctx.cancelled())
            .await
            .expect("already-cancelled context should not block");
    }

    #[tokio::test]
    async fn test_never_cancelled_context_pends() {
        let ctx = Context::new();

        let result = tokio::time::timeout(Duration::from_millis(20), ctx.cancelled()).await;
        assert!(result.is_err(), "non-cancellable context must never fire");
    }

    #[tokio::test]
    async fn test_dropped_handle_pends() {
        let (ctx, handle) = Context::cancellable();
        drop(handle);

        assert!(!ctx.is_cancelled());
        let result = tokio::time::timeout(Duration::from_millis(20), ctx.cancelled()).await;
        assert!(result.is_err());
    }
}
