//! Cancellation of in-flight requests.
//!
//! A view creates one [`CancelToken`] when it starts fetching and cancels it
//! when it is torn down. Requests made through a client scoped to the token
//! are aborted, and later ones fail immediately with
//! [`ApiError::Cancelled`].

use futures::future::{AbortHandle, Abortable};
use parking_lot::Mutex;
use std::future::Future;
use std::sync::Arc;

use crate::error::{ApiError, Result};

/// Clonable cancellation signal shared between a view and its requests.
#[derive(Clone, Default)]
pub struct CancelToken {
    inner: Arc<Mutex<TokenState>>,
}

#[derive(Default)]
struct TokenState {
    cancelled: bool,
    next_id: u64,
    in_flight: Vec<(u64, AbortHandle)>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Abort everything in flight and refuse new work.
    pub fn cancel(&self) {
        let mut state = self.inner.lock();
        state.cancelled = true;
        for (_, handle) in state.in_flight.drain(..) {
            handle.abort();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.lock().cancelled
    }

    /// Number of futures currently registered with the token.
    pub fn in_flight(&self) -> usize {
        self.inner.lock().in_flight.len()
    }

    /// Drive `future` unless the token is cancelled first.
    pub async fn run<F: Future>(&self, future: F) -> Result<F::Output> {
        let (handle, registration) = AbortHandle::new_pair();
        let id = {
            let mut state = self.inner.lock();
            if state.cancelled {
                return Err(ApiError::Cancelled);
            }
            let id = state.next_id;
            state.next_id += 1;
            state.in_flight.push((id, handle));
            id
        };

        let _entry = InFlight { token: self, id };
        Abortable::new(future, registration)
            .await
            .map_err(|_| ApiError::Cancelled)
    }
}

/// Removes a `run` registration when the call finishes or is dropped
/// before completion.
struct InFlight<'a> {
    token: &'a CancelToken,
    id: u64,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let id = self.id;
        self.token.inner.lock().in_flight.retain(|(entry, _)| *entry != id);
    }
}

impl std::fmt::Debug for CancelToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.lock();
        f.debug_struct("CancelToken")
            .field("cancelled", &state.cancelled)
            .field("in_flight", &state.in_flight.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::future;

    #[tokio::test]
    async fn completes_when_not_cancelled() {
        let token = CancelToken::new();
        let value = token.run(async { 42 }).await.unwrap();
        assert_eq!(value, 42);
        assert_eq!(token.in_flight(), 0);
    }

    #[tokio::test]
    async fn cancelled_token_refuses_new_work() {
        let token = CancelToken::new();
        token.cancel();
        let err = token.run(async { 42 }).await.unwrap_err();
        assert_eq!(err, ApiError::Cancelled);
    }

    #[tokio::test]
    async fn cancel_aborts_pending_future() {
        let token = CancelToken::new();
        let pending = token.run(future::pending::<()>());

        let canceller = token.clone();
        let (outcome, ()) = tokio::join!(pending, async move {
            tokio::task::yield_now().await;
            canceller.cancel();
        });

        assert_eq!(outcome.unwrap_err(), ApiError::Cancelled);
        assert!(token.is_cancelled());
        assert_eq!(token.in_flight(), 0);
    }

    #[tokio::test]
    async fn dropped_run_leaves_nothing_registered() {
        let token = CancelToken::new();
        let pending = Box::pin(token.run(future::pending::<()>()));

        match future::select(pending, future::ready(())).await {
            future::Either::Right(((), pending)) => {
                assert_eq!(token.in_flight(), 1);
                drop(pending);
            }
            future::Either::Left(_) => panic!("pending future completed"),
        }

        assert_eq!(token.in_flight(), 0);
        assert!(!token.is_cancelled());
        assert_eq!(token.run(async { 7 }).await.unwrap(), 7);
    }
}
