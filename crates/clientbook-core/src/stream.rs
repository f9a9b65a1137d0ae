// ── Reactive store subscription ──
//
// Subscription handle for consuming store changes.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures_core::Stream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::store::StoreState;

/// A subscription to a [`ClientStore`](crate::ClientStore).
///
/// Provides both point-in-time snapshot access and change notification
/// via [`changed()`](Self::changed) or by converting to a `Stream`.
pub struct StoreStream {
    current: StoreState,
    receiver: watch::Receiver<StoreState>,
}

impl StoreStream {
    pub(crate) fn new(receiver: watch::Receiver<StoreState>) -> Self {
        let current = receiver.borrow().clone();
        Self { current, receiver }
    }

    /// The state captured at creation or at the last `changed()`.
    pub fn current(&self) -> &StoreState {
        &self.current
    }

    /// The latest state (may have changed since creation).
    pub fn latest(&self) -> StoreState {
        self.receiver.borrow().clone()
    }

    /// Wait for the next change, returning the new state.
    /// Returns `None` once every store handle has been dropped.
    pub async fn changed(&mut self) -> Option<StoreState> {
        self.receiver.changed().await.ok()?;
        let state = self.receiver.borrow_and_update().clone();
        self.current = state.clone();
        Some(state)
    }

    /// Convert into a `Stream` for use with `StreamExt` combinators.
    pub fn into_stream(self) -> StoreWatchStream {
        StoreWatchStream {
            inner: WatchStream::new(self.receiver),
        }
    }
}

/// `Stream` adapter backed by a `watch::Receiver`. Yields the current
/// state first, then one item per change.
pub struct StoreWatchStream {
    inner: WatchStream<StoreState>,
}

impl Stream for StoreWatchStream {
    type Item = StoreState;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}
