// ── State streams ──
//
// Subscription handles vended by `Slice::subscribe`. Consumers either
// poll `changed()` in a loop or convert into a `Stream` and use the
// usual combinators.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_core::Stream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

/// A live subscription to one module's state slice.
pub struct StateStream<S> {
    current: Arc<S>,
    receiver: watch::Receiver<Arc<S>>,
}

impl<S> StateStream<S>
where
    S: Send + Sync + 'static,
{
    pub(crate) fn new(receiver: watch::Receiver<Arc<S>>) -> Self {
        let current = receiver.borrow().clone();
        Self { current, receiver }
    }

    /// The snapshot captured at subscription time, refreshed by each
    /// successful `changed()`.
    pub fn current(&self) -> &Arc<S> {
        &self.current
    }

    /// The latest published snapshot, which may be newer than
    /// `current()` if changes arrived since the last `changed()`.
    pub fn latest(&self) -> Arc<S> {
        self.receiver.borrow().clone()
    }

    /// Wait for the next snapshot. Returns `None` once the owning slice
    /// has been dropped.
    ///
    /// Intermediate snapshots may be skipped under load; only the
    /// newest one is returned.
    pub async fn changed(&mut self) -> Option<Arc<S>> {
        self.receiver.changed().await.ok()?;
        let snapshot = self.receiver.borrow_and_update().clone();
        self.current = Arc::clone(&snapshot);
        Some(snapshot)
    }

    /// Convert into a [`Stream`] of snapshots. The stream yields the
    /// current snapshot first, then one item per change.
    pub fn into_stream(self) -> StateWatchStream<S> {
        StateWatchStream {
            inner: WatchStream::new(self.receiver),
        }
    }
}

/// `Stream` adapter over a slice's `watch` channel.
pub struct StateWatchStream<S> {
    inner: WatchStream<Arc<S>>,
}

impl<S> Stream for StateWatchStream<S>
where
    S: Send + Sync + 'static,
{
    type Item = Arc<S>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use tokio_stream::StreamExt;

    fn channel(initial: u32) -> (watch::Sender<Arc<u32>>, StateStream<u32>) {
        let (tx, rx) = watch::channel(Arc::new(initial));
        (tx, StateStream::new(rx))
    }

    #[tokio::test]
    async fn changed_returns_the_newest_snapshot() {
        let (tx, mut stream) = channel(0);
        assert_eq!(**stream.current(), 0);

        tx.send(Arc::new(1)).unwrap();
        tx.send(Arc::new(2)).unwrap();

        let next = stream.changed().await.unwrap();
        assert_eq!(*next, 2);
        assert_eq!(**stream.current(), 2);
    }

    #[tokio::test]
    async fn changed_ends_when_the_slice_is_dropped() {
        let (tx, mut stream) = channel(0);
        drop(tx);
        assert!(stream.changed().await.is_none());
    }

    #[tokio::test]
    async fn into_stream_yields_current_then_changes() {
        let (tx, stream) = channel(10);
        let mut stream = stream.into_stream();

        assert_eq!(*stream.next().await.unwrap(), 10);
        tx.send(Arc::new(11)).unwrap();
        assert_eq!(*stream.next().await.unwrap(), 11);
    }
}
