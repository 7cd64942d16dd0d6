// ── State slices ──
//
// One module's namespaced state plus its reducer. The reducer is the
// only mutator: `commit` applies an action atomically against the slice
// and publishes the new snapshot through a `watch` channel. Effects
// never hold the state across an await; they read, call the service,
// then commit.

use std::sync::Arc;

use tokio::sync::watch;

use crate::runtime::{ActionType, EffectScope, NoticeLevel, Shared, StateStream};

/// One module's state slice, bound to the shared runtime plumbing.
pub struct Slice<S, A> {
    state: watch::Sender<Arc<S>>,
    reduce: fn(&mut S, A),
    shared: Arc<Shared>,
}

impl<S, A> Slice<S, A>
where
    S: Clone + Send + Sync + 'static,
{
    pub(crate) fn new(initial: S, reduce: fn(&mut S, A), shared: Arc<Shared>) -> Self {
        let (state, _) = watch::channel(Arc::new(initial));
        Self {
            state,
            reduce,
            shared,
        }
    }

    /// Current snapshot (cheap `Arc` clone).
    pub fn state(&self) -> Arc<S> {
        self.state.borrow().clone()
    }

    /// Read a derived value out of the current snapshot.
    pub fn select<T>(&self, f: impl FnOnce(&S) -> T) -> T {
        f(&self.state.borrow())
    }

    /// Subscribe to snapshot changes.
    pub fn subscribe(&self) -> StateStream<S> {
        StateStream::new(self.state.subscribe())
    }

    /// Apply one reducer action and publish the new snapshot.
    ///
    /// `send_modify` holds the channel lock for the duration of the
    /// reducer, so commits against one slice are serialized and each
    /// subscriber wake-up sees a fully reduced snapshot.
    pub fn commit(&self, action: A) {
        self.state
            .send_modify(|snapshot| (self.reduce)(Arc::make_mut(snapshot), action));
    }

    /// Open an effect scope for `action`, raising its loading flag
    /// before any async work runs.
    pub(crate) fn begin(&self, action: ActionType) -> EffectScope {
        EffectScope::open(action, Arc::clone(&self.shared))
    }

    pub(crate) fn shared(&self) -> &Arc<Shared> {
        &self.shared
    }

    pub(crate) fn notify_success(&self, message: impl Into<String>) {
        self.shared.notify(NoticeLevel::Success, message);
    }

    pub(crate) fn notify_error(&self, message: impl Into<String>) {
        self.shared.notify(NoticeLevel::Error, message);
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Counter {
        value: i64,
        label: String,
    }

    enum CounterAction {
        Add(i64),
        Label(String),
    }

    fn reduce(state: &mut Counter, action: CounterAction) {
        match action {
            CounterAction::Add(n) => state.value += n,
            CounterAction::Label(label) => state.label = label,
        }
    }

    fn slice() -> Slice<Counter, CounterAction> {
        Slice::new(Counter::default(), reduce, Arc::new(Shared::new(8, 8)))
    }

    #[test]
    fn commits_apply_in_order_and_leave_other_fields_alone() {
        let slice = slice();
        slice.commit(CounterAction::Add(2));
        slice.commit(CounterAction::Add(3));
        slice.commit(CounterAction::Label("five".into()));

        let state = slice.state();
        assert_eq!(state.value, 5);
        assert_eq!(state.label, "five");
    }

    #[test]
    fn select_reads_without_cloning_state() {
        let slice = slice();
        slice.commit(CounterAction::Add(7));
        assert_eq!(slice.select(|s| s.value), 7);
    }

    #[tokio::test]
    async fn subscribers_see_each_published_snapshot() {
        let slice = slice();
        let mut sub = slice.subscribe();
        assert_eq!(sub.current().value, 0);

        slice.commit(CounterAction::Add(1));
        let next = sub.changed().await.unwrap();
        assert_eq!(next.value, 1);
    }

    #[test]
    fn snapshots_are_immutable_once_taken() {
        let slice = slice();
        let before = slice.state();
        slice.commit(CounterAction::Add(9));
        assert_eq!(before.value, 0);
        assert_eq!(slice.state().value, 9);
    }
}
