// ── Effect scopes ──
//
// One scope per effect execution. Opening the scope raises the action's
// loading flag synchronously; settling clears it and broadcasts the
// terminal signal. A scope dropped without settling counts as a failure
// so nothing awaiting the terminal can hang on an abandoned effect.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::CoreError;
use crate::runtime::{ActionType, Outcome, Shared};

/// Loading and terminal bookkeeping for one effect execution.
#[must_use = "an unsettled scope reports failure when dropped"]
pub struct EffectScope {
    action: ActionType,
    shared: Arc<Shared>,
    settled: bool,
}

impl EffectScope {
    pub(crate) fn open(action: ActionType, shared: Arc<Shared>) -> Self {
        debug!(%action, "effect dispatched");
        shared.loading.set(action, true);
        Self {
            action,
            shared,
            settled: false,
        }
    }

    /// Settle successfully: clears loading and broadcasts `Done`.
    pub fn succeed(mut self) {
        self.settle(Outcome::Done);
    }

    /// Settle with a failure: clears loading and broadcasts `Failed`.
    pub fn fail(mut self, err: Arc<CoreError>) {
        self.settle(Outcome::Failed(err));
    }

    fn settle(&mut self, outcome: Outcome) {
        self.settled = true;
        self.shared.loading.set(self.action, false);
        self.shared.signals.emit(self.action, outcome);
    }
}

impl Drop for EffectScope {
    fn drop(&mut self) {
        if !self.settled {
            warn!(action = %self.action, "effect dropped before settling");
            self.settle(Outcome::Failed(Arc::new(CoreError::Internal(
                "effect abandoned before settling".into(),
            ))));
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    const PING: ActionType = ActionType::new("demo", "ping");

    fn shared() -> Arc<Shared> {
        Arc::new(Shared::new(8, 8))
    }

    #[tokio::test]
    async fn succeed_clears_loading_and_emits_done() {
        let shared = shared();
        let mut rx = shared.signals.subscribe();

        let scope = EffectScope::open(PING, Arc::clone(&shared));
        assert!(shared.loading.get(PING));

        scope.succeed();
        assert!(!shared.loading.get(PING));

        let signal = rx.recv().await.unwrap();
        assert_eq!(signal.action, PING);
        assert!(signal.outcome.is_done());
    }

    #[tokio::test]
    async fn fail_carries_the_error_through_the_bus() {
        let shared = shared();
        let mut rx = shared.signals.subscribe();

        let scope = EffectScope::open(PING, Arc::clone(&shared));
        scope.fail(Arc::new(CoreError::Timeout));

        let signal = rx.recv().await.unwrap();
        assert!(!shared.loading.get(PING));
        match signal.outcome {
            Outcome::Failed(err) => assert!(matches!(*err, CoreError::Timeout)),
            Outcome::Done => panic!("expected a failure terminal"),
        }
    }

    #[tokio::test]
    async fn dropped_scope_settles_as_failure() {
        let shared = shared();
        let mut rx = shared.signals.subscribe();

        let scope = EffectScope::open(PING, Arc::clone(&shared));
        assert!(shared.loading.get(PING));
        drop(scope);

        let signal = rx.recv().await.unwrap();
        assert!(!shared.loading.get(PING));
        assert!(matches!(signal.outcome, Outcome::Failed(_)));
    }
}
