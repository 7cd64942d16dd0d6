// ── Settled-signal bus ──
//
// Broadcast channel carrying effect terminals across modules. This is
// what lets one module's effect wait on another module's data without
// knowing anything beyond its action constants.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::warn;

use crate::error::CoreError;
use crate::runtime::ActionType;

/// Terminal outcome of one effect execution.
#[derive(Debug, Clone)]
pub enum Outcome {
    Done,
    Failed(Arc<CoreError>),
}

impl Outcome {
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }
}

/// One settled terminal, tagged with the action it belongs to.
#[derive(Debug, Clone)]
pub struct Signal {
    pub action: ActionType,
    pub outcome: Outcome,
}

/// Broadcast bus for settled signals.
pub struct SignalBus {
    tx: broadcast::Sender<Signal>,
}

impl SignalBus {
    pub(crate) fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Subscribe to every settled signal.
    pub fn subscribe(&self) -> broadcast::Receiver<Signal> {
        self.tx.subscribe()
    }

    /// Emit a terminal. Lack of listeners is not an error.
    pub(crate) fn emit(&self, action: ActionType, outcome: Outcome) {
        let _ = self.tx.send(Signal { action, outcome });
    }

    /// Future resolving with the next terminal for `action`.
    ///
    /// The receiver subscribes at *call* time, not at first poll, so a
    /// terminal emitted between obtaining this future and awaiting it
    /// cannot be missed. Callers racing an emitter must therefore call
    /// this before triggering the emitter.
    pub fn settled(
        &self,
        action: ActionType,
    ) -> impl Future<Output = Outcome> + Send + 'static + use<> {
        let mut rx = self.tx.subscribe();
        async move {
            loop {
                match rx.recv().await {
                    Ok(signal) if signal.action == action => return signal.outcome,
                    Ok(_) => {}
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(%action, skipped, "settled-signal receiver lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        // Resolve rather than hang if the bus is gone.
                        return Outcome::Failed(Arc::new(CoreError::Internal(
                            "signal bus closed".into(),
                        )));
                    }
                }
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const READ: ActionType = ActionType::new("demo", "read");
    const OTHER: ActionType = ActionType::new("demo", "other");

    #[tokio::test]
    async fn settled_sees_signals_emitted_before_first_poll() {
        let bus = SignalBus::new(8);

        let settled = bus.settled(READ);
        bus.emit(READ, Outcome::Done);

        assert!(settled.await.is_done());
    }

    #[tokio::test]
    async fn settled_skips_other_actions() {
        let bus = SignalBus::new(8);

        let settled = bus.settled(READ);
        bus.emit(OTHER, Outcome::Done);
        bus.emit(
            READ,
            Outcome::Failed(Arc::new(CoreError::Internal("boom".into()))),
        );

        match settled.await {
            Outcome::Failed(err) => assert!(matches!(*err, CoreError::Internal(_))),
            Outcome::Done => panic!("expected the failed READ terminal"),
        }
    }

    #[tokio::test]
    async fn settled_resolves_when_bus_drops() {
        let bus = SignalBus::new(8);
        let settled = bus.settled(READ);
        drop(bus);

        assert!(!settled.await.is_done());
    }
}
