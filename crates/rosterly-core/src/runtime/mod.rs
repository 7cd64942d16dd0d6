// ── Model runtime ──
//
// The machinery every feature module runs on: namespaced action types,
// the loading tree, the settled-signal bus, effect scopes, reducer-driven
// state slices, and user-visible notices. Modules own their slices; this
// module owns everything the slices share.

mod action;
mod loading;
mod notice;
mod scope;
mod signal;
mod slice;
mod stream;

pub use action::ActionType;
pub use loading::LoadingMap;
pub use notice::{Notice, NoticeLevel};
pub use scope::EffectScope;
pub use signal::{Outcome, Signal, SignalBus};
pub use slice::Slice;
pub use stream::{StateStream, StateWatchStream};

use tokio::sync::broadcast;

/// Runtime plumbing shared by every module slice: the loading tree, the
/// signal bus, and the notice channel.
pub(crate) struct Shared {
    pub(crate) loading: LoadingMap,
    pub(crate) signals: SignalBus,
    notices: broadcast::Sender<Notice>,
}

impl Shared {
    pub(crate) fn new(signal_capacity: usize, notice_capacity: usize) -> Self {
        let (notices, _) = broadcast::channel(notice_capacity);
        Self {
            loading: LoadingMap::new(),
            signals: SignalBus::new(signal_capacity),
            notices,
        }
    }

    pub(crate) fn subscribe_notices(&self) -> broadcast::Receiver<Notice> {
        self.notices.subscribe()
    }

    pub(crate) fn notify(&self, level: NoticeLevel, message: impl Into<String>) {
        let _ = self.notices.send(Notice::new(level, message));
    }
}
