// ── Loading tree ──
//
// In-flight flags for every effect action, keyed by `ActionType`. One
// `watch` channel per action so consumers can both read the flag and
// await changes.

use dashmap::DashMap;
use tokio::sync::watch;

use crate::runtime::ActionType;

/// Per-action loading flags.
///
/// A flag is `true` strictly between an effect's dispatch and its
/// terminal. Flags are created lazily on first touch and never removed.
pub struct LoadingMap {
    flags: DashMap<ActionType, watch::Sender<bool>>,
}

impl LoadingMap {
    pub(crate) fn new() -> Self {
        Self {
            flags: DashMap::new(),
        }
    }

    /// Current flag for `action` (`false` if never dispatched).
    pub fn get(&self, action: ActionType) -> bool {
        self.flags
            .get(&action)
            .is_some_and(|sender| *sender.borrow())
    }

    /// Subscribe to flag changes for `action`.
    pub fn subscribe(&self, action: ActionType) -> watch::Receiver<bool> {
        self.entry(action).subscribe()
    }

    /// Keys of every action currently in flight, sorted for stable
    /// diagnostics output.
    pub fn snapshot(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .flags
            .iter()
            .filter(|entry| *entry.value().borrow())
            .map(|entry| entry.key().key())
            .collect();
        keys.sort();
        keys
    }

    pub(crate) fn set(&self, action: ActionType, on: bool) {
        self.entry(action).send_modify(|flag| *flag = on);
    }

    fn entry(
        &self,
        action: ActionType,
    ) -> dashmap::mapref::one::RefMut<'_, ActionType, watch::Sender<bool>> {
        self.flags
            .entry(action)
            .or_insert_with(|| watch::channel(false).0)
    }
}
