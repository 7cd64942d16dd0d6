// ── Groups module ──
//
// Owns the canonical group directory. Other modules depend on it through
// `ensure` plus the settled terminal for `groups/read`; they never write
// this slice themselves.

use std::future::Future;
use std::sync::Arc;

use tracing::info;

use rosterly_api::RosterClient;

use crate::error::CoreError;
use crate::model::Group;
use crate::runtime::{Outcome, Shared, Slice, StateStream};

pub const NAMESPACE: &str = "groups";

/// Effect actions answered by this module.
pub mod actions {
    use crate::runtime::ActionType;

    pub const READ: ActionType = ActionType::new(super::NAMESPACE, "read");
}

/// Group directory slice.
#[derive(Debug, Clone, Default)]
pub struct GroupsState {
    /// The canonical collection, replaced wholesale on every fetch. Its
    /// `Arc` identity is what downstream group indexes memoize on.
    pub groups: Arc<Vec<Group>>,
}

/// Reducer actions for the groups slice.
#[derive(Debug)]
pub enum GroupsAction {
    Loaded(Arc<Vec<Group>>),
    Reset,
}

fn reduce(state: &mut GroupsState, action: GroupsAction) {
    match action {
        GroupsAction::Loaded(groups) => state.groups = groups,
        GroupsAction::Reset => state.groups = Arc::default(),
    }
}

/// Handle for the groups module. Cheap to clone.
#[derive(Clone)]
pub struct GroupsModel {
    inner: Arc<GroupsInner>,
}

struct GroupsInner {
    slice: Slice<GroupsState, GroupsAction>,
    client: Arc<RosterClient>,
}

impl GroupsModel {
    pub(crate) fn new(client: Arc<RosterClient>, shared: Arc<Shared>) -> Self {
        Self {
            inner: Arc::new(GroupsInner {
                slice: Slice::new(GroupsState::default(), reduce, shared),
                client,
            }),
        }
    }

    /// Current slice snapshot.
    pub fn state(&self) -> Arc<GroupsState> {
        self.inner.slice.state()
    }

    /// Read a derived value from the current snapshot.
    pub fn select<T>(&self, f: impl FnOnce(&GroupsState) -> T) -> T {
        self.inner.slice.select(f)
    }

    /// Subscribe to slice changes.
    pub fn subscribe(&self) -> StateStream<GroupsState> {
        self.inner.slice.subscribe()
    }

    /// The current group collection (cheap `Arc` clone).
    pub fn collection(&self) -> Arc<Vec<Group>> {
        self.inner.slice.select(|s| Arc::clone(&s.groups))
    }

    /// Future resolving with the next `groups/read` terminal.
    ///
    /// Subscribes at call time, so obtain it *before* dispatching
    /// `ensure` and the terminal cannot slip past unobserved.
    pub fn settled_read(&self) -> impl Future<Output = Outcome> + Send + 'static + use<> {
        self.inner.slice.shared().signals.settled(actions::READ)
    }

    pub(crate) fn reset(&self) {
        self.inner.slice.commit(GroupsAction::Reset);
    }

    /// Fetch the group directory. Loading is keyed `groups/read`.
    pub fn fetch(&self) -> impl Future<Output = ()> + Send + 'static + use<> {
        let scope = self.inner.slice.begin(actions::READ);
        let this = self.clone();
        async move {
            match this.inner.client.list_groups().await {
                Ok(wire) => {
                    let groups: Vec<Group> = wire.into_iter().map(Group::from).collect();
                    info!(count = groups.len(), "group directory refreshed");
                    this.inner
                        .slice
                        .commit(GroupsAction::Loaded(Arc::new(groups)));
                    scope.succeed();
                }
                Err(e) => {
                    let err = CoreError::from(e);
                    this.inner
                        .slice
                        .notify_error(format!("Failed to load groups: {err}"));
                    scope.fail(Arc::new(err));
                }
            }
        }
    }

    /// Make sure group data is available, fetching at most once.
    ///
    /// Warm cache: re-emits the `groups/read` success terminal and
    /// returns without a request. Fetch already in flight: returns
    /// silently and lets that run settle any waiters. Otherwise fetches.
    ///
    /// The emptiness and loading checks are two reads, not one, so two
    /// callers racing before either fetch lands may both fetch. Last
    /// commit wins on the slice; accepted.
    pub fn ensure(&self) -> impl Future<Output = ()> + Send + 'static + use<> {
        let this = self.clone();
        async move {
            if this.inner.slice.select(|s| !s.groups.is_empty()) {
                this.inner
                    .slice
                    .shared()
                    .signals
                    .emit(actions::READ, Outcome::Done);
                return;
            }
            if this.inner.slice.shared().loading.get(actions::READ) {
                return;
            }
            this.fetch().await;
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn group(id: &str, name: &str) -> Group {
        Group {
            id: id.into(),
            name: name.into(),
        }
    }

    #[test]
    fn loaded_replaces_the_collection_wholesale() {
        let mut state = GroupsState::default();
        reduce(
            &mut state,
            GroupsAction::Loaded(Arc::new(vec![group("1", "Ops")])),
        );
        let first = Arc::clone(&state.groups);

        reduce(
            &mut state,
            GroupsAction::Loaded(Arc::new(vec![group("2", "Dev")])),
        );
        assert!(!Arc::ptr_eq(&first, &state.groups));
        assert_eq!(state.groups[0].name, "Dev");
    }

    #[test]
    fn reset_empties_the_collection() {
        let mut state = GroupsState {
            groups: Arc::new(vec![group("1", "Ops")]),
        };
        reduce(&mut state, GroupsAction::Reset);
        assert!(state.groups.is_empty());
    }
}
