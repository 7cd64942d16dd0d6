// ── Users module ──
//
// The user-administration screen: a filtered listing with per-row kick
// and ban controls. Row mutations patch the affected row in place
// instead of refetching; a busy set drives per-row spinners on top of
// the coarse `users/kick` and `users/ban` loading flags.

use std::collections::HashSet;
use std::future::Future;
use std::sync::{Arc, Mutex};

use tracing::{debug, warn};

use rosterly_api::models::{PersonUpdate, UserQuery};
use rosterly_api::RosterClient;

use crate::adapt::{self, GroupIndex, ImagePolicy};
use crate::error::CoreError;
use crate::model::Person;
use crate::modules::groups::GroupsModel;
use crate::runtime::{Outcome, Shared, Slice, StateStream};

pub const NAMESPACE: &str = "users";

/// Effect actions answered by this module.
pub mod actions {
    use crate::runtime::ActionType;

    pub const READ: ActionType = ActionType::new(super::NAMESPACE, "read");
    pub const KICK: ActionType = ActionType::new(super::NAMESPACE, "kick");
    pub const BAN: ActionType = ActionType::new(super::NAMESPACE, "ban");
}

/// User-listing slice.
#[derive(Debug, Clone, Default)]
pub struct UsersState {
    pub users: Vec<Person>,
    /// Filter behind the current listing.
    pub query: UserQuery,
    /// Uids with a row mutation in flight.
    pub busy: HashSet<String>,
}

/// Reducer actions for the users slice.
#[derive(Debug)]
pub enum UsersAction {
    Loaded { users: Vec<Person>, query: UserQuery },
    RowBusy { uid: String, busy: bool },
    Kicked { uid: String, group_id: String },
    Banned { uid: String, banned: bool },
    Reset,
}

fn reduce(state: &mut UsersState, action: UsersAction) {
    match action {
        UsersAction::Loaded { users, query } => {
            state.users = users;
            state.query = query;
        }
        UsersAction::RowBusy { uid, busy } => {
            if busy {
                state.busy.insert(uid);
            } else {
                state.busy.remove(&uid);
            }
        }
        UsersAction::Kicked { uid, group_id } => {
            if let Some(row) = state.users.iter_mut().find(|u| u.id == uid) {
                row.groups.retain(|g| g.id != group_id);
            }
        }
        UsersAction::Banned { uid, banned } => {
            if let Some(row) = state.users.iter_mut().find(|u| u.id == uid) {
                row.banned = banned;
            }
        }
        UsersAction::Reset => *state = UsersState::default(),
    }
}

/// Handle for the users module. Cheap to clone.
#[derive(Clone)]
pub struct UsersModel {
    inner: Arc<UsersInner>,
}

struct UsersInner {
    slice: Slice<UsersState, UsersAction>,
    client: Arc<RosterClient>,
    groups: GroupsModel,
    index: Mutex<GroupIndex>,
    images: ImagePolicy,
}

impl UsersModel {
    pub(crate) fn new(
        client: Arc<RosterClient>,
        shared: Arc<Shared>,
        groups: GroupsModel,
        images: ImagePolicy,
    ) -> Self {
        Self {
            inner: Arc::new(UsersInner {
                slice: Slice::new(UsersState::default(), reduce, shared),
                client,
                groups,
                index: Mutex::new(GroupIndex::new()),
                images,
            }),
        }
    }

    /// Current slice snapshot.
    pub fn state(&self) -> Arc<UsersState> {
        self.inner.slice.state()
    }

    /// Read a derived value from the current snapshot.
    pub fn select<T>(&self, f: impl FnOnce(&UsersState) -> T) -> T {
        self.inner.slice.select(f)
    }

    /// Subscribe to slice changes.
    pub fn subscribe(&self) -> StateStream<UsersState> {
        self.inner.slice.subscribe()
    }

    /// Whether a row mutation is in flight for `uid`.
    pub fn row_busy(&self, uid: &str) -> bool {
        self.inner.slice.select(|s| s.busy.contains(uid))
    }

    pub(crate) fn reset(&self) {
        self.inner.slice.commit(UsersAction::Reset);
    }

    /// Fetch the user listing for `query`.
    ///
    /// Runs the group dependency concurrently with the listing request;
    /// aborts without committing if the directory cannot be loaded.
    pub fn fetch(&self, query: UserQuery) -> impl Future<Output = ()> + Send + 'static + use<> {
        let scope = self.inner.slice.begin(actions::READ);
        let this = self.clone();
        async move {
            let groups_settled = this.inner.groups.settled_read();
            let (outcome, (), fetched) = tokio::join!(
                groups_settled,
                this.inner.groups.ensure(),
                this.inner.client.list_users(&query),
            );

            if let Outcome::Failed(err) = outcome {
                warn!(%err, "group directory unavailable, aborting user listing");
                scope.fail(Arc::new(CoreError::DependencyUnavailable {
                    resource: "groups".into(),
                }));
                return;
            }

            match fetched {
                Ok(wire) => {
                    let collection = this.inner.groups.collection();
                    let users = {
                        let mut index = this.inner.index.lock().expect("group index poisoned");
                        adapt::adapt_user_list(&wire, &mut index, &collection, &this.inner.images)
                    };
                    debug!(count = users.len(), "user listing refreshed");
                    this.inner.slice.commit(UsersAction::Loaded { users, query });
                    scope.succeed();
                }
                Err(e) => {
                    let err = CoreError::from(e);
                    this.inner
                        .slice
                        .notify_error(format!("Failed to load users: {err}"));
                    scope.fail(Arc::new(err));
                }
            }
        }
    }

    /// Remove one user from one group, patching the affected row in
    /// place rather than refetching the listing.
    pub fn kick(
        &self,
        uid: &str,
        group_id: &str,
    ) -> impl Future<Output = ()> + Send + 'static + use<> {
        let scope = self.inner.slice.begin(actions::KICK);
        let this = self.clone();
        let uid = uid.to_owned();
        let group_id = group_id.to_owned();
        async move {
            this.inner.slice.commit(UsersAction::RowBusy {
                uid: uid.clone(),
                busy: true,
            });
            let result = this.inner.client.kickoff(&uid, &group_id).await;
            this.inner.slice.commit(UsersAction::RowBusy {
                uid: uid.clone(),
                busy: false,
            });

            match result {
                Ok(()) => {
                    this.inner
                        .slice
                        .commit(UsersAction::Kicked { uid, group_id });
                    this.inner.slice.notify_success("Member removed from group");
                    scope.succeed();
                }
                Err(e) => {
                    let err = CoreError::from(e);
                    this.inner
                        .slice
                        .notify_error(format!("Failed to remove member from group: {err}"));
                    scope.fail(Arc::new(err));
                }
            }
        }
    }

    /// Ban or unban one user, flipping the affected row in place.
    pub fn ban(
        &self,
        uid: &str,
        banned: bool,
    ) -> impl Future<Output = ()> + Send + 'static + use<> {
        let scope = self.inner.slice.begin(actions::BAN);
        let this = self.clone();
        let uid = uid.to_owned();
        async move {
            this.inner.slice.commit(UsersAction::RowBusy {
                uid: uid.clone(),
                busy: true,
            });
            let fields = PersonUpdate {
                banned: Some(banned),
                ..PersonUpdate::default()
            };
            let result = this.inner.client.update_person(&uid, &fields).await;
            this.inner.slice.commit(UsersAction::RowBusy {
                uid: uid.clone(),
                busy: false,
            });

            match result {
                Ok(()) => {
                    this.inner.slice.commit(UsersAction::Banned { uid, banned });
                    this.inner.slice.notify_success(if banned {
                        "Member banned"
                    } else {
                        "Member unbanned"
                    });
                    scope.succeed();
                }
                Err(e) => {
                    let err = CoreError::from(e);
                    this.inner
                        .slice
                        .notify_error(format!("Failed to change ban status: {err}"));
                    scope.fail(Arc::new(err));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::model::Group;

    fn user(id: &str, groups: &[(&str, &str)]) -> Person {
        Person {
            id: id.into(),
            nickname: "Sam".into(),
            avatar_url: String::new(),
            original_avatar_url: String::new(),
            groups: groups
                .iter()
                .map(|(gid, name)| Group {
                    id: (*gid).into(),
                    name: (*name).into(),
                })
                .collect(),
            admin_groups: Vec::new(),
            banned: false,
        }
    }

    #[test]
    fn kicked_removes_only_the_named_group() {
        let mut state = UsersState {
            users: vec![
                user("u1", &[("1", "Ops"), ("2", "Dev")]),
                user("u2", &[("1", "Ops")]),
            ],
            ..UsersState::default()
        };

        reduce(
            &mut state,
            UsersAction::Kicked {
                uid: "u1".into(),
                group_id: "1".into(),
            },
        );

        assert_eq!(state.users[0].groups.len(), 1);
        assert_eq!(state.users[0].groups[0].id, "2");
        // Other rows untouched.
        assert_eq!(state.users[1].groups.len(), 1);
    }

    #[test]
    fn kicked_ignores_unknown_rows() {
        let mut state = UsersState {
            users: vec![user("u1", &[("1", "Ops")])],
            ..UsersState::default()
        };

        reduce(
            &mut state,
            UsersAction::Kicked {
                uid: "nope".into(),
                group_id: "1".into(),
            },
        );
        assert_eq!(state.users[0].groups.len(), 1);
    }

    #[test]
    fn banned_flips_the_row_flag() {
        let mut state = UsersState {
            users: vec![user("u1", &[])],
            ..UsersState::default()
        };

        reduce(
            &mut state,
            UsersAction::Banned {
                uid: "u1".into(),
                banned: true,
            },
        );
        assert!(state.users[0].banned);

        reduce(
            &mut state,
            UsersAction::Banned {
                uid: "u1".into(),
                banned: false,
            },
        );
        assert!(!state.users[0].banned);
    }

    #[test]
    fn row_busy_tracks_individual_uids() {
        let mut state = UsersState::default();

        reduce(
            &mut state,
            UsersAction::RowBusy {
                uid: "u1".into(),
                busy: true,
            },
        );
        reduce(
            &mut state,
            UsersAction::RowBusy {
                uid: "u2".into(),
                busy: true,
            },
        );
        assert!(state.busy.contains("u1") && state.busy.contains("u2"));

        reduce(
            &mut state,
            UsersAction::RowBusy {
                uid: "u1".into(),
                busy: false,
            },
        );
        assert!(!state.busy.contains("u1"));
        assert!(state.busy.contains("u2"));
    }
}
