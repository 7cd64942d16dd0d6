// ── Person module ──
//
// The member-profile screen: one person's record, their cards, and the
// users visible to them, all denormalized against the group directory.
// Reads depend on the groups module through the ensure/settled protocol;
// mutations settle first and refresh the profile in the background.

use std::future::Future;
use std::sync::{Arc, Mutex};

use tracing::{debug, warn};

use rosterly_api::models::PersonUpdate;
use rosterly_api::RosterClient;

use crate::adapt::{self, GroupIndex, ImagePolicy};
use crate::error::CoreError;
use crate::model::{Card, Person};
use crate::modules::groups::GroupsModel;
use crate::runtime::{Outcome, Shared, Slice, StateStream};

pub const NAMESPACE: &str = "person";

/// Effect actions answered by this module.
pub mod actions {
    use crate::runtime::ActionType;

    pub const INFO: ActionType = ActionType::new(super::NAMESPACE, "info");
    pub const UPDATE: ActionType = ActionType::new(super::NAMESPACE, "update");
    pub const PULL: ActionType = ActionType::new(super::NAMESPACE, "pull");
    pub const RESET_PASS: ActionType = ActionType::new(super::NAMESPACE, "reset_pass");
    pub const CREATE: ActionType = ActionType::new(super::NAMESPACE, "create");
}

/// Credentials handed back when a member is created.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMember {
    pub uid: String,
    pub pass: String,
    /// Id of the blank card created alongside the member.
    pub card_id: String,
}

/// Person-profile slice.
#[derive(Debug, Clone, Default)]
pub struct PersonState {
    /// Profile currently loaded, if any.
    pub person: Option<Person>,
    /// Cards owned by that person.
    pub cards: Vec<Card>,
    /// Users visible to that person.
    pub users: Vec<Person>,
    /// Password produced by the last reset, for the reveal dialog.
    pub reset_pass: Option<String>,
    /// Credentials of the most recently created member.
    pub created: Option<NewMember>,
}

/// Reducer actions for the person slice.
#[derive(Debug)]
pub enum PersonAction {
    InfoLoaded {
        person: Person,
        cards: Vec<Card>,
        users: Vec<Person>,
    },
    PassReset(String),
    Created(NewMember),
    Reset,
}

fn reduce(state: &mut PersonState, action: PersonAction) {
    match action {
        PersonAction::InfoLoaded {
            person,
            cards,
            users,
        } => {
            state.person = Some(person);
            state.cards = cards;
            state.users = users;
        }
        PersonAction::PassReset(pass) => state.reset_pass = Some(pass),
        PersonAction::Created(member) => state.created = Some(member),
        PersonAction::Reset => *state = PersonState::default(),
    }
}

/// Handle for the person module. Cheap to clone.
#[derive(Clone)]
pub struct PersonModel {
    inner: Arc<PersonInner>,
}

struct PersonInner {
    slice: Slice<PersonState, PersonAction>,
    client: Arc<RosterClient>,
    groups: GroupsModel,
    index: Mutex<GroupIndex>,
    images: ImagePolicy,
}

impl PersonModel {
    pub(crate) fn new(
        client: Arc<RosterClient>,
        shared: Arc<Shared>,
        groups: GroupsModel,
        images: ImagePolicy,
    ) -> Self {
        Self {
            inner: Arc::new(PersonInner {
                slice: Slice::new(PersonState::default(), reduce, shared),
                client,
                groups,
                index: Mutex::new(GroupIndex::new()),
                images,
            }),
        }
    }

    /// Current slice snapshot.
    pub fn state(&self) -> Arc<PersonState> {
        self.inner.slice.state()
    }

    /// Read a derived value from the current snapshot.
    pub fn select<T>(&self, f: impl FnOnce(&PersonState) -> T) -> T {
        self.inner.slice.select(f)
    }

    /// Subscribe to slice changes.
    pub fn subscribe(&self) -> StateStream<PersonState> {
        self.inner.slice.subscribe()
    }

    pub(crate) fn reset(&self) {
        self.inner.slice.commit(PersonAction::Reset);
    }

    /// Load one person's profile, cards, and visible users.
    ///
    /// The group dependency and the profile request run concurrently; if
    /// the group directory cannot be loaded the whole read settles as
    /// `DependencyUnavailable` without committing anything.
    pub fn fetch_info(&self, uid: &str) -> impl Future<Output = ()> + Send + 'static + use<> {
        let scope = self.inner.slice.begin(actions::INFO);
        let this = self.clone();
        let uid = uid.to_owned();
        async move {
            // Subscribe before dispatching ensure so its terminal cannot
            // slip past the join.
            let groups_settled = this.inner.groups.settled_read();
            let (outcome, (), fetched) = tokio::join!(
                groups_settled,
                this.inner.groups.ensure(),
                this.inner.client.person_info(&uid),
            );

            if let Outcome::Failed(err) = outcome {
                warn!(%uid, %err, "group directory unavailable, aborting profile load");
                scope.fail(Arc::new(CoreError::DependencyUnavailable {
                    resource: "groups".into(),
                }));
                return;
            }

            match fetched {
                Ok(payload) => {
                    let collection = this.inner.groups.collection();
                    let (person, cards, users) = {
                        let mut index = this.inner.index.lock().expect("group index poisoned");
                        (
                            adapt::adapt_person(
                                &payload.info,
                                &mut index,
                                &collection,
                                &this.inner.images,
                            ),
                            adapt::adapt_cards(
                                &payload.cards.res,
                                &mut index,
                                &collection,
                                &this.inner.images,
                            ),
                            adapt::adapt_user_list(
                                &payload.users.res,
                                &mut index,
                                &collection,
                                &this.inner.images,
                            ),
                        )
                    };
                    this.inner.slice.commit(PersonAction::InfoLoaded {
                        person,
                        cards,
                        users,
                    });
                    scope.succeed();
                }
                Err(e) => {
                    let err = CoreError::from(e);
                    this.inner
                        .slice
                        .notify_error(format!("Failed to load member profile: {err}"));
                    scope.fail(Arc::new(err));
                }
            }
        }
    }

    /// Update profile fields, then reread the profile in the background.
    /// The `person/update` terminal does not wait on the reread.
    pub fn update(
        &self,
        uid: &str,
        fields: PersonUpdate,
    ) -> impl Future<Output = ()> + Send + 'static + use<> {
        let scope = self.inner.slice.begin(actions::UPDATE);
        let this = self.clone();
        let uid = uid.to_owned();
        async move {
            match this.inner.client.update_person(&uid, &fields).await {
                Ok(()) => {
                    this.inner.slice.notify_success("Profile updated");
                    tokio::spawn(this.fetch_info(&uid));
                    scope.succeed();
                }
                Err(e) => {
                    let err = CoreError::from(e);
                    this.inner
                        .slice
                        .notify_error(format!("Failed to update profile: {err}"));
                    scope.fail(Arc::new(err));
                }
            }
        }
    }

    /// Add the person to `groups`, then reread the profile.
    pub fn pull(
        &self,
        uid: &str,
        groups: Vec<String>,
    ) -> impl Future<Output = ()> + Send + 'static + use<> {
        let scope = self.inner.slice.begin(actions::PULL);
        let this = self.clone();
        let uid = uid.to_owned();
        async move {
            if groups.is_empty() {
                this.inner.slice.notify_error("Pick at least one group");
                scope.fail(Arc::new(CoreError::Validation {
                    message: "no groups selected".into(),
                }));
                return;
            }
            match this.inner.client.pull_member(&uid, &groups).await {
                Ok(()) => {
                    this.inner.slice.notify_success("Member added to groups");
                    tokio::spawn(this.fetch_info(&uid));
                    scope.succeed();
                }
                Err(e) => {
                    let err = CoreError::from(e);
                    this.inner
                        .slice
                        .notify_error(format!("Failed to add member to groups: {err}"));
                    scope.fail(Arc::new(err));
                }
            }
        }
    }

    /// Reset the person's password. The effective password (supplied or
    /// service-generated) lands in state for the reveal dialog.
    pub fn reset_pass(
        &self,
        uid: &str,
        new: Option<String>,
    ) -> impl Future<Output = ()> + Send + 'static + use<> {
        let scope = self.inner.slice.begin(actions::RESET_PASS);
        let this = self.clone();
        let uid = uid.to_owned();
        async move {
            match this.inner.client.reset_pass(&uid, new.as_deref()).await {
                Ok(resp) => {
                    this.inner
                        .slice
                        .commit(PersonAction::PassReset(resp.new_pass));
                    this.inner.slice.notify_success("Password reset");
                    scope.succeed();
                }
                Err(e) => {
                    let err = CoreError::from(e);
                    this.inner
                        .slice
                        .notify_error(format!("Failed to reset password: {err}"));
                    scope.fail(Arc::new(err));
                }
            }
        }
    }

    /// Create a member with a generated password and a blank card.
    ///
    /// Validation failures settle as `Validation` errors without
    /// touching the service.
    pub fn create(
        &self,
        nickname: &str,
        groups: Vec<String>,
    ) -> impl Future<Output = ()> + Send + 'static + use<> {
        let scope = self.inner.slice.begin(actions::CREATE);
        let this = self.clone();
        let nickname = nickname.trim().to_owned();
        async move {
            if nickname.is_empty() {
                this.inner.slice.notify_error("Nickname must not be empty");
                scope.fail(Arc::new(CoreError::Validation {
                    message: "empty nickname".into(),
                }));
                return;
            }
            if groups.is_empty() {
                this.inner.slice.notify_error("Pick at least one group");
                scope.fail(Arc::new(CoreError::Validation {
                    message: "no groups selected".into(),
                }));
                return;
            }
            match this.inner.client.create_member(&nickname, &groups).await {
                Ok(created) => {
                    debug!(uid = %created.uid, "member created");
                    this.inner.slice.commit(PersonAction::Created(NewMember {
                        uid: created.uid,
                        pass: created.pass,
                        card_id: created.card_id,
                    }));
                    this.inner.slice.notify_success("Member created");
                    scope.succeed();
                }
                Err(e) => {
                    let err = CoreError::from(e);
                    this.inner
                        .slice
                        .notify_error(format!("Failed to create member: {err}"));
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

    fn person(id: &str) -> Person {
        Person {
            id: id.into(),
            nickname: "Sam".into(),
            avatar_url: String::new(),
            original_avatar_url: String::new(),
            groups: Vec::new(),
            admin_groups: Vec::new(),
            banned: false,
        }
    }

    #[test]
    fn info_loaded_replaces_profile_but_keeps_dialog_state() {
        let mut state = PersonState {
            reset_pass: Some("old-pass".into()),
            ..PersonState::default()
        };

        reduce(
            &mut state,
            PersonAction::InfoLoaded {
                person: person("u1"),
                cards: Vec::new(),
                users: vec![person("u2")],
            },
        );

        assert_eq!(state.person.as_ref().unwrap().id, "u1");
        assert_eq!(state.users.len(), 1);
        assert_eq!(state.reset_pass.as_deref(), Some("old-pass"));
    }

    #[test]
    fn reset_clears_everything() {
        let mut state = PersonState {
            person: Some(person("u1")),
            reset_pass: Some("pass".into()),
            created: Some(NewMember {
                uid: "u9".into(),
                pass: "p".into(),
                card_id: "c1".into(),
            }),
            ..PersonState::default()
        };

        reduce(&mut state, PersonAction::Reset);
        assert!(state.person.is_none());
        assert!(state.reset_pass.is_none());
        assert!(state.created.is_none());
    }

    #[test]
    fn pass_reset_overwrites_previous_value() {
        let mut state = PersonState::default();
        reduce(&mut state, PersonAction::PassReset("first".into()));
        reduce(&mut state, PersonAction::PassReset("second".into()));
        assert_eq!(state.reset_pass.as_deref(), Some("second"));
    }
}
