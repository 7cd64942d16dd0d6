// ── Cards module ──
//
// The card-management screen: a filtered listing plus create, update,
// and remove. Mutations settle first, then refresh the listing with the
// query that produced it so the visible filter survives the round trip.

use std::future::Future;
use std::sync::{Arc, Mutex};

use tracing::{debug, warn};

use rosterly_api::models::{CardFields, CardQuery};
use rosterly_api::RosterClient;

use crate::adapt::{self, GroupIndex, ImagePolicy};
use crate::error::CoreError;
use crate::model::Card;
use crate::modules::groups::GroupsModel;
use crate::runtime::{Outcome, Shared, Slice, StateStream};

pub const NAMESPACE: &str = "cards";

/// Effect actions answered by this module.
pub mod actions {
    use crate::runtime::ActionType;

    pub const READ: ActionType = ActionType::new(super::NAMESPACE, "read");
    pub const CREATE: ActionType = ActionType::new(super::NAMESPACE, "create");
    pub const UPDATE: ActionType = ActionType::new(super::NAMESPACE, "update");
    pub const REMOVE: ActionType = ActionType::new(super::NAMESPACE, "remove");
}

/// Card-listing slice.
#[derive(Debug, Clone, Default)]
pub struct CardsState {
    pub cards: Vec<Card>,
    /// Filter behind the current listing; mutations re-run it.
    pub query: CardQuery,
}

/// Reducer actions for the cards slice.
#[derive(Debug)]
pub enum CardsAction {
    Loaded { cards: Vec<Card>, query: CardQuery },
    Reset,
}

fn reduce(state: &mut CardsState, action: CardsAction) {
    match action {
        CardsAction::Loaded { cards, query } => {
            state.cards = cards;
            state.query = query;
        }
        CardsAction::Reset => *state = CardsState::default(),
    }
}

/// Handle for the cards module. Cheap to clone.
#[derive(Clone)]
pub struct CardsModel {
    inner: Arc<CardsInner>,
}

struct CardsInner {
    slice: Slice<CardsState, CardsAction>,
    client: Arc<RosterClient>,
    groups: GroupsModel,
    index: Mutex<GroupIndex>,
    images: ImagePolicy,
}

impl CardsModel {
    pub(crate) fn new(
        client: Arc<RosterClient>,
        shared: Arc<Shared>,
        groups: GroupsModel,
        images: ImagePolicy,
    ) -> Self {
        Self {
            inner: Arc::new(CardsInner {
                slice: Slice::new(CardsState::default(), reduce, shared),
                client,
                groups,
                index: Mutex::new(GroupIndex::new()),
                images,
            }),
        }
    }

    /// Current slice snapshot.
    pub fn state(&self) -> Arc<CardsState> {
        self.inner.slice.state()
    }

    /// Read a derived value from the current snapshot.
    pub fn select<T>(&self, f: impl FnOnce(&CardsState) -> T) -> T {
        self.inner.slice.select(f)
    }

    /// Subscribe to slice changes.
    pub fn subscribe(&self) -> StateStream<CardsState> {
        self.inner.slice.subscribe()
    }

    pub(crate) fn reset(&self) {
        self.inner.slice.commit(CardsAction::Reset);
    }

    /// Fetch the card listing for `query`.
    ///
    /// Runs the group dependency concurrently with the listing request;
    /// aborts without committing if the directory cannot be loaded.
    pub fn fetch(&self, query: CardQuery) -> impl Future<Output = ()> + Send + 'static + use<> {
        let scope = self.inner.slice.begin(actions::READ);
        let this = self.clone();
        async move {
            let groups_settled = this.inner.groups.settled_read();
            let (outcome, (), fetched) = tokio::join!(
                groups_settled,
                this.inner.groups.ensure(),
                this.inner.client.list_cards(&query),
            );

            if let Outcome::Failed(err) = outcome {
                warn!(%err, "group directory unavailable, aborting card listing");
                scope.fail(Arc::new(CoreError::DependencyUnavailable {
                    resource: "groups".into(),
                }));
                return;
            }

            match fetched {
                Ok(wire) => {
                    let collection = this.inner.groups.collection();
                    let cards = {
                        let mut index = this.inner.index.lock().expect("group index poisoned");
                        adapt::adapt_cards(&wire, &mut index, &collection, &this.inner.images)
                    };
                    debug!(count = cards.len(), "card listing refreshed");
                    this.inner.slice.commit(CardsAction::Loaded { cards, query });
                    scope.succeed();
                }
                Err(e) => {
                    let err = CoreError::from(e);
                    this.inner
                        .slice
                        .notify_error(format!("Failed to load cards: {err}"));
                    scope.fail(Arc::new(err));
                }
            }
        }
    }

    /// Create a card, then refresh the listing with the current query.
    pub fn create(&self, fields: CardFields) -> impl Future<Output = ()> + Send + 'static + use<> {
        let scope = self.inner.slice.begin(actions::CREATE);
        let this = self.clone();
        async move {
            match this.inner.client.create_card(&fields).await {
                Ok(()) => {
                    this.inner.slice.notify_success("Card created");
                    this.refetch();
                    scope.succeed();
                }
                Err(e) => {
                    let err = CoreError::from(e);
                    this.inner
                        .slice
                        .notify_error(format!("Failed to create card: {err}"));
                    scope.fail(Arc::new(err));
                }
            }
        }
    }

    /// Update a card, then refresh the listing with the current query.
    pub fn update(
        &self,
        id: &str,
        fields: CardFields,
    ) -> impl Future<Output = ()> + Send + 'static + use<> {
        let scope = self.inner.slice.begin(actions::UPDATE);
        let this = self.clone();
        let id = id.to_owned();
        async move {
            match this.inner.client.update_card(&id, &fields).await {
                Ok(()) => {
                    this.inner.slice.notify_success("Card updated");
                    this.refetch();
                    scope.succeed();
                }
                Err(e) => {
                    let err = CoreError::from(e);
                    this.inner
                        .slice
                        .notify_error(format!("Failed to update card: {err}"));
                    scope.fail(Arc::new(err));
                }
            }
        }
    }

    /// Remove a card, then refresh the listing with the current query.
    pub fn remove(&self, id: &str) -> impl Future<Output = ()> + Send + 'static + use<> {
        let scope = self.inner.slice.begin(actions::REMOVE);
        let this = self.clone();
        let id = id.to_owned();
        async move {
            match this.inner.client.remove_card(&id).await {
                Ok(()) => {
                    this.inner.slice.notify_success("Card removed");
                    this.refetch();
                    scope.succeed();
                }
                Err(e) => {
                    let err = CoreError::from(e);
                    this.inner
                        .slice
                        .notify_error(format!("Failed to remove card: {err}"));
                    scope.fail(Arc::new(err));
                }
            }
        }
    }

    /// Re-run the listing with the query currently in state. The
    /// mutation terminal does not wait on it.
    fn refetch(&self) {
        let query = self.inner.slice.select(|s| s.query.clone());
        tokio::spawn(self.fetch(query));
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::model::Group;

    fn card(id: &str) -> Card {
        Card {
            id: id.into(),
            owner_id: "u1".into(),
            nickname: "Sam".into(),
            job: String::new(),
            bio: String::new(),
            avatar_url: String::new(),
            original_avatar_url: String::new(),
            order: 0,
            retired: false,
            hidden: false,
            groups: vec![Group {
                id: "1".into(),
                name: "Ops".into(),
            }],
        }
    }

    #[test]
    fn loaded_replaces_listing_and_remembers_query() {
        let mut state = CardsState::default();
        reduce(
            &mut state,
            CardsAction::Loaded {
                cards: vec![card("3")],
                query: CardQuery {
                    uid: Some("u1".into()),
                    ..CardQuery::default()
                },
            },
        );

        assert_eq!(state.cards.len(), 1);
        assert_eq!(state.query.uid.as_deref(), Some("u1"));
    }

    #[test]
    fn reset_clears_listing_and_query() {
        let mut state = CardsState {
            cards: vec![card("3")],
            query: CardQuery {
                retired: Some(true),
                ..CardQuery::default()
            },
        };

        reduce(&mut state, CardsAction::Reset);
        assert!(state.cards.is_empty());
        assert!(state.query.retired.is_none());
    }
}
