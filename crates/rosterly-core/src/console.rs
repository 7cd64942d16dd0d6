// ── Console facade ──
//
// Wires the transport client, the shared runtime plumbing, and the five
// feature modules into one cheaply-cloneable entry point. Shells hold a
// `Console`, hand clones to their views, and drive everything through
// the module handles.

use std::sync::Arc;

use tokio::sync::{broadcast, watch};
use tracing::info;

use rosterly_api::transport::{TlsMode, TransportConfig};
use rosterly_api::RosterClient;

use crate::adapt::ImagePolicy;
use crate::config::{ConsoleConfig, TlsVerification};
use crate::error::CoreError;
use crate::modules::{CardsModel, GroupsModel, LoginModel, PersonModel, UsersModel};
use crate::runtime::{ActionType, Notice, NoticeLevel, Shared, Signal};

/// Entry point for console shells. Cheap to clone.
#[derive(Clone)]
pub struct Console {
    inner: Arc<ConsoleInner>,
}

struct ConsoleInner {
    client: Arc<RosterClient>,
    shared: Arc<Shared>,
    groups: GroupsModel,
    person: PersonModel,
    cards: CardsModel,
    users: UsersModel,
    login: LoginModel,
}

impl Console {
    /// Build a console and its HTTP client from config.
    pub fn new(config: ConsoleConfig) -> Result<Self, CoreError> {
        let transport = TransportConfig {
            tls: match &config.tls {
                TlsVerification::SystemDefaults => TlsMode::System,
                TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
                TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
            },
            timeout: config.timeout,
        };
        let client = Arc::new(RosterClient::new(config.base_url.clone(), &transport)?);
        Ok(Self::with_client(config, client))
    }

    /// Build a console around an existing client. Tests point this at a
    /// mock server.
    pub fn with_client(config: ConsoleConfig, client: Arc<RosterClient>) -> Self {
        let shared = Arc::new(Shared::new(config.signal_capacity, config.notice_capacity));
        let images = ImagePolicy::from_config(&config);

        let groups = GroupsModel::new(Arc::clone(&client), Arc::clone(&shared));
        let person = PersonModel::new(
            Arc::clone(&client),
            Arc::clone(&shared),
            groups.clone(),
            images.clone(),
        );
        let cards = CardsModel::new(
            Arc::clone(&client),
            Arc::clone(&shared),
            groups.clone(),
            images.clone(),
        );
        let users = UsersModel::new(
            Arc::clone(&client),
            Arc::clone(&shared),
            groups.clone(),
            images,
        );
        let login = LoginModel::new(Arc::clone(&client), Arc::clone(&shared));

        Self {
            inner: Arc::new(ConsoleInner {
                client,
                shared,
                groups,
                person,
                cards,
                users,
                login,
            }),
        }
    }

    // ── Modules ──────────────────────────────────────────────────────

    pub fn groups(&self) -> &GroupsModel {
        &self.inner.groups
    }

    pub fn person(&self) -> &PersonModel {
        &self.inner.person
    }

    pub fn cards(&self) -> &CardsModel {
        &self.inner.cards
    }

    pub fn users(&self) -> &UsersModel {
        &self.inner.users
    }

    pub fn login(&self) -> &LoginModel {
        &self.inner.login
    }

    // ── Runtime surfaces ─────────────────────────────────────────────

    /// Current loading flag for one action.
    pub fn loading(&self, action: ActionType) -> bool {
        self.inner.shared.loading.get(action)
    }

    /// Subscribe to one action's loading flag.
    pub fn subscribe_loading(&self, action: ActionType) -> watch::Receiver<bool> {
        self.inner.shared.loading.subscribe(action)
    }

    /// Keys of every action currently in flight, sorted. Diagnostics.
    pub fn loading_snapshot(&self) -> Vec<String> {
        self.inner.shared.loading.snapshot()
    }

    /// Subscribe to user-visible notices.
    pub fn subscribe_notices(&self) -> broadcast::Receiver<Notice> {
        self.inner.shared.subscribe_notices()
    }

    /// Subscribe to effect terminals.
    pub fn subscribe_signals(&self) -> broadcast::Receiver<Signal> {
        self.inner.shared.signals.subscribe()
    }

    // ── Session ──────────────────────────────────────────────────────

    /// The current session token, for shells that persist sessions.
    pub fn token(&self) -> Option<String> {
        self.inner.client.token()
    }

    /// Seed a restored session token.
    pub fn set_token(&self, token: Option<String>) {
        self.inner.client.set_token(token);
    }

    /// Drop the session and reset every module slice. Client-side only;
    /// the service keeps no session state worth revoking.
    pub fn logout(&self) {
        info!("signing out");
        self.inner.client.set_token(None);
        self.inner.groups.reset();
        self.inner.person.reset();
        self.inner.cards.reset();
        self.inner.users.reset();
        self.inner.login.reset();
        self.inner.shared.notify(NoticeLevel::Info, "Signed out");
    }
}
