// ── Login module ──
//
// Session entry point. The token itself lives in the transport client;
// this slice only tracks who is signed in so shells can route between
// the login screen and the console.

use std::future::Future;
use std::sync::Arc;

use secrecy::SecretString;
use tracing::info;

use rosterly_api::RosterClient;

use crate::error::CoreError;
use crate::runtime::{Shared, Slice, StateStream};

pub const NAMESPACE: &str = "login";

/// Effect actions answered by this module.
pub mod actions {
    use crate::runtime::ActionType;

    pub const LOGIN: ActionType = ActionType::new(super::NAMESPACE, "login");
}

/// Session slice.
#[derive(Debug, Clone, Default)]
pub struct LoginState {
    pub logged_in: bool,
    /// Uid of the signed-in admin.
    pub uid: Option<String>,
}

/// Reducer actions for the session slice.
#[derive(Debug)]
pub enum LoginAction {
    LoggedIn(String),
    LoggedOut,
}

fn reduce(state: &mut LoginState, action: LoginAction) {
    match action {
        LoginAction::LoggedIn(uid) => {
            state.logged_in = true;
            state.uid = Some(uid);
        }
        LoginAction::LoggedOut => *state = LoginState::default(),
    }
}

/// Handle for the login module. Cheap to clone.
#[derive(Clone)]
pub struct LoginModel {
    inner: Arc<LoginInner>,
}

struct LoginInner {
    slice: Slice<LoginState, LoginAction>,
    client: Arc<RosterClient>,
}

impl LoginModel {
    pub(crate) fn new(client: Arc<RosterClient>, shared: Arc<Shared>) -> Self {
        Self {
            inner: Arc::new(LoginInner {
                slice: Slice::new(LoginState::default(), reduce, shared),
                client,
            }),
        }
    }

    /// Current slice snapshot.
    pub fn state(&self) -> Arc<LoginState> {
        self.inner.slice.state()
    }

    /// Read a derived value from the current snapshot.
    pub fn select<T>(&self, f: impl FnOnce(&LoginState) -> T) -> T {
        self.inner.slice.select(f)
    }

    /// Subscribe to slice changes.
    pub fn subscribe(&self) -> StateStream<LoginState> {
        self.inner.slice.subscribe()
    }

    pub(crate) fn reset(&self) {
        self.inner.slice.commit(LoginAction::LoggedOut);
    }

    /// Sign in. On success the transport client holds the session token
    /// and this slice flips to logged in.
    pub fn login(
        &self,
        uid: &str,
        password: SecretString,
    ) -> impl Future<Output = ()> + Send + 'static + use<> {
        let scope = self.inner.slice.begin(actions::LOGIN);
        let this = self.clone();
        let uid = uid.to_owned();
        async move {
            match this.inner.client.login(&uid, &password).await {
                Ok(()) => {
                    info!(%uid, "signed in");
                    this.inner.slice.commit(LoginAction::LoggedIn(uid));
                    this.inner.slice.notify_success("Signed in");
                    scope.succeed();
                }
                Err(e) => {
                    let err = CoreError::from(e);
                    this.inner
                        .slice
                        .notify_error(format!("Sign-in failed: {err}"));
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

    #[test]
    fn logged_in_records_the_uid() {
        let mut state = LoginState::default();
        reduce(&mut state, LoginAction::LoggedIn("admin".into()));
        assert!(state.logged_in);
        assert_eq!(state.uid.as_deref(), Some("admin"));
    }

    #[test]
    fn logged_out_clears_the_session() {
        let mut state = LoginState {
            logged_in: true,
            uid: Some("admin".into()),
        };
        reduce(&mut state, LoginAction::LoggedOut);
        assert!(!state.logged_in);
        assert!(state.uid.is_none());
    }
}
