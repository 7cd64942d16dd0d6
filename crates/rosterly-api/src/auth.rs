// Session authentication
//
// Token-based login: the login response carries the session token in the
// `x-auth-token` header. The client stores it and attaches it to every
// subsequent request; any response may rotate it.

use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::debug;

use crate::client::{AUTH_HEADER, RosterClient};
use crate::error::Error;

impl RosterClient {
    /// Authenticate with the roster service.
    ///
    /// `POST /api/login`
    ///
    /// On success the session token from the `x-auth-token` response
    /// header is stored and attached to all subsequent requests. A
    /// non-2xx status here means bad credentials, not an expired
    /// session, so it maps to `Error::Authentication`.
    pub async fn login(&self, uid: &str, password: &SecretString) -> Result<(), Error> {
        let url = self.api_url("login");

        debug!("logging in at {}", url);

        let body = json!({
            "uid": uid,
            "password": password.expose_secret(),
        });

        let resp = self
            .http()
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Authentication {
                message: format!("login failed (HTTP {status}): {body}"),
            });
        }

        let token = resp
            .headers()
            .get(AUTH_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(String::from);

        match token {
            Some(token) => {
                self.set_token(Some(token));
                debug!("login successful");
                Ok(())
            }
            None => Err(Error::Authentication {
                message: "login response carried no session token".into(),
            }),
        }
    }
}
