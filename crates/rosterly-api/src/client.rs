// Roster service HTTP client
//
// Wraps `reqwest::Client` with roster-specific URL construction, `{res}`
// envelope unwrapping, and the session-token lifecycle. All endpoint
// groups (auth, groups, person, cards, users) are implemented as inherent
// methods in separate files to keep this module focused on transport
// mechanics.

use std::sync::RwLock;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// Header carrying the session token in both directions.
pub(crate) const AUTH_HEADER: &str = "x-auth-token";

/// Some service errors arrive as `{"msg": "..."}` bodies.
#[derive(serde::Deserialize)]
struct ApiMessage {
    msg: Option<String>,
}

/// Raw HTTP client for the roster service.
///
/// Handles URL construction, the `{ "res": [...] }` list envelope, and the
/// `x-auth-token` session header: captured at login, attached to every
/// request, and rotated whenever a response carries a fresh value.
pub struct RosterClient {
    http: reqwest::Client,
    base_url: Url,
    /// Session token. Captured from the login response headers and
    /// rotated via `x-auth-token` response headers on any call.
    token: RwLock<Option<String>>,
}

impl RosterClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// `base_url` is the roster service root, e.g.
    /// `https://roster.example.org`.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            base_url,
            token: RwLock::new(None),
        })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    ///
    /// Use this when the embedding shell already configured a client
    /// (tests use it to point at a mock server).
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            http,
            base_url,
            token: RwLock::new(None),
        }
    }

    /// The underlying HTTP client (for auth flows that need direct access).
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// The roster service base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── Session token management ─────────────────────────────────────

    /// The current session token, if any.
    ///
    /// Exposed so an embedding shell can persist the session; storage
    /// mechanics are its concern, not ours.
    pub fn token(&self) -> Option<String> {
        self.token.read().expect("token lock poisoned").clone()
    }

    /// Seed or clear the session token (e.g. one restored by the shell).
    pub fn set_token(&self, token: Option<String>) {
        *self.token.write().expect("token lock poisoned") = token;
    }

    /// Update the stored token if the response carries a fresh value.
    fn rotate_token(&self, headers: &reqwest::header::HeaderMap) {
        let fresh = headers
            .get(AUTH_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(String::from);

        if let Some(token) = fresh {
            trace!("session token rotated");
            *self.token.write().expect("token lock poisoned") = Some(token);
        }
    }

    /// Attach the stored token to a request builder.
    fn apply_token(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let guard = self.token.read().expect("token lock poisoned");
        match guard.as_deref() {
            Some(token) => builder.header(AUTH_HEADER, token),
            None => builder,
        }
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build a full URL for an API path: `{base}/api/{path}`.
    pub(crate) fn api_url(&self, path: &str) -> Url {
        let base = self.base_url.as_str().trim_end_matches('/');
        let full = format!("{base}/api/{path}");
        Url::parse(&full).expect("invalid API URL")
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and decode the JSON body.
    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {}", url);

        let builder = self.apply_token(self.http.get(url));
        let resp = builder.send().await.map_err(Error::Transport)?;

        self.decode(resp).await
    }

    /// Send a GET request with query parameters and decode the JSON body.
    pub(crate) async fn get_with<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &(impl Serialize + Sync),
    ) -> Result<T, Error> {
        debug!("GET {}", url);

        let builder = self.apply_token(self.http.get(url).query(query));
        let resp = builder.send().await.map_err(Error::Transport)?;

        self.decode(resp).await
    }

    /// Send a POST request with JSON body and decode the JSON response.
    pub(crate) async fn post<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &(impl Serialize + Sync),
    ) -> Result<T, Error> {
        debug!("POST {}", url);

        let builder = self.apply_token(self.http.post(url).json(body));
        let resp = builder.send().await.map_err(Error::Transport)?;

        self.decode(resp).await
    }

    /// Send a POST request where only the status code matters.
    pub(crate) async fn post_ok(
        &self,
        url: Url,
        body: &(impl Serialize + Sync),
    ) -> Result<(), Error> {
        debug!("POST {}", url);

        let builder = self.apply_token(self.http.post(url).json(body));
        let resp = builder.send().await.map_err(Error::Transport)?;

        self.check(resp).await.map(|_| ())
    }

    /// Common response handling: token rotation, auth and service errors.
    async fn check(&self, resp: reqwest::Response) -> Result<reqwest::Response, Error> {
        // Capture any token rotation before consuming the response.
        self.rotate_token(resp.headers());

        let status = resp.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(Error::SessionExpired);
        }

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiMessage>(&body)
                .ok()
                .and_then(|m| m.msg)
                .unwrap_or_else(|| body.chars().take(200).collect());
            return Err(Error::Api {
                message,
                status: status.as_u16(),
            });
        }

        Ok(resp)
    }

    /// Decode a JSON response body after common response handling.
    async fn decode<T: DeserializeOwned>(&self, resp: reqwest::Response) -> Result<T, Error> {
        let resp = self.check(resp).await?;
        let body = resp.text().await.map_err(Error::Transport)?;

        serde_json::from_str(&body).map_err(|e| {
            let preview: String = body.chars().take(200).collect();
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body,
            }
        })
    }
}
