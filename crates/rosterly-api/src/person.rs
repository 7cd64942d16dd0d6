// Person endpoints
//
// Member profile read plus the admin operations: profile update, pulling
// a member into groups, kicking one out, password reset, and member
// creation.

use serde::Serialize;
use serde_json::json;
use tracing::debug;

use crate::client::RosterClient;
use crate::error::Error;
use crate::models::{CreatedMember, PersonInfoResponse, PersonUpdate, ResetPassResponse};

#[derive(Serialize)]
struct UpdateBody<'a> {
    uid: &'a str,
    #[serde(flatten)]
    fields: &'a PersonUpdate,
}

impl RosterClient {
    /// Fetch one person's profile plus their cards and the users visible
    /// to them.
    ///
    /// `GET /api/person?uid={uid}`
    pub async fn person_info(&self, uid: &str) -> Result<PersonInfoResponse, Error> {
        let url = self.api_url("person");
        debug!(uid, "fetching person info");
        self.get_with(url, &[("uid", uid)]).await
    }

    /// Update a person's profile fields.
    ///
    /// `POST /api/person/update`
    pub async fn update_person(&self, uid: &str, fields: &PersonUpdate) -> Result<(), Error> {
        let url = self.api_url("person/update");
        debug!(uid, "updating person");
        self.post_ok(url, &UpdateBody { uid, fields }).await
    }

    /// Add a person to the given groups.
    ///
    /// `POST /api/person/pull` with `{"uid": "...", "group": [ids]}`
    pub async fn pull_member(&self, uid: &str, groups: &[String]) -> Result<(), Error> {
        let url = self.api_url("person/pull");
        debug!(uid, "pulling member into groups");
        self.post_ok(url, &json!({ "uid": uid, "group": groups })).await
    }

    /// Remove a person from one group.
    ///
    /// `POST /api/person/kickoff` with `{"uid": "...", "group": "id"}`
    pub async fn kickoff(&self, uid: &str, group: &str) -> Result<(), Error> {
        let url = self.api_url("person/kickoff");
        debug!(uid, group, "kicking member out of group");
        self.post_ok(url, &json!({ "uid": uid, "group": group })).await
    }

    /// Reset a person's password.
    ///
    /// `POST /api/person/password` with `{"uid": "...", "new": "..."?}`.
    /// When `new` is `None` the service generates one; either way the
    /// effective password comes back in the response.
    pub async fn reset_pass(
        &self,
        uid: &str,
        new: Option<&str>,
    ) -> Result<ResetPassResponse, Error> {
        let url = self.api_url("person/password");
        debug!(uid, "resetting password");

        let body = match new {
            Some(new) => json!({ "uid": uid, "new": new }),
            None => json!({ "uid": uid }),
        };

        self.post(url, &body).await
    }

    /// Create a member with an auto-generated password and a blank card.
    ///
    /// `POST /api/person/create` with `{"nickname": "...", "group": [ids]}`
    pub async fn create_member(
        &self,
        nickname: &str,
        groups: &[String],
    ) -> Result<CreatedMember, Error> {
        let url = self.api_url("person/create");
        debug!(nickname, "creating member");
        self.post(url, &json!({ "nickname": nickname, "group": groups }))
            .await
    }
}
