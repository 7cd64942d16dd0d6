// Users listing endpoint

use tracing::debug;

use crate::client::RosterClient;
use crate::error::Error;
use crate::models::{ResEnvelope, UserQuery, WireUser};

impl RosterClient {
    /// List users matching the given filter.
    ///
    /// `GET /api/users`
    pub async fn list_users(&self, query: &UserQuery) -> Result<Vec<WireUser>, Error> {
        let url = self.api_url("users");
        debug!("listing users");
        let envelope: ResEnvelope<WireUser> = self.get_with(url, query).await?;
        Ok(envelope.res)
    }
}
