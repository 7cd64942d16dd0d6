// Group directory endpoint

use tracing::debug;

use crate::client::RosterClient;
use crate::error::Error;
use crate::models::{ResEnvelope, WireGroup};

impl RosterClient {
    /// List every group in the directory.
    ///
    /// `GET /api/groups`
    pub async fn list_groups(&self) -> Result<Vec<WireGroup>, Error> {
        let url = self.api_url("groups");
        debug!("listing groups");
        let envelope: ResEnvelope<WireGroup> = self.get(url).await?;
        Ok(envelope.res)
    }
}
