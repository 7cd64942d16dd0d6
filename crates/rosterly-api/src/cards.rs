// Card endpoints

use serde::Serialize;
use serde_json::json;
use tracing::debug;

use crate::client::RosterClient;
use crate::error::Error;
use crate::models::{CardFields, CardQuery, ResEnvelope, WireCard};

#[derive(Serialize)]
struct CardUpdateBody<'a> {
    id: &'a str,
    #[serde(flatten)]
    fields: &'a CardFields,
}

impl RosterClient {
    /// List cards matching the given filter.
    ///
    /// `GET /api/cards`
    pub async fn list_cards(&self, query: &CardQuery) -> Result<Vec<WireCard>, Error> {
        let url = self.api_url("cards");
        debug!("listing cards");
        let envelope: ResEnvelope<WireCard> = self.get_with(url, query).await?;
        Ok(envelope.res)
    }

    /// Create a card.
    ///
    /// `POST /api/cards/create`
    pub async fn create_card(&self, fields: &CardFields) -> Result<(), Error> {
        let url = self.api_url("cards/create");
        debug!("creating card");
        self.post_ok(url, fields).await
    }

    /// Update a card's fields.
    ///
    /// `POST /api/cards/update`
    pub async fn update_card(&self, id: &str, fields: &CardFields) -> Result<(), Error> {
        let url = self.api_url("cards/update");
        debug!(id, "updating card");
        self.post_ok(url, &CardUpdateBody { id, fields }).await
    }

    /// Delete a card.
    ///
    /// `POST /api/cards/remove` with `{"id": "..."}`
    pub async fn remove_card(&self, id: &str) -> Result<(), Error> {
        let url = self.api_url("cards/remove");
        debug!(id, "removing card");
        self.post_ok(url, &json!({ "id": id })).await
    }
}
