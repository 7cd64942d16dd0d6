// Roster service wire types
//
// Models for the roster service JSON API. List payloads are wrapped in the
// `{ "res": [...] }` envelope. Fields use `#[serde(default)]` liberally
// because the service omits empty fields rather than sending them blank.
// Record ids arrive as JSON numbers or strings depending on endpoint age;
// they are normalized to `String` at the deserialization boundary.

use serde::{Deserialize, Deserializer, Serialize};

// ── Response envelope ────────────────────────────────────────────────

/// Standard roster service list envelope.
///
/// Every list-shaped payload wraps its records:
/// ```json
/// { "res": [...] }
/// ```
#[derive(Debug, Deserialize)]
pub struct ResEnvelope<T> {
    pub res: Vec<T>,
}

impl<T> Default for ResEnvelope<T> {
    fn default() -> Self {
        Self { res: Vec::new() }
    }
}

/// Accept a JSON number or string and normalize to `String`.
fn de_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum IdRepr {
        Num(i64),
        Str(String),
    }

    Ok(match IdRepr::deserialize(deserializer)? {
        IdRepr::Num(n) => n.to_string(),
        IdRepr::Str(s) => s,
    })
}

// ── Group ────────────────────────────────────────────────────────────

/// Group record from the group directory.
#[derive(Debug, Clone, Deserialize)]
pub struct WireGroup {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

// ── Person / User ────────────────────────────────────────────────────

/// Person record as the service sends it.
///
/// `group` and `admin` are comma-joined id lists (e.g. `"1,5,9"`);
/// resolution into group objects happens in `rosterly-core`.
#[derive(Debug, Clone, Deserialize)]
pub struct WirePerson {
    #[serde(deserialize_with = "de_id")]
    pub uid: String,
    #[serde(default)]
    pub nickname: String,
    #[serde(default)]
    pub avatar: String,
    /// Comma-joined ids of groups this person belongs to.
    #[serde(default)]
    pub group: String,
    /// Comma-joined ids of groups this person administers.
    #[serde(default)]
    pub admin: String,
    #[serde(default)]
    pub banned: bool,
}

/// The users listing returns the same record shape as person info.
pub type WireUser = WirePerson;

/// Response of the person-info endpoint: the person record plus that
/// person's cards and the users visible to them.
#[derive(Debug, Deserialize)]
pub struct PersonInfoResponse {
    pub info: WirePerson,
    #[serde(default)]
    pub cards: ResEnvelope<WireCard>,
    #[serde(default)]
    pub users: ResEnvelope<WireUser>,
}

/// Response of the password-reset endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ResetPassResponse {
    #[serde(rename = "newPass")]
    pub new_pass: String,
}

/// Response of the member-creation endpoint: the generated credentials
/// and the id of the card created alongside the member.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedMember {
    #[serde(rename = "UID", deserialize_with = "de_id")]
    pub uid: String,
    pub pass: String,
    #[serde(rename = "cardID", deserialize_with = "de_id")]
    pub card_id: String,
}

/// Partial person update. `None` fields are omitted from the request.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PersonUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banned: Option<bool>,
    /// Comma-joined group ids.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    /// Comma-joined admin-group ids.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin: Option<String>,
}

// ── Card ─────────────────────────────────────────────────────────────

/// Card record as the service sends it.
///
/// `uid` is the owning person; one person may hold several cards, and a
/// card's `group` list may differ from its owner's.
#[derive(Debug, Clone, Deserialize)]
pub struct WireCard {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    #[serde(deserialize_with = "de_id")]
    pub uid: String,
    #[serde(default)]
    pub nickname: String,
    #[serde(default)]
    pub job: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub order: i64,
    #[serde(default)]
    pub retired: bool,
    #[serde(default)]
    pub hidden: bool,
    /// Comma-joined group ids.
    #[serde(default)]
    pub group: String,
}

/// Fields accepted by card create/update. `None` fields are omitted.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CardFields {
    /// Owning person.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retired: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hidden: Option<bool>,
    /// Comma-joined group ids.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

// ── List filters ─────────────────────────────────────────────────────

/// Filter parameters for the card listing.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CardQuery {
    /// Restrict to cards owned by this person.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    /// Restrict to cards associated with this group id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retired: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hidden: Option<bool>,
}

/// Filter parameters for the users listing.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UserQuery {
    /// Restrict to members of this group id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banned: Option<bool>,
    /// Substring match on nickname.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
}
