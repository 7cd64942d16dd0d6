use serde::Serialize;

use crate::model::Group;

/// A member's public card as UI consumers see it.
///
/// One person may own several cards; a card's group list may differ
/// from its owner's memberships.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Card {
    pub id: String,
    /// The owning person's id.
    pub owner_id: String,
    pub nickname: String,
    pub job: String,
    pub bio: String,
    /// Display URL after the CDN/size/WebP rewrite.
    pub avatar_url: String,
    /// The untouched wire reference, kept for edit forms.
    pub original_avatar_url: String,
    /// Sort weight within a listing.
    pub order: i64,
    pub retired: bool,
    pub hidden: bool,
    /// Groups this card is associated with.
    pub groups: Vec<Group>,
}
