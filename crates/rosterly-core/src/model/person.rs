use serde::Serialize;

use crate::model::Group;

/// A member as UI consumers see them.
///
/// The wire format's comma-joined `group`/`admin` id lists arrive here
/// resolved into `Group` records, and the avatar carries both the
/// display URL (CDN-rewritten) and the original reference. The users
/// listing and the person profile share this shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Person {
    pub id: String,
    pub nickname: String,
    /// Display URL after the CDN/size/WebP rewrite.
    pub avatar_url: String,
    /// The untouched wire reference, kept for edit forms.
    pub original_avatar_url: String,
    /// Groups this person belongs to.
    pub groups: Vec<Group>,
    /// Groups this person administers.
    pub admin_groups: Vec<Group>,
    pub banned: bool,
}
