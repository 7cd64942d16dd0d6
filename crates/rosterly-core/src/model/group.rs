use serde::Serialize;

use rosterly_api::models::WireGroup;

/// Canonical reference entity: a named group of members.
///
/// Fetched once per session and shared globally; every other entity
/// refers to groups by id until the adapt pipeline resolves them into
/// these records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Group {
    pub id: String,
    pub name: String,
}

impl Group {
    /// Placeholder returned for ids with no matching group.
    pub fn unknown() -> Self {
        Self {
            id: String::new(),
            name: "<unknown>".into(),
        }
    }
}

impl From<WireGroup> for Group {
    fn from(wire: WireGroup) -> Self {
        Self {
            id: wire.id,
            name: wire.name,
        }
    }
}
