// ── Domain model ──
//
// Canonical entity types as UI consumers see them: group references
// resolved into objects, avatar URLs rewritten for the CDN. Produced by
// the `adapt` pipeline from `rosterly_api` wire records.

mod card;
mod group;
mod person;

pub use card::Card;
pub use group::Group;
pub use person::Person;
