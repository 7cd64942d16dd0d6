// ── Denormalization pipeline ──
//
// Transform functions from wire records to domain records: comma-joined
// group references resolved through a `GroupIndex`, avatar URLs
// rewritten by an `ImagePolicy`. Every function refreshes the supplied
// index from the supplied collection before resolving; the refresh is
// identity-memoized, so batching several calls against one collection
// rebuilds the map at most once.

mod image;
mod index;

pub use image::ImagePolicy;
pub use index::GroupIndex;

use std::sync::Arc;

use rosterly_api::models::{WireCard, WirePerson, WireUser};

use crate::model::{Card, Group, Person};

/// Split a comma-joined id list, dropping empty tokens, and resolve
/// each id through the index.
fn resolve_csv(index: &GroupIndex, csv: &str) -> Vec<Group> {
    csv.split(',')
        .filter(|token| !token.is_empty())
        .map(|token| index.resolve(token))
        .collect()
}

/// Denormalize one person record.
///
/// The `group` and `admin` CSV lists are resolved independently; the
/// avatar is rewritten with the original reference preserved.
pub fn adapt_person(
    wire: &WirePerson,
    index: &mut GroupIndex,
    groups: &Arc<Vec<Group>>,
    images: &ImagePolicy,
) -> Person {
    index.refresh(groups);

    Person {
        id: wire.uid.clone(),
        nickname: wire.nickname.clone(),
        avatar_url: images.adapt(&wire.avatar),
        original_avatar_url: wire.avatar.clone(),
        groups: resolve_csv(index, &wire.group),
        admin_groups: resolve_csv(index, &wire.admin),
        banned: wire.banned,
    }
}

/// Plural form of [`adapt_person`].
pub fn adapt_person_list(
    wires: &[WirePerson],
    index: &mut GroupIndex,
    groups: &Arc<Vec<Group>>,
    images: &ImagePolicy,
) -> Vec<Person> {
    index.refresh(groups);
    wires
        .iter()
        .map(|wire| adapt_person(wire, index, groups, images))
        .collect()
}

/// Denormalize the users listing. Users share the person shape.
pub fn adapt_user_list(
    wires: &[WireUser],
    index: &mut GroupIndex,
    groups: &Arc<Vec<Group>>,
    images: &ImagePolicy,
) -> Vec<Person> {
    adapt_person_list(wires, index, groups, images)
}

/// Denormalize one card record.
pub fn adapt_card(
    wire: &WireCard,
    index: &mut GroupIndex,
    groups: &Arc<Vec<Group>>,
    images: &ImagePolicy,
) -> Card {
    index.refresh(groups);

    Card {
        id: wire.id.clone(),
        owner_id: wire.uid.clone(),
        nickname: wire.nickname.clone(),
        job: wire.job.clone(),
        bio: wire.bio.clone(),
        avatar_url: images.adapt(&wire.avatar),
        original_avatar_url: wire.avatar.clone(),
        order: wire.order,
        retired: wire.retired,
        hidden: wire.hidden,
        groups: resolve_csv(index, &wire.group),
    }
}

/// Plural form of [`adapt_card`].
pub fn adapt_cards(
    wires: &[WireCard],
    index: &mut GroupIndex,
    groups: &Arc<Vec<Group>>,
    images: &ImagePolicy,
) -> Vec<Card> {
    index.refresh(groups);
    wires
        .iter()
        .map(|wire| adapt_card(wire, index, groups, images))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use url::Url;

    use super::*;

    fn collection(ids: &[(&str, &str)]) -> Arc<Vec<Group>> {
        Arc::new(
            ids.iter()
                .map(|(id, name)| Group {
                    id: (*id).into(),
                    name: (*name).into(),
                })
                .collect(),
        )
    }

    fn images() -> ImagePolicy {
        ImagePolicy::new(Url::parse("https://cdn.test").unwrap(), true)
    }

    fn person(group: &str, admin: &str) -> WirePerson {
        serde_json::from_value(serde_json::json!({
            "uid": "u1",
            "nickname": "Sam",
            "avatar": "avatars/sam.jpg",
            "group": group,
            "admin": admin,
        }))
        .unwrap()
    }

    #[test]
    fn csv_resolves_in_original_order() {
        let groups = collection(&[("1", "Alpha"), ("2", "Beta"), ("3", "Gamma")]);
        let mut index = GroupIndex::new();

        let adapted = adapt_person(&person("1,2,3", ""), &mut index, &groups, &images());

        let names: Vec<&str> = adapted.groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, ["Alpha", "Beta", "Gamma"]);
    }

    #[test]
    fn empty_and_blank_tokens_yield_empty_lists() {
        let groups = collection(&[("1", "Alpha")]);
        let mut index = GroupIndex::new();

        assert!(adapt_person(&person("", ""), &mut index, &groups, &images())
            .groups
            .is_empty());
        assert!(adapt_person(&person(",,", ""), &mut index, &groups, &images())
            .groups
            .is_empty());
    }

    #[test]
    fn group_and_admin_lists_resolve_independently() {
        let groups = collection(&[("5", "Engineering"), ("9", "Design")]);
        let mut index = GroupIndex::new();

        let adapted = adapt_person(&person("5,9", "5"), &mut index, &groups, &images());

        assert_eq!(adapted.groups.len(), 2);
        assert_eq!(adapted.admin_groups.len(), 1);
        assert_eq!(adapted.admin_groups[0].name, "Engineering");
    }

    #[test]
    fn unknown_ids_resolve_to_sentinel_in_place() {
        let groups = collection(&[("1", "Alpha")]);
        let mut index = GroupIndex::new();

        let adapted = adapt_person(&person("1,404", ""), &mut index, &groups, &images());

        assert_eq!(adapted.groups.len(), 2);
        assert_eq!(adapted.groups[0].name, "Alpha");
        assert_eq!(adapted.groups[1], Group::unknown());
    }

    #[test]
    fn avatar_is_rewritten_and_original_kept() {
        let groups = collection(&[]);
        let mut index = GroupIndex::new();

        let adapted = adapt_person(&person("", ""), &mut index, &groups, &images());

        assert_eq!(adapted.avatar_url, "https://cdn.test/avatars/sam@600.webp");
        assert_eq!(adapted.original_avatar_url, "avatars/sam.jpg");
    }

    #[test]
    fn adapt_is_idempotent_for_one_collection() {
        let groups = collection(&[("1", "Alpha")]);
        let mut index = GroupIndex::new();
        let wire = person("1", "1");

        let first = adapt_person(&wire, &mut index, &groups, &images());
        let second = adapt_person(&wire, &mut index, &groups, &images());

        assert_eq!(first, second);
        // Repeated calls against one collection rebuild at most once.
        assert_eq!(index.rebuild_count(), 1);
    }

    #[test]
    fn card_adapts_fields_and_groups() {
        let groups = collection(&[("5", "Engineering")]);
        let mut index = GroupIndex::new();
        let wire: WireCard = serde_json::from_value(serde_json::json!({
            "id": 3,
            "uid": "u1",
            "nickname": "Sam",
            "job": "Backend",
            "bio": "keeps the lights on",
            "avatar": "cards/sam.png",
            "order": 2,
            "retired": true,
            "group": "5",
        }))
        .unwrap();

        let card = adapt_card(&wire, &mut index, &groups, &images());

        assert_eq!(card.id, "3");
        assert_eq!(card.owner_id, "u1");
        assert_eq!(card.order, 2);
        assert!(card.retired);
        assert!(!card.hidden);
        assert_eq!(card.avatar_url, "https://cdn.test/cards/sam@600.webp");
        assert_eq!(card.original_avatar_url, "cards/sam.png");
        assert_eq!(card.groups[0].name, "Engineering");
    }

    #[test]
    fn user_list_shares_the_person_shape() {
        let groups = collection(&[("9", "Design")]);
        let mut index = GroupIndex::new();
        let wires = vec![person("9", ""), person("", "9")];

        let users = adapt_user_list(&wires, &mut index, &groups, &images());

        assert_eq!(users.len(), 2);
        assert_eq!(users[0].groups[0].name, "Design");
        assert_eq!(users[1].admin_groups[0].name, "Design");
        assert_eq!(index.rebuild_count(), 1);
    }
}
