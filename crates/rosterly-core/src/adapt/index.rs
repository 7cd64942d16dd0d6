// ── Group lookup index ──
//
// Id-to-group resolution over the most recently supplied group
// collection. Each feature module owns one index and threads it into
// its denormalization calls; there is no process-wide instance.

use std::collections::HashMap;
use std::sync::Arc;

use crate::model::Group;

/// Lookup table from group id to group record.
///
/// `refresh` keys on the *identity* of the supplied collection: handing
/// it the same `Arc` again is a no-op, while a new collection (even with
/// identical contents) rebuilds the map once. Resolution never fails;
/// unknown ids get a sentinel placeholder.
#[derive(Debug, Default)]
pub struct GroupIndex {
    /// The collection the current map was built from.
    source: Option<Arc<Vec<Group>>>,
    by_id: HashMap<String, Group>,
    rebuilds: u64,
}

impl GroupIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the id map if `groups` is a different collection than the
    /// one the map was last built from.
    pub fn refresh(&mut self, groups: &Arc<Vec<Group>>) {
        if self.source.as_ref().is_some_and(|s| Arc::ptr_eq(s, groups)) {
            return;
        }

        self.by_id = groups
            .iter()
            .map(|g| (g.id.clone(), g.clone()))
            .collect();
        self.source = Some(Arc::clone(groups));
        self.rebuilds += 1;
    }

    /// Resolve one id to its group, or the sentinel placeholder if the
    /// id is unknown (including the empty string).
    pub fn resolve(&self, id: &str) -> Group {
        self.by_id.get(id).cloned().unwrap_or_else(Group::unknown)
    }

    /// Number of map rebuilds performed (diagnostics).
    pub fn rebuild_count(&self) -> u64 {
        self.rebuilds
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn groups(pairs: &[(&str, &str)]) -> Arc<Vec<Group>> {
        Arc::new(
            pairs
                .iter()
                .map(|(id, name)| Group {
                    id: (*id).into(),
                    name: (*name).into(),
                })
                .collect(),
        )
    }

    #[test]
    fn refresh_is_identity_memoized() {
        let mut index = GroupIndex::new();
        let first = groups(&[("1", "Alpha"), ("2", "Beta")]);

        index.refresh(&first);
        index.refresh(&first);
        assert_eq!(index.rebuild_count(), 1);

        // Same contents, new collection: rebuilds exactly once more.
        let second = groups(&[("1", "Alpha"), ("2", "Beta")]);
        index.refresh(&second);
        index.refresh(&second);
        assert_eq!(index.rebuild_count(), 2);
    }

    #[test]
    fn refresh_replaces_the_whole_mapping() {
        let mut index = GroupIndex::new();
        index.refresh(&groups(&[("1", "Alpha")]));
        assert_eq!(index.resolve("1").name, "Alpha");

        index.refresh(&groups(&[("2", "Beta")]));
        assert_eq!(index.resolve("2").name, "Beta");
        // The old entry is gone, not merged.
        assert_eq!(index.resolve("1"), Group::unknown());
    }

    #[test]
    fn resolve_unknown_returns_sentinel() {
        let mut index = GroupIndex::new();
        index.refresh(&groups(&[("1", "Alpha")]));

        for id in ["", "999", "no-such-group", ","] {
            let resolved = index.resolve(id);
            assert_eq!(resolved.id, "");
            assert_eq!(resolved.name, "<unknown>");
        }
    }

    #[test]
    fn resolve_before_any_refresh_returns_sentinel() {
        let index = GroupIndex::new();
        assert_eq!(index.resolve("1"), Group::unknown());
        assert_eq!(index.rebuild_count(), 0);
    }
}
