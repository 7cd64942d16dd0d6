use std::fmt;

/// Namespaced key identifying one effect action, e.g. `groups/read`.
///
/// Every feature module declares its action set as `const` values of
/// this type; the loading tree and the signal bus are both keyed by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActionType {
    pub namespace: &'static str,
    pub name: &'static str,
}

impl ActionType {
    pub const fn new(namespace: &'static str, name: &'static str) -> Self {
        Self { namespace, name }
    }

    /// The `"namespace/name"` form used for loading keys and logs.
    pub fn key(&self) -> String {
        format!("{}/{}", self.namespace, self.name)
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_is_namespace_slash_name() {
        const READ: ActionType = ActionType::new("groups", "read");
        assert_eq!(READ.key(), "groups/read");
        assert_eq!(READ.to_string(), "groups/read");
    }
}
