//! Session configuration.

/// How object names are compared when looking them up in a cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NameCase {
    /// `People` and `people` are different objects.
    #[default]
    Sensitive,
    /// Names are folded to lowercase before comparison, as on servers
    /// that store identifiers case-insensitively.
    Insensitive,
}

impl NameCase {
    /// Cache key for `name`.
    pub fn key(self, name: &str) -> String {
        match self {
            NameCase::Sensitive => name.to_string(),
            NameCase::Insensitive => name.to_lowercase(),
        }
    }
}

/// Options for a [`Session`](crate::Session).
///
/// ```ignore
/// let config = SessionConfig::default()
///     .with_name_case(NameCase::Insensitive)
///     .with_default_schema("shop");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionConfig {
    pub name_case: NameCase,
    /// Schema returned by [`Session::default_schema`](crate::Session::default_schema).
    pub default_schema: Option<String>,
}

impl SessionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_name_case(mut self, name_case: NameCase) -> Self {
        self.name_case = name_case;
        self
    }

    #[must_use]
    pub fn with_default_schema(mut self, schema: impl Into<String>) -> Self {
        self.default_schema = Some(schema.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = SessionConfig::new();
        assert_eq!(config.name_case, NameCase::Sensitive);
        assert!(config.default_schema.is_none());
    }

    #[test]
    fn setters_chain() {
        let config = SessionConfig::new()
            .with_name_case(NameCase::Insensitive)
            .with_default_schema("shop");
        assert_eq!(config.name_case, NameCase::Insensitive);
        assert_eq!(config.default_schema.as_deref(), Some("shop"));
    }

    #[test]
    fn key_folds_only_when_insensitive() {
        assert_eq!(NameCase::Sensitive.key("People"), "People");
        assert_eq!(NameCase::Insensitive.key("People"), "people");
    }
}
