//! Key derivation for registered resources.
//!
//! Every entry in a [`ResourceRegistry`](crate::registry::ResourceRegistry)
//! is stored under a [`ResourceKey`] derived from the resource's kind and
//! name. Derivation is a pure function: it needs no registry, and the same
//! `(kind, name)` pair always produces the same key.

use serde::{Deserialize, Serialize};

/// Identity of a resource within a registry.
///
/// The key is the resource kind followed by the resource name, concatenated
/// (kind first, name second). Two resources with the same `(kind, name)`
/// pair collide; only one of them can be registered at a time. The same name
/// under a different kind yields a distinct key.
///
/// # Example
///
/// ```
/// use anchorage_registry::key::ResourceKey;
///
/// let key = ResourceKey::derive("service", "slow");
/// assert_eq!(key.as_str(), "serviceslow");
/// assert_eq!(key, ResourceKey::derive("service", "slow"));
/// assert_ne!(key, ResourceKey::derive("queryset", "slow"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceKey(String);

impl ResourceKey {
    /// Derives the key for a `(kind, name)` pair.
    ///
    /// Stable across calls and across the lifetime of any resource built
    /// from the same pair; name and kind are immutable post-construction.
    #[must_use]
    pub fn derive(kind: impl AsRef<str>, name: impl AsRef<str>) -> Self {
        Self(format!("{}{}", kind.as_ref(), name.as_ref()))
    }

    /// Returns the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ResourceKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derivation_is_deterministic() {
        let first = ResourceKey::derive("service", "slow");
        let second = ResourceKey::derive("service", "slow");
        assert_eq!(first, second);
    }

    #[test]
    fn kind_comes_before_name() {
        let key = ResourceKey::derive("data_connection", "sessions");
        assert_eq!(key.as_str(), "data_connectionsessions");
    }

    #[test]
    fn same_name_different_kind_is_distinct() {
        let service = ResourceKey::derive("service", "primary");
        let queryset = ResourceKey::derive("queryset", "primary");
        assert_ne!(service, queryset);
    }

    #[test]
    fn displays_as_raw_key() {
        let key = ResourceKey::derive("service", "slow");
        assert_eq!(key.to_string(), "serviceslow");
    }
}
