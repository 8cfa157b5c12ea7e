//! In-memory catalog cache.
//!
//! Keyed by the exact arguments of the lookup. Entries live as long as the
//! session that owns the cache; there is no expiry and no eviction.

use std::collections::HashMap;

use super::types::{CatalogKind, CatalogLevel};

/// The argument tuple of one catalog lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CatalogKey {
    Countries,
    States { country: String },
    Cities { state: String, country: String },
}

impl CatalogKey {
    pub fn kind(&self) -> CatalogKind {
        match self {
            Self::Countries => CatalogKind::Country,
            Self::States { .. } => CatalogKind::State,
            Self::Cities { .. } => CatalogKind::City,
        }
    }
}

#[derive(Debug, Default)]
pub struct CatalogCache {
    entries: HashMap<CatalogKey, CatalogLevel>,
}

impl CatalogCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &CatalogKey) -> Option<&CatalogLevel> {
        self.entries.get(key)
    }

    pub fn put(&mut self, key: CatalogKey, level: CatalogLevel) {
        self.entries.insert(key, level);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level(kind: CatalogKind, names: &[&str]) -> CatalogLevel {
        CatalogLevel {
            kind,
            names: names.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_cache_put_get() {
        let mut cache = CatalogCache::new();
        let key = CatalogKey::States { country: "USA".into() };
        cache.put(key.clone(), level(CatalogKind::State, &["Florida", "Texas"]));

        let hit = cache.get(&key).unwrap();
        assert_eq!(hit.names, vec!["Florida", "Texas"]);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_cache_keys_are_exact() {
        let mut cache = CatalogCache::new();
        cache.put(
            CatalogKey::Cities { state: "Georgia".into(), country: "USA".into() },
            level(CatalogKind::City, &["Atlanta"]),
        );

        // Same state name, different country
        assert!(cache
            .get(&CatalogKey::Cities { state: "Georgia".into(), country: "Georgia".into() })
            .is_none());
        // Case matters, as it does for the API
        assert!(cache.get(&CatalogKey::States { country: "usa".into() }).is_none());
    }

    #[test]
    fn test_cache_miss() {
        let cache = CatalogCache::new();
        assert!(cache.is_empty());
        assert!(cache.get(&CatalogKey::Countries).is_none());
    }

    #[test]
    fn test_key_kind() {
        assert_eq!(CatalogKey::Countries.kind(), CatalogKind::Country);
        assert_eq!(CatalogKey::States { country: "USA".into() }.kind(), CatalogKind::State);
    }
}
