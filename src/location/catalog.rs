//! Cascading country → state → city lookup with memoization.

use std::sync::Arc;
use tracing::debug;

use super::cache::{CatalogCache, CatalogKey};
use super::providers::{AirQualityApi, CityEntry, CountryEntry, Endpoint, StateEntry};
use super::types::{CatalogKind, CatalogLevel};
use crate::error::Result;

pub struct CascadingCatalogLookup<A> {
    api: Arc<A>,
    cache: CatalogCache,
}

impl<A: AirQualityApi> CascadingCatalogLookup<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self {
            api,
            cache: CatalogCache::new(),
        }
    }

    pub fn list_countries(&mut self) -> Result<CatalogLevel> {
        self.lookup(CatalogKey::Countries)
    }

    pub fn list_states(&mut self, country: &str) -> Result<CatalogLevel> {
        self.lookup(CatalogKey::States {
            country: country.to_string(),
        })
    }

    pub fn list_cities(&mut self, state: &str, country: &str) -> Result<CatalogLevel> {
        self.lookup(CatalogKey::Cities {
            state: state.to_string(),
            country: country.to_string(),
        })
    }

    /// Number of levels held in the memo map.
    pub fn cached_levels(&self) -> usize {
        self.cache.len()
    }

    fn lookup(&mut self, key: CatalogKey) -> Result<CatalogLevel> {
        if let Some(level) = self.cache.get(&key) {
            debug!(?key, entries = level.names.len(), "catalog cache hit");
            return Ok(level.clone());
        }

        let endpoint = match &key {
            CatalogKey::Countries => Endpoint::Countries,
            CatalogKey::States { country } => Endpoint::States {
                country: country.clone(),
            },
            CatalogKey::Cities { state, country } => Endpoint::Cities {
                state: state.clone(),
                country: country.clone(),
            },
        };
        let stage = endpoint.stage();
        let envelope = self.api.fetch(&endpoint)?;

        // Failures are returned before anything is stored, so a rate-limited
        // answer is asked for again on the next interaction.
        let names: Vec<String> = match key.kind() {
            CatalogKind::Country => envelope
                .into_data::<Vec<CountryEntry>>(stage)?
                .into_iter()
                .map(|e| e.country)
                .collect(),
            CatalogKind::State => envelope
                .into_data::<Vec<StateEntry>>(stage)?
                .into_iter()
                .map(|e| e.state)
                .collect(),
            CatalogKind::City => envelope
                .into_data::<Vec<CityEntry>>(stage)?
                .into_iter()
                .map(|e| e.city)
                .collect(),
        };

        let level = CatalogLevel {
            kind: key.kind(),
            names,
        };
        debug!(?key, entries = level.names.len(), "catalog cache miss, stored");
        self.cache.put(key, level.clone());
        Ok(level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AirwatchError;
    use crate::location::mock::MockApi;
    use serde_json::json;

    fn lookup(mock: MockApi) -> (CascadingCatalogLookup<MockApi>, Arc<MockApi>) {
        let api = Arc::new(mock);
        (CascadingCatalogLookup::new(Arc::clone(&api)), api)
    }

    #[test]
    fn test_list_countries() {
        let (mut catalog, api) = lookup(MockApi::usa_florida_miami());
        let level = catalog.list_countries().unwrap();
        assert_eq!(level.kind, CatalogKind::Country);
        assert!(level.contains("USA"));
        assert_eq!(api.calls_to(&Endpoint::Countries), 1);
    }

    #[test]
    fn test_same_country_reuses_cached_states() {
        let (mut catalog, api) = lookup(MockApi::usa_florida_miami());
        let first = catalog.list_states("USA").unwrap();
        let second = catalog.list_states("USA").unwrap();
        assert_eq!(first, second);
        assert_eq!(api.calls_to(&Endpoint::States { country: "USA".into() }), 1);
        assert_eq!(catalog.cached_levels(), 1);
    }

    #[test]
    fn test_different_arguments_fetch_separately() {
        let (mut catalog, api) = lookup(MockApi::usa_florida_miami());
        catalog.list_cities("Florida", "USA").unwrap();
        catalog.list_cities("Texas", "USA").unwrap();
        assert_eq!(api.total_calls(), 2);
        assert_eq!(catalog.cached_levels(), 2);
    }

    #[test]
    fn test_non_success_is_blocking_error() {
        let mock = MockApi::usa_florida_miami().respond(
            Endpoint::Countries,
            json!({ "status": "fail", "data": [{ "country": "USA" }] }),
        );
        let (mut catalog, _api) = lookup(mock);
        let err = catalog.list_countries().unwrap_err();
        assert!(matches!(err, AirwatchError::UpstreamUnavailable { .. }));
    }

    #[test]
    fn test_failures_are_not_cached() {
        let mock = MockApi::usa_florida_miami().respond(
            Endpoint::Countries,
            json!({ "status": "fail", "data": { "message": "call_limit_reached" } }),
        );
        let (mut catalog, api) = lookup(mock);
        assert!(catalog.list_countries().is_err());
        assert!(catalog.list_countries().is_err());
        assert_eq!(api.calls_to(&Endpoint::Countries), 2);
        assert_eq!(catalog.cached_levels(), 0);
    }

    #[test]
    fn test_empty_success_is_cached_empty_level() {
        let mock = MockApi::usa_florida_miami().respond(
            Endpoint::States { country: "Atlantis".into() },
            json!({ "status": "success", "data": [] }),
        );
        let (mut catalog, api) = lookup(mock);
        let level = catalog.list_states("Atlantis").unwrap();
        assert!(level.is_empty());
        catalog.list_states("Atlantis").unwrap();
        assert_eq!(api.total_calls(), 1);
    }
}
