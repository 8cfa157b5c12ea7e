//! Location resolver: turns a mode and the current input into a report.
//!
//! Names flow:       countries → states(country) → cities(state, country) → city
//! Network flow:     nearest_city
//! Coordinates flow: parse → nearest_city(lat, lon)
//!
//! Every step either yields the value the next step needs, stops with a
//! prompt for the missing selection, or fails.

use std::sync::Arc;
use tracing::debug;

use super::catalog::CascadingCatalogLookup;
use super::providers::AirQualityApi;
use super::types::{
    CatalogLevel, Coordinates, LocationMode, MapView, Place, Prompt, Report, SelectionInput,
};
use crate::conditions::{Conditions, ConditionsFetcher};
use crate::error::{AirwatchError, Result};

/// Outcome of one resolution attempt that did not fail.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Ready(Report),
    Pending(Prompt),
}

/// Result of picking one value out of a catalog level.
enum Pick<'a> {
    Chosen(&'a str),
    Missing(Prompt),
}

pub struct LocationResolver<A> {
    catalog: CascadingCatalogLookup<A>,
    conditions: ConditionsFetcher<A>,
}

impl<A: AirQualityApi> LocationResolver<A> {
    pub fn new(api: A) -> Self {
        Self::with_shared(Arc::new(api))
    }

    /// Build a resolver over an API handle the caller keeps a clone of.
    pub fn with_shared(api: Arc<A>) -> Self {
        Self {
            catalog: CascadingCatalogLookup::new(Arc::clone(&api)),
            conditions: ConditionsFetcher::new(api),
        }
    }

    pub fn catalog(&mut self) -> &mut CascadingCatalogLookup<A> {
        &mut self.catalog
    }

    pub fn resolve(&mut self, mode: LocationMode, input: &SelectionInput) -> Result<Resolution> {
        debug!(%mode, ?input, "resolving");
        match mode {
            LocationMode::ByAdministrativeName => self.resolve_by_name(input),
            LocationMode::ByNetworkLocation => self.resolve_by_network(),
            LocationMode::ByCoordinates => self.resolve_by_coordinates(input),
        }
    }

    fn resolve_by_name(&mut self, input: &SelectionInput) -> Result<Resolution> {
        let countries = require_entries(self.catalog.list_countries()?, "")?;
        let country = match pick(&countries, input.country(), |options, rejected| Prompt::Country {
            options,
            rejected,
        }) {
            Pick::Chosen(c) => c,
            Pick::Missing(prompt) => return Ok(Resolution::Pending(prompt)),
        };

        let states = require_entries(self.catalog.list_states(country)?, country)?;
        let state = match pick(&states, input.state(), |options, rejected| Prompt::State {
            country: country.to_string(),
            options,
            rejected,
        }) {
            Pick::Chosen(s) => s,
            Pick::Missing(prompt) => return Ok(Resolution::Pending(prompt)),
        };

        let cities = require_entries(self.catalog.list_cities(state, country)?, state)?;
        let city = match pick(&cities, input.city(), |options, rejected| Prompt::City {
            country: country.to_string(),
            state: state.to_string(),
            options,
            rejected,
        }) {
            Pick::Chosen(c) => c,
            Pick::Missing(prompt) => return Ok(Resolution::Pending(prompt)),
        };

        let (place, conditions) = self.conditions.by_name(city, state, country)?;
        let heading = format!("Weather and Air Quality in {}, {}, {}", city, state, country);
        let map = MapView::centered_on(place.latitude, place.longitude);
        Ok(ready(LocationMode::ByAdministrativeName, heading, place, conditions, map))
    }

    fn resolve_by_network(&mut self) -> Result<Resolution> {
        let (place, conditions) = self.conditions.nearest()?;
        let heading = format!(
            "Weather and Air Quality in {} (Nearest City)",
            place.display_line()
        );
        let map = MapView::centered_on(place.latitude, place.longitude);
        Ok(ready(LocationMode::ByNetworkLocation, heading, place, conditions, map))
    }

    fn resolve_by_coordinates(&mut self, input: &SelectionInput) -> Result<Resolution> {
        let (Some(lat), Some(lon)) = (input.latitude(), input.longitude()) else {
            return Ok(Resolution::Pending(Prompt::Coordinates { problem: None }));
        };

        let coords = match Coordinates::parse(lat, lon) {
            Ok(c) => c,
            Err(AirwatchError::InvalidInput(problem)) => {
                debug!(%problem, "coordinates withheld");
                return Ok(Resolution::Pending(Prompt::Coordinates {
                    problem: Some(problem),
                }));
            }
            Err(e) => return Err(e),
        };

        let (place, conditions) = self.conditions.nearest_to(coords)?;
        let heading = format!(
            "Weather and Air Quality in {} (Nearest to {}, {})",
            place.display_line(),
            coords.latitude,
            coords.longitude
        );
        // The map marks what the user asked for, not the station
        let map = MapView::centered_on(coords.latitude, coords.longitude);
        Ok(ready(LocationMode::ByCoordinates, heading, place, conditions, map))
    }
}

fn ready(mode: LocationMode, heading: String, place: Place, conditions: Conditions, map: MapView) -> Resolution {
    Resolution::Ready(Report {
        mode,
        heading,
        place,
        conditions,
        map,
    })
}

/// A successful but empty level stops the cascade with a warning.
fn require_entries(level: CatalogLevel, parent: &str) -> Result<CatalogLevel> {
    if level.is_empty() {
        return Err(AirwatchError::NoDataForSelection {
            level: level.kind,
            parent: parent.to_string(),
        });
    }
    Ok(level)
}

fn pick<'a, F>(level: &'a CatalogLevel, selected: Option<&str>, prompt: F) -> Pick<'a>
where
    F: FnOnce(Vec<String>, Option<String>) -> Prompt,
{
    match selected {
        None => Pick::Missing(prompt(level.names.clone(), None)),
        Some(name) => match level.names.iter().find(|n| n.as_str() == name) {
            Some(n) => Pick::Chosen(n.as_str()),
            None => Pick::Missing(prompt(level.names.clone(), Some(name.to_string()))),
        },
    }
}
