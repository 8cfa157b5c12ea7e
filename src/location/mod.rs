//! Location subsystem: the AirVisual provider, the cascading catalog,
//! and the resolver that ties a mode to a place.

pub mod cache;
pub mod catalog;
#[cfg(test)]
pub(crate) mod mock;
pub mod providers;
pub mod resolver;
pub mod types;

pub use catalog::CascadingCatalogLookup;
pub use providers::{AirQualityApi, AirVisualClient, Endpoint};
pub use resolver::{LocationResolver, Resolution};
pub use types::{CatalogKind, CatalogLevel, Coordinates, LocationMode, Place, Prompt, Report, SelectionInput};
