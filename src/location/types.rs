//! Core types for the location subsystem.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::conditions::Conditions;
use crate::error::{AirwatchError, Result};

/// One tier of the location hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogKind {
    Country,
    State,
    City,
}

impl CatalogKind {
    /// The tier whose selection this tier depends on.
    pub fn parent(self) -> Option<CatalogKind> {
        match self {
            Self::Country => None,
            Self::State => Some(Self::Country),
            Self::City => Some(Self::State),
        }
    }
}

impl fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Country => write!(f, "country"),
            Self::State => write!(f, "state"),
            Self::City => write!(f, "city"),
        }
    }
}

/// The names available at one tier, in the order the API listed them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogLevel {
    pub kind: CatalogKind,
    pub names: Vec<String>,
}

impl CatalogLevel {
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }
}

/// A validated latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(AirwatchError::InvalidInput(format!(
                "latitude {} is outside -90..90",
                latitude
            )));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(AirwatchError::InvalidInput(format!(
                "longitude {} is outside -180..180",
                longitude
            )));
        }
        Ok(Self { latitude, longitude })
    }

    /// Parse the two free-text fields of the coordinate form.
    pub fn parse(latitude: &str, longitude: &str) -> Result<Self> {
        let lat = parse_component("latitude", latitude)?;
        let lon = parse_component("longitude", longitude)?;
        Self::new(lat, lon)
    }
}

fn parse_component(field: &str, raw: &str) -> Result<f64> {
    let trimmed = raw.trim();
    let value: f64 = trimmed
        .parse()
        .map_err(|_| AirwatchError::InvalidInput(format!("{} '{}' is not a number", field, trimmed)))?;
    // "NaN" and "inf" parse as f64 but are not coordinates
    if !value.is_finite() {
        return Err(AirwatchError::InvalidInput(format!("{} '{}' is not a number", field, trimmed)));
    }
    Ok(value)
}

/// A resolved monitoring location. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Place {
    pub name: String,
    pub state: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Place {
    pub fn display_line(&self) -> String {
        format!("{}, {}, {}", self.name, self.state, self.country)
    }
}

/// The three ways of picking a location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationMode {
    ByAdministrativeName,
    ByNetworkLocation,
    ByCoordinates,
}

impl LocationMode {
    pub const ALL: [LocationMode; 3] = [
        LocationMode::ByAdministrativeName,
        LocationMode::ByNetworkLocation,
        LocationMode::ByCoordinates,
    ];

    /// Label shown in the mode selector.
    pub fn label(self) -> &'static str {
        match self {
            Self::ByAdministrativeName => "By City, State, and Country",
            Self::ByNetworkLocation => "By Nearest City (IP Address)",
            Self::ByCoordinates => "By Latitude and Longitude",
        }
    }
}

impl fmt::Display for LocationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for LocationMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "city" | "name" | "names" => Ok(Self::ByAdministrativeName),
            "nearest" | "ip" | "auto" => Ok(Self::ByNetworkLocation),
            "coords" | "coordinates" | "latlon" => Ok(Self::ByCoordinates),
            _ => Err(format!("Unknown mode '{}'. Use 'city', 'nearest' or 'coords'.", s)),
        }
    }
}

/// Everything the input surface can hold at one moment.
///
/// Empty strings are treated the same as absent values.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SelectionInput {
    pub country: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
}

impl SelectionInput {
    pub fn country(&self) -> Option<&str> {
        non_empty(self.country.as_deref())
    }

    pub fn state(&self) -> Option<&str> {
        non_empty(self.state.as_deref())
    }

    pub fn city(&self) -> Option<&str> {
        non_empty(self.city.as_deref())
    }

    pub fn latitude(&self) -> Option<&str> {
        non_empty(self.latitude.as_deref())
    }

    pub fn longitude(&self) -> Option<&str> {
        non_empty(self.longitude.as_deref())
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

/// What the resolver still needs before it can fetch conditions.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "awaiting", rename_all = "snake_case")]
pub enum Prompt {
    Country {
        options: Vec<String>,
        rejected: Option<String>,
    },
    State {
        country: String,
        options: Vec<String>,
        rejected: Option<String>,
    },
    City {
        country: String,
        state: String,
        options: Vec<String>,
        rejected: Option<String>,
    },
    Coordinates {
        problem: Option<String>,
    },
}

impl Prompt {
    pub fn title(&self) -> &'static str {
        match self {
            Self::Country { .. } => "Select a country",
            Self::State { .. } => "Select a state",
            Self::City { .. } => "Select a city",
            Self::Coordinates { .. } => "Enter Latitude and Longitude, ex: 25.793449, -80.139198",
        }
    }

    pub fn options(&self) -> &[String] {
        match self {
            Self::Country { options, .. } | Self::State { options, .. } | Self::City { options, .. } => options,
            Self::Coordinates { .. } => &[],
        }
    }
}

/// Map centered on one point with a single marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapView {
    pub latitude: f64,
    pub longitude: f64,
    pub zoom: u8,
    pub marker: &'static str,
}

impl MapView {
    pub const ZOOM: u8 = 10;

    pub fn centered_on(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            zoom: Self::ZOOM,
            marker: "Station",
        }
    }

    pub fn openstreetmap_url(&self) -> String {
        format!(
            "https://www.openstreetmap.org/?mlat={lat}&mlon={lon}#map={z}/{lat}/{lon}",
            lat = self.latitude,
            lon = self.longitude,
            z = self.zoom,
        )
    }
}

/// A fully resolved place with its current readings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub mode: LocationMode,
    pub heading: String,
    pub place: Place,
    pub conditions: Conditions,
    pub map: MapView,
}
