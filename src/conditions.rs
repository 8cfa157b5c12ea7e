//! Current weather and pollution readings, and their display form.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Number;
use std::sync::Arc;
use tracing::debug;

use crate::error::{AirwatchError, Result};
use crate::location::providers::{AirQualityApi, CityData, Endpoint};
use crate::location::types::{Coordinates, Place};

/// Readings for one place, passed through from the API.
///
/// Numbers keep the exact JSON form they arrived in so that `25` is shown
/// as `25` and `25.5` as `25.5`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Conditions {
    pub temperature_celsius: Number,
    pub humidity_percent: Number,
    pub aqi: Number,
    pub main_pollutant: Option<String>,
    pub observed_at: Option<DateTime<Utc>>,
}

impl Conditions {
    pub fn temperature_fahrenheit(&self) -> f64 {
        celsius_to_fahrenheit(number_value(&self.temperature_celsius))
    }

    /// `"25 °C/ 77.0 °F"`
    pub fn temperature_text(&self) -> String {
        format!(
            "{} °C/ {:?} °F",
            self.temperature_celsius,
            self.temperature_fahrenheit()
        )
    }

    pub fn humidity_text(&self) -> String {
        format!("{}%", self.humidity_percent)
    }

    pub fn aqi_text(&self) -> String {
        self.aqi.to_string()
    }

    /// The three metrics shown side by side.
    pub fn metrics(&self) -> [Metric; 3] {
        [
            Metric { label: "Temperature", value: self.temperature_text() },
            Metric { label: "Humidity", value: self.humidity_text() },
            Metric { label: "Air Quality Index", value: self.aqi_text() },
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metric {
    pub label: &'static str,
    pub value: String,
}

/// `F = C * 9/5 + 32`, unrounded.
pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * 9.0 / 5.0 + 32.0
}

fn number_value(n: &Number) -> f64 {
    // Without arbitrary precision every JSON number is representable as f64
    n.as_f64().unwrap_or(f64::NAN)
}

fn parse_timestamp(ts: Option<&str>) -> Option<DateTime<Utc>> {
    let ts = ts?;
    DateTime::parse_from_rfc3339(ts)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}

/// Split a `/city` or `/nearest_city` payload into the place and its readings.
pub fn split_city_data(data: CityData) -> Result<(Place, Conditions)> {
    let (longitude, latitude) = match data.location.coordinates.as_slice() {
        [lon, lat, ..] => (*lon, *lat),
        _ => {
            return Err(AirwatchError::InvalidResponse(format!(
                "station '{}' has no coordinates",
                data.city
            )))
        }
    };

    let place = Place {
        name: data.city,
        state: data.state,
        country: data.country,
        latitude,
        longitude,
    };

    let weather = data.current.weather;
    let pollution = data.current.pollution;
    let conditions = Conditions {
        observed_at: parse_timestamp(weather.ts.as_deref()),
        temperature_celsius: weather.tp,
        humidity_percent: weather.hu,
        aqi: pollution.aqius,
        main_pollutant: pollution.mainus,
    };
    Ok((place, conditions))
}

/// Fetches readings for an already chosen place.
pub struct ConditionsFetcher<A> {
    api: Arc<A>,
}

impl<A: AirQualityApi> ConditionsFetcher<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self { api }
    }

    pub fn by_name(&self, city: &str, state: &str, country: &str) -> Result<(Place, Conditions)> {
        self.fetch(Endpoint::City {
            city: city.to_string(),
            state: state.to_string(),
            country: country.to_string(),
        })
    }

    /// Nearest station to the caller's IP address.
    pub fn nearest(&self) -> Result<(Place, Conditions)> {
        self.fetch(Endpoint::NearestCity(None))
    }

    pub fn nearest_to(&self, coords: Coordinates) -> Result<(Place, Conditions)> {
        self.fetch(Endpoint::NearestCity(Some(coords)))
    }

    fn fetch(&self, endpoint: Endpoint) -> Result<(Place, Conditions)> {
        let stage = endpoint.stage();
        let data: CityData = self.api.fetch(&endpoint)?.into_data(stage)?;
        let (place, conditions) = split_city_data(data)?;
        debug!(
            place = %place.display_line(),
            tp = %conditions.temperature_celsius,
            aqi = %conditions.aqi,
            "conditions fetched"
        );
        Ok((place, conditions))
    }
}
