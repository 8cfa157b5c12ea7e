//! AirVisual v2 provider: endpoints, wire format, and the HTTP client.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, trace};

use super::types::{CatalogKind, Coordinates};
use crate::config::Config;
use crate::error::{AirwatchError, FetchStage, Result};

pub const SUCCESS: &str = "success";

// ─── Endpoints ──────────────────────────────────────────────────

/// One remote call. Parameters are part of the value so that identical
/// calls compare equal.
#[derive(Debug, Clone, PartialEq)]
pub enum Endpoint {
    Countries,
    States { country: String },
    Cities { state: String, country: String },
    City { city: String, state: String, country: String },
    NearestCity(Option<Coordinates>),
}

impl Endpoint {
    pub fn path(&self) -> &'static str {
        match self {
            Self::Countries => "countries",
            Self::States { .. } => "states",
            Self::Cities { .. } => "cities",
            Self::City { .. } => "city",
            Self::NearestCity(_) => "nearest_city",
        }
    }

    /// Query parameters, excluding the API key.
    pub fn query(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::Countries => vec![],
            Self::States { country } => vec![("country", country.clone())],
            Self::Cities { state, country } => {
                vec![("state", state.clone()), ("country", country.clone())]
            }
            Self::City { city, state, country } => vec![
                ("city", city.clone()),
                ("state", state.clone()),
                ("country", country.clone()),
            ],
            Self::NearestCity(None) => vec![],
            Self::NearestCity(Some(c)) => vec![
                ("lat", c.latitude.to_string()),
                ("lon", c.longitude.to_string()),
            ],
        }
    }

    pub fn stage(&self) -> FetchStage {
        match self {
            Self::Countries => FetchStage::Catalog(CatalogKind::Country),
            Self::States { .. } => FetchStage::Catalog(CatalogKind::State),
            Self::Cities { .. } => FetchStage::Catalog(CatalogKind::City),
            Self::City { .. } | Self::NearestCity(_) => FetchStage::Conditions,
        }
    }
}

// ─── Wire format ────────────────────────────────────────────────

/// The `{ "status": ..., "data": ... }` wrapper every endpoint returns.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope {
    pub status: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

impl ApiEnvelope {
    pub fn is_success(&self) -> bool {
        self.status == SUCCESS
    }

    /// Decode `data` if the status is `"success"`, otherwise report the
    /// upstream failure for `stage`.
    pub fn into_data<T: DeserializeOwned>(self, stage: FetchStage) -> Result<T> {
        if !self.is_success() {
            let message = self
                .data
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or("no message")
                .to_string();
            return Err(AirwatchError::UpstreamUnavailable {
                stage,
                status: self.status,
                message,
            });
        }
        serde_json::from_value(self.data)
            .map_err(|e| AirwatchError::InvalidResponse(format!("{} data: {}", stage, e)))
    }
}

#[derive(Debug, Deserialize)]
pub struct CountryEntry {
    pub country: String,
}

#[derive(Debug, Deserialize)]
pub struct StateEntry {
    pub state: String,
}

#[derive(Debug, Deserialize)]
pub struct CityEntry {
    pub city: String,
}

/// `data` of `/city` and `/nearest_city`.
#[derive(Debug, Clone, Deserialize)]
pub struct CityData {
    pub city: String,
    pub state: String,
    pub country: String,
    pub location: GeoPoint,
    pub current: CurrentReadings,
}

/// GeoJSON point; `coordinates` is `[longitude, latitude]`.
#[derive(Debug, Clone, Deserialize)]
pub struct GeoPoint {
    pub coordinates: Vec<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CurrentReadings {
    pub weather: WeatherReading,
    pub pollution: PollutionReading,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeatherReading {
    #[serde(default)]
    pub ts: Option<String>,
    /// Temperature, °C.
    pub tp: serde_json::Number,
    /// Humidity, %.
    pub hu: serde_json::Number,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PollutionReading {
    #[serde(default)]
    pub ts: Option<String>,
    /// US AQI.
    pub aqius: serde_json::Number,
    #[serde(default)]
    pub mainus: Option<String>,
}

// ─── Transport seam ─────────────────────────────────────────────

/// Access to the remote air quality service.
///
/// Implementations return the decoded envelope whatever its status;
/// classifying the status is the caller's job.
pub trait AirQualityApi: Send + Sync {
    fn fetch(&self, endpoint: &Endpoint) -> Result<ApiEnvelope>;
}

// ─── HTTP client ────────────────────────────────────────────────

/// Blocking AirVisual client.
pub struct AirVisualClient {
    agent: ureq::Agent,
    base_url: String,
    api_key: String,
}

impl AirVisualClient {
    pub fn new(config: &Config) -> Self {
        let mut builder = ureq::AgentBuilder::new().user_agent(&config.user_agent);
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        Self {
            agent: builder.build(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }

    pub fn url(&self, endpoint: &Endpoint) -> String {
        format!("{}/{}", self.base_url, endpoint.path())
    }
}

impl AirQualityApi for AirVisualClient {
    fn fetch(&self, endpoint: &Endpoint) -> Result<ApiEnvelope> {
        let url = self.url(endpoint);
        debug!(endpoint = endpoint.path(), query = ?endpoint.query(), "GET {}", url);

        let mut request = self.agent.get(&url);
        for (name, value) in endpoint.query() {
            request = request.query(name, &value);
        }
        request = request.query("key", &self.api_key);

        let response = match request.call() {
            Ok(r) => r,
            // Rate limiting and bad parameters come back as 4xx with a
            // normal envelope in the body.
            Err(ureq::Error::Status(code, r)) => {
                trace!(code, "non-2xx response, decoding envelope");
                r
            }
            Err(e) => return Err(AirwatchError::Network(e.to_string())),
        };

        let envelope: ApiEnvelope = response
            .into_json()
            .map_err(|e| AirwatchError::InvalidResponse(e.to_string()))?;
        trace!(status = %envelope.status, "{} answered", endpoint.path());
        Ok(envelope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn envelope(value: serde_json::Value) -> ApiEnvelope {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_endpoint_query() {
        let e = Endpoint::Cities { state: "Florida".into(), country: "USA".into() };
        assert_eq!(e.path(), "cities");
        assert_eq!(e.query(), vec![("state", "Florida".to_string()), ("country", "USA".to_string())]);

        let nearest = Endpoint::NearestCity(Some(Coordinates { latitude: 25.793449, longitude: -80.139198 }));
        assert_eq!(
            nearest.query(),
            vec![("lat", "25.793449".to_string()), ("lon", "-80.139198".to_string())]
        );
        assert!(Endpoint::NearestCity(None).query().is_empty());
    }

    #[test]
    fn test_endpoint_stage() {
        assert_eq!(Endpoint::Countries.stage(), FetchStage::Catalog(CatalogKind::Country));
        assert_eq!(Endpoint::NearestCity(None).stage(), FetchStage::Conditions);
    }

    #[test]
    fn test_envelope_success() {
        let env = envelope(json!({ "status": "success", "data": [{ "country": "USA" }] }));
        let entries: Vec<CountryEntry> = env.into_data(Endpoint::Countries.stage()).unwrap();
        assert_eq!(entries[0].country, "USA");
    }

    #[test]
    fn test_envelope_failure_keeps_message() {
        let env = envelope(json!({ "status": "fail", "data": { "message": "call_limit_reached" } }));
        let err = env.into_data::<Vec<CountryEntry>>(Endpoint::Countries.stage()).unwrap_err();
        match err {
            AirwatchError::UpstreamUnavailable { status, message, .. } => {
                assert_eq!(status, "fail");
                assert_eq!(message, "call_limit_reached");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_envelope_failure_ignores_data() {
        // A populated list does not rescue a non-success status
        let env = envelope(json!({ "status": "fail", "data": [{ "country": "USA" }] }));
        assert!(env.into_data::<Vec<CountryEntry>>(Endpoint::Countries.stage()).is_err());
    }

    #[test]
    fn test_envelope_bad_shape() {
        let env = envelope(json!({ "status": "success", "data": { "unexpected": true } }));
        let err = env.into_data::<Vec<CountryEntry>>(Endpoint::Countries.stage()).unwrap_err();
        assert!(matches!(err, AirwatchError::InvalidResponse(_)));
    }

    #[test]
    fn test_city_data_decodes() {
        let env = envelope(json!({
            "status": "success",
            "data": {
                "city": "Miami", "state": "Florida", "country": "USA",
                "location": { "type": "Point", "coordinates": [-80.1918, 25.7617] },
                "current": {
                    "weather": { "ts": "2024-05-01T18:00:00.000Z", "tp": 25, "pr": 1016, "hu": 70, "ws": 3.6, "wd": 100, "ic": "01d" },
                    "pollution": { "ts": "2024-05-01T18:00:00.000Z", "aqius": 30, "mainus": "p2", "aqicn": 10, "maincn": "p2" }
                }
            }
        }));
        let data: CityData = env.into_data(FetchStage::Conditions).unwrap();
        assert_eq!(data.city, "Miami");
        assert_eq!(data.location.coordinates, vec![-80.1918, 25.7617]);
        assert_eq!(data.current.weather.tp.to_string(), "25");
        assert_eq!(data.current.pollution.mainus.as_deref(), Some("p2"));
    }

    #[test]
    fn test_client_url() {
        let config = Config {
            api_key: "k".into(),
            base_url: "https://api.airvisual.com/v2/".into(),
            ..Config::default()
        };
        let client = AirVisualClient::new(&config);
        assert_eq!(client.url(&Endpoint::Countries), "https://api.airvisual.com/v2/countries");
    }
}
