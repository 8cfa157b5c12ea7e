//! In-memory `AirQualityApi` for tests. Records every call.

use serde_json::{json, Value};
use std::sync::Mutex;

use super::providers::{AirQualityApi, ApiEnvelope, Endpoint};
use super::types::Coordinates;
use crate::error::{AirwatchError, Result};

enum Reply {
    Json(Value),
    NetworkDown,
}

pub struct MockApi {
    replies: Vec<(Endpoint, Reply)>,
    calls: Mutex<Vec<Endpoint>>,
}

pub const MIAMI_BEACH: Coordinates = Coordinates {
    latitude: 25.793449,
    longitude: -80.139198,
};

pub fn city_payload(city: &str, state: &str, country: &str, lon: f64, lat: f64, tp: Value) -> Value {
    json!({
        "status": "success",
        "data": {
            "city": city, "state": state, "country": country,
            "location": { "type": "Point", "coordinates": [lon, lat] },
            "current": {
                "weather": { "ts": "2024-05-01T18:00:00.000Z", "tp": tp, "pr": 1016, "hu": 70, "ws": 3.6, "wd": 100, "ic": "01d" },
                "pollution": { "ts": "2024-05-01T17:00:00.000Z", "aqius": 30, "mainus": "p2", "aqicn": 10, "maincn": "p2" }
            }
        }
    })
}

impl MockApi {
    pub fn empty() -> Self {
        Self {
            replies: Vec::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// USA → {Florida, Texas} → {Miami} / {Houston}, plus nearest-city answers.
    pub fn usa_florida_miami() -> Self {
        Self::empty()
            .respond(
                Endpoint::Countries,
                json!({ "status": "success", "data": [{ "country": "Canada" }, { "country": "USA" }] }),
            )
            .respond(
                Endpoint::States { country: "USA".into() },
                json!({ "status": "success", "data": [{ "state": "Florida" }, { "state": "Texas" }] }),
            )
            .respond(
                Endpoint::Cities { state: "Florida".into(), country: "USA".into() },
                json!({ "status": "success", "data": [{ "city": "Miami" }, { "city": "Orlando" }] }),
            )
            .respond(
                Endpoint::Cities { state: "Texas".into(), country: "USA".into() },
                json!({ "status": "success", "data": [{ "city": "Houston" }] }),
            )
            .respond(
                Endpoint::City { city: "Miami".into(), state: "Florida".into(), country: "USA".into() },
                city_payload("Miami", "Florida", "USA", -80.1918, 25.7617, json!(25)),
            )
            .respond(
                Endpoint::NearestCity(None),
                city_payload("Orlando", "Florida", "USA", -81.3792, 28.5383, json!(27.5)),
            )
            .respond(
                Endpoint::NearestCity(Some(MIAMI_BEACH)),
                city_payload("Miami Beach", "Florida", "USA", -80.13, 25.79, json!(26.4)),
            )
    }

    /// Set (or replace) the reply for `endpoint`.
    pub fn respond(mut self, endpoint: Endpoint, body: Value) -> Self {
        self.replies.retain(|(e, _)| e != &endpoint);
        self.replies.push((endpoint, Reply::Json(body)));
        self
    }

    pub fn network_down(mut self, endpoint: Endpoint) -> Self {
        self.replies.retain(|(e, _)| e != &endpoint);
        self.replies.push((endpoint, Reply::NetworkDown));
        self
    }

    pub fn calls(&self) -> Vec<Endpoint> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, endpoint: &Endpoint) -> usize {
        self.calls.lock().unwrap().iter().filter(|e| *e == endpoint).count()
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl AirQualityApi for MockApi {
    fn fetch(&self, endpoint: &Endpoint) -> Result<ApiEnvelope> {
        self.calls.lock().unwrap().push(endpoint.clone());
        let reply = self.replies.iter().find(|(e, _)| e == endpoint).map(|(_, r)| r);
        let body = match reply {
            Some(Reply::Json(body)) => body.clone(),
            Some(Reply::NetworkDown) => {
                return Err(AirwatchError::Network("connection refused".into()));
            }
            None => json!({ "status": "fail", "data": { "message": "city_not_found" } }),
        };
        Ok(serde_json::from_value(body).expect("mock reply is a valid envelope"))
    }
}
