//! airwatch — current weather and air quality for a place chosen by
//! country/state/city, by IP address, or by coordinates.

pub mod conditions;
pub mod config;
pub mod error;
pub mod location;
pub mod logging;
pub mod render;
pub mod server;
pub mod session;

pub use conditions::{celsius_to_fahrenheit, Conditions, ConditionsFetcher};
pub use config::Config;
pub use error::{AirwatchError, Result, Severity};
pub use session::{Session, SessionState};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
