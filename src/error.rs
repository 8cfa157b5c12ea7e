//! Error types for airwatch.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

use crate::location::types::CatalogKind;

/// Which kind of fetch produced an upstream failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchStage {
    Catalog(CatalogKind),
    Conditions,
}

impl fmt::Display for FetchStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Catalog(kind) => write!(f, "{} list", kind),
            Self::Conditions => write!(f, "conditions"),
        }
    }
}

/// How a failure must be presented: a warning lets the user pick again,
/// an error blocks the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Warning,
    Error,
}

#[derive(Error, Debug)]
pub enum AirwatchError {
    /// The API answered with a status other than `"success"`.
    #[error("{stage} request failed with status '{status}': {message}")]
    UpstreamUnavailable {
        stage: FetchStage,
        status: String,
        message: String,
    },

    /// The API answered successfully but listed nothing below `parent`.
    #[error("no {level} entries for '{parent}'")]
    NoDataForSelection { level: CatalogKind, parent: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl AirwatchError {
    pub fn severity(&self) -> Severity {
        match self {
            Self::NoDataForSelection { .. } | Self::InvalidInput(_) => Severity::Warning,
            _ => Severity::Error,
        }
    }

    /// The message shown to the user in place of the metrics.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::UpstreamUnavailable { stage: FetchStage::Catalog(_), .. } => {
                "Too many requests. Wait for a few minutes before your next API call.".to_string()
            }
            Self::UpstreamUnavailable { stage: FetchStage::Conditions, .. } => {
                "No data available for this location.".to_string()
            }
            Self::NoDataForSelection { level, .. } => match level.parent() {
                Some(parent) => format!("No stations available, please select another {}.", parent),
                None => "No stations available.".to_string(),
            },
            Self::InvalidInput(msg) => format!("Invalid input: {}", msg),
            Self::Network(_) => {
                "Unable to reach the air quality service. Please check your internet connection."
                    .to_string()
            }
            Self::InvalidResponse(_) => "The air quality service sent an unexpected response.".to_string(),
            Self::Config(msg) => format!("Configuration error: {}", msg),
            Self::Io { source } => format!("File operation failed: {}", source),
        }
    }
}

pub type Result<T> = std::result::Result<T, AirwatchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity() {
        let warn = AirwatchError::NoDataForSelection {
            level: CatalogKind::State,
            parent: "Atlantis".into(),
        };
        assert_eq!(warn.severity(), Severity::Warning);

        let err = AirwatchError::UpstreamUnavailable {
            stage: FetchStage::Catalog(CatalogKind::Country),
            status: "fail".into(),
            message: "call_limit_reached".into(),
        };
        assert_eq!(err.severity(), Severity::Error);
        assert_eq!(AirwatchError::Network("timeout".into()).severity(), Severity::Error);
    }

    #[test]
    fn test_user_messages() {
        let catalog = AirwatchError::UpstreamUnavailable {
            stage: FetchStage::Catalog(CatalogKind::City),
            status: "fail".into(),
            message: "call_limit_reached".into(),
        };
        assert!(catalog.user_message().starts_with("Too many requests"));

        let conditions = AirwatchError::UpstreamUnavailable {
            stage: FetchStage::Conditions,
            status: "fail".into(),
            message: "city_not_found".into(),
        };
        assert_eq!(conditions.user_message(), "No data available for this location.");

        let no_states = AirwatchError::NoDataForSelection {
            level: CatalogKind::State,
            parent: "Atlantis".into(),
        };
        assert_eq!(no_states.user_message(), "No stations available, please select another country.");

        let no_cities = AirwatchError::NoDataForSelection {
            level: CatalogKind::City,
            parent: "Nowhere".into(),
        };
        assert_eq!(no_cities.user_message(), "No stations available, please select another state.");
    }

    #[test]
    fn test_display_includes_upstream_detail() {
        let err = AirwatchError::UpstreamUnavailable {
            stage: FetchStage::Catalog(CatalogKind::Country),
            status: "fail".into(),
            message: "call_limit_reached".into(),
        };
        let text = err.to_string();
        assert!(text.contains("country list"));
        assert!(text.contains("call_limit_reached"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: AirwatchError = io_err.into();
        assert!(matches!(err, AirwatchError::Io { .. }));
    }
}
