//! Per-session state machine.
//!
//! `Idle → ModeSelected → [CascadeInProgress]* → ConditionsReady | Failed`
//!
//! Each interaction re-runs the whole pipeline from the top. Only the
//! catalog cache survives between interactions.

use serde::Serialize;
use tracing::{debug, info};

use crate::error::{AirwatchError, Severity};
use crate::location::providers::AirQualityApi;
use crate::location::resolver::{LocationResolver, Resolution};
use crate::location::types::{LocationMode, Prompt, Report, SelectionInput};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    UpstreamUnavailable,
    NoDataForSelection,
    Transport,
    InvalidResponse,
    InvalidInput,
}

/// A terminal failure, ready to show.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Failure {
    pub reason: FailureReason,
    pub severity: Severity,
    pub message: String,
    pub detail: String,
}

impl From<AirwatchError> for Failure {
    fn from(e: AirwatchError) -> Self {
        let reason = match &e {
            AirwatchError::UpstreamUnavailable { .. } => FailureReason::UpstreamUnavailable,
            AirwatchError::NoDataForSelection { .. } => FailureReason::NoDataForSelection,
            AirwatchError::InvalidInput(_) => FailureReason::InvalidInput,
            AirwatchError::InvalidResponse(_) => FailureReason::InvalidResponse,
            AirwatchError::Network(_) | AirwatchError::Config(_) | AirwatchError::Io { .. } => {
                FailureReason::Transport
            }
        };
        Self {
            reason,
            severity: e.severity(),
            message: e.user_message(),
            detail: e.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum SessionState {
    Idle,
    ModeSelected(LocationMode),
    CascadeInProgress(Prompt),
    ConditionsReady(Box<Report>),
    Failed(Failure),
}

impl SessionState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::ModeSelected(_) => "mode_selected",
            Self::CascadeInProgress(_) => "cascade_in_progress",
            Self::ConditionsReady(_) => "conditions_ready",
            Self::Failed(_) => "failed",
        }
    }
}

pub struct Session<A> {
    resolver: LocationResolver<A>,
    state: SessionState,
}

impl<A: AirQualityApi> Session<A> {
    pub fn new(resolver: LocationResolver<A>) -> Self {
        Self {
            resolver,
            state: SessionState::Idle,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn resolver(&mut self) -> &mut LocationResolver<A> {
        &mut self.resolver
    }

    /// Re-evaluate the pipeline for the current mode and input.
    pub fn evaluate(&mut self, mode: Option<LocationMode>, input: &SelectionInput) -> &SessionState {
        self.transition(SessionState::Idle);

        if let Some(mode) = mode {
            self.transition(SessionState::ModeSelected(mode));
            let next = match self.resolver.resolve(mode, input) {
                Ok(Resolution::Ready(report)) => SessionState::ConditionsReady(Box::new(report)),
                Ok(Resolution::Pending(prompt)) => SessionState::CascadeInProgress(prompt),
                Err(e) => SessionState::Failed(Failure::from(e)),
            };
            self.transition(next);
        }

        if let SessionState::ConditionsReady(report) = &self.state {
            info!(place = %report.place.display_line(), aqi = %report.conditions.aqi, "conditions ready");
        }
        &self.state
    }

    fn transition(&mut self, next: SessionState) {
        debug!(from = self.state.name(), to = next.name(), "session transition");
        self.state = next;
    }
}
