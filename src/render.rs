//! Plain-text rendering of a session state for the terminal.

use crate::error::Severity;
use crate::location::types::{Prompt, Report};
use crate::session::{Failure, SessionState};

pub fn render_state(state: &SessionState) -> String {
    match state {
        SessionState::Idle | SessionState::ModeSelected(_) => render_idle(),
        SessionState::CascadeInProgress(prompt) => render_prompt(prompt),
        SessionState::ConditionsReady(report) => render_report(report),
        SessionState::Failed(failure) => render_failure(failure),
    }
}

fn render_idle() -> String {
    "  Select a location...\n".to_string()
}

pub fn render_report(report: &Report) -> String {
    let mut out = String::new();
    out.push_str(&format!("  Location: {}\n\n", report.mode));
    out.push_str(&format!("  {}\n", report.heading));
    out.push_str("  ╔══════════════════════════════════════════════╗\n");
    for metric in report.conditions.metrics() {
        out.push_str(&format!("  ║ {:<18} {:<25} ║\n", metric.label, metric.value));
    }
    out.push_str("  ╚══════════════════════════════════════════════╝\n");

    let c = &report.conditions;
    if let Some(p) = &c.main_pollutant {
        out.push_str(&format!("  Main pollutant: {}\n", pollutant_name(p)));
    }
    if let Some(ts) = c.observed_at {
        out.push_str(&format!("  Observed: {}\n", ts.format("%Y-%m-%d %H:%M UTC")));
    }
    out.push_str(&format!("  Map: {}\n", report.map.openstreetmap_url()));
    out
}

pub fn render_prompt(prompt: &Prompt) -> String {
    let mut out = String::new();
    match prompt {
        Prompt::Coordinates { problem } => {
            out.push_str(&format!("  {}\n", prompt.title()));
            if let Some(problem) = problem {
                out.push_str(&format!("  ({})\n", problem));
            }
        }
        Prompt::Country { rejected, .. } | Prompt::State { rejected, .. } | Prompt::City { rejected, .. } => {
            if let Some(r) = rejected {
                out.push_str(&format!("  '{}' is not in the list.\n", r));
            }
            out.push_str(&format!("  {}:\n", prompt.title()));
            for option in prompt.options() {
                out.push_str(&format!("    {}\n", option));
            }
        }
    }
    out
}

pub fn render_failure(failure: &Failure) -> String {
    let tag = match failure.severity {
        Severity::Warning => "Warning",
        Severity::Error => "Error",
    };
    format!("  {}: {}\n", tag, failure.message)
}

/// AirVisual pollutant codes.
fn pollutant_name(code: &str) -> &str {
    match code {
        "p2" => "PM2.5",
        "p1" => "PM10",
        "o3" => "Ozone (O3)",
        "n2" => "Nitrogen dioxide (NO2)",
        "s2" => "Sulfur dioxide (SO2)",
        "co" => "Carbon monoxide (CO)",
        other => other,
    }
}
