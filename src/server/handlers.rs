use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

use crate::error::AirwatchError;
use crate::location::{AirQualityApi, CatalogLevel, LocationMode, SelectionInput};
use crate::session::SessionState;

use super::state::AppState;
use super::static_files;

// ─── Error response ──────────────────────────────────────────────

#[derive(Serialize)]
struct ApiErrorBody {
    error: String,
    message: String,
    code: u16,
}

pub struct ApiError(StatusCode, AirwatchError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiErrorBody {
            error: self.1.to_string(),
            message: self.1.user_message(),
            code: self.0.as_u16(),
        };
        (self.0, Json(body)).into_response()
    }
}

impl From<AirwatchError> for ApiError {
    fn from(e: AirwatchError) -> Self {
        let status = match &e {
            AirwatchError::UpstreamUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            AirwatchError::NoDataForSelection { .. } => StatusCode::NOT_FOUND,
            AirwatchError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AirwatchError::Network(_) | AirwatchError::InvalidResponse(_) => StatusCode::BAD_GATEWAY,
            AirwatchError::Config(_) | AirwatchError::Io { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        ApiError(status, e)
    }
}

fn missing(param: &str) -> ApiError {
    ApiError(
        StatusCode::BAD_REQUEST,
        AirwatchError::InvalidInput(format!("missing '{}' parameter", param)),
    )
}

/// Run blocking pipeline work off the async executor.
async fn blocking<A, T, F>(state: Arc<AppState<A>>, f: F) -> Result<T, ApiError>
where
    A: AirQualityApi + 'static,
    T: Send + 'static,
    F: FnOnce(&AppState<A>) -> Result<T, ApiError> + Send + 'static,
{
    tokio::task::spawn_blocking(move || f(&*state))
        .await
        .map_err(|e| ApiError(StatusCode::INTERNAL_SERVER_ERROR, AirwatchError::Io { source: std::io::Error::other(e) }))?
}

// ─── Static page ─────────────────────────────────────────────────

pub async fn index() -> Html<&'static str> {
    Html(static_files::INDEX_HTML)
}

// ─── GET /api/countries, /api/states, /api/cities ────────────────

#[derive(Deserialize)]
pub struct CatalogQuery {
    pub country: Option<String>,
    pub state: Option<String>,
}

impl CatalogQuery {
    fn as_input(&self) -> SelectionInput {
        SelectionInput {
            country: self.country.clone(),
            state: self.state.clone(),
            ..Default::default()
        }
    }
}

pub async fn countries<A: AirQualityApi + 'static>(
    State(state): State<Arc<AppState<A>>>,
) -> Result<Json<CatalogLevel>, ApiError> {
    let level = blocking(state, |s| Ok(s.session().resolver().catalog().list_countries()?)).await?;
    Ok(Json(level))
}

pub async fn states<A: AirQualityApi + 'static>(
    State(state): State<Arc<AppState<A>>>,
    Query(params): Query<CatalogQuery>,
) -> Result<Json<CatalogLevel>, ApiError> {
    let input = params.as_input();
    let country = input.country().ok_or_else(|| missing("country"))?.to_string();
    let level = blocking(state, move |s| Ok(s.session().resolver().catalog().list_states(&country)?)).await?;
    Ok(Json(level))
}

pub async fn cities<A: AirQualityApi + 'static>(
    State(state): State<Arc<AppState<A>>>,
    Query(params): Query<CatalogQuery>,
) -> Result<Json<CatalogLevel>, ApiError> {
    let input = params.as_input();
    let country = input.country().ok_or_else(|| missing("country"))?.to_string();
    let st = input.state().ok_or_else(|| missing("state"))?.to_string();
    let level = blocking(state, move |s| {
        Ok(s.session().resolver().catalog().list_cities(&st, &country)?)
    })
    .await?;
    Ok(Json(level))
}

// ─── GET /api/conditions ─────────────────────────────────────────

#[derive(Deserialize)]
pub struct ConditionsQuery {
    pub mode: Option<String>,
    pub country: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub lat: Option<String>,
    pub lon: Option<String>,
}

pub async fn conditions<A: AirQualityApi + 'static>(
    State(state): State<Arc<AppState<A>>>,
    Query(params): Query<ConditionsQuery>,
) -> Result<Json<SessionState>, ApiError> {
    let start = Instant::now();

    let mode = match params.mode.as_deref().map(str::trim).filter(|m| !m.is_empty()) {
        Some(m) => Some(
            m.parse::<LocationMode>()
                .map_err(|e| ApiError(StatusCode::BAD_REQUEST, AirwatchError::InvalidInput(e)))?,
        ),
        None => None,
    };
    let input = SelectionInput {
        country: params.country,
        state: params.state,
        city: params.city,
        latitude: params.lat,
        longitude: params.lon,
    };

    let result = blocking(state, move |s| Ok(s.session().evaluate(mode, &input).clone())).await?;

    info!(
        mode = mode.map(|m| m.label()).unwrap_or("unset"),
        state = result.name(),
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "GET /api/conditions"
    );
    Ok(Json(result))
}
