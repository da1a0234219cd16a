//! HTTP request handlers for the dashboard API.

use super::AppState;
use super::response::ApiError;
use crate::constants::{
    CSV_CONTENT_TYPE, GEOJSON_CONTENT_TYPE, SCENARIOS, TIMESERIES_NOT_FOUND_MESSAGE, VARIABLES,
    YEARS,
};
use crate::error::ServiceError;
use crate::models::{DatasetKey, SeriesKey};
use axum::Json;
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use tracing::{info, warn};

/// Static subcatchment boundaries, served as stored
pub async fn subcatchments_handler(State(state): State<AppState>) -> Result<Response, ApiError> {
    info!("Received request for GeoJSON file");
    match state.service.subcatchments().await {
        Ok(bytes) => Ok(([(header::CONTENT_TYPE, GEOJSON_CONTENT_TYPE)], bytes).into_response()),
        Err(ServiceError::GeometryNotFound { path }) => {
            warn!("Subcatchment geometry missing: {}", path.display());
            Ok((StatusCode::NOT_FOUND, "Not Found").into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// SC_ID → value mapping for one scenario, variable and year
pub async fn mapdata_handler(
    State(state): State<AppState>,
    Path((scenario, variable, year)): Path<(String, String, String)>,
) -> Result<Response, ApiError> {
    info!(
        "Received request for: Scenario = {}, Variable = {}, Year = {}",
        scenario, variable, year
    );
    let not_found = || {
        ApiError::not_found(format!(
            "Map data for {}, {}, {} not found",
            variable, scenario, year
        ))
    };

    let Ok(key) = DatasetKey::new(&scenario, &variable, &year) else {
        return Err(not_found());
    };

    let dataset = state.service.map_data(key).await?;
    if dataset.is_empty() {
        return Err(not_found());
    }
    Ok(Json(dataset.as_ref()).into_response())
}

/// Year geometry with `{variable}_{year}` attached to every feature
pub async fn vector_handler(
    State(state): State<AppState>,
    Path((scenario, variable, year)): Path<(String, String, String)>,
) -> Result<Response, ApiError> {
    info!(
        "Received vector request: Scenario = {}, Variable = {}, Year = {}",
        scenario, variable, year
    );
    let key = DatasetKey::new(scenario, variable, year)?;
    let document = state.service.joined_geometry(key).await?;
    Ok(Json(document).into_response())
}

/// Raw time series CSV for one subcatchment
pub async fn timeseries_handler(
    State(state): State<AppState>,
    Path((scenario, variable, sc_id)): Path<(String, String, String)>,
) -> Result<Response, ApiError> {
    let key = SeriesKey::new(scenario, variable, sc_id)
        .map_err(|_| ApiError::not_found(TIMESERIES_NOT_FOUND_MESSAGE))?;

    match state.service.time_series(key).await {
        Ok(bytes) => Ok(([(header::CONTENT_TYPE, CSV_CONTENT_TYPE)], bytes).into_response()),
        Err(ServiceError::TimeSeriesNotFound { path }) => {
            warn!("Time series not found: {}", path.display());
            Err(ApiError::not_found(TIMESERIES_NOT_FOUND_MESSAGE))
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn years_handler() -> Json<&'static [&'static str]> {
    Json(YEARS)
}

pub async fn variables_handler() -> Json<&'static [&'static str]> {
    Json(VARIABLES)
}

pub async fn scenarios_handler() -> Json<&'static [&'static str]> {
    Json(SCENARIOS)
}
