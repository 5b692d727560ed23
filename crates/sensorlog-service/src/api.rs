//! REST API endpoints for the sensorlog service.
//!
//! This module provides the ingestion endpoint and the three query
//! endpoints over stored readings.
//!
//! # Concurrency and Lock Acquisition
//!
//! All async handlers that touch the database acquire `state.store`
//! (Mutex). The lock is held only for the duration of one query; request
//! validation happens before it is acquired.
//!
//! # Error Handling
//!
//! All endpoints return structured JSON errors via [`ApiError`]. Invalid
//! client input returns HTTP 400 and is never logged as a fault. Store
//! errors return HTTP 500 with a generic message; the underlying detail
//! goes to the log only, so storage internals never reach the caller.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::{error, info};

use sensorlog_store::{HistoryFilter, NewReading, SensorStats, StoredReading};

use crate::state::AppState;

/// Default number of readings returned when `limit` is absent or unusable.
const DEFAULT_LIMIT: u32 = 100;

/// Hard cap on `limit`; larger requests are clamped, not rejected.
const MAX_LIMIT: u32 = 1000;

/// Create the API router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        // Health
        .route("/api/health", get(health))
        // Ingestion
        .route("/api/sensor/data", post(ingest_reading))
        // Query endpoints
        .route("/api/sensor/readings", get(list_readings))
        .route("/api/sensor/latest", get(latest_readings))
        .route("/api/sensor/stats/{sensor_id}", get(sensor_stats))
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    /// Total number of stored readings.
    pub readings: u64,
}

/// Health check endpoint.
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let (status, readings) = {
        let store = state.store.lock().await;
        match store.count_readings(None) {
            Ok(count) => ("ok", count),
            Err(e) => {
                error!("health check query failed: {e}");
                ("degraded", 0)
            }
        }
    };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        timestamp: OffsetDateTime::now_utc(),
        readings,
    })
}

// ==========================================================================
// Ingestion
// ==========================================================================

/// Raw ingestion payload.
///
/// Fields deserialize loosely so that the boundary validation below, not
/// the JSON deserializer, decides what gets rejected and with what message.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestRequest {
    #[serde(default)]
    pub sensor_id: Option<String>,
    #[serde(default)]
    pub value: Option<serde_json::Value>,
    #[serde(default)]
    pub timestamp: Option<String>,
    /// Accepted but never persisted; reserved for richer sensor metadata.
    #[serde(default, rename = "type")]
    pub kind: Option<serde_json::Value>,
}

impl IngestRequest {
    /// Validate the payload into a reading the store will accept.
    fn validate(self) -> Result<NewReading, ApiError> {
        let sensor_id = match self.sensor_id {
            Some(s) if !s.is_empty() => s,
            _ => {
                return Err(ApiError::Validation(
                    "sensorId is required and must be non-empty".to_string(),
                ));
            }
        };

        // Tightened contract: only finite numbers are stored
        let value = match self.value.as_ref().and_then(serde_json::Value::as_f64) {
            Some(v) if v.is_finite() => v,
            _ => {
                return Err(ApiError::Validation(
                    "value is required and must be a finite number".to_string(),
                ));
            }
        };

        let timestamp = match self.timestamp {
            Some(t) if !t.is_empty() => t,
            _ => {
                return Err(ApiError::Validation(
                    "timestamp is required and must be non-empty".to_string(),
                ));
            }
        };

        Ok(NewReading {
            sensor_id,
            value,
            timestamp,
        })
    }
}

/// Ingestion response.
#[derive(Debug, Serialize)]
pub struct IngestResponse {
    pub success: bool,
    pub id: i64,
    pub message: String,
}

/// Ingest one reading.
///
/// The write is attempted at most once; a store failure is reported to the
/// caller without retry.
async fn ingest_reading(
    State(state): State<Arc<AppState>>,
    Json(request): Json<IngestRequest>,
) -> Result<(StatusCode, Json<IngestResponse>), ApiError> {
    let reading = request.validate()?;

    let id = {
        let store = state.store.lock().await;
        store.append(&reading)?
    };

    info!(
        "Reading received: {} = {} ({})",
        reading.sensor_id, reading.value, reading.timestamp
    );

    Ok((
        StatusCode::CREATED,
        Json(IngestResponse {
            success: true,
            id,
            message: "Reading stored".to_string(),
        }),
    ))
}

// ==========================================================================
// Query endpoints
// ==========================================================================

/// Query parameters for the readings endpoint.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingsParams {
    pub sensor_id: Option<String>,
    /// Raw string: an unusable value falls back to the default instead of
    /// failing the request.
    pub limit: Option<String>,
}

/// Resolve the effective row limit from the raw query parameter.
fn effective_limit(raw: Option<&str>) -> u32 {
    raw.and_then(|s| s.trim().parse::<u32>().ok())
        .unwrap_or(DEFAULT_LIMIT)
        .min(MAX_LIMIT)
}

/// Reading history, newest first.
async fn list_readings(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ReadingsParams>,
) -> Result<Json<Vec<StoredReading>>, ApiError> {
    let mut filter = HistoryFilter::new().limit(effective_limit(params.limit.as_deref()));
    // An empty sensorId means "all sensors", same as leaving it off
    if let Some(sensor_id) = params.sensor_id.as_deref().filter(|s| !s.is_empty()) {
        filter = filter.sensor(sensor_id);
    }

    let store = state.store.lock().await;
    let readings = store.query_history(&filter)?;
    Ok(Json(readings))
}

/// Most recent reading per sensor, ordered by sensor id.
async fn latest_readings(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<StoredReading>>, ApiError> {
    let store = state.store.lock().await;
    let readings = store.latest_per_sensor()?;
    Ok(Json(readings))
}

/// Aggregate statistics for one sensor.
async fn sensor_stats(
    State(state): State<Arc<AppState>>,
    Path(sensor_id): Path<String>,
) -> Result<Json<SensorStats>, ApiError> {
    if sensor_id.trim().is_empty() {
        return Err(ApiError::Validation(
            "sensorId path parameter is required".to_string(),
        ));
    }

    let store = state.store.lock().await;
    let stats = store.stats(&sensor_id)?;
    Ok(Json(stats))
}

// ==========================================================================
// Errors
// ==========================================================================

/// Application error type.
#[derive(Debug)]
pub enum ApiError {
    /// Client-supplied data violates the required-field contract.
    Validation(String),
    /// The persistence layer could not complete an operation.
    Storage(sensorlog_store::Error),
}

impl From<sensorlog_store::Error> for ApiError {
    fn from(e: sensorlog_store::Error) -> Self {
        ApiError::Storage(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Storage(e) => {
                // Detail stays in the log; the caller gets an opaque message
                error!("storage operation failed: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "storage error".to_string(),
                )
            }
        };

        let body = serde_json::json!({
            "error": message,
        });

        (status, Json(body)).into_response()
    }
}
