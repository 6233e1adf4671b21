// GET handlers for the dashboard API

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

use super::AppState;
use crate::error::ApiError;
use crate::models::{
    DiskReport, HealthReport, HistoryEntry, MetricsResponse, NetworkReport, ProcessEntry,
    SystemReport, ThermalReport, epoch_seconds,
};
use crate::version::{SERVICE, VERSION};

pub(super) const DEFAULT_PROCESS_LIMIT: i64 = 10;
pub(super) const MAX_PROCESS_LIMIT: i64 = 50;

/// GET /api/health
pub(super) async fn health_handler() -> Json<HealthReport> {
    Json(HealthReport {
        status: "ok".into(),
        service: SERVICE.into(),
        version: VERSION.into(),
        timestamp: epoch_seconds(),
    })
}

/// GET /api/system: cached board identity plus host name and kernel.
pub(super) async fn system_handler(
    State(state): State<AppState>,
) -> Result<Json<SystemReport>, ApiError> {
    Ok(Json(state.aggregator.system_report().await?))
}

/// GET /api/metrics: one poll; also appended to the history.
pub(super) async fn metrics_handler(
    State(state): State<AppState>,
) -> Result<Json<MetricsResponse>, ApiError> {
    let snapshot = state.aggregator.poll().await?;
    Ok(Json(MetricsResponse::from(&snapshot)))
}

/// GET /api/metrics/history: oldest first.
pub(super) async fn history_handler(State(state): State<AppState>) -> Json<Vec<HistoryEntry>> {
    Json(state.aggregator.history())
}

#[derive(Debug, Deserialize)]
pub(super) struct ProcessesQuery {
    limit: Option<String>,
}

/// Unparsable limits fall back to the default; the result is clamped to [1, 50].
pub(super) fn process_limit(raw: Option<&str>) -> usize {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .unwrap_or(DEFAULT_PROCESS_LIMIT)
        .clamp(1, MAX_PROCESS_LIMIT) as usize
}

/// GET /api/processes?limit=N
pub(super) async fn processes_handler(
    State(state): State<AppState>,
    Query(query): Query<ProcessesQuery>,
) -> Result<Json<Vec<ProcessEntry>>, ApiError> {
    let limit = process_limit(query.limit.as_deref());
    Ok(Json(state.aggregator.top_processes(limit).await?))
}

/// GET /api/network
pub(super) async fn network_handler(
    State(state): State<AppState>,
) -> Result<Json<NetworkReport>, ApiError> {
    Ok(Json(state.aggregator.network_report().await?))
}

/// GET /api/thermal
pub(super) async fn thermal_handler(
    State(state): State<AppState>,
) -> Result<Json<ThermalReport>, ApiError> {
    Ok(Json(state.aggregator.thermal().await?))
}

#[derive(Debug, Deserialize)]
pub(super) struct DiskQuery {
    path: Option<String>,
}

/// GET /api/disk?path=/
pub(super) async fn disk_handler(
    State(state): State<AppState>,
    Query(query): Query<DiskQuery>,
) -> Result<Json<DiskReport>, ApiError> {
    let path = query.path.unwrap_or_else(|| "/".into());
    state
        .aggregator
        .disk_report(&path)
        .await?
        .map(Json)
        .ok_or(ApiError::DiskUnavailable)
}

pub(super) async fn not_found_handler() -> ApiError {
    ApiError::NotFound
}
