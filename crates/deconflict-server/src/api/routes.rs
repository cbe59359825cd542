//! REST API routes.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use deconflict_core::{ConflictReport, DetectionStrategy, MissionError, MissionPlot, Scenario};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

use crate::state::{AppState, StatsSnapshot};

type ApiError = (StatusCode, Json<Value>);

/// Create the API router.
pub fn create_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/v1/rules", get(get_rules))
        .route("/v1/stats", get(get_stats))
        .route("/v1/conflicts/check", post(check_conflicts))
        .route("/v1/conflicts/plot", post(plot_conflicts))
}

/// Optional per-request overrides.
#[derive(Debug, Default, Deserialize)]
pub struct DetectQuery {
    pub strategy: Option<DetectionStrategy>,
}

async fn get_rules(State(state): State<Arc<AppState>>) -> Json<Value> {
    let detector = state.detector();
    Json(serde_json::json!({
        "rules": detector.rules,
        "strategy": detector.strategy,
    }))
}

async fn get_stats(State(state): State<Arc<AppState>>) -> Json<StatsSnapshot> {
    Json(state.stats())
}

/// Check the primary mission in the posted scenario.
async fn check_conflicts(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DetectQuery>,
    Json(scenario): Json<Scenario>,
) -> Result<Json<Value>, ApiError> {
    scenario.validate().map_err(|err| mission_error(&err))?;

    let detector = state.detector_for(scenario.rules.as_ref(), query.strategy);
    let report = ConflictReport::run(&detector, &scenario.primary, &scenario.others);
    state.record_check(report.conflicts.len());

    if !report.is_clear() {
        tracing::info!(
            primary = %scenario.primary.drone_id,
            strategy = %detector.strategy,
            "Detected {} conflict(s)",
            report.conflicts.len()
        );
    }

    // The report borrows from the request body.
    let body = serde_json::to_value(&report).map_err(internal_error)?;
    Ok(Json(body))
}

/// Lay out the posted scenario and its conflicts for 3-D display.
async fn plot_conflicts(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DetectQuery>,
    Json(scenario): Json<Scenario>,
) -> Result<Json<MissionPlot>, ApiError> {
    scenario.validate().map_err(|err| mission_error(&err))?;

    let detector = state.detector_for(scenario.rules.as_ref(), query.strategy);
    let conflicts = detector.detect(&scenario.primary, &scenario.others);
    state.record_check(conflicts.len());

    let plot = MissionPlot::build(&scenario.primary, &scenario.others, &conflicts);
    if plot.skipped_conflicts > 0 {
        tracing::warn!(
            primary = %scenario.primary.drone_id,
            "{} conflict(s) had no primary waypoint to mark",
            plot.skipped_conflicts
        );
    }
    Ok(Json(plot))
}

fn mission_error(err: &MissionError) -> ApiError {
    tracing::debug!("Rejected scenario: {}", err);
    bad_request(&err.to_string(), err.field())
}

fn bad_request(message: &str, field: Option<&str>) -> ApiError {
    let mut payload = serde_json::json!({ "error": message });
    if let Some(field) = field {
        payload["field"] = Value::String(field.to_string());
    }
    (StatusCode::BAD_REQUEST, Json(payload))
}

fn internal_error(err: serde_json::Error) -> ApiError {
    tracing::error!("Failed to serialize report: {}", err);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({ "error": "Failed to serialize report" })),
    )
}
