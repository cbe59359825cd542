use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use deconflict_core::{ConflictDetector, DetectionStrategy};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use crate::{api, config::Config, state::AppState};

fn setup_app() -> (axum::Router, Arc<AppState>) {
    let state = Arc::new(AppState::new(&Config::default()));
    let app = api::routes().with_state(state.clone());
    (app, state)
}

async fn read_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("parse json")
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn reference_scenario() -> Value {
    json!({
        "primary": {
            "drone_id": "DroneA",
            "waypoints": [
                {"x": 0, "y": 0, "z": 0, "time": 0},
                {"x": 10, "y": 10, "z": 5, "time": 5},
                {"x": 20, "y": 20, "z": 10, "time": 10}
            ]
        },
        "others": [
            {"drone_id": "DroneB", "waypoints": [
                {"x": 5, "y": 5, "z": 2, "time": 5},
                {"x": 15, "y": 15, "z": 7, "time": 10}
            ]},
            {"drone_id": "DroneC", "waypoints": [
                {"x": 25, "y": 25, "z": 12, "time": 10}
            ]}
        ]
    })
}

/// P and Q share the origin at t=0; Q's second waypoint is far away.
fn shared_origin_scenario() -> Value {
    json!({
        "primary": {"drone_id": "P", "waypoints": [
            {"x": 0, "y": 0, "z": 0, "time": 0},
            {"x": 50, "y": 0, "z": 0, "time": 10}
        ]},
        "others": [
            {"drone_id": "Q", "waypoints": [
                {"x": 0, "y": 0, "z": 0, "time": 0},
                {"x": 100, "y": 0, "z": 0, "time": 0.5}
            ]}
        ]
    })
}

#[tokio::test]
async fn health_reports_ok() {
    let (app, _state) = setup_app();
    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"OK");
}

#[tokio::test]
async fn rules_endpoint_returns_configured_defaults() {
    let (app, _state) = setup_app();
    let response = app.oneshot(get("/v1/rules")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    assert_eq!(body["rules"]["safe_distance"], json!(5.0));
    assert_eq!(body["rules"]["time_window"], json!(1.0));
    assert_eq!(body["strategy"], "brute-force");
}

#[tokio::test]
async fn reference_scenario_is_clear() {
    let (app, _state) = setup_app();
    let response = app
        .oneshot(post_json("/v1/conflicts/check", &reference_scenario()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    assert_eq!(body["primary_id"], "DroneA");
    assert_eq!(body["status"], "clear");
    assert_eq!(body["conflicts"], json!([]));
    assert_eq!(body["pairs_examined"], 9);
}

#[tokio::test]
async fn shared_position_is_reported_once() {
    let (app, _state) = setup_app();
    let response = app
        .oneshot(post_json("/v1/conflicts/check", &shared_origin_scenario()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    assert_eq!(body["status"], "conflicted");
    assert_eq!(body["conflicts"], json!([{"drone_id": "Q", "time": 0.0}]));
    assert_eq!(body["by_drone"], json!([{"drone_id": "Q", "conflicts": 1}]));
}

#[tokio::test]
async fn strategy_query_overrides_configured_strategy() {
    let (app, _state) = setup_app();
    let response = app
        .oneshot(post_json(
            "/v1/conflicts/check?strategy=grid",
            &shared_origin_scenario(),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    assert_eq!(body["strategy"], "grid");
    assert_eq!(body["conflicts"], json!([{"drone_id": "Q", "time": 0.0}]));
}

#[tokio::test]
async fn unknown_strategy_is_rejected() {
    let (app, _state) = setup_app();
    let response = app
        .oneshot(post_json(
            "/v1/conflicts/check?strategy=octree",
            &shared_origin_scenario(),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn rules_in_body_override_defaults() {
    let (app, _state) = setup_app();
    let mut scenario = reference_scenario();
    // DroneC sits ~7.35 m from DroneA's last waypoint; DroneB stays ~7.68 m away.
    scenario["rules"] = json!({"safe_distance": 7.5, "time_window": 1.0});

    let response = app
        .oneshot(post_json("/v1/conflicts/check", &scenario))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    assert_eq!(body["rules"]["safe_distance"], json!(7.5));
    assert_eq!(body["conflicts"], json!([{"drone_id": "DroneC", "time": 10.0}]));
}

#[tokio::test]
async fn non_positive_safe_distance_is_rejected() {
    let (app, _state) = setup_app();
    let mut scenario = shared_origin_scenario();
    scenario["rules"] = json!({"safe_distance": 0.0});

    let response = app
        .oneshot(post_json("/v1/conflicts/check", &scenario))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = read_json(response).await;
    assert_eq!(body["field"], "safe_distance");
}

#[tokio::test]
async fn duplicate_drone_ids_are_rejected() {
    let (app, _state) = setup_app();
    let mut scenario = shared_origin_scenario();
    scenario["others"][0]["drone_id"] = json!("P");

    let response = app
        .oneshot(post_json("/v1/conflicts/check", &scenario))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = read_json(response).await;
    assert_eq!(body["field"], "drone_id");
    assert!(body["error"].as_str().unwrap().contains("'P'"));
}

#[tokio::test]
async fn waypoint_missing_coordinate_is_unprocessable() {
    let (app, _state) = setup_app();
    let scenario = json!({
        "primary": {"drone_id": "P", "waypoints": [{"x": 0, "y": 0, "time": 0}]}
    });

    let response = app
        .oneshot(post_json("/v1/conflicts/check", &scenario))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn plot_marks_conflict_on_primary_waypoint() {
    let (app, _state) = setup_app();
    let response = app
        .oneshot(post_json("/v1/conflicts/plot", &shared_origin_scenario()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    assert_eq!(body["title"], "UAV Mission Trajectories");
    assert_eq!(body["tracks"].as_array().unwrap().len(), 2);
    assert_eq!(body["tracks"][0]["label"], "Primary: P");
    assert_eq!(body["tracks"][1]["line_style"], "dashed");

    let markers = body["markers"].as_array().unwrap();
    assert_eq!(markers.len(), 1);
    assert_eq!(markers[0]["position"], json!([0.0, 0.0, 0.0]));
    assert_eq!(markers[0]["label"], "Conflict at t=0.0s");
    assert_eq!(body["skipped_conflicts"], 0);
}

#[tokio::test]
async fn stats_count_completed_checks() {
    let (app, state) = setup_app();

    let first = app
        .clone()
        .oneshot(post_json("/v1/conflicts/check", &reference_scenario()))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::OK);
    let second = app
        .clone()
        .oneshot(post_json("/v1/conflicts/check", &shared_origin_scenario()))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::OK);

    let response = app.oneshot(get("/v1/stats")).await.unwrap();
    let body = read_json(response).await;
    assert_eq!(body["checks_run"], 2);
    assert_eq!(body["conflicts_found"], 1);
    assert_eq!(state.stats().checks_run, 2);
}

#[tokio::test]
async fn configured_detector_is_used_without_overrides() {
    let detector = ConflictDetector::default().with_strategy(DetectionStrategy::Parallel);
    let state = Arc::new(AppState::with_detector(detector));
    let app = api::routes().with_state(state);

    let response = app
        .oneshot(post_json("/v1/conflicts/check", &shared_origin_scenario()))
        .await
        .unwrap();
    let body = read_json(response).await;
    assert_eq!(body["strategy"], "parallel");
}
