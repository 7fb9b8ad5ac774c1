//! Integration tests for the HTTP API endpoints.
//!
//! Uses axum's oneshot pattern (via tower::ServiceExt), no TCP binding needed.
//! Each test builds its own session; multi-request tests share one router
//! state through `create_router_shared`.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tokio::sync::Mutex;
use tower::ServiceExt;

use trial_grid::config::GridConfig;
use trial_grid::mode::Mode;
use trial_grid::server::{create_router, create_router_shared, AppState};
use trial_grid::session::Session;
use trial_grid::sync::{FileHost, MemoryHost};

/// Parse response body as JSON.
async fn body_json(body: Body) -> serde_json::Value {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn shared(config: GridConfig) -> (AppState, MemoryHost) {
    let host = MemoryHost::new();
    let session = Session::new(config, Box::new(host.clone()));
    (Arc::new(Mutex::new(session)), host)
}

fn app(mode: Mode) -> axum::Router {
    create_router(Session::new(GridConfig::new(mode), Box::new(MemoryHost::new())))
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn click(material: &str, bev: &str, air: &str) -> Request<Body> {
    post_json(
        "/click",
        serde_json::json!({ "material": material, "bevTemp": bev, "airTemp": air }),
    )
}

// ── GET /health ──────────────────────────────────────────────────────

#[tokio::test]
async fn health_returns_200() {
    let resp = app(Mode::Flag)
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp.into_body()).await;
    assert_eq!(json["status"], "OK");
}

// ── GET /state, /grid ────────────────────────────────────────────────

#[tokio::test]
async fn state_reports_mode_and_empty_sets() {
    let resp = app(Mode::Collect)
        .oneshot(Request::get("/state").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp.into_body()).await;
    assert_eq!(json["mode"], "collect");
    assert_eq!(json["feedbackEnabled"], false);
    assert_eq!(json["studentData"]["completedCells"], serde_json::json!([]));
    assert!(json["autoScoreLabel"].is_null());
}

#[tokio::test]
async fn grid_lists_all_cells() {
    let resp = app(Mode::Interpret)
        .oneshot(Request::get("/grid").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let json = body_json(resp.into_body()).await;
    let cells = json["cells"].as_array().unwrap();
    assert_eq!(cells.len(), 54);
    assert_eq!(cells[0]["material"], "Aluminum");
    // Nothing is completed, so interpret mode disables every cell.
    assert!(cells.iter().all(|c| c["disabled"] == true));
}

// ── POST /click ──────────────────────────────────────────────────────

#[tokio::test]
async fn click_flags_and_saves() {
    let (state, host) = shared(GridConfig::new(Mode::Flag));
    let resp = create_router_shared(state)
        .oneshot(click("Wood", "Hot", "Cold"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp.into_body()).await;
    assert_eq!(json["outcome"], "flagged");
    assert_eq!(json["studentData"]["flaggedCells"][0]["material"], "Wood");
    assert_eq!(host.save_count(), 1);
}

#[tokio::test]
async fn click_unknown_material_is_400() {
    let resp = app(Mode::Flag)
        .oneshot(click("Steel", "Hot", "Hot"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let json = body_json(resp.into_body()).await;
    assert!(json["error"].as_str().unwrap().contains("Steel"));
}

#[tokio::test]
async fn interpret_click_on_uncollected_cell_is_409() {
    let resp = app(Mode::Interpret)
        .oneshot(click("Glass", "Cold", "Warm"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let json = body_json(resp.into_body()).await;
    assert_eq!(json["error"], "You haven't collected data for this trial!");
}

// ── POST /feedback, /reset ───────────────────────────────────────────

#[tokio::test]
async fn feedback_after_pair_is_case_2c() {
    let (state, host) = shared(GridConfig::new(Mode::Flag));
    let router = create_router_shared(state);
    for bev in ["Hot", "Cold"] {
        let resp = router
            .clone()
            .oneshot(click("Clay", bev, "Hot"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let resp = router
        .oneshot(Request::post("/feedback").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp.into_body()).await;
    assert_eq!(json["case"], "2C");
    assert!(json["text"]
        .as_str()
        .unwrap()
        .contains("2 out of the 12 possible tests (17% of your budget)"));
    assert_eq!(host.feedback_texts().len(), 1);
}

#[tokio::test]
async fn single_attempt_feedback_flow() {
    let (state, _host) = shared(GridConfig::new(Mode::Flag).with_max_feedback_attempts(1));
    let router = create_router_shared(state);
    router
        .clone()
        .oneshot(click("Wood", "Hot", "Hot"))
        .await
        .unwrap();

    let resp = router
        .clone()
        .oneshot(post_json("/feedback", serde_json::json!({})))
        .await
        .unwrap();
    let json = body_json(resp.into_body()).await;
    assert_eq!(json["confirmationRequired"], true);

    let resp = router
        .clone()
        .oneshot(post_json("/feedback", serde_json::json!({ "confirmed": true })))
        .await
        .unwrap();
    let json = body_json(resp.into_body()).await;
    assert_eq!(json["case"], "1A");
    assert_eq!(json["feedbackEnabled"], false);

    let resp = router
        .oneshot(post_json("/feedback", serde_json::json!({ "confirmed": true })))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn feedback_outside_flag_mode_is_400() {
    let resp = app(Mode::Collect)
        .oneshot(Request::post("/feedback").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn reset_clears_flags() {
    let (state, _host) = shared(GridConfig::new(Mode::Flag));
    let router = create_router_shared(state.clone());
    router
        .clone()
        .oneshot(click("Plastic", "Cold", "Cold"))
        .await
        .unwrap();
    let resp = router
        .oneshot(Request::post("/reset").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp.into_body()).await;
    assert_eq!(json["studentData"]["flaggedCells"], serde_json::json!([]));
    assert!(state.lock().await.store().flagged().is_empty());
}

// ── POST /message ────────────────────────────────────────────────────

#[tokio::test]
async fn trial_completion_message_marks_cell() {
    let (state, host) = shared(GridConfig::new(Mode::Interpret));
    let router = create_router_shared(state);
    let msg = serde_json::json!({
        "messageType": "handleConnectedComponentStudentDataChanged",
        "componentState": {
            "componentType": "Embedded",
            "studentData": {
                "isTrialCompleted": true,
                "materialText": "Styrofoam",
                "bevTempText": "Hot",
                "airTempText": "Warm"
            }
        }
    });
    let resp = router
        .clone()
        .oneshot(post_json("/message", msg))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp.into_body()).await;
    assert_eq!(json["effect"], "trialCompleted");
    assert_eq!(json["order"], 1);
    assert_eq!(host.save_count(), 1);

    // The completed cell is now selectable in interpret mode.
    let resp = router
        .oneshot(click("Styrofoam", "Hot", "Warm"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn graph_message_forwards_shown_trials() {
    let msg = serde_json::json!({
        "messageType": "handleConnectedComponentStudentDataChanged",
        "componentState": {
            "componentType": "Graph",
            "studentData": {
                "trials": [
                    { "id": "Aluminum-ColdLiquid", "show": true },
                    { "id": "Wood-HotLiquid", "show": false }
                ]
            }
        }
    });
    let resp = app(Mode::Flag)
        .oneshot(post_json("/message", msg))
        .await
        .unwrap();
    let json = body_json(resp.into_body()).await;
    assert_eq!(json["effect"], "chartForwarded");
    let shown = json["forward"]["shownTrials"].as_array().unwrap();
    assert_eq!(shown.len(), 1);
    assert_eq!(shown[0]["material"], "Aluminum");
    assert_eq!(shown[0]["bevTemp"], "Cold");
}

#[tokio::test]
async fn malformed_message_is_400() {
    let resp = app(Mode::Flag)
        .oneshot(post_json("/message", serde_json::json!({ "messageType": "nope" })))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let bad_completion = serde_json::json!({
        "messageType": "handleConnectedComponentStudentDataChanged",
        "componentState": {
            "componentType": "Embedded",
            "studentData": {
                "isTrialCompleted": true,
                "materialText": "Cardboard",
                "bevTempText": "Hot",
                "airTempText": "Hot"
            }
        }
    });
    let resp = app(Mode::Collect)
        .oneshot(post_json("/message", bad_completion))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// ── File-backed host ─────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn file_host_saves_from_handlers() {
    let dir = tempfile::tempdir().unwrap();
    let host = FileHost::new(dir.path());
    let state_path = host.state_path();
    let feedback_path = host.feedback_path();
    let state: AppState = Arc::new(Mutex::new(Session::new(
        GridConfig::new(Mode::Flag),
        Box::new(host),
    )));

    let resp = create_router_shared(state.clone())
        .oneshot(click("Wood", "Hot", "Hot"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let saved = trial_grid::sync::file::load_student_data(&state_path).unwrap();
    assert_eq!(saved.flagged_cells.map(|c| c.len()), Some(1));

    let resp = create_router_shared(state.clone())
        .oneshot(post_json("/feedback", serde_json::json!({ "confirmed": true })))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp.into_body()).await;
    assert_eq!(json["case"], "1A");
    let lines = std::fs::read_to_string(&feedback_path).unwrap();
    assert_eq!(lines.lines().count(), 1);

    // The lock is released once the blocking save completes.
    assert_eq!(state.lock().await.store().flagged().len(), 1);
}
