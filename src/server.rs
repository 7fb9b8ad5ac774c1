//! Axum HTTP server: the host stand-in for one grid session.
//!
//! The session lives behind `Arc<tokio::sync::Mutex<Session>>`, so requests are
//! applied one at a time in arrival order. Mutating requests hold the lock on
//! the blocking pool while the host saves.
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | GET | `/state` | Mode, persisted student data, feedback availability, log |
//! | GET | `/grid` | Render state of all 54 slots |
//! | POST | `/click` | Click a cell `{material, bevTemp, airTemp}` |
//! | POST | `/feedback` | Request plan feedback `{confirmed}` |
//! | POST | `/reset` | Clear the flagged plan |
//! | POST | `/message` | Deliver an inbound host message |

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};

use crate::error::{GridError, InteractionError};
use crate::session::{FeedbackOutcome, MessageEffect, Session};
use crate::sync::InboundMessage;
use crate::types::CellKey;

pub type AppState = Arc<Mutex<Session>>;

type ApiError = (StatusCode, Json<serde_json::Value>);
type ApiResult = Result<Json<serde_json::Value>, ApiError>;

pub fn create_router(session: Session) -> Router {
    create_router_shared(Arc::new(Mutex::new(session)))
}

/// Router over an existing shared session handle.
pub fn create_router_shared(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handle_health_check))
        .route("/state", get(handle_get_state))
        .route("/grid", get(handle_get_grid))
        .route("/click", post(handle_click))
        .route("/feedback", post(handle_feedback))
        .route("/reset", post(handle_reset))
        .route("/message", post(handle_message))
        .layer(cors)
        .with_state(state)
}

// ── Request types ───────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ClickRequest {
    material: String,
    bev_temp: String,
    air_temp: String,
}

#[derive(Deserialize, Default)]
struct FeedbackRequest {
    #[serde(default)]
    confirmed: bool,
}

fn error_response(status: StatusCode, msg: &str) -> ApiError {
    (status, Json(json!({ "error": msg })))
}

fn interaction_error(err: InteractionError) -> ApiError {
    let status = match err {
        InteractionError::NotCollected(_) | InteractionError::FeedbackDisabled => {
            StatusCode::CONFLICT
        }
        InteractionError::UnsupportedInMode { .. } => StatusCode::BAD_REQUEST,
    };
    error_response(status, &err.to_string())
}

fn grid_error(err: GridError) -> ApiError {
    match err {
        GridError::Interaction(e) => interaction_error(e),
        other => error_response(StatusCode::BAD_REQUEST, &other.to_string()),
    }
}

// ── GET handlers ────────────────────────────────────────────────────

async fn handle_health_check() -> Json<serde_json::Value> {
    Json(json!({ "status": "OK" }))
}

async fn handle_get_state(State(state): State<AppState>) -> impl IntoResponse {
    let session = state.lock().await;
    Json(json!({
        "mode": session.mode(),
        "studentData": session.snapshot(),
        "feedbackEnabled": session.feedback_enabled(),
        "autoScoreLabel": session.auto_score_label(),
        "log": session.log_html(),
    }))
}

async fn handle_get_grid(State(state): State<AppState>) -> impl IntoResponse {
    let session = state.lock().await;
    Json(json!({
        "mode": session.mode(),
        "cells": session.grid_view(),
    }))
}

// ── POST handlers ───────────────────────────────────────────────────
//
// Mutations save through the session's host, which may touch the filesystem,
// so they run on the blocking pool.

async fn with_session<T, F>(state: &AppState, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&mut Session) -> Result<T, ApiError> + Send + 'static,
    T: Send + 'static,
{
    let state = state.clone();
    tokio::task::spawn_blocking(move || {
        let mut session = state.blocking_lock();
        f(&mut session)
    })
    .await
    .map_err(|e| error_response(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string()))?
}

async fn handle_click(State(state): State<AppState>, Json(req): Json<ClickRequest>) -> ApiResult {
    let key = CellKey::parse(&req.material, &req.bev_temp, &req.air_temp)
        .map_err(|e| error_response(StatusCode::BAD_REQUEST, &e.to_string()))?;

    with_session(&state, move |session| {
        let outcome = session.cell_clicked(key).map_err(interaction_error)?;
        Ok(Json(json!({
            "outcome": outcome,
            "ignored": outcome.is_none(),
            "studentData": session.snapshot(),
        })))
    })
    .await
}

async fn handle_feedback(State(state): State<AppState>, body: Bytes) -> ApiResult {
    // An empty body means an unconfirmed request.
    let req: FeedbackRequest = if body.is_empty() {
        FeedbackRequest::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| error_response(StatusCode::BAD_REQUEST, &e.to_string()))?
    };
    with_session(&state, move |session| {
        match session.request_feedback(req.confirmed).map_err(interaction_error)? {
            FeedbackOutcome::ConfirmationRequired(prompt) => Ok(Json(json!({
                "confirmationRequired": true,
                "message": prompt,
            }))),
            FeedbackOutcome::Given(classification) => Ok(Json(json!({
                "confirmationRequired": false,
                "case": classification.case(),
                "text": classification.text(),
                "classification": classification,
                "feedbackEnabled": session.feedback_enabled(),
            }))),
        }
    })
    .await
}

async fn handle_reset(State(state): State<AppState>) -> ApiResult {
    with_session(&state, |session| {
        session.reset_plan().map_err(interaction_error)?;
        Ok(Json(json!({ "studentData": session.snapshot() })))
    })
    .await
}

async fn handle_message(
    State(state): State<AppState>,
    Json(body): Json<serde_json::Value>,
) -> ApiResult {
    let message: InboundMessage = serde_json::from_value(body).map_err(|e| {
        error_response(StatusCode::BAD_REQUEST, &format!("malformed message: {}", e))
    })?;

    with_session(&state, move |session| {
        let effect = session.handle_message(message).map_err(grid_error)?;
        let result = match effect {
            MessageEffect::ParametersSet => json!({ "effect": "parametersSet" }),
            MessageEffect::Loaded { restored } => {
                json!({ "effect": "loaded", "restored": restored })
            }
            MessageEffect::AnnotationsChecked { feedback_enabled } => json!({
                "effect": "annotationsChecked",
                "feedbackEnabled": feedback_enabled,
            }),
            MessageEffect::TrialCompleted { key, inserted } => json!({
                "effect": "trialCompleted",
                "cell": key,
                "inserted": inserted,
                "order": session.store().sequence_number(&key),
            }),
            MessageEffect::ChartForwarded(forward) => json!({
                "effect": "chartForwarded",
                "forward": forward,
            }),
            MessageEffect::Ignored => json!({ "effect": "ignored" }),
        };
        Ok(Json(result))
    })
    .await
}
