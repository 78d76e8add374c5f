//! HTTP surface: thin JSON dispatch over the flight core.
//!
//! Every handler reads or transitions the shared store through its atomic
//! operations and serializes the outcome verbatim; no flight rules live here.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use hawk_fc::{command, CommandError, StatusStore};
use hawk_nav::MissionArea;
use hawk_proto::{DroneStatus, Waypoint};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

#[derive(Clone)]
pub struct ApiState {
    pub store: StatusStore,
    pub area: MissionArea,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct MissionResponse {
    pub message: String,
    pub mission: Vec<Waypoint>,
}

#[derive(Debug, Deserialize)]
pub struct MissionRequest {
    #[serde(default)]
    pub waypoints: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct FailureRequest {
    pub mode: String,
}

/// Command rejections surface as 400 with the handler's message; none are
/// fatal to the process.
struct ApiError(CommandError);

impl From<CommandError> for ApiError {
    fn from(err: CommandError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = self.0.to_string();
        warn!(%message, "command rejected");
        (StatusCode::BAD_REQUEST, Json(MessageResponse { message })).into_response()
    }
}

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/api/arm", post(arm))
        .route("/api/takeoff", post(takeoff))
        .route("/api/land", post(land))
        .route("/api/status", get(status))
        .route("/api/mission", post(upload_mission))
        .route("/api/clear_mission", post(clear_mission))
        .route("/api/inject_failure", post(inject_failure))
        .route("/api/reset", post(reset))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn arm(State(st): State<ApiState>) -> Result<Json<MessageResponse>, ApiError> {
    let out = st.store.apply(command::arm)?;
    info!(battery = out.status.battery, "drone armed");
    Ok(Json(MessageResponse { message: out.message }))
}

async fn takeoff(State(st): State<ApiState>) -> Result<Json<MessageResponse>, ApiError> {
    let out = st.store.apply(command::takeoff)?;
    info!(altitude = out.status.altitude, "drone airborne");
    Ok(Json(MessageResponse { message: out.message }))
}

async fn land(State(st): State<ApiState>) -> Result<Json<MessageResponse>, ApiError> {
    let out = st.store.apply(command::land)?;
    info!("landing sequence started");
    Ok(Json(MessageResponse { message: out.message }))
}

async fn status(State(st): State<ApiState>) -> Json<DroneStatus> {
    Json(st.store.read())
}

async fn upload_mission(
    State(st): State<ApiState>,
    Json(req): Json<MissionRequest>,
) -> Result<Json<MissionResponse>, ApiError> {
    // Reject before the geometry work; upload_mission re-checks under the lock.
    command::require_gps(&st.store.read())?;

    let mission = hawk_nav::plan_mission(&mut rand::thread_rng(), &req.waypoints, &st.area)
        .map_err(CommandError::from)?;
    let out = st.store.apply(move |s| command::upload_mission(s, mission))?;
    info!(waypoints = out.status.mission.len(), "mission uploaded");
    Ok(Json(MissionResponse { message: out.message, mission: out.status.mission }))
}

async fn clear_mission(State(st): State<ApiState>) -> Result<Json<MessageResponse>, ApiError> {
    let out = st.store.apply(|s| Ok(command::clear_mission(s)))?;
    info!("mission cleared");
    Ok(Json(MessageResponse { message: out.message }))
}

async fn inject_failure(
    State(st): State<ApiState>,
    Json(req): Json<FailureRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let out = st.store.apply(|s| command::inject_failure(s, &req.mode))?;
    info!(mode = %req.mode, "failure injected");
    Ok(Json(MessageResponse { message: out.message }))
}

async fn reset(State(st): State<ApiState>) -> Result<Json<MessageResponse>, ApiError> {
    let out = st.store.apply(|_| Ok(command::reset()))?;
    info!("status reset to defaults");
    Ok(Json(MessageResponse { message: out.message }))
}
