//! API Routes

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::{get, post},
    Json, Router,
};

use crate::device_registry::{
    DeviceStatus, DeviceSummary, RegisterDeviceRequest, ReturnDeviceRequest, TakeDeviceRequest,
};
use crate::error::{Error, Result};
use crate::models::MessageResponse;
use crate::state::AppState;

/// Create API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(super::health_check))
        // Devices
        .route("/register", post(register_device))
        .route("/devices", get(list_devices))
        .route("/devices/:serial_number", get(get_device))
        .route("/take", post(take_device))
        .route("/return", post(return_device))
        .with_state(state)
}

/// Unwrap a JSON body, reporting undecodable input as a validation failure
fn json_body<T>(payload: std::result::Result<Json<T>, JsonRejection>) -> Result<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| Error::Validation(rejection.body_text()))
}

// ========================================
// Device Handlers
// ========================================

/// POST /register
///
/// ## Request Body
/// ```json
/// { "device_name": "Laptop-1", "serial_number": "SN100" }
/// ```
async fn register_device(
    State(state): State<AppState>,
    payload: std::result::Result<Json<RegisterDeviceRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>> {
    let req = json_body(payload)?;
    state.registry.register_device(req).await?;
    Ok(Json(MessageResponse::new("Device registered successfully")))
}

/// GET /devices
async fn list_devices(State(state): State<AppState>) -> Result<Json<Vec<DeviceSummary>>> {
    let devices = state.registry.list_devices().await?;
    Ok(Json(devices))
}

/// GET /devices/:serial_number
async fn get_device(
    State(state): State<AppState>,
    Path(serial_number): Path<String>,
) -> Result<Json<DeviceStatus>> {
    let status = state.registry.get_device(&serial_number).await?;
    Ok(Json(status))
}

/// POST /take
///
/// ## Request Body
/// ```json
/// { "user_name": "alice", "serial_number": "SN100" }
/// ```
async fn take_device(
    State(state): State<AppState>,
    payload: std::result::Result<Json<TakeDeviceRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>> {
    let req = json_body(payload)?;
    state.registry.take_device(req).await?;
    Ok(Json(MessageResponse::new("Device taken successfully")))
}

/// POST /return
async fn return_device(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ReturnDeviceRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>> {
    let req = json_body(payload)?;
    state.registry.return_device(req).await?;
    Ok(Json(MessageResponse::new("Device returned successfully")))
}
