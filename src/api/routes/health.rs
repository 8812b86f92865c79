use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::api::state::AppState;

#[derive(Serialize)]
pub struct WelcomeResponse {
    #[serde(rename = "apiVersion")]
    pub api_version: String,
    pub status: String,
    pub message: String,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub store: String,
}

pub async fn welcome() -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        api_version: "v1.0".into(),
        status: "200".into(),
        message: "Welcome to class on CareerHub MongoDB".into(),
    })
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".into(),
        version: env!("CARGO_PKG_VERSION").into(),
    })
}

pub async fn readiness_check(
    State(state): State<AppState>,
) -> Result<Json<ReadinessResponse>, (StatusCode, Json<ReadinessResponse>)> {
    match state.job_service.ping().await {
        Ok(()) => Ok(Json(ReadinessResponse {
            status: "ready".into(),
            store: "connected".into(),
        })),
        Err(e) => {
            tracing::warn!(error = %e, "store ping failed");
            Err((
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ReadinessResponse {
                    status: "not_ready".into(),
                    store: "disconnected".into(),
                }),
            ))
        }
    }
}
