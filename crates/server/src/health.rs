use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;

#[derive(Clone)]
pub struct HealthState {
    pub workspace_configured: bool,
    pub backend_base_url: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthCheck {
    pub status: &'static str,
    pub detail: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: HealthCheck,
    pub workspace: HealthCheck,
    pub backend: HealthCheck,
    pub checked_at: String,
}

pub fn router(state: HealthState) -> Router {
    Router::new().route("/health", get(health)).with_state(state)
}

pub async fn health(State(state): State<HealthState>) -> (StatusCode, Json<HealthResponse>) {
    let workspace = if state.workspace_configured {
        HealthCheck { status: "ready", detail: "workspace id configured".to_string() }
    } else {
        HealthCheck {
            status: "degraded",
            detail: "workspace id missing; turns return the configuration notice".to_string(),
        }
    };
    let ready = workspace.status == "ready";

    let payload = HealthResponse {
        status: if ready { "ready" } else { "degraded" },
        service: HealthCheck {
            status: "ready",
            detail: "workforce-server runtime initialized".to_string(),
        },
        workspace,
        backend: HealthCheck {
            status: "ready",
            detail: format!("resources served from {}", state.backend_base_url),
        },
        checked_at: Utc::now().to_rfc3339(),
    };

    let status_code = if ready { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    (status_code, Json(payload))
}
