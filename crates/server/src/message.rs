//! Chat endpoint and static UI hosting.
//!
//! - `POST /api/message` - run one conversational turn
//! - everything else     - files from the configured static directory

use std::path::Path;
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::Serialize;
use tower_http::services::ServeDir;
use tracing::{info, warn};
use uuid::Uuid;
use workforce_agent::{AgentRuntime, EngineError, InboundMessage};
use workforce_core::ApplicationError;

#[derive(Clone)]
pub struct MessageState {
    runtime: Arc<AgentRuntime>,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub correlation_id: String,
}

pub fn router(runtime: Arc<AgentRuntime>, static_dir: &Path) -> Router {
    Router::new()
        .route("/api/message", post(post_message))
        .with_state(MessageState { runtime })
        .fallback_service(ServeDir::new(static_dir))
}

pub async fn post_message(
    State(state): State<MessageState>,
    body: Result<Json<InboundMessage>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4().to_string();

    let message = match body {
        Ok(Json(message)) => message,
        Err(rejection) => {
            warn!(
                event_name = "ingress.message.rejected",
                correlation_id = %correlation_id,
                error = %rejection,
                "inbound message body could not be parsed"
            );
            return interface_error(
                ApplicationError::InvalidRequest(rejection.body_text()),
                correlation_id,
            );
        }
    };

    info!(
        event_name = "ingress.message.received",
        correlation_id = %correlation_id,
        app_id = message.app_id.as_deref().unwrap_or("unknown"),
        "received chat turn"
    );

    match state.runtime.handle_message(message, &correlation_id).await {
        Ok(payload) => Json(payload).into_response(),
        Err(EngineError::Rejected { status, body }) => {
            let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, Json(body)).into_response()
        }
        Err(error) => {
            interface_error(ApplicationError::Integration(error.to_string()), correlation_id)
        }
    }
}

fn interface_error(error: ApplicationError, correlation_id: String) -> Response {
    let interface = error.into_interface(correlation_id);
    let status =
        StatusCode::from_u16(interface.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let body = ErrorBody {
        error: interface.user_message().to_string(),
        correlation_id: interface.correlation_id().to_string(),
    };
    (status, Json(body)).into_response()
}
