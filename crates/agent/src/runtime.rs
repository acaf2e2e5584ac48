use std::sync::Arc;

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use tracing::{info, warn};
use workforce_core::{response::WORKSPACE_MISSING_MESSAGE, ConversationPayload};

use crate::engine::{ConversationEngine, EngineError, MessageRequest};
use crate::pipeline::DispatchPipeline;

/// Body of an inbound chat turn.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct InboundMessage {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub context: Map<String, Value>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub input: Map<String, Value>,
    /// Tenant scope for backend calls (the chat team id).
    #[serde(default)]
    pub app_id: Option<String>,
}

/// An explicit `null` is read as an empty object.
fn null_as_empty<'de, D>(deserializer: D) -> Result<Map<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Map<String, Value>>::deserialize(deserializer)?.unwrap_or_default())
}

pub struct AgentRuntime {
    engine: Arc<dyn ConversationEngine>,
    pipeline: DispatchPipeline,
    workspace_id: Option<String>,
}

impl AgentRuntime {
    pub fn new(
        engine: Arc<dyn ConversationEngine>,
        pipeline: DispatchPipeline,
        workspace_id: Option<String>,
    ) -> Self {
        Self { engine, pipeline, workspace_id }
    }

    pub fn is_configured(&self) -> bool {
        self.workspace_id.is_some()
    }

    pub fn pipeline(&self) -> &DispatchPipeline {
        &self.pipeline
    }

    /// Runs one turn: engine classification, then intent dispatch.
    ///
    /// Without a workspace no outbound call is made and the caller receives the
    /// configuration notice. Engine failures are returned untouched so their status can
    /// be relayed.
    pub async fn handle_message(
        &self,
        message: InboundMessage,
        correlation_id: &str,
    ) -> Result<ConversationPayload, EngineError> {
        let Some(workspace_id) = self.workspace_id.clone() else {
            warn!(
                event_name = "agent.turn.workspace_missing",
                correlation_id,
                "workspace id is not configured; returning configuration notice"
            );
            return Ok(ConversationPayload::notice(WORKSPACE_MISSING_MESSAGE));
        };

        let tenant_id = message.app_id.unwrap_or_default();
        let request =
            MessageRequest { workspace_id, input: message.input, context: message.context };

        let payload = self.engine.message(&request).await.map_err(|error| {
            warn!(
                event_name = "agent.engine.failed",
                correlation_id,
                status = error.status_code(),
                error = %error,
                "conversation engine call failed"
            );
            error
        })?;

        info!(
            event_name = "agent.engine.replied",
            correlation_id,
            intent = payload.first_intent().unwrap_or("none"),
            tenant_id = %tenant_id,
            "conversation engine classified turn"
        );

        Ok(self.pipeline.handle(&tenant_id, payload).await)
    }
}
