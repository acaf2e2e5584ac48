use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::{json, Map, Value};
use thiserror::Error;
use workforce_core::config::EngineConfig;
use workforce_core::ConversationPayload;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MessageRequest {
    #[serde(skip)]
    pub workspace_id: String,
    pub input: Map<String, Value>,
    pub context: Map<String, Value>,
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum EngineError {
    /// The engine answered with an error status; `body` is relayed to the caller as-is.
    #[error("conversation engine responded with status {status}")]
    Rejected { status: u16, body: Value },
    #[error("conversation engine transport failure: {0}")]
    Transport(String),
    #[error("conversation engine reply could not be decoded: {0}")]
    Decode(String),
}

impl EngineError {
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Rejected { status, .. } => Some(*status),
            Self::Transport(_) | Self::Decode(_) => None,
        }
    }
}

/// Intent classification and dialog for one conversational turn.
#[async_trait]
pub trait ConversationEngine: Send + Sync {
    async fn message(&self, request: &MessageRequest) -> Result<ConversationPayload, EngineError>;
}

/// Client for the Watson Conversation v1 message API.
#[derive(Clone, Debug)]
pub struct HttpConversationEngine {
    client: Client,
    url: String,
    version_date: String,
    credentials: Option<(String, SecretString)>,
}

impl HttpConversationEngine {
    pub fn new(client: Client, config: &EngineConfig) -> Self {
        let credentials = match (&config.username, &config.password) {
            (Some(username), Some(password)) => Some((username.clone(), password.clone())),
            _ => None,
        };
        Self {
            client,
            url: config.url.trim_end_matches('/').to_string(),
            version_date: config.version_date.clone(),
            credentials,
        }
    }

    pub fn message_url(&self, workspace_id: &str) -> String {
        format!("{}/v1/workspaces/{}/message", self.url, workspace_id)
    }
}

#[async_trait]
impl ConversationEngine for HttpConversationEngine {
    async fn message(&self, request: &MessageRequest) -> Result<ConversationPayload, EngineError> {
        let mut builder = self
            .client
            .post(self.message_url(&request.workspace_id))
            .query(&[("version", self.version_date.as_str())])
            .json(request);
        if let Some((username, password)) = &self.credentials {
            builder = builder.basic_auth(username, Some(password.expose_secret()));
        }

        let response =
            builder.send().await.map_err(|error| EngineError::Transport(error.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let raw = response.bytes().await.map_err(|error| {
                EngineError::Transport(format!(
                    "failed reading error body for status {}: {error}",
                    status.as_u16()
                ))
            })?;
            let body = serde_json::from_slice::<Value>(&raw).unwrap_or_else(|_| {
                json!({
                    "error": String::from_utf8_lossy(&raw),
                    "code": status.as_u16(),
                })
            });
            return Err(EngineError::Rejected { status: status.as_u16(), body });
        }

        response.json::<ConversationPayload>().await.map_err(|error| {
            if error.is_decode() {
                EngineError::Decode(error.to_string())
            } else {
                EngineError::Transport(error.to_string())
            }
        })
    }
}
