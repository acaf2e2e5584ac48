use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::debug;
use workforce_core::{BackendRecord, FetchError, ResourceFetchSpec};

/// Single-attempt GET against a tenant-scoped backend resource.
#[async_trait]
pub trait ResourceClient: Send + Sync {
    async fn fetch(
        &self,
        spec: &ResourceFetchSpec,
        tenant_id: &str,
    ) -> Result<BackendRecord, FetchError>;
}

#[derive(Clone, Debug)]
pub struct HttpResourceClient {
    client: Client,
    base_url: String,
}

impl HttpResourceClient {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self { client, base_url: base_url.trim_end_matches('/').to_string() }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn resource_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl ResourceClient for HttpResourceClient {
    async fn fetch(
        &self,
        spec: &ResourceFetchSpec,
        tenant_id: &str,
    ) -> Result<BackendRecord, FetchError> {
        let url = self.resource_url(&spec.path);
        let response = self
            .client
            .get(&url)
            .header(spec.tenant_header.as_str(), tenant_id)
            .send()
            .await
            .map_err(|error| FetchError::Transport(error.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::BadStatus { status: status.as_u16() });
        }

        let body =
            response.bytes().await.map_err(|error| FetchError::Transport(error.to_string()))?;
        debug!(
            event_name = "egress.backend.response_received",
            url = %url,
            body_len = body.len(),
            "backend resource fetched"
        );

        spec.shape.decode(&body).map_err(|error| FetchError::Decode(error.to_string()))
    }
}
