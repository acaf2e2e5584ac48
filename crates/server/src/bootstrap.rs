use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};
use workforce_agent::{AgentRuntime, DispatchPipeline, HttpConversationEngine, HttpResourceClient};
use workforce_core::config::AppConfig;
use workforce_core::IntentRouter;

pub struct Application {
    pub config: AppConfig,
    pub runtime: Arc<AgentRuntime>,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("http client construction failed: {0}")]
    HttpClient(#[source] reqwest::Error),
}

pub fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );

    let client = reqwest::Client::builder()
        .user_agent(concat!("workforce-server/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(BootstrapError::HttpClient)?;

    let router = Arc::new(IntentRouter::with_default_routes(&config.backend.tenant_header));
    let resources = Arc::new(HttpResourceClient::new(client.clone(), &config.backend.base_url));
    let engine = Arc::new(HttpConversationEngine::new(client, &config.engine));
    let workspace_id = config.engine.workspace_id().map(str::to_owned);

    if workspace_id.is_none() {
        warn!(
            event_name = "system.bootstrap.workspace_missing",
            correlation_id = "bootstrap",
            "no workspace id configured; every turn will return the configuration notice"
        );
    }
    info!(
        event_name = "system.bootstrap.routes_loaded",
        correlation_id = "bootstrap",
        route_count = router.len(),
        backend_base_url = %resources.base_url(),
        "intent routes loaded"
    );

    let runtime = AgentRuntime::new(engine, DispatchPipeline::new(router, resources), workspace_id);

    Ok(Application { config, runtime: Arc::new(runtime) })
}
