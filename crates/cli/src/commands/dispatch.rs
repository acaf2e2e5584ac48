use serde_json::json;
use workforce_agent::{HttpResourceClient, ResourceClient};
use workforce_core::config::{AppConfig, LoadOptions};
use workforce_core::{response, IntentRouter};

use crate::commands::CommandResult;

/// Fetches one intent's resource for `app_id` and prints the rendered sentence.
///
/// Unlike a chat turn, a failed fetch is reported as a failure with its error kind
/// instead of the apology sentence.
pub fn run(intent: &str, app_id: &str) -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "dispatch",
                "config_validation",
                format!("configuration issue: {error}"),
                2,
            );
        }
    };

    let router = IntentRouter::with_default_routes(&config.backend.tenant_header);
    let Some(route) = router.resolve(Some(intent)) else {
        return CommandResult::failure(
            "dispatch",
            "unknown_intent",
            format!(
                "no route for intent `{intent}` (known intents: {})",
                router.intent_names().join(", ")
            ),
            3,
        );
    };

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return CommandResult::failure(
                "dispatch",
                "runtime_init",
                format!("failed to initialize async runtime: {error}"),
                4,
            );
        }
    };

    let client = match reqwest::Client::builder().build() {
        Ok(client) => client,
        Err(error) => {
            return CommandResult::failure(
                "dispatch",
                "runtime_init",
                format!("failed to build http client: {error}"),
                4,
            );
        }
    };
    let resources = HttpResourceClient::new(client, &config.backend.base_url);
    let url = resources.resource_url(&route.fetch.path);

    match runtime.block_on(resources.fetch(&route.fetch, app_id)) {
        Ok(record) => CommandResult::success(
            "dispatch",
            response::render(&record),
            Some(json!({
                "intent": route.intent_name,
                "app_id": app_id,
                "url": url,
            })),
        ),
        Err(error) => CommandResult::failure(
            "dispatch",
            error.kind().as_str(),
            format!("GET {url} failed: {error}"),
            5,
        ),
    }
}
