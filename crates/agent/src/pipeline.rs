use std::sync::Arc;

use tracing::{debug, info, warn};
use workforce_core::{
    response::{self, API_ERROR_MESSAGE},
    ConversationPayload, IntentRouter, RouteEntry,
};

use crate::resources::ResourceClient;

/// Turns the engine's classified intent into a backend-backed answer.
///
/// The only suspension point is the resource fetch; routing and rendering are
/// synchronous. A failed fetch always degrades to [`API_ERROR_MESSAGE`].
#[derive(Clone)]
pub struct DispatchPipeline {
    router: Arc<IntentRouter>,
    resources: Arc<dyn ResourceClient>,
}

impl DispatchPipeline {
    pub fn new(router: Arc<IntentRouter>, resources: Arc<dyn ResourceClient>) -> Self {
        Self { router, resources }
    }

    pub fn router(&self) -> &IntentRouter {
        &self.router
    }

    pub async fn handle(
        &self,
        tenant_id: &str,
        mut payload: ConversationPayload,
    ) -> ConversationPayload {
        let Some(route) = self.router.resolve(payload.first_intent()) else {
            debug!(
                event_name = "dispatch.route.none",
                intent = payload.first_intent().unwrap_or("none"),
                "no route for intent; passing payload through"
            );
            return payload;
        };

        let text = self.dispatch(route, tenant_id).await;
        payload.set_output_text(text);
        payload
    }

    /// Fetches and renders one route, substituting the apology on any fetch failure.
    pub async fn dispatch(&self, route: &RouteEntry, tenant_id: &str) -> String {
        match self.resources.fetch(&route.fetch, tenant_id).await {
            Ok(record) => {
                info!(
                    event_name = "dispatch.fetch.succeeded",
                    intent = %route.intent_name,
                    path = %route.fetch.path,
                    tenant_id,
                    "backend resource fetched"
                );
                response::render(&record)
            }
            Err(error) => {
                warn!(
                    event_name = "dispatch.fetch.failed",
                    intent = %route.intent_name,
                    path = %route.fetch.path,
                    tenant_id,
                    error_kind = error.kind().as_str(),
                    status = error.status_code(),
                    error = %error,
                    "backend fetch failed; answering with apology"
                );
                API_ERROR_MESSAGE.to_string()
            }
        }
    }

    /// Runs the route registered for `intent_name`, or `None` when no route exists.
    pub async fn dispatch_intent(&self, intent_name: &str, tenant_id: &str) -> Option<String> {
        let route = self.router.resolve(Some(intent_name))?;
        Some(self.dispatch(route, tenant_id).await)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::VecDeque;
    use std::sync::Arc;

    use async_trait::async_trait;
    use serde_json::json;
    use tokio::sync::Mutex;
    use workforce_core::{
        response::API_ERROR_MESSAGE, routing::default_router, AccountSummary, BackendRecord,
        ChancePrediction, ConversationPayload, CustomerCount, FetchError, ResourceFetchSpec,
    };

    use super::DispatchPipeline;
    use crate::resources::ResourceClient;

    #[derive(Default)]
    pub(crate) struct ScriptedResources {
        state: Mutex<ScriptedState>,
    }

    #[derive(Default)]
    struct ScriptedState {
        responses: VecDeque<Result<BackendRecord, FetchError>>,
        calls: Vec<(String, String, String)>,
    }

    impl ScriptedResources {
        pub(crate) fn with_responses(responses: Vec<Result<BackendRecord, FetchError>>) -> Self {
            Self {
                state: Mutex::new(ScriptedState { responses: responses.into(), calls: Vec::new() }),
            }
        }

        /// `(path, tenant header, tenant id)` of every fetch, in order.
        pub(crate) async fn calls(&self) -> Vec<(String, String, String)> {
            self.state.lock().await.calls.clone()
        }
    }

    #[async_trait]
    impl ResourceClient for ScriptedResources {
        async fn fetch(
            &self,
            spec: &ResourceFetchSpec,
            tenant_id: &str,
        ) -> Result<BackendRecord, FetchError> {
            let mut state = self.state.lock().await;
            state.calls.push((spec.path.clone(), spec.tenant_header.clone(), tenant_id.to_owned()));
            state
                .responses
                .pop_front()
                .unwrap_or_else(|| Err(FetchError::Transport("no scripted response".to_owned())))
        }
    }

    fn pipeline(resources: Arc<ScriptedResources>) -> DispatchPipeline {
        DispatchPipeline::new(Arc::new(default_router()), resources)
    }

    fn payload_with_intent(intent: Option<&str>) -> ConversationPayload {
        let intents = intent
            .map(|name| json!([{ "intent": name, "confidence": 0.87 }]))
            .unwrap_or_else(|| json!([]));
        serde_json::from_value(json!({
            "intents": intents,
            "output": { "text": ["engine answer"] },
            "context": { "conversation_id": "c-1" }
        }))
        .expect("payload fixture should decode")
    }

    #[tokio::test]
    async fn payload_without_intents_passes_through_unchanged() {
        let resources = Arc::new(ScriptedResources::default());
        let payload = payload_with_intent(None);

        let handled = pipeline(resources.clone()).handle("T-1", payload.clone()).await;

        assert_eq!(handled, payload);
        assert!(resources.calls().await.is_empty());
    }

    #[tokio::test]
    async fn unrecognized_intent_passes_through_unchanged() {
        let resources = Arc::new(ScriptedResources::default());
        let payload = payload_with_intent(Some("greeting"));

        let handled = pipeline(resources.clone()).handle("T-1", payload.clone()).await;

        assert_eq!(handled, payload);
        assert!(resources.calls().await.is_empty());
    }

    #[tokio::test]
    async fn num_customers_renders_count_and_scopes_tenant() {
        let resources = Arc::new(ScriptedResources::with_responses(vec![Ok(
            BackendRecord::CustomerCount(CustomerCount { count: 7 }),
        )]));

        let handled = pipeline(resources.clone())
            .handle("T-ACME", payload_with_intent(Some("numCustomers")))
            .await;

        assert_eq!(handled.output_text(), Some("You have 7 customers"));
        assert_eq!(handled.context.get("conversation_id"), Some(&json!("c-1")));
        assert_eq!(
            resources.calls().await,
            vec![("/accounts/count".to_owned(), "x-app-id".to_owned(), "T-ACME".to_owned())]
        );
    }

    #[tokio::test]
    async fn top_customers_renders_oxford_list() {
        let accounts = ["A", "B", "C"]
            .iter()
            .map(|name| AccountSummary { name: (*name).to_owned() })
            .collect();
        let resources = Arc::new(ScriptedResources::with_responses(vec![Ok(
            BackendRecord::TopCustomers(accounts),
        )]));

        let handled =
            pipeline(resources).handle("T-1", payload_with_intent(Some("topCustomers"))).await;

        assert_eq!(handled.output_text(), Some("Your top 3 customers are A, B, and C."));
    }

    #[tokio::test]
    async fn opportunities_render_single_entry_without_connector() {
        let record: BackendRecord = workforce_core::RecordShape::Opportunities
            .decode(br#"[{"name": "X", "expected_revenue": 100}]"#)
            .expect("fixture should decode");
        let resources = Arc::new(ScriptedResources::with_responses(vec![Ok(record)]));

        let handled =
            pipeline(resources).handle("T-1", payload_with_intent(Some("opportunities"))).await;

        assert_eq!(handled.output_text(), Some("Your top opportunities are X ($100)"));
    }

    #[tokio::test]
    async fn closing_opportunities_reads_at_most_five_predictions() {
        let predictions = (0..7)
            .map(|index| ChancePrediction { prediction: format!("p{index}") })
            .collect();
        let resources = Arc::new(ScriptedResources::with_responses(vec![Ok(
            BackendRecord::ClosingChances(predictions),
        )]));

        let handled = pipeline(resources)
            .handle("T-1", payload_with_intent(Some("closingOpportunities")))
            .await;

        assert_eq!(
            handled.output_text(),
            Some("Your opportunities with the top chances are p0, p1, p2, p3, and p4")
        );
    }

    #[tokio::test]
    async fn every_fetch_failure_renders_the_apology() {
        let failures = [
            ("numCustomers", FetchError::Transport("connection reset".to_owned())),
            ("topCustomers", FetchError::BadStatus { status: 500 }),
            ("opportunities", FetchError::Decode("expected array".to_owned())),
            ("closingOpportunities", FetchError::BadStatus { status: 404 }),
        ];

        for (intent, failure) in failures {
            let resources = Arc::new(ScriptedResources::with_responses(vec![Err(failure)]));
            let handled =
                pipeline(resources).handle("T-1", payload_with_intent(Some(intent))).await;
            assert_eq!(handled.output_text(), Some(API_ERROR_MESSAGE), "intent {intent}");
        }
    }

    #[tokio::test]
    async fn dispatch_intent_returns_none_for_unknown_intent() {
        let resources = Arc::new(ScriptedResources::default());
        let pipeline = pipeline(resources.clone());

        assert_eq!(pipeline.dispatch_intent("weather", "T-1").await, None);
        assert!(resources.calls().await.is_empty());
    }
}
