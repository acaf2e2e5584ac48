use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Reply of the conversational engine for one turn.
///
/// Only `output.text` is ever rewritten. Every other field the engine sent is kept in
/// the flattened `extra` maps so the payload round-trips to the caller untouched.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversationPayload {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub intents: Vec<RecognizedIntent>,
    #[serde(default)]
    pub output: ConversationOutput,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub context: Map<String, Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecognizedIntent {
    pub intent: String,
    #[serde(default)]
    pub confidence: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversationOutput {
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub text: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ConversationPayload {
    /// A payload carrying nothing but an output sentence.
    pub fn notice(text: impl Into<String>) -> Self {
        let mut payload = Self::default();
        payload.set_output_text(text);
        payload
    }

    /// Name of the top-ranked intent. Confidence is not consulted.
    pub fn first_intent(&self) -> Option<&str> {
        self.intents.first().map(|intent| intent.intent.as_str())
    }

    pub fn output_text(&self) -> Option<&str> {
        self.output.text.as_str()
    }

    pub fn set_output_text(&mut self, text: impl Into<String>) {
        self.output.text = Value::String(text.into());
    }
}
