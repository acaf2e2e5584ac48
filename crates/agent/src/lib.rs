//! Agent runtime: conversational turn handling for the workforce assistant.
//!
//! One turn follows a fixed path:
//! 1. **Engine** (`engine`) - the conversational engine classifies the utterance
//! 2. **Routing** - the first intent is looked up in the static route table
//! 3. **Fetch** (`resources`) - one tenant-scoped GET against the workforce backend
//! 4. **Render** (`pipeline`) - the record becomes a sentence in `output.text`
//!
//! # Key Types
//!
//! - `AgentRuntime` - workspace check, engine call, then dispatch (see `runtime`)
//! - `DispatchPipeline` - route, fetch, render, merge
//! - `ResourceClient` / `ConversationEngine` - injectable traits with reqwest clients
//!
//! Backend failures never escape a turn: they are answered with an apology sentence.

pub mod engine;
pub mod pipeline;
pub mod resources;
pub mod runtime;

pub use engine::{ConversationEngine, EngineError, HttpConversationEngine, MessageRequest};
pub use pipeline::DispatchPipeline;
pub use resources::{HttpResourceClient, ResourceClient};
pub use runtime::{AgentRuntime, InboundMessage};
