pub mod config;
pub mod domain;
pub mod errors;
pub mod response;
pub mod routing;

pub use domain::conversation::{ConversationOutput, ConversationPayload, RecognizedIntent};
pub use domain::record::{
    AccountSummary, BackendRecord, ChancePrediction, CustomerCount, Opportunity, RecordShape,
};
pub use errors::{ApplicationError, FetchError, FetchErrorKind, InterfaceError};
pub use routing::{IntentRouter, ResourceFetchSpec, RouteEntry};
