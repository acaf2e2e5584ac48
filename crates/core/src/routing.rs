//! Static intent → backend resource table.
//!
//! Adding an intent is a data change: register another [`RouteEntry`]. Lookups are
//! exact and case-sensitive, and an unknown intent is a normal outcome, not a fault.

use std::collections::HashMap;

use crate::config::DEFAULT_TENANT_HEADER;
use crate::domain::record::RecordShape;

pub const NUM_CUSTOMERS: &str = "numCustomers";
pub const TOP_CUSTOMERS: &str = "topCustomers";
pub const OPPORTUNITIES: &str = "opportunities";
pub const CLOSING_OPPORTUNITIES: &str = "closingOpportunities";

/// Which backend resource to GET and which header carries the tenant id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceFetchSpec {
    pub path: String,
    pub tenant_header: String,
    pub shape: RecordShape,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouteEntry {
    pub intent_name: String,
    pub fetch: ResourceFetchSpec,
}

impl RouteEntry {
    pub fn new(
        intent_name: impl Into<String>,
        path: impl Into<String>,
        tenant_header: impl Into<String>,
        shape: RecordShape,
    ) -> Self {
        Self {
            intent_name: intent_name.into(),
            fetch: ResourceFetchSpec {
                path: path.into(),
                tenant_header: tenant_header.into(),
                shape,
            },
        }
    }

    /// The formatter for this route is selected by the decoded record shape.
    pub fn formatter(&self) -> RecordShape {
        self.fetch.shape
    }
}

#[derive(Clone, Debug, Default)]
pub struct IntentRouter {
    routes: HashMap<String, RouteEntry>,
}

impl IntentRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// The four workforce intents, tenant-scoped through `tenant_header`.
    pub fn with_default_routes(tenant_header: &str) -> Self {
        let mut router = Self::new();
        router.register(RouteEntry::new(
            NUM_CUSTOMERS,
            "/accounts/count",
            tenant_header,
            RecordShape::CustomerCount,
        ));
        router.register(RouteEntry::new(
            TOP_CUSTOMERS,
            "/accounts/top",
            tenant_header,
            RecordShape::TopCustomers,
        ));
        router.register(RouteEntry::new(
            OPPORTUNITIES,
            "/opportunities",
            tenant_header,
            RecordShape::Opportunities,
        ));
        router.register(RouteEntry::new(
            CLOSING_OPPORTUNITIES,
            "/opportunities/chances",
            tenant_header,
            RecordShape::ClosingChances,
        ));
        router
    }

    /// Inserts `entry`, returning the route it replaced for the same intent.
    pub fn register(&mut self, entry: RouteEntry) -> Option<RouteEntry> {
        self.routes.insert(entry.intent_name.clone(), entry)
    }

    pub fn resolve(&self, intent_name: Option<&str>) -> Option<&RouteEntry> {
        intent_name.and_then(|name| self.routes.get(name))
    }

    pub fn intent_names(&self) -> Vec<&str> {
        let mut names = self.routes.keys().map(String::as_str).collect::<Vec<_>>();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

pub fn default_router() -> IntentRouter {
    IntentRouter::with_default_routes(DEFAULT_TENANT_HEADER)
}
