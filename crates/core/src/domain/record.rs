use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerCount {
    pub count: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSummary {
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Opportunity {
    pub name: String,
    pub expected_revenue: Decimal,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChancePrediction {
    pub prediction: String,
}

/// Decoded body of a backend resource.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BackendRecord {
    CustomerCount(CustomerCount),
    TopCustomers(Vec<AccountSummary>),
    Opportunities(Vec<Opportunity>),
    ClosingChances(Vec<ChancePrediction>),
}

/// Expected JSON shape of a backend resource. Also selects the formatter used to
/// render the decoded record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RecordShape {
    CustomerCount,
    TopCustomers,
    Opportunities,
    ClosingChances,
}

impl RecordShape {
    pub fn decode(self, body: &[u8]) -> Result<BackendRecord, serde_json::Error> {
        Ok(match self {
            Self::CustomerCount => BackendRecord::CustomerCount(serde_json::from_slice(body)?),
            Self::TopCustomers => BackendRecord::TopCustomers(serde_json::from_slice(body)?),
            Self::Opportunities => BackendRecord::Opportunities(serde_json::from_slice(body)?),
            Self::ClosingChances => BackendRecord::ClosingChances(serde_json::from_slice(body)?),
        })
    }
}

impl BackendRecord {
    pub fn shape(&self) -> RecordShape {
        match self {
            Self::CustomerCount(_) => RecordShape::CustomerCount,
            Self::TopCustomers(_) => RecordShape::TopCustomers,
            Self::Opportunities(_) => RecordShape::Opportunities,
            Self::ClosingChances(_) => RecordShape::ClosingChances,
        }
    }
}
