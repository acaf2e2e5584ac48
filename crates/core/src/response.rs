//! Natural-language rendering of backend records.
//!
//! Every function here is pure and total: a record that reached this module has
//! already been decoded into the expected shape.

use crate::domain::record::{
    AccountSummary, BackendRecord, ChancePrediction, CustomerCount, Opportunity,
};

pub const API_ERROR_MESSAGE: &str = "Sorry, there was an error with that API call.";

pub const WORKSPACE_MISSING_MESSAGE: &str = "The app has not been configured with a <b>WORKSPACE_ID</b> environment variable. Please refer to the <a href=\"https://github.com/watson-developer-cloud/conversation-simple\">README</a> documentation on how to set this variable. <br>Once a workspace has been defined the intents may be imported from <a href=\"https://github.com/watson-developer-cloud/conversation-simple/blob/master/training/car_workspace.json\">here</a> in order to get a working application.";

/// At most this many closing predictions are read out.
pub const CLOSING_CHANCES_LIMIT: usize = 5;

pub fn render(record: &BackendRecord) -> String {
    match record {
        BackendRecord::CustomerCount(count) => customer_count(count),
        BackendRecord::TopCustomers(accounts) => top_customers(accounts),
        BackendRecord::Opportunities(opportunities) => top_opportunities(opportunities),
        BackendRecord::ClosingChances(predictions) => closing_chances(predictions),
    }
}

pub fn customer_count(record: &CustomerCount) -> String {
    format!("You have {} customers", record.count)
}

pub fn top_customers(accounts: &[AccountSummary]) -> String {
    let names = accounts.iter().map(|account| account.name.as_str()).collect::<Vec<_>>();
    format!("Your top {} customers are {}.", accounts.len(), oxford_join(&names))
}

pub fn top_opportunities(opportunities: &[Opportunity]) -> String {
    let items = opportunities
        .iter()
        .map(|opportunity| {
            format!("{} (${})", opportunity.name, opportunity.expected_revenue.normalize())
        })
        .collect::<Vec<_>>();
    format!("Your top opportunities are {}", oxford_join(&items))
}

pub fn closing_chances(predictions: &[ChancePrediction]) -> String {
    let items = predictions
        .iter()
        .take(CLOSING_CHANCES_LIMIT)
        .map(|prediction| prediction.prediction.as_str())
        .collect::<Vec<_>>();
    format!("Your opportunities with the top chances are {}", oxford_join(&items))
}

/// Joins with `", "`, except that the last two items are separated by `", and "`.
pub fn oxford_join<S: AsRef<str>>(items: &[S]) -> String {
    let mut joined = String::new();
    let last = items.len().saturating_sub(1);

    for (index, item) in items.iter().enumerate() {
        if index > 0 {
            joined.push_str(if index == last { ", and " } else { ", " });
        }
        joined.push_str(item.as_ref());
    }

    joined
}
