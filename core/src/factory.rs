//! Turns one raw response into a typed result or a typed error.
//!
//! # Design
//! The body is decoded once into a `serde_json::Value` and the variant is
//! decided by an ordered key check on the `data` object: `user`, `budgets`,
//! `budget`, `settings`, `transaction`, `transactions`. A top-level `error`
//! object short-circuits that check. Everything downstream works with the
//! closed `ResponseData` enum instead of probing keys again.

use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::budget::Budget;
use crate::error::{ApiError, Result};
use crate::http::HttpResponse;
use crate::session::Session;
use crate::transaction::Transaction;
use crate::types::{BudgetSettings, BudgetSummary, User};

/// Every successful response shape the client understands.
#[derive(Debug, Clone)]
pub enum ResponseData {
    User(User),
    BudgetSummaries(Vec<BudgetSummary>),
    Budget(Box<Budget>),
    BudgetSettings(BudgetSettings),
    Transaction(Box<Transaction>),
    Transactions(Vec<Transaction>),
}

impl ResponseData {
    fn kind(&self) -> &'static str {
        match self {
            ResponseData::User(_) => "user",
            ResponseData::BudgetSummaries(_) => "budget list",
            ResponseData::Budget(_) => "budget",
            ResponseData::BudgetSettings(_) => "budget settings",
            ResponseData::Transaction(_) => "transaction",
            ResponseData::Transactions(_) => "transaction list",
        }
    }

    fn mismatch(self, expected: &str) -> ApiError {
        ApiError::UnrecognizedResponse(format!("expected {expected}, got {}", self.kind()))
    }

    pub fn into_user(self) -> Result<User> {
        match self {
            ResponseData::User(user) => Ok(user),
            other => Err(other.mismatch("user")),
        }
    }

    pub fn into_budget_summaries(self) -> Result<Vec<BudgetSummary>> {
        match self {
            ResponseData::BudgetSummaries(summaries) => Ok(summaries),
            other => Err(other.mismatch("budget list")),
        }
    }

    pub fn into_budget(self) -> Result<Budget> {
        match self {
            ResponseData::Budget(budget) => Ok(*budget),
            other => Err(other.mismatch("budget")),
        }
    }

    pub fn into_budget_settings(self) -> Result<BudgetSettings> {
        match self {
            ResponseData::BudgetSettings(settings) => Ok(settings),
            other => Err(other.mismatch("budget settings")),
        }
    }

    /// Either transaction shape, with a single transaction as a one-element
    /// list.
    pub fn into_transactions(self) -> Result<Vec<Transaction>> {
        match self {
            ResponseData::Transaction(transaction) => Ok(vec![*transaction]),
            ResponseData::Transactions(transactions) => Ok(transactions),
            other => Err(other.mismatch("transaction or transaction list")),
        }
    }
}

/// Usage reported by the `X-Rate-Limit: <used>/<limit>` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimit {
    pub used: u32,
    pub limit: u32,
}

impl RateLimit {
    pub fn from_headers(response: &HttpResponse) -> Option<Self> {
        let (used, limit) = response.header("x-rate-limit")?.split_once('/')?;
        Some(Self {
            used: used.trim().parse().ok()?,
            limit: limit.trim().parse().ok()?,
        })
    }
}

/// Builds typed results from responses.
///
/// The session is attached to every `Budget` produced, and the budget id
/// (when given) fills in budgets and settings whose body does not carry it.
#[derive(Debug, Clone, Copy)]
pub struct ResponseFactory<'a> {
    session: &'a Session,
    budget_id: Option<&'a str>,
}

impl<'a> ResponseFactory<'a> {
    pub fn new(session: &'a Session) -> Self {
        Self {
            session,
            budget_id: None,
        }
    }

    pub fn for_budget(mut self, budget_id: &'a str) -> Self {
        self.budget_id = Some(budget_id);
        self
    }

    pub fn parse(&self, response: &HttpResponse) -> Result<ResponseData> {
        if let Some(rate) = RateLimit::from_headers(response) {
            debug!("rate limit usage {}/{}", rate.used, rate.limit);
        }
        let json: Value = match serde_json::from_str(&response.body) {
            Ok(json) => json,
            Err(_) if !response.is_success() => {
                return Err(ApiError::from_status(response.status, &response.body));
            }
            Err(e) => return Err(ApiError::Deserialization(e.to_string())),
        };
        if !response.is_success() && json.get("error").is_none() && json.get("data").is_none() {
            return Err(ApiError::from_status(response.status, &response.body));
        }
        self.parse_value(json)
    }

    pub fn parse_value(&self, json: Value) -> Result<ResponseData> {
        let Value::Object(mut envelope) = json else {
            return Err(ApiError::UnrecognizedResponse("body is not a JSON object".to_string()));
        };
        if let Some(error) = envelope.remove("error") {
            return Err(error_from_envelope(error));
        }
        let mut data = match envelope.remove("data") {
            Some(Value::Object(data)) => data,
            Some(_) => {
                return Err(ApiError::UnrecognizedResponse("'data' is not an object".to_string()))
            }
            None => return Err(ApiError::UnrecognizedResponse(describe_keys(&envelope))),
        };

        if let Some(user) = data.remove("user") {
            return Ok(ResponseData::User(decode(user)?));
        }
        if let Some(budgets) = data.remove("budgets") {
            return Ok(ResponseData::BudgetSummaries(decode(budgets)?));
        }
        if let Some(budget) = data.remove("budget") {
            let mut budget: Budget = decode(budget)?;
            if budget.id.is_empty() {
                budget.id = self.require_budget_id("budget")?.to_string();
            }
            return Ok(ResponseData::Budget(Box::new(budget.attach(self.session))));
        }
        if let Some(settings) = data.remove("settings") {
            let mut settings: BudgetSettings = decode(settings)?;
            settings.budget_id = self.require_budget_id("settings")?.to_string();
            return Ok(ResponseData::BudgetSettings(settings));
        }
        if let Some(transaction) = data.remove("transaction") {
            return Ok(ResponseData::Transaction(Box::new(decode(transaction)?)));
        }
        if let Some(transactions) = data.remove("transactions") {
            return Ok(ResponseData::Transactions(decode(transactions)?));
        }
        Err(ApiError::UnrecognizedResponse(format!(
            "data {}",
            describe_keys(&data)
        )))
    }

    fn require_budget_id(&self, what: &str) -> Result<&'a str> {
        self.budget_id.ok_or_else(|| {
            ApiError::UnrecognizedResponse(format!("{what} response without a budget id"))
        })
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|e| ApiError::Deserialization(e.to_string()))
}

fn describe_keys(object: &Map<String, Value>) -> String {
    let keys: Vec<&str> = object.keys().map(String::as_str).collect();
    format!("has keys [{}]", keys.join(", "))
}

/// The error kind depends on `name` alone; `id` and `detail` are read
/// leniently and may be absent, null or of any JSON type.
fn error_from_envelope(error: Value) -> ApiError {
    let Some(name) = error.get("name").and_then(Value::as_str) else {
        return ApiError::Unexpected {
            name: "malformed_error".to_string(),
            detail: error.to_string(),
        };
    };
    let detail = lenient_text(error.get("detail"));
    let id = lenient_text(error.get("id"));
    warn!(
        "API error {name} ({}): {detail}",
        if id.is_empty() { "-" } else { id.as_str() }
    );
    ApiError::from_error_name(name, &detail)
}

fn lenient_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
