//! Request builder, response parser and blocking client for the budgeting
//! API.
//!
//! # Design
//! `YnabClient` holds only a `Session`. Each endpoint is split into a
//! `build_*` method that produces an `HttpRequest` and a `parse_*` method
//! that consumes an `HttpResponse`, so the request and parse halves can be
//! tested without a network. The plain method (`current_user`, `budget`, ...)
//! runs both halves around one `Transport` round trip. Nothing is retried
//! and every error propagates to the caller unchanged.

use std::sync::Arc;

use serde::Serialize;

use crate::budget::Budget;
use crate::config::ClientConfig;
use crate::error::{ApiError, Result};
use crate::factory::ResponseFactory;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport};
use crate::session::Session;
use crate::transaction::{NewTransaction, Transaction};
use crate::transport::UreqTransport;
use crate::types::{BudgetSettings, BudgetSummary, User};

#[derive(Serialize)]
struct SaveTransactions<'a> {
    transactions: &'a [NewTransaction],
}

/// Synchronous client for the budgeting API.
#[derive(Debug, Clone)]
pub struct YnabClient {
    session: Session,
}

impl YnabClient {
    /// Client for the public API with the default ureq transport.
    pub fn new(access_token: &str) -> Result<Self> {
        Self::from_config(&ClientConfig::new(access_token))
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Self::with_transport(config, Arc::new(UreqTransport::from_config(config)))
    }

    pub fn with_transport(config: &ClientConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        Ok(Self {
            session: Session::new(config, transport)?,
        })
    }

    pub fn from_session(session: Session) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    // -- current user ------------------------------------------------------

    pub fn build_current_user(&self) -> HttpRequest {
        self.session.request(HttpMethod::Get, "user", None)
    }

    pub fn parse_current_user(&self, response: &HttpResponse) -> Result<User> {
        ResponseFactory::new(&self.session)
            .parse(response)?
            .into_user()
    }

    pub fn current_user(&self) -> Result<User> {
        let response = self.session.send(&self.build_current_user())?;
        self.parse_current_user(&response)
    }

    // -- budget summaries --------------------------------------------------

    pub fn build_budget_summaries(&self) -> HttpRequest {
        self.session.request(HttpMethod::Get, "budgets", None)
    }

    pub fn parse_budget_summaries(&self, response: &HttpResponse) -> Result<Vec<BudgetSummary>> {
        ResponseFactory::new(&self.session)
            .parse(response)?
            .into_budget_summaries()
    }

    pub fn budget_summaries(&self) -> Result<Vec<BudgetSummary>> {
        let response = self.session.send(&self.build_budget_summaries())?;
        self.parse_budget_summaries(&response)
    }

    // -- full budget -------------------------------------------------------

    pub fn build_budget(&self, budget_id: &str) -> HttpRequest {
        self.session
            .request(HttpMethod::Get, &format!("budgets/{budget_id}"), None)
    }

    pub fn parse_budget(&self, budget_id: &str, response: &HttpResponse) -> Result<Budget> {
        ResponseFactory::new(&self.session)
            .for_budget(budget_id)
            .parse(response)?
            .into_budget()
    }

    /// The full export of one budget, ready for lookups and able to create
    /// transactions in itself.
    pub fn budget(&self, budget_id: &str) -> Result<Budget> {
        let response = self.session.send(&self.build_budget(budget_id))?;
        self.parse_budget(budget_id, &response)
    }

    // -- budget settings ---------------------------------------------------

    pub fn build_budget_settings(&self, budget_id: &str) -> HttpRequest {
        self.session
            .request(HttpMethod::Get, &format!("budgets/{budget_id}/settings"), None)
    }

    pub fn parse_budget_settings(
        &self,
        budget_id: &str,
        response: &HttpResponse,
    ) -> Result<BudgetSettings> {
        ResponseFactory::new(&self.session)
            .for_budget(budget_id)
            .parse(response)?
            .into_budget_settings()
    }

    pub fn budget_settings(&self, budget_id: &str) -> Result<BudgetSettings> {
        let response = self.session.send(&self.build_budget_settings(budget_id))?;
        self.parse_budget_settings(budget_id, &response)
    }

    // -- create transactions -----------------------------------------------

    /// Fails with `ApiError::InvalidRequest` for an empty batch.
    pub fn build_create_transactions(
        &self,
        budget_id: &str,
        transactions: &[NewTransaction],
    ) -> Result<HttpRequest> {
        if transactions.is_empty() {
            return Err(ApiError::InvalidRequest(
                "at least one transaction is required".to_string(),
            ));
        }
        let body = serde_json::to_string(&SaveTransactions { transactions })
            .map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(self.session.request(
            HttpMethod::Post,
            &format!("budgets/{budget_id}/transactions"),
            Some(body),
        ))
    }

    /// The server answers with either a single `transaction` or a
    /// `transactions` list. Both are merged here into one `Vec`, a single
    /// transaction becoming a one-element list; `ResponseFactory::parse`
    /// keeps the two shapes apart for callers that need to tell them apart.
    pub fn parse_create_transactions(
        &self,
        budget_id: &str,
        response: &HttpResponse,
    ) -> Result<Vec<Transaction>> {
        ResponseFactory::new(&self.session)
            .for_budget(budget_id)
            .parse(response)?
            .into_transactions()
    }

    /// Post a batch of new transactions. The batch succeeds or fails as a
    /// whole; there is no partial result.
    pub fn create_transactions(
        &self,
        budget_id: &str,
        transactions: &[NewTransaction],
    ) -> Result<Vec<Transaction>> {
        let request = self.build_create_transactions(budget_id, transactions)?;
        let response = self.session.send(&request)?;
        self.parse_create_transactions(budget_id, &response)
    }
}
