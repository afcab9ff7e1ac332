//! Synchronous typed client for the YNAB budgeting API.
//!
//! # Overview
//! Authenticates with a bearer token, issues one blocking HTTP round trip per
//! operation, and maps the JSON envelope into typed records (`User`,
//! `BudgetSummary`, `Budget`, `BudgetSettings`, `Transaction`) or a typed
//! `ApiError`.
//!
//! # Design
//! - `YnabClient` holds an explicit `Session` (base URL, token, transport);
//!   there is no global state.
//! - Each operation is split into `build_*` (produces request) and `parse_*`
//!   (consumes response), so the I/O boundary is explicit and the `Transport`
//!   trait can be swapped out in tests.
//! - `ResponseFactory` decides the response shape once and returns the closed
//!   `ResponseData` enum.
//! - Records are read-only snapshots; re-fetch to observe server changes.

pub mod budget;
pub mod client;
pub mod config;
pub mod error;
pub mod factory;
pub mod http;
pub mod session;
pub mod transaction;
pub mod transport;
pub mod types;

pub use budget::{Budget, Month};
pub use client::YnabClient;
pub use config::{ClientConfig, DEFAULT_BASE_URL, DEFAULT_MAX_BODY_BYTES};
pub use error::{AccountIssue, ApiError, NotFoundScope, Result};
pub use factory::{RateLimit, ResponseData, ResponseFactory};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport};
pub use session::Session;
pub use transaction::{
    ClearedStatus, NewTransaction, NewTransactionBuilder, ScheduledSubtransaction,
    ScheduledTransaction, Subtransaction, Transaction,
};
pub use transport::UreqTransport;
pub use types::{
    Account, BudgetSettings, BudgetSummary, Category, CategoryGroup, CurrencyFormat, Milliunits,
    Payee, PayeeLocation, User,
};
