//! The full budget export and its monthly rollups.
//!
//! # Design
//! A `Budget` is a read-only snapshot of server state at fetch time. Its
//! cross-reference fields (`account_id`, `category_id`, ...) are foreign keys
//! into the parallel collections on the same budget; nothing checks them, so
//! every lookup fails with `ApiError::NotFound` instead of assuming a match.
//! The budget keeps the `Session` it was fetched with, which lets it create
//! transactions scoped to itself.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::client::YnabClient;
use crate::error::{ApiError, Result};
use crate::session::Session;
use crate::transaction::{
    NewTransaction, ScheduledSubtransaction, ScheduledTransaction, Subtransaction, Transaction,
};
use crate::types::{
    date_format, Account, Category, CategoryGroup, CurrencyFormat, Milliunits, Payee,
    PayeeLocation,
};

/// Return the first item matching `predicate`, or a lookup error naming
/// `entity` and `key`.
pub fn find<'a, T>(
    items: &'a [T],
    entity: &'static str,
    key: &str,
    predicate: impl Fn(&T) -> bool,
) -> Result<&'a T> {
    items
        .iter()
        .find(|item| predicate(item))
        .ok_or_else(|| ApiError::lookup(entity, key))
}

/// Budget totals for one calendar month, with that month's category
/// snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Month {
    /// First day of the month.
    pub month: NaiveDate,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub income: Milliunits,
    #[serde(default)]
    pub budgeted: Milliunits,
    #[serde(default)]
    pub activity: Milliunits,
    #[serde(default)]
    pub to_be_budgeted: Milliunits,
    /// Days between receiving money and spending it.
    #[serde(default)]
    pub age_of_money: Option<u32>,
    #[serde(default)]
    pub deleted: bool,
    #[serde(default)]
    pub categories: Vec<Category>,
}

impl Month {
    pub fn category(&self, category_id: &str) -> Result<&Category> {
        find(&self.categories, "month category", category_id, |c| {
            c.id == category_id
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Budget {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub last_modified_on: Option<DateTime<Utc>>,
    #[serde(with = "date_format")]
    pub date_format: String,
    pub currency_format: CurrencyFormat,
    #[serde(default)]
    pub first_month: Option<NaiveDate>,
    #[serde(default)]
    pub last_month: Option<NaiveDate>,
    #[serde(default)]
    pub accounts: Vec<Account>,
    #[serde(default)]
    pub payees: Vec<Payee>,
    #[serde(default)]
    pub payee_locations: Vec<PayeeLocation>,
    #[serde(default)]
    pub category_groups: Vec<CategoryGroup>,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub months: Vec<Month>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub subtransactions: Vec<Subtransaction>,
    #[serde(default)]
    pub scheduled_transactions: Vec<ScheduledTransaction>,
    #[serde(default)]
    pub scheduled_subtransactions: Vec<ScheduledSubtransaction>,
    #[serde(skip)]
    session: Option<Session>,
}

impl Budget {
    pub(crate) fn attach(mut self, session: &Session) -> Self {
        self.session = Some(session.clone());
        self
    }

    pub fn account(&self, account_id: &str) -> Result<&Account> {
        find(&self.accounts, "account", account_id, |a| a.id == account_id)
    }

    pub fn category(&self, category_id: &str) -> Result<&Category> {
        find(&self.categories, "category", category_id, |c| {
            c.id == category_id
        })
    }

    pub fn category_group(&self, group_id: &str) -> Result<&CategoryGroup> {
        find(&self.category_groups, "category group", group_id, |g| {
            g.id == group_id
        })
    }

    pub fn payee(&self, payee_id: &str) -> Result<&Payee> {
        find(&self.payees, "payee", payee_id, |p| p.id == payee_id)
    }

    pub fn payee_location(&self, location_id: &str) -> Result<&PayeeLocation> {
        find(&self.payee_locations, "payee location", location_id, |l| {
            l.id == location_id
        })
    }

    /// `month` is the first day of the calendar month.
    pub fn month(&self, month: NaiveDate) -> Result<&Month> {
        find(&self.months, "month", &month.to_string(), |m| m.month == month)
    }

    pub fn transaction(&self, transaction_id: &str) -> Result<&Transaction> {
        find(&self.transactions, "transaction", transaction_id, |t| {
            t.id == transaction_id
        })
    }

    pub fn scheduled_transaction(&self, scheduled_id: &str) -> Result<&ScheduledTransaction> {
        find(
            &self.scheduled_transactions,
            "scheduled transaction",
            scheduled_id,
            |t| t.id == scheduled_id,
        )
    }

    /// Entries of the flat subtransaction list that split `transaction_id`.
    pub fn subtransactions_of<'a>(
        &'a self,
        transaction_id: &'a str,
    ) -> impl Iterator<Item = &'a Subtransaction> + 'a {
        self.subtransactions
            .iter()
            .filter(move |s| s.transaction_id == transaction_id)
    }

    pub fn transactions_for_account<'a>(
        &'a self,
        account_id: &'a str,
    ) -> impl Iterator<Item = &'a Transaction> + 'a {
        self.transactions
            .iter()
            .filter(move |t| t.account_id == account_id)
    }

    pub fn categories_in_group<'a>(
        &'a self,
        group_id: &'a str,
    ) -> impl Iterator<Item = &'a Category> + 'a {
        self.categories
            .iter()
            .filter(move |c| c.category_group_id == group_id)
    }

    /// Create transactions in this budget with the session it was fetched
    /// with. The budget itself is not updated; fetch it again to see them.
    pub fn create_transactions(&self, transactions: &[NewTransaction]) -> Result<Vec<Transaction>> {
        let session = self.session.as_ref().ok_or_else(|| {
            ApiError::Authentication(format!("budget '{}' has no session attached", self.id))
        })?;
        YnabClient::from_session(session.clone()).create_transactions(&self.id, transactions)
    }
}
