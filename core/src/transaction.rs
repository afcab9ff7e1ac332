//! Posted, split and scheduled transactions, plus the value used to create
//! new ones.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, Result};
use crate::types::{non_empty, Milliunits};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClearedStatus {
    Cleared,
    #[default]
    Uncleared,
    Reconciled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(deserialize_with = "non_empty")]
    pub id: String,
    pub date: NaiveDate,
    pub amount: Milliunits,
    #[serde(default)]
    pub memo: Option<String>,
    #[serde(default)]
    pub cleared: ClearedStatus,
    #[serde(default)]
    pub approved: bool,
    #[serde(default)]
    pub flag_color: Option<String>,
    pub account_id: String,
    #[serde(default)]
    pub account_name: Option<String>,
    #[serde(default)]
    pub payee_id: Option<String>,
    #[serde(default)]
    pub payee_name: Option<String>,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub category_name: Option<String>,
    /// Account on the other side of a transfer.
    #[serde(default)]
    pub transfer_account_id: Option<String>,
    /// The mirrored entry in the transfer account.
    #[serde(default)]
    pub transfer_transaction_id: Option<String>,
    #[serde(default)]
    pub matched_transaction_id: Option<String>,
    /// Deduplication key for imported transactions.
    #[serde(default)]
    pub import_id: Option<String>,
    #[serde(default)]
    pub deleted: bool,
    #[serde(default)]
    pub subtransactions: Vec<Subtransaction>,
}

impl Transaction {
    pub fn is_split(&self) -> bool {
        !self.subtransactions.is_empty()
    }

    pub fn is_transfer(&self) -> bool {
        self.transfer_account_id.is_some()
    }
}

/// One split portion of a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtransaction {
    #[serde(deserialize_with = "non_empty")]
    pub id: String,
    pub transaction_id: String,
    pub amount: Milliunits,
    #[serde(default)]
    pub memo: Option<String>,
    #[serde(default)]
    pub payee_id: Option<String>,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub transfer_account_id: Option<String>,
    #[serde(default)]
    pub deleted: bool,
}

/// A transaction template that has not been posted yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledTransaction {
    #[serde(deserialize_with = "non_empty")]
    pub id: String,
    pub date_first: NaiveDate,
    pub date_next: NaiveDate,
    /// Recurrence rule such as `never`, `weekly` or `everyOtherMonth`.
    pub frequency: String,
    pub amount: Milliunits,
    #[serde(default)]
    pub memo: Option<String>,
    #[serde(default)]
    pub flag_color: Option<String>,
    pub account_id: String,
    #[serde(default)]
    pub payee_id: Option<String>,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub transfer_account_id: Option<String>,
    #[serde(default)]
    pub deleted: bool,
    #[serde(default)]
    pub subtransactions: Vec<ScheduledSubtransaction>,
}

impl ScheduledTransaction {
    pub fn is_recurring(&self) -> bool {
        self.frequency != "never"
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledSubtransaction {
    #[serde(deserialize_with = "non_empty")]
    pub id: String,
    pub scheduled_transaction_id: String,
    pub amount: Milliunits,
    #[serde(default)]
    pub memo: Option<String>,
    #[serde(default)]
    pub payee_id: Option<String>,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub transfer_account_id: Option<String>,
    #[serde(default)]
    pub deleted: bool,
}

/// A transaction to be created. `account_id`, `date` and `amount` are
/// always present; a value missing any of them cannot be constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewTransaction {
    account_id: String,
    date: NaiveDate,
    amount: Milliunits,
    #[serde(skip_serializing_if = "Option::is_none")]
    payee_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    payee_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    category_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    memo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cleared: Option<ClearedStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    approved: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    flag_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    import_id: Option<String>,
}

impl NewTransaction {
    pub fn new(account_id: impl Into<String>, date: NaiveDate, amount: Milliunits) -> Result<Self> {
        Self::builder()
            .account_id(account_id)
            .date(date)
            .amount(amount)
            .build()
    }

    pub fn builder() -> NewTransactionBuilder {
        NewTransactionBuilder::default()
    }

    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn amount(&self) -> Milliunits {
        self.amount
    }

    pub fn import_id(&self) -> Option<&str> {
        self.import_id.as_deref()
    }
}

#[derive(Debug, Clone, Default)]
pub struct NewTransactionBuilder {
    account_id: Option<String>,
    date: Option<NaiveDate>,
    amount: Option<Milliunits>,
    payee_id: Option<String>,
    payee_name: Option<String>,
    category_id: Option<String>,
    memo: Option<String>,
    cleared: Option<ClearedStatus>,
    approved: Option<bool>,
    flag_color: Option<String>,
    import_id: Option<String>,
}

impl NewTransactionBuilder {
    pub fn account_id(mut self, account_id: impl Into<String>) -> Self {
        self.account_id = Some(account_id.into());
        self
    }

    pub fn date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn amount(mut self, amount: Milliunits) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn payee_id(mut self, payee_id: impl Into<String>) -> Self {
        self.payee_id = Some(payee_id.into());
        self
    }

    /// Payee to match or create by name when no `payee_id` is given.
    pub fn payee_name(mut self, payee_name: impl Into<String>) -> Self {
        self.payee_name = Some(payee_name.into());
        self
    }

    pub fn category_id(mut self, category_id: impl Into<String>) -> Self {
        self.category_id = Some(category_id.into());
        self
    }

    pub fn memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = Some(memo.into());
        self
    }

    pub fn cleared(mut self, cleared: ClearedStatus) -> Self {
        self.cleared = Some(cleared);
        self
    }

    pub fn approved(mut self, approved: bool) -> Self {
        self.approved = Some(approved);
        self
    }

    pub fn flag_color(mut self, flag_color: impl Into<String>) -> Self {
        self.flag_color = Some(flag_color.into());
        self
    }

    pub fn import_id(mut self, import_id: impl Into<String>) -> Self {
        self.import_id = Some(import_id.into());
        self
    }

    pub fn build(self) -> Result<NewTransaction> {
        let account_id = self
            .account_id
            .filter(|id| !id.is_empty())
            .ok_or(ApiError::Validation { field: "account_id" })?;
        let date = self.date.ok_or(ApiError::Validation { field: "date" })?;
        let amount = self.amount.ok_or(ApiError::Validation { field: "amount" })?;
        Ok(NewTransaction {
            account_id,
            date,
            amount,
            payee_id: self.payee_id,
            payee_name: self.payee_name,
            category_id: self.category_id,
            memo: self.memo,
            cleared: self.cleared,
            approved: self.approved,
            flag_color: self.flag_color,
            import_id: self.import_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::types::fixtures::assert_round_trip;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn split_transaction_builds_nested_subtransactions() {
        let tx: Transaction = serde_json::from_value(json!({
            "id": "tx-1",
            "date": "2024-03-02",
            "amount": -90000,
            "cleared": "cleared",
            "approved": true,
            "account_id": "acc-1",
            "subtransactions": [
                {"id": "sub-1", "transaction_id": "tx-1", "amount": -60000, "category_id": "cat-1"},
                {"id": "sub-2", "transaction_id": "tx-1", "amount": -30000, "category_id": "cat-2"},
            ],
        }))
        .unwrap();
        assert!(tx.is_split());
        assert_eq!(tx.cleared, ClearedStatus::Cleared);
        assert_eq!(tx.subtransactions[1].id, "sub-2");
        assert_eq!(tx.subtransactions.iter().map(|s| s.amount).sum::<i64>(), tx.amount);
    }

    #[test]
    fn unsplit_transaction_defaults() {
        let tx: Transaction = serde_json::from_value(json!({
            "id": "tx-2",
            "date": "2024-03-05",
            "amount": 10,
            "account_id": "acc-1",
        }))
        .unwrap();
        assert!(!tx.is_split());
        assert!(!tx.is_transfer());
        assert_eq!(tx.cleared, ClearedStatus::Uncleared);
        assert!(tx.import_id.is_none());
    }

    #[test]
    fn scheduled_transaction_recurrence() {
        let tx: ScheduledTransaction = serde_json::from_value(json!({
            "id": "st-1",
            "date_first": "2024-01-01",
            "date_next": "2024-04-01",
            "frequency": "monthly",
            "amount": -1500000,
            "account_id": "acc-1",
        }))
        .unwrap();
        assert!(tx.is_recurring());
        assert_eq!(tx.date_next, NaiveDate::from_ymd_opt(2024, 4, 1).unwrap());
    }

    #[test]
    fn builder_requires_account_date_and_amount() {
        let err = NewTransaction::builder().date(day(1)).amount(1).build().unwrap_err();
        assert!(matches!(err, ApiError::Validation { field: "account_id" }));

        let err = NewTransaction::builder().account_id("a").amount(1).build().unwrap_err();
        assert!(matches!(err, ApiError::Validation { field: "date" }));

        let err = NewTransaction::builder().account_id("a").date(day(1)).build().unwrap_err();
        assert!(matches!(err, ApiError::Validation { field: "amount" }));
    }

    #[test]
    fn new_rejects_empty_account_id() {
        let err = NewTransaction::new("", day(1), 100).unwrap_err();
        assert!(matches!(err, ApiError::Validation { field: "account_id" }));
    }

    #[test]
    fn serialization_omits_absent_fields() {
        let tx = NewTransaction::builder()
            .account_id("acc-1")
            .date(day(9))
            .amount(-4200)
            .memo("coffee")
            .cleared(ClearedStatus::Cleared)
            .build()
            .unwrap();
        assert_eq!(
            serde_json::to_value(&tx).unwrap(),
            json!({
                "account_id": "acc-1",
                "date": "2024-03-09",
                "amount": -4200,
                "memo": "coffee",
                "cleared": "cleared",
            })
        );
    }

    #[test]
    fn transaction_round_trip() {
        assert_round_trip::<Transaction>(json!({
            "id": "tx-1",
            "date": "2024-03-02",
            "amount": -90000,
            "memo": "weekly shop",
            "cleared": "reconciled",
            "approved": true,
            "flag_color": "red",
            "account_id": "acc-1",
            "account_name": "Checking",
            "payee_id": "payee-1",
            "payee_name": "Corner Grocer",
            "category_id": "cat-1",
            "category_name": "Groceries",
            "transfer_account_id": "acc-2",
            "transfer_transaction_id": "tx-2",
            "matched_transaction_id": "tx-9",
            "import_id": "YNAB:-90000:2024-03-02:1",
            "deleted": true,
            "subtransactions": [{
                "id": "sub-1",
                "transaction_id": "tx-1",
                "amount": -90000,
                "memo": "bread",
                "payee_id": "payee-1",
                "category_id": "cat-1",
                "transfer_account_id": "acc-2",
                "deleted": true,
            }],
        }));
    }

    #[test]
    fn scheduled_transaction_round_trip() {
        assert_round_trip::<ScheduledTransaction>(json!({
            "id": "st-1",
            "date_first": "2024-01-01",
            "date_next": "2024-04-01",
            "frequency": "monthly",
            "amount": -1200000,
            "memo": "rent",
            "flag_color": "blue",
            "account_id": "acc-1",
            "payee_id": "payee-1",
            "category_id": "cat-1",
            "transfer_account_id": "acc-2",
            "deleted": true,
            "subtransactions": [{
                "id": "ss-1",
                "scheduled_transaction_id": "st-1",
                "amount": -600000,
                "memo": "half",
                "payee_id": "payee-1",
                "category_id": "cat-1",
                "transfer_account_id": "acc-2",
                "deleted": true,
            }],
        }));
    }
}
