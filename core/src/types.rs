//! Domain records for the budgeting API.
//!
//! # Design
//! Every record is built once by strict deserialization of a JSON object and
//! never mutated afterwards. Unknown keys are ignored, `id` fields must be
//! non-empty, optional fields default to `None`, flags to `false` and money
//! to zero. Money is always `Milliunits`.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// One thousandth of a currency unit, the API's integer money unit.
pub type Milliunits = i64;

/// Deserialize an opaque id, rejecting the empty string.
pub(crate) fn non_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    if value.is_empty() {
        return Err(serde::de::Error::custom("id must not be empty"));
    }
    Ok(value)
}

/// Date formats arrive as `{"format": "YYYY-MM-DD"}`; only the inner string
/// is kept.
pub(crate) mod date_format {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize)]
    struct Borrowed<'a> {
        format: &'a str,
    }

    #[derive(Deserialize)]
    struct Owned {
        format: String,
    }

    pub fn serialize<S: Serializer>(format: &str, serializer: S) -> Result<S::Ok, S::Error> {
        Borrowed { format }.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        Owned::deserialize(deserializer).map(|wrapper| wrapper.format)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(deserialize_with = "non_empty")]
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyFormat {
    pub iso_code: String,
    pub example_format: String,
    pub decimal_digits: u32,
    pub decimal_separator: String,
    pub symbol_first: bool,
    pub group_separator: String,
    pub currency_symbol: String,
    pub display_symbol: bool,
}

impl CurrencyFormat {
    /// Render `amount` the way the budget displays money, e.g. `-$1,234.56`.
    ///
    /// Rounds half away from zero when the currency has fewer than three
    /// decimal digits.
    pub fn format_milliunits(&self, amount: Milliunits) -> String {
        let digits = self.decimal_digits.min(3);
        let scale = 10u64.pow(3 - digits);
        let minor = (amount.unsigned_abs() + scale / 2) / scale;
        let factor = 10u64.pow(digits);

        let whole = group_thousands(minor / factor, &self.group_separator);
        let number = if digits > 0 {
            format!(
                "{whole}{}{:0width$}",
                self.decimal_separator,
                minor % factor,
                width = digits as usize
            )
        } else {
            whole
        };

        let sign = if amount < 0 && minor != 0 { "-" } else { "" };
        match (self.display_symbol, self.symbol_first) {
            (false, _) => format!("{sign}{number}"),
            (true, true) => format!("{sign}{}{number}", self.currency_symbol),
            (true, false) => format!("{sign}{number}{}", self.currency_symbol),
        }
    }
}

fn group_thousands(value: u64, separator: &str) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 * separator.len());
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push_str(separator);
        }
        out.push(ch);
    }
    out
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    #[serde(deserialize_with = "non_empty")]
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub account_type: String,
    #[serde(default)]
    pub on_budget: bool,
    #[serde(default)]
    pub closed: bool,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub balance: Milliunits,
    #[serde(default)]
    pub cleared_balance: Milliunits,
    #[serde(default)]
    pub uncleared_balance: Milliunits,
    #[serde(default)]
    pub transfer_payee_id: Option<String>,
    #[serde(default)]
    pub deleted: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payee {
    #[serde(deserialize_with = "non_empty")]
    pub id: String,
    pub name: String,
    /// Set when this payee is the transfer side of an account.
    #[serde(default)]
    pub transfer_account_id: Option<String>,
    #[serde(default)]
    pub deleted: bool,
}

/// Coordinates are kept as the API sends them (decimal strings).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayeeLocation {
    #[serde(deserialize_with = "non_empty")]
    pub id: String,
    pub payee_id: String,
    pub latitude: String,
    pub longitude: String,
    #[serde(default)]
    pub deleted: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryGroup {
    #[serde(deserialize_with = "non_empty")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub deleted: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    #[serde(deserialize_with = "non_empty")]
    pub id: String,
    pub category_group_id: String,
    pub name: String,
    #[serde(default)]
    pub hidden: bool,
    /// Group to restore the category to if it is undeleted.
    #[serde(default)]
    pub original_category_group_id: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub budgeted: Milliunits,
    #[serde(default)]
    pub activity: Milliunits,
    #[serde(default)]
    pub balance: Milliunits,
    #[serde(default)]
    pub goal_type: Option<String>,
    #[serde(default)]
    pub goal_creation_month: Option<NaiveDate>,
    #[serde(default)]
    pub goal_target: Option<Milliunits>,
    #[serde(default)]
    pub goal_target_month: Option<NaiveDate>,
    #[serde(default)]
    pub goal_percentage_complete: Option<u32>,
    #[serde(default)]
    pub deleted: bool,
}

impl Category {
    pub fn has_goal(&self) -> bool {
        self.goal_type.is_some()
    }
}

/// Lightweight budget projection returned by the budget list endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetSummary {
    #[serde(deserialize_with = "non_empty")]
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
}

/// Display settings of one budget. Carries no identity of its own beyond
/// the budget it was fetched for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetSettings {
    #[serde(default)]
    pub budget_id: String,
    #[serde(with = "date_format")]
    pub date_format: String,
    pub currency_format: CurrencyFormat,
}
