use serde_json::{json, Value};

pub const DEMO_BUDGET_ID: &str = "demo-budget";
pub const CHECKING_ACCOUNT_ID: &str = "acc-checking";
pub const SAVINGS_ACCOUNT_ID: &str = "acc-savings";

fn currency_format() -> Value {
    json!({
        "iso_code": "USD",
        "example_format": "123,456.78",
        "decimal_digits": 2,
        "decimal_separator": ".",
        "symbol_first": true,
        "group_separator": ",",
        "currency_symbol": "$",
        "display_symbol": true
    })
}

/// The budget every fresh server starts with.
pub fn demo_budget() -> Value {
    json!({
        "id": DEMO_BUDGET_ID,
        "name": "Demo Budget",
        "last_modified_on": "2024-03-10T08:30:00+00:00",
        "first_month": "2024-02-01",
        "last_month": "2024-03-01",
        "date_format": {"format": "MM/DD/YYYY"},
        "currency_format": currency_format(),
        "accounts": [
            {"id": CHECKING_ACCOUNT_ID, "name": "Checking", "type": "checking", "on_budget": true,
             "closed": false, "note": null, "balance": 1500000, "cleared_balance": 1400000,
             "uncleared_balance": 100000, "transfer_payee_id": "payee-to-checking", "deleted": false},
            {"id": SAVINGS_ACCOUNT_ID, "name": "Savings", "type": "savings", "on_budget": true,
             "closed": false, "note": "rainy day", "balance": 5000000, "cleared_balance": 5000000,
             "uncleared_balance": 0, "transfer_payee_id": "payee-to-savings", "deleted": false}
        ],
        "payees": [
            {"id": "payee-grocer", "name": "Corner Grocer", "transfer_account_id": null, "deleted": false},
            {"id": "payee-to-checking", "name": "Transfer : Checking",
             "transfer_account_id": CHECKING_ACCOUNT_ID, "deleted": false},
            {"id": "payee-to-savings", "name": "Transfer : Savings",
             "transfer_account_id": SAVINGS_ACCOUNT_ID, "deleted": false}
        ],
        "payee_locations": [
            {"id": "loc-grocer", "payee_id": "payee-grocer", "latitude": "52.3702",
             "longitude": "4.8952", "deleted": false}
        ],
        "category_groups": [
            {"id": "grp-everyday", "name": "Everyday Expenses", "hidden": false, "deleted": false}
        ],
        "categories": [
            {"id": "cat-groceries", "category_group_id": "grp-everyday", "name": "Groceries",
             "hidden": false, "original_category_group_id": null, "note": null,
             "budgeted": 400000, "activity": -90000, "balance": 310000,
             "goal_type": null, "goal_creation_month": null, "goal_target": 0,
             "goal_target_month": null, "goal_percentage_complete": null, "deleted": false},
            {"id": "cat-vacation", "category_group_id": "grp-everyday", "name": "Vacation",
             "hidden": false, "original_category_group_id": null, "note": "summer",
             "budgeted": 100000, "activity": 0, "balance": 600000,
             "goal_type": "TBD", "goal_creation_month": "2024-01-01", "goal_target": 1200000,
             "goal_target_month": "2024-07-01", "goal_percentage_complete": 50, "deleted": false}
        ],
        "months": [
            {"month": "2024-03-01", "note": null, "income": 3000000, "budgeted": 500000,
             "activity": -90000, "to_be_budgeted": 2500000, "age_of_money": 21, "deleted": false,
             "categories": [
                 {"id": "cat-groceries", "category_group_id": "grp-everyday", "name": "Groceries",
                  "hidden": false, "budgeted": 400000, "activity": -90000, "balance": 310000,
                  "deleted": false}
             ]}
        ],
        "transactions": [
            {"id": "tx-groceries", "date": "2024-03-02", "amount": -90000, "memo": "weekly shop",
             "cleared": "cleared", "approved": true, "flag_color": null,
             "account_id": CHECKING_ACCOUNT_ID, "payee_id": "payee-grocer",
             "category_id": null, "transfer_account_id": null, "transfer_transaction_id": null,
             "matched_transaction_id": null, "import_id": "YNAB:-90000:2024-03-02:1",
             "deleted": false}
        ],
        "subtransactions": [
            {"id": "sub-groceries-1", "transaction_id": "tx-groceries", "amount": -60000,
             "memo": null, "payee_id": null, "category_id": "cat-groceries",
             "transfer_account_id": null, "deleted": false},
            {"id": "sub-groceries-2", "transaction_id": "tx-groceries", "amount": -30000,
             "memo": "cleaning", "payee_id": null, "category_id": "cat-vacation",
             "transfer_account_id": null, "deleted": false}
        ],
        "scheduled_transactions": [
            {"id": "st-rent", "date_first": "2024-01-01", "date_next": "2024-04-01",
             "frequency": "monthly", "amount": -1200000, "memo": "rent", "flag_color": "red",
             "account_id": CHECKING_ACCOUNT_ID, "payee_id": null, "category_id": null,
             "transfer_account_id": null, "deleted": false}
        ],
        "scheduled_subtransactions": []
    })
}
