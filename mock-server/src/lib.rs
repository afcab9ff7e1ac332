//! In-memory stand-in for the budgeting API.
//!
//! Serves the same `{"data": ...}` / `{"error": ...}` envelopes as the real
//! service under `/v1`, guarded by a bearer token.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub mod seed;

pub const MOCK_ACCESS_TOKEN: &str = "mock-token";
pub const MOCK_USER_ID: &str = "mock-user";

/// A transaction as posted by the client.
#[derive(Debug, Deserialize)]
pub struct SaveTransaction {
    pub account_id: String,
    pub date: String,
    pub amount: i64,
    pub payee_id: Option<String>,
    pub payee_name: Option<String>,
    pub category_id: Option<String>,
    pub memo: Option<String>,
    pub cleared: Option<String>,
    pub approved: Option<bool>,
    pub flag_color: Option<String>,
    pub import_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SaveTransactions {
    pub transactions: Vec<SaveTransaction>,
}

#[derive(Debug)]
pub struct Store {
    pub budgets: Vec<Value>,
    pub server_knowledge: u64,
}

pub type Db = Arc<RwLock<Store>>;

#[derive(Clone)]
struct AppState {
    token: Arc<str>,
    db: Db,
}

pub fn app() -> Router {
    app_with_token(MOCK_ACCESS_TOKEN)
}

pub fn app_with_token(token: &str) -> Router {
    let state = AppState {
        token: Arc::from(token),
        db: Arc::new(RwLock::new(Store {
            budgets: vec![seed::demo_budget()],
            server_knowledge: 1,
        })),
    };
    let api = Router::new()
        .route("/user", get(current_user))
        .route("/budgets", get(list_budgets))
        .route("/budgets/{id}", get(get_budget))
        .route("/budgets/{id}/settings", get(get_settings))
        .route("/budgets/{id}/transactions", post(create_transactions))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_bearer))
        .with_state(state);
    Router::new().nest("/v1", api).fallback(unknown_route)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

pub fn error_response(status: StatusCode, name: &str, detail: &str) -> Response {
    let body = json!({"error": {"id": status.as_u16().to_string(), "name": name, "detail": detail}});
    (status, Json(body)).into_response()
}

async fn require_bearer(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let expected = format!("Bearer {}", state.token);
    let authorized = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value == expected);
    if !authorized {
        return error_response(StatusCode::UNAUTHORIZED, "unauthorized", "Unauthorized");
    }
    next.run(request).await
}

async fn unknown_route() -> Response {
    error_response(StatusCode::NOT_FOUND, "not_found", "URI not found")
}

fn budget_not_found() -> Response {
    error_response(StatusCode::NOT_FOUND, "resource_not_found", "Resource not found")
}

fn bad_request(detail: &str) -> Response {
    error_response(StatusCode::BAD_REQUEST, "bad_request", detail)
}

fn find_budget<'a>(store: &'a Store, id: &str) -> Option<&'a Value> {
    store.budgets.iter().find(|b| b["id"] == id)
}

async fn current_user() -> Json<Value> {
    Json(json!({"data": {"user": {"id": MOCK_USER_ID}}}))
}

async fn list_budgets(State(state): State<AppState>) -> Json<Value> {
    let store = state.db.read().await;
    let summaries: Vec<Value> = store
        .budgets
        .iter()
        .map(|b| {
            json!({
                "id": b["id"],
                "name": b["name"],
                "last_modified_on": b["last_modified_on"],
                "first_month": b["first_month"],
                "last_month": b["last_month"],
                "date_format": b["date_format"],
                "currency_format": b["currency_format"],
            })
        })
        .collect();
    Json(json!({"data": {"budgets": summaries}}))
}

async fn get_budget(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, Response> {
    let store = state.db.read().await;
    let budget = find_budget(&store, &id).ok_or_else(budget_not_found)?;
    Ok(Json(json!({
        "data": {"budget": budget, "server_knowledge": store.server_knowledge}
    })))
}

async fn get_settings(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, Response> {
    let store = state.db.read().await;
    let budget = find_budget(&store, &id).ok_or_else(budget_not_found)?;
    Ok(Json(json!({
        "data": {"settings": {
            "date_format": budget["date_format"],
            "currency_format": budget["currency_format"],
        }}
    })))
}

async fn create_transactions(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<(StatusCode, Json<Value>), Response> {
    let input: SaveTransactions = serde_json::from_slice(&body)
        .map_err(|e| bad_request(&format!("invalid transactions payload: {e}")))?;
    if input.transactions.is_empty() {
        return Err(bad_request("at least one transaction is required"));
    }

    let mut store = state.db.write().await;
    let budget = store
        .budgets
        .iter_mut()
        .find(|b| b["id"] == id.as_str())
        .ok_or_else(budget_not_found)?;

    let account_ids: Vec<String> = budget["accounts"]
        .as_array()
        .into_iter()
        .flatten()
        .filter_map(|a| a["id"].as_str().map(str::to_string))
        .collect();
    let mut seen_import_ids: Vec<String> = budget["transactions"]
        .as_array()
        .into_iter()
        .flatten()
        .filter_map(|t| t["import_id"].as_str().map(str::to_string))
        .collect();

    let mut created = Vec::new();
    let mut duplicates = Vec::new();
    for tx in input.transactions {
        if !account_ids.contains(&tx.account_id) {
            return Err(bad_request(&format!("account '{}' does not exist", tx.account_id)));
        }
        if let Some(import_id) = &tx.import_id {
            if seen_import_ids.contains(import_id) {
                duplicates.push(import_id.clone());
                continue;
            }
            seen_import_ids.push(import_id.clone());
        }
        created.push(json!({
            "id": Uuid::new_v4().to_string(),
            "date": tx.date,
            "amount": tx.amount,
            "memo": tx.memo,
            "cleared": tx.cleared.unwrap_or_else(|| "uncleared".to_string()),
            "approved": tx.approved.unwrap_or(false),
            "flag_color": tx.flag_color,
            "account_id": tx.account_id,
            "payee_id": tx.payee_id,
            "payee_name": tx.payee_name,
            "category_id": tx.category_id,
            "transfer_account_id": null,
            "transfer_transaction_id": null,
            "matched_transaction_id": null,
            "import_id": tx.import_id,
            "deleted": false,
            "subtransactions": [],
        }));
    }

    if created.is_empty() {
        return Err(error_response(
            StatusCode::CONFLICT,
            "conflict",
            "every transaction in the batch has an existing import_id",
        ));
    }

    if let Some(transactions) = budget["transactions"].as_array_mut() {
        transactions.extend(created.iter().cloned());
    }
    store.server_knowledge += 1;

    let ids: Vec<Value> = created.iter().map(|t| t["id"].clone()).collect();
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "data": {
                "transaction_ids": ids,
                "transactions": created,
                "duplicate_import_ids": duplicates,
                "server_knowledge": store.server_knowledge,
            }
        })),
    ))
}
