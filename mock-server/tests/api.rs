use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, seed, MOCK_ACCESS_TOKEN, MOCK_USER_ID};
use serde_json::{json, Value};
use tower::ServiceExt;

async fn body_json(response: axum::response::Response) -> Value {
    let bytes: bytes::Bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn get(uri: &str) -> Request<String> {
    Request::builder()
        .uri(uri)
        .header(http::header::AUTHORIZATION, format!("Bearer {MOCK_ACCESS_TOKEN}"))
        .body(String::new())
        .unwrap()
}

fn post_json(uri: &str, body: &Value) -> Request<String> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(http::header::AUTHORIZATION, format!("Bearer {MOCK_ACCESS_TOKEN}"))
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn transactions_uri() -> String {
    format!("/v1/budgets/{}/transactions", seed::DEMO_BUDGET_ID)
}

// --- auth ---

#[tokio::test]
async fn missing_token_is_unauthorized() {
    let resp = app()
        .oneshot(Request::builder().uri("/v1/user").body(String::new()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(resp).await;
    assert_eq!(body["error"]["name"], "unauthorized");
}

#[tokio::test]
async fn wrong_token_is_unauthorized() {
    let resp = app()
        .oneshot(
            Request::builder()
                .uri("/v1/user")
                .header(http::header::AUTHORIZATION, "Bearer nope")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

// --- reads ---

#[tokio::test]
async fn user_envelope() {
    let resp = app().oneshot(get("/v1/user")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await, json!({"data": {"user": {"id": MOCK_USER_ID}}}));
}

#[tokio::test]
async fn budget_summaries_envelope() {
    let resp = app().oneshot(get("/v1/budgets")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    let budgets = body["data"]["budgets"].as_array().unwrap();
    assert_eq!(budgets.len(), 1);
    assert_eq!(budgets[0]["id"], seed::DEMO_BUDGET_ID);
    assert_eq!(budgets[0]["date_format"]["format"], "MM/DD/YYYY");
    assert!(budgets[0].get("accounts").is_none());
}

#[tokio::test]
async fn budget_and_settings_envelopes() {
    let resp = app()
        .oneshot(get(&format!("/v1/budgets/{}", seed::DEMO_BUDGET_ID)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["data"]["budget"]["name"], "Demo Budget");
    assert!(body["data"]["server_knowledge"].is_u64());

    let resp = app()
        .oneshot(get(&format!("/v1/budgets/{}/settings", seed::DEMO_BUDGET_ID)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["data"]["settings"]["currency_format"]["iso_code"], "USD");
}

#[tokio::test]
async fn unknown_budget_is_resource_not_found() {
    let resp = app().oneshot(get("/v1/budgets/missing")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(resp).await["error"]["name"], "resource_not_found");
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let resp = app().oneshot(get("/v1/accounts")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(resp).await["error"]["name"], "not_found");
}

// --- create ---

#[tokio::test]
async fn empty_batch_is_bad_request() {
    let resp = app()
        .oneshot(post_json(&transactions_uri(), &json!({"transactions": []})))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(resp).await["error"]["name"], "bad_request");
}

#[tokio::test]
async fn malformed_batch_is_bad_request() {
    let resp = app()
        .oneshot(post_json(&transactions_uri(), &json!({"transactions": [{"amount": 1}]})))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_account_is_bad_request() {
    let body = json!({"transactions": [
        {"account_id": "ghost", "date": "2024-03-09", "amount": -100}
    ]});
    let resp = app().oneshot(post_json(&transactions_uri(), &body)).await.unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn all_duplicate_import_ids_conflict() {
    let body = json!({"transactions": [
        {"account_id": seed::CHECKING_ACCOUNT_ID, "date": "2024-03-02", "amount": -90000,
         "import_id": "YNAB:-90000:2024-03-02:1"}
    ]});
    let resp = app().oneshot(post_json(&transactions_uri(), &body)).await.unwrap();

    assert_eq!(resp.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(resp).await["error"]["name"], "conflict");
}

// --- create then read back ---

#[tokio::test]
async fn create_then_fetch_budget() {
    use tower::Service;

    let mut app = app().into_service();

    // create: one new, one duplicate of the seeded import id
    let body = json!({"transactions": [
        {"account_id": seed::CHECKING_ACCOUNT_ID, "date": "2024-03-09", "amount": -4200,
         "memo": "coffee", "import_id": "YNAB:-4200:2024-03-09:1"},
        {"account_id": seed::CHECKING_ACCOUNT_ID, "date": "2024-03-02", "amount": -90000,
         "import_id": "YNAB:-90000:2024-03-02:1"},
    ]});
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(post_json(&transactions_uri(), &body))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created = body_json(resp).await;
    let transactions = created["data"]["transactions"].as_array().unwrap();
    assert_eq!(transactions.len(), 1);
    assert_eq!(transactions[0]["memo"], "coffee");
    assert_eq!(transactions[0]["cleared"], "uncleared");
    assert_eq!(
        created["data"]["duplicate_import_ids"],
        json!(["YNAB:-90000:2024-03-02:1"])
    );
    let new_id = transactions[0]["id"].clone();

    // the budget export now contains it
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get(&format!("/v1/budgets/{}", seed::DEMO_BUDGET_ID)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let budget = body_json(resp).await;
    let ids: Vec<&Value> = budget["data"]["budget"]["transactions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| &t["id"])
        .collect();
    assert_eq!(ids.len(), 2);
    assert!(ids.contains(&&new_id));
    assert_eq!(budget["data"]["server_knowledge"], 2);
}
