//! Shared plumbing for router integration tests
//!
//! Builds the real application router on top of the in-memory mock
//! repositories, and provides small helpers for driving it with
//! `tower::ServiceExt::oneshot` and decoding JSON bodies.

#![allow(clippy::unwrap_used, clippy::expect_used)]
#![allow(dead_code)] // each integration test binary uses a subset

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use chrono::{TimeZone, Utc};
use tower::ServiceExt;

use ledgerbook_api::{AppState, create_router};
use ledgerbook_data::{
    Client, LedgerEntry, MockAccountRepository, MockClientRepository, MockCostCenterRepository,
    MockLedgerEntryRepository, MockSaleRepository, Sale,
};
use rust_decimal::Decimal;

/// Base URL configured into the test state; shows up in HATEOAS links
pub const BASE_URL: &str = "http://api.test";

/// The router plus handles to the mock stores behind it
pub struct TestApp {
    pub router: Router,
    pub clients: MockClientRepository,
    pub accounts: MockAccountRepository,
    pub cost_centers: MockCostCenterRepository,
    pub ledger_entries: MockLedgerEntryRepository,
    pub sales: MockSaleRepository,
}

/// Build an app over empty stores
pub fn test_app() -> TestApp {
    test_app_with(
        MockClientRepository::new(),
        MockLedgerEntryRepository::new(),
        MockSaleRepository::new(),
    )
}

/// Build an app with pre-seeded client/ledger/sale stores
pub fn test_app_with(
    clients: MockClientRepository,
    ledger_entries: MockLedgerEntryRepository,
    sales: MockSaleRepository,
) -> TestApp {
    let accounts = MockAccountRepository::new();
    let cost_centers = MockCostCenterRepository::new();

    let state = AppState::new(
        Arc::new(clients.clone()),
        Arc::new(accounts.clone()),
        Arc::new(cost_centers.clone()),
        Arc::new(ledger_entries.clone()),
        Arc::new(sales.clone()),
        BASE_URL.to_string(),
    );

    TestApp {
        router: create_router(state),
        clients,
        accounts,
        cost_centers,
        ledger_entries,
        sales,
    }
}

/// GET a URI and decode the JSON body (Null for empty bodies)
pub async fn get_json(router: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = router
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    decode(response).await
}

/// Send a JSON body with the given method and decode the response
pub async fn send_json(
    router: &Router,
    method: &str,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    decode(response).await
}

/// Send a bodiless request (DELETE and friends)
pub async fn send(router: &Router, method: &str, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    decode(response).await
}

async fn decode(response: axum::response::Response) -> (StatusCode, serde_json::Value) {
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| serde_json::Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, json)
}

/// 42 clients, 3 of them with "Alpha" in the name, ids 1..=42
pub fn forty_two_clients() -> Vec<Client> {
    (1..=42)
        .map(|i| {
            let name = if i <= 3 {
                format!("Alpha {i:02}")
            } else {
                format!("Client {i:02}")
            };
            Client {
                id: i,
                name,
                tax_id: format!("{i:011}"),
                email: format!("c{i:02}@example.com"),
                password: "pw".to_string(),
                active: i % 5 != 0,
                registered_at: Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
                    + chrono::Duration::days(i64::from(i)),
            }
        })
        .collect()
}

/// Ledger entries with amounts 1.00..=n.00, one per day
pub fn ledger_entries(n: i32) -> Vec<LedgerEntry> {
    (1..=n)
        .map(|i| LedgerEntry {
            id: i,
            amount: Decimal::new(i64::from(i) * 100, 2),
            account_id: 1 + (i % 2),
            cost_center_id: 1,
            created_at: Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()
                + chrono::Duration::days(i64::from(i)),
            updated_at: None,
        })
        .collect()
}

/// Sales alternating between two clients
pub fn sales(n: i32) -> Vec<Sale> {
    (1..=n)
        .map(|i| Sale {
            id: i,
            client_id: 1 + (i % 2),
            ledger_entry_id: i,
            sale_event_id: (i % 3 == 0).then(|| i64::from(i) * 1000),
        })
        .collect()
}
