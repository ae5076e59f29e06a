//! CRUD endpoint tests over the full router
//!
//! Round-trips each entity through the mock-backed router and checks
//! the business rules: uniqueness conflicts, payload validation,
//! not-found mapping, and resource-level hypermedia links.

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod support;

use axum::http::StatusCode;
use serde_json::json;
use support::{BASE_URL, forty_two_clients, get_json, send, send_json, test_app, test_app_with};

use ledgerbook_data::{MockClientRepository, MockLedgerEntryRepository, MockSaleRepository};

#[tokio::test]
async fn client_round_trip() {
    let app = test_app();

    let (status, created) = send_json(
        &app.router,
        "POST",
        "/clients",
        &json!({
            "name": "Alpha Consulting",
            "taxId": "12345678901",
            "email": "alpha@example.com",
            "password": "s3cret"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_i64().unwrap();
    assert_eq!(created["active"], true);
    assert!(created.get("password").is_none(), "password must not leak");

    let (status, fetched) = get_json(&app.router, &format!("/clients/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["name"], "Alpha Consulting");

    let (status, updated) = send_json(
        &app.router,
        "PUT",
        &format!("/clients/{id}"),
        &json!({
            "name": "Alpha Consulting Ltd",
            "email": "alpha@example.com",
            "active": false
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Alpha Consulting Ltd");
    assert_eq!(updated["active"], false);

    let (status, _) = send(&app.router, "DELETE", &format!("/clients/{id}")).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = get_json(&app.router, &format!("/clients/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn duplicate_tax_id_conflicts() {
    let app = test_app();
    let payload = json!({
        "name": "Alpha",
        "taxId": "12345678901",
        "email": "alpha@example.com",
        "password": "pw"
    });
    let (status, _) = send_json(&app.router, "POST", "/clients", &payload).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send_json(
        &app.router,
        "POST",
        "/clients",
        &json!({
            "name": "Beta",
            "taxId": "12345678901",
            "email": "beta@example.com",
            "password": "pw"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "CONFLICT");
}

#[tokio::test]
async fn updating_to_another_clients_email_conflicts() {
    let app = test_app_with(
        MockClientRepository::with_clients(forty_two_clients()),
        MockLedgerEntryRepository::new(),
        MockSaleRepository::new(),
    );

    let (status, body) = send_json(
        &app.router,
        "PUT",
        "/clients/1",
        &json!({
            "name": "Alpha 01",
            "email": "c02@example.com",
            "active": true
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["message"].as_str().unwrap().contains("email"));
}

#[tokio::test]
async fn blank_name_is_rejected_with_the_field_named() {
    let app = test_app();
    let (status, body) = send_json(
        &app.router,
        "POST",
        "/clients",
        &json!({
            "name": "   ",
            "taxId": "12345678901",
            "email": "alpha@example.com",
            "password": "pw"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "name");
}

#[tokio::test]
async fn implausible_email_is_rejected() {
    let app = test_app();
    let (status, body) = send_json(
        &app.router,
        "POST",
        "/clients",
        &json!({
            "name": "Alpha",
            "taxId": "12345678901",
            "email": "not-an-email",
            "password": "pw"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "email");
}

#[tokio::test]
async fn detail_reads_carry_resource_links() {
    let app = test_app();
    let (_, created) = send_json(
        &app.router,
        "POST",
        "/cost-centers",
        &json!({"name": "Operations"}),
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    let (_, body) = get_json(&app.router, &format!("/cost-centers/{id}")).await;
    let links = body["links"].as_object().unwrap();

    assert_eq!(
        links["self"]["href"],
        format!("{BASE_URL}/cost-centers/{id}")
    );
    assert_eq!(links["update"]["method"], "PUT");
    assert_eq!(links["delete"]["method"], "DELETE");
    assert_eq!(links["collection"]["href"], format!("{BASE_URL}/cost-centers"));
    assert_eq!(
        links["search"]["href"],
        format!("{BASE_URL}/search/cost-centers")
    );
}

#[tokio::test]
async fn list_responses_omit_links() {
    let app = test_app();
    send_json(
        &app.router,
        "POST",
        "/cost-centers",
        &json!({"name": "Operations"}),
    )
    .await;

    let (_, body) = get_json(&app.router, "/cost-centers").await;
    let first = &body.as_array().unwrap()[0];
    assert!(first.get("links").is_none());
}

#[tokio::test]
async fn account_kind_must_be_debit_or_credit() {
    let app = test_app();
    let (status, _) = send_json(
        &app.router,
        "POST",
        "/accounts",
        &json!({"name": "Revenue", "kind": "sideways"}),
    )
    .await;
    // Unknown enum variants are rejected at deserialization
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, body) = send_json(
        &app.router,
        "POST",
        "/accounts",
        &json!({"name": "Revenue", "kind": "credit"}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["kind"], "credit");
}

#[tokio::test]
async fn duplicate_account_name_conflicts() {
    let app = test_app();
    let payload = json!({"name": "Revenue", "kind": "credit"});
    let (status, _) = send_json(&app.router, "POST", "/accounts", &payload).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send_json(&app.router, "POST", "/accounts", &payload).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn ledger_amount_window_is_enforced() {
    let app = test_app();

    for bad_amount in ["0", "-10.00", "1000000.00"] {
        let (status, body) = send_json(
            &app.router,
            "POST",
            "/ledger-entries",
            &json!({
                "amount": bad_amount,
                "accountId": 1,
                "costCenterId": 1
            }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "amount {bad_amount}");
        assert_eq!(body["field"], "amount");
    }

    let (status, created) = send_json(
        &app.router,
        "POST",
        "/ledger-entries",
        &json!({
            "amount": "999999.99",
            "accountId": 1,
            "costCenterId": 1
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["amount"], "999999.99");
}

#[tokio::test]
async fn ledger_update_stamps_updated_at() {
    let app = test_app();
    let (_, created) = send_json(
        &app.router,
        "POST",
        "/ledger-entries",
        &json!({"amount": "10.00", "accountId": 1, "costCenterId": 1}),
    )
    .await;
    let id = created["id"].as_i64().unwrap();
    assert!(created.get("updatedAt").is_none());

    let (status, updated) = send_json(
        &app.router,
        "PUT",
        &format!("/ledger-entries/{id}"),
        &json!({"amount": "12.50", "accountId": 1, "costCenterId": 1}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["amount"], "12.50");
    assert!(updated.get("updatedAt").is_some());
}

#[tokio::test]
async fn sale_requires_positive_references() {
    let app = test_app();
    let (status, body) = send_json(
        &app.router,
        "POST",
        "/sales",
        &json!({"clientId": 0, "ledgerEntryId": 5}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "clientId");
}

#[tokio::test]
async fn deleting_a_missing_resource_is_not_found() {
    let app = test_app();
    for uri in [
        "/clients/999",
        "/accounts/999",
        "/cost-centers/999",
        "/ledger-entries/999",
        "/sales/999",
    ] {
        let (status, _) = send(&app.router, "DELETE", uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "DELETE {uri}");
    }
}

#[tokio::test]
async fn health_reports_the_service_name() {
    let app = test_app();
    let (status, body) = get_json(&app.router, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "ledgerbook-api");
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = test_app();
    let (status, body) = get_json(&app.router, "/openapi.json").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["info"]["title"], "Ledgerbook API");
    assert!(body["paths"].get("/search/clients").is_some());
}
