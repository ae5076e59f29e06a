//! Search endpoint tests over the full router
//!
//! Drives the real axum router against the in-memory repositories and
//! checks the paginated-search contract end to end: envelope math,
//! filter conjunction, sort fallback, clamping, and navigation links.

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod support;

use axum::http::StatusCode;
use support::{
    BASE_URL, forty_two_clients, get_json, ledger_entries, sales, test_app, test_app_with,
};

use ledgerbook_data::{MockClientRepository, MockLedgerEntryRepository, MockSaleRepository};

fn seeded_app() -> support::TestApp {
    test_app_with(
        MockClientRepository::with_clients(forty_two_clients()),
        MockLedgerEntryRepository::with_entries(ledger_entries(20)),
        MockSaleRepository::with_sales(sales(12)),
    )
}

#[tokio::test]
async fn first_page_of_forty_two_clients() {
    let app = seeded_app();
    let (status, body) = get_json(&app.router, "/search/clients?page=1&pageSize=10").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"].as_array().unwrap().len(), 10);
    assert_eq!(body["page"], 1);
    assert_eq!(body["pageSize"], 10);
    assert_eq!(body["totalCount"], 42);
    assert_eq!(body["totalPages"], 5);
    assert_eq!(body["hasPreviousPage"], false);
    assert_eq!(body["hasNextPage"], true);
}

#[tokio::test]
async fn last_page_has_the_remainder() {
    let app = seeded_app();
    let (status, body) = get_json(&app.router, "/search/clients?page=5&pageSize=10").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"].as_array().unwrap().len(), 2);
    assert_eq!(body["hasPreviousPage"], true);
    assert_eq!(body["hasNextPage"], false);
}

#[tokio::test]
async fn page_beyond_the_last_is_empty_not_an_error() {
    let app = seeded_app();
    let (status, body) = get_json(&app.router, "/search/clients?page=99&pageSize=10").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"].as_array().unwrap().len(), 0);
    assert_eq!(body["totalCount"], 42);
    assert_eq!(body["hasNextPage"], false);
}

#[tokio::test]
async fn walking_all_pages_covers_every_match_exactly_once() {
    let app = seeded_app();
    let mut seen = Vec::new();

    let (_, first) = get_json(&app.router, "/search/clients?page=1&pageSize=10").await;
    let total_pages = first["totalPages"].as_i64().unwrap();

    for page in 1..=total_pages {
        let (status, body) =
            get_json(&app.router, &format!("/search/clients?page={page}&pageSize=10")).await;
        assert_eq!(status, StatusCode::OK);
        for item in body["items"].as_array().unwrap() {
            seen.push(item["id"].as_i64().unwrap());
        }
    }

    assert_eq!(seen.len() as i64, first["totalCount"].as_i64().unwrap());
    seen.sort_unstable();
    seen.dedup();
    assert_eq!(seen.len(), 42, "pages overlapped or dropped records");
}

#[tokio::test]
async fn name_filter_count_is_independent_of_pagination() {
    let app = seeded_app();
    for uri in [
        "/search/clients?name=Alpha",
        "/search/clients?name=Alpha&page=2&pageSize=1",
        "/search/clients?name=Alpha&pageSize=50",
    ] {
        let (status, body) = get_json(&app.router, uri).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["totalCount"], 3, "unexpected count for {uri}");
    }
}

#[tokio::test]
async fn filters_combine_conjunctively() {
    let app = seeded_app();
    // Clients 5, 10, ... are inactive; none of the Alphas (1-3) are
    let (status, body) = get_json(&app.router, "/search/clients?name=Alpha&active=false").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalCount"], 0);
}

#[tokio::test]
async fn unknown_sort_field_falls_back_to_default() {
    let app = seeded_app();
    let (status, body) = get_json(
        &app.router,
        "/search/clients?sortBy=nonexistent_field&sortOrder=desc",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    // Default is name ascending, so Alpha 01 leads despite sortOrder=desc
    assert_eq!(body["items"][0]["name"], "Alpha 01");
}

#[tokio::test]
async fn recognized_sort_field_honors_direction() {
    let app = seeded_app();
    let (status, body) =
        get_json(&app.router, "/search/clients?sortBy=name&sortOrder=desc").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"][0]["name"], "Client 42");
}

#[tokio::test]
async fn oversized_page_size_is_clamped_to_one_hundred() {
    let app = seeded_app();
    let (status, body) = get_json(&app.router, "/search/clients?pageSize=500").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pageSize"], 100);
    assert_eq!(body["totalPages"], 1);
    assert_eq!(body["items"].as_array().unwrap().len(), 42);
}

#[tokio::test]
async fn negative_page_is_clamped_to_the_first() {
    let app = seeded_app();
    let (status, body) = get_json(&app.router, "/search/clients?page=-4").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["page"], 1);
}

#[tokio::test]
async fn inverted_amount_range_is_a_client_error() {
    let app = seeded_app();
    let (status, body) = get_json(
        &app.router,
        "/search/ledger-entries?amountMin=500.00&amountMax=100.00",
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION");
}

#[tokio::test]
async fn amount_range_bounds_are_inclusive() {
    let app = seeded_app();
    let (status, body) = get_json(
        &app.router,
        "/search/ledger-entries?amountMin=2.00&amountMax=4.00",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalCount"], 3);
}

#[tokio::test]
async fn ledger_entries_default_to_newest_first() {
    let app = seeded_app();
    let (status, body) = get_json(&app.router, "/search/ledger-entries?pageSize=5").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"][0]["id"], 20);
}

#[tokio::test]
async fn sales_filter_by_client() {
    let app = seeded_app();
    let (status, body) = get_json(&app.router, "/search/sales?clientId=2").await;

    assert_eq!(status, StatusCode::OK);
    // Odd-numbered sales (1, 3, ..., 11) belong to client 2
    assert_eq!(body["totalCount"], 6);
}

#[tokio::test]
async fn navigation_links_follow_the_emission_rules() {
    let app = seeded_app();
    let (_, body) = get_json(&app.router, "/search/clients?page=1&pageSize=10").await;

    let links = body["links"].as_object().unwrap();
    assert_eq!(
        links["self"],
        format!("{BASE_URL}/search/clients?page=1&pageSize=10&sortOrder=asc")
    );
    assert_eq!(
        links["next"],
        format!("{BASE_URL}/search/clients?page=2&pageSize=10&sortOrder=asc")
    );
    assert_eq!(
        links["last"],
        format!("{BASE_URL}/search/clients?page=5&pageSize=10&sortOrder=asc")
    );
    assert_eq!(links["create"], format!("{BASE_URL}/clients"));
    assert!(!links.contains_key("first"));
    assert!(!links.contains_key("prev"));

    let (_, body) = get_json(&app.router, "/search/clients?page=5&pageSize=10").await;
    let links = body["links"].as_object().unwrap();
    assert!(links.contains_key("first"));
    assert!(links.contains_key("prev"));
    assert!(!links.contains_key("next"));
    assert!(!links.contains_key("last"));
}

#[tokio::test]
async fn navigation_links_carry_the_filter() {
    let app = seeded_app();
    let (_, body) = get_json(&app.router, "/search/clients?name=Alpha&pageSize=1&page=2").await;

    let links = body["links"].as_object().unwrap();
    for rel in ["self", "first", "prev", "next", "last"] {
        let href = links[rel].as_str().unwrap();
        assert!(href.contains("name=Alpha"), "{rel} lost the filter: {href}");
    }
}

#[tokio::test]
async fn empty_result_set_is_a_well_formed_envelope() {
    let app = test_app();
    let (status, body) = get_json(&app.router, "/search/cost-centers?name=Nothing").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"].as_array().unwrap().len(), 0);
    assert_eq!(body["totalCount"], 0);
    assert_eq!(body["totalPages"], 0);
    assert_eq!(body["hasNextPage"], false);
    let links = body["links"].as_object().unwrap();
    assert!(links.contains_key("self"));
    assert!(links.contains_key("create"));
}

#[tokio::test]
async fn storage_failure_is_a_server_error_not_a_retry() {
    let app = seeded_app();
    app.clients.fail_next("connection reset by peer");

    let (status, body) = get_json(&app.router, "/search/clients").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "DATABASE");

    // The failure was one-shot; the layer above did not retry it away
    let (status, _) = get_json(&app.router, "/search/clients").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn search_responses_echo_a_correlation_id_header() {
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    let app = seeded_app();
    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/search/clients")
                .header("X-Correlation-ID", "00000000-0000-4000-8000-000000000001")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response
            .headers()
            .get("X-Correlation-ID")
            .and_then(|v| v.to_str().ok()),
        Some("00000000-0000-4000-8000-000000000001")
    );
}
