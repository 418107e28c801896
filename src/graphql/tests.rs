//! Tests for the graphql module

use super::*;
use crate::error::Error;
use pretty_assertions::assert_eq;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use test_case::test_case;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const QUERY: &str = "{ items(offset: ${OFFSET}, limit: ${LIMIT}) { results { id } total count } }";

#[derive(Debug, Deserialize, PartialEq)]
struct Item {
    id: i64,
}

fn page_body(ids: &[i64], total: i64, count: i64) -> Value {
    let results: Vec<Value> = ids.iter().map(|id| json!({"id": id})).collect();
    json!({"data": {"items": {"results": results, "total": total, "count": count}}})
}

fn request() -> PaginationRequestBuilder {
    PaginationRequest::builder(QUERY)
        .result_keys(["data", "items", "results"])
        .total_keys(["data", "items", "total"])
        .count_keys(["data", "items", "count"])
}

fn client(server: &MockServer) -> GraphqlClient {
    GraphqlClient::new(&format!("{}/graphql", server.uri())).unwrap()
}

/// Mount a response for the page requested at `offset`, expected `times` times
async fn mount_page(server: &MockServer, offset: i64, body: Value, times: u64) {
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_string_contains(format!("offset: {offset},")))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(times)
        .mount(server)
        .await;
}

// ============================================================================
// Client Construction Tests
// ============================================================================

#[test]
fn test_client_builder() {
    let client = GraphqlClient::builder("https://api.example.com/graphql")
        .bearer("abc")
        .timeout(Duration::from_secs(5))
        .user_agent("tests/1.0")
        .build()
        .unwrap();

    assert_eq!(client.url(), "https://api.example.com/graphql");
    assert!(client.has_authorization());
}

#[test]
fn test_client_empty_authorization_is_none() {
    let client = GraphqlClient::builder("https://api.example.com/graphql")
        .authorization("")
        .build()
        .unwrap();
    assert!(!client.has_authorization());
}

#[test]
fn test_client_invalid_url() {
    let err = GraphqlClient::new("not a url").unwrap_err();
    assert!(matches!(err, Error::InvalidUrl(_)));
}

#[test]
fn test_auth_helpers() {
    assert_eq!(bearer_auth("tok"), "Bearer tok");
    assert_eq!(basic_auth("user", "pass"), "Basic dXNlcjpwYXNz");
}

#[test]
fn test_client_debug_hides_authorization() {
    let client = GraphqlClient::builder("https://api.example.com/graphql")
        .authorization("secret-token")
        .build()
        .unwrap();
    let debug = format!("{client:?}");
    assert!(!debug.contains("secret-token"));
    assert!(debug.contains("has_authorization: true"));
}

// ============================================================================
// Request Tests
// ============================================================================

#[test]
fn test_request_from_yaml() {
    let yaml = r#"
graphql: "{ items(offset: ${OFFSET}) { total } }"
resultKeys: [data, items, results]
totalKeys: data.items.total
countKeys: data.items.count
limit: 50
max: 200
startTime: "2024-01-01T00:00:00Z"
maxPages: 10
"#;
    let request = PaginationRequest::from_yaml(yaml).unwrap();
    assert_eq!(request.result_keys.keys(), ["data", "items", "results"]);
    assert_eq!(request.total_keys.to_string(), "data.items.total");
    assert_eq!(request.limit, 50);
    assert_eq!(request.max_records(), Some(200));
    assert_eq!(request.start_time.as_deref(), Some("2024-01-01T00:00:00Z"));
    assert!(request.end_time.is_none());
    assert_eq!(request.max_pages, Some(10));
    assert_eq!(request.start_offset(), 0);
}

#[test]
fn test_request_from_json() {
    let request = PaginationRequest::from_yaml(
        r#"{"graphql": "{ a }", "resultKeys": ["a"], "totalKeys": ["t"], "countKeys": ["c"]}"#,
    )
    .unwrap();
    assert_eq!(request.limit, 0);
    assert_eq!(request.max_records(), None);
}

#[test]
fn test_request_missing_keys_rejected() {
    assert!(PaginationRequest::from_yaml("graphql: \"{ a }\"").is_err());
}

#[test]
fn test_request_builder_last() {
    let request = request().last(Duration::from_secs(3600)).build();
    assert!(request.start_time.is_some());
    assert!(request.end_time.is_some());
    assert!(request.start_time < request.end_time);
}

#[test_case(0, None ; "zero is unbounded")]
#[test_case(-5, None ; "negative is unbounded")]
#[test_case(10, Some(10) ; "positive caps")]
fn test_max_records(max: i64, expected: Option<i64>) {
    assert_eq!(request().max(max).build().max_records(), expected);
}

// ============================================================================
// State Tests
// ============================================================================

#[test]
fn test_state_advance() {
    let mut state = PaginationState::starting_at(10);
    assert!(state.advance(15, 3));
    assert_eq!(state.offset, 13);
    assert_eq!(state.fetched, 3);
    assert_eq!(state.total, 15);
    assert!(!state.is_complete());

    assert!(state.advance(5, 2));
    assert!(state.is_complete());
}

#[test]
fn test_state_advance_overflow_leaves_state() {
    let mut state = PaginationState::starting_at(i64::MAX - 1);
    assert!(!state.advance(i64::MAX, 2));
    assert_eq!(state, PaginationState::starting_at(i64::MAX - 1));

    let mut state = PaginationState::starting_at(0);
    assert!(state.advance(i64::MAX, i64::MAX));
    assert!(!state.advance(i64::MAX, 1));
    assert_eq!(state.fetched, i64::MAX);
}

// ============================================================================
// Decode Tests
// ============================================================================

#[derive(Debug, Deserialize, PartialEq)]
struct User {
    id: i64,
    name: String,
    #[serde(default)]
    email: Option<String>,
}

#[test]
fn test_decode_exact_shape() {
    let user: User = decode(&json!({"id": 1, "name": "Ada", "email": "a@b.c"})).unwrap();
    assert_eq!(
        user,
        User {
            id: 1,
            name: "Ada".to_string(),
            email: Some("a@b.c".to_string()),
        }
    );
}

#[test]
fn test_decode_optional_defaults() {
    let user: User = decode(&json!({"id": 2, "name": "Bob", "extra": true})).unwrap();
    assert_eq!(user.email, None);
}

#[test]
fn test_decode_missing_required_field() {
    let err = decode::<User>(&json!({"id": 3})).unwrap_err();
    assert!(matches!(err, Error::Conversion(_)));
}

// ============================================================================
// Pagination Tests
// ============================================================================

#[tokio::test]
async fn test_paginate_two_pages() {
    let server = MockServer::start().await;
    mount_page(&server, 0, page_body(&[1, 2], 3, 2), 1).await;
    mount_page(&server, 2, page_body(&[3], 3, 1), 1).await;

    let client = client(&server);
    let request = request().limit(2).build();

    let mut pages = Vec::new();
    let state = client
        .paginate(&request, |page| {
            pages.push((page.offset(), page.len(), page.total(), page.count()));
            Ok(())
        })
        .await
        .unwrap();

    assert_eq!(
        pages,
        vec![(0, 2, Some(3), Some(2)), (2, 1, Some(3), Some(1))]
    );
    assert_eq!(state.offset, 3);
    assert_eq!(state.fetched, 3);
    assert_eq!(state.total, 3);
    assert_eq!(state.pages, 2);
}

#[tokio::test]
async fn test_fetch_all_typed() {
    let server = MockServer::start().await;
    mount_page(&server, 0, page_body(&[1, 2], 3, 2), 1).await;
    mount_page(&server, 2, page_body(&[3], 3, 1), 1).await;

    let items: Vec<Item> = client(&server)
        .fetch_all(&request().build())
        .await
        .unwrap();

    assert_eq!(items, vec![Item { id: 1 }, Item { id: 2 }, Item { id: 3 }]);
}

#[tokio::test]
async fn test_limit_rendered_into_payload() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_string_contains("offset: 0, limit: 25"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(&[1], 1, 1)))
        .expect(1)
        .mount(&server)
        .await;

    let state = client(&server)
        .paginate(&request().limit(25).build(), |_| Ok(()))
        .await
        .unwrap();
    assert_eq!(state.fetched, 1);
}

#[tokio::test]
async fn test_start_offset() {
    let server = MockServer::start().await;
    mount_page(&server, 5, page_body(&[6, 7], 2, 2), 1).await;

    let state = client(&server)
        .paginate(&request().start_offset(5).build(), |_| Ok(()))
        .await
        .unwrap();

    assert_eq!(state.offset, 7);
    assert_eq!(state.fetched, 2);
}

#[tokio::test]
async fn test_max_stops_early() {
    let server = MockServer::start().await;
    mount_page(&server, 0, page_body(&[1, 2], 10, 2), 1).await;
    mount_page(&server, 2, page_body(&[3, 4], 10, 2), 1).await;
    mount_page(&server, 4, page_body(&[5, 6], 10, 2), 0).await;

    let items: Vec<Item> = client(&server)
        .fetch_all(&request().max(3).build())
        .await
        .unwrap();

    assert_eq!(items.len(), 4);
}

#[tokio::test]
async fn test_max_pages_cap() {
    let server = MockServer::start().await;
    mount_page(&server, 0, page_body(&[], 10, 0), 3).await;

    let state = client(&server)
        .paginate(&request().max_pages(3).build(), |_| Ok(()))
        .await
        .unwrap();

    assert_eq!(state.pages, 3);
    assert_eq!(state.fetched, 0);
}

#[tokio::test]
async fn test_graphql_errors_fail() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        0,
        json!({
            "data": {"items": null},
            "errors": [{"message": "field missing"}, {"message": "bad offset"}]
        }),
        1,
    )
    .await;

    let mut calls = 0;
    let err = client(&server)
        .paginate(&request().build(), |_| {
            calls += 1;
            Ok(())
        })
        .await
        .unwrap_err();

    assert_eq!(calls, 0);
    match err {
        Error::GraphQl { message, url, payload } => {
            assert_eq!(message, "field missing.bad offset.");
            assert!(url.ends_with("/graphql"));
            assert!(payload.contains("offset: 0"));
        }
        other => panic!("Expected GraphQl, got {other:?}"),
    }
}

#[tokio::test]
async fn test_empty_page_without_errors_continues() {
    let server = MockServer::start().await;
    mount_page(&server, 0, page_body(&[], 3, 1), 1).await;
    mount_page(&server, 1, page_body(&[2, 3], 3, 2), 1).await;

    let mut calls = 0;
    let state = client(&server)
        .paginate(&request().build(), |page| {
            calls += 1;
            assert_eq!(page.offset(), 1);
            Ok(())
        })
        .await
        .unwrap();

    assert_eq!(calls, 1);
    assert_eq!(state.fetched, 3);
}

#[tokio::test]
async fn test_empty_errors_array_is_warning() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        0,
        json!({"data": {"items": {"results": null, "total": 0, "count": 0}}, "errors": []}),
        1,
    )
    .await;

    let state = client(&server)
        .paginate(&request().build(), |_| Ok(()))
        .await
        .unwrap();
    assert_eq!(state.pages, 1);
}

#[tokio::test]
async fn test_missing_total_fails_after_callback() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        0,
        json!({"data": {"items": {"results": [{"id": 1}], "count": 1}}}),
        1,
    )
    .await;

    let mut seen_total = Some(0);
    let err = client(&server)
        .paginate(&request().build(), |page| {
            seen_total = page.total();
            Ok(())
        })
        .await
        .unwrap_err();

    assert_eq!(seen_total, None);
    assert_eq!(err.to_string(), "cannot get the total from [data.items.total]");
}

#[tokio::test]
async fn test_missing_count_fails() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        0,
        json!({"data": {"items": {"results": [{"id": 1}], "total": 1}}}),
        1,
    )
    .await;

    let err = client(&server)
        .paginate(&request().build(), |_| Ok(()))
        .await
        .unwrap_err();

    match err {
        Error::MissingField { field, path } => {
            assert_eq!(field, "count");
            assert_eq!(path.to_string(), "data.items.count");
        }
        other => panic!("Expected MissingField, got {other:?}"),
    }
}

#[tokio::test]
async fn test_non_numeric_total_fails() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        0,
        json!({"data": {"items": {"results": [{"id": 1}], "total": "many", "count": 1}}}),
        1,
    )
    .await;

    let err = client(&server)
        .paginate(&request().build(), |_| Ok(()))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidNumber { .. }));
}

#[tokio::test]
async fn test_fractional_counts_truncate() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        0,
        json!({"data": {"items": {"results": [{"id": 1}], "total": 1.0, "count": 1.9}}}),
        1,
    )
    .await;

    let state = client(&server)
        .paginate(&request().build(), |_| Ok(()))
        .await
        .unwrap();
    assert_eq!(state.fetched, 1);
    assert_eq!(state.total, 1);
}

#[tokio::test]
async fn test_huge_counts_overflow_fails() {
    let server = MockServer::start().await;
    let body = json!({"data": {"items": {"results": [{"id": 1}], "total": 1e19, "count": 5e18}}});
    mount_page(&server, 0, body.clone(), 1).await;
    mount_page(&server, 5_000_000_000_000_000_000, body, 1).await;

    let mut pages = 0;
    let err = client(&server)
        .paginate(&request().build(), |_| {
            pages += 1;
            Ok(())
        })
        .await
        .unwrap_err();

    assert_eq!(pages, 2);
    match err {
        Error::CountOverflow {
            path,
            offset,
            count,
        } => {
            assert_eq!(path.to_string(), "data.items.count");
            assert_eq!(offset, 5_000_000_000_000_000_000);
            assert_eq!(count, 5_000_000_000_000_000_000);
        }
        other => panic!("Expected CountOverflow, got {other:?}"),
    }
}

#[tokio::test]
async fn test_callback_error_stops_pagination() {
    let server = MockServer::start().await;
    mount_page(&server, 0, page_body(&[1, 2], 4, 2), 1).await;
    mount_page(&server, 2, page_body(&[3, 4], 4, 2), 0).await;

    let err = client(&server)
        .paginate(&request().build(), |_| anyhow::bail!("sink closed"))
        .await
        .unwrap_err();

    assert!(err.is_callback());
    assert_eq!(err.to_string(), "sink closed");
}

#[tokio::test]
async fn test_fetch_all_skips_bad_items() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        0,
        json!({"data": {"items": {
            "results": [{"id": 1}, {"id": "not-a-number"}, {"id": 3}],
            "total": 3,
            "count": 3
        }}}),
        1,
    )
    .await;

    let items: Vec<Item> = fetch_all(&client(&server), &request().build())
        .await
        .unwrap();
    assert_eq!(items, vec![Item { id: 1 }, Item { id: 3 }]);
}

// ============================================================================
// Executor Tests
// ============================================================================

#[tokio::test]
async fn test_execute_sends_authorization() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(header("Authorization", "Bearer test-token"))
        .and(header("Content-Type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"ok\":true}"))
        .expect(1)
        .mount(&server)
        .await;

    let client = GraphqlClient::builder(format!("{}/graphql", server.uri()))
        .bearer("test-token")
        .build()
        .unwrap();

    let body = client.execute("{\"query\":\"{ a }\"}").await.unwrap();
    assert_eq!(&body[..], b"{\"ok\":true}");
}

#[tokio::test]
async fn test_execute_posts_payload_verbatim() {
    let server = MockServer::start().await;
    let payload = "{\"query\":\"{ items }\",\"variables\":{}}";

    Mock::given(method("POST"))
        .and(wiremock::matchers::body_string(payload))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .expect(1)
        .mount(&server)
        .await;

    client(&server).execute(payload).await.unwrap();
}

#[test_case(201 ; "created")]
#[test_case(400 ; "bad request")]
#[test_case(500 ; "server error")]
#[tokio::test]
async fn test_execute_non_200_fails_without_retry(status: u16) {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(status)
                .insert_header("x-request-id", "req-1")
                .set_body_string("upstream said no"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let err = client(&server).execute("{}").await.unwrap_err();
    match err {
        Error::HttpStatus {
            status: got,
            headers,
            body,
            ..
        } => {
            assert_eq!(got, status);
            assert_eq!(headers.get("x-request-id").unwrap(), "req-1");
            assert_eq!(body, "upstream said no");
        }
        other => panic!("Expected HttpStatus, got {other:?}"),
    }
}

#[tokio::test]
async fn test_paginate_invalid_json() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let err = client(&server)
        .paginate(&request().build(), |_| Ok(()))
        .await
        .unwrap_err();

    match err {
        Error::Parse { body, .. } => assert_eq!(body, "<html>oops</html>"),
        other => panic!("Expected Parse, got {other:?}"),
    }
}

#[tokio::test]
async fn test_paginate_non_object_root() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([1, 2])))
        .mount(&server)
        .await;

    let err = client(&server)
        .paginate(&request().build(), |_| Ok(()))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Parse { .. }));
}

#[tokio::test]
async fn test_execute_transport_error() {
    // Bind then drop a listener so the port is known to be closed
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = GraphqlClient::builder(format!("http://{addr}/graphql"))
        .timeout(Duration::from_secs(2))
        .build()
        .unwrap();

    let err = client.execute("{}").await.unwrap_err();
    assert!(matches!(err, Error::Transport { .. }));
}
