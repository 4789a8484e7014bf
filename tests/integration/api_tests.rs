//! API integration tests

use std::net::SocketAddr;

use bookshelf_server::{api, config::AppConfig, AppState};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

/// Start a server on an ephemeral port and return its base URL
async fn start_server(seed_sample_data: bool) -> String {
    let mut config = AppConfig::default();
    config.store.seed_sample_data = seed_sample_data;

    let app = api::router(AppState::new(config));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("No local address");
    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .expect("Server error");
    });
    format!("http://{}", addr)
}

async fn create_book(client: &Client, base: &str, body: Value) -> reqwest::Response {
    client
        .post(format!("{}/books", base))
        .json(&body)
        .send()
        .await
        .expect("Failed to send request")
}

#[tokio::test]
async fn test_health_check() {
    let base = start_server(true).await;
    let client = Client::new();

    let response = client
        .get(format!("{}/health", base))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    assert!(response.headers().contains_key("x-request-id"));

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["books"], 2);
}

#[tokio::test]
async fn test_list_seeded_books() {
    let base = start_server(true).await;
    let client = Client::new();

    let response = client
        .get(format!("{}/books", base))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.expect("Failed to parse response");
    let books = body.as_array().expect("Expected an array");
    assert_eq!(books.len(), 2);
    assert_eq!(books[0]["title"], "The Go Programming Language");
    assert_eq!(books[1]["author"], "Robert Martin");
}

#[tokio::test]
async fn test_seeded_store_continues_ids() {
    let base = start_server(true).await;
    let client = Client::new();

    let response = create_book(
        &client,
        &base,
        json!({ "title": "A", "author": "B", "published_year": 2020 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["id"], 3);
}

#[tokio::test]
async fn test_book_lifecycle() {
    let base = start_server(false).await;
    let client = Client::new();

    // Create
    let response = create_book(
        &client,
        &base,
        json!({ "title": "A", "author": "B", "published_year": 2020 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(
        created,
        json!({ "id": 1, "title": "A", "author": "B", "published_year": 2020 })
    );

    // Get
    let response = client
        .get(format!("{}/books/1", base))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);
    let fetched: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(fetched, created);

    // Update
    let response = client
        .put(format!("{}/books/1", base))
        .json(&json!({ "title": "C", "author": "D", "published_year": 2021 }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);
    let updated: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(
        updated,
        json!({ "id": 1, "title": "C", "author": "D", "published_year": 2021 })
    );

    // Delete
    let response = client
        .delete(format!("{}/books/1", base))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Book deleted successfully");

    // Gone
    let response = client
        .get(format!("{}/books/1", base))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body, json!({ "error": "Book not found" }));

    let response = client
        .delete(format!("{}/books/1", base))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_validation() {
    let base = start_server(false).await;
    let client = Client::new();

    let cases = [
        (json!({ "title": "", "author": "B", "published_year": 2020 }), "title is required"),
        (json!({ "author": "B", "published_year": 2020 }), "title is required"),
        (json!({ "title": "A", "author": "", "published_year": 2020 }), "author is required"),
        (json!({ "title": "A", "author": "B", "published_year": 0 }), "published year must be positive"),
        (json!({ "title": "A", "author": "B" }), "published year must be positive"),
    ];

    for (payload, message) in cases {
        let response = create_book(&client, &base, payload).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = response.json().await.expect("Failed to parse response");
        assert_eq!(body["error"], message);
    }

    // Nothing reached the store
    let body: Value = client
        .get(format!("{}/books", base))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_malformed_json() {
    let base = start_server(false).await;
    let client = Client::new();

    let response = client
        .post(format!("{}/books", base))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["error"], "Invalid JSON format");

    let response = create_book(
        &client,
        &base,
        json!({ "title": "A", "author": "B", "published_year": "2020" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["error"], "Invalid JSON format");
}

#[tokio::test]
async fn test_json_body_without_json_content_type() {
    let base = start_server(false).await;
    let client = Client::new();
    let payload = r#"{"title":"A","author":"B","published_year":2020}"#;

    // No content type at all
    let response = client
        .post(format!("{}/books", base))
        .body(payload)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["id"], 1);

    for content_type in ["text/plain", "application/x-www-form-urlencoded"] {
        let response = client
            .post(format!("{}/books", base))
            .header("content-type", content_type)
            .body(payload)
            .send()
            .await
            .expect("Failed to send request");
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = client
        .put(format!("{}/books/1", base))
        .header("content-type", "text/plain")
        .body(r#"{"title":"C","author":"D","published_year":2021}"#)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(
        body,
        json!({ "id": 1, "title": "C", "author": "D", "published_year": 2021 })
    );
}

#[tokio::test]
async fn test_null_field_reports_validation_message() {
    let base = start_server(false).await;
    let client = Client::new();

    let response = create_book(
        &client,
        &base,
        json!({ "title": null, "author": "B", "published_year": 2020 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body, json!({ "error": "title is required" }));
}

#[tokio::test]
async fn test_invalid_id() {
    let base = start_server(true).await;
    let client = Client::new();

    let response = client
        .get(format!("{}/books/abc", base))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body, json!({ "error": "Invalid book ID" }));

    let response = client
        .delete(format!("{}/books/1.5", base))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // The id is checked before the body
    let response = client
        .put(format!("{}/books/abc", base))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["error"], "Invalid book ID");

    // Seeded books are untouched
    let body: Value = client
        .get(format!("{}/books", base))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(body.as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn test_update_missing_book() {
    let base = start_server(false).await;
    let client = Client::new();

    let response = client
        .put(format!("{}/books/99", base))
        .json(&json!({ "title": "C", "author": "D", "published_year": 2021 }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["error"], "Book not found");
}

#[tokio::test]
async fn test_concurrent_creates() {
    let base = start_server(false).await;
    let client = Client::new();

    let requests = (0..20).map(|i| {
        let client = client.clone();
        let base = base.clone();
        tokio::spawn(async move {
            let response = create_book(
                &client,
                &base,
                json!({ "title": format!("Book {}", i), "author": "A", "published_year": 2000 }),
            )
            .await;
            assert_eq!(response.status(), StatusCode::CREATED);
            let body: Value = response.json().await.expect("Failed to parse response");
            body["id"].as_i64().expect("No book ID")
        })
    });

    let mut ids = Vec::new();
    for handle in requests.collect::<Vec<_>>() {
        ids.push(handle.await.expect("Task panicked"));
    }
    ids.sort_unstable();
    assert_eq!(ids, (1..=20).collect::<Vec<i64>>());
}

#[tokio::test]
async fn test_openapi_document() {
    let base = start_server(false).await;
    let client = Client::new();

    let response = client
        .get(format!("{}/api-docs/openapi.json", base))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["paths"]["/books/{id}"].is_object());
}
