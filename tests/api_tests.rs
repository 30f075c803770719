//! API integration tests
//!
//! These run against a live server with a clean database:
//! `cargo test -- --ignored`

use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";

/// Register a throwaway user and return its credentials
async fn register_user(client: &Client) -> (String, String) {
    let suffix = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let username = format!("user{}", suffix);
    let password = "s3cret".to_string();

    let response = client
        .post(format!("{}/users", BASE_URL))
        .json(&json!({
            "username": username,
            "password": password,
            "email": format!("{}@example.org", username),
        }))
        .send()
        .await
        .expect("Failed to register user");
    assert_eq!(response.status(), 201);

    (username, password)
}

/// Register a user and obtain a bearer token for it
async fn get_auth_token(client: &Client) -> String {
    let (username, password) = register_user(client).await;

    let response = client
        .post(format!("{}/auth/token", BASE_URL))
        .json(&json!({
            "username": username,
            "password": password,
        }))
        .send()
        .await
        .expect("Failed to send token request");

    let body: Value = response.json().await.expect("Failed to parse token response");
    body["token"].as_str().expect("No token in response").to_string()
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_readiness_check_reaches_database() {
    let client = Client::new();

    let response = client
        .get(format!("{}/ready", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    // With the database up this must be 200/"ready"; a 503 here means
    // the round-trip query failed
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
#[ignore]
async fn test_token_issue_and_reuse() {
    let client = Client::new();
    let (username, password) = register_user(&client).await;

    let first: Value = client
        .post(format!("{}/auth/token", BASE_URL))
        .json(&json!({ "username": username, "password": password }))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    assert!(first["token"].is_string());
    assert_eq!(first["token_type"], "Bearer");

    // A token with plenty of validity left is returned unchanged
    let second: Value = client
        .post(format!("{}/auth/token", BASE_URL))
        .json(&json!({ "username": username, "password": password }))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    assert_eq!(first["token"], second["token"]);
    assert_eq!(first["expires_at"], second["expires_at"]);
}

#[tokio::test]
#[ignore]
async fn test_token_invalid_credentials() {
    let client = Client::new();
    let (username, _) = register_user(&client).await;

    let response = client
        .post(format!("{}/auth/token", BASE_URL))
        .json(&json!({ "username": username, "password": "wrong" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_revoked_token_is_rejected() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let response = client
        .delete(format!("{}/auth/token", BASE_URL))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send revoke request");
    assert_eq!(response.status(), 204);

    let response = client
        .get(format!("{}/auth/me", BASE_URL))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_unknown_token_is_rejected() {
    let client = Client::new();

    let response = client
        .get(format!("{}/auth/me", BASE_URL))
        .bearer_auth("bm90LWEtcmVhbC10b2tlbi1hdC1hbGw=")
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_missing_token_is_rejected() {
    let client = Client::new();

    let response = client
        .get(format!("{}/books", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_author_crud() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let suffix = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let name = format!("Ursula K. Le Guin {}", suffix);

    let created: Value = client
        .post(format!("{}/authors", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({ "name": name }))
        .send()
        .await
        .expect("Failed to create author")
        .json()
        .await
        .expect("Failed to parse response");

    let author_id = created["id"].as_i64().expect("No author id");

    // Duplicate name conflicts
    let response = client
        .post(format!("{}/authors", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({ "name": name }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 409);

    let fetched: Value = client
        .get(format!("{}/authors/{}", BASE_URL, author_id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to fetch author")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(fetched["name"], created["name"]);
}

#[tokio::test]
#[ignore]
async fn test_borrow_lifecycle() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let suffix = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();

    let author: Value = client
        .post(format!("{}/authors", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({ "name": format!("Author {}", suffix) }))
        .send()
        .await
        .expect("Failed to create author")
        .json()
        .await
        .expect("Failed to parse response");

    let book: Value = client
        .post(format!("{}/books", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({
            "name": "The Dispossessed",
            "isbn": format!("{:013}", suffix % 10_000_000_000_000),
            "author_id": author["id"],
        }))
        .send()
        .await
        .expect("Failed to create book")
        .json()
        .await
        .expect("Failed to parse response");

    let me: Value = client
        .get(format!("{}/auth/me", BASE_URL))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to fetch identity")
        .json()
        .await
        .expect("Failed to parse response");

    // Issue the book
    let borrow: Value = client
        .post(format!("{}/borrows", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({ "book_id": book["id"], "user_id": me["id"] }))
        .send()
        .await
        .expect("Failed to create borrow")
        .json()
        .await
        .expect("Failed to parse response");

    assert!(borrow["return_date"].is_null());
    // Issued today, so no cost has accrued yet
    assert_eq!(borrow["cost"], 0);

    // The same book cannot be issued twice while open
    let response = client
        .post(format!("{}/borrows", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({ "book_id": book["id"], "user_id": me["id"] }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 422);

    // Return it
    let returned: Value = client
        .post(format!("{}/borrows/{}/return", BASE_URL, borrow["id"]))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to return borrow")
        .json()
        .await
        .expect("Failed to parse response");
    assert!(returned["return_date"].is_string());

    // Returning twice is a business-rule violation
    let response = client
        .post(format!("{}/borrows/{}/return", BASE_URL, borrow["id"]))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 422);
}

#[tokio::test]
#[ignore]
async fn test_future_issue_date_rejected() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let suffix = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();

    // The book must exist, so the failure below can only be the date check
    let author: Value = client
        .post(format!("{}/authors", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({ "name": format!("Author {}", suffix) }))
        .send()
        .await
        .expect("Failed to create author")
        .json()
        .await
        .expect("Failed to parse response");

    let book: Value = client
        .post(format!("{}/books", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({
            "name": "Always Coming Home",
            "isbn": format!("{:013}", suffix % 10_000_000_000_000),
            "author_id": author["id"],
        }))
        .send()
        .await
        .expect("Failed to create book")
        .json()
        .await
        .expect("Failed to parse response");

    let me: Value = client
        .get(format!("{}/auth/me", BASE_URL))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to fetch identity")
        .json()
        .await
        .expect("Failed to parse response");

    let response = client
        .post(format!("{}/borrows", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({
            "book_id": book["id"],
            "user_id": me["id"],
            "issue_date": "2999-01-01",
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}
