//! Integration tests for Clementine.
//!
//! # Running Tests
//!
//! ```bash
//! # Start Postgres, migrate, then run the API
//! cargo run -p clementine-cli -- migrate
//! cargo run -p clementine-api &
//!
//! # Run integration tests
//! cargo test -p clementine-integration-tests -- --ignored
//! ```
//!
//! Tests talk to a running server over HTTP and are `#[ignore]`d by
//! default so the workspace test suite stays green without infrastructure.

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::unwrap_used)]

use reqwest::Client;
use serde_json::{Value, json};
use uuid::Uuid;

/// Base URL for the API (configurable via environment).
#[must_use]
pub fn api_base_url() -> String {
    std::env::var("API_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Create an HTTP client with its own cookie jar (i.e., its own session).
///
/// # Panics
///
/// Panics if the client cannot be built.
#[must_use]
pub fn client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

/// Sign up a fresh user with a unique email and leave the client logged in.
///
/// Returns the `user` object from the signup response.
///
/// # Panics
///
/// Panics if the signup request fails.
pub async fn signup(client: &Client, role: &str) -> Value {
    let email = format!("{role}-{}@example.com", Uuid::new_v4());
    let resp = client
        .post(format!("{}/api/auth/signup", api_base_url()))
        .json(&json!({
            "email": email,
            "password": "password123",
            "role": role,
        }))
        .send()
        .await
        .expect("signup request failed");

    assert_eq!(resp.status(), 201, "signup should return 201");
    let body: Value = resp.json().await.expect("signup response not JSON");
    body["user"].clone()
}

/// Create a category as the given (admin) client. Returns its id.
///
/// # Panics
///
/// Panics if the request fails.
pub async fn create_category(admin: &Client, name: &str) -> i64 {
    let resp = admin
        .post(format!("{}/api/categories", api_base_url()))
        .json(&json!({ "name": name }))
        .send()
        .await
        .expect("create category request failed");

    assert_eq!(resp.status(), 201, "create category should return 201");
    let body: Value = resp.json().await.unwrap();
    body["data"]["id"].as_i64().expect("category id missing")
}

/// Create a product as the given (admin) client. Returns its id.
///
/// # Panics
///
/// Panics if the request fails.
pub async fn create_product(admin: &Client, name: &str, price: f64, stock: i64) -> i64 {
    let resp = admin
        .post(format!("{}/api/products", api_base_url()))
        .json(&json!({
            "name": name,
            "price": price,
            "stock": stock,
        }))
        .send()
        .await
        .expect("create product request failed");

    assert_eq!(resp.status(), 201, "create product should return 201");
    let body: Value = resp.json().await.unwrap();
    body["data"]["id"].as_i64().expect("product id missing")
}

/// Fetch a product's current state via the listing endpoint.
///
/// # Panics
///
/// Panics if the request fails or the product is not in the result.
pub async fn get_product(client: &Client, product_id: i64) -> Value {
    let resp = client
        .get(format!("{}/api/products?pageSize=100", api_base_url()))
        .send()
        .await
        .expect("list products request failed");
    assert_eq!(resp.status(), 200);

    let body: Value = resp.json().await.unwrap();
    body["data"]
        .as_array()
        .unwrap()
        .iter()
        .find(|p| p["id"].as_i64() == Some(product_id))
        .cloned()
        .expect("product not found in listing")
}

/// Add a product to the client's cart. Returns the raw response.
///
/// # Panics
///
/// Panics if the request cannot be sent.
pub async fn add_to_cart(client: &Client, product_id: i64, quantity: i64) -> reqwest::Response {
    client
        .post(format!("{}/api/cart", api_base_url()))
        .json(&json!({ "productId": product_id, "quantity": quantity }))
        .send()
        .await
        .expect("add to cart request failed")
}

/// Fetch the client's cart.
///
/// # Panics
///
/// Panics if the request fails.
pub async fn get_cart(client: &Client) -> Value {
    let resp = client
        .get(format!("{}/api/cart", api_base_url()))
        .send()
        .await
        .expect("get cart request failed");
    assert_eq!(resp.status(), 200);
    resp.json().await.unwrap()
}

/// Place an order from the client's cart. Returns the raw response.
///
/// # Panics
///
/// Panics if the request cannot be sent.
pub async fn place_order(client: &Client) -> reqwest::Response {
    client
        .post(format!("{}/api/orders", api_base_url()))
        .send()
        .await
        .expect("place order request failed")
}
