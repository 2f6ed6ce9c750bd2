//! Catalog and auth boundary tests.
//!
//! These tests require a running API server and Postgres; see
//! `checkout_flow.rs` for setup.

#![allow(clippy::unwrap_used)]

use serde_json::{Value, json};
use uuid::Uuid;

use clementine_integration_tests::{api_base_url, client, create_category, create_product, signup};

#[tokio::test]
#[ignore = "Requires running API server and Postgres"]
async fn test_catalog_mutations_are_admin_only() {
    let customer = client();
    signup(&customer, "customer").await;

    let resp = customer
        .post(format!("{}/api/products", api_base_url()))
        .json(&json!({ "name": "Forbidden Widget", "price": 1.0, "stock": 1 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 403);

    let resp = customer
        .post(format!("{}/api/categories", api_base_url()))
        .json(&json!({ "name": format!("cat-{}", Uuid::new_v4()) }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 403);
}

#[tokio::test]
#[ignore = "Requires running API server and Postgres"]
async fn test_unauthenticated_requests_are_rejected() {
    let anonymous = client();

    let resp = anonymous
        .get(format!("{}/api/cart", api_base_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);

    let resp = anonymous
        .post(format!("{}/api/orders", api_base_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);
}

#[tokio::test]
#[ignore = "Requires running API server and Postgres"]
async fn test_product_listing_filters_and_pagination() {
    let admin = client();
    signup(&admin, "admin").await;

    let marker = Uuid::new_v4().simple().to_string();
    let category_id = create_category(&admin, &format!("filter-cat-{marker}")).await;

    // Three products sharing a searchable marker, one in the category
    for (name, price) in [
        (format!("Alpha {marker}"), 10.0),
        (format!("Beta {marker}"), 20.0),
        (format!("Gamma {marker}"), 30.0),
    ] {
        create_product(&admin, &name, price, 5).await;
    }
    let resp = admin
        .post(format!("{}/api/products", api_base_url()))
        .json(&json!({
            "name": format!("Delta {marker}"),
            "price": 40.0,
            "stock": 5,
            "categoryId": category_id,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);

    // Case-insensitive substring search
    let resp = admin
        .get(format!(
            "{}/api/products?search={}",
            api_base_url(),
            marker.to_uppercase()
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["meta"]["total"].as_i64().unwrap(), 4);

    // Inclusive price bounds
    let resp = admin
        .get(format!(
            "{}/api/products?search={marker}&minPrice=20&maxPrice=30",
            api_base_url()
        ))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["meta"]["total"].as_i64().unwrap(), 2);

    // Category filter
    let resp = admin
        .get(format!(
            "{}/api/products?categoryId={category_id}",
            api_base_url()
        ))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["meta"]["total"].as_i64().unwrap(), 1);
    let row = &body["data"].as_array().unwrap()[0];
    assert_eq!(row["category"]["id"].as_i64().unwrap(), category_id);

    // Pagination metadata
    let resp = admin
        .get(format!(
            "{}/api/products?search={marker}&page=1&pageSize=3",
            api_base_url()
        ))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["meta"]["pages"].as_i64().unwrap(), 2);
    assert_eq!(body["data"].as_array().unwrap().len(), 3);

    // Newest-created first
    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert!(names[0].starts_with("Delta"));
}

#[tokio::test]
#[ignore = "Requires running API server and Postgres"]
async fn test_add_to_cart_unknown_product_is_404() {
    let customer = client();
    signup(&customer, "customer").await;

    let resp = customer
        .post(format!("{}/api/cart", api_base_url()))
        .json(&json!({ "productId": 999_999_999, "quantity": 1 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Product not found");
}

#[tokio::test]
#[ignore = "Requires running API server and Postgres"]
async fn test_login_rejects_bad_password() {
    let c = client();
    let user = signup(&c, "customer").await;

    let fresh = client();
    let resp = fresh
        .post(format!("{}/api/auth/login", api_base_url()))
        .json(&json!({ "email": user["email"], "password": "wrong-password" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Invalid credentials");
}
