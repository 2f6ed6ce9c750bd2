//! End-to-end checkout tests.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The API server running (cargo run -p clementine-api)
//!
//! Run with: cargo test -p clementine-integration-tests -- --ignored

#![allow(clippy::unwrap_used)]

use serde_json::{Value, json};

use clementine_integration_tests::{
    add_to_cart, api_base_url, client, create_product, get_cart, get_product, place_order, signup,
};

#[tokio::test]
#[ignore = "Requires running API server and Postgres"]
async fn test_price_snapshot_survives_price_change_through_checkout() {
    let admin = client();
    signup(&admin, "admin").await;
    let customer = client();
    signup(&customer, "customer").await;

    let product_id = create_product(&admin, "Phone", 499.0, 10).await;

    // Customer adds 2 units at 499
    let resp = add_to_cart(&customer, product_id, 2).await;
    assert_eq!(resp.status(), 201);

    // Admin drops the price to 30
    let resp = admin
        .put(format!("{}/api/products/{product_id}", api_base_url()))
        .json(&json!({ "price": 30 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    // Cart still reflects the snapshot: 499 x 2 = 998
    let cart = get_cart(&customer).await;
    let items = cart["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert!((items[0]["priceAtAddition"].as_f64().unwrap() - 499.0).abs() < f64::EPSILON);
    assert!((cart["total"].as_f64().unwrap() - 998.0).abs() < f64::EPSILON);

    // Checkout succeeds at the snapshot total
    let resp = place_order(&customer).await;
    assert_eq!(resp.status(), 201);
    let body: Value = resp.json().await.unwrap();
    assert!((body["data"]["totalAmount"].as_f64().unwrap() - 998.0).abs() < f64::EPSILON);
    assert_eq!(body["data"]["status"], "pending");

    // Stock decreased by 2, cart is empty afterwards
    let product = get_product(&customer, product_id).await;
    assert_eq!(product["stock"].as_i64().unwrap(), 8);

    let cart = get_cart(&customer).await;
    assert!(cart["items"].as_array().unwrap().is_empty());
    assert!(cart["total"].as_f64().unwrap().abs() < f64::EPSILON);

    // The order item carries the purchase-time snapshot
    let resp = customer
        .get(format!("{}/api/orders", api_base_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let orders: Value = resp.json().await.unwrap();
    let order = &orders.as_array().unwrap()[0];
    let item = &order["items"].as_array().unwrap()[0];
    assert!((item["priceAtPurchase"].as_f64().unwrap() - 499.0).abs() < f64::EPSILON);
}

#[tokio::test]
#[ignore = "Requires running API server and Postgres"]
async fn test_empty_cart_rejected() {
    let customer = client();
    signup(&customer, "customer").await;

    let resp = place_order(&customer).await;
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Cart empty");

    // No order was created
    let resp = customer
        .get(format!("{}/api/orders", api_base_url()))
        .send()
        .await
        .unwrap();
    let orders: Value = resp.json().await.unwrap();
    assert!(orders.as_array().unwrap().is_empty());
}

#[tokio::test]
#[ignore = "Requires running API server and Postgres"]
async fn test_insufficient_stock_rolls_back_everything() {
    let admin = client();
    signup(&admin, "admin").await;
    let customer = client();
    signup(&customer, "customer").await;

    let product_id = create_product(&admin, "Limited Widget", 10.0, 3).await;

    // Ask for more than stock allows
    let resp = add_to_cart(&customer, product_id, 5).await;
    assert_eq!(resp.status(), 201);

    let resp = place_order(&customer).await;
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Not enough stock for Limited Widget");

    // Full rollback: stock untouched, cart intact, no order visible
    let product = get_product(&customer, product_id).await;
    assert_eq!(product["stock"].as_i64().unwrap(), 3);

    let cart = get_cart(&customer).await;
    assert_eq!(cart["items"].as_array().unwrap().len(), 1);

    let resp = customer
        .get(format!("{}/api/orders", api_base_url()))
        .send()
        .await
        .unwrap();
    let orders: Value = resp.json().await.unwrap();
    assert!(orders.as_array().unwrap().is_empty());
}

#[tokio::test]
#[ignore = "Requires running API server and Postgres"]
async fn test_stock_conservation_across_sequential_checkouts() {
    let admin = client();
    signup(&admin, "admin").await;

    let initial_stock: i64 = 10;
    let product_id = create_product(&admin, "Conserved Widget", 5.0, initial_stock).await;

    let mut ordered_total: i64 = 0;
    for quantity in [2, 3, 1] {
        let customer = client();
        signup(&customer, "customer").await;

        let resp = add_to_cart(&customer, product_id, quantity).await;
        assert_eq!(resp.status(), 201);
        let resp = place_order(&customer).await;
        assert_eq!(resp.status(), 201);
        ordered_total += quantity;
    }

    // No stock created or lost: remaining + ordered == initial
    let product = get_product(&admin, product_id).await;
    let remaining = product["stock"].as_i64().unwrap();
    assert_eq!(remaining + ordered_total, initial_stock);
}

#[tokio::test]
#[ignore = "Requires running API server and Postgres"]
async fn test_concurrent_checkouts_do_not_oversell() {
    let admin = client();
    signup(&admin, "admin").await;

    // Stock 5, two buyers each want 3: at most one checkout can succeed.
    let product_id = create_product(&admin, "Contended Widget", 20.0, 5).await;

    let buyer_a = client();
    signup(&buyer_a, "customer").await;
    let buyer_b = client();
    signup(&buyer_b, "customer").await;

    assert_eq!(add_to_cart(&buyer_a, product_id, 3).await.status(), 201);
    assert_eq!(add_to_cart(&buyer_b, product_id, 3).await.status(), 201);

    let (resp_a, resp_b) = tokio::join!(place_order(&buyer_a), place_order(&buyer_b));
    let statuses = [resp_a.status().as_u16(), resp_b.status().as_u16()];

    let successes = statuses.iter().filter(|&&s| s == 201).count();
    assert_eq!(successes, 1, "exactly one of the two checkouts may succeed");

    // 5 - 3 = 2 units remain; never negative
    let product = get_product(&admin, product_id).await;
    assert_eq!(product["stock"].as_i64().unwrap(), 2);
}

#[tokio::test]
#[ignore = "Requires running API server and Postgres"]
async fn test_adding_same_product_twice_merges_lines() {
    let admin = client();
    signup(&admin, "admin").await;
    let customer = client();
    signup(&customer, "customer").await;

    let product_id = create_product(&admin, "Mergeable Widget", 7.5, 50).await;

    assert_eq!(add_to_cart(&customer, product_id, 2).await.status(), 201);
    assert_eq!(add_to_cart(&customer, product_id, 3).await.status(), 201);

    let cart = get_cart(&customer).await;
    let items = cart["items"].as_array().unwrap();
    assert_eq!(items.len(), 1, "re-adding must not create a second line");
    assert_eq!(items[0]["quantity"].as_i64().unwrap(), 5);
    assert!((cart["total"].as_f64().unwrap() - 37.5).abs() < f64::EPSILON);
}

#[tokio::test]
#[ignore = "Requires running API server and Postgres"]
async fn test_remove_from_cart_is_owner_scoped() {
    let admin = client();
    signup(&admin, "admin").await;
    let owner = client();
    signup(&owner, "customer").await;
    let stranger = client();
    signup(&stranger, "customer").await;

    let product_id = create_product(&admin, "Removable Widget", 3.0, 10).await;

    let resp = add_to_cart(&owner, product_id, 1).await;
    assert_eq!(resp.status(), 201);
    let body: Value = resp.json().await.unwrap();
    let item_id = body["data"]["id"].as_i64().unwrap();

    // Someone else's item looks like a missing one
    let resp = stranger
        .delete(format!("{}/api/cart/{item_id}", api_base_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);

    // The owner can remove it
    let resp = owner
        .delete(format!("{}/api/cart/{item_id}", api_base_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 204);

    let cart = get_cart(&owner).await;
    assert!(cart["items"].as_array().unwrap().is_empty());
}

#[tokio::test]
#[ignore = "Requires running API server and Postgres"]
async fn test_order_listing_is_role_scoped() {
    let admin = client();
    signup(&admin, "admin").await;
    let customer_a = client();
    let user_a = signup(&customer_a, "customer").await;
    let customer_b = client();
    signup(&customer_b, "customer").await;

    let product_id = create_product(&admin, "Scoped Widget", 12.0, 100).await;

    for buyer in [&customer_a, &customer_b] {
        assert_eq!(add_to_cart(buyer, product_id, 1).await.status(), 201);
        assert_eq!(place_order(buyer).await.status(), 201);
    }

    // Customer A only sees their own order
    let resp = customer_a
        .get(format!("{}/api/orders", api_base_url()))
        .send()
        .await
        .unwrap();
    let orders: Value = resp.json().await.unwrap();
    let orders = orders.as_array().unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0]["userId"], user_a["id"]);

    // The admin sees both (at least)
    let resp = admin
        .get(format!("{}/api/orders", api_base_url()))
        .send()
        .await
        .unwrap();
    let orders: Value = resp.json().await.unwrap();
    assert!(orders.as_array().unwrap().len() >= 2);
}
