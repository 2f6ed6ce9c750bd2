//! HTTP route handlers for the API.
//!
//! # Route Structure
//!
//! ```text
//! # Auth
//! POST   /api/auth/signup      - Register (logs the new user in)
//! POST   /api/auth/login       - Login
//! POST   /api/auth/logout      - Logout
//!
//! # Catalog
//! GET    /api/categories       - List categories (admin)
//! POST   /api/categories       - Create category (admin)
//! PUT    /api/categories/{id}  - Update category (admin)
//! DELETE /api/categories/{id}  - Delete category (admin)
//! GET    /api/products         - List products (filters + pagination)
//! POST   /api/products         - Create product (admin)
//! PUT    /api/products/{id}    - Update product (admin)
//! DELETE /api/products/{id}    - Delete product (admin)
//!
//! # Cart
//! GET    /api/cart             - Current user's cart with total
//! POST   /api/cart             - Add a product (increments existing line)
//! DELETE /api/cart/{id}        - Remove a cart line
//!
//! # Orders
//! GET    /api/orders           - Order history (customers: own only)
//! POST   /api/orders           - Place an order from the cart
//! ```

pub mod auth;
pub mod cart;
pub mod categories;
pub mod orders;
pub mod products;

use axum::{
    Router,
    routing::{delete, get, post, put},
};
use serde::Serialize;

use crate::state::AppState;

/// Success envelope used by mutating endpoints: `{message, data}`.
#[derive(Debug, Serialize)]
pub struct ApiMessage<T> {
    pub message: &'static str,
    pub data: T,
}

/// Build the API router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/signup", post(auth::signup))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route(
            "/api/categories",
            get(categories::list).post(categories::create),
        )
        .route(
            "/api/categories/{id}",
            put(categories::update).delete(categories::delete_category),
        )
        .route("/api/products", get(products::list).post(products::create))
        .route(
            "/api/products/{id}",
            put(products::update).delete(products::delete_product),
        )
        .route("/api/cart", get(cart::get_cart).post(cart::add_to_cart))
        .route("/api/cart/{id}", delete(cart::remove_from_cart))
        .route(
            "/api/orders",
            get(orders::list_orders).post(orders::place_order),
        )
}
