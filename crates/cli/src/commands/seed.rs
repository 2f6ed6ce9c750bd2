//! Database seeding commands.
//!
//! `seed admin` creates an admin account; `seed catalog` loads a small
//! demo catalog for local development.

use rust_decimal::Decimal;

use clementine_api::db::products::NewProduct;
use clementine_api::db::{CategoryRepository, ProductRepository};
use clementine_api::services::{AuthError, AuthService};
use clementine_core::Role;

use super::{CommandError, connect};

/// Create an admin user.
///
/// # Errors
///
/// Returns `CommandError` if the database is unreachable or the account
/// cannot be created.
pub async fn admin(email: &str, password: &str, name: Option<&str>) -> Result<(), CommandError> {
    let pool = connect().await?;

    let auth = AuthService::new(&pool);
    match auth.register(email, password, name, Role::Admin).await {
        Ok(user) => {
            tracing::info!(user_id = %user.id, email = %user.email, "Admin user created");
            Ok(())
        }
        Err(AuthError::UserAlreadyExists) => {
            tracing::warn!(email, "Admin user already exists, nothing to do");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

/// Insert demo categories and products.
///
/// # Errors
///
/// Returns `CommandError` if the database is unreachable or an insert
/// fails.
pub async fn catalog() -> Result<(), CommandError> {
    let pool = connect().await?;

    let categories = CategoryRepository::new(&pool);
    let products = ProductRepository::new(&pool);

    let electronics = categories
        .create("Electronics", Some("Phones, laptops, accessories"))
        .await?;
    let books = categories.create("Books", Some("Paper and ink")).await?;

    let demo = [
        ("Phone", Decimal::new(49900, 2), 25, electronics.id),
        ("Laptop", Decimal::new(129900, 2), 10, electronics.id),
        ("USB-C Cable", Decimal::new(999, 2), 200, electronics.id),
        ("Systems Programming", Decimal::new(4500, 2), 40, books.id),
    ];

    for (name, price, stock, category_id) in demo {
        let product = products
            .create(&NewProduct {
                name: name.to_string(),
                description: None,
                price,
                stock,
                image_url: None,
                category_id: Some(category_id),
            })
            .await?;
        tracing::info!(product_id = %product.id, name, "Seeded product");
    }

    tracing::info!("Demo catalog seeded");
    Ok(())
}
