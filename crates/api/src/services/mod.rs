//! Business logic services for the API.
//!
//! # Services
//!
//! - `auth` - Registration and login (explicit argon2 hashing)
//! - `checkout` - The order placement transaction
//! - `assets` - External asset store uploads for product images

pub mod assets;
pub mod auth;
pub mod checkout;

pub use assets::AssetStore;
pub use auth::{AuthError, AuthService};
pub use checkout::{CheckoutEngine, CheckoutError};
