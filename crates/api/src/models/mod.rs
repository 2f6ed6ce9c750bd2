//! Domain models for the API.
//!
//! These types represent validated domain objects separate from database
//! row types; repositories convert rows into them explicitly.

pub mod cart;
pub mod catalog;
pub mod order;
pub mod session;
pub mod user;

pub use cart::{Cart, CartItem, CartLine, CartProduct};
pub use catalog::{Category, CategoryRef, Product, ProductWithCategory};
pub use order::{Order, OrderItem, OrderWithItems};
pub use session::{CurrentUser, session_keys};
pub use user::User;
