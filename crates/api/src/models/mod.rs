//! Domain models shared between repositories and route handlers.
//!
//! All response-facing structs serialize in camelCase to match the wire
//! format the storefront client expects.

pub mod analytics;
pub mod cart;
pub mod order;
pub mod product;
pub mod rating;
pub mod user;

pub use analytics::{CategoryRevenue, MonthRevenue, TopProduct};
pub use cart::{CartLine, CartView};
pub use order::{Order, OrderItem, OrderWithCustomer, UpdateOrderInput};
pub use product::{CreateProductInput, Product, UpdateProductInput};
pub use rating::{Rating, RatingWithAuthor};
pub use user::{Address, PhoneNumber, UpdateProfileInput, User};
