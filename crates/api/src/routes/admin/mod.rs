//! Admin route handlers. Every handler takes [`RequireAdmin`], which loads
//! the caller's row and checks the role against the database.
//!
//! [`RequireAdmin`]: crate::middleware::auth::RequireAdmin

pub mod orders;
pub mod products;
pub mod revenue;
pub mod users;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the admin routes router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest(
            "/order",
            Router::new()
                .route("/showAllOrders", get(orders::show_all))
                .route("/orderDetails", post(orders::details))
                .route("/updateOrder", post(orders::update)),
        )
        .nest(
            "/product",
            Router::new()
                .route("/createProduct", post(products::create))
                .route("/editProduct", post(products::edit))
                .route("/deleteProduct", post(products::delete)),
        )
        .nest(
            "/user",
            Router::new()
                .route("/showAllUser", get(users::show_all))
                .route("/roleUpdateToAdmin", post(users::toggle_admin_role)),
        )
        .nest(
            "/revenue",
            Router::new()
                .route("/monthRevenue", get(revenue::by_month))
                .route("/categoryRevenue", get(revenue::by_category))
                .route("/topProduct", get(revenue::top_products)),
        )
}
