//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! # Account
//! POST /user/userSignup               - Create an account
//! POST /user/userlogin                - Login (rememberMe extends the session)
//! GET  /user/userLogout               - Logout
//! GET  /user/userProfile              - Current user's profile
//! POST /user/editProfile              - Partial profile update
//! POST /user/forgotPassword           - Email a password-reset link
//! POST /user/resetPassword            - Reset password with a token
//! POST /user/resetPasswordFromProfile - Change password while logged in
//!
//! # Catalog
//! GET  /product/showAllProducts       - Full catalog
//! GET  /product/productDetails/{id}   - One product
//! GET  /product/categoryProducts      - Search by category/name/brand
//! POST /product/rateProduct           - Rate a product (one per user)
//! PATCH /product/editRating           - Edit an existing rating
//! POST /product/showRating            - List a product's ratings
//!
//! # Cart (requires auth)
//! POST /cart/addItemToCart            - Add one unit (increments existing line)
//! POST /cart/deleteItemFromCart       - Remove a line
//! PUT  /cart/updateQuantity           - Set quantity (clamped to stock)
//! GET  /cart/showCart                 - Cart with derived totals
//! GET  /cart/removeItemsAfterOrder    - Clear the cart after checkout
//!
//! # Orders (requires auth)
//! POST /order/placeOrder              - Place an order, all-or-nothing
//! POST /order/orderDetails            - One of the caller's orders
//! GET  /order/showOrder               - The caller's order history
//!
//! # Admin (requires the admin role)
//! GET  /admin/order/showAllOrders     - All orders with customer identity
//! POST /admin/order/orderDetails      - Any order by id
//! POST /admin/order/updateOrder       - Fulfillment update
//! POST /admin/product/createProduct   - Create a catalog entry
//! POST /admin/product/editProduct     - Partial catalog update
//! POST /admin/product/deleteProduct   - Delete a catalog entry
//! GET  /admin/user/showAllUser        - All accounts
//! POST /admin/user/roleUpdateToAdmin  - Toggle an account's admin role
//! GET  /admin/revenue/monthRevenue    - Revenue by calendar month
//! GET  /admin/revenue/categoryRevenue - Revenue by product category
//! GET  /admin/revenue/topProduct      - Five best sellers by units
//! ```

pub mod admin;
pub mod cart;
pub mod orders;
pub mod products;
pub mod users;

use axum::{
    Router,
    routing::{get, patch, post, put},
};

use crate::state::AppState;

/// Create the user/account routes router.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/userSignup", post(users::signup))
        .route("/userlogin", post(users::login))
        .route("/userLogout", get(users::logout))
        .route("/userProfile", get(users::profile))
        .route("/editProfile", post(users::edit_profile))
        .route("/forgotPassword", post(users::forgot_password))
        .route("/resetPassword", post(users::reset_password))
        .route(
            "/resetPasswordFromProfile",
            post(users::reset_password_from_profile),
        )
}

/// Create the public catalog routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/showAllProducts", get(products::show_all))
        .route("/productDetails/{id}", get(products::details))
        .route("/categoryProducts", get(products::by_category))
        .route("/rateProduct", post(products::rate))
        .route("/editRating", patch(products::edit_rating))
        .route("/showRating", post(products::show_ratings))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/addItemToCart", post(cart::add_item))
        .route("/deleteItemFromCart", post(cart::delete_item))
        .route("/updateQuantity", put(cart::update_quantity))
        .route("/showCart", get(cart::show))
        .route("/removeItemsAfterOrder", get(cart::clear_after_order))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/placeOrder", post(orders::place))
        .route("/orderDetails", post(orders::details))
        .route("/showOrder", get(orders::history))
}

/// Create the combined application router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/user", user_routes())
        .nest("/product", product_routes())
        .nest("/cart", cart_routes())
        .nest("/order", order_routes())
        .nest("/admin", admin::routes())
}
