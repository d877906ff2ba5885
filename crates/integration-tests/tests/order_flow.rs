//! Stock, checkout, and rating invariants against a running server.
//!
//! These tests manage the catalog through the admin API, so on top of
//! `CLOVER_BASE_URL` they need `CLOVER_ADMIN_EMAIL`/`CLOVER_ADMIN_PASSWORD`
//! for an account promoted with `cargo run -p clover-cli -- admin promote`.
//! They skip themselves when any of the three is unset.

#![allow(clippy::unwrap_used, clippy::print_stderr, clippy::indexing_slicing)]

use clover_integration_tests::{TestApi, unique_email};
use serde_json::{Value, json};

const PASSWORD: &str = "a-sturdy-password";

/// Sign up and log in a brand-new customer with its own cookie jar.
async fn fresh_user(prefix: &str) -> TestApi {
    let api = TestApi::from_env().unwrap();
    let email = unique_email(prefix);

    let resp = api
        .client
        .post(api.url("/user/userSignup"))
        .json(&json!({
            "firstName": "Order",
            "lastName": "Tester",
            "email": email,
            "password": PASSWORD,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);

    let resp = api
        .client
        .post(api.url("/user/userlogin"))
        .json(&json!({ "email": email, "password": PASSWORD }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    api
}

/// Store a shipping address, which order placement requires.
async fn add_address(user: &TestApi) {
    let resp = user
        .client
        .post(user.url("/user/editProfile"))
        .json(&json!({
            "address": {
                "city": "Pune",
                "locality": "Baner",
                "state": "MH",
                "country": "India",
                "pincode": "411045",
            }
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
}

/// Create a catalog entry with the given stock, returning its id.
async fn create_product(admin: &TestApi, name: &str, stock: i32, price: &str) -> i64 {
    let resp = admin
        .client
        .post(admin.url("/admin/product/createProduct"))
        .json(&json!({
            "name": name,
            "brand": "Clover Test Goods",
            "price": price,
            "shortDescription": "fixture item",
            "longDescription": "a fixture item for checkout flows",
            "stock": stock,
            "category": "test-fixtures",
            "coverImage": "https://cdn.example/fixture.jpg",
            "otherImages": ["https://cdn.example/fixture-2.jpg"],
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);
    let body: Value = resp.json().await.unwrap();
    body["product"]["id"].as_i64().unwrap()
}

async fn set_stock(admin: &TestApi, product_id: i64, stock: i32) {
    let resp = admin
        .client
        .post(admin.url("/admin/product/editProduct"))
        .json(&json!({ "productId": product_id, "stock": stock }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
}

async fn product_details(api: &TestApi, product_id: i64) -> Value {
    let resp = api
        .client
        .get(api.url(&format!("/product/productDetails/{product_id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    resp.json().await.unwrap()
}

async fn show_cart(user: &TestApi) -> Value {
    let resp = user
        .client
        .get(user.url("/cart/showCart"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    resp.json().await.unwrap()
}

#[tokio::test]
async fn test_adding_same_product_twice_merges_into_one_line() {
    let Some(admin) = TestApi::admin_from_env().await else {
        eprintln!("CLOVER_BASE_URL or admin credentials not set, skipping");
        return;
    };
    let product_id = create_product(&admin, "Merge Mug", 5, "24.99").await;
    let user = fresh_user("merge").await;

    for _ in 0..2 {
        let resp = user
            .client
            .post(user.url("/cart/addItemToCart"))
            .json(&json!({ "productId": product_id }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
    }

    let body = show_cart(&user).await;
    let items = body["cart"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["productId"], json!(product_id));
    assert_eq!(items[0]["quantity"], json!(2));
}

#[tokio::test]
async fn test_quantity_update_clamps_to_available_stock() {
    let Some(admin) = TestApi::admin_from_env().await else {
        eprintln!("CLOVER_BASE_URL or admin credentials not set, skipping");
        return;
    };
    let product_id = create_product(&admin, "Scarce Kettle", 5, "59.00").await;
    let user = fresh_user("clamp").await;

    let resp = user
        .client
        .post(user.url("/cart/addItemToCart"))
        .json(&json!({ "productId": product_id }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let resp = user
        .client
        .put(user.url("/cart/updateQuantity"))
        .json(&json!({ "productId": product_id, "quantity": 999 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["quantity"], json!(5));

    let body = show_cart(&user).await;
    let items = body["cart"]["items"].as_array().unwrap();
    assert_eq!(items[0]["quantity"], json!(5));
}

#[tokio::test]
async fn test_quantity_update_drops_line_when_stock_runs_out() {
    let Some(admin) = TestApi::admin_from_env().await else {
        eprintln!("CLOVER_BASE_URL or admin credentials not set, skipping");
        return;
    };
    let product_id = create_product(&admin, "Vanishing Vase", 5, "35.00").await;
    let user = fresh_user("dropline").await;

    let resp = user
        .client
        .post(user.url("/cart/addItemToCart"))
        .json(&json!({ "productId": product_id }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    // Stock sells out elsewhere after the item was carted.
    set_stock(&admin, product_id, 0).await;

    let resp = user
        .client
        .put(user.url("/cart/updateQuantity"))
        .json(&json!({ "productId": product_id, "quantity": 3 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["quantity"], json!(0));

    // The line is gone rather than stored above the available stock.
    let body = show_cart(&user).await;
    assert!(body["cart"]["items"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_failed_order_leaves_stock_and_history_untouched() {
    let Some(admin) = TestApi::admin_from_env().await else {
        eprintln!("CLOVER_BASE_URL or admin credentials not set, skipping");
        return;
    };
    // The first line alone would succeed; the second exceeds stock.
    let plenty_id = create_product(&admin, "Plentiful Plate", 4, "12.50").await;
    let scarce_id = create_product(&admin, "Scarce Spoon", 2, "8.00").await;
    let user = fresh_user("nostock").await;
    add_address(&user).await;

    let resp = user
        .client
        .post(user.url("/order/placeOrder"))
        .json(&json!({
            "items": [
                { "productId": plenty_id, "quantity": 1 },
                { "productId": scarce_id, "quantity": 5 },
            ],
            "paymentMethod": "cod",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 409);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], json!(false));

    // Neither decrement survived the rollback.
    let body = product_details(&user, plenty_id).await;
    assert_eq!(body["product"]["stock"], json!(4));
    let body = product_details(&user, scarce_id).await;
    assert_eq!(body["product"]["stock"], json!(2));

    // And no order row was written.
    let resp = user
        .client
        .get(user.url("/order/showOrder"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert!(body["orders"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_duplicate_rating_conflicts_and_edit_reaggregates() {
    let Some(admin) = TestApi::admin_from_env().await else {
        eprintln!("CLOVER_BASE_URL or admin credentials not set, skipping");
        return;
    };
    let product_id = create_product(&admin, "Rated Radio", 5, "89.00").await;
    let first = fresh_user("rater-a").await;
    let second = fresh_user("rater-b").await;

    let resp = first
        .client
        .post(first.url("/product/rateProduct"))
        .json(&json!({ "productId": product_id, "rating": 4 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);

    let resp = second
        .client
        .post(second.url("/product/rateProduct"))
        .json(&json!({ "productId": product_id, "rating": 2 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);

    let body = product_details(&first, product_id).await;
    assert_eq!(body["product"]["avgRating"], json!("3.0"));
    assert_eq!(body["product"]["totalRatings"], json!(2));

    // One rating per user per product; a repeat is a conflict.
    let resp = first
        .client
        .post(first.url("/product/rateProduct"))
        .json(&json!({ "productId": product_id, "rating": 5 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 409);

    // The edit path succeeds and the aggregates follow.
    let resp = first
        .client
        .patch(first.url("/product/editRating"))
        .json(&json!({ "productId": product_id, "rating": 2 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let body = product_details(&first, product_id).await;
    assert_eq!(body["product"]["avgRating"], json!("2.0"));
    assert_eq!(body["product"]["totalRatings"], json!(2));
}
