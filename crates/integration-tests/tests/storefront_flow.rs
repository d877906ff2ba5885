//! Storefront API flows against a running server.
//!
//! These tests exercise the session cookie end to end: signup, login,
//! profile, and the auth gate in front of the cart. They skip themselves
//! when `CLOVER_BASE_URL` is unset.

#![allow(clippy::unwrap_used, clippy::print_stderr)]

use clover_integration_tests::{TestApi, unique_email};
use serde_json::{Value, json};

#[tokio::test]
async fn test_signup_login_profile_logout() {
    let Some(api) = TestApi::from_env() else {
        eprintln!("CLOVER_BASE_URL not set, skipping");
        return;
    };

    let email = unique_email("flow");
    let password = "correct-horse-battery";

    // Signup creates the account but not a session.
    let resp = api
        .client
        .post(api.url("/user/userSignup"))
        .json(&json!({
            "firstName": "Ada",
            "lastName": "Tester",
            "email": email,
            "password": password,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["user"]["email"], json!(email));
    assert_eq!(body["user"]["role"], json!("user"));

    // Profile requires a session.
    let resp = api
        .client
        .get(api.url("/user/userProfile"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);

    // Login sets the session cookie on the shared client.
    let resp = api
        .client
        .post(api.url("/user/userlogin"))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let resp = api
        .client
        .get(api.url("/user/userProfile"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["user"]["email"], json!(email));
    // The password hash never leaves the server.
    assert!(body["user"].get("password").is_none());
    assert!(body["user"].get("passwordHash").is_none());

    // Logout flushes the session.
    let resp = api
        .client
        .get(api.url("/user/userLogout"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let resp = api
        .client
        .get(api.url("/user/userProfile"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);
}

#[tokio::test]
async fn test_login_rejects_wrong_password() {
    let Some(api) = TestApi::from_env() else {
        eprintln!("CLOVER_BASE_URL not set, skipping");
        return;
    };

    let email = unique_email("badpw");
    let resp = api
        .client
        .post(api.url("/user/userSignup"))
        .json(&json!({
            "firstName": "Bad",
            "lastName": "Password",
            "email": email,
            "password": "the-real-password",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);

    let resp = api
        .client
        .post(api.url("/user/userlogin"))
        .json(&json!({ "email": email, "password": "not-the-password" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], json!(false));
}

#[tokio::test]
async fn test_signup_rejects_unknown_fields() {
    let Some(api) = TestApi::from_env() else {
        eprintln!("CLOVER_BASE_URL not set, skipping");
        return;
    };

    // A client must not be able to smuggle a role through signup.
    let resp = api
        .client
        .post(api.url("/user/userSignup"))
        .json(&json!({
            "firstName": "Eve",
            "lastName": "Tester",
            "email": unique_email("strict"),
            "password": "longenough",
            "role": "admin",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn test_cart_requires_login() {
    let Some(api) = TestApi::from_env() else {
        eprintln!("CLOVER_BASE_URL not set, skipping");
        return;
    };

    // Fresh client with no session cookie.
    let client = reqwest::Client::new();
    let resp = client
        .get(api.url("/cart/showCart"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);

    let resp = client
        .post(api.url("/cart/addItemToCart"))
        .json(&json!({ "productId": 1 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);
}

#[tokio::test]
async fn test_catalog_is_public() {
    let Some(api) = TestApi::from_env() else {
        eprintln!("CLOVER_BASE_URL not set, skipping");
        return;
    };

    let client = reqwest::Client::new();
    let resp = client
        .get(api.url("/product/showAllProducts"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], json!(true));
    assert!(body["products"].is_array());
}

#[tokio::test]
async fn test_admin_routes_forbidden_for_regular_users() {
    let Some(api) = TestApi::from_env() else {
        eprintln!("CLOVER_BASE_URL not set, skipping");
        return;
    };

    let email = unique_email("notadmin");
    let password = "a-plain-shopper";
    let client = reqwest::Client::builder()
        .cookie_store(true)
        .build()
        .unwrap();

    let resp = client
        .post(api.url("/user/userSignup"))
        .json(&json!({
            "firstName": "Plain",
            "lastName": "Shopper",
            "email": email,
            "password": password,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);

    let resp = client
        .post(api.url("/user/userlogin"))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let resp = client
        .get(api.url("/admin/order/showAllOrders"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 403);
}
