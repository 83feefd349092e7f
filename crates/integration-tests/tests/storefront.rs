//! Storefront flows against a running server.
//!
//! Run with: `cargo test -p luxe-integration-tests -- --ignored`

use luxe_integration_tests::{client, credentials, location, storefront_url};
use reqwest::StatusCode;

#[tokio::test]
#[ignore = "Requires a running storefront"]
async fn test_health_endpoints() {
    let client = client();
    let base_url = storefront_url();

    let resp = client
        .get(format!("{base_url}/health"))
        .send()
        .await
        .expect("Failed to call /health");
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.expect("body"), "ok");

    let resp = client
        .get(format!("{base_url}/health/ready"))
        .send()
        .await
        .expect("Failed to call /health/ready");
    assert_eq!(resp.status(), StatusCode::OK, "backend should be reachable");
}

#[tokio::test]
#[ignore = "Requires a running storefront"]
async fn test_home_page_sections() {
    let resp = client()
        .get(storefront_url())
        .send()
        .await
        .expect("Failed to get home page");

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().contains_key("content-security-policy"));

    let body = resp.text().await.expect("body");
    assert!(body.contains("Shop by Category"));
    assert!(body.contains("Featured Products"));
}

#[tokio::test]
#[ignore = "Requires a running storefront"]
async fn test_category_listing() {
    let resp = client()
        .get(format!("{}/products?category=writing-tools", storefront_url()))
        .send()
        .await
        .expect("Failed to get listing");

    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("body");
    assert!(body.contains("Writing Tools"));
}

#[tokio::test]
#[ignore = "Requires a running storefront"]
async fn test_unknown_product_is_not_found() {
    let resp = client()
        .get(format!("{}/product/no-such-product-{}", storefront_url(), uuid::Uuid::new_v4()))
        .send()
        .await
        .expect("Failed to get product page");

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires a running storefront"]
async fn test_unknown_product_cannot_be_added_to_cart() {
    let client = client();
    let base_url = storefront_url();

    let resp = client
        .post(format!("{base_url}/cart/add"))
        .form(&[("product_id", uuid::Uuid::new_v4().to_string())])
        .send()
        .await
        .expect("Failed to add to cart");
    assert!(resp.status().is_redirection());

    let badge = client
        .get(format!("{base_url}/cart/count"))
        .send()
        .await
        .expect("Failed to get cart count")
        .text()
        .await
        .expect("body");
    assert!(badge.contains(">0<"), "cart should still be empty: {badge}");
}

#[tokio::test]
#[ignore = "Requires a running storefront"]
async fn test_checkout_requires_sign_in() {
    let resp = client()
        .get(format!("{}/checkout", storefront_url()))
        .send()
        .await
        .expect("Failed to get checkout");

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/auth");
}

#[tokio::test]
#[ignore = "Requires a running storefront"]
async fn test_seller_dashboard_requires_sign_in() {
    let resp = client()
        .get(format!("{}/sell", storefront_url()))
        .send()
        .await
        .expect("Failed to get seller dashboard");

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/auth");
}

#[tokio::test]
#[ignore = "Requires a running storefront and TEST_SHOPPER_* credentials"]
async fn test_sign_in_and_out() {
    let Some((email, password)) = credentials("TEST_SHOPPER_EMAIL", "TEST_SHOPPER_PASSWORD") else {
        return;
    };
    let client = client();
    let base_url = storefront_url();

    let resp = client
        .post(format!("{base_url}/auth/sign-in"))
        .form(&[("email", email.as_str()), ("password", password.as_str())])
        .send()
        .await
        .expect("Failed to sign in");
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/");

    let resp = client
        .get(format!("{base_url}/sell"))
        .send()
        .await
        .expect("Failed to get seller dashboard");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .post(format!("{base_url}/auth/sign-out"))
        .send()
        .await
        .expect("Failed to sign out");
    assert!(resp.status().is_redirection());

    let resp = client
        .get(format!("{base_url}/sell"))
        .send()
        .await
        .expect("Failed to get seller dashboard");
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
#[ignore = "Requires a running storefront"]
async fn test_wrong_password_is_rejected() {
    let resp = client()
        .post(format!("{}/auth/sign-in", storefront_url()))
        .form(&[
            ("email", format!("nobody-{}@luxe.test", uuid::Uuid::new_v4())),
            ("password", "definitely-wrong".to_string()),
        ])
        .send()
        .await
        .expect("Failed to post sign-in");

    assert!(resp.status().is_redirection() || resp.status().is_client_error());
    assert_ne!(location(&resp), "/");
}
