//! Admin console flows against a running server.
//!
//! Tests that need a signed-in admin return early when `TEST_ADMIN_EMAIL`
//! and `TEST_ADMIN_PASSWORD` are not set.
//!
//! Run with: `cargo test -p luxe-integration-tests -- --ignored`

use luxe_integration_tests::{admin_client, admin_url, client, credentials, location};
use reqwest::StatusCode;
use uuid::Uuid;

#[tokio::test]
#[ignore = "Requires a running admin console"]
async fn test_health() {
    let resp = client()
        .get(format!("{}/health", admin_url()))
        .send()
        .await
        .expect("Failed to call /health");
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires a running admin console"]
async fn test_pages_redirect_to_login() {
    let client = client();
    let base_url = admin_url();

    for path in ["/", "/products", "/categories", "/orders", "/banners"] {
        let resp = client
            .get(format!("{base_url}{path}"))
            .send()
            .await
            .expect("Failed to get page");
        assert_eq!(resp.status(), StatusCode::SEE_OTHER, "{path}");
        assert_eq!(location(&resp), "/auth/login", "{path}");
    }
}

#[tokio::test]
#[ignore = "Requires a running admin console"]
async fn test_login_page_is_not_cacheable() {
    let resp = client()
        .get(format!("{}/auth/login", admin_url()))
        .send()
        .await
        .expect("Failed to get login page");

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()["cache-control"], "no-store");
    assert_eq!(resp.headers()["x-frame-options"], "DENY");
    assert!(resp.headers().contains_key("x-request-id"));
}

#[tokio::test]
#[ignore = "Requires a running admin console and TEST_SHOPPER_* credentials"]
async fn test_non_admin_is_refused() {
    let Some((email, password)) = credentials("TEST_SHOPPER_EMAIL", "TEST_SHOPPER_PASSWORD") else {
        return;
    };
    let client = client();
    let base_url = admin_url();

    let resp = client
        .post(format!("{base_url}/auth/login"))
        .form(&[("email", email.as_str()), ("password", password.as_str())])
        .send()
        .await
        .expect("Failed to post login");
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert!(resp.text().await.expect("body").contains("does not have admin access"));

    let resp = client
        .get(format!("{base_url}/"))
        .send()
        .await
        .expect("Failed to get dashboard");
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
#[ignore = "Requires a running admin console and TEST_ADMIN_* credentials"]
async fn test_dashboard_after_sign_in() {
    let Some(client) = admin_client().await else {
        return;
    };

    let resp = client
        .get(format!("{}/", admin_url()))
        .send()
        .await
        .expect("Failed to get dashboard");
    assert_eq!(resp.status(), StatusCode::OK);

    let body = resp.text().await.expect("body");
    assert!(body.contains("Total Products"));
    assert!(body.contains("Recent Orders"));
}

#[tokio::test]
#[ignore = "Requires a running admin console and TEST_ADMIN_* credentials"]
async fn test_category_lifecycle() {
    let Some(client) = admin_client().await else {
        return;
    };
    let base_url = admin_url();
    let slug = format!("it-category-{}", Uuid::new_v4().simple());

    let resp = client
        .post(format!("{base_url}/categories"))
        .form(&[
            ("name", "Integration Category"),
            ("slug", slug.as_str()),
            ("is_active", "on"),
        ])
        .send()
        .await
        .expect("Failed to create category");
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/categories");

    let body = client
        .get(format!("{base_url}/categories"))
        .send()
        .await
        .expect("Failed to list categories")
        .text()
        .await
        .expect("body");
    assert!(body.contains("Category created successfully"));
    assert!(body.contains(&slug));

    // Find the edit link for the new card and delete through it
    let marker = format!("/{slug}");
    let card = body
        .split("<article")
        .find(|card| card.contains(&marker))
        .expect("new category card");
    let id = card
        .split("/categories/")
        .nth(1)
        .and_then(|rest| rest.split('/').next())
        .expect("category id in edit link");

    let resp = client
        .post(format!("{base_url}/categories/{id}/delete"))
        .send()
        .await
        .expect("Failed to delete category");
    assert_eq!(location(&resp), "/categories");
}

#[tokio::test]
#[ignore = "Requires a running admin console and TEST_ADMIN_* credentials"]
async fn test_product_validation_keeps_input() {
    let Some(client) = admin_client().await else {
        return;
    };

    let resp = client
        .post(format!("{}/products", admin_url()))
        .form(&[("name", "Half-finished Lamp"), ("price", "")])
        .send()
        .await
        .expect("Failed to post product");
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = resp.text().await.expect("body");
    assert!(body.contains("price:"));
    assert!(body.contains("value=\"Half-finished Lamp\""));
}

#[tokio::test]
#[ignore = "Requires a running admin console and TEST_ADMIN_* credentials"]
async fn test_sign_out_ends_session() {
    let Some(client) = admin_client().await else {
        return;
    };
    let base_url = admin_url();

    let resp = client
        .post(format!("{base_url}/auth/logout"))
        .send()
        .await
        .expect("Failed to sign out");
    assert_eq!(location(&resp), "/auth/login");

    let resp = client
        .get(format!("{base_url}/orders"))
        .send()
        .await
        .expect("Failed to get orders");
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
}
