mod common;

use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use serde_json::json;

use account_service::interfaces::http::LoginThrottleConfig;
use common::{spawn_app, spawn_app_with, test_config, PASSWORD};

// ── Authorization gate ─────────────────────────────────────────

#[tokio::test]
async fn protected_route_without_token_is_401() {
    let app = spawn_app().await;

    let res = app.call(Method::GET, "/auth/me", None, None).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.body["success"], false);
    assert_eq!(res.error(), "No token provided");

    let res = app
        .call(Method::GET, "/admin/admin-requests", None, None)
        .await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn forged_token_is_401() {
    let app = spawn_app().await;

    let res = app
        .call(Method::GET, "/auth/me", None, Some("not.a.jwt"))
        .await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.error(), "Invalid token");
}

#[tokio::test]
async fn non_admin_on_admin_route_is_403() {
    let app = spawn_app().await;
    let (_, token) = app.signed_in_user("carol").await;

    let res = app
        .call(Method::GET, "/admin/admin-requests", None, Some(&token))
        .await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
    assert_eq!(res.error(), "Access denied");
}

#[tokio::test]
async fn session_cookie_authenticates_without_header() {
    let app = spawn_app().await;
    app.register("dave", "dave@example.com").await;

    let login = app.login("dave@example.com", PASSWORD).await;
    let set_cookie = login.set_cookie().to_string();
    assert!(set_cookie.starts_with("access_token="));
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("SameSite=Lax"));
    assert!(set_cookie.contains(&format!("Max-Age={}", 72 * 3600)));
    assert!(!set_cookie.contains("Secure"));

    let pair = set_cookie.split(';').next().unwrap();
    let res = app
        .send(
            Request::builder()
                .uri("/auth/me")
                .header(header::COOKIE, pair)
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.data()["username"], "dave");
}

// ── Identity ───────────────────────────────────────────────────

#[tokio::test]
async fn register_validates_before_touching_the_store() {
    let app = spawn_app().await;

    let res = app
        .call(
            Method::POST,
            "/auth/register",
            Some(json!({"username": "bad name!", "email": "x@example.com", "password": PASSWORD})),
            None,
        )
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);

    let res = app
        .call(
            Method::POST,
            "/auth/register",
            Some(json!({"username": "shorty", "email": "s@example.com", "password": "1234567"})),
            None,
        )
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);

    let res = app.register("erin", "erin@example.com").await;
    assert_eq!(res.status, StatusCode::CREATED);
    assert_eq!(res.data()["role"], "regular");
    assert!(res.data().get("password_hash").is_none());

    let dup = app.register("erin", "erin2@example.com").await;
    assert_eq!(dup.status, StatusCode::BAD_REQUEST);
    assert_eq!(dup.body["success"], false);
}

#[tokio::test]
async fn login_failures_are_400() {
    let app = spawn_app().await;
    app.register("frank", "frank@example.com").await;

    let res = app.login("nobody@example.com", PASSWORD).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.error(), "User not found");

    let res = app.login("frank@example.com", "wrong-password").await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.error(), "Invalid credentials");
    assert!(res.set_cookie().is_empty());
}

#[tokio::test]
async fn logout_clears_the_cookie() {
    let app = spawn_app().await;
    let (_, token) = app.signed_in_user("grace").await;

    let res = app
        .call(Method::POST, "/auth/logout", None, Some(&token))
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert!(res.set_cookie().starts_with("access_token=;"));
    assert!(res.set_cookie().contains("Max-Age=0"));
}

#[tokio::test]
async fn profile_edit_keeps_omitted_fields() {
    let app = spawn_app().await;
    let (_, token) = app.signed_in_user("heidi").await;

    let res = app
        .call(
            Method::PUT,
            "/auth/edit",
            Some(json!({"timezone": "Europe/Paris", "date_of_birth": "1990-04-01"})),
            Some(&token),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.data()["timezone"], "Europe/Paris");
    assert_eq!(res.data()["date_of_birth"], "1990-04-01");
    assert_eq!(res.data()["full_name"], "heidi Example");
    assert_eq!(res.data()["email"], "heidi@example.com");

    let res = app
        .call(
            Method::PUT,
            "/auth/edit",
            Some(json!({"date_of_birth": "01/04/1990"})),
            Some(&token),
        )
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn password_change_requires_the_old_password() {
    let app = spawn_app().await;
    let (_, token) = app.signed_in_user("ivan").await;

    let res = app
        .call(
            Method::PUT,
            "/auth/update-password",
            Some(json!({"oldPassword": "not-it-at-all", "newPassword": "brand-new-pass"})),
            Some(&token),
        )
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.error(), "Old password is incorrect");

    let res = app
        .call(
            Method::PUT,
            "/auth/update-password",
            Some(json!({"oldPassword": PASSWORD, "newPassword": "short"})),
            Some(&token),
        )
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);

    let res = app
        .call(
            Method::PUT,
            "/auth/update-password",
            Some(json!({"oldPassword": PASSWORD, "newPassword": "brand-new-pass"})),
            Some(&token),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK);

    assert_eq!(
        app.login("ivan@example.com", PASSWORD).await.status,
        StatusCode::BAD_REQUEST
    );
    assert_eq!(
        app.login("ivan@example.com", "brand-new-pass").await.status,
        StatusCode::OK
    );
}

// ── Admin request workflow ─────────────────────────────────────

async fn submit_request(app: &common::TestApp, username: &str) -> String {
    let res = app
        .call(
            Method::POST,
            "/admin/create-admin-request",
            Some(json!({
                "username": username,
                "email": format!("{}@example.com", username),
                "password": "promote-me-please",
            })),
            None,
        )
        .await;
    assert_eq!(res.status, StatusCode::CREATED, "{:?}", res.body);
    res.data()["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn approval_creates_an_admin_once() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;
    let request_id = submit_request(&app, "judy").await;

    let res = app
        .call(
            Method::POST,
            "/admin/validate-admin-request",
            Some(json!({"requestId": request_id, "isValid": true})),
            Some(&admin),
        )
        .await;
    assert_eq!(res.status, StatusCode::CREATED);
    assert_eq!(res.data()["message"], "Admin user created successfully");
    assert_eq!(res.data()["user"]["role"], "admin");

    // The submitted password carries over to the new account
    let login = app.login("judy@example.com", "promote-me-please").await;
    assert_eq!(login.status, StatusCode::OK);
    assert_eq!(login.data()["user"]["role"], "admin");

    // Resolved requests are gone from the queue
    let again = app
        .call(
            Method::POST,
            "/admin/validate-admin-request",
            Some(json!({"requestId": request_id, "isValid": true})),
            Some(&admin),
        )
        .await;
    assert_eq!(again.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn rejection_deletes_the_request() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;
    let request_id = submit_request(&app, "mallory").await;

    let res = app
        .call(
            Method::POST,
            "/admin/validate-admin-request",
            Some(json!({"requestId": request_id, "isValid": false})),
            Some(&admin),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.data()["message"], "Admin request deleted successfully");
    assert!(res.data().get("user").is_none());

    assert_eq!(
        app.login("mallory@example.com", "promote-me-please").await.status,
        StatusCode::BAD_REQUEST
    );

    let again = app
        .call(
            Method::POST,
            "/admin/validate-admin-request",
            Some(json!({"requestId": request_id, "isValid": false})),
            Some(&admin),
        )
        .await;
    assert_eq!(again.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn request_for_existing_user_is_refused() {
    let app = spawn_app().await;
    app.register("oscar", "oscar@example.com").await;

    let res = app
        .call(
            Method::POST,
            "/admin/create-admin-request",
            Some(json!({
                "username": "oscar",
                "email": "other@example.com",
                "password": "whatever",
            })),
            None,
        )
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn pending_requests_are_paginated() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;
    for name in ["peggy", "quinn", "rupert"] {
        submit_request(&app, name).await;
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    let first = app
        .call(
            Method::GET,
            "/admin/admin-requests?page=1&limit=2",
            None,
            Some(&admin),
        )
        .await;
    assert_eq!(first.status, StatusCode::OK);
    let items = first.data().as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["username"], "rupert");
    assert!(items[0].get("password_hash").is_none());

    let second = app
        .call(
            Method::GET,
            "/admin/admin-requests?page=2&limit=2",
            None,
            Some(&admin),
        )
        .await;
    assert_eq!(second.data().as_array().unwrap().len(), 1);
    assert_eq!(second.data()[0]["username"], "peggy");

    for bad in ["page=0", "limit=0", "limit=101", "page=abc"] {
        let res = app
            .call(
                Method::GET,
                &format!("/admin/admin-requests?{}", bad),
                None,
                Some(&admin),
            )
            .await;
        assert_eq!(res.status, StatusCode::BAD_REQUEST, "{bad}");
    }
}

// ── Role changes ───────────────────────────────────────────────

#[tokio::test]
async fn role_change_on_tombstoned_user_is_404() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;
    let (bob_id, bob_token) = app.signed_in_user("bob").await;

    let res = app
        .call(Method::DELETE, "/auth/delete", None, Some(&bob_token))
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert!(res.set_cookie().contains("Max-Age=0"));

    let res = app
        .call(
            Method::PUT,
            "/admin/change-to-paid",
            Some(json!({"userId": bob_id})),
            Some(&admin),
        )
        .await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);

    // The token still verifies, but the account is gone
    let me = app
        .call(Method::GET, "/auth/me", None, Some(&bob_token))
        .await;
    assert_eq!(me.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn each_role_endpoint_sets_its_role() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;
    let (id, _) = app.signed_in_user("trent").await;

    for (path, role) in [
        ("/admin/change-to-admin", "admin"),
        ("/admin/change-to-paid", "paid"),
        ("/admin/change-to-regular", "regular"),
    ] {
        let res = app
            .call(Method::PUT, path, Some(json!({"userId": id})), Some(&admin))
            .await;
        assert_eq!(res.status, StatusCode::OK, "{path}");
        assert_eq!(res.data()["user"]["role"], role);
        assert_eq!(
            res.data()["message"],
            format!("User role changed to {} successfully", role)
        );
    }
}

#[tokio::test]
async fn registration_to_paid_end_to_end() {
    let app = spawn_app().await;
    let admin = app.admin_token().await;
    let (alice_id, token) = app.signed_in_user("alice").await;

    let me = app.call(Method::GET, "/auth/me", None, Some(&token)).await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.data()["role"], "regular");

    let res = app
        .call(
            Method::PUT,
            "/admin/change-to-paid",
            Some(json!({"userId": alice_id})),
            Some(&admin),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK);

    let login = app.login("alice@example.com", PASSWORD).await;
    let fresh = login.data()["accessToken"].as_str().unwrap().to_string();
    let me = app.call(Method::GET, "/auth/me", None, Some(&fresh)).await;
    assert_eq!(me.data()["role"], "paid");
}

// ── Throttle and ambient routes ────────────────────────────────

#[tokio::test]
async fn login_is_throttled_per_client() {
    let throttle = LoginThrottleConfig {
        window: Duration::from_secs(600),
        max_attempts: 2,
        delay_after: 2,
        delay_step: Duration::from_millis(500),
    };
    let app = spawn_app_with(test_config(), throttle).await;

    for _ in 0..2 {
        let res = app.login("nobody@example.com", PASSWORD).await;
        assert_eq!(res.status, StatusCode::BAD_REQUEST);
    }

    let res = app.login("nobody@example.com", PASSWORD).await;
    assert_eq!(res.status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(res.body["success"], false);
    assert!(res.error().starts_with("Too many login attempts"));

    // Registration is not throttled
    assert_eq!(
        app.register("walter", "walter@example.com").await.status,
        StatusCode::CREATED
    );
}

#[tokio::test]
async fn health_reports_database_status() {
    let app = spawn_app().await;

    let res = app.call(Method::GET, "/health", None, None).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["status"], "ok");
    assert_eq!(res.body["database"]["status"], "ok");
    assert!(res.headers.contains_key("x-request-id"));
}

#[tokio::test]
async fn metrics_endpoint_is_public() {
    let app = spawn_app().await;

    let res = app
        .send(
            Request::builder()
                .uri("/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK);
}
