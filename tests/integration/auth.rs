use crate::common::{self, TestApp};

use axum::http::{StatusCode, header};
use phoneauth::domain::auth::AuthService;
use phoneauth::domain::rate_limit::RateLimitPolicy;
use serde_json::json;

const PHONE: &str = "+15551234567";

fn wrong(code: &str) -> String {
    let first = if code.starts_with('0') { '1' } else { '0' };
    format!("{}{}", first, &code[1..])
}

async fn assert_error(response: axum::response::Response, status: StatusCode, detail: &str) {
    assert_eq!(response.status(), status);
    let json = common::body_json(response).await;
    assert_eq!(json["errors"][0]["detail"], detail);
}

#[tokio::test]
async fn test_request_otp_stores_code() {
    let app = TestApp::new();

    let response = app
        .request(
            "POST",
            "/auth/request-otp",
            Some(json!({ "phone_number": "+1 555 123 4567" })),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let code = app.delivery.last_code(PHONE).unwrap();
    assert_eq!(code.len(), 6);

    let phone = phoneauth::domain::phone::PhoneNumber::parse(PHONE).unwrap();
    let stored = app.codes.get(&phone).unwrap();
    assert_eq!(stored.attempts, 0);
    assert!(!stored.used);
    assert_ne!(stored.code_hash, code);
}

#[tokio::test]
async fn test_request_otp_invalid_phone() {
    let app = TestApp::new();

    let response = app
        .request(
            "POST",
            "/auth/request-otp",
            Some(json!({ "phone_number": "555-1234" })),
        )
        .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(app.delivery.sent_count(), 0);
}

#[tokio::test]
async fn test_request_otp_delivery_failure() {
    let app = TestApp::new();
    app.delivery.set_failing(true);

    let response = app
        .request("POST", "/auth/request-otp", Some(json!({ "phone_number": PHONE })))
        .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let phone = phoneauth::domain::phone::PhoneNumber::parse(PHONE).unwrap();
    assert!(app.codes.get(&phone).is_none());
}

#[tokio::test]
async fn test_login_returns_token_pair() {
    let app = TestApp::new();

    let tokens = app.login(PHONE).await;

    assert!(tokens["access_token"].is_string());
    assert!(tokens["refresh_token"].is_string());
}

#[tokio::test]
async fn test_verify_otp_alias() {
    let app = TestApp::new();
    let code = app.request_code(PHONE).await;

    let response = app
        .request(
            "POST",
            "/auth/verify-otp",
            Some(json!({ "phone_number": PHONE, "code": code, "name": "Ada" })),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_wrong_code_is_generic_401() {
    let app = TestApp::new();
    let code = app.request_code(PHONE).await;

    let response = app
        .request(
            "POST",
            "/auth/token",
            Some(json!({ "phone_number": PHONE, "code": wrong(&code) })),
        )
        .await;

    assert_error(response, StatusCode::UNAUTHORIZED, "Code is invalid").await;
}

#[tokio::test]
async fn test_unknown_phone_is_generic_401() {
    let app = TestApp::new();

    let response = app
        .request(
            "POST",
            "/auth/token",
            Some(json!({ "phone_number": PHONE, "code": "123456" })),
        )
        .await;

    assert_error(response, StatusCode::UNAUTHORIZED, "Code is invalid").await;
}

#[tokio::test]
async fn test_code_is_single_use() {
    let app = TestApp::new();
    let code = app.request_code(PHONE).await;
    let body = json!({ "phone_number": PHONE, "code": code });

    let first = app.request("POST", "/auth/token", Some(body.clone())).await;
    assert_eq!(first.status(), StatusCode::OK);

    let second = app.request("POST", "/auth/token", Some(body)).await;
    assert_error(second, StatusCode::UNAUTHORIZED, "Code is invalid").await;
}

#[tokio::test]
async fn test_attempts_exceeded_is_429() {
    let app = TestApp::new();
    let code = app.request_code(PHONE).await;

    for _ in 0..5 {
        let response = app
            .request(
                "POST",
                "/auth/token",
                Some(json!({ "phone_number": PHONE, "code": wrong(&code) })),
            )
            .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    let response = app
        .request(
            "POST",
            "/auth/token",
            Some(json!({ "phone_number": PHONE, "code": code })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn test_request_otp_rate_limited_per_client() {
    let app = TestApp::with_rate_limit(RateLimitPolicy {
        max_requests: 2,
        window_seconds: 60,
    });
    let body = json!({ "phone_number": PHONE });

    for _ in 0..2 {
        let response = app
            .request_with(
                "POST",
                "/auth/request-otp",
                Some(body.clone()),
                &[("x-forwarded-for", "198.51.100.4")],
            )
            .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let limited = app
        .request_with(
            "POST",
            "/auth/request-otp",
            Some(body.clone()),
            &[("x-forwarded-for", "198.51.100.4")],
        )
        .await;
    assert_eq!(limited.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(app.delivery.sent_count(), 2);

    let other_client = app
        .request_with(
            "POST",
            "/auth/request-otp",
            Some(body),
            &[("x-forwarded-for", "198.51.100.5")],
        )
        .await;
    assert_eq!(other_client.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_token_verify_returns_user() {
    let app = TestApp::new();
    let tokens = app.login(PHONE).await;
    let bearer = format!("Bearer {}", tokens["access_token"].as_str().unwrap());

    let response = app
        .request_with(
            "GET",
            "/auth/token/verify",
            None,
            &[("authorization", bearer.as_str())],
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = common::body_json(response).await;
    assert_eq!(json["phone_number"], PHONE);
}

#[tokio::test]
async fn test_token_verify_rejects_bad_credentials() {
    let app = TestApp::new();
    let tokens = app.login(PHONE).await;
    let refresh_as_bearer = format!("Bearer {}", tokens["refresh_token"].as_str().unwrap());

    for headers in [
        vec![],
        vec![("authorization", "Bearer not-a-token")],
        vec![("authorization", "Basic dXNlcjpwYXNz")],
        vec![("authorization", refresh_as_bearer.as_str())],
    ] {
        let response = app
            .request_with("GET", "/auth/token/verify", None, &headers)
            .await;

        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "Bearer"
        );
        assert_error(
            response,
            StatusCode::UNAUTHORIZED,
            "Could not validate credentials",
        )
        .await;
    }
}

#[tokio::test]
async fn test_refresh_rotates_within_family() {
    let app = TestApp::new();
    let auth = common::test_auth_service();
    let tokens = app.login(PHONE).await;
    let root = auth
        .validate_refresh_token(tokens["refresh_token"].as_str().unwrap())
        .unwrap();

    let response = app
        .request(
            "POST",
            "/auth/token/refresh",
            Some(json!({ "refresh_token": tokens["refresh_token"] })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let rotated = common::body_json(response).await;
    let child = auth
        .validate_refresh_token(rotated["refresh_token"].as_str().unwrap())
        .unwrap();

    assert_eq!(child.family, root.family);
    assert_ne!(child.jti, root.jti);
}

#[tokio::test]
async fn test_refresh_replay_revokes_family() {
    let app = TestApp::new();
    let tokens = app.login(PHONE).await;
    let first = json!({ "refresh_token": tokens["refresh_token"] });

    let rotated = app
        .request("POST", "/auth/token/refresh", Some(first.clone()))
        .await;
    assert_eq!(rotated.status(), StatusCode::OK);
    let rotated = common::body_json(rotated).await;

    let replay = app.request("POST", "/auth/token/refresh", Some(first)).await;
    assert_error(
        replay,
        StatusCode::UNAUTHORIZED,
        "Could not validate credentials",
    )
    .await;

    // The successor died with the family
    let successor = app
        .request(
            "POST",
            "/auth/token/refresh",
            Some(json!({ "refresh_token": rotated["refresh_token"] })),
        )
        .await;
    assert_eq!(successor.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_rejects_access_token() {
    let app = TestApp::new();
    let tokens = app.login(PHONE).await;

    let response = app
        .request(
            "POST",
            "/auth/token/refresh",
            Some(json!({ "refresh_token": tokens["access_token"] })),
        )
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
