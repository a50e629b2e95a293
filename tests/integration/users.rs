use crate::common::{self, TestApp};

use axum::http::StatusCode;
use serde_json::json;

async fn create_user(app: &TestApp, phone_number: &str, name: &str) -> serde_json::Value {
    let response = app
        .request(
            "POST",
            "/users",
            Some(json!({ "phone_number": phone_number, "name": name })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    common::body_json(response).await["data"].clone()
}

#[tokio::test]
async fn test_user_crud_lifecycle() {
    let app = TestApp::new();

    let user = create_user(&app, "+44 20 7946 0958", "Grace").await;
    assert_eq!(user["phone_number"], "+442079460958");
    let uri = format!("/users/{}", user["id"].as_str().unwrap());

    let fetched = app.request("GET", &uri, None).await;
    assert_eq!(fetched.status(), StatusCode::OK);
    assert_eq!(common::body_json(fetched).await["data"]["name"], "Grace");

    let updated = app
        .request(
            "PUT",
            &uri,
            Some(json!({ "phone_number": "+442079460959", "name": "Grace H" })),
        )
        .await;
    assert_eq!(updated.status(), StatusCode::OK);
    let updated = common::body_json(updated).await;
    assert_eq!(updated["data"]["phone_number"], "+442079460959");
    assert_eq!(updated["data"]["name"], "Grace H");

    let deleted = app.request("DELETE", &uri, None).await;
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

    let missing = app.request("GET", &uri, None).await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_users_paginates() {
    let app = TestApp::new();
    for i in 0..3 {
        create_user(&app, &format!("+1555000000{}", i), "user").await;
    }

    let response = app.request("GET", "/users?skip=1&limit=1", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = common::body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
    assert_eq!(json["meta"]["skip"], 1);
    assert_eq!(json["meta"]["limit"], 1);
}

#[tokio::test]
async fn test_create_user_duplicate_phone() {
    let app = TestApp::new();
    create_user(&app, "+15550000001", "first").await;

    let response = app
        .request(
            "POST",
            "/users",
            Some(json!({ "phone_number": "+1 555 000 0001" })),
        )
        .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_create_user_invalid_phone() {
    let app = TestApp::new();

    let response = app
        .request("POST", "/users", Some(json!({ "phone_number": "abc" })))
        .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_unknown_user_is_404() {
    let app = TestApp::new();
    let uri = format!("/users/{}", uuid::Uuid::new_v4());

    assert_eq!(
        app.request("GET", &uri, None).await.status(),
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        app.request("DELETE", &uri, None).await.status(),
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        app.request("PUT", &uri, Some(json!({ "phone_number": "+15550000009" })))
            .await
            .status(),
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn test_login_creates_user_visible_in_crud() {
    let app = TestApp::new();
    app.login("+15551230000").await;

    let response = app.request("GET", "/users", None).await;

    let json = common::body_json(response).await;
    assert_eq!(json["data"][0]["phone_number"], "+15551230000");
}
