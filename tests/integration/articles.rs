use crate::common::{self, TestApp};

use axum::http::StatusCode;
use serde_json::json;

async fn create_article(app: &TestApp, body: serde_json::Value) -> serde_json::Value {
    let response = app.request("POST", "/articles", Some(body)).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    common::body_json(response).await["data"].clone()
}

async fn list(app: &TestApp, status: &str) -> Vec<String> {
    let response = app
        .request("GET", &format!("/articles?status={}", status), None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    common::body_json(response).await["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["title"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_list_articles_by_status() {
    let app = TestApp::new();
    create_article(&app, json!({ "title": "live", "content": "c" })).await;
    create_article(
        &app,
        json!({ "title": "later", "content": "c", "scheduled_date": "2999-01-01T00:00:00Z" }),
    )
    .await;
    create_article(
        &app,
        json!({ "title": "old", "content": "c", "archived_date": "2000-01-01T00:00:00Z" }),
    )
    .await;

    assert_eq!(list(&app, "published").await, vec!["live"]);
    assert_eq!(list(&app, "scheduled").await, vec!["later"]);
    assert_eq!(list(&app, "archived").await, vec!["old"]);
}

#[tokio::test]
async fn test_list_articles_defaults_to_published() {
    let app = TestApp::new();
    create_article(&app, json!({ "title": "live", "content": "c" })).await;

    let response = app.request("GET", "/articles", None).await;

    let json = common::body_json(response).await;
    assert_eq!(json["meta"]["status"], "published");
    assert_eq!(json["meta"]["limit"], 10);
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_list_articles_rejects_unknown_status() {
    let app = TestApp::new();

    let response = app.request("GET", "/articles?status=deleted", None).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_archive_article() {
    let app = TestApp::new();
    let article = create_article(&app, json!({ "title": "live", "content": "c" })).await;
    let uri = format!("/articles/{}", article["id"].as_str().unwrap());

    let response = app
        .request("PATCH", &uri, Some(json!({ "archive": true })))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = common::body_json(response).await;
    assert!(json["data"]["archived_date"].is_string());
    assert!(list(&app, "published").await.is_empty());
    assert_eq!(list(&app, "archived").await, vec!["live"]);

    let fetched = app.request("GET", &uri, None).await;
    assert_eq!(fetched.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_article_is_404() {
    let app = TestApp::new();
    let uri = format!("/articles/{}", uuid::Uuid::new_v4());

    assert_eq!(
        app.request("GET", &uri, None).await.status(),
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        app.request("PATCH", &uri, Some(json!({ "archive": false })))
            .await
            .status(),
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn test_create_article_requires_title() {
    let app = TestApp::new();

    let response = app
        .request("POST", "/articles", Some(json!({ "title": "", "content": "c" })))
        .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}
