use serde_json::json;

use crate::common::{TestApp, routes};

#[tokio::test]
async fn recommendations_are_unavailable_without_an_api_key() {
    let app = TestApp::spawn().await;
    let token = app.create_authenticated_user("alice", "securepass").await;

    let res = app
        .post_with_token(
            routes::RECOMMEND,
            &json!({"title": "Flood", "current_text": "Water rising", "urls": []}),
            &token,
        )
        .await;

    assert_eq!(res.status, 503, "{}", res.text);
    assert_eq!(res.body["code"], "SERVICE_UNAVAILABLE");
}

#[tokio::test]
async fn empty_request_is_rejected_before_calling_out() {
    let app = TestApp::spawn().await;
    let token = app.create_authenticated_user("alice", "securepass").await;

    let res = app
        .post_with_token(routes::RECOMMEND, &json!({"title": " ", "current_text": ""}), &token)
        .await;

    assert_eq!(res.status, 400);
}

#[tokio::test]
async fn recommendations_require_authentication() {
    let app = TestApp::spawn().await;

    let res = app
        .post_without_token(routes::RECOMMEND, &json!({"title": "Flood"}))
        .await;

    assert_eq!(res.status, 401);
}
