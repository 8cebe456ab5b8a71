//! End-to-end gate scenarios that need live data

mod common;

use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
#[ignore = "requires database"]
async fn public_feed_answers_without_credentials() {
    let app = common::TestApp::new().await;

    let (status, body) = app.get("/api/get-all-post").await;

    assert_eq!(status, StatusCode::OK);
    let body: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["success"], json!(true));
    assert!(body["data"]["posts"].is_array());
}

#[tokio::test]
#[ignore = "requires database"]
async fn admin_sees_the_user_listing() {
    let app = common::TestApp::new().await;
    let login = app.register_and_login("Secret@123").await;
    app.make_admin(&login.email).await;
    // Log in again so the issued claim set carries the elevated role.
    let admin = app.login(&login.email, "Secret@123").await;

    let (status, _, body) = app
        .request("GET", "/admin/users?page=1&limit=10", None, Some(&admin.token), None)
        .await;

    assert_eq!(status, StatusCode::OK, "body: {}", body);
    let body: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert!(body["data"]["users"].is_array());
    assert_eq!(body["data"]["pagination"]["currentPage"], json!(1));
    assert_eq!(body["data"]["pagination"]["perPage"], json!(10));

    // Admins are filtered out of their own listing.
    let listed_admin = body["data"]["users"]
        .as_array()
        .unwrap()
        .iter()
        .any(|u| u["email"] == json!(admin.email));
    assert!(!listed_admin);

    // The injected identity's role is visible to handlers.
    let (status, _, body) = app
        .request("GET", "/profile", None, Some(&admin.token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let body: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["data"]["role"], json!("ADMIN"));
}

#[tokio::test]
#[ignore = "requires database"]
async fn non_admin_is_redirected_like_a_missing_page() {
    let app = common::TestApp::new().await;
    let user = app.register_and_login("Secret@123").await;

    let (status, headers, _) = app
        .request("GET", "/admin/users", None, Some(&user.token), None)
        .await;

    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(headers["location"], "/not-found");
}

#[tokio::test]
#[ignore = "requires database"]
async fn post_like_and_comment_flow() {
    let app = common::TestApp::new().await;
    let login = app.register_and_login("Secret@123").await;

    // Create a post.
    let (status, _, body) = app
        .request(
            "POST",
            "/api/posts",
            Some(r#"{"text":"first post"}"#),
            Some(&login.token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "body: {}", body);
    let body: serde_json::Value = serde_json::from_str(&body).unwrap();
    let post_id = body["data"]["id"].as_str().unwrap().to_string();

    // It shows up in the public feed.
    let (_, feed) = app.get("/api/get-all-post").await;
    assert!(feed.contains("first post"));

    // Like toggles on (201) and off (200).
    let like_body = json!({"postId": post_id}).to_string();
    let (status, _, body) = app
        .request("POST", "/api/posts/like", Some(&like_body), Some(&login.token), None)
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let body: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["data"]["liked"], json!(true));

    let (status, _, body) = app
        .request("POST", "/api/posts/like", Some(&like_body), Some(&login.token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let body: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["data"]["liked"], json!(false));

    // Comment and read it back.
    let comment_path = format!("/api/posts/{}/comment", post_id);
    let (status, _, _) = app
        .request(
            "POST",
            &comment_path,
            Some(r#"{"text":"nice one"}"#),
            Some(&login.token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _, body) = app
        .request("GET", &comment_path, None, Some(&login.token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let body: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["data"]["comments"][0]["text"], json!("nice one"));
}

#[tokio::test]
#[ignore = "requires database"]
async fn empty_post_is_rejected() {
    let app = common::TestApp::new().await;
    let login = app.register_and_login("Secret@123").await;

    let (status, _, body) = app
        .request(
            "POST",
            "/api/posts",
            Some(r#"{"text":"   "}"#),
            Some(&login.token),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("Text or image is required"));
}

#[tokio::test]
#[ignore = "requires database"]
async fn comment_validation_bounds_are_enforced() {
    let app = common::TestApp::new().await;
    let login = app.register_and_login("Secret@123").await;

    let (status, _, body) = app
        .request(
            "POST",
            "/api/posts",
            Some(r#"{"text":"a post"}"#),
            Some(&login.token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let body: serde_json::Value = serde_json::from_str(&body).unwrap();
    let post_id = body["data"]["id"].as_str().unwrap().to_string();

    let comment_path = format!("/api/posts/{}/comment", post_id);
    let (status, _, _) = app
        .request(
            "POST",
            &comment_path,
            Some(r#"{"text":"x"}"#),
            Some(&login.token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
