/// End-to-end tests for favorites
///
/// Run with: cargo test -p repofav-api --test favorites_tests

mod common;

use axum::http::{Method, StatusCode};
use common::TestContext;
use serde_json::json;

#[tokio::test]
async fn test_favorites_require_session() {
    let ctx = TestContext::new();

    let list = ctx.request(Method::GET, "/favorites", None, None).await;
    assert_eq!(list.status, StatusCode::UNAUTHORIZED);

    let add = ctx
        .request(Method::POST, "/favorites", None, Some(json!({ "repoId": "R1" })))
        .await;
    assert_eq!(add.status, StatusCode::UNAUTHORIZED);

    let remove = ctx.request(Method::DELETE, "/favorites/R1", None, None).await;
    assert_eq!(remove.status, StatusCode::UNAUTHORIZED);

    assert_eq!(ctx.store.favorite_count().await, 0);
}

#[tokio::test]
async fn test_add_list_remove_flow() {
    let ctx = TestContext::new();
    let cookie = ctx.login_as("alice@example.com").await;

    let created = ctx
        .request(
            Method::POST,
            "/favorites",
            Some(&cookie),
            Some(json!({ "repoId": "R_kgDOA", "repoName": "octocat/hello-world" })),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.body["favorite"]["repoId"], "R_kgDOA");
    assert_eq!(created.body["favorite"]["repoName"], "octocat/hello-world");

    let again = ctx
        .request(
            Method::POST,
            "/favorites",
            Some(&cookie),
            Some(json!({ "repoId": "R_kgDOA" })),
        )
        .await;
    assert_eq!(again.status, StatusCode::OK);
    assert_eq!(again.body["favorite"]["id"], created.body["favorite"]["id"]);

    let list = ctx.request(Method::GET, "/favorites", Some(&cookie), None).await;
    assert_eq!(list.status, StatusCode::OK);
    assert_eq!(list.body["favorites"].as_array().unwrap().len(), 1);

    let removed = ctx
        .request(Method::DELETE, "/favorites/R_kgDOA", Some(&cookie), None)
        .await;
    assert_eq!(removed.status, StatusCode::NO_CONTENT);

    let removed_again = ctx
        .request(Method::DELETE, "/favorites/R_kgDOA", Some(&cookie), None)
        .await;
    assert_eq!(removed_again.status, StatusCode::NO_CONTENT);

    let list = ctx.request(Method::GET, "/favorites", Some(&cookie), None).await;
    assert!(list.body["favorites"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_add_requires_repo_id() {
    let ctx = TestContext::new();
    let cookie = ctx.login_as("bob@example.com").await;

    let empty = ctx
        .request(Method::POST, "/favorites", Some(&cookie), Some(json!({ "repoId": "" })))
        .await;
    assert_eq!(empty.status, StatusCode::BAD_REQUEST);
    assert_eq!(empty.body["details"][0]["field"], "repo_id");

    let missing = ctx
        .request(
            Method::POST,
            "/favorites",
            Some(&cookie),
            Some(json!({ "repoName": "x/y" })),
        )
        .await;
    assert_eq!(missing.status, StatusCode::BAD_REQUEST);
    assert_eq!(ctx.store.favorite_count().await, 0);
}

#[tokio::test]
async fn test_favorites_are_scoped_per_user() {
    let ctx = TestContext::new();
    let alice = ctx.login_as("alice@example.com").await;
    let bob = ctx.login_as("bob@example.com").await;

    ctx.request(Method::POST, "/favorites", Some(&alice), Some(json!({ "repoId": "R1" })))
        .await;

    let bob_list = ctx.request(Method::GET, "/favorites", Some(&bob), None).await;
    assert!(bob_list.body["favorites"].as_array().unwrap().is_empty());

    // Bob's delete does not touch Alice's row
    ctx.request(Method::DELETE, "/favorites/R1", Some(&bob), None).await;
    let alice_list = ctx.request(Method::GET, "/favorites", Some(&alice), None).await;
    assert_eq!(alice_list.body["favorites"].as_array().unwrap().len(), 1);

    // The same repo may be favorited by both
    let bob_add = ctx
        .request(Method::POST, "/favorites", Some(&bob), Some(json!({ "repoId": "R1" })))
        .await;
    assert_eq!(bob_add.status, StatusCode::CREATED);
    assert_eq!(ctx.store.favorite_count().await, 2);
}
