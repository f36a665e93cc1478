mod common;

use std::sync::Arc;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;
use taskify_api::identity::UserRole;

use common::{bearer_token_for, spawn_app, StubRoles};

#[tokio::test]
async fn todo_endpoints_require_identity() -> Result<()> {
    let base = spawn_app(Arc::new(StubRoles(Some(UserRole::Member))), None).await?;
    let client = reqwest::Client::new();

    let res = client.get(format!("{}/api/todos", base)).send().await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = client
        .post(format!("{}/api/todos", base))
        .json(&json!({"title": "A"}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = client
        .put(format!("{}/api/todos/some-id", base))
        .json(&json!({"title": "A", "completed": true}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = client
        .delete(format!("{}/api/todos/some-id", base))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn create_rejects_a_missing_title_before_touching_storage() -> Result<()> {
    // The suite has no database behind the pool, so a 400 here proves the
    // validation fires before any persistence access
    let base = spawn_app(Arc::new(StubRoles(Some(UserRole::Member))), None).await?;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/api/todos", base))
        .bearer_auth(bearer_token_for("user_1"))
        .json(&json!({}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["error"], "Title is required");
    Ok(())
}

#[tokio::test]
async fn create_rejects_an_empty_title() -> Result<()> {
    let base = spawn_app(Arc::new(StubRoles(Some(UserRole::Member))), None).await?;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/api/todos", base))
        .bearer_auth(bearer_token_for("user_1"))
        .json(&json!({"title": ""}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    Ok(())
}
