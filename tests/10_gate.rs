mod common;

use std::sync::Arc;

use anyhow::Result;
use reqwest::StatusCode;
use taskify_api::identity::UserRole;

use common::{bearer_token_for, no_redirect_client, spawn_app, StubRoles};

#[tokio::test]
async fn root_is_public() -> Result<()> {
    let base = spawn_app(Arc::new(StubRoles(Some(UserRole::Member))), None).await?;
    let client = reqwest::Client::new();

    let res = client.get(format!("{}/", base)).send().await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["name"], "Taskify API");
    Ok(())
}

#[tokio::test]
async fn health_bypasses_the_gate() -> Result<()> {
    let base = spawn_app(Arc::new(StubRoles(Some(UserRole::Member))), None).await?;
    let client = reqwest::Client::new();

    let res = client.get(format!("{}/health", base)).send().await?;
    // The suite runs without a database; degraded liveness is still liveness
    assert!(
        res.status() == StatusCode::OK || res.status() == StatusCode::SERVICE_UNAVAILABLE,
        "unexpected status: {}",
        res.status()
    );
    Ok(())
}

#[tokio::test]
async fn anonymous_api_request_is_401() -> Result<()> {
    let base = spawn_app(Arc::new(StubRoles(Some(UserRole::Member))), None).await?;
    let client = reqwest::Client::new();

    for url in [
        format!("{}/api/todos", base),
        format!("{}/api/subscription", base),
    ] {
        let res = client.get(url).send().await?;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let body = res.json::<serde_json::Value>().await?;
        assert_eq!(body["error"], "Unauthorized");
    }
    Ok(())
}

#[tokio::test]
async fn anonymous_page_request_redirects_to_sign_in() -> Result<()> {
    let base = spawn_app(Arc::new(StubRoles(Some(UserRole::Member))), None).await?;
    let client = no_redirect_client()?;

    let res = client.get(format!("{}/dashboard", base)).send().await?;
    assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(res.headers()["location"], "/sign-in");
    Ok(())
}

#[tokio::test]
async fn authenticated_member_on_public_path_goes_to_dashboard() -> Result<()> {
    let base = spawn_app(Arc::new(StubRoles(Some(UserRole::Member))), None).await?;
    let client = no_redirect_client()?;

    let res = client
        .get(format!("{}/", base))
        .bearer_auth(bearer_token_for("user_member"))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(res.headers()["location"], "/dashboard");
    Ok(())
}

#[tokio::test]
async fn member_on_admin_path_is_sent_to_dashboard() -> Result<()> {
    let base = spawn_app(Arc::new(StubRoles(Some(UserRole::Member))), None).await?;
    let client = no_redirect_client()?;

    let res = client
        .get(format!("{}/admin/reports", base))
        .bearer_auth(bearer_token_for("user_member"))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(res.headers()["location"], "/dashboard");
    Ok(())
}

#[tokio::test]
async fn admin_on_dashboard_is_sent_to_admin_dashboard() -> Result<()> {
    let base = spawn_app(Arc::new(StubRoles(Some(UserRole::Admin))), None).await?;
    let client = no_redirect_client()?;

    let res = client
        .get(format!("{}/dashboard", base))
        .bearer_auth(bearer_token_for("user_admin"))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(res.headers()["location"], "/admin/dashboard");
    Ok(())
}

#[tokio::test]
async fn role_lookup_failure_redirects_to_error_page() -> Result<()> {
    let base = spawn_app(Arc::new(StubRoles(None)), None).await?;
    let client = no_redirect_client()?;

    let res = client
        .get(format!("{}/dashboard", base))
        .bearer_auth(bearer_token_for("user_member"))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(res.headers()["location"], "/error");
    Ok(())
}

#[tokio::test]
async fn garbage_bearer_token_is_anonymous() -> Result<()> {
    let base = spawn_app(Arc::new(StubRoles(Some(UserRole::Member))), None).await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/api/todos", base))
        .bearer_auth("not-a-jwt")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}
