mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::Value;

#[tokio::test]
async fn health_endpoint_responds() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client.get(format!("{}/health", server.base_url)).send().await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<Value>().await?;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "ok");
    assert_eq!(body["data"]["store"], "memory");
    Ok(())
}

#[tokio::test]
async fn root_reports_listening_port() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let body = client
        .get(format!("{}/", server.base_url))
        .send()
        .await?
        .json::<Value>()
        .await?;

    let url = body["data"]["url"].as_str().unwrap_or_default();
    assert!(url.starts_with("http://"), "unexpected url {}", url);
    assert!(url.ends_with(&format!(":{}", server.port)), "unexpected url {}", url);
    Ok(())
}

#[tokio::test]
async fn protected_route_needs_token() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/api/auth/whoami", server.base_url))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let body = res.json::<Value>().await?;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Access Denied - No Token");
    Ok(())
}
