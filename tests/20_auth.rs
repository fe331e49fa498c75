mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::json;
use uuid::Uuid;

use qr_feedback_api::auth::TokenService;
use qr_feedback_api::types::Role;

use common::{TestApp, TEST_PASSWORD};

#[tokio::test]
async fn missing_header_is_rejected() {
    let app = TestApp::new();
    let res = app.get("/api/auth/whoami", None).await;

    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.body["message"], "Access Denied - No Token");
}

#[tokio::test]
async fn token_signed_with_other_secret_is_invalid() {
    let app = TestApp::new();
    let advisor = app.seed("a@example.com", Role::Advisor).await;
    let forged = TokenService::new("some-other-secret", 1)
        .unwrap()
        .issue(advisor.id, Role::Manager)
        .unwrap();

    let res = app.get("/api/auth/whoami", Some(&forged)).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.body["message"], "Invalid Token");
}

#[tokio::test]
async fn malformed_token_is_invalid() {
    let app = TestApp::new();
    for garbage in ["not.a.jwt", "abc", "Bearer"] {
        let res = app.get("/api/auth/whoami", Some(garbage)).await;
        assert_eq!(res.status, StatusCode::UNAUTHORIZED, "token {:?}", garbage);
        assert_eq!(res.body["message"], "Invalid Token");
    }
}

#[tokio::test]
async fn expired_token_is_reported_as_expired() {
    let app = TestApp::new();
    let advisor = app.seed("a@example.com", Role::Advisor).await;
    let token = app.expired_token_for(advisor.id, advisor.role);

    let res = app.get("/api/auth/whoami", Some(&token)).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.body["message"], "Token Expired");
}

#[tokio::test]
async fn deleted_principal_is_not_found() {
    let app = TestApp::new();
    let advisor = app.seed("gone@example.com", Role::Advisor).await;
    let token = app.token_for(advisor.id, advisor.role);
    app.store.remove_advisor(advisor.id).await;

    let res = app.get("/api/auth/whoami", Some(&token)).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.body["message"], "User not found");

    let never_existed = app.token_for(Uuid::new_v4(), Role::Manager);
    let res = app.get("/api/advisors", Some(&never_existed)).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn whoami_reports_stored_role() {
    let app = TestApp::new();
    let advisor = app.seed("a@example.com", Role::Advisor).await;
    let token = app.token_for(advisor.id, Role::Manager);

    let res = app.get("/api/auth/whoami", Some(&token)).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["data"]["advisor_id"], advisor.id.to_string());
    assert_eq!(res.body["data"]["role"], "advisor");
}

#[tokio::test]
async fn raw_token_without_bearer_prefix_is_accepted() {
    let app = TestApp::new();
    let advisor = app.seed("a@example.com", Role::Advisor).await;
    let token = app.token_for(advisor.id, advisor.role);

    let request = Request::builder()
        .uri("/api/auth/whoami")
        .header(header::AUTHORIZATION, token)
        .body(Body::empty())
        .unwrap();
    let res = app.send(request).await;
    assert_eq!(res.status, StatusCode::OK);
}

#[tokio::test]
async fn login_issues_working_token() {
    let app = TestApp::new();
    let advisor = app.seed("login@example.com", Role::Advisor).await;

    let res = app
        .post_json(
            "/api/advisors/login",
            None,
            json!({ "email": "Login@Example.com", "password": TEST_PASSWORD }),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["data"]["advisor"]["id"], advisor.id.to_string());
    assert!(res.body["data"]["advisor"].get("password_hash").is_none());

    let token = res.body["data"]["token"].as_str().unwrap().to_string();
    let me = app.get("/api/auth/whoami", Some(&token)).await;
    assert_eq!(me.status, StatusCode::OK);
}

#[tokio::test]
async fn login_failures_look_identical() {
    let app = TestApp::new();
    app.seed("login@example.com", Role::Advisor).await;

    let wrong_password = app
        .post_json("/api/advisors/login", None, json!({ "email": "login@example.com", "password": "nope-nope" }))
        .await;
    let unknown_email = app
        .post_json("/api/advisors/login", None, json!({ "email": "who@example.com", "password": TEST_PASSWORD }))
        .await;

    assert_eq!(wrong_password.status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_email.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password.body, unknown_email.body);
    assert_eq!(wrong_password.body["message"], "Invalid credentials");

    let empty = app.post_json("/api/advisors/login", None, json!({})).await;
    assert_eq!(empty.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn malformed_login_body_uses_error_envelope() {
    let app = TestApp::new();

    let form = app.post_form("/api/advisors/login", "email=a%40example.com&password=x").await;
    assert_eq!(form.status, StatusCode::BAD_REQUEST);
    assert_eq!(form.body["success"], false);
    assert_eq!(form.body["error"], "INVALID_JSON");

    let wrong_type = app.post_json("/api/advisors/login", None, json!({ "email": 5 })).await;
    assert_eq!(wrong_type.status, StatusCode::BAD_REQUEST);
    assert_eq!(wrong_type.body["success"], false);
    assert_eq!(wrong_type.body["error"], "INVALID_JSON");
}

#[tokio::test]
async fn token_with_unrecognised_role_claim_still_authenticates() {
    let app = TestApp::new();
    let advisor = app.seed("a@example.com", Role::Advisor).await;
    let key = jsonwebtoken::EncodingKey::from_secret(common::TEST_SECRET.as_bytes());
    let exp = chrono::Utc::now().timestamp() + 3600;

    for claims in [
        json!({ "advisorId": advisor.id, "role": "admin", "exp": exp, "iat": 0 }),
        json!({ "advisorId": advisor.id, "exp": exp, "iat": 0 }),
    ] {
        let token = jsonwebtoken::encode(&jsonwebtoken::Header::default(), &claims, &key).unwrap();
        let res = app.get("/api/auth/whoami", Some(&token)).await;
        assert_eq!(res.status, StatusCode::OK, "claims {}", claims);
        assert_eq!(res.body["data"]["role"], "advisor");
    }
}
