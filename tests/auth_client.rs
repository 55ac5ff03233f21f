mod common;

use axum::http::Method;
use common::{FakeService, Reply, GUEST_ID};
use regtime::config::DatabaseConfig;
use regtime::db::{AuthClient, DataClient, DbError};
use serde_json::json;

fn client(fake: &FakeService) -> AuthClient {
    AuthClient::new(&fake.database_config()).expect("auth client")
}

#[tokio::test]
async fn sign_up_posts_credentials_with_api_key() {
    let fake = FakeService::start().await;
    fake.reply(
        Method::POST,
        "/auth/v1/signup",
        Reply::json(200, json!({ "id": GUEST_ID, "email": "a@b.c" })),
    );

    let created = client(&fake).sign_up("a@b.c", "hunter22").await.unwrap();

    assert_eq!(created["email"], "a@b.c");
    let request = &fake.requests_to("/auth/v1/signup")[0];
    assert_eq!(request.method, Method::POST);
    assert_eq!(request.header("apikey").as_deref(), Some("anon-key"));
    assert_eq!(request.json_body(), json!({ "email": "a@b.c", "password": "hunter22" }));
}

#[tokio::test]
async fn sign_up_rejection_keeps_status_and_body() {
    let fake = FakeService::start().await;
    fake.reply(
        Method::POST,
        "/auth/v1/signup",
        Reply::text(422, "User already registered"),
    );

    let err = client(&fake).sign_up("a@b.c", "hunter22").await.unwrap_err();

    assert_eq!(err.status(), Some(422));
    assert_eq!(err.to_string(), "User already registered");
}

#[tokio::test]
async fn sign_out_sends_bearer_token() {
    let fake = FakeService::start().await;
    fake.reply(Method::POST, "/auth/v1/logout", Reply::no_content());

    let accepted = client(&fake).sign_out("session-token").await.unwrap();

    assert!(accepted);
    let request = &fake.requests_to("/auth/v1/logout")[0];
    assert_eq!(request.header("authorization").as_deref(), Some("Bearer session-token"));
    assert_eq!(request.header("apikey").as_deref(), Some("anon-key"));
}

#[tokio::test]
async fn sign_out_reports_refusal() {
    let fake = FakeService::start().await;
    fake.reply(Method::POST, "/auth/v1/logout", Reply::text(401, "invalid JWT"));

    assert!(!client(&fake).sign_out("expired").await.unwrap());
}

#[tokio::test]
async fn get_user_treats_rejection_as_no_user() {
    let fake = FakeService::start().await;
    fake.reply(Method::GET, "/auth/v1/user", Reply::text(401, "invalid JWT"));

    assert_eq!(client(&fake).get_user("expired").await.unwrap(), None);
}

#[tokio::test]
async fn key_with_newline_never_reaches_the_wire() {
    let fake = FakeService::start().await;
    let config = DatabaseConfig {
        anon_key: "anon-key\n".to_string(),
        ..fake.database_config()
    };

    assert!(matches!(DataClient::new(&config), Err(DbError::InvalidApiKey)));
    assert!(matches!(AuthClient::new(&config), Err(DbError::InvalidApiKey)));
    assert!(fake.requests().is_empty());
}
