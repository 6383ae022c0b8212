//! Auth gate behavior over a real listener, with the credential lookup
//! collaborator stubbed out.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use uuid::Uuid;

use lambda_host::auth::{self, CredentialLookup};
use lambda_host::db::types::User;
use lambda_host::RouteRegistry;

mod common;

fn sample_user(username: &str) -> User {
    let epoch = chrono::DateTime::from_timestamp(0, 0)
        .expect("epoch")
        .naive_utc();
    User {
        id: Uuid::new_v4(),
        username: username.to_string(),
        password: String::new(),
        email: format!("{username}@example.com"),
        role_id: Uuid::new_v4(),
        role: None,
        created_at: epoch,
        updated_at: epoch,
        enabled: true,
    }
}

struct StaticLookup {
    username: &'static str,
    password: &'static str,
}

#[async_trait]
impl CredentialLookup for StaticLookup {
    async fn lookup(&self, username: &str, password: &str) -> Option<User> {
        (username == self.username && password == self.password).then(|| sample_user(username))
    }
}

fn secure_registry() -> RouteRegistry {
    let lookup = Arc::new(StaticLookup {
        username: "alice",
        password: "s3cret",
    });

    let mut registry = RouteRegistry::new();
    registry.get(
        "/secure",
        auth::guard(lookup, |_ctx, user| async move {
            (StatusCode::OK, user.username).into_response()
        }),
    );
    registry
}

#[tokio::test]
async fn missing_authorization_header_is_401() {
    let addr = common::start_engine(secure_registry(), Duration::from_secs(5)).await;

    let response = reqwest::get(format!("http://{addr}/secure"))
        .await
        .expect("request");
    assert_eq!(response.status(), 401);
    assert_eq!(response.text().await.expect("body"), "Unauthorized Request");
}

#[tokio::test]
async fn wrong_credentials_are_401_and_the_handler_never_runs() {
    let addr = common::start_engine(secure_registry(), Duration::from_secs(5)).await;

    let client = reqwest::Client::new();
    let response = client
        .get(format!("http://{addr}/secure"))
        .basic_auth("alice", Some("wrong"))
        .send()
        .await
        .expect("request");
    assert_eq!(response.status(), 401);
    assert_eq!(response.text().await.expect("body"), "Unauthorized Request");
}

#[tokio::test]
async fn valid_credentials_reach_the_wrapped_handler_with_the_subject() {
    let addr = common::start_engine(secure_registry(), Duration::from_secs(5)).await;

    let client = reqwest::Client::new();
    let response = client
        .get(format!("http://{addr}/secure"))
        .basic_auth("alice", Some("s3cret"))
        .send()
        .await
        .expect("request");
    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.expect("body"), "alice");
}
