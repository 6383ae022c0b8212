//! HTTP Basic authentication gate.
//!
//! # Responsibilities
//! - Decode the `Authorization` header into a username/password pair
//! - Resolve the pair through the credential lookup collaborator
//! - Finalize 401 on any failure, without invoking the wrapped handler
//!
//! # Design Decisions
//! - `guard` produces an ordinary [`RouteHandler`], so the routing engine is
//!   agnostic to whether a handler is wrapped
//! - The lookup sits behind a trait, keeping the gate testable without a
//!   live database

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use crate::db::types::User;
use crate::db::{users, Db};
use crate::engine::registry::{handler, RouteHandler};
use crate::engine::RequestContext;

/// Collaborator resolving a username/password pair to a subject.
#[async_trait]
pub trait CredentialLookup: Send + Sync {
    async fn lookup(&self, username: &str, password: &str) -> Option<User>;
}

#[async_trait]
impl CredentialLookup for Db {
    async fn lookup(&self, username: &str, password: &str) -> Option<User> {
        match users::login(self, username, password).await {
            Ok(user) => user,
            Err(err) => {
                tracing::error!(error = %err, "credential lookup failed");
                None
            }
        }
    }
}

/// Decode a `Basic <base64>` header value into `(username, password)`.
pub fn decode_basic(value: &str) -> Option<(String, String)> {
    let encoded = value.split_whitespace().nth(1)?;
    let decoded = BASE64.decode(encoded).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}

/// The gate's terminal response.
pub fn unauthorized() -> Response {
    (StatusCode::UNAUTHORIZED, "Unauthorized Request").into_response()
}

/// Wrap a handler that expects an authenticated subject.
///
/// The inner handler is invoked with the resolved [`User`], or never.
pub fn guard<L, F, Fut>(lookup: Arc<L>, inner: F) -> RouteHandler
where
    L: CredentialLookup + 'static,
    F: Fn(RequestContext, User) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Response> + Send + 'static,
{
    let inner = Arc::new(inner);
    handler(move |ctx: RequestContext| {
        let lookup = Arc::clone(&lookup);
        let inner = Arc::clone(&inner);
        async move {
            let credentials = ctx
                .headers
                .get(header::AUTHORIZATION)
                .and_then(|value| value.to_str().ok())
                .and_then(decode_basic);

            let Some((username, password)) = credentials else {
                return unauthorized();
            };

            match lookup.lookup(&username, &password).await {
                Some(user) => inner(ctx, user).await,
                None => unauthorized(),
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_a_well_formed_basic_header() {
        // "alice:s3cret"
        let value = format!("Basic {}", BASE64.encode("alice:s3cret"));
        let (username, password) = decode_basic(&value).expect("credentials");
        assert_eq!(username, "alice");
        assert_eq!(password, "s3cret");
    }

    #[test]
    fn password_may_contain_colons() {
        let value = format!("Basic {}", BASE64.encode("alice:a:b:c"));
        let (_, password) = decode_basic(&value).expect("credentials");
        assert_eq!(password, "a:b:c");
    }

    #[test]
    fn rejects_missing_payload() {
        assert!(decode_basic("Basic").is_none());
    }

    #[test]
    fn rejects_invalid_base64() {
        assert!(decode_basic("Basic %%%%").is_none());
    }

    #[test]
    fn rejects_payload_without_separator() {
        let value = format!("Basic {}", BASE64.encode("no-colon-here"));
        assert!(decode_basic(&value).is_none());
    }
}
