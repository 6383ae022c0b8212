//! Login endpoint.

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use crate::controllers::internal_error;
use crate::db::{users, Db};
use crate::engine::registry::handler;
use crate::engine::{RequestContext, RouteRegistry};

#[derive(Debug, Default, Deserialize)]
struct LoginPayload {
    username: Option<String>,
    password: Option<String>,
}

pub fn register(registry: &mut RouteRegistry, db: Arc<Db>) {
    registry.post(
        "/login",
        handler(move |ctx| {
            let db = Arc::clone(&db);
            async move { login(db, ctx).await }
        }),
    );
}

async fn login(db: Arc<Db>, ctx: RequestContext) -> Response {
    let payload: LoginPayload = ctx.body_as().unwrap_or_default();
    let username = payload.username.filter(|value| !value.is_empty());
    let password = payload.password.filter(|value| !value.is_empty());

    let (Some(username), Some(password)) = (username, password) else {
        tracing::info!("login attempted without username or password");
        return (StatusCode::BAD_REQUEST, "Username and password are required").into_response();
    };

    match users::login(&db, &username, &password).await {
        Ok(Some(mut user)) => {
            // the credential hash never goes back to the client
            user.password.clear();
            tracing::info!(username = %username, "login successful");
            (StatusCode::OK, Json(user)).into_response()
        }
        Ok(None) => {
            tracing::info!(username = %username, "login failed");
            (StatusCode::UNAUTHORIZED, "Invalid username or password").into_response()
        }
        Err(err) => internal_error(err),
    }
}
