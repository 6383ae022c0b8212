//! Lambda CRUD endpoints, all behind the authentication gate.

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth;
use crate::controllers::internal_error;
use crate::db::types::{NewLambda, User};
use crate::db::{executions, lambdas, roles, Db, DbError};
use crate::engine::{RequestContext, RouteRegistry};

#[derive(Debug, Default, Deserialize)]
struct LambdaPayload {
    id: Option<Uuid>,
    name: Option<String>,
    description: Option<String>,
    dockerfile: Option<String>,
    #[serde(default)]
    enabled: bool,
}

pub fn register(registry: &mut RouteRegistry, db: Arc<Db>) {
    registry.get("/lambdas", guarded(&db, list_lambdas));
    registry.get("/lambdas/:id", guarded(&db, get_lambda));
    registry.get("/lambdas/:id/executions", guarded(&db, list_executions));
    registry.post("/lambdas", guarded(&db, save_lambda));
    registry.put("/lambdas/:id", guarded(&db, save_lambda));
    registry.delete("/lambdas/:id", guarded(&db, delete_lambda));
}

/// Wrap a controller function with the auth gate and its database handle.
fn guarded<F, Fut>(db: &Arc<Db>, controller: F) -> crate::engine::RouteHandler
where
    F: Fn(Arc<Db>, RequestContext, User) -> Fut + Send + Sync + Copy + 'static,
    Fut: std::future::Future<Output = Response> + Send + 'static,
{
    let db = Arc::clone(db);
    auth::guard(Arc::clone(&db), move |ctx, user| {
        let db = Arc::clone(&db);
        async move { controller(db, ctx, user).await }
    })
}

/// Admin sees everything; everyone else only their own records.
async fn visibility_scope(db: &Db, user: &User) -> Result<Option<Uuid>, DbError> {
    let role = match &user.role {
        Some(role) => Some(role.clone()),
        None => roles::get_role(db, user.role_id).await?,
    };
    Ok(match role {
        Some(role) if role.is_admin() => None,
        _ => Some(user.id),
    })
}

fn parse_id(ctx: &RequestContext) -> Option<Uuid> {
    ctx.param("id").and_then(|raw| Uuid::parse_str(raw).ok())
}

fn not_found(id: Uuid) -> Response {
    (StatusCode::NOT_FOUND, format!("lambda by id {} not found", id)).into_response()
}

async fn list_lambdas(db: Arc<Db>, _ctx: RequestContext, user: User) -> Response {
    let scope = match visibility_scope(&db, &user).await {
        Ok(scope) => scope,
        Err(err) => return internal_error(err),
    };

    match lambdas::get_lambdas(&db, scope).await {
        Ok(list) => (StatusCode::OK, Json(list)).into_response(),
        Err(err) => internal_error(err),
    }
}

async fn get_lambda(db: Arc<Db>, ctx: RequestContext, user: User) -> Response {
    let Some(id) = parse_id(&ctx) else {
        return (StatusCode::BAD_REQUEST, "Bad Request").into_response();
    };

    let scope = match visibility_scope(&db, &user).await {
        Ok(scope) => scope,
        Err(err) => return internal_error(err),
    };

    match lambdas::get_lambda(&db, id, scope).await {
        Ok(Some(lambda)) => (StatusCode::OK, Json(lambda)).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, "Not Found").into_response(),
        Err(err) => internal_error(err),
    }
}

async fn list_executions(db: Arc<Db>, ctx: RequestContext, user: User) -> Response {
    let Some(id) = parse_id(&ctx) else {
        return (StatusCode::BAD_REQUEST, "Bad Request").into_response();
    };

    let scope = match visibility_scope(&db, &user).await {
        Ok(scope) => scope,
        Err(err) => return internal_error(err),
    };

    match lambdas::get_lambda(&db, id, scope).await {
        Ok(Some(_)) => {}
        Ok(None) => return not_found(id),
        Err(err) => return internal_error(err),
    }

    match executions::get_lambda_executions(&db, id).await {
        Ok(list) => (StatusCode::OK, Json(list)).into_response(),
        Err(err) => internal_error(err),
    }
}

/// Create on POST, update on PUT; the id comes from the body or the path.
async fn save_lambda(db: Arc<Db>, ctx: RequestContext, user: User) -> Response {
    let payload: LambdaPayload = ctx.body_as().unwrap_or_default();
    let name = payload.name.filter(|value| !value.is_empty());
    let description = payload.description.filter(|value| !value.is_empty());
    let dockerfile = payload.dockerfile.filter(|value| !value.is_empty());

    let (Some(name), Some(description), Some(dockerfile)) = (name, description, dockerfile) else {
        return (StatusCode::BAD_REQUEST, "Bad Request").into_response();
    };

    let id = payload.id.or_else(|| parse_id(&ctx));

    let Some(id) = id else {
        let draft = NewLambda {
            name,
            description,
            dockerfile,
            enabled: payload.enabled,
            created_by: user.id,
        };
        return match lambdas::insert_lambda(&db, &draft).await {
            Ok(id) => match lambdas::get_lambda(&db, id, None).await {
                Ok(Some(lambda)) => (StatusCode::OK, Json(lambda)).into_response(),
                Ok(None) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "error saving lambda").into_response()
                }
                Err(err) => internal_error(err),
            },
            Err(err) => internal_error(err),
        };
    };

    // update path: the record must exist and belong to the caller
    let mut lambda = match lambdas::get_lambda(&db, id, None).await {
        Ok(Some(lambda)) => lambda,
        Ok(None) => return not_found(id),
        Err(err) => return internal_error(err),
    };

    let scope = match visibility_scope(&db, &user).await {
        Ok(scope) => scope,
        Err(err) => return internal_error(err),
    };
    if let Some(owner) = scope {
        if lambda.created_by != owner {
            return auth::unauthorized();
        }
    }

    lambda.name = name;
    lambda.description = description;
    lambda.dockerfile = dockerfile;
    lambda.enabled = payload.enabled;

    match lambdas::update_lambda(&db, &lambda).await {
        Ok(()) => (StatusCode::OK, Json(lambda)).into_response(),
        Err(err) => internal_error(err),
    }
}

async fn delete_lambda(db: Arc<Db>, ctx: RequestContext, user: User) -> Response {
    let Some(id) = parse_id(&ctx) else {
        return (StatusCode::BAD_REQUEST, "Bad Request").into_response();
    };

    let scope = match visibility_scope(&db, &user).await {
        Ok(scope) => scope,
        Err(err) => return internal_error(err),
    };

    match lambdas::get_lambda(&db, id, scope).await {
        Ok(Some(_)) => {}
        Ok(None) => return not_found(id),
        Err(err) => return internal_error(err),
    }

    match lambdas::delete_lambda(&db, id).await {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({ "result": true })),
        )
            .into_response(),
        Err(err) => internal_error(err),
    }
}
