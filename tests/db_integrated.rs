//! Persistence tests against a live PostgreSQL instance.
//!
//! These require a migrated database reachable through the DB_* environment
//! variables, so they are ignored by default:
//!
//! ```text
//! cargo test -- --ignored
//! ```

use lambda_host::config::load_config;
use lambda_host::db::types::{NewLambda, NewLambdaExecution, NewRole, NewUser};
use lambda_host::db::{executions, hash, lambdas, roles, users, Db};

fn connect() -> Db {
    let config = load_config(None).expect("config");
    Db::connect(&config.database).expect("pool")
}

#[tokio::test]
#[ignore]
async fn user_roundtrip_and_login() {
    let db = connect();

    let role_id = roles::insert_role(
        &db,
        &NewRole {
            name: "user_roundtrip_role".to_string(),
            enabled: true,
        },
    )
    .await
    .expect("insert role");

    let username = format!("it_user_{}", uuid::Uuid::new_v4().simple());
    let user_id = users::insert_user(
        &db,
        &NewUser {
            username: username.clone(),
            password: hash::hash("hunter2"),
            email: format!("{username}@example.com"),
            role_id,
            enabled: true,
        },
    )
    .await
    .expect("insert user");

    let fetched = users::get_user(&db, user_id, true)
        .await
        .expect("get user")
        .expect("user exists");
    assert_eq!(fetched.username, username);
    assert_eq!(
        fetched.role.as_ref().map(|r| r.name.as_str()),
        Some("user_roundtrip_role")
    );

    let subject = users::login(&db, &username, "hunter2")
        .await
        .expect("login query");
    assert!(subject.is_some());

    let rejected = users::login(&db, &username, "wrong")
        .await
        .expect("login query");
    assert!(rejected.is_none());

    users::delete_user(&db, &username).await.expect("delete user");
    roles::delete_role(&db, role_id).await.expect("delete role");
}

#[tokio::test]
#[ignore]
async fn lambda_crud_with_executions() {
    let db = connect();

    let role_id = roles::insert_role(
        &db,
        &NewRole {
            name: "lambda_crud_role".to_string(),
            enabled: true,
        },
    )
    .await
    .expect("insert role");

    let username = format!("it_owner_{}", uuid::Uuid::new_v4().simple());
    let owner_id = users::insert_user(
        &db,
        &NewUser {
            username: username.clone(),
            password: hash::hash("hunter2"),
            email: format!("{username}@example.com"),
            role_id,
            enabled: true,
        },
    )
    .await
    .expect("insert user");

    let lambda_id = lambdas::insert_lambda(
        &db,
        &NewLambda {
            name: "resize-images".to_string(),
            description: "resizes uploaded images".to_string(),
            dockerfile: "FROM alpine".to_string(),
            enabled: true,
            created_by: owner_id,
        },
    )
    .await
    .expect("insert lambda");

    // scoped fetch: the owner sees it, a foreign scope does not
    let visible = lambdas::get_lambda(&db, lambda_id, Some(owner_id))
        .await
        .expect("get lambda");
    assert!(visible.is_some());
    let hidden = lambdas::get_lambda(&db, lambda_id, Some(uuid::Uuid::new_v4()))
        .await
        .expect("get lambda");
    assert!(hidden.is_none());

    let mut lambda = visible.expect("lambda");
    lambda.description = "resizes and compresses images".to_string();
    lambdas::update_lambda(&db, &lambda).await.expect("update");

    let listed = lambdas::get_lambdas(&db, Some(owner_id))
        .await
        .expect("list lambdas");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].description, "resizes and compresses images");
    assert_eq!(
        listed[0].user.as_ref().map(|u| u.username.as_str()),
        Some(username.as_str())
    );

    let execution_id = executions::insert_lambda_execution(
        &db,
        &NewLambdaExecution {
            lambda_id,
            status: "completed".to_string(),
            result: Some("ok".to_string()),
            enabled: true,
        },
    )
    .await
    .expect("insert execution");

    let runs = executions::get_lambda_executions(&db, lambda_id)
        .await
        .expect("list executions");
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].status, "completed");

    executions::delete_lambda_execution(&db, execution_id)
        .await
        .expect("delete execution");
    lambdas::delete_lambda(&db, lambda_id).await.expect("delete lambda");
    users::delete_user(&db, &username).await.expect("delete user");
    roles::delete_role(&db, role_id).await.expect("delete role");
}
