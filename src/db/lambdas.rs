//! Lambda definition persistence.

use tokio_postgres::Row;
use uuid::Uuid;

use crate::db::pool::{Db, DbError};
use crate::db::types::{Lambda, NewLambda, User};

const LAMBDA_SQL: &str = "\
    SELECT id, name, description, dockerfile, created_at, updated_at, enabled, created_by \
    FROM lambda";

const LAMBDA_WITH_USER_SQL: &str = "\
    SELECT l.id, l.name, l.description, l.dockerfile, \
           l.created_at, l.updated_at, l.enabled, l.created_by, \
           u.id AS user_id, u.username, u.email, u.role_id AS user_role_id, \
           u.created_at AS user_created_at, u.updated_at AS user_updated_at, \
           u.enabled AS user_enabled \
    FROM lambda l \
    JOIN users u ON l.created_by = u.id";

fn lambda_from_row(row: &Row, with_user: bool) -> Lambda {
    let user = with_user.then(|| User {
        id: row.get("user_id"),
        username: row.get("username"),
        // the credential hash never travels with a listing
        password: String::new(),
        email: row.get("email"),
        role_id: row.get("user_role_id"),
        role: None,
        created_at: row.get("user_created_at"),
        updated_at: row.get("user_updated_at"),
        enabled: row.get("user_enabled"),
    });

    Lambda {
        id: row.get("id"),
        name: row.get("name"),
        description: row.get::<_, Option<String>>("description").unwrap_or_default(),
        dockerfile: row.get::<_, Option<String>>("dockerfile").unwrap_or_default(),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
        enabled: row.get("enabled"),
        created_by: row.get("created_by"),
        user,
    }
}

/// Fetch one lambda. A `Some` scope restricts the lookup to records created
/// by that user; `None` is unrestricted (admin view).
pub async fn get_lambda(db: &Db, id: Uuid, scope: Option<Uuid>) -> Result<Option<Lambda>, DbError> {
    let client = db.client().await?;
    let row = match scope {
        Some(user_id) => {
            let sql = format!("{LAMBDA_SQL} WHERE id = $1 AND created_by = $2");
            client.query_opt(sql.as_str(), &[&id, &user_id]).await?
        }
        None => {
            let sql = format!("{LAMBDA_SQL} WHERE id = $1");
            client.query_opt(sql.as_str(), &[&id]).await?
        }
    };
    Ok(row.map(|row| lambda_from_row(&row, false)))
}

/// List lambdas with their creators joined in. Scope as in [`get_lambda`].
pub async fn get_lambdas(db: &Db, scope: Option<Uuid>) -> Result<Vec<Lambda>, DbError> {
    let client = db.client().await?;
    let rows = match scope {
        Some(user_id) => {
            let sql = format!("{LAMBDA_WITH_USER_SQL} WHERE l.created_by = $1");
            client.query(sql.as_str(), &[&user_id]).await?
        }
        None => client.query(LAMBDA_WITH_USER_SQL, &[]).await?,
    };
    Ok(rows.iter().map(|row| lambda_from_row(row, true)).collect())
}

/// Insert a lambda and return the generated id.
pub async fn insert_lambda(db: &Db, lambda: &NewLambda) -> Result<Uuid, DbError> {
    let mut client = db.client().await?;
    let tx = client.transaction().await?;
    let row = tx
        .query_one(
            "INSERT INTO lambda (name, description, dockerfile, created_at, updated_at, enabled, created_by) \
             VALUES ($1, $2, $3, NOW(), NOW(), $4, $5) \
             RETURNING id",
            &[
                &lambda.name,
                &lambda.description,
                &lambda.dockerfile,
                &lambda.enabled,
                &lambda.created_by,
            ],
        )
        .await?;
    tx.commit().await?;
    Ok(row.get(0))
}

pub async fn update_lambda(db: &Db, lambda: &Lambda) -> Result<(), DbError> {
    let mut client = db.client().await?;
    let tx = client.transaction().await?;
    tx.execute(
        "UPDATE lambda \
         SET name = $1, description = $2, dockerfile = $3, updated_at = NOW(), enabled = $4 \
         WHERE id = $5",
        &[
            &lambda.name,
            &lambda.description,
            &lambda.dockerfile,
            &lambda.enabled,
            &lambda.id,
        ],
    )
    .await?;
    tx.commit().await?;
    Ok(())
}

pub async fn delete_lambda(db: &Db, id: Uuid) -> Result<(), DbError> {
    let mut client = db.client().await?;
    let tx = client.transaction().await?;
    tx.execute("DELETE FROM lambda WHERE id = $1", &[&id]).await?;
    tx.commit().await?;
    Ok(())
}
