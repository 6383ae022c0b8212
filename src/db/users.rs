//! User persistence and credential verification.

use tokio_postgres::Row;
use uuid::Uuid;

use crate::db::hash;
use crate::db::pool::{Db, DbError};
use crate::db::types::{NewUser, Role, User};

const USER_SQL: &str = "\
    SELECT id, username, password, email, role_id, created_at, updated_at, enabled \
    FROM users";

const USER_WITH_ROLE_SQL: &str = "\
    SELECT u.id, u.username, u.password, u.email, u.role_id, \
           u.created_at, u.updated_at, u.enabled, \
           r.name AS role_name, r.created_at AS role_created_at, \
           r.updated_at AS role_updated_at, r.enabled AS role_enabled \
    FROM users u \
    INNER JOIN roles r ON u.role_id = r.id";

fn user_from_row(row: &Row, with_role: bool) -> User {
    let role_id: Uuid = row.get("role_id");
    let role = with_role.then(|| Role {
        id: role_id,
        name: row.get("role_name"),
        created_at: row.get("role_created_at"),
        updated_at: row.get("role_updated_at"),
        enabled: row.get("role_enabled"),
    });

    User {
        id: row.get("id"),
        username: row.get("username"),
        password: row.get("password"),
        email: row.get("email"),
        role_id,
        role,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
        enabled: row.get("enabled"),
    }
}

pub async fn get_user(db: &Db, id: Uuid, with_role: bool) -> Result<Option<User>, DbError> {
    let client = db.client().await?;
    let sql = if with_role {
        format!("{USER_WITH_ROLE_SQL} WHERE u.id = $1")
    } else {
        format!("{USER_SQL} WHERE id = $1")
    };
    let row = client.query_opt(sql.as_str(), &[&id]).await?;
    Ok(row.map(|row| user_from_row(&row, with_role)))
}

pub async fn get_user_by_username(
    db: &Db,
    username: &str,
    with_role: bool,
) -> Result<Option<User>, DbError> {
    let client = db.client().await?;
    let sql = if with_role {
        format!("{USER_WITH_ROLE_SQL} WHERE u.username = $1")
    } else {
        format!("{USER_SQL} WHERE username = $1")
    };
    let row = client.query_opt(sql.as_str(), &[&username]).await?;
    Ok(row.map(|row| user_from_row(&row, with_role)))
}

/// Insert a user and return the generated id.
pub async fn insert_user(db: &Db, user: &NewUser) -> Result<Uuid, DbError> {
    let mut client = db.client().await?;
    let tx = client.transaction().await?;
    let row = tx
        .query_one(
            "INSERT INTO users (username, password, email, role_id, created_at, updated_at, enabled) \
             VALUES ($1, $2, $3, $4, NOW(), NOW(), $5) \
             RETURNING id",
            &[
                &user.username,
                &user.password,
                &user.email,
                &user.role_id,
                &user.enabled,
            ],
        )
        .await?;
    tx.commit().await?;
    Ok(row.get(0))
}

pub async fn update_user(db: &Db, user: &User) -> Result<(), DbError> {
    let mut client = db.client().await?;
    let tx = client.transaction().await?;
    tx.execute(
        "UPDATE users \
         SET username = $1, password = $2, email = $3, role_id = $4, updated_at = NOW(), enabled = $5 \
         WHERE id = $6",
        &[
            &user.username,
            &user.password,
            &user.email,
            &user.role_id,
            &user.enabled,
            &user.id,
        ],
    )
    .await?;
    tx.commit().await?;
    Ok(())
}

pub async fn delete_user(db: &Db, username: &str) -> Result<(), DbError> {
    let mut client = db.client().await?;
    let tx = client.transaction().await?;
    tx.execute("DELETE FROM users WHERE username = $1", &[&username])
        .await?;
    tx.commit().await?;
    Ok(())
}

/// Resolve a username/password pair to a user, or `None` when the user is
/// unknown or the password does not verify.
pub async fn login(db: &Db, username: &str, password: &str) -> Result<Option<User>, DbError> {
    let Some(user) = get_user_by_username(db, username, false).await? else {
        return Ok(None);
    };
    if !hash::verify(password, &user.password) {
        return Ok(None);
    }
    Ok(Some(user))
}
