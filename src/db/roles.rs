//! Role persistence.

use tokio_postgres::Row;
use uuid::Uuid;

use crate::db::pool::{Db, DbError};
use crate::db::types::{NewRole, Role};

const ROLE_SQL: &str = "SELECT id, name, created_at, updated_at, enabled FROM roles";

fn role_from_row(row: &Row) -> Role {
    Role {
        id: row.get("id"),
        name: row.get("name"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
        enabled: row.get("enabled"),
    }
}

pub async fn get_role(db: &Db, id: Uuid) -> Result<Option<Role>, DbError> {
    let client = db.client().await?;
    let sql = format!("{ROLE_SQL} WHERE id = $1");
    let row = client.query_opt(sql.as_str(), &[&id]).await?;
    Ok(row.as_ref().map(role_from_row))
}

pub async fn get_roles(db: &Db) -> Result<Vec<Role>, DbError> {
    let client = db.client().await?;
    let rows = client.query(ROLE_SQL, &[]).await?;
    Ok(rows.iter().map(role_from_row).collect())
}

/// Insert a role and return the generated id.
pub async fn insert_role(db: &Db, role: &NewRole) -> Result<Uuid, DbError> {
    let mut client = db.client().await?;
    let tx = client.transaction().await?;
    let row = tx
        .query_one(
            "INSERT INTO roles (name, created_at, updated_at, enabled) \
             VALUES ($1, NOW(), NOW(), $2) \
             RETURNING id",
            &[&role.name, &role.enabled],
        )
        .await?;
    tx.commit().await?;
    Ok(row.get(0))
}

pub async fn update_role(db: &Db, role: &Role) -> Result<(), DbError> {
    let mut client = db.client().await?;
    let tx = client.transaction().await?;
    tx.execute(
        "UPDATE roles SET name = $1, updated_at = NOW(), enabled = $2 WHERE id = $3",
        &[&role.name, &role.enabled, &role.id],
    )
    .await?;
    tx.commit().await?;
    Ok(())
}

pub async fn delete_role(db: &Db, id: Uuid) -> Result<(), DbError> {
    let mut client = db.client().await?;
    let tx = client.transaction().await?;
    tx.execute("DELETE FROM roles WHERE id = $1", &[&id]).await?;
    tx.commit().await?;
    Ok(())
}
