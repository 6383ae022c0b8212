//! Lambda execution persistence.

use tokio_postgres::Row;
use uuid::Uuid;

use crate::db::pool::{Db, DbError};
use crate::db::types::{LambdaExecution, NewLambdaExecution};

const EXECUTION_SQL: &str = "\
    SELECT id, lambda_id, status, result, created_at, updated_at, enabled \
    FROM lambda_executions";

fn execution_from_row(row: &Row) -> LambdaExecution {
    LambdaExecution {
        id: row.get("id"),
        lambda_id: row.get("lambda_id"),
        status: row.get("status"),
        result: row.get("result"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
        enabled: row.get("enabled"),
    }
}

pub async fn get_lambda_executions(db: &Db, lambda_id: Uuid) -> Result<Vec<LambdaExecution>, DbError> {
    let client = db.client().await?;
    let sql = format!("{EXECUTION_SQL} WHERE lambda_id = $1");
    let rows = client.query(sql.as_str(), &[&lambda_id]).await?;
    Ok(rows.iter().map(execution_from_row).collect())
}

/// Insert an execution record and return the generated id.
pub async fn insert_lambda_execution(
    db: &Db,
    execution: &NewLambdaExecution,
) -> Result<Uuid, DbError> {
    let mut client = db.client().await?;
    let tx = client.transaction().await?;
    let row = tx
        .query_one(
            "INSERT INTO lambda_executions (lambda_id, status, result, created_at, updated_at, enabled) \
             VALUES ($1, $2, $3, NOW(), NOW(), $4) \
             RETURNING id",
            &[
                &execution.lambda_id,
                &execution.status,
                &execution.result,
                &execution.enabled,
            ],
        )
        .await?;
    tx.commit().await?;
    Ok(row.get(0))
}

pub async fn update_lambda_execution(db: &Db, execution: &LambdaExecution) -> Result<(), DbError> {
    let mut client = db.client().await?;
    let tx = client.transaction().await?;
    tx.execute(
        "UPDATE lambda_executions \
         SET lambda_id = $1, status = $2, result = $3, updated_at = NOW(), enabled = $4 \
         WHERE id = $5",
        &[
            &execution.lambda_id,
            &execution.status,
            &execution.result,
            &execution.enabled,
            &execution.id,
        ],
    )
    .await?;
    tx.commit().await?;
    Ok(())
}

pub async fn delete_lambda_execution(db: &Db, id: Uuid) -> Result<(), DbError> {
    let mut client = db.client().await?;
    let tx = client.transaction().await?;
    tx.execute("DELETE FROM lambda_executions WHERE id = $1", &[&id])
        .await?;
    tx.commit().await?;
    Ok(())
}
