//! PostgreSQL connection pooling.

use deadpool_postgres::{Config as PoolSettings, ManagerConfig, Object, Pool, RecyclingMethod, Runtime};
use thiserror::Error;
use tokio_postgres::NoTls;

use crate::config::DatabaseConfig;

/// Error type for persistence operations.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("pool creation failed: {0}")]
    Create(#[from] deadpool_postgres::CreatePoolError),

    #[error("connection checkout failed: {0}")]
    Checkout(#[from] deadpool_postgres::PoolError),

    #[error("query failed: {0}")]
    Query(#[from] tokio_postgres::Error),
}

/// Shared handle to the PostgreSQL pool.
pub struct Db {
    pool: Pool,
}

impl Db {
    /// Build the pool from configuration. Connections are established
    /// lazily, so this does not touch the network.
    pub fn connect(config: &DatabaseConfig) -> Result<Self, DbError> {
        let mut settings = PoolSettings::new();
        settings.user = Some(config.user.clone());
        settings.password = Some(config.password.clone());
        settings.dbname = Some(config.dbname.clone());
        settings.host = Some(config.host.clone());
        settings.port = Some(config.port);
        settings.manager = Some(ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        });
        settings.pool = Some(deadpool_postgres::PoolConfig::new(config.max_connections));

        let pool = settings.create_pool(Some(Runtime::Tokio1), NoTls)?;
        Ok(Self { pool })
    }

    pub(crate) async fn client(&self) -> Result<Object, DbError> {
        Ok(self.pool.get().await?)
    }
}
