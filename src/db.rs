use deadpool_postgres::tokio_postgres::{Config as PgConfig, NoTls};
use deadpool_postgres::{Manager, ManagerConfig, Pool, RecyclingMethod};
use tracing::info;

use crate::config::Config;
use crate::error::AppError;

/// Build a deadpool-postgres pool and verify connectivity once before
/// handing it out.
pub async fn init_pool(cfg: &Config) -> Result<Pool, AppError> {
    let pg_config: PgConfig = cfg
        .database_url
        .parse()
        .map_err(|e: tokio_postgres::Error| AppError::Config(format!("DATABASE_URL: {e}")))?;

    let mgr_config = ManagerConfig {
        recycling_method: RecyclingMethod::Fast,
    };
    let mgr = Manager::from_config(pg_config, NoTls, mgr_config);
    let pool = Pool::builder(mgr)
        .max_size(cfg.db_max_connections)
        .build()
        .map_err(|e| AppError::StartServer(format!("build pool: {e}")))?;

    let client = pool
        .get()
        .await
        .map_err(|e| AppError::StartServer(format!("db connect: {e}")))?;
    client
        .simple_query("SELECT 1")
        .await
        .map_err(|e| AppError::StartServer(format!("db verify: {e}")))?;

    info!(
        max_connections = cfg.db_max_connections,
        "database pool created and verified"
    );

    Ok(pool)
}
