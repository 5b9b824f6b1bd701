use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::domain::DomainError;
use crate::ports::ConnectionGateway;

/// Postgres-backed connection gateway.
///
/// Holds at most one pool, sized to a single connection: the app is a
/// single-operator admin tool and the orchestrator already guarantees one
/// session at a time.
pub struct PostgresGateway {
    pool: RwLock<Option<PgPool>>,
}

impl PostgresGateway {
    pub fn new() -> Self {
        Self {
            pool: RwLock::new(None),
        }
    }
}

impl Default for PostgresGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConnectionGateway for PostgresGateway {
    async fn connect(&self, dsn: &str) -> Result<(), DomainError> {
        let pool = PgPoolOptions::new()
            .max_connections(1)
            .connect(dsn)
            .await
            .map_err(|e| DomainError::Gateway(e.to_string()))?;

        *self.pool.write().await = Some(pool);
        info!("Database session opened");
        Ok(())
    }

    async fn disconnect(&self) {
        if let Some(pool) = self.pool.write().await.take() {
            pool.close().await;
            info!("Database session released");
        }
    }

    async fn check(&self) -> bool {
        let guard = self.pool.read().await;
        match guard.as_ref() {
            Some(pool) => {
                let alive = sqlx::query("SELECT 1").execute(pool).await.is_ok();
                debug!(alive, "Session probe");
                alive
            }
            None => false,
        }
    }
}
