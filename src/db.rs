//! Database module
//!
//! Connection routing (primary for writes, replicas for reads) and
//! schema utilities.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::{Executor, PgPool};

use crate::config::DatabaseConfig;

/// Schema for the catalog, kept in sync with `migrations/`
pub const SCHEMA_SQL: &str = include_str!("../migrations/0001_create_books.sql");

/// Per-role pool bounds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolSettings {
    pub min_connections: u32,
    pub max_connections: u32,
    /// Idle connections above `min_connections` are closed after this long
    pub idle_timeout: Duration,
    /// How long a caller waits for a free connection before failing
    pub acquire_timeout: Duration,
}

impl PoolSettings {
    pub fn new(min_connections: u32, max_connections: u32) -> Self {
        Self {
            min_connections,
            max_connections,
            idle_timeout: Duration::from_secs(30),
            acquire_timeout: Duration::from_secs(30),
        }
    }

    pub fn with_idle_timeout(mut self, idle_timeout: Duration) -> Self {
        self.idle_timeout = idle_timeout;
        self
    }

    pub fn with_acquire_timeout(mut self, acquire_timeout: Duration) -> Self {
        self.acquire_timeout = acquire_timeout;
        self
    }

    /// Check `min <= max` and `max > 0`
    pub fn validate(&self, role: &'static str) -> Result<(), ClusterError> {
        if self.max_connections == 0 || self.min_connections > self.max_connections {
            return Err(ClusterError::InvalidPoolBounds {
                role,
                min: self.min_connections,
                max: self.max_connections,
            });
        }
        Ok(())
    }

    fn options(&self) -> PgPoolOptions {
        PgPoolOptions::new()
            .min_connections(self.min_connections)
            .max_connections(self.max_connections)
            .idle_timeout(Some(self.idle_timeout))
            .acquire_timeout(self.acquire_timeout)
    }
}

/// Errors raised while building the cluster
#[derive(Debug, thiserror::Error)]
pub enum ClusterError {
    #[error("Invalid {role} pool bounds: min {min} > max {max} or max is zero")]
    InvalidPoolBounds {
        role: &'static str,
        min: u32,
        max: u32,
    },

    #[error("Failed to connect to {target}: {source}")]
    Connect {
        target: String,
        #[source]
        source: sqlx::Error,
    },
}

/// Primary/replica connection router.
///
/// Writes go to `primary()`. Reads go to `replica()`, which cycles through
/// the replicas with a lock-free counter and falls back to the primary when
/// none are configured.
#[derive(Debug)]
pub struct DbCluster {
    primary: PgPool,
    replicas: Vec<PgPool>,
    counter: AtomicUsize,
}

impl DbCluster {
    /// Open and check the primary and every replica.
    ///
    /// If any pool fails to connect, every pool opened so far is closed
    /// before the error is returned.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, ClusterError> {
        config.primary_pool.validate("primary")?;
        config.replica_pool.validate("replica")?;

        let primary = open_pool(&config.primary_url, &config.primary_pool)
            .await
            .map_err(|source| ClusterError::Connect {
                target: "primary".to_string(),
                source,
            })?;

        Self::with_replicas(primary, &config.replica_urls, &config.replica_pool).await
    }

    /// Open the replicas behind an already-open primary.
    ///
    /// On the first replica failure the primary and the replicas opened
    /// before it are closed, then the error names the failing replica
    /// (1-based).
    pub async fn with_replicas(
        primary: PgPool,
        replica_urls: &[String],
        settings: &PoolSettings,
    ) -> Result<Self, ClusterError> {
        let mut replicas = Vec::with_capacity(replica_urls.len());
        for (idx, url) in replica_urls.iter().enumerate() {
            match open_pool(url, settings).await {
                Ok(pool) => replicas.push(pool),
                Err(source) => {
                    tracing::error!(
                        "Replica {} failed to connect, closing {} open pool(s)",
                        idx + 1,
                        replicas.len() + 1
                    );
                    close_pools(&primary, &replicas).await;
                    return Err(ClusterError::Connect {
                        target: format!("replica {}", idx + 1),
                        source,
                    });
                }
            }
        }

        tracing::info!(replicas = replicas.len(), "Database cluster connected");

        Ok(Self::from_pools(primary, replicas))
    }

    /// Build a cluster from already-opened pools
    pub fn from_pools(primary: PgPool, replicas: Vec<PgPool>) -> Self {
        Self {
            primary,
            replicas,
            counter: AtomicUsize::new(0),
        }
    }

    /// Pool for writes
    pub fn primary(&self) -> &PgPool {
        &self.primary
    }

    /// Pool for reads (round-robin, primary when there are no replicas)
    pub fn replica(&self) -> &PgPool {
        if self.replicas.is_empty() {
            return &self.primary;
        }
        let idx = self.counter.fetch_add(1, Ordering::Relaxed) % self.replicas.len();
        &self.replicas[idx]
    }

    pub fn replica_count(&self) -> usize {
        self.replicas.len()
    }

    /// Close every pool in the cluster
    pub async fn close(&self) {
        close_pools(&self.primary, &self.replicas).await;
    }
}

async fn close_pools(primary: &PgPool, replicas: &[PgPool]) {
    primary.close().await;
    for replica in replicas {
        replica.close().await;
    }
}

async fn open_pool(url: &str, settings: &PoolSettings) -> Result<PgPool, sqlx::Error> {
    let pool = settings.options().connect(url).await?;

    if let Err(e) = verify_connection(&pool).await {
        pool.close().await;
        return Err(e);
    }

    Ok(pool)
}

/// Simple connectivity check
pub async fn verify_connection(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Create the catalog schema if it does not exist
pub async fn apply_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    // Unprepared execution allows the multi-statement script
    pool.execute(SCHEMA_SQL).await?;
    Ok(())
}

/// Check if required tables exist
pub async fn check_schema(pool: &PgPool) -> Result<bool, sqlx::Error> {
    let required_tables = ["books"];

    for table in required_tables {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM information_schema.tables
                WHERE table_schema = 'public' AND table_name = $1
            )
            "#,
        )
        .bind(table)
        .fetch_one(pool)
        .await?;

        if !exists {
            tracing::error!("Required table '{}' does not exist", table);
            return Ok(false);
        }
    }

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lazy_pool(db: &str) -> PgPool {
        PgPoolOptions::new()
            .connect_lazy(&format!("postgres://catalog@localhost:5432/{}", db))
            .unwrap()
    }

    #[test]
    fn test_pool_settings_bounds() {
        assert!(PoolSettings::new(1, 10).validate("primary").is_ok());
        assert!(PoolSettings::new(10, 10).validate("primary").is_ok());

        let err = PoolSettings::new(11, 10).validate("replica").unwrap_err();
        assert!(matches!(
            err,
            ClusterError::InvalidPoolBounds { role: "replica", min: 11, max: 10 }
        ));

        assert!(PoolSettings::new(0, 0).validate("primary").is_err());
    }

    #[test]
    fn test_pool_settings_builders() {
        let settings = PoolSettings::new(2, 4)
            .with_idle_timeout(Duration::from_secs(5))
            .with_acquire_timeout(Duration::from_millis(250));

        assert_eq!(settings.idle_timeout, Duration::from_secs(5));
        assert_eq!(settings.acquire_timeout, Duration::from_millis(250));
    }

    #[tokio::test]
    async fn test_replica_falls_back_to_primary() {
        let cluster = DbCluster::from_pools(lazy_pool("primary"), Vec::new());

        assert_eq!(cluster.replica_count(), 0);
        for _ in 0..5 {
            assert!(std::ptr::eq(cluster.replica(), cluster.primary()));
        }
    }

    #[tokio::test]
    async fn test_replica_round_robin() {
        let cluster = DbCluster::from_pools(
            lazy_pool("primary"),
            vec![lazy_pool("replica_a"), lazy_pool("replica_b"), lazy_pool("replica_c")],
        );

        let picks: Vec<*const PgPool> =
            (0..6).map(|_| cluster.replica() as *const PgPool).collect();

        // Never the primary, and cycles with period 3
        for pick in &picks {
            assert!(!std::ptr::eq(*pick, cluster.primary()));
        }
        assert_ne!(picks[0], picks[1]);
        assert_ne!(picks[1], picks[2]);
        assert_ne!(picks[0], picks[2]);
        assert_eq!(picks[0], picks[3]);
        assert_eq!(picks[1], picks[4]);
        assert_eq!(picks[2], picks[5]);
    }

    #[tokio::test]
    async fn test_replica_selection_is_fair_under_concurrency() {
        let cluster = std::sync::Arc::new(DbCluster::from_pools(
            lazy_pool("primary"),
            vec![lazy_pool("replica_a"), lazy_pool("replica_b")],
        ));

        let mut tasks = Vec::new();
        for _ in 0..8 {
            let cluster = cluster.clone();
            tasks.push(tokio::spawn(async move {
                for _ in 0..100 {
                    cluster.replica();
                }
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        // 800 picks so far; the counter advanced exactly once per pick
        assert_eq!(cluster.counter.load(Ordering::Relaxed), 800);
    }

    #[tokio::test]
    async fn test_connect_rejects_invalid_bounds_before_connecting() {
        let config = DatabaseConfig {
            primary_url: "postgres://catalog@localhost:1/unused".to_string(),
            replica_urls: Vec::new(),
            primary_pool: PoolSettings::new(5, 2),
            replica_pool: PoolSettings::new(1, 2),
        };

        let err = DbCluster::connect(&config).await.unwrap_err();
        assert!(matches!(err, ClusterError::InvalidPoolBounds { role: "primary", .. }));
    }

    #[test]
    fn test_schema_sql_defines_books() {
        assert!(SCHEMA_SQL.contains("CREATE TABLE IF NOT EXISTS books"));
        assert!(SCHEMA_SQL.contains("version"));
    }
}
