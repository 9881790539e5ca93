//! Common test utilities

#![allow(dead_code)]

use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use library_catalog::db::{self, DbCluster};

/// `DATABASE_URL`, or `None` when database tests should be skipped
pub fn database_url() -> Option<String> {
    dotenvy::dotenv().ok();
    match std::env::var("DATABASE_URL") {
        Ok(url) => Some(url),
        Err(_) => {
            eprintln!("DATABASE_URL not set, skipping database test");
            None
        }
    }
}

/// Open a small pool against `DATABASE_URL` with the schema applied.
///
/// Returns `None` (and the calling test returns early) when no database is
/// configured.
pub async fn setup_test_pool() -> Option<PgPool> {
    let database_url = database_url()?;

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&database_url)
        .await
        .expect("Failed to connect to DB");

    // Parallel tests may race on CREATE ... IF NOT EXISTS; the loser only
    // needs the table to be there
    if let Err(e) = db::apply_schema(&pool).await {
        let ready = db::check_schema(&pool).await.unwrap_or(false);
        assert!(ready, "Failed to apply schema: {}", e);
    }

    Some(pool)
}

/// Cluster with the primary only; reads fall back to it
pub async fn setup_cluster() -> Option<Arc<DbCluster>> {
    let primary = setup_test_pool().await?;
    Some(Arc::new(DbCluster::from_pools(primary, Vec::new())))
}

/// Cluster whose replicas are extra pools on the same database
pub async fn setup_cluster_with_replicas(replicas: usize) -> Option<Arc<DbCluster>> {
    let primary = setup_test_pool().await?;
    let mut pools = Vec::with_capacity(replicas);
    for _ in 0..replicas {
        pools.push(setup_test_pool().await?);
    }
    Some(Arc::new(DbCluster::from_pools(primary, pools)))
}

/// Unique title so concurrent tests never read each other's rows by name
pub fn unique_title(prefix: &str) -> String {
    format!("{} {}", prefix, uuid::Uuid::new_v4().simple())
}
