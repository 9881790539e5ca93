//! Library Catalog
//!
//! Book catalog backend: a versioned `Book` aggregate, a repository with
//! optimistic concurrency, and a primary/replica connection router.
//! Re-exports modules for integration testing and the binaries.

pub mod aggregate;
pub mod api;
pub mod config;
pub mod db;
pub mod domain;
pub mod handlers;
pub mod repository;

mod error;

pub use config::Config;
pub use db::DbCluster;
pub use domain::{BookEvent, BookId, DomainError, OperationContext};
pub use error::{AppError, AppResult, ErrorKind, ErrorResponse};
