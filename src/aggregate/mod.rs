//! Aggregate module
//!
//! Aggregate Root pattern implementation. Aggregates hold state and rules;
//! persistence happens through repositories.

pub mod book;

pub use book::{Book, BookState, LOAN_PERIOD_DAYS};

/// Aggregate trait that all aggregates must implement
pub trait Aggregate {
    /// The type of events this aggregate records
    type Event;

    /// The identity type of this aggregate
    type Id: std::fmt::Display;

    /// Get the aggregate type name (for logs)
    fn aggregate_type() -> &'static str;

    /// Get the aggregate ID
    fn id(&self) -> Self::Id;

    /// Get the stored version this snapshot was loaded at
    fn version(&self) -> i64;

    /// Take the recorded events, leaving the buffer empty
    fn drain_events(&mut self) -> Vec<Self::Event>;
}
