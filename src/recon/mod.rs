//! Reconciliation engine and report tables.

pub mod engine;
pub mod report;

pub use engine::{reconcile, reconcile_categories, ResultRow};
pub use report::RunSummary;
