//! Shared domain types for the cluster cleaner.
//!
//! Everything that crosses a crate boundary lives here: validated cluster
//! identifiers, the ordered list of dependent tables, stale-cluster records
//! and the cleanup summary.

pub mod cluster;
pub mod report;
pub mod summary;
pub mod table;

// Re-exports
pub use cluster::*;
pub use report::StaleClusterRecord;
pub use summary::{DeletionCounts, Summary};
pub use table::{DEFAULT_DELETION_ORDER, IdentifierError, TableAndKey};
