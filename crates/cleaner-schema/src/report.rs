//! Stale cluster records produced by inspection.

use chrono::{DateTime, TimeDelta, Utc};

/// A cluster whose newest report is older than the configured maximum age.
///
/// The identifier is taken from the store as-is and is not re-validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaleClusterRecord {
    /// Cluster identifier as stored in the report table.
    pub cluster: String,
    /// Timestamp of the most recent report for this cluster.
    pub reported_at: DateTime<Utc>,
}

impl StaleClusterRecord {
    /// How long ago the cluster last reported, relative to `now`.
    pub fn age(&self, now: DateTime<Utc>) -> TimeDelta {
        now - self.reported_at
    }
}
