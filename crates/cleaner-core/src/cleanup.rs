//! Cleanup engine
//!
//! Two independent operations against the store: deleting every row that
//! belongs to a list of clusters, and finding clusters that stopped
//! reporting. Finding never deletes.

use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use cleaner_schema::{ClusterName, DeletionCounts, StaleClusterRecord, TableAndKey};
use rusqlite::{Connection, params_from_iter};

use crate::store::{REPORT_CLUSTER_COLUMN, REPORT_TABLE, REPORT_TIMESTAMP_COLUMN, StoreError};

/// Upper bound on identifiers bound into a single `IN (...)` list.
///
/// Keeps each statement well below SQLite's bound-parameter limit.
const MAX_CLUSTERS_PER_STATEMENT: usize = 500;

/// Delete all rows referencing `clusters` from each table, in `tables` order.
///
/// Every table gets an entry in the result, zero included. The first failing
/// table aborts the run; deletions already made to earlier tables stay in
/// place. See [`delete_for_clusters_atomic`] for the all-or-nothing variant.
///
/// An empty `clusters` list records zero for every table without touching
/// the store.
pub fn delete_for_clusters(
    conn: &Connection,
    tables: &[TableAndKey],
    clusters: &[ClusterName],
) -> Result<DeletionCounts, StoreError> {
    let mut counts = DeletionCounts::new();

    if clusters.is_empty() {
        tracing::debug!("Empty cluster list, no deletions issued");
        for entry in tables {
            counts.record(entry.table(), 0);
        }
        return Ok(counts);
    }

    for entry in tables {
        let deleted = delete_from_table(conn, entry, clusters)?;
        tracing::info!(table = entry.table(), deleted, "Deleted rows");
        counts.record(entry.table(), deleted);
    }

    Ok(counts)
}

/// Same as [`delete_for_clusters`], but inside one transaction.
///
/// On failure the transaction is rolled back and no table is modified.
pub fn delete_for_clusters_atomic(
    conn: &mut Connection,
    tables: &[TableAndKey],
    clusters: &[ClusterName],
) -> Result<DeletionCounts, StoreError> {
    let tx = conn.transaction()?;
    let counts = delete_for_clusters(&tx, tables, clusters)?;
    tx.commit()?;
    Ok(counts)
}

fn delete_from_table(
    conn: &Connection,
    entry: &TableAndKey,
    clusters: &[ClusterName],
) -> Result<usize, StoreError> {
    let mut deleted = 0;
    for chunk in clusters.chunks(MAX_CLUSTERS_PER_STATEMENT) {
        let sql = delete_statement(entry, chunk.len());
        deleted += conn
            .execute(&sql, params_from_iter(chunk.iter().map(ClusterName::as_str)))
            .map_err(|source| StoreError::Delete {
                table: entry.table().to_string(),
                source,
            })?;
    }
    Ok(deleted)
}

fn delete_statement(entry: &TableAndKey, count: usize) -> String {
    let placeholders = vec!["?"; count].join(", ");
    format!(
        "DELETE FROM {} WHERE {} IN ({placeholders})",
        entry.table(),
        entry.key()
    )
}

/// Clusters whose newest report is older than `max_age`.
pub fn find_stale_clusters(
    conn: &Connection,
    max_age: Duration,
) -> Result<Vec<StaleClusterRecord>, StoreError> {
    find_stale_clusters_at(conn, max_age, Utc::now())
}

/// Clusters whose newest report is older than `now - max_age`.
///
/// Each cluster appears at most once. Results come in the order the store
/// returns them.
pub fn find_stale_clusters_at(
    conn: &Connection,
    max_age: Duration,
    now: DateTime<Utc>,
) -> Result<Vec<StaleClusterRecord>, StoreError> {
    let max_age = TimeDelta::from_std(max_age).unwrap_or(TimeDelta::MAX);
    let Some(threshold) = now.checked_sub_signed(max_age) else {
        // Nothing can be older than the start of time.
        return Ok(Vec::new());
    };
    tracing::debug!("Selecting clusters with no report since {threshold}");

    let sql = format!(
        "SELECT {REPORT_CLUSTER_COLUMN}, MAX({REPORT_TIMESTAMP_COLUMN}) FROM {REPORT_TABLE}
         GROUP BY {REPORT_CLUSTER_COLUMN}
         HAVING MAX({REPORT_TIMESTAMP_COLUMN}) < ?1"
    );
    // Reports are whole seconds, so `x < threshold` iff `x < ceil(threshold)`.
    let threshold_secs = threshold.timestamp() + i64::from(threshold.timestamp_subsec_nanos() > 0);
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([threshold_secs], |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
    })?;

    let mut records = Vec::new();
    for row in rows {
        let (cluster, value) = row?;
        let Some(reported_at) = DateTime::from_timestamp(value, 0) else {
            return Err(StoreError::InvalidTimestamp { cluster, value });
        };
        tracing::info!(cluster = %cluster, reported_at = %reported_at, "Old report");
        records.push(StaleClusterRecord {
            cluster,
            reported_at,
        });
    }
    Ok(records)
}
