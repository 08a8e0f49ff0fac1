//! SQLite results store
//!
//! Holds the report table and the per-cluster dependent tables the cleaner
//! works on.

use std::path::Path;

use rusqlite::{Connection, OpenFlags};
use thiserror::Error;

use crate::config::StorageConfig;

/// Table holding one row per received report.
pub const REPORT_TABLE: &str = "report";
/// Cluster identifier column of [`REPORT_TABLE`].
pub const REPORT_CLUSTER_COLUMN: &str = "cluster";
/// Report timestamp column of [`REPORT_TABLE`], Unix seconds.
pub const REPORT_TIMESTAMP_COLUMN: &str = "reported_at";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Deletion from table '{table}' failed: {source}")]
    Delete {
        table: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Invalid report timestamp {value} for cluster {cluster}")]
    InvalidTimestamp { cluster: String, value: i64 },
}

/// Connection to the results database
#[derive(Debug)]
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open an existing database described by the storage configuration.
    pub fn open(config: &StorageConfig) -> Result<Self, StoreError> {
        Self::open_at(&config.db_path)
    }

    /// Open an existing database at a specific path.
    ///
    /// Fails if the file does not exist rather than creating an empty one.
    pub fn open_at(path: &Path) -> Result<Self, StoreError> {
        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_URI
            | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let conn = Connection::open_with_flags(path, flags)?;
        Self::from_connection(conn)
    }

    /// Open the database, creating the file and the schema if needed.
    pub fn open_or_create(config: &StorageConfig) -> Result<Self, StoreError> {
        let conn = Connection::open(&config.db_path)?;
        let store = Self::from_connection(conn)?;
        store.init_schema()?;
        Ok(store)
    }

    /// Open a private in-memory database with the schema in place (for testing).
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let store = Self::from_connection(Connection::open_in_memory()?)?;
        store.init_schema()?;
        Ok(store)
    }

    fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        tracing::debug!("Connection to database established");
        Ok(Self { conn })
    }

    /// Create the report table and the dependent tables if they do not exist.
    pub fn init_schema(&self) -> Result<(), StoreError> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS report (
                org_id INTEGER NOT NULL,
                cluster TEXT NOT NULL,
                report TEXT NOT NULL,
                reported_at INTEGER NOT NULL,
                last_checked_at INTEGER
            );

            CREATE INDEX IF NOT EXISTS idx_report_cluster ON report(cluster);

            CREATE TABLE IF NOT EXISTS cluster_rule_toggle (
                cluster_id TEXT NOT NULL,
                rule_id TEXT NOT NULL,
                error_key TEXT NOT NULL,
                user_id TEXT NOT NULL,
                disabled INTEGER NOT NULL,
                disabled_at INTEGER,
                enabled_at INTEGER,
                updated_at INTEGER,
                PRIMARY KEY (cluster_id, rule_id, error_key, user_id)
            );

            CREATE TABLE IF NOT EXISTS cluster_rule_user_feedback (
                cluster_id TEXT NOT NULL,
                rule_id TEXT NOT NULL,
                error_key TEXT NOT NULL,
                user_id TEXT NOT NULL,
                message TEXT NOT NULL,
                user_vote INTEGER NOT NULL,
                added_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL,
                PRIMARY KEY (cluster_id, rule_id, error_key, user_id)
            );

            CREATE TABLE IF NOT EXISTS cluster_user_rule_disable_feedback (
                cluster_id TEXT NOT NULL,
                user_id TEXT NOT NULL,
                rule_id TEXT NOT NULL,
                error_key TEXT NOT NULL,
                message TEXT NOT NULL,
                added_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL,
                PRIMARY KEY (cluster_id, user_id, rule_id, error_key)
            );

            CREATE TABLE IF NOT EXISTS rule_hit (
                org_id INTEGER NOT NULL,
                cluster_id TEXT NOT NULL,
                rule_fqdn TEXT NOT NULL,
                error_key TEXT NOT NULL,
                template_data TEXT NOT NULL,
                PRIMARY KEY (cluster_id, org_id, rule_fqdn, error_key)
            );
            ",
        )?;
        Ok(())
    }

    /// Borrow the underlying connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Borrow the underlying connection mutably (needed to open transactions).
    pub fn connection_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }

    /// Number of rows in `table` whose `key` column equals `cluster`.
    ///
    /// `table` and `key` are spliced into the statement and must be trusted
    /// identifiers.
    pub fn count_rows(&self, table: &str, key: &str, cluster: &str) -> Result<usize, StoreError> {
        let sql = format!("SELECT COUNT(*) FROM {table} WHERE {key} = ?1");
        let count: i64 = self.conn.query_row(&sql, [cluster], |row| row.get(0))?;
        Ok(count as usize)
    }
}
