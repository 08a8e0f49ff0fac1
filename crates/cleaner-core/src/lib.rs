//! Core library for the cluster cleaner.
//!
//! - [`cluster_list`] turns a newline-delimited file into validated cluster IDs.
//! - [`cleanup`] deletes rows for those clusters and finds stale clusters.
//! - [`store`] opens the SQLite database and owns the schema.
//! - [`fixtures`] seeds a database with test data.
//! - [`config`] loads the TOML configuration.

pub mod cleanup;
pub mod cluster_list;
pub mod config;
pub mod fixtures;
pub mod store;

pub use cleaner_schema::{
    ClusterList, ClusterName, DeletionCounts, StaleClusterRecord, Summary, TableAndKey,
    is_valid_uuid,
};
pub use cleanup::{
    delete_for_clusters, delete_for_clusters_atomic, find_stale_clusters, find_stale_clusters_at,
};
pub use cluster_list::{ClusterListError, ClusterListing, read_cluster_list};
pub use config::{Config, ConfigError, config_file};
pub use store::{Store, StoreError};
