//! Cleanup command

use anyhow::{Context, Result};
use cleaner_core::{
    Config, Store, Summary, delete_for_clusters, delete_for_clusters_atomic, read_cluster_list,
};

use crate::ui;

/// Delete every row of the clusters listed in the configured cluster list.
///
/// Nothing is printed for a failed cleanup; the summary table only appears
/// after all deletions succeeded.
pub fn cleanup(config: &Config, atomic: bool, print_summary: bool) -> Result<()> {
    let listing =
        read_cluster_list(&config.cleaner.cluster_list_file).context("Read cluster list")?;

    let mut store =
        Store::open(&config.storage).context("Connection to database not established")?;

    let tables = &config.cleaner.tables;
    let deletions = if atomic {
        delete_for_clusters_atomic(store.connection_mut(), tables, &listing.clusters)
    } else {
        delete_for_clusters(store.connection(), tables, &listing.clusters)
    }
    .context("Performing cleanup")?;

    let summary = Summary::new(listing.proper(), listing.improper, deletions);
    tracing::info!(
        total = summary.total_deletions(),
        clusters = summary.proper_cluster_entries,
        "Cleanup finished"
    );

    if print_summary {
        println!("{}", ui::summary_table(&summary));
    }
    Ok(())
}
