//! Inspection command (stale cluster listing)

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use cleaner_core::{Config, StaleClusterRecord, Store, find_stale_clusters_at};

use crate::ui;

/// List clusters whose newest report is older than the configured maximum age.
///
/// Read-only. With `output`, the stale cluster IDs are also written to that
/// file in the cluster list format, ready for review and a later cleanup.
pub fn inspect(config: &Config, output: Option<&Path>) -> Result<()> {
    let store = Store::open(&config.storage).context("Connection to database not established")?;

    let now = Utc::now();
    let stale = find_stale_clusters_at(store.connection(), config.cleaner.max_age, now)
        .context("Selecting records from database")?;

    if stale.is_empty() {
        tracing::info!("No stale clusters found");
    } else {
        println!("{}", ui::stale_table(&stale, now));
    }

    if let Some(path) = output {
        write_cluster_list(path, &stale)
            .with_context(|| format!("Writing stale clusters to {}", path.display()))?;
    }
    Ok(())
}

fn write_cluster_list(path: &Path, records: &[StaleClusterRecord]) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    for record in records {
        writeln!(writer, "{}", record.cluster)?;
    }
    writer.flush()
}
