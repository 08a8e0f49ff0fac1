//! Fill-in command (test data seeding)

use anyhow::{Context, Result};
use chrono::Utc;
use cleaner_core::Config;
use cleaner_core::fixtures::fill_in_database;
use cleaner_core::store::Store;

use crate::ui;

/// Create the schema if needed and insert the test data set.
pub fn fill_in(config: &Config) -> Result<()> {
    let mut store = Store::open_or_create(&config.storage)
        .context("Connection to database not established")?;

    let inserted = fill_in_database(store.connection_mut(), Utc::now())
        .context("Fill-in database by test data")?;

    println!("{}", ui::inserted_table(&inserted));
    Ok(())
}
