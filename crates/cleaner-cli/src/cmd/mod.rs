//! Command implementations, one module per mode

pub mod cleanup;
pub mod fill_in;
pub mod inspect;

use anyhow::Result;
use cleaner_core::Config;

use crate::{Cli, Mode};

/// Apply command-line overrides to `config` and run the selected mode.
pub fn run(cli: &Cli, mut config: Config) -> Result<()> {
    if let Some(max_age) = cli.max_age {
        config.cleaner.max_age = max_age;
    }
    if let Some(path) = &cli.cluster_list {
        config.cleaner.cluster_list_file.clone_from(path);
    }

    match cli.mode() {
        Mode::Cleanup => cleanup::cleanup(&config, cli.atomic, cli.summary),
        Mode::FillIn => fill_in::fill_in(&config),
        Mode::Inspect => inspect::inspect(&config, cli.output.as_deref()),
    }
}
