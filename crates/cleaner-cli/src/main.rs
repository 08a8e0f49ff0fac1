//! cluster-cleaner CLI

use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use cleaner_core::{Config, ConfigError, config_file};

use cleaner_cli::{Cli, cmd, logging};

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logging setup depends on the configuration, so load it first and
    // report a failure once the dispatcher is in place.
    let path = config_file();
    let config = Config::from_file(&path);
    let debug = config.as_ref().is_ok_and(|c| c.logging.debug);

    tracing::dispatcher::with_default(&logging::dispatch(debug), || run(&cli, &path, config))
}

fn run(cli: &Cli, path: &Path, config: Result<Config, ConfigError>) -> ExitCode {
    tracing::debug!("Started");
    tracing::debug!(path = %path.display(), "Configuration file");

    let result = match config {
        Ok(config) => cmd::run(cli, config).inspect_err(|err| {
            tracing::error!("Operation failed: {err:#}");
        }),
        Err(err) => {
            tracing::error!("Load configuration: {err}");
            Err(err.into())
        }
    };

    tracing::debug!("Finished");

    if result.is_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
