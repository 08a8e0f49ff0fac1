//! cluster-cleaner - find and remove data of clusters that stopped reporting
#![allow(missing_docs)]
#![allow(clippy::missing_errors_doc)]
//!
//! Clusters that no longer send reports leave their data behind in the
//! results database. This tool lists such clusters and, given an explicit
//! allow-list, deletes their rows from every dependent table.
//!
//! # Modes
//!
//! - default: list clusters whose newest report is older than `max_age`
//! - `--cleanup`: delete all rows of the clusters named in the cluster list
//! - `--fill-in-db`: seed the database with test data
//!
//! Inspection never deletes anything; its output can be reviewed and fed
//! back as the cluster list for a cleanup run.

pub mod cmd;
pub mod logging;
pub mod ui;

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(name = "cluster-cleaner")]
#[command(author, version, about = "Find and remove data of clusters that stopped reporting")]
pub struct Cli {
    /// Perform database cleanup for the clusters in the cluster list
    #[arg(long)]
    pub cleanup: bool,

    /// Print summary table after cleanup
    #[arg(long)]
    pub summary: bool,

    /// Fill-in database by test data
    #[arg(long = "fill-in-db")]
    pub fill_in_db: bool,

    /// Run all cleanup deletions in a single transaction
    #[arg(long)]
    pub atomic: bool,

    /// Maximum report age before a cluster counts as stale, e.g. "90days"
    #[arg(long, value_parser = humantime::parse_duration)]
    pub max_age: Option<Duration>,

    /// Cluster list file to use instead of the configured one
    #[arg(long)]
    pub cluster_list: Option<PathBuf>,

    /// Also write stale cluster IDs to this file, one per line
    #[arg(long)]
    pub output: Option<PathBuf>,
}

/// The single operation performed by one invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Cleanup,
    FillIn,
    Inspect,
}

impl Cli {
    /// Cleanup wins over seeding; inspection is the fallback.
    pub fn mode(&self) -> Mode {
        if self.cleanup {
            Mode::Cleanup
        } else if self.fill_in_db {
            Mode::FillIn
        } else {
            Mode::Inspect
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("cluster-cleaner").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_mode_selection() {
        assert_eq!(parse(&[]).mode(), Mode::Inspect);
        assert_eq!(parse(&["--summary"]).mode(), Mode::Inspect);
        assert_eq!(parse(&["--cleanup"]).mode(), Mode::Cleanup);
        assert_eq!(parse(&["--fill-in-db"]).mode(), Mode::FillIn);
        assert_eq!(parse(&["--cleanup", "--fill-in-db"]).mode(), Mode::Cleanup);
    }

    #[test]
    fn test_max_age_parsing() {
        let cli = parse(&["--max-age", "30days"]);
        assert_eq!(cli.max_age, Some(Duration::from_secs(30 * 24 * 60 * 60)));

        assert!(Cli::try_parse_from(["cluster-cleaner", "--max-age", "soon"]).is_err());
    }

    #[test]
    fn test_paths() {
        let cli = parse(&["--cluster-list", "ids.txt", "--output", "stale.txt"]);
        assert_eq!(cli.cluster_list, Some(PathBuf::from("ids.txt")));
        assert_eq!(cli.output, Some(PathBuf::from("stale.txt")));
    }
}
