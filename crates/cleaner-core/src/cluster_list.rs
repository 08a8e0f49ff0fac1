//! Cluster list reader
//!
//! Reads the allow-list of clusters to clean up: one identifier per line.
//! Lines that are not canonical UUIDs are counted and logged, never returned.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use cleaner_schema::{ClusterList, ClusterName};
use thiserror::Error;

/// Valid cluster identifiers in file order, plus the number of rejected lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClusterListing {
    pub clusters: ClusterList,
    pub improper: usize,
}

impl ClusterListing {
    /// Number of lines accepted as cluster identifiers.
    pub fn proper(&self) -> usize {
        self.clusters.len()
    }

    fn classify(&mut self, line: &[u8]) {
        match std::str::from_utf8(line).ok().map(ClusterName::parse) {
            Some(Ok(name)) => {
                tracing::info!(input = %name, "Proper cluster ID");
                self.clusters.push(name);
            }
            _ => {
                tracing::error!(input = %String::from_utf8_lossy(line), "Not a proper cluster ID");
                self.improper += 1;
            }
        }
    }
}

#[derive(Error, Debug)]
pub enum ClusterListError {
    #[error("cannot open cluster list {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Reading stopped part way through; `partial` holds what was read before.
    #[error("cannot read cluster list {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
        partial: ClusterListing,
    },
}

/// Read and classify the cluster list stored in `path`.
///
/// Only the line terminator is stripped; a line with stray whitespace or a
/// carriage return is improper. A last line without a terminator is still
/// classified.
pub fn read_cluster_list(path: &Path) -> Result<ClusterListing, ClusterListError> {
    tracing::debug!("Cluster list read");

    let file = File::open(path).map_err(|source| ClusterListError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let mut listing = ClusterListing::default();
    if let Err(source) = classify_lines(BufReader::new(file), &mut listing) {
        return Err(ClusterListError::Read {
            path: path.to_path_buf(),
            source,
            partial: listing,
        });
    }

    tracing::info!(
        clusters = listing.proper(),
        improper = listing.improper,
        "Cluster list finished"
    );
    Ok(listing)
}

fn classify_lines<R: BufRead>(mut reader: R, listing: &mut ClusterListing) -> io::Result<()> {
    let mut line = Vec::new();
    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line)? == 0 {
            return Ok(());
        }
        if line.last() == Some(&b'\n') {
            line.pop();
        }
        listing.classify(&line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use tempfile::NamedTempFile;

    const A: &str = "5d5892d3-1f74-4ccf-91af-548dfc9767aa";
    const B: &str = "6d5892d3-1f74-4ccf-91af-548dfc9767aa";
    const C: &str = "7d5892d3-1f74-4ccf-91af-548dfc9767aa";

    fn file_with(content: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content).unwrap();
        file.flush().unwrap();
        file
    }

    fn names(listing: &ClusterListing) -> Vec<&str> {
        listing.clusters.iter().map(ClusterName::as_str).collect()
    }

    #[test]
    fn test_empty_file() {
        let file = file_with(b"");
        let listing = read_cluster_list(file.path()).unwrap();
        assert!(listing.clusters.is_empty());
        assert_eq!(listing.improper, 0);
    }

    #[test]
    fn test_one_valid_one_invalid_in_either_order() {
        for content in [format!("{A}\nnot-a-uuid\n"), format!("not-a-uuid\n{A}\n")] {
            let file = file_with(content.as_bytes());
            let listing = read_cluster_list(file.path()).unwrap();
            assert_eq!(names(&listing), vec![A]);
            assert_eq!(listing.improper, 1);
        }
    }

    #[test]
    fn test_keeps_file_order_and_duplicates() {
        let content = format!("{C}\nfoo\n{A}\n\n{C}\nbar\n{B}\n");
        let file = file_with(content.as_bytes());
        let listing = read_cluster_list(file.path()).unwrap();
        assert_eq!(names(&listing), vec![C, A, C, B]);
        assert_eq!(listing.proper(), 4);
        // "foo", the empty line and "bar"
        assert_eq!(listing.improper, 3);
    }

    #[test]
    fn test_last_line_without_newline() {
        let content = format!("{A}\n{B}");
        let file = file_with(content.as_bytes());
        let listing = read_cluster_list(file.path()).unwrap();
        assert_eq!(names(&listing), vec![A, B]);
        assert_eq!(listing.improper, 0);
    }

    #[test]
    fn test_whitespace_is_not_trimmed() {
        let content = format!(" {A}\n{A} \n{A}\r\n\t{A}\n");
        let file = file_with(content.as_bytes());
        let listing = read_cluster_list(file.path()).unwrap();
        assert!(listing.clusters.is_empty());
        assert_eq!(listing.improper, 4);
    }

    #[test]
    fn test_non_utf8_line_is_improper() {
        let mut content = b"\xff\xfe\n".to_vec();
        content.extend_from_slice(A.as_bytes());
        content.push(b'\n');
        let file = file_with(&content);
        let listing = read_cluster_list(file.path()).unwrap();
        assert_eq!(names(&listing), vec![A]);
        assert_eq!(listing.improper, 1);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clusters.txt");
        let err = read_cluster_list(&path).unwrap_err();
        assert!(matches!(err, ClusterListError::Open { .. }));
    }

    /// Yields `data`, then fails.
    struct FailingReader {
        data: io::Cursor<Vec<u8>>,
    }

    impl Read for FailingReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            match self.data.read(buf)? {
                0 => Err(io::Error::other("device went away")),
                n => Ok(n),
            }
        }
    }

    #[test]
    fn test_read_error_keeps_partial_listing() {
        let reader = FailingReader {
            data: io::Cursor::new(format!("{A}\nfoo\n").into_bytes()),
        };
        let mut listing = ClusterListing::default();
        let err = classify_lines(BufReader::new(reader), &mut listing).unwrap_err();

        assert_eq!(err.to_string(), "device went away");
        assert_eq!(names(&listing), vec![A]);
        assert_eq!(listing.improper, 1);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        #[derive(Debug, Clone)]
        enum Line {
            Cluster(String),
            Junk(String),
        }

        fn cluster_id(bits: u128, upper: bool) -> String {
            let hex = format!("{bits:032x}");
            let id = format!(
                "{}-{}-{}-{}-{}",
                &hex[..8],
                &hex[8..12],
                &hex[12..16],
                &hex[16..20],
                &hex[20..]
            );
            if upper { id.to_uppercase() } else { id }
        }

        fn line() -> impl Strategy<Value = Line> {
            prop_oneof![
                (any::<u128>(), any::<bool>())
                    .prop_map(|(bits, upper)| Line::Cluster(cluster_id(bits, upper))),
                // Shorter than a UUID, so never valid.
                "[a-zA-Z0-9 {}:-]{0,35}".prop_map(Line::Junk),
            ]
        }

        proptest! {
            #[test]
            fn keeps_valid_lines_in_order_and_counts_the_rest(
                lines in prop::collection::vec(line(), 0..60),
                trailing_newline in any::<bool>(),
            ) {
                let text: Vec<&str> = lines
                    .iter()
                    .map(|line| match line {
                        Line::Cluster(s) | Line::Junk(s) => s.as_str(),
                    })
                    .collect();
                let mut content = text.join("\n");
                // An empty last line only exists if it is terminated.
                let terminate = match lines.last() {
                    None => false,
                    Some(Line::Junk(s)) if s.is_empty() => true,
                    Some(_) => trailing_newline,
                };
                if terminate {
                    content.push('\n');
                }

                let mut listing = ClusterListing::default();
                classify_lines(io::Cursor::new(content.into_bytes()), &mut listing).unwrap();

                let expected: Vec<&str> = lines
                    .iter()
                    .filter_map(|line| match line {
                        Line::Cluster(s) => Some(s.as_str()),
                        Line::Junk(_) => None,
                    })
                    .collect();
                let junk = lines.iter().filter(|line| matches!(line, Line::Junk(_))).count();

                prop_assert_eq!(names(&listing), expected);
                prop_assert_eq!(listing.improper, junk);
            }
        }
    }
}
