//! Cluster identifiers and their validation.

use std::fmt;
use std::str::FromStr;

use uuid::Uuid;

/// Length of the canonical hyphenated UUID form (`8-4-4-4-12`).
const HYPHENATED_LEN: usize = 36;

/// Checks whether `input` is a UUID in canonical hyphenated form.
///
/// Upper- and lowercase hex digits are both accepted. The braced, URN and
/// simple (32 digits, no hyphens) spellings are rejected, as is any
/// surrounding whitespace.
///
/// # Example
///
/// ```
/// use cleaner_schema::is_valid_uuid;
///
/// assert!(is_valid_uuid("5d5892d3-1f74-4ccf-91af-548dfc9767aa"));
/// assert!(!is_valid_uuid("not-a-uuid"));
/// assert!(!is_valid_uuid(""));
/// ```
pub fn is_valid_uuid(input: &str) -> bool {
    input.len() == HYPHENATED_LEN && Uuid::try_parse(input).is_ok()
}

/// Error returned when a string is not an acceptable cluster identifier.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("not a proper cluster ID: {0:?}")]
pub struct ClusterNameError(pub String);

/// Identifier of a monitored cluster.
///
/// The only way to obtain a `ClusterName` is through [`ClusterName::parse`]
/// (or [`FromStr`]), so every value has passed [`is_valid_uuid`]. The input
/// spelling is preserved because the store matches identifiers verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClusterName(String);

impl ClusterName {
    /// Validate `input` and wrap it.
    ///
    /// # Errors
    ///
    /// Returns [`ClusterNameError`] if `input` is not a canonical hyphenated UUID.
    pub fn parse(input: &str) -> Result<Self, ClusterNameError> {
        if is_valid_uuid(input) {
            Ok(Self(input.to_string()))
        } else {
            Err(ClusterNameError(input.to_string()))
        }
    }

    /// Return the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for ClusterName {
    type Err = ClusterNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ClusterName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::ops::Deref for ClusterName {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<str> for ClusterName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Cluster identifiers in input order. Duplicates are kept.
pub type ClusterList = Vec<ClusterName>;
