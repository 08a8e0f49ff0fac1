//! Dependent tables and the order they are cleaned in.

use serde::Deserialize;

/// Default `(table, cluster column)` pairs in deletion order.
///
/// Tables holding per-rule data for a cluster come first, the `report` table
/// they hang off comes last.
pub const DEFAULT_DELETION_ORDER: &[(&str, &str)] = &[
    ("cluster_rule_toggle", "cluster_id"),
    ("cluster_rule_user_feedback", "cluster_id"),
    ("cluster_user_rule_disable_feedback", "cluster_id"),
    ("rule_hit", "cluster_id"),
    ("report", "cluster"),
];

/// Errors raised when validating a table or column name.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentifierError {
    /// The identifier is empty.
    #[error("empty SQL identifier")]
    Empty,

    /// The identifier contains something other than ASCII letters, digits and `_`,
    /// or starts with a digit.
    #[error("invalid SQL identifier: {0:?}")]
    Invalid(String),
}

/// Check that `name` can be spliced into SQL as a bare identifier.
fn validate_identifier(name: &str) -> Result<(), IdentifierError> {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return Err(IdentifierError::Empty);
    };
    if !(first.is_ascii_alphabetic() || first == '_')
        || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err(IdentifierError::Invalid(name.to_string()));
    }
    Ok(())
}

/// A dependent table together with the column holding the cluster identifier.
///
/// Both names are validated on construction, so they are safe to interpolate
/// into SQL statements.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawTableAndKey")]
pub struct TableAndKey {
    table: String,
    key: String,
}

#[derive(Deserialize)]
struct RawTableAndKey {
    table: String,
    key: String,
}

impl TryFrom<RawTableAndKey> for TableAndKey {
    type Error = IdentifierError;

    fn try_from(raw: RawTableAndKey) -> Result<Self, Self::Error> {
        Self::new(&raw.table, &raw.key)
    }
}

impl TableAndKey {
    /// Pair a table with its cluster column.
    ///
    /// # Errors
    ///
    /// Returns [`IdentifierError`] if either name is not a plain SQL identifier.
    pub fn new(table: &str, key: &str) -> Result<Self, IdentifierError> {
        validate_identifier(table)?;
        validate_identifier(key)?;
        Ok(Self {
            table: table.to_string(),
            key: key.to_string(),
        })
    }

    /// The built-in deletion order, see [`DEFAULT_DELETION_ORDER`].
    pub fn defaults() -> Vec<Self> {
        DEFAULT_DELETION_ORDER
            .iter()
            .map(|(table, key)| Self {
                table: (*table).to_string(),
                key: (*key).to_string(),
            })
            .collect()
    }

    /// Table name.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Name of the column that holds the cluster identifier.
    pub fn key(&self) -> &str {
        &self.key
    }
}
