//! Cleanup accounting.

/// Rows deleted per table, kept in deletion order.
///
/// Recording the same table twice adds to its existing count.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeletionCounts {
    entries: Vec<(String, usize)>,
}

impl DeletionCounts {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `deleted` rows to the count for `table`.
    pub fn record(&mut self, table: &str, deleted: usize) {
        if let Some((_, count)) = self.entries.iter_mut().find(|(t, _)| t == table) {
            *count += deleted;
        } else {
            self.entries.push((table.to_string(), deleted));
        }
    }

    /// Rows deleted from `table`, or `None` if the table was never recorded.
    pub fn get(&self, table: &str) -> Option<usize> {
        self.entries
            .iter()
            .find(|(t, _)| t == table)
            .map(|(_, count)| *count)
    }

    /// Iterate over `(table, deleted)` pairs in deletion order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, usize)> {
        self.entries.iter().map(|(t, count)| (t.as_str(), *count))
    }

    /// Number of tables recorded.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no table has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of deletions over all tables.
    pub fn total(&self) -> usize {
        self.entries.iter().map(|(_, count)| count).sum()
    }
}

/// Outcome of one cleanup invocation, ready for display.
///
/// The total number of deletions is derived from the per-table counts on
/// demand and is never stored alongside them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    /// Lines of the cluster list that were valid cluster identifiers.
    pub proper_cluster_entries: usize,
    /// Lines of the cluster list that were rejected.
    pub improper_cluster_entries: usize,
    /// Rows deleted from each dependent table.
    pub deletions_for_table: DeletionCounts,
}

impl Summary {
    /// Assemble a summary from the reader's counts and the engine's result.
    pub fn new(proper: usize, improper: usize, deletions: DeletionCounts) -> Self {
        Self {
            proper_cluster_entries: proper,
            improper_cluster_entries: improper,
            deletions_for_table: deletions,
        }
    }

    /// Total rows deleted across all tables.
    pub fn total_deletions(&self) -> usize {
        self.deletions_for_table.total()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_keeps_order_and_accumulates() {
        let mut counts = DeletionCounts::new();
        counts.record("rule_hit", 3);
        counts.record("report", 0);
        counts.record("rule_hit", 2);

        let pairs: Vec<_> = counts.entries().collect();
        assert_eq!(pairs, vec![("rule_hit", 5), ("report", 0)]);
        assert_eq!(counts.get("report"), Some(0));
        assert_eq!(counts.get("missing"), None);
        assert_eq!(counts.len(), 2);
    }

    #[test]
    fn test_total_is_derived() {
        let mut counts = DeletionCounts::new();
        counts.record("cluster_rule_toggle", 4);
        counts.record("report", 2);

        let mut summary = Summary::new(2, 1, counts);
        assert_eq!(summary.total_deletions(), 6);

        summary.deletions_for_table.record("rule_hit", 10);
        assert_eq!(summary.total_deletions(), 16);
    }

    #[test]
    fn test_empty_summary() {
        let summary = Summary::new(0, 0, DeletionCounts::new());
        assert!(summary.deletions_for_table.is_empty());
        assert_eq!(summary.total_deletions(), 0);
    }
}
