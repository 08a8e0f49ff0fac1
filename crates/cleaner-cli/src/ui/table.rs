//! Table rendering for summaries and stale-cluster listings
//!
//! Pure formatting: every number shown is either taken from the input or
//! derived from it here.

use chrono::{DateTime, Utc};
use cleaner_schema::{StaleClusterRecord, Summary};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, ContentArrangement, Table};

fn new_table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header.iter().map(|h| Cell::new(h).add_attribute(Attribute::Bold)));
    table
}

fn align_right(table: &mut Table, column: usize) {
    if let Some(column) = table.column_mut(column) {
        column.set_cell_alignment(CellAlignment::Right);
    }
}

/// Cleanup summary: input counts, deletions per table and their total.
pub fn summary_table(summary: &Summary) -> Table {
    let mut table = new_table(&["Summary", "Count"]);

    table.add_row(vec![
        Cell::new("Proper cluster entries"),
        Cell::new(summary.proper_cluster_entries),
    ]);
    table.add_row(vec![
        Cell::new("Improper cluster entries"),
        Cell::new(summary.improper_cluster_entries),
    ]);
    for (name, deleted) in summary.deletions_for_table.entries() {
        table.add_row(vec![
            Cell::new(format!("Deletions from table '{name}'")),
            Cell::new(deleted),
        ]);
    }
    table.add_row(vec![
        Cell::new("Total deletions").add_attribute(Attribute::Bold),
        Cell::new(summary.total_deletions()).add_attribute(Attribute::Bold),
    ]);

    align_right(&mut table, 1);
    table
}

/// Clusters that stopped reporting, with their last report time and age.
pub fn stale_table(records: &[StaleClusterRecord], now: DateTime<Utc>) -> Table {
    let mut table = new_table(&["Cluster", "Last reported", "Age (days)"]);

    for record in records {
        table.add_row(vec![
            Cell::new(&record.cluster),
            Cell::new(record.reported_at.format("%Y-%m-%d %H:%M:%S UTC")),
            Cell::new(record.age(now).num_days()),
        ]);
    }

    align_right(&mut table, 2);
    table
}

/// Rows inserted per table by the test-data seeding.
pub fn inserted_table(inserted: &[(&str, usize)]) -> Table {
    let mut table = new_table(&["Table", "Inserted rows"]);

    for (name, rows) in inserted {
        table.add_row(vec![Cell::new(name), Cell::new(rows)]);
    }

    align_right(&mut table, 1);
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;
    use cleaner_schema::DeletionCounts;

    fn row_with<'a>(rendered: &'a str, label: &str) -> &'a str {
        rendered
            .lines()
            .find(|line| line.contains(label))
            .unwrap_or_else(|| panic!("no row for {label:?} in\n{rendered}"))
    }

    #[test]
    fn test_summary_table_rows() {
        let mut deletions = DeletionCounts::new();
        deletions.record("rule_hit", 4);
        deletions.record("report", 2);
        let summary = Summary::new(3, 1, deletions);

        let rendered = summary_table(&summary).to_string();
        assert!(row_with(&rendered, "Summary").contains("Count"));
        assert!(row_with(&rendered, "Proper cluster entries").contains('3'));
        assert!(row_with(&rendered, "Improper cluster entries").contains('1'));
        assert!(row_with(&rendered, "Deletions from table 'rule_hit'").contains('4'));
        assert!(row_with(&rendered, "Deletions from table 'report'").contains('2'));
        assert!(row_with(&rendered, "Total deletions").contains('6'));

        let rule_hit = rendered.find("'rule_hit'").unwrap();
        let report = rendered.find("'report'").unwrap();
        assert!(rule_hit < report);
    }

    #[test]
    fn test_empty_summary_total_is_zero() {
        let rendered = summary_table(&Summary::new(0, 2, DeletionCounts::new())).to_string();
        assert!(row_with(&rendered, "Total deletions").contains('0'));
    }

    #[test]
    fn test_stale_table() {
        let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let records = vec![StaleClusterRecord {
            cluster: "5d5892d3-1f74-4ccf-91af-548dfc9767aa".to_string(),
            reported_at: now - TimeDelta::days(42),
        }];

        let rendered = stale_table(&records, now).to_string();
        let row = row_with(&rendered, "5d5892d3-1f74-4ccf-91af-548dfc9767aa");
        assert!(row.contains("42"));
        assert!(row.contains("2023-10-03"));
    }

    #[test]
    fn test_inserted_table() {
        let rendered = inserted_table(&[("report", 5), ("rule_hit", 8)]).to_string();
        assert!(row_with(&rendered, "report").contains('5'));
        assert!(row_with(&rendered, "rule_hit").contains('8'));
    }
}
