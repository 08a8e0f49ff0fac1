//! Test data for the results database
//!
//! Populates the store with a small, deterministic set of clusters: some
//! reporting recently, some with a mix of old and recent reports and some
//! that stopped reporting long ago.

use chrono::{DateTime, TimeDelta, Utc};
use rusqlite::{Connection, params};

use crate::store::StoreError;

const ORG_ID: i64 = 11_789_772;
const USER_ID: &str = "1";

/// Seeded clusters with the age in days of each of their reports.
pub const FIXTURE_CLUSTERS: &[(&str, &[i64])] = &[
    ("34c3ecc5-624a-49a5-bab8-4fdc5e51a266", &[1]),
    ("74ae54aa-6577-4e80-85e7-697cb646ff37", &[40, 2]),
    ("a7467445-8d6a-43cc-b82c-7007664bdf69", &[95]),
    ("ee7d2bf4-8933-4a3a-8634-3328fe806e08", &[120, 100]),
];

/// Rule module and error key pairs reported for every seeded cluster.
const RULES: &[(&str, &str)] = &[
    (
        "ccx_rules_ocp.external.rules.nodes_kubelet_version_check",
        "NODE_KUBELET_VERSION",
    ),
    (
        "ccx_rules_ocp.external.rules.samples_op_failed_image_import_check",
        "SAMPLES_FAILED_IMAGE_IMPORT_ERR",
    ),
];

/// Insert the fixture set relative to `now`, in a single transaction.
///
/// Expects the schema to exist. Returns the number of rows inserted per table.
pub fn fill_in_database(
    conn: &mut Connection,
    now: DateTime<Utc>,
) -> Result<Vec<(&'static str, usize)>, StoreError> {
    let tx = conn.transaction()?;
    let mut reports = 0;
    let mut toggles = 0;
    let mut feedback = 0;
    let mut disable_feedback = 0;
    let mut rule_hits = 0;

    for (cluster, ages) in FIXTURE_CLUSTERS {
        for days in *ages {
            let reported_at = (now - TimeDelta::days(*days)).timestamp();
            reports += tx.execute(
                "INSERT INTO report (org_id, cluster, report, reported_at, last_checked_at)
                 VALUES (?1, ?2, ?3, ?4, ?4)",
                params![ORG_ID, cluster, r#"{"reports":[]}"#, reported_at],
            )?;
        }

        let updated_at = now.timestamp();
        let (first_rule, first_key) = RULES[0];
        toggles += tx.execute(
            "INSERT INTO cluster_rule_toggle
                 (cluster_id, rule_id, error_key, user_id, disabled, disabled_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, 1, ?5, ?5)",
            params![cluster, first_rule, first_key, USER_ID, updated_at],
        )?;
        feedback += tx.execute(
            "INSERT INTO cluster_rule_user_feedback
                 (cluster_id, rule_id, error_key, user_id, message, user_vote, added_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, 'helpful', 1, ?5, ?5)",
            params![cluster, first_rule, first_key, USER_ID, updated_at],
        )?;
        disable_feedback += tx.execute(
            "INSERT INTO cluster_user_rule_disable_feedback
                 (cluster_id, user_id, rule_id, error_key, message, added_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, 'not relevant here', ?5, ?5)",
            params![cluster, USER_ID, first_rule, first_key, updated_at],
        )?;

        for (rule, key) in RULES {
            rule_hits += tx.execute(
                "INSERT INTO rule_hit (org_id, cluster_id, rule_fqdn, error_key, template_data)
                 VALUES (?1, ?2, ?3, ?4, '{}')",
                params![ORG_ID, cluster, rule, key],
            )?;
        }
    }

    tx.commit()?;

    let inserted = vec![
        ("report", reports),
        ("cluster_rule_toggle", toggles),
        ("cluster_rule_user_feedback", feedback),
        ("cluster_user_rule_disable_feedback", disable_feedback),
        ("rule_hit", rule_hits),
    ];
    for (table, rows) in &inserted {
        tracing::info!(table, rows, "Inserted test data");
    }
    Ok(inserted)
}
