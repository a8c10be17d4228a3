//! Activity reporting: aggregate counts over a time window.
//!
//! Reports are derived data for auditors and dashboards — they never feed
//! back into the chain, so they can use friendly groupings (wire names for
//! actions and severities) without affecting hash reproducibility.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use custodia_contracts::AuditRecord;

use crate::filter::{filter_records, RecordFilter};

/// Aggregate activity over one time window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityReport {
    /// Inclusive window start.
    pub start_time: DateTime<Utc>,
    /// Inclusive window end.
    pub end_time: DateTime<Utc>,
    /// Records inside the window.
    pub total: u64,
    /// Counts keyed by action wire name.
    pub by_action: BTreeMap<String, u64>,
    /// Counts keyed by severity wire name.
    pub by_severity: BTreeMap<String, u64>,
    /// Counts keyed by actor id.
    pub by_actor: BTreeMap<String, u64>,
    /// Percentage of records with `success = false`; 0.0 for an empty window.
    pub failure_rate: f64,
}

/// Aggregate the records inside `[start_time, end_time]`.
pub fn build_report(
    records: &[AuditRecord],
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
) -> ActivityReport {
    let windowed = filter_records(records, &RecordFilter::new().in_window(start_time, end_time));

    let mut by_action: BTreeMap<String, u64> = BTreeMap::new();
    let mut by_severity: BTreeMap<String, u64> = BTreeMap::new();
    let mut by_actor: BTreeMap<String, u64> = BTreeMap::new();
    let mut failures = 0u64;

    for record in &windowed {
        let entry = &record.entry;
        *by_action.entry(entry.action.as_str().to_string()).or_default() += 1;
        *by_severity
            .entry(entry.severity.as_str().to_string())
            .or_default() += 1;
        *by_actor.entry(entry.actor_id.clone()).or_default() += 1;
        if !entry.success {
            failures += 1;
        }
    }

    let total = windowed.len() as u64;
    let failure_rate = if total == 0 {
        0.0
    } else {
        (failures as f64 / total as f64) * 100.0
    };

    ActivityReport {
        start_time,
        end_time,
        total,
        by_action,
        by_severity,
        by_actor,
        failure_rate,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use custodia_contracts::{ActionKind, EntryBuilder, Severity, GENESIS_HASH};

    use super::*;

    fn record(entry: custodia_contracts::AuditEntry, sequence: u64) -> AuditRecord {
        AuditRecord {
            entry,
            sequence,
            prev_hash: GENESIS_HASH.to_string(),
            current_hash: String::new(),
        }
    }

    fn sample() -> (Vec<AuditRecord>, DateTime<Utc>) {
        let base = Utc.with_ymd_and_hms(2026, 5, 1, 8, 0, 0).unwrap();
        let entries = [
            EntryBuilder::new(ActionKind::Login, "alice")
                .build_at(base)
                .unwrap(),
            EntryBuilder::new(ActionKind::ResourceUpdate, "alice")
                .resource("trip/1")
                .build_at(base + Duration::minutes(10))
                .unwrap(),
            EntryBuilder::new(ActionKind::ResourceUpdate, "bob")
                .resource("trip/2")
                .build_at(base + Duration::minutes(20))
                .unwrap(),
            EntryBuilder::new(ActionKind::LoginFailed, "mallory")
                .severity(Severity::Error)
                .failed("bad password")
                .build_at(base + Duration::minutes(30))
                .unwrap(),
        ];
        let records = entries
            .into_iter()
            .enumerate()
            .map(|(i, e)| record(e, i as u64 + 1))
            .collect();
        (records, base)
    }

    #[test]
    fn test_report_counts() {
        let (records, base) = sample();
        let report = build_report(&records, base, base + Duration::hours(1));

        assert_eq!(report.total, 4);
        assert_eq!(report.by_action.get("resource-update"), Some(&2));
        assert_eq!(report.by_action.get("login"), Some(&1));
        assert_eq!(report.by_action.get("login-failed"), Some(&1));
        assert_eq!(report.by_severity.get("INFO"), Some(&3));
        assert_eq!(report.by_severity.get("ERROR"), Some(&1));
        assert_eq!(report.by_actor.get("alice"), Some(&2));
        assert_eq!(report.by_actor.get("bob"), Some(&1));
    }

    #[test]
    fn test_failure_rate() {
        let (records, base) = sample();
        let report = build_report(&records, base, base + Duration::hours(1));
        // One failure out of four records.
        assert!((report.failure_rate - 25.0).abs() < f64::EPSILON);
    }

    /// An empty window reports zero, not a division-by-zero artifact.
    #[test]
    fn test_empty_window() {
        let (records, base) = sample();
        let later = base + Duration::days(30);
        let report = build_report(&records, later, later + Duration::hours(1));

        assert_eq!(report.total, 0);
        assert_eq!(report.failure_rate, 0.0);
        assert!(report.by_action.is_empty());
        assert!(report.by_actor.is_empty());
    }

    /// The window clips: records outside it do not count.
    #[test]
    fn test_window_clips() {
        let (records, base) = sample();
        let report = build_report(&records, base, base + Duration::minutes(15));
        assert_eq!(report.total, 2);
        assert_eq!(report.failure_rate, 0.0);
    }

    #[test]
    fn test_report_wire_shape() {
        let (records, base) = sample();
        let report = build_report(&records, base, base + Duration::hours(1));
        let json = serde_json::to_value(&report).unwrap();

        assert!(json["byAction"].is_object());
        assert!(json["bySeverity"].is_object());
        assert!(json["byActor"].is_object());
        assert_eq!(json["failureRate"], 25.0);
    }
}
