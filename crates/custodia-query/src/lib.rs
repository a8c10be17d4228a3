//! # custodia-query
//!
//! Read-only filtering and activity reporting over sealed audit records.
//!
//! Everything here operates on immutable snapshots handed in by the caller
//! and never touches the writer's cursor, so queries and reports can run
//! with unlimited concurrency alongside appends.

pub mod filter;
pub mod report;

pub use filter::{filter_records, RecordFilter};
pub use report::{build_report, ActivityReport};

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use custodia_contracts::{ActionKind, ChainCursor, EntryBuilder, Severity};

    use super::*;

    /// Filters compose with reports: reporting over a pre-filtered subset
    /// matches filtering inside the report window.
    #[test]
    fn filter_then_report_consistency() {
        let base = Utc.with_ymd_and_hms(2026, 7, 1, 9, 0, 0).unwrap();
        let mut cursor = ChainCursor::genesis();
        let mut records = Vec::new();
        for i in 0..6u64 {
            let builder = EntryBuilder::new(
                if i % 2 == 0 {
                    ActionKind::ResourceUpdate
                } else {
                    ActionKind::ResourceApprove
                },
                format!("user-{}", i % 3),
            );
            let builder = if i == 5 {
                builder.severity(Severity::Error).failed("rejected")
            } else {
                builder
            };
            let entry = builder.build_at(base + Duration::minutes(i as i64)).unwrap();

            // Queries never look at hashes, so leave them unsealed.
            let record = custodia_contracts::AuditRecord {
                entry,
                sequence: cursor.next_sequence,
                prev_hash: cursor.prev_hash.clone(),
                current_hash: String::new(),
            };
            cursor.next_sequence += 1;
            records.push(record);
        }

        let window_end = base + Duration::hours(1);
        let report = build_report(&records, base, window_end);
        assert_eq!(report.total, 6);

        let approvals = filter_records(
            &records,
            &RecordFilter::new().by_action(ActionKind::ResourceApprove),
        );
        assert_eq!(
            report.by_action.get("resource-approve").copied().unwrap_or(0),
            approvals.len() as u64
        );

        let failures = filter_records(&records, &RecordFilter::new().failed_only());
        assert_eq!(failures.len(), 1);
        assert!((report.failure_rate - (1.0 / 6.0) * 100.0).abs() < 1e-9);
    }
}
