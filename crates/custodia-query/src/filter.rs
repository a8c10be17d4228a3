//! Query filters over sealed records.
//!
//! Filtering is read-only: it operates on an already-persisted, immutable
//! snapshot and may run with unlimited concurrency alongside the writer.
//! Time bounds are inclusive and the resource criterion is substring
//! containment, so `"trip/"` matches every trip record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use custodia_contracts::{ActionKind, AuditRecord, Severity};

/// Criteria for selecting records.  All set criteria must match.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordFilter {
    /// Exact actor id.
    pub actor_id: Option<String>,
    /// Exact action kind.
    pub action: Option<ActionKind>,
    /// Exact severity level.
    pub severity: Option<Severity>,
    /// Success flag.
    pub success: Option<bool>,
    /// Substring the resource descriptor must contain.
    pub resource_contains: Option<String>,
    /// Inclusive lower time bound.
    pub start_time: Option<DateTime<Utc>>,
    /// Inclusive upper time bound.
    pub end_time: Option<DateTime<Utc>>,
}

impl RecordFilter {
    /// An empty filter, matching every record.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn by_actor(mut self, actor_id: impl Into<String>) -> Self {
        self.actor_id = Some(actor_id.into());
        self
    }

    pub fn by_action(mut self, action: ActionKind) -> Self {
        self.action = Some(action);
        self
    }

    pub fn by_severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }

    pub fn successful_only(mut self) -> Self {
        self.success = Some(true);
        self
    }

    pub fn failed_only(mut self) -> Self {
        self.success = Some(false);
        self
    }

    pub fn by_resource(mut self, substring: impl Into<String>) -> Self {
        self.resource_contains = Some(substring.into());
        self
    }

    /// Restrict to `from <= timestamp <= to`.
    pub fn in_window(mut self, from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        self.start_time = Some(from);
        self.end_time = Some(to);
        self
    }

    /// Whether `record` satisfies every set criterion.
    pub fn matches(&self, record: &AuditRecord) -> bool {
        let entry = &record.entry;

        if let Some(actor_id) = &self.actor_id {
            if &entry.actor_id != actor_id {
                return false;
            }
        }

        if let Some(action) = self.action {
            if entry.action != action {
                return false;
            }
        }

        if let Some(severity) = self.severity {
            if entry.severity != severity {
                return false;
            }
        }

        if let Some(success) = self.success {
            if entry.success != success {
                return false;
            }
        }

        if let Some(substring) = &self.resource_contains {
            match &entry.resource {
                Some(resource) if resource.contains(substring.as_str()) => {}
                _ => return false,
            }
        }

        if let Some(start) = self.start_time {
            if entry.timestamp < start {
                return false;
            }
        }

        if let Some(end) = self.end_time {
            if entry.timestamp > end {
                return false;
            }
        }

        true
    }
}

/// The subset of `records` matching `filter`, in input order.
pub fn filter_records(records: &[AuditRecord], filter: &RecordFilter) -> Vec<AuditRecord> {
    records
        .iter()
        .filter(|r| filter.matches(r))
        .cloned()
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
