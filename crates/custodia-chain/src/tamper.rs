//! The tamper detector: verifier faults grouped per suspect record.
//!
//! Auditors rarely want a flat error list — they want to know *which*
//! records to pull and why.  `detect_tampering` reshapes the verifier's
//! faults into one `SuspiciousRecord` per implicated index, carrying the
//! record's id so it can be located in storage.

use serde::{Deserialize, Serialize};

use custodia_contracts::AuditRecord;

use crate::verify::chain_faults;

/// One record implicated by at least one failed integrity check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuspiciousRecord {
    /// Position of the record in the verified slice.
    pub index: usize,
    /// The entry id of the record, if the index exists in the input.
    pub record_id: String,
    /// Every failure message that references this index, in check order.
    pub issues: Vec<String>,
}

/// The detector's verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TamperReport {
    /// True iff any integrity check failed.
    pub tampered: bool,
    /// Implicated records in index order.
    pub suspicious_records: Vec<SuspiciousRecord>,
}

/// Interpret the verifier's faults as a per-record suspicion list.
///
/// `tampered` is the negation of the chain's validity; a valid chain
/// produces an empty suspicion list.
pub fn detect_tampering(records: &[AuditRecord]) -> TamperReport {
    let faults = chain_faults(records);

    let mut suspicious: Vec<SuspiciousRecord> = Vec::new();
    for fault in faults {
        match suspicious.iter_mut().find(|s| s.index == fault.index) {
            Some(existing) => existing.issues.push(fault.message),
            None => suspicious.push(SuspiciousRecord {
                index: fault.index,
                record_id: records
                    .get(fault.index)
                    .map(|r| r.entry.id.clone())
                    .unwrap_or_default(),
                issues: vec![fault.message],
            }),
        }
    }
    suspicious.sort_by_key(|s| s.index);

    TamperReport {
        tampered: !suspicious.is_empty(),
        suspicious_records: suspicious,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
