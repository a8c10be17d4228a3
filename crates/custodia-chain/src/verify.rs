//! Chain verification: structural integrity as a report, never a panic.
//!
//! `verify_chain` recomputes every hash and checks sequence contiguity,
//! link continuity, and the genesis sentinel.  All faults are collected
//! before returning so an auditor sees the full failure set in one pass —
//! a chain that fails verification is a finding, not an exception.
//!
//! Link continuity is deliberately checked against the freshly *recomputed*
//! hash of the predecessor, not its stored `current_hash`: an attacker who
//! edits record i-1's content also controls its stored hash, so only the
//! recomputed value exposes the edit both at i-1 (self-hash mismatch) and
//! at i (link mismatch).

use serde::{Deserialize, Serialize};
use tracing::warn;

use custodia_contracts::{AuditRecord, GENESIS_HASH};

use crate::hash::recompute_hash;

/// One integrity failure, tied to the index of the record it implicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainFault {
    /// Position (0-based, in the supplied slice) of the suspect record.
    pub index: usize,
    /// Human-readable description of the failed check.
    pub message: String,
}

/// The verifier's structured verdict on a chain.
///
/// Serializes with camelCase keys — this struct is embedded verbatim in the
/// export bundle (`verification` field).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainReport {
    /// True iff no check failed.  An empty chain is trivially valid.
    pub is_valid: bool,
    /// Every failure, in check order.
    pub errors: Vec<String>,
    /// Sorted, deduplicated indices of records implicated by any failure.
    pub broken_links: Vec<usize>,
}

impl ChainReport {
    pub(crate) fn from_faults(faults: Vec<ChainFault>) -> Self {
        let errors: Vec<String> = faults.iter().map(|f| f.message.clone()).collect();
        let mut broken_links: Vec<usize> = faults.iter().map(|f| f.index).collect();
        broken_links.sort_unstable();
        broken_links.dedup();

        Self {
            is_valid: errors.is_empty(),
            errors,
            broken_links,
        }
    }
}

/// Run every integrity check and return the individual faults.
///
/// Check order per record: sequence contiguity, self-hash correctness,
/// then link continuity (genesis sentinel at index 0, recomputed
/// predecessor hash elsewhere).  Never fails on malformed input — a
/// malformed record is a fault, not an error.
pub fn chain_faults(records: &[AuditRecord]) -> Vec<ChainFault> {
    faults_from_anchor(
        records,
        1,
        GENESIS_HASH,
        "genesis record has invalid previous hash",
    )
}

/// The fault walk behind `chain_faults`, parameterized on the anchor so the
/// checkpoint service can verify a chain segment starting mid-ledger.
///
/// `first_sequence` is the sequence the record at index 0 must carry;
/// `anchor_hash` is the hash its `prev_hash` must equal; `anchor_error` is
/// the message emitted when it does not.
pub(crate) fn faults_from_anchor(
    records: &[AuditRecord],
    first_sequence: u64,
    anchor_hash: &str,
    anchor_error: &str,
) -> Vec<ChainFault> {
    let mut faults = Vec::new();

    for (i, record) in records.iter().enumerate() {
        // Sequence numbers are contiguous from the anchor in storage order.
        let expected_sequence = first_sequence + i as u64;
        if record.sequence != expected_sequence {
            faults.push(ChainFault {
                index: i,
                message: format!(
                    "record at index {}: invalid sequence number (expected {}, found {})",
                    i, expected_sequence, record.sequence
                ),
            });
        }

        // Self-hash: the stored current_hash must match a recomputation
        // over the record's own stored fields.
        if record.current_hash != recompute_hash(record) {
            faults.push(ChainFault {
                index: i,
                message: format!("record at index {}: hash verification failed", i),
            });
        }

        // Link continuity.
        if i == 0 {
            if record.prev_hash != anchor_hash {
                faults.push(ChainFault {
                    index: 0,
                    message: anchor_error.to_string(),
                });
            }
        } else {
            // Compare against the recomputed predecessor hash, not the
            // stored one: see the module docs for why.
            let predecessor_hash = recompute_hash(&records[i - 1]);
            if record.prev_hash != predecessor_hash {
                faults.push(ChainFault {
                    index: i,
                    message: format!(
                        "record at index {}: previous hash does not match predecessor",
                        i
                    ),
                });
            }
        }
    }

    faults
}

/// Verify the integrity of an ordered chain of records.
///
/// Returns a `ChainReport`; `is_valid` is true iff the error list is
/// empty.  An empty input slice is valid.
pub fn verify_chain(records: &[AuditRecord]) -> ChainReport {
    let faults = chain_faults(records);
    if !faults.is_empty() {
        warn!(
            record_count = records.len(),
            fault_count = faults.len(),
            "chain verification found integrity faults"
        );
    }
    ChainReport::from_faults(faults)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
