//! The checkpoint service: compact, hashed anchors over chain state.
//!
//! A checkpoint commits to (record_count, last_sequence, last_hash,
//! timestamp) with its own SHA-256 digest.  Checkpoints are derived from
//! the chain but never chained into it — they anchor fast partial
//! re-verification and external attestation, and `verify_checkpoint`
//! gives each one its own tamper-evidence.
//!
//! Checkpoint hash input layout (bytes, in order):
//!   1. record_count as 8-byte little-endian
//!   2. last_sequence as 8-byte little-endian
//!   3. last_hash as UTF-8 bytes (64 hex chars, or empty for an empty chain)
//!   4. timestamp as RFC 3339 UTF-8 bytes

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use tracing::info;

use custodia_contracts::{AuditRecord, Checkpoint, LedgerError, LedgerResult};

use crate::verify::{faults_from_anchor, verify_chain, ChainReport};

/// Compute the digest a checkpoint's `checkpoint_hash` must carry.
pub fn checkpoint_hash(
    record_count: u64,
    last_sequence: u64,
    last_hash: &str,
    timestamp: DateTime<Utc>,
) -> String {
    let mut hasher = Sha256::new();
    hasher.update(record_count.to_le_bytes());
    hasher.update(last_sequence.to_le_bytes());
    hasher.update(last_hash.as_bytes());
    hasher.update(timestamp.to_rfc3339().as_bytes());
    hex::encode(hasher.finalize())
}

/// Check a checkpoint's self-hash against its own stored fields.
pub fn verify_checkpoint(cp: &Checkpoint) -> bool {
    cp.checkpoint_hash
        == checkpoint_hash(cp.record_count, cp.last_sequence, &cp.last_hash, cp.timestamp)
}

/// Verify a chain segment anchored on a trusted checkpoint.
///
/// `records_since` must be the contiguous records that follow the
/// checkpoint (first sequence = `cp.last_sequence + 1`).  The first
/// record's `prev_hash` is checked against the checkpoint's `last_hash`
/// instead of the genesis sentinel; everything else matches full
/// verification.  This is the chunked fast path for very large chains —
/// it is not a substitute for full verification when full verification
/// is required.
pub fn verify_from_checkpoint(cp: &Checkpoint, records_since: &[AuditRecord]) -> ChainReport {
    let faults = faults_from_anchor(
        records_since,
        cp.last_sequence + 1,
        &cp.last_hash,
        "record at index 0: previous hash does not match checkpoint anchor",
    );
    ChainReport::from_faults(faults)
}

/// Issues checkpoints and enforces their monotonicity.
///
/// Record count and last sequence must never regress between consecutive
/// checkpoints from the same service — a regression means the caller
/// handed in a truncated chain, which is a caller error, not a silent
/// event.
#[derive(Default)]
pub struct CheckpointService {
    last: Mutex<Option<Checkpoint>>,
}

impl CheckpointService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a checkpoint over `records` at a caller-supplied timestamp.
    ///
    /// Deterministic: the same records and timestamp always produce the
    /// same `checkpoint_hash`.
    pub fn create(
        &self,
        records: &[AuditRecord],
        timestamp: DateTime<Utc>,
    ) -> LedgerResult<Checkpoint> {
        let record_count = records.len() as u64;
        let (last_sequence, last_hash) = match records.last() {
            Some(tail) => (tail.sequence, tail.current_hash.clone()),
            None => (0, String::new()),
        };

        let mut last = self.last.lock().map_err(|e| LedgerError::Persistence {
            reason: format!("checkpoint state lock poisoned: {}", e),
        })?;

        if let Some(previous) = last.as_ref() {
            if record_count < previous.record_count {
                return Err(LedgerError::CheckpointRegression {
                    field: "record_count",
                    previous: previous.record_count,
                    current: record_count,
                });
            }
            if last_sequence < previous.last_sequence {
                return Err(LedgerError::CheckpointRegression {
                    field: "last_sequence",
                    previous: previous.last_sequence,
                    current: last_sequence,
                });
            }
        }

        let cp = Checkpoint {
            record_count,
            last_sequence,
            last_hash: last_hash.clone(),
            timestamp,
            checkpoint_hash: checkpoint_hash(record_count, last_sequence, &last_hash, timestamp),
        };

        info!(
            record_count,
            last_sequence,
            checkpoint_hash = %cp.checkpoint_hash,
            "checkpoint created"
        );

        *last = Some(cp.clone());
        Ok(cp)
    }

    /// Create a checkpoint at the current UTC time.
    pub fn create_now(&self, records: &[AuditRecord]) -> LedgerResult<Checkpoint> {
        self.create(records, Utc::now())
    }

    /// The most recently issued checkpoint, if any.
    pub fn latest(&self) -> LedgerResult<Option<Checkpoint>> {
        self.last
            .lock()
            .map(|l| l.clone())
            .map_err(|e| LedgerError::Persistence {
                reason: format!("checkpoint state lock poisoned: {}", e),
            })
    }
}

/// Full verification convenience used by callers that hold a chain and a
/// checkpoint covering its prefix: verify the prefix anchor cheaply, then
/// the suffix, without replaying records before the checkpoint.
pub fn verify_since_latest(
    service: &CheckpointService,
    records: &[AuditRecord],
) -> LedgerResult<ChainReport> {
    match service.latest()? {
        Some(cp) if verify_checkpoint(&cp) => {
            let suffix: Vec<AuditRecord> = records
                .iter()
                .filter(|r| r.sequence > cp.last_sequence)
                .cloned()
                .collect();
            Ok(verify_from_checkpoint(&cp, &suffix))
        }
        // No trusted anchor: fall back to full verification.
        _ => Ok(verify_chain(records)),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
