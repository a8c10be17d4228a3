//! Chained record, cursor, and checkpoint types.
//!
//! `AuditRecord` is an `AuditEntry` sealed into the hash chain — it adds the
//! sequence number and the SHA-256 hashes that make tampering detectable.
//! Modifying any field, including those of the embedded entry, invalidates
//! `current_hash` and breaks the next record's link, which the verifier in
//! `custodia-chain` detects.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entry::AuditEntry;

/// The sentinel `prev_hash` of the first record in every chain.
///
/// 64 hex zeros — a value that can never be the SHA-256 of real data, making
/// genesis detection unambiguous.
pub const GENESIS_HASH: &str =
    "0000000000000000000000000000000000000000000000000000000000000000";

/// One sealed record in the hash chain.
///
/// Created exactly once by the Chain Builder and owned by the persistence
/// collaborator thereafter.  Read-only for the lifetime of the system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    /// The entry this record seals.
    pub entry: AuditEntry,

    /// Position in the chain, starting at 1, contiguous in storage order.
    pub sequence: u64,

    /// SHA-256 hash (lowercase hex) of the previous record, or
    /// `GENESIS_HASH` for the first record.
    pub prev_hash: String,

    /// SHA-256 hash (lowercase hex) of this record's canonical content.
    ///
    /// Computed over (canonical entry JSON, sequence, prev_hash) — every
    /// immutable field except `current_hash` itself.
    pub current_hash: String,
}

/// The writer's append position: next sequence number and the hash the next
/// record must link to.
///
/// Exactly one writer owns the cursor of a ledger at a time.  Readers never
/// see it — they only see sealed records.  Modelled as an explicit value, not
/// hidden state, so tests can construct and replay deterministic cursors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainCursor {
    /// The sequence number the next record will carry.
    pub next_sequence: u64,
    /// The `current_hash` of the last sealed record, or `GENESIS_HASH`.
    pub prev_hash: String,
}

impl ChainCursor {
    /// The cursor of an empty ledger: sequence 1, genesis sentinel.
    pub fn genesis() -> Self {
        Self {
            next_sequence: 1,
            prev_hash: GENESIS_HASH.to_string(),
        }
    }

    /// The cursor after `record` has been persisted.
    pub fn advanced(&self, record: &AuditRecord) -> Self {
        Self {
            next_sequence: record.sequence + 1,
            prev_hash: record.current_hash.clone(),
        }
    }
}

impl Default for ChainCursor {
    fn default() -> Self {
        Self::genesis()
    }
}

/// A compact, hashed summary of chain state.
///
/// Checkpoints are anchors for fast partial re-verification and external
/// attestation.  They are derived from the chain but not chained into it;
/// `checkpoint_hash` gives each checkpoint its own tamper-evidence.  A
/// checkpoint never substitutes for full verification when full verification
/// is required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Number of records covered.
    pub record_count: u64,
    /// Sequence number of the last covered record, 0 for an empty chain.
    pub last_sequence: u64,
    /// `current_hash` of the last covered record, empty for an empty chain.
    pub last_hash: String,
    /// When the checkpoint was taken (UTC), supplied by the caller so the
    /// checkpoint hash is deterministic under test.
    pub timestamp: DateTime<Utc>,
    /// SHA-256 hash (lowercase hex) over the four fields above.
    pub checkpoint_hash: String,
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{action::ActionKind, entry::EntryBuilder};

    #[test]
    fn test_genesis_sentinel_shape() {
        assert_eq!(GENESIS_HASH.len(), 64);
        assert!(GENESIS_HASH.chars().all(|c| c == '0'));
    }

    #[test]
    fn test_genesis_cursor() {
        let cursor = ChainCursor::genesis();
        assert_eq!(cursor.next_sequence, 1);
        assert_eq!(cursor.prev_hash, GENESIS_HASH);
        assert_eq!(ChainCursor::default(), cursor);
    }

    #[test]
    fn test_cursor_advanced() {
        let entry = EntryBuilder::new(ActionKind::Login, "u").build().unwrap();
        let record = AuditRecord {
            entry,
            sequence: 4,
            prev_hash: "aa".repeat(32),
            current_hash: "bb".repeat(32),
        };

        let next = ChainCursor::genesis().advanced(&record);
        assert_eq!(next.next_sequence, 5);
        assert_eq!(next.prev_hash, record.current_hash);
    }
}
