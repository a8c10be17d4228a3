//! The persistence seam and its in-memory reference implementation.
//!
//! `RecordStore` is the boundary between the ledger core and whatever
//! durable medium holds the chain.  The trait deliberately exposes no
//! update or delete surface — records are write-once — and its `append`
//! performs the optimistic tail check that makes concurrent writers safe:
//! a record whose sequence does not extend the current tail is rejected,
//! never merged.

use std::sync::Mutex;

use custodia_contracts::{AuditRecord, ChainCursor, LedgerError, LedgerResult};

/// Append-only record storage, keyed by sequence number.
///
/// Implementations must treat appended records as immutable: once `append`
/// returns `Ok`, the record at that sequence is never modified or removed
/// through this interface.  Deletion is a retention-policy concern that
/// lives outside the ledger core.
pub trait RecordStore: Send + Sync {
    /// Append one sealed record.
    ///
    /// Must fail atomically with `LedgerError::ConcurrencyViolation` when
    /// `record.sequence` does not extend the store's current tail — the
    /// optimistic concurrency check that protects sequence contiguity.
    /// Nothing is written on failure.
    fn append(&self, record: AuditRecord) -> LedgerResult<()>;

    /// Read the contiguous range of records with `from_seq <= sequence <=
    /// to_seq`, in sequence order.  Sequences outside the stored range are
    /// simply absent from the result.
    fn read_range(&self, from_seq: u64, to_seq: u64) -> LedgerResult<Vec<AuditRecord>>;

    /// Read every stored record in sequence order.
    fn read_all(&self) -> LedgerResult<Vec<AuditRecord>>;

    /// The cursor a writer must use for its next append: sequence and hash
    /// of the current tail, or the genesis cursor for an empty store.
    fn cursor(&self) -> LedgerResult<ChainCursor>;
}

/// An in-memory `RecordStore` backed by a `Vec` behind a `Mutex`.
///
/// The reference implementation: durable backends replace it in production,
/// but every contract above is exercised against this one in tests.
#[derive(Default)]
pub struct InMemoryRecordStore {
    records: Mutex<Vec<AuditRecord>>,
}

impl InMemoryRecordStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> LedgerResult<std::sync::MutexGuard<'_, Vec<AuditRecord>>> {
        self.records.lock().map_err(|e| LedgerError::Persistence {
            reason: format!("record store lock poisoned: {}", e),
        })
    }
}

impl RecordStore for InMemoryRecordStore {
    fn append(&self, record: AuditRecord) -> LedgerResult<()> {
        let mut records = self.lock()?;

        let tail_sequence = records.last().map(|r| r.sequence).unwrap_or(0);
        if record.sequence != tail_sequence + 1 {
            return Err(LedgerError::ConcurrencyViolation {
                expected: record.sequence.saturating_sub(1),
                found: tail_sequence,
            });
        }

        records.push(record);
        Ok(())
    }

    fn read_range(&self, from_seq: u64, to_seq: u64) -> LedgerResult<Vec<AuditRecord>> {
        let records = self.lock()?;
        Ok(records
            .iter()
            .filter(|r| r.sequence >= from_seq && r.sequence <= to_seq)
            .cloned()
            .collect())
    }

    fn read_all(&self) -> LedgerResult<Vec<AuditRecord>> {
        Ok(self.lock()?.clone())
    }

    fn cursor(&self) -> LedgerResult<ChainCursor> {
        let records = self.lock()?;
        Ok(match records.last() {
            Some(tail) => ChainCursor {
                next_sequence: tail.sequence + 1,
                prev_hash: tail.current_hash.clone(),
            },
            None => ChainCursor::genesis(),
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
