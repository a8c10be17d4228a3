//! The Chain Builder and the single-writer ledger front end.
//!
//! `seal_record` is the pure core: entry + cursor in, sealed record out,
//! deterministic given its inputs.  `LedgerWriter` wraps it with the
//! single-writer discipline the chain's contiguity invariant demands: one
//! mutex-held cursor per ledger instance, advanced only after the store
//! accepts the record.

use std::sync::{Arc, Mutex};

use tracing::{info, warn};

use custodia_contracts::{
    AuditEntry, AuditRecord, ChainCursor, LedgerError, LedgerResult,
};

use crate::{hash::hash_record_content, store::RecordStore};

/// Seal an entry into a record at the given cursor position.
///
/// Pure and deterministic: the returned record's `current_hash` commits to
/// the entry, the cursor's sequence, and the cursor's previous hash.  The
/// caller must persist the record and advance the cursor before the next
/// append — `LedgerWriter` does both.
pub fn seal_record(entry: AuditEntry, cursor: &ChainCursor) -> AuditRecord {
    let current_hash = hash_record_content(&entry, cursor.next_sequence, &cursor.prev_hash);
    AuditRecord {
        entry,
        sequence: cursor.next_sequence,
        prev_hash: cursor.prev_hash.clone(),
        current_hash,
    }
}

/// The single writer of one ledger instance.
///
/// Owns the append cursor exclusively; concurrent `append` calls are
/// serialized on the internal mutex, so sequence numbers stay contiguous.
/// Readers never touch the writer — they verify, query, and checkpoint
/// against sealed records read from the store.
pub struct LedgerWriter {
    store: Arc<dyn RecordStore>,
    cursor: Mutex<ChainCursor>,
}

impl LedgerWriter {
    /// Create a writer over `store`, initializing the cursor from the
    /// store's current tail (the genesis cursor for an empty store).
    pub fn new(store: Arc<dyn RecordStore>) -> LedgerResult<Self> {
        let cursor = store.cursor()?;
        Ok(Self {
            store,
            cursor: Mutex::new(cursor),
        })
    }

    /// Seal `entry` at the current cursor, persist it, and advance.
    ///
    /// If the store rejects the append because its tail moved (another
    /// writer on the same store), the cursor is refreshed from the store
    /// and the append retried once with freshly computed sequence and
    /// previous hash.  Stale values are never re-submitted; a second
    /// conflict propagates to the caller.
    pub fn append(&self, entry: AuditEntry) -> LedgerResult<AuditRecord> {
        let mut cursor = self.cursor.lock().map_err(|e| LedgerError::Persistence {
            reason: format!("ledger cursor lock poisoned: {}", e),
        })?;

        let record = seal_record(entry.clone(), &cursor);
        let record = match self.store.append(record.clone()) {
            Ok(()) => record,
            Err(LedgerError::ConcurrencyViolation { expected, found }) => {
                warn!(
                    expected_tail = expected,
                    store_tail = found,
                    "append conflict, refreshing cursor and retrying"
                );
                *cursor = self.store.cursor()?;
                let retried = seal_record(entry, &cursor);
                self.store.append(retried.clone())?;
                retried
            }
            Err(e) => return Err(e),
        };

        *cursor = cursor.advanced(&record);

        info!(
            sequence = record.sequence,
            action = %record.entry.action,
            actor = %record.entry.actor_id,
            hash = %record.current_hash,
            "audit record appended"
        );

        Ok(record)
    }

    /// A snapshot of the writer's current cursor, for inspection and tests.
    pub fn cursor(&self) -> LedgerResult<ChainCursor> {
        self.cursor
            .lock()
            .map(|c| c.clone())
            .map_err(|e| LedgerError::Persistence {
                reason: format!("ledger cursor lock poisoned: {}", e),
            })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
