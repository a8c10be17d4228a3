//! Error types for the Custodia audit ledger.
//!
//! All fallible operations in the ledger return `LedgerResult<T>`.  Note the
//! deliberate boundary: a chain that fails integrity checks is NOT an error —
//! the verifier reports that as data (`ChainReport`) so auditing tools can
//! render it without crashing.  `LedgerError` covers caller contract
//! violations and collaborator failures only.

use thiserror::Error;

/// The unified error type for the Custodia ledger.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// An entry was rejected before it could enter the chain (empty actor id,
    /// malformed field).  Fails fast at the boundary; nothing is appended.
    #[error("entry validation failed: {reason}")]
    Validation { reason: String },

    /// An action name outside the closed taxonomy was supplied.
    #[error("unknown action kind '{value}'")]
    UnknownAction { value: String },

    /// The persistence collaborator failed to append or read.
    ///
    /// The triggering append must be treated as failed and retried by its
    /// caller; the ledger never attempts to repair a partial write.
    #[error("persistence failure: {reason}")]
    Persistence { reason: String },

    /// An append was rejected because the store's tail moved underneath the
    /// writer.  The writer must refresh its cursor and retry with freshly
    /// computed sequence and previous hash, never with stale values.
    #[error("concurrent append conflict: expected tail sequence {expected}, store at {found}")]
    ConcurrencyViolation { expected: u64, found: u64 },

    /// A new checkpoint would cover fewer records than the previous one.
    /// Record count and last sequence must never regress.
    #[error("checkpoint regression: {field} went from {previous} to {current}")]
    CheckpointRegression {
        field: &'static str,
        previous: u64,
        current: u64,
    },
}

/// Convenience alias used throughout the Custodia crates.
pub type LedgerResult<T> = Result<T, LedgerError>;
