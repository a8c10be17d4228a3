//! # custodia-contracts
//!
//! Shared data model and error taxonomy for the Custodia audit ledger.
//!
//! All crates in the workspace import from here. No chaining or hashing
//! logic lives in this crate — only data definitions, the entry builder,
//! and error types.

pub mod action;
pub mod entry;
pub mod error;
pub mod record;

pub use action::{ActionKind, Severity};
pub use entry::{AuditEntry, EntryBuilder};
pub use error::{LedgerError, LedgerResult};
pub use record::{AuditRecord, ChainCursor, Checkpoint, GENESIS_HASH};
