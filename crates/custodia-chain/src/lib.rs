//! # custodia-chain
//!
//! Immutable, append-only, SHA-256 hash-chained audit ledger core.
//!
//! ## Overview
//!
//! Every sensitive action the platform records is sealed into an
//! `AuditRecord` that links to the previous record via its SHA-256 hash.
//! Tampering with any record — even a single byte — breaks the chain and
//! is detected by `verify_chain`.
//!
//! The crate is split along the ledger's component seams:
//!
//! - [`chain`] — the pure Chain Builder (`seal_record`) and the
//!   single-writer `LedgerWriter`
//! - [`hash`] — the canonical digest every other component agrees on
//! - [`store`] — the append-only persistence seam and its in-memory
//!   reference implementation
//! - [`verify`] — structural verification as a `ChainReport`
//! - [`tamper`] — verifier faults grouped per suspect record
//! - [`checkpoint`] — hashed anchors for fast partial re-verification
//! - [`export`] — the JSON bundle downstream tools consume
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use custodia_chain::{InMemoryRecordStore, LedgerWriter, verify_chain};
//! use custodia_contracts::{ActionKind, EntryBuilder};
//!
//! let store = Arc::new(InMemoryRecordStore::new());
//! let writer = LedgerWriter::new(store.clone())?;
//!
//! let entry = EntryBuilder::new(ActionKind::ResourceCreate, "user-7")
//!     .resource("trip/2024-031")
//!     .build()?;
//! writer.append(entry)?;
//!
//! assert!(verify_chain(&store.read_all()?).is_valid);
//! ```

pub mod chain;
pub mod checkpoint;
pub mod export;
pub mod hash;
pub mod store;
pub mod tamper;
pub mod verify;

pub use chain::{seal_record, LedgerWriter};
pub use checkpoint::{
    checkpoint_hash, verify_checkpoint, verify_from_checkpoint, verify_since_latest,
    CheckpointService,
};
pub use export::{export_chain, export_chain_at, ExportBundle, ExportMetadata};
pub use hash::{hash_record_content, recompute_hash};
pub use store::{InMemoryRecordStore, RecordStore};
pub use tamper::{detect_tampering, SuspiciousRecord, TamperReport};
pub use verify::{chain_faults, verify_chain, ChainFault, ChainReport};

// ── Tests ─────────────────────────────────────────────────────────────────────
