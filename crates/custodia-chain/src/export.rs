//! The export bundle: the chain plus its verification verdict, in the
//! JSON shape downstream reporting tools and archival jobs consume.
//!
//! Keys are camelCase on the wire.  The `records` field is the input
//! verbatim and `verification` equals calling `verify_chain` on the same
//! records directly — consumers can re-derive everything in the metadata
//! from the records themselves, which is the point: the bundle carries no
//! claims that cannot be re-checked.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use custodia_contracts::AuditRecord;

use crate::verify::{verify_chain, ChainReport};

/// Summary header of an export bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportMetadata {
    /// When the bundle was produced (UTC).
    pub export_date: DateTime<Utc>,
    /// Number of records in the bundle.
    pub total_records: usize,
    /// Entry id of the first record, empty for an empty chain.
    pub first_record_id: String,
    /// Entry id of the last record, empty for an empty chain.
    pub last_record_id: String,
    /// Whether the chain verified at export time.
    pub chain_valid: bool,
}

/// A self-contained, JSON-serializable export of a chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportBundle {
    pub metadata: ExportMetadata,
    /// The exported records, identical to the input.
    pub records: Vec<AuditRecord>,
    /// The verifier's verdict on `records`.
    pub verification: ChainReport,
}

/// Build an export bundle over `records` at a caller-supplied export date.
///
/// Deterministic given the records and date, so archival jobs can produce
/// reproducible bundles.
pub fn export_chain_at(records: &[AuditRecord], export_date: DateTime<Utc>) -> ExportBundle {
    let verification = verify_chain(records);

    ExportBundle {
        metadata: ExportMetadata {
            export_date,
            total_records: records.len(),
            first_record_id: records
                .first()
                .map(|r| r.entry.id.clone())
                .unwrap_or_default(),
            last_record_id: records
                .last()
                .map(|r| r.entry.id.clone())
                .unwrap_or_default(),
            chain_valid: verification.is_valid,
        },
        records: records.to_vec(),
        verification,
    }
}

/// Build an export bundle dated now.
pub fn export_chain(records: &[AuditRecord]) -> ExportBundle {
    export_chain_at(records, Utc::now())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
