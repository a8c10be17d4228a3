//! Canonical hashing for chain records.
//!
//! Every field that contributes to a record's hash is listed explicitly so
//! nothing is accidentally omitted, and the byte layout is fixed so two
//! independent implementations compute byte-identical digest input for the
//! same logical record.  This reproducibility is the single most important
//! constraint of the whole ledger: the tamper-evidence property is only as
//! good as the determinism of these bytes.
//!
//! Hash input layout (bytes, in order):
//!   1. canonical JSON of the entry (serde_json, struct declaration order,
//!      `BTreeMap` details in sorted key order, RFC 3339 timestamps)
//!   2. sequence as 8-byte little-endian
//!   3. prev_hash as UTF-8 bytes (64 ASCII hex chars)
//!
//! The digest is SHA-256, fixed for the life of a chain.  Migrating to a
//! different algorithm means starting a new chain from a fresh genesis
//! cursor; the old chain stays frozen and separately verifiable.

use sha2::{Digest, Sha256};

use custodia_contracts::{AuditEntry, AuditRecord};

/// Compute the canonical SHA-256 hash for a record's content.
///
/// The hash commits to every immutable field of the record except
/// `current_hash` itself: the full entry, the record's position in the
/// chain (`sequence`), and its link to the previous record (`prev_hash`).
///
/// Returns a lowercase 64-character hex string.
///
/// # Panics
///
/// Panics if `entry` cannot be serialized to JSON — which cannot happen for
/// the well-formed `AuditEntry` type.
pub fn hash_record_content(entry: &AuditEntry, sequence: u64, prev_hash: &str) -> String {
    // serde_json::to_vec produces canonical, deterministic JSON for the same
    // value: no whitespace, fields in declaration order, map keys sorted.
    let entry_json =
        serde_json::to_vec(entry).expect("AuditEntry must always be serializable to JSON");

    let mut hasher = Sha256::new();
    hasher.update(&entry_json);
    hasher.update(sequence.to_le_bytes());
    hasher.update(prev_hash.as_bytes());

    hex::encode(hasher.finalize())
}

/// Recompute the expected `current_hash` of a sealed record from its own
/// stored fields.
pub fn recompute_hash(record: &AuditRecord) -> String {
    hash_record_content(&record.entry, record.sequence, &record.prev_hash)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use custodia_contracts::{ActionKind, EntryBuilder, GENESIS_HASH};

    use super::*;

    fn fixed_entry() -> AuditEntry {
        let ts = Utc.with_ymd_and_hms(2026, 3, 14, 9, 26, 53).unwrap();
        EntryBuilder::new(ActionKind::ResourceCreate, "user-1")
            .resource("trip/88")
            .detail("distance_km", 42)
            .build_at(ts)
            .unwrap()
    }

    /// Same inputs, same hash — the reproducibility contract.
    #[test]
    fn test_hash_deterministic() {
        let entry = fixed_entry();
        let a = hash_record_content(&entry, 1, GENESIS_HASH);
        let b = hash_record_content(&entry, 1, GENESIS_HASH);
        assert_eq!(a, b);
    }

    /// Lowercase hex, 64 characters, for a 256-bit digest.
    #[test]
    fn test_hash_shape() {
        let hash = hash_record_content(&fixed_entry(), 1, GENESIS_HASH);
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    /// Every hashed component changes the digest.
    #[test]
    fn test_hash_commits_to_all_inputs() {
        let entry = fixed_entry();
        let base = hash_record_content(&entry, 1, GENESIS_HASH);

        // Different sequence.
        assert_ne!(base, hash_record_content(&entry, 2, GENESIS_HASH));

        // Different prev_hash.
        let other_prev = "ab".repeat(32);
        assert_ne!(base, hash_record_content(&entry, 1, &other_prev));

        // Different entry content.
        let mut edited = entry.clone();
        edited.details.insert("distance_km".into(), 43.into());
        assert_ne!(base, hash_record_content(&edited, 1, GENESIS_HASH));
    }

    #[test]
    fn test_recompute_matches_content_hash() {
        let entry = fixed_entry();
        let current_hash = hash_record_content(&entry, 1, GENESIS_HASH);
        let record = AuditRecord {
            entry,
            sequence: 1,
            prev_hash: GENESIS_HASH.to_string(),
            current_hash: current_hash.clone(),
        };
        assert_eq!(recompute_hash(&record), current_hash);
    }
}
