//! The audit entry and its builder.
//!
//! `AuditEntry` is one logged action before chaining: it carries everything
//! the platform knows about what happened, but no sequence number and no
//! hashes.  The Chain Builder in `custodia-chain` turns it into an
//! `AuditRecord`.  Entries are created once, at the moment the action
//! occurs, and never mutated afterward.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    action::{ActionKind, Severity},
    error::{LedgerError, LedgerResult},
};

/// One logged action, not yet linked into the chain.
///
/// Field order matters: the canonical JSON of this struct is the first
/// component of the bytes fed to the chain hash, so reordering or renaming
/// fields invalidates every existing chain.  The `details` map is a
/// `BTreeMap` so its keys always serialize in sorted order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Unique entry id (UUID v4).
    pub id: String,
    /// Wall-clock time (UTC) the action occurred.
    pub timestamp: DateTime<Utc>,
    /// What kind of action was performed.
    pub action: ActionKind,
    /// How serious the action is.
    pub severity: Severity,
    /// Who performed the action.
    pub actor_id: String,
    /// The actor's role at the time, when known.
    pub actor_role: Option<String>,
    /// The affected resource, e.g. `"trip/2024-031"`.
    pub resource: Option<String>,
    /// Structured context for the action, keys in sorted order.
    pub details: BTreeMap<String, serde_json::Value>,
    /// Whether the action succeeded.
    pub success: bool,
    /// Why the action failed, when it did.
    pub error_message: Option<String>,
}

/// Builder for `AuditEntry`.
///
/// Defaults: severity `Info`, success `true`.  `build()` generates the id
/// and timestamp; `build_at()` takes an explicit timestamp so tests can
/// construct byte-reproducible entries.
///
/// ```rust,ignore
/// let entry = EntryBuilder::new(ActionKind::ResourceUpdate, "user-7")
///     .resource("trip/2024-031")
///     .detail("field", "distance_km")
///     .build()?;
/// ```
#[derive(Debug, Clone)]
pub struct EntryBuilder {
    action: ActionKind,
    actor_id: String,
    severity: Severity,
    actor_role: Option<String>,
    resource: Option<String>,
    details: BTreeMap<String, serde_json::Value>,
    success: bool,
    error_message: Option<String>,
}

impl EntryBuilder {
    /// Start an entry for `action` performed by `actor_id`.
    pub fn new(action: ActionKind, actor_id: impl Into<String>) -> Self {
        Self {
            action,
            actor_id: actor_id.into(),
            severity: Severity::Info,
            actor_role: None,
            resource: None,
            details: BTreeMap::new(),
            success: true,
            error_message: None,
        }
    }

    /// Override the default `Info` severity.
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Record the actor's role.
    pub fn actor_role(mut self, role: impl Into<String>) -> Self {
        self.actor_role = Some(role.into());
        self
    }

    /// Name the affected resource.
    pub fn resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = Some(resource.into());
        self
    }

    /// Attach one detail key-value pair.  Re-using a key replaces the value.
    pub fn detail(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }

    /// Mark the action as failed with an explanation.
    pub fn failed(mut self, error_message: impl Into<String>) -> Self {
        self.success = false;
        self.error_message = Some(error_message.into());
        self
    }

    /// Finish the entry with a fresh UUID and the current UTC time.
    ///
    /// Rejects an empty or whitespace-only actor id with
    /// `LedgerError::Validation` — an unattributable action must never
    /// enter the chain.
    pub fn build(self) -> LedgerResult<AuditEntry> {
        self.build_at(Utc::now())
    }

    /// Finish the entry with a caller-supplied timestamp.
    ///
    /// Used by tests that need deterministic hash inputs; production code
    /// calls `build()`.
    pub fn build_at(self, timestamp: DateTime<Utc>) -> LedgerResult<AuditEntry> {
        if self.actor_id.trim().is_empty() {
            return Err(LedgerError::Validation {
                reason: "actor_id must not be empty".to_string(),
            });
        }

        Ok(AuditEntry {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp,
            action: self.action,
            severity: self.severity,
            actor_id: self.actor_id,
            actor_role: self.actor_role,
            resource: self.resource,
            details: self.details,
            success: self.success,
            error_message: self.error_message,
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let entry = EntryBuilder::new(ActionKind::Login, "user-1")
            .build()
            .unwrap();

        assert_eq!(entry.action, ActionKind::Login);
        assert_eq!(entry.actor_id, "user-1");
        assert_eq!(entry.severity, Severity::Info);
        assert!(entry.success);
        assert!(entry.error_message.is_none());
        assert!(entry.details.is_empty());
    }

    #[test]
    fn test_builder_options() {
        let entry = EntryBuilder::new(ActionKind::ResourceUpdate, "user-2")
            .severity(Severity::Warning)
            .actor_role("manager")
            .resource("trip/2024-031")
            .detail("field", "distance_km")
            .detail("old", 120)
            .detail("new", 180)
            .build()
            .unwrap();

        assert_eq!(entry.severity, Severity::Warning);
        assert_eq!(entry.actor_role.as_deref(), Some("manager"));
        assert_eq!(entry.resource.as_deref(), Some("trip/2024-031"));
        assert_eq!(entry.details.len(), 3);
    }

    #[test]
    fn test_failed_entry() {
        let entry = EntryBuilder::new(ActionKind::LoginFailed, "user-3")
            .severity(Severity::Error)
            .failed("bad password")
            .build()
            .unwrap();

        assert!(!entry.success);
        assert_eq!(entry.error_message.as_deref(), Some("bad password"));
    }

    /// An empty actor id is rejected before anything is constructed.
    #[test]
    fn test_empty_actor_rejected() {
        let err = EntryBuilder::new(ActionKind::Login, "").build().unwrap_err();
        assert!(matches!(err, LedgerError::Validation { .. }));

        let err = EntryBuilder::new(ActionKind::Login, "   ")
            .build()
            .unwrap_err();
        assert!(matches!(err, LedgerError::Validation { .. }));
    }

    /// Two builds produce distinct ids.
    #[test]
    fn test_ids_unique() {
        let a = EntryBuilder::new(ActionKind::Login, "u").build().unwrap();
        let b = EntryBuilder::new(ActionKind::Login, "u").build().unwrap();
        assert_ne!(a.id, b.id);
    }

    /// Detail keys serialize in sorted order regardless of insertion order.
    #[test]
    fn test_details_sorted_serialization() {
        let entry = EntryBuilder::new(ActionKind::ResourceCreate, "u")
            .detail("zulu", 1)
            .detail("alpha", 2)
            .detail("mike", 3)
            .build()
            .unwrap();

        let json = serde_json::to_string(&entry).unwrap();
        let alpha = json.find("\"alpha\"").unwrap();
        let mike = json.find("\"mike\"").unwrap();
        let zulu = json.find("\"zulu\"").unwrap();
        assert!(alpha < mike && mike < zulu);
    }
}
