//! The closed action taxonomy and severity levels.
//!
//! Every audit entry names exactly one `ActionKind`.  The taxonomy is a
//! closed enum on purpose: an action name outside it is a caller programming
//! error and is rejected at parse time, never silently defaulted.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

/// The kind of sensitive action being recorded.
///
/// Wire names are kebab-case (`resource-create`, `login-failed`, …) and are
/// stable: they participate in the canonical bytes that get hashed, so a
/// rename would invalidate every existing chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActionKind {
    /// A managed record was created.
    ResourceCreate,
    /// A managed record was modified.
    ResourceUpdate,
    /// A managed record was deleted (a retention event, not a ledger one).
    ResourceDelete,
    /// A managed record was approved or signed off.
    ResourceApprove,
    /// A managed record was exported outside the platform.
    ResourceExport,
    /// A user authenticated successfully.
    Login,
    /// A user session ended.
    Logout,
    /// An authentication attempt failed.
    LoginFailed,
    /// A user's permissions were changed.
    PermissionChange,
    /// A security-relevant anomaly was flagged.
    SecurityAlert,
}

impl ActionKind {
    /// The stable wire name for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::ResourceCreate => "resource-create",
            ActionKind::ResourceUpdate => "resource-update",
            ActionKind::ResourceDelete => "resource-delete",
            ActionKind::ResourceApprove => "resource-approve",
            ActionKind::ResourceExport => "resource-export",
            ActionKind::Login => "login",
            ActionKind::Logout => "logout",
            ActionKind::LoginFailed => "login-failed",
            ActionKind::PermissionChange => "permission-change",
            ActionKind::SecurityAlert => "security-alert",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionKind {
    type Err = LedgerError;

    /// Parse a wire name, failing fast on anything outside the taxonomy.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "resource-create" => Ok(ActionKind::ResourceCreate),
            "resource-update" => Ok(ActionKind::ResourceUpdate),
            "resource-delete" => Ok(ActionKind::ResourceDelete),
            "resource-approve" => Ok(ActionKind::ResourceApprove),
            "resource-export" => Ok(ActionKind::ResourceExport),
            "login" => Ok(ActionKind::Login),
            "logout" => Ok(ActionKind::Logout),
            "login-failed" => Ok(ActionKind::LoginFailed),
            "permission-change" => Ok(ActionKind::PermissionChange),
            "security-alert" => Ok(ActionKind::SecurityAlert),
            other => Err(LedgerError::UnknownAction {
                value: other.to_string(),
            }),
        }
    }
}

/// How serious the recorded action is.
///
/// Ordered so reports and filters can compare levels (`Info < Warning <
/// Error < Critical`).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    /// Routine activity.
    #[default]
    Info,
    /// Unusual but not harmful.
    Warning,
    /// A failed or rejected action.
    Error,
    /// Requires immediate auditor attention.
    Critical,
}

impl Severity {
    /// The stable wire name for this level.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
            Severity::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    /// Every kind round-trips through its wire name.
    #[test]
    fn test_action_kind_roundtrip() {
        let kinds = [
            ActionKind::ResourceCreate,
            ActionKind::ResourceUpdate,
            ActionKind::ResourceDelete,
            ActionKind::ResourceApprove,
            ActionKind::ResourceExport,
            ActionKind::Login,
            ActionKind::Logout,
            ActionKind::LoginFailed,
            ActionKind::PermissionChange,
            ActionKind::SecurityAlert,
        ];
        for kind in kinds {
            let parsed: ActionKind = kind.as_str().parse().unwrap();
            assert_eq!(parsed, kind);
        }
    }

    /// An unrecognized name is a hard error, not a default.
    #[test]
    fn test_unknown_action_rejected() {
        let err = "record-create".parse::<ActionKind>().unwrap_err();
        assert!(matches!(
            err,
            LedgerError::UnknownAction { value } if value == "record-create"
        ));
    }

    /// Serde uses the same kebab-case names as `as_str`.
    #[test]
    fn test_action_kind_serde_names() {
        let json = serde_json::to_string(&ActionKind::LoginFailed).unwrap();
        assert_eq!(json, "\"login-failed\"");
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Info < Severity::Warning);
        assert!(Severity::Error < Severity::Critical);
        assert_eq!(Severity::default(), Severity::Info);
    }

    #[test]
    fn test_severity_serde_names() {
        let json = serde_json::to_string(&Severity::Critical).unwrap();
        assert_eq!(json, "\"CRITICAL\"");
    }
}
