//! Gift-code lifecycle state machine.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Validity period applied at activation when no product is linked.
pub const DEFAULT_VALID_DAYS: i64 = 180;

/// Lifecycle status of a gift code.
///
/// Wire/storage format: snake_case string. The happy path is
/// `Unassigned → Linked → Active → Used → Shipped → Completed`;
/// `Expired` is entered lazily from `Active` when the validity window
/// has passed, and `Banned` is an administrator-only terminal exit
/// reachable from any non-terminal status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CodeStatus {
    Unassigned,
    Linked,
    Active,
    Used,
    Shipped,
    Completed,
    Expired,
    Banned,
}

impl CodeStatus {
    /// Storage string, matching the `codes.status` column.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unassigned => "unassigned",
            Self::Linked => "linked",
            Self::Active => "active",
            Self::Used => "used",
            Self::Shipped => "shipped",
            Self::Completed => "completed",
            Self::Expired => "expired",
            Self::Banned => "banned",
        }
    }

    /// Parse a storage string. Returns `None` for unknown values.
    pub fn from_str_opt(s: &str) -> Option<Self> {
        match s {
            "unassigned" => Some(Self::Unassigned),
            "linked" => Some(Self::Linked),
            "active" => Some(Self::Active),
            "used" => Some(Self::Used),
            "shipped" => Some(Self::Shipped),
            "completed" => Some(Self::Completed),
            "expired" => Some(Self::Expired),
            "banned" => Some(Self::Banned),
            _ => None,
        }
    }

    /// Terminal statuses admit no further transition, not even a ban.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Expired | Self::Banned)
    }

    /// Whether the state machine allows `self → to`.
    ///
    /// This is the full edge set, including the lazy `Active → Expired`
    /// exit and the administrator `→ Banned` exit. Callers enforce actor
    /// and ownership preconditions on top of this.
    pub fn can_transition_to(self, to: CodeStatus) -> bool {
        use CodeStatus::*;
        match (self, to) {
            (Unassigned, Linked) => true,
            // A shop may activate straight from unassigned in one step.
            (Unassigned, Active) => true,
            (Linked, Active) => true,
            (Active, Used) => true,
            (Active, Expired) => true,
            (Used, Shipped) => true,
            (Shipped, Completed) => true,
            (from, Banned) => !from.is_terminal(),
            _ => false,
        }
    }
}

/// Compute the expiry instant for a code activated at `activated_at`.
pub fn expires_at(activated_at: DateTime<Utc>, valid_days: i64) -> DateTime<Utc> {
    activated_at + Duration::days(valid_days)
}

/// Expiry evaluator: true iff an `Active` code's window has passed.
///
/// Pure; the caller is responsible for the best-effort conditional write
/// that actually flips the stored status.
pub fn is_expired(status: CodeStatus, expires_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    status == CodeStatus::Active && expires_at.is_some_and(|at| now > at)
}
