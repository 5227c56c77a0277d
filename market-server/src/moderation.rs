//! Moderation decision engine
//!
//! One state machine shared by the three moderated collections (products,
//! vendor applications, ads). Records are created `pending`; a decision
//! moves them to `approved` or `rejected`. Repeating the decision a record
//! already carries is a no-op so side effects (role promotion,
//! notifications) never run twice; the opposite decision on a decided
//! record is a conflict. Re-opening a decided record is not supported — a
//! fresh submission creates a new record.

use serde::{Deserialize, Serialize};
use shared::ModerationStatus;
use std::fmt;

/// A moderation decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Approve,
    Reject,
}

impl Decision {
    /// The status this decision drives a pending record to
    pub fn target(&self) -> ModerationStatus {
        match self {
            Decision::Approve => ModerationStatus::Approved,
            Decision::Reject => ModerationStatus::Rejected,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Approve => "approve",
            Decision::Reject => "reject",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of applying a decision to a record's current status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Pending record, decision applies: persist the new status and run
    /// the entity's side effect
    Applied(ModerationStatus),
    /// Record already carries the decided status: return it unchanged,
    /// do not re-run side effects
    NoOp(ModerationStatus),
    /// Record was decided the other way: refuse
    Conflict(ModerationStatus),
}

/// Apply a decision to the current moderation status.
///
/// Pure transition logic; persistence and side effects are the caller's
/// concern and must only happen for [`Transition::Applied`].
pub fn apply_decision(current: ModerationStatus, decision: Decision) -> Transition {
    let target = decision.target();
    match current {
        ModerationStatus::Pending => Transition::Applied(target),
        decided if decided == target => Transition::NoOp(decided),
        decided => Transition::Conflict(decided),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_can_be_approved_or_rejected() {
        assert_eq!(
            apply_decision(ModerationStatus::Pending, Decision::Approve),
            Transition::Applied(ModerationStatus::Approved)
        );
        assert_eq!(
            apply_decision(ModerationStatus::Pending, Decision::Reject),
            Transition::Applied(ModerationStatus::Rejected)
        );
    }

    #[test]
    fn test_repeated_decision_is_noop() {
        assert_eq!(
            apply_decision(ModerationStatus::Approved, Decision::Approve),
            Transition::NoOp(ModerationStatus::Approved)
        );
        assert_eq!(
            apply_decision(ModerationStatus::Rejected, Decision::Reject),
            Transition::NoOp(ModerationStatus::Rejected)
        );
    }

    #[test]
    fn test_cross_decision_is_conflict() {
        assert_eq!(
            apply_decision(ModerationStatus::Approved, Decision::Reject),
            Transition::Conflict(ModerationStatus::Approved)
        );
        assert_eq!(
            apply_decision(ModerationStatus::Rejected, Decision::Approve),
            Transition::Conflict(ModerationStatus::Rejected)
        );
    }

    #[test]
    fn test_decision_serde() {
        let d: Decision = serde_json::from_str("\"approve\"").unwrap();
        assert_eq!(d, Decision::Approve);
        assert_eq!(serde_json::to_string(&Decision::Reject).unwrap(), "\"reject\"");
    }

    #[test]
    fn test_decision_targets() {
        assert_eq!(Decision::Approve.target(), ModerationStatus::Approved);
        assert_eq!(Decision::Reject.target(), ModerationStatus::Rejected);
    }
}
