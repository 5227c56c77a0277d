//! Moderation status shared by products, vendor applications and ads

use serde::{Deserialize, Serialize};
use std::fmt;

/// Moderation status of a submitted record
///
/// Every moderated collection (product, vendor application, ad) carries
/// this status. Records are created `pending`; a moderation decision moves
/// them to `approved` or `rejected`, both terminal for the record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModerationStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl ModerationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModerationStatus::Pending => "pending",
            ModerationStatus::Approved => "approved",
            ModerationStatus::Rejected => "rejected",
        }
    }

    /// An active record blocks a new submission for the same owning key.
    /// Rejected records do not.
    pub fn is_active(&self) -> bool {
        matches!(self, ModerationStatus::Pending | ModerationStatus::Approved)
    }

    /// Whether a decision has been made
    pub fn is_decided(&self) -> bool {
        !matches!(self, ModerationStatus::Pending)
    }
}

impl fmt::Display for ModerationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_pending() {
        assert_eq!(ModerationStatus::default(), ModerationStatus::Pending);
    }

    #[test]
    fn test_serialize_lowercase() {
        assert_eq!(
            serde_json::to_string(&ModerationStatus::Pending).unwrap(),
            "\"pending\""
        );
        assert_eq!(
            serde_json::to_string(&ModerationStatus::Approved).unwrap(),
            "\"approved\""
        );
        assert_eq!(
            serde_json::to_string(&ModerationStatus::Rejected).unwrap(),
            "\"rejected\""
        );
    }

    #[test]
    fn test_active_and_decided() {
        assert!(ModerationStatus::Pending.is_active());
        assert!(ModerationStatus::Approved.is_active());
        assert!(!ModerationStatus::Rejected.is_active());

        assert!(!ModerationStatus::Pending.is_decided());
        assert!(ModerationStatus::Approved.is_decided());
        assert!(ModerationStatus::Rejected.is_decided());
    }
}
