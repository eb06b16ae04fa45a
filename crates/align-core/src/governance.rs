//! Governance hooks.
//!
//! A [`GovernanceSink`] reviews finished decision records and decides
//! whether the host may deliver the response. The engine itself never
//! calls a sink; hosts do, after [`Engine::decide`](crate::Engine::decide).

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::record::{DecisionRecord, ResponseTone};

/// Role of the user behind a request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Regular user.
    #[default]
    User,
    /// Content moderator.
    Moderator,
    /// Administrator.
    Admin,
    /// Automated system caller.
    System,
}

impl UserRole {
    /// Priority used to order roles. Higher wins.
    pub fn priority(&self) -> u8 {
        match self {
            Self::User => 1,
            Self::Moderator => 2,
            Self::Admin => 3,
            Self::System => 4,
        }
    }

    /// Returns true if the role may override a refusal.
    pub fn can_override(&self) -> bool {
        self.priority() >= Self::Admin.priority()
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "user" => Ok(Self::User),
            "moderator" => Ok(Self::Moderator),
            "admin" => Ok(Self::Admin),
            "system" => Ok(Self::System),
            other => Err(format!("unknown role '{other}'")),
        }
    }
}

/// What governance decided about a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum Intervention {
    /// Deliver as is.
    Pass,
    /// Deliver, but flag.
    Warn {
        /// Why the record was flagged.
        reason: String,
    },
    /// A refusal was overridden by a privileged role.
    Override {
        /// What was overridden.
        reason: String,
    },
    /// Do not deliver.
    Block {
        /// Why the record was blocked.
        reason: String,
    },
}

impl Intervention {
    /// Returns true for `Pass`.
    pub fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }

    /// Returns true for `Warn`.
    pub fn is_warn(&self) -> bool {
        matches!(self, Self::Warn { .. })
    }

    /// Returns true for `Override`.
    pub fn is_override(&self) -> bool {
        matches!(self, Self::Override { .. })
    }

    /// Returns true for `Block`.
    pub fn is_block(&self) -> bool {
        matches!(self, Self::Block { .. })
    }
}

impl fmt::Display for Intervention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pass => write!(f, "PASS"),
            Self::Warn { reason } => write!(f, "WARN: {}", reason),
            Self::Override { reason } => write!(f, "OVERRIDE: {}", reason),
            Self::Block { reason } => write!(f, "BLOCK: {}", reason),
        }
    }
}

/// Reviews decision records.
///
/// # Implementors
///
/// - [`BasicGovernance`]: tone and risk based policy
pub trait GovernanceSink: Send + Sync {
    /// Returns the name of this sink.
    fn name(&self) -> &str;

    /// Reviews one record on behalf of a user with `role`.
    fn review(&self, record: &DecisionRecord, role: UserRole) -> Intervention;
}

/// Default policy.
///
/// | Record | Intervention |
/// |--------|--------------|
/// | fallback | Warn |
/// | refusal | Block, or Override for admin and system roles |
/// | cautious, or an alternative is required | Warn |
/// | anything else | Pass |
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicGovernance;

impl BasicGovernance {
    /// Creates the policy.
    pub fn new() -> Self {
        Self
    }
}

impl GovernanceSink for BasicGovernance {
    fn name(&self) -> &str {
        "basic"
    }

    fn review(&self, record: &DecisionRecord, role: UserRole) -> Intervention {
        let intervention = if record.fallback {
            Intervention::Warn {
                reason: "decision fell back to a generic response".to_string(),
            }
        } else if record.tone == ResponseTone::Refusal {
            let violated = record
                .violations
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            if role.can_override() {
                Intervention::Override {
                    reason: format!("refusal over [{}] overridden by {:?}", violated, role),
                }
            } else {
                Intervention::Block {
                    reason: format!("refused: violates [{}]", violated),
                }
            }
        } else if record.tone == ResponseTone::Cautious || record.requires_alternative() {
            Intervention::Warn {
                reason: "response touches ethical concerns".to_string(),
            }
        } else {
            Intervention::Pass
        };

        debug!(id = %record.id, ?role, %intervention, "governance review");
        intervention
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use align_ethics::PathKind;
    use align_signals::PrincipleKey;

    fn record(tone: ResponseTone) -> DecisionRecord {
        DecisionRecord::new(PathKind::Deep, 0.8, "r".into(), tone)
    }

    #[test]
    fn test_role_priority() {
        assert!(UserRole::System.priority() > UserRole::Admin.priority());
        assert!(UserRole::Admin.can_override());
        assert!(!UserRole::Moderator.can_override());
        assert_eq!("Admin".parse::<UserRole>(), Ok(UserRole::Admin));
        assert!("root".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_normal_passes() {
        let gov = BasicGovernance::new();
        assert!(gov.review(&record(ResponseTone::Normal), UserRole::User).is_pass());
    }

    #[test]
    fn test_refusal_blocks_users() {
        let gov = BasicGovernance::new();
        let mut refused = record(ResponseTone::Refusal);
        refused.violations = vec![PrincipleKey::Integrity];

        let blocked = gov.review(&refused, UserRole::Moderator);
        assert!(blocked.is_block());
        assert!(blocked.to_string().contains("integrity"));

        assert!(gov.review(&refused, UserRole::Admin).is_override());
        assert!(gov.review(&refused, UserRole::System).is_override());
    }

    #[test]
    fn test_cautious_and_fallback_warn() {
        let gov = BasicGovernance::new();
        assert!(gov.review(&record(ResponseTone::Cautious), UserRole::User).is_warn());

        let mut fallback = record(ResponseTone::Refusal);
        fallback.fallback = true;
        assert!(gov.review(&fallback, UserRole::User).is_warn());
    }

    #[test]
    fn test_intervention_serialization() {
        let json = serde_json::to_value(Intervention::Block { reason: "x".into() }).unwrap();
        assert_eq!(json["action"], "block");
        assert_eq!(json["reason"], "x");
    }
}
