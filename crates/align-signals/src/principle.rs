//! The five ALIGN principles.
//!
//! Every score, weight, signal and conflict in the workspace is keyed by a
//! [`PrincipleKey`]. The set is closed: there are exactly five principles and
//! [`PrincipleKey::ALL`] lists them in canonical order.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::models::CategoryError;

/// One of the five ALIGN principles.
///
/// | Key | Concern |
/// |-----|---------|
/// | `Awareness` | Consequences for others and for the wider situation |
/// | `Learning` | Growth, self-reliance and personal responsibility |
/// | `Integrity` | Honesty, fairness and freedom from manipulation |
/// | `Governance` | Control over data, rules and legitimate oversight |
/// | `Nurturing` | Care for wellbeing, protection from harm and dependency |
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrincipleKey {
    Awareness,
    Learning,
    Integrity,
    Governance,
    Nurturing,
}

impl PrincipleKey {
    /// All principles in canonical ALIGN order.
    pub const ALL: [PrincipleKey; 5] = [
        PrincipleKey::Awareness,
        PrincipleKey::Learning,
        PrincipleKey::Integrity,
        PrincipleKey::Governance,
        PrincipleKey::Nurturing,
    ];

    /// Lower-case name, as used in weight maps and JSON.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Awareness => "awareness",
            Self::Learning => "learning",
            Self::Integrity => "integrity",
            Self::Governance => "governance",
            Self::Nurturing => "nurturing",
        }
    }

    /// Position in [`PrincipleKey::ALL`].
    pub const fn index(&self) -> usize {
        match self {
            Self::Awareness => 0,
            Self::Learning => 1,
            Self::Integrity => 2,
            Self::Governance => 3,
            Self::Nurturing => 4,
        }
    }
}

impl fmt::Display for PrincipleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PrincipleKey {
    type Err = CategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        PrincipleKey::ALL
            .into_iter()
            .find(|p| p.as_str() == normalized)
            .ok_or_else(|| CategoryError::UnknownPrinciple(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_matches_canonical_order() {
        for (i, p) in PrincipleKey::ALL.iter().enumerate() {
            assert_eq!(p.index(), i);
        }
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("Integrity".parse::<PrincipleKey>().unwrap(), PrincipleKey::Integrity);
        assert_eq!(" nurturing ".parse::<PrincipleKey>().unwrap(), PrincipleKey::Nurturing);
    }

    #[test]
    fn test_parse_unknown_rejected() {
        let err = "honesty".parse::<PrincipleKey>().unwrap_err();
        assert!(matches!(err, CategoryError::UnknownPrinciple(ref s) if s == "honesty"));
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&PrincipleKey::Governance).unwrap();
        assert_eq!(json, "\"governance\"");
        let parsed: PrincipleKey = serde_json::from_str("\"learning\"").unwrap();
        assert_eq!(parsed, PrincipleKey::Learning);
    }
}
