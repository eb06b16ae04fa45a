//! Weight profiles.
//!
//! A [`WeightProfile`] assigns a non-negative weight to each of the five
//! principles. Profiles are only ever constructed through validation, so a
//! value of this type always has exactly five finite, non-negative weights.
//!
//! ## Presets
//!
//! | Preset | awareness | learning | integrity | governance | nurturing |
//! |--------|-----------|----------|-----------|------------|-----------|
//! | `default` | 1.0 | 1.0 | 1.0 | 1.0 | 1.0 |
//! | `conservative` | 1.2 | 0.8 | 1.3 | 1.2 | 1.1 |
//! | `supportive` | 0.9 | 1.2 | 1.0 | 0.8 | 1.3 |
//! | `strict` | 1.1 | 0.7 | 1.5 | 1.4 | 0.8 |

use std::collections::BTreeMap;

use align_signals::PrincipleKey;
use serde::{Deserialize, Serialize};

use crate::error::EthicsError;
use crate::Result;

/// Names accepted by [`WeightProfile::preset`].
pub const PRESET_NAMES: [&str; 4] = ["default", "conservative", "supportive", "strict"];

/// Validated principle weights.
///
/// Serializes as a plain `{"awareness": 1.0, ...}` map and deserializes
/// through the same validation as [`WeightProfile::from_named`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, f64>", into = "BTreeMap<String, f64>")]
pub struct WeightProfile {
    weights: [f64; 5],
}

impl Default for WeightProfile {
    fn default() -> Self {
        Self { weights: [1.0; 5] }
    }
}

impl WeightProfile {
    /// Builds a profile from weights in ALIGN order.
    pub fn from_weights(weights: [f64; 5]) -> Result<Self> {
        for (principle, weight) in PrincipleKey::ALL.into_iter().zip(weights) {
            check_weight(principle, weight)?;
        }
        Ok(Self { weights })
    }

    /// Builds a profile from a name -> weight map.
    ///
    /// Keys are matched case-insensitively. Every principle must be present
    /// exactly once and no other keys are allowed.
    pub fn from_named<K: AsRef<str>>(map: &BTreeMap<K, f64>) -> Result<Self> {
        let mut weights: [Option<f64>; 5] = [None; 5];

        for (key, &weight) in map {
            let principle: PrincipleKey = key
                .as_ref()
                .parse()
                .map_err(|_| EthicsError::UnknownPrinciple(key.as_ref().to_string()))?;
            let slot = &mut weights[principle.index()];
            if slot.is_some() {
                return Err(EthicsError::DuplicatePrinciple(principle));
            }
            check_weight(principle, weight)?;
            *slot = Some(weight);
        }

        let mut resolved = [0.0; 5];
        for principle in PrincipleKey::ALL {
            resolved[principle.index()] = weights[principle.index()]
                .ok_or(EthicsError::MissingPrinciple(principle))?;
        }
        Ok(Self { weights: resolved })
    }

    /// Looks up a named preset.
    pub fn preset(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "default" => Some(Self::default()),
            "conservative" => Some(Self::conservative()),
            "supportive" => Some(Self::supportive()),
            "strict" => Some(Self::strict()),
            _ => None,
        }
    }

    /// Emphasizes integrity, governance and awareness.
    pub fn conservative() -> Self {
        Self { weights: [1.2, 0.8, 1.3, 1.2, 1.1] }
    }

    /// Emphasizes nurturing and learning.
    pub fn supportive() -> Self {
        Self { weights: [0.9, 1.2, 1.0, 0.8, 1.3] }
    }

    /// Strongly emphasizes integrity and governance.
    pub fn strict() -> Self {
        Self { weights: [1.1, 0.7, 1.5, 1.4, 0.8] }
    }

    /// Weight of one principle.
    pub fn weight(&self, principle: PrincipleKey) -> f64 {
        self.weights[principle.index()]
    }

    /// Returns a copy with one weight replaced.
    pub fn with_weight(mut self, principle: PrincipleKey, weight: f64) -> Result<Self> {
        check_weight(principle, weight)?;
        self.weights[principle.index()] = weight;
        Ok(self)
    }

    /// Iterates in ALIGN order.
    pub fn iter(&self) -> impl Iterator<Item = (PrincipleKey, f64)> + '_ {
        PrincipleKey::ALL.into_iter().map(|p| (p, self.weight(p)))
    }

    /// Sum of all weights.
    pub fn total(&self) -> f64 {
        self.weights.iter().sum()
    }

    /// Mean weight of the given principles, `None` if the slice is empty.
    pub fn mean_of(&self, principles: &[PrincipleKey]) -> Option<f64> {
        if principles.is_empty() {
            return None;
        }
        let sum: f64 = principles.iter().map(|p| self.weight(*p)).sum();
        Some(sum / principles.len() as f64)
    }

    /// Euclidean distance between two profiles.
    pub fn distance(&self, other: &WeightProfile) -> f64 {
        self.weights
            .iter()
            .zip(other.weights.iter())
            .map(|(a, b)| (a - b).powi(2))
            .sum::<f64>()
            .sqrt()
    }
}

fn check_weight(principle: PrincipleKey, weight: f64) -> Result<()> {
    if !weight.is_finite() {
        return Err(EthicsError::NonFiniteWeight(principle));
    }
    if weight < 0.0 {
        return Err(EthicsError::NegativeWeight { principle, weight });
    }
    Ok(())
}

impl TryFrom<BTreeMap<String, f64>> for WeightProfile {
    type Error = EthicsError;

    fn try_from(map: BTreeMap<String, f64>) -> Result<Self> {
        Self::from_named(&map)
    }
}

impl From<WeightProfile> for BTreeMap<String, f64> {
    fn from(profile: WeightProfile) -> Self {
        profile
            .iter()
            .map(|(p, w)| (p.as_str().to_string(), w))
            .collect()
    }
}
