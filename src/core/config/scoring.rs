//! Scoring configuration types.
//!
//! This module contains the knobs that change how per-attribute weights are
//! derived before aggregation.

use serde::{Deserialize, Serialize};

/// Scoring configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScoringConfig {
    /// Down-weight each attribute by its number of possible values
    #[serde(default = "ScoringConfig::default_normalized")]
    pub normalized: bool,
}

/// Default implementation for [`ScoringConfig`].
impl Default for ScoringConfig {
    /// Returns default scoring configuration with normalization enabled.
    fn default() -> Self {
        Self {
            normalized: Self::default_normalized(),
        }
    }
}

impl ScoringConfig {
    const fn default_normalized() -> bool {
        true
    }
}
