//! Attribute-probability rarity scoring.
//!
//! This module provides:
//! - Null-attribute derivation (absence as a scored value)
//! - Per-token attribute probabilities and weights
//! - Weighted geometric-mean aggregation into a single score

pub mod attributes;
pub mod geometric_mean;
pub mod null_attributes;

use serde::{Deserialize, Serialize};

use crate::core::errors::Result;
use crate::core::model::{AttributeName, Collection, Token};

// Re-export main types
pub use attributes::{token_attribute_scores, AttributeScores};
pub use geometric_mean::{weighted_geometric_mean, GeometricMeanScoringHandler};
pub use null_attributes::{extract_null_attributes, NullAttributeMap};

/// Score of one token plus the attribute probabilities that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenScore {
    /// Attribute probabilities, aligned with `attribute_names`
    pub attribute_scores: Vec<f64>,
    /// Attribute names in sorted order
    pub attribute_names: Vec<AttributeName>,
    /// Aggregated rarity score in (0, 1]; lower is rarer
    pub score: f64,
}

/// Scores of a batch, each sequence aligned with the input token order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchScores {
    /// Attribute probabilities per token
    pub attribute_scores: Vec<Vec<f64>>,
    /// Attribute names per token
    pub attribute_names: Vec<Vec<AttributeName>>,
    /// Aggregated score per token
    pub scores: Vec<f64>,
}

impl BatchScores {
    /// Number of tokens in the batch
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    /// True for an empty batch
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Reassemble the per-token view of entry `index`
    pub fn get(&self, index: usize) -> Option<TokenScore> {
        Some(TokenScore {
            attribute_scores: self.attribute_scores.get(index)?.clone(),
            attribute_names: self.attribute_names.get(index)?.clone(),
            score: *self.scores.get(index)?,
        })
    }
}

impl FromIterator<TokenScore> for BatchScores {
    fn from_iter<I: IntoIterator<Item = TokenScore>>(iter: I) -> Self {
        let mut batch = Self::default();
        for token_score in iter {
            batch.attribute_scores.push(token_score.attribute_scores);
            batch.attribute_names.push(token_score.attribute_names);
            batch.scores.push(token_score.score);
        }
        batch
    }
}

/// A rarity scoring strategy.
///
/// Implementations are pure: they read the collection and tokens and hold no
/// state between calls, so one handler can score from many threads at once.
pub trait ScoringHandler: Send + Sync {
    /// Short identifier reported alongside scores
    fn name(&self) -> &'static str;

    /// Whether attribute weights depend on each attribute's number of values
    fn normalized(&self) -> bool;

    /// Score a single token against its collection
    fn score_token(&self, collection: &Collection, token: &Token) -> Result<TokenScore>;

    /// Score a batch; the returned sequences follow the order of `tokens`
    fn score_tokens(&self, collection: &Collection, tokens: &[Token]) -> Result<BatchScores>;
}
