//! Weighted geometric-mean aggregation of attribute probabilities.
//!
//! Rarity is multiplicative across attributes: the chance of a token's exact
//! trait combination is the product of its per-attribute probabilities. The
//! weighted geometric mean summarizes that product on the same (0, 1] scale
//! whatever the number of attributes. Lower scores are rarer.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::attributes::token_attribute_scores;
use super::null_attributes::{extract_null_attributes, NullAttributeMap};
use super::{BatchScores, ScoringHandler, TokenScore};
use crate::core::config::{PerformanceConfig, RarityConfig};
use crate::core::errors::{RarityError, Result};
use crate::core::model::{Collection, Token};

/// `exp(Σ wᵢ·ln pᵢ / Σ wᵢ)`, evaluated in log space so that many small
/// probabilities cannot underflow an intermediate product.
pub fn weighted_geometric_mean(probabilities: &[f64], weights: &[f64]) -> Result<f64> {
    if probabilities.len() != weights.len() {
        return Err(RarityError::internal(format!(
            "{} probabilities but {} weights",
            probabilities.len(),
            weights.len()
        )));
    }
    if probabilities.is_empty() {
        return Err(RarityError::math("geometric mean of an empty set is undefined"));
    }

    let mut log_sum = 0.0;
    let mut weight_sum = 0.0;
    for (&probability, &weight) in probabilities.iter().zip(weights) {
        if !(probability.is_finite() && probability > 0.0) {
            return Err(RarityError::math(format!(
                "probability must be finite and positive, got {probability}"
            )));
        }
        if !(weight.is_finite() && weight > 0.0) {
            return Err(RarityError::math(format!(
                "weight must be finite and positive, got {weight}"
            )));
        }
        log_sum += weight * probability.ln();
        weight_sum += weight;
    }

    Ok((log_sum / weight_sum).exp())
}

/// Scores tokens by the weighted geometric mean of their attribute probabilities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeometricMeanScoringHandler {
    normalized: bool,
    performance: PerformanceConfig,
}

/// Normalized, with default batch parallelism.
impl Default for GeometricMeanScoringHandler {
    fn default() -> Self {
        Self::new(true)
    }
}

impl GeometricMeanScoringHandler {
    /// Create a handler; `normalized` down-weights attributes by their number
    /// of possible values
    pub fn new(normalized: bool) -> Self {
        Self {
            normalized,
            performance: PerformanceConfig::default(),
        }
    }

    /// Create a handler from engine configuration
    pub fn from_config(config: &RarityConfig) -> Self {
        Self::new(config.scoring.normalized).with_performance(config.performance.clone())
    }

    /// Replace the batch parallelism settings
    pub fn with_performance(mut self, performance: PerformanceConfig) -> Self {
        self.performance = performance;
        self
    }

    /// Score one token, reusing `null_attributes` when the caller holds it.
    pub fn score_token_with(
        &self,
        collection: &Collection,
        token: &Token,
        null_attributes: Option<&NullAttributeMap>,
    ) -> Result<TokenScore> {
        let scores = token_attribute_scores(collection, token, self.normalized, null_attributes)?;
        if scores.is_empty() {
            return Err(RarityError::empty_attribute_set(token.id()));
        }

        let score = weighted_geometric_mean(&scores.probabilities, &scores.weights)?;
        Ok(TokenScore {
            attribute_scores: scores.probabilities,
            attribute_names: scores.names,
            score,
        })
    }
}

impl ScoringHandler for GeometricMeanScoringHandler {
    fn name(&self) -> &'static str {
        "geometric_mean"
    }

    fn normalized(&self) -> bool {
        self.normalized
    }

    fn score_token(&self, collection: &Collection, token: &Token) -> Result<TokenScore> {
        self.score_token_with(collection, token, None)
    }

    fn score_tokens(&self, collection: &Collection, tokens: &[Token]) -> Result<BatchScores> {
        let null_attributes = extract_null_attributes(collection)?;
        let score_one =
            |token: &Token| self.score_token_with(collection, token, Some(&null_attributes));

        let results: Vec<TokenScore> = if self.performance.use_parallel(tokens.len()) {
            debug!("Scoring {} tokens in parallel", tokens.len());
            tokens.par_iter().map(score_one).collect::<Result<_>>()?
        } else {
            tokens.iter().map(score_one).collect::<Result<_>>()?
        };

        Ok(results.into_iter().collect())
    }
}

#[cfg(test)]
#[path = "geometric_mean_tests.rs"]
mod tests;
