//! Scoring reports for public API consumption.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::core::errors::{RarityError, Result};
use crate::core::model::{AttributeName, Collection, Token, TokenId};
use crate::core::scoring::BatchScores;

/// Scores of a set of tokens, in the order they were requested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RarityReport {
    /// Collection name
    pub collection: String,
    /// Total supply used as the probability denominator
    pub total_supply: u64,
    /// Scoring strategy identifier
    pub handler: String,
    /// Whether attribute weights were normalized
    pub normalized: bool,
    /// Per-token results
    pub tokens: Vec<TokenReport>,
}

/// Score and explanation for one token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenReport {
    /// Token identifier
    pub token_id: TokenId,
    /// Aggregated rarity score; lower is rarer
    pub score: f64,
    /// Probability of each attribute value the score was built from
    pub attributes: Vec<AttributeProbability>,
}

/// Probability of one of a token's attribute values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeProbability {
    /// Attribute name
    pub name: AttributeName,
    /// Share of the collection with the same value (or absence)
    pub probability: f64,
}

impl RarityReport {
    /// Assemble a report from a batch scored over `tokens`
    pub fn from_batch(
        collection: &Collection,
        tokens: &[&Token],
        batch: BatchScores,
        handler: &str,
        normalized: bool,
    ) -> Result<Self> {
        if tokens.len() != batch.len() {
            return Err(RarityError::internal(format!(
                "{} tokens but {} scores",
                tokens.len(),
                batch.len()
            )));
        }

        let BatchScores {
            attribute_scores,
            attribute_names,
            scores,
        } = batch;

        let reports = tokens
            .iter()
            .zip(attribute_scores)
            .zip(attribute_names)
            .zip(scores)
            .map(|(((token, probabilities), names), score)| TokenReport {
                token_id: token.id.clone(),
                score,
                attributes: names
                    .into_iter()
                    .zip(probabilities)
                    .map(|(name, probability)| AttributeProbability { name, probability })
                    .collect(),
            })
            .collect();

        Ok(Self {
            collection: collection.name().to_string(),
            total_supply: collection.total_supply(),
            handler: handler.to_string(),
            normalized,
            tokens: reports,
        })
    }

    /// Find a token's entry
    pub fn token(&self, token_id: &str) -> Option<&TokenReport> {
        self.tokens.iter().find(|report| report.token_id == token_id)
    }

    /// Pretty-printed JSON
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(Into::into)
    }

    /// Plain-text rendering, one block per token
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{} (supply {}, {}{})",
            self.collection,
            self.total_supply,
            self.handler,
            if self.normalized { ", normalized" } else { "" }
        );
        for token in &self.tokens {
            let _ = writeln!(out, "token {}: {:.6}", token.token_id, token.score);
            for attribute in &token.attributes {
                let _ = writeln!(out, "  {:<24} {:.6}", attribute.name, attribute.probability);
            }
        }
        out
    }
}
