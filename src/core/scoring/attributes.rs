//! Per-token attribute probabilities and weights.
//!
//! For every attribute name known to the collection, a token contributes one
//! `(probability, weight)` pair: the share of the collection holding the same
//! value (or sharing its absence of the attribute), and either a unit weight
//! or `1 / distinct values` when normalization is enabled. Normalization keeps
//! high-cardinality attributes from dominating a product of probabilities.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::null_attributes::{extract_null_attributes, NullAttributeMap};
use crate::core::errors::{RarityError, Result};
use crate::core::model::{AttributeName, Collection, Token, ValueKey};

/// Parallel sequences of probabilities, weights and attribute names, sorted by
/// attribute name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttributeScores {
    /// Probability of the token's value (or absence) per attribute, in (0, 1]
    pub probabilities: Vec<f64>,
    /// Aggregation weight per attribute
    pub weights: Vec<f64>,
    /// Attribute names
    pub names: Vec<AttributeName>,
}

impl AttributeScores {
    /// Number of scored attributes
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// True when nothing was scored
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// `(name, probability, weight)` triples
    pub fn iter(&self) -> impl Iterator<Item = (&AttributeName, f64, f64)> {
        self.names
            .iter()
            .zip(&self.probabilities)
            .zip(&self.weights)
            .map(|((name, &probability), &weight)| (name, probability, weight))
    }

    fn push(&mut self, name: AttributeName, probability: f64, weight: f64) {
        self.names.push(name);
        self.probabilities.push(probability);
        self.weights.push(weight);
    }
}

/// Compute the attribute probabilities and weights of `token` within `collection`.
///
/// `null_attributes` is the memoized output of [`extract_null_attributes`] for
/// the same collection; it is derived on the spot when `None`.
///
/// The result is empty when the collection has no attributes, or when the
/// token carries attributes but none of them is known to the collection
/// (it belongs to a different collection). A token carrying no attributes at
/// all is not foreign: it lacks every attribute, so each one is scored with
/// its absent probability. A token value whose count is zero, or a missing
/// attribute every member supposedly carries, is a
/// [`RarityError::DataIntegrity`] error. Values that cannot be keyed are left
/// out of the result with a warning.
pub fn token_attribute_scores(
    collection: &Collection,
    token: &Token,
    normalized: bool,
    null_attributes: Option<&NullAttributeMap>,
) -> Result<AttributeScores> {
    let null_attributes = match null_attributes {
        Some(memoized) => Cow::Borrowed(memoized),
        None => Cow::Owned(extract_null_attributes(collection)?),
    };

    let metadata = token.metadata();
    if !metadata.is_empty() && !metadata.names().any(|name| collection.has_attribute(name)) {
        debug!(
            "Token {} shares no attribute with collection '{}'",
            token.id(),
            collection.name()
        );
        return Ok(AttributeScores::default());
    }

    let total_supply = collection.total_supply();
    let mut scores = AttributeScores::default();

    for name in collection.attribute_names() {
        let key = match metadata.get(name) {
            Some(attribute) => match attribute.value_key() {
                Ok(key) => key,
                Err(err) => {
                    warn!("Token {}: excluding attribute from scoring: {}", token.id(), err);
                    continue;
                }
            },
            None => ValueKey::Absent,
        };

        let absent_count = null_attributes.absent_count(name);
        let count = match &key {
            ValueKey::Absent => absent_count,
            value => collection.count(name, value),
        };
        if count == 0 || count > total_supply {
            return Err(RarityError::data_integrity(
                name.clone(),
                format!(
                    "token {} has value '{key}' with count {count} out of total supply {total_supply}",
                    token.id()
                ),
            ));
        }

        let probability = count as f64 / total_supply as f64;
        let weight = if normalized {
            let distinct = collection.distinct_value_count(name) + usize::from(absent_count > 0);
            1.0 / distinct as f64
        } else {
            1.0
        };

        scores.push(name.clone(), probability, weight);
    }

    Ok(scores)
}

#[cfg(test)]
#[path = "attributes_tests.rs"]
mod tests;
