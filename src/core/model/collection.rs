//! Collection-level attribute statistics.
//!
//! A [`Collection`] holds, for every attribute name observed across its
//! tokens, how many tokens carry each value, together with the total token
//! supply used as the probability denominator. Attributes are sparse: a name
//! need not appear on every token, and querying an unknown name yields an
//! empty value set rather than an error.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::attribute::{AttributeName, ValueKey};
use super::token::Token;
use crate::core::errors::{RarityError, Result};
use crate::core::scoring::null_attributes::extract_null_attributes;

/// Raw frequency table: attribute name → value frequency key → token count
pub type FrequencyCounts = BTreeMap<AttributeName, BTreeMap<String, u64>>;

/// Aggregated statistic for one attribute name within a collection.
///
/// The invariant, once the absent pseudo-value is accounted for, is that the
/// counts sum to `total_supply` exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionAttribute {
    name: AttributeName,
    #[serde(with = "value_counts_serde")]
    value_counts: BTreeMap<ValueKey, u64>,
    total_supply: u64,
}

impl CollectionAttribute {
    /// Create an entry from explicit value counts
    pub fn new(
        name: impl Into<AttributeName>,
        value_counts: BTreeMap<ValueKey, u64>,
        total_supply: u64,
    ) -> Self {
        Self {
            name: name.into(),
            value_counts,
            total_supply,
        }
    }

    /// Create the synthetic "attribute is absent" entry
    pub fn absent(name: impl Into<AttributeName>, count: u64, total_supply: u64) -> Self {
        Self::new(
            name,
            BTreeMap::from([(ValueKey::Absent, count)]),
            total_supply,
        )
    }

    /// Attribute name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Total token supply of the owning collection
    pub fn total_supply(&self) -> u64 {
        self.total_supply
    }

    /// All value counts, including zero-count entries
    pub fn value_counts(&self) -> &BTreeMap<ValueKey, u64> {
        &self.value_counts
    }

    /// Token count for one value; zero when the value was never observed
    pub fn count(&self, key: &ValueKey) -> u64 {
        self.value_counts.get(key).copied().unwrap_or(0)
    }

    /// Sum of all counts in this entry
    pub fn count_sum(&self) -> u64 {
        self.value_counts.values().sum()
    }

    /// Number of values with a nonzero count
    pub fn distinct_values(&self) -> usize {
        self.value_counts.values().filter(|&&count| count > 0).count()
    }

    /// `count / total_supply`, or `None` when either side is zero
    pub fn probability(&self, key: &ValueKey) -> Option<f64> {
        let count = self.count(key);
        if count == 0 || self.total_supply == 0 {
            return None;
        }
        Some(count as f64 / self.total_supply as f64)
    }
}

// JSON object keys must be strings, so value counts travel as `[key, count]` pairs
mod value_counts_serde {
    use std::collections::BTreeMap;

    use serde::{Deserialize, Deserializer, Serializer};

    use super::ValueKey;

    pub fn serialize<S: Serializer>(
        counts: &BTreeMap<ValueKey, u64>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(counts)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<BTreeMap<ValueKey, u64>, D::Error> {
        Vec::<(ValueKey, u64)>::deserialize(deserializer).map(|pairs| pairs.into_iter().collect())
    }
}

/// A collection of tokens with its attribute frequency statistics.
///
/// Built once from external data and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    name: String,
    attributes_frequency_counts: FrequencyCounts,
    token_total_supply: u64,
    #[serde(default)]
    tokens: Vec<Token>,
}

impl Collection {
    /// Create a collection from declared frequency counts and total supply.
    ///
    /// Counts are taken as given; inconsistencies surface when null
    /// attributes are derived, or earlier through [`Collection::validate`].
    pub fn new(
        name: impl Into<String>,
        attributes_frequency_counts: FrequencyCounts,
        token_total_supply: u64,
        tokens: Vec<Token>,
    ) -> Self {
        Self {
            name: name.into(),
            attributes_frequency_counts,
            token_total_supply,
            tokens,
        }
    }

    /// Derive frequency counts and total supply from the tokens themselves.
    pub fn from_tokens(name: impl Into<String>, tokens: Vec<Token>) -> Self {
        let counts = Self::frequency_counts_of(&tokens);
        let supply = tokens.len() as u64;
        Self::new(name, counts, supply, tokens)
    }

    /// Count attribute values across `tokens`, skipping (and logging) values
    /// that cannot be keyed
    pub fn frequency_counts_of(tokens: &[Token]) -> FrequencyCounts {
        let mut counts = FrequencyCounts::new();
        for token in tokens {
            for attribute in token.metadata.iter() {
                match attribute.value_key() {
                    Ok(ValueKey::Value(key)) => {
                        *counts
                            .entry(attribute.name.clone())
                            .or_default()
                            .entry(key)
                            .or_insert(0) += 1;
                    }
                    Ok(ValueKey::Absent) => {}
                    Err(err) => {
                        warn!("Token {}: excluding attribute from counts: {}", token.id, err);
                    }
                }
            }
        }
        counts
    }

    /// Collection name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Total token supply, the probability denominator
    pub fn total_supply(&self) -> u64 {
        self.token_total_supply
    }

    /// Member tokens
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Look up a member token by id
    pub fn token(&self, id: &str) -> Option<&Token> {
        self.tokens.iter().find(|token| token.id == id)
    }

    /// Raw frequency table
    pub fn attributes_frequency_counts(&self) -> &FrequencyCounts {
        &self.attributes_frequency_counts
    }

    /// Attribute names known to the collection, in sorted order
    pub fn attribute_names(&self) -> impl Iterator<Item = &AttributeName> {
        self.attributes_frequency_counts.keys()
    }

    /// Whether the attribute name was observed in the collection
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes_frequency_counts.contains_key(name)
    }

    /// Value counts for an attribute; empty for unknown names
    pub fn value_counts(&self, name: &str) -> BTreeMap<ValueKey, u64> {
        self.attributes_frequency_counts
            .get(name)
            .map(|values| {
                values
                    .iter()
                    .map(|(value, &count)| (ValueKey::Value(value.clone()), count))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Count of tokens holding a concrete value; zero for unknown names and
    /// for the absent key, which lives in the null attribute map
    pub fn count(&self, name: &str, key: &ValueKey) -> u64 {
        match key {
            ValueKey::Value(value) => self
                .attributes_frequency_counts
                .get(name)
                .and_then(|values| values.get(value))
                .copied()
                .unwrap_or(0),
            ValueKey::Absent => 0,
        }
    }

    /// Sum of all declared value counts for an attribute; zero for unknown names.
    ///
    /// Fails with [`RarityError::DataIntegrity`] when the counts overflow `u64`.
    pub fn known_count_sum(&self, name: &str) -> Result<u64> {
        let Some(values) = self.attributes_frequency_counts.get(name) else {
            return Ok(0);
        };
        values
            .values()
            .try_fold(0u64, |sum, &count| sum.checked_add(count))
            .ok_or_else(|| {
                RarityError::data_integrity(
                    name,
                    format!("value counts overflow u64 in collection '{}'", self.name),
                )
            })
    }

    /// Number of concrete values with a nonzero count, absence excluded
    pub fn distinct_value_count(&self, name: &str) -> usize {
        self.attributes_frequency_counts
            .get(name)
            .map(|values| values.values().filter(|&&count| count > 0).count())
            .unwrap_or(0)
    }

    /// Statistic entry for one attribute over its concrete values
    pub fn collection_attribute(&self, name: &str) -> CollectionAttribute {
        CollectionAttribute::new(name, self.value_counts(name), self.token_total_supply)
    }

    /// Check that no attribute's declared counts exceed the total supply.
    ///
    /// Scoring performs the same check when deriving null attributes; this
    /// runs it eagerly.
    pub fn validate(&self) -> Result<()> {
        extract_null_attributes(self).map(drop)
    }
}

#[cfg(test)]
#[path = "collection_tests.rs"]
mod tests;
