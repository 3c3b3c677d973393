//! Derivation of the implicit "attribute absent" frequencies.
//!
//! Not carrying a trait is itself informative, so every attribute name known
//! to a collection gets a synthetic entry counting the tokens without it:
//! `absent = total_supply - sum(known counts)`. The result depends only on
//! the collection, so batch scoring derives it once and hands the same
//! [`NullAttributeMap`] to every token.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::errors::{RarityError, Result};
use crate::core::model::{AttributeName, Collection, CollectionAttribute, ValueKey};

/// Attribute name → synthetic absent-value entry, derived from one collection.
///
/// Every attribute name known to the source collection has an entry, including
/// names every token carries (absent count zero).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NullAttributeMap {
    entries: BTreeMap<AttributeName, CollectionAttribute>,
}

impl NullAttributeMap {
    /// Absent entry for an attribute name
    pub fn get(&self, name: &str) -> Option<&CollectionAttribute> {
        self.entries.get(name)
    }

    /// Number of tokens lacking the attribute; zero for unknown names
    pub fn absent_count(&self, name: &str) -> u64 {
        self.entries
            .get(name)
            .map(|entry| entry.count(&ValueKey::Absent))
            .unwrap_or(0)
    }

    /// Entries in attribute-name order
    pub fn iter(&self) -> impl Iterator<Item = (&AttributeName, &CollectionAttribute)> {
        self.entries.iter()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the source collection had no attributes
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Derive the absent-value entry for every attribute name in `collection`.
///
/// Fails with [`RarityError::DataIntegrity`] when an attribute's declared
/// counts exceed the total supply. The shortfall is reported, never clamped.
pub fn extract_null_attributes(collection: &Collection) -> Result<NullAttributeMap> {
    let total_supply = collection.total_supply();
    let entries = collection
        .attribute_names()
        .map(|name| -> Result<(AttributeName, CollectionAttribute)> {
            let known = collection.known_count_sum(name)?;
            let absent = total_supply.checked_sub(known).ok_or_else(|| {
                RarityError::data_integrity(
                    name.clone(),
                    format!(
                        "value counts sum to {known}, exceeding total supply {total_supply} of collection '{}'",
                        collection.name()
                    ),
                )
            })?;
            Ok((
                name.clone(),
                CollectionAttribute::absent(name.clone(), absent, total_supply),
            ))
        })
        .collect::<Result<BTreeMap<_, _>>>()?;

    Ok(NullAttributeMap { entries })
}
