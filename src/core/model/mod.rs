//! Collection and token data model.
//!
//! - [`attribute`]: attribute names, typed values and frequency keys
//! - [`token`]: tokens and their kind-partitioned metadata
//! - [`collection`]: per-attribute value counts and total supply

pub mod attribute;
pub mod collection;
pub mod token;

pub use attribute::{AttributeKind, AttributeName, AttributeValue, TokenAttribute, ValueKey};
pub use collection::{Collection, CollectionAttribute, FrequencyCounts};
pub use token::{Token, TokenId, TokenMetadata};

#[cfg(test)]
pub(crate) mod fixtures {
    //! Shared collections for unit tests.

    use super::*;

    /// Four tokens; Background: Red 1, Blue 3; Hat: Cap 2, Beanie 1, absent 1.
    pub(crate) fn hats_collection() -> Collection {
        let tokens = vec![
            token("A", &[("Background", "Red"), ("Hat", "Cap")]),
            token("B", &[("Background", "Blue")]),
            token("C", &[("Background", "Blue"), ("Hat", "Cap")]),
            token("D", &[("Background", "Blue"), ("Hat", "Beanie")]),
        ];
        Collection::new(
            "hats",
            counts(&[
                ("Background", &[("Red", 1), ("Blue", 3)]),
                ("Hat", &[("Cap", 2), ("Beanie", 1)]),
            ]),
            4,
            tokens,
        )
    }

    pub(crate) fn token(id: &str, attributes: &[(&str, &str)]) -> Token {
        Token::new(
            id,
            TokenMetadata::from_attributes(
                attributes
                    .iter()
                    .map(|(name, value)| TokenAttribute::string(*name, *value)),
            ),
        )
    }

    pub(crate) fn counts(entries: &[(&str, &[(&str, u64)])]) -> FrequencyCounts {
        entries
            .iter()
            .map(|(name, values)| {
                (
                    name.to_string(),
                    values
                        .iter()
                        .map(|(value, count)| (value.to_string(), *count))
                        .collect(),
                )
            })
            .collect()
    }
}
