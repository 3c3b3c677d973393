//! Tokens and their per-token attribute metadata.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::attribute::{AttributeKind, AttributeName, TokenAttribute};

/// Unique identifier of a token within its collection
pub type TokenId = String;

/// Attribute metadata of one token.
///
/// Storage is partitioned by value kind, as marketplaces classify traits that
/// way, but the metadata behaves as a single name → attribute mapping: an
/// attribute name lives in at most one partition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenMetadata {
    /// String-kind attributes
    #[serde(default)]
    pub string_attributes: BTreeMap<AttributeName, TokenAttribute>,
    /// Numeric-kind attributes
    #[serde(default)]
    pub numeric_attributes: BTreeMap<AttributeName, TokenAttribute>,
    /// Date-kind attributes
    #[serde(default)]
    pub date_attributes: BTreeMap<AttributeName, TokenAttribute>,
}

impl TokenMetadata {
    /// Create empty metadata
    pub fn new() -> Self {
        Self::default()
    }

    /// Build metadata from a list of attributes; later entries win on name clashes
    pub fn from_attributes(attributes: impl IntoIterator<Item = TokenAttribute>) -> Self {
        let mut metadata = Self::new();
        for attribute in attributes {
            metadata.insert(attribute);
        }
        metadata
    }

    /// Builder form of [`TokenMetadata::insert`]
    pub fn with_attribute(mut self, attribute: TokenAttribute) -> Self {
        self.insert(attribute);
        self
    }

    /// Insert an attribute into the partition matching its kind, replacing any
    /// attribute of the same name in every partition
    pub fn insert(&mut self, attribute: TokenAttribute) -> Option<TokenAttribute> {
        let previous = self.remove(&attribute.name);
        let partition = match attribute.kind() {
            AttributeKind::String => &mut self.string_attributes,
            AttributeKind::Numeric => &mut self.numeric_attributes,
            AttributeKind::Date => &mut self.date_attributes,
        };
        partition.insert(attribute.name.clone(), attribute);
        previous
    }

    /// Remove an attribute by name from whichever partition holds it
    pub fn remove(&mut self, name: &str) -> Option<TokenAttribute> {
        self.string_attributes
            .remove(name)
            .or_else(|| self.numeric_attributes.remove(name))
            .or_else(|| self.date_attributes.remove(name))
    }

    /// Look up an attribute by name regardless of kind
    pub fn get(&self, name: &str) -> Option<&TokenAttribute> {
        self.string_attributes
            .get(name)
            .or_else(|| self.numeric_attributes.get(name))
            .or_else(|| self.date_attributes.get(name))
    }

    /// Whether the token carries the attribute
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// All attributes, strings first, then numerics, then dates
    pub fn iter(&self) -> impl Iterator<Item = &TokenAttribute> {
        self.string_attributes
            .values()
            .chain(self.numeric_attributes.values())
            .chain(self.date_attributes.values())
    }

    /// All attribute names carried by the token
    pub fn names(&self) -> impl Iterator<Item = &AttributeName> {
        self.iter().map(|attribute| &attribute.name)
    }

    /// Number of attributes
    pub fn len(&self) -> usize {
        self.string_attributes.len() + self.numeric_attributes.len() + self.date_attributes.len()
    }

    /// True when the token carries no attributes
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A collection member: identifier plus metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// Token identifier
    pub id: TokenId,
    /// Attribute metadata
    #[serde(default)]
    pub metadata: TokenMetadata,
}

impl Token {
    /// Create a token
    pub fn new(id: impl Into<TokenId>, metadata: TokenMetadata) -> Self {
        Self {
            id: id.into(),
            metadata,
        }
    }

    /// Token identifier
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Attribute metadata
    pub fn metadata(&self) -> &TokenMetadata {
        &self.metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_routes_by_kind() {
        let metadata = TokenMetadata::new()
            .with_attribute(TokenAttribute::string("Hat", "Cap"))
            .with_attribute(TokenAttribute::numeric("Level", 4.0))
            .with_attribute(TokenAttribute::date("Birthday", 1_600_000_000));

        assert_eq!(metadata.string_attributes.len(), 1);
        assert_eq!(metadata.numeric_attributes.len(), 1);
        assert_eq!(metadata.date_attributes.len(), 1);
        assert_eq!(metadata.len(), 3);
        assert!(metadata.contains("Level"));
    }

    #[test]
    fn same_name_in_other_kind_replaces() {
        let mut metadata =
            TokenMetadata::new().with_attribute(TokenAttribute::string("Level", "high"));
        let previous = metadata.insert(TokenAttribute::numeric("Level", 9.0));

        assert_eq!(previous, Some(TokenAttribute::string("Level", "high")));
        assert!(metadata.string_attributes.is_empty());
        assert_eq!(metadata.len(), 1);
        assert_eq!(
            metadata.get("Level").map(TokenAttribute::kind),
            Some(AttributeKind::Numeric)
        );
    }

    #[test]
    fn empty_metadata() {
        let token = Token::new("7", TokenMetadata::default());
        assert!(token.metadata().is_empty());
        assert_eq!(token.metadata().names().count(), 0);
        assert_eq!(token.id(), "7");
    }
}
