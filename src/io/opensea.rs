//! OpenSea-style collection snapshots and trait classification.
//!
//! Marketplaces describe each trait as `{trait_type, value, display_type}`,
//! where `display_type` decides the value kind: absent means a string trait,
//! `number`/`boost_percentage`/`boost_number` a numeric one, `date` a date.
//! Anything else is logged and dropped. A [`CollectionSnapshot`] is the
//! offline JSON form of a collection response plus its assets; fetching it is
//! left to the caller.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::core::errors::{RarityError, Result, ResultExt};
use crate::core::model::{
    AttributeKind, Collection, FrequencyCounts, Token, TokenAttribute, TokenMetadata,
};

/// Token standards whose trait data can be scored
pub const SUPPORTED_STANDARDS: [&str; 2] = ["ERC721", "ERC1155"];

const NUMERIC_DISPLAY_TYPES: [&str; 3] = ["number", "boost_percentage", "boost_number"];
const DATE_DISPLAY_TYPE: &str = "date";

/// One trait as reported for an asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTrait {
    /// Attribute name
    pub trait_type: String,
    /// Raw JSON value
    pub value: Value,
    /// Marketplace display marker; `None` for plain string traits
    #[serde(default)]
    pub display_type: Option<String>,
}

impl RawTrait {
    /// Create a raw trait
    pub fn new(trait_type: impl Into<String>, value: Value, display_type: Option<&str>) -> Self {
        Self {
            trait_type: trait_type.into(),
            value,
            display_type: display_type.map(str::to_string),
        }
    }
}

/// Map a `display_type` marker to a value kind; `None` for unknown markers.
pub fn classify_trait(display_type: Option<&str>) -> Option<AttributeKind> {
    match display_type {
        None => Some(AttributeKind::String),
        Some(marker) if NUMERIC_DISPLAY_TYPES.contains(&marker) => Some(AttributeKind::Numeric),
        Some(DATE_DISPLAY_TYPE) => Some(AttributeKind::Date),
        Some(_) => None,
    }
}

/// Convert one raw trait into a typed attribute.
///
/// Fails with [`RarityError::UnsupportedAttributeKind`] for unknown display
/// markers and for values that do not fit their declared kind.
pub fn trait_to_attribute(raw: &RawTrait) -> Result<TokenAttribute> {
    let kind = classify_trait(raw.display_type.as_deref()).ok_or_else(|| {
        RarityError::unsupported_kind(
            raw.trait_type.clone(),
            format!(
                "unknown display_type '{}'",
                raw.display_type.as_deref().unwrap_or_default()
            ),
        )
    })?;
    let mismatch = || {
        RarityError::unsupported_kind(
            raw.trait_type.clone(),
            format!("{kind} trait with value {}", raw.value),
        )
    };

    let name = raw.trait_type.clone();
    match kind {
        AttributeKind::String => match &raw.value {
            Value::String(value) => Ok(TokenAttribute::string(name, value.clone())),
            Value::Number(value) => Ok(TokenAttribute::string(name, value.to_string())),
            Value::Bool(value) => Ok(TokenAttribute::string(name, value.to_string())),
            _ => Err(mismatch()),
        },
        AttributeKind::Numeric => parse_number(&raw.value)
            .filter(|value| value.is_finite())
            .map(|value| TokenAttribute::numeric(name, value))
            .ok_or_else(mismatch),
        AttributeKind::Date => parse_number(&raw.value)
            .filter(|value| value.is_finite())
            .map(|value| TokenAttribute::date(name, value.trunc() as i64))
            .ok_or_else(mismatch),
    }
}

fn parse_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

/// Convert an asset's trait list into token metadata, dropping (and logging)
/// traits that cannot be classified.
pub fn traits_to_token_metadata(traits: &[RawTrait]) -> TokenMetadata {
    let mut metadata = TokenMetadata::new();
    for raw in traits {
        match trait_to_attribute(raw) {
            Ok(attribute) => {
                metadata.insert(attribute);
            }
            Err(err) => debug!("Dropping trait: {}", err),
        }
    }
    metadata
}

/// One asset of a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetSnapshot {
    /// Token identifier
    pub token_id: String,
    /// Raw traits
    #[serde(default)]
    pub traits: Vec<RawTrait>,
}

/// Offline snapshot of a marketplace collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionSnapshot {
    /// Collection display name
    pub name: String,
    /// Marketplace slug
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    /// Schema names of the collection's contracts, e.g. `ERC721`
    #[serde(default)]
    pub contract_standards: Vec<String>,
    /// Declared total supply
    pub total_supply: u64,
    /// Declared attribute frequency counts; derived from `assets` when empty
    #[serde(default)]
    pub traits: FrequencyCounts,
    /// Assets to score
    #[serde(default)]
    pub assets: Vec<AssetSnapshot>,
}

impl CollectionSnapshot {
    /// Parse a snapshot from JSON text
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Malformed collection snapshot")
    }

    /// Load a snapshot from a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read snapshot: {}", path.display()))?;
        Self::from_json_str(&content)
    }

    /// Reject collections built on token standards other than ERC721/ERC1155
    pub fn check_standards(&self) -> Result<()> {
        match self
            .contract_standards
            .iter()
            .find(|standard| !SUPPORTED_STANDARDS.contains(&standard.as_str()))
        {
            Some(standard) => Err(RarityError::unsupported(format!(
                "collection '{}' uses unsupported token standard {standard}",
                self.name
            ))),
            None => Ok(()),
        }
    }

    /// Build the scoring collection.
    ///
    /// Declared `traits` are used as-is when present. Otherwise counts are
    /// derived from the assets, and the declared supply still applies unless it
    /// is zero.
    pub fn into_collection(self) -> Result<Collection> {
        self.check_standards()?;

        let tokens: Vec<Token> = self
            .assets
            .iter()
            .map(|asset| {
                Token::new(
                    asset.token_id.clone(),
                    traits_to_token_metadata(&asset.traits),
                )
            })
            .collect();

        let (counts, supply) = if self.traits.is_empty() {
            let supply = if self.total_supply == 0 {
                tokens.len() as u64
            } else {
                self.total_supply
            };
            (Collection::frequency_counts_of(&tokens), supply)
        } else {
            (self.traits, self.total_supply)
        };
        let collection = Collection::new(self.name, counts, supply, tokens);

        info!(
            "Loaded collection '{}': {} attributes, {} tokens, supply {}",
            collection.name(),
            collection.attributes_frequency_counts().len(),
            collection.tokens().len(),
            collection.total_supply()
        );
        Ok(collection)
    }
}
