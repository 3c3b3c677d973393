//! Attribute names, values, and the keys frequency tables are indexed by.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::errors::{RarityError, Result};

/// Name of a trait category, e.g. `"Background"`.
pub type AttributeName = String;

/// Value kind of a token attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeKind {
    /// Free-form string value
    String,
    /// Numeric value (levels, boosts, stats)
    Numeric,
    /// Date value stored as unix seconds
    Date,
}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => write!(f, "string"),
            Self::Numeric => write!(f, "numeric"),
            Self::Date => write!(f, "date"),
        }
    }
}

/// A concrete value for one attribute of one token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum AttributeValue {
    /// String value
    String(String),
    /// Numeric value
    Numeric(f64),
    /// Unix timestamp in seconds
    Date(i64),
}

impl AttributeValue {
    /// Kind tag of this value
    pub fn kind(&self) -> AttributeKind {
        match self {
            Self::String(_) => AttributeKind::String,
            Self::Numeric(_) => AttributeKind::Numeric,
            Self::Date(_) => AttributeKind::Date,
        }
    }

    /// Canonical string form used to look the value up in frequency counts.
    ///
    /// Numbers use Rust's shortest round-trip formatting (`5.0` becomes `"5"`),
    /// dates use their integer timestamp. Returns `None` for non-finite numbers,
    /// which have no stable key.
    pub fn frequency_key(&self) -> Option<String> {
        match self {
            Self::String(value) => Some(value.clone()),
            Self::Numeric(value) if !value.is_finite() => None,
            // -0.0 and 0.0 must land on the same key
            Self::Numeric(value) if *value == 0.0 => Some("0".to_string()),
            Self::Numeric(value) => Some(format!("{value}")),
            Self::Date(timestamp) => Some(timestamp.to_string()),
        }
    }

    /// Date value as a UTC timestamp, if this is a representable date
    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Date(timestamp) => DateTime::from_timestamp(*timestamp, 0),
            _ => None,
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(value) => write!(f, "{value}"),
            Self::Numeric(value) => write!(f, "{value}"),
            Self::Date(timestamp) => match self.as_datetime() {
                Some(datetime) => write!(f, "{}", datetime.format("%Y-%m-%d %H:%M:%S UTC")),
                None => write!(f, "{timestamp}"),
            },
        }
    }
}

/// Key of a frequency table entry.
///
/// `Absent` is the synthetic value standing for "this token does not carry the
/// attribute at all". It sorts after every concrete value and can never
/// collide with a real value, even one spelled `"null"` or `"none"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKey {
    /// A concrete attribute value, by frequency key
    Value(String),
    /// The attribute is missing on the token
    Absent,
}

impl ValueKey {
    /// Create a key for a concrete value
    pub fn value(key: impl Into<String>) -> Self {
        Self::Value(key.into())
    }

    /// True for the absent sentinel
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }
}

impl fmt::Display for ValueKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(key) => write!(f, "{key}"),
            Self::Absent => write!(f, "<absent>"),
        }
    }
}

/// A single (name, value) pair belonging to one token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "TokenAttributeRepr", into = "TokenAttributeRepr")]
pub struct TokenAttribute {
    /// Attribute name
    pub name: AttributeName,
    /// Attribute value, tagged by kind
    pub value: AttributeValue,
}

/// Wire shape of [`TokenAttribute`]: `{"kind": "...", "name": "...", "value": ...}`.
#[derive(Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum TokenAttributeRepr {
    String { name: AttributeName, value: String },
    Numeric { name: AttributeName, value: f64 },
    Date { name: AttributeName, value: i64 },
}

impl From<TokenAttributeRepr> for TokenAttribute {
    fn from(repr: TokenAttributeRepr) -> Self {
        match repr {
            TokenAttributeRepr::String { name, value } => Self::string(name, value),
            TokenAttributeRepr::Numeric { name, value } => Self::numeric(name, value),
            TokenAttributeRepr::Date { name, value } => Self::date(name, value),
        }
    }
}

impl From<TokenAttribute> for TokenAttributeRepr {
    fn from(attr: TokenAttribute) -> Self {
        let name = attr.name;
        match attr.value {
            AttributeValue::String(value) => Self::String { name, value },
            AttributeValue::Numeric(value) => Self::Numeric { name, value },
            AttributeValue::Date(value) => Self::Date { name, value },
        }
    }
}

impl TokenAttribute {
    /// Create a string attribute
    pub fn string(name: impl Into<AttributeName>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: AttributeValue::String(value.into()),
        }
    }

    /// Create a numeric attribute
    pub fn numeric(name: impl Into<AttributeName>, value: f64) -> Self {
        Self {
            name: name.into(),
            value: AttributeValue::Numeric(value),
        }
    }

    /// Create a date attribute from unix seconds
    pub fn date(name: impl Into<AttributeName>, timestamp: i64) -> Self {
        Self {
            name: name.into(),
            value: AttributeValue::Date(timestamp),
        }
    }

    /// Kind tag of the value
    pub fn kind(&self) -> AttributeKind {
        self.value.kind()
    }

    /// Frequency table key of the value.
    ///
    /// Fails with [`RarityError::UnsupportedAttributeKind`] when the value
    /// cannot be keyed; callers exclude such attributes rather than abort.
    pub fn value_key(&self) -> Result<ValueKey> {
        self.value
            .frequency_key()
            .map(ValueKey::Value)
            .ok_or_else(|| {
                RarityError::unsupported_kind(
                    self.name.clone(),
                    format!("non-finite {} value {}", self.kind(), self.value),
                )
            })
    }
}
