//! # rarity-rs: Attribute-Probability Rarity Scoring
//!
//! Scores how statistically unusual a token's traits are within its collection.
//! Every attribute contributes the probability of the token's value (or of its
//! absence), and the probabilities are combined with a weighted geometric mean.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      API Layer (engine)                      │
//! ├──────────────────────────────────────────────────────────────┤
//! │  Model               │  Scoring                │  I/O         │
//! │ • Collection counts  │ • Null attributes       │ • Snapshots  │
//! │ • Tokens / metadata  │ • Attribute scores      │ • Trait      │
//! │ • Typed values       │ • Geometric mean        │   classes    │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use std::collections::BTreeMap;
//! use rarity_rs::core::model::{Collection, Token, TokenAttribute, TokenMetadata};
//! use rarity_rs::core::scoring::{GeometricMeanScoringHandler, ScoringHandler};
//!
//! let counts = BTreeMap::from([(
//!     "Background".to_string(),
//!     BTreeMap::from([("Red".to_string(), 1), ("Blue".to_string(), 3)]),
//! )]);
//! let collection = Collection::new("demo", counts, 4, Vec::new());
//! let token = Token::new(
//!     "1",
//!     TokenMetadata::new().with_attribute(TokenAttribute::string("Background", "Red")),
//! );
//!
//! let result = GeometricMeanScoringHandler::new(false)
//!     .score_token(&collection, &token)
//!     .unwrap();
//! assert!((result.score - 0.25).abs() < 1e-12);
//! ```

#![warn(missing_docs)]
#![warn(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_precision_loss)]
#![cfg_attr(docsrs, feature(doc_cfg))]

// Core scoring engine modules
pub mod core {
    //! Core data model, scoring algorithms and shared infrastructure.

    pub mod config;
    pub mod errors;
    pub mod model;
    pub mod scoring;
}

// Marketplace metadata ingestion
pub mod io {
    //! Loading collections from marketplace snapshots.

    pub mod opensea;
}

// Public API and engine interface
pub mod api {
    //! High-level API and engine interface.

    pub mod engine;
    pub mod results;
}

// Re-export primary types for convenience
pub use api::engine::RarityEngine;
pub use api::results::RarityReport;
pub use core::config::RarityConfig;
pub use core::errors::{RarityError, Result, ResultExt};
pub use core::model::{Collection, Token, TokenAttribute, TokenMetadata};
pub use core::scoring::{GeometricMeanScoringHandler, ScoringHandler};

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
