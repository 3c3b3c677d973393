//! Configuration types and management for rarity-rs.
//!
//! Every section deserializes with defaults, so a partial YAML file only needs
//! to name the settings it changes.

pub mod scoring;
pub mod validation;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::core::errors::{RarityError, Result, ResultExt};

pub use scoring::ScoringConfig;
pub use validation::{validate_bounded_usize, validate_positive_usize};

/// Main configuration for the rarity engine
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RarityConfig {
    /// Scoring settings
    #[serde(default)]
    pub scoring: ScoringConfig,

    /// Collection loading settings
    #[serde(default)]
    pub collection: CollectionConfig,

    /// Performance and parallelism settings
    #[serde(default)]
    pub performance: PerformanceConfig,
}

/// Collection loading configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CollectionConfig {
    /// Check frequency counts against total supply as soon as a collection is
    /// loaded instead of waiting for the first scoring call
    #[serde(default)]
    pub validate_on_load: bool,
}

/// Performance configuration for batch scoring
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PerformanceConfig {
    /// Score batches on the rayon thread pool
    #[serde(default = "PerformanceConfig::default_parallel_batch")]
    pub parallel_batch: bool,

    /// Smallest batch that is worth splitting across threads
    #[serde(default = "PerformanceConfig::default_min_parallel_batch")]
    pub min_parallel_batch: usize,

    /// Dedicated thread pool size (uses the global rayon pool when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_threads: Option<usize>,
}

/// Default implementation for [`PerformanceConfig`].
impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            parallel_batch: Self::default_parallel_batch(),
            min_parallel_batch: Self::default_min_parallel_batch(),
            max_threads: None,
        }
    }
}

impl PerformanceConfig {
    const fn default_parallel_batch() -> bool {
        true
    }

    const fn default_min_parallel_batch() -> usize {
        64
    }

    /// Upper bound accepted for `max_threads`
    pub const MAX_THREADS_LIMIT: usize = 1024;

    /// Validate performance configuration
    pub fn validate(&self) -> Result<()> {
        validate_positive_usize(self.min_parallel_batch, "min_parallel_batch")?;
        if let Some(threads) = self.max_threads {
            validate_bounded_usize(threads, 1, Self::MAX_THREADS_LIMIT, "max_threads")?;
        }
        Ok(())
    }

    /// Whether a batch of `len` tokens should be scored in parallel
    pub fn use_parallel(&self, len: usize) -> bool {
        self.parallel_batch && len >= self.min_parallel_batch
    }
}

/// Configuration construction and I/O methods for [`RarityConfig`].
impl RarityConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        serde_yaml::from_str(&content).map_err(|e| {
            RarityError::config(format!("Invalid config file {}: {e}", path.display()))
        })
    }

    /// Save configuration to a YAML file
    pub fn to_yaml_file(&self, path: impl Into<PathBuf>) -> Result<()> {
        let path = path.into();
        let content = self.to_yaml()?;
        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }

    /// Render configuration as YAML
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(Into::into)
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<()> {
        self.performance.validate()?;
        Ok(())
    }
}
