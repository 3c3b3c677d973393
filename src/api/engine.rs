//! Main rarity engine implementation.

use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::{debug, info};

use crate::api::results::RarityReport;
use crate::core::config::RarityConfig;
use crate::core::errors::{RarityError, Result};
use crate::core::model::{Collection, Token};
use crate::core::scoring::{BatchScores, GeometricMeanScoringHandler, ScoringHandler};

/// Main rarity scoring engine
pub struct RarityEngine {
    /// Engine configuration
    config: RarityConfig,

    /// Scoring strategy
    handler: Box<dyn ScoringHandler>,

    /// Dedicated pool when `performance.max_threads` is set
    pool: Option<ThreadPool>,
}

impl RarityEngine {
    /// Create an engine using the geometric-mean handler described by `config`
    pub fn new(config: RarityConfig) -> Result<Self> {
        let handler = GeometricMeanScoringHandler::from_config(&config);
        Self::with_handler(config, Box::new(handler))
    }

    /// Create an engine with a custom scoring strategy
    pub fn with_handler(config: RarityConfig, handler: Box<dyn ScoringHandler>) -> Result<Self> {
        info!("Initializing rarity engine ({})", handler.name());
        config.validate()?;

        let pool = match config.performance.max_threads {
            Some(threads) => Some(
                ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()
                    .map_err(|e| {
                        RarityError::internal(format!("Failed to build thread pool: {e}"))
                    })?,
            ),
            None => None,
        };

        Ok(Self {
            config,
            handler,
            pool,
        })
    }

    /// Get the current configuration
    pub fn config(&self) -> &RarityConfig {
        &self.config
    }

    /// Identifier of the active scoring strategy
    pub fn handler_name(&self) -> &'static str {
        self.handler.name()
    }

    /// Run the load-time checks enabled in the configuration
    pub fn prepare_collection(&self, collection: &Collection) -> Result<()> {
        if self.config.collection.validate_on_load {
            debug!("Validating collection '{}'", collection.name());
            collection.validate()?;
        }
        Ok(())
    }

    /// Score every member token of a collection
    pub fn score_collection(&self, collection: &Collection) -> Result<RarityReport> {
        info!(
            "Scoring collection '{}': {} tokens",
            collection.name(),
            collection.tokens().len()
        );
        self.prepare_collection(collection)?;

        let batch = self.run_batch(collection, collection.tokens())?;
        let tokens: Vec<&Token> = collection.tokens().iter().collect();
        self.report(collection, &tokens, batch)
    }

    /// Score the member tokens with the given ids, in the given order
    pub fn score_selected<S: AsRef<str>>(
        &self,
        collection: &Collection,
        token_ids: &[S],
    ) -> Result<RarityReport> {
        let tokens = token_ids
            .iter()
            .map(|id| {
                let id = id.as_ref();
                collection.token(id).ok_or_else(|| {
                    RarityError::validation_field(
                        format!("Token '{id}' is not part of collection '{}'", collection.name()),
                        "token_id",
                    )
                })
            })
            .collect::<Result<Vec<&Token>>>()?;

        info!(
            "Scoring {} selected tokens of '{}'",
            tokens.len(),
            collection.name()
        );
        self.prepare_collection(collection)?;

        let owned: Vec<Token> = tokens.iter().map(|&token| token.clone()).collect();
        let batch = self.run_batch(collection, &owned)?;
        self.report(collection, &tokens, batch)
    }

    /// Score tokens that need not be members of the collection
    pub fn score_tokens(&self, collection: &Collection, tokens: &[Token]) -> Result<RarityReport> {
        self.prepare_collection(collection)?;
        let batch = self.run_batch(collection, tokens)?;
        let refs: Vec<&Token> = tokens.iter().collect();
        self.report(collection, &refs, batch)
    }

    fn run_batch(&self, collection: &Collection, tokens: &[Token]) -> Result<BatchScores> {
        match &self.pool {
            Some(pool) => pool.install(|| self.handler.score_tokens(collection, tokens)),
            None => self.handler.score_tokens(collection, tokens),
        }
    }

    fn report(
        &self,
        collection: &Collection,
        tokens: &[&Token],
        batch: BatchScores,
    ) -> Result<RarityReport> {
        let report = RarityReport::from_batch(
            collection,
            tokens,
            batch,
            self.handler.name(),
            self.handler.normalized(),
        )?;
        info!("Scored {} tokens", report.tokens.len());
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use approx::assert_relative_eq;

    use super::*;
    use crate::core::model::fixtures::{counts, hats_collection, token};
    use crate::core::scoring::TokenScore;

    /// Handler that scores every token 0.5 and counts batch calls
    struct FixedScoringHandler {
        batches: Arc<AtomicUsize>,
    }

    impl ScoringHandler for FixedScoringHandler {
        fn name(&self) -> &'static str {
            "fixed"
        }

        fn normalized(&self) -> bool {
            false
        }

        fn score_token(&self, _collection: &Collection, _token: &Token) -> Result<TokenScore> {
            Ok(TokenScore {
                attribute_scores: vec![0.5],
                attribute_names: vec!["Any".to_string()],
                score: 0.5,
            })
        }

        fn score_tokens(&self, collection: &Collection, tokens: &[Token]) -> Result<BatchScores> {
            self.batches.fetch_add(1, Ordering::SeqCst);
            tokens
                .iter()
                .map(|token| self.score_token(collection, token))
                .collect()
        }
    }

    #[test]
    fn test_score_collection_default_handler() {
        let engine = RarityEngine::new(RarityConfig::default()).unwrap();
        assert_eq!(engine.handler_name(), "geometric_mean");

        let report = engine.score_collection(&hats_collection()).unwrap();
        assert_eq!(report.tokens.len(), 4);
        assert!(report.normalized);
        assert_relative_eq!(report.token("A").unwrap().score, 0.329877, epsilon = 1e-6);
        assert_relative_eq!(report.token("B").unwrap().score, 0.483312, epsilon = 1e-6);
    }

    #[test]
    fn test_unnormalized_config() {
        let mut config = RarityConfig::default();
        config.scoring.normalized = false;
        let engine = RarityEngine::new(config).unwrap();

        let report = engine.score_collection(&hats_collection()).unwrap();
        assert!(!report.normalized);
        assert_relative_eq!(report.token("A").unwrap().score, 0.353553, epsilon = 1e-6);
    }

    #[test]
    fn test_score_selected_keeps_requested_order() {
        let engine = RarityEngine::new(RarityConfig::default()).unwrap();
        let report = engine
            .score_selected(&hats_collection(), &["C", "A"])
            .unwrap();

        let ids: Vec<&str> = report.tokens.iter().map(|t| t.token_id.as_str()).collect();
        assert_eq!(ids, vec!["C", "A"]);
    }

    #[test]
    fn test_score_selected_unknown_token() {
        let engine = RarityEngine::new(RarityConfig::default()).unwrap();
        let err = engine
            .score_selected(&hats_collection(), &["A", "Z"])
            .unwrap_err();

        assert!(matches!(
            err,
            RarityError::Validation { ref message, .. } if message.contains("'Z'")
        ));
    }

    #[test]
    fn test_score_external_tokens() {
        let engine = RarityEngine::new(RarityConfig::default()).unwrap();
        let outsider = token("new", &[("Background", "Red")]);

        let report = engine
            .score_tokens(&hats_collection(), &[outsider])
            .unwrap();
        assert_eq!(report.tokens[0].token_id, "new");
    }

    #[test]
    fn test_validate_on_load_rejects_inconsistent_collection() {
        let broken = Collection::new(
            "broken",
            counts(&[("Hat", &[("Cap", 7)])]),
            5,
            vec![token("1", &[("Hat", "Cap")])],
        );

        let mut config = RarityConfig::default();
        config.collection.validate_on_load = true;
        let batches = Arc::new(AtomicUsize::new(0));
        let engine = RarityEngine::with_handler(
            config,
            Box::new(FixedScoringHandler {
                batches: Arc::clone(&batches),
            }),
        )
        .unwrap();

        let err = engine.score_collection(&broken).unwrap_err();
        assert!(matches!(err, RarityError::DataIntegrity { .. }));
        assert_eq!(batches.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_custom_handler() {
        let batches = Arc::new(AtomicUsize::new(0));
        let engine = RarityEngine::with_handler(
            RarityConfig::default(),
            Box::new(FixedScoringHandler {
                batches: Arc::clone(&batches),
            }),
        )
        .unwrap();

        let report = engine.score_collection(&hats_collection()).unwrap();
        assert_eq!(report.handler, "fixed");
        // the default config asks for normalization, the handler does not apply it
        assert!(engine.config().scoring.normalized);
        assert!(!report.normalized);
        assert!(report.tokens.iter().all(|t| t.score == 0.5));
        assert_eq!(batches.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_dedicated_thread_pool() {
        let mut config = RarityConfig::default();
        config.performance.max_threads = Some(2);
        config.performance.min_parallel_batch = 1;
        let engine = RarityEngine::new(config).unwrap();

        let shared = RarityEngine::new(RarityConfig::default()).unwrap();
        let collection = hats_collection();
        assert_eq!(
            engine.score_collection(&collection).unwrap(),
            shared.score_collection(&collection).unwrap()
        );
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = RarityConfig::default();
        config.performance.max_threads = Some(0);
        assert!(matches!(
            RarityEngine::new(config),
            Err(RarityError::Config { .. } | RarityError::Validation { .. })
        ));
    }
}
