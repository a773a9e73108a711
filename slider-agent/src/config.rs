//! Engine configuration.

use std::fs;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use slider_core::MoveOrder;

use crate::eval::{ProgressEvaluator, TerminalPolicy, Weights};
use crate::search::SearchLimits;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("weights {weights:?} overflow the score range on a {dimension}x{dimension} board")]
    Weights { weights: Weights, dimension: usize },
}

/// Search and evaluation settings for one player.
///
/// Missing fields in a config file fall back to [`EngineConfig::default`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Search depth in plies. With a time limit this is the deepest
    /// iteration attempted.
    pub depth: u32,

    /// Move traversal order; only affects pruning and tie-breaks.
    pub order: MoveOrder,

    pub weights: Weights,

    /// Scoring of finished games.
    pub terminal: TerminalPolicy,

    /// Per-move wall-clock budget in milliseconds (None = unlimited).
    pub time_limit_ms: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::deep()
    }
}

impl EngineConfig {
    /// Deep search with advance-first ordering.
    pub fn deep() -> Self {
        Self {
            depth: 10,
            order: MoveOrder::AdvanceFirst,
            weights: Weights::standard(),
            terminal: TerminalPolicy::Suppress,
            time_limit_ms: None,
        }
    }

    /// Shallow search in row-major order with exit-heavy weights.
    pub fn quick() -> Self {
        Self {
            depth: 4,
            order: MoveOrder::RowMajor,
            weights: Weights::racing(),
            terminal: TerminalPolicy::Suppress,
            time_limit_ms: None,
        }
    }

    /// Read a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn with_depth(mut self, depth: u32) -> Self {
        self.depth = depth;
        self
    }

    pub fn with_order(mut self, order: MoveOrder) -> Self {
        self.order = order;
        self
    }

    pub fn with_weights(mut self, weights: Weights) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_terminal(mut self, terminal: TerminalPolicy) -> Self {
        self.terminal = terminal;
        self
    }

    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = Some(ms);
        self
    }

    /// Check that the weights keep every score on an n×n board inside the
    /// search window.
    pub fn validate(&self, dimension: usize) -> Result<(), ConfigError> {
        match self.evaluator().checked_bound(dimension) {
            Some(_) => Ok(()),
            None => Err(ConfigError::Weights {
                weights: self.weights,
                dimension,
            }),
        }
    }

    pub fn evaluator(&self) -> ProgressEvaluator {
        ProgressEvaluator::new(self.weights, self.terminal)
    }

    /// Search limits for one move, optionally tied to a stop flag.
    pub fn limits(&self, stop: Option<Arc<AtomicBool>>) -> SearchLimits {
        SearchLimits {
            depth: self.depth,
            time_limit: self.time_limit_ms.map(Duration::from_millis),
            stop,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config, EngineConfig::deep());
        assert_eq!(config.depth, 10);
        assert_eq!(config.order, MoveOrder::AdvanceFirst);
        assert_eq!(config.terminal, TerminalPolicy::Suppress);
        assert_eq!(config.time_limit_ms, None);
    }

    #[test]
    fn test_quick_preset() {
        let config = EngineConfig::quick();
        assert_eq!(config.depth, 4);
        assert_eq!(config.order, MoveOrder::RowMajor);
        assert_eq!(config.weights, Weights::racing());
    }

    #[test]
    fn test_builder_pattern() {
        let config = EngineConfig::quick()
            .with_depth(6)
            .with_order(MoveOrder::AdvanceFirst)
            .with_terminal(TerminalPolicy::Saturate)
            .with_time_limit_ms(250);

        assert_eq!(config.depth, 6);
        assert_eq!(config.order, MoveOrder::AdvanceFirst);
        assert_eq!(config.terminal, TerminalPolicy::Saturate);

        let limits = config.limits(None);
        assert_eq!(limits.depth, 6);
        assert_eq!(limits.time_limit, Some(Duration::from_millis(250)));
        assert!(limits.is_interruptible());
    }

    #[test]
    fn test_limits_without_budget_are_fixed_depth() {
        let limits = EngineConfig::deep().limits(None);
        assert!(!limits.is_interruptible());

        let stop = Arc::new(AtomicBool::new(false));
        assert!(EngineConfig::deep().limits(Some(stop)).is_interruptible());
    }

    #[test]
    fn test_serialization() {
        let config = EngineConfig::quick().with_time_limit_ms(500);
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains(r#""order":"row-major""#));
        let deserialized: EngineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, config);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: EngineConfig = serde_json::from_str(r#"{"depth": 3}"#).unwrap();
        assert_eq!(config.depth, 3);
        assert_eq!(config.order, EngineConfig::default().order);
        assert_eq!(config.weights, Weights::standard());
    }

    #[test]
    fn test_load_file() {
        let path = std::env::temp_dir().join("slider_config_test.json");
        fs::write(&path, r#"{"depth": 2, "order": "advance-first", "terminal": "saturate"}"#).unwrap();

        let config = EngineConfig::load(&path).unwrap();
        assert_eq!(config.depth, 2);
        assert_eq!(config.terminal, TerminalPolicy::Saturate);

        fs::remove_file(&path).ok();
    }

    #[test]
    fn test_load_errors() {
        let missing = std::env::temp_dir().join("slider_config_missing.json");
        assert!(matches!(EngineConfig::load(&missing), Err(ConfigError::Io(_))));

        let path = std::env::temp_dir().join("slider_config_bad.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(EngineConfig::load(&path), Err(ConfigError::Json(_))));
        fs::remove_file(&path).ok();
    }

    #[test]
    fn test_load_oversized_weights() {
        let path = std::env::temp_dir().join("slider_config_weights.json");
        fs::write(
            &path,
            r#"{"weights": {"advance": 100000000, "exit": 1, "blocked": 0}}"#,
        )
        .unwrap();

        let config = EngineConfig::load(&path).unwrap();
        fs::remove_file(&path).ok();

        assert!(config.validate(2).is_ok());
        let err = config.validate(5).unwrap_err();
        assert!(matches!(err, ConfigError::Weights { dimension: 5, .. }), "{err}");
        assert!(EngineConfig::deep().validate(64).is_ok());
    }
}
