//! Slider move-choosing agent.
//!
//! Depth-limited negamax with alpha-beta pruning over the rules in
//! `slider_core`. Both roles are searched in one orientation: the board is
//! mapped so the agent's own pieces always move like horizontal pieces.
//!
//! ```text
//! SliderPlayer   holds the live board, maps moves in and out
//!   SearchEngine   negamax over a MoveGenerator, apply/undo in place
//!     Evaluator      leaf scores, bounded by Evaluator::bound
//! ```

pub mod config;
pub mod eval;
pub mod player;
pub mod search;
pub mod stats;

pub use config::{ConfigError, EngineConfig};
pub use eval::{Evaluator, ProgressEvaluator, Score, TerminalPolicy, Weights};
pub use player::SliderPlayer;
pub use search::{commit, SearchEngine, SearchLimits, SearchReport};
pub use stats::SearchStats;
