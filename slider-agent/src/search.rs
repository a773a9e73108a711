//! Negamax search with alpha-beta pruning.
//!
//! Scores are always from the point of view of the side to move. The search
//! mutates the board in place with apply/undo pairs and leaves it exactly as
//! it found it; only [`commit`] changes the board for good.
//!
//! ```text
//! leaf    depth 0 or game over   evaluate(board, side to move)
//! pass    no legal move          -negamax(depth - 1, -beta, -alpha) after passing
//! branch  otherwise              max over moves of -negamax(child), fail-hard
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use slider_core::{Board, Move, MoveGenerator, MoveOrder, Transition};

use crate::eval::{Evaluator, ProgressEvaluator, Score};
use crate::stats::SearchStats;

/// The deadline is only checked every this many nodes.
const TIME_CHECK_INTERVAL: u64 = 1024;

/// How far and how long to search.
#[derive(Clone, Debug, Default)]
pub struct SearchLimits {
    /// Maximum depth in plies
    pub depth: u32,
    /// Wall-clock budget for the whole search
    pub time_limit: Option<Duration>,
    /// Set from another thread to abandon the running iteration
    pub stop: Option<Arc<AtomicBool>>,
}

impl SearchLimits {
    /// Plain fixed-depth search.
    pub fn depth(depth: u32) -> Self {
        Self {
            depth,
            ..Default::default()
        }
    }

    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    pub fn with_stop(mut self, stop: Arc<AtomicBool>) -> Self {
        self.stop = Some(stop);
        self
    }

    /// True if the search may be cut short, which switches it to
    /// iterative deepening.
    pub fn is_interruptible(&self) -> bool {
        self.time_limit.is_some() || self.stop.is_some()
    }
}

/// Result of a root search.
#[derive(Clone, Debug)]
pub struct SearchReport {
    /// Best root move, or None for a pass or a finished game
    pub best: Option<Transition>,
    /// Score of `best` for the side to move
    pub score: Score,
    /// Depth of the iteration the result comes from (0 if none completed)
    pub depth: u32,
    /// True if an iteration was abandoned
    pub aborted: bool,
    pub stats: SearchStats,
}

/// Depth-limited negamax engine over a pluggable evaluator.
pub struct SearchEngine<E: Evaluator = ProgressEvaluator> {
    evaluator: E,
    order: MoveOrder,
    /// Statistics for the current or most recent search
    pub stats: SearchStats,
    /// Best root move of the last completed `negamax` call
    root_best: Option<Transition>,
    stop: Option<Arc<AtomicBool>>,
    deadline: Option<Instant>,
    aborted: bool,
}

impl<E: Evaluator> SearchEngine<E> {
    pub fn new(evaluator: E, order: MoveOrder) -> Self {
        Self {
            evaluator,
            order,
            stats: SearchStats::new(),
            root_best: None,
            stop: None,
            deadline: None,
            aborted: false,
        }
    }

    pub fn evaluator(&self) -> &E {
        &self.evaluator
    }

    pub fn order(&self) -> MoveOrder {
        self.order
    }

    /// Best root move found by the last `negamax` call.
    pub fn root_best(&self) -> Option<Transition> {
        self.root_best
    }

    /// Search `board` to `depth` plies within the window `(alpha, beta)`.
    ///
    /// Returns the fail-hard score for the side to move and records the best
    /// root move, readable through [`SearchEngine::root_best`]. The board is
    /// restored before returning.
    pub fn negamax(&mut self, board: &mut Board, depth: u32, alpha: Score, beta: Score) -> Score {
        self.root_best = None;
        self.aborted = false;
        self.node(board, depth, alpha, beta, true)
    }

    fn node(
        &mut self,
        board: &mut Board,
        depth: u32,
        mut alpha: Score,
        beta: Score,
        root: bool,
    ) -> Score {
        if self.should_abort() {
            self.aborted = true;
            return alpha;
        }
        self.stats.nodes += 1;

        if depth == 0 || board.is_terminal() {
            self.stats.leaves += 1;
            return self.evaluator.evaluate(board, board.to_move());
        }

        let mut gen = MoveGenerator::for_board(board, self.order);
        let Some(first) = gen.next(board) else {
            self.stats.passes += 1;
            board.pass();
            let score = -self.node(board, depth - 1, -beta, -alpha, false);
            board.pass();
            return score;
        };

        let mut next = Some(first);
        while let Some(transition) = next {
            let undo = board.apply(transition);
            let score = -self.node(board, depth - 1, -beta, -alpha, false);
            board.undo(&undo);

            if self.aborted {
                return alpha;
            }

            if score > alpha {
                alpha = score;
                if root {
                    self.root_best = Some(transition);
                }
            }
            if alpha >= beta {
                self.stats.cutoffs += 1;
                break;
            }
            next = gen.next(board);
        }

        alpha
    }

    fn should_abort(&self) -> bool {
        if self.aborted {
            return true;
        }
        if let Some(stop) = &self.stop {
            if stop.load(Ordering::Relaxed) {
                return true;
            }
        }
        match self.deadline {
            Some(deadline) if self.stats.nodes % TIME_CHECK_INTERVAL == 0 => {
                Instant::now() >= deadline
            }
            _ => false,
        }
    }

    /// Search from the root with a full `±bound` window.
    ///
    /// Without a time limit or stop flag this is a single fixed-depth search.
    /// Otherwise depths 1 through `limits.depth` are searched in turn and the
    /// last completed iteration is reported; if none completes, the first
    /// legal move in generator order is returned.
    pub fn search(&mut self, board: &mut Board, limits: &SearchLimits) -> SearchReport {
        let interruptible = limits.is_interruptible() && limits.depth > 0;
        self.stats = SearchStats::new();
        self.aborted = false;
        if interruptible {
            self.stop = limits.stop.clone();
            self.deadline = limits.time_limit.map(|limit| Instant::now() + limit);
        } else {
            self.stop = None;
            self.deadline = None;
        }

        let bound = self.evaluator.bound(board.dimension());

        if !interruptible {
            let score = self.negamax(board, limits.depth, -bound, bound);
            self.stats.completed_depth = limits.depth;
            return self.report(self.root_best, score, limits.depth);
        }

        let mut completed: Option<(Option<Transition>, Score, u32)> = None;
        for depth in 1..=limits.depth {
            let score = self.negamax(board, depth, -bound, bound);
            if self.aborted {
                warn!(depth, nodes = self.stats.nodes, "search interrupted");
                break;
            }

            self.stats.completed_depth = depth;
            debug!(
                depth,
                score,
                best = ?self.root_best.map(|t| t.mov),
                nodes = self.stats.nodes,
                "iteration complete"
            );
            completed = Some((self.root_best, score, depth));

            if board.is_terminal() {
                break;
            }
        }

        match completed {
            Some((best, score, depth)) => self.report(best, score, depth),
            None => {
                let best = MoveGenerator::for_board(board, self.order).next(board);
                let score = self.evaluator.evaluate(board, board.to_move());
                self.report(best, score, 0)
            }
        }
    }

    fn report(&self, best: Option<Transition>, score: Score, depth: u32) -> SearchReport {
        self.stats.log_summary();
        SearchReport {
            best,
            score,
            depth,
            aborted: self.aborted,
            stats: self.stats.clone(),
        }
    }

    /// Fixed-depth search that commits its result to the board.
    pub fn best_move(&mut self, board: &mut Board, depth: u32) -> Option<Move> {
        let report = self.search(board, &SearchLimits::depth(depth));
        commit(board, report.best)
    }
}

/// Apply the chosen move to the board, or pass if there is none.
///
/// The side to move is toggled either way.
pub fn commit(board: &mut Board, best: Option<Transition>) -> Option<Move> {
    match best {
        Some(transition) => {
            board.apply(transition);
            Some(transition.mov)
        }
        None => {
            board.pass();
            None
        }
    }
}
