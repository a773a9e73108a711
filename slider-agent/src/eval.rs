//! Static evaluation of Slider positions.
//!
//! Scores are always from the point of view of one side: positive is good for
//! `perspective`, and swapping the perspective negates the score.

use serde::{Deserialize, Serialize};

use slider_core::{Board, Cell, Side};

/// Evaluation score. Search windows stay within `±bound(n)`.
pub type Score = i32;

/// Heuristic position evaluation used at search leaves.
pub trait Evaluator {
    /// Score `board` for `perspective`. Must stay strictly inside
    /// `±self.bound(board.dimension())`.
    fn evaluate(&self, board: &Board, perspective: Side) -> Score;

    /// Window bound for an n×n board, used as ±infinity by the search.
    fn bound(&self, dimension: usize) -> Score;
}

/// Term weights for [`ProgressEvaluator`]. All weights are taken as magnitudes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Weights {
    /// Per cell travelled toward the exit edge
    pub advance: Score,
    /// Per piece already off the board, scaled by the board size
    pub exit: Score,
    /// Penalty for a piece whose forward cell is occupied
    pub blocked: Score,
}

impl Weights {
    pub fn standard() -> Self {
        Self {
            advance: 1,
            exit: 1,
            blocked: 1,
        }
    }

    /// Exits count double and blocking is ignored.
    pub fn racing() -> Self {
        Self {
            advance: 1,
            exit: 2,
            blocked: 0,
        }
    }
}

impl Default for Weights {
    fn default() -> Self {
        Self::standard()
    }
}

/// How positions where a side has no pieces left are scored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TerminalPolicy {
    /// Stay on the heuristic scale; a side's progress stops counting once
    /// the other side has cleared its pieces.
    #[default]
    Suppress,
    /// Score a finished game as `±(bound - 1)`, or 0 if both sides are empty.
    Saturate,
}

/// Progress-and-exits heuristic.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressEvaluator {
    pub weights: Weights,
    pub terminal: TerminalPolicy,
}

impl ProgressEvaluator {
    pub fn new(weights: Weights, terminal: TerminalPolicy) -> Self {
        Self { weights, terminal }
    }

    /// Distance travelled minus blocking penalties for one side's pieces.
    fn progress(&self, board: &Board, side: Side) -> i64 {
        let n = board.dimension();
        let piece = side.piece();
        let advance = i64::from(self.weights.advance.unsigned_abs());
        let blocked = i64::from(self.weights.blocked.unsigned_abs());

        let mut total: i64 = 0;
        for pos in board.positions().filter(|&pos| board.cell(pos) == piece) {
            let travelled = match side {
                Side::Horizontal => pos.col,
                Side::Vertical => n - 1 - pos.row,
            };
            total = total.saturating_add(advance.saturating_mul(travelled as i64));

            if let Some(ahead) = pos.neighbour(side.advance(), n) {
                if board.cell(ahead) != Cell::Blank {
                    total = total.saturating_sub(blocked);
                }
            }
        }
        total
    }

    /// Window bound for an n×n board, or `None` if these weights push it
    /// past what a [`Score`] can hold.
    pub fn checked_bound(&self, dimension: usize) -> Option<Score> {
        let n = i64::try_from(dimension).ok()?;
        let cells = n.checked_mul(n)?;
        let advance = i64::from(self.weights.advance.unsigned_abs());
        let exit = i64::from(self.weights.exit.unsigned_abs());
        let blocked = i64::from(self.weights.blocked.unsigned_abs());

        let progress = advance.checked_mul(n - 1)?.checked_add(blocked)?;
        let bound = cells
            .checked_mul(2)?
            .checked_mul(progress)?
            .checked_add(exit.checked_mul(n)?.checked_mul(cells)?)?
            .checked_add(2)?;
        Score::try_from(bound).ok()
    }
}

impl Evaluator for ProgressEvaluator {
    fn evaluate(&self, board: &Board, perspective: Side) -> Score {
        let opponent = perspective.opponent();
        let win = self.bound(board.dimension()) - 1;

        if self.terminal == TerminalPolicy::Saturate && board.is_terminal() {
            return match board.winner() {
                Some(side) if side == perspective => win,
                Some(_) => -win,
                None => 0,
            };
        }

        let own = board.pieces(perspective);
        let theirs = board.pieces(opponent);

        // Once a side is out, the other side's progress no longer matters
        let own_progress = if theirs == 0 {
            0
        } else {
            self.progress(board, perspective)
        };
        let their_progress = if own == 0 {
            0
        } else {
            self.progress(board, opponent)
        };

        let n = board.dimension() as i64;
        let exit = i64::from(self.weights.exit.unsigned_abs());
        let exits = exit
            .saturating_mul(n)
            .saturating_mul(theirs as i64 - own as i64);

        // Clamping only bites for weights that fail `checked_bound`
        let score = own_progress
            .saturating_sub(their_progress)
            .saturating_add(exits)
            .clamp(-i64::from(win), i64::from(win));
        score as Score
    }

    /// Falls back to `Score::MAX` when [`ProgressEvaluator::checked_bound`]
    /// overflows; scores are then clamped inside it.
    fn bound(&self, dimension: usize) -> Score {
        self.checked_bound(dimension).unwrap_or(Score::MAX)
    }
}
