//! Lazy move generator.
//!
//! Instead of generating all moves upfront, the generator produces legal
//! transitions one at a time, tracking where it left off. The search can stop
//! pulling moves after a cutoff without paying for the rest of the scan.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Board, Direction, Move, ParseError, Pos, Side, Transition};

/// Fixed traversal order for move generation.
///
/// Order only changes how early alpha-beta finds cutoffs (and which of several
/// equally scored moves is found first), never which moves are legal.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MoveOrder {
    /// Rows top to bottom, columns left to right; directions in
    /// Up, Down, Left, Right order.
    #[default]
    RowMajor,
    /// Pieces nearest their exit edge first; the forced advance before the
    /// two sideways directions.
    AdvanceFirst,
}

impl MoveOrder {
    /// Candidate directions for a side, backward direction excluded.
    fn directions(self, side: Side) -> [Direction; 3] {
        use Direction::*;
        match (self, side) {
            (MoveOrder::RowMajor, Side::Horizontal) => [Up, Down, Right],
            (MoveOrder::RowMajor, Side::Vertical) => [Up, Left, Right],
            (MoveOrder::AdvanceFirst, Side::Horizontal) => [Right, Down, Up],
            (MoveOrder::AdvanceFirst, Side::Vertical) => [Up, Left, Right],
        }
    }

    /// The k-th cell visited on an n×n board.
    fn position(self, side: Side, k: usize, n: usize) -> Pos {
        match (self, side) {
            (MoveOrder::RowMajor, _) => Pos::new(k / n, k % n),
            (MoveOrder::AdvanceFirst, Side::Horizontal) => {
                let k = n * n - 1 - k;
                Pos::new(k / n, k % n)
            }
            (MoveOrder::AdvanceFirst, Side::Vertical) => Pos::new(k / n, n - 1 - k % n),
        }
    }
}

impl fmt::Display for MoveOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveOrder::RowMajor => f.write_str("row-major"),
            MoveOrder::AdvanceFirst => f.write_str("advance-first"),
        }
    }
}

impl FromStr for MoveOrder {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "row-major" | "rowmajor" => Ok(MoveOrder::RowMajor),
            "advance-first" | "advancefirst" => Ok(MoveOrder::AdvanceFirst),
            _ => Err(ParseError::new("move order", s)),
        }
    }
}

/// Lazy move generator that produces legal transitions on demand.
///
/// The board must not change between calls to `next`.
pub struct MoveGenerator {
    /// Side whose pieces are moved
    side: Side,
    /// Traversal order
    order: MoveOrder,
    /// Index of the current cell in traversal order
    cursor: usize,
    /// Next candidate direction for the current cell
    dir_idx: usize,
}

impl MoveGenerator {
    /// Create a generator for one side's moves.
    pub fn new(side: Side, order: MoveOrder) -> Self {
        Self {
            side,
            order,
            cursor: 0,
            dir_idx: 0,
        }
    }

    /// Create a generator for the side to move on `board`.
    pub fn for_board(board: &Board, order: MoveOrder) -> Self {
        Self::new(board.to_move(), order)
    }

    /// Get the next legal transition, or None if exhausted.
    pub fn next(&mut self, board: &Board) -> Option<Transition> {
        let n = board.dimension();
        let piece = self.side.piece();
        let directions = self.order.directions(self.side);

        while self.cursor < n * n {
            let pos = self.order.position(self.side, self.cursor, n);

            if board.cell(pos) == piece {
                while self.dir_idx < directions.len() {
                    let mov = Move::new(pos.row, pos.col, directions[self.dir_idx]);
                    self.dir_idx += 1;

                    if let Ok(step) = board.step(mov) {
                        return Some(Transition { mov, step });
                    }
                }
            }

            self.cursor += 1;
            self.dir_idx = 0;
        }
        None
    }

    /// Collect every remaining transition.
    pub fn generate(&mut self, board: &Board) -> Vec<Transition> {
        let mut moves = Vec::new();
        while let Some(transition) = self.next(board) {
            moves.push(transition);
        }
        moves
    }
}

/// Count legal moves for both sides, indexed by `Side::index`.
///
/// Whose turn it is does not matter; each side's pieces are tallied as if it
/// were to move.
pub fn count_moves(board: &Board) -> [usize; 2] {
    let mut counts = [0; 2];
    for side in Side::all() {
        let mut gen = MoveGenerator::new(side, MoveOrder::RowMajor);
        while gen.next(board).is_some() {
            counts[side.index()] += 1;
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Step;

    fn board(dimension: usize, description: &str) -> Board {
        Board::parse(dimension, description, Side::Horizontal).unwrap()
    }

    fn moves(board: &Board, side: Side, order: MoveOrder) -> Vec<Move> {
        MoveGenerator::new(side, order)
            .generate(board)
            .into_iter()
            .map(|t| t.mov)
            .collect()
    }

    #[test]
    fn test_two_by_two_scenario() {
        let b = board(2, "H + + V");

        let horizontal = moves(&b, Side::Horizontal, MoveOrder::RowMajor);
        assert_eq!(
            horizontal,
            vec![
                Move::new(0, 0, Direction::Down),
                Move::new(0, 0, Direction::Right),
            ]
        );

        let vertical = moves(&b, Side::Vertical, MoveOrder::RowMajor);
        assert_eq!(
            vertical,
            vec![
                Move::new(1, 1, Direction::Up),
                Move::new(1, 1, Direction::Left),
            ]
        );

        assert_eq!(count_moves(&b), [2, 2]);
    }

    #[test]
    fn test_never_generates_backward() {
        let b = board(3, "+ + + + H + + V +");
        for t in MoveGenerator::new(Side::Horizontal, MoveOrder::RowMajor).generate(&b) {
            assert_ne!(t.mov.dir, Direction::Left);
        }
        for t in MoveGenerator::new(Side::Vertical, MoveOrder::AdvanceFirst).generate(&b) {
            assert_ne!(t.mov.dir, Direction::Down);
        }
    }

    #[test]
    fn test_exit_moves_generated() {
        let b = board(2, "V H + +");
        let gen = MoveGenerator::new(Side::Horizontal, MoveOrder::RowMajor).generate(&b);
        assert!(gen.contains(&Transition {
            mov: Move::new(0, 1, Direction::Right),
            step: Step::Exit,
        }));

        let gen = MoveGenerator::new(Side::Vertical, MoveOrder::RowMajor).generate(&b);
        assert!(gen.contains(&Transition {
            mov: Move::new(0, 0, Direction::Up),
            step: Step::Exit,
        }));
    }

    #[test]
    fn test_no_pieces_is_empty() {
        let b = board(2, "H + B +");
        assert!(MoveGenerator::new(Side::Vertical, MoveOrder::RowMajor)
            .generate(&b)
            .is_empty());
    }

    #[test]
    fn test_blocked_directions_skipped() {
        // Horizontal at (1,0) has obstacles above and below
        let b = board(3, "B + + H + + B + +");
        let gen = MoveGenerator::new(Side::Horizontal, MoveOrder::RowMajor).generate(&b);
        assert_eq!(gen.len(), 1);
        assert_eq!(gen[0].mov, Move::new(1, 0, Direction::Right));

        let walled = board(2, "B B H V");
        assert!(MoveGenerator::new(Side::Horizontal, MoveOrder::RowMajor)
            .generate(&walled)
            .is_empty());
    }

    #[test]
    fn test_orders_agree_on_move_set() {
        let b = board(4, "+ H + + H + B + V + V + + + + +");
        for side in Side::all() {
            let mut row_major = moves(&b, side, MoveOrder::RowMajor);
            let mut advance = moves(&b, side, MoveOrder::AdvanceFirst);
            assert_ne!(row_major, advance);
            row_major.sort_by_key(|m| (m.row, m.col, m.dir as u8));
            advance.sort_by_key(|m| (m.row, m.col, m.dir as u8));
            assert_eq!(row_major, advance);
        }
    }

    #[test]
    fn test_advance_first_order() {
        let b = board(3, "H + + + + + H + +");
        let horizontal = moves(&b, Side::Horizontal, MoveOrder::AdvanceFirst);
        // Bottom piece first, forward before sideways
        assert_eq!(horizontal[0], Move::new(2, 0, Direction::Right));
        assert_eq!(horizontal[1], Move::new(2, 0, Direction::Up));
        assert_eq!(horizontal[2], Move::new(0, 0, Direction::Right));
    }

    #[test]
    fn test_generator_resumes() {
        let b = board(2, "H + + V");
        let mut gen = MoveGenerator::for_board(&b, MoveOrder::RowMajor);
        let first = gen.next(&b).unwrap();
        let rest = gen.generate(&b);
        assert_eq!(first.mov, Move::new(0, 0, Direction::Down));
        assert_eq!(rest.len(), 1);
        assert!(gen.next(&b).is_none());
    }

    #[test]
    fn test_move_order_parse() {
        assert_eq!("row-major".parse::<MoveOrder>(), Ok(MoveOrder::RowMajor));
        assert_eq!("Advance-First".parse::<MoveOrder>(), Ok(MoveOrder::AdvanceFirst));
        assert!("random".parse::<MoveOrder>().is_err());
        assert_eq!(MoveOrder::AdvanceFirst.to_string(), "advance-first");
    }
}
