//! Mapping between the caller's board orientation and the engine's.
//!
//! The search always plays as if its own pieces were horizontal: advancing to
//! the right and leaving the board past the last column. A vertical player's
//! board is reflected across the anti-diagonal, which turns
//!
//! ```text
//!   vertical  Up (exit past row 0)      into  Right (exit past column n-1)
//!   horizontal Right (exit past col n-1) into  Up    (exit past row 0)
//! ```
//!
//! and swaps the two piece kinds, so the reflected position obeys exactly the
//! same rules with the roles exchanged. The reflection is its own inverse.
//!
//! ```text
//!   (row, col)  <->  (n - col - 1, n - row - 1)
//!   Up <-> Right     Down <-> Left     H <-> V
//! ```

use serde::{Deserialize, Serialize};

use crate::{Board, Cell, Direction, Move, Pos, Side};

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub enum CoordinateTransform {
    /// Horizontal players search the board as given.
    Identity,
    /// Vertical players search the anti-diagonal reflection.
    Reflected,
}

impl CoordinateTransform {
    /// The transform that makes `role` the horizontal side internally.
    pub fn for_role(role: Side) -> Self {
        match role {
            Side::Horizontal => CoordinateTransform::Identity,
            Side::Vertical => CoordinateTransform::Reflected,
        }
    }

    #[inline]
    fn pos(self, pos: Pos, n: usize) -> Pos {
        match self {
            CoordinateTransform::Identity => pos,
            CoordinateTransform::Reflected => Pos::new(n - pos.col - 1, n - pos.row - 1),
        }
    }

    #[inline]
    fn direction(self, dir: Direction) -> Direction {
        match self {
            CoordinateTransform::Identity => dir,
            CoordinateTransform::Reflected => match dir {
                Direction::Up => Direction::Right,
                Direction::Right => Direction::Up,
                Direction::Down => Direction::Left,
                Direction::Left => Direction::Down,
            },
        }
    }

    #[inline]
    fn side(self, side: Side) -> Side {
        match self {
            CoordinateTransform::Identity => side,
            CoordinateTransform::Reflected => side.opponent(),
        }
    }

    #[inline]
    fn cell(self, cell: Cell) -> Cell {
        match (self, cell) {
            (CoordinateTransform::Reflected, Cell::Horizontal) => Cell::Vertical,
            (CoordinateTransform::Reflected, Cell::Vertical) => Cell::Horizontal,
            _ => cell,
        }
    }

    pub fn pos_to_internal(self, pos: Pos, n: usize) -> Pos {
        self.pos(pos, n)
    }

    pub fn pos_to_external(self, pos: Pos, n: usize) -> Pos {
        self.pos(pos, n)
    }

    pub fn direction_to_internal(self, dir: Direction) -> Direction {
        self.direction(dir)
    }

    pub fn direction_to_external(self, dir: Direction) -> Direction {
        self.direction(dir)
    }

    pub fn side_to_internal(self, side: Side) -> Side {
        self.side(side)
    }

    pub fn side_to_external(self, side: Side) -> Side {
        self.side(side)
    }

    pub fn cell_to_internal(self, cell: Cell) -> Cell {
        self.cell(cell)
    }

    pub fn cell_to_external(self, cell: Cell) -> Cell {
        self.cell(cell)
    }

    /// Map a caller-facing move on an n×n board into the engine's frame.
    pub fn move_to_internal(self, mov: Move, n: usize) -> Move {
        self.map_move(mov, n)
    }

    /// Map an engine move back into the caller's frame.
    pub fn move_to_external(self, mov: Move, n: usize) -> Move {
        self.map_move(mov, n)
    }

    fn map_move(self, mov: Move, n: usize) -> Move {
        let pos = self.pos(mov.from(), n);
        Move::new(pos.row, pos.col, self.direction(mov.dir))
    }

    /// Build the engine's view of a caller-facing board.
    pub fn board_to_internal(self, board: &Board) -> Board {
        self.map_board(board)
    }

    /// Build the caller-facing view of an engine board.
    pub fn board_to_external(self, board: &Board) -> Board {
        self.map_board(board)
    }

    fn map_board(self, board: &Board) -> Board {
        if self == CoordinateTransform::Identity {
            return board.clone();
        }
        let n = board.dimension();
        board.remap(
            |pos| self.pos(pos, n),
            |cell| self.cell(cell),
            self.side(board.to_move()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MoveGenerator, MoveOrder, Step};

    const REFLECTED: CoordinateTransform = CoordinateTransform::Reflected;

    fn all_moves(n: usize) -> impl Iterator<Item = Move> {
        (0..n * n).flat_map(move |i| {
            Direction::ALL
                .into_iter()
                .map(move |dir| Move::new(i / n, i % n, dir))
        })
    }

    #[test]
    fn test_for_role() {
        assert_eq!(
            CoordinateTransform::for_role(Side::Horizontal),
            CoordinateTransform::Identity
        );
        assert_eq!(CoordinateTransform::for_role(Side::Vertical), REFLECTED);
    }

    #[test]
    fn test_identity_is_identity() {
        let id = CoordinateTransform::Identity;
        for mov in all_moves(3) {
            assert_eq!(id.move_to_internal(mov, 3), mov);
        }
        assert_eq!(id.side_to_internal(Side::Vertical), Side::Vertical);
        assert_eq!(id.cell_to_internal(Cell::Horizontal), Cell::Horizontal);
    }

    #[test]
    fn test_move_roundtrip() {
        for n in 1..=6 {
            for mov in all_moves(n) {
                let internal = REFLECTED.move_to_internal(mov, n);
                assert!(internal.row < n && internal.col < n);
                assert_eq!(REFLECTED.move_to_external(internal, n), mov);
                assert_eq!(REFLECTED.move_to_internal(REFLECTED.move_to_external(mov, n), n), mov);
            }
        }
    }

    #[test]
    fn test_reflected_coordinates() {
        // The anti-diagonal stays put; the top-left corner swaps with the bottom-right
        assert_eq!(REFLECTED.pos_to_internal(Pos::new(3, 0), 4), Pos::new(3, 0));
        assert_eq!(REFLECTED.pos_to_internal(Pos::new(0, 0), 4), Pos::new(3, 3));
        assert_eq!(REFLECTED.pos_to_internal(Pos::new(1, 3), 4), Pos::new(0, 2));
    }

    #[test]
    fn test_advance_directions_become_canonical() {
        assert_eq!(
            REFLECTED.direction_to_internal(Side::Vertical.advance()),
            Side::Horizontal.advance()
        );
        assert_eq!(
            REFLECTED.direction_to_internal(Side::Horizontal.advance()),
            Side::Vertical.advance()
        );
        assert_eq!(
            REFLECTED.direction_to_internal(Side::Vertical.backward()),
            Side::Horizontal.backward()
        );
    }

    #[test]
    fn test_board_reflection_swaps_roles() {
        let external = Board::parse(3, "H + B + V + + + H", Side::Vertical).unwrap();
        let internal = REFLECTED.board_to_internal(&external);

        assert_eq!(internal.to_move(), Side::Horizontal);
        assert_eq!(internal.pieces(Side::Horizontal), external.pieces(Side::Vertical));
        assert_eq!(internal.pieces(Side::Vertical), external.pieces(Side::Horizontal));
        assert_eq!(REFLECTED.board_to_external(&internal), external);

        for pos in external.positions() {
            let cell = external.cell(pos);
            assert_eq!(
                internal.cell(REFLECTED.pos_to_internal(pos, 3)),
                REFLECTED.cell_to_internal(cell)
            );
        }
    }

    #[test]
    fn test_legal_moves_correspond() {
        let external = Board::parse(4, "+ H + V H + B + + V + + + + H V", Side::Vertical).unwrap();
        let internal = REFLECTED.board_to_internal(&external);

        for side in Side::all() {
            let ext_moves = MoveGenerator::new(side, MoveOrder::RowMajor).generate(&external);
            let int_moves = MoveGenerator::new(REFLECTED.side_to_internal(side), MoveOrder::RowMajor)
                .generate(&internal);
            assert_eq!(ext_moves.len(), int_moves.len());

            for t in ext_moves {
                let mapped = REFLECTED.move_to_internal(t.mov, 4);
                let step = internal.step(mapped).unwrap();
                match (t.step, step) {
                    (Step::Exit, Step::Exit) => {}
                    (Step::Slide(a), Step::Slide(b)) => {
                        assert_eq!(REFLECTED.pos_to_internal(a, 4), b)
                    }
                    other => panic!("step mismatch for {}: {:?}", t.mov, other),
                }
            }
        }
    }
}
