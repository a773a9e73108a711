//! Slider game logic with a flat row-major board representation.
//!
//! # Board Layout
//!
//! ```text
//! Cells are stored row-major, row 0 first (the first row of a description):
//!
//!   (0,0)   (0,1)   ... (0,n-1)
//!   (1,0)   (1,1)   ... (1,n-1)
//!   ...
//!   (n-1,0)         ... (n-1,n-1)
//!
//! Symbols: '+' blank, 'B' obstacle, 'H' horizontal piece, 'V' vertical piece
//! ```
//!
//! # Movement
//!
//! ```text
//! Horizontal: Up, Down, Right    forced advance Right, exits past column n-1
//! Vertical:   Up, Left, Right    forced advance Up,    exits past row 0
//! ```
//!
//! A piece slides one cell into a blank neighbour, or leaves the board when it
//! advances from its exit edge. [`Board::step`] resolves a move into a [`Step`]
//! once; [`Board::apply`] and [`Board::undo`] consume that same step, so there
//! is no off-board coordinate arithmetic anywhere else.
//!
//! A side wins by moving all of its pieces off the board. A position where
//! either side has no pieces left is terminal.

pub mod error;
pub mod movegen;
pub mod transform;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use error::{
    BoardFormatError, IllegalMoveError, ParseError, SliderError, SliderResult,
};
pub use movegen::{count_moves, MoveGenerator, MoveOrder};
pub use transform::CoordinateTransform;

/// Player identifier. Each side owns one piece kind.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub enum Side {
    Horizontal,
    Vertical,
}

impl Side {
    /// Get the opponent side.
    #[inline]
    pub fn opponent(self) -> Side {
        match self {
            Side::Horizontal => Side::Vertical,
            Side::Vertical => Side::Horizontal,
        }
    }

    /// The piece kind this side moves.
    #[inline]
    pub fn piece(self) -> Cell {
        match self {
            Side::Horizontal => Cell::Horizontal,
            Side::Vertical => Cell::Vertical,
        }
    }

    /// Forced-advance direction; the only direction that may leave the board.
    #[inline]
    pub fn advance(self) -> Direction {
        match self {
            Side::Horizontal => Direction::Right,
            Side::Vertical => Direction::Up,
        }
    }

    /// The direction this side's pieces may never move.
    #[inline]
    pub fn backward(self) -> Direction {
        self.advance().opposite()
    }

    /// Stable index (0 or 1) for per-side arrays.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Side::Horizontal => 0,
            Side::Vertical => 1,
        }
    }

    #[inline]
    pub fn symbol(self) -> char {
        self.piece().symbol()
    }

    pub fn from_symbol(c: char) -> Option<Side> {
        match c.to_ascii_uppercase() {
            'H' => Some(Side::Horizontal),
            'V' => Some(Side::Vertical),
            _ => None,
        }
    }

    /// Both sides, Horizontal first.
    pub fn all() -> impl Iterator<Item = Side> {
        [Side::Horizontal, Side::Vertical].into_iter()
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Horizontal => f.write_str("Horizontal"),
            Side::Vertical => f.write_str("Vertical"),
        }
    }
}

impl FromStr for Side {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let mut chars = trimmed.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return Side::from_symbol(c).ok_or_else(|| ParseError::new("side", s));
        }
        match trimmed.to_ascii_lowercase().as_str() {
            "horizontal" => Ok(Side::Horizontal),
            "vertical" => Ok(Side::Vertical),
            _ => Err(ParseError::new("side", s)),
        }
    }
}

/// Contents of one board cell.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Cell {
    Blank = 0,
    Obstacle = 1,
    Horizontal = 2,
    Vertical = 3,
}

impl Cell {
    pub fn from_symbol(c: char) -> Option<Cell> {
        match c {
            '+' => Some(Cell::Blank),
            'B' => Some(Cell::Obstacle),
            'H' => Some(Cell::Horizontal),
            'V' => Some(Cell::Vertical),
            _ => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Cell::Blank => '+',
            Cell::Obstacle => 'B',
            Cell::Horizontal => 'H',
            Cell::Vertical => 'V',
        }
    }

    /// The side owning this cell's piece, if it holds one.
    #[inline]
    pub fn owner(self) -> Option<Side> {
        match self {
            Cell::Horizontal => Some(Side::Horizontal),
            Cell::Vertical => Some(Side::Vertical),
            Cell::Blank | Cell::Obstacle => None,
        }
    }
}

/// Direction of a move. Up is toward row 0, Left toward column 0.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// All directions in the order Up, Down, Left, Right.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    #[inline]
    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Direction::Up => "UP",
            Direction::Down => "DOWN",
            Direction::Left => "LEFT",
            Direction::Right => "RIGHT",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Direction {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "UP" | "U" => Ok(Direction::Up),
            "DOWN" | "D" => Ok(Direction::Down),
            "LEFT" | "L" => Ok(Direction::Left),
            "RIGHT" | "R" => Ok(Direction::Right),
            _ => Err(ParseError::new("direction", s)),
        }
    }
}

/// Cell coordinates, 0-indexed from the top-left corner.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub row: usize,
    pub col: usize,
}

impl Pos {
    #[inline]
    pub fn new(row: usize, col: usize) -> Pos {
        Pos { row, col }
    }

    /// The adjacent cell in `dir`, or None if it lies outside an n×n board.
    #[inline]
    pub fn neighbour(self, dir: Direction, n: usize) -> Option<Pos> {
        match dir {
            Direction::Up => self.row.checked_sub(1).map(|row| Pos::new(row, self.col)),
            Direction::Down => (self.row + 1 < n).then(|| Pos::new(self.row + 1, self.col)),
            Direction::Left => self.col.checked_sub(1).map(|col| Pos::new(self.row, col)),
            Direction::Right => (self.col + 1 < n).then(|| Pos::new(self.row, self.col + 1)),
        }
    }
}

/// A move of the piece at (row, col) one cell in `dir`.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub struct Move {
    pub row: usize,
    pub col: usize,
    pub dir: Direction,
}

impl Move {
    #[inline]
    pub fn new(row: usize, col: usize, dir: Direction) -> Move {
        Move { row, col, dir }
    }

    /// The source cell.
    #[inline]
    pub fn from(&self) -> Pos {
        Pos::new(self.row, self.col)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.row, self.col, self.dir)
    }
}

impl FromStr for Move {
    type Err = ParseError;

    /// Parse `row col DIRECTION`; commas may separate the fields.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = s
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|field| !field.is_empty())
            .collect();
        let [row, col, dir] = fields.as_slice() else {
            return Err(ParseError::new("move", s));
        };
        let row = row.parse().map_err(|_| ParseError::new("move", s))?;
        let col = col.parse().map_err(|_| ParseError::new("move", s))?;
        let dir = dir.parse().map_err(|_| ParseError::new("move", s))?;
        Ok(Move::new(row, col, dir))
    }
}

/// Where a legal move takes its piece.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum Step {
    /// Onto the given blank neighbour.
    Slide(Pos),
    /// Off the board across the piece's exit edge.
    Exit,
}

/// A move together with its resolved outcome.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub struct Transition {
    pub mov: Move,
    pub step: Step,
}

/// Undo information for backtracking during search.
#[derive(Clone, Copy, Debug)]
pub struct Undo {
    /// The transition that was applied.
    pub transition: Transition,
    /// The piece that moved (restored at the source on undo).
    pub piece: Cell,
}

/// An n×n Slider board plus the side to move.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Board {
    dimension: usize,
    cells: Vec<Cell>,
    to_move: Side,
    /// Cached piece counts, indexed by `Side::index`.
    pieces: [usize; 2],
}

impl Board {
    /// Create a board from row-major cells.
    pub fn new(dimension: usize, cells: Vec<Cell>, to_move: Side) -> Result<Board, BoardFormatError> {
        let expected = Self::cell_count(dimension)?;
        if cells.len() < expected {
            return Err(BoardFormatError::TooFewCells {
                expected,
                found: cells.len(),
            });
        }
        if cells.len() > expected {
            return Err(BoardFormatError::TooManyCells { expected });
        }
        Ok(Self::from_cells(dimension, cells, to_move))
    }

    /// Number of cells on an n×n board.
    fn cell_count(dimension: usize) -> Result<usize, BoardFormatError> {
        if dimension == 0 {
            return Err(BoardFormatError::ZeroDimension);
        }
        dimension
            .checked_mul(dimension)
            .ok_or(BoardFormatError::TooLarge { dimension })
    }

    fn from_cells(dimension: usize, cells: Vec<Cell>, to_move: Side) -> Board {
        let mut pieces = [0; 2];
        for owner in cells.iter().filter_map(|cell| cell.owner()) {
            pieces[owner.index()] += 1;
        }
        Board {
            dimension,
            cells,
            to_move,
            pieces,
        }
    }

    /// Parse `dimension²` cell symbols in row-major order.
    ///
    /// Whitespace between symbols is optional and ignored. Any other
    /// character outside `+ B H V` is rejected, as is a description with too
    /// few or too many cells.
    pub fn parse(dimension: usize, description: &str, to_move: Side) -> Result<Board, BoardFormatError> {
        let expected = Self::cell_count(dimension)?;
        // The description may be far shorter than the dimension claims
        let mut cells = Vec::with_capacity(expected.min(description.len()));

        for symbol in description.chars().filter(|c| !c.is_whitespace()) {
            if cells.len() == expected {
                return Err(BoardFormatError::TooManyCells { expected });
            }
            let cell = Cell::from_symbol(symbol).ok_or(BoardFormatError::UnknownSymbol {
                symbol,
                index: cells.len(),
            })?;
            cells.push(cell);
        }

        Board::new(dimension, cells, to_move)
    }

    /// Parse a dimension followed by the cells, e.g. `"2\nH +\n+ V"`.
    pub fn parse_sized(text: &str, to_move: Side) -> Result<Board, BoardFormatError> {
        let text = text.trim_start();
        let split = text.find(char::is_whitespace).unwrap_or(text.len());
        let (head, rest) = text.split_at(split);
        let dimension = head
            .parse::<usize>()
            .map_err(|_| BoardFormatError::BadDimension(head.to_string()))?;
        Board::parse(dimension, rest, to_move)
    }

    #[inline]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Get the side to move.
    #[inline]
    pub fn to_move(&self) -> Side {
        self.to_move
    }

    /// Return this board with a different side to move.
    pub fn with_to_move(mut self, side: Side) -> Board {
        self.to_move = side;
        self
    }

    /// Switch the side to move.
    #[inline]
    pub fn switch_side(&mut self) {
        self.to_move = self.to_move.opponent();
    }

    /// Pass the turn without moving (the side to move has no legal move).
    #[inline]
    pub fn pass(&mut self) {
        self.switch_side();
    }

    #[inline]
    pub fn contains(&self, pos: Pos) -> bool {
        pos.row < self.dimension && pos.col < self.dimension
    }

    #[inline]
    fn index(&self, pos: Pos) -> usize {
        assert!(self.contains(pos), "{:?} outside {}x{}", pos, self.dimension, self.dimension);
        pos.row * self.dimension + pos.col
    }

    /// Get the cell at a position on the board.
    #[inline]
    pub fn cell(&self, pos: Pos) -> Cell {
        self.cells[self.index(pos)]
    }

    /// Get the cell at a position, or None off the board.
    pub fn get(&self, pos: Pos) -> Option<Cell> {
        self.contains(pos).then(|| self.cell(pos))
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Iterate over all positions in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Pos> {
        let n = self.dimension;
        (0..n * n).map(move |i| Pos::new(i / n, i % n))
    }

    /// Number of pieces a side still has on the board.
    #[inline]
    pub fn pieces(&self, side: Side) -> usize {
        self.pieces[side.index()]
    }

    /// True once either side has no pieces left.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.pieces[0] == 0 || self.pieces[1] == 0
    }

    /// The side that has moved all of its pieces off, if exactly one has.
    pub fn winner(&self) -> Option<Side> {
        match (self.pieces(Side::Horizontal), self.pieces(Side::Vertical)) {
            (0, 0) => None,
            (0, _) => Some(Side::Horizontal),
            (_, 0) => Some(Side::Vertical),
            _ => None,
        }
    }

    /// Build a board by relocating every cell; used by coordinate transforms.
    pub(crate) fn remap(
        &self,
        pos_map: impl Fn(Pos) -> Pos,
        cell_map: impl Fn(Cell) -> Cell,
        to_move: Side,
    ) -> Board {
        let mut cells = vec![Cell::Blank; self.cells.len()];
        for pos in self.positions() {
            let target = pos_map(pos);
            cells[self.index(target)] = cell_map(self.cell(pos));
        }
        Board::from_cells(self.dimension, cells, to_move)
    }

    // ========== Legality ==========

    /// Resolve where a move takes its piece, regardless of whose turn it is.
    ///
    /// Legal moves are a slide into a blank neighbour in any direction except
    /// the piece's backward one, or an exit in the forced-advance direction
    /// from the exit edge.
    pub fn step(&self, mov: Move) -> Result<Step, IllegalMoveError> {
        let from = mov.from();
        if !self.contains(from) {
            return Err(IllegalMoveError::OutOfBounds { mov });
        }
        let side = self
            .cell(from)
            .owner()
            .ok_or(IllegalMoveError::NoPiece { mov })?;
        if mov.dir == side.backward() {
            return Err(IllegalMoveError::Backward {
                mov,
                side,
                dir: mov.dir,
            });
        }

        match from.neighbour(mov.dir, self.dimension) {
            Some(to) if self.cell(to) == Cell::Blank => Ok(Step::Slide(to)),
            Some(_) => Err(IllegalMoveError::Blocked { mov }),
            None if mov.dir == side.advance() => Ok(Step::Exit),
            None => Err(IllegalMoveError::OffBoard { mov }),
        }
    }

    /// Check whether the piece at the move's source may make this move.
    #[inline]
    pub fn can_move(&self, mov: Move) -> bool {
        self.step(mov).is_ok()
    }

    /// Validate a move for the side to move.
    pub fn check(&self, mov: Move) -> Result<Transition, IllegalMoveError> {
        if let Some(owner) = self.get(mov.from()).and_then(Cell::owner) {
            if owner != self.to_move {
                return Err(IllegalMoveError::NotYourPiece {
                    mov,
                    owner,
                    to_move: self.to_move,
                });
            }
        }
        let step = self.step(mov)?;
        Ok(Transition { mov, step })
    }

    // ========== Apply & Undo ==========

    /// Apply a checked transition, returning undo information.
    ///
    /// This mutates the board in place and switches the side to move.
    /// The transition must come from [`Board::check`] or a [`MoveGenerator`]
    /// run against this exact position.
    pub fn apply(&mut self, transition: Transition) -> Undo {
        let from = self.index(transition.mov.from());
        let piece = self.cells[from];
        debug_assert!(piece.owner().is_some(), "no piece to move at {:?}", transition.mov);

        self.cells[from] = Cell::Blank;
        match transition.step {
            Step::Slide(to) => {
                let to = self.index(to);
                debug_assert_eq!(self.cells[to], Cell::Blank);
                self.cells[to] = piece;
            }
            Step::Exit => {
                if let Some(owner) = piece.owner() {
                    self.pieces[owner.index()] -= 1;
                }
            }
        }
        self.switch_side();

        Undo { transition, piece }
    }

    /// Undo a move, restoring the board to its previous state.
    ///
    /// This is the inverse of `apply()`. The moved piece is restored from the
    /// saved occupant, so exits are undone without replaying any move.
    pub fn undo(&mut self, undo: &Undo) {
        self.switch_side();

        match undo.transition.step {
            Step::Slide(to) => {
                let to = self.index(to);
                self.cells[to] = Cell::Blank;
            }
            Step::Exit => {
                if let Some(owner) = undo.piece.owner() {
                    self.pieces[owner.index()] += 1;
                }
            }
        }
        let from = self.index(undo.transition.mov.from());
        self.cells[from] = undo.piece;
    }

    /// Validate and apply a move for the side to move.
    ///
    /// On error the board is left untouched.
    pub fn play(&mut self, mov: Move) -> Result<Undo, IllegalMoveError> {
        let transition = self.check(mov)?;
        Ok(self.apply(transition))
    }

    /// All legal transitions for the side to move, in row-major order.
    pub fn legal_moves(&self) -> Vec<Transition> {
        MoveGenerator::new(self.to_move, MoveOrder::RowMajor).generate(self)
    }
}

impl fmt::Display for Board {
    /// One row per line, symbols separated by spaces.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.dimension) {
            let line: Vec<String> = row.iter().map(|cell| cell.symbol().to_string()).collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}
