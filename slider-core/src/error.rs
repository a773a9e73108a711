//! Error types for board parsing and move validation.

use thiserror::Error;

use crate::{Direction, Move, Side};

/// A board description that does not describe an n×n Slider board.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BoardFormatError {
    #[error("board dimension must be at least 1")]
    ZeroDimension,

    #[error("invalid board dimension: {0:?}")]
    BadDimension(String),

    #[error("board dimension {dimension} is too large")]
    TooLarge { dimension: usize },

    #[error("unknown cell symbol {symbol:?} at cell {index}")]
    UnknownSymbol { symbol: char, index: usize },

    #[error("board description has {found} cells, expected {expected}")]
    TooFewCells { expected: usize, found: usize },

    #[error("board description has more than {expected} cells")]
    TooManyCells { expected: usize },
}

/// A move that does not name a legal transition on the current board.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IllegalMoveError {
    #[error("{mov}: source cell is outside the board")]
    OutOfBounds { mov: Move },

    #[error("{mov}: no piece at source cell")]
    NoPiece { mov: Move },

    #[error("{mov}: piece belongs to {owner}, but {to_move} is to move")]
    NotYourPiece { mov: Move, owner: Side, to_move: Side },

    #[error("{mov}: {side} pieces never move {dir}")]
    Backward { mov: Move, side: Side, dir: Direction },

    #[error("{mov}: destination is occupied")]
    Blocked { mov: Move },

    #[error("{mov}: only the forced-advance direction may leave the board")]
    OffBoard { mov: Move },

    #[error("it is {to_move}'s turn")]
    OutOfTurn { to_move: Side },
}

/// Any error raised by the game rules.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SliderError {
    #[error("bad board description: {0}")]
    BoardFormat(#[from] BoardFormatError),

    #[error("illegal move: {0}")]
    IllegalMove(#[from] IllegalMoveError),
}

/// Result alias for rule operations.
pub type SliderResult<T> = Result<T, SliderError>;

/// Text that does not name a side, direction, move or move order.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("cannot parse {what} from {input:?}")]
pub struct ParseError {
    pub what: &'static str,
    pub input: String,
}

impl ParseError {
    pub(crate) fn new(what: &'static str, input: &str) -> Self {
        Self {
            what,
            input: input.to_string(),
        }
    }
}
