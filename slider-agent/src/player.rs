//! The move-choosing player.
//!
//! A player owns the one live board for a game, kept in the engine's
//! orientation where its own pieces are horizontal. Moves cross into and out
//! of that frame exactly once, here.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use tracing::{debug, info};

use slider_core::{Board, CoordinateTransform, IllegalMoveError, Move, Side, SliderResult};

use crate::config::EngineConfig;
use crate::eval::{Evaluator, ProgressEvaluator};
use crate::search::{commit, SearchEngine};

pub struct SliderPlayer<E: Evaluator = ProgressEvaluator> {
    role: Side,
    transform: CoordinateTransform,
    /// Live board in the engine's frame
    board: Board,
    engine: SearchEngine<E>,
    config: EngineConfig,
    stop: Option<Arc<AtomicBool>>,
}

impl SliderPlayer<ProgressEvaluator> {
    /// Start a game as `role` with the default engine settings.
    ///
    /// `description` holds `dimension²` cell symbols in row-major order.
    /// Horizontal moves first.
    pub fn init(dimension: usize, description: &str, role: Side) -> SliderResult<Self> {
        Self::with_config(dimension, description, role, EngineConfig::default())
    }

    pub fn with_config(
        dimension: usize,
        description: &str,
        role: Side,
        config: EngineConfig,
    ) -> SliderResult<Self> {
        let evaluator = config.evaluator();
        Self::with_evaluator(dimension, description, role, config, evaluator)
    }
}

impl<E: Evaluator> SliderPlayer<E> {
    /// Start a game with a custom evaluator. The config's weights and
    /// terminal policy are ignored.
    pub fn with_evaluator(
        dimension: usize,
        description: &str,
        role: Side,
        config: EngineConfig,
        evaluator: E,
    ) -> SliderResult<Self> {
        let external = Board::parse(dimension, description, Side::Horizontal)?;
        let transform = CoordinateTransform::for_role(role);

        Ok(Self {
            role,
            transform,
            board: transform.board_to_internal(&external),
            engine: SearchEngine::new(evaluator, config.order),
            config,
            stop: None,
        })
    }

    /// Hand the first move to `side` instead of Horizontal.
    pub fn with_first_mover(mut self, side: Side) -> Self {
        self.board = self.board.with_to_move(self.transform.side_to_internal(side));
        self
    }

    pub fn role(&self) -> Side {
        self.role
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn engine(&self) -> &SearchEngine<E> {
        &self.engine
    }

    /// Abandon searches early once `stop` is set.
    pub fn set_stop_flag(&mut self, stop: Arc<AtomicBool>) {
        self.stop = Some(stop);
    }

    /// The current position as the caller sees it.
    pub fn board(&self) -> Board {
        self.transform.board_to_external(&self.board)
    }

    /// Side to move, in the caller's terms.
    pub fn to_move(&self) -> Side {
        self.transform.side_to_external(self.board.to_move())
    }

    pub fn is_game_over(&self) -> bool {
        self.board.is_terminal()
    }

    /// Apply the opponent's move, or their pass if `mov` is None.
    ///
    /// Illegal moves are rejected and leave the board untouched.
    pub fn notify_opponent_move(&mut self, mov: Option<Move>) -> SliderResult<()> {
        if self.to_move() == self.role {
            return Err(IllegalMoveError::OutOfTurn { to_move: self.role }.into());
        }

        let Some(mov) = mov else {
            debug!(opponent = %self.role.opponent(), "opponent passed");
            self.board.pass();
            return Ok(());
        };

        // Validate in the caller's frame so errors name the caller's move
        self.board().check(mov)?;

        let internal = self.transform.move_to_internal(mov, self.board.dimension());
        self.board.play(internal)?;
        debug!(opponent = %self.role.opponent(), %mov, "opponent moved");
        Ok(())
    }

    /// Search for a move, play it, and return it in the caller's frame.
    ///
    /// Returns None when there is no legal move; that pass is played too.
    pub fn choose_move(&mut self) -> SliderResult<Option<Move>> {
        let to_move = self.to_move();
        if to_move != self.role {
            return Err(IllegalMoveError::OutOfTurn { to_move }.into());
        }

        let limits = self.config.limits(self.stop.clone());
        let report = self.engine.search(&mut self.board, &limits);
        let chosen = commit(&mut self.board, report.best)
            .map(|mov| self.transform.move_to_external(mov, self.board.dimension()));

        match chosen {
            Some(mov) => info!(
                role = %self.role,
                %mov,
                score = report.score,
                depth = report.depth,
                "chose move"
            ),
            None => info!(role = %self.role, "no legal move, passing"),
        }
        Ok(chosen)
    }
}
