//! Slider agent command line.
//!
//! `slider choose` picks one move for a position; `slider selfplay` plays a
//! whole game between two agents. Board files hold the dimension followed by
//! the cell symbols. Logs go to stderr (`RUST_LOG`), moves to stdout.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use slider_agent::{EngineConfig, SliderPlayer, TerminalPolicy};
use slider_core::{Board, MoveOrder, Side};

#[derive(Parser, Debug)]
#[command(name = "slider", about = "Negamax alpha-beta player for the Slider game")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Choose a move for the side to play
    Choose {
        /// Board file: dimension, then the cells
        #[arg(long)]
        board: PathBuf,

        /// Side to play (H or V)
        #[arg(long)]
        role: Side,

        #[command(flatten)]
        engine: EngineArgs,
    },
    /// Play both sides against each other from a starting position
    Selfplay {
        /// Board file: dimension, then the cells
        #[arg(long)]
        board: PathBuf,

        /// Stop after this many plies
        #[arg(long, default_value_t = 200)]
        max_plies: usize,

        #[command(flatten)]
        engine: EngineArgs,
    },
}

/// Engine settings; flags override the config file.
#[derive(Args, Debug)]
struct EngineArgs {
    /// JSON engine config
    #[arg(long)]
    config: Option<PathBuf>,

    /// Start from the quick preset instead of the deep one
    #[arg(long)]
    quick: bool,

    /// Search depth in plies
    #[arg(long)]
    depth: Option<u32>,

    /// Time budget per move in milliseconds
    #[arg(long)]
    time_ms: Option<u64>,

    /// Move order: row-major or advance-first
    #[arg(long)]
    order: Option<MoveOrder>,

    /// Score finished games as outright wins and losses
    #[arg(long)]
    saturate: bool,
}

impl EngineArgs {
    fn resolve(&self) -> Result<EngineConfig> {
        let mut config = match &self.config {
            Some(path) => EngineConfig::load(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None if self.quick => EngineConfig::quick(),
            None => EngineConfig::deep(),
        };
        if let Some(depth) = self.depth {
            config = config.with_depth(depth);
        }
        if let Some(ms) = self.time_ms {
            config = config.with_time_limit_ms(ms);
        }
        if let Some(order) = self.order {
            config = config.with_order(order);
        }
        if self.saturate {
            config = config.with_terminal(TerminalPolicy::Saturate);
        }
        Ok(config)
    }
}

fn read_board(path: &Path) -> Result<Board> {
    let text =
        fs::read_to_string(path).with_context(|| format!("reading board {}", path.display()))?;
    Board::parse_sized(&text, Side::Horizontal)
        .with_context(|| format!("parsing board {}", path.display()))
}

fn new_player(
    board: &Board,
    role: Side,
    config: EngineConfig,
    stop: &Arc<AtomicBool>,
) -> Result<SliderPlayer> {
    config.validate(board.dimension())?;
    let description = board.to_string();
    let mut player = SliderPlayer::with_config(board.dimension(), &description, role, config)?;
    player.set_stop_flag(stop.clone());
    Ok(player)
}

fn choose(board: &Board, role: Side, config: EngineConfig, stop: &Arc<AtomicBool>) -> Result<()> {
    let mut player = new_player(board, role, config, stop)?.with_first_mover(role);
    match player.choose_move()? {
        Some(mov) => println!("{mov}"),
        None => println!("pass"),
    }
    Ok(())
}

fn selfplay(board: &Board, max_plies: usize, config: EngineConfig, stop: &Arc<AtomicBool>) -> Result<()> {
    let mut players = [
        new_player(board, Side::Horizontal, config.clone(), stop)?,
        new_player(board, Side::Vertical, config, stop)?,
    ];
    print!("{board}");

    let mut side = Side::Horizontal;
    let mut passes = 0;
    for ply in 1..=max_plies {
        if players[0].is_game_over() {
            break;
        }
        if stop.load(Ordering::SeqCst) {
            warn!(ply, "interrupted");
            break;
        }

        let mov = players[side.index()].choose_move()?;
        players[side.opponent().index()].notify_opponent_move(mov)?;

        match mov {
            Some(mov) => {
                println!("{ply}. {} {mov}", side.symbol());
                passes = 0;
            }
            None => {
                println!("{ply}. {} pass", side.symbol());
                passes += 1;
            }
        }
        if passes == 2 {
            info!(ply, "neither side can move");
            break;
        }
        side = side.opponent();
    }

    let last = players[0].board();
    print!("{last}");
    match last.winner() {
        Some(winner) => println!("{winner} wins"),
        None => println!("no winner"),
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Ctrl-C ends the running search early; the best completed result is used
    let stop = Arc::new(AtomicBool::new(false));
    let s = stop.clone();
    ctrlc::set_handler(move || {
        s.store(true, Ordering::SeqCst);
    })
    .context("installing Ctrl-C handler")?;

    match cli.command {
        Command::Choose {
            board,
            role,
            engine,
        } => {
            let config = engine.resolve()?;
            choose(&read_board(&board)?, role, config, &stop)
        }
        Command::Selfplay {
            board,
            max_plies,
            engine,
        } => {
            let config = engine.resolve()?;
            selfplay(&read_board(&board)?, max_plies, config, &stop)
        }
    }
}
