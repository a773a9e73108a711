//! Count legal moves for each side.
//!
//! Reads a board from stdin (the dimension, then the cells) and prints the
//! number of legal Horizontal moves, then Vertical moves, one per line.

use std::io::{self, Read};

use anyhow::{Context, Result};

use slider_core::{count_moves, Board, Side};

fn main() -> Result<()> {
    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("reading board from stdin")?;

    let board = Board::parse_sized(&input, Side::Horizontal).context("parsing board")?;
    let counts = count_moves(&board);

    println!("{}", counts[Side::Horizontal.index()]);
    println!("{}", counts[Side::Vertical.index()]);
    Ok(())
}
