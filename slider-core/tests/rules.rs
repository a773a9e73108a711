//! Rule invariants checked over seeded random boards.
//!
//! - apply followed by undo restores the exact position
//! - piece counts never increase and match the cells
//! - the lazy generator agrees with a brute-force legality scan
//! - the reflected board has the mirrored move set
//! - move counts match the fixture positions in `tests/data`

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;

use slider_core::{
    count_moves, Board, Cell, CoordinateTransform, Direction, Move, MoveGenerator, MoveOrder,
    Side,
};

fn random_board(rng: &mut StdRng, n: usize) -> Board {
    let cells: Vec<Cell> = (0..n * n)
        .map(|_| match rng.random_range(0..10) {
            0..=4 => Cell::Blank,
            5 => Cell::Obstacle,
            6 | 7 => Cell::Horizontal,
            _ => Cell::Vertical,
        })
        .collect();
    let to_move = if rng.random_bool(0.5) {
        Side::Horizontal
    } else {
        Side::Vertical
    };
    Board::new(n, cells, to_move).unwrap()
}

fn counted_pieces(board: &Board, side: Side) -> usize {
    board.cells().iter().filter(|&&cell| cell == side.piece()).count()
}

#[test]
fn test_apply_undo_restores_position() {
    let mut rng = StdRng::seed_from_u64(0x5eed);

    for _ in 0..200 {
        let n = rng.random_range(1..=5);
        let mut board = random_board(&mut rng, n);
        let original = board.clone();

        for order in [MoveOrder::RowMajor, MoveOrder::AdvanceFirst] {
            for transition in MoveGenerator::for_board(&board, order).generate(&original) {
                let undo = board.apply(transition);
                assert_ne!(board, original, "{} changed nothing", transition.mov);
                board.undo(&undo);
                assert_eq!(board, original, "{} did not undo cleanly", transition.mov);
            }
        }
    }
}

#[test]
fn test_random_playout_keeps_counts() {
    let mut rng = StdRng::seed_from_u64(42);

    for _ in 0..50 {
        let n = rng.random_range(2..=6);
        let mut board = random_board(&mut rng, n);
        let mut total = board.pieces(Side::Horizontal) + board.pieces(Side::Vertical);

        for _ in 0..100 {
            if board.is_terminal() {
                break;
            }
            let moves = board.legal_moves();
            if moves.is_empty() {
                board.pass();
                continue;
            }
            let pick = moves[rng.random_range(0..moves.len())];
            board.apply(pick);

            for side in Side::all() {
                assert_eq!(board.pieces(side), counted_pieces(&board, side));
            }
            let now = board.pieces(Side::Horizontal) + board.pieces(Side::Vertical);
            assert!(now <= total);
            total = now;
        }
    }
}

#[test]
fn test_generator_matches_brute_force() {
    let mut rng = StdRng::seed_from_u64(7);

    for _ in 0..100 {
        let n = rng.random_range(1..=5);
        let board = random_board(&mut rng, n);
        let counts = count_moves(&board);

        for side in Side::all() {
            let brute = board
                .positions()
                .filter(|&pos| board.cell(pos) == side.piece())
                .flat_map(|pos| Direction::ALL.map(|dir| Move::new(pos.row, pos.col, dir)))
                .filter(|&mov| board.can_move(mov))
                .count();
            let generated = MoveGenerator::new(side, MoveOrder::AdvanceFirst).generate(&board);

            assert_eq!(counts[side.index()], brute);
            assert_eq!(generated.len(), brute);
        }
    }
}

#[test]
fn test_reflection_preserves_move_counts() {
    let mut rng = StdRng::seed_from_u64(99);
    let reflected = CoordinateTransform::Reflected;

    for _ in 0..100 {
        let n = rng.random_range(1..=6);
        let board = random_board(&mut rng, n);
        let internal = reflected.board_to_internal(&board);

        let [h, v] = count_moves(&board);
        assert_eq!(count_moves(&internal), [v, h]);
        assert_eq!(reflected.board_to_external(&internal), board);
    }
}

#[test]
fn test_count_moves_scenario() {
    let board = Board::parse_sized("2\nH +\n+ V\n", Side::Horizontal).unwrap();
    assert_eq!(count_moves(&board), [2, 2]);
}

#[derive(Debug, Deserialize)]
struct CountFixture {
    positions: Vec<CountCase>,
}

#[derive(Debug, Deserialize)]
struct CountCase {
    description: String,
    board: String,
    horizontal: usize,
    vertical: usize,
}

#[test]
fn test_count_moves_fixture() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/data/count_moves.json");
    let file = File::open(&path).expect("fixture exists");
    let fixture: CountFixture = serde_json::from_reader(BufReader::new(file)).unwrap();

    for case in fixture.positions {
        let board = Board::parse_sized(&case.board, Side::Horizontal).unwrap();
        assert_eq!(
            count_moves(&board),
            [case.horizontal, case.vertical],
            "{}",
            case.description
        );
    }
}
