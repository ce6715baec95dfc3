//! Randomized checks over reachable positions
//!
//! Positions come from seeded random playouts, so failures are reproducible.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sandwich::board::{CELL_COUNT, coords_of};
use sandwich::movegen::DIRECTIONS;
use sandwich::{
    BoardState, Cell, Color, compute_best_move, compute_best_move_pruned, generate, make_move,
};

/// Plays `plies` random moves from the start, passing when forced.
fn random_position(rng: &mut StdRng, plies: usize) -> BoardState {
    let mut board = BoardState::initial();
    for _ in 0..plies {
        let moves = generate(&board);
        if moves.is_empty() {
            if generate(&board.passed()).is_empty() {
                break;
            }
            board = board.passed();
            continue;
        }
        let choices: Vec<usize> = moves.iter().collect();
        let index = choices[rng.random_range(0..choices.len())];
        board = make_move(&board, index, &moves);
    }
    board
}

/// Reference legality check that does not share code with the generator.
fn reference_legal(board: &BoardState) -> u64 {
    let own = board.mover().cell();
    let mut legal = 0u64;
    for index in 0..CELL_COUNT {
        if board.get_index(index) != Cell::Empty {
            continue;
        }
        let (x0, y0) = coords_of(index);
        for direction in DIRECTIONS {
            let mut x = x0 as i32 + direction.dx;
            let mut y = y0 as i32 + direction.dy;
            let mut seen_opponent = false;
            while (0..8).contains(&x) && (0..8).contains(&y) {
                let cell = board.get(x as usize, y as usize);
                if cell == Cell::Empty {
                    break;
                }
                if cell == own {
                    if seen_opponent {
                        legal |= 1 << index;
                    }
                    break;
                }
                seen_opponent = true;
                x += direction.dx;
                y += direction.dy;
            }
        }
    }
    legal
}

#[test]
fn test_generator_matches_reference() {
    let mut rng = StdRng::seed_from_u64(7);
    for game in 0..40 {
        for plies in [0, 5, 15, 30, 45, 58] {
            let board = random_position(&mut rng, plies);
            for mover in [Color::Black, Color::White] {
                let board = board.with_mover(mover);
                let moves = generate(&board);
                assert_eq!(
                    moves.legal,
                    reference_legal(&board),
                    "game {game} plies {plies}\n{board}"
                );
                assert_eq!(moves.count, moves.legal.count_ones());
            }
        }
    }
}

#[test]
fn test_make_move_preserves_stone_total() {
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..30 {
        let board = random_position(&mut rng, 20);
        let moves = generate(&board);
        let before = board.count(Color::Black) + board.count(Color::White);
        for index in moves.iter() {
            let child = make_move(&board, index, &moves);
            let mover = board.mover();
            assert_eq!(
                child.count(Color::Black) + child.count(Color::White),
                before + 1
            );
            assert!(child.count(mover) >= board.count(mover) + 2);
            assert_eq!(child.mover(), mover.opposite());
        }
    }
}

#[test]
fn test_parallel_matches_sequential_on_random_positions() {
    let mut rng = StdRng::seed_from_u64(23);
    for _ in 0..6 {
        let plies = rng.random_range(4..40);
        let board = random_position(&mut rng, plies);
        let maximizing = if rng.random_bool(0.5) {
            Color::Black
        } else {
            Color::White
        };
        for depth in 1..=3 {
            let sequential = compute_best_move(&board, depth, 0, maximizing);
            let parallel = compute_best_move(&board, depth, depth as u32, maximizing);
            assert_eq!(parallel, sequential, "depth {depth}\n{board}");
        }
    }
}

#[test]
fn test_pruned_matches_full_width_on_random_positions() {
    let mut rng = StdRng::seed_from_u64(31);
    for _ in 0..10 {
        let plies = rng.random_range(0..56);
        let board = random_position(&mut rng, plies);
        for maximizing in [Color::Black, Color::White] {
            for depth in 1..=4 {
                let full = compute_best_move(&board, depth, 0, maximizing);
                assert_eq!(
                    compute_best_move_pruned(&board, depth, 0, maximizing),
                    full,
                    "depth {depth}\n{board}"
                );
                assert_eq!(
                    compute_best_move_pruned(&board, depth, 1, maximizing),
                    full
                );
            }
        }
    }
}

#[test]
fn test_endgame_search_reaches_terminal_scores() {
    // Deep enough to see the end of the game from a nearly full board
    let mut rng = StdRng::seed_from_u64(5);
    let board = (0..)
        .map(|_| random_position(&mut rng, 60))
        .find(|board| (1..=6).contains(&board.empty_count()) && !generate(board).is_empty())
        .unwrap();
    let empties = board.empty_count() as i32;
    let result = compute_best_move(&board, empties + 2, 1, Color::Black);
    assert!(
        result.score == 0 || result.score.abs() == i32::MAX,
        "score {} is not terminal\n{board}",
        result.score
    );
}
