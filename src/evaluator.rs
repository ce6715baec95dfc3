//! Heuristic leaf evaluation.
//!
//! Every stone is worth a fixed number of points by its square class and
//! the leaf's mover gets a tempo bonus. The score is always reported from
//! the maximizing player's point of view.

use crate::board::{BOARD_SIZE, BoardState, CELL_COUNT, Cell, Color};

/// Points for a stone not on any edge.
pub const INTERIOR_WEIGHT: i32 = 2;

/// Points for a stone on an edge, excluding corners.
pub const EDGE_WEIGHT: i32 = 3;

/// Points for a corner stone.
pub const CORNER_WEIGHT: i32 = 4;

/// Bonus credited to the color to move at the leaf.
pub const TEMPO_BONUS: i32 = 3;

/// Per-cell weights, indexed by flat cell index.
pub const CELL_WEIGHTS: [i32; CELL_COUNT] = build_weights();

const fn build_weights() -> [i32; CELL_COUNT] {
    let mut weights = [0; CELL_COUNT];
    let mut index = 0;
    while index < CELL_COUNT {
        weights[index] = cell_weight(index % BOARD_SIZE, index / BOARD_SIZE);
        index += 1;
    }
    weights
}

/// Weight of the square at `(x, y)`.
///
/// # Examples
///
/// ```
/// use sandwich::evaluator::cell_weight;
///
/// assert_eq!(cell_weight(0, 0), 4);
/// assert_eq!(cell_weight(3, 0), 3);
/// assert_eq!(cell_weight(3, 3), 2);
/// ```
pub const fn cell_weight(x: usize, y: usize) -> i32 {
    let on_x_edge = x == 0 || x == BOARD_SIZE - 1;
    let on_y_edge = y == 0 || y == BOARD_SIZE - 1;
    match (on_x_edge, on_y_edge) {
        (true, true) => CORNER_WEIGHT,
        (true, false) | (false, true) => EDGE_WEIGHT,
        (false, false) => INTERIOR_WEIGHT,
    }
}

/// Material totals of both colors, tempo bonus included.
///
/// Returns `(black, white)`.
pub fn totals(board: &BoardState) -> (i32, i32) {
    let mut black = 0;
    let mut white = 0;

    for (index, &weight) in CELL_WEIGHTS.iter().enumerate() {
        match board.get_index(index) {
            Cell::Black => black += weight,
            Cell::White => white += weight,
            Cell::Empty => {}
        }
    }

    match board.mover() {
        Color::Black => black += TEMPO_BONUS,
        Color::White => white += TEMPO_BONUS,
    }

    (black, white)
}

/// Scores `board` for `maximizing`.
///
/// # Returns
///
/// `maximizing` player's total minus the other color's total. A full board
/// plus tempo is worth 163, so the result never exceeds that in magnitude.
///
/// # Examples
///
/// ```
/// use sandwich::board::{BoardState, Color};
/// use sandwich::evaluator::evaluate;
///
/// // Symmetric start: only the tempo bonus differs
/// let board = BoardState::initial();
/// assert_eq!(evaluate(&board, Color::Black), 3);
/// assert_eq!(evaluate(&board, Color::White), -3);
/// ```
pub fn evaluate(board: &BoardState, maximizing: Color) -> i32 {
    let (black, white) = totals(board);
    match maximizing {
        Color::Black => black - white,
        Color::White => white - black,
    }
}
