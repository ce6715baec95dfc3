//! Legal move generation and move application.
//!
//! Legality follows the sandwich rule: a move on an empty cell is legal in a
//! direction when one or more opponent stones run from it to a mover stone.
//! Generation walks every board line with a two-flag state machine instead of
//! probing each empty cell separately.

use crate::board::{BOARD_SIZE, BoardError, BoardState, CELL_COUNT, Cell, coords_of, index_of};

/// A step on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Direction {
    pub dx: i32,
    pub dy: i32,
}

impl Direction {
    pub const fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }

    /// The same line walked the other way.
    #[inline]
    pub const fn reversed(self) -> Self {
        Self {
            dx: -self.dx,
            dy: -self.dy,
        }
    }
}

/// All eight directions. A `MoveSet` stores one mask per entry, in this order.
pub const DIRECTIONS: [Direction; 8] = [
    Direction::new(1, 0),
    Direction::new(-1, 0),
    Direction::new(0, 1),
    Direction::new(0, -1),
    Direction::new(1, 1),
    Direction::new(-1, -1),
    Direction::new(-1, 1),
    Direction::new(1, -1),
];

#[inline]
fn on_board(x: i32, y: i32) -> bool {
    (0..BOARD_SIZE as i32).contains(&x) && (0..BOARD_SIZE as i32).contains(&y)
}

/// Start cells of the rays walked in direction `scan`.
///
/// A ray starts on every cell whose predecessor along `scan` is off the
/// board, so each cell lies on exactly one ray. Horizontal and vertical
/// directions have 8 rays, diagonals 15, and a corner is the start of one
/// diagonal ray only.
pub fn ray_starts(scan: Direction) -> impl Iterator<Item = (usize, usize)> {
    (0..CELL_COUNT)
        .map(coords_of)
        .filter(move |&(x, y)| !on_board(x as i32 - scan.dx, y as i32 - scan.dy))
}

/// Cells of the ray starting at `start`, in walk order.
pub fn ray(start: (usize, usize), scan: Direction) -> impl Iterator<Item = usize> {
    let (mut x, mut y) = (start.0 as i32, start.1 as i32);
    std::iter::from_fn(move || {
        if !on_board(x, y) {
            return None;
        }
        let index = index_of(x as usize, y as usize);
        x += scan.dx;
        y += scan.dy;
        Some(index)
    })
}

/// Legal destinations of the mover, split by flip direction.
///
/// `by_direction[d]` holds the destinations whose captured run starts at the
/// destination and extends along `DIRECTIONS[d]` to a mover anchor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MoveSet {
    pub by_direction: [u64; 8],
    /// Union of all directional masks
    pub legal: u64,
    /// Number of distinct legal destinations
    pub count: u32,
}

impl MoveSet {
    #[inline]
    fn mark(&mut self, slot: usize, index: usize) {
        let bit = 1u64 << index;
        self.by_direction[slot] |= bit;
        if self.legal & bit == 0 {
            self.legal |= bit;
            self.count += 1;
        }
    }

    /// True when the mover has no legal move.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.legal == 0
    }

    /// True when `index` is a legal destination.
    #[inline]
    pub fn contains(&self, index: usize) -> bool {
        self.legal & (1u64 << index) != 0
    }

    /// Legal destinations in increasing index order.
    pub fn iter(&self) -> impl Iterator<Item = usize> {
        let mut bits = self.legal;
        std::iter::from_fn(move || {
            if bits == 0 {
                return None;
            }
            let index = bits.trailing_zeros() as usize;
            bits &= bits - 1;
            Some(index)
        })
    }

    /// Flip directions that make `index` legal.
    pub fn directions_for(&self, index: usize) -> impl Iterator<Item = Direction> + '_ {
        let bit = 1u64 << index;
        DIRECTIONS
            .into_iter()
            .zip(self.by_direction.iter())
            .filter(move |&(_, &mask)| mask & bit != 0)
            .map(|(direction, _)| direction)
    }
}

/// Generates the legal moves of `board.mover()`.
///
/// For each flip direction the lines are walked the opposite way, so a mover
/// stone is met before the opponent run and the empty cell that closes it.
///
/// # Examples
///
/// ```
/// use sandwich::board::BoardState;
/// use sandwich::movegen::generate;
///
/// let moves = generate(&BoardState::initial());
/// assert_eq!(moves.count, 4);
/// ```
pub fn generate(board: &BoardState) -> MoveSet {
    let own = board.mover().cell();
    let mut moves = MoveSet::default();

    for (slot, &flip) in DIRECTIONS.iter().enumerate() {
        let scan = flip.reversed();
        for start in ray_starts(scan) {
            let mut own_run_started = false;
            let mut opponent_pending = false;

            for index in ray(start, scan) {
                let cell = board.get_index(index);
                if cell == Cell::Empty {
                    if own_run_started && opponent_pending {
                        moves.mark(slot, index);
                    }
                    own_run_started = false;
                    opponent_pending = false;
                } else if cell == own {
                    own_run_started = true;
                    opponent_pending = false;
                } else {
                    opponent_pending = true;
                }
            }
        }
    }

    moves
}

/// Derives the child reached by the mover playing `index`.
///
/// The child has the mover flipped and the pass flag cleared. For every
/// direction flagged in `moves`, stones from the destination up to (not
/// including) the first mover stone are replaced with the mover's color.
///
/// `index` must be a legal destination in `moves`, which must have been
/// generated from `board`.
pub fn make_move(board: &BoardState, index: usize, moves: &MoveSet) -> BoardState {
    debug_assert!(moves.contains(index), "cell {index} is not a legal move");

    let mover = board.mover();
    let own = mover.cell();
    let mut child = board.with_mover(mover.opposite()).with_skipped(false);
    child.set_index(index, own);

    let (x0, y0) = coords_of(index);
    for direction in moves.directions_for(index) {
        let (mut x, mut y) = (x0 as i32 + direction.dx, y0 as i32 + direction.dy);
        // The generator only flags directions with an anchor on the board
        while child.get(x as usize, y as usize) != own {
            child.set(x as usize, y as usize, own);
            x += direction.dx;
            y += direction.dy;
            debug_assert!(on_board(x, y), "flip ran off the board");
        }
    }

    child
}

/// Plays `(x, y)` for the mover, for callers outside the search.
///
/// # Errors
///
/// Returns `BoardError::OutOfBounds` for coordinates off the board and
/// `BoardError::IllegalMove` when the cell is not a legal destination.
pub fn play(board: &BoardState, x: usize, y: usize) -> Result<BoardState, BoardError> {
    if x >= BOARD_SIZE || y >= BOARD_SIZE {
        return Err(BoardError::OutOfBounds { x, y });
    }
    let moves = generate(board);
    let index = index_of(x, y);
    if !moves.contains(index) {
        return Err(BoardError::IllegalMove {
            x,
            y,
            color: board.mover(),
        });
    }
    Ok(make_move(board, index, &moves))
}
