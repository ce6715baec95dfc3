//! Packed board representation and color/cell types.
//!
//! The board stores 64 cells at 2 bits per cell across two `u64` words.
//! Cells 0-31 live in the low word and cells 32-63 in the high word, with
//! the flat index `x + 8 * y`. The split point is specific to an 8x8 board.

use std::fmt;

use thiserror::Error;

/// Board width and height in cells.
pub const BOARD_SIZE: usize = 8;

/// Total number of cells.
pub const CELL_COUNT: usize = BOARD_SIZE * BOARD_SIZE;

/// Number of cells stored in each packed word.
const CELLS_PER_WORD: usize = 32;

/// Width of one cell slot in bits.
const SLOT_BITS: usize = 2;

const SLOT_MASK: u64 = 0b11;

/// A word whose every slot holds the `Empty` tag (`0b10`).
const EMPTY_WORD: u64 = 0xAAAA_AAAA_AAAA_AAAA;

/// Board construction and move application errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum BoardError {
    /// The exported board is not 8x8
    #[error("Unsupported board size {width}x{height}, only 8x8 boards are supported")]
    UnsupportedSize { width: usize, height: usize },

    /// Wrong number of text rows
    #[error("Expected 8 rows, found {0}")]
    RowCount(usize),

    /// A text row does not have 8 cells
    #[error("Row {row} has {len} cells, expected 8")]
    RowLength { row: usize, len: usize },

    /// Unknown cell character
    #[error("Invalid cell character {ch:?} at ({x}, {y})")]
    InvalidCell { ch: char, x: usize, y: usize },

    /// Coordinates outside the board
    #[error("Coordinates ({x}, {y}) are off the board")]
    OutOfBounds { x: usize, y: usize },

    /// The destination is not a legal move for the mover
    #[error("Illegal move at ({x}, {y}) for {color:?}")]
    IllegalMove { x: usize, y: usize, color: Color },
}

/// Stone color, also used to identify the two players.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Color {
    /// First player
    Black = 0,
    /// Second player
    White = 1,
}

impl Color {
    /// Returns the other color.
    ///
    /// # Examples
    ///
    /// ```
    /// use sandwich::board::Color;
    ///
    /// assert_eq!(Color::Black.opposite(), Color::White);
    /// assert_eq!(Color::White.opposite(), Color::Black);
    /// ```
    #[inline]
    pub fn opposite(self) -> Color {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }

    /// The cell tag holding a stone of this color.
    #[inline]
    pub fn cell(self) -> Cell {
        match self {
            Color::Black => Cell::Black,
            Color::White => Cell::White,
        }
    }
}

/// Contents of one board cell, stored as a 2-bit tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Cell {
    Black = 0,
    White = 1,
    Empty = 2,
}

impl Cell {
    #[inline]
    fn from_bits(bits: u64) -> Cell {
        match bits {
            0 => Cell::Black,
            1 => Cell::White,
            2 => Cell::Empty,
            _ => unreachable!("invalid cell tag {bits:#b}"),
        }
    }

    /// Color of the stone on this cell, `None` when empty.
    #[inline]
    pub fn color(self) -> Option<Color> {
        match self {
            Cell::Black => Some(Color::Black),
            Cell::White => Some(Color::White),
            Cell::Empty => None,
        }
    }

    fn to_char(self) -> char {
        match self {
            Cell::Black => 'X',
            Cell::White => 'O',
            Cell::Empty => '.',
        }
    }

    fn from_char(ch: char) -> Option<Cell> {
        match ch {
            'X' | 'x' => Some(Cell::Black),
            'O' | 'o' => Some(Cell::White),
            '.' | '-' | ' ' => Some(Cell::Empty),
            _ => None,
        }
    }
}

/// Flat cell index for in-range coordinates.
#[inline]
pub fn index_of(x: usize, y: usize) -> usize {
    x + BOARD_SIZE * y
}

/// Coordinates of a flat cell index.
#[inline]
pub fn coords_of(index: usize) -> (usize, usize) {
    (index % BOARD_SIZE, index / BOARD_SIZE)
}

/// Live board export, implemented by whatever owns the playable board.
pub trait BoardSource {
    /// Width in cells
    fn width(&self) -> usize;
    /// Height in cells
    fn height(&self) -> usize;
    /// Tag of the cell at `(x, y)`
    fn cell(&self, x: usize, y: usize) -> Cell;
    /// Color of the player to move next
    fn to_move(&self) -> Color;
}

/// Packed 8x8 board plus the mover and pass flag of a search node.
///
/// Copying is cheap: two words and two scalars. Search derives every child
/// from a copy, so a state seen by one branch is never changed by another.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoardState {
    /// Cells 0-31
    low: u64,
    /// Cells 32-63
    high: u64,
    mover: Color,
    skipped_previous_ply: bool,
}

impl fmt::Debug for BoardState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoardState")
            .field("low", &format_args!("{:#018x}", self.low))
            .field("high", &format_args!("{:#018x}", self.high))
            .field("mover", &self.mover)
            .field("skipped_previous_ply", &self.skipped_previous_ply)
            .finish()
    }
}

impl fmt::Display for BoardState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..BOARD_SIZE {
            if y != 0 {
                writeln!(f)?;
            }
            for x in 0..BOARD_SIZE {
                write!(f, "{}", self.get(x, y).to_char())?;
            }
        }
        Ok(())
    }
}

impl BoardState {
    /// Board with every cell empty.
    pub fn empty(mover: Color) -> Self {
        Self {
            low: EMPTY_WORD,
            high: EMPTY_WORD,
            mover,
            skipped_previous_ply: false,
        }
    }

    /// Standard starting position.
    ///
    /// Black on (3,3) and (4,4), White on (4,3) and (3,4), Black to move.
    ///
    /// # Examples
    ///
    /// ```
    /// use sandwich::board::{BoardState, Cell, Color};
    ///
    /// let board = BoardState::initial();
    /// assert_eq!(board.get(3, 3), Cell::Black);
    /// assert_eq!(board.count(Color::White), 2);
    /// assert_eq!(board.mover(), Color::Black);
    /// ```
    pub fn initial() -> Self {
        let mut board = Self::empty(Color::Black);
        board.set(3, 3, Cell::Black);
        board.set(4, 4, Cell::Black);
        board.set(4, 3, Cell::White);
        board.set(3, 4, Cell::White);
        board
    }

    /// Builds a board from an exported live board.
    ///
    /// # Errors
    ///
    /// Returns `BoardError::UnsupportedSize` unless the source is 8x8, since the
    /// packed layout cannot represent any other size.
    pub fn from_source<S: BoardSource + ?Sized>(source: &S) -> Result<Self, BoardError> {
        let (width, height) = (source.width(), source.height());
        if width != BOARD_SIZE || height != BOARD_SIZE {
            return Err(BoardError::UnsupportedSize { width, height });
        }

        let mut board = Self::empty(source.to_move());
        for y in 0..BOARD_SIZE {
            for x in 0..BOARD_SIZE {
                board.set(x, y, source.cell(x, y));
            }
        }
        Ok(board)
    }

    /// Parses eight text rows of `X` (black), `O` (white) and `.` (empty).
    ///
    /// # Errors
    ///
    /// Fails on a wrong row count, a row that is not 8 cells long, or an
    /// unknown character.
    pub fn from_rows(rows: &[&str], mover: Color) -> Result<Self, BoardError> {
        if rows.len() != BOARD_SIZE {
            return Err(BoardError::RowCount(rows.len()));
        }

        let mut board = Self::empty(mover);
        for (y, row) in rows.iter().enumerate() {
            let len = row.chars().count();
            if len != BOARD_SIZE {
                return Err(BoardError::RowLength { row: y, len });
            }
            for (x, ch) in row.chars().enumerate() {
                let cell = Cell::from_char(ch).ok_or(BoardError::InvalidCell { ch, x, y })?;
                board.set(x, y, cell);
            }
        }
        Ok(board)
    }

    /// Cell at `(x, y)`. Coordinates must be in `0..8`.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Cell {
        debug_assert!(x < BOARD_SIZE && y < BOARD_SIZE, "({x}, {y}) is off the board");
        self.get_index(index_of(x, y))
    }

    /// Writes `cell` at `(x, y)`. Coordinates must be in `0..8`.
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, cell: Cell) {
        debug_assert!(x < BOARD_SIZE && y < BOARD_SIZE, "({x}, {y}) is off the board");
        self.set_index(index_of(x, y), cell);
    }

    /// Cell at a flat index in `0..64`.
    #[inline]
    pub fn get_index(&self, index: usize) -> Cell {
        let (word, shift) = if index < CELLS_PER_WORD {
            (self.low, index * SLOT_BITS)
        } else {
            (self.high, (index % CELLS_PER_WORD) * SLOT_BITS)
        };
        Cell::from_bits((word >> shift) & SLOT_MASK)
    }

    /// Writes `cell` at a flat index in `0..64`.
    #[inline]
    pub fn set_index(&mut self, index: usize, cell: Cell) {
        let (word, shift) = if index < CELLS_PER_WORD {
            (&mut self.low, index * SLOT_BITS)
        } else {
            (&mut self.high, (index % CELLS_PER_WORD) * SLOT_BITS)
        };
        // Clear the slot first, otherwise OR-ing would mix tags
        *word &= !(SLOT_MASK << shift);
        *word |= (cell as u64) << shift;
    }

    /// Color whose moves are considered at this node.
    #[inline]
    pub fn mover(&self) -> Color {
        self.mover
    }

    /// True when the previous ply was a forced pass.
    #[inline]
    pub fn skipped_previous_ply(&self) -> bool {
        self.skipped_previous_ply
    }

    /// Copy with a different mover.
    #[inline]
    pub fn with_mover(mut self, mover: Color) -> Self {
        self.mover = mover;
        self
    }

    /// Copy with the pass flag replaced.
    #[inline]
    pub fn with_skipped(mut self, skipped: bool) -> Self {
        self.skipped_previous_ply = skipped;
        self
    }

    /// Child reached by a forced pass: mover flipped, cells unchanged.
    #[inline]
    pub fn passed(&self) -> Self {
        self.with_mover(self.mover.opposite()).with_skipped(true)
    }

    /// Number of stones of `color`.
    pub fn count(&self, color: Color) -> u32 {
        let target = color.cell();
        (0..CELL_COUNT)
            .filter(|&index| self.get_index(index) == target)
            .count() as u32
    }

    /// Number of empty cells.
    pub fn empty_count(&self) -> u32 {
        CELL_COUNT as u32 - self.count(Color::Black) - self.count(Color::White)
    }
}

impl Default for BoardState {
    fn default() -> Self {
        Self::initial()
    }
}

impl BoardSource for BoardState {
    fn width(&self) -> usize {
        BOARD_SIZE
    }

    fn height(&self) -> usize {
        BOARD_SIZE
    }

    fn cell(&self, x: usize, y: usize) -> Cell {
        self.get(x, y)
    }

    fn to_move(&self) -> Color {
        self.mover
    }
}
