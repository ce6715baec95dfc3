//! Sandwich - headless Reversi search core
//!
//! Packed 8x8 board, sandwich-rule move generation, a fixed heuristic
//! evaluator and a depth-bounded minimax search that can fan out across a
//! rayon pool near the root.
//!
//! # Architecture
//!
//! ```text
//! SearchEngine (config, rayon pool)
//!     |-- minimax / alpha_beta
//!     |       |-- movegen::generate / make_move
//!     |       |-- evaluator::evaluate
//!     |-- BoardState (exported from the live board)
//! ```
//!
//! # Example
//!
//! ```
//! use sandwich::{BoardState, Color, compute_best_move};
//!
//! let board = BoardState::initial();
//! let result = compute_best_move(&board, 3, 1, Color::Black);
//! assert!(result.has_move());
//! ```

pub mod board;
pub mod config;
pub mod evaluator;
pub mod movegen;
pub mod search;

pub use board::{BoardError, BoardSource, BoardState, Cell, Color};
pub use config::{ConfigError, SearchConfig, load_config};
pub use evaluator::evaluate;
pub use movegen::{MoveSet, generate, make_move, play};
pub use search::{
    LOSS_SCORE, MoveResult, SearchEngine, SearchError, SearchOutcome, WIN_SCORE,
    compute_best_move, compute_best_move_pruned,
};
