//! Full-width minimax search.
//!
//! Scores are always expressed from a fixed maximizing player's point of
//! view. Nodes with a remaining parallel budget evaluate their children as
//! independent rayon tasks and join before selecting, so the result is the
//! same as a sequential run. Optional alpha-beta pruning only reduces the
//! work done; the root move and score stay identical.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use rayon::prelude::*;
use thiserror::Error;

use crate::board::{BoardState, Color, coords_of};
use crate::config::{ConfigError, SearchConfig};
use crate::evaluator::evaluate;
use crate::movegen::{generate, make_move};

/// Score of a finished game won by the maximizing player.
pub const WIN_SCORE: i32 = i32::MAX;

/// Score of a finished game lost by the maximizing player.
pub const LOSS_SCORE: i32 = -i32::MAX;

/// Coordinate reported when a result carries no move.
pub const NO_COORDINATE: i32 = -1;

/// Search engine construction errors.
#[derive(Error, Debug)]
pub enum SearchError {
    /// The configuration failed validation
    #[error("Invalid search configuration: {0}")]
    Config(#[from] ConfigError),

    /// The worker pool could not be created
    #[error("Failed to build search thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// A move and its score, `(-1, -1)` when there is no move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MoveResult {
    pub x: i32,
    pub y: i32,
    pub score: i32,
}

impl MoveResult {
    pub fn new(x: i32, y: i32, score: i32) -> Self {
        Self { x, y, score }
    }

    /// Result with the sentinel coordinates.
    pub fn without_move(score: i32) -> Self {
        Self::new(NO_COORDINATE, NO_COORDINATE, score)
    }

    fn at_index(index: usize, score: i32) -> Self {
        let (x, y) = coords_of(index);
        Self::new(x as i32, y as i32, score)
    }

    /// True when the coordinates name a cell.
    #[inline]
    pub fn has_move(&self) -> bool {
        self.x >= 0 && self.y >= 0
    }

    /// Coordinates as board indices, `None` for the sentinel.
    pub fn coords(&self) -> Option<(usize, usize)> {
        self.has_move().then_some((self.x as usize, self.y as usize))
    }
}

impl fmt::Display for MoveResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.has_move() {
            write!(f, "({}, {}) score {}", self.x, self.y, self.score)
        } else {
            write!(f, "no move, score {}", self.score)
        }
    }
}

/// Node counters shared by every branch of one search.
#[derive(Debug, Default)]
pub struct SearchStats {
    nodes: AtomicU64,
    leaves: AtomicU64,
}

impl SearchStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Nodes visited, leaves and passes included.
    pub fn nodes(&self) -> u64 {
        self.nodes.load(Ordering::Relaxed)
    }

    /// Leaves scored by the evaluator.
    pub fn leaves(&self) -> u64 {
        self.leaves.load(Ordering::Relaxed)
    }

    #[inline]
    fn visit(&self) {
        self.nodes.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    fn leaf(&self) {
        self.leaves.fetch_add(1, Ordering::Relaxed);
    }
}

/// Result of `SearchEngine::search` with its statistics.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// Root result
    pub result: MoveResult,
    /// Requested depth
    pub depth: i32,
    /// True when the root mover had to pass, so `result` holds the
    /// opponent's reply rather than a move for the mover
    pub passed: bool,
    /// Nodes visited
    pub nodes: u64,
    /// Leaves evaluated
    pub leaves: u64,
    /// Wall time in milliseconds
    pub elapsed_ms: u64,
}

impl SearchOutcome {
    /// Move to play for the root mover, `None` when it cannot move.
    pub fn best_move(&self) -> Option<(usize, usize)> {
        if self.passed {
            None
        } else {
            self.result.coords()
        }
    }
}

impl fmt::Display for SearchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Result: {}, Depth: {}, Passed: {}, Nodes: {}, Leaves: {}, Time: {}ms",
            self.result, self.depth, self.passed, self.nodes, self.leaves, self.elapsed_ms
        )
    }
}

/// Score of a finished game for `maximizing`.
///
/// `WIN_SCORE` when `maximizing` has more stones, `LOSS_SCORE` when it has
/// fewer, 0 on a tie.
pub fn terminal_score(board: &BoardState, maximizing: Color) -> i32 {
    let own = board.count(maximizing) as i32;
    let other = board.count(maximizing.opposite()) as i32;
    (own - other).signum() * WIN_SCORE
}

/// Running best child of a node.
///
/// The first child offered always wins; afterwards a maximizing node takes
/// strictly larger scores and a minimizing node strictly smaller ones, so
/// the lowest index among equal scores is kept.
struct Selection {
    maximizing_node: bool,
    index: usize,
    score: i64,
}

impl Selection {
    fn new(maximizing_node: bool) -> Self {
        Self {
            maximizing_node,
            index: 0,
            // Every i32 beats these
            score: if maximizing_node { i64::MIN } else { i64::MAX },
        }
    }

    #[inline]
    fn offer(&mut self, index: usize, score: i32) {
        let score = score as i64;
        let better = if self.maximizing_node {
            score > self.score
        } else {
            score < self.score
        };
        if better {
            self.index = index;
            self.score = score;
        }
    }

    /// Only meaningful after at least one `offer`.
    fn result(&self) -> MoveResult {
        MoveResult::at_index(self.index, self.score as i32)
    }
}

/// Heuristic result when no depth remains.
#[inline]
fn leaf_result(
    board: &BoardState,
    depth: i32,
    maximizing: Color,
    stats: &SearchStats,
) -> Option<MoveResult> {
    if depth >= 1 {
        return None;
    }
    stats.leaf();
    Some(MoveResult::without_move(evaluate(board, maximizing)))
}

/// Picks the best move for `board.mover()` with a full-width search.
///
/// # Arguments
///
/// * `board` - root position
/// * `remaining_depth` - plies to search; below 1 the root is scored directly
/// * `parallel_budget` - plies from the root whose children run in parallel
/// * `maximizing` - color the score is expressed for
///
/// # Returns
///
/// The best child's coordinates and score. A root with no legal move for
/// either color returns the sentinel coordinates. A root where only the
/// mover must pass returns the opponent's best reply after the pass.
///
/// # Examples
///
/// ```
/// use sandwich::board::{BoardState, Color};
/// use sandwich::search::compute_best_move;
///
/// let result = compute_best_move(&BoardState::initial(), 1, 0, Color::Black);
/// assert_eq!((result.x, result.y, result.score), (4, 2, 3));
/// ```
pub fn compute_best_move(
    board: &BoardState,
    remaining_depth: i32,
    parallel_budget: u32,
    maximizing: Color,
) -> MoveResult {
    minimax(board, remaining_depth, parallel_budget, maximizing, &SearchStats::new())
}

/// `compute_best_move` with alpha-beta pruning.
///
/// Returns the same coordinates and score while visiting fewer nodes.
pub fn compute_best_move_pruned(
    board: &BoardState,
    remaining_depth: i32,
    parallel_budget: u32,
    maximizing: Color,
) -> MoveResult {
    alpha_beta(
        board,
        remaining_depth,
        parallel_budget,
        maximizing,
        i64::MIN,
        i64::MAX,
        &SearchStats::new(),
    )
}

/// Recursive minimax driver.
///
/// Children are derived from private copies of `board`, so parallel siblings
/// never share mutable state. `stats` is the only shared value and is atomic.
pub fn minimax(
    board: &BoardState,
    depth: i32,
    parallel_budget: u32,
    maximizing: Color,
    stats: &SearchStats,
) -> MoveResult {
    stats.visit();

    if let Some(result) = leaf_result(board, depth, maximizing, stats) {
        return result;
    }

    let moves = generate(board);
    if moves.is_empty() {
        if board.skipped_previous_ply() {
            return MoveResult::without_move(terminal_score(board, maximizing));
        }
        // A pass consumes no depth
        return minimax(&board.passed(), depth, parallel_budget, maximizing, stats);
    }

    let mut selection = Selection::new(board.mover() == maximizing);
    let child_budget = parallel_budget.saturating_sub(1);

    if parallel_budget > 0 {
        let indices: Vec<usize> = moves.iter().collect();
        let scores: Vec<(usize, i32)> = indices
            .into_par_iter()
            .map(|index| {
                let child = make_move(board, index, &moves);
                let result = minimax(&child, depth - 1, child_budget, maximizing, stats);
                (index, result.score)
            })
            .collect();
        for (index, score) in scores {
            selection.offer(index, score);
        }
    } else {
        for index in moves.iter() {
            let child = make_move(board, index, &moves);
            let result = minimax(&child, depth - 1, 0, maximizing, stats);
            selection.offer(index, result.score);
        }
    }

    selection.result()
}

/// Fail-soft alpha-beta variant of `minimax`.
///
/// Bounds are `i64` so that `WIN_SCORE` and `LOSS_SCORE` stay strictly inside
/// the initial window. Parallel nodes give every child the node's entry
/// window; sequential nodes narrow it child by child.
pub fn alpha_beta(
    board: &BoardState,
    depth: i32,
    parallel_budget: u32,
    maximizing: Color,
    mut alpha: i64,
    mut beta: i64,
    stats: &SearchStats,
) -> MoveResult {
    stats.visit();

    if let Some(result) = leaf_result(board, depth, maximizing, stats) {
        return result;
    }

    let moves = generate(board);
    if moves.is_empty() {
        if board.skipped_previous_ply() {
            return MoveResult::without_move(terminal_score(board, maximizing));
        }
        return alpha_beta(
            &board.passed(),
            depth,
            parallel_budget,
            maximizing,
            alpha,
            beta,
            stats,
        );
    }

    let maximizing_node = board.mover() == maximizing;
    let mut selection = Selection::new(maximizing_node);
    let child_budget = parallel_budget.saturating_sub(1);

    if parallel_budget > 0 {
        let indices: Vec<usize> = moves.iter().collect();
        let scores: Vec<(usize, i32)> = indices
            .into_par_iter()
            .map(|index| {
                let child = make_move(board, index, &moves);
                let result = alpha_beta(
                    &child,
                    depth - 1,
                    child_budget,
                    maximizing,
                    alpha,
                    beta,
                    stats,
                );
                (index, result.score)
            })
            .collect();
        for (index, score) in scores {
            selection.offer(index, score);
        }
        return selection.result();
    }

    for index in moves.iter() {
        let child = make_move(board, index, &moves);
        let score = alpha_beta(&child, depth - 1, 0, maximizing, alpha, beta, stats).score;
        selection.offer(index, score);

        if maximizing_node {
            alpha = alpha.max(score as i64);
        } else {
            beta = beta.min(score as i64);
        }
        if alpha >= beta {
            break;
        }
    }

    selection.result()
}

/// Search driver owning a bounded worker pool.
///
/// Parallel fan-out runs inside the engine's pool, so the number of threads
/// stays fixed however many children a node has.
pub struct SearchEngine {
    config: SearchConfig,
    pool: rayon::ThreadPool,
}

impl SearchEngine {
    /// Creates an engine for a validated configuration.
    ///
    /// # Errors
    ///
    /// `SearchError::Config` for an invalid configuration and
    /// `SearchError::ThreadPool` when the workers cannot be spawned.
    pub fn new(config: SearchConfig) -> Result<Self, SearchError> {
        config.validate()?;

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.num_threads)
            .thread_name(|i| format!("sandwich-search-{}", i))
            .build()?;
        log::trace!(
            "Search pool ready with {} threads",
            pool.current_num_threads()
        );

        Ok(Self { config, pool })
    }

    /// The engine's configuration.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Searches `board` with the configured depth and parallel budget.
    pub fn search(&self, board: &BoardState, maximizing: Color) -> SearchOutcome {
        self.search_with(
            board,
            self.config.depth,
            self.config.parallel_depth,
            maximizing,
        )
    }

    /// Searches `board` with explicit limits.
    pub fn search_with(
        &self,
        board: &BoardState,
        depth: i32,
        parallel_budget: u32,
        maximizing: Color,
    ) -> SearchOutcome {
        log::debug!(
            "Searching for {:?} at depth {} (parallel {}, pruning {})",
            board.mover(),
            depth,
            parallel_budget,
            self.config.pruning
        );

        let start = Instant::now();
        let stats = SearchStats::new();
        let result = self.pool.install(|| {
            if self.config.pruning {
                alpha_beta(
                    board,
                    depth,
                    parallel_budget,
                    maximizing,
                    i64::MIN,
                    i64::MAX,
                    &stats,
                )
            } else {
                minimax(board, depth, parallel_budget, maximizing, &stats)
            }
        });

        let passed = depth >= 1 && !board.skipped_previous_ply() && generate(board).is_empty();
        let outcome = SearchOutcome {
            result,
            depth,
            passed,
            nodes: stats.nodes(),
            leaves: stats.leaves(),
            elapsed_ms: start.elapsed().as_millis() as u64,
        };
        log::debug!("{}", outcome);
        outcome
    }

    /// `compute_best_move` on the engine's pool.
    pub fn compute_best_move(
        &self,
        board: &BoardState,
        remaining_depth: i32,
        parallel_budget: u32,
        maximizing: Color,
    ) -> MoveResult {
        self.search_with(board, remaining_depth, parallel_budget, maximizing)
            .result
    }
}
