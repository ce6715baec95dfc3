//! Self-play demonstration
//!
//! The engine plays both colors from the starting position and prints the
//! board after every ply. Pass a configuration CSV path to override the
//! default search settings:
//!
//! ```text
//! RUST_LOG=debug cargo run --release --example self_play -- search.csv
//! ```

use sandwich::{BoardState, Color, SearchConfig, SearchEngine, load_config, play};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = match std::env::args().nth(1) {
        Some(path) => load_config(path)?,
        None => SearchConfig::default(),
    };
    println!("=== Self-play with {:?} ===\n", config);

    let engine = SearchEngine::new(config)?;
    let mut board = BoardState::initial();
    let mut consecutive_passes = 0;
    let mut ply = 0;

    println!("{}\n", board);
    while consecutive_passes < 2 {
        let mover = board.mover();
        let outcome = engine.search(&board, mover);

        match outcome.best_move() {
            Some((x, y)) => {
                board = play(&board, x, y)?;
                consecutive_passes = 0;
                ply += 1;
                println!(
                    "Ply {}: {:?} plays ({}, {}) score {} [{} nodes, {}ms]",
                    ply, mover, x, y, outcome.result.score, outcome.nodes, outcome.elapsed_ms
                );
                println!("{}\n", board);
            }
            None => {
                board = board.passed();
                consecutive_passes += 1;
                println!("{:?} passes\n", mover);
            }
        }
    }

    let black = board.count(Color::Black);
    let white = board.count(Color::White);
    println!("Final score: Black {} - White {}", black, white);
    match black.cmp(&white) {
        std::cmp::Ordering::Greater => println!("Black wins"),
        std::cmp::Ordering::Less => println!("White wins"),
        std::cmp::Ordering::Equal => println!("Draw"),
    }

    Ok(())
}
