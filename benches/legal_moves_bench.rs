use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use sandwich::{BoardState, Color, generate, make_move, play};

/// Benchmark generate() on the initial position
fn bench_generate_initial(c: &mut Criterion) {
    let board = BoardState::initial();

    c.bench_function("generate_initial", |b| {
        b.iter(|| black_box(generate(black_box(&board))))
    });
}

/// Benchmark generate() on various board states
fn bench_generate_various_states(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_states");

    let initial = BoardState::initial();
    group.bench_with_input(
        BenchmarkId::new("initial", "4_moves"),
        &initial,
        |b, board| b.iter(|| black_box(generate(black_box(board)))),
    );

    // Opening line followed by both sides
    let mut midgame = initial;
    for (x, y) in [(4, 2), (5, 2), (5, 3), (3, 2), (2, 2), (5, 4)] {
        midgame = match play(&midgame, x, y) {
            Ok(next) => next,
            Err(_) => break,
        };
    }
    group.bench_with_input(
        BenchmarkId::new("midgame", "opening_line"),
        &midgame,
        |b, board| b.iter(|| black_box(generate(black_box(board)))),
    );

    let empty = BoardState::empty(Color::Black);
    group.bench_with_input(
        BenchmarkId::new("empty", "no_moves"),
        &empty,
        |b, board| b.iter(|| black_box(generate(black_box(board)))),
    );

    group.finish();
}

/// Benchmark deriving every child of a position
fn bench_make_move(c: &mut Criterion) {
    let board = BoardState::initial();
    let moves = generate(&board);

    c.bench_function("make_move_all_children", |b| {
        b.iter(|| {
            for index in moves.iter() {
                black_box(make_move(black_box(&board), index, &moves));
            }
        })
    });
}

/// Benchmark packed cell access against whole-board counting
fn bench_cell_access(c: &mut Criterion) {
    let board = BoardState::initial();
    let mut group = c.benchmark_group("cell_access");

    group.bench_function("get_all_cells", |b| {
        b.iter(|| {
            for index in 0..64 {
                black_box(board.get_index(black_box(index)));
            }
        })
    });
    group.bench_function("count_black", |b| {
        b.iter(|| black_box(board.count(black_box(Color::Black))))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_generate_initial,
    bench_generate_various_states,
    bench_make_move,
    bench_cell_access
);
criterion_main!(benches);
