use criterion::{Criterion, black_box, criterion_group, criterion_main};

use sable::chess::Board;

fn perft(board: &Board, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }
    let player = board.current_player();
    let mut nodes = 0;
    for &mov in player.legal_moves() {
        let transition = player.make_move(mov);
        if transition.status.is_done() {
            nodes += perft(&transition.board, depth - 1);
        }
    }
    nodes
}

fn perft_benchmark(c: &mut Criterion) {
    let board = Board::initial();

    let mut group = c.benchmark_group("perft");
    group.sample_size(10);
    group.bench_function("initial_depth_2", |b| {
        b.iter(|| {
            let nodes = perft(black_box(&board), 2);
            assert_eq!(nodes, 400);
            nodes
        })
    });
    group.bench_function("initial_depth_3", |b| {
        b.iter(|| {
            let nodes = perft(black_box(&board), 3);
            assert_eq!(nodes, 8_902);
            nodes
        })
    });
    group.finish();
}

criterion_group!(benches, perft_benchmark);
criterion_main!(benches);
