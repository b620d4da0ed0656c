use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use sweeper_core::{Game, GameConfig, MineLayout};

fn open_empty_board(c: &mut Criterion) {
    let layout = MineLayout::from_mine_coords((200, 200), &[(199, 199)]).unwrap();
    c.bench_function("flood fill 200x200", |b| {
        b.iter(|| {
            let mut game = Game::new(layout.clone());
            black_box(game.activate((0, 0)).unwrap())
        })
    });
}

fn random_games(c: &mut Criterion) {
    let config = GameConfig::default();
    c.bench_function("random 10x10 first move", |b| {
        let mut seed = 0;
        b.iter(|| {
            seed += 1;
            let mut game = Game::random(config, seed).unwrap();
            black_box(game.activate((0, 0)).unwrap())
        })
    });
}

criterion_group!(benches, open_empty_board, random_games);
criterion_main!(benches);
