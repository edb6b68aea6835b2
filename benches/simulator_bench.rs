//! Simulator throughput benchmarks: self-play matches per second under a
//! few turn-cap/difficulty configurations.
//!
//! Run with: `cargo bench --bench simulator`

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion, Throughput};

use periscope::decision::Difficulty;
use periscope::rng::Rng;
use periscope::simulator::{Match, Side};

fn bench_simulator(c: &mut Criterion) {
    let mut group = c.benchmark_group("simulator");
    group.sample_size(30);

    // Short match, both sides EASY (minimal belief/evaluator work per turn).
    group.bench_with_input("easy_vs_easy_cap_30", &30u32, |b, &cap| {
        b.iter_batched(
            || {
                let mut rng = Rng::new(7);
                let game = Match::new_self_play(Difficulty::EASY, Difficulty::EASY, &mut rng).with_turn_cap(cap);
                (game, rng)
            },
            |(game, mut rng)| black_box(game.run(Side::A, &mut rng)),
            BatchSize::SmallInput,
        );
    });
    group.throughput(Throughput::Elements(1));

    // Medium match, both sides NORMAL (belief sampling engaged every turn).
    group.bench_with_input("normal_vs_normal_cap_100", &100u32, |b, &cap| {
        b.iter_batched(
            || {
                let mut rng = Rng::new(7);
                let game = Match::new_self_play(Difficulty::NORMAL, Difficulty::NORMAL, &mut rng).with_turn_cap(cap);
                (game, rng)
            },
            |(game, mut rng)| black_box(game.run(Side::A, &mut rng)),
            BatchSize::SmallInput,
        );
    });
    group.throughput(Throughput::Elements(1));

    // Full-length match, both sides HARD (risk roll-out engaged every turn).
    group.bench_with_input("hard_vs_hard_cap_200", &200u32, |b, &cap| {
        b.iter_batched(
            || {
                let mut rng = Rng::new(7);
                let game = Match::new_self_play(Difficulty::HARD, Difficulty::HARD, &mut rng).with_turn_cap(cap);
                (game, rng)
            },
            |(game, mut rng)| black_box(game.run(Side::A, &mut rng)),
            BatchSize::SmallInput,
        );
    });
    group.throughput(Throughput::Elements(1));

    group.finish();
}

criterion_group!(benches, bench_simulator);
criterion_main!(benches);
