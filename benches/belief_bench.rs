//! Compare sequential vs parallel belief sampling run times.
//!
//! Run with: `cargo bench --bench belief`

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use periscope::belief::{derive_constraints, sample_configurations, sample_configurations_parallel};
use periscope::board::{Coord, ShipKind};
use periscope::view::{ObserverGrid, ViewState};

fn lightly_observed_view() -> ObserverGrid {
    let mut view = ObserverGrid::new();
    view.set(Coord::new(0, 0), ViewState::Miss);
    view.set(Coord::new(9, 9), ViewState::Miss);
    view.set(Coord::new(4, 4), ViewState::Hit);
    view.set(Coord::new(5, 5), ViewState::Suspect);
    view
}

fn bench_sampling_sequential_vs_parallel(c: &mut Criterion) {
    let roster = ShipKind::ALL.to_vec();
    let view = lightly_observed_view();
    let constraints = derive_constraints(&view);
    let target_m = 700;
    let seed = 42u64;

    let mut group = c.benchmark_group("belief_sampling");
    group.sample_size(20);
    group.measurement_time(std::time::Duration::from_secs(10));

    group.bench_function("sequential", |b| {
        b.iter(|| {
            let mut rng = periscope::rng::Rng::new(seed);
            black_box(sample_configurations(&roster, &constraints, target_m, &mut rng).unwrap())
        });
    });

    group.bench_function("parallel", |b| {
        b.iter(|| black_box(sample_configurations_parallel(&roster, &constraints, target_m, seed).unwrap()));
    });

    group.finish();
}

criterion_group!(benches, bench_sampling_sequential_vs_parallel);
criterion_main!(benches);
