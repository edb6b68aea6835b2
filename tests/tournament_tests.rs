use periscope::tournament::{build_grid, run, GridRange};

/// End-to-end: a small round-robin over a 2x2 grid produces one ranked
/// `ConfigStats` per grid point, sorted by descending win rate, with every
/// configuration having played every other one exactly `games_per_pair`
/// times per distinct pairing.
#[test]
fn small_grid_round_robin_produces_a_full_ranking() {
    let alpha = GridRange { min: 0.0, max: 1.0, step: 1.0 };
    let risk = GridRange { min: 0.0, max: 0.0, step: 1.0 };
    let configs = build_grid(alpha, risk);
    assert_eq!(configs.len(), 2);

    let games_per_pair = 4;
    let results = run(&configs, games_per_pair, 1, 123);

    assert_eq!(results.len(), 2);
    for stat in &results {
        assert_eq!(stat.games, games_per_pair);
        assert_eq!(stat.wins + stat.losses + stat.draws, stat.games);
    }
    for pair in results.windows(2) {
        assert!(pair[0].win_rate >= pair[1].win_rate);
    }
}

/// Running the same grid with the same base seed twice yields identical
/// aggregated stats (§5: no implicit wall-clock entropy, so a tournament
/// seeded identically reproduces identical results).
#[test]
fn tournament_run_is_deterministic_for_a_fixed_base_seed() {
    let alpha = GridRange { min: 0.0, max: 1.0, step: 0.5 };
    let risk = GridRange { min: 0.0, max: 0.0, step: 1.0 };
    let configs = build_grid(alpha, risk);

    let first = run(&configs, 3, 1, 77);
    let second = run(&configs, 3, 1, 77);

    for (a, b) in first.iter().zip(second.iter()) {
        assert_eq!(a.config, b.config);
        assert_eq!(a.wins, b.wins);
        assert_eq!(a.losses, b.losses);
        assert_eq!(a.draws, b.draws);
        assert_eq!(a.avg_turns, b.avg_turns);
    }
}
