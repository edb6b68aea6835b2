use periscope::board::{Board, Coord, Orientation, ShipKind};
use periscope::decision::{decide, Difficulty};
use periscope::rng::Rng;
use periscope::view::{DamageGrid, ObserverGrid, ViewState};
use periscope::weapons::{default_sensors, WeaponId};

/// Scenario 6 (§8): a single confirmed HIT at (2,5) that the attacker has
/// already fired AP-damage-3 into (so its remaining-hp estimate is
/// saturated to zero) should no longer be the evaluator's top pick; one of
/// its orthogonal neighbors, still unknown and carrying elevated belief
/// probability, should win instead.
#[test]
fn decider_prefers_a_neighbor_over_a_saturated_hit() {
    let mut board = Board::empty();
    board.place_ship(ShipKind::Bb, Coord::new(8, 8), Orientation::Horizontal);
    assert_eq!(periscope::weapons::ap_damage(&board), 3);

    let mut view = ObserverGrid::new();
    let hit = Coord::new(2, 5);
    view.set(hit, ViewState::Hit);

    let mut damage = DamageGrid::new();
    damage.add(hit, 3);

    let neighbors = [
        Coord::new(1, 5),
        Coord::new(3, 5),
        Coord::new(2, 4),
        Coord::new(2, 6),
    ];

    let difficulty = Difficulty::custom(0.5, 0.0, 0.0).unwrap();

    for seed in 0..8 {
        let mut rng = Rng::new(seed);
        let decision = decide(
            &board,
            &view,
            &damage,
            &ShipKind::ALL,
            difficulty,
            &default_sensors(),
            None,
            &mut rng,
        );
        assert_eq!(decision.action.weapon, WeaponId::Ap);
        assert!(
            neighbors.contains(&decision.action.target),
            "expected a neighbor of the saturated hit, got {:?}",
            decision.action.target
        );
    }
}

/// Evaluator property (§8): at alpha = 0 and risk = 0 the decider chooses
/// the action with maximal expected damage — here, a confirmed HIT cell
/// with no damage recorded against it yet, whose forced probability of 1
/// beats every still-unknown neighbor.
#[test]
fn alpha_zero_risk_zero_maximizes_expected_damage() {
    let board = Board::empty();
    let mut view = ObserverGrid::new();
    let hit = Coord::new(5, 5);
    view.set(hit, ViewState::Hit);
    let damage = DamageGrid::new();
    let difficulty = Difficulty::custom(0.0, 0.0, 0.0).unwrap();

    let mut rng = Rng::new(99);
    let decision = decide(
        &board,
        &view,
        &damage,
        &ShipKind::ALL,
        difficulty,
        &default_sensors(),
        None,
        &mut rng,
    );
    let scored = decision.scored.expect("non-random decision should carry its score");
    assert_eq!(decision.action.target, hit);
    assert_eq!(decision.action.weapon, WeaponId::Ap);
    assert!(scored.expected_damage > 0.0);
}
