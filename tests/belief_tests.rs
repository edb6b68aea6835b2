use periscope::belief::{derive_constraints, marginal_grid, sample_configurations, Constraints};
use periscope::board::{Board, Coord, Orientation, ShipKind};
use periscope::rng::Rng;
use periscope::view::{ObserverGrid, ViewState};

fn defender_roster() -> Vec<ShipKind> {
    ShipKind::ALL.to_vec()
}

/// Belief sampler property (§8): every sample avoids every MISS and SUNK
/// cell, and every accepted sample covers every HIT/DESTROYED cell.
#[test]
fn samples_respect_hard_constraints_on_a_lightly_observed_board() {
    let mut view = ObserverGrid::new();
    view.set(Coord::new(0, 0), ViewState::Miss);
    view.set(Coord::new(9, 9), ViewState::Miss);
    view.set(Coord::new(5, 5), ViewState::Hit);

    let constraints = derive_constraints(&view);
    assert_eq!(constraints.must_hit, vec![Coord::new(5, 5)]);
    assert!(constraints.must_avoid.contains(&Coord::new(0, 0)));
    assert!(constraints.must_avoid.contains(&Coord::new(9, 9)));

    let mut rng = Rng::new(42);
    let samples = sample_configurations(&defender_roster(), &constraints, 100, &mut rng)
        .expect("a lightly-constrained 10x10 board should always admit samples");

    for configuration in &samples {
        let mut covered = Vec::new();
        for placement in configuration {
            for cell in placement.cells() {
                assert!(
                    !constraints.must_avoid.contains(&cell),
                    "sample placed a ship on a must-avoid cell"
                );
                covered.push(cell);
            }
        }
        for required in &constraints.must_hit {
            assert!(covered.contains(required), "sample failed to cover a must-hit cell");
        }
    }
}

/// With no observations at all, the marginal grid should be roughly
/// uniform across the board (within sampler variance) rather than
/// concentrated anywhere in particular (§8 convergence property).
#[test]
fn marginal_grid_is_roughly_uniform_with_no_observations() {
    let view = ObserverGrid::new();
    let constraints = derive_constraints(&view);
    let mut rng = Rng::new(7);
    let samples = sample_configurations(&defender_roster(), &constraints, 400, &mut rng)
        .expect("an unconstrained board should always admit samples");
    let grid = marginal_grid(&samples, &view);

    let corner = grid.get(Coord::new(0, 0));
    let center = grid.get(Coord::new(4, 4));
    let edge = grid.get(Coord::new(9, 0));

    // None of these should be near 0 or 1 on an unconstrained board, and
    // they should land within the same rough band as each other.
    for p in [corner, center, edge] {
        assert!(p > 0.05 && p < 0.95, "unconstrained probability {p} is implausibly extreme");
    }
    assert!((corner - center).abs() < 0.35);
}

/// A HIT cell is forced to probability 1 and a SUNK/MISS cell is forced
/// to probability 0 in every derived marginal grid (§8 universal
/// invariant), independent of what the raw sample coverage looked like.
#[test]
fn hit_and_miss_cells_are_forced_regardless_of_roster() {
    let mut view = ObserverGrid::new();
    view.set(Coord::new(2, 2), ViewState::Hit);
    view.set(Coord::new(3, 3), ViewState::Miss);

    let constraints = derive_constraints(&view);
    let mut rng = Rng::new(123);
    let samples = sample_configurations(&[ShipKind::Dd], &constraints, 50, &mut rng).unwrap();
    let grid = marginal_grid(&samples, &view);

    assert_eq!(grid.get(Coord::new(2, 2)), 1.0);
    assert_eq!(grid.get(Coord::new(3, 3)), 0.0);
}

/// Placing a real ship and deriving constraints straight off the board's
/// own cells should never itself be treated as a contradiction — a smoke
/// check that `derive_constraints` only reacts to the *view*, not the
/// hidden board.
#[test]
fn derive_constraints_ignores_the_hidden_board() {
    let mut board = Board::empty();
    board.place_ship(ShipKind::Cv, Coord::new(0, 0), Orientation::Horizontal);
    let view = ObserverGrid::new();

    let Constraints {
        must_hit,
        must_avoid,
        suspect,
    } = derive_constraints(&view);
    assert!(must_hit.is_empty());
    assert!(must_avoid.is_empty());
    assert!(suspect.is_empty());
    // The board's own placement is irrelevant to the attacker's view.
    assert!(board.has_alive(ShipKind::Cv));
}
