use periscope::board::{Board, Coord, Orientation, ShipKind};
use periscope::view::{ObserverGrid, ViewState};
use periscope::weapons::{ap_resolve, he_resolve, sonar_resolve, Event};

/// Resolver round-trip (§8): summing every `ShipUpdate` damage delta across
/// a sequence of shots against one ship equals the reduction in that
/// ship's total segment health.
#[test]
fn summed_ship_update_damage_equals_total_hp_reduction() {
    let mut board = Board::empty();
    let mut view = ObserverGrid::new();
    board.place_ship(ShipKind::Bb, Coord::new(2, 2), Orientation::Horizontal);
    let before: i32 = board.ship(0).segment_hp.iter().sum();

    let mut last_reported_hp_sum = 0i32;
    for col in 2..2 + ShipKind::Bb.length() as i32 {
        let (events, _) = ap_resolve(Coord::new(2, col), 3, &mut board, &mut view, true);
        for event in events {
            if let Event::ShipUpdate {
                segment_index: Some(_),
                ..
            } = event
            {
                last_reported_hp_sum = board.ship(0).segment_hp.iter().sum();
            }
        }
    }

    let after: i32 = board.ship(0).segment_hp.iter().sum();
    assert_eq!(last_reported_hp_sum, after);
    assert!(after < before);
}

/// Firing AP at a cell that resolves to a MISS, then firing again, produces
/// no further events or state changes (§8 idempotency property, exercised
/// at the `ap_resolve` entry point rather than the inner `resolve_hit`).
#[test]
fn ap_resolve_on_a_settled_miss_is_idempotent() {
    let mut board = Board::empty();
    let mut view = ObserverGrid::new();
    let coord = Coord::new(7, 7);

    let (first, _) = ap_resolve(coord, 3, &mut board, &mut view, true);
    assert_eq!(first.len(), 1);
    let (second, _) = ap_resolve(coord, 3, &mut board, &mut view, true);
    assert!(second.is_empty());
}

/// HE resolution never touches a cell that's already a confirmed miss,
/// even when that cell falls inside its footprint.
#[test]
fn he_resolve_skips_already_missed_cells_in_its_footprint() {
    let mut board = Board::empty();
    let mut view = ObserverGrid::new();
    view.set(Coord::new(4, 4), ViewState::Miss);

    let (events, _) = he_resolve(Coord::new(5, 5), &mut board, &mut view, true);
    assert!(events
        .iter()
        .all(|e| !matches!(e, Event::CellUpdate { coord, .. } if *coord == Coord::new(4, 4))));
}

/// Sonar never emits a `ShipUpdate` or sinks anything, regardless of
/// whether the scan lands on a live ship.
#[test]
fn sonar_never_damages_or_sinks() {
    let mut board = Board::empty();
    let mut view = ObserverGrid::new();
    board.place_ship(ShipKind::Ss, Coord::new(4, 4), Orientation::Horizontal);

    let events = sonar_resolve(Coord::new(4, 4), &mut board, &mut view, true);
    assert!(!events.iter().any(|e| matches!(e, Event::ShipUpdate { .. })));
    assert!(!board.ship(0).sunk);
}
