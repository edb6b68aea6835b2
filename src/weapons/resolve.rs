//! The shared hit resolver (§4.2) plus the three weapon-specific
//! resolvers built on top of it (§4.1.1–4.1.3).

use std::collections::HashSet;

use crate::board::{Board, Coord, ShipId};
use crate::error;
use crate::view::{ObserverGrid, ViewState};

use super::{coverage, Event, LogClass, WeaponId};

/// Atomic hit semantics shared by every damage-dealing weapon (§4.2).
/// Mutates `board` and `view` in place; returns the events this single
/// resolution produced.
pub fn resolve_hit(
    coord: Coord,
    dmg: i32,
    board: &mut Board,
    view: &mut ObserverGrid,
    is_player: bool,
) -> Vec<Event> {
    debug_assert!(dmg >= 0, "resolve_hit never heals");

    if !coord.in_bounds() {
        return Vec::new();
    }
    if view.get(coord) == ViewState::Miss {
        return Vec::new();
    }

    board.cell_mut(coord).hit = true;

    let occupant = board.cell(coord).occupant;
    let Some((ship_id, segment)) = occupant else {
        view.set(coord, ViewState::Miss);
        return vec![Event::CellUpdate {
            coord,
            state: ViewState::Miss,
            mark_class: None,
        }];
    };

    if board.ship(ship_id).segment_hp[segment] <= 0 {
        // Idempotent: firing again on an already-destroyed segment is a no-op.
        return Vec::new();
    }

    let mut events = Vec::new();

    let new_hp = board.ship(ship_id).segment_hp[segment] - dmg;
    board.ship_mut(ship_id).segment_hp[segment] = new_hp;
    events.push(Event::ShipUpdate {
        ship_id,
        segment_index: Some(segment),
        new_hp,
        sunk: false,
    });

    let state = if new_hp <= 0 {
        ViewState::Destroyed
    } else {
        ViewState::Hit
    };
    view.set(coord, state);
    events.push(Event::CellUpdate {
        coord,
        state,
        mark_class: None,
    });

    let ship = board.ship(ship_id);
    if ship.is_fully_sunk() && !ship.sunk {
        let cells = ship.cells();
        board.ship_mut(ship_id).sunk = true;

        let ship = board.ship(ship_id);
        if ship.segment_hp.iter().any(|&hp| hp > 0) {
            error::inconsistent_state(format!(
                "ship {ship_id} marked sunk with a segment still above zero health"
            ));
        }

        for cell in &cells {
            view.set(*cell, ViewState::Sunk);
            events.push(Event::CellUpdate {
                coord: *cell,
                state: ViewState::Sunk,
                mark_class: None,
            });
        }

        let ship = board.ship(ship_id);
        events.push(Event::ShipUpdate {
            ship_id,
            segment_index: None,
            new_hp: 0,
            sunk: true,
        });
        events.push(Event::LogEntry {
            message: format!("{} sunk!", ship.kind.name()),
            class: LogClass::for_attacker(is_player),
        });
    }

    events
}

/// Runs `resolve_hit` across a cell list, concatenating events in order
/// and aggregating the ship ids that transitioned to sunk during this call.
pub fn resolve_multi_hit(
    cells: &[Coord],
    dmg: i32,
    board: &mut Board,
    view: &mut ObserverGrid,
    is_player: bool,
) -> (Vec<Event>, HashSet<ShipId>) {
    let mut events = Vec::new();
    let mut sunk = HashSet::new();
    for &coord in cells {
        for event in resolve_hit(coord, dmg, board, view, is_player) {
            if let Event::ShipUpdate {
                ship_id,
                sunk: true,
                ..
            } = &event
            {
                sunk.insert(*ship_id);
            }
            events.push(event);
        }
    }
    (events, sunk)
}

fn is_destroyed_segment(board: &Board, coord: Coord) -> bool {
    board
        .cell(coord)
        .occupant
        .map(|(ship_id, segment)| board.ship(ship_id).segment_hp[segment] <= 0)
        .unwrap_or(false)
}

/// `isValidTarget` for the main gun (§4.1.1): in bounds, not a confirmed
/// miss, not an already-destroyed segment.
pub fn ap_is_valid_target(coord: Coord, board: &Board, view: &ObserverGrid) -> bool {
    coord.in_bounds() && view.get(coord) != ViewState::Miss && !is_destroyed_segment(board, coord)
}

pub fn ap_resolve(
    coord: Coord,
    dmg: i32,
    board: &mut Board,
    view: &mut ObserverGrid,
    is_player: bool,
) -> (Vec<Event>, HashSet<ShipId>) {
    if !ap_is_valid_target(coord, board, view) {
        return (Vec::new(), HashSet::new());
    }
    let events = resolve_hit(coord, dmg, board, view, is_player);
    let sunk = events
        .iter()
        .filter_map(|e| match e {
            Event::ShipUpdate {
                ship_id,
                sunk: true,
                ..
            } => Some(*ship_id),
            _ => None,
        })
        .collect();
    (events, sunk)
}

/// Air strike (§4.1.2): five cells in an X pattern, 1 damage each,
/// skipping cells that are already a confirmed miss or an already-
/// destroyed segment.
pub fn he_resolve(
    center: Coord,
    board: &mut Board,
    view: &mut ObserverGrid,
    is_player: bool,
) -> (Vec<Event>, HashSet<ShipId>) {
    let targets: Vec<Coord> = coverage(WeaponId::He, center)
        .into_iter()
        .filter(|&coord| view.get(coord) != ViewState::Miss && !is_destroyed_segment(board, coord))
        .collect();
    resolve_multi_hit(&targets, 1, board, view, is_player)
}

/// Sonar (§4.1.3): non-lethal 3×3 scan. Never changes ship health, never
/// sinks anything.
pub fn sonar_resolve(
    center: Coord,
    board: &mut Board,
    view: &mut ObserverGrid,
    is_player: bool,
) -> Vec<Event> {
    let scan_area = coverage(WeaponId::Sonar, center);

    let signal = scan_area
        .iter()
        .filter(|&&coord| {
            matches!(view.get(coord), ViewState::Unknown | ViewState::Suspect)
                && board.cell(coord).occupant.is_some()
        })
        .count();

    let mut events = Vec::new();

    if signal == 0 {
        for &coord in &scan_area {
            if matches!(view.get(coord), ViewState::Unknown | ViewState::Suspect) {
                view.set(coord, ViewState::Miss);
                events.push(Event::CellUpdate {
                    coord,
                    state: ViewState::Miss,
                    mark_class: Some("sonar".to_string()),
                });
            }
        }
        events.push(Event::LogEntry {
            message: "sonar: no contact".to_string(),
            class: LogClass::for_attacker(is_player),
        });
        return events;
    }

    events.extend(resolve_hit(center, 0, board, view, is_player));

    for &coord in &scan_area {
        if coord == center {
            continue;
        }
        if view.get(coord) == ViewState::Unknown {
            view.set(coord, ViewState::Suspect);
            events.push(Event::CellUpdate {
                coord,
                state: ViewState::Suspect,
                mark_class: Some("sonar".to_string()),
            });
        }
    }
    events.push(Event::LogEntry {
        message: "sonar: contact detected".to_string(),
        class: LogClass::for_attacker(is_player),
    });

    events
}
