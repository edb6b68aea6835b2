//! Ship deployment policy (§4.7): randomized but spread-out placement of
//! one side's five-ship roster.

use crate::board::{ship_cells, Board, Coord, Orientation, ShipKind, BOARD_SIDE};
use crate::rng::Rng;

const IDEAL_SPACING: f64 = 5.0;
const MIN_SPACING: f64 = 1.5;
const SPACING_STEP: f64 = 0.5;
const FALLBACK_TOP_N: usize = 5;

#[derive(Debug, Clone, Copy)]
struct Candidate {
    origin: Coord,
    orientation: Orientation,
    min_distance: f64,
}

fn legal_placements(kind: ShipKind, occupied: &[Coord]) -> Vec<(Coord, Orientation)> {
    let len = kind.length() as i32;
    let mut placements = Vec::new();
    for r in 0..BOARD_SIDE as i32 {
        for c in 0..BOARD_SIDE as i32 {
            for orientation in [Orientation::Horizontal, Orientation::Vertical] {
                let fits = match orientation {
                    Orientation::Horizontal => c + len <= BOARD_SIDE as i32,
                    Orientation::Vertical => r + len <= BOARD_SIDE as i32,
                };
                if !fits {
                    continue;
                }
                let cells = ship_cells(kind, Coord::new(r, c), orientation);
                if cells.iter().any(|cell| occupied.contains(cell)) {
                    continue;
                }
                placements.push((Coord::new(r, c), orientation));
            }
        }
    }
    placements
}

fn euclidean_distance(a: Coord, b: Coord) -> f64 {
    let dr = (a.r - b.r) as f64;
    let dc = (a.c - b.c) as f64;
    (dr * dr + dc * dc).sqrt()
}

fn min_distance_to(cells: &[Coord], occupied: &[Coord]) -> f64 {
    cells
        .iter()
        .flat_map(|&cell| occupied.iter().map(move |&other| euclidean_distance(cell, other)))
        .fold(f64::INFINITY, f64::min)
}

/// Picks one placement for `kind` given the cells already occupied,
/// applying the stepped-relaxation distance rule (§4.7). Returns `None`
/// if `kind` has no legal placement at all.
fn choose_placement(kind: ShipKind, occupied: &[Coord], rng: &mut Rng) -> Option<(Coord, Orientation)> {
    let legal = legal_placements(kind, occupied);
    if legal.is_empty() {
        return None;
    }
    if occupied.is_empty() {
        let idx = rng.choose_index(legal.len())?;
        return Some(legal[idx]);
    }

    let candidates: Vec<Candidate> = legal
        .into_iter()
        .map(|(origin, orientation)| {
            let cells = ship_cells(kind, origin, orientation);
            Candidate {
                origin,
                orientation,
                min_distance: min_distance_to(&cells, occupied),
            }
        })
        .collect();

    let mut threshold = IDEAL_SPACING;
    while threshold >= MIN_SPACING {
        let survivors: Vec<&Candidate> = candidates.iter().filter(|c| c.min_distance >= threshold).collect();
        if !survivors.is_empty() {
            let idx = rng.choose_index(survivors.len())?;
            return Some((survivors[idx].origin, survivors[idx].orientation));
        }
        threshold -= SPACING_STEP;
    }

    let mut ranked = candidates.clone();
    ranked.sort_by(|a, b| b.min_distance.total_cmp(&a.min_distance));
    ranked.truncate(FALLBACK_TOP_N.min(ranked.len()));
    let idx = rng.choose_index(ranked.len())?;
    Some((ranked[idx].origin, ranked[idx].orientation))
}

/// Deploys a full five-ship roster onto a fresh board, shuffling ship
/// order and drawing each placement per `choose_placement` (§4.7).
pub fn deploy_side(rng: &mut Rng) -> Board {
    let mut order = ShipKind::ALL.to_vec();
    rng.shuffle(&mut order);

    let mut board = Board::empty();
    let mut occupied: Vec<Coord> = Vec::new();

    for kind in order {
        let (origin, orientation) = choose_placement(kind, &occupied, rng)
            .expect("the five-ship roster always has a legal placement on a 10x10 board");
        board.place_ship(kind, origin, orientation);
        occupied.extend(ship_cells(kind, origin, orientation));
    }

    board
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deploy_side_places_all_five_ships_without_overlap() {
        let mut rng = Rng::new(12345);
        let board = deploy_side(&mut rng);
        assert_eq!(board.ships.len(), 5);

        let mut seen = std::collections::HashSet::new();
        for ship in &board.ships {
            for cell in ship.cells() {
                assert!(seen.insert(cell), "ship cells must not overlap");
            }
        }
    }

    #[test]
    fn deploy_side_is_deterministic_for_a_fixed_seed() {
        let mut rng_a = Rng::new(7);
        let mut rng_b = Rng::new(7);
        let board_a = deploy_side(&mut rng_a);
        let board_b = deploy_side(&mut rng_b);
        for (a, b) in board_a.ships.iter().zip(board_b.ships.iter()) {
            assert_eq!(a.kind, b.kind);
            assert_eq!(a.origin, b.origin);
            assert_eq!(a.orientation, b.orientation);
        }
    }

    #[test]
    fn first_ship_has_no_distance_constraint() {
        let mut rng = Rng::new(1);
        let placement = choose_placement(ShipKind::Cv, &[], &mut rng);
        assert!(placement.is_some());
    }
}
