//! Fog-of-war observer grid and the attacker-owned damage-dealt grid (§3).

use crate::board::{Coord, BOARD_SIDE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewState {
    Unknown,
    Miss,
    Hit,
    Destroyed,
    Suspect,
    Sunk,
}

impl ViewState {
    pub fn is_struck(self) -> bool {
        !matches!(self, ViewState::Unknown | ViewState::Suspect)
    }

    pub fn must_avoid(self) -> bool {
        matches!(self, ViewState::Miss | ViewState::Sunk)
    }

    pub fn must_hit(self) -> bool {
        matches!(self, ViewState::Hit | ViewState::Destroyed)
    }
}

/// A side's view of the opponent's board: one `ViewState` per cell.
#[derive(Debug, Clone)]
pub struct ObserverGrid {
    states: Vec<ViewState>,
}

impl ObserverGrid {
    pub fn new() -> Self {
        Self {
            states: vec![ViewState::Unknown; BOARD_SIDE * BOARD_SIDE],
        }
    }

    pub fn get(&self, coord: Coord) -> ViewState {
        self.states[coord.index()]
    }

    pub fn set(&mut self, coord: Coord, state: ViewState) {
        self.states[coord.index()] = state;
    }

    pub fn iter_cells(&self) -> impl Iterator<Item = (Coord, ViewState)> + '_ {
        (0..BOARD_SIDE as i32).flat_map(move |r| {
            (0..BOARD_SIDE as i32).map(move |c| {
                let coord = Coord::new(r, c);
                (coord, self.get(coord))
            })
        })
    }
}

impl Default for ObserverGrid {
    fn default() -> Self {
        Self::new()
    }
}

/// Cumulative damage dealt by one attacker, keyed by target coordinate.
/// Deliberately information-poor: it records only what the attacker has
/// observably dealt, never the defender's true segment health (§9).
#[derive(Debug, Clone)]
pub struct DamageGrid {
    damage: Vec<i32>,
}

impl DamageGrid {
    pub fn new() -> Self {
        Self {
            damage: vec![0; BOARD_SIDE * BOARD_SIDE],
        }
    }

    pub fn get(&self, coord: Coord) -> i32 {
        self.damage[coord.index()]
    }

    pub fn add(&mut self, coord: Coord, amount: i32) {
        self.damage[coord.index()] += amount;
    }
}

impl Default for DamageGrid {
    fn default() -> Self {
        Self::new()
    }
}
