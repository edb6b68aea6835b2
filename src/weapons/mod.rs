//! Weapon subsystem (§4.1). A closed, finite set of weapons — main gun
//! (AP), air strike (HE), sonar — modeled as a tagged union with a static
//! dispatch table rather than the dynamic-dispatch registry the source
//! material uses, per §9's own design note.

mod resolve;

pub use resolve::{
    ap_is_valid_target, ap_resolve, he_resolve, resolve_hit, resolve_multi_hit, sonar_resolve,
};

use crate::board::{Board, Coord, ShipId, ShipKind, BOARD_SIDE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeaponId {
    Ap,
    He,
    Sonar,
}

impl WeaponId {
    pub const ALL: [WeaponId; 3] = [WeaponId::Ap, WeaponId::He, WeaponId::Sonar];

    pub fn label(self) -> &'static str {
        match self {
            WeaponId::Ap => "main gun",
            WeaponId::He => "air strike",
            WeaponId::Sonar => "sonar",
        }
    }
}

/// Which ship kinds can emit a sonar ping. Default `{DD}`, per §9's
/// resolution of the open sensor-set question; configurable so the
/// documented "SS also counts" variant can be exercised without touching
/// resolver code.
pub type SensorSet = Vec<ShipKind>;

pub fn default_sensors() -> SensorSet {
    vec![ShipKind::Dd]
}

/// Damage the attacker's main gun currently deals, determined by their
/// surviving fleet (§4.1.1). BB gives 3; SS or CL give 2; otherwise 1 —
/// this crate's resolution of the AP-damage-table open question (§9).
pub fn ap_damage(attacker_board: &Board) -> i32 {
    ap_damage_for_roster(attacker_board.alive_ships().map(|s| s.kind))
}

pub fn he_available(attacker_board: &Board) -> bool {
    attacker_board.has_alive(ShipKind::Cv)
}

pub fn sonar_available(attacker_board: &Board, sensors: &[ShipKind]) -> bool {
    sensors.iter().any(|&kind| attacker_board.has_alive(kind))
}

/// Same rule as `ap_damage`, but against a bare alive-kind roster rather
/// than a placed `Board` — used by the risk roll-out (§4.5), which only
/// knows the opponent's surviving ship kinds, not their placement.
pub fn ap_damage_for_roster(alive_kinds: impl IntoIterator<Item = ShipKind>) -> i32 {
    let mut has_bb = false;
    let mut has_ss_or_cl = false;
    for kind in alive_kinds {
        match kind {
            ShipKind::Bb => has_bb = true,
            ShipKind::Ss | ShipKind::Cl => has_ss_or_cl = true,
            _ => {}
        }
    }
    if has_bb {
        3
    } else if has_ss_or_cl {
        2
    } else {
        1
    }
}

pub fn he_available_for_roster(alive_kinds: &[ShipKind]) -> bool {
    alive_kinds.contains(&ShipKind::Cv)
}

pub fn sonar_available_for_roster(alive_kinds: &[ShipKind], sensors: &[ShipKind]) -> bool {
    sensors.iter().any(|kind| alive_kinds.contains(kind))
}

pub fn is_available(weapon: WeaponId, attacker_board: &Board, sensors: &[ShipKind]) -> bool {
    match weapon {
        WeaponId::Ap => true,
        WeaponId::He => he_available(attacker_board),
        WeaponId::Sonar => sonar_available(attacker_board, sensors),
    }
}

/// Upper bound on a weapon's single-cell damage, used to normalize
/// expected damage in the evaluator's utility (§4.4). AP's bound is its
/// current damage; HE's is fixed at 5 per spec.md §4.4; sonar deals no
/// damage so has no meaningful bound.
pub fn max_damage(weapon: WeaponId, current_ap_damage: i32) -> f64 {
    match weapon {
        WeaponId::Ap => current_ap_damage as f64,
        WeaponId::He => 5.0,
        WeaponId::Sonar => 0.0,
    }
}

/// The cells a weapon would preview or resolve against when aimed at
/// `center`, clipped to the board (§4.1).
pub fn coverage(weapon: WeaponId, center: Coord) -> Vec<Coord> {
    match weapon {
        WeaponId::Ap => vec![center],
        WeaponId::He => {
            const DIAGONALS: [(i32, i32); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];
            let mut cells = vec![center];
            for (dr, dc) in DIAGONALS {
                let coord = Coord::new(center.r + dr, center.c + dc);
                if coord.in_bounds() {
                    cells.push(coord);
                }
            }
            cells
        }
        WeaponId::Sonar => {
            let mut cells = Vec::with_capacity(9);
            for dr in -1..=1 {
                for dc in -1..=1 {
                    let coord = Coord::new(center.r + dr, center.c + dc);
                    if coord.in_bounds() {
                        cells.push(coord);
                    }
                }
            }
            cells
        }
    }
}

pub fn is_valid_center(center: Coord) -> bool {
    center.r >= 0 && center.r < BOARD_SIDE as i32 && center.c >= 0 && center.c < BOARD_SIDE as i32
}

/// An observer-facing event emitted by a resolver (§4.1). Resolvers mutate
/// the board/ship records passed in and return an owned `Vec<Event>`; they
/// never call back into a foreign sink mid-resolution.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    CellUpdate {
        coord: Coord,
        state: crate::view::ViewState,
        mark_class: Option<String>,
    },
    ShipUpdate {
        ship_id: ShipId,
        segment_index: Option<usize>,
        new_hp: i32,
        sunk: bool,
    },
    LogEntry {
        message: String,
        class: LogClass,
    },
    /// Reserved for animation cues; ignored by the core.
    Effect { name: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogClass {
    Player,
    Ai,
}

impl LogClass {
    pub fn for_attacker(is_player: bool) -> Self {
        if is_player {
            LogClass::Player
        } else {
            LogClass::Ai
        }
    }
}
