//! Action evaluator (§4.4): enumerates candidate actions, scores each with
//! the unified information/damage utility, and picks a winner — with a
//! random-play short circuit gated by the difficulty's `randomness`.

use crate::belief::{self, MarginalGrid};
use crate::board::{Board, Coord, ShipKind, BOARD_SIDE};
use crate::rng::Rng;
use crate::view::{DamageGrid, ObserverGrid, ViewState};
use crate::weapons::{self, SensorSet, WeaponId};

const EPSILON: f64 = 1e-6;

/// What the attacker's surviving fleet currently permits (§4.4).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Abilities {
    pub can_use_air: bool,
    pub can_use_sonar: bool,
    pub ap_damage: i32,
}

pub fn abilities(attacker_board: &Board, sensors: &SensorSet) -> Abilities {
    Abilities {
        can_use_air: weapons::he_available(attacker_board),
        can_use_sonar: weapons::sonar_available(attacker_board, sensors),
        ap_damage: weapons::ap_damage(attacker_board),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Action {
    pub weapon: WeaponId,
    pub target: Coord,
}

/// A scored candidate, kept around (rather than discarded once the winner
/// is known) so callers can log or assert against the intermediate
/// quantities that produced it.
#[derive(Debug, Clone, Copy)]
pub struct ScoredAction {
    pub action: Action,
    pub expected_damage: f64,
    pub info_gain: f64,
    pub utility: f64,
}

/// Candidate actions for the current view grid (§4.4 enumeration rule).
pub fn enumerate_candidates(view: &ObserverGrid, abilities: Abilities) -> Vec<Action> {
    let mut candidates = Vec::new();
    for (coord, state) in view.iter_cells() {
        match state {
            ViewState::Miss | ViewState::Sunk => continue,
            ViewState::Destroyed => {
                if abilities.can_use_air {
                    candidates.push(Action {
                        weapon: WeaponId::He,
                        target: coord,
                    });
                }
            }
            ViewState::Hit | ViewState::Unknown | ViewState::Suspect => {
                candidates.push(Action {
                    weapon: WeaponId::Ap,
                    target: coord,
                });
                if abilities.can_use_air {
                    candidates.push(Action {
                        weapon: WeaponId::He,
                        target: coord,
                    });
                }
                if abilities.can_use_sonar
                    && matches!(state, ViewState::Unknown | ViewState::Suspect)
                {
                    candidates.push(Action {
                        weapon: WeaponId::Sonar,
                        target: coord,
                    });
                }
            }
        }
    }
    candidates
}

/// Estimated remaining health of the largest still-alive target at
/// `coord`, given only the attacker's own damage-dealt record (§4.4).
pub fn estimated_remaining(max_alive_max_hp: i32, damage: &DamageGrid, coord: Coord) -> f64 {
    (max_alive_max_hp as f64 - damage.get(coord) as f64).max(0.0)
}

/// The largest `maxHp` among the defender's still-alive ship kinds, as
/// known to the attacker from the closed roster of five kinds (§3/§4.4).
pub fn max_alive_max_hp(defender_alive_kinds: &[ShipKind]) -> i32 {
    defender_alive_kinds.iter().map(|k| k.max_hp()).max().unwrap_or(0)
}

fn effective_damage(weapon_damage: i32, max_alive_max_hp: i32, damage: &DamageGrid, coord: Coord) -> f64 {
    let remaining = estimated_remaining(max_alive_max_hp, damage, coord);
    (weapon_damage as f64).min(remaining)
}

/// Expected damage of `action`, summing `p(r,c) * effectiveDamage(r,c)`
/// over its coverage (§4.4). Sonar always evaluates to zero.
pub fn expected_damage(
    action: Action,
    abilities: Abilities,
    grid: &MarginalGrid,
    max_alive_max_hp: i32,
    damage: &DamageGrid,
) -> f64 {
    if action.weapon == WeaponId::Sonar {
        return 0.0;
    }
    let weapon_damage = match action.weapon {
        WeaponId::Ap => abilities.ap_damage,
        WeaponId::He => 1,
        WeaponId::Sonar => 0,
    };
    weapons::coverage(action.weapon, action.target)
        .into_iter()
        .map(|coord| grid.get(coord) * effective_damage(weapon_damage, max_alive_max_hp, damage, coord))
        .sum()
}

fn conditional_entropy_for(
    action: Action,
    grid: &MarginalGrid,
    view: &ObserverGrid,
    current_entropy: f64,
) -> f64 {
    let coverage = weapons::coverage(action.weapon, action.target);
    match action.weapon {
        WeaponId::Sonar => {
            belief::conditional_entropy_sonar(grid, view, current_entropy, action.target, &coverage)
        }
        WeaponId::Ap | WeaponId::He => {
            belief::conditional_entropy_attack(grid, current_entropy, &coverage)
        }
    }
}

/// The unified utility of §4.4, parameterized by `alpha`.
pub fn utility(
    action: Action,
    abilities: Abilities,
    grid: &MarginalGrid,
    view: &ObserverGrid,
    damage: &DamageGrid,
    max_alive_max_hp: i32,
    current_entropy: f64,
    alpha: f64,
) -> (f64, f64, f64) {
    let conditional = conditional_entropy_for(action, grid, view, current_entropy);
    let gain = belief::info_gain(current_entropy, conditional);
    let norm_info_gain = if current_entropy <= EPSILON {
        0.0
    } else {
        gain / current_entropy
    };

    if action.weapon == WeaponId::Sonar {
        return (alpha * norm_info_gain, 0.0, gain);
    }

    let damage_value = expected_damage(action, abilities, grid, max_alive_max_hp, damage);
    let weapon_max_damage = weapons::max_damage(action.weapon, abilities.ap_damage);
    let norm_damage = if weapon_max_damage <= EPSILON {
        0.0
    } else {
        damage_value / weapon_max_damage
    };
    let u = alpha * norm_info_gain + (1.0 - alpha) * norm_damage;
    (u, damage_value, gain)
}

/// Scores every candidate and returns them all, highest utility last is
/// NOT guaranteed — callers should use `pick_best` for selection.
pub fn score_candidates(
    candidates: &[Action],
    abilities: Abilities,
    grid: &MarginalGrid,
    view: &ObserverGrid,
    damage: &DamageGrid,
    max_alive_max_hp: i32,
    current_entropy: f64,
    alpha: f64,
) -> Vec<ScoredAction> {
    candidates
        .iter()
        .map(|&action| {
            let (u, dmg, gain) = utility(
                action,
                abilities,
                grid,
                view,
                damage,
                max_alive_max_hp,
                current_entropy,
                alpha,
            );
            ScoredAction {
                action,
                expected_damage: dmg,
                info_gain: gain,
                utility: u,
            }
        })
        .collect()
}

/// Retains candidates within `EPSILON` of the best score and draws
/// uniformly among them (§4.4 tie-breaking).
pub fn pick_best(scored: &[ScoredAction], rng: &mut Rng) -> Option<ScoredAction> {
    let best = scored.iter().map(|s| s.utility).fold(f64::MIN, f64::max);
    let tied: Vec<&ScoredAction> = scored.iter().filter(|s| s.utility >= best - EPSILON).collect();
    let idx = rng.choose_index(tied.len())?;
    Some(*tied[idx])
}

/// Updates the damage-dealt grid for a committed action (§4.4).
pub fn commit(action: Action, abilities: Abilities, damage: &mut DamageGrid) {
    match action.weapon {
        WeaponId::Ap => damage.add(action.target, abilities.ap_damage),
        WeaponId::He => {
            for coord in weapons::coverage(WeaponId::He, action.target) {
                damage.add(coord, 1);
            }
        }
        WeaponId::Sonar => {}
    }
}

/// The random-play fallback of §4.4: a non-struck cell, then a weapon
/// choice biased 0.1/0.1/else toward HE/Sonar/AP.
pub fn random_action(view: &ObserverGrid, abilities: Abilities, rng: &mut Rng) -> Option<Action> {
    const MAX_ATTEMPTS: usize = 200;

    let mut target = None;
    for _ in 0..MAX_ATTEMPTS {
        let r = rng.next_range(0, BOARD_SIDE as i32);
        let c = rng.next_range(0, BOARD_SIDE as i32);
        let coord = Coord::new(r, c);
        if !matches!(
            view.get(coord),
            ViewState::Miss | ViewState::Destroyed | ViewState::Sunk
        ) {
            target = Some(coord);
            break;
        }
    }
    let target = target.or_else(|| {
        view.iter_cells()
            .find(|(_, state)| *state != ViewState::Miss)
            .map(|(coord, _)| coord)
    })?;

    let weapon = if abilities.can_use_air && rng.next_bool(0.1) {
        WeaponId::He
    } else if abilities.can_use_sonar && rng.next_bool(0.1) {
        WeaponId::Sonar
    } else {
        WeaponId::Ap
    };

    Some(Action { weapon, target })
}
