//! Risk / k-step self-roll-out (§4.5): simulates the opponent's next *k*
//! turns from their point of view to estimate how close the attacker's
//! own ships are to sinking, then folds that into a risk-adjusted score.

use crate::belief::{self, Constraints};
use crate::board::{Board, Coord, ShipKind};
use crate::evaluator::{self, Abilities, Action};
use crate::rng::Rng;
use crate::view::{DamageGrid, ObserverGrid, ViewState};
use crate::weapons::{self, SensorSet};

/// Roll-out depth/sample-count knobs, threaded explicitly rather than
/// hard-coded so the tournament harness and tests can run a cheaper
/// configuration than the live default (§4.5 "default *k* = 5... default
/// 50").
#[derive(Debug, Clone, Copy)]
pub struct RiskConfig {
    pub depth: u32,
    pub sample_count: usize,
    pub endangered_threshold: f64,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            depth: 5,
            sample_count: 50,
            endangered_threshold: 0.2,
        }
    }
}

/// Per-ship accumulated threat from the rolled-out opponent turns.
#[derive(Debug, Clone)]
pub struct RolloutResult {
    pub total_expected_damage: Vec<f64>,
    pub sink_probability: Vec<f64>,
}

/// Simulates `config.depth` future opponent turns against the attacker's
/// own board, from the opponent's point of view (§4.5 steps 1–5).
///
/// `own_view` is the opponent's current observation of the attacker's
/// board; `own_board` is the attacker's true board, read only to know
/// which ships are alive and their total HP. `opponent_alive_kinds` is the
/// opponent's own still-alive fleet — §4.4's "abilities snapshot" is
/// computed "from the attacker's still-alive fleet", and inside a roll-out
/// the simulated attacker *is* the opponent, not the owner of `own_board`.
pub fn rollout(
    own_board: &Board,
    own_view: &ObserverGrid,
    opponent_alive_kinds: &[ShipKind],
    alpha: f64,
    sensors: &SensorSet,
    config: &RiskConfig,
    rng: &mut Rng,
) -> RolloutResult {
    let ship_count = own_board.ships.len();
    let mut total_expected_damage = vec![0.0; ship_count];
    let mut view = own_view.clone();

    for _ in 0..config.depth {
        let alive_kinds: Vec<ShipKind> = own_board.alive_ships().map(|s| s.kind).collect();
        if alive_kinds.is_empty() {
            break;
        }

        let constraints: Constraints = belief::derive_constraints(&view);
        let grid = match belief::sample_configurations(&alive_kinds, &constraints, config.sample_count, rng) {
            Ok(samples) => belief::marginal_grid(&samples, &view),
            Err(_) => belief::MarginalGrid::zeros(),
        };

        let current_entropy = belief::total_entropy(&grid, &view);
        let max_hp = alive_kinds.iter().map(|k| k.max_hp()).max().unwrap_or(0);
        let damage = DamageGrid::new();
        let opponent_abilities = Abilities {
            can_use_air: weapons::he_available_for_roster(opponent_alive_kinds),
            can_use_sonar: weapons::sonar_available_for_roster(opponent_alive_kinds, sensors),
            ap_damage: weapons::ap_damage_for_roster(opponent_alive_kinds.iter().copied()),
        };

        let candidates = evaluator::enumerate_candidates(&view, opponent_abilities);
        if candidates.is_empty() {
            break;
        }
        let scored = evaluator::score_candidates(
            &candidates,
            opponent_abilities,
            &grid,
            &view,
            &damage,
            max_hp,
            current_entropy,
            alpha,
        );
        let Some(chosen) = evaluator::pick_best(&scored, rng) else {
            break;
        };
        let action = chosen.action;

        let weapon_damage = match action.weapon {
            weapons::WeaponId::Ap => opponent_abilities.ap_damage,
            weapons::WeaponId::He => 1,
            weapons::WeaponId::Sonar => 0,
        };

        for coord in weapons::coverage(action.weapon, action.target) {
            if let Some((ship_id, _)) = own_board.cell(coord).occupant {
                if !own_board.ship(ship_id).sunk {
                    total_expected_damage[ship_id] += grid.get(coord) * weapon_damage as f64;
                }
            }

            if matches!(view.get(coord), ViewState::Unknown | ViewState::Suspect) {
                let state = if grid.get(coord) > 0.5 {
                    ViewState::Hit
                } else {
                    ViewState::Miss
                };
                view.set(coord, state);
            }
        }
    }

    let sink_probability = own_board
        .ships
        .iter()
        .map(|ship| {
            let total_hp = ship.max_total_hp() as f64;
            if total_hp <= 0.0 {
                0.0
            } else {
                (total_expected_damage[ship.id] / total_hp).min(1.0)
            }
        })
        .collect();

    RolloutResult {
        total_expected_damage,
        sink_probability,
    }
}

/// Ability snapshot if `removed` were sunk (§4.5 `abilitiesAfterLoss`).
pub fn abilities_after_loss(board: &Board, removed: usize, sensors: &SensorSet) -> Abilities {
    let mut hypothetical = board.clone();
    hypothetical.ship_mut(removed).sunk = true;
    for hp in hypothetical.ship_mut(removed).segment_hp.iter_mut() {
        *hp = 0;
    }
    evaluator::abilities(&hypothetical, sensors)
}

/// Normalized risk bonus for one candidate action (§4.5).
pub fn normalized_risk_bonus(
    action: Action,
    current_abilities: Abilities,
    board: &Board,
    sensors: &SensorSet,
    rollout: &RolloutResult,
    endangered_threshold: f64,
    grid: &belief::MarginalGrid,
    view: &ObserverGrid,
    damage: &DamageGrid,
    max_alive_max_hp: i32,
    current_entropy: f64,
    alpha: f64,
) -> f64 {
    let endangered: Vec<&crate::board::Ship> = board
        .ships
        .iter()
        .filter(|s| !s.sunk && rollout.sink_probability[s.id] >= endangered_threshold)
        .collect();
    if endangered.is_empty() {
        return 0.0;
    }

    let (u_current, _, _) = evaluator::utility(
        action,
        current_abilities,
        grid,
        view,
        damage,
        max_alive_max_hp,
        current_entropy,
        alpha,
    );

    let total: f64 = endangered
        .iter()
        .map(|ship| {
            let after_abilities = abilities_after_loss(board, ship.id, sensors);
            let action_available = match action.weapon {
                weapons::WeaponId::Ap => true,
                weapons::WeaponId::He => after_abilities.can_use_air,
                weapons::WeaponId::Sonar => after_abilities.can_use_sonar,
            };
            let loss = if action_available {
                let (u_after, _, _) = evaluator::utility(
                    action,
                    after_abilities,
                    grid,
                    view,
                    damage,
                    max_alive_max_hp,
                    current_entropy,
                    alpha,
                );
                u_current - u_after
            } else {
                u_current
            };
            rollout.sink_probability[ship.id] * loss
        })
        .sum();

    total / endangered.len() as f64
}

/// `finalScore(a) = U(a) * (1 + riskAwareness * normRiskBonus(a))` (§4.5).
pub fn final_score(utility: f64, risk_awareness: f64, norm_risk_bonus: f64) -> f64 {
    utility * (1.0 + risk_awareness * norm_risk_bonus)
}
