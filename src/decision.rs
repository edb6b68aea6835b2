//! Difficulty presets and the top-level `decide()` entry point that wires
//! the belief engine, evaluator, and risk roll-out together (§4.4/§4.5/§6).

use crate::belief;
use crate::board::{Board, ShipKind};
use crate::error::{CoreError, CoreResult};
use crate::evaluator::{self, Abilities, Action, ScoredAction};
use crate::risk::{self, RiskConfig};
use crate::rng::Rng;
use crate::view::{DamageGrid, ObserverGrid};
use crate::weapons::SensorSet;

/// Live sample count for the belief engine used directly by a decision
/// (as opposed to the cheaper roll-out sample count in `RiskConfig`),
/// per §6's secondary-constants table.
pub const LIVE_SAMPLE_COUNT: usize = 700;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Difficulty {
    pub alpha: f64,
    pub randomness: f64,
    pub risk_awareness: f64,
}

impl Difficulty {
    pub const EASY: Difficulty = Difficulty {
        alpha: 0.1,
        randomness: 0.6,
        risk_awareness: 0.1,
    };
    pub const NORMAL: Difficulty = Difficulty {
        alpha: 0.4,
        randomness: 0.3,
        risk_awareness: 0.2,
    };
    pub const HARD: Difficulty = Difficulty {
        alpha: 0.7,
        randomness: 0.0,
        risk_awareness: 0.4,
    };

    /// Rejects any scalar outside `[0, 1]` rather than silently clamping
    /// it, per §6's "custom difficulty validation" rule (a generalization
    /// of §7 error kind 1 to configuration input).
    pub fn custom(alpha: f64, randomness: f64, risk_awareness: f64) -> CoreResult<Difficulty> {
        for (name, value) in [
            ("alpha", alpha),
            ("randomness", randomness),
            ("riskAwareness", risk_awareness),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(CoreError::InvalidPlacement(format!(
                    "{name} must be within [0, 1], got {value}"
                )));
            }
        }
        Ok(Difficulty {
            alpha,
            randomness,
            risk_awareness,
        })
    }
}

/// The outcome of a single `decide()` call, kept alongside the chosen
/// action for callers that want to log or assert against it.
#[derive(Debug, Clone, Copy)]
pub struct Decision {
    pub action: Action,
    pub scored: Option<ScoredAction>,
    pub was_random: bool,
}

/// Runs the belief engine, evaluator, and (when `risk_awareness > 0` and a
/// defender view is supplied) the risk roll-out, returning the chosen
/// action (§4.4, §4.5, §6 `decide`).
pub fn decide(
    attacker_board: &Board,
    view: &ObserverGrid,
    damage: &DamageGrid,
    defender_alive_kinds: &[ShipKind],
    difficulty: Difficulty,
    sensors: &SensorSet,
    defender_view_of_own_board: Option<&ObserverGrid>,
    rng: &mut Rng,
) -> Decision {
    let abilities = evaluator::abilities(attacker_board, sensors);

    if rng.next_bool(difficulty.randomness) {
        if let Some(action) = evaluator::random_action(view, abilities, rng) {
            return Decision {
                action,
                scored: None,
                was_random: true,
            };
        }
    }

    let constraints = belief::derive_constraints(view);
    let max_hp = evaluator::max_alive_max_hp(defender_alive_kinds);

    let grid = match belief::sample_configurations_parallel(
        defender_alive_kinds,
        &constraints,
        LIVE_SAMPLE_COUNT,
        rng.next_u64(),
    ) {
        Ok(samples) => belief::marginal_grid(&samples, view),
        Err(_) => belief::MarginalGrid::zeros(),
    };

    let current_entropy = belief::total_entropy(&grid, view);
    let candidates = evaluator::enumerate_candidates(view, abilities);

    if candidates.is_empty() {
        let action = evaluator::random_action(view, abilities, rng)
            .unwrap_or(Action {
                weapon: crate::weapons::WeaponId::Ap,
                target: crate::board::Coord::new(0, 0),
            });
        return Decision {
            action,
            scored: None,
            was_random: true,
        };
    }

    let scored = evaluator::score_candidates(
        &candidates,
        abilities,
        &grid,
        view,
        damage,
        max_hp,
        current_entropy,
        difficulty.alpha,
    );

    let ranked = if difficulty.risk_awareness > 0.0 {
        if let Some(defender_view) = defender_view_of_own_board {
            rank_with_risk(
                &scored,
                abilities,
                attacker_board,
                defender_view,
                defender_alive_kinds,
                &grid,
                view,
                damage,
                max_hp,
                current_entropy,
                difficulty,
                sensors,
                rng,
            )
        } else {
            scored
        }
    } else {
        scored
    };

    let chosen = evaluator::pick_best(&ranked, rng).expect("non-empty candidate list");
    Decision {
        action: chosen.action,
        scored: Some(chosen),
        was_random: false,
    }
}

/// Re-scores every candidate by `finalScore` using a roll-out of the
/// defender's next few turns against the attacker's own board, seen
/// through `defender_view` — the defender's current observation of the
/// attacker's board (§4.5).
#[allow(clippy::too_many_arguments)]
fn rank_with_risk(
    scored: &[ScoredAction],
    abilities: Abilities,
    attacker_board: &Board,
    defender_view: &ObserverGrid,
    defender_alive_kinds: &[ShipKind],
    grid: &belief::MarginalGrid,
    view: &ObserverGrid,
    damage: &DamageGrid,
    max_alive_max_hp: i32,
    current_entropy: f64,
    difficulty: Difficulty,
    sensors: &SensorSet,
    rng: &mut Rng,
) -> Vec<ScoredAction> {
    let config = RiskConfig::default();
    let rollout_result = risk::rollout(
        attacker_board,
        defender_view,
        defender_alive_kinds,
        difficulty.alpha,
        sensors,
        &config,
        rng,
    );

    scored
        .iter()
        .map(|candidate| {
            let bonus = risk::normalized_risk_bonus(
                candidate.action,
                abilities,
                attacker_board,
                sensors,
                &rollout_result,
                config.endangered_threshold,
                grid,
                view,
                damage,
                max_alive_max_hp,
                current_entropy,
                difficulty.alpha,
            );
            ScoredAction {
                utility: risk::final_score(candidate.utility, difficulty.risk_awareness, bonus),
                ..*candidate
            }
        })
        .collect()
}
