//! Headless two-sided match loop (§4.6) — the substrate for both
//! self-play tuning and game-ending verification.

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::decision::{self, Difficulty};
use crate::deploy;
use crate::evaluator::Action;
use crate::rng::Rng;
use crate::view::{DamageGrid, ObserverGrid};
use crate::weapons::{self, Event, SensorSet};

pub const DEFAULT_TURN_CAP: u32 = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    A,
    B,
}

impl Side {
    pub fn other(self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Winner {
    A,
    B,
    Draw,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchStats {
    pub turns: u32,
    pub hits_a: u32,
    pub hits_b: u32,
    pub damage_a: i64,
    pub damage_b: i64,
}

/// One turn's emitted events, tagged by whose move produced them — the
/// supplemental per-turn trace of §4.6.
#[derive(Debug, Clone)]
pub struct TurnLog {
    pub turn: u32,
    pub attacker: Side,
    pub action: Action,
    pub events: Vec<Event>,
}

#[derive(Debug, Clone)]
pub struct MatchOutcome {
    pub winner: Winner,
    pub stats: MatchStats,
    pub log: Vec<TurnLog>,
}

/// Turn count, winner (if decided), and per-side stats so far — the §6
/// `status(match)` call.
#[derive(Debug, Clone)]
pub struct MatchStatus {
    pub turn: u32,
    pub winner: Option<Winner>,
    pub stats: MatchStats,
}

/// A single match between two sides. Supports both the incremental §6
/// public API (`deploy`/`decide`/`resolve`/`status`, one call at a time,
/// host-driven) and the headless self-play loop of §4.6 (`run`, which is
/// built from the same primitives).
pub struct Match {
    board_a: Board,
    board_b: Board,
    view_a_of_b: ObserverGrid,
    view_b_of_a: ObserverGrid,
    damage_a_on_b: DamageGrid,
    damage_b_on_a: DamageGrid,
    difficulty_a: Difficulty,
    difficulty_b: Difficulty,
    sensors: SensorSet,
    turn_cap: u32,
    turn: u32,
    hits_a: u32,
    hits_b: u32,
}

impl Match {
    /// `initMatch(seed, difficulty)` (§6): allocates a fresh two-sided
    /// match with empty boards. `difficulty` governs both sides' decisions
    /// until a caller overrides one with `new_self_play` (used by the
    /// tournament harness to pit two distinct configurations against each
    /// other).
    ///
    /// `seed` is accepted for parity with §6's published signature but is
    /// not stored: every call this crate's core makes that needs
    /// randomness (`deploy`, `decide`) already takes its own `&mut Rng`
    /// explicitly, per spec.md §5's description of `decide` as "a pure
    /// function of its inputs ... plus the caller-supplied pseudorandom
    /// generator". A host wiring up an interactive match should derive its
    /// `Rng` from the same seed it passes here to get reproducible play.
    pub fn new(seed: u64, difficulty: Difficulty) -> Self {
        let _ = seed;
        Self {
            board_a: Board::empty(),
            board_b: Board::empty(),
            view_a_of_b: ObserverGrid::new(),
            view_b_of_a: ObserverGrid::new(),
            damage_a_on_b: DamageGrid::new(),
            damage_b_on_a: DamageGrid::new(),
            difficulty_a: difficulty,
            difficulty_b: difficulty,
            sensors: weapons::default_sensors(),
            turn_cap: DEFAULT_TURN_CAP,
            turn: 0,
            hits_a: 0,
            hits_b: 0,
        }
    }

    /// Allocates a self-play match with both sides already deployed and
    /// distinct difficulties, for the headless simulator/tournament (§4.6,
    /// §4.8).
    pub fn new_self_play(difficulty_a: Difficulty, difficulty_b: Difficulty, rng: &mut Rng) -> Self {
        Self {
            board_a: deploy::deploy_side(rng),
            board_b: deploy::deploy_side(rng),
            view_a_of_b: ObserverGrid::new(),
            view_b_of_a: ObserverGrid::new(),
            damage_a_on_b: DamageGrid::new(),
            damage_b_on_a: DamageGrid::new(),
            difficulty_a,
            difficulty_b,
            sensors: weapons::default_sensors(),
            turn_cap: DEFAULT_TURN_CAP,
            turn: 0,
            hits_a: 0,
            hits_b: 0,
        }
    }

    pub fn with_turn_cap(mut self, turn_cap: u32) -> Self {
        self.turn_cap = turn_cap;
        self
    }

    /// `deploy(match, side)` (§6): deploys one side's roster using the
    /// sparse-random policy.
    pub fn deploy(&mut self, side: Side, rng: &mut Rng) {
        let board = deploy::deploy_side(rng);
        match side {
            Side::A => self.board_a = board,
            Side::B => self.board_b = board,
        }
    }

    /// `decide(match, side)` (§6).
    pub fn decide(&self, side: Side, rng: &mut Rng) -> Action {
        let (attacker_board, view, damage, defender_board, difficulty, defender_view) = match side {
            Side::A => (
                &self.board_a,
                &self.view_a_of_b,
                &self.damage_a_on_b,
                &self.board_b,
                self.difficulty_a,
                &self.view_b_of_a,
            ),
            Side::B => (
                &self.board_b,
                &self.view_b_of_a,
                &self.damage_b_on_a,
                &self.board_a,
                self.difficulty_b,
                &self.view_a_of_b,
            ),
        };
        let defender_alive_kinds: Vec<_> = defender_board.alive_ships().map(|s| s.kind).collect();
        let defender_view_of_own_board = if difficulty.risk_awareness > 0.0 {
            Some(defender_view)
        } else {
            None
        };
        decision::decide(
            attacker_board,
            view,
            damage,
            &defender_alive_kinds,
            difficulty,
            &self.sensors,
            defender_view_of_own_board,
            rng,
        )
        .action
    }

    /// `resolve(match, side, action)` (§6): applies `side`'s action to the
    /// opposing board, returning the ordered event list.
    pub fn resolve(&mut self, attacker: Side, action: Action) -> Vec<Event> {
        let is_player = attacker == Side::A;
        let events = match attacker {
            Side::A => {
                let dmg = weapons::ap_damage(&self.board_a);
                resolve_action(action, dmg, &mut self.board_b, &mut self.view_a_of_b, is_player)
            }
            Side::B => {
                let dmg = weapons::ap_damage(&self.board_b);
                resolve_action(action, dmg, &mut self.board_a, &mut self.view_b_of_a, is_player)
            }
        };
        match attacker {
            Side::A => crate::evaluator::commit(
                action,
                crate::evaluator::abilities(&self.board_a, &self.sensors),
                &mut self.damage_a_on_b,
            ),
            Side::B => crate::evaluator::commit(
                action,
                crate::evaluator::abilities(&self.board_b, &self.sensors),
                &mut self.damage_b_on_a,
            ),
        }

        let hits = events
            .iter()
            .filter(|e| matches!(e, Event::CellUpdate { state, .. } if state.is_struck() && *state != crate::view::ViewState::Miss))
            .count() as u32;
        match attacker {
            Side::A => self.hits_a += hits,
            Side::B => self.hits_b += hits,
        }

        self.turn += 1;
        events
    }

    fn winner(&self) -> Option<Winner> {
        if self.board_b.all_sunk() {
            Some(Winner::A)
        } else if self.board_a.all_sunk() {
            Some(Winner::B)
        } else {
            None
        }
    }

    /// `status(match)` (§6).
    pub fn status(&self) -> MatchStatus {
        let damage_a = self.board_b.total_max_hp() as i64 - self.board_b.total_alive_hp() as i64;
        let damage_b = self.board_a.total_max_hp() as i64 - self.board_a.total_alive_hp() as i64;
        MatchStatus {
            turn: self.turn,
            winner: self.winner(),
            stats: MatchStats {
                turns: self.turn,
                hits_a: self.hits_a,
                hits_b: self.hits_b,
                damage_a,
                damage_b,
            },
        }
    }

    /// Runs the match to completion starting with `first_mover`, returning
    /// the full outcome (§4.6 items 2–4).
    pub fn run(mut self, first_mover: Side, rng: &mut Rng) -> MatchOutcome {
        let mut log = Vec::new();
        let mut attacker = first_mover;

        let winner = loop {
            if self.turn >= self.turn_cap {
                break Winner::Draw;
            }
            let action = self.decide(attacker, rng);
            let events = self.resolve(attacker, action);

            log.push(TurnLog {
                turn: self.turn,
                attacker,
                action,
                events,
            });

            if let Some(winner) = self.winner() {
                break winner;
            }
            attacker = attacker.other();
        };

        let stats = self.status().stats;
        MatchOutcome { winner, stats, log }
    }
}

fn resolve_action(
    action: Action,
    ap_dmg: i32,
    board: &mut Board,
    view: &mut ObserverGrid,
    is_player: bool,
) -> Vec<Event> {
    match action.weapon {
        weapons::WeaponId::Ap => weapons::ap_resolve(action.target, ap_dmg, board, view, is_player).0,
        weapons::WeaponId::He => weapons::he_resolve(action.target, board, view, is_player).0,
        weapons::WeaponId::Sonar => weapons::sonar_resolve(action.target, board, view, is_player),
    }
}
