//! Belief engine (§4.3): derives hard/soft constraints from a view grid,
//! draws a finite multiset of admissible ship configurations by rejection
//! sampling, and reduces that multiset to a marginal probability grid and
//! its Shannon entropy.
//!
//! A belief state is built once per decision and dropped when the
//! decision returns (§9) — nothing here is cached across turns.

use std::collections::HashSet;

use rayon::prelude::*;

use crate::board::{ship_cells, Coord, Orientation, ShipKind, BOARD_SIDE};
use crate::error::{CoreError, CoreResult};
use crate::rng::Rng;
use crate::view::{ObserverGrid, ViewState};

const EPSILON: f64 = 1e-9;
/// Attempt budget multiplier: the sampler gives up after `20 * target`
/// attempts (§4.3).
const ATTEMPT_BUDGET_MULTIPLIER: usize = 20;

#[derive(Debug, Clone)]
pub struct Constraints {
    pub must_hit: Vec<Coord>,
    pub must_avoid: HashSet<Coord>,
    pub suspect: HashSet<Coord>,
}

/// Partitions the view grid into `mustHit`/`mustAvoid`/`suspect` (§4.3).
pub fn derive_constraints(view: &ObserverGrid) -> Constraints {
    let mut must_hit = Vec::new();
    let mut must_avoid = HashSet::new();
    let mut suspect = HashSet::new();

    for (coord, state) in view.iter_cells() {
        match state {
            ViewState::Hit | ViewState::Destroyed => must_hit.push(coord),
            ViewState::Miss | ViewState::Sunk => {
                must_avoid.insert(coord);
            }
            ViewState::Suspect => {
                suspect.insert(coord);
            }
            ViewState::Unknown => {}
        }
    }

    Constraints {
        must_hit,
        must_avoid,
        suspect,
    }
}

/// One ship's placement within a sampled configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub kind: ShipKind,
    pub origin: Coord,
    pub orientation: Orientation,
}

impl Placement {
    pub fn cells(&self) -> Vec<Coord> {
        ship_cells(self.kind, self.origin, self.orientation)
    }
}

/// An admissible assignment of every still-alive ship to a placement.
pub type Configuration = Vec<Placement>;

fn enumerate_placements(kind: ShipKind) -> Vec<(Coord, Orientation)> {
    let len = kind.length() as i32;
    let mut placements = Vec::new();
    for r in 0..BOARD_SIDE as i32 {
        for c in 0..BOARD_SIDE as i32 {
            if c + len <= BOARD_SIDE as i32 {
                placements.push((Coord::new(r, c), Orientation::Horizontal));
            }
            if r + len <= BOARD_SIDE as i32 {
                placements.push((Coord::new(r, c), Orientation::Vertical));
            }
        }
    }
    placements
}

fn placement_weight(cells: &[Coord], constraints: &Constraints) -> f64 {
    let hit_count = cells
        .iter()
        .filter(|c| constraints.must_hit.contains(c))
        .count();
    let suspect_count = cells.iter().filter(|c| constraints.suspect.contains(c)).count();
    1.0 + 10.0 * hit_count as f64 + 2.0 * suspect_count as f64
}

/// Draws one configuration, or `None` if no legal placement exists for
/// some ship or the result fails to cover every `mustHit` cell (§4.3).
pub fn sample_configuration(
    alive_kinds: &[ShipKind],
    constraints: &Constraints,
    rng: &mut Rng,
) -> Option<Configuration> {
    let mut order: Vec<ShipKind> = alive_kinds.to_vec();
    order.sort_by_key(|k| std::cmp::Reverse(k.length()));

    let mut claimed: HashSet<Coord> = HashSet::new();
    let mut placements = Configuration::new();

    for kind in order {
        let mut candidates = Vec::new();
        let mut weights = Vec::new();
        for (origin, orientation) in enumerate_placements(kind) {
            let cells = ship_cells(kind, origin, orientation);
            if cells.iter().any(|c| claimed.contains(c) || constraints.must_avoid.contains(c)) {
                continue;
            }
            weights.push(placement_weight(&cells, constraints));
            candidates.push((origin, orientation, cells));
        }
        if candidates.is_empty() {
            return None;
        }
        let pick = rng.choose_weighted(&weights)?;
        let (origin, orientation, cells) = &candidates[pick];
        for cell in cells {
            claimed.insert(*cell);
        }
        placements.push(Placement {
            kind,
            origin: *origin,
            orientation: *orientation,
        });
    }

    let covered = |coord: &Coord| placements.iter().any(|p| p.cells().contains(coord));
    if constraints.must_hit.iter().all(covered) {
        Some(placements)
    } else {
        None
    }
}

/// Draws a sample set of size `target_m`, oversampling by replacement when
/// the attempt budget yields fewer admissible configurations (§4.3).
/// Runs sequentially; see `sample_configurations_parallel` for the
/// rayon-parallel live-decision path.
pub fn sample_configurations(
    alive_kinds: &[ShipKind],
    constraints: &Constraints,
    target_m: usize,
    rng: &mut Rng,
) -> CoreResult<Vec<Configuration>> {
    if target_m == 0 || alive_kinds.is_empty() {
        return Ok(Vec::new());
    }
    let budget = target_m * ATTEMPT_BUDGET_MULTIPLIER;
    let mut accepted = Vec::new();
    let mut attempts = 0;
    while accepted.len() < target_m && attempts < budget {
        attempts += 1;
        if let Some(config) = sample_configuration(alive_kinds, constraints, rng) {
            accepted.push(config);
        }
    }
    pad_by_resampling(accepted, target_m, rng)
}

/// Same sampling procedure as `sample_configurations`, but fans the
/// attempt budget out across a rayon `ParallelIterator`, seeding each
/// attempt independently from `seed.wrapping_add(attempt_index)` — the
/// same per-iteration deterministic seeding the teacher's
/// `run_monte_carlo_parallel` uses, so a fixed `seed` always reproduces
/// the same marginal grid regardless of worker-count or scheduling.
pub fn sample_configurations_parallel(
    alive_kinds: &[ShipKind],
    constraints: &Constraints,
    target_m: usize,
    seed: u64,
) -> CoreResult<Vec<Configuration>> {
    if target_m == 0 || alive_kinds.is_empty() {
        return Ok(Vec::new());
    }
    let budget = target_m * ATTEMPT_BUDGET_MULTIPLIER;
    let accepted: Vec<Configuration> = (0..budget as u64)
        .into_par_iter()
        .filter_map(|attempt| {
            let mut rng = Rng::new(seed.wrapping_add(attempt));
            sample_configuration(alive_kinds, constraints, &mut rng)
        })
        .collect();
    let mut rng = Rng::new(seed ^ 0x5151_5151_5151_5151);
    pad_by_resampling(accepted, target_m, &mut rng)
}

fn pad_by_resampling(
    mut accepted: Vec<Configuration>,
    target_m: usize,
    rng: &mut Rng,
) -> CoreResult<Vec<Configuration>> {
    if accepted.is_empty() {
        return Err(CoreError::ExhaustedSampler);
    }
    while accepted.len() < target_m {
        let idx = rng.next_below(accepted.len());
        let resample = accepted[idx].clone();
        accepted.push(resample);
    }
    Ok(accepted)
}

/// A dense per-cell occupancy probability grid derived from a sample set.
#[derive(Debug, Clone)]
pub struct MarginalGrid {
    probs: Vec<f64>,
}

impl MarginalGrid {
    pub fn get(&self, coord: Coord) -> f64 {
        self.probs[coord.index()]
    }

    /// A grid of all zeros — the degraded result the evaluator falls back
    /// on after an exhausted sampler (§7 item 3).
    pub fn zeros() -> Self {
        Self {
            probs: vec![0.0; BOARD_SIDE * BOARD_SIDE],
        }
    }
}

pub fn marginal_grid(samples: &[Configuration], view: &ObserverGrid) -> MarginalGrid {
    let mut counts = vec![0usize; BOARD_SIDE * BOARD_SIDE];
    for config in samples {
        let mut covered = vec![false; BOARD_SIDE * BOARD_SIDE];
        for placement in config {
            for cell in placement.cells() {
                covered[cell.index()] = true;
            }
        }
        for (idx, was_covered) in covered.into_iter().enumerate() {
            if was_covered {
                counts[idx] += 1;
            }
        }
    }

    let n = samples.len().max(1) as f64;
    let mut probs: Vec<f64> = counts.iter().map(|&count| count as f64 / n).collect();

    for (coord, state) in view.iter_cells() {
        match state {
            ViewState::Hit => probs[coord.index()] = 1.0,
            ViewState::Miss | ViewState::Destroyed | ViewState::Sunk => probs[coord.index()] = 0.0,
            ViewState::Unknown | ViewState::Suspect => {}
        }
    }

    MarginalGrid { probs }
}

/// Binary Shannon entropy `H2(p)`, zero within `EPSILON` of 0 or 1 (§4.3).
pub fn binary_entropy(p: f64) -> f64 {
    if p <= EPSILON || p >= 1.0 - EPSILON {
        return 0.0;
    }
    -p * p.log2() - (1.0 - p) * (1.0 - p).log2()
}

/// Total uncertainty: the sum of binary entropies over cells whose view
/// state is UNKNOWN or SUSPECT (§4.3).
pub fn total_entropy(grid: &MarginalGrid, view: &ObserverGrid) -> f64 {
    view.iter_cells()
        .filter(|(_, state)| matches!(state, ViewState::Unknown | ViewState::Suspect))
        .map(|(coord, _)| binary_entropy(grid.get(coord)))
        .sum()
}

/// Expected conditional entropy for an attack-shaped action (AP or HE):
/// striking a cell eliminates its binary entropy in expectation (§4.3).
pub fn conditional_entropy_attack(
    grid: &MarginalGrid,
    current_entropy: f64,
    coverage: &[Coord],
) -> f64 {
    let reduction: f64 = coverage.iter().map(|&coord| binary_entropy(grid.get(coord))).sum();
    (current_entropy - reduction).max(0.0)
}

/// Expected conditional entropy for a sonar action centered at `center`
/// (§4.3).
pub fn conditional_entropy_sonar(
    grid: &MarginalGrid,
    view: &ObserverGrid,
    current_entropy: f64,
    center: Coord,
    scan_area: &[Coord],
) -> f64 {
    let p_star = grid.get(center);
    let a_sum: f64 = scan_area
        .iter()
        .filter(|&&coord| matches!(view.get(coord), ViewState::Unknown | ViewState::Suspect))
        .map(|&coord| binary_entropy(grid.get(coord)))
        .sum();
    let e = p_star * (current_entropy - binary_entropy(p_star))
        + (1.0 - p_star) * (current_entropy - a_sum);
    (current_entropy - (current_entropy - e).max(0.0)).max(0.0)
}

pub fn info_gain(current_entropy: f64, conditional_entropy: f64) -> f64 {
    (current_entropy - conditional_entropy).max(0.0)
}
