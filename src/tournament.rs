//! Tournament / grid-search harness (§4.8): explores a rectangular grid
//! over `alpha` and `riskAwareness`, round-robins every pair of
//! configurations, and ranks them by win rate.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::decision::Difficulty;
use crate::rng::Rng;
use crate::simulator::{Match, Side, Winner};

pub const DEFAULT_GAMES_PER_PAIR: u32 = 20;
pub const DEFAULT_TOP_N: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl GridRange {
    /// Enumerates every value from `min` to `max` inclusive, stepping by
    /// `step`. A degenerate zero/negative step yields just `min`.
    pub fn values(&self) -> Vec<f64> {
        if self.step <= 0.0 || self.max < self.min {
            return vec![self.min];
        }
        let mut values = Vec::new();
        let steps = ((self.max - self.min) / self.step).round() as i64;
        for i in 0..=steps {
            let v = self.min + self.step * i as f64;
            values.push((v * 1e9).round() / 1e9);
        }
        values
    }
}

/// A single grid point: `randomness` is pinned to 0 per §4.8.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TournamentConfig {
    pub alpha: f64,
    pub risk_awareness: f64,
}

impl From<TournamentConfig> for Difficulty {
    fn from(config: TournamentConfig) -> Self {
        Difficulty {
            alpha: config.alpha,
            randomness: 0.0,
            risk_awareness: config.risk_awareness,
        }
    }
}

/// Builds the full `|alpha| * |risk|` configuration grid.
pub fn build_grid(alpha_range: GridRange, risk_range: GridRange) -> Vec<TournamentConfig> {
    let alphas = alpha_range.values();
    let risks = risk_range.values();
    let mut grid = Vec::with_capacity(alphas.len() * risks.len());
    for &alpha in &alphas {
        for &risk_awareness in &risks {
            grid.push(TournamentConfig { alpha, risk_awareness });
        }
    }
    grid
}

#[derive(Debug, Clone, Copy)]
struct PairTask {
    a: usize,
    b: usize,
    a_moves_first: bool,
    seed: u64,
}

fn build_tasks(config_count: usize, games_per_pair: u32, base_seed: u64) -> Vec<PairTask> {
    let mut tasks = Vec::new();
    let mut seed_counter = 0u64;
    for a in 0..config_count {
        for b in (a + 1)..config_count {
            for game in 0..games_per_pair {
                tasks.push(PairTask {
                    a,
                    b,
                    a_moves_first: game % 2 == 0,
                    seed: base_seed.wrapping_add(seed_counter),
                });
                seed_counter += 1;
            }
        }
    }
    tasks
}

#[derive(Debug, Clone, Copy, Default)]
struct PairOutcome {
    winner_a: bool,
    winner_b: bool,
    draw: bool,
    turns: u32,
}

fn run_task(configs: &[TournamentConfig], task: PairTask) -> PairOutcome {
    let difficulty_a: Difficulty = configs[task.a].into();
    let difficulty_b: Difficulty = configs[task.b].into();
    let mut rng = Rng::new(task.seed);

    let (first, second) = if task.a_moves_first {
        (difficulty_a, difficulty_b)
    } else {
        (difficulty_b, difficulty_a)
    };
    let game = Match::new_self_play(first, second, &mut rng);
    let first_mover = if task.a_moves_first { Side::A } else { Side::B };
    let outcome = game.run(first_mover, &mut rng);

    let (winner_a, winner_b) = match (outcome.winner, task.a_moves_first) {
        (Winner::A, true) | (Winner::B, false) => (true, false),
        (Winner::B, true) | (Winner::A, false) => (false, true),
        (Winner::Draw, _) => (false, false),
    };

    PairOutcome {
        winner_a,
        winner_b,
        draw: outcome.winner == Winner::Draw,
        turns: outcome.stats.turns,
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigStats {
    pub config: TournamentConfig,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub games: u32,
    pub win_rate: f64,
    pub avg_turns: f64,
}

/// Runs the full round-robin grid search, fanning tasks out across
/// rayon's global pool (or a scoped pool of `workers` threads when
/// non-zero), and ranks every configuration by win rate (§4.8).
pub fn run(
    configs: &[TournamentConfig],
    games_per_pair: u32,
    workers: usize,
    base_seed: u64,
) -> Vec<ConfigStats> {
    run_with_progress(configs, games_per_pair, workers, base_seed, |_, _| {}, None)
}

/// Same as `run`, but invokes `on_progress(completed, total)` once before
/// any task starts and again after each completed task, and honors a
/// cooperative stop flag checked between tasks (§4.8, §5).
pub fn run_with_progress(
    configs: &[TournamentConfig],
    games_per_pair: u32,
    workers: usize,
    base_seed: u64,
    mut on_progress: impl FnMut(u32, u32),
    stop_flag: Option<Arc<AtomicBool>>,
) -> Vec<ConfigStats> {
    let tasks = build_tasks(configs.len(), games_per_pair, base_seed);
    let total = tasks.len() as u32;
    on_progress(0, total);

    let stop = stop_flag.unwrap_or_else(|| Arc::new(AtomicBool::new(false)));
    let completed = Arc::new(std::sync::atomic::AtomicU32::new(0));

    let run_all = || -> Vec<(PairTask, Option<PairOutcome>)> {
        tasks
            .par_iter()
            .map(|&task| {
                if stop.load(Ordering::Relaxed) {
                    return (task, None);
                }
                let outcome = run_task(configs, task);
                completed.fetch_add(1, Ordering::Relaxed);
                (task, Some(outcome))
            })
            .collect()
    };

    let results = if workers == 0 {
        run_all()
    } else {
        rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .build()
            .expect("worker pool construction")
            .install(run_all)
    };

    on_progress(completed.load(Ordering::Relaxed), total);

    let mut stats: Vec<ConfigStats> = configs
        .iter()
        .map(|&config| ConfigStats {
            config,
            wins: 0,
            losses: 0,
            draws: 0,
            games: 0,
            win_rate: 0.0,
            avg_turns: 0.0,
        })
        .collect();
    let mut turn_totals = vec![0u64; configs.len()];

    for (task, outcome) in results.into_iter().flat_map(|(task, outcome)| outcome.map(|o| (task, o))) {
        stats[task.a].games += 1;
        stats[task.b].games += 1;
        turn_totals[task.a] += outcome.turns as u64;
        turn_totals[task.b] += outcome.turns as u64;
        if outcome.winner_a {
            stats[task.a].wins += 1;
            stats[task.b].losses += 1;
        } else if outcome.winner_b {
            stats[task.b].wins += 1;
            stats[task.a].losses += 1;
        } else if outcome.draw {
            stats[task.a].draws += 1;
            stats[task.b].draws += 1;
        }
    }

    for (i, stat) in stats.iter_mut().enumerate() {
        if stat.games > 0 {
            stat.win_rate = stat.wins as f64 / stat.games as f64;
            stat.avg_turns = turn_totals[i] as f64 / stat.games as f64;
        }
    }

    stats.sort_by(|a, b| b.win_rate.total_cmp(&a.win_rate));
    stats
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TournamentReport {
    pub config: TournamentReportConfig,
    pub timestamp: String,
    pub results: Vec<ConfigStats>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TournamentReportConfig {
    pub alpha_range: (f64, f64, f64),
    pub risk_range: (f64, f64, f64),
    pub games_per_pair: u32,
}

pub fn build_report(
    alpha_range: GridRange,
    risk_range: GridRange,
    games_per_pair: u32,
    results: Vec<ConfigStats>,
) -> TournamentReport {
    TournamentReport {
        config: TournamentReportConfig {
            alpha_range: (alpha_range.min, alpha_range.max, alpha_range.step),
            risk_range: (risk_range.min, risk_range.max, risk_range.step),
            games_per_pair,
        },
        timestamp: chrono::Utc::now().to_rfc3339(),
        results,
    }
}
