//! `match`/`tournament` sub-command dispatch, in the teacher's
//! `parse_command`/`handle_*`/manual-flag-parsing style — no `clap`.

use std::fs;

use crate::decision::Difficulty;
use crate::rng::Rng;
use crate::simulator::{Match, Side};
use crate::tournament::{self, GridRange, TournamentConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Match,
    Tournament,
}

pub fn parse_command(args: &[String]) -> Option<Command> {
    match args.get(1).map(String::as_str) {
        Some("match") => Some(Command::Match),
        Some("tournament") => Some(Command::Tournament),
        _ => None,
    }
}

pub fn run_with_args(args: &[String]) -> i32 {
    match parse_command(args) {
        Some(Command::Match) => handle_match(args),
        Some(Command::Tournament) => handle_tournament(args),
        None => {
            eprintln!("usage: periscope <match|tournament> [options]");
            1
        }
    }
}

fn handle_match(args: &[String]) -> i32 {
    let difficulty_name = args.get(2).map(String::as_str).unwrap_or("normal");
    let difficulty = match difficulty_name {
        "easy" => Difficulty::EASY,
        "normal" => Difficulty::NORMAL,
        "hard" => Difficulty::HARD,
        other => {
            eprintln!("invalid difficulty '{other}', defaulting to normal");
            Difficulty::NORMAL
        }
    };
    let seed = parse_u64_arg(args.get(3), "seed", 7);
    let turn_cap = parse_u32_arg(args.get(4), "turn_cap", crate::simulator::DEFAULT_TURN_CAP);

    let mut rng = Rng::new(seed);
    let game = Match::new_self_play(difficulty, difficulty, &mut rng).with_turn_cap(turn_cap);
    let outcome = game.run(Side::A, &mut rng);

    match serde_json::to_string_pretty(&outcome.stats) {
        Ok(payload) => {
            println!("{payload}");
            0
        }
        Err(err) => {
            eprintln!("failed to serialize match outcome: {err}");
            1
        }
    }
}

struct TournamentArgs {
    alpha_range: GridRange,
    risk_range: GridRange,
    games_per_pair: u32,
    workers: usize,
    output: Option<String>,
}

/// The four named presets of §6's `--preset {test|quick|default|full}`
/// flag. Exact grid bounds aren't spelled out by the spec beyond the
/// names, so this crate picks an escalating series — a single point for
/// smoke-testing the harness itself, up through the exhaustive sweep a
/// tuning run would actually use.
fn preset_args(name: &str) -> Option<TournamentArgs> {
    let (alpha_range, risk_range, games_per_pair) = match name {
        "test" => (
            GridRange { min: 0.5, max: 0.5, step: 1.0 },
            GridRange { min: 0.0, max: 0.0, step: 1.0 },
            2,
        ),
        "quick" => (
            GridRange { min: 0.0, max: 1.0, step: 0.5 },
            GridRange { min: 0.0, max: 0.4, step: 0.2 },
            5,
        ),
        "default" => (
            GridRange { min: 0.0, max: 1.0, step: 0.2 },
            GridRange { min: 0.0, max: 0.4, step: 0.1 },
            tournament::DEFAULT_GAMES_PER_PAIR,
        ),
        "full" => (
            GridRange { min: 0.0, max: 1.0, step: 0.1 },
            GridRange { min: 0.0, max: 0.4, step: 0.05 },
            50,
        ),
        _ => return None,
    };
    Some(TournamentArgs {
        alpha_range,
        risk_range,
        games_per_pair,
        workers: 0,
        output: None,
    })
}

fn parse_tournament_args(args: &[String]) -> Result<TournamentArgs, String> {
    let mut preset: Option<TournamentArgs> = None;
    let mut alpha_min = 0.0;
    let mut alpha_max = 1.0;
    let mut alpha_step = 0.2;
    let mut risk_min = 0.0;
    let mut risk_max = 0.4;
    let mut risk_step = 0.1;
    let mut games_per_pair = tournament::DEFAULT_GAMES_PER_PAIR;
    let mut workers = 0usize;
    let mut output = None;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--preset" => {
                let name = args.get(i + 1).ok_or("--preset requires a value")?;
                preset = Some(
                    preset_args(name)
                        .ok_or_else(|| format!("unknown preset '{name}' (expected test|quick|default|full)"))?,
                );
                i += 2;
            }
            "--alpha-min" => {
                alpha_min = parse_f64_arg(args.get(i + 1), "alpha-min", alpha_min);
                i += 2;
            }
            "--alpha-max" => {
                alpha_max = parse_f64_arg(args.get(i + 1), "alpha-max", alpha_max);
                i += 2;
            }
            "--alpha-step" => {
                alpha_step = parse_f64_arg(args.get(i + 1), "alpha-step", alpha_step);
                i += 2;
            }
            "--risk-min" => {
                risk_min = parse_f64_arg(args.get(i + 1), "risk-min", risk_min);
                i += 2;
            }
            "--risk-max" => {
                risk_max = parse_f64_arg(args.get(i + 1), "risk-max", risk_max);
                i += 2;
            }
            "--risk-step" => {
                risk_step = parse_f64_arg(args.get(i + 1), "risk-step", risk_step);
                i += 2;
            }
            "--games" => {
                games_per_pair = parse_u32_arg(args.get(i + 1), "games", games_per_pair);
                i += 2;
            }
            "--workers" => {
                workers = parse_u32_arg(args.get(i + 1), "workers", workers as u32) as usize;
                i += 2;
            }
            "-o" | "--output" => {
                output = args.get(i + 1).cloned();
                i += 2;
            }
            other => return Err(format!("unrecognized argument '{other}'")),
        }
    }

    if let Some(mut from_preset) = preset {
        from_preset.workers = workers;
        from_preset.output = output;
        return Ok(from_preset);
    }

    Ok(TournamentArgs {
        alpha_range: GridRange {
            min: alpha_min,
            max: alpha_max,
            step: alpha_step,
        },
        risk_range: GridRange {
            min: risk_min,
            max: risk_max,
            step: risk_step,
        },
        games_per_pair,
        workers,
        output,
    })
}

fn handle_tournament(args: &[String]) -> i32 {
    let parsed = match parse_tournament_args(args) {
        Ok(parsed) => parsed,
        Err(message) => {
            eprintln!("usage: periscope tournament [--alpha-min N] [--alpha-max N] [--alpha-step N] \
[--risk-min N] [--risk-max N] [--risk-step N] [--games N] [--workers N] [-o FILE] \
[--preset test|quick|default|full]");
            eprintln!("error: {message}");
            return 1;
        }
    };

    let configs: Vec<TournamentConfig> = tournament::build_grid(parsed.alpha_range, parsed.risk_range);
    if configs.is_empty() {
        eprintln!("empty configuration grid");
        return 1;
    }

    let on_progress = |completed: u32, total: u32| {
        eprintln!("progress: {completed}/{total} games complete");
    };

    let results = tournament::run_with_progress(
        &configs,
        parsed.games_per_pair,
        parsed.workers,
        0,
        on_progress,
        None,
    );

    let top_n = tournament::DEFAULT_TOP_N.min(results.len());
    println!("top {top_n} configurations by win rate:");
    for stat in &results[..top_n] {
        println!(
            "alpha={:.2} risk={:.2} winRate={:.3} avgTurns={:.1} ({} games)",
            stat.config.alpha, stat.config.risk_awareness, stat.win_rate, stat.avg_turns, stat.games
        );
    }

    if let Some(path) = parsed.output {
        let report = tournament::build_report(parsed.alpha_range, parsed.risk_range, parsed.games_per_pair, results);
        match serde_json::to_string_pretty(&report) {
            Ok(payload) => {
                if let Err(err) = fs::write(&path, payload) {
                    eprintln!("failed to write report to '{path}': {err}");
                    return 1;
                }
            }
            Err(err) => {
                eprintln!("failed to serialize tournament report: {err}");
                return 1;
            }
        }
    }

    0
}

fn parse_u32_arg(raw: Option<&String>, name: &str, default: u32) -> u32 {
    raw.and_then(|value| value.parse::<u32>().ok()).unwrap_or_else(|| {
        if let Some(value) = raw {
            eprintln!("invalid {name} '{value}', defaulting to {default}");
        }
        default
    })
}

fn parse_u64_arg(raw: Option<&String>, name: &str, default: u64) -> u64 {
    raw.and_then(|value| value.parse::<u64>().ok()).unwrap_or_else(|| {
        if let Some(value) = raw {
            eprintln!("invalid {name} '{value}', defaulting to {default}");
        }
        default
    })
}

fn parse_f64_arg(raw: Option<&String>, name: &str, default: f64) -> f64 {
    raw.and_then(|value| value.parse::<f64>().ok()).unwrap_or_else(|| {
        if let Some(value) = raw {
            eprintln!("invalid {name} '{value}', defaulting to {default}");
        }
        default
    })
}
