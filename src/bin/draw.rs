//! Command-line draw generator: prints a draw as text or JSON.
//!
//! ```text
//! draw knockout 16
//! draw league_phase --rounds 8 --output json
//! draw "groups(4).round_robin().top(2).knockout()" participants.csv
//! ```
//!
//! Formats: knockout, double_knockout, triple_knockout, round_robin, double_round_robin,
//! league_phase, uefa(groups, advance), or a chain like groups(4).round_robin().top(2).knockout().
//! Every option can also be set through its `DRAW_*` environment variable.

use clap::{ArgAction, Parser, ValueEnum};
use std::error::Error;
use std::process::ExitCode;
use tournament_draw::{
    parse_formula, run_steps, valid_field_sizes, DrawError, FormulaOptions, LeaguePhaseOptions,
    Participant, Step,
};

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
enum Output {
    Text,
    Json,
}

/// Draw seed; `None` draws from entropy.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct Seed(Option<u64>);

fn parse_seed(value: &str) -> Result<Seed, String> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("none") {
        return Ok(Seed(None));
    }
    value
        .parse()
        .map(|n| Seed(Some(n)))
        .map_err(|_| format!("expected a number or \"none\", got \"{}\"", value))
}

fn default_rounds() -> usize {
    8
}

fn default_max_per_country() -> usize {
    2
}

#[derive(Debug, Parser)]
#[command(name = "draw", version, about = "Generate tournament draws")]
struct Cli {
    /// Format or formula, e.g. knockout, uefa(8, 2), groups(4).round_robin().top(2).knockout()
    formula: String,

    /// CSV file (id,name,seed,country) or a number of sample participants.
    source: Option<String>,

    /// Draw seed, or "none" for a non-reproducible draw.
    #[arg(long, env = "DRAW_SEED", default_value = "42", value_parser = parse_seed)]
    seed: Seed,

    #[arg(long, env = "DRAW_OUTPUT", value_enum, default_value_t = Output::Text)]
    output: Output,

    /// Place participants on the bracket ladder by seed rank.
    #[arg(long, env = "DRAW_SEEDED", default_value_t = true, action = ArgAction::Set)]
    seeded: bool,

    /// How many participants are seeded (default: all).
    #[arg(long, env = "DRAW_NUM_SEEDED")]
    num_seeded: Option<usize>,

    /// Legs for every round-robin stage.
    #[arg(long, env = "DRAW_LEGS")]
    legs: Option<u32>,

    /// League-phase rounds.
    #[arg(long, env = "DRAW_ROUNDS", default_value_t = default_rounds())]
    rounds: usize,

    /// Reject league-phase pairings between participants of one country.
    #[arg(long, env = "DRAW_COUNTRY_LOCK", default_value_t = false, action = ArgAction::Set)]
    country_lock: bool,

    /// Most opponents from one country per participant (0 = no limit).
    #[arg(long, env = "DRAW_MAX_PER_COUNTRY", default_value_t = default_max_per_country())]
    max_per_country: usize,
}

impl Cli {
    fn formula_options(&self) -> FormulaOptions {
        FormulaOptions {
            seed: self.seed.0,
            seeded: self.seeded,
            num_seeded: self.num_seeded,
            league: LeaguePhaseOptions {
                rounds: self.rounds,
                seed: self.seed.0,
                country_lock: self.country_lock,
                max_per_country: self.max_per_country,
            },
        }
    }
}

/// Participants generated when no source is given.
fn default_count(league_phase: bool, rounds: usize) -> usize {
    if league_phase {
        let (_, valid) = valid_field_sizes(rounds);
        valid
            .iter()
            .copied()
            .find(|&n| n >= 36)
            .or_else(|| valid.last().copied())
            .unwrap_or(36)
    } else {
        8
    }
}

/// CSV with header `id,name,seed,country` (seed and country may be empty).
fn load_participants(path: &str) -> Result<Vec<Participant>, Box<dyn Error>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut participants = Vec::new();
    for row in reader.deserialize() {
        let p: Participant = row?;
        participants.push(p);
    }
    log::info!("Loaded {} participants from {}", participants.len(), path);
    Ok(participants)
}

/// Numbered participants seeded 1..=n; league-phase names show the pot.
fn sample_participants(n: usize, pot_size: Option<usize>) -> Vec<Participant> {
    (1..=n)
        .map(|i| {
            let name = match pot_size {
                Some(size) => format!("Team {} (pot {})", i, (i - 1) / size + 1),
                None => format!("Team {}", i),
            };
            Participant::new(i.to_string(), name).with_seed(i as u32)
        })
        .collect()
}

fn main() -> ExitCode {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let cli = Cli::parse();

    let mut steps = match parse_formula(&cli.formula) {
        Ok(steps) => steps,
        Err(e) => {
            log::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    if let Some(legs) = cli.legs {
        for step in steps.iter_mut() {
            if let Step::PlayRoundRobin { legs: l } = step {
                *l = legs;
            }
        }
    }
    let league_phase = steps.contains(&Step::LeaguePhase);
    let pot_size = league_phase.then_some(cli.rounds + 1);

    let participants = match &cli.source {
        Some(source) => match source.parse::<usize>() {
            Ok(n) => sample_participants(n, pot_size),
            Err(_) => match load_participants(source) {
                Ok(p) => p,
                Err(e) => {
                    log::error!("Could not read {}: {}", source, e);
                    return ExitCode::FAILURE;
                }
            },
        },
        None => sample_participants(default_count(league_phase, cli.rounds), pot_size),
    };

    match run_steps(&participants, &steps, &cli.formula_options()) {
        Ok(result) => {
            match cli.output {
                Output::Text => println!("{}", result.render(&participants)),
                Output::Json => match serde_json::to_string_pretty(&result) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        log::error!("Could not serialize draw: {}", e);
                        return ExitCode::FAILURE;
                    }
                },
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{}", e);
            if league_phase && matches!(e, DrawError::Config(_)) {
                let (min, valid) = valid_field_sizes(cli.rounds);
                if valid.is_empty() {
                    log::error!("No field size works with {} rounds", cli.rounds);
                } else {
                    log::error!(
                        "With {} rounds the field must be one of {:?} (minimum {})",
                        cli.rounds,
                        valid,
                        min
                    );
                }
            }
            ExitCode::FAILURE
        }
    }
}
